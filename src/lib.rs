// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod config;
pub mod context;
pub mod filter;
pub mod model;
pub mod storage;
pub mod store;
