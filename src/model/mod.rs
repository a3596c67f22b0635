// File: ./src/model/mod.rs
pub mod matcher;
pub mod post;
pub mod schedule;
pub mod severity;

pub use post::{Platform, PlatformEntry, Post, PostPatch, ReviewStatus};
pub use schedule::{DayKey, LocalMoment};
pub use severity::{SeverityClass, severity_of};
