// File: ./src/filter.rs
//! Filter pipeline shared by the board and calendar views.
//!
//! Every filter dimension is one [`Predicate`]. Both views walk the same
//! ordered list and only differ in which predicates they select, so the
//! shared dimensions cannot drift apart.

use crate::model::post::{Platform, Post, ReviewStatus};
use crate::model::schedule::DayKey;

#[derive(Debug, Clone, Default)]
pub struct FilterOptions<'a> {
    /// `None` means any status.
    pub status: Option<ReviewStatus>,
    /// `None` means any platform.
    pub platform: Option<Platform>,
    pub scheduled_only: bool,
    pub selected_day: Option<DayKey>,
    pub search_term: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Status,
    Platform,
    ScheduledOnly,
    SelectedDay,
    Search,
}

impl Predicate {
    pub const ALL: [Predicate; 5] = [
        Predicate::Status,
        Predicate::Platform,
        Predicate::ScheduledOnly,
        Predicate::SelectedDay,
        Predicate::Search,
    ];

    pub fn accepts(&self, post: &Post, options: &FilterOptions) -> bool {
        match self {
            Predicate::Status => options.status.as_ref().is_none_or(|s| post.status == *s),
            Predicate::Platform => options.platform.is_none_or(|p| post.is_enabled(p)),
            Predicate::ScheduledOnly => !options.scheduled_only || post.is_scheduled(),
            Predicate::SelectedDay => options
                .selected_day
                .is_none_or(|day| post.day_key() == Some(day)),
            Predicate::Search => post.matches_search_term(options.search_term),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    /// Aggregates every day at once, so day selection does not apply.
    Calendar,
}

impl View {
    pub fn includes(&self, predicate: Predicate) -> bool {
        match self {
            View::Board => true,
            View::Calendar => predicate != Predicate::SelectedDay,
        }
    }

    pub fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        Predicate::ALL.into_iter().filter(|p| self.includes(*p))
    }

    pub fn accepts(&self, post: &Post, options: &FilterOptions) -> bool {
        self.predicates().all(|p| p.accepts(post, options))
    }
}

/// Keeps input order.
pub fn filter_posts<'p, I>(posts: I, options: &FilterOptions, view: View) -> Vec<&'p Post>
where
    I: IntoIterator<Item = &'p Post>,
{
    let visible: Vec<&Post> = posts
        .into_iter()
        .filter(|post| view.accepts(post, options))
        .collect();
    log::debug!("{:?} filter kept {} post(s)", view, visible.len());
    visible
}
