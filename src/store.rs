// File: src/store.rs
use crate::calendar::{self, CalendarGrid, DayBucket, DayBuckets, GridDay, MonthCursor};
use crate::filter::{self, FilterOptions, View};
use crate::model::{DayKey, Post, PostPatch, ReviewStatus};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory post collection plus the day selection shared by both views.
/// Persistence is the caller's business (see `storage::LocalStorage`).
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    pub posts: Vec<Post>,
    selected_day: Option<DayKey>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            selected_day: None,
        }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn add_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    // --- Mutations ---

    pub fn apply_patch(&mut self, id: &str, patch: PostPatch) -> Option<Post> {
        let post = self.get_mut(id)?;
        patch.apply_to(post);
        Some(post.clone())
    }

    pub fn set_status(&mut self, id: &str, status: ReviewStatus) -> Option<Post> {
        self.apply_patch(id, PostPatch::status(status))
    }

    pub fn schedule(&mut self, id: &str, at: Option<&str>) -> Option<Post> {
        self.apply_patch(id, PostPatch::schedule(at))
    }

    pub fn delete_post(&mut self, id: &str) -> Option<Post> {
        let idx = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(idx))
    }

    /// Copies a post under a fresh id, back in draft.
    pub fn duplicate_post(&mut self, id: &str) -> Option<Post> {
        let mut copy = self.get(id)?.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.status = ReviewStatus::Draft;
        self.posts.push(copy.clone());
        Some(copy)
    }

    /// Imported posts replace same-id posts, the rest are appended.
    /// Returns `(added, replaced)`.
    pub fn merge_import(&mut self, imported: Vec<Post>) -> (usize, usize) {
        let mut added = 0;
        let mut replaced = 0;
        for post in imported {
            if let Some(existing) = self.get_mut(&post.id) {
                *existing = post;
                replaced += 1;
            } else {
                self.posts.push(post);
                added += 1;
            }
        }
        log::info!("Import merged: {} added, {} replaced", added, replaced);
        (added, replaced)
    }

    // --- Day selection ---

    pub fn selected_day(&self) -> Option<DayKey> {
        self.selected_day
    }

    pub fn select_day(&mut self, day: DayKey) {
        self.selected_day = Some(day);
    }

    pub fn clear_selected_day(&mut self) {
        self.selected_day = None;
    }

    // --- Read/Filter Logic ---

    /// Board view. Falls back to the shared selected day when `options` names
    /// none. Scheduled posts come first in local time order; ties keep
    /// insertion order.
    pub fn board(&self, options: &FilterOptions) -> Vec<&Post> {
        let options = FilterOptions {
            selected_day: options.selected_day.or(self.selected_day),
            ..options.clone()
        };
        let mut visible = filter::filter_posts(&self.posts, &options, View::Board);
        visible.sort_by(|a, b| compare_schedule(a, b));
        visible
    }

    pub fn calendar_posts(&self, options: &FilterOptions) -> Vec<&Post> {
        filter::filter_posts(&self.posts, options, View::Calendar)
    }

    pub fn calendar_buckets(&self, options: &FilterOptions) -> DayBuckets {
        calendar::aggregate(self.calendar_posts(options))
    }

    /// Grid for `cursor` joined with the buckets of the calendar-view subset.
    pub fn month_view(
        &self,
        cursor: MonthCursor,
        options: &FilterOptions,
    ) -> Vec<(GridDay, Option<DayBucket>)> {
        let buckets = self.calendar_buckets(options);
        CalendarGrid::build(cursor)
            .with_buckets(&buckets)
            .into_iter()
            .map(|(cell, bucket)| (cell, bucket.cloned()))
            .collect()
    }

    /// Every tag in use with its post count, sorted by tag.
    pub fn all_tags(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for post in &self.posts {
            for tag in &post.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        let mut result: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, n)| (tag.to_string(), n))
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}

fn compare_schedule(a: &Post, b: &Post) -> Ordering {
    match (a.schedule_moment().as_naive(), b.schedule_moment().as_naive()) {
        (Some(t1), Some(t2)) => t1.cmp(&t2),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
