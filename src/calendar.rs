// File: ./src/calendar.rs
//! Month view: per-day buckets plus the 6x7 Monday-first grid they fill.
use crate::model::post::{Platform, Post};
use crate::model::schedule::DayKey;
use crate::model::severity::{self, NEUTRAL};
use chrono::{Datelike, Days, Duration, Local, NaiveDate};
use std::collections::BTreeMap;

pub const GRID_DAYS: usize = 42;
pub const WEEK_DAYS: usize = 7;

// --- AGGREGATION ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub day: DayKey,
    pub post_count: usize,
    /// Highest severity per enabled platform. Untouched platforms are absent.
    pub platform_severity: BTreeMap<Platform, u8>,
}

impl DayBucket {
    fn new(day: DayKey) -> Self {
        Self {
            day,
            post_count: 0,
            platform_severity: BTreeMap::new(),
        }
    }

    pub fn severity(&self, platform: Platform) -> u8 {
        self.platform_severity
            .get(&platform)
            .copied()
            .unwrap_or(NEUTRAL)
    }

    /// Worst severity across all platforms, for a single day badge.
    pub fn max_severity(&self) -> u8 {
        self.platform_severity
            .values()
            .copied()
            .max()
            .unwrap_or(NEUTRAL)
    }

    fn add(&mut self, post: &Post) {
        self.post_count += 1;
        let sev = severity::severity_of(&post.status);
        for platform in post.enabled_platforms() {
            let slot = self.platform_severity.entry(platform).or_insert(NEUTRAL);
            *slot = (*slot).max(sev);
        }
    }
}

pub type DayBuckets = BTreeMap<DayKey, DayBucket>;

/// Buckets already-filtered posts by local day. Unscheduled posts are skipped;
/// days without posts have no entry.
pub fn aggregate<'p, I>(posts: I) -> DayBuckets
where
    I: IntoIterator<Item = &'p Post>,
{
    let mut buckets = DayBuckets::new();
    let mut skipped = 0usize;

    for post in posts {
        let Some(day) = post.day_key() else {
            skipped += 1;
            continue;
        };
        buckets
            .entry(day)
            .or_insert_with(|| DayBucket::new(day))
            .add(post);
    }

    log::debug!(
        "Aggregated {} day bucket(s), {} unscheduled post(s) skipped",
        buckets.len(),
        skipped
    );
    buckets
}

// --- GRID ---

/// Monday on or before `date`. Dates in the partial week at the very start of
/// chrono's range have no such Monday and map to themselves.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    // Sunday-based weekday w goes back (w + 6) % 7 days, i.e. days since Monday.
    date
        .checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
        .unwrap_or(date)
}

/// Whether the whole 42-day window for the month starting at `first` is
/// representable.
fn window_fits(first: NaiveDate) -> bool {
    first
        .checked_sub_days(Days::new(first.weekday().num_days_from_monday() as u64))
        .and_then(|start| start.checked_add_days(Days::new(GRID_DAYS as u64 - 1)))
        .is_some()
}

/// First day of the displayed month. Always normalised to day 1, and always a
/// month whose full grid fits in chrono's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor(NaiveDate);

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .filter(|first| window_fits(*first))
            .map(Self)
    }

    /// Month holding `date`. At the edges of chrono's range this clamps to the
    /// nearest month whose grid fits.
    pub fn containing(date: NaiveDate) -> Self {
        let cursor = Self(date - Duration::days(date.day0() as i64));
        if window_fits(cursor.0) {
            return cursor;
        }
        let inward = if cursor.year() < 0 { 1 } else { -1 };
        Self::from_index(cursor.index() + inward).unwrap_or(cursor)
    }

    pub fn today() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// Accepts `YYYY-MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let (y, m) = s.trim().split_once('-')?;
        Self::new(y.parse().ok()?, m.parse().ok()?)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Moves by whole months. When the target grid would leave chrono's date
    /// range the cursor stays put.
    pub fn shift(&self, months: i64) -> Self {
        self.index()
            .checked_add(months)
            .and_then(Self::from_index)
            .unwrap_or(*self)
    }

    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    fn index(&self) -> i64 {
        self.year() as i64 * 12 + self.0.month0() as i64
    }

    fn from_index(index: i64) -> Option<Self> {
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        Self::new(year, index.rem_euclid(12) as u32 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub day: DayKey,
    /// Display emphasis only; overflow days still carry their buckets.
    pub in_month: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub cursor: MonthCursor,
    pub cells: Vec<GridDay>,
}

impl CalendarGrid {
    pub fn build(cursor: MonthCursor) -> Self {
        let start = start_of_week(cursor.first_day());
        let cells = start
            .iter_days()
            .take(GRID_DAYS)
            .map(|date| GridDay {
                date,
                day: DayKey::new(date),
                in_month: cursor.contains(date),
            })
            .collect();
        Self { cursor, cells }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridDay]> {
        self.cells.chunks(WEEK_DAYS)
    }

    /// Pairs each cell with its bucket; days without data get `None`.
    pub fn with_buckets<'b>(
        &self,
        buckets: &'b DayBuckets,
    ) -> Vec<(GridDay, Option<&'b DayBucket>)> {
        self.cells
            .iter()
            .map(|cell| (*cell, buckets.get(&cell.day)))
            .collect()
    }
}
