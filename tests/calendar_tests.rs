// Day aggregation and the month grid.
use chrono::{Datelike, NaiveDate, Weekday};
use postboard::calendar::{CalendarGrid, GRID_DAYS, MonthCursor, aggregate, start_of_week};
use postboard::model::{DayKey, Platform, Post, ReviewStatus, SeverityClass, severity_of};

fn post(at: Option<&str>, status: ReviewStatus, platforms: &[Platform]) -> Post {
    let mut p = Post::new("", platforms);
    p.scheduled_at = at.map(str::to_string);
    p.status = status;
    p
}

fn day(s: &str) -> DayKey {
    s.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Severity ---

#[test]
fn test_severity_is_total_and_ordered() {
    assert_eq!(severity_of(&ReviewStatus::Draft), 0);
    assert_eq!(severity_of(&ReviewStatus::Approved), 1);
    assert_eq!(severity_of(&ReviewStatus::InReview), 2);
    assert_eq!(severity_of(&ReviewStatus::NeedsFixes), 3);
    assert_eq!(severity_of(&ReviewStatus::from_label("Archived??")), 0);
    assert_eq!(severity_of(&ReviewStatus::from_label("")), 0);

    let classes: Vec<SeverityClass> = (0..=3).map(SeverityClass::from_severity).collect();
    assert!(classes.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(SeverityClass::from_severity(7), SeverityClass::Neutral);
}

#[test]
fn test_status_labels_are_lenient() {
    assert_eq!(ReviewStatus::from_label("in review"), ReviewStatus::InReview);
    assert_eq!(ReviewStatus::from_label("needs-fixes"), ReviewStatus::NeedsFixes);
    assert_eq!(ReviewStatus::from_label(" APPROVED "), ReviewStatus::Approved);
    assert_eq!(
        ReviewStatus::from_label("Scheduled"),
        ReviewStatus::Unknown("Scheduled".to_string())
    );
}

// --- Aggregation ---

#[test]
fn test_same_day_same_platform_takes_max() {
    let posts = vec![
        post(Some("2025-10-29T09:00"), ReviewStatus::Approved, &[Platform::Instagram]),
        post(Some("2025-10-29T18:00"), ReviewStatus::NeedsFixes, &[Platform::Instagram]),
        post(Some("2025-10-29T20:00"), ReviewStatus::Approved, &[Platform::Instagram]),
    ];
    let buckets = aggregate(&posts);
    let b = &buckets[&day("2025-10-29")];
    assert_eq!(b.post_count, 3);
    assert_eq!(b.severity(Platform::Instagram), 3);
}

#[test]
fn test_order_does_not_matter() {
    let mut posts = vec![
        post(Some("2025-10-29T18:00"), ReviewStatus::NeedsFixes, &[Platform::X]),
        post(Some("2025-10-29T09:00"), ReviewStatus::Approved, &[Platform::X]),
    ];
    let forward = aggregate(&posts);
    posts.reverse();
    assert_eq!(forward, aggregate(&posts));
}

#[test]
fn test_platforms_do_not_interfere() {
    let posts = vec![
        post(Some("2025-10-29T09:00"), ReviewStatus::NeedsFixes, &[Platform::Instagram]),
        post(Some("2025-10-29T10:00"), ReviewStatus::Approved, &[Platform::Facebook]),
        post(Some("2025-10-29T11:00"), ReviewStatus::InReview, &[]),
    ];
    let buckets = aggregate(&posts);
    let b = &buckets[&day("2025-10-29")];
    assert_eq!(b.post_count, 3);
    assert_eq!(b.severity(Platform::Instagram), 3);
    assert_eq!(b.severity(Platform::Facebook), 1);
    assert_eq!(b.severity(Platform::LinkedIn), 0);
    assert_eq!(b.platform_severity.len(), 2);
    assert_eq!(b.max_severity(), 3);
}

#[test]
fn test_unscheduled_posts_never_create_buckets() {
    let posts = vec![
        post(None, ReviewStatus::NeedsFixes, &[Platform::Instagram]),
        post(Some(""), ReviewStatus::NeedsFixes, &[Platform::Instagram]),
        post(Some("soon"), ReviewStatus::NeedsFixes, &[Platform::Instagram]),
    ];
    assert!(aggregate(&posts).is_empty());

    let mut with_one = posts.clone();
    with_one.push(post(Some("2025-11-02T12:00"), ReviewStatus::Approved, &[Platform::Instagram]));
    let buckets = aggregate(&with_one);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[&day("2025-11-02")].severity(Platform::Instagram), 1);
}

#[test]
fn test_draft_only_day_still_counts() {
    let posts = vec![post(Some("2025-10-01T08:00"), ReviewStatus::Draft, &[Platform::TikTok])];
    let buckets = aggregate(&posts);
    let b = &buckets[&day("2025-10-01")];
    assert_eq!(b.post_count, 1);
    assert_eq!(b.severity(Platform::TikTok), 0);
}

// --- Grid ---

#[test]
fn test_start_of_week_is_monday() {
    // 2025-10-29 is a Wednesday.
    let wed = date(2025, 10, 29);
    assert_eq!(wed.weekday(), Weekday::Wed);
    let monday = start_of_week(wed);
    assert_eq!(monday.weekday(), Weekday::Mon);
    assert_eq!(monday, date(2025, 10, 27));

    // Monday maps to itself, Sunday goes back six days.
    assert_eq!(start_of_week(date(2025, 10, 27)), date(2025, 10, 27));
    assert_eq!(start_of_week(date(2025, 11, 2)), date(2025, 10, 27));
}

#[test]
fn test_grid_shape() {
    for (y, m) in [(2025, 10), (2025, 2), (2026, 2), (2024, 9), (2025, 6)] {
        let cursor = MonthCursor::new(y, m).unwrap();
        let grid = CalendarGrid::build(cursor);
        assert_eq!(grid.cells.len(), GRID_DAYS);
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.len() == 7));
        assert!(rows.iter().all(|r| r[0].date.weekday() == Weekday::Mon));

        let first = date(y, m, 1);
        assert!(grid.cells[0].date <= first);
        assert!(grid.cells.iter().any(|c| c.date == first && c.in_month));
        let in_month = grid.cells.iter().filter(|c| c.in_month).count() as u32;
        let next = MonthCursor::new(y, m).unwrap().next().first_day();
        assert_eq!(in_month as i64, (next - first).num_days());
    }
}

#[test]
fn test_october_2025_grid() {
    let grid = CalendarGrid::build(MonthCursor::new(2025, 10).unwrap());
    assert_eq!(grid.cells[0].date, date(2025, 9, 29));
    assert!(!grid.cells[0].in_month);
    assert!(grid.cells[2].in_month);
    assert_eq!(grid.cells[41].date, date(2025, 11, 9));
    assert!(!grid.cells[41].in_month);
}

#[test]
fn test_overflow_days_keep_their_buckets() {
    let posts = vec![post(Some("2025-11-01T09:00"), ReviewStatus::InReview, &[Platform::Instagram])];
    let buckets = aggregate(&posts);
    let grid = CalendarGrid::build(MonthCursor::new(2025, 10).unwrap());
    let joined = grid.with_buckets(&buckets);
    let (cell, bucket) = joined
        .iter()
        .find(|(c, _)| c.day == day("2025-11-01"))
        .unwrap();
    assert!(!cell.in_month);
    assert_eq!(bucket.unwrap().post_count, 1);
    assert_eq!(joined.iter().filter(|(_, b)| b.is_some()).count(), 1);
}

// --- Cursor navigation ---

#[test]
fn test_cursor_normalises_to_first_of_month() {
    let c = MonthCursor::containing(date(2025, 1, 31));
    assert_eq!(c.first_day(), date(2025, 1, 1));
    assert_eq!(c.next().first_day(), date(2025, 2, 1));
    assert_eq!(c.next().next().first_day(), date(2025, 3, 1));
    assert_eq!(c.prev().first_day(), date(2024, 12, 1));
}

#[test]
fn test_shift_visits_every_month_once() {
    let mut c = MonthCursor::new(2024, 1).unwrap();
    let mut seen = Vec::new();
    for _ in 0..24 {
        seen.push((c.year(), c.month()));
        c = c.next();
    }
    assert_eq!(seen.len(), 24);
    assert_eq!(seen[12], (2025, 1));
    seen.dedup();
    assert_eq!(seen.len(), 24);
    assert_eq!(c.shift(-24), MonthCursor::new(2024, 1).unwrap());
}

#[test]
fn test_shift_out_of_range_is_a_no_op() {
    let c = MonthCursor::new(2025, 6).unwrap();
    assert_eq!(c.shift(i64::MAX / 24), c);
    assert_eq!(c.shift(i64::MAX), c);
    assert_eq!(c.shift(-(i64::MAX / 24)), c);
}

#[test]
fn test_grid_is_complete_at_range_edges() {
    let first = MonthCursor::containing(NaiveDate::MIN);
    let last = MonthCursor::containing(NaiveDate::MAX);
    for cursor in [first, first.prev(), first.shift(-100), last, last.next(), last.shift(100)] {
        let grid = CalendarGrid::build(cursor);
        assert_eq!(grid.cells.len(), GRID_DAYS);
        assert!(grid.cells.iter().any(|c| c.in_month));
        assert!(grid.rows().all(|r| r[0].date.weekday() == Weekday::Mon));
    }
    assert_eq!(first.prev(), first);
    assert_eq!(last.next(), last);

    // The final December cannot show six full weeks, so it is not a valid cursor.
    let max_year = NaiveDate::MAX.year();
    assert_eq!(MonthCursor::parse(&format!("{}-12", max_year)), None);
    assert_eq!(last, MonthCursor::new(max_year, 11).unwrap());
}

#[test]
fn test_start_of_week_never_panics() {
    let start = start_of_week(NaiveDate::MIN);
    assert!(start == NaiveDate::MIN || start.weekday() == Weekday::Mon);
    assert_eq!(start_of_week(NaiveDate::MAX).weekday(), Weekday::Mon);
}

#[test]
fn test_today_cursor_is_first_of_month() {
    let c = MonthCursor::today();
    assert_eq!(c.first_day().day(), 1);
    assert!(c.contains(chrono::Local::now().date_naive()));
}

#[test]
fn test_cursor_parse() {
    assert_eq!(MonthCursor::parse("2025-10"), MonthCursor::new(2025, 10));
    assert_eq!(MonthCursor::parse("2025-13"), None);
    assert_eq!(MonthCursor::parse("october"), None);
}
