// Local wall-clock scheduling values.
//
// `scheduledAt` strings have the lexical form `YYYY-MM-DDThh:mm` and carry no
// offset. They are decoded straight into chrono's naive (zone-less) types and
// never pass through `DateTime<Utc>` or `DateTime<Local>`, so the calendar day
// a post lands on does not depend on the host timezone.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
pub const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A decoded schedule. `Invalid` stands in for empty or malformed text and is
/// treated as "no schedule" by everything downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalMoment {
    Invalid,
    At(NaiveDateTime),
}

impl LocalMoment {
    pub fn is_valid(&self) -> bool {
        matches!(self, LocalMoment::At(_))
    }

    pub fn as_naive(&self) -> Option<NaiveDateTime> {
        match self {
            LocalMoment::At(dt) => Some(*dt),
            LocalMoment::Invalid => None,
        }
    }
}

/// Canonical `YYYY-MM-DD` identity of a local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT).map(DayKey)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Decodes `YYYY-MM-DD[Thh:mm[:ss]]` into local components.
/// A missing time means midnight. Seconds, when present, are dropped.
pub fn parse_local(text: &str) -> LocalMoment {
    let text = text.trim();
    if text.is_empty() {
        return LocalMoment::Invalid;
    }

    let (date_part, time_part) = match text.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (text, None),
    };

    let Some(date) = parse_date_components(date_part) else {
        return LocalMoment::Invalid;
    };
    let time = match time_part {
        Some(t) => match parse_time_components(t) {
            Some(t) => t,
            None => return LocalMoment::Invalid,
        },
        None => NaiveTime::MIN,
    };

    LocalMoment::At(date.and_time(time))
}

fn parse_date_components(s: &str) -> Option<NaiveDate> {
    let mut parts = s.splitn(3, '-');
    let year = parse_fixed(parts.next()?, 4)? as i32;
    let month = parse_fixed(parts.next()?, 2)?;
    let day = parse_fixed(parts.next()?, 2)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time_components(s: &str) -> Option<NaiveTime> {
    let mut parts = s.split(':');
    let hour = parse_fixed(parts.next()?, 2)?;
    let minute = parse_fixed(parts.next()?, 2)?;
    if let Some(sec) = parts.next() {
        // Browser pickers may append seconds (and fractions); validate, then drop.
        let whole = sec.split('.').next().unwrap_or(sec);
        parse_fixed(whole, 2).filter(|s| *s < 60)?;
    }
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_fixed(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Inverse of [`parse_local`]. Invalid moments encode as the empty string.
pub fn format_local(moment: &LocalMoment) -> String {
    match moment {
        LocalMoment::At(dt) => dt.format(LOCAL_FORMAT).to_string(),
        LocalMoment::Invalid => String::new(),
    }
}

pub fn day_key(moment: &LocalMoment) -> Option<DayKey> {
    moment.as_naive().map(|dt| DayKey(dt.date()))
}

pub fn day_key_from_text(text: &str) -> Option<DayKey> {
    day_key(&parse_local(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_fields_only() {
        assert_eq!(parse_fixed("2025", 4), Some(2025));
        assert_eq!(parse_fixed("25", 4), None);
        assert_eq!(parse_fixed("+1", 2), None);
        assert_eq!(parse_fixed("1a", 2), None);
    }

    #[test]
    fn seconds_are_validated_then_dropped() {
        let m = parse_local("2025-03-01T10:15:42");
        assert_eq!(format_local(&m), "2025-03-01T10:15");
        assert_eq!(parse_local("2025-03-01T10:15:99"), LocalMoment::Invalid);
        assert_eq!(parse_local("2025-03-01T10:15:00:00"), LocalMoment::Invalid);
    }
}
