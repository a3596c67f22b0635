// File: ./src/model/severity.rs
use crate::model::post::ReviewStatus;

pub const NEUTRAL: u8 = 0;
pub const CLEARED: u8 = 1;
pub const PENDING: u8 = 2;
pub const URGENT: u8 = 3;

/// Ordinal urgency of a review status. Higher means more attention needed.
/// Unknown labels rank as neutral so one bad record never blocks a pass.
pub fn severity_of(status: &ReviewStatus) -> u8 {
    match status {
        ReviewStatus::Approved => CLEARED,
        ReviewStatus::InReview => PENDING,
        ReviewStatus::NeedsFixes => URGENT,
        ReviewStatus::Draft | ReviewStatus::Unknown(_) => NEUTRAL,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityClass {
    Neutral,
    Cleared,
    Pending,
    Urgent,
}

impl SeverityClass {
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            CLEARED => SeverityClass::Cleared,
            PENDING => SeverityClass::Pending,
            URGENT => SeverityClass::Urgent,
            _ => SeverityClass::Neutral,
        }
    }

    pub fn of(status: &ReviewStatus) -> Self {
        Self::from_severity(severity_of(status))
    }

    /// One-glyph badge for plain-text views.
    pub fn mark(&self) -> char {
        match self {
            SeverityClass::Neutral => '·',
            SeverityClass::Cleared => '+',
            SeverityClass::Pending => '?',
            SeverityClass::Urgent => '!',
        }
    }
}
