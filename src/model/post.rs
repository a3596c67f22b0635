// File: ./src/model/post.rs
use crate::model::schedule::{self, DayKey, LocalMoment};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;

fn default_id() -> String {
    Uuid::new_v4().to_string()
}

// --- PLATFORMS ---

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Instagram,
    Facebook,
    LinkedIn,
    X,
    TikTok,
}

impl Platform {
    /// Stable identifier used in storage and on the command line.
    pub fn id(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
            Platform::X => "X",
            Platform::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub caption: String,
}

// --- REVIEW STATUS ---

/// Review state of a post. Labels outside the known set are kept verbatim
/// in `Unknown` so a corrupted record still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    #[default]
    Draft,
    InReview,
    NeedsFixes,
    Approved,
    Unknown(String),
}

impl ReviewStatus {
    pub fn label(&self) -> &str {
        match self {
            ReviewStatus::Draft => "Draft",
            ReviewStatus::InReview => "In review",
            ReviewStatus::NeedsFixes => "Needs fixes",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Unknown(raw) => raw,
        }
    }

    /// Lenient label lookup: case and separators (`-`, `_`, space) are ignored,
    /// so `needs-fixes` and `In Review` both resolve.
    pub fn from_label(label: &str) -> ReviewStatus {
        let folded: String = label
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "" | "draft" => ReviewStatus::Draft,
            "inreview" => ReviewStatus::InReview,
            "needsfixes" => ReviewStatus::NeedsFixes,
            "approved" => ReviewStatus::Approved,
            _ => ReviewStatus::Unknown(label.trim().to_string()),
        }
    }
}

impl From<String> for ReviewStatus {
    fn from(value: String) -> Self {
        ReviewStatus::from_label(&value)
    }
}

impl From<ReviewStatus> for String {
    fn from(value: ReviewStatus) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// --- POST ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_schedule",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default, deserialize_with = "deserialize_platforms")]
    pub platforms: BTreeMap<Platform, PlatformEntry>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub image_name: String,
}

impl Post {
    /// Creates a draft with every platform present; the listed ones enabled.
    pub fn new(owner: &str, enabled: &[Platform]) -> Self {
        let platforms = Platform::iter()
            .map(|p| {
                (
                    p,
                    PlatformEntry {
                        enabled: enabled.contains(&p),
                        caption: String::new(),
                    },
                )
            })
            .collect();

        Self {
            id: default_id(),
            scheduled_at: None,
            status: ReviewStatus::Draft,
            platforms,
            tags: Vec::new(),
            owner: owner.to_string(),
            notes: String::new(),
            image_name: String::new(),
        }
    }

    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.platforms.get(&platform).is_some_and(|e| e.enabled)
    }

    pub fn enabled_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.platforms
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(p, _)| *p)
    }

    pub fn entry_mut(&mut self, platform: Platform) -> &mut PlatformEntry {
        self.platforms.entry(platform).or_default()
    }

    pub fn schedule_moment(&self) -> LocalMoment {
        schedule::parse_local(self.scheduled_at.as_deref().unwrap_or_default())
    }

    /// Day bucket this post lands in, or `None` when unscheduled or unparseable.
    pub fn day_key(&self) -> Option<DayKey> {
        schedule::day_key(&self.schedule_moment())
    }

    /// True only for a schedule that decodes; garbage text counts as unscheduled.
    pub fn is_scheduled(&self) -> bool {
        self.schedule_moment().is_valid()
    }
}

fn deserialize_schedule<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn deserialize_platforms<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Platform, PlatformEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, PlatformEntry> = BTreeMap::deserialize(deserializer)?;
    let mut platforms = BTreeMap::new();
    for (key, entry) in raw {
        match key.parse::<Platform>() {
            Ok(p) => {
                platforms.insert(p, entry);
            }
            Err(_) => log::warn!("Dropping unknown platform '{}' from stored post", key),
        }
    }
    Ok(platforms)
}

// --- PATCHES ---

/// Field-wise replacement applied to one post by id.
/// `None` leaves a field untouched; `scheduled_at: Some(None)` unschedules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub scheduled_at: Option<Option<String>>,
    pub status: Option<ReviewStatus>,
    pub platforms: Option<BTreeMap<Platform, PlatformEntry>>,
    pub tags: Option<Vec<String>>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub image_name: Option<String>,
}

impl PostPatch {
    pub fn status(status: ReviewStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn schedule(at: Option<&str>) -> Self {
        Self {
            scheduled_at: Some(at.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn apply_to(self, post: &mut Post) {
        if let Some(at) = self.scheduled_at {
            post.scheduled_at = at.filter(|s| !s.trim().is_empty());
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(platforms) = self.platforms {
            post.platforms = platforms;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(owner) = self.owner {
            post.owner = owner;
        }
        if let Some(notes) = self.notes {
            post.notes = notes;
        }
        if let Some(image_name) = self.image_name {
            post.image_name = image_name;
        }
    }
}
