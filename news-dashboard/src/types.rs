use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
// Collaborator contracts live in the interfaces crate
pub use interfaces::defs::{Article, ArticleSource, ArticleSourceRef, KeyValueStore, Role};

pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    Keyword(String),
}

impl Category {
    /// `"all"` (any case) or blank means no constraint; anything else is a content keyword.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Category::All
        } else {
            Category::Keyword(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub author: String,
    pub category: Category,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl FilterCriteria {
    pub fn has_date_bounds(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    PublishedAt,
    Title,
    Author,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "publishedAt" | "published_at" | "date" => Some(SortField::PublishedAt),
            "title" => Some(SortField::Title),
            "author" => Some(SortField::Author),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// `field: None` means the requested field was not recognized; the view keeps input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    pub fn parse(field: &str, direction: &str) -> Self {
        Self {
            field: SortField::parse(field),
            direction: SortDirection::parse(direction).unwrap_or_default(),
        }
    }

    pub fn unsorted() -> Self {
        Self {
            field: None,
            direction: SortDirection::default(),
        }
    }
}

impl Default for SortCriteria {
    // newest first
    fn default() -> Self {
        Self::new(SortField::PublishedAt, SortDirection::Desc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorAggregate {
    pub name: String,
    pub article_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutLine {
    pub author: String,
    pub article_count: usize,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub query: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/everything".to_string(),
            api_key: String::new(),
            query: "pakistan".to_string(),
            user_agent: "News-Dashboard/1.0".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Accepts RFC 3339 plus the looser shapes the news API and date pickers emit.
/// Offset-less values are read as UTC; a bare date is UTC midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub fn published_at(article: &Article) -> Result<DateTime<Utc>> {
    parse_timestamp(&article.published_at).ok_or_else(|| DashboardError::UnparsableDate {
        url: article.url.clone(),
        value: article.published_at.clone(),
    })
}

/// Filter bound from user input. Blank means unbounded.
pub fn parse_date_bound(raw: &str) -> Result<Option<DateTime<Utc>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(raw)
        .map(Some)
        .ok_or_else(|| DashboardError::InvalidDateBound(raw.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Failed to fetch articles: {0}")]
    FetchFailed(String),

    #[error("Invalid rate: {value}")]
    InvalidRateInput { value: String },

    #[error("Unparsable publish date {value:?} on {url}")]
    UnparsableDate { url: String, value: String },

    #[error("Invalid date bound: {0}")]
    InvalidDateBound(String),

    #[error("Payout data is restricted to admins")]
    AccessDenied,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("CSV error on line {line}: {reason}")]
    Csv { line: usize, reason: String },

    #[error("Settings storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
