//! A library for aggregating, merging, and reporting conference participation records.
//!
//! `confrep` collects the conference activity of a research group from two sources —
//! the HAL open archive (TEI XML bibliographies, one query per year and group
//! collection) and locally authored YAML files — merges entries that describe the
//! same occurrence, and renders a year-grouped static HTML report.
//!
//! # Key Features
//!
//! - **TEI XML parsing**: one [`Event`] per `biblFull` record, with the meeting
//!   dates, venue, and the first author's contribution.
//! - **Supplemental records**: hand-curated partial records backfill missing
//!   fields on parsed events without ever overwriting present values.
//! - **Event merging**: events sharing the same date range are folded into one,
//!   near-duplicate contributions are dropped with an informational diagnostic.
//! - **HTML rendering**: byte-compatible with the historical report format.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use confrep::{EventParser, TeiParser, merge_events, sort_events_desc};
//!
//! let input = std::fs::read_to_string("hal_SUBATECH-PLASMA_2020.xml")?;
//! let parser = TeiParser::new();
//! let events = parser.parse(&input)?;
//! let merged = merge_events(sort_events_desc(events));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type that wraps [`Error`] for consistent
//! error handling across all operations. Malformed source documents are fatal
//! for that document; filtered authors, dropped duplicates, and missing URLs
//! are diagnostics emitted through `tracing`, never errors.

use chrono::NaiveDate;
use quick_xml::events::attributes::AttrError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

pub mod check;
#[cfg(feature = "fetch")]
pub mod hal;
pub mod merge;
pub mod render;
pub mod supplement;
pub mod tei;
pub mod yaml;

// Reexports
pub use check::{CheckConfig, check_events};
pub use merge::{merge_events, sort_events_desc};
pub use render::render_year;
pub use supplement::apply_extra_infos;
pub use tei::TeiParser;
pub use yaml::YamlParser;

/// A specialized Result type for record operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while loading or parsing records.
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML syntax error: {0}")]
    InvalidFormat(String),

    #[error("Missing required node: {0}")]
    XmlStructure(String),

    #[error("Invalid field value: {field} - {message}")]
    InvalidFieldValue { field: String, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "fetch")]
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::InvalidFormat(err.to_string())
    }
}

impl From<AttrError> for Error {
    fn from(err: AttrError) -> Self {
        Error::InvalidFormat(err.to_string())
    }
}

/// Represents one talk, poster, or similar item delivered at an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Kind of contribution, e.g. "Talk" or "Poster"
    #[serde(rename = "type", default = "default_contribution_kind")]
    pub kind: String,
    /// Title of the contribution (not the meeting title)
    #[serde(default)]
    pub title: String,
    /// Presenter's first name
    #[serde(default)]
    pub firstname: String,
    /// Presenter's last name
    #[serde(default)]
    pub lastname: String,
    /// Whether the contribution was invited
    #[serde(default)]
    pub invited: bool,
    /// Optional URL to the proceedings
    #[serde(default)]
    pub proceedings: Option<String>,
}

fn default_contribution_kind() -> String {
    "Talk".to_string()
}

impl Default for Contribution {
    fn default() -> Self {
        Self {
            kind: default_contribution_kind(),
            title: String::new(),
            firstname: String::new(),
            lastname: String::new(),
            invited: false,
            proceedings: None,
        }
    }
}

/// Represents one dated occurrence of a conference or meeting the group
/// participated in or organized.
///
/// Two events describe the same occurrence iff their start and end dates are
/// both equal (exact match, no tolerance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Conference name, also the key for supplemental record matching
    pub conference: String,
    /// Optional display override for the conference name
    #[serde(default)]
    pub alias: Option<String>,
    /// First day of the meeting
    pub start: NaiveDate,
    /// Last day of the meeting
    pub end: NaiveDate,
    /// Free-text location, e.g. "Paris, France"
    #[serde(default)]
    pub venue: String,
    /// Free-text audience classification
    #[serde(default)]
    pub audience: Option<String>,
    /// Conference website
    #[serde(default)]
    pub url: Option<String>,
    /// Free-text participation kind, e.g. "Organized" or "Attended"
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    /// Number of participants
    #[serde(default)]
    pub participants: Option<u32>,
    /// Contributions delivered at this event, in presentation order
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

impl Event {
    /// Returns true when `other` describes the same occurrence.
    #[must_use]
    pub fn is_same_occurrence(&self, other: &Event) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// A sparse, hand-curated partial record keyed by conference name.
///
/// Used only to backfill absent fields on an already-parsed [`Event`]; a
/// present value is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraInfo {
    /// Conference name, matched by exact string equality
    pub conference: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub participants: Option<u32>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
}

/// Trait for implementing event parsers.
pub trait EventParser {
    /// Parse a string containing zero or more event records.
    ///
    /// # Arguments
    ///
    /// * `input` - The string containing event data
    ///
    /// # Returns
    ///
    /// A Result containing a vector of parsed Events or an Error
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the input is malformed
    fn parse(&self, input: &str) -> Result<Vec<Event>>;
}
