//! Domain entities. Pure data structures for the core business.
//!
//! No Reddit/Discord/IO types here — these are mapped from adapters.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single submission from the source feed, as seen by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
    /// Embedded media descriptor, kept as raw JSON (shape varies per host).
    pub media: Option<serde_json::Value>,
    pub is_adult: bool,
}

/// A classified submission, ready to be relayed or saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSubmission {
    /// Sanitized title; safe to use as a filename stem.
    pub title: String,
    pub url: String,
    /// Includes the leading dot, e.g. `.png`.
    pub extension: String,
    pub kind: MediaKind,
}

impl ExtractedSubmission {
    /// `title + extension`, the name used when saving locally.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.title, self.extension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Gif served by the third-party gif host.
    HostedGif,
    /// URL points straight at an image or gif file.
    DirectImage,
    /// Video embedded in the submission's media descriptor.
    EmbeddedVideo,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::HostedGif => "hosted_gif",
            MediaKind::DirectImage => "direct_image",
            MediaKind::EmbeddedVideo => "embedded_video",
        };
        f.write_str(s)
    }
}

/// Listing category of the source feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    New,
    Rising,
    Top,
    #[default]
    Hot,
}

impl Category {
    /// Case-insensitive parse. Anything unrecognised falls back to `Hot`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "new" => Category::New,
            "rising" => Category::Rising,
            "top" => Category::Top,
            _ => Category::Hot,
        }
    }

    /// Path segment used by the listing endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::New => "new",
            Category::Rising => "rising",
            Category::Top => "top",
            Category::Hot => "hot",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Category::parse_lenient(&s))
    }
}

/// What to fetch from the feed: source name, category and an optional item cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub source: String,
    pub category: Category,
    pub limit: Option<u32>,
}

impl fmt::Display for FeedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r/{} category: {}", self.source, self.category)?;
        if let Some(limit) = self.limit {
            write!(f, " limit: {}", limit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(Category::parse_lenient("NEW"), Category::New);
        assert_eq!(Category::parse_lenient("Rising"), Category::Rising);
        assert_eq!(Category::parse_lenient(" top "), Category::Top);
    }

    #[test]
    fn unknown_category_falls_back_to_hot() {
        assert_eq!(Category::parse_lenient("controversial"), Category::Hot);
        assert_eq!(Category::parse_lenient(""), Category::Hot);
    }

    #[test]
    fn query_display_includes_limit_only_when_set() {
        let mut q = FeedQuery {
            source: "pics".into(),
            category: Category::Top,
            limit: None,
        };
        assert_eq!(q.to_string(), "r/pics category: top");
        q.limit = Some(10);
        assert_eq!(q.to_string(), "r/pics category: top limit: 10");
    }

    #[test]
    fn file_name_joins_title_and_extension() {
        let s = ExtractedSubmission {
            title: "cat".into(),
            url: "https://i.example.com/cat.png".into(),
            extension: ".png".into(),
            kind: MediaKind::DirectImage,
        };
        assert_eq!(s.file_name(), "cat.png");
    }
}
