use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque token identifying a business in the search index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    /// Returns `None` for empty or whitespace-only tokens.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Continuation cursor for the next page of reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One review record exactly as the source returned it.
///
/// Only `snippet` is ever read; everything else is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReview(serde_json::Value);

impl RawReview {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The review text, if the record has a string `snippet` field.
    pub fn snippet(&self) -> Option<&str> {
        self.0.get("snippet").and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    QualityScore,
    NewestFirst,
    RatingHigh,
    RatingLow,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::QualityScore => "qualityScore",
            SortOrder::NewestFirst => "newestFirst",
            SortOrder::RatingHigh => "ratingHigh",
            SortOrder::RatingLow => "ratingLow",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "qualityScore" => Ok(SortOrder::QualityScore),
            "newestFirst" => Ok(SortOrder::NewestFirst),
            "ratingHigh" => Ok(SortOrder::RatingHigh),
            "ratingLow" => Ok(SortOrder::RatingLow),
            other => Err(format!(
                "unknown sort order '{}' (expected qualityScore, newestFirst, ratingHigh or ratingLow)",
                other
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single page request against the review source.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPageRequest {
    pub place_id: PlaceId,
    pub continuation_token: Option<PageToken>,
    pub sort_order: SortOrder,
    pub locale: String,
}

/// One page of reviews. A response without a reviews field is an empty page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPage {
    pub reviews: Vec<RawReview>,
    pub next_page_token: Option<PageToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// No place identifier was available; nothing was requested.
    NoPlaceId,
    Reviews(Vec<RawReview>),
}

impl FetchOutcome {
    pub fn reviews(&self) -> Option<&[RawReview]> {
        match self {
            FetchOutcome::NoPlaceId => None,
            FetchOutcome::Reviews(reviews) => Some(reviews),
        }
    }
}

/// Keyword-presence counts over one batch of reviews.
///
/// Both mention counts are bounded by `usable_reviews`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditResult {
    pub usable_reviews: usize,
    pub pizza_mentions: usize,
    pub alcohol_mentions: usize,
}

impl AuditResult {
    /// Percentages of usable reviews; `None` when there is nothing to divide by.
    pub fn mention_share(&self) -> Option<MentionShare> {
        if self.usable_reviews == 0 {
            return None;
        }
        let total = self.usable_reviews as f64;
        Some(MentionShare {
            pizza_percent: self.pizza_mentions as f64 / total * 100.0,
            alcohol_percent: self.alcohol_mentions as f64 / total * 100.0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MentionShare {
    pub pizza_percent: f64,
    pub alcohol_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    NoPlaceId,
    Completed(AuditResult),
}

impl AuditOutcome {
    pub fn result(&self) -> Option<&AuditResult> {
        match self {
            AuditOutcome::NoPlaceId => None,
            AuditOutcome::Completed(result) => Some(result),
        }
    }
}

/// Knowledge-graph metadata for a business. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessProfile {
    pub search_id: Option<String>,
    pub place_id: Option<PlaceId>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub search_link: Option<String>,
    pub price: Option<String>,
    pub classification: Option<String>,
    pub reservation_provider: Option<String>,
    pub email_hints: Vec<String>,
}
