use crate::domain::model::{AuditOutcome, AuditResult, BusinessProfile, MentionShare};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

pub const NO_DATA: &str = "no data";

/// Keys of the flattened report, in output order.
pub const REPORT_FIELDS: &[&str] = &[
    "query",
    "shop_name",
    "address",
    "place_id",
    "search_id",
    "search_link",
    "price",
    "classification",
    "reservation_provider",
    "email_hints",
    "usable_reviews",
    "pizza_mentions",
    "alcohol_mentions",
    "pizza_percent",
    "alcohol_percent",
    "audited_at",
];

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub query: String,
    pub profile: BusinessProfile,
    pub outcome: AuditOutcome,
    pub audited_at: DateTime<Utc>,
}

impl AuditReport {
    pub fn new(query: impl Into<String>, profile: BusinessProfile, outcome: AuditOutcome) -> Self {
        Self {
            query: query.into(),
            profile,
            outcome,
            audited_at: Utc::now(),
        }
    }

    pub fn result(&self) -> Option<&AuditResult> {
        self.outcome.result()
    }

    pub fn mention_share(&self) -> Option<MentionShare> {
        self.result().and_then(AuditResult::mention_share)
    }

    /// Flattens the report into `(key, value)` pairs following [`REPORT_FIELDS`].
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let count = |pick: fn(&AuditResult) -> usize| {
            self.result()
                .map(|r| pick(r).to_string())
                .unwrap_or_default()
        };
        let share = self.mention_share();
        let percent = |pick: fn(&MentionShare) -> f64| match &share {
            Some(share) => format!("{:.1}", pick(share)),
            None => NO_DATA.to_string(),
        };

        vec![
            ("query", self.query.clone()),
            ("shop_name", text(&self.profile.title)),
            ("address", text(&self.profile.address)),
            (
                "place_id",
                self.profile
                    .place_id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            ),
            ("search_id", text(&self.profile.search_id)),
            ("search_link", text(&self.profile.search_link)),
            ("price", text(&self.profile.price)),
            ("classification", text(&self.profile.classification)),
            ("reservation_provider", text(&self.profile.reservation_provider)),
            ("email_hints", self.profile.email_hints.join("; ")),
            ("usable_reviews", count(|r| r.usable_reviews)),
            ("pizza_mentions", count(|r| r.pizza_mentions)),
            ("alcohol_mentions", count(|r| r.alcohol_mentions)),
            ("pizza_percent", percent(|s| s.pizza_percent)),
            ("alcohol_percent", percent(|s| s.alcohol_percent)),
            ("audited_at", self.audited_at.to_rfc3339()),
        ]
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_missing = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

        writeln!(f, "🏪 {}", or_missing(&self.profile.title))?;
        writeln!(f, "   Address:        {}", or_missing(&self.profile.address))?;
        writeln!(f, "   Type:           {}", or_missing(&self.profile.classification))?;
        writeln!(f, "   Price:          {}", or_missing(&self.profile.price))?;
        writeln!(f, "   Reservations:   {}", or_missing(&self.profile.reservation_provider))?;
        if !self.profile.email_hints.is_empty() {
            writeln!(f, "   Contact hints:  {}", self.profile.email_hints.join(", "))?;
        }

        match (&self.outcome, self.mention_share()) {
            (AuditOutcome::NoPlaceId, _) => {
                write!(f, "   Reviews:        no place found for '{}'", self.query)
            }
            (AuditOutcome::Completed(_), None) => {
                write!(f, "   Reviews:        no usable reviews, {}", NO_DATA)
            }
            (AuditOutcome::Completed(result), Some(share)) => {
                writeln!(f, "   Usable reviews: {}", result.usable_reviews)?;
                writeln!(
                    f,
                    "   Pizza:          {} ({:.1}%)",
                    result.pizza_mentions, share.pizza_percent
                )?;
                write!(
                    f,
                    "   Alcohol:        {} ({:.1}%)",
                    result.alcohol_mentions, share.alcohol_percent
                )
            }
        }
    }
}
