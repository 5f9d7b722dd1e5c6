use crate::core::fetcher::ReviewFetcher;
use crate::domain::model::{AuditOutcome, AuditResult, FetchOutcome, PlaceId, RawReview};
use crate::domain::ports::ReviewSource;
use crate::utils::error::Result;

pub const PIZZA_KEYWORDS: &[&str] = &["pizza", "pie", "pizzeria", "slice"];

// " gin " keeps its padding so words like "original" don't match. It also
// misses "gin" at the start or end of a snippet or next to punctuation.
pub const ALCOHOL_KEYWORDS: &[&str] = &[
    "liquor", "whisky", "cocktail", "wine", "alcohol", " gin ", "tequila", "scotch", "bourbon",
];

/// Which vocabularies a single usable review mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewClassification {
    pub mentions_pizza: bool,
    pub mentions_alcohol: bool,
}

fn mentions_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Classifies a snippet, or returns `None` when it is too short to count.
pub fn classify(snippet: &str) -> Option<ReviewClassification> {
    if snippet.chars().count() <= 1 {
        return None;
    }
    let lowered = snippet.to_lowercase();
    Some(ReviewClassification {
        mentions_pizza: mentions_any(&lowered, PIZZA_KEYWORDS),
        mentions_alcohol: mentions_any(&lowered, ALCOHOL_KEYWORDS),
    })
}

/// Counts usable reviews and keyword mentions. Records without a string
/// snippet are skipped.
pub fn tally(reviews: &[RawReview]) -> AuditResult {
    let mut result = AuditResult::default();
    let mut skipped = 0usize;

    for review in reviews {
        let Some(snippet) = review.snippet() else {
            skipped += 1;
            continue;
        };
        if let Some(classification) = classify(snippet) {
            result.usable_reviews += 1;
            if classification.mentions_pizza {
                result.pizza_mentions += 1;
            }
            if classification.mentions_alcohol {
                result.alcohol_mentions += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} reviews without a text snippet", skipped);
    }

    result
}

pub struct ReviewAuditor<S: ReviewSource> {
    fetcher: ReviewFetcher<S>,
}

impl<S: ReviewSource> ReviewAuditor<S> {
    pub fn new(fetcher: ReviewFetcher<S>) -> Self {
        Self { fetcher }
    }

    /// Fetches up to `max_reviews` reviews and classifies them.
    pub async fn audit(&self, place_id: Option<&PlaceId>, max_reviews: usize) -> Result<AuditOutcome> {
        let reviews = match self.fetcher.fetch(place_id, max_reviews).await? {
            FetchOutcome::NoPlaceId => return Ok(AuditOutcome::NoPlaceId),
            FetchOutcome::Reviews(reviews) => reviews,
        };

        let result = tally(&reviews);
        tracing::info!(
            "🔎 Audited {} reviews: {} usable, {} mention pizza, {} mention alcohol",
            reviews.len(),
            result.usable_reviews,
            result.pizza_mentions,
            result.alcohol_mentions
        );

        Ok(AuditOutcome::Completed(result))
    }
}
