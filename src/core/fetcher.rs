use crate::domain::model::{FetchOutcome, PlaceId, ReviewPageRequest, SortOrder};
use crate::domain::ports::ReviewSource;
use crate::utils::error::Result;

/// Per-request settings forwarded to the review source.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub locale: String,
    pub sort_order: SortOrder,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Walks the review pages of one place until enough reviews are collected
/// or the source stops handing out continuation tokens.
pub struct ReviewFetcher<S: ReviewSource> {
    source: S,
    options: FetchOptions,
}

impl<S: ReviewSource> ReviewFetcher<S> {
    pub fn new(source: S, options: FetchOptions) -> Self {
        Self { source, options }
    }

    /// Fetches at most `max_reviews` reviews for `place_id`.
    ///
    /// Pages are requested one at a time. A transport failure on any page
    /// aborts the whole fetch and discards what was already collected.
    pub async fn fetch(&self, place_id: Option<&PlaceId>, max_reviews: usize) -> Result<FetchOutcome> {
        let Some(place_id) = place_id else {
            tracing::warn!("⚠️ No place id provided, skipping review fetch");
            return Ok(FetchOutcome::NoPlaceId);
        };

        let mut reviews = Vec::new();
        let mut continuation_token = None;
        let mut pages = 0usize;

        while reviews.len() < max_reviews {
            let request = ReviewPageRequest {
                place_id: place_id.clone(),
                continuation_token: continuation_token.take(),
                sort_order: self.options.sort_order,
                locale: self.options.locale.clone(),
            };

            let page = self.source.fetch_page(&request).await?;
            pages += 1;

            tracing::debug!(
                "Page {} for {}: {} reviews, more pages: {}",
                pages,
                place_id,
                page.reviews.len(),
                page.next_page_token.is_some()
            );

            reviews.extend(page.reviews);

            match page.next_page_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        // 頁面是整頁回傳的，最後一頁可能超過上限
        reviews.truncate(max_reviews);

        tracing::info!(
            "📥 Fetched {} reviews for {} in {} page request(s)",
            reviews.len(),
            place_id,
            pages
        );

        Ok(FetchOutcome::Reviews(reviews))
    }
}
