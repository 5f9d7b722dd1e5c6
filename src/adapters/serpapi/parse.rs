//! Typed accessors over SerpApi JSON payloads.
//!
//! Every lookup answers "present or absent"; a missing or oddly shaped
//! field never becomes a placeholder string.

use crate::domain::model::{BusinessProfile, PageToken, PlaceId, RawReview, ReviewPage};
use serde_json::Value;

fn string_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
}

fn owned_string_at(value: &Value, path: &[&str]) -> Option<String> {
    string_at(value, path).map(str::to_string)
}

/// Reads one `google_maps_reviews` response.
pub fn parse_review_page(body: &Value) -> ReviewPage {
    let reviews = body
        .get("reviews")
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(RawReview::new).collect())
        .unwrap_or_default();

    let next_page_token = string_at(body, &["serpapi_pagination", "next_page_token"])
        .and_then(PageToken::parse);

    ReviewPage {
        reviews,
        next_page_token,
    }
}

/// Reads the knowledge graph of one `google` search response.
pub fn parse_business_profile(body: &Value) -> BusinessProfile {
    let graph = |key: &str| owned_string_at(body, &["knowledge_graph", key]);

    let reservation_provider = body
        .pointer("/knowledge_graph/reservation_providers/0/name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let email_hints = body
        .get("organic_results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .take(2)
                .filter_map(|result| result.get("snippet_highlighted_words"))
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    BusinessProfile {
        search_id: owned_string_at(body, &["search_metadata", "id"]),
        place_id: graph("place_id").and_then(PlaceId::parse),
        title: graph("title"),
        address: graph("address"),
        search_link: graph("knowledge_graph_search_link"),
        price: graph("price"),
        classification: graph("type"),
        reservation_provider,
        email_hints,
    }
}

/// Error message SerpApi embeds in a body, if any.
pub fn api_error_message(body: &Value) -> Option<&str> {
    body.get("error").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_review_page_with_pagination() {
        let body = json!({
            "reviews": [
                {"snippet": "Solid slice", "rating": 5},
                {"rating": 3}
            ],
            "serpapi_pagination": {
                "next": "https://serpapi.com/search.json?...",
                "next_page_token": "CAESY0NBRVFDaG"
            }
        });

        let page = parse_review_page(&body);

        assert_eq!(page.reviews.len(), 2);
        assert_eq!(page.reviews[0].snippet(), Some("Solid slice"));
        assert_eq!(page.reviews[1].snippet(), None);
        assert_eq!(page.next_page_token.unwrap().as_str(), "CAESY0NBRVFDaG");
    }

    #[test]
    fn test_review_page_without_reviews_field() {
        let body = json!({
            "search_metadata": {"status": "Success"},
            "serpapi_pagination": {"next_page_token": "more"}
        });

        let page = parse_review_page(&body);

        assert!(page.reviews.is_empty());
        assert!(page.next_page_token.is_some());
    }

    #[test]
    fn test_review_page_end_of_results() {
        let page = parse_review_page(&json!({"reviews": [], "serpapi_pagination": {}}));
        assert!(page.next_page_token.is_none());

        let page = parse_review_page(&json!({"reviews": "unexpected"}));
        assert!(page.reviews.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_business_profile_full() {
        let body = json!({
            "search_metadata": {"id": "66f1c0ffee"},
            "knowledge_graph": {
                "title": "Joe's Pizza",
                "type": "Pizza restaurant",
                "place_id": "ChIJ8Q2WSpJZwokRQz-bYYgEskM",
                "address": "7 Carmine St, New York, NY 10014",
                "price": "$",
                "knowledge_graph_search_link": "https://www.google.com/search?kgmid=/g/1tf",
                "reservation_providers": [{"name": "OpenTable"}, {"name": "Resy"}]
            },
            "organic_results": [
                {"snippet_highlighted_words": ["info@joespizza.example"]},
                {"snippet_highlighted_words": ["Joe's", "orders@joespizza.example"]},
                {"snippet_highlighted_words": ["ignored@third.example"]}
            ]
        });

        let profile = parse_business_profile(&body);

        assert_eq!(profile.search_id.as_deref(), Some("66f1c0ffee"));
        assert_eq!(profile.title.as_deref(), Some("Joe's Pizza"));
        assert_eq!(profile.classification.as_deref(), Some("Pizza restaurant"));
        assert_eq!(
            profile.place_id.map(|id| id.to_string()).as_deref(),
            Some("ChIJ8Q2WSpJZwokRQz-bYYgEskM")
        );
        assert_eq!(profile.reservation_provider.as_deref(), Some("OpenTable"));
        assert_eq!(
            profile.email_hints,
            vec!["info@joespizza.example", "Joe's", "orders@joespizza.example"]
        );
    }

    #[test]
    fn test_business_profile_without_knowledge_graph() {
        let body = json!({
            "search_metadata": {"id": "abc"},
            "organic_results": [{"title": "no highlights here"}]
        });

        let profile = parse_business_profile(&body);

        assert_eq!(profile.search_id.as_deref(), Some("abc"));
        assert!(profile.place_id.is_none());
        assert!(profile.title.is_none());
        assert!(profile.reservation_provider.is_none());
        assert!(profile.email_hints.is_empty());
    }

    #[test]
    fn test_wrongly_typed_fields_are_absent() {
        let body = json!({
            "knowledge_graph": {"place_id": 12345, "price": ["$", "$$"], "reservation_providers": []}
        });

        let profile = parse_business_profile(&body);

        assert!(profile.place_id.is_none());
        assert!(profile.price.is_none());
        assert!(profile.reservation_provider.is_none());
    }
}
