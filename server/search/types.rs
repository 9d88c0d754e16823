use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retailers the backend knows how to search. The first entry is the
/// default when a bot or request does not name one.
pub const SUPPORTED_RETAILERS: [&str; 5] = ["amazon", "walmart", "bestbuy", "target", "shopify"];

/// Hard cap on candidates per search, whatever the caller asks for.
pub const MAX_SEARCH_RESULTS: i64 = 8;

/// One product option surfaced for a task. Candidates are never persisted
/// on their own; they live inside a task's candidate list and are referred
/// to by position in that list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub retailer: String,
    pub title: String,
    pub price: f64,
    pub rating: f64,
    pub url: String,
    pub image: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unsupported retailer: {0}")]
    UnsupportedRetailer(String),
    #[error("retailer upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("retailer rate limit exceeded")]
    RateLimited,
}

/// Candidate generation seam. The stub implementation is pure; a real
/// retailer integration behind this trait performs outbound I/O and must
/// stay safe to retry.
pub trait CandidateSearch: Send + Sync {
    fn search(
        &self,
        query: &str,
        retailer: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Candidate>, SearchError>;
}

/// Lowercases and validates a retailer name, falling back to the default
/// retailer when none is given.
pub fn resolve_retailer(retailer: Option<&str>) -> Result<String, SearchError> {
    let name = retailer.unwrap_or(SUPPORTED_RETAILERS[0]).to_lowercase();
    if SUPPORTED_RETAILERS.iter().any(|supported| *supported == name) {
        Ok(name)
    } else {
        Err(SearchError::UnsupportedRetailer(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults_to_first_retailer() {
        assert_eq!(resolve_retailer(None).unwrap(), "amazon");
    }

    #[test]
    fn resolve_is_case_insensitive() {
        assert_eq!(resolve_retailer(Some("BestBuy")).unwrap(), "bestbuy");
    }

    #[test]
    fn resolve_rejects_unknown_retailer() {
        let err = resolve_retailer(Some("ebay")).unwrap_err();
        assert!(matches!(err, SearchError::UnsupportedRetailer(name) if name == "ebay"));
    }
}
