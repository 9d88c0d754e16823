use super::types::{resolve_retailer, Candidate, CandidateSearch, SearchError, MAX_SEARCH_RESULTS};

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200.png?text=Product";

/// Deterministic stand-in for a real retailer integration. Prices climb and
/// ratings fall with the result index so approval flows have something
/// meaningful to rank against.
pub struct StubSearch;

impl StubSearch {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StubSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSearch for StubSearch {
    fn search(
        &self,
        query: &str,
        retailer: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Candidate>, SearchError> {
        let retailer = resolve_retailer(retailer)?;
        let count = limit.clamp(0, MAX_SEARCH_RESULTS) as usize;

        let mut items = Vec::with_capacity(count);
        for idx in 0..count {
            items.push(Candidate {
                retailer: retailer.clone(),
                title: format!("{} - Option {}", query, idx + 1),
                price: round2(19.99 + idx as f64 * 5.25),
                rating: round2((4.2 - idx as f64 * 0.1).clamp(0.0, 5.0)),
                url: format!("https://{}.example.com/product/{}", retailer, idx + 1),
                image: PLACEHOLDER_IMAGE.to_string(),
            });
        }
        Ok(items)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_length_matches_clamped_limit() {
        let stub = StubSearch::new();
        for limit in 0..=8 {
            let items = stub.search("mouse", None, limit).unwrap();
            assert_eq!(items.len(), limit as usize);
        }
    }

    #[test]
    fn oversized_and_negative_limits_are_clamped() {
        let stub = StubSearch::new();
        assert_eq!(stub.search("mouse", None, 50).unwrap().len(), 8);
        assert_eq!(stub.search("mouse", None, -3).unwrap().len(), 0);
    }

    #[test]
    fn unsupported_retailer_fails() {
        let stub = StubSearch::new();
        let err = stub.search("mouse", Some("ebay"), 5).unwrap_err();
        assert!(matches!(err, SearchError::UnsupportedRetailer(_)));
    }

    #[test]
    fn results_are_deterministic_and_ordered() {
        let stub = StubSearch::new();
        let first = stub.search("wireless mouse", Some("walmart"), 5).unwrap();
        let second = stub.search("wireless mouse", Some("walmart"), 5).unwrap();
        assert_eq!(first, second);

        assert_eq!(first[0].title, "wireless mouse - Option 1");
        assert_eq!(first[0].price, 19.99);
        assert_eq!(first[0].rating, 4.2);
        assert_eq!(first[4].price, 40.99);
        assert_eq!(first[4].rating, 3.8);
        assert_eq!(first[2].url, "https://walmart.example.com/product/3");
        assert!(first.iter().all(|item| item.retailer == "walmart"));
    }

    #[test]
    fn ratings_stay_within_bounds() {
        let stub = StubSearch::new();
        let items = stub.search("mouse", None, 8).unwrap();
        assert!(items
            .iter()
            .all(|item| (0.0..=5.0).contains(&item.rating) && item.price >= 0.0));
    }
}
