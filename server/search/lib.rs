pub mod stub;
pub mod types;

pub use stub::StubSearch;
pub use types::{Candidate, CandidateSearch, SearchError, MAX_SEARCH_RESULTS, SUPPORTED_RETAILERS};
