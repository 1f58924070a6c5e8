//! Error type for the search path.

use thiserror::Error;

/// Shown when the query is blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Enter the service or flow to search.";
/// Shown for every transport, status, timeout or decoding failure.
pub const SEARCH_FAILED_MESSAGE: &str = "Route search failed. Check your connection.";
/// Shown when the backend answers with zero routes.
pub const NO_ROUTES_MESSAGE: &str = "No parent routes or transactions found.";

/// Everything that can go wrong between the search box and the graph.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SearchError {
	/// The query was empty after trimming; nothing was sent.
	#[error("search query is empty")]
	EmptyQuery,

	/// The request could not be built or sent.
	#[error("transport error: {0}")]
	Transport(String),

	/// The backend answered with a non-2xx status.
	#[error("backend responded with HTTP {0}")]
	Status(u16),

	/// No answer within the configured budget.
	#[error("request timed out after {0} ms")]
	Timeout(u32),

	/// The body was not readable JSON.
	#[error("could not decode response: {0}")]
	Decode(String),
}

impl SearchError {
	/// The message the user sees. Network-class failures all share one text so
	/// no backend detail reaches the page.
	pub fn user_message(&self) -> &'static str {
		match self {
			SearchError::EmptyQuery => EMPTY_QUERY_MESSAGE,
			SearchError::Transport(_)
			| SearchError::Status(_)
			| SearchError::Timeout(_)
			| SearchError::Decode(_) => SEARCH_FAILED_MESSAGE,
		}
	}
}

/// Convenience alias for search results.
pub type Result<T> = std::result::Result<T, SearchError>;
