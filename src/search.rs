//! Search orchestration rules that do not need a browser.
//!
//! Query validation, generation tickets for discarding stale responses, and
//! the mapping from a backend result to what the page shows.

use serde_json::Value;

use crate::error::{NO_ROUTES_MESSAGE, Result, SearchError};

/// Trim the raw input; a blank query is rejected before any request.
pub fn validate_query(input: &str) -> Result<String> {
	let query = input.trim();
	if query.is_empty() {
		return Err(SearchError::EmptyQuery);
	}
	Ok(query.to_string())
}

/// Identifies one submitted search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Hands out tickets and remembers the latest one.
///
/// A response is applied only if its ticket is still the latest, so an answer
/// that arrives after a newer search started is dropped.
#[derive(Clone, Debug, Default)]
pub struct SearchSession {
	latest: u64,
}

impl SearchSession {
	/// Start a new search, superseding any in flight.
	pub fn begin(&mut self) -> SearchTicket {
		self.latest += 1;
		SearchTicket(self.latest)
	}

	/// Whether `ticket` belongs to the most recent search.
	pub fn is_current(&self, ticket: SearchTicket) -> bool {
		ticket.0 == self.latest
	}
}

/// Take a ticket for `input`, then validate it.
///
/// The ticket is taken even for a blank query, so a request still in flight
/// can no longer overwrite the validation message.
pub fn start_search(session: &mut SearchSession, input: &str) -> (SearchTicket, Result<String>) {
	let ticket = session.begin();
	(ticket, validate_query(input))
}

/// What the page shows after a search settles.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
	/// At least one route: draw the journey.
	Routes(Vec<Value>),
	/// A successful answer with nothing in it.
	NothingFound,
	/// The request failed.
	Failed(SearchError),
}

impl SearchOutcome {
	/// Classify a backend result.
	pub fn from_result(result: Result<Vec<Value>>) -> Self {
		match result {
			Ok(routes) if routes.is_empty() => SearchOutcome::NothingFound,
			Ok(routes) => SearchOutcome::Routes(routes),
			Err(err) => SearchOutcome::Failed(err),
		}
	}

	/// Routes to draw; empty unless the search found something.
	pub fn routes(&self) -> Vec<Value> {
		match self {
			SearchOutcome::Routes(routes) => routes.clone(),
			SearchOutcome::NothingFound | SearchOutcome::Failed(_) => Vec::new(),
		}
	}

	/// Message for the alert line, if any.
	pub fn message(&self) -> Option<&'static str> {
		match self {
			SearchOutcome::Routes(_) => None,
			SearchOutcome::NothingFound => Some(NO_ROUTES_MESSAGE),
			SearchOutcome::Failed(err) => Some(err.user_message()),
		}
	}
}
