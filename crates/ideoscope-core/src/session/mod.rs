//! Search interaction state machine.
//!
//! A search session moves `Idle -> Searching -> Highlighting -> Ranked`
//! and back. The session is a pure value: it owns no timers and performs
//! no I/O. The driver runs the engine, sleeps [`highlight_hold`], and
//! reports completions back; every async completion carries the
//! [`Generation`] it was issued under, and completions from a superseded
//! generation are dropped silently.
//!
//! [`highlight_hold`]: SearchSession::highlight_hold

use std::collections::HashSet;
use std::time::Duration;

use tracing::{info, trace};

use crate::config;
use crate::search::{SearchError, SearchResult};

/// Where the session is in the search interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No search in flight or displayed.
    #[default]
    Idle,
    /// A query was submitted; awaiting the engine.
    Searching,
    /// Results arrived; matches are emphasized in the spatial view.
    Highlighting,
    /// The highlight hold elapsed; the ranked list is displayed.
    Ranked,
}

/// Monotonic token identifying one submitted search.
///
/// Compared for equality only; a completion whose generation does not match
/// the session's current one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Outcome of delivering an event to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// The event mutated the session.
    Applied,
    /// The event belonged to a superseded search and was dropped.
    Stale,
}

/// The client-side search session.
#[derive(Debug, Default)]
pub struct SearchSession {
    phase: SearchPhase,
    generation: u64,
    query: String,
    results: Vec<SearchResult>,
    highlight: HashSet<String>,
    message: Option<String>,
}

impl SearchSession {
    /// Creates a session in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// The generation of the most recent submission.
    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    /// The submitted query text, empty when idle.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results of the current search; empty outside
    /// `Highlighting`/`Ranked`.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Keys emphasized in the spatial view during `Highlighting`/`Ranked`.
    pub fn highlight(&self) -> &HashSet<String> {
        &self.highlight
    }

    /// Status message for the user (failure or no-result notice), if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// How long the driver should hold `Highlighting` before reporting
    /// [`highlight_elapsed`](Self::highlight_elapsed).
    pub fn highlight_hold(&self) -> Duration {
        Duration::from_millis(config::HIGHLIGHT_HOLD_MS)
    }

    /// Submits a new search, superseding any search in flight.
    ///
    /// Always applies, from any phase. Returns the generation the driver
    /// must attach to this search's completions.
    pub fn submit(&mut self, query: &str) -> Generation {
        self.generation += 1;
        self.phase = SearchPhase::Searching;
        self.query = query.to_string();
        self.results.clear();
        self.highlight.clear();
        self.message = None;
        info!(generation = self.generation, "Search submitted");
        Generation(self.generation)
    }

    /// Delivers the engine's completion for the search issued as `issued`.
    ///
    /// Applies only while that search is still current *and* awaited: a
    /// completion from a superseded generation, or a duplicate delivery
    /// after the session already left `Searching`, is dropped without
    /// mutating anything. A live completion moves the session to
    /// `Highlighting` on results, or back to `Idle` with a message on
    /// failure or an empty result set.
    pub fn apply_outcome(
        &mut self,
        issued: Generation,
        outcome: Result<Vec<SearchResult>, SearchError>,
    ) -> Ack {
        if issued.0 != self.generation || self.phase != SearchPhase::Searching {
            trace!(
                issued = issued.0,
                current = self.generation,
                phase = ?self.phase,
                "Dropping stale search completion"
            );
            return Ack::Stale;
        }

        match outcome {
            Ok(results) if results.is_empty() => {
                self.phase = SearchPhase::Idle;
                self.message = Some(format!("No results for \"{}\"", self.query));
            }
            Ok(results) => {
                self.highlight = results.iter().map(|r| r.key.clone()).collect();
                self.results = results;
                self.phase = SearchPhase::Highlighting;
            }
            Err(err) => {
                self.phase = SearchPhase::Idle;
                self.message = Some(err.to_string());
            }
        }
        Ack::Applied
    }

    /// Reports that the highlight hold elapsed for the search issued as
    /// `issued`.
    ///
    /// Applies only when that search is still current *and* the session is
    /// still highlighting; a hold that fires after `clear()` or after a
    /// newer submission is stale.
    pub fn highlight_elapsed(&mut self, issued: Generation) -> Ack {
        if issued.0 != self.generation || self.phase() != SearchPhase::Highlighting {
            return Ack::Stale;
        }
        self.phase = SearchPhase::Ranked;
        Ack::Applied
    }

    /// Clears the session back to idle.
    ///
    /// Bumps the generation so completions from the cleared search can
    /// never apply afterwards.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.phase = SearchPhase::Idle;
        self.query.clear();
        self.results.clear();
        self.highlight.clear();
        self.message = None;
    }
}
