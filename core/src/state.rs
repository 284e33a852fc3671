//! View state for the catalog: the displayed entries plus load/error status.
//!
//! # Design
//! Every list request is tagged when it is dispatched. `begin_refresh` hands
//! out a `RefreshTicket` with a strictly increasing sequence number, and
//! `apply_refresh` accepts a result only for the most recently issued ticket.
//! Responses to superseded requests are dropped whichever order they arrive
//! in, so `Loading` lasts until the newest request resolves.
//!
//! Once `close` has been called the state is frozen. Late responses and
//! failures still have somewhere to go, they just change nothing.

use tracing::debug;

use crate::error::ApiError;
use crate::types::Entry;

pub const LOAD_ACTION: &str = "load entries";

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading,
    Ready,
    Error { message: String },
}

/// Proof that a list request was dispatched. Only the newest one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    entries: Vec<Entry>,
    status: Status,
    latest: u64,
    closed: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Mount state: nothing shown yet, initial fetch pending.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            status: Status::Loading,
            latest: 0,
            closed: false,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            Status::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest += 1;
        if !self.closed {
            self.status = Status::Loading;
        }
        RefreshTicket(self.latest)
    }

    /// Apply the outcome of the list request identified by `ticket`.
    ///
    /// Returns `false` when the result was discarded: a newer request has been
    /// dispatched since, or the state is closed.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, result: Result<Vec<Entry>, ApiError>) -> bool {
        if self.closed {
            debug!(seq = ticket.0, "view state closed, dropping list response");
            return false;
        }
        if ticket.0 != self.latest {
            debug!(seq = ticket.0, latest = self.latest, "dropping superseded list response");
            return false;
        }
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.status = Status::Ready;
            }
            Err(err) => {
                self.status = Status::Error {
                    message: err.user_message(LOAD_ACTION),
                };
            }
        }
        true
    }

    /// Surface a failure from a mutation. Entries are left as they are.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.closed {
            return false;
        }
        self.status = Status::Error {
            message: message.into(),
        };
        true
    }

    /// Teardown. Every later mutation is a no-op.
    pub fn close(&mut self) {
        self.closed = true;
    }
}
