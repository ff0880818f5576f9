//! The boundary between us and the hosted database. Everything that talks to the network lives behind
//! the `TimetableStore` trait so the resolver and session can be exercised without one.

use crate::schema::{Day, Department, Staff, TimetableEntry};
use std::fmt;

/// The PostgREST client.
mod postgrest;
pub use postgrest::PostgrestStore;

/// An in-memory store used by tests.
#[cfg(test)]
pub(crate) mod memory;

/// A local http server with a fixed response, for exercising the PostgREST client.
#[cfg(test)]
pub(crate) mod canned;

/// Which column a timetable query is keyed on, and the id to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
  /// Matches `staff_id`.
  Staff(String),
  /// Matches `department_id`.
  Department(String),
}

impl Identity {
  /// The column this identity filters on.
  pub fn column(&self) -> &'static str {
    match self {
      Identity::Staff(_) => "staff_id",
      Identity::Department(_) => "department_id",
    }
  }

  /// The id being matched.
  pub fn value(&self) -> &str {
    match self {
      Identity::Staff(id) | Identity::Department(id) => id.as_str(),
    }
  }
}

/// The equality filters of a single timetable query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFilter {
  /// Always applied.
  pub identity: Identity,
  /// Always applied.
  pub day: Day,
  /// Only applied when present.
  pub period: Option<u8>,
}

/// How many rows a query is allowed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  /// Any amount of rows, including none.
  Many,
  /// At most one row; more than that is an error.
  One,
}

/// The ways a store request can fail.
#[derive(Debug)]
pub enum StoreError {
  /// The request could not be built, sent, or its body read.
  Transport(anyhow::Error),
  /// The store answered with a non-success status.
  Status(u16, String),
  /// The response body was not what we expected.
  Decode(String),
  /// A single row was requested but the filter matched more than one.
  Cardinality(String),
}

impl fmt::Display for StoreError {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    match self {
      StoreError::Transport(error) => write!(formatter, "store request failed - {error:#}"),
      StoreError::Status(status, body) => write!(formatter, "store responded with '{status}' - '{body}'"),
      StoreError::Decode(error) => write!(formatter, "unable to decode store response - {error}"),
      StoreError::Cardinality(details) => write!(formatter, "expected a single row - {details}"),
    }
  }
}

impl std::error::Error for StoreError {}

impl From<anyhow::Error> for StoreError {
  fn from(error: anyhow::Error) -> Self {
    StoreError::Transport(error)
  }
}

/// The result type of every store call.
pub type StoreResult<T> = Result<T, StoreError>;

/// The read-only view of the hosted database this application needs.
#[allow(async_fn_in_trait)]
pub trait TimetableStore {
  /// Every department, in the order the store returns them.
  async fn departments(&self) -> StoreResult<Vec<Department>>;

  /// Every staff member, in the order the store returns them.
  async fn staff(&self) -> StoreResult<Vec<Staff>>;

  /// The timetable entries matching `filter`, with their joined names.
  async fn entries(&self, filter: &EntryFilter, cardinality: Cardinality) -> StoreResult<Vec<TimetableEntry>>;
}
