#![deny(unsafe_code)]

//! Lookups against a university timetable kept in a hosted database. The interesting part is the
//! `resolver`; the rest loads reference data, holds session state, and presents results.

/// Configuration shared by the binaries.
pub mod config;

/// The row shapes read from the store.
pub mod schema;

/// The hosted database boundary.
pub mod store;

/// The departments + staff lists loaded once per session.
pub mod reference;

/// Turns a selection into a query, and the query's rows into an outcome.
pub mod resolver;

/// Session scoped state: selection, loading flag, last result.
pub mod session;

/// Text output for the command line.
pub mod rendering;

/// The json web api.
pub mod api;
