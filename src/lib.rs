//! regatta: command-line client for the Docker Registry HTTP API V2.
//!
//! The protocol client lives in the `regatta-registry` member crate; this
//! crate is the thin front-end that maps a closed set of CLI commands onto
//! client operations and renders their results as printable lines.

pub mod commands;
