//! Common utilities for the Folio converter.
//!
//! This crate provides shared infrastructure used by the parser, the
//! renderer, and the command-line front end:
//! - **Warning System** - colored, deduplicated terminal output for
//!   constructs a component chose to skip

/// Deduplicated warnings on stderr.
pub mod warning;
