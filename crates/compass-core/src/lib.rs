//! # compass-core
//!
//! Core types shared by the Compass client crates:
//! - Normalized entity records (locations, staff, calendar events, ...)
//! - The error taxonomy ([`CompassError`], [`ErrorKind`])
//! - Lenient decoding helpers for the portal's loosely typed JSON

pub mod decode;
pub mod entities;
pub mod errors;

pub use errors::{CompassError, ErrorKind, Result};
