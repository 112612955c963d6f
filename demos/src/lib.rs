//! # wfobj demos
//!
//! Command line tools built on `wfobj-core`.
//!
//! ## Available Tools
//!
//! - `obj_info` - Load OBJ files and report their attribute and triangle counts

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
