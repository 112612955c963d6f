//! # wfobj core
//!
//! Allocation-conscious Wavefront OBJ ingestion.
//!
//! - [`buffer`] - growable typed buffers used for all output and scratch data
//! - [`decimal`] - decimal text to binary float/integer conversion
//! - [`obj`] - the OBJ scanner and the two-pass mesh loader
//! - [`profiling`] - optional Tracy instrumentation
//!
//! Reading files, uploading to the GPU and interleaving vertex layouts are
//! left to the caller: the loader takes a byte slice and returns an
//! [`ObjMesh`].

pub mod buffer;
pub mod decimal;
pub mod obj;
pub mod profiling;

pub use buffer::{BufferF32, BufferS32, BufferU32, GrowBuffer};
pub use obj::{ObjMesh, ParseOptions, parse_obj, parse_obj_with_options};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
