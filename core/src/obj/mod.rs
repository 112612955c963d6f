//! Wavefront OBJ loader.
//!
//! Decodes the geometry subset of OBJ text into CPU-side buffers:
//!
//! - `v x y z` positions, `vt u v` texture coordinates, `vn x y z` normals
//! - `f` faces with `p`, `p/t`, `p//n` or `p/t/n` corners, fan-triangulated
//!
//! Everything else (`o`, `g`, `s`, `usemtl`, `mtllib`, ...) is skipped.
//! Comments run from `#` to the end of the line.
//!
//! Parsing never fails. Malformed records are reported through the `log`
//! crate under the `wfobj` target and the loader continues with the next
//! token, so the returned [`ObjMesh`] may be partial.
//!
//! # Example
//!
//! ```
//! use wfobj_core::obj::{IndexPolicy, ParseOptions, parse_obj_with_options};
//!
//! let source = b"\
//! v 0 0 0
//! v 1 0 0
//! v 1 1 0
//! v 0 1 0
//! f 1 2 3 4
//! ";
//! let options = ParseOptions::new().with_index_policy(IndexPolicy::Clamp);
//! let mesh = parse_obj_with_options(source, &options);
//! assert_eq!(mesh.triangle_count(), 2);
//! ```

mod mesh;
mod options;
mod parser;
pub mod scanner;

pub use mesh::{
    CORNER_INDICES, Corner, NORMAL_COMPONENTS, ObjMesh, POSITION_COMPONENTS, TEXCOORD_COMPONENTS,
    TRIANGLE_INDICES,
};
pub use options::{FloatPrecision, IndexPolicy, OptionsError, ParseOptions};
pub use parser::{
    DirectiveCounts, LOG_TARGET, parse_obj, parse_obj_str, parse_obj_with_options,
    translate_index,
};

#[cfg(test)]
mod tests;
