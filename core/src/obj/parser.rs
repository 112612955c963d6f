//! Two-pass OBJ assembly.
//!
//! The loader scans the source twice from offset zero:
//!
//! 1. **Sizing pass** ([`DirectiveCounts::count`]) tallies line-leading `v`,
//!    `vt`, `vn` and `f` directives so every output buffer can be allocated
//!    once, at its final size.
//! 2. **Fill pass** decodes the records, translates face indices and
//!    fan-triangulates polygons into the pre-sized buffers.
//!
//! Both passes consume the same filtered token stream and act only on the
//! first token of each line, so the counts of pass one always describe the
//! records seen by pass two.
//!
//! Malformed input never aborts the parse. Each problem is reported through
//! the `log` facade (target `wfobj`) and the loader substitutes a default or
//! skips the offending token.

use log::{debug, trace, warn};

use crate::buffer::{BufferF32, BufferU32};
use crate::decimal::{parse_decimal_f32, parse_decimal_f64, parse_decimal_u32};
use crate::{profile_function, profile_plot, profile_scope};

use super::mesh::{
    CORNER_INDICES, NORMAL_COMPONENTS, ObjMesh, POSITION_COMPONENTS, TEXCOORD_COMPONENTS,
};
use super::options::{FloatPrecision, IndexPolicy, ParseOptions};
use super::scanner::{Scanner, Token, TokenKind};

/// Log target for loader diagnostics.
pub const LOG_TARGET: &str = "wfobj";

/// Index slots reserved per face line: six corners, enough for the two
/// triangles of a quad.
const TRIANGLE_SLOTS_PER_FACE: usize = 6 * CORNER_INDICES;

/// Corners the face scratch buffer holds before it first grows.
const SCRATCH_CORNERS: usize = 4;

/// Vertex attribute addressed by a directive or a face component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Position,
    Texcoord,
    Normal,
}

impl Attribute {
    fn components(self) -> usize {
        match self {
            Self::Position => POSITION_COMPONENTS,
            Self::Texcoord => TEXCOORD_COMPONENTS,
            Self::Normal => NORMAL_COMPONENTS,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Texcoord => "texcoord",
            Self::Normal => "normal",
        }
    }
}

/// Log a diagnostic anchored at `token`.
fn report(token: &Token<'_>, message: &str) {
    let context = match token.kind {
        TokenKind::Eof => "eof".into(),
        TokenKind::NewLine => "\\n".into(),
        _ => token.lossy_text(),
    };
    warn!(
        target: LOG_TARGET,
        "[line: {}] [context: '{}']: {}",
        token.line + 1,
        context,
        message
    );
}

/// Translate an OBJ face index to a zero-based index.
///
/// Positive values are one-based. Zero and negative values count back from
/// `defined`, the number of attributes defined so far, so `-1` is the most
/// recent one. The result may be negative for malformed input.
///
/// ```
/// use wfobj_core::obj::translate_index;
///
/// assert_eq!(translate_index(-1, 5), 4);
/// assert_eq!(translate_index(2, 5), 1);
/// ```
pub fn translate_index(value: i64, defined: usize) -> i64 {
    if value > 0 {
        value - 1
    } else {
        defined as i64 + value
    }
}

/// Scanner wrapper that drops comments and recovers from scan errors.
struct TokenStream<'a> {
    scanner: Scanner<'a>,
    token: Token<'a>,
    report_errors: bool,
}

impl<'a> TokenStream<'a> {
    fn new(source: &'a [u8], report_errors: bool) -> Self {
        let mut scanner = Scanner::new(source);
        let token = Self::pull(&mut scanner, report_errors);
        Self {
            scanner,
            token,
            report_errors,
        }
    }

    /// Request tokens until one the parser can act on arrives.
    fn pull(scanner: &mut Scanner<'a>, report_errors: bool) -> Token<'a> {
        loop {
            let token = scanner.next_token();
            match token.kind {
                TokenKind::Comment => continue,
                TokenKind::Error => {
                    if report_errors {
                        report(&token, "unknown character");
                    }
                }
                _ => return token,
            }
        }
    }

    #[inline]
    fn token(&self) -> Token<'a> {
        self.token
    }

    #[inline]
    fn kind(&self) -> TokenKind {
        self.token.kind
    }

    #[inline]
    fn at_line_end(&self) -> bool {
        self.token.kind.is_line_end()
    }

    fn advance(&mut self) {
        if self.token.kind != TokenKind::Eof {
            self.token = Self::pull(&mut self.scanner, self.report_errors);
        }
    }

    /// Step over a token that could not be used, never past the line end.
    fn skip_token(&mut self) {
        if !self.at_line_end() {
            self.advance();
        }
    }

    /// Discard the rest of the current line without diagnostics.
    fn skip_line(&mut self) {
        while !self.token.kind.is_line_end() {
            self.token = self.scanner.next_token();
        }
    }
}

/// Number of line-leading directives of each supported kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectiveCounts {
    /// `v` lines.
    pub positions: usize,
    /// `vt` lines.
    pub texcoords: usize,
    /// `vn` lines.
    pub normals: usize,
    /// `f` lines.
    pub faces: usize,
}

impl DirectiveCounts {
    /// Run the sizing pass over `source`.
    pub fn count(source: &[u8]) -> Self {
        profile_scope!("obj_sizing_pass");

        let mut counts = Self::default();
        let mut stream = TokenStream::new(source, false);
        while stream.kind() != TokenKind::Eof {
            match stream.kind() {
                TokenKind::NewLine => {
                    stream.advance();
                    continue;
                }
                TokenKind::Position => counts.positions += 1,
                TokenKind::Texcoord => counts.texcoords += 1,
                TokenKind::Normal => counts.normals += 1,
                TokenKind::Face => counts.faces += 1,
                _ => {}
            }
            stream.skip_line();
        }
        counts
    }

    fn of(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Position => self.positions,
            Attribute::Texcoord => self.texcoords,
            Attribute::Normal => self.normals,
        }
    }

    /// Allocate an empty mesh with exactly the capacity these counts need.
    ///
    /// The triangle buffer is sized for one quad per face line; larger
    /// polygons grow it during the fill pass.
    pub fn presized_mesh(&self) -> ObjMesh {
        let mut mesh = ObjMesh::default();
        mesh.positions.resize(self.positions * POSITION_COMPONENTS);
        mesh.texcoords.resize(self.texcoords * TEXCOORD_COMPONENTS);
        mesh.normals.resize(self.normals * NORMAL_COMPONENTS);
        mesh.triangles.resize(self.faces * TRIANGLE_SLOTS_PER_FACE);
        mesh
    }
}

/// Fill-pass state: the token stream, the mesh under construction and the
/// per-line face scratch.
struct Assembler<'a> {
    stream: TokenStream<'a>,
    options: ParseOptions,
    totals: DirectiveCounts,
    mesh: ObjMesh,
    /// Corners of the current face line, reused across lines.
    scratch: BufferU32,
    /// Attributes defined before the current face line.
    defined: [usize; 3],
}

impl<'a> Assembler<'a> {
    fn new(source: &'a [u8], options: ParseOptions, totals: DirectiveCounts) -> Self {
        let mut scratch = BufferU32::new();
        scratch.resize(SCRATCH_CORNERS * CORNER_INDICES);

        Self {
            stream: TokenStream::new(source, true),
            options,
            totals,
            mesh: totals.presized_mesh(),
            scratch,
            defined: [0; 3],
        }
    }

    fn run(&mut self) {
        while self.stream.kind() != TokenKind::Eof {
            match self.stream.kind() {
                TokenKind::NewLine => self.stream.advance(),
                TokenKind::Position => {
                    self.stream.advance();
                    self.read_vertex(Attribute::Position);
                }
                TokenKind::Texcoord => {
                    self.stream.advance();
                    self.read_vertex(Attribute::Texcoord);
                }
                TokenKind::Normal => {
                    self.stream.advance();
                    self.read_vertex(Attribute::Normal);
                }
                TokenKind::Face => {
                    self.stream.advance();
                    self.read_face();
                }
                TokenKind::Identifier => {
                    let token = self.stream.token();
                    debug!(
                        target: LOG_TARGET,
                        "[line: {}] skipping unsupported '{}' directive",
                        token.line + 1,
                        token.lossy_text()
                    );
                    self.stream.skip_line();
                }
                _ => {
                    report(&self.stream.token(), "expected a directive");
                    self.stream.skip_line();
                }
            }
        }
    }

    fn finish(self) -> ObjMesh {
        self.mesh
    }

    fn buffer_mut(&mut self, attribute: Attribute) -> &mut BufferF32 {
        match attribute {
            Attribute::Position => &mut self.mesh.positions,
            Attribute::Texcoord => &mut self.mesh.texcoords,
            Attribute::Normal => &mut self.mesh.normals,
        }
    }

    fn consume_float(&mut self) -> Option<f32> {
        let negative = self.stream.kind() == TokenKind::Minus;
        if negative {
            self.stream.advance();
        }

        let token = self.stream.token();
        if token.kind != TokenKind::Number {
            report(&token, "expected a number");
            self.stream.skip_token();
            return None;
        }

        let magnitude = match self.options.precision {
            FloatPrecision::Single => parse_decimal_f32(token.text),
            FloatPrecision::Extended => parse_decimal_f64(token.text) as f32,
        };
        self.stream.advance();

        Some(if negative { -magnitude } else { magnitude })
    }

    /// Read one face component and resolve it to a zero-based index.
    ///
    /// A component that cannot be read resolves to 0, like a missing one.
    fn consume_index(&mut self, attribute: Attribute) -> u32 {
        let negative = self.stream.kind() == TokenKind::Minus;
        if negative {
            self.stream.advance();
        }

        let token = self.stream.token();
        if token.kind != TokenKind::Number {
            report(&token, "expected a number");
            self.stream.skip_token();
            return 0;
        }

        let (value, overflowed) = parse_decimal_u32(token.text);
        if overflowed {
            report(&token, "index does not fit in 32 bits");
        } else if !token.text.iter().all(u8::is_ascii_digit) {
            report(&token, "expected an integer index");
        }
        self.stream.advance();

        let value = i64::from(value);
        let defined = self.defined[attribute as usize];
        let index = translate_index(if negative { -value } else { value }, defined);
        self.resolve_index(index, attribute, &token)
    }

    fn resolve_index(&self, index: i64, attribute: Attribute, token: &Token<'_>) -> u32 {
        let total = self.totals.of(attribute);
        if index >= 0 && (index as usize) < total {
            return index as u32;
        }

        match self.options.index_policy {
            IndexPolicy::Permissive => {
                report(
                    token,
                    &format!("{} index {index} is outside 0..{total}", attribute.name()),
                );
                index as u32
            }
            IndexPolicy::Clamp => {
                let clamped = index.clamp(0, total.saturating_sub(1) as i64);
                report(
                    token,
                    &format!(
                        "{} index {index} is outside 0..{total}, clamped to {clamped}",
                        attribute.name()
                    ),
                );
                clamped as u32
            }
        }
    }

    fn read_vertex(&mut self, attribute: Attribute) {
        let line = self.stream.token().line;
        let limit = attribute.components();
        let mut values = [0.0f32; 3];
        let mut entries = 0;
        let mut extra = 0;

        while !self.stream.at_line_end() {
            if let Some(value) = self.consume_float() {
                if entries < limit {
                    values[entries] = value;
                    entries += 1;
                } else {
                    extra += 1;
                }
            }
        }

        if extra > 0 {
            debug!(
                target: LOG_TARGET,
                "[line: {}] ignoring {extra} extra {} components",
                line + 1,
                attribute.name()
            );
        }
        if entries < limit {
            report(
                &self.stream.token(),
                &format!(
                    "expected {limit} {} components, found {entries}",
                    attribute.name()
                ),
            );
        }

        self.buffer_mut(attribute).write_many(&values[..entries]);
    }

    fn read_face(&mut self) {
        let line = self.stream.token().line;
        self.scratch.clear();
        self.defined = [
            self.mesh.position_count(),
            self.mesh.texcoord_count(),
            self.mesh.normal_count(),
        ];

        while !self.stream.at_line_end() {
            let mut corner = [0u32; CORNER_INDICES];

            // p
            corner[0] = self.consume_index(Attribute::Position);
            if self.stream.kind() == TokenKind::Slash {
                self.stream.advance();
                if self.stream.kind() == TokenKind::Slash {
                    // p//n
                    self.stream.advance();
                    corner[2] = self.consume_index(Attribute::Normal);
                } else {
                    // p/t
                    corner[1] = self.consume_index(Attribute::Texcoord);
                    if self.stream.kind() == TokenKind::Slash {
                        // p/t/n
                        self.stream.advance();
                        corner[2] = self.consume_index(Attribute::Normal);
                    }
                }
            }

            self.scratch.write_many(&corner);
        }

        self.emit_fan(line);
    }

    /// Triangulate the scratch polygon as a fan around its first corner.
    fn emit_fan(&mut self, line: u32) {
        let corners = self.scratch.len() / CORNER_INDICES;
        if corners < 3 {
            warn!(
                target: LOG_TARGET,
                "[line: {}] face with {corners} vertices produces no triangles",
                line + 1
            );
            return;
        }

        let scratch = self.scratch.as_slice();
        let first = &scratch[..CORNER_INDICES];
        for i in 2..corners {
            let previous = &scratch[(i - 1) * CORNER_INDICES..i * CORNER_INDICES];
            let current = &scratch[i * CORNER_INDICES..(i + 1) * CORNER_INDICES];
            self.mesh.triangles.write_many(first);
            self.mesh.triangles.write_many(previous);
            self.mesh.triangles.write_many(current);
        }
    }
}

/// Parse OBJ text with default options.
///
/// # Example
///
/// ```
/// use wfobj_core::obj::parse_obj;
///
/// let mesh = parse_obj(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
/// assert_eq!(mesh.position_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
pub fn parse_obj(source: &[u8]) -> ObjMesh {
    parse_obj_with_options(source, &ParseOptions::default())
}

/// Parse OBJ text held in a string.
pub fn parse_obj_str(source: &str) -> ObjMesh {
    parse_obj(source.as_bytes())
}

/// Parse OBJ text.
///
/// Always returns a mesh: malformed records are logged and skipped, so the
/// result may be partial. Input ends at the end of `source` or at the first
/// NUL byte.
pub fn parse_obj_with_options(source: &[u8], options: &ParseOptions) -> ObjMesh {
    profile_function!();

    let totals = DirectiveCounts::count(source);
    trace!(
        target: LOG_TARGET,
        "sizing pass: {} v, {} vt, {} vn, {} f",
        totals.positions,
        totals.texcoords,
        totals.normals,
        totals.faces
    );

    let mut assembler = Assembler::new(source, *options, totals);
    let presized_triangles = assembler.mesh.triangles.capacity();
    {
        profile_scope!("obj_fill_pass");
        assembler.run();
    }
    let mesh = assembler.finish();

    if mesh.triangles.capacity() > presized_triangles {
        trace!(
            target: LOG_TARGET,
            "triangle buffer grew from {} to {} slots",
            presized_triangles,
            mesh.triangles.capacity()
        );
    }
    profile_plot!("obj_triangles", mesh.triangle_count());
    debug!(
        target: LOG_TARGET,
        "parsed {} positions, {} texcoords, {} normals, {} triangles",
        mesh.position_count(),
        mesh.texcoord_count(),
        mesh.normal_count(),
        mesh.triangle_count()
    );

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_index() {
        assert_eq!(translate_index(1, 0), 0);
        assert_eq!(translate_index(2, 5), 1);
        assert_eq!(translate_index(-1, 5), 4);
        assert_eq!(translate_index(-5, 5), 0);
        assert_eq!(translate_index(-6, 5), -1);
        assert_eq!(translate_index(0, 5), 5);
    }

    #[test]
    fn test_count_only_line_leading_directives() {
        let counts = DirectiveCounts::count(b"v 1 2 3\nvt 0 0\nvn 0 1 0\nf 1 2 3 v\n# v\n");
        assert_eq!(
            counts,
            DirectiveCounts {
                positions: 1,
                texcoords: 1,
                normals: 1,
                faces: 1,
            }
        );
    }

    #[test]
    fn test_count_skips_unsupported_lines() {
        let counts = DirectiveCounts::count(b"o cube\ng side v\nusemtl red\ns off\nv 0 0 0\n");
        assert_eq!(counts.positions, 1);
        assert_eq!(counts.faces, 0);
    }

    #[test]
    fn test_presized_mesh() {
        let counts = DirectiveCounts {
            positions: 4,
            texcoords: 2,
            normals: 1,
            faces: 3,
        };
        let mesh = counts.presized_mesh();
        assert_eq!(mesh.positions.capacity(), 12);
        assert_eq!(mesh.texcoords.capacity(), 4);
        assert_eq!(mesh.normals.capacity(), 3);
        assert_eq!(mesh.triangles.capacity(), 54);
        assert!(mesh.positions.is_empty());
    }

    #[test]
    fn test_token_stream_recovers_from_errors() {
        let mut stream = TokenStream::new(b"@@ # note\n$v", false);
        assert_eq!(stream.kind(), TokenKind::NewLine);
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::Position);
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::Eof);
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::Eof);
    }

    #[test]
    fn test_resolve_index_clamp() {
        let options = ParseOptions::new().with_index_policy(IndexPolicy::Clamp);
        let mesh = parse_obj_with_options(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf -9 2 7\n", &options);
        assert_eq!(mesh.triangles.as_slice(), &[0, 0, 0, 1, 0, 0, 2, 0, 0]);
    }

    #[test]
    fn test_resolve_index_permissive_wraps() {
        let mesh = parse_obj(b"v 0 0 0\nf -2 1 1\n");
        assert_eq!(mesh.triangles[0], u32::MAX);
    }
}
