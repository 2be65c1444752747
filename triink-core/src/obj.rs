/// OBJ-style mesh text parser
///
/// Only `v` and `f` statements are read. Everything else, including
/// texture and normal references inside face tokens, is ignored. Lines
/// that cannot be used are dropped and reported as [`ParseDiagnostic`]s.
use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, i64 as integer, space1},
    combinator::{eof, map, peek, rest},
    multi::separated_list1,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::geometry::{Mesh, Triangle, Vertex};

/// Why a line (or part of one) was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A vertex line without three numeric coordinates
    MalformedVertex,
    /// A vertex with a NaN or infinite coordinate
    NonFiniteVertex,
    /// A face token that does not resolve to a vertex; the rest of the face is kept
    InvalidReference,
    /// A face left with fewer than three usable references
    DegenerateFace,
    /// A face referencing a vertex that was never declared
    OutOfRangeFace,
}

impl SkipReason {
    /// True if the whole line was dropped
    pub fn drops_line(&self) -> bool {
        !matches!(self, SkipReason::InvalidReference)
    }
}

/// One skipped item, with its one-based source line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub line: usize,
    pub reason: SkipReason,
}

/// Parser output: the mesh plus everything that was skipped on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMesh {
    pub mesh: Mesh,
    diagnostics: Vec<ParseDiagnostic>,
}

impl ParsedMesh {
    /// Diagnostics in source order. Each call starts a fresh iteration.
    pub fn diagnostics(&self) -> impl Iterator<Item = &ParseDiagnostic> + Clone + '_ {
        self.diagnostics.iter()
    }

    /// Number of diagnostics with the given reason
    pub fn count(&self, reason: SkipReason) -> usize {
        self.diagnostics.iter().filter(|d| d.reason == reason).count()
    }

    /// Number of source lines dropped entirely
    pub fn skipped_lines(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.reason.drops_line())
            .count()
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

enum Statement<'a> {
    Vertex(&'a str),
    Face(&'a str),
    Ignored,
}

/// A face waiting for the final vertex count to be known
struct PendingFace {
    line: usize,
    refs: Vec<usize>,
}

/// Parse mesh text into a mesh of fan-triangulated faces
pub fn parse_obj(input: &str) -> ParsedMesh {
    let mut mesh = Mesh::new();
    let mut faces = Vec::new();
    let mut diagnostics = Vec::new();

    for (line_no, raw) in input.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match statement(line) {
            Statement::Vertex(body) => match vertex_body(body) {
                Ok((_, (x, y, z))) if x.is_finite() && y.is_finite() && z.is_finite() => {
                    mesh.add_vertex(Vertex::new(x, y, z));
                }
                Ok(_) => diagnostics.push(ParseDiagnostic {
                    line: line_no,
                    reason: SkipReason::NonFiniteVertex,
                }),
                Err(_) => diagnostics.push(ParseDiagnostic {
                    line: line_no,
                    reason: SkipReason::MalformedVertex,
                }),
            },
            Statement::Face(body) => {
                let tokens = face_tokens(body).map(|(_, t)| t).unwrap_or_default();
                let mut refs = Vec::with_capacity(tokens.len());
                for token in tokens {
                    match resolve_reference(token, mesh.vertex_count()) {
                        Some(index) => refs.push(index),
                        None => diagnostics.push(ParseDiagnostic {
                            line: line_no,
                            reason: SkipReason::InvalidReference,
                        }),
                    }
                }
                if refs.len() < 3 {
                    diagnostics.push(ParseDiagnostic {
                        line: line_no,
                        reason: SkipReason::DegenerateFace,
                    });
                } else {
                    faces.push(PendingFace {
                        line: line_no,
                        refs,
                    });
                }
            }
            Statement::Ignored => {}
        }
    }

    let vertex_count = mesh.vertex_count();
    for face in faces {
        if face.refs.iter().any(|&i| i >= vertex_count) {
            diagnostics.push(ParseDiagnostic {
                line: face.line,
                reason: SkipReason::OutOfRangeFace,
            });
            continue;
        }
        triangulate_fan(&face.refs, &mut mesh);
    }
    // Out-of-range faces are detected after the fact; keep diagnostics in line order.
    diagnostics.sort_by_key(|d| d.line);

    ParsedMesh { mesh, diagnostics }
}

/// Parse raw bytes, which must be UTF-8
pub fn parse_obj_bytes(data: &[u8]) -> crate::Result<ParsedMesh> {
    let text = std::str::from_utf8(data)?;
    Ok(parse_obj(text))
}

/// Split an n-gon into n-2 triangles sharing its first vertex
fn triangulate_fan(refs: &[usize], mesh: &mut Mesh) {
    let apex = refs[0];
    for pair in refs[1..].windows(2) {
        mesh.add_triangle(Triangle::new(apex, pair[0], pair[1]));
    }
}

fn statement(line: &str) -> Statement<'_> {
    let parsed: IResult<&str, Statement<'_>> = alt((
        map(preceded(tuple((char('v'), space1)), rest), Statement::Vertex),
        map(preceded(tuple((char('f'), space1)), rest), Statement::Face),
    ))(line);
    parsed.map(|(_, s)| s).unwrap_or(Statement::Ignored)
}

/// A number that must end at whitespace or the end of the line
fn coordinate(input: &str) -> IResult<&str, f64> {
    terminated(double, peek(alt((space1, eof))))(input)
}

/// Three coordinates; anything after them (w, vertex colours) is ignored
fn vertex_body(input: &str) -> IResult<&str, (f64, f64, f64)> {
    tuple((
        coordinate,
        preceded(space1, coordinate),
        preceded(space1, coordinate),
    ))(input)
}

fn face_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(space1, take_till1(|c: char| c.is_whitespace()))(input)
}

/// Resolve the vertex part of a face token to a zero-based index.
///
/// Negative references count back from the vertices declared so far, so
/// `-1` is the most recent vertex. Zero and references before the first
/// vertex are invalid. Positive references are checked once parsing ends.
fn resolve_reference(token: &str, declared: usize) -> Option<usize> {
    let parsed: IResult<&str, i64> = integer(token);
    let (_, raw) = parsed.ok()?;
    let one_based = match raw {
        0 => return None,
        r if r < 0 => declared as i64 + 1 + r,
        r => r,
    };
    if one_based < 1 {
        return None;
    }
    Some(one_based as usize - 1)
}
