//! Hypergraph incidence lists.
//!
//! The first non-comment line is `<nets> <vertices>`; each following line
//! lists the 1-based vertices of one net. Net `k` is the `k`-th such line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use super::{chunk_len, field, ParseError};
use crate::builder::{ingest_triples, IoMode};
use crate::error::Result;
use crate::matrix::Matrix;

/// Net/vertex incidences of a parsed hypergraph.
#[derive(Debug, Clone)]
pub struct Hypergraph {
    nets: usize,
    vertices: usize,
    pins: Vec<(usize, usize)>,
}

impl Hypergraph {
    pub fn from_path(path: impl AsRef<Path>) -> std::result::Result<Self, ParseError> {
        let path = path.as_ref();
        let parsed = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(path = %path.display(), nets = parsed.nets, vertices = parsed.vertices, pins = parsed.nz(), "parsed hypergraph");
        Ok(parsed)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> std::result::Result<Self, ParseError> {
        let mut shape: Option<(usize, usize)> = None;
        let mut net = 0;
        let mut pins = Vec::new();

        for (k, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = k + 1;
            let trimmed = line.trim();
            if trimmed.starts_with('%') || trimmed.starts_with('#') {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let Some((nets, vertices)) = shape else {
                if trimmed.is_empty() {
                    continue;
                }
                let nets = field(tokens.next(), lineno, "net count")?;
                let vertices = field(tokens.next(), lineno, "vertex count")?;
                shape = Some((nets, vertices));
                continue;
            };
            if net == nets {
                if trimmed.is_empty() {
                    continue;
                }
                return Err(ParseError::syntax(lineno, format!("more than {} nets", nets)));
            }
            for token in tokens {
                let v: usize = field(Some(token), lineno, "vertex")?;
                if v == 0 || v > vertices {
                    return Err(ParseError::syntax(
                        lineno,
                        format!("vertex {} outside 1..={}", v, vertices),
                    ));
                }
                pins.push((net, v - 1));
            }
            net += 1;
        }

        let Some((nets, vertices)) = shape else {
            return Err(ParseError::syntax(0, "missing size line"));
        };
        Ok(Self {
            nets,
            vertices,
            pins,
        })
    }

    /// Number of nets; the row count of the incidence matrix.
    pub fn m(&self) -> usize {
        self.nets
    }

    /// Number of vertices; the column count of the incidence matrix.
    pub fn n(&self) -> usize {
        self.vertices
    }

    pub fn nz(&self) -> usize {
        self.pins.len()
    }

    /// `(net, vertex)` pattern triples, 0-based, in file order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, usize, ())> + '_ {
        self.pins.iter().map(|&(i, j)| (i, j, ()))
    }

    pub fn par_chunks(&self, k: usize) -> rayon::slice::Chunks<'_, (usize, usize)> {
        self.pins.par_chunks(chunk_len(self.pins.len(), k))
    }

    /// The `nets x vertices` incidence pattern.
    ///
    /// # Errors
    ///
    /// `Illegal` if a net lists a vertex twice.
    pub fn build(&self, mode: IoMode) -> Result<Matrix<()>> {
        let mut a = Matrix::new(self.nets, self.vertices);
        ingest_triples(&mut a, self.iter().collect(), mode)?;
        Ok(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_incidence_pattern() {
        let text = "% three nets over four vertices\n3 4\n1 2\n2 3 4\n\n";
        let h = Hypergraph::from_reader(Cursor::new(text)).unwrap();
        assert_eq!((h.m(), h.n(), h.nz()), (3, 4, 5));
        let a = h.build(IoMode::Sequential).unwrap();
        let coords: Vec<_> = a.iter().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 1), (1, 2), (1, 3)]);
        assert_eq!(h.par_chunks(8).count(), 5);
    }

    #[test]
    fn test_rejects_bad_vertex() {
        let err = Hypergraph::from_reader(Cursor::new("1 2\n3\n")).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
        let err = Hypergraph::from_reader(Cursor::new("1 2\n1\n2\n")).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 3, .. }));
    }
}
