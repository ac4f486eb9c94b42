//! Matrix Market coordinate files.
//!
//! Supports the `coordinate` layout with `real`, `integer` or `pattern`
//! values and `general` or `symmetric` symmetry. Lines starting with `%`
//! are comments; the first non-comment line is `rows cols entries`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use super::{chunk_len, field, Indexing, ParseError};
use crate::builder::{ingest_triples, IoMode};
use crate::error::Result;
use crate::matrix::Matrix;

/// Value field of the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Real,
    Integer,
    Pattern,
}

/// Symmetry of the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    General,
    Symmetric,
}

/// A fully parsed coordinate file.
///
/// Entries are held 0-based in file order. Symmetric files hold each
/// stored off-diagonal entry twice, once per triangle; pattern files hold
/// the value `1.0`.
#[derive(Debug, Clone)]
pub struct MatrixMarket {
    m: usize,
    n: usize,
    field: Field,
    symmetry: Symmetry,
    entries: Vec<(usize, usize, f64)>,
}

/// Renumbers identifiers densely in order of first appearance.
#[derive(Default)]
struct Renumber(HashMap<usize, usize>);

impl Renumber {
    fn id(&mut self, raw: usize) -> usize {
        let next = self.0.len();
        *self.0.entry(raw).or_insert(next)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

fn parse_banner(line: &str) -> std::result::Result<(Field, Symmetry), ParseError> {
    let words: Vec<String> = line.split_whitespace().map(str::to_ascii_lowercase).collect();
    if words.len() < 5 || words[0] != "%%matrixmarket" || words[1] != "matrix" {
        return Err(ParseError::syntax(1, format!("malformed banner `{}`", line.trim())));
    }
    if words[2] != "coordinate" {
        return Err(ParseError::Unsupported(format!("{} layout", words[2])));
    }
    let field = match words[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        other => return Err(ParseError::Unsupported(format!("{} values", other))),
    };
    let symmetry = match words[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        other => return Err(ParseError::Unsupported(format!("{} symmetry", other))),
    };
    Ok((field, symmetry))
}

impl MatrixMarket {
    /// Open and parse the file at `path`.
    pub fn from_path(
        path: impl AsRef<Path>,
        indexing: Indexing,
    ) -> std::result::Result<Self, ParseError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let parsed = Self::from_reader(BufReader::new(file), indexing)?;
        info!(
            path = %path.display(),
            m = parsed.m,
            n = parsed.n,
            nz = parsed.nz(),
            ?indexing,
            "parsed matrix market file"
        );
        Ok(parsed)
    }

    /// Parse a coordinate file from `reader`.
    ///
    /// A missing banner is read as `real general`.
    pub fn from_reader<R: BufRead>(
        reader: R,
        indexing: Indexing,
    ) -> std::result::Result<Self, ParseError> {
        let mut kind = Field::Real;
        let mut symmetry = Symmetry::General;
        let mut header: Option<(usize, usize, usize)> = None;
        let mut raw: Vec<(usize, usize, f64)> = Vec::new();

        for (k, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = k + 1;
            if k == 0 && line.starts_with("%%") {
                (kind, symmetry) = parse_banner(&line)?;
                continue;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let Some((m, n, _)) = header else {
                let m = field(tokens.next(), lineno, "row count")?;
                let n = field(tokens.next(), lineno, "column count")?;
                let nnz: usize = field(tokens.next(), lineno, "entry count")?;
                raw.reserve(nnz);
                header = Some((m, n, nnz));
                continue;
            };
            let i: usize = field(tokens.next(), lineno, "row index")?;
            let j: usize = field(tokens.next(), lineno, "column index")?;
            let v = match kind {
                Field::Pattern => 1.0,
                Field::Real | Field::Integer => field::<f64>(tokens.next(), lineno, "value")?,
            };
            if indexing == Indexing::Direct && (i == 0 || j == 0 || i > m || j > n) {
                return Err(ParseError::syntax(
                    lineno,
                    format!("entry ({}, {}) outside a {}x{} matrix", i, j, m, n),
                ));
            }
            raw.push((i, j, v));
        }

        let Some((m, n, declared)) = header else {
            return Err(ParseError::syntax(0, "missing size line"));
        };
        if raw.len() != declared {
            return Err(ParseError::syntax(
                0,
                format!("header declares {} entries, found {}", declared, raw.len()),
            ));
        }
        if symmetry == Symmetry::Symmetric && m != n {
            return Err(ParseError::syntax(0, format!("symmetric matrix is {}x{}", m, n)));
        }

        let (m, n, stored) = match indexing {
            Indexing::Direct => (m, n, raw.into_iter().map(|(i, j, v)| (i - 1, j - 1, v)).collect()),
            Indexing::Indirect => Self::renumber(raw, symmetry),
        };
        let entries = match symmetry {
            Symmetry::General => stored,
            Symmetry::Symmetric => Self::mirror(stored),
        };
        debug!(m, n, declared, emitted = entries.len(), field = ?kind, ?symmetry, "matrix market body");
        Ok(Self {
            m,
            n,
            field: kind,
            symmetry,
            entries,
        })
    }

    fn renumber(
        raw: Vec<(usize, usize, f64)>,
        symmetry: Symmetry,
    ) -> (usize, usize, Vec<(usize, usize, f64)>) {
        let mut rows = Renumber::default();
        let mut cols = Renumber::default();
        let mut out = Vec::with_capacity(raw.len());
        match symmetry {
            Symmetry::Symmetric => {
                for (i, j, v) in raw {
                    let i = rows.id(i);
                    out.push((i, rows.id(j), v));
                }
                (rows.len(), rows.len(), out)
            }
            Symmetry::General => {
                for (i, j, v) in raw {
                    out.push((rows.id(i), cols.id(j), v));
                }
                (rows.len(), cols.len(), out)
            }
        }
    }

    fn mirror(stored: Vec<(usize, usize, f64)>) -> Vec<(usize, usize, f64)> {
        let mut out = Vec::with_capacity(2 * stored.len());
        for (i, j, v) in stored {
            out.push((i, j, v));
            if i != j {
                out.push((j, i, v));
            }
        }
        out
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of entries emitted, counting both triangles of a symmetric
    /// file.
    pub fn nz(&self) -> usize {
        self.entries.len()
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn is_pattern(&self) -> bool {
        self.field == Field::Pattern
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetry == Symmetry::Symmetric
    }

    /// Entries as 0-based `(row, column, value)` triples in file order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// The entries split into at most `k` contiguous ranges, for consumers
    /// that ingest in parallel.
    pub fn par_chunks(&self, k: usize) -> rayon::slice::Chunks<'_, (usize, usize, f64)> {
        self.entries.par_chunks(chunk_len(self.entries.len(), k))
    }

    /// An `m x n` matrix holding the entries.
    ///
    /// # Errors
    ///
    /// `Illegal` if the file repeats a coordinate.
    pub fn build(&self, mode: IoMode) -> Result<Matrix<f64>> {
        let mut a = Matrix::new(self.m, self.n);
        ingest_triples(&mut a, self.entries.clone(), mode)?;
        Ok(a)
    }

    /// Pattern form of [`MatrixMarket::build`]; values are dropped.
    pub fn build_pattern(&self, mode: IoMode) -> Result<Matrix<()>> {
        let mut a = Matrix::new(self.m, self.n);
        let triples = self.entries.iter().map(|&(i, j, _)| (i, j, ())).collect();
        ingest_triples(&mut a, triples, mode)?;
        Ok(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GENERAL: &str = "%%MatrixMarket matrix coordinate real general
% a comment
3 4 3
1 1 2.5
3 4 -1
2 2 7
";

    const SYMMETRIC: &str = "%%MatrixMarket matrix coordinate pattern symmetric
3 3 3
1 1
2 1
3 2
";

    fn parse(text: &str, indexing: Indexing) -> MatrixMarket {
        MatrixMarket::from_reader(Cursor::new(text), indexing).unwrap()
    }

    #[test]
    fn test_general_direct() {
        let mm = parse(GENERAL, Indexing::Direct);
        assert_eq!((mm.m(), mm.n(), mm.nz()), (3, 4, 3));
        assert!(!mm.is_pattern());
        assert!(!mm.is_symmetric());
        assert_eq!(
            mm.iter().collect::<Vec<_>>(),
            vec![(0, 0, 2.5), (2, 3, -1.0), (1, 1, 7.0)]
        );
        let a = mm.build(IoMode::Sequential).unwrap();
        assert_eq!(a.get(2, 3), Some(-1.0));
        assert_eq!(a.nnz(), 3);
    }

    #[test]
    fn test_symmetric_pattern_is_mirrored() {
        let mm = parse(SYMMETRIC, Indexing::Direct);
        assert!(mm.is_pattern());
        assert!(mm.is_symmetric());
        assert_eq!(mm.nz(), 5);
        let a = mm.build_pattern(IoMode::Parallel).unwrap();
        let coords: Vec<_> = a.iter().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_indirect_renumbers_in_order_of_appearance() {
        let text = "%%MatrixMarket matrix coordinate integer general
100 100 3
40 7 1
10 7 2
40 90 3
";
        let mm = parse(text, Indexing::Indirect);
        assert_eq!((mm.m(), mm.n()), (2, 2));
        assert_eq!(
            mm.iter().collect::<Vec<_>>(),
            vec![(0, 0, 1.0), (1, 0, 2.0), (0, 1, 3.0)]
        );
    }

    #[test]
    fn test_par_chunks_cover_entries() {
        let mm = parse(SYMMETRIC, Indexing::Direct);
        let chunks: Vec<Vec<_>> = mm.par_chunks(2).map(|c| c.to_vec()).collect();
        assert_eq!(chunks.len(), 2);
        let flat: Vec<_> = chunks.into_iter().flatten().collect();
        assert_eq!(flat, mm.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_rejections() {
        let complex = "%%MatrixMarket matrix coordinate complex general\n1 1 0\n";
        assert!(matches!(
            MatrixMarket::from_reader(Cursor::new(complex), Indexing::Direct),
            Err(ParseError::Unsupported(_))
        ));

        let out_of_range = "%%MatrixMarket matrix coordinate real general\n2 2 1\n3 1 1.0\n";
        assert!(matches!(
            MatrixMarket::from_reader(Cursor::new(out_of_range), Indexing::Direct),
            Err(ParseError::Syntax { line: 3, .. })
        ));

        let short = "%%MatrixMarket matrix coordinate real general\n2 2 2\n1 1 1.0\n";
        assert!(MatrixMarket::from_reader(Cursor::new(short), Indexing::Direct).is_err());

        let missing = MatrixMarket::from_path("/nonexistent/grb.mtx", Indexing::Direct);
        assert!(matches!(missing, Err(ParseError::Io(_))));
    }
}
