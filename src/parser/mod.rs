//! Reading matrices from files.
//!
//! Two text formats are understood: Matrix Market coordinate files and
//! hypergraph incidence lists. Both parse eagerly into a list of triples
//! which can be walked sequentially, split into chunks for parallel
//! consumers, or built into a [`Matrix`](crate::Matrix).

pub mod hypergraph;
pub mod matrix_market;

use std::str::FromStr;

pub use hypergraph::Hypergraph;
pub use matrix_market::{Field, MatrixMarket, Symmetry};

/// Failure to read or understand an input file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    #[error("unsupported format: {0}")]
    Unsupported(String),
}

impl ParseError {
    pub(crate) fn syntax(line: usize, msg: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            msg: msg.into(),
        }
    }
}

/// How file indices map to matrix coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indexing {
    /// 1-based file indices become 0-based coordinates.
    #[default]
    Direct,
    /// Row and column identifiers are renumbered `0..` in order of first
    /// appearance; the matrix shape is the number of distinct identifiers.
    Indirect,
}

impl FromStr for Indexing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "indirect" => Ok(Self::Indirect),
            other => Err(format!("expected `direct` or `indirect`, got `{}`", other)),
        }
    }
}

/// Parse one whitespace-separated field of line `line`.
pub(crate) fn field<T: FromStr>(token: Option<&str>, line: usize, what: &str) -> Result<T, ParseError> {
    let token = token.ok_or_else(|| ParseError::syntax(line, format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| ParseError::syntax(line, format!("invalid {} `{}`", what, token)))
}

/// Contiguous chunk length splitting `len` items into at most `k` parts.
pub(crate) fn chunk_len(len: usize, k: usize) -> usize {
    let k = k.max(1);
    ((len + k - 1) / k).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_from_str() {
        assert_eq!("direct".parse::<Indexing>(), Ok(Indexing::Direct));
        assert_eq!("Indirect".parse::<Indexing>(), Ok(Indexing::Indirect));
        assert!("sideways".parse::<Indexing>().is_err());
    }

    #[test]
    fn test_chunk_len() {
        assert_eq!(chunk_len(10, 3), 4);
        assert_eq!(chunk_len(0, 3), 1);
        assert_eq!(chunk_len(5, 0), 5);
    }

    #[test]
    fn test_field_errors_carry_line() {
        let err = field::<usize>(Some("x"), 7, "row index").unwrap_err();
        assert_eq!(err.to_string(), "line 7: invalid row index `x`");
        let err = field::<usize>(None, 2, "column index").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
    }
}
