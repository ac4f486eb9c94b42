//! Reading Matrix Market and hypergraph files into matrices

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use rayon::prelude::*;

use grb::parser::{Hypergraph, Indexing, MatrixMarket, ParseError};
use grb::{execute, mxv, plus_times, set_scalar, Descriptor, IoMode, Vector, NO_MASK};

//    [1 0 0 2]
//    [0 0 3 0]
//    [0 4 0 0]
const WIDE: &str = "%%MatrixMarket matrix coordinate real general
%
% written by hand
%
3 4 4
1 1 1.0
1 4 2.0
2 3 3.0
3 2 4.0
";

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("grb-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_matrix_market_from_path_then_spmv() {
    let path = scratch_file("wide.mtx", WIDE);
    let parsed = MatrixMarket::from_path(&path, Indexing::Direct).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!((parsed.m(), parsed.n(), parsed.nz()), (3, 4, 4));
    let a = parsed.build(IoMode::Parallel).unwrap();

    let mut x = Vector::<f64>::new(4);
    execute(|p| set_scalar(&mut x, NO_MASK, 1.0, Descriptor::NO_OPERATION, p)).unwrap();
    let mut y = Vector::<f64>::new(3);
    execute(|p| mxv(&mut y, NO_MASK, &a, &x, &plus_times::<f64>(), Descriptor::NO_OPERATION, p))
        .unwrap();
    assert_eq!(y.iter_sorted().collect::<Vec<_>>(), vec![(0, 3.0), (1, 3.0), (2, 4.0)]);
}

#[test]
fn test_sequential_and_parallel_ingestion_agree() {
    let parsed = MatrixMarket::from_reader(Cursor::new(WIDE), Indexing::Direct).unwrap();
    let sequential: Vec<_> = parsed.iter().collect();
    let chunked: Vec<_> = parsed
        .par_chunks(3)
        .flat_map_iter(|chunk| chunk.iter().copied())
        .collect();
    assert_eq!(sequential, chunked);

    let a = parsed.build(IoMode::Sequential).unwrap();
    let b = parsed.build(IoMode::Parallel).unwrap();
    assert_eq!(a.crs(), b.crs());
}

#[test]
fn test_symmetric_indirect_pattern() {
    let text = "%%MatrixMarket matrix coordinate pattern symmetric
1000 1000 3
500 500
700 500
900 700
";
    let parsed = MatrixMarket::from_reader(Cursor::new(text), Indexing::Indirect).unwrap();
    assert!(parsed.is_pattern() && parsed.is_symmetric());
    assert_eq!((parsed.m(), parsed.n(), parsed.nz()), (3, 3, 5));

    let a = parsed.build_pattern(IoMode::Sequential).unwrap();
    let coords: Vec<_> = a.iter().map(|(i, j, _)| (i, j)).collect();
    assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 2), (2, 1)]);
}

#[test]
fn test_malformed_files() {
    let cases = [
        "%%MatrixMarket matrix array real general\n2 2\n1\n2\n3\n4\n",
        "%%MatrixMarket matrix coordinate complex general\n1 1 1\n1 1 1 0\n",
        "%%MatrixMarket matrix coordinate real hermitian\n1 1 1\n1 1 1\n",
    ];
    for text in cases {
        let err = MatrixMarket::from_reader(Cursor::new(text), Indexing::Direct).unwrap_err();
        assert!(matches!(err, ParseError::Unsupported(_)), "{}", err);
    }

    let err = MatrixMarket::from_reader(
        Cursor::new("%%MatrixMarket matrix coordinate real general\n2 2 1\n1 x 1.0\n"),
        Indexing::Direct,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "line 3: invalid column index `x`");

    let duplicate = "%%MatrixMarket matrix coordinate real general\n2 2 2\n1 1 1.0\n1 1 2.0\n";
    let parsed = MatrixMarket::from_reader(Cursor::new(duplicate), Indexing::Direct).unwrap();
    assert!(matches!(parsed.build(IoMode::Sequential), Err(grb::GrbError::Illegal(_))));
}

#[test]
fn test_hypergraph_incidence() {
    let path = scratch_file("nets.hg", "2 5\n1 3 5\n2 4\n");
    let h = Hypergraph::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!((h.m(), h.n(), h.nz()), (2, 5, 5));
    let a = h.build(IoMode::Parallel).unwrap();
    let coords: Vec<_> = a.iter().map(|(i, j, _)| (i, j)).collect();
    assert_eq!(coords, vec![(0, 0), (0, 2), (0, 4), (1, 1), (1, 3)]);
}
