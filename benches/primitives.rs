//! Benchmarks for the core primitives

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grb::algebra::operators::Add;
use grb::{
    build_matrix_unique, e_wise_apply_monoid, execute, mxm, mxv, plus_times, set_scalar,
    Descriptor, IoMode, Matrix, Monoid, SparseMatrixCSR, Vector, NO_MASK,
};

/// Banded `n x n` matrix with `2 * half + 1` diagonals
fn banded(n: usize, half: usize) -> Matrix<f64> {
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    for i in 0..n {
        col_idx.extend(i.saturating_sub(half)..(i + half + 1).min(n));
        row_ptr.push(col_idx.len());
    }
    let values = vec![1.0; col_idx.len()];
    Matrix::from_csr(SparseMatrixCSR::new(n, n, row_ptr, col_idx, values))
}

fn ones(n: usize) -> Vector<f64> {
    let mut x = Vector::new(n);
    execute(|p| set_scalar(&mut x, NO_MASK, 1.0, Descriptor::NO_OPERATION, p)).unwrap();
    x
}

fn every_kth(n: usize, k: usize) -> Vector<f64> {
    let mut x = Vector::new(n);
    for i in (0..n).step_by(k) {
        x.set_element(i as f64, i).unwrap();
    }
    x
}

fn bench_mxv(c: &mut Criterion) {
    let mut group = c.benchmark_group("mxv");
    let ring = plus_times::<f64>();
    for &n in &[1_000, 10_000, 100_000] {
        let a = banded(n, 3);
        let mut y = Vector::<f64>::new(n);

        let dense = ones(n);
        group.bench_with_input(BenchmarkId::new("dense_x", n), &n, |bench, _| {
            bench.iter(|| {
                execute(|p| mxv(&mut y, NO_MASK, &a, &dense, &ring, Descriptor::NO_OPERATION, p))
                    .unwrap();
                black_box(y.nnz())
            })
        });

        let sparse = every_kth(n, 100);
        group.bench_with_input(BenchmarkId::new("sparse_x", n), &n, |bench, _| {
            bench.iter(|| {
                execute(|p| mxv(&mut y, NO_MASK, &a, &sparse, &ring, Descriptor::NO_OPERATION, p))
                    .unwrap();
                black_box(y.nnz())
            })
        });
    }
    group.finish();
}

fn bench_mxm(c: &mut Criterion) {
    let mut group = c.benchmark_group("mxm");
    group.sample_size(20);
    let ring = plus_times::<f64>();
    for &(n, half) in &[(1_000, 2), (10_000, 2), (10_000, 20)] {
        let a = banded(n, half);
        group.bench_with_input(BenchmarkId::new(format!("band{}", half), n), &n, |bench, _| {
            bench.iter(|| {
                let mut c = Matrix::<f64>::new(n, n);
                execute(|p| mxm(&mut c, &a, &a, &ring, Descriptor::NO_OPERATION, p)).unwrap();
                black_box(c.nnz())
            })
        });
    }
    group.finish();
}

fn bench_ewise(c: &mut Criterion) {
    let n = 100_000;
    let x = every_kth(n, 3);
    let y = every_kth(n, 5);
    let plus = Monoid::<Add<f64>>::plus();
    let mut z = Vector::<f64>::new(n);
    c.bench_function("ewise_union_100k", |bench| {
        bench.iter(|| {
            execute(|p| {
                e_wise_apply_monoid(&mut z, NO_MASK, (&x).into(), (&y).into(), &plus, Descriptor::NO_OPERATION, p)
            })
            .unwrap();
            black_box(z.nnz())
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let n = 50_000;
    // reversed rows force a sort
    let rows: Vec<usize> = (0..n).rev().collect();
    let cols: Vec<usize> = (0..n).map(|i| (i * 7) % n).collect();
    let mut group = c.benchmark_group("build_matrix_unique");
    for mode in [IoMode::Sequential, IoMode::Parallel] {
        group.bench_function(format!("{:?}", mode), |bench| {
            bench.iter(|| {
                let mut a = Matrix::<f64>::new(n, n);
                build_matrix_unique(&mut a, rows.iter().copied(), cols.iter().copied(), vec![1.0; n], mode)
                    .unwrap();
                black_box(a.nnz())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mxv, bench_mxm, bench_ewise, bench_build);
criterion_main!(benches);
