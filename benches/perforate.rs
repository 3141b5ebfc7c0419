//! Benchmarks of flattening and perforation.

#![feature(test)]
extern crate test;
use test::Bencher;

use flexcut::{perforate, CubicBez, Path, PathSeg, PerforationConfig, Polyline, QuadBez};

fn wavy_path(n: usize) -> Path {
    let mut path = Path::new();
    for i in 0..n {
        let x = i as f64 * 10.0;
        path.push(CubicBez::new(
            (x, 0.0),
            (x + 3.0, 8.0),
            (x + 7.0, -8.0),
            (x + 10.0, 0.0),
        ));
    }
    path
}

#[bench]
fn bench_flatten_quad(b: &mut Bencher) {
    let seg = PathSeg::Quad(QuadBez::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0)));
    let tolerance = seg.flatten_tolerance(1e-3);
    b.iter(|| {
        let mut n = 0;
        test::black_box(seg).flatten(tolerance, |_| n += 1);
        n
    });
}

#[bench]
fn bench_flatten_path(b: &mut Bencher) {
    let path = wavy_path(100);
    b.iter(|| Polyline::from_path(test::black_box(&path), 1e-3));
}

#[bench]
fn bench_perforate(b: &mut Bencher) {
    let path = wavy_path(100);
    let config = PerforationConfig::new(5.0, 2.0);
    b.iter(|| {
        let perforation = perforate(test::black_box(&path), &config).unwrap();
        perforation.commands().count()
    });
}

#[bench]
fn bench_commands(b: &mut Bencher) {
    let perforation = perforate(&wavy_path(100), &PerforationConfig::new(0.5, 0.25)).unwrap();
    b.iter(|| test::black_box(&perforation).commands().count());
}
