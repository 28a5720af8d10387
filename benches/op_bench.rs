use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use bitfield_rs::{
    Bitlist, BitfieldRead, BitlistRef, BitwiseOps, Encodable, testutil::BitGen,
};

const SIZES: [usize; 5] = [64, 512, 2048, 8192, 65536];

fn benchmark_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");
    let mut bitgen = BitGen::new(0xDEAD_BEEF);

    for &size in &SIZES {
        let bitlist64 = bitgen.bitlist64(size, size / 3);
        let bitlist = bitlist64.to_bitlist();
        let encoded = bitlist.encode_to_bytes();

        group.bench_function(BenchmarkId::new("bitlist64", size), |b| {
            b.iter(|| black_box(&bitlist64).count())
        });

        group.bench_function(BenchmarkId::new("bitlist", size), |b| {
            b.iter(|| black_box(&bitlist).count())
        });

        group.bench_function(BenchmarkId::new("bitlist ref", size), |b| {
            let bitlist_ref = BitlistRef::from_bytes(encoded.clone()).unwrap();
            b.iter(|| black_box(&bitlist_ref).count())
        });
    }

    group.finish();
}

fn benchmark_bit_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_indices");
    let mut bitgen = BitGen::new(0xDEAD_BEEF);

    for &ones in &[4usize, 64, 1024, 8192] {
        let size = 65536;
        let bitlist64 = bitgen.bitlist64(size, ones);
        let bitlist = bitlist64.to_bitlist();

        group.bench_function(BenchmarkId::new("bitlist64", ones), |b| {
            b.iter(|| black_box(&bitlist64).bit_indices())
        });

        group.bench_function(BenchmarkId::new("bitlist64 into", ones), |b| {
            let mut dst = vec![0; ones];
            b.iter(|| black_box(&bitlist64).bit_indices_into(&mut dst))
        });

        group.bench_function(BenchmarkId::new("bitlist", ones), |b| {
            b.iter(|| black_box(&bitlist).bit_indices())
        });
    }

    group.finish();
}

fn benchmark_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let mut bitgen = BitGen::new(0xDEAD_BEEF);

    for &size in &SIZES {
        let bitlist64 = bitgen.bitlist64(size, size / 3);
        let bitlist = bitlist64.to_bitlist();
        let encoded = bitlist.encode_to_bytes();

        group.bench_function(BenchmarkId::new("to_bitlist", size), |b| {
            b.iter(|| black_box(&bitlist64).to_bitlist())
        });

        group.bench_function(BenchmarkId::new("to_bitlist64", size), |b| {
            b.iter(|| black_box(&bitlist).to_bitlist64())
        });

        group.bench_function(BenchmarkId::new("decode", size), |b| {
            b.iter(|| Bitlist::from_bytes(black_box(&encoded)))
        });
    }

    group.finish();
}

fn benchmark_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");
    let mut bitgen = BitGen::new(0xDEAD_BEEF);

    for &size in &SIZES {
        let superset = bitgen.bitlist64(size, size / 2);
        // every bit of the subset is also in the superset
        let subset = superset.and(&bitgen.bitlist64(size, size / 2)).unwrap();
        assert!(superset.contains(&subset).unwrap());

        group.bench_function(BenchmarkId::new("bitlist64", size), |b| {
            b.iter(|| black_box(&superset).contains(black_box(&subset)))
        });

        let superset = superset.to_bitlist();
        let subset = subset.to_bitlist();
        group.bench_function(BenchmarkId::new("bitlist", size), |b| {
            b.iter(|| black_box(&superset).contains(black_box(&subset)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_count,
    benchmark_bit_indices,
    benchmark_convert,
    benchmark_contains
);
criterion_main!(benches);
