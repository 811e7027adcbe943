use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sfmview_colmap::binary::{decode_points, encode_points, PointFormat};
use sfmview_colmap::color::ColorEnhancement;
use sfmview_colmap::PointRecord;

fn bench_decode_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_points");

    for num_points in [10_000u64, 100_000] {
        let points = (0..num_points)
            .map(|i| PointRecord {
                id: i,
                position: [i as f64, 0.5 * i as f64, -(i as f64)],
                color_raw: [(i % 256) as u8, 128, 64],
                color: [0, 0, 0],
                error: 0.1,
                track_length: 4,
            })
            .collect::<Vec<_>>();

        for format in [PointFormat::Full, PointFormat::Mini] {
            let buf = encode_points(&points, format).expect("Failed to encode points");
            let enhancement = ColorEnhancement::default();

            group.bench_with_input(
                BenchmarkId::new(format!("{format:?}"), num_points),
                &buf,
                |b, buf| {
                    b.iter(|| {
                        let points = decode_points(black_box(buf), format, &enhancement);
                        black_box(points)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_decode_points);
criterion_main!(benches);
