use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use pod_colors::color::{KMeans, Pixel};
use pod_colors::{ColorExtractionStrategy, PipelineConfig, StrategyKind};

/// 600x600 mockup: gradient background, garment with a printed stripe
fn mockup() -> RgbImage {
    RgbImage::from_fn(600, 600, |x, y| {
        let inside = (150..450).contains(&x) && (100..500).contains(&y);
        if inside && (280..320).contains(&y) {
            Rgb([240, 200, 40])
        } else if inside {
            Rgb([139, (x % 7) as u8, (y % 5) as u8])
        } else {
            let shade = 235 + ((x + y) % 20) as u8;
            Rgb([shade, shade, shade])
        }
    })
}

fn benchmark_strategies(c: &mut Criterion) {
    let image = mockup();
    let config = PipelineConfig::default();

    for kind in StrategyKind::ALL {
        let strategy = kind.build(&config);
        c.bench_function(kind.name(), |b| {
            b.iter(|| strategy.dominant_color(black_box(&image)))
        });
    }
}

fn benchmark_kmeans(c: &mut Criterion) {
    let pixels: Vec<Pixel> = mockup()
        .pixels()
        .map(|p| Pixel::new(p[0], p[1], p[2]))
        .collect();
    let kmeans = KMeans::new(3);

    c.bench_function("kmeans_k3_360k_pixels", |b| {
        b.iter(|| kmeans.fit(black_box(&pixels)))
    });
}

criterion_group!(benches, benchmark_strategies, benchmark_kmeans);
criterion_main!(benches);
