//! k-means color clustering
//!
//! Partitions a pixel set into `k` color clusters:
//! - Identical pixels are collapsed into weighted points first, so flat
//!   product shots cluster in a handful of points instead of millions
//! - k-means++ seeding from a seeded RNG, repeated `restarts` times
//! - Lloyd iterations until the largest centroid shift drops below the
//!   convergence threshold
//! - The run with the lowest inertia wins
//!
//! Weighted Lloyd iterations over unique colors give the same centroids as
//! iterating over every pixel. Results are reproducible for a fixed seed but
//! can still differ between seeds on pixel sets with ambiguous cluster
//! boundaries.
//!
//! Algorithm tag: `algo-weighted-kmeans`

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

use crate::color::conversion::{centroid_to_pixel, Pixel};
use crate::config::ExtractionConfig;
use crate::constants::clustering;
use crate::{AnalysisError, Result};

/// One color cluster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Mean color of the members, RGB channel units
    pub centroid: [f32; 3],
    /// Number of pixels assigned to this cluster
    pub count: usize,
}

impl Cluster {
    /// Centroid as a pixel, channels truncated
    pub fn pixel(&self) -> Pixel {
        centroid_to_pixel(self.centroid)
    }
}

/// Distinct color with its pixel count
#[derive(Debug, Clone, Copy)]
struct WeightedPoint {
    color: [f32; 3],
    weight: u64,
}

/// Outcome of one seeded k-means run
struct Run {
    centroids: Vec<[f32; 3]>,
    counts: Vec<u64>,
    inertia: f64,
}

/// k-means clusterer with k-means++ seeding and restarts
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    restarts: usize,
    max_iterations: usize,
    convergence: f32,
    seed: u64,
}

impl KMeans {
    /// Create a clusterer for `k` clusters with default parameters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            restarts: clustering::RESTARTS,
            max_iterations: clustering::MAX_ITERATIONS,
            convergence: clustering::CONVERGENCE,
            seed: clustering::SEED,
        }
    }

    /// Create a clusterer with custom parameters
    pub fn with_params(
        k: usize,
        restarts: usize,
        max_iterations: usize,
        convergence: f32,
        seed: u64,
    ) -> Self {
        Self {
            k,
            restarts,
            max_iterations,
            convergence,
            seed,
        }
    }

    /// Create a clusterer for `k` clusters using the shared clustering settings
    pub fn from_config(k: usize, config: &ExtractionConfig) -> Self {
        Self::with_params(
            k,
            config.restarts,
            config.max_iterations,
            config.convergence,
            config.seed,
        )
    }

    /// Cluster `pixels`, returning non-empty clusters ranked by member count (descending)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if `pixels` is empty or `k` is zero
    pub fn fit(&self, pixels: &[Pixel]) -> Result<Vec<Cluster>> {
        if pixels.is_empty() {
            return Err(AnalysisError::invalid_parameter("pixels", "empty"));
        }
        if self.k == 0 {
            return Err(AnalysisError::invalid_parameter("k", 0));
        }

        let points = weighted_points(pixels);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<Run> = None;
        for _ in 0..self.restarts.max(1) {
            let run = self.run(&points, &mut rng);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        let best = match best {
            Some(run) => run,
            None => return Err(AnalysisError::invalid_parameter("restarts", 0)),
        };

        let mut clusters: Vec<Cluster> = best
            .centroids
            .iter()
            .zip(&best.counts)
            .filter(|(_, &count)| count > 0)
            .map(|(&centroid, &count)| Cluster {
                centroid,
                count: count as usize,
            })
            .collect();
        clusters.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(clusters)
    }

    /// One k-means++ seeded Lloyd run
    fn run(&self, points: &[WeightedPoint], rng: &mut StdRng) -> Run {
        let mut centroids = init_plus_plus(points, self.k, rng);

        for _ in 0..self.max_iterations {
            let mut sums = vec![[0.0f64; 3]; centroids.len()];
            let mut counts = vec![0u64; centroids.len()];

            for point in points {
                let (nearest, _) = nearest_centroid(point.color, &centroids);
                let w = point.weight as f64;
                sums[nearest][0] += point.color[0] as f64 * w;
                sums[nearest][1] += point.color[1] as f64 * w;
                sums[nearest][2] += point.color[2] as f64 * w;
                counts[nearest] += point.weight;
            }

            let mut max_shift = 0.0f32;
            for (i, centroid) in centroids.iter_mut().enumerate() {
                // Empty clusters keep their previous centroid
                if counts[i] == 0 {
                    continue;
                }
                let n = counts[i] as f64;
                let updated = [
                    (sums[i][0] / n) as f32,
                    (sums[i][1] / n) as f32,
                    (sums[i][2] / n) as f32,
                ];
                max_shift = max_shift.max(distance_sq(*centroid, updated));
                *centroid = updated;
            }

            if max_shift <= self.convergence {
                break;
            }
        }

        // Final assignment against the settled centroids
        let mut counts = vec![0u64; centroids.len()];
        let mut inertia = 0.0f64;
        for point in points {
            let (nearest, dist) = nearest_centroid(point.color, &centroids);
            counts[nearest] += point.weight;
            inertia += dist as f64 * point.weight as f64;
        }

        Run {
            centroids,
            counts,
            inertia,
        }
    }
}

/// Collapse identical pixels into weighted points, in a stable order
fn weighted_points(pixels: &[Pixel]) -> Vec<WeightedPoint> {
    let mut histogram: HashMap<[u8; 3], u64> = HashMap::new();
    for p in pixels {
        *histogram.entry([p.red, p.green, p.blue]).or_insert(0) += 1;
    }

    let mut colors: Vec<([u8; 3], u64)> = histogram.into_iter().collect();
    colors.sort_unstable_by_key(|(color, _)| *color);

    colors
        .into_iter()
        .map(|(c, weight)| WeightedPoint {
            color: [c[0] as f32, c[1] as f32, c[2] as f32],
            weight,
        })
        .collect()
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to pixel count times squared distance to the nearest
/// existing centroid
fn init_plus_plus(points: &[WeightedPoint], k: usize, rng: &mut StdRng) -> Vec<[f32; 3]> {
    let mut centroids = Vec::with_capacity(k);

    let first = sample_index(points.iter().map(|p| p.weight as f64), rng).unwrap_or(0);
    centroids.push(points[first].color);

    let mut nearest: Vec<f32> = points
        .iter()
        .map(|p| distance_sq(p.color, points[first].color))
        .collect();

    while centroids.len() < k {
        let weights = points
            .iter()
            .zip(&nearest)
            .map(|(p, &d)| p.weight as f64 * d as f64);

        // Fewer distinct colors than clusters: duplicate a point, it stays empty
        let next = sample_index(weights, rng)
            .unwrap_or_else(|| rng.random_range(0..points.len()));
        let chosen = points[next].color;
        centroids.push(chosen);

        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(distance_sq(p.color, chosen));
        }
    }

    centroids
}

/// Draw an index with probability proportional to its weight
///
/// Returns `None` when all weights are zero.
fn sample_index(weights: impl Iterator<Item = f64> + Clone, rng: &mut StdRng) -> Option<usize> {
    let total: f64 = weights.clone().sum();
    if total <= 0.0 {
        return None;
    }

    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, w) in weights.enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(i);
        if cumulative > target {
            return Some(i);
        }
    }
    last_positive
}

/// Index of the closest centroid and the squared distance to it (first wins ties)
fn nearest_centroid(color: [f32; 3], centroids: &[[f32; 3]]) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = distance_sq(color, *c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat(color: Pixel, n: usize) -> Vec<Pixel> {
        vec![color; n]
    }

    #[test]
    fn test_kmeans_creation() {
        let kmeans = KMeans::new(3);
        assert_eq!(kmeans.k, 3);
        assert_eq!(kmeans.restarts, clustering::RESTARTS);
        assert_eq!(kmeans.seed, clustering::SEED);

        let kmeans = KMeans::with_params(5, 2, 50, 0.5, 42);
        assert_eq!(kmeans.k, 5);
        assert_eq!(kmeans.restarts, 2);
        assert_eq!(kmeans.max_iterations, 50);
        assert_eq!(kmeans.seed, 42);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(KMeans::new(3).fit(&[]).is_err());
        assert!(KMeans::new(0).fit(&[Pixel::new(1, 2, 3)]).is_err());
    }

    #[test]
    fn test_single_color_gives_one_cluster() {
        let pixels = repeat(Pixel::new(139, 0, 0), 400);
        let clusters = KMeans::new(3).fit(&pixels).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 400);
        assert_eq!(clusters[0].pixel(), Pixel::new(139, 0, 0));
    }

    #[test]
    fn test_clusters_ranked_by_count() {
        let mut pixels = repeat(Pixel::new(0, 0, 128), 600);
        pixels.extend(repeat(Pixel::new(250, 250, 250), 300));
        pixels.extend(repeat(Pixel::new(10, 10, 10), 100));

        let clusters = KMeans::new(3).fit(&pixels).unwrap();

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].count, 600);
        assert_eq!(clusters[0].pixel(), Pixel::new(0, 0, 128));
        assert_eq!(clusters[1].count, 300);
        assert_eq!(clusters[2].count, 100);
        let total: usize = clusters.iter().map(|c| c.count).sum();
        assert_eq!(total, pixels.len());
    }

    #[test]
    fn test_centroid_is_member_mean() {
        // Two tight groups, one cluster each
        let mut pixels = repeat(Pixel::new(100, 0, 0), 50);
        pixels.extend(repeat(Pixel::new(110, 0, 0), 50));
        pixels.extend(repeat(Pixel::new(0, 0, 250), 10));

        let clusters = KMeans::new(2).fit(&pixels).unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 100);
        assert!((clusters[0].centroid[0] - 105.0).abs() < 1e-3);
        assert_eq!(clusters[1].pixel(), Pixel::new(0, 0, 250));
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let pixels: Vec<Pixel> = (0..2000u32)
            .map(|i| Pixel::new((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8))
            .collect();

        let a = KMeans::with_params(3, 4, 100, 0.01, 9).fit(&pixels).unwrap();
        let b = KMeans::with_params(3, 4, 100, 0.01, 9).fit(&pixels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_more_clusters_than_colors() {
        let mut pixels = repeat(Pixel::new(255, 255, 255), 10);
        pixels.extend(repeat(Pixel::new(0, 0, 0), 5));

        let clusters = KMeans::new(5).fit(&pixels).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].pixel(), Pixel::new(255, 255, 255));
        assert_eq!(clusters[1].pixel(), Pixel::new(0, 0, 0));
    }

    #[test]
    fn test_weighted_points_collapse_duplicates() {
        let mut pixels = repeat(Pixel::new(3, 2, 1), 4);
        pixels.push(Pixel::new(1, 2, 3));
        let points = weighted_points(&pixels);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].color, [1.0, 2.0, 3.0]);
        assert_eq!(points[0].weight, 1);
        assert_eq!(points[1].weight, 4);
    }

    #[test]
    fn test_sample_index_skips_zero_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let idx = sample_index([0.0, 0.0, 5.0, 0.0].into_iter(), &mut rng);
            assert_eq!(idx, Some(2));
        }
        assert_eq!(sample_index([0.0, 0.0].into_iter(), &mut rng), None);
    }
}
