//! K-means clustering.
//!
//! Partitions points into k clusters by iterative centroid refinement
//! (Lloyd's algorithm):
//!
//! 1. Seed k centroids (uniform sample of k distinct points, or k-means++)
//! 2. **Assign**: each point → nearest centroid (Euclidean)
//! 3. **Update**: each centroid → coordinate-wise mean of its points
//! 4. Repeat until assignments stop changing, the centroids stop moving
//!    (total squared shift below `tol`), or `max_iter` is reached
//!
//! # Empty Clusters
//!
//! A centroid that loses all of its points has no mean. Instead of leaving it
//! undefined it is moved onto the point that is currently farthest from its
//! own centroid. Each point is used for at most one reseed per iteration.
//! When even the farthest point already sits on its centroid there are fewer
//! distinct points than clusters, and the run stops instead of reseeding
//! again. One warning per run reports the total number of reseeds.
//!
//! # Determinism
//!
//! Seeding is the only random step. [`Kmeans::fit_with_rng`] takes the random
//! source explicitly; [`Kmeans::with_seed`] is a shorthand for a seeded
//! `StdRng`. Same seed, same data, same k: same labels.

use super::traits::Clustering;
use crate::distance::{check_cluster_count, check_dimensions};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Centroid seeding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KmeansInit {
    /// k distinct points drawn uniformly at random.
    #[default]
    RandomSample,
    /// k-means++: each further seed drawn with probability ∝ D(x)².
    PlusPlus,
}

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on total squared centroid shift.
    tol: f64,
    /// Random seed.
    seed: Option<u64>,
    /// Seeding policy.
    init: KmeansInit,
    /// Independent restarts; lowest dispersion wins.
    n_init: usize,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster index per point, in `[0, k)`.
    pub labels: Vec<usize>,
    /// Final centroids, one row per cluster.
    pub centroids: Array2<f32>,
    /// Iterations run by the winning restart.
    pub n_iter: usize,
    /// Whether the winning restart stopped before `max_iter`.
    pub converged: bool,
}

impl KmeansFit {
    /// Sum over all points of the Euclidean distance to their centroid.
    ///
    /// This is the dispersion the elbow sweep compares across k.
    pub fn dispersion(&self, data: &[Vec<f32>]) -> f64 {
        data.iter()
            .zip(&self.labels)
            .map(|(point, &c)| {
                point
                    .iter()
                    .zip(self.centroids.row(c).iter())
                    .map(|(x, m)| {
                        let d = *x as f64 - *m as f64;
                        d * d
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .sum()
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            tol: 1e-4,
            seed: None,
            init: KmeansInit::RandomSample,
            n_init: 1,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the seeding policy.
    pub fn with_init(mut self, init: KmeansInit) -> Self {
        self.init = init;
        self
    }

    /// Set the number of restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Same configuration with a different k.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Fit using the configured seed, or a thread-local RNG when unseeded.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit drawing all randomness from `rng`.
    pub fn fit_with_rng<R: Rng + ?Sized>(&self, data: &[Vec<f32>], rng: &mut R) -> Result<KmeansFit> {
        let data_arr = self.validate(data)?;

        let mut best: Option<(f64, KmeansFit)> = None;
        for run in 0..self.n_init {
            let fit = self.fit_once(&data_arr, rng);
            let score = fit.dispersion(data);
            tracing::debug!(
                run,
                k = self.k,
                n_iter = fit.n_iter,
                converged = fit.converged,
                dispersion = score,
                "k-means run finished"
            );
            if best.as_ref().map_or(true, |(s, _)| score < *s) {
                best = Some((score, fit));
            }
        }

        // n_init >= 1 was validated, so at least one run exists.
        best.map(|(_, fit)| fit)
            .ok_or(Error::invalid("n_init", "must be at least 1"))
    }

    fn validate(&self, data: &[Vec<f32>]) -> Result<Array2<f32>> {
        let d = check_dimensions(data)?;
        check_cluster_count(self.k, data.len())?;
        if self.max_iter == 0 {
            return Err(Error::invalid("max_iter", "must be at least 1"));
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(Error::invalid("tol", "must be non-negative"));
        }
        if self.n_init == 0 {
            return Err(Error::invalid("n_init", "must be at least 1"));
        }

        let flat: Vec<f32> = data.iter().flatten().copied().collect();
        Array2::from_shape_vec((data.len(), d), flat)
            .map_err(|_| Error::invalid("dataset", "could not be laid out as a matrix"))
    }

    fn fit_once<R: Rng + ?Sized>(&self, data: &Array2<f32>, rng: &mut R) -> KmeansFit {
        let n = data.nrows();
        let mut centroids = self.init_centroids(data, rng);
        // Sentinel so the first assignment pass always counts as a change.
        let mut labels = vec![usize::MAX; n];
        let mut converged = false;
        let mut n_iter = 0;
        let mut reseeds = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;

            let changed = assign(data, &centroids, &mut labels);
            if changed == 0 {
                converged = true;
                break;
            }

            let (mut new_centroids, counts) = update_centroids(data, &labels, self.k);
            let reseed = reseed_empty(data, &mut labels, &mut new_centroids, &counts);
            reseeds += reseed.clusters;

            let shift: f32 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;

            // A reseed onto a point already sitting on its centroid changes nothing.
            if (shift as f64) < self.tol && reseed.moved == 0 {
                converged = true;
                break;
            }
        }

        if reseeds > 0 {
            tracing::warn!(k = self.k, reseeds, n_iter, "k-means reseeded empty clusters");
        }

        // Labels must agree with the centroids we hand back.
        let _ = assign(data, &centroids, &mut labels);

        KmeansFit {
            labels,
            centroids,
            n_iter,
            converged,
        }
    }

    /// Seed centroids according to the configured policy.
    fn init_centroids<R: Rng + ?Sized>(&self, data: &Array2<f32>, rng: &mut R) -> Array2<f32> {
        match self.init {
            KmeansInit::RandomSample => {
                let mut centroids = Array2::zeros((self.k, data.ncols()));
                let picks = rand::seq::index::sample(rng, data.nrows(), self.k);
                for (c, idx) in picks.into_iter().enumerate() {
                    centroids.row_mut(c).assign(&data.row(idx));
                }
                centroids
            }
            KmeansInit::PlusPlus => self.init_plus_plus(data, rng),
        }
    }

    /// k-means++ seeding.
    fn init_plus_plus<R: Rng + ?Sized>(&self, data: &Array2<f32>, rng: &mut R) -> Array2<f32> {
        let n = data.nrows();
        let mut centroids = Array2::zeros((self.k, data.ncols()));

        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        // Running minimum of squared distance to the chosen seeds.
        let mut distances: Vec<f32> = (0..n)
            .map(|j| squared_distance(data.row(j), centroids.row(0)))
            .collect();

        for i in 1..self.k {
            let total: f32 = distances.iter().sum();
            let selected = if total <= 0.0 {
                rng.random_range(0..n)
            } else {
                let threshold = rng.random::<f32>() * total;
                let mut cumsum = 0.0;
                let mut selected = n - 1;
                for (j, &dist) in distances.iter().enumerate() {
                    cumsum += dist;
                    if cumsum >= threshold && dist > 0.0 {
                        selected = j;
                        break;
                    }
                }
                selected
            };

            centroids.row_mut(i).assign(&data.row(selected));
            for (j, dist) in distances.iter_mut().enumerate() {
                *dist = dist.min(squared_distance(data.row(j), centroids.row(i)));
            }
        }

        centroids
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[inline]
fn squared_distance(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: ArrayView1<'_, f32>, centroids: &Array2<f32>) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f32::MAX;
    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    best_cluster
}

/// Assign every point to its nearest centroid; returns how many labels changed.
fn assign(data: &Array2<f32>, centroids: &Array2<f32>, labels: &mut [usize]) -> usize {
    #[cfg(feature = "parallel")]
    {
        labels
            .par_iter_mut()
            .enumerate()
            .map(|(i, label)| {
                let best = nearest(data.row(i), centroids);
                let changed = usize::from(*label != best);
                *label = best;
                changed
            })
            .sum()
    }

    #[cfg(not(feature = "parallel"))]
    {
        labels
            .iter_mut()
            .enumerate()
            .map(|(i, label)| {
                let best = nearest(data.row(i), centroids);
                let changed = usize::from(*label != best);
                *label = best;
                changed
            })
            .sum()
    }
}

/// Coordinate-wise means per cluster, plus member counts. Empty clusters get a zero row.
fn update_centroids(data: &Array2<f32>, labels: &[usize], k: usize) -> (Array2<f32>, Vec<usize>) {
    let mut centroids = Array2::zeros((k, data.ncols()));
    let mut counts = vec![0usize; k];

    for (point, &c) in data.rows().into_iter().zip(labels) {
        let mut row = centroids.row_mut(c);
        row += &point;
        counts[c] += 1;
    }

    for (mut row, &count) in centroids.rows_mut().into_iter().zip(&counts) {
        if count > 0 {
            row /= count as f32;
        }
    }

    (centroids, counts)
}

/// Outcome of [`reseed_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reseed {
    /// Empty clusters that were reseeded.
    clusters: usize,
    /// Reseeds that took a point off a centroid it did not already sit on.
    moved: usize,
}

/// Move every empty centroid onto the point farthest from its own centroid.
///
/// The chosen point is relabelled to the reseeded cluster.
fn reseed_empty(
    data: &Array2<f32>,
    labels: &mut [usize],
    centroids: &mut Array2<f32>,
    counts: &[usize],
) -> Reseed {
    let empty: Vec<usize> = (0..counts.len()).filter(|&c| counts[c] == 0).collect();
    if empty.is_empty() {
        return Reseed {
            clusters: 0,
            moved: 0,
        };
    }

    let mut far: Vec<(usize, f32)> = labels
        .iter()
        .enumerate()
        .map(|(i, &c)| (i, squared_distance(data.row(i), centroids.row(c))))
        .collect();
    // Farthest first; ties resolve to the lower index.
    far.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut moved = 0;
    for (&c, &(idx, dist)) in empty.iter().zip(far.iter()) {
        centroids.row_mut(c).assign(&data.row(idx));
        labels[idx] = c;
        if dist > 0.0 {
            moved += 1;
        }
    }

    Reseed {
        clusters: empty.len().min(far.len()),
        moved,
    }
}
