//! Density-based clustering (DBSCAN, Ester et al. 1996).
//!
//! The number of clusters is discovered, not given. Points in sparse regions
//! are labelled [`NOISE`] instead of being forced into a cluster.
//!
//! Terms used below:
//!
//! - neighborhood of P: every *other* point within `epsilon` of P
//! - core point: neighborhood holds at least `min_pts` points
//! - border point: not core, but in some core point's neighborhood
//!
//! ## Expansion
//!
//! Points are visited in index order. A sparse point stays noise for now.
//! A dense one opens a new cluster that grows breadth-first: unclaimed
//! neighbors join it, and core neighbors queue their own unclaimed
//! neighbors.
//!
//! Noise is promoted to border when a later cluster reaches it. A border
//! point reachable from two clusters keeps its first claim. Each index is
//! queued at most once.
//!
//! Cost is O(n²) distance evaluations; there is no spatial index.

use super::traits::Clustering;
use crate::distance::{check_dimensions, squared_euclidean};
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Label for points that belong to no cluster.
pub const NOISE: usize = usize::MAX;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f32,
    /// Minimum neighborhood size for core point classification.
    min_pts: usize,
}

/// Result of a DBSCAN fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbscanFit {
    /// Cluster index per point, or [`NOISE`].
    pub labels: Vec<usize>,
    /// Number of clusters found (`max(label) + 1` over non-noise labels).
    pub n_clusters: usize,
    /// Number of noise points.
    pub n_noise: usize,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of *other* points within `epsilon` for a core point.
    pub fn new(epsilon: f32, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    fn validate(&self, data: &[Vec<f32>]) -> Result<()> {
        check_dimensions(data)?;
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::invalid("epsilon", "must be positive"));
        }
        if self.min_pts == 0 {
            return Err(Error::invalid("min_pts", "must be at least 1"));
        }
        Ok(())
    }

    /// Find all other points within epsilon.
    fn region_query(&self, data: &[Vec<f32>], point_idx: usize) -> Vec<usize> {
        let eps_sq = self.epsilon * self.epsilon;
        let point = &data[point_idx];
        data.iter()
            .enumerate()
            .filter(|(idx, other)| *idx != point_idx && squared_euclidean(point, other) <= eps_sq)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Fit and return labels with cluster and noise counts.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<DbscanFit> {
        self.validate(data)?;

        let n = data.len();
        let mut labels = vec![NOISE; n];
        let mut visited = vec![false; n];
        let mut cluster_id = 0;

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            let neighbors = self.region_query(data, point_idx);
            if neighbors.len() < self.min_pts {
                // Noise unless a later cluster reaches it.
                continue;
            }

            labels[point_idx] = cluster_id;
            let mut frontier = VecDeque::new();
            claim(&neighbors, &mut labels, cluster_id, &mut frontier);

            while let Some(q) = frontier.pop_front() {
                if visited[q] {
                    // Visited earlier as noise; now a border point.
                    continue;
                }
                visited[q] = true;

                let q_neighbors = self.region_query(data, q);
                if q_neighbors.len() >= self.min_pts {
                    claim(&q_neighbors, &mut labels, cluster_id, &mut frontier);
                }
            }

            cluster_id += 1;
        }

        let n_noise = labels.iter().filter(|&&l| l == NOISE).count();
        tracing::debug!(
            n_clusters = cluster_id,
            n_noise,
            epsilon = self.epsilon,
            min_pts = self.min_pts,
            "dbscan finished"
        );

        Ok(DbscanFit {
            labels,
            n_clusters: cluster_id,
            n_noise,
        })
    }
}

/// Give every unclaimed point in `candidates` to `cluster_id` and queue it.
fn claim(
    candidates: &[usize],
    labels: &mut [usize],
    cluster_id: usize,
    frontier: &mut VecDeque<usize>,
) {
    for &idx in candidates {
        if labels[idx] == NOISE {
            labels[idx] = cluster_id;
            frontier.push_back(idx);
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 3)
    }
}

impl Clustering for Dbscan {
    /// Labels in `[0, n_clusters)`, with [`NOISE`] for unclustered points.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    ///
    /// To get the actual number of clusters, use [`Dbscan::fit`].
    fn n_clusters(&self) -> usize {
        0
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: usize) -> bool {
        label == NOISE
    }
}

impl DbscanExt for Dbscan {
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        Ok(self
            .fit(data)?
            .labels
            .into_iter()
            .map(|l| if l == NOISE { None } else { Some(l) })
            .collect())
    }
}
