//! Agglomerative clustering over Euclidean distances.
//!
//! `kodama` merges the closest pair of clusters until one remains; the
//! resulting [`Dendrogram`] is then cut so that exactly `n_clusters` remain.
//!
//! | [`Linkage`] | Cluster distance | Tends to give |
//! |-------------|------------------|---------------|
//! | `Single` | closest pair | long chains |
//! | `Complete` | farthest pair | tight, round groups |
//! | `Average` (default) | mean over all pairs | something in between |
//! | `Ward` | growth in within-cluster variance | even-sized groups |
//!
//! No randomness is involved: the same input and linkage give the same tree.

use super::dendrogram::Dendrogram;
use super::traits::Clustering;
use crate::distance::{check_cluster_count, check_dimensions, euclidean_f64};
use crate::error::Result;
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};
use serde::{Deserialize, Serialize};

/// Rule for measuring the distance between two clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Distance of the closest cross pair.
    Single,
    /// Distance of the farthest cross pair.
    Complete,
    /// Mean distance over all cross pairs.
    #[default]
    Average,
    /// Increase in within-cluster variance.
    Ward,
}

impl From<Linkage> for KodamaMethod {
    fn from(linkage: Linkage) -> Self {
        match linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
            Linkage::Ward => KodamaMethod::Ward,
        }
    }
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Average,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Fit and return the full dendrogram.
    pub fn fit_dendrogram(&self, data: &[Vec<f32>]) -> Result<Dendrogram> {
        check_dimensions(data)?;
        let n = data.len();

        let mut dendro = Dendrogram::new(n);
        if n == 1 {
            return Ok(dendro);
        }

        // Condensed dissimilarity matrix (upper triangle, row-major), N-choose-2 long.
        let mut condensed = Vec::with_capacity((n * (n - 1)) / 2);
        for row in 0..(n - 1) {
            for col in (row + 1)..n {
                condensed.push(euclidean_f64(&data[row], &data[col]));
            }
        }

        let tree = kodama_linkage(&mut condensed, n, self.linkage.into());
        for step in tree.steps() {
            dendro.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }

        Ok(dendro)
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        check_cluster_count(self.n_clusters, data.len())?;
        let dendro = self.fit_dendrogram(data)?;
        dendro.cut_to_k(self.n_clusters)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_hierarchical_basic() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let hc = HierarchicalClustering::new(2);
        let labels = hc.fit_predict(&data).unwrap();

        assert_eq!(labels, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_hierarchical_all_linkages_separate_blobs() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.2, 0.0],
            vec![5.0, 5.0],
            vec![5.2, 5.0],
            vec![-9.0, 9.0],
            vec![-9.2, 9.0],
        ];

        for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average, Linkage::Ward] {
            let labels = HierarchicalClustering::new(3)
                .with_linkage(linkage)
                .fit_predict(&data)
                .unwrap();
            assert_eq!(labels, vec![0, 0, 1, 1, 2, 2], "linkage {linkage:?}");
        }
    }

    #[test]
    fn test_dendrogram() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 0.0]];

        let hc = HierarchicalClustering::new(2);
        let dendro = hc.fit_dendrogram(&data).unwrap();

        assert_eq!(dendro.n_items(), 3);
        assert_eq!(dendro.n_merges(), 2);
        let first = dendro.merges().next().unwrap();
        assert!((first.distance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchical_single_point() {
        let data = vec![vec![1.0, 2.0]];
        let labels = HierarchicalClustering::new(1).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn test_hierarchical_too_many_clusters() {
        let data = vec![vec![0.0], vec![1.0]];
        assert_eq!(
            HierarchicalClustering::new(3).fit_predict(&data),
            Err(Error::EmptyDataset {
                required: 3,
                available: 2
            })
        );
    }
}
