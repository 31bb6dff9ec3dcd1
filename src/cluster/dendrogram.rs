//! Merge tree produced by agglomerative clustering.
//!
//! Cluster ids follow the SciPy convention: leaves are `0..n`, and the cluster
//! created by merge `i` gets id `n + i`.

use crate::error::{Error, Result};

/// A dendrogram representing hierarchical cluster merges.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged
/// - The distance at which they merged
/// - The size of the resulting cluster
#[derive(Debug, Clone)]
pub struct Dendrogram {
    /// Merge history in merge order.
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (id).
    pub cluster_a: usize,
    /// Second cluster being merged (id).
    pub cluster_b: usize,
    /// Distance/dissimilarity at which merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create a new dendrogram for n items.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Cluster assignments with exactly `k` clusters.
    ///
    /// Applies the first `n - k` merges. Clusters are numbered in order of
    /// their first member, so the result does not depend on merge ids.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 {
            return Err(Error::invalid("target_clusters", "must be at least 1"));
        }
        if k > self.n_items {
            return Err(Error::EmptyDataset {
                required: k,
                available: self.n_items,
            });
        }

        let n_merges = self.n_items - k;
        if n_merges > self.merges.len() {
            return Err(Error::invalid(
                "target_clusters",
                "dendrogram has too few merges for this cut",
            ));
        }

        // parent[id] = cluster that absorbed `id`; roots point to themselves.
        let total = self.n_items + n_merges;
        let mut parent: Vec<usize> = (0..total).collect();
        for (i, merge) in self.merges.iter().take(n_merges).enumerate() {
            let id = self.n_items + i;
            if merge.cluster_a >= id || merge.cluster_b >= id {
                return Err(Error::invalid("dendrogram", "merge refers to a later cluster"));
            }
            parent[merge.cluster_a] = id;
            parent[merge.cluster_b] = id;
        }

        let root = |mut id: usize| {
            while parent[id] != id {
                id = parent[id];
            }
            id
        };

        let mut renumber: Vec<Option<usize>> = vec![None; total];
        let mut next = 0;
        let labels = (0..self.n_items)
            .map(|leaf| {
                let r = root(leaf);
                *renumber[r].get_or_insert_with(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();

        Ok(labels)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }
}
