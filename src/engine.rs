//! Algorithm selection and the `cluster` entry point.
//!
//! An [`Algorithm`] is a closed set of variants, each carrying only its own
//! parameters. The [`Engine`] validates the dataset and the parameters,
//! runs the chosen algorithm with a fresh random source, and hands the
//! assignment vector to the label assembler.
//!
//! ```rust
//! use semgroup::{cluster, Algorithm};
//!
//! let points = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.0],
//!     vec![9.0, 9.0],
//!     vec![9.1, 9.0],
//! ];
//! let labels = ["calm sea", "still water", "loud city", "busy street"];
//!
//! let groups = cluster(&points, &labels, &Algorithm::hac(2).unwrap()).unwrap();
//! assert_eq!(groups[0].members, vec!["calm sea", "still water"]);
//! assert_eq!(groups[1].members, vec!["loud city", "busy street"]);
//! ```

use crate::cluster::{
    select_k, Clustering, Dbscan, Gmm, HierarchicalClustering, Kmeans, KmeansInit, Linkage,
    DEFAULT_MAX_CLUSTERS,
};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::groups::{assemble_groups, Group};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Algorithm selector without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// K-means with elbow selection of k.
    Kmeans,
    /// Hierarchical agglomerative clustering.
    Hac,
    /// Density-based clustering.
    Dbscan,
    /// Gaussian mixture model.
    Gmm,
}

impl AlgorithmKind {
    /// Selector string.
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmKind::Kmeans => "kmeans",
            AlgorithmKind::Hac => "hac",
            AlgorithmKind::Dbscan => "dbscan",
            AlgorithmKind::Gmm => "gmm",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmeans" => Ok(AlgorithmKind::Kmeans),
            "hac" => Ok(AlgorithmKind::Hac),
            "dbscan" => Ok(AlgorithmKind::Dbscan),
            "gmm" => Ok(AlgorithmKind::Gmm),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Flat parameter bag, for callers that pick the algorithm by name.
///
/// Only the fields belonging to the selected algorithm are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmParams {
    /// K-means: upper bound of the elbow sweep.
    pub max_clusters: usize,
    /// HAC: number of clusters to cut the tree into.
    pub target_clusters: usize,
    /// DBSCAN: neighborhood radius.
    pub epsilon: f32,
    /// DBSCAN: minimum neighborhood size for a core point.
    pub min_points: usize,
    /// GMM: number of components.
    pub clusters: usize,
    /// GMM: EM iterations.
    pub iterations: usize,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            max_clusters: DEFAULT_MAX_CLUSTERS,
            target_clusters: 4,
            epsilon: 0.5,
            min_points: 3,
            clusters: 4,
            iterations: 100,
        }
    }
}

/// A clustering algorithm together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum Algorithm {
    /// K-means; k chosen by the elbow method from 1..=max_clusters.
    Kmeans {
        /// Upper bound of the sweep (further capped at the number of points).
        max_clusters: usize,
    },
    /// Hierarchical agglomerative clustering cut at `target_clusters`.
    Hac {
        /// Number of clusters.
        target_clusters: usize,
    },
    /// Density-based clustering.
    Dbscan {
        /// Neighborhood radius.
        epsilon: f32,
        /// Minimum neighborhood size for a core point.
        min_points: usize,
    },
    /// Diagonal Gaussian mixture model.
    Gmm {
        /// Number of components.
        clusters: usize,
        /// EM iterations.
        iterations: usize,
    },
}

impl Algorithm {
    /// K-means with elbow selection.
    pub fn kmeans(max_clusters: usize) -> Result<Self> {
        let algorithm = Algorithm::Kmeans { max_clusters };
        algorithm.validate()?;
        Ok(algorithm)
    }

    /// Hierarchical clustering.
    pub fn hac(target_clusters: usize) -> Result<Self> {
        let algorithm = Algorithm::Hac { target_clusters };
        algorithm.validate()?;
        Ok(algorithm)
    }

    /// Density-based clustering.
    pub fn dbscan(epsilon: f32, min_points: usize) -> Result<Self> {
        let algorithm = Algorithm::Dbscan {
            epsilon,
            min_points,
        };
        algorithm.validate()?;
        Ok(algorithm)
    }

    /// Gaussian mixture model.
    pub fn gmm(clusters: usize, iterations: usize) -> Result<Self> {
        let algorithm = Algorithm::Gmm {
            clusters,
            iterations,
        };
        algorithm.validate()?;
        Ok(algorithm)
    }

    /// Pick the variant for `kind`, taking its fields from `params`.
    pub fn from_kind(kind: AlgorithmKind, params: &AlgorithmParams) -> Result<Self> {
        match kind {
            AlgorithmKind::Kmeans => Self::kmeans(params.max_clusters),
            AlgorithmKind::Hac => Self::hac(params.target_clusters),
            AlgorithmKind::Dbscan => Self::dbscan(params.epsilon, params.min_points),
            AlgorithmKind::Gmm => Self::gmm(params.clusters, params.iterations),
        }
    }

    /// Parse a selector string and build the variant from `params`.
    pub fn from_selector(selector: &str, params: &AlgorithmParams) -> Result<Self> {
        Self::from_kind(selector.parse()?, params)
    }

    /// The selector of this variant.
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Algorithm::Kmeans { .. } => AlgorithmKind::Kmeans,
            Algorithm::Hac { .. } => AlgorithmKind::Hac,
            Algorithm::Dbscan { .. } => AlgorithmKind::Dbscan,
            Algorithm::Gmm { .. } => AlgorithmKind::Gmm,
        }
    }

    /// Check the parameters on their own (not against a dataset).
    pub fn validate(&self) -> Result<()> {
        match *self {
            Algorithm::Kmeans { max_clusters } if max_clusters == 0 => {
                Err(Error::invalid("max_clusters", "must be at least 1"))
            }
            Algorithm::Hac { target_clusters } if target_clusters == 0 => {
                Err(Error::invalid("target_clusters", "must be at least 1"))
            }
            Algorithm::Dbscan { epsilon, .. } if !(epsilon.is_finite() && epsilon > 0.0) => {
                Err(Error::invalid("epsilon", "must be positive"))
            }
            Algorithm::Dbscan { min_points, .. } if min_points == 0 => {
                Err(Error::invalid("min_points", "must be at least 1"))
            }
            Algorithm::Gmm { clusters, .. } if clusters == 0 => {
                Err(Error::invalid("clusters", "must be at least 1"))
            }
            Algorithm::Gmm { iterations, .. } if iterations == 0 => {
                Err(Error::invalid("iterations", "must be at least 1"))
            }
            _ => Ok(()),
        }
    }

    /// Fewest points this algorithm can run on.
    fn required_points(&self) -> usize {
        match *self {
            Algorithm::Kmeans { .. } | Algorithm::Dbscan { .. } => 1,
            Algorithm::Hac { target_clusters } => target_clusters,
            Algorithm::Gmm { clusters, .. } => clusters,
        }
    }
}

/// Knobs shared by all runs of an [`Engine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for all randomness; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// K-means iteration cap.
    pub kmeans_max_iter: usize,
    /// K-means tolerance on total squared centroid shift.
    pub kmeans_tol: f64,
    /// K-means seeding policy.
    pub kmeans_init: KmeansInit,
    /// K-means restarts per k; the lowest dispersion wins.
    pub kmeans_n_init: usize,
    /// HAC linkage rule.
    pub linkage: Linkage,
    /// GMM early-stop tolerance; `None` runs every iteration.
    pub gmm_tol: Option<f64>,
    /// GMM variance regularization.
    pub gmm_reg_covar: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            kmeans_max_iter: 300,
            kmeans_tol: 1e-4,
            kmeans_init: KmeansInit::RandomSample,
            kmeans_n_init: 10,
            linkage: Linkage::Average,
            gmm_tol: None,
            gmm_reg_covar: 1e-6,
        }
    }
}

/// Assignment vector with its cluster count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Cluster index per point, or [`NOISE`](crate::cluster::NOISE).
    pub labels: Vec<usize>,
    /// Number of clusters; every non-noise label is below this.
    pub n_clusters: usize,
    /// Number of noise points (DBSCAN only).
    pub n_noise: usize,
}

/// Runs clustering calls. Holds configuration only; no state survives a call.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cluster `dataset` and return the assignment vector.
    pub fn partition(&self, dataset: &Dataset, algorithm: &Algorithm) -> Result<Partition> {
        algorithm.validate()?;
        let required = algorithm.required_points();
        if required > dataset.len() {
            return Err(Error::EmptyDataset {
                required,
                available: dataset.len(),
            });
        }

        let data = dataset.points();
        let mut rng: Box<dyn RngCore> = match self.config.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(StdRng::from_os_rng()),
        };

        let partition = match *algorithm {
            Algorithm::Kmeans { max_clusters } => {
                let template = Kmeans::new(1)
                    .with_max_iter(self.config.kmeans_max_iter)
                    .with_tol(self.config.kmeans_tol)
                    .with_init(self.config.kmeans_init)
                    .with_n_init(self.config.kmeans_n_init);
                let selection = select_k(data, max_clusters, &template, &mut rng)?;
                let fit = template.with_k(selection.k).fit_with_rng(data, &mut rng)?;
                Partition {
                    labels: fit.labels,
                    n_clusters: selection.k,
                    n_noise: 0,
                }
            }
            Algorithm::Hac { target_clusters } => {
                let labels = HierarchicalClustering::new(target_clusters)
                    .with_linkage(self.config.linkage)
                    .fit_predict(data)?;
                Partition {
                    labels,
                    n_clusters: target_clusters,
                    n_noise: 0,
                }
            }
            Algorithm::Dbscan {
                epsilon,
                min_points,
            } => {
                let fit = Dbscan::new(epsilon, min_points).fit(data)?;
                Partition {
                    labels: fit.labels,
                    n_clusters: fit.n_clusters,
                    n_noise: fit.n_noise,
                }
            }
            Algorithm::Gmm {
                clusters,
                iterations,
            } => {
                let fit = Gmm::new(clusters)
                    .with_max_iter(iterations)
                    .with_tol(self.config.gmm_tol)
                    .with_reg_covar(self.config.gmm_reg_covar)
                    .fit_with_rng(data, &mut rng)?;
                Partition {
                    labels: fit.labels,
                    n_clusters: clusters,
                    n_noise: 0,
                }
            }
        };

        Ok(partition)
    }

    /// Cluster `dataset` and return named groups of its labels.
    pub fn cluster(&self, dataset: &Dataset, algorithm: &Algorithm) -> Result<Vec<Group>> {
        let partition = self.partition(dataset, algorithm)?;
        let groups = assemble_groups(&partition.labels, dataset.labels(), partition.n_clusters)?;
        tracing::info!(
            algorithm = %algorithm.kind(),
            points = dataset.len(),
            clusters = partition.n_clusters,
            noise = partition.n_noise,
            "clustered dataset"
        );
        Ok(groups)
    }
}

/// Cluster parallel point and label sequences with the default configuration.
pub fn cluster<S: AsRef<str>>(
    points: &[Vec<f32>],
    labels: &[S],
    algorithm: &Algorithm,
) -> Result<Vec<Group>> {
    let labels = labels.iter().map(|l| l.as_ref().to_string()).collect();
    let dataset = Dataset::new(points.to_vec(), labels)?;
    Engine::default().cluster(&dataset, algorithm)
}
