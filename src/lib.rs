//! # semgroup
//!
//! Groups short text items into semantically coherent clusters, given one
//! embedding vector per item.
//!
//! The crate consumes ready-made embeddings and never talks to an embedding
//! provider or the filesystem itself. Four algorithms are available:
//!
//! - k-means, with k picked by the elbow method ([`cluster::select_k`])
//! - hierarchical agglomerative clustering (`kodama`, average linkage by default)
//! - DBSCAN, which may leave points unclustered
//! - a diagonal-covariance Gaussian mixture fitted by EM
//!
//! ```rust
//! use semgroup::{Algorithm, Dataset, Engine, EngineConfig};
//!
//! let dataset = Dataset::new(
//!     vec![vec![0.0, 0.1], vec![5.0, 5.1], vec![0.1, 0.0], vec![5.1, 5.0]],
//!     vec![
//!         "sunny".to_string(),
//!         "pasta".to_string(),
//!         "bright".to_string(),
//!         "cake".to_string(),
//!     ],
//! )
//! .unwrap();
//!
//! let engine = Engine::new(EngineConfig { seed: Some(1), ..Default::default() });
//! let groups = engine.cluster(&dataset, &Algorithm::gmm(2, 100).unwrap()).unwrap();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups.iter().map(|g| g.members.len()).sum::<usize>(), 4);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod dataset;
pub mod distance;
pub mod engine;
/// Error types used across `semgroup`.
pub mod error;
pub mod groups;

pub use cluster::{
    Clustering, Dbscan, Gmm, HierarchicalClustering, Kmeans, Linkage, SoftClustering, NOISE,
};
pub use dataset::{Dataset, EmbeddedText};
pub use engine::{
    cluster, Algorithm, AlgorithmKind, AlgorithmParams, Engine, EngineConfig, Partition,
};
pub use error::{Error, Result};
pub use groups::{assemble_groups, Group, UNCLUSTERED};
