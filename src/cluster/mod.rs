//! Clustering algorithms for grouping embedded text items.
//!
//! Four independent algorithms, each with its own termination rule:
//!
//! | Algorithm | k | Termination | Noise |
//! |-----------|---|-------------|-------|
//! | [`Kmeans`] | given, or chosen by the elbow sweep | assignments stable / centroid shift < tol / `max_iter` | no |
//! | [`HierarchicalClustering`] | given | tree fully built, then cut | no |
//! | [`Dbscan`] | discovered | every point visited | yes ([`NOISE`]) |
//! | [`Gmm`] | given | fixed EM iterations (optional tol) | no |
//!
//! ## Hard vs Soft Clustering
//!
//! **Hard clustering** assigns each item to exactly one cluster.
//! **Soft clustering** ([`Gmm`]) gives each item a probability distribution
//! over clusters; the hard label is its most likely component.
//!
//! ## Choosing k for K-means
//!
//! [`select_k`] runs k-means for k = 1..=K and picks the elbow of the
//! dispersion curve (see [`elbow_point`]).
//!
//! ## Usage
//!
//! ```rust
//! use semgroup::cluster::{Clustering, Dbscan, Gmm, Kmeans, SoftClustering};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![10.0, 10.0],
//!     vec![0.1, 0.1],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(7).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[2]);
//! assert_ne!(labels[0], labels[1]);
//!
//! let probs = Gmm::new(2).with_seed(7).fit_predict_proba(&data).unwrap();
//! assert!((probs[0].iter().sum::<f64>() - 1.0).abs() < 1e-9);
//!
//! let fit = Dbscan::new(0.5, 1).fit(&data).unwrap();
//! assert_eq!(fit.n_clusters, 2);
//! ```

mod dbscan;
mod dendrogram;
mod elbow;
mod gmm;
mod hierarchical;
mod kmeans;
mod traits;

pub use dbscan::{Dbscan, DbscanExt, DbscanFit, NOISE};
pub use dendrogram::{Dendrogram, Merge};
pub use elbow::{elbow_point, select_k, wcss, wcss_curve, ElbowSelection, DEFAULT_MAX_CLUSTERS};
pub use gmm::{Gmm, GmmFit};
pub use hierarchical::{HierarchicalClustering, Linkage};
pub use kmeans::{Kmeans, KmeansFit, KmeansInit};
pub use traits::{Clustering, SoftClustering};
