//! Elbow-method selection of k for centroid clustering.
//!
//! For each candidate k the dataset is clustered with [`Kmeans`] and the
//! within-cluster dispersion is recorded: the sum, over all points, of the
//! Euclidean distance to their centroid. The resulting curve falls as k grows;
//! the elbow is where the improvement drops off most sharply.
//!
//! ```text
//! d[i] = wcss[i-1] - wcss[i]        (first differences)
//! c[i] = d[i-1]    - d[i]           (second differences)
//! k    = argmax c[i] + 1,  only if c[i] > 0, else k = 1
//! ```
//!
//! Curves with fewer than three values have no second difference and
//! select k = 1.

use super::kmeans::Kmeans;
use crate::error::{Error, Result};
use rand::Rng;

/// Default upper bound on the k sweep.
pub const DEFAULT_MAX_CLUSTERS: usize = 10;

/// Outcome of an elbow sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ElbowSelection {
    /// Selected cluster count.
    pub k: usize,
    /// Dispersion for k = 1..=curve.len().
    pub curve: Vec<f64>,
}

/// Within-cluster dispersion for one candidate k.
///
/// `template` supplies everything but k (iteration cap, seeding, restarts).
pub fn wcss<R: Rng + ?Sized>(
    data: &[Vec<f32>],
    k: usize,
    template: &Kmeans,
    rng: &mut R,
) -> Result<f64> {
    let fit = template.clone().with_k(k).fit_with_rng(data, rng)?;
    Ok(fit.dispersion(data))
}

/// Dispersion curve for k = 1..=min(max_k, n).
///
/// Every k gets a fresh k-means run; nothing carries over between runs.
pub fn wcss_curve<R: Rng + ?Sized>(
    data: &[Vec<f32>],
    max_k: usize,
    template: &Kmeans,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if max_k == 0 {
        return Err(Error::invalid("max_clusters", "must be at least 1"));
    }
    let upper = max_k.min(data.len());
    (1..=upper).map(|k| wcss(data, k, template, rng)).collect()
}

/// Pick k from a dispersion curve (index 0 holds k = 1).
///
/// ```rust
/// use semgroup::cluster::elbow_point;
///
/// assert_eq!(elbow_point(&[100.0, 90.0, 80.0, 20.0, 18.0, 17.0]), 4);
/// assert_eq!(elbow_point(&[5.0, 1.0]), 1);
/// ```
pub fn elbow_point(wcss: &[f64]) -> usize {
    let diffs: Vec<f64> = wcss.windows(2).map(|w| w[0] - w[1]).collect();

    let mut best_change = 0.0;
    let mut elbow = 1;
    for i in 1..diffs.len() {
        let change = diffs[i - 1] - diffs[i];
        if change > best_change {
            best_change = change;
            elbow = i + 1;
        }
    }
    elbow
}

/// Run the sweep and select k.
pub fn select_k<R: Rng + ?Sized>(
    data: &[Vec<f32>],
    max_k: usize,
    template: &Kmeans,
    rng: &mut R,
) -> Result<ElbowSelection> {
    let curve = wcss_curve(data, max_k, template, rng)?;
    let k = elbow_point(&curve);
    tracing::debug!(?curve, k, "elbow selection");
    Ok(ElbowSelection { k, curve })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::KmeansInit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Three tight blobs, far apart.
    fn three_blobs() -> Vec<Vec<f32>> {
        let centers = [(0.0, 0.0), (50.0, 0.0), (0.0, 50.0)];
        let offsets = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5), (0.5, 0.5)];
        centers
            .iter()
            .flat_map(|&(cx, cy)| offsets.iter().map(move |&(dx, dy)| vec![cx + dx, cy + dy]))
            .collect()
    }

    #[test]
    fn test_elbow_clear_drop() {
        assert_eq!(elbow_point(&[100.0, 90.0, 80.0, 20.0, 18.0, 17.0]), 4);
    }

    #[test]
    fn test_elbow_short_curves() {
        assert_eq!(elbow_point(&[]), 1);
        assert_eq!(elbow_point(&[42.0]), 1);
        assert_eq!(elbow_point(&[42.0, 1.0]), 1);
    }

    #[test]
    fn test_elbow_linear_curve_defaults_to_one() {
        // Constant first differences: no positive second difference.
        assert_eq!(elbow_point(&[50.0, 40.0, 30.0, 20.0, 10.0]), 1);
    }

    #[test]
    fn test_elbow_first_maximum_wins_ties() {
        // Second differences: [10, 0, 10] -> first maximum at i = 1.
        assert_eq!(elbow_point(&[100.0, 80.0, 70.0, 60.0, 60.0]), 2);
    }

    #[test]
    fn test_wcss_single_cluster_is_distance_to_mean() {
        let data = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let mut rng = StdRng::seed_from_u64(1);
        let w = wcss(&data, 1, &Kmeans::new(1), &mut rng).unwrap();
        assert!((w - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_wcss_curve_bounded_by_points() {
        let data = vec![vec![0.0], vec![1.0], vec![5.0]];
        let mut rng = StdRng::seed_from_u64(3);
        let curve = wcss_curve(&data, 10, &Kmeans::new(1), &mut rng).unwrap();
        assert_eq!(curve.len(), 3);
        // k = n: every point is its own centroid.
        assert!(curve[2].abs() < 1e-9);
    }

    #[test]
    fn test_wcss_curve_non_increasing_on_blobs() {
        let data = three_blobs();
        let template = Kmeans::new(1).with_init(KmeansInit::PlusPlus).with_n_init(5);
        let mut rng = StdRng::seed_from_u64(11);
        let curve = wcss_curve(&data, 3, &template, &mut rng).unwrap();

        for w in curve.windows(2) {
            assert!(w[1] <= w[0] + 1e-9, "curve not monotone: {curve:?}");
        }
    }

    #[test]
    fn test_random_sample_restarts_keep_curve_monotone() {
        let data = three_blobs();
        let template = Kmeans::new(1).with_n_init(10);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = select_k(&data, 4, &template, &mut rng).unwrap();
            let curve = &selection.curve;
            for w in curve.windows(2) {
                assert!(w[1] < w[0], "seed {seed}: curve not decreasing: {curve:?}");
            }
            assert_eq!(selection.k, 3, "seed {seed}: curve {curve:?}");
        }
    }

    #[test]
    fn test_select_k_finds_three_blobs() {
        let data = three_blobs();
        let template = Kmeans::new(1).with_init(KmeansInit::PlusPlus).with_n_init(5);
        let mut rng = StdRng::seed_from_u64(2024);
        let selection = select_k(&data, 6, &template, &mut rng).unwrap();
        assert_eq!(selection.curve.len(), 6);
        assert_eq!(selection.k, 3, "curve: {:?}", selection.curve);
    }

    #[test]
    fn test_wcss_curve_rejects_zero_bound() {
        let data = three_blobs();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(wcss_curve(&data, 0, &Kmeans::new(1), &mut rng).is_err());
    }
}
