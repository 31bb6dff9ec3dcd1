//! Euclidean distance and dataset shape checks.
//!
//! Every algorithm in [`crate::cluster`] measures points with plain Euclidean
//! distance. The checked [`euclidean`] is the public entry point; the
//! algorithms call [`squared_euclidean`] in their inner loops after the whole
//! dataset has been validated once by [`check_dimensions`].

use crate::error::{Error, Result};

/// Euclidean distance between two points of equal dimension.
///
/// ```rust
/// let d = semgroup::distance::euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
/// assert!((d - 5.0).abs() < 1e-6);
/// ```
pub fn euclidean(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(squared_euclidean(a, b).sqrt())
}

/// Squared Euclidean distance. Callers guarantee equal lengths.
#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance accumulated in `f64`.
#[inline]
pub(crate) fn euclidean_f64(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Validate a dataset and return its dimension.
///
/// Fails on an empty dataset, on points whose length differs from the first
/// point, and on non-finite coordinates.
pub fn check_dimensions(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyDataset {
        required: 1,
        available: 0,
    })?;
    let d = first.len();
    if d == 0 {
        return Err(Error::invalid("dataset", "points must have at least one dimension"));
    }
    for point in data {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(Error::invalid("dataset", "coordinates must be finite"));
        }
    }
    Ok(d)
}

/// Validate a requested cluster count against the dataset size.
pub(crate) fn check_cluster_count(k: usize, n: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::invalid("k", "cluster count must be at least 1"));
    }
    if k > n {
        return Err(Error::EmptyDataset {
            required: k,
            available: n,
        });
    }
    Ok(())
}
