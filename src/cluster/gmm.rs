//! Gaussian Mixture Model clustering with diagonal covariance.
//!
//! GMM gives **soft** assignments: each point gets a probability
//! ("responsibility") for every component.
//!
//! # The Probabilistic Model
//!
//! ```text
//! P(x) = Σₖ πₖ × N(x | μₖ, diag(σ²ₖ))
//! ```
//!
//! Where πₖ is the mixing weight, μₖ the mean and σ²ₖ the per-dimension
//! variance of component k. Covariance is axis-aligned: no correlations
//! between dimensions are modelled.
//!
//! # The EM Algorithm
//!
//! **E-step**: responsibilities
//! ```text
//! γₙₖ = πₖ N(xₙ | μₖ, σ²ₖ) / Σⱼ πⱼ N(xₙ | μⱼ, σ²ⱼ)
//! ```
//!
//! **M-step**, with Nₖ = Σₙ γₙₖ:
//! - πₖ = Nₖ / N
//! - μₖ = Σₙ γₙₖ xₙ / Nₖ
//! - σ²ₖ = Σₙ γₙₖ (xₙ - μₖ)² / Nₖ + reg_covar
//!
//! Densities are evaluated in log space and normalized with log-sum-exp;
//! raw Gaussian densities underflow to zero in embedding-sized dimensions.
//!
//! # Initialization
//!
//! Means start at the first k points, variances at random values in
//! `[0.5, 1.5)`, weights at 1/k. The random source is injectable through
//! [`Gmm::fit_with_rng`].
//!
//! # Degenerate Points
//!
//! A point whose density is zero (or not finite) under every component gets
//! uniform responsibilities instead of aborting the fit. Only a fit where
//! every point ends degenerate is reported as an error.

use super::traits::{Clustering, SoftClustering};
use crate::distance::{check_cluster_count, check_dimensions};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis, Slice};
use rand::prelude::*;

/// Responsibility mass below which a component keeps its previous parameters.
const MIN_COMPONENT_MASS: f64 = 1e-10;

/// Gaussian Mixture Model clustering.
#[derive(Debug, Clone)]
pub struct Gmm {
    /// Number of components (clusters).
    n_components: usize,
    /// EM iterations.
    max_iter: usize,
    /// Early stop on mean log-likelihood change; `None` runs all iterations.
    tol: Option<f64>,
    /// Random seed.
    seed: Option<u64>,
    /// Added to every variance estimate.
    reg_covar: f64,
}

/// Result of a GMM fit.
#[derive(Debug, Clone)]
pub struct GmmFit {
    /// Hard assignment: component with the highest responsibility.
    pub labels: Vec<usize>,
    /// Responsibilities, `n × k`, rows sum to 1.
    pub responsibilities: Array2<f64>,
    /// Component means, `k × d`.
    pub means: Array2<f64>,
    /// Per-dimension variances, `k × d`.
    pub variances: Array2<f64>,
    /// Mixing weights, sum to 1.
    pub weights: Array1<f64>,
    /// Mean log-likelihood per non-degenerate point under the final parameters.
    pub log_likelihood: f64,
    /// EM iterations run.
    pub n_iter: usize,
    /// Points that received uniform responsibilities in the final E-step.
    pub degenerate_points: usize,
}

impl Gmm {
    /// Create a new GMM with `n_components` components.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            max_iter: 100,
            tol: None,
            seed: None,
            reg_covar: 1e-6,
        }
    }

    /// Set number of components.
    pub fn with_n_components(mut self, n: usize) -> Self {
        self.n_components = n;
        self
    }

    /// Set the number of EM iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop early once the mean log-likelihood changes by less than `tol`.
    pub fn with_tol(mut self, tol: Option<f64>) -> Self {
        self.tol = tol;
        self
    }

    /// Set the variance regularization.
    pub fn with_reg_covar(mut self, reg_covar: f64) -> Self {
        self.reg_covar = reg_covar;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit using the configured seed, or a thread-local RNG when unseeded.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<GmmFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit drawing the initial variances from `rng`.
    pub fn fit_with_rng<R: Rng + ?Sized>(&self, data: &[Vec<f32>], rng: &mut R) -> Result<GmmFit> {
        let data_arr = self.validate(data)?;
        let (n, d) = data_arr.dim();
        let k = self.n_components;

        let mut means = initial_means(&data_arr, k);
        let mut variances = Array2::from_shape_fn((k, d), |_| rng.random_range(0.5..1.5));
        let mut weights = Array1::from_elem(k, 1.0 / k as f64);
        let mut resp = Array2::zeros((n, k));

        let mut prev_ll: Option<f64> = None;
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;

            let (ll, degenerate) = e_step(&data_arr, &means, &variances, &weights, &mut resp);
            if degenerate > 0 {
                tracing::warn!(iter, degenerate, "gmm reseeded degenerate responsibilities");
            }

            self.m_step(&data_arr, &resp, &mut means, &mut variances, &mut weights);

            if let (Some(tol), Some(prev)) = (self.tol, prev_ll) {
                if (ll - prev).abs() < tol {
                    tracing::debug!(iter, log_likelihood = ll, "gmm converged");
                    break;
                }
            }
            prev_ll = Some(ll);
        }

        // Final assignment under the final parameters.
        let (log_likelihood, degenerate_points) =
            e_step(&data_arr, &means, &variances, &weights, &mut resp);
        if degenerate_points == n {
            return Err(Error::NumericInstability { degenerate_points });
        }

        let labels = resp.rows().into_iter().map(argmax).collect();
        tracing::debug!(k, n_iter, log_likelihood, degenerate_points, "gmm finished");

        Ok(GmmFit {
            labels,
            responsibilities: resp,
            means,
            variances,
            weights,
            log_likelihood,
            n_iter,
            degenerate_points,
        })
    }

    fn validate(&self, data: &[Vec<f32>]) -> Result<Array2<f64>> {
        let d = check_dimensions(data)?;
        check_cluster_count(self.n_components, data.len())?;
        if self.max_iter == 0 {
            return Err(Error::invalid("iterations", "must be at least 1"));
        }
        if !(self.reg_covar.is_finite() && self.reg_covar > 0.0) {
            return Err(Error::invalid("reg_covar", "must be positive"));
        }
        if let Some(tol) = self.tol {
            if tol.is_nan() || tol < 0.0 {
                return Err(Error::invalid("tol", "must be non-negative"));
            }
        }

        let flat: Vec<f64> = data.iter().flatten().map(|&x| x as f64).collect();
        Array2::from_shape_vec((data.len(), d), flat)
            .map_err(|_| Error::invalid("dataset", "could not be laid out as a matrix"))
    }

    fn m_step(
        &self,
        data: &Array2<f64>,
        resp: &Array2<f64>,
        means: &mut Array2<f64>,
        variances: &mut Array2<f64>,
        weights: &mut Array1<f64>,
    ) {
        let n = data.nrows() as f64;

        for c in 0..self.n_components {
            let r = resp.column(c);
            let mass = r.sum();
            weights[c] = mass / n;

            if mass <= MIN_COMPONENT_MASS {
                // Keep the previous mean and variance.
                continue;
            }

            let mean = r.dot(data) / mass;
            let mut var = Array1::<f64>::zeros(data.ncols());
            for (point, &g) in data.rows().into_iter().zip(r.iter()) {
                let diff = &point - &mean;
                var.scaled_add(g, &(&diff * &diff));
            }
            var.mapv_inplace(|v| v / mass + self.reg_covar);

            means.row_mut(c).assign(&mean);
            variances.row_mut(c).assign(&var);
        }
    }
}

/// The first `k` rows of `data`.
fn initial_means(data: &Array2<f64>, k: usize) -> Array2<f64> {
    data.slice_axis(Axis(0), Slice::from(..k)).to_owned()
}

/// Log density of `point` under a diagonal Gaussian.
fn log_gaussian(point: ArrayView1<'_, f64>, mean: ArrayView1<'_, f64>, var: ArrayView1<'_, f64>) -> f64 {
    let d = point.len() as f64;
    let mut log_prob = -0.5 * d * (2.0 * std::f64::consts::PI).ln();
    for ((x, m), v) in point.iter().zip(mean.iter()).zip(var.iter()) {
        let diff = x - m;
        log_prob -= 0.5 * v.ln();
        log_prob -= 0.5 * diff * diff / v;
    }
    log_prob
}

/// Log-sum-exp for numerical stability.
fn logsumexp(values: &[f64]) -> f64 {
    let max_val = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max_val.is_finite() {
        return max_val;
    }
    max_val + values.iter().map(|&v| (v - max_val).exp()).sum::<f64>().ln()
}

/// Turn per-component log densities into responsibilities, in place.
///
/// Returns the log of the total density, or `None` when it is zero or not
/// finite; the responsibilities are then uniform.
fn normalize_log_probs(log_probs: &mut [f64]) -> Option<f64> {
    let log_sum = logsumexp(log_probs);
    if log_sum.is_finite() {
        for lp in log_probs.iter_mut() {
            *lp = (*lp - log_sum).exp();
        }
        Some(log_sum)
    } else {
        let uniform = 1.0 / log_probs.len() as f64;
        log_probs.fill(uniform);
        None
    }
}

/// Fill `resp`; returns (mean log-likelihood, degenerate point count).
fn e_step(
    data: &Array2<f64>,
    means: &Array2<f64>,
    variances: &Array2<f64>,
    weights: &Array1<f64>,
    resp: &mut Array2<f64>,
) -> (f64, usize) {
    let k = means.nrows();
    let mut log_probs = vec![0.0; k];
    let mut total = 0.0;
    let mut counted = 0usize;
    let mut degenerate = 0usize;

    for (point, mut row) in data.rows().into_iter().zip(resp.rows_mut()) {
        for (c, lp) in log_probs.iter_mut().enumerate() {
            *lp = weights[c].ln() + log_gaussian(point, means.row(c), variances.row(c));
        }
        match normalize_log_probs(&mut log_probs) {
            Some(ll) => {
                total += ll;
                counted += 1;
            }
            None => degenerate += 1,
        }
        for (r, &p) in row.iter_mut().zip(&log_probs) {
            *r = p;
        }
    }

    let mean_ll = if counted > 0 {
        total / counted as f64
    } else {
        f64::NEG_INFINITY
    };
    (mean_ll, degenerate)
}

fn argmax(row: ArrayView1<'_, f64>) -> usize {
    row.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

impl Clustering for Gmm {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.n_components
    }
}

impl SoftClustering for Gmm {
    fn fit_predict_proba(&self, data: &[Vec<f32>]) -> Result<Vec<Vec<f64>>> {
        let fit = self.fit(data)?;
        Ok(fit
            .responsibilities
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect())
    }
}
