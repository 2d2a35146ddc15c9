//! Principal eigenvector via the Power Method.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnalysisError, ComparisonMatrix};

/// Iteration budget and stopping tolerance for the Power Method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerMethodConfig {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for PowerMethodConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-10,
        }
    }
}

/// Output of one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenResult {
    /// Priority vector, L1-normalised.
    pub weights: Vec<f64>,
    /// Estimate of the principal eigenvalue λmax.
    pub eigenvalue: f64,
    pub iterations: u32,
    pub converged: bool,
    /// max |(A·v)_i − λ v_i|
    pub residual: f64,
}

/// Power Method solver for positive reciprocal matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct EigenSolver {
    config: PowerMethodConfig,
}

impl EigenSolver {
    pub fn new(config: PowerMethodConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PowerMethodConfig {
        &self.config
    }

    /// Computes the priority vector and λmax of `matrix`.
    ///
    /// # Algorithm
    /// Start from (1/n, …, 1/n). Repeat v ← A·v / ‖A·v‖₁ until the largest
    /// per-entry change drops below the tolerance or the budget runs out.
    /// λmax is the mean of (A·v)_i / v_i over entries with v_i > 0.
    ///
    /// # Edge Cases
    /// - n = 0: `InsufficientElements`
    /// - n = 1: weights [1], λ = 1, no iteration
    /// - n = 2: exact closed form (a/(1+a), 1/(1+a)), λ = 2
    /// - Budget exhausted: best estimate returned with `converged = false`
    ///
    /// # Errors
    /// `ZeroSumNormalization` or `NonFinite` when an iterate degenerates.
    pub fn solve(&self, matrix: &ComparisonMatrix) -> Result<EigenResult, AnalysisError> {
        let n = matrix.size();
        match n {
            0 => return Err(AnalysisError::InsufficientElements { actual: 0 }),
            1 => return Ok(Self::exact(vec![1.0], 1.0)),
            2 => {
                let a = matrix.get(0, 1);
                let weights = normalize(vec![a, 1.0])?;
                return Ok(Self::exact(weights, 2.0));
            }
            _ => {}
        }

        let mut weights = vec![1.0 / n as f64; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;
            let next = normalize(matrix.multiply(&weights))?;
            let change = next
                .iter()
                .zip(&weights)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            weights = next;
            if change < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let product = matrix.multiply(&weights);
        let eigenvalue = estimate_eigenvalue(&product, &weights)?;
        let residual = product
            .iter()
            .zip(&weights)
            .map(|(av, v)| (av - eigenvalue * v).abs())
            .fold(0.0, f64::max);

        debug!(
            size = n,
            iterations,
            converged,
            eigenvalue,
            residual,
            "Power method finished"
        );

        Ok(EigenResult {
            weights,
            eigenvalue,
            iterations,
            converged,
            residual,
        })
    }

    fn exact(weights: Vec<f64>, eigenvalue: f64) -> EigenResult {
        EigenResult {
            weights,
            eigenvalue,
            iterations: 0,
            converged: true,
            residual: 0.0,
        }
    }
}

/// L1-normalises a non-negative vector.
pub(crate) fn normalize(vector: Vec<f64>) -> Result<Vec<f64>, AnalysisError> {
    let sum: f64 = vector.iter().sum();
    if !sum.is_finite() {
        return Err(AnalysisError::NonFinite);
    }
    if sum <= 0.0 {
        return Err(AnalysisError::ZeroSumNormalization(sum));
    }
    Ok(vector.into_iter().map(|v| v / sum).collect())
}

fn estimate_eigenvalue(product: &[f64], weights: &[f64]) -> Result<f64, AnalysisError> {
    let ratios: Vec<f64> = product
        .iter()
        .zip(weights)
        .filter(|(_, v)| **v > 0.0)
        .map(|(av, v)| av / v)
        .collect();
    if ratios.is_empty() {
        return Err(AnalysisError::ZeroSumNormalization(0.0));
    }
    let eigenvalue = ratios.iter().sum::<f64>() / ratios.len() as f64;
    if eigenvalue.is_finite() {
        Ok(eigenvalue)
    } else {
        Err(AnalysisError::NonFinite)
    }
}
