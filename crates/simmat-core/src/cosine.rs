//! Row-wise cosine similarity.
//!
//! Rows are L2-normalized and multiplied against their own transpose. A row
//! that is all-zero once missing values are filled stays all-zero after
//! normalization, so it scores 0.0 against every row, itself included.

use crate::error::{Result, SimilarityError};
use crate::matrix::{fill_infinite, fill_missing, first_infinite};
use ndarray::{Array2, ArrayBase, ArrayViewMut1, Axis, Data, Ix2};

#[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
use ndarray::parallel::prelude::*;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum row count before row passes go parallel (`parallel` feature)
    pub parallel_threshold: usize,
    /// Fail on ±∞ entries instead of zero-filling them like NaN
    pub reject_non_finite: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 256,
            reject_non_finite: true,
        }
    }
}

/// Cosine similarity engine.
///
/// Holds configuration only; every call allocates its own working copy and
/// output, so one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    config: EngineConfig,
}

/// Sanitized, row-normalized working copy of an input matrix.
struct Normalized {
    rows: Array2<f64>,
    nonzero: Vec<bool>,
    imputed: usize,
}

impl SimilarityEngine {
    /// Create an engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pairwise cosine similarity between the rows of `m`.
    ///
    /// Returns an `(n_rows, n_rows)` matrix that is exactly symmetric, with
    /// entries in `[-1, 1]`, a diagonal of 1.0 for nonzero rows and 0.0 for
    /// rows that are zero after NaN filling. `m` is never modified.
    pub fn pairwise<S>(&self, m: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let (n_rows, n_cols) = m.dim();
        let normalized = self.prepare(m)?;

        let mut sim = normalized.rows.dot(&normalized.rows.t());

        for i in 0..n_rows {
            sim[[i, i]] = if normalized.nonzero[i] { 1.0 } else { 0.0 };
            for j in (i + 1)..n_rows {
                let v = sim[[i, j]].clamp(-1.0, 1.0);
                sim[[i, j]] = v;
                sim[[j, i]] = v;
            }
        }

        tracing::debug!(
            n_rows,
            n_cols,
            imputed = normalized.imputed,
            parallel = self.runs_parallel(n_rows),
            "computed pairwise cosine similarity"
        );

        Ok(sim)
    }

    /// Cosine similarity between each row of `x` and each row of `y`.
    ///
    /// Returns an `(x_rows, y_rows)` matrix. Both inputs must have the same
    /// number of columns.
    pub fn between<S, T>(
        &self,
        x: &ArrayBase<S, Ix2>,
        y: &ArrayBase<T, Ix2>,
    ) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
    {
        if x.ncols() != y.ncols() {
            return Err(SimilarityError::DimensionMismatch {
                left: x.ncols(),
                right: y.ncols(),
            });
        }

        let left = self.prepare(x)?;
        let right = self.prepare(y)?;

        let mut sim = left.rows.dot(&right.rows.t());
        sim.mapv_inplace(|v| v.clamp(-1.0, 1.0));

        tracing::debug!(
            x_rows = x.nrows(),
            y_rows = y.nrows(),
            n_cols = x.ncols(),
            imputed = left.imputed + right.imputed,
            "computed cross cosine similarity"
        );

        Ok(sim)
    }

    /// Copy, impute and row-normalize `m`.
    fn prepare<S>(&self, m: &ArrayBase<S, Ix2>) -> Result<Normalized>
    where
        S: Data<Elem = f64>,
    {
        if self.config.reject_non_finite {
            if let Some((row, col)) = first_infinite(m) {
                tracing::debug!(row, col, "rejecting non-finite input");
                return Err(SimilarityError::NonFinite { row, col });
            }
        }

        let mut rows = m.to_owned();
        let mut imputed = fill_missing(&mut rows);
        if !self.config.reject_non_finite {
            imputed += fill_infinite(&mut rows);
        }
        tracing::trace!(imputed, "filled missing values");

        let nonzero = self.normalize_rows(&mut rows);
        Ok(Normalized {
            rows,
            nonzero,
            imputed,
        })
    }

    fn runs_parallel(&self, n_rows: usize) -> bool {
        cfg!(all(not(target_arch = "wasm32"), feature = "parallel"))
            && n_rows >= self.config.parallel_threshold
    }

    /// Normalize rows - parallel on native, sequential on WASM
    #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
    fn normalize_rows(&self, rows: &mut Array2<f64>) -> Vec<bool> {
        if self.runs_parallel(rows.nrows()) {
            tracing::trace!(
                threads = rayon::current_num_threads(),
                "normalizing rows in parallel"
            );
            rows.axis_iter_mut(Axis(0))
                .into_par_iter()
                .map(normalize_row)
                .collect()
        } else {
            rows.axis_iter_mut(Axis(0)).map(normalize_row).collect()
        }
    }

    /// Sequential normalization (WASM or when parallel feature disabled)
    #[cfg(any(target_arch = "wasm32", not(feature = "parallel")))]
    fn normalize_rows(&self, rows: &mut Array2<f64>) -> Vec<bool> {
        rows.axis_iter_mut(Axis(0)).map(normalize_row).collect()
    }
}

/// Scale a row to unit L2 norm. Returns false for a zero row, which is left
/// as is.
fn normalize_row(mut row: ArrayViewMut1<f64>) -> bool {
    // Pre-scale by the largest magnitude so squaring cannot overflow.
    let max_abs = row.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 {
        return false;
    }
    row.mapv_inplace(|v| v / max_abs);

    let norm = row.dot(&row).sqrt();
    row.mapv_inplace(|v| v / norm);
    true
}

/// Pairwise cosine similarity between the rows of `m` with default settings.
///
/// NaN entries are treated as 0.0 on an internal copy; `m` is not modified.
pub fn cosine<S>(m: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
{
    SimilarityEngine::new().pairwise(m)
}

/// Cross cosine similarity between the rows of `x` and `y` with default settings.
pub fn cosine_between<S, T>(x: &ArrayBase<S, Ix2>, y: &ArrayBase<T, Ix2>) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    SimilarityEngine::new().between(x, y)
}
