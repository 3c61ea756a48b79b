//! JSON entry point for wasm and FFI hosts.
//!
//! Missing values travel as `null` since JSON has no NaN.

use crate::cosine::SimilarityEngine;
use crate::error::Result;
use crate::matrix::matrix_from_rows;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Input for [`cosine_json`].
#[derive(Debug, Deserialize)]
pub struct CosineInput {
    pub matrix: Vec<Vec<Option<f64>>>,
    /// Compare `matrix` rows against these rows instead of against themselves
    #[serde(default)]
    pub other: Option<Vec<Vec<Option<f64>>>>,
}

/// Output of [`cosine_json`].
#[derive(Debug, Serialize)]
pub struct CosineOutput {
    pub similarity: Vec<Vec<f64>>,
    pub n_rows: usize,
    pub n_cols: usize,
}

/// JSON entry point: deserialize input, compute, serialize output.
///
/// Failures are reported as `{"error": "..."}`.
pub fn cosine_json(input: &str) -> String {
    let result = compute(input).and_then(|out| serde_json::to_string(&out).map_err(Into::into));
    match result {
        Ok(json) => json,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

fn compute(input: &str) -> Result<CosineOutput> {
    let parsed: CosineInput = serde_json::from_str(input)?;
    let engine = SimilarityEngine::new();

    let x = to_matrix(&parsed.matrix)?;
    let sim = match &parsed.other {
        Some(other) => engine.between(&x, &to_matrix(other)?)?,
        None => engine.pairwise(&x)?,
    };

    let (n_rows, n_cols) = sim.dim();
    Ok(CosineOutput {
        similarity: sim.outer_iter().map(|row| row.to_vec()).collect(),
        n_rows,
        n_cols,
    })
}

fn to_matrix(rows: &[Vec<Option<f64>>]) -> Result<Array2<f64>> {
    let rows: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| row.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect();
    matrix_from_rows(&rows)
}
