//! simmat core
//!
//! Row-wise cosine similarity for dense numeric matrices with missing
//! values. NaN entries are imputed as 0.0 on an internal copy, rows are
//! L2-normalized, and the result is an exactly symmetric `n_rows x n_rows`
//! matrix. Rows that are all-zero after imputation score 0.0 against every
//! row, themselves included.
//!
//! # Features
//!
//! - `native` - Enable all native optimizations
//! - `parallel` - Parallel row normalization via rayon for large inputs
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use simmat_core::cosine;
//!
//! let m = array![[f64::NAN, 1.0], [1.0, 1.0]];
//! let s = cosine(&m).unwrap();
//! assert_eq!(s.dim(), (2, 2));
//! assert!((s[[0, 1]] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
//! assert!(m[[0, 0]].is_nan());
//! ```

pub mod cosine;
pub mod error;
pub mod json;
pub mod matrix;

// Re-export main types at crate root
pub use cosine::{cosine, cosine_between, EngineConfig, SimilarityEngine};
pub use error::{Result, SimilarityError};
pub use json::{cosine_json, CosineInput, CosineOutput};
pub use matrix::{fill_missing, matrix_from_flat, matrix_from_rows, parse_matrix, sanitized};
