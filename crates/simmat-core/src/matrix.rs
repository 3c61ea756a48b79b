//! Input coercion and missing-value imputation.
//!
//! Everything downstream works on a rectangular `Array2<f64>`. The helpers
//! here build one from nested rows, a flat row-major buffer, or textual
//! cells, and reject input that cannot be read as a rectangular numeric
//! matrix.

use crate::error::{Result, SimilarityError};
use ndarray::{Array2, ArrayBase, Data, Ix2};

/// Build a matrix from nested rows.
///
/// All rows must have the length of the first row. Zero rows yield a
/// `(0, 0)` matrix.
pub fn matrix_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Array2<f64>> {
    let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
    let mut data = Vec::with_capacity(rows.len() * n_cols);

    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != n_cols {
            tracing::debug!(row = i, expected = n_cols, found = row.len(), "ragged input");
            return Err(SimilarityError::Ragged {
                row: i,
                expected: n_cols,
                found: row.len(),
            });
        }
        data.extend_from_slice(row);
    }

    matrix_from_flat(&data, rows.len(), n_cols)
}

/// Build a matrix from a flat row-major buffer of `n_rows * n_cols` values.
pub fn matrix_from_flat(data: &[f64], n_rows: usize, n_cols: usize) -> Result<Array2<f64>> {
    let shape_err = || SimilarityError::Shape {
        len: data.len(),
        n_rows,
        n_cols,
    };

    if n_rows.checked_mul(n_cols) != Some(data.len()) {
        return Err(shape_err());
    }

    Array2::from_shape_vec((n_rows, n_cols), data.to_vec()).map_err(|_| shape_err())
}

/// Parse textual cells into a matrix.
///
/// Cells are trimmed and parsed as `f64`, so `NaN`, `nan` and `inf` are
/// accepted. An empty cell counts as missing and becomes NaN.
pub fn parse_matrix<R, S>(rows: &[R]) -> Result<Array2<f64>>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let parsed = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_ref()
                .iter()
                .enumerate()
                .map(|(j, cell)| parse_cell(i, j, cell.as_ref()))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    matrix_from_rows(&parsed)
}

fn parse_cell(row: usize, col: usize, cell: &str) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| SimilarityError::NotNumeric {
            row,
            col,
            value: cell.to_string(),
        })
}

/// Replace every NaN with 0.0 in place. Returns the number of entries filled.
pub fn fill_missing(m: &mut Array2<f64>) -> usize {
    let mut filled = 0;
    m.map_inplace(|v| {
        if v.is_nan() {
            *v = 0.0;
            filled += 1;
        }
    });
    filled
}

/// Replace every ±∞ with 0.0 in place. Returns the number of entries filled.
pub fn fill_infinite(m: &mut Array2<f64>) -> usize {
    let mut filled = 0;
    m.map_inplace(|v| {
        if v.is_infinite() {
            *v = 0.0;
            filled += 1;
        }
    });
    filled
}

/// Position of the first infinite entry in row-major order, if any.
pub fn first_infinite<S: Data<Elem = f64>>(m: &ArrayBase<S, Ix2>) -> Option<(usize, usize)> {
    m.indexed_iter()
        .find(|(_, v)| v.is_infinite())
        .map(|(pos, _)| pos)
}

/// Owned copy of `m` with missing values zero-filled. `m` is left untouched.
pub fn sanitized<S: Data<Elem = f64>>(m: &ArrayBase<S, Ix2>) -> Array2<f64> {
    let mut copy = m.to_owned();
    fill_missing(&mut copy);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_to_matrix() {
        let m = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        match err {
            SimilarityError::Ragged {
                row,
                expected,
                found,
            } => {
                assert_eq!((row, expected, found), (1, 2, 1));
            }
            other => panic!("expected Ragged, got {:?}", other),
        }
    }

    #[test]
    fn empty_rows() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert_eq!(matrix_from_rows(&rows).unwrap().dim(), (0, 0));

        let m = matrix_from_rows(&[Vec::<f64>::new(), Vec::new()]).unwrap();
        assert_eq!(m.dim(), (2, 0));
    }

    #[test]
    fn flat_shape_validated() {
        let m = matrix_from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert_eq!(m, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);

        let err = matrix_from_flat(&[1.0, 2.0, 3.0], 2, 2).unwrap_err();
        assert!(matches!(err, SimilarityError::Shape { len: 3, .. }));
    }

    #[test]
    fn parse_cells() {
        let m = parse_matrix(&[vec![" 1.5", "NaN"], vec!["", "-2"]]).unwrap();
        assert_eq!(m[[0, 0]], 1.5);
        assert!(m[[0, 1]].is_nan());
        assert!(m[[1, 0]].is_nan());
        assert_eq!(m[[1, 1]], -2.0);
    }

    #[test]
    fn parse_rejects_text() {
        let err = parse_matrix(&[vec!["1", "two"]]).unwrap_err();
        match err {
            SimilarityError::NotNumeric { row, col, value } => {
                assert_eq!((row, col, value.as_str()), (0, 1, "two"));
            }
            other => panic!("expected NotNumeric, got {:?}", other),
        }
    }

    #[test]
    fn fill_missing_counts() {
        let mut m = array![[f64::NAN, 1.0], [2.0, f64::NAN]];
        assert_eq!(fill_missing(&mut m), 2);
        assert_eq!(m, array![[0.0, 1.0], [2.0, 0.0]]);
    }

    #[test]
    fn sanitized_leaves_input() {
        let m = array![[f64::NAN, 1.0]];
        let s = sanitized(&m);
        assert!(m[[0, 0]].is_nan());
        assert_eq!(s, array![[0.0, 1.0]]);
    }

    #[test]
    fn infinite_detection() {
        let mut m = array![[1.0, 2.0], [f64::NEG_INFINITY, 0.0]];
        assert_eq!(first_infinite(&m), Some((1, 0)));
        assert_eq!(fill_infinite(&mut m), 1);
        assert_eq!(first_infinite(&m), None);
    }
}
