//! Temporal resampling of landmark sequences.
//!
//! Clips are recorded at whatever duration and frame rate the camera gave us,
//! but the sequence model wants a fixed number of time steps. Linear
//! interpolation along the time axis keeps the temporal profile of a gesture
//! intact regardless of how fast it was signed, which truncation or padding
//! would not.

use ndarray::Array2;

/// Default number of time steps a clip is resampled to.
pub const DEFAULT_SEQ_LENGTH: usize = 30;

/// Resample an `(n, d)` sequence to exactly `target_len` rows.
///
/// - An empty sequence becomes all zeros; a masking layer downstream can
///   ignore it, and failing the whole build over one empty clip is worse.
/// - A sequence already at `target_len` is returned unchanged, so data
///   captured at the target length survives byte for byte.
/// - A single row is tiled `target_len` times (the constant interpolant).
/// - Anything else is interpolated per feature column: the `n` input rows sit
///   at positions `i/(n-1)` over `[0, 1]` and are evaluated at `target_len`
///   evenly spaced query positions. Segment indices are clamped, which turns
///   out-of-range queries from floating point edge effects into linear
///   extrapolation instead of a panic.
pub fn resample(seq: &Array2<f32>, target_len: usize) -> Array2<f32> {
    let n = seq.nrows();
    let dim = seq.ncols();

    if n == 0 {
        return Array2::zeros((target_len, dim));
    }
    if n == target_len {
        return seq.clone();
    }
    if n == 1 {
        let mut out = Array2::zeros((target_len, dim));
        for mut row in out.rows_mut() {
            row.assign(&seq.row(0));
        }
        return out;
    }

    let mut out = Array2::zeros((target_len, dim));
    let last_segment = n - 2;
    for j in 0..target_len {
        // Query position in source-sample units: 0.0 maps to the first row,
        // (n - 1) to the last, exactly.
        let pos = if target_len == 1 {
            0.0
        } else {
            j as f64 / (target_len - 1) as f64 * (n - 1) as f64
        };
        let seg = (pos.floor() as usize).min(last_segment);
        let frac = (pos - seg as f64) as f32;

        let lo = seq.row(seg);
        let hi = seq.row(seg + 1);
        let mut row = out.row_mut(j);
        // Weighted form so frac of exactly 0.0 or 1.0 reproduces a source
        // row bit for bit.
        for k in 0..dim {
            row[k] = lo[k] * (1.0 - frac) + hi[k] * frac;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn identity_when_already_at_target_length() {
        let seq = array![[1.0_f32, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let out = resample(&seq, 3);
        assert_eq!(out, seq);
    }

    #[test]
    fn empty_sequence_becomes_zeros() {
        let seq = Array2::<f32>::zeros((0, 4));
        let out = resample(&seq, 30);
        assert_eq!(out.shape(), &[30, 4]);
        assert!(out.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn single_row_is_tiled() {
        let seq = array![[2.0_f32, -1.0]];
        let out = resample(&seq, 5);
        assert_eq!(out.shape(), &[5, 2]);
        for row in out.rows() {
            assert_eq!(row[0], 2.0);
            assert_eq!(row[1], -1.0);
        }
    }

    #[test]
    fn endpoints_are_preserved_exactly() {
        let seq = array![
            [0.0_f32, 10.0],
            [1.0, 20.0],
            [4.0, 30.0],
            [9.0, 40.0],
            [16.0, 50.0]
        ];
        for target in [2usize, 7, 30, 45] {
            let out = resample(&seq, target);
            assert_eq!(out.row(0), seq.row(0), "first row, target {target}");
            assert_eq!(
                out.row(target - 1),
                seq.row(seq.nrows() - 1),
                "last row, target {target}"
            );
        }
    }

    #[test]
    fn upsampling_interpolates_linearly() {
        // Two rows, three queries: the middle row is the midpoint.
        let seq = array![[0.0_f32, 4.0], [2.0, 8.0]];
        let out = resample(&seq, 3);
        assert_eq!(out.row(1).to_vec(), vec![1.0, 6.0]);
    }

    #[test]
    fn downsampling_hits_interior_samples() {
        // Five linear-in-time rows down to three: interpolation of a linear
        // signal reproduces the signal at the query positions.
        let seq = array![[0.0_f32], [1.0], [2.0], [3.0], [4.0]];
        let out = resample(&seq, 3);
        assert_eq!(out.column(0).to_vec(), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn target_length_one_takes_first_row() {
        let seq = array![[3.0_f32, 1.0], [7.0, 9.0]];
        let out = resample(&seq, 1);
        assert_eq!(out.row(0), seq.row(0));
    }

    #[test]
    fn deterministic() {
        let seq = array![[0.3_f32, 0.7], [1.1, -2.2], [5.5, 0.0]];
        assert_eq!(resample(&seq, 11), resample(&seq, 11));
    }
}
