//! Sliding sequence window for realtime inference.
//!
//! The live loop pushes one feature vector per camera frame; once the window
//! holds `seq_length` frames it can be handed to the model as a `(1, t, d)`
//! batch. The model itself lives with the inference collaborator, not here.

use std::collections::VecDeque;

use ndarray::Array3;

use crate::{
    error::{DatasetError, Result},
    layout::FeatureLayout,
};

/// Fixed-capacity buffer of the most recent feature vectors.
pub struct SequenceWindow {
    frames: VecDeque<Vec<f32>>,
    seq_length: usize,
    feature_dim: usize,
}

impl SequenceWindow {
    pub fn new(seq_length: usize, feature_dim: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(seq_length),
            seq_length,
            feature_dim,
        }
    }

    /// Window sized for the full holistic capture layout.
    pub fn holistic(seq_length: usize) -> Self {
        Self::new(seq_length, FeatureLayout::holistic().total_dim())
    }

    /// Append a frame, evicting the oldest once the window is full.
    /// Frames of the wrong width are rejected.
    pub fn push(&mut self, feat: Vec<f32>) -> Result<()> {
        if feat.len() != self.feature_dim {
            return Err(DatasetError::WindowDimension {
                expected: self.feature_dim,
                found: feat.len(),
            });
        }
        if self.frames.len() == self.seq_length {
            self.frames.pop_front();
        }
        self.frames.push_back(feat);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.seq_length
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// The window as a `(1, seq_length, feature_dim)` model input, once full.
    pub fn as_input(&self) -> Option<Array3<f32>> {
        if !self.is_full() {
            return None;
        }
        let mut input = Array3::zeros((1, self.seq_length, self.feature_dim));
        for (j, feat) in self.frames.iter().enumerate() {
            for (k, value) in feat.iter().enumerate() {
                input[[0, j, k]] = *value;
            }
        }
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_full_until_seq_length_frames() {
        let mut window = SequenceWindow::new(3, 2);
        window.push(vec![1.0, 2.0]).unwrap();
        assert!(!window.is_full());
        assert!(window.as_input().is_none());

        window.push(vec![3.0, 4.0]).unwrap();
        window.push(vec![5.0, 6.0]).unwrap();
        assert!(window.is_full());
        assert_eq!(window.as_input().unwrap().shape(), &[1, 3, 2]);
    }

    #[test]
    fn evicts_oldest_frame() {
        let mut window = SequenceWindow::new(2, 1);
        window.push(vec![1.0]).unwrap();
        window.push(vec![2.0]).unwrap();
        window.push(vec![3.0]).unwrap();

        let input = window.as_input().unwrap();
        assert_eq!(input[[0, 0, 0]], 2.0);
        assert_eq!(input[[0, 1, 0]], 3.0);
    }

    #[test]
    fn holistic_window_width() {
        let mut window = SequenceWindow::holistic(2);
        assert!(window.push(vec![0.0; 1629]).is_ok());
        assert!(window.push(vec![0.0; 1628]).is_err());
    }

    #[test]
    fn rejects_wrong_width() {
        let mut window = SequenceWindow::new(2, 3);
        let err = window.push(vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::WindowDimension {
                expected: 3,
                found: 1
            }
        ));
        assert!(window.is_empty());
    }
}
