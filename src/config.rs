//! Build configuration.

use std::path::PathBuf;

use crate::resample::DEFAULT_SEQ_LENGTH;

/// Configuration for one dataset build.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Roots searched for `<label>/<clip>.json` trees. Roots that do not
    /// exist are skipped, so an upload directory that never received
    /// anything is not an error.
    pub roots: Vec<PathBuf>,

    /// Number of time steps every clip is resampled to.
    pub seq_length: usize,

    /// Expected feature dimensionality. `None` infers it from the first
    /// accepted clip; `Some` rejects clips of any other width up front.
    pub feature_dim: Option<usize>,

    /// Where the compressed tensor archive is written.
    pub dataset_path: PathBuf,

    /// Where the label encoder artifact is written.
    pub encoder_path: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("recordings"), PathBuf::from("uploads")],
            seq_length: DEFAULT_SEQ_LENGTH,
            feature_dim: None,
            dataset_path: PathBuf::from("isl_dataset.json.gz"),
            encoder_path: PathBuf::from("label_encoder.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_capture_side() {
        let config = BuildConfig::default();
        assert_eq!(config.seq_length, 30);
        assert_eq!(config.roots.len(), 2);
        assert!(config.feature_dim.is_none());
    }
}
