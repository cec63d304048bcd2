//! Landmark clip format: one recorded gesture instance as a JSON file.
//!
//! A clip is a sequence of per-frame feature vectors (flattened holistic
//! landmark coordinates) plus metadata. Capture and upload collaborators
//! write clips under `<root>/<label>/`; the dataset builder reads them.
//! Clips are immutable once written.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// One captured instant: wall-clock time plus the flattened feature vector.
///
/// `feat` is optional because uploaded clips occasionally carry frames where
/// landmark extraction produced nothing; such frames are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub t: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feat: Option<Vec<f32>>,
}

/// A labeled landmark clip as stored on disk.
///
/// All metadata fields are defaulted on deserialization: upload bodies omit
/// `n_frames`, and the label of record is always the directory the file sits
/// in, not the `label` field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_frames: Option<usize>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Clip {
    /// Create a clip stamped with the current UTC time.
    pub fn new(label: impl Into<String>, frames: Vec<Frame>) -> Self {
        let n_frames = frames.len();
        Self {
            label: label.into(),
            timestamp: Utc::now().format("%Y%m%d_%H%M%S_%f").to_string(),
            n_frames: Some(n_frames),
            frames,
        }
    }

    /// Parse a clip file. Unparsable JSON is reported as a malformed clip.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|err| DatasetError::io(path, err))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| DatasetError::malformed(path, err.to_string()))
    }

    /// Write the clip under `<root>/<label>/<label>_<timestamp>.json`.
    ///
    /// The subsecond part of the timestamp keeps rapid successive saves from
    /// colliding. Returns the path written.
    pub fn save_under(&self, root: &Path) -> Result<PathBuf> {
        let label_dir = root.join(&self.label);
        fs::create_dir_all(&label_dir).map_err(|err| DatasetError::io(&label_dir, err))?;

        let path = label_dir.join(format!("{}_{}.json", self.label, self.timestamp));
        let json = serde_json::to_vec(self)?;
        fs::write(&path, json).map_err(|err| DatasetError::io(&path, err))?;
        log::info!("saved clip {}", path.display());
        Ok(path)
    }

    /// Number of frames that actually carry a feature vector.
    pub fn usable_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.feat.is_some()).count()
    }

    /// Collect usable frames into an `(n, d)` matrix.
    ///
    /// Frames without `feat` are skipped. Rows that disagree in length make
    /// the clip malformed; this fails fast rather than truncating or padding.
    /// An empty clip yields a `(0, 0)` matrix.
    pub fn feature_matrix(&self, path: &Path) -> Result<Array2<f32>> {
        let feats: Vec<&Vec<f32>> = self
            .frames
            .iter()
            .filter_map(|frame| frame.feat.as_ref())
            .collect();

        let Some(first) = feats.first() else {
            return Ok(Array2::zeros((0, 0)));
        };

        let dim = first.len();
        let mut data = Vec::with_capacity(feats.len() * dim);
        for feat in &feats {
            if feat.len() != dim {
                return Err(DatasetError::DimensionMismatch {
                    expected: dim,
                    found: feat.len(),
                    path: path.to_path_buf(),
                });
            }
            data.extend_from_slice(feat);
        }

        Array2::from_shape_vec((feats.len(), dim), data)
            .map_err(|err| DatasetError::malformed(path, err.to_string()))
    }
}
