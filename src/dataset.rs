//! Dataset assembly: discover labeled clips, resample, encode, stack.

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array3, ArrayView3, Axis};

use crate::{
    clip::Clip,
    config::BuildConfig,
    error::{DatasetError, Result},
    labels::LabelEncoder,
    resample::resample,
};

/// Progress events emitted during a build.
///
/// The library stays UI-free; the binary wires these into a progress bar.
#[derive(Clone, Debug)]
pub enum BuildEvent {
    /// Discovery finished, per-clip processing starts.
    Started { total: usize },
    /// A clip was resampled and accumulated.
    ClipAccepted { label: String, path: PathBuf },
    /// A clip was dropped; the build continues.
    ClipSkipped { path: PathBuf, reason: String },
    /// All clips processed and stacked.
    Finished { clips: usize, classes: usize },
}

/// An assembled dataset, ready to persist.
#[derive(Debug)]
pub struct Dataset {
    /// `(n, t, d)` resampled sequences.
    pub x: Array3<f32>,
    /// `(n,)` integer class codes, each in `[0, num_classes)`.
    pub y: Array1<i32>,
    /// Mapping behind the codes in `y`.
    pub encoder: LabelEncoder,
    /// Identifier tying this tensor to its encoder artifact.
    pub build_id: String,
}

impl Dataset {
    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Number of distinct classes.
    pub fn num_classes(&self) -> usize {
        self.encoder.len()
    }

    /// Up to `limit` single-sequence views of shape `(1, t, d)`, for use as
    /// a representative sample source during model quantization.
    pub fn representative_samples(&self, limit: usize) -> impl Iterator<Item = ArrayView3<'_, f32>> {
        let take = limit.min(self.len());
        (0..take).map(move |i| self.x.slice(ndarray::s![i..i + 1, .., ..]))
    }
}

/// Walk the roots and collect `(label, clip path)` pairs.
///
/// Each immediate subdirectory of an existing root names a label; every
/// `.json` file directly inside it (non-recursive) is one clip. Missing roots
/// are skipped; a root that exists but cannot be read is an error. Results
/// are sorted for a deterministic build order.
pub fn discover_clips(roots: &[PathBuf]) -> Result<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();

    for root in roots {
        if !root.exists() {
            log::debug!("root {} does not exist, skipping", root.display());
            continue;
        }
        for entry in read_dir(root)? {
            let label_dir = entry;
            if !label_dir.is_dir() {
                continue;
            }
            let Some(label) = label_dir.file_name().and_then(|n| n.to_str()) else {
                log::warn!("skipping non-utf8 directory name under {}", root.display());
                continue;
            };
            let label = label.to_string();
            for clip_path in read_dir(&label_dir)? {
                let is_json = clip_path.is_file()
                    && clip_path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json {
                    found.push((label.clone(), clip_path));
                }
            }
        }
    }

    found.sort();
    Ok(found)
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|err| DatasetError::io(dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| DatasetError::io(dir, err))?;
        paths.push(entry.path());
    }
    Ok(paths)
}

/// Build a dataset from every discoverable clip under the configured roots.
///
/// Per-clip problems (unparsable JSON, ragged feature rows, zero usable
/// frames) skip the clip and keep going. Structural problems are fatal:
/// nothing usable found anywhere, a clip whose width disagrees with the rest
/// of the build, or an unreadable root.
pub fn build<F>(config: &BuildConfig, mut on_event: F) -> Result<Dataset>
where
    F: FnMut(BuildEvent),
{
    let files = discover_clips(&config.roots)?;
    log::info!("found {} clips under {} roots", files.len(), config.roots.len());
    on_event(BuildEvent::Started { total: files.len() });

    let mut sequences: Vec<ndarray::Array2<f32>> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut feature_dim = config.feature_dim;

    for (label, path) in files {
        let matrix = match Clip::load(&path).and_then(|clip| clip.feature_matrix(&path)) {
            Ok(matrix) => matrix,
            Err(err @ (DatasetError::MalformedClip { .. } | DatasetError::DimensionMismatch { .. })) => {
                log::warn!("skipping {}: {err}", path.display());
                on_event(BuildEvent::ClipSkipped {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err),
        };

        if matrix.nrows() == 0 {
            log::warn!("skipping {}: no usable frames", path.display());
            on_event(BuildEvent::ClipSkipped {
                path,
                reason: "no usable frames".into(),
            });
            continue;
        }

        // All accepted clips must agree on D before stacking; letting the
        // stack fail later would lose the offending path.
        match feature_dim {
            None => feature_dim = Some(matrix.ncols()),
            Some(expected) if expected != matrix.ncols() => {
                return Err(DatasetError::DimensionMismatch {
                    expected,
                    found: matrix.ncols(),
                    path,
                });
            }
            Some(_) => {}
        }

        sequences.push(resample(&matrix, config.seq_length));
        labels.push(label.clone());
        on_event(BuildEvent::ClipAccepted { label, path });
    }

    if sequences.is_empty() {
        return Err(DatasetError::NoClips);
    }

    let dim = feature_dim.unwrap_or(0);
    let mut x = Array3::zeros((sequences.len(), config.seq_length, dim));
    for (i, seq) in sequences.iter().enumerate() {
        x.index_axis_mut(Axis(0), i).assign(seq);
    }

    let encoder = LabelEncoder::fit(labels.iter().cloned());
    let y: Array1<i32> = labels
        .iter()
        .map(|label| {
            encoder
                .encode(label)
                .expect("encoder was fit on these labels")
        })
        .collect();

    let dataset = Dataset {
        x,
        y,
        encoder,
        build_id: chrono::Utc::now().format("%Y%m%d_%H%M%S_%f").to_string(),
    };
    on_event(BuildEvent::Finished {
        clips: dataset.len(),
        classes: dataset.num_classes(),
    });
    Ok(dataset)
}
