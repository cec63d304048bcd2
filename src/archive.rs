//! Artifact persistence: the compressed tensor archive and the label
//! encoder file.
//!
//! The two artifacts of one build carry the same `build_id` and are only
//! valid together; `load_pair` enforces that. Writes go through a temp file
//! in the destination directory and are renamed into place, so a crash
//! mid-write cannot leave something that looks like a finished archive.

use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use ndarray::{Array1, Array3};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::{
    dataset::Dataset,
    error::{DatasetError, Result},
    labels::LabelEncoder,
};

/// On-disk form of the tensor archive (gzip-compressed JSON).
#[derive(Serialize, Deserialize)]
struct ArchiveRecord {
    build_id: String,
    /// Shape of `x`: (n, t, d).
    shape: (usize, usize, usize),
    x: Vec<f32>,
    y: Vec<i32>,
}

/// On-disk form of the label encoder artifact (plain JSON).
#[derive(Serialize, Deserialize)]
struct EncoderRecord {
    build_id: String,
    encoder: LabelEncoder,
}

/// Write both artifacts of a build.
///
/// The encoder file goes first; a dataset archive without its encoder is
/// useless, the reverse is merely stale.
pub fn save(dataset: &Dataset, dataset_path: &Path, encoder_path: &Path) -> Result<()> {
    let encoder_record = EncoderRecord {
        build_id: dataset.build_id.clone(),
        encoder: dataset.encoder.clone(),
    };
    let encoder_json = serde_json::to_vec_pretty(&encoder_record)?;
    write_atomic(encoder_path, &encoder_json)?;
    log::info!("wrote label encoder to {}", encoder_path.display());

    let (n, t, d) = {
        let shape = dataset.x.shape();
        (shape[0], shape[1], shape[2])
    };
    let record = ArchiveRecord {
        build_id: dataset.build_id.clone(),
        shape: (n, t, d),
        x: dataset.x.iter().copied().collect(),
        y: dataset.y.to_vec(),
    };
    let json = serde_json::to_vec(&record)?;
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(&json)
        .map_err(|err| DatasetError::io(dataset_path, err))?;
    let compressed = gz
        .finish()
        .map_err(|err| DatasetError::io(dataset_path, err))?;
    write_atomic(dataset_path, &compressed)?;
    log::info!(
        "wrote dataset archive to {} (X: {}x{}x{}, {} classes)",
        dataset_path.display(),
        n,
        t,
        d,
        dataset.encoder.len()
    );
    Ok(())
}

/// Load a dataset archive together with its matching encoder artifact.
pub fn load_pair(dataset_path: &Path, encoder_path: &Path) -> Result<Dataset> {
    let (x, y, build_id) = load_tensors(dataset_path)?;
    let (encoder, encoder_build_id) = load_encoder(encoder_path)?;

    if build_id != encoder_build_id {
        return Err(DatasetError::ArtifactMismatch {
            dataset: build_id,
            encoder: encoder_build_id,
        });
    }
    let classes = encoder.len() as i32;
    if y.iter().any(|code| *code < 0 || *code >= classes) {
        return Err(DatasetError::InvalidArchive(format!(
            "label code out of range for {} classes",
            classes
        )));
    }

    Ok(Dataset {
        x,
        y,
        encoder,
        build_id,
    })
}

/// Load only the tensor archive: `X`, `y` and the build id.
///
/// The quantization consumer needs `X` alone and has no use for the encoder.
pub fn load_tensors(path: &Path) -> Result<(Array3<f32>, Array1<i32>, String)> {
    let record: ArchiveRecord = read_gz_json(path)?;
    let (n, t, d) = record.shape;

    if record.x.len() != n * t * d {
        return Err(DatasetError::InvalidArchive(format!(
            "X has {} values, shape says {}x{}x{}",
            record.x.len(),
            n,
            t,
            d
        )));
    }
    if record.y.len() != n {
        return Err(DatasetError::InvalidArchive(format!(
            "y has {} values for {} sequences",
            record.y.len(),
            n
        )));
    }

    let x = Array3::from_shape_vec((n, t, d), record.x)
        .map_err(|err| DatasetError::InvalidArchive(err.to_string()))?;
    let y = Array1::from_vec(record.y);
    Ok((x, y, record.build_id))
}

/// Load only the label encoder artifact, with its build id.
///
/// The realtime inference consumer pairs this with a trained model.
pub fn load_encoder(path: &Path) -> Result<(LabelEncoder, String)> {
    let bytes = fs::read(path).map_err(|err| DatasetError::io(path, err))?;
    let record: EncoderRecord = serde_json::from_slice(&bytes)?;
    Ok((record.encoder, record.build_id))
}

fn read_gz_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).map_err(|err| DatasetError::io(path, err))?;
    let mut decoder = GzDecoder::new(file);
    let mut json = Vec::new();
    decoder
        .read_to_end(&mut json)
        .map_err(|err| DatasetError::io(path, err))?;
    Ok(serde_json::from_slice(&json)?)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| DatasetError::io(dir, err))?;
    tmp.write_all(bytes)
        .map_err(|err| DatasetError::io(tmp.path(), err))?;
    tmp.persist(path)
        .map_err(|err| DatasetError::io(path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelEncoder;
    use ndarray::{Array1, Array3};

    fn sample_dataset(build_id: &str) -> Dataset {
        let x = Array3::from_shape_fn((2, 4, 3), |(i, j, k)| (i * 100 + j * 10 + k) as f32);
        let y = Array1::from_vec(vec![0, 1]);
        Dataset {
            x,
            y,
            encoder: LabelEncoder::fit(["hello", "thanks"]),
            build_id: build_id.to_string(),
        }
    }

    #[test]
    fn round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.json.gz");
        let encoder_path = dir.path().join("labels.json");

        let dataset = sample_dataset("b1");
        save(&dataset, &dataset_path, &encoder_path).unwrap();

        let loaded = load_pair(&dataset_path, &encoder_path).unwrap();
        assert_eq!(loaded.x, dataset.x);
        assert_eq!(loaded.y, dataset.y);
        assert_eq!(loaded.encoder, dataset.encoder);
        assert_eq!(loaded.build_id, "b1");
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = sample_dataset("b1");
        let b = sample_dataset("b2");

        save(&a, &dir.path().join("a.json.gz"), &dir.path().join("a-labels.json")).unwrap();
        save(&b, &dir.path().join("b.json.gz"), &dir.path().join("b-labels.json")).unwrap();

        let err = load_pair(
            &dir.path().join("a.json.gz"),
            &dir.path().join("b-labels.json"),
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::ArtifactMismatch { .. }));
    }

    #[test]
    fn tensors_load_without_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.json.gz");
        save(&sample_dataset("b1"), &dataset_path, &dir.path().join("l.json")).unwrap();

        let (x, y, build_id) = load_tensors(&dataset_path).unwrap();
        assert_eq!(x.shape(), &[2, 4, 3]);
        assert_eq!(y.len(), 2);
        assert_eq!(build_id, "b1");
    }

    #[test]
    fn corrupt_shape_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json.gz");

        let record = ArchiveRecord {
            build_id: "b1".into(),
            shape: (2, 4, 3),
            x: vec![0.0; 5],
            y: vec![0, 1],
        };
        let json = serde_json::to_vec(&record).unwrap();
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&json).unwrap();
        std::fs::write(&path, gz.finish().unwrap()).unwrap();

        let err = load_tensors(&path).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidArchive(_)));
    }
}
