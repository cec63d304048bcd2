//! signclip: build fixed-length training datasets from labeled landmark
//! clips.
//!
//! The capture and upload sides of the pipeline drop JSON clips under
//! `<root>/<label>/`; this crate discovers them, resamples every clip to a
//! fixed number of time steps, encodes labels, and persists the tensor
//! archive plus label encoder that the training, quantization and realtime
//! inference sides consume.

pub mod archive;
pub mod clip;
pub mod config;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod layout;
pub mod resample;
pub mod window;

pub use clip::{Clip, Frame};
pub use config::BuildConfig;
pub use dataset::{BuildEvent, Dataset, build, discover_clips};
pub use error::{DatasetError, Result};
pub use labels::LabelEncoder;
pub use layout::FeatureLayout;
pub use resample::{DEFAULT_SEQ_LENGTH, resample};
pub use window::SequenceWindow;
