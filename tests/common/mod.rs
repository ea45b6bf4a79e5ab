#![allow(dead_code)]

use dicom_categorize::{AttributeAccessor, Cosines, DecodeError, SeriesId};
use dicom_dictionary_std::tags;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

pub const SAGITTAL: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, -1.0];
pub const CORONAL_ROTATED: [f64; 6] = [0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
pub const AXIAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// Orientation rotated by `angle` radians about the first axis; two tilts are
/// equivalent under the default tolerance while they differ by < ~0.0141 rad.
pub fn tilted(angle: f64) -> [f64; 6] {
    [0.0, angle.cos(), angle.sin(), 0.0, 0.0, 1.0]
}

/// In-memory attributes keyed by path.
#[derive(Default)]
pub struct FakeAccessor {
    attributes: HashMap<PathBuf, (SeriesId, Cosines)>,
}

impl FakeAccessor {
    pub fn with(mut self, path: &str, series_id: &str, cosines: [f64; 6]) -> Self {
        self.attributes
            .insert(PathBuf::from(path), (series_id.to_owned(), Cosines::new(cosines)));
        self
    }

    fn lookup(&self, path: &Path) -> Result<&(SeriesId, Cosines), DecodeError> {
        self.attributes
            .get(path)
            .ok_or_else(|| DecodeError::MissingAttribute {
                path: path.to_path_buf(),
                tag: tags::SERIES_INSTANCE_UID,
            })
    }
}

impl AttributeAccessor for FakeAccessor {
    fn read_series_id(&self, path: &Path) -> Result<SeriesId, DecodeError> {
        self.lookup(path).map(|(series_id, _)| series_id.clone())
    }

    fn read_orientation(&self, path: &Path) -> Result<Cosines, DecodeError> {
        self.lookup(path).map(|(_, cosines)| *cosines)
    }
}

pub fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}
