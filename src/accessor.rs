use crate::cosines::{Cosines, CosinesError};

use dicom::core::Tag;
use dicom::object::{DefaultDicomObject, OpenFileOptions, ReadError};
use dicom_dictionary_std::tags;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::trace;

/// Series identity of an image instance.
pub type SeriesId = String;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Could not read DICOM file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error("Missing attribute {tag} in {}", .path.display())]
    MissingAttribute { path: PathBuf, tag: Tag },

    #[error("Malformed attribute {tag} in {}: {reason}", .path.display())]
    MalformedAttribute {
        path: PathBuf,
        tag: Tag,
        reason: String,
    },

    #[error("Invalid image orientation in {}: {source}", .path.display())]
    InvalidCosines {
        path: PathBuf,
        #[source]
        source: CosinesError,
    },
}

/// Reads the two attributes categorization is based on.
///
/// Implementations are plain blocking reads without shared mutable state.
pub trait AttributeAccessor {
    fn read_series_id(&self, path: &Path) -> Result<SeriesId, DecodeError>;

    fn read_orientation(&self, path: &Path) -> Result<Cosines, DecodeError>;
}

impl<T: AttributeAccessor + ?Sized> AttributeAccessor for &T {
    fn read_series_id(&self, path: &Path) -> Result<SeriesId, DecodeError> {
        (**self).read_series_id(path)
    }

    fn read_orientation(&self, path: &Path) -> Result<Cosines, DecodeError> {
        (**self).read_orientation(path)
    }
}

/// Attribute accessor backed by dicom-rs.
///
/// Only the header is parsed; reading stops at Pixel Data. The series
/// identity is the Series Instance UID, refined by the values of any
/// configured restriction tags.
#[derive(Debug, Clone, Default)]
pub struct DicomAccessor {
    restrictions: Vec<Tag>,
}

impl DicomAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accessor whose series identity also depends on `restrictions`.
    ///
    /// Each present, non-empty restriction value is stripped to its
    /// alphanumeric and `.` characters and appended as `.value`, in the
    /// given tag order.
    pub fn with_restrictions(restrictions: Vec<Tag>) -> Self {
        Self { restrictions }
    }

    /// Read the string values of `tags`, keyed by the name paired with each
    /// tag. Tags absent from the file, or with an empty value, are left out.
    pub fn read_tags(
        &self,
        path: &Path,
        tags: &[(&str, Tag)],
    ) -> Result<HashMap<String, String>, DecodeError> {
        let dicom_object = Self::open(path)?;

        let mut values = HashMap::with_capacity(tags.len());
        for &(name, tag) in tags {
            if let Some(value) = Self::get_string(&dicom_object, path, tag)? {
                values.insert(name.to_owned(), value);
            }
        }
        Ok(values)
    }

    fn open(path: &Path) -> Result<DefaultDicomObject, DecodeError> {
        OpenFileOptions::new()
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|source| DecodeError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    fn get_string(
        dicom_object: &DefaultDicomObject,
        path: &Path,
        tag: Tag,
    ) -> Result<Option<String>, DecodeError> {
        let Ok(element) = dicom_object.element(tag) else {
            return Ok(None);
        };
        let value = element
            .to_str()
            .map_err(|e| DecodeError::MalformedAttribute {
                path: path.to_path_buf(),
                tag,
                reason: e.to_string(),
            })?;
        let value = value.trim_end_matches(['\0', ' ']).trim_start();
        Ok((!value.is_empty()).then(|| value.to_owned()))
    }
}

impl AttributeAccessor for DicomAccessor {
    fn read_series_id(&self, path: &Path) -> Result<SeriesId, DecodeError> {
        let dicom_object = Self::open(path)?;

        let mut series_id = Self::get_string(&dicom_object, path, tags::SERIES_INSTANCE_UID)?
            .ok_or_else(|| DecodeError::MissingAttribute {
                path: path.to_path_buf(),
                tag: tags::SERIES_INSTANCE_UID,
            })?;

        for &tag in &self.restrictions {
            let Some(value) = Self::get_string(&dicom_object, path, tag)? else {
                continue;
            };
            let value: String = value
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
                .collect();
            if !value.is_empty() {
                series_id.push('.');
                series_id.push_str(&value);
            }
        }

        trace!(path = %path.display(), %series_id, "read series identity");
        Ok(series_id)
    }

    fn read_orientation(&self, path: &Path) -> Result<Cosines, DecodeError> {
        let dicom_object = Self::open(path)?;
        let tag = tags::IMAGE_ORIENTATION_PATIENT;

        let values = dicom_object
            .element(tag)
            .map_err(|_| DecodeError::MissingAttribute {
                path: path.to_path_buf(),
                tag,
            })?
            .to_multi_float64()
            .map_err(|e| DecodeError::MalformedAttribute {
                path: path.to_path_buf(),
                tag,
                reason: e.to_string(),
            })?;

        Cosines::try_from(values).map_err(|source| DecodeError::InvalidCosines {
            path: path.to_path_buf(),
            source,
        })
    }
}
