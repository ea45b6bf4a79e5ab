use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Volume ID: a series identity, `.`, and an orientation suffix.
pub type VolumeId = String;

/// Mapping from volume ID to the files forming that volume.
///
/// Keys keep the order in which they were first inserted, and each file list
/// keeps the order in which files were pushed. Serializes as a JSON object in
/// that same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeMap {
    volumes: Vec<(VolumeId, Vec<PathBuf>)>,
    index: HashMap<VolumeId, usize>,
}

impl VolumeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` to the list of `id`, creating the entry if needed.
    pub fn push(&mut self, id: &str, path: PathBuf) {
        match self.index.get(id) {
            Some(&position) => self.volumes[position].1.push(path),
            None => {
                self.index.insert(id.to_owned(), self.volumes.len());
                self.volumes.push((id.to_owned(), vec![path]));
            }
        }
    }

    /// Move every entry of `other` into `self`, keeping `other`'s order.
    pub fn merge(&mut self, other: VolumeMap) {
        for (id, paths) in other.volumes {
            for path in paths {
                self.push(&id, path);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&[PathBuf]> {
        self.index
            .get(id)
            .map(|&position| self.volumes[position].1.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of volumes.
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Total number of files over all volumes.
    pub fn file_count(&self) -> usize {
        self.volumes.iter().map(|(_, paths)| paths.len()).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.volumes.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.volumes
            .iter()
            .map(|(id, paths)| (id.as_str(), paths.as_slice()))
    }

    /// Volume ID holding `path`, if any.
    pub fn volume_of(&self, path: &Path) -> Option<&str> {
        self.iter()
            .find(|(_, paths)| paths.iter().any(|p| p == path))
            .map(|(id, _)| id)
    }
}

impl IntoIterator for VolumeMap {
    type Item = (VolumeId, Vec<PathBuf>);
    type IntoIter = std::vec::IntoIter<(VolumeId, Vec<PathBuf>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.volumes.into_iter()
    }
}

impl Serialize for VolumeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.volumes.len()))?;
        for (id, paths) in &self.volumes {
            map.serialize_entry(id, paths)?;
        }
        map.end()
    }
}
