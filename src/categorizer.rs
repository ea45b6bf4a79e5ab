use crate::{
    accessor::{AttributeAccessor, DecodeError, DicomAccessor, SeriesId},
    clusterer::OrientationClusterer,
    config::CategorizeOptions,
    enums::Execution,
    volume_map::VolumeMap,
};

use rayon::prelude::*;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CategorizeError {
    #[error("No DICOM files found")]
    NoDicomFiles,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Decode(#[from] DecodeError),
}

/// Files sharing one series identity, in input order.
type SeriesGroup = (SeriesId, Vec<PathBuf>);

pub struct VolumeCategorizer<A = DicomAccessor> {
    accessor: A,
    options: CategorizeOptions,
}

impl VolumeCategorizer<DicomAccessor> {
    /// Categorizer reading attributes from DICOM files on disk
    pub fn from_options(options: CategorizeOptions) -> Self {
        let accessor = DicomAccessor::with_restrictions(options.series_restrictions.clone());
        Self { accessor, options }
    }
}

impl<A> VolumeCategorizer<A>
where
    A: AttributeAccessor + Sync,
{
    pub fn new(accessor: A, options: CategorizeOptions) -> Self {
        Self { accessor, options }
    }

    /// Partition `files` into volumes
    ///
    /// Files are grouped by series identity, then every group is split by
    /// orientation. Volume IDs are prefixed with their series identity, so
    /// groups never share a volume.
    ///
    /// # Arguments
    ///
    /// * `files` - Paths in the order they should be visited; duplicates are
    ///   kept
    ///
    /// # Errors
    ///
    /// Fails on the first file the accessor cannot decode.
    pub fn categorize(&self, files: &[impl AsRef<Path>]) -> Result<VolumeMap, CategorizeError> {
        let groups = self.group_by_series(files)?;
        let clusterer = OrientationClusterer::new(self.options.epsilon);

        let clustered: Vec<VolumeMap> = match self.options.execution {
            Execution::Sequential => groups
                .iter()
                .map(|(series_id, paths)| clusterer.cluster(&self.accessor, series_id, paths))
                .collect::<Result<_, _>>()?,
            Execution::Parallel => groups
                .par_iter()
                .map(|(series_id, paths)| clusterer.cluster(&self.accessor, series_id, paths))
                .collect::<Result<_, _>>()?,
        };

        let mut volumes = VolumeMap::new();
        for series_volumes in clustered {
            volumes.merge(series_volumes);
        }

        info!(
            files = files.len(),
            series = groups.len(),
            volumes = volumes.len(),
            "categorized files"
        );
        Ok(volumes)
    }

    /// Categorize every `.dcm` file of a directory
    ///
    /// Files are visited in path order so the result does not depend on the
    /// order the file system lists them in.
    pub fn categorize_directory(&self, path: impl AsRef<Path>) -> Result<VolumeMap, CategorizeError> {
        let paths = collect_dicom_files(path.as_ref())?;

        if paths.is_empty() {
            return Err(CategorizeError::NoDicomFiles);
        }

        self.categorize(&paths)
    }

    fn group_by_series(&self, files: &[impl AsRef<Path>]) -> Result<Vec<SeriesGroup>, DecodeError> {
        let mut groups: Vec<SeriesGroup> = Vec::new();
        let mut positions: HashMap<SeriesId, usize> = HashMap::new();

        for path in files {
            let path = path.as_ref();
            let series_id = self.accessor.read_series_id(path)?;

            match positions.get(&series_id) {
                Some(&position) => groups[position].1.push(path.to_path_buf()),
                None => {
                    debug!(%series_id, "new series");
                    positions.insert(series_id.clone(), groups.len());
                    groups.push((series_id, vec![path.to_path_buf()]));
                }
            }
        }

        Ok(groups)
    }
}

fn collect_dicom_files(path: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths: Vec<_> = fs::read_dir(path)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}
