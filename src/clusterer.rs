use crate::{
    accessor::{AttributeAccessor, DecodeError},
    cosines::{Cosines, DEFAULT_EPSILON},
    volume_map::{VolumeId, VolumeMap},
};

use std::path::PathBuf;
use tracing::debug;

/// An orientation group discovered inside one series.
#[derive(Debug, Clone)]
struct Cluster {
    representative: Cosines,
    volume_id: VolumeId,
}

/// Splits the files of one series into orientation-equivalent volumes.
///
/// The split is a single greedy pass: each file joins the first cluster, in
/// discovery order, whose representative (the cosines of the file that
/// opened it) is equivalent to its own. Membership is decided against
/// representatives only, so the outcome depends on input order and is not a
/// transitive closure.
#[derive(Debug, Clone, Copy)]
pub struct OrientationClusterer {
    epsilon: f64,
}

impl Default for OrientationClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl OrientationClusterer {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Cluster the files of series `series_id`, visited in slice order.
    ///
    /// # Errors
    ///
    /// Returns the first error of the accessor; no partial map is produced.
    pub fn cluster<A>(
        &self,
        accessor: &A,
        series_id: &str,
        files: &[PathBuf],
    ) -> Result<VolumeMap, DecodeError>
    where
        A: AttributeAccessor + ?Sized,
    {
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut volumes = VolumeMap::new();

        for path in files {
            let cosines = accessor.read_orientation(path)?;

            if let Some(cluster) = clusters
                .iter()
                .find(|cluster| cosines.equivalent(&cluster.representative, self.epsilon))
            {
                volumes.push(&cluster.volume_id, path.clone());
                continue;
            }

            let volume_id = format!("{series_id}.{}", cosines.encode());
            debug!(%volume_id, %cosines, "new orientation cluster");
            // Distinct cosines can print to an existing ID; the file then joins
            // that volume by key while still adding its own representative.
            volumes.push(&volume_id, path.clone());
            clusters.push(Cluster {
                representative: cosines,
                volume_id,
            });
        }

        Ok(volumes)
    }
}
