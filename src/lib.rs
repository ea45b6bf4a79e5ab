//! # DICOM-categorize library
//!
//! This crate partitions a flat collection of DICOM files into the distinct
//! 3D volumes they represent.

//!
//! This library is part of the dicom-rs ecosystem and leverages its component
//! to read the attributes a volume is recognized by. Archives often keep
//! several acquisitions side by side in one directory: different series,
//! different orientations, repeated scans. Before a volume can be built, the
//! files belonging together have to be found. Files are categorized in two
//! steps:
//!  - Series: files are grouped by Series Instance UID, optionally refined by
//!    further restriction tags
//!  - Orientation: each series is split by Image Orientation (Patient), using
//!    a tolerance-based greedy clustering
//!
//!  Every volume gets an ID made of its series identity and an encoding of
//!  the direction cosines of the file that opened it, e.g.
//!  `1.2.3.0D000000S1D000000S0D000000S0D000000S0D000000SN1D000000`. The IDs
//!  are stable across runs for the same input in the same order.
//!
//!  DICOM files are assumed to have the following attributes:
//!   - Series Instance UID and Image Orientation (Patient) present
//!   - No multiframe
//!
//!  Series groups can optionally be clustered in parallel using rayon.
//!
//! # Examples
//!
//! ## Categorizing all DICOM files of a directory
//!
//! ```no_run
//! # use dicom_categorize::{CategorizeOptions, VolumeCategorizer};
//! let categorizer = VolumeCategorizer::from_options(CategorizeOptions::default());
//! let volumes = categorizer
//!     .categorize_directory("dicom")
//!     .expect("should have categorized files from directory");
//! for (volume_id, files) in volumes.iter() {
//!     println!("{volume_id}: {} files", files.len());
//! }
//! ```
//!
//! ## Plugging in a different attribute source
//!
//! Anything implementing [`AttributeAccessor`] can stand in for the DICOM
//! reader, e.g. an index of previously extracted attributes.

pub mod accessor;
pub mod categorizer;
pub mod clusterer;
pub mod config;
pub mod cosines;
pub mod enums;
pub mod volume_map;

pub use accessor::{AttributeAccessor, DecodeError, DicomAccessor, SeriesId};
pub use categorizer::{CategorizeError, VolumeCategorizer};
pub use clusterer::OrientationClusterer;
pub use config::{CategorizeOptions, parse_epsilon, parse_tag};
pub use cosines::{Cosines, CosinesError, DEFAULT_EPSILON};
pub use enums::Execution;
pub use volume_map::{VolumeId, VolumeMap};
