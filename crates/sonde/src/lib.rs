//! Sonde: line-of-site data probes for distributed simulation meshes.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the sonde sub-crates. For most users, adding `sonde` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```
//! use sonde::probes::DataProbes;
//! use sonde_test_utils::MockMesh;
//!
//! let doc: serde_yaml::Value = serde_yaml::from_str(r#"
//! data_probes:
//!   specifications:
//!     - name: wake_rake
//!       from_target_part: block_1
//!       line_of_site_specifications:
//!         - name: centerline
//!           number_of_points: 2
//!           tip_coordinates: [0.0, 0.0, 1.0]
//!           tail_coordinates: [0.0, 0.0, 0.0]
//! "#).unwrap();
//!
//! let mut probes = DataProbes::from_config(&doc, 1).unwrap().unwrap();
//! let mut mesh = MockMesh::serial(3);
//! probes.setup(&mut mesh).unwrap();
//! mesh.finalize();
//! probes.initialize(&mut mesh).unwrap();
//! assert_eq!(probes.inactive_selector().len(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`mesh`] | `sonde-mesh` | Identifiers, mesh trait seams, selectors |
//! | [`probes`] | `sonde-probes` | Probe specs, lifecycle, partitioning, sampling |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers, mesh trait seams, and selectors (`sonde-mesh`).
pub use sonde_mesh as mesh;

/// Probe specifications, lifecycle, partitioning, and sampling
/// (`sonde-probes`).
pub use sonde_probes as probes;

pub use sonde_mesh::{
    Coord, EntityId, EntityRank, FieldId, MeshBulk, MeshError, MeshMeta, NodeHandle, PartId,
    RankId, Selector,
};
pub use sonde_probes::{
    DataProbeConfig, DataProbes, FieldMean, FieldRequest, GroupSamples, LoadError, Phase,
    ProbeError, ProbeGroupSpec, ProbeSamples, ProbeSet, SampleReport, PROBE_FIELD_SUFFIX,
};
