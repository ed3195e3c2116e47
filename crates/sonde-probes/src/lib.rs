//! Line-of-site data probes for distributed simulation meshes.
//!
//! A data probe is a virtual sensor line injected into a running
//! simulation: a pair of endpoints discretized into evenly spaced
//! sample nodes that live on the mesh without coinciding with any
//! physics node. This crate parses a declarative probe specification,
//! partitions probe ownership across ranks, provisions dedicated mesh
//! parts and globally-unique node entities through the
//! [`sonde_mesh`] trait seams, positions the nodes geometrically, and
//! periodically averages field values over them during time-stepping.
//!
//! # Quick start
//!
//! ```
//! use sonde_mesh::{MeshBulk, MeshMeta};
//! use sonde_probes::DataProbes;
//! use sonde_test_utils::MockMesh;
//!
//! let doc: serde_yaml::Value = serde_yaml::from_str(r#"
//! data_probes:
//!   specifications:
//!     - name: wake_rake
//!       from_target_part: block_1
//!       line_of_site_specifications:
//!         - name: centerline
//!           number_of_points: 3
//!           tip_coordinates: [0.0, 0.0, 1.0]
//!           tail_coordinates: [0.0, 0.0, 0.0]
//!       output_variables:
//!         - field_name: temperature
//!           field_size: 1
//! "#).unwrap();
//!
//! let mut probes = DataProbes::from_config(&doc, 1).unwrap().unwrap();
//! let mut mesh = MockMesh::serial(3);
//!
//! // Before mesh finalization: declare parts and fields.
//! probes.setup(&mut mesh).unwrap();
//! mesh.finalize();
//! // After finalization: create and position the probe nodes.
//! probes.initialize(&mut mesh).unwrap();
//!
//! // The driver writes field values; here we fill them by hand.
//! let field = mesh.field("temperature_probe").unwrap();
//! let nodes = probes.groups()[0].sets[0].nodes[0].clone();
//! for (j, node) in nodes.iter().enumerate() {
//!     mesh.field_data_mut(field, *node).unwrap()[0] = j as f64;
//! }
//!
//! // Step 0 is always an output step.
//! let report = probes.execute(&mesh, 0.0, 0).unwrap().unwrap();
//! assert_eq!(report.groups[0].probes[0].fields[0].mean, vec![1.0]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod load;
pub mod partition;
pub mod post;
pub mod provision;
pub mod sample;
pub mod spec;

pub use error::{LoadError, ProbeError};
pub use post::{DataProbes, Phase};
pub use sample::{FieldMean, GroupSamples, ProbeSamples, SampleReport};
pub use spec::{DataProbeConfig, FieldRequest, ProbeGroupSpec, ProbeSet, PROBE_FIELD_SUFFIX};
