//! Mesh abstractions for the sonde probe system.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! boundary between the probe post-processing code and the external
//! distributed-mesh engine: strongly-typed identifiers, the [`MeshMeta`]
//! and [`MeshBulk`] trait seams, the [`Selector`] part predicate, and
//! [`MeshError`]. The mesh engine itself (entity storage, ghosting,
//! parallel identifier generation, field storage) lives behind these
//! traits and is never owned by this workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bulk;
pub mod error;
pub mod id;
pub mod meta;
pub mod selector;

pub use bulk::MeshBulk;
pub use error::MeshError;
pub use id::{Coord, EntityId, EntityRank, FieldId, NodeHandle, PartId, RankId};
pub use meta::MeshMeta;
pub use selector::Selector;
