//! Strongly-typed identifiers and the [`Coord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a mesh part, a named grouping of entities.
///
/// Parts are declared in the mesh registry before finalization and
/// assigned sequential IDs by the engine. Every probe owns exactly one
/// part holding its sample nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PartId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a field registered in the mesh registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Globally-unique entity identifier.
///
/// Allocated by the mesh engine's collective identifier generator
/// ([`MeshBulk::generate_entity_ids`](crate::MeshBulk::generate_entity_ids)).
/// Unique across every rank of the run, not just locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Rank-local handle to a live entity.
///
/// Handles are non-owning references into the mesh engine's storage,
/// valid only on the rank that declared the entity and only while the
/// owning part exists. They are never exchanged between ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u32);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeHandle {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one process in a fixed-size collective-parallel run.
///
/// Valid ranks are `0..parallel_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankId(pub u32);

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RankId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Topological rank of a mesh entity.
///
/// Parts and identifier pools are scoped to an entity rank. Probe parts
/// are always [`EntityRank::Node`]; the other ranks exist so the trait
/// seam matches the engine's full topology model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRank {
    /// A point entity.
    Node,
    /// A 1D entity connecting two nodes.
    Edge,
    /// A 2D entity bounded by edges.
    Face,
    /// A full-dimensional cell.
    Element,
}

impl fmt::Display for EntityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
            Self::Face => write!(f, "face"),
            Self::Element => write!(f, "element"),
        }
    }
}

/// A spatial coordinate.
///
/// Uses `SmallVec<[f64; 3]>` so 2D and 3D coordinates live inline with
/// no heap allocation. The number of meaningful components is the mesh's
/// spatial dimension.
pub type Coord = SmallVec<[f64; 3]>;
