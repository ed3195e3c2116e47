//! Post-finalization entity and field-data operations.

use crate::error::MeshError;
use crate::id::{EntityId, EntityRank, FieldId, NodeHandle, PartId, RankId};

/// Entity seam to the mesh engine, valid after mesh finalization.
///
/// `MeshBulk` covers the create phase: allocating globally-unique
/// entity identifiers, declaring entities inside a modification
/// bracket, and reading or writing per-entity field data.
///
/// # Collective symmetry
///
/// [`generate_entity_ids`](MeshBulk::generate_entity_ids),
/// [`modification_begin`](MeshBulk::modification_begin), and
/// [`modification_end`](MeshBulk::modification_end) are collective:
/// every rank of the run must call them in the same order and the same
/// number of times, including ranks that declare no entities inside a
/// given bracket. An asymmetric call sequence stalls the collective or
/// diverges the identifier streams; there is no cancellation mechanism
/// for an in-flight collective.
///
/// # Field data
///
/// [`field_data`](MeshBulk::field_data) and
/// [`field_data_mut`](MeshBulk::field_data_mut) are fallible lookups:
/// they return `None` when the field is not registered on the entity's
/// part. Callers must treat `None` as an explicit condition rather than
/// assuming presence.
pub trait MeshBulk {
    /// This process's rank within the run.
    fn parallel_rank(&self) -> RankId;

    /// Total number of ranks in the run.
    fn parallel_size(&self) -> u32;

    /// Allocate `count` globally-unique entity identifiers.
    ///
    /// Collective. Each rank receives its own identifiers, distinct
    /// from every other rank's, and the generator state advances
    /// identically on all ranks.
    fn generate_entity_ids(
        &mut self,
        rank: EntityRank,
        count: usize,
    ) -> Result<Vec<EntityId>, MeshError>;

    /// Open a modification bracket.
    ///
    /// Collective. Topology changes are buffered until the matching
    /// [`modification_end`](MeshBulk::modification_end). Nested
    /// brackets are [`MeshError::ModificationState`].
    fn modification_begin(&mut self) -> Result<(), MeshError>;

    /// Close the current modification bracket, making buffered topology
    /// changes globally visible.
    ///
    /// Collective. Closing without an open bracket is
    /// [`MeshError::ModificationState`].
    fn modification_end(&mut self) -> Result<(), MeshError>;

    /// Declare a node entity with a previously generated identifier,
    /// placing it in `part`.
    ///
    /// Only legal inside a modification bracket, and only on the rank
    /// that will own the entity. Returns a rank-local handle.
    fn declare_node(&mut self, id: EntityId, part: PartId) -> Result<NodeHandle, MeshError>;

    /// Read the field data of one entity.
    ///
    /// The slice length is the field's component count. Returns `None`
    /// if `field` is not registered on the entity's part.
    fn field_data(&self, field: FieldId, node: NodeHandle) -> Option<&[f64]>;

    /// Mutably access the field data of one entity.
    ///
    /// Returns `None` if `field` is not registered on the entity's part.
    fn field_data_mut(&mut self, field: FieldId, node: NodeHandle) -> Option<&mut [f64]>;
}
