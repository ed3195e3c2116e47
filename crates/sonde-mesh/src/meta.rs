//! Pre-finalization mesh registry operations.

use crate::error::MeshError;
use crate::id::{EntityRank, FieldId, PartId};

/// Registry seam to the mesh engine, valid before mesh finalization.
///
/// `MeshMeta` covers the declare phase of mesh construction: naming
/// parts, registering fields, and scoping fields to parts. The driver
/// finalizes the concrete mesh after every subsystem has declared what
/// it needs; registry mutation after finalization is an integration
/// error ([`MeshError::Finalized`]).
///
/// # Idempotence
///
/// [`declare_part`](MeshMeta::declare_part) and
/// [`declare_field`](MeshMeta::declare_field) return the existing ID
/// when the same name is redeclared with matching parameters. A
/// redeclaration with a conflicting entity rank or component count is
/// an error: two subsystems disagreeing about a shared name cannot be
/// reconciled silently.
pub trait MeshMeta {
    /// Number of spatial dimensions of the mesh (2 or 3).
    fn spatial_dimension(&self) -> usize;

    /// Declare a part with the given name and entity rank.
    ///
    /// Redeclaring an existing part with the same rank is a no-op
    /// returning the existing ID.
    fn declare_part(&mut self, name: &str, rank: EntityRank) -> Result<PartId, MeshError>;

    /// Flag a part as I/O-visible, so its entities appear in results output.
    fn set_io_attribute(&mut self, part: PartId) -> Result<(), MeshError>;

    /// Declare a field with the given name and per-entity component count.
    ///
    /// Redeclaring an existing field with the same component count is a
    /// no-op returning the existing ID; a different count is
    /// [`MeshError::FieldSizeMismatch`].
    fn declare_field(&mut self, name: &str, components: u32) -> Result<FieldId, MeshError>;

    /// Scope a declared field to a declared part.
    ///
    /// Entities subsequently created in `part` carry storage for
    /// `field`. Repeating an existing scoping is a no-op.
    fn put_field_on_part(&mut self, field: FieldId, part: PartId) -> Result<(), MeshError>;

    /// Look up a field by name.
    fn field(&self, name: &str) -> Option<FieldId>;

    /// Look up a part by name.
    fn part(&self, name: &str) -> Option<PartId>;
}
