//! Two-phase mesh entity provisioning.
//!
//! The declare phase runs before mesh finalization and registers one
//! node-rank part per probe plus the fields scoped to it. The create
//! phase runs after finalization and materializes the probe nodes,
//! keeping the collective identifier-generation and modification calls
//! symmetric across every rank.

use tracing::info;

use crate::error::ProbeError;
use crate::spec::ProbeGroupSpec;
use sonde_mesh::{EntityRank, MeshBulk, MeshMeta};

/// Name of the coordinate field registered on every probe part.
pub const COORDINATES_FIELD: &str = "coordinates";

/// Declare one part per probe and register its fields.
///
/// Must run on every rank before mesh finalization. Parts are flagged
/// I/O-visible so probe nodes appear in results output. Declarations
/// are idempotent at the mesh seam, so probes sharing a field name
/// resolve to one field scoped to many parts.
pub(crate) fn declare<M: MeshMeta>(
    groups: &mut [ProbeGroupSpec],
    mesh: &mut M,
) -> Result<(), ProbeError> {
    // Parts first, so field scoping below can never race a missing part.
    let mut part_count = 0usize;
    for group in groups.iter_mut() {
        for set in &mut group.sets {
            for probe in 0..set.len() {
                let part = mesh.declare_part(&set.part_names[probe], EntityRank::Node)?;
                mesh.set_io_attribute(part)?;
                set.parts[probe] = Some(part);
                part_count += 1;
            }
        }
    }

    let ndim = mesh.spatial_dimension() as u32;
    for group in groups.iter() {
        for set in &group.sets {
            for &part in set.parts.iter().flatten() {
                let coordinates = mesh.declare_field(COORDINATES_FIELD, ndim)?;
                mesh.put_field_on_part(coordinates, part)?;
                for request in &group.fields {
                    let field = mesh.declare_field(&request.name, request.components)?;
                    mesh.put_field_on_part(field, part)?;
                }
            }
        }
    }

    info!(parts = part_count, "declared probe parts and fields");
    Ok(())
}

/// Create every probe's nodes on its owning rank.
///
/// Must run on every rank after mesh finalization, exactly once. For
/// each probe, every rank requests the same number of identifiers and
/// opens the same modification bracket; only the owning rank declares
/// entities inside it. This keeps the collective call sequence
/// symmetric whether or not a rank owns anything.
pub(crate) fn create<M: MeshBulk>(
    groups: &mut [ProbeGroupSpec],
    mesh: &mut M,
) -> Result<(), ProbeError> {
    let my_rank = mesh.parallel_rank();
    let mut owned_nodes = 0usize;

    for group in groups.iter_mut() {
        for set in &mut group.sets {
            for probe in 0..set.len() {
                let part = set.parts[probe].ok_or_else(|| ProbeError::PartNotDeclared {
                    probe: set.part_names[probe].clone(),
                })?;
                let count = set.point_counts[probe] as usize;

                let ids = mesh.generate_entity_ids(EntityRank::Node, count)?;
                mesh.modification_begin()?;
                if set.owners[probe] == my_rank {
                    let mut handles = Vec::with_capacity(count);
                    for id in ids {
                        handles.push(mesh.declare_node(id, part)?);
                    }
                    owned_nodes += handles.len();
                    set.nodes[probe] = handles;
                }
                mesh.modification_end()?;
            }
        }
    }

    info!(
        rank = mesh.parallel_rank().0,
        nodes = owned_nodes,
        "created probe nodes"
    );
    Ok(())
}
