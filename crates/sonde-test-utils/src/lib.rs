//! Test utilities and mock types for sonde development.
//!
//! Provides [`MockMesh`], an in-memory implementation of the
//! [`MeshMeta`] and [`MeshBulk`] seams for one simulated rank, and
//! [`MockCluster`], a fixed-size set of ranks for exercising the
//! collective-symmetry contract without a real parallel runtime.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;

use indexmap::IndexMap;
use sonde_mesh::{
    EntityId, EntityRank, FieldId, MeshBulk, MeshError, MeshMeta, NodeHandle, PartId, RankId,
};

pub mod cluster;

pub use cluster::MockCluster;

#[derive(Clone, Debug)]
struct MockPart {
    rank: EntityRank,
    io: bool,
}

#[derive(Clone, Debug)]
struct MockField {
    components: u32,
    parts: Vec<PartId>,
}

#[derive(Clone, Debug)]
struct MockNode {
    id: EntityId,
    part: PartId,
}

/// In-memory mesh engine for one simulated rank.
///
/// Implements the full [`MeshMeta`] + [`MeshBulk`] surface with the
/// phase rules of a real engine: registry mutation is rejected after
/// [`finalize`](MockMesh::finalize), bulk operations are rejected
/// before it, and entity declaration requires an open modification
/// bracket.
///
/// Identifier generation is deterministic. Each call hands rank `r` the
/// block `[next + r·count, next + (r+1)·count)` and advances `next` by
/// `size·count`, so ranks that make symmetric call sequences receive
/// globally-unique identifiers and agree on the generator state,
/// which is the parallel-consistency property of the real collective.
/// Asymmetric call sequences leave the ranks' generator states visibly
/// diverged, which [`MockCluster::assert_symmetric`] turns into a test
/// failure.
pub struct MockMesh {
    rank: RankId,
    size: u32,
    spatial_dim: usize,
    finalized: bool,
    in_modification: bool,
    parts: IndexMap<String, MockPart>,
    fields: IndexMap<String, MockField>,
    nodes: Vec<MockNode>,
    field_data: HashMap<(FieldId, NodeHandle), Vec<f64>>,
    next_entity_id: u64,
    generate_calls: Vec<(EntityRank, usize)>,
    modification_cycles: u32,
}

impl MockMesh {
    /// Create a mesh for rank `rank` of a `size`-rank run.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= size`, `size == 0`, or `spatial_dim` is not
    /// 2 or 3.
    pub fn new(rank: u32, size: u32, spatial_dim: usize) -> Self {
        assert!(size > 0, "cluster size must be at least 1");
        assert!(rank < size, "rank {rank} out of range for size {size}");
        assert!(
            spatial_dim == 2 || spatial_dim == 3,
            "spatial dimension must be 2 or 3"
        );
        Self {
            rank: RankId(rank),
            size,
            spatial_dim,
            finalized: false,
            in_modification: false,
            parts: IndexMap::new(),
            fields: IndexMap::new(),
            nodes: Vec::new(),
            field_data: HashMap::new(),
            next_entity_id: 1,
            generate_calls: Vec::new(),
            modification_cycles: 0,
        }
    }

    /// Single-rank convenience constructor.
    pub fn serial(spatial_dim: usize) -> Self {
        Self::new(0, 1, spatial_dim)
    }

    /// Finalize the mesh: registry mutation closes, bulk operations open.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Whether `finalize` has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Number of declared parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of nodes declared on this rank.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the given part carries the I/O attribute.
    pub fn is_io_part(&self, part: PartId) -> bool {
        self.parts
            .get_index(part.0 as usize)
            .is_some_and(|(_, p)| p.io)
    }

    /// Component count of a field, by name.
    pub fn field_components(&self, name: &str) -> Option<u32> {
        self.fields.get(name).map(|fld| fld.components)
    }

    /// Parts a field has been scoped to, by name.
    pub fn field_parts(&self, name: &str) -> Option<&[PartId]> {
        self.fields.get(name).map(|fld| fld.parts.as_slice())
    }

    /// Part membership of a declared node.
    pub fn node_part(&self, node: NodeHandle) -> Option<PartId> {
        self.nodes.get(node.0 as usize).map(|n| n.part)
    }

    /// Global identifier of a declared node.
    pub fn node_entity_id(&self, node: NodeHandle) -> Option<EntityId> {
        self.nodes.get(node.0 as usize).map(|n| n.id)
    }

    /// Record of `generate_entity_ids` calls, in order.
    pub fn generate_calls(&self) -> &[(EntityRank, usize)] {
        &self.generate_calls
    }

    /// Number of completed modification brackets.
    pub fn modification_cycles(&self) -> u32 {
        self.modification_cycles
    }

    /// Current identifier-generator state.
    pub fn generator_state(&self) -> u64 {
        self.next_entity_id
    }

    fn part_info(&self, part: PartId) -> Result<&MockPart, MeshError> {
        self.parts
            .get_index(part.0 as usize)
            .map(|(_, p)| p)
            .ok_or(MeshError::UnknownPart { part })
    }
}

impl MeshMeta for MockMesh {
    fn spatial_dimension(&self) -> usize {
        self.spatial_dim
    }

    fn declare_part(&mut self, name: &str, rank: EntityRank) -> Result<PartId, MeshError> {
        if self.finalized {
            return Err(MeshError::Finalized {
                operation: "declare_part",
            });
        }
        if let Some((index, _, existing)) = self.parts.get_full(name) {
            if existing.rank != rank {
                return Err(MeshError::PartRankMismatch {
                    name: name.to_string(),
                    existing: existing.rank,
                    requested: rank,
                });
            }
            return Ok(PartId(index as u32));
        }
        let index = self.parts.len();
        self.parts
            .insert(name.to_string(), MockPart { rank, io: false });
        Ok(PartId(index as u32))
    }

    fn set_io_attribute(&mut self, part: PartId) -> Result<(), MeshError> {
        if self.finalized {
            return Err(MeshError::Finalized {
                operation: "set_io_attribute",
            });
        }
        let entry = self
            .parts
            .get_index_mut(part.0 as usize)
            .map(|(_, p)| p)
            .ok_or(MeshError::UnknownPart { part })?;
        entry.io = true;
        Ok(())
    }

    fn declare_field(&mut self, name: &str, components: u32) -> Result<FieldId, MeshError> {
        if self.finalized {
            return Err(MeshError::Finalized {
                operation: "declare_field",
            });
        }
        if let Some((index, _, existing)) = self.fields.get_full(name) {
            if existing.components != components {
                return Err(MeshError::FieldSizeMismatch {
                    name: name.to_string(),
                    existing: existing.components,
                    requested: components,
                });
            }
            return Ok(FieldId(index as u32));
        }
        let index = self.fields.len();
        self.fields.insert(
            name.to_string(),
            MockField {
                components,
                parts: Vec::new(),
            },
        );
        Ok(FieldId(index as u32))
    }

    fn put_field_on_part(&mut self, field: FieldId, part: PartId) -> Result<(), MeshError> {
        if self.finalized {
            return Err(MeshError::Finalized {
                operation: "put_field_on_part",
            });
        }
        self.part_info(part)?;
        let entry = self
            .fields
            .get_index_mut(field.0 as usize)
            .map(|(_, fld)| fld)
            .ok_or(MeshError::UnknownField { field })?;
        if !entry.parts.contains(&part) {
            entry.parts.push(part);
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<FieldId> {
        self.fields.get_index_of(name).map(|i| FieldId(i as u32))
    }

    fn part(&self, name: &str) -> Option<PartId> {
        self.parts.get_index_of(name).map(|i| PartId(i as u32))
    }
}

impl MeshBulk for MockMesh {
    fn parallel_rank(&self) -> RankId {
        self.rank
    }

    fn parallel_size(&self) -> u32 {
        self.size
    }

    fn generate_entity_ids(
        &mut self,
        rank: EntityRank,
        count: usize,
    ) -> Result<Vec<EntityId>, MeshError> {
        if !self.finalized {
            return Err(MeshError::NotFinalized {
                operation: "generate_entity_ids",
            });
        }
        self.generate_calls.push((rank, count));
        let base = self.next_entity_id + u64::from(self.rank.0) * count as u64;
        let ids = (base..base + count as u64).map(EntityId).collect();
        self.next_entity_id += u64::from(self.size) * count as u64;
        Ok(ids)
    }

    fn modification_begin(&mut self) -> Result<(), MeshError> {
        if !self.finalized {
            return Err(MeshError::NotFinalized {
                operation: "modification_begin",
            });
        }
        if self.in_modification {
            return Err(MeshError::ModificationState {
                reason: "modification_begin inside an open bracket",
            });
        }
        self.in_modification = true;
        Ok(())
    }

    fn modification_end(&mut self) -> Result<(), MeshError> {
        if !self.in_modification {
            return Err(MeshError::ModificationState {
                reason: "modification_end without an open bracket",
            });
        }
        self.in_modification = false;
        self.modification_cycles += 1;
        Ok(())
    }

    fn declare_node(&mut self, id: EntityId, part: PartId) -> Result<NodeHandle, MeshError> {
        if !self.in_modification {
            return Err(MeshError::OutsideModification);
        }
        self.part_info(part)?;
        let handle = NodeHandle(self.nodes.len() as u32);
        self.nodes.push(MockNode { id, part });
        // Allocate zeroed storage for every field scoped to this part.
        for (index, (_, fld)) in self.fields.iter().enumerate() {
            if fld.parts.contains(&part) {
                self.field_data.insert(
                    (FieldId(index as u32), handle),
                    vec![0.0; fld.components as usize],
                );
            }
        }
        Ok(handle)
    }

    fn field_data(&self, field: FieldId, node: NodeHandle) -> Option<&[f64]> {
        self.field_data.get(&(field, node)).map(Vec::as_slice)
    }

    fn field_data_mut(&mut self, field: FieldId, node: NodeHandle) -> Option<&mut [f64]> {
        self.field_data.get_mut(&(field, node)).map(Vec::as_mut_slice)
    }
}
