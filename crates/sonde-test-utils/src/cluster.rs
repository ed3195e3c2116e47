//! Fixed-size multi-rank harness.

use sonde_mesh::MeshBulk;

use crate::MockMesh;

/// A fixed-size set of [`MockMesh`] ranks simulating one collective run.
///
/// Drive each rank through the same operation sequence (the collective
/// contract), then call [`assert_symmetric`](MockCluster::assert_symmetric)
/// to verify that every rank made the same collective calls in the same
/// order and that the identifier generators agree.
pub struct MockCluster {
    ranks: Vec<MockMesh>,
}

impl MockCluster {
    /// Create a cluster of `size` ranks sharing one spatial dimension.
    pub fn new(size: u32, spatial_dim: usize) -> Self {
        let ranks = (0..size)
            .map(|r| MockMesh::new(r, size, spatial_dim))
            .collect();
        Self { ranks }
    }

    /// Number of ranks.
    pub fn size(&self) -> u32 {
        self.ranks.len() as u32
    }

    /// Borrow one rank's mesh.
    pub fn rank(&self, rank: u32) -> &MockMesh {
        &self.ranks[rank as usize]
    }

    /// Mutably borrow one rank's mesh.
    pub fn rank_mut(&mut self, rank: u32) -> &mut MockMesh {
        &mut self.ranks[rank as usize]
    }

    /// Iterate over all ranks.
    pub fn ranks(&self) -> impl Iterator<Item = &MockMesh> {
        self.ranks.iter()
    }

    /// Mutably iterate over all ranks.
    pub fn ranks_mut(&mut self) -> impl Iterator<Item = &mut MockMesh> {
        self.ranks.iter_mut()
    }

    /// Finalize every rank's mesh.
    pub fn finalize_all(&mut self) {
        for mesh in &mut self.ranks {
            mesh.finalize();
        }
    }

    /// Assert the collective-symmetry contract across all ranks.
    ///
    /// Every rank must have made identical `generate_entity_ids` call
    /// sequences, completed the same number of modification brackets,
    /// and arrived at the same identifier-generator state.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first divergence found.
    pub fn assert_symmetric(&self) {
        let reference = &self.ranks[0];
        for mesh in &self.ranks[1..] {
            let rank = mesh.parallel_rank().0;
            assert_eq!(
                reference.generate_calls(),
                mesh.generate_calls(),
                "rank {rank} diverged from rank 0 in generate_entity_ids calls",
            );
            assert_eq!(
                reference.modification_cycles(),
                mesh.modification_cycles(),
                "rank {rank} diverged from rank 0 in modification brackets",
            );
            assert_eq!(
                reference.generator_state(),
                mesh.generator_state(),
                "rank {rank} diverged from rank 0 in identifier-generator state",
            );
        }
    }
}
