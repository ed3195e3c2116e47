//! Probe specification model.
//!
//! Plain data describing what to probe: a [`ProbeGroupSpec`] per
//! configuration entry, each owning one or more [`ProbeSet`]s of
//! line-of-site probes. The loader populates these once at
//! configuration load; the lifecycle operations fill in the mesh-side
//! handles (`parts`, `nodes`) as provisioning progresses.

use sonde_mesh::{Coord, NodeHandle, PartId, RankId};

/// Suffix appended to every requested output field name.
///
/// The probe copy of a field must not collide with the physics-mesh
/// field of the same name, so `velocity` is registered on probe parts
/// as `velocity_probe`.
pub const PROBE_FIELD_SUFFIX: &str = "_probe";

/// A requested output field: suffixed name plus per-node component count.
///
/// # Examples
///
/// ```
/// use sonde_probes::FieldRequest;
///
/// let req = FieldRequest {
///     name: "velocity_probe".to_string(),
///     components: 3,
/// };
/// assert_eq!(req.components, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRequest {
    /// Field name as registered on the probe parts (suffix included).
    pub name: String,
    /// Number of components stored per node.
    pub components: u32,
}

/// `N` line-of-site probes belonging to one group.
///
/// Per-probe data lives in parallel arrays indexed `0..N-1`. Probe
/// names double as mesh part names and must be unique across the run.
/// `parts` is populated by the declare phase on every rank; `nodes` is
/// populated by the create phase on the owning rank only and stays
/// empty elsewhere.
#[derive(Clone, Debug, Default)]
pub struct ProbeSet {
    /// Probe name, used as the dedicated mesh part name.
    pub part_names: Vec<String>,
    /// Rank that owns each probe's nodes.
    pub owners: Vec<RankId>,
    /// Sample points per probe; always `>= 2`.
    pub point_counts: Vec<u32>,
    /// Line endpoint the last sample lands on.
    pub tips: Vec<Coord>,
    /// Line endpoint the first sample lands on.
    pub tails: Vec<Coord>,
    /// Dedicated mesh part per probe, filled by the declare phase.
    pub parts: Vec<Option<PartId>>,
    /// Owned node handles per probe; empty on non-owning ranks.
    pub nodes: Vec<Vec<NodeHandle>>,
}

impl ProbeSet {
    /// Number of probes in the set.
    pub fn len(&self) -> usize {
        self.part_names.len()
    }

    /// Whether the set holds no probes.
    pub fn is_empty(&self) -> bool {
        self.part_names.is_empty()
    }
}

/// A named group of homogeneous probes.
///
/// Probes in a group share their source mesh-region names and their
/// output field list. Created once at configuration load; immutable
/// thereafter.
#[derive(Clone, Debug, Default)]
pub struct ProbeGroupSpec {
    /// Group name from the configuration.
    pub name: String,
    /// Source mesh-region names the probes sample from.
    pub from_parts: Vec<String>,
    /// Output fields requested for every probe in the group.
    pub fields: Vec<FieldRequest>,
    /// The group's probe sets.
    pub sets: Vec<ProbeSet>,
}

impl ProbeGroupSpec {
    /// Total number of probes across the group's sets.
    pub fn probe_count(&self) -> usize {
        self.sets.iter().map(ProbeSet::len).sum()
    }
}

/// Everything parsed from a `data_probes` configuration section.
#[derive(Clone, Debug, Default)]
pub struct DataProbeConfig {
    /// One group per specification entry.
    pub groups: Vec<ProbeGroupSpec>,
    /// Sampling cadence in steps.
    pub output_frequency: u64,
}
