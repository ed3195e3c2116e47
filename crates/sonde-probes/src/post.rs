//! Driver-facing probe lifecycle.

use indexmap::IndexSet;
use serde_yaml::Value;
use std::fmt;
use tracing::info;

use crate::error::{LoadError, ProbeError};
use crate::sample::SampleReport;
use crate::spec::{DataProbeConfig, ProbeGroupSpec};
use crate::{geometry, load, provision, sample};
use sonde_mesh::{MeshBulk, MeshMeta, Selector};

/// Lifecycle phase of a [`DataProbes`] instance.
///
/// The mesh protocol is order-dependent: parts and fields must be
/// declared before mesh finalization and entities created after it.
/// The phase is tracked explicitly and each operation fails fast when
/// invoked out of order instead of corrupting mesh state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Specifications loaded; nothing declared on the mesh yet.
    Loaded,
    /// Parts and fields declared; awaiting mesh finalization.
    Declared,
    /// Nodes created and positioned; sampling is available.
    Provisioned,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Declared => write!(f, "declared"),
            Self::Provisioned => write!(f, "provisioned"),
        }
    }
}

/// The data-probe post-processing system.
///
/// Owns the probe specifications for the whole run and walks them
/// through the three lifecycle operations the simulation driver calls
/// at fixed points:
///
/// 1. [`setup`](DataProbes::setup), before mesh finalization.
/// 2. [`initialize`](DataProbes::initialize), after mesh finalization.
/// 3. [`execute`](DataProbes::execute), once per simulation step.
///
/// Between steps the driver can subtract
/// [`inactive_selector`](DataProbes::inactive_selector) from its
/// active-physics selector so probe-only nodes never enter a solve.
pub struct DataProbes {
    groups: Vec<ProbeGroupSpec>,
    output_frequency: u64,
    phase: Phase,
    inactive: Selector,
    warned: IndexSet<String>,
}

impl DataProbes {
    /// Build from an already-loaded configuration.
    pub fn new(config: DataProbeConfig) -> Self {
        Self {
            groups: config.groups,
            output_frequency: config.output_frequency,
            phase: Phase::Loaded,
            inactive: Selector::empty(),
            warned: IndexSet::new(),
        }
    }

    /// Load the `data_probes` section of a configuration document.
    ///
    /// Returns `Ok(None)` when the document has no such section, in
    /// which case the run simply has no probes. `num_ranks` must match
    /// the size of the collective run.
    pub fn from_config(doc: &Value, num_ranks: u32) -> Result<Option<Self>, LoadError> {
        Ok(load::load(doc, num_ranks)?.map(Self::new))
    }

    /// Declare probe parts and fields on the mesh registry.
    ///
    /// Every rank must call this before mesh finalization.
    pub fn setup<M: MeshMeta>(&mut self, mesh: &mut M) -> Result<(), ProbeError> {
        self.expect_phase("setup", Phase::Loaded)?;
        provision::declare(&mut self.groups, mesh)?;
        self.phase = Phase::Declared;
        Ok(())
    }

    /// Create and position probe nodes, then build the inactive selector.
    ///
    /// Every rank must call this after mesh finalization, exactly once.
    /// The collective identifier and modification calls inside run on
    /// every rank; only owning ranks declare entities.
    pub fn initialize<M>(&mut self, mesh: &mut M) -> Result<(), ProbeError>
    where
        M: MeshMeta + MeshBulk,
    {
        self.expect_phase("initialize", Phase::Declared)?;
        provision::create(&mut self.groups, mesh)?;
        geometry::place_all(&self.groups, mesh)?;
        self.inactive = Selector::union_of(
            self.groups
                .iter()
                .flat_map(|group| group.sets.iter())
                .flat_map(|set| set.parts.iter().filter_map(|part| *part)),
        );
        self.phase = Phase::Provisioned;
        info!(parts = self.inactive.len(), "probe system provisioned");
        Ok(())
    }

    /// Sample probes if `step` is an output step.
    ///
    /// Returns `Ok(None)` on idle steps. On output steps, returns the
    /// means for every probe owned by this rank and logs one line per
    /// field component.
    pub fn execute<M>(
        &mut self,
        mesh: &M,
        time: f64,
        step: u64,
    ) -> Result<Option<SampleReport>, ProbeError>
    where
        M: MeshMeta + MeshBulk,
    {
        self.expect_phase("execute", Phase::Provisioned)?;
        if !sample::is_output_step(step, self.output_frequency) {
            return Ok(None);
        }
        Ok(Some(sample::sample(
            &self.groups,
            mesh,
            time,
            step,
            &mut self.warned,
        )))
    }

    /// Union selector over every probe part.
    ///
    /// Empty until [`initialize`](DataProbes::initialize) has run.
    pub fn inactive_selector(&self) -> &Selector {
        &self.inactive
    }

    /// Mutable access to the inactive selector, for drivers that fold
    /// additional parts into it.
    pub fn inactive_selector_mut(&mut self) -> &mut Selector {
        &mut self.inactive
    }

    /// The loaded probe groups.
    pub fn groups(&self) -> &[ProbeGroupSpec] {
        &self.groups
    }

    /// Sampling cadence in steps.
    pub fn output_frequency(&self) -> u64 {
        self.output_frequency
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn expect_phase(&self, operation: &'static str, expected: Phase) -> Result<(), ProbeError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ProbeError::Lifecycle {
                operation,
                expected,
                actual: self.phase,
            })
        }
    }
}
