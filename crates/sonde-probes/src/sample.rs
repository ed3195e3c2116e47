//! Periodic sampling and mean reduction.
//!
//! On a designated output step the sampler reads every owned probe
//! node, accumulates a component-wise sum per requested field, and
//! divides by the owned node count. Reads are purely local: a probe's
//! nodes all live on its owning rank, so no cross-rank reduction is
//! needed and ranks that own nothing contribute nothing.

use indexmap::IndexSet;
use tracing::{info, warn};

use crate::spec::ProbeGroupSpec;
use sonde_mesh::{MeshBulk, MeshMeta};

/// Whether `step` is a designated output step.
///
/// Sampling triggers whenever `step % output_frequency == 0`, so step 0
/// always samples.
///
/// # Examples
///
/// ```
/// use sonde_probes::sample::is_output_step;
///
/// assert!(is_output_step(0, 10));
/// assert!(is_output_step(20, 10));
/// assert!(!is_output_step(7, 10));
/// ```
pub fn is_output_step(step: u64, output_frequency: u64) -> bool {
    step % output_frequency == 0
}

/// Per-component mean of one field over one probe's nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMean {
    /// Field name as registered on the probe part.
    pub name: String,
    /// One mean per field component.
    pub mean: Vec<f64>,
}

/// Means for every sampled field of one probe.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeSamples {
    /// Probe (part) name.
    pub name: String,
    /// One entry per field that was present on the mesh.
    pub fields: Vec<FieldMean>,
}

/// Samples for every locally-owned probe of one group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSamples {
    /// Group name from the configuration.
    pub name: String,
    /// One entry per probe owned by this rank.
    pub probes: Vec<ProbeSamples>,
}

/// Result of one sampling step on this rank.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleReport {
    /// Simulation time at the sampling step.
    pub time: f64,
    /// Step count at the sampling step.
    pub step: u64,
    /// One entry per probe group.
    pub groups: Vec<GroupSamples>,
}

/// Sample every owned probe and reduce to per-component means.
///
/// A requested field that is absent from the mesh, or not registered on
/// a probe's part, is reported through `warn!` once per field name and
/// skipped; remaining fields and probes are unaffected.
pub(crate) fn sample<M>(
    groups: &[ProbeGroupSpec],
    mesh: &M,
    time: f64,
    step: u64,
    warned: &mut IndexSet<String>,
) -> SampleReport
where
    M: MeshMeta + MeshBulk,
{
    info!(time, step, "sampling data probes");

    let mut report = SampleReport {
        time,
        step,
        groups: Vec::with_capacity(groups.len()),
    };

    for group in groups {
        let mut group_samples = GroupSamples {
            name: group.name.clone(),
            probes: Vec::new(),
        };

        for set in &group.sets {
            for probe in 0..set.len() {
                let nodes = &set.nodes[probe];
                if nodes.is_empty() {
                    // Not the owning rank.
                    continue;
                }
                let probe_name = &set.part_names[probe];
                let mut fields = Vec::with_capacity(group.fields.len());

                for request in &group.fields {
                    let Some(field) = mesh.field(&request.name) else {
                        warn_once(warned, &request.name);
                        continue;
                    };

                    let components = request.components as usize;
                    let mut mean = vec![0.0f64; components];
                    let mut missing = false;
                    for &node in nodes {
                        match mesh.field_data(field, node) {
                            Some(values) => {
                                for (m, v) in mean.iter_mut().zip(values) {
                                    *m += v;
                                }
                            }
                            None => {
                                missing = true;
                                break;
                            }
                        }
                    }
                    if missing {
                        warn_once(warned, &request.name);
                        continue;
                    }

                    let count = nodes.len() as f64;
                    for m in &mut mean {
                        *m /= count;
                    }
                    for (component, value) in mean.iter().enumerate() {
                        info!(
                            probe = %probe_name,
                            field = %request.name,
                            component,
                            mean = *value,
                            "probe mean"
                        );
                    }
                    fields.push(FieldMean {
                        name: request.name.clone(),
                        mean,
                    });
                }

                group_samples.probes.push(ProbeSamples {
                    name: probe_name.clone(),
                    fields,
                });
            }
        }

        report.groups.push(group_samples);
    }

    report
}

fn warn_once(warned: &mut IndexSet<String>, field: &str) {
    if warned.insert(field.to_string()) {
        warn!(
            field,
            "requested probe field is not registered on the mesh; skipping"
        );
    }
}
