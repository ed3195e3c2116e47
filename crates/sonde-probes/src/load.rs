//! Configuration loading.
//!
//! Consumes an already-parsed hierarchical document (a
//! [`serde_yaml::Value`]) and populates the spec model. The walk is
//! explicit, key by key: every required key that is absent or
//! mistyped raises a [`LoadError`] naming it, and nothing is loaded
//! past the first failure. No mesh or parallel state is touched here.

use serde_yaml::Value;

use crate::error::LoadError;
use crate::partition;
use crate::spec::{DataProbeConfig, FieldRequest, ProbeGroupSpec, ProbeSet, PROBE_FIELD_SUFFIX};
use sonde_mesh::Coord;

/// Sampling cadence used when the document does not set one.
pub const DEFAULT_OUTPUT_FREQUENCY: u64 = 10;

/// Load the optional `data_probes` section of a configuration document.
///
/// Returns `Ok(None)` when the section is absent; the probe system is
/// simply inactive for the run. When present, `specifications` must be
/// a non-empty sequence and every entry must parse completely.
/// `num_ranks` drives owning-rank assignment and must match the size of
/// the collective run.
pub fn load(doc: &Value, num_ranks: u32) -> Result<Option<DataProbeConfig>, LoadError> {
    let Some(section) = doc.get("data_probes") else {
        return Ok(None);
    };

    let specs = section
        .get("specifications")
        .ok_or(LoadError::MissingKey {
            context: "data_probes",
            key: "specifications",
        })?
        .as_sequence()
        .ok_or(LoadError::NotASequence {
            key: "specifications",
        })?;
    if specs.is_empty() {
        return Err(LoadError::EmptySpecifications);
    }

    let output_frequency = match section.get("output_frequency") {
        None => DEFAULT_OUTPUT_FREQUENCY,
        Some(value) => {
            let freq = value.as_u64().ok_or(LoadError::BadScalar {
                context: "data_probes",
                key: "output_frequency",
            })?;
            if freq == 0 {
                return Err(LoadError::ZeroOutputFrequency);
            }
            freq
        }
    };

    let mut groups = Vec::with_capacity(specs.len());
    for spec in specs {
        groups.push(load_group(spec, num_ranks)?);
    }

    Ok(Some(DataProbeConfig {
        groups,
        output_frequency,
    }))
}

fn load_group(spec: &Value, num_ranks: u32) -> Result<ProbeGroupSpec, LoadError> {
    let name = require_str(spec, "specification", "name")?;

    let from_parts = match spec.get("from_target_part") {
        None => {
            return Err(LoadError::MissingKey {
                context: "specification",
                key: "from_target_part",
            })
        }
        Some(Value::String(single)) => vec![single.clone()],
        Some(Value::Sequence(entries)) => {
            let mut names = Vec::with_capacity(entries.len());
            for entry in entries {
                names.push(
                    entry
                        .as_str()
                        .map(str::to_string)
                        .ok_or(LoadError::BadScalar {
                            context: "specification",
                            key: "from_target_part",
                        })?,
                );
            }
            names
        }
        Some(_) => {
            return Err(LoadError::BadScalar {
                context: "specification",
                key: "from_target_part",
            })
        }
    };

    // Line-of-site is the only supported probe kind.
    let entries = spec
        .get("line_of_site_specifications")
        .ok_or_else(|| LoadError::UnsupportedProbeKind { spec: name.clone() })?
        .as_sequence()
        .ok_or(LoadError::NotASequence {
            key: "line_of_site_specifications",
        })?;
    let set = load_line_of_site(entries, num_ranks)?;

    let fields = load_output_variables(spec)?;

    Ok(ProbeGroupSpec {
        name,
        from_parts,
        fields,
        sets: vec![set],
    })
}

fn load_line_of_site(entries: &[Value], num_ranks: u32) -> Result<ProbeSet, LoadError> {
    let num_probes = entries.len();
    let mut set = ProbeSet::default();

    for (index, entry) in entries.iter().enumerate() {
        let name = require_str(entry, "line_of_site_specification", "name")?;

        let points = entry
            .get("number_of_points")
            .ok_or(LoadError::MissingKey {
                context: "line_of_site_specification",
                key: "number_of_points",
            })?
            .as_u64()
            .ok_or(LoadError::BadScalar {
                context: "line_of_site_specification",
                key: "number_of_points",
            })?;
        if points < 2 {
            return Err(LoadError::TooFewPoints {
                probe: name,
                points,
            });
        }
        let points = u32::try_from(points).map_err(|_| LoadError::BadScalar {
            context: "line_of_site_specification",
            key: "number_of_points",
        })?;

        let tip = load_coordinates(entry, &name, "tip_coordinates")?;
        let tail = load_coordinates(entry, &name, "tail_coordinates")?;
        if tip.len() != tail.len() {
            return Err(LoadError::BadCoordinates {
                probe: name,
                key: "tail_coordinates",
                reason: format!(
                    "length {} does not match tip length {}",
                    tail.len(),
                    tip.len()
                ),
            });
        }

        set.part_names.push(name);
        set.owners
            .push(partition::owning_rank(index, num_probes, num_ranks));
        set.point_counts.push(points);
        set.tips.push(tip);
        set.tails.push(tail);
        set.parts.push(None);
        set.nodes.push(Vec::new());
    }

    Ok(set)
}

fn load_coordinates(entry: &Value, probe: &str, key: &'static str) -> Result<Coord, LoadError> {
    let components = entry
        .get(key)
        .ok_or(LoadError::MissingKey {
            context: "line_of_site_specification",
            key,
        })?
        .as_sequence()
        .ok_or_else(|| LoadError::BadCoordinates {
            probe: probe.to_string(),
            key,
            reason: "not a sequence".to_string(),
        })?;
    if components.len() < 2 || components.len() > 3 {
        return Err(LoadError::BadCoordinates {
            probe: probe.to_string(),
            key,
            reason: format!("expected 2 or 3 components, got {}", components.len()),
        });
    }
    components
        .iter()
        .map(|component| {
            component.as_f64().ok_or_else(|| LoadError::BadCoordinates {
                probe: probe.to_string(),
                key,
                reason: "non-numeric component".to_string(),
            })
        })
        .collect()
}

fn load_output_variables(spec: &Value) -> Result<Vec<FieldRequest>, LoadError> {
    let Some(value) = spec.get("output_variables") else {
        return Ok(Vec::new());
    };
    let entries = value.as_sequence().ok_or(LoadError::NotASequence {
        key: "output_variables",
    })?;

    let mut fields = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = require_str(entry, "output_variable", "field_name")?;
        let size = entry
            .get("field_size")
            .ok_or(LoadError::MissingKey {
                context: "output_variable",
                key: "field_size",
            })?
            .as_u64()
            .ok_or(LoadError::BadScalar {
                context: "output_variable",
                key: "field_size",
            })?;
        let components = u32::try_from(size).map_err(|_| LoadError::BadScalar {
            context: "output_variable",
            key: "field_size",
        })?;
        fields.push(FieldRequest {
            name: format!("{name}{PROBE_FIELD_SUFFIX}"),
            components,
        });
    }
    Ok(fields)
}

fn require_str(node: &Value, context: &'static str, key: &'static str) -> Result<String, LoadError> {
    node.get(key)
        .ok_or(LoadError::MissingKey { context, key })?
        .as_str()
        .map(str::to_string)
        .ok_or(LoadError::BadScalar { context, key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonde_mesh::RankId;

    fn doc(text: &str) -> Value {
        serde_yaml::from_str(text).expect("test document must parse")
    }

    const FULL: &str = r#"
data_probes:
  output_frequency: 5
  specifications:
    - name: wake_rake
      from_target_part: [block_1, block_2]
      line_of_site_specifications:
        - name: rake_lower
          number_of_points: 11
          tip_coordinates: [1.0, 0.0, 0.0]
          tail_coordinates: [0.0, 0.0, 0.0]
        - name: rake_upper
          number_of_points: 21
          tip_coordinates: [1.0, 0.5, 0.0]
          tail_coordinates: [0.0, 0.5, 0.0]
      output_variables:
        - field_name: velocity
          field_size: 3
        - field_name: temperature
          field_size: 1
"#;

    #[test]
    fn absent_section_is_inactive() {
        let config = load(&doc("other_section: {}"), 2).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn full_document_round_trips() {
        let config = load(&doc(FULL), 2).unwrap().unwrap();
        assert_eq!(config.output_frequency, 5);
        assert_eq!(config.groups.len(), 1);

        let group = &config.groups[0];
        assert_eq!(group.name, "wake_rake");
        assert_eq!(group.from_parts, vec!["block_1", "block_2"]);
        assert_eq!(group.sets.len(), 1);

        let set = &group.sets[0];
        assert_eq!(set.len(), 2);
        assert_eq!(set.part_names, vec!["rake_lower", "rake_upper"]);
        assert_eq!(set.point_counts, vec![11, 21]);
        assert_eq!(set.owners, vec![RankId(0), RankId(1)]);
        assert_eq!(set.tips[0].as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(set.tails[1].as_slice(), &[0.0, 0.5, 0.0]);
        assert!(set.parts.iter().all(Option::is_none));
        assert!(set.nodes.iter().all(Vec::is_empty));

        assert_eq!(group.fields.len(), 2);
        assert_eq!(group.fields[0].name, "velocity_probe");
        assert_eq!(group.fields[0].components, 3);
        assert_eq!(group.fields[1].name, "temperature_probe");
        assert_eq!(group.fields[1].components, 1);
    }

    #[test]
    fn scalar_from_target_part_is_accepted() {
        let text = r#"
data_probes:
  specifications:
    - name: single
      from_target_part: block_1
      line_of_site_specifications:
        - name: p0
          number_of_points: 2
          tip_coordinates: [0.0, 1.0]
          tail_coordinates: [0.0, 0.0]
"#;
        let config = load(&doc(text), 1).unwrap().unwrap();
        assert_eq!(config.groups[0].from_parts, vec!["block_1"]);
        assert_eq!(config.output_frequency, DEFAULT_OUTPUT_FREQUENCY);
        assert!(config.groups[0].fields.is_empty());
    }

    #[test]
    fn missing_specification_name_fails() {
        let text = r#"
data_probes:
  specifications:
    - from_target_part: block_1
      line_of_site_specifications: []
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingKey {
                context: "specification",
                key: "name",
            }
        );
    }

    #[test]
    fn missing_probe_name_fails() {
        let text = r#"
data_probes:
  specifications:
    - name: group
      from_target_part: block_1
      line_of_site_specifications:
        - number_of_points: 5
          tip_coordinates: [0.0, 1.0]
          tail_coordinates: [0.0, 0.0]
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingKey {
                context: "line_of_site_specification",
                key: "name",
            }
        );
    }

    #[test]
    fn missing_point_count_fails() {
        let text = r#"
data_probes:
  specifications:
    - name: group
      from_target_part: block_1
      line_of_site_specifications:
        - name: p0
          tip_coordinates: [0.0, 1.0]
          tail_coordinates: [0.0, 0.0]
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingKey {
                context: "line_of_site_specification",
                key: "number_of_points",
            }
        );
    }

    #[test]
    fn one_point_probe_is_rejected() {
        let text = r#"
data_probes:
  specifications:
    - name: group
      from_target_part: block_1
      line_of_site_specifications:
        - name: p0
          number_of_points: 1
          tip_coordinates: [0.0, 1.0]
          tail_coordinates: [0.0, 0.0]
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(
            err,
            LoadError::TooFewPoints {
                probe: "p0".to_string(),
                points: 1,
            }
        );
    }

    #[test]
    fn probe_kind_other_than_line_of_site_is_rejected() {
        let text = r#"
data_probes:
  specifications:
    - name: group
      from_target_part: block_1
      plane_specifications:
        - name: p0
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(
            err,
            LoadError::UnsupportedProbeKind {
                spec: "group".to_string(),
            }
        );
    }

    #[test]
    fn missing_field_size_fails() {
        let text = r#"
data_probes:
  specifications:
    - name: group
      from_target_part: block_1
      line_of_site_specifications:
        - name: p0
          number_of_points: 2
          tip_coordinates: [0.0, 1.0]
          tail_coordinates: [0.0, 0.0]
      output_variables:
        - field_name: velocity
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingKey {
                context: "output_variable",
                key: "field_size",
            }
        );
    }

    #[test]
    fn mismatched_endpoint_lengths_fail() {
        let text = r#"
data_probes:
  specifications:
    - name: group
      from_target_part: block_1
      line_of_site_specifications:
        - name: p0
          number_of_points: 2
          tip_coordinates: [0.0, 1.0, 0.0]
          tail_coordinates: [0.0, 0.0]
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert!(matches!(err, LoadError::BadCoordinates { .. }));
    }

    #[test]
    fn zero_output_frequency_is_rejected() {
        let text = r#"
data_probes:
  output_frequency: 0
  specifications:
    - name: group
      from_target_part: block_1
      line_of_site_specifications:
        - name: p0
          number_of_points: 2
          tip_coordinates: [0.0, 1.0]
          tail_coordinates: [0.0, 0.0]
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(err, LoadError::ZeroOutputFrequency);
    }

    #[test]
    fn empty_specifications_fail() {
        let text = r#"
data_probes:
  specifications: []
"#;
        let err = load(&doc(text), 1).unwrap_err();
        assert_eq!(err, LoadError::EmptySpecifications);
    }
}
