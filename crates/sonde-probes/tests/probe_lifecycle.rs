//! End-to-end lifecycle tests on a simulated multi-rank cluster.

use sonde_mesh::{MeshBulk, MeshMeta, RankId};
use sonde_probes::{DataProbes, Phase, ProbeError};
use sonde_test_utils::MockCluster;

const DOC: &str = r#"
data_probes:
  output_frequency: 10
  specifications:
    - name: wake_rake
      from_target_part: [block_1]
      line_of_site_specifications:
        - name: rake_0
          number_of_points: 3
          tip_coordinates: [0.0, 0.0, 1.0]
          tail_coordinates: [0.0, 0.0, 0.0]
        - name: rake_1
          number_of_points: 3
          tip_coordinates: [1.0, 0.0, 1.0]
          tail_coordinates: [1.0, 0.0, 0.0]
        - name: rake_2
          number_of_points: 4
          tip_coordinates: [2.0, 0.0, 1.0]
          tail_coordinates: [2.0, 0.0, 0.0]
        - name: rake_3
          number_of_points: 4
          tip_coordinates: [3.0, 0.0, 1.0]
          tail_coordinates: [3.0, 0.0, 0.0]
      output_variables:
        - field_name: velocity
          field_size: 3
        - field_name: temperature
          field_size: 1
"#;

fn probes_for(num_ranks: u32) -> DataProbes {
    let doc: serde_yaml::Value = serde_yaml::from_str(DOC).unwrap();
    DataProbes::from_config(&doc, num_ranks)
        .unwrap()
        .expect("document has a data_probes section")
}

/// Drive every rank of a cluster through setup → finalize → initialize.
fn provision_cluster(cluster: &mut MockCluster) -> Vec<DataProbes> {
    let size = cluster.size();
    let mut all_probes: Vec<DataProbes> = (0..size).map(|_| probes_for(size)).collect();

    for (rank, probes) in all_probes.iter_mut().enumerate() {
        probes.setup(cluster.rank_mut(rank as u32)).unwrap();
    }
    cluster.finalize_all();
    for (rank, probes) in all_probes.iter_mut().enumerate() {
        probes.initialize(cluster.rank_mut(rank as u32)).unwrap();
    }
    all_probes
}

#[test]
fn two_rank_provisioning_is_collectively_symmetric() {
    let mut cluster = MockCluster::new(2, 3);
    let all_probes = provision_cluster(&mut cluster);

    // Both ranks made identical collective call sequences.
    cluster.assert_symmetric();

    // Probes 0 and 1 belong to rank 0, probes 2 and 3 to rank 1.
    for (rank, probes) in all_probes.iter().enumerate() {
        let set = &probes.groups()[0].sets[0];
        assert_eq!(
            set.owners,
            vec![RankId(0), RankId(0), RankId(1), RankId(1)]
        );
        for probe in 0..set.len() {
            let expected = if set.owners[probe].0 == rank as u32 {
                set.point_counts[probe] as usize
            } else {
                0
            };
            assert_eq!(set.nodes[probe].len(), expected);
        }
        assert_eq!(probes.phase(), Phase::Provisioned);
    }

    // Node totals per rank match the owned point counts.
    assert_eq!(cluster.rank(0).node_count(), 6);
    assert_eq!(cluster.rank(1).node_count(), 8);

    // Every rank sees all four probe parts in the inactive selector.
    for probes in &all_probes {
        assert_eq!(probes.inactive_selector().len(), 4);
    }
}

#[test]
fn owned_nodes_receive_line_coordinates() {
    let mut cluster = MockCluster::new(2, 3);
    let all_probes = provision_cluster(&mut cluster);

    // rake_2 is owned by rank 1: 4 points from (2,0,0) to (2,0,1).
    let mesh = cluster.rank(1);
    let probes = &all_probes[1];
    let set = &probes.groups()[0].sets[0];
    let coordinates = mesh.field("coordinates").unwrap();

    let expected_z = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
    for (node, expected) in set.nodes[2].iter().zip(expected_z) {
        let data = mesh.field_data(coordinates, *node).unwrap();
        assert_eq!(data[0], 2.0);
        assert_eq!(data[1], 0.0);
        assert!((data[2] - expected).abs() < 1e-15);
    }
}

#[test]
fn sampling_reduces_owned_probes_to_means() {
    let mut cluster = MockCluster::new(2, 3);
    let mut all_probes = provision_cluster(&mut cluster);

    // Fill temperature on rank 0's probes: node j of rake_0 gets 10 * j,
    // every node of rake_1 gets 7.
    {
        let mesh = cluster.rank_mut(0);
        let temperature = mesh.field("temperature_probe").unwrap();
        let set = &all_probes[0].groups()[0].sets[0];
        let rake_0 = set.nodes[0].clone();
        let rake_1 = set.nodes[1].clone();
        for (j, node) in rake_0.iter().enumerate() {
            mesh.field_data_mut(temperature, *node).unwrap()[0] = 10.0 * j as f64;
        }
        for node in &rake_1 {
            mesh.field_data_mut(temperature, *node).unwrap()[0] = 7.0;
        }
    }

    let report = all_probes[0]
        .execute(cluster.rank(0), 1.5, 0)
        .unwrap()
        .expect("step 0 is an output step");
    assert_eq!(report.time, 1.5);
    assert_eq!(report.step, 0);
    assert_eq!(report.groups.len(), 1);

    let group = &report.groups[0];
    assert_eq!(group.name, "wake_rake");
    // Rank 0 owns rake_0 and rake_1 only.
    assert_eq!(group.probes.len(), 2);
    assert_eq!(group.probes[0].name, "rake_0");
    assert_eq!(group.probes[1].name, "rake_1");

    // (0 + 10 + 20) / 3 = 10; velocity was never written and stays zero.
    let rake_0 = &group.probes[0];
    assert_eq!(rake_0.fields[0].name, "velocity_probe");
    assert_eq!(rake_0.fields[0].mean, vec![0.0, 0.0, 0.0]);
    assert_eq!(rake_0.fields[1].name, "temperature_probe");
    assert_eq!(rake_0.fields[1].mean, vec![10.0]);
    assert_eq!(group.probes[1].fields[1].mean, vec![7.0]);
}

#[test]
fn idle_steps_produce_no_report() {
    let mut cluster = MockCluster::new(1, 3);
    let mut all_probes = provision_cluster(&mut cluster);
    let probes = &mut all_probes[0];

    for step in [1u64, 7, 9, 11, 19] {
        assert!(probes.execute(cluster.rank(0), 0.1, step).unwrap().is_none());
    }
    for step in [0u64, 10, 20] {
        assert!(probes.execute(cluster.rank(0), 0.1, step).unwrap().is_some());
    }
}

#[test]
fn lifecycle_operations_fail_fast_out_of_order() {
    let mut cluster = MockCluster::new(1, 3);
    let mut probes = probes_for(1);

    // initialize before setup
    let err = probes.initialize(cluster.rank_mut(0)).unwrap_err();
    assert_eq!(
        err,
        ProbeError::Lifecycle {
            operation: "initialize",
            expected: Phase::Declared,
            actual: Phase::Loaded,
        }
    );

    // execute before initialize
    probes.setup(cluster.rank_mut(0)).unwrap();
    let err = probes.execute(cluster.rank(0), 0.0, 0).unwrap_err();
    assert_eq!(
        err,
        ProbeError::Lifecycle {
            operation: "execute",
            expected: Phase::Provisioned,
            actual: Phase::Declared,
        }
    );

    // setup twice
    let err = probes.setup(cluster.rank_mut(0)).unwrap_err();
    assert!(matches!(err, ProbeError::Lifecycle { operation: "setup", .. }));
}

#[test]
fn non_owning_rank_reports_no_probes() {
    let mut cluster = MockCluster::new(4, 3);
    let mut all_probes = provision_cluster(&mut cluster);

    // With 4 probes over 4 ranks each rank owns exactly one.
    for rank in 0..4u32 {
        let report = all_probes[rank as usize]
            .execute(cluster.rank(rank), 0.0, 0)
            .unwrap()
            .unwrap();
        assert_eq!(report.groups[0].probes.len(), 1);
        assert_eq!(
            report.groups[0].probes[0].name,
            format!("rake_{rank}")
        );
    }
    cluster.assert_symmetric();
}
