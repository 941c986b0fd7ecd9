//! Registry construction, lookups and the artifact format, exercised with
//! small hand-built catalogues.

use std::collections::BTreeMap;

use blockgen_registry::artifact::{self, Artifact, FORMAT_VERSION};
use blockgen_registry::registry::builder::bits_for_states;
use blockgen_registry::registry::expand::{MAX_STATES, StateAssociation, check_disjoint, expand, expand_all};
use blockgen_registry::{ArtifactError, Block, BlockId, BuildError, Registry, StateId};

fn block(id: u32, name: &str, min: u32, max: u32) -> Block {
    Block {
        id: BlockId(id),
        display_name: name.replace('_', " "),
        name: name.to_string(),
        hardness: 1.5,
        diggable: true,
        drop_ids: vec![id],
        needs_tools: BTreeMap::new(),
        min_state_id: StateId(min),
        max_state_id: StateId(max),
        transparent: false,
        filter_light_level: 15,
        emit_light_level: 0,
    }
}

// ---------------------------------------------------------------------------
// Palette width
// ---------------------------------------------------------------------------

#[test]
fn bits_for_zero_states_is_undefined() {
    assert_eq!(bits_for_states(0), None);
}

#[test]
fn bits_for_state_counts() {
    let cases = [
        (1, 0),
        (2, 1),
        (3, 2),
        (4, 2),
        (5, 3),
        (8, 3),
        (9, 4),
        (17_112, 15),
        (32_768, 15),
        (32_769, 16),
    ];
    for (count, bits) in cases {
        assert_eq!(bits_for_states(count), Some(bits), "count = {}", count);
    }
}

// ---------------------------------------------------------------------------
// State expansion
// ---------------------------------------------------------------------------

#[test]
fn expand_single_state() {
    let out = expand(&block(7, "stone", 1, 1)).unwrap();
    assert_eq!(out, vec![StateAssociation { state: StateId(1), block: BlockId(7) }]);
}

#[test]
fn expand_is_inclusive_on_both_ends() {
    let out = expand(&block(3, "grass_block", 8, 11)).unwrap();
    let states: Vec<u32> = out.iter().map(|a| a.state.0).collect();
    assert_eq!(states, vec![8, 9, 10, 11]);
    assert!(out.iter().all(|a| a.block == BlockId(3)));
}

#[test]
fn expand_all_aborts_on_inverted_range() {
    let blocks = vec![block(0, "air", 0, 0), block(1, "bad", 5, 2), block(2, "dirt", 6, 6)];
    let err = expand_all(&blocks).unwrap_err();
    assert_eq!(
        err,
        BuildError::Range {
            block: BlockId(1),
            name: "bad".into(),
            min: StateId(5),
            max: StateId(2),
        }
    );
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

#[test]
fn single_block_single_state() {
    let reg = Registry::build(vec![block(0, "air", 0, 0)]).unwrap();
    assert_eq!(reg.bits_per_block(), 0);
    assert_eq!(reg.state_count(), 1);
    let states: Vec<_> = reg.states().collect();
    assert_eq!(states, vec![(StateId(0), BlockId(0))]);
}

#[test]
fn two_blocks_five_states() {
    let reg = Registry::build(vec![block(1, "stone", 0, 3), block(2, "dirt", 4, 4)]).unwrap();
    assert_eq!(reg.state_count(), 5);
    assert_eq!(reg.bits_per_block(), 3);
    assert_eq!(reg.len(), 2);
}

#[test]
fn overlapping_intervals_fail() {
    let err = Registry::build(vec![block(1, "a", 0, 3), block(2, "b", 2, 5)]).unwrap_err();
    assert!(
        matches!(err, BuildError::Overlap { first: BlockId(1), second: BlockId(2), .. }),
        "got {:?}",
        err
    );
}

#[test]
fn wide_overlapping_intervals_fail_without_expanding() {
    let err = Registry::build(vec![block(0, "a", 0, u32::MAX), block(1, "b", 0, u32::MAX)]).unwrap_err();
    assert_eq!(
        err,
        BuildError::Overlap {
            state: StateId(0),
            first: BlockId(0),
            second: BlockId(1),
        }
    );
}

#[test]
fn interval_nested_inside_another_overlaps() {
    let blocks = vec![block(1, "outer", 0, 10), block(2, "tail", 11, 12), block(3, "inner", 3, 4)];
    assert_eq!(
        check_disjoint(&blocks).unwrap_err(),
        BuildError::Overlap {
            state: StateId(3),
            first: BlockId(1),
            second: BlockId(3),
        }
    );
}

#[test]
fn adjacent_intervals_are_disjoint() {
    let blocks = vec![block(1, "a", 0, 10), block(2, "b", 11, 11), block(3, "c", 12, 20)];
    assert!(check_disjoint(&blocks).is_ok());
}

#[test]
fn oversized_catalogue_is_refused() {
    let err = Registry::build(vec![block(0, "everything", 0, u32::MAX)]).unwrap_err();
    assert_eq!(
        err,
        BuildError::TooManyStates {
            count: u64::from(u32::MAX) + 1,
            limit: MAX_STATES,
        }
    );
}

#[test]
fn inverted_interval_fails() {
    let err = Registry::build(vec![block(1, "a", 5, 2)]).unwrap_err();
    assert!(matches!(err, BuildError::Range { .. }), "got {:?}", err);
}

#[test]
fn duplicate_block_id_fails() {
    let err = Registry::build(vec![block(4, "a", 0, 0), block(4, "b", 1, 1)]).unwrap_err();
    assert_eq!(
        err,
        BuildError::DuplicateKey {
            id: BlockId(4),
            first: "a".into(),
            second: "b".into(),
        }
    );
}

#[test]
fn duplicate_block_name_fails() {
    let err = Registry::build(vec![block(1, "a", 0, 0), block(2, "a", 1, 1)]).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateName { .. }), "got {:?}", err);
}

#[test]
fn empty_catalogue_fails() {
    assert_eq!(Registry::build(Vec::new()).unwrap_err(), BuildError::EmptyCatalogue);
}

#[test]
fn discontinuous_intervals_leave_gaps_unresolved() {
    let reg = Registry::build(vec![block(0, "air", 0, 0), block(1, "stone", 10, 12)]).unwrap();
    assert_eq!(reg.state_count(), 4);
    assert_eq!(reg.bits_per_block(), 2);
    for gap in 1..10 {
        assert_eq!(reg.block_id_for_state(StateId(gap)), None, "state {}", gap);
    }
    assert_eq!(reg.block_id_for_state(StateId(13)), None);
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

fn sample() -> Registry {
    Registry::build(vec![
        block(9, "oak_log", 73, 75),
        block(0, "air", 0, 0),
        block(1, "stone", 1, 1),
        block(8, "grass_block", 8, 9),
    ])
    .unwrap()
}

#[test]
fn every_state_resolves_to_its_owner() {
    let reg = sample();
    let mut expected_total = 0;
    for b in &reg {
        assert!(b.min_state_id <= b.max_state_id);
        for s in b.states() {
            assert_eq!(reg.block_id_for_state(StateId(s)), Some(b.id));
            assert_eq!(reg.block_for_state(StateId(s)).map(|x| &x.name), Some(&b.name));
        }
        expected_total += b.state_count() as usize;
    }
    assert_eq!(reg.state_count(), expected_total);
}

#[test]
fn intervals_are_pairwise_disjoint() {
    let reg = sample();
    let blocks: Vec<&Block> = reg.iter().collect();
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            assert!(a.max_state_id < b.min_state_id || b.max_state_id < a.min_state_id);
        }
    }
}

#[test]
fn lookup_by_id_and_name() {
    let reg = sample();
    assert_eq!(reg.get(BlockId(8)).unwrap().name, "grass_block");
    assert_eq!(reg.by_name("oak_log").unwrap().id, BlockId(9));
    assert!(reg.get(BlockId(2)).is_none());
    assert!(reg.by_name("bedrock").is_none());
}

#[test]
fn states_iterate_in_state_order() {
    let states: Vec<(u32, u32)> = sample().states().map(|(s, b)| (s.0, b.0)).collect();
    assert_eq!(
        states,
        vec![(0, 0), (1, 1), (8, 8), (9, 8), (73, 9), (74, 9), (75, 9)]
    );
}

#[test]
fn blocks_iterate_in_id_order() {
    let ids: Vec<u32> = sample().iter().map(|b| b.id.0).collect();
    assert_eq!(ids, vec![0, 1, 8, 9]);
}

#[test]
fn building_twice_is_equal() {
    let mut blocks = vec![block(2, "dirt", 4, 4), block(1, "stone", 0, 3)];
    let first = Registry::build(blocks.clone()).unwrap();
    blocks.reverse();
    let second = Registry::build(blocks).unwrap();
    assert_eq!(first, second);
}

#[test]
fn harvest_tools() {
    let mut b = block(1, "stone", 1, 1);
    assert!(b.can_harvest_with(585), "no requirements means anything works");

    b.needs_tools.insert(585, true);
    b.needs_tools.insert(590, false);
    assert!(b.can_harvest_with(585));
    assert!(!b.can_harvest_with(590));
    assert!(!b.can_harvest_with(1));
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();

    let reg = std::sync::Arc::new(sample());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let reg = std::sync::Arc::clone(&reg);
            std::thread::spawn(move || reg.block_id_for_state(StateId(74)))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Some(BlockId(9)));
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

#[test]
fn artifact_reloads_into_equal_registry() {
    let reg = sample();
    let json = artifact::to_json(&reg).unwrap();
    let reloaded = Registry::from_json(&json).unwrap();
    assert_eq!(reg, reloaded);
}

#[test]
fn artifact_preserves_full_precision_hardness() {
    let hardness = [
        11.290774160688077,
        0.1 + 0.2,
        99.99999999999999,
        std::f64::consts::PI,
        5e-324,
    ];
    let blocks: Vec<Block> = hardness
        .iter()
        .enumerate()
        .map(|(i, &h)| Block {
            hardness: h,
            ..block(i as u32, &format!("b{}", i), i as u32, i as u32)
        })
        .collect();
    let reg = Registry::build(blocks).unwrap();

    let reloaded = Registry::from_json(&artifact::to_json(&reg).unwrap()).unwrap();
    assert_eq!(reg, reloaded);
    for (i, &h) in hardness.iter().enumerate() {
        let got = reloaded.get(BlockId(i as u32)).unwrap().hardness;
        assert_eq!(got.to_bits(), h.to_bits(), "hardness {} reloaded as {}", h, got);
    }
}

#[test]
fn artifact_json_is_deterministic() {
    let a = artifact::to_json(&sample()).unwrap();
    let b = artifact::to_json(&sample()).unwrap();
    assert_eq!(a, b);
    assert!(a.ends_with('\n'));
}

#[test]
fn artifact_states_are_keyed_by_state_id() {
    let json = artifact::to_json(&sample()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["states"]["74"], 9);
    assert_eq!(value["bits_per_block"], 3);
    assert_eq!(value["format_version"], FORMAT_VERSION);
}

#[test]
fn artifact_with_wrong_bits_is_rejected() {
    let mut art = sample().to_artifact();
    art.bits_per_block = 16;
    let err = Registry::from_artifact(art).unwrap_err();
    assert!(matches!(err, ArtifactError::Inconsistent(_)), "got {:?}", err);
}

#[test]
fn artifact_with_truncated_states_is_rejected() {
    let mut art = sample().to_artifact();
    art.states.remove(&StateId(74));
    let err = Registry::from_artifact(art).unwrap_err();
    assert!(matches!(err, ArtifactError::Inconsistent(_)), "got {:?}", err);
}

#[test]
fn artifact_with_reassigned_state_is_rejected() {
    let mut art = sample().to_artifact();
    art.states.insert(StateId(74), BlockId(0));
    let err = Registry::from_artifact(art).unwrap_err();
    assert!(matches!(err, ArtifactError::Inconsistent(_)), "got {:?}", err);
}

#[test]
fn artifact_with_unknown_version_is_rejected() {
    let art = Artifact {
        format_version: FORMAT_VERSION + 1,
        ..sample().to_artifact()
    };
    let err = Registry::from_artifact(art).unwrap_err();
    assert!(matches!(err, ArtifactError::Version { .. }), "got {:?}", err);
}

#[test]
fn artifact_with_overlapping_blocks_is_rejected() {
    let mut art = sample().to_artifact();
    art.blocks.push(block(100, "intruder", 74, 74));
    let err = Registry::from_artifact(art).unwrap_err();
    assert!(matches!(err, ArtifactError::Build(BuildError::Overlap { .. })), "got {:?}", err);
}

#[test]
fn load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");
    std::fs::write(&path, artifact::to_json(&sample()).unwrap()).unwrap();

    let reg = artifact::load(&path).unwrap();
    assert_eq!(reg.block_id_for_state(StateId(9)), Some(BlockId(8)));

    let missing = artifact::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(missing, ArtifactError::Io { .. }));
}
