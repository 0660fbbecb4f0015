//! Full snapshot versus delta decisions per node and per observer, and what
//! keeps a node from being sent at all.

use std::collections::BTreeMap;

use glam::Vec3;
use mirror_observer::ObserverConfig;
use mirror_shared::{
    AssetBundlePlatform, BroadcastConfig, ComponentMessage, ComponentUpdate, NodeId, NodeTag,
    TransformChangeFlags,
};
use mirror_source::SourceConfig;
use mirror_test::{component_messages, is_full_transform, transform_flags, TestHarness};

fn observer_config() -> ObserverConfig {
    ObserverConfig {
        platform: AssetBundlePlatform::WSA,
        has_preloaded_assets: true,
        ..ObserverConfig::default()
    }
}

fn harness_with_observers(count: usize) -> TestHarness {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::new();
    for index in 0..count {
        harness.add_observer(observer_config());
        harness.connect(index);
    }
    harness
}

/// Transform flags per node, in delivery order
fn transform_history(harness: &TestHarness, observer: usize) -> BTreeMap<NodeId, Vec<TransformChangeFlags>> {
    let mut history: BTreeMap<NodeId, Vec<TransformChangeFlags>> = BTreeMap::new();
    for message in component_messages(&harness.syncs_to(observer)) {
        if let ComponentMessage::Updated {
            node,
            update: ComponentUpdate::Transform(flags, _),
        } = message
        {
            history.entry(node).or_default().push(flags);
        }
    }
    history
}

#[test]
fn every_observer_starts_each_node_with_a_full_snapshot() {
    let mut harness = harness_with_observers(2);
    let root = harness.scene.spawn("Root", None);
    let child = harness.scene.spawn("Child", Some(root));
    assert!(harness.run_until_ready(10));

    for frame in 0..5 {
        harness
            .scene
            .set_position(root, Vec3::new(frame as f32, 0.0, 0.0));
        harness
            .scene
            .set_position(child, Vec3::new(0.0, frame as f32, 0.0));
        harness.tick();
    }

    for observer in 0..2 {
        let history = transform_history(&harness, observer);
        assert_eq!(history.len(), 2);
        for flags in history.values() {
            assert!(is_full_transform(flags[0]));
            assert!(flags[1..].iter().all(|flags| !is_full_transform(*flags)));
            assert!(flags[1..]
                .iter()
                .all(|flags| *flags == TransformChangeFlags::POSITION));
        }
    }
}

#[test]
fn late_observer_gets_a_full_snapshot_while_others_get_deltas() {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::new();
    harness.add_observer(observer_config());
    harness.add_observer(observer_config());
    harness.connect(0);
    let root = harness.scene.spawn("Root", None);
    harness.tick_n(4);

    harness.connect(1);
    for frame in 0..6 {
        harness
            .scene
            .set_position(root, Vec3::new(frame as f32, 1.0, 0.0));
        harness.tick();
    }

    let root_id = harness.source.node_id(&root).unwrap();
    let early = transform_flags(&component_messages(&harness.syncs_to(0)), root_id);
    let late = transform_flags(&component_messages(&harness.syncs_to(1)), root_id);

    assert_eq!(early.iter().filter(|flags| is_full_transform(**flags)).count(), 1);
    assert!(is_full_transform(late[0]));
    assert_eq!(late.iter().filter(|flags| is_full_transform(**flags)).count(), 1);
    assert_eq!(
        harness.observer(1).scene.find("Root").unwrap().1.position,
        Vec3::new(5.0, 1.0, 0.0)
    );
}

#[test]
fn blocked_observer_is_demoted_and_resent_a_full_snapshot() {
    let mut harness = harness_with_observers(2);
    let root = harness.scene.spawn("Root", None);
    let child = harness.scene.spawn("Child", Some(root));
    assert!(harness.run_until_ready(10));
    harness.tick();

    let blocked = harness.observer_address(1);
    assert!(harness.source.block_connection(&root, blocked));
    harness.hub.clear_log();

    harness.scene.set_position(root, Vec3::X);
    harness.scene.set_position(child, Vec3::Y);
    harness.tick_n(2);
    assert!(harness.syncs_to(1).is_empty());
    assert_eq!(transform_history(&harness, 0).len(), 2);

    assert!(harness.source.unblock_connection(&root, &blocked));
    harness.hub.clear_log();
    harness.scene.set_position(root, Vec3::Z);
    harness.tick();

    let resumed = transform_history(&harness, 1);
    assert_eq!(resumed.len(), 2);
    assert!(resumed.values().all(|flags| flags.len() == 1 && is_full_transform(flags[0])));

    let continued = transform_history(&harness, 0);
    let root_id = harness.source.node_id(&root).unwrap();
    assert_eq!(continued.get(&root_id), Some(&vec![TransformChangeFlags::POSITION]));
    assert_eq!(continued.len(), 1);

    let mirror = &harness.observer(1).scene;
    assert_eq!(mirror.find("Root").unwrap().1.position, Vec3::Z);
    assert_eq!(mirror.find("Child").unwrap().1.position, Vec3::Y);
}

#[test]
fn each_node_is_completed_once_per_frame() {
    let mut harness = harness_with_observers(1);
    let root = harness.scene.spawn("Root", None);
    let branch = harness.scene.spawn("Branch", Some(root));
    harness.scene.spawn("Leaf", Some(branch));
    harness.scene.spawn("Sibling", Some(root));
    assert!(harness.run_until_ready(10));

    let syncs = harness.syncs_to(0);
    assert_eq!(syncs.len(), 1);
    let history = transform_history(&harness, 0);
    assert_eq!(history.len(), 4);
    assert!(history.values().all(|flags| flags.len() == 1));

    // nothing changed, nothing sent
    harness.hub.clear_log();
    harness.tick_n(3);
    assert!(harness.syncs_to(0).is_empty());
}

#[test]
fn hidden_subtree_is_never_sent() {
    let mut harness = harness_with_observers(1);
    let root = harness.scene.spawn("Root", None);
    let secret = harness.scene.spawn("Secret", Some(root));
    harness.scene.spawn("SecretChild", Some(secret));
    harness.scene.set_tag(secret, NodeTag::Hidden);
    assert!(harness.run_until_ready(10));
    harness.tick();

    let mirror = &harness.observer(0).scene;
    assert!(mirror.find("Root").is_some());
    assert!(mirror.find("Secret").is_none());
    assert!(mirror.find("SecretChild").is_none());
    assert_eq!(transform_history(&harness, 0).len(), 1);
}

#[test]
fn children_hidden_node_is_sent_without_its_children() {
    let mut harness = harness_with_observers(1);
    let root = harness.scene.spawn("Root", None);
    let panel = harness.scene.spawn("Panel", Some(root));
    harness.scene.spawn("PanelChild", Some(panel));
    harness.scene.set_tag(panel, NodeTag::ChildrenHidden);
    assert!(harness.run_until_ready(10));
    harness.tick();

    let mirror = &harness.observer(0).scene;
    assert!(mirror.find("Panel").is_some());
    assert!(mirror.find("PanelChild").is_none());
    assert_eq!(harness.source.node_count(), 2);
}

#[test]
fn only_explicitly_tracked_nodes_without_broadcast_all() {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::with_config(SourceConfig {
        broadcast: BroadcastConfig {
            broadcast_all_nodes: false,
            ..BroadcastConfig::default()
        },
        ..SourceConfig::default()
    });
    harness.add_observer(observer_config());
    harness.connect(0);

    let root = harness.scene.spawn("Root", None);
    let tracked = harness.scene.spawn("Tracked", Some(root));
    harness.scene.spawn("TrackedChild", Some(tracked));
    harness.scene.spawn("Untracked", None);

    let tracked_id = harness.source.track_node(&harness.scene, &tracked).unwrap();
    let root_id = harness.source.node_id(&root).unwrap();
    assert!(root_id < tracked_id);

    assert!(harness.run_until_ready(10));
    harness.tick();

    let mirror = &harness.observer(0).scene;
    assert!(mirror.find("Root").is_some());
    assert!(mirror.find("Tracked").is_some());
    assert!(mirror.find("TrackedChild").is_some());
    assert!(mirror.find("Untracked").is_none());
}

#[test]
fn inactive_node_only_reports_its_active_flag() {
    let mut harness = harness_with_observers(1);
    let root = harness.scene.spawn("Root", None);
    let child = harness.scene.spawn("Child", Some(root));
    assert!(harness.run_until_ready(10));
    harness.tick();
    let child_id = harness.source.node_id(&child).unwrap();

    harness.hub.clear_log();
    harness.scene.set_active(child, false);
    harness.tick();
    harness.scene.set_position(child, Vec3::new(4.0, 0.0, 0.0));
    harness.tick();

    let while_inactive = transform_flags(&component_messages(&harness.syncs_to(0)), child_id);
    assert_eq!(while_inactive, vec![TransformChangeFlags::IS_ACTIVE]);
    assert!(!harness.observer(0).scene.find("Child").unwrap().1.active);

    harness.hub.clear_log();
    harness.scene.set_active(child, true);
    harness.tick();

    let reactivated = transform_flags(&component_messages(&harness.syncs_to(0)), child_id);
    assert_eq!(
        reactivated,
        vec![TransformChangeFlags::POSITION | TransformChangeFlags::IS_ACTIVE]
    );
    let mirrored = harness.observer(0).scene.find("Child").unwrap().1.clone();
    assert!(mirrored.active);
    assert_eq!(mirrored.position, Vec3::new(4.0, 0.0, 0.0));
}
