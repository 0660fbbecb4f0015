//! Hierarchy ordering: parents reach every observer before their children,
//! node ids follow depth, and teardown runs children first.

use glam::Vec3;
use mirror_observer::ObserverConfig;
use mirror_shared::{AssetBundlePlatform, ComponentKind, ComponentMessage, NodeId};
use mirror_test::{
    component_messages, first_message_index, is_full_transform, transform_flags, SceneOp,
    TestHarness, TestNode,
};
use proptest::prelude::*;

fn observer_config() -> ObserverConfig {
    ObserverConfig {
        platform: AssetBundlePlatform::WSA,
        has_preloaded_assets: true,
        ..ObserverConfig::default()
    }
}

fn ready_harness() -> TestHarness {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::new();
    harness.add_observer(observer_config());
    harness.connect(0);
    harness
}

#[test]
fn root_and_child_created_before_any_root_delta() {
    let mut harness = ready_harness();
    let root = harness.scene.spawn("Root", None);
    let child = harness.scene.spawn("Child", Some(root));

    assert!(harness.run_until_ready(10));
    harness.tick();

    harness.scene.set_position(root, Vec3::new(1.0, 2.0, 3.0));
    harness.tick();

    let root_id = harness.source.node_id(&root).unwrap();
    let child_id = harness.source.node_id(&child).unwrap();
    assert!(root_id < child_id);

    let messages = component_messages(&harness.syncs_to(0));
    let root_flags = transform_flags(&messages, root_id);
    let child_flags = transform_flags(&messages, child_id);
    assert_eq!(root_flags.len(), 2);
    assert_eq!(child_flags.len(), 1);
    assert!(is_full_transform(root_flags[0]));
    assert!(!is_full_transform(root_flags[1]));
    assert!(is_full_transform(child_flags[0]));

    let root_first = first_message_index(&messages, root_id).unwrap();
    let child_first = first_message_index(&messages, child_id).unwrap();
    let root_delta = messages
        .iter()
        .rposition(|message| message.node() == root_id)
        .unwrap();
    assert!(root_first < child_first);
    assert!(child_first < root_delta);

    let mirror = &harness.observer(0).scene;
    let (mirror_root, root_data) = mirror.find("Root").unwrap();
    let (_, child_data) = mirror.find("Child").unwrap();
    assert_eq!(root_data.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(child_data.parent, Some(mirror_root));
}

#[test]
fn late_child_is_tracked_after_its_parent() {
    let mut harness = ready_harness();
    let root = harness.scene.spawn("Root", None);
    assert!(harness.run_until_ready(10));
    harness.tick();

    let child = harness.scene.spawn("Late", Some(root));
    let grandchild = harness.scene.spawn("Later", Some(child));
    harness.tick();

    let root_id = harness.source.node_id(&root).unwrap();
    let child_id = harness.source.node_id(&child).unwrap();
    let grandchild_id = harness.source.node_id(&grandchild).unwrap();
    assert!(root_id < child_id && child_id < grandchild_id);

    let mirror = &harness.observer(0).scene;
    let (late, _) = mirror.find("Late").unwrap();
    let (_, later) = mirror.find("Later").unwrap();
    assert_eq!(later.parent, Some(late));
}

#[test]
fn destroyed_subtree_is_torn_down_children_first() {
    let mut harness = ready_harness();
    let root = harness.scene.spawn("Root", None);
    let branch = harness.scene.spawn("Branch", Some(root));
    let leaf = harness.scene.spawn("Leaf", Some(branch));
    assert!(harness.run_until_ready(10));
    harness.tick();

    let branch_id = harness.source.node_id(&branch).unwrap();
    let leaf_id = harness.source.node_id(&leaf).unwrap();
    harness.hub.clear_log();
    harness.observers[0].scene.clear_ops();

    harness.scene.despawn(branch);
    harness.tick();

    let destroyed: Vec<NodeId> = component_messages(&harness.syncs_to(0))
        .into_iter()
        .filter_map(|message| match message {
            ComponentMessage::Destroyed {
                node,
                kind: ComponentKind::Transform,
            } => Some(node),
            _ => None,
        })
        .collect();
    assert_eq!(destroyed, vec![leaf_id, branch_id]);

    assert_eq!(harness.source.node_id(&branch), None);
    assert_eq!(harness.source.node_count(), 1);

    let observer = harness.observer(0);
    assert!(observer.scene.find("Branch").is_none());
    assert!(observer.scene.find("Leaf").is_none());
    assert!(observer.scene.find("Root").is_some());
    let despawns = observer
        .scene
        .ops()
        .iter()
        .filter(|op| matches!(op, SceneOp::Despawn(_)))
        .count();
    assert_eq!(despawns, 2);
    assert_eq!(observer.session.mirror().len(), 1);
}

#[test]
fn reconnect_rebuilds_the_mirror_from_scratch() {
    let mut harness = ready_harness();
    let root = harness.scene.spawn("Root", None);
    harness.scene.spawn("Child", Some(root));
    assert!(harness.run_until_ready(10));
    harness.tick();
    assert_eq!(harness.observer(0).scene.len(), 2);

    harness.disconnect(0);
    harness.tick();
    assert!(!harness.observer(0).session.is_connected());

    harness.connect(0);
    harness.tick();
    // the old mirror is gone as soon as the observer reconnects
    assert!(harness.observer(0).scene.is_empty());

    assert!(harness.run_until_ready(10));
    harness.tick();
    assert_eq!(harness.observer(0).scene.len(), 2);
}

fn forest() -> impl Strategy<Value = Vec<Option<usize>>> {
    (1usize..24).prop_flat_map(|count| {
        (0..count)
            .map(|index| {
                if index == 0 {
                    Just(None).boxed()
                } else {
                    prop_oneof![
                        1 => Just(None),
                        4 => (0..index).prop_map(Some),
                    ]
                    .boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every parent's first message precedes its child's on the wire, and ids
    /// grow with depth
    #[test]
    fn prop_parents_reach_observers_first(parents in forest()) {
        let mut harness = ready_harness();
        let mut nodes: Vec<TestNode> = Vec::new();
        for (index, parent) in parents.iter().enumerate() {
            let parent = parent.map(|parent| nodes[parent]);
            nodes.push(harness.scene.spawn(&format!("n{}", index), parent));
        }

        prop_assert!(harness.run_until_ready(10));
        harness.tick();

        let messages = component_messages(&harness.syncs_to(0));
        for (index, parent) in parents.iter().enumerate() {
            let Some(parent) = parent else {
                continue;
            };
            let child_id = harness.source.node_id(&nodes[index]).unwrap();
            let parent_id = harness.source.node_id(&nodes[*parent]).unwrap();
            prop_assert!(parent_id < child_id);
            prop_assert!(
                first_message_index(&messages, parent_id).unwrap()
                    < first_message_index(&messages, child_id).unwrap()
            );

            let mirror = &harness.observer(0).scene;
            let (mirror_parent, _) = mirror.find(&format!("n{}", parent)).unwrap();
            let (_, mirror_child) = mirror.find(&format!("n{}", index)).unwrap();
            prop_assert_eq!(mirror_child.parent, Some(mirror_parent));
        }
        prop_assert_eq!(harness.observer(0).scene.len(), parents.len());
    }
}
