//! Mesh renderer and audio source replication, including asset references and
//! component discovery

use glam::Vec4;
use mirror_observer::ObserverConfig;
use mirror_shared::{
    AssetBundlePlatform, AssetHandle, AssetKind, AudioSourceChangeFlags, AudioSourceData,
    BroadcastConfig, ComponentKind, ComponentMessage, ComponentUpdate, MaterialProperty,
    MaterialPropertyDescriptor, MaterialPropertyType, MaterialPropertyValue,
    MeshRendererChangeFlags, MeshRendererData, NodeId, PerformanceParameters, PollingFrequency,
    RENDER_QUEUE_PROPERTY,
};
use mirror_source::SourceConfig;
use mirror_test::{component_messages, SceneOp, TestHarness};

fn observer_config() -> ObserverConfig {
    ObserverConfig {
        platform: AssetBundlePlatform::WSA,
        has_preloaded_assets: true,
        ..ObserverConfig::default()
    }
}

fn harness_with(config: SourceConfig) -> TestHarness {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::with_config(config);
    harness.add_observer(observer_config());
    harness.connect(0);
    harness
}

fn kind_messages(messages: &[ComponentMessage], node: NodeId, kind: ComponentKind) -> Vec<ComponentMessage> {
    messages
        .iter()
        .filter(|message| message.node() == node)
        .filter(|message| match message {
            ComponentMessage::Created { kind: created, .. } => *created == kind,
            ComponentMessage::Destroyed { kind: destroyed, .. } => *destroyed == kind,
            ComponentMessage::Updated { update, .. } => update.kind() == kind,
        })
        .cloned()
        .collect()
}

#[test]
fn mesh_renderer_is_created_then_filled_with_resolved_assets() {
    let mut harness = harness_with(SourceConfig::default());
    let cube = harness.assets.add(AssetKind::Mesh, 10, "Cube", 1);
    let metal = harness.assets.add(AssetKind::Material, 20, "Metal", 1);
    // same name as the material above but a different asset
    let other_metal = harness.assets.add(AssetKind::Material, 21, "Metal", 2);

    let root = harness.scene.spawn("Root", None);
    let renderer = MeshRendererData {
        enabled: true,
        mesh: Some(cube),
        materials: vec![Some(metal), None, Some(other_metal)],
        ..MeshRendererData::default()
    };
    harness.scene.set_mesh_renderer(root, Some(renderer.clone()));
    assert!(harness.run_until_ready(10));

    let root_id = harness.source.node_id(&root).unwrap();
    let messages = component_messages(&harness.syncs_to(0));
    let mesh_messages = kind_messages(&messages, root_id, ComponentKind::MeshRenderer);
    assert_eq!(mesh_messages.len(), 2);
    assert_eq!(
        mesh_messages[0],
        ComponentMessage::Created {
            node: root_id,
            kind: ComponentKind::MeshRenderer
        }
    );
    assert!(matches!(
        &mesh_messages[1],
        ComponentMessage::Updated {
            update: ComponentUpdate::MeshRenderer(..),
            ..
        }
    ));
    // the transform always leads
    assert!(matches!(
        messages.iter().find(|message| message.node() == root_id),
        Some(ComponentMessage::Updated {
            update: ComponentUpdate::Transform(..),
            ..
        })
    ));

    let (_, mirrored) = harness.observer(0).scene.find("Root").unwrap();
    assert!(mirrored.components.contains(&ComponentKind::MeshRenderer));
    assert_eq!(mirrored.mesh_renderer.as_ref(), Some(&renderer));

    harness.hub.clear_log();
    harness.scene.node_mut(root).mesh_renderer.as_mut().unwrap().materials[1] = Some(metal);
    harness.tick();

    let messages = component_messages(&harness.syncs_to(0));
    match kind_messages(&messages, root_id, ComponentKind::MeshRenderer).as_slice() {
        [ComponentMessage::Updated {
            update: ComponentUpdate::MeshRenderer(flags, _),
            ..
        }] => assert_eq!(*flags, MeshRendererChangeFlags::MATERIALS),
        other => panic!("expected one material delta, got {:?}", other),
    }
    let (_, mirrored) = harness.observer(0).scene.find("Root").unwrap();
    assert_eq!(
        mirrored.mesh_renderer.as_ref().unwrap().materials,
        vec![Some(metal), Some(metal), Some(other_metal)]
    );
}

#[test]
fn unknown_asset_arrives_as_an_empty_slot() {
    let mut harness = harness_with(SourceConfig::default());
    let root = harness.scene.spawn("Root", None);
    harness.scene.set_mesh_renderer(
        root,
        Some(MeshRendererData {
            enabled: true,
            mesh: Some(AssetHandle(404)),
            ..MeshRendererData::default()
        }),
    );
    assert!(harness.run_until_ready(10));

    let (_, mirrored) = harness.observer(0).scene.find("Root").unwrap();
    assert_eq!(mirrored.mesh_renderer.as_ref().unwrap().mesh, None);
    assert!(harness.observer(0).errors.is_empty());
}

#[test]
fn disabled_audio_source_is_not_updated() {
    let mut harness = harness_with(SourceConfig::default());
    let clip = harness.assets.add(AssetKind::AudioClip, 30, "Chime", 7);
    let speaker = harness.scene.spawn("Speaker", None);
    harness.scene.set_audio_source(
        speaker,
        Some(AudioSourceData {
            clip: Some(clip),
            volume: 0.5,
            ..AudioSourceData::default()
        }),
    );
    assert!(harness.run_until_ready(10));
    let speaker_id = harness.source.node_id(&speaker).unwrap();

    harness.hub.clear_log();
    harness
        .scene
        .set_component_enabled(speaker, ComponentKind::AudioSource, false);
    harness.scene.node_mut(speaker).audio_source.as_mut().unwrap().volume = 0.25;
    harness.tick_n(3);
    let messages = component_messages(&harness.syncs_to(0));
    assert!(kind_messages(&messages, speaker_id, ComponentKind::AudioSource).is_empty());

    harness
        .scene
        .set_component_enabled(speaker, ComponentKind::AudioSource, true);
    harness.tick();
    let messages = component_messages(&harness.syncs_to(0));
    match kind_messages(&messages, speaker_id, ComponentKind::AudioSource).as_slice() {
        [ComponentMessage::Updated {
            update: ComponentUpdate::AudioSource(flags, _),
            ..
        }] => assert_eq!(*flags, AudioSourceChangeFlags::VOLUME),
        other => panic!("expected one volume delta, got {:?}", other),
    }

    let (_, mirrored) = harness.observer(0).scene.find("Speaker").unwrap();
    let audio = mirrored.audio_source.as_ref().unwrap();
    assert_eq!(audio.volume, 0.25);
    assert_eq!(audio.clip, Some(clip));
}

#[test]
fn observer_joining_while_audio_source_is_disabled_gets_it_once_enabled() {
    let mut harness = harness_with(SourceConfig::default());
    let clip = harness.assets.add(AssetKind::AudioClip, 30, "Chime", 7);
    let speaker = harness.scene.spawn("Speaker", None);
    harness.scene.set_audio_source(
        speaker,
        Some(AudioSourceData {
            clip: Some(clip),
            volume: 0.5,
            ..AudioSourceData::default()
        }),
    );
    assert!(harness.run_until_ready(10));
    let speaker_id = harness.source.node_id(&speaker).unwrap();

    harness
        .scene
        .set_component_enabled(speaker, ComponentKind::AudioSource, false);
    harness.tick();
    harness.add_observer(observer_config());
    harness.connect(1);
    assert!(harness.run_until_ready(10));
    assert!(harness
        .observer(1)
        .scene
        .find("Speaker")
        .unwrap()
        .1
        .audio_source
        .is_none());

    harness
        .scene
        .set_component_enabled(speaker, ComponentKind::AudioSource, true);
    harness.tick_n(5);

    let messages = component_messages(&harness.syncs_to(1));
    let audio_messages = kind_messages(&messages, speaker_id, ComponentKind::AudioSource);
    assert_eq!(
        audio_messages.first(),
        Some(&ComponentMessage::Created {
            node: speaker_id,
            kind: ComponentKind::AudioSource
        })
    );
    let observer = harness.observer(1);
    let audio = observer
        .scene
        .find("Speaker")
        .unwrap()
        .1
        .audio_source
        .clone()
        .unwrap();
    assert_eq!(audio.clip, Some(clip));
    assert_eq!(audio.volume, 0.5);
    assert!(observer.errors.is_empty());
}

#[test]
fn observer_leaving_while_audio_source_is_disabled_is_not_resent_deltas() {
    let mut harness = harness_with(SourceConfig::default());
    let speaker = harness.scene.spawn("Speaker", None);
    harness
        .scene
        .set_audio_source(speaker, Some(AudioSourceData::default()));
    assert!(harness.run_until_ready(10));
    let speaker_id = harness.source.node_id(&speaker).unwrap();

    harness
        .scene
        .set_component_enabled(speaker, ComponentKind::AudioSource, false);
    harness.tick();
    harness.disconnect(0);
    harness.tick_n(2);
    harness.connect(0);
    assert!(harness.run_until_ready(10));
    harness.hub.clear_log();

    harness
        .scene
        .set_component_enabled(speaker, ComponentKind::AudioSource, true);
    harness.tick_n(3);

    let messages = component_messages(&harness.syncs_to(0));
    let audio_messages = kind_messages(&messages, speaker_id, ComponentKind::AudioSource);
    assert!(matches!(
        audio_messages.as_slice(),
        [ComponentMessage::Created { .. }, ComponentMessage::Updated { .. }]
    ));
    assert!(harness.observer(0).errors.is_empty());
}

#[test]
fn material_properties_are_mirrored_and_sent_as_they_change() {
    let mut harness = harness_with(SourceConfig::default());
    harness.source.material_properties_mut().register_shader(
        "Standard",
        vec![
            MaterialPropertyDescriptor::new("_Color", MaterialPropertyType::Color),
            MaterialPropertyDescriptor::new("_Glossiness", MaterialPropertyType::Range),
        ],
    );
    let metal = harness.assets.add(AssetKind::Material, 20, "Metal", 1);
    harness.scene.set_material_shader(metal, "Standard");
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    harness
        .scene
        .set_material_property(metal, "_Color", MaterialPropertyValue::Color(red));
    harness
        .scene
        .set_material_property(metal, "_Glossiness", MaterialPropertyValue::Float(0.5));
    harness.scene.set_material_property(
        metal,
        RENDER_QUEUE_PROPERTY,
        MaterialPropertyValue::RenderQueue(2000),
    );
    let root = harness.scene.spawn("Root", None);
    harness.scene.set_mesh_renderer(
        root,
        Some(MeshRendererData {
            enabled: true,
            materials: vec![Some(metal)],
            ..MeshRendererData::default()
        }),
    );
    assert!(harness.run_until_ready(10));
    let root_id = harness.source.node_id(&root).unwrap();

    let (_, mirrored) = harness.observer(0).scene.find("Root").unwrap();
    assert_eq!(
        mirrored.mesh_renderer.as_ref().unwrap().material_properties,
        vec![
            MaterialProperty::new(0, RENDER_QUEUE_PROPERTY, MaterialPropertyValue::RenderQueue(2000)),
            MaterialProperty::new(0, "_Color", MaterialPropertyValue::Color(red)),
            MaterialProperty::new(0, "_Glossiness", MaterialPropertyValue::Float(0.5)),
        ]
    );

    harness.observers[0]
        .session
        .set_perf_diagnostics(true)
        .unwrap();
    harness.tick();
    let reports_before = harness.observer(0).perf_reports.len();
    harness.hub.clear_log();

    let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
    harness
        .scene
        .set_material_property(metal, "_Color", MaterialPropertyValue::Color(green));
    harness.tick();

    let messages = component_messages(&harness.syncs_to(0));
    match kind_messages(&messages, root_id, ComponentKind::MeshRenderer).as_slice() {
        [ComponentMessage::Updated {
            update: ComponentUpdate::MeshRenderer(flags, state),
            ..
        }] => {
            assert_eq!(*flags, MeshRendererChangeFlags::MATERIAL_PROPERTIES);
            assert_eq!(state.material_properties.len(), 1);
            assert_eq!(state.material_properties[0].name, "_Color");
        }
        other => panic!("expected one property delta, got {:?}", other),
    }
    let (_, mirrored) = harness.observer(0).scene.find("Root").unwrap();
    let mirrored = mirrored.mesh_renderer.as_ref().unwrap();
    assert_eq!(mirrored.material_properties.len(), 3);
    assert_eq!(
        mirrored.material_property(0, "_Color").map(|property| &property.value),
        Some(&MaterialPropertyValue::Color(green))
    );

    assert!(harness.tick_until(80, |harness| {
        harness.observer(0).perf_reports.len() > reports_before
    }));
    let reports = &harness.observer(0).perf_reports[reports_before..];
    let color_updates: i32 = reports
        .iter()
        .filter_map(|report| report.counter("MaterialProperty.Standard._Color"))
        .sum();
    assert_eq!(color_updates, 1);
    assert!(reports
        .iter()
        .all(|report| report.counter("MaterialProperty.Standard._Glossiness").is_none()));
}

#[test]
fn removed_component_is_destroyed_on_the_mirror() {
    let mut harness = harness_with(SourceConfig::default());
    let root = harness.scene.spawn("Root", None);
    harness
        .scene
        .set_mesh_renderer(root, Some(MeshRendererData::default()));
    assert!(harness.run_until_ready(10));
    let root_id = harness.source.node_id(&root).unwrap();
    harness.hub.clear_log();
    harness.observers[0].scene.clear_ops();

    harness.scene.set_mesh_renderer(root, None);
    harness.tick();

    let messages = component_messages(&harness.syncs_to(0));
    assert_eq!(
        kind_messages(&messages, root_id, ComponentKind::MeshRenderer),
        vec![ComponentMessage::Destroyed {
            node: root_id,
            kind: ComponentKind::MeshRenderer
        }]
    );
    let observer = harness.observer(0);
    let (mirror_root, mirrored) = observer.scene.find("Root").unwrap();
    assert!(mirrored.mesh_renderer.is_none());
    assert_eq!(
        observer.scene.ops(),
        &[SceneOp::RemoveComponent(mirror_root, ComponentKind::MeshRenderer)]
    );
}

#[test]
fn polling_once_needs_a_change_notification() {
    let mut harness = harness_with(SourceConfig {
        broadcast: BroadcastConfig {
            default_component_polling: PollingFrequency::UpdateOnceOnStart,
            ..BroadcastConfig::default()
        },
        ..SourceConfig::default()
    });
    let root = harness.scene.spawn("Root", None);
    let busy = harness.scene.spawn("Busy", Some(root));
    assert!(harness.run_until_ready(10));
    assert!(harness.source.set_performance_parameters(
        &busy,
        PerformanceParameters {
            component_polling: PollingFrequency::UpdateContinuously,
        },
    ));
    harness.tick();

    harness
        .scene
        .set_mesh_renderer(root, Some(MeshRendererData::default()));
    harness
        .scene
        .set_mesh_renderer(busy, Some(MeshRendererData::default()));
    harness.tick_n(3);

    let observer = &harness.observer(0).scene;
    assert!(observer.find("Root").unwrap().1.mesh_renderer.is_none());
    assert!(observer.find("Busy").unwrap().1.mesh_renderer.is_some());

    assert!(harness.source.notify_components_changed(&root));
    harness.tick();
    let observer = &harness.observer(0).scene;
    assert!(observer
        .find("Root")
        .unwrap()
        .1
        .components
        .contains(&ComponentKind::MeshRenderer));
    assert!(observer.find("Root").unwrap().1.mesh_renderer.is_some());
}
