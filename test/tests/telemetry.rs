//! Periodic perf reports, diagnostic counters, and camera poses in both
//! directions

use std::time::Duration;

use glam::{Quat, Vec3};
use mirror_observer::{ObserverConfig, ObserverError};
use mirror_shared::{
    AssetBundlePlatform, AssetKind, CameraPose, ComponentKind, MeshRendererData,
};
use mirror_source::SourceConfig;
use mirror_test::TestHarness;

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
    assert!(harness.run_until_ready(10));
    harness
}

#[test]
fn perf_report_every_interval() {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::new();
    let started = harness.now;
    harness.add_observer(observer_config());
    harness.connect(0);
    harness.scene.spawn("Root", None);

    assert!(harness.tick_until(200, |harness| harness.observer(0).perf_reports.len() == 2));
    let elapsed = started.elapsed(&harness.now);
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(2) + harness.frame * 2);

    let observer = harness.observer(0);
    for report in &observer.perf_reports {
        assert_eq!(report.feature_ratios.len(), ComponentKind::ALL.len());
        assert!(report.counters.is_empty());
    }
    assert_eq!(
        observer.session.perf_report(),
        observer.perf_reports.last()
    );
}

#[test]
fn diagnostic_mode_adds_counters() {
    let mut harness = ready_harness();
    harness.observers[0]
        .session
        .set_perf_diagnostics(true)
        .unwrap();
    harness.tick();
    assert!(harness.source.perf_diagnostics());

    harness.scene.spawn("Late", None);
    let reports_before = harness.observer(0).perf_reports.len();
    assert!(harness.tick_until(80, |harness| {
        harness.observer(0).perf_reports.len() > reports_before
    }));

    let report = harness.observer(0).perf_reports.last().unwrap();
    assert_eq!(report.counter("Transform.FullSend"), Some(1));
    assert!(report.counter("Transform.NoChangeSkip").is_some());

    harness.observers[0]
        .session
        .set_perf_diagnostics(false)
        .unwrap();
    harness.tick();
    assert!(!harness.source.perf_diagnostics());
}

#[test]
fn feature_ratios_stay_within_a_frame_when_host_time_barely_moves() {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::with_config(SourceConfig {
        perf_report_interval: Duration::from_micros(5),
        ..SourceConfig::default()
    });
    harness.add_observer(observer_config());
    harness.connect(0);
    let cube = harness.assets.add(AssetKind::Mesh, 10, "Cube", 1);
    let mut nodes = Vec::new();
    for index in 0..50 {
        let node = harness.scene.spawn(&format!("Node{}", index), None);
        nodes.push(node);
        harness.scene.set_mesh_renderer(
            node,
            Some(MeshRendererData {
                enabled: true,
                mesh: Some(cube),
                ..MeshRendererData::default()
            }),
        );
    }
    assert!(harness.run_until_ready(10));

    harness.frame = Duration::from_micros(1);
    let reports_before = harness.observer(0).perf_reports.len();
    for index in 0..20 {
        for node in &nodes {
            harness.scene.set_position(*node, Vec3::new(index as f32, 0.0, 0.0));
        }
        harness.tick();
    }

    let reports = &harness.observer(0).perf_reports[reports_before..];
    assert!(reports.len() >= 3);
    for report in reports {
        let total: f32 = report.feature_ratios.iter().sum();
        assert!(total <= 1.001, "feature ratios sum to {}", total);
    }
}

#[test]
fn source_camera_reaches_observers() {
    let mut harness = ready_harness();
    let rotation = Quat::from_rotation_y(0.5);
    harness.scene.set_camera(Vec3::new(1.0, 2.0, 3.0), rotation);
    harness.tick();

    let observer = harness.observer(0);
    let pose = observer.session.camera().unwrap();
    assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(pose.rotation, rotation);
    assert_eq!(observer.cameras.last(), Some(pose));
    assert!(observer
        .cameras
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
}

#[test]
fn observer_camera_reaches_the_source() {
    let mut harness = ready_harness();
    let pose = CameraPose::new(1.5, Vec3::new(0.0, 1.7, -4.0), Quat::IDENTITY);
    harness.observers[0].session.send_camera(pose).unwrap();
    harness.tick();

    assert_eq!(
        harness.source_log.cameras,
        vec![(harness.observer_address(0), pose)]
    );
}

#[test]
fn disconnected_observer_cannot_send() {
    let _ = env_logger::try_init();
    let mut harness = TestHarness::new();
    harness.add_observer(observer_config());

    assert_eq!(
        harness.observers[0].session.set_perf_diagnostics(true),
        Err(ObserverError::NotConnected)
    );
}
