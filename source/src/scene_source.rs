use std::{
    collections::{BTreeMap, BTreeSet},
    hash::Hash,
    net::SocketAddr,
    time::Duration,
};

use glam::{Quat, Vec3};
use log::{info, warn};

use mirror_shared::{
    AssetBundle, AssetBundlePlatform, AssetCaches, AssetProvider, BroadcastContext,
    BundleDownloadStart, ByteWrite, CameraPose, Command, CommandTag, ConnectionDeltaTracker,
    Instant, MaterialPropertyCache, NodeId, PerfMonitor, PerformanceParameters, SceneBroadcaster,
    SceneRefType, StreamWriter, SyncOutbox, Timer, Transport, TransportEvent,
};

use crate::{
    bundle::{AssetBundleProvider, BundleSend},
    connection::Connection,
    events::Events,
    SourceConfig, SourceError,
};

/// The authoritative side of a mirroring session. Owns the observer
/// connections, serves asset bundles and replicates a scene every frame.
pub struct SceneSource<E: Copy + Eq + Hash> {
    config: SourceConfig,
    transport: Box<dyn Transport>,
    connections: BTreeMap<SocketAddr, Connection>,
    delta_tracker: ConnectionDeltaTracker,
    broadcaster: SceneBroadcaster<E>,
    outbox: SyncOutbox,
    perf: PerfMonitor,
    perf_timer: Timer,
    assets: AssetCaches,
    asset_provider: Box<dyn AssetProvider>,
    bundle_provider: Box<dyn AssetBundleProvider>,
    bundle_sends: Vec<BundleSend>,
    started: Instant,
    incoming_events: Events,
}

impl<E: Copy + Eq + Hash> SceneSource<E> {
    pub fn new(
        config: SourceConfig,
        transport: Box<dyn Transport>,
        asset_provider: Box<dyn AssetProvider>,
        bundle_provider: Box<dyn AssetBundleProvider>,
        now: &Instant,
    ) -> Self {
        Self {
            broadcaster: SceneBroadcaster::new(config.broadcast.clone()),
            // frame time is measured on the system clock, so the report period is too
            perf: PerfMonitor::new(config.force_performance_reporting, &Instant::now()),
            perf_timer: Timer::new(config.perf_report_interval, now),
            assets: AssetCaches::new(config.force_load_all_assets),
            config,
            transport,
            connections: BTreeMap::new(),
            delta_tracker: ConnectionDeltaTracker::new(),
            outbox: SyncOutbox::new(),
            asset_provider,
            bundle_provider,
            bundle_sends: Vec::new(),
            started: *now,
            incoming_events: Events::new(),
        }
    }

    /// Polls the transport and handles every command that arrived since the
    /// last call. Returns the events gathered since the last call, including
    /// errors raised by `send_all`.
    pub fn receive(&mut self, now: &Instant) -> Events {
        loop {
            match self.transport.receive() {
                Ok(Some(event)) => self.handle_transport_event(event, now),
                Ok(None) => break,
                Err(error) => {
                    self.incoming_events.push_error(error.into());
                    break;
                }
            }
        }

        std::mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Runs one frame: streams pending bundle chunks, replicates the scene to
    /// ready observers, then sends the camera pose and any due perf report.
    pub fn send_all<S: SceneRefType<E>>(&mut self, scene: &S, now: &Instant) {
        self.check_liveness(now);
        self.send_bundle_chunks();

        let live: BTreeSet<SocketAddr> = self
            .connections
            .values()
            .filter(|connection| connection.is_ready())
            .filter(|connection| self.transport.is_connected(&connection.address))
            .map(|connection| connection.address)
            .collect();
        let delta = self.delta_tracker.advance(&live);

        self.assets.refresh(self.asset_provider.as_ref());
        {
            let mut context = BroadcastContext {
                perf: &mut self.perf,
                assets: &mut self.assets,
                provider: self.asset_provider.as_ref(),
                outbox: &mut self.outbox,
            };
            self.broadcaster.update(scene, &delta, &mut context);
        }

        let timestamp = self.timestamp(now);
        for (address, payload) in self.outbox.drain(timestamp) {
            self.send_payload(&address, &payload);
        }

        let (position, rotation) = scene
            .camera_pose()
            .unwrap_or((Vec3::ZERO, Quat::IDENTITY));
        let camera = Command::Camera(CameraPose::new(timestamp, position, rotation)).to_bytes();
        let addresses: Vec<SocketAddr> = self.connections.keys().copied().collect();
        for address in &addresses {
            self.send_payload(address, &camera);
        }

        if self.perf_timer.ringing(now) {
            self.perf_timer.reset(now);
            let report = Command::Perf(self.perf.take_report(&Instant::now())).to_bytes();
            for address in live.iter() {
                self.send_payload(address, &report);
            }
        }
    }

    // Scene

    /// Starts replicating `entity`, along with its ancestors
    pub fn track_node<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        entity: &E,
    ) -> Result<NodeId, SourceError> {
        Ok(self.broadcaster.track_node(scene, entity)?)
    }

    pub fn node_id(&self, entity: &E) -> Option<NodeId> {
        self.broadcaster.node_id(entity)
    }

    pub fn node_count(&self) -> usize {
        self.broadcaster.node_count()
    }

    /// Stops replicating `entity` and its descendants to `address`
    pub fn block_connection(&mut self, entity: &E, address: SocketAddr) -> bool {
        self.broadcaster.block_connection(entity, address)
    }

    pub fn unblock_connection(&mut self, entity: &E, address: &SocketAddr) -> bool {
        self.broadcaster.unblock_connection(entity, address)
    }

    pub fn set_performance_parameters(
        &mut self,
        entity: &E,
        parameters: PerformanceParameters,
    ) -> bool {
        self.broadcaster.set_performance_parameters(entity, parameters)
    }

    /// Which shader properties are mirrored for mesh renderer materials
    pub fn material_properties_mut(&mut self) -> &mut MaterialPropertyCache {
        self.broadcaster.material_properties_mut()
    }

    /// Asks for `entity`'s components to be looked up again next frame
    pub fn notify_components_changed(&mut self, entity: &E) -> bool {
        self.broadcaster.notify_components_changed(entity)
    }

    // Connections

    pub fn connection(&self, address: &SocketAddr) -> Option<&Connection> {
        self.connections.get(address)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn ready_connections(&self) -> impl Iterator<Item = &SocketAddr> {
        self.connections
            .values()
            .filter(|connection| connection.is_ready())
            .map(|connection| &connection.address)
    }

    /// Whether an asset bundle download is still being streamed to `address`
    pub fn is_sending_bundle(&self, address: &SocketAddr) -> bool {
        self.bundle_sends
            .iter()
            .any(|send| send.recipient == *address)
    }

    pub fn perf_diagnostics(&self) -> bool {
        self.perf.diagnostic_mode()
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    // Private

    fn timestamp(&self, now: &Instant) -> f32 {
        self.started.elapsed(now).as_secs_f32()
    }

    fn handle_transport_event(&mut self, event: TransportEvent, now: &Instant) {
        match event {
            TransportEvent::Connected(address) => {
                info!("Observer connected: {}", address);
                self.connections
                    .insert(address, Connection::new(address, now));
                self.incoming_events.push_connection(address);
            }
            TransportEvent::Disconnected(address) => {
                if self.connections.remove(&address).is_none() {
                    return;
                }
                info!("Observer disconnected: {}", address);
                self.bundle_sends.retain(|send| send.recipient != address);
                self.outbox.discard(&address);
                self.incoming_events.push_disconnection(address);
            }
            TransportEvent::Received(address, payload) => {
                let Some(connection) = self.connections.get_mut(&address) else {
                    self.incoming_events
                        .push_error(SourceError::UnknownConnection { address });
                    return;
                };
                connection.mark_received(now);

                match Command::read(&payload) {
                    Ok(command) => self.handle_command(address, command),
                    Err(source) => {
                        warn!("Unreadable command from {}: {}", address, source);
                        self.incoming_events
                            .push_error(SourceError::Command { address, source });
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, address: SocketAddr, command: Command) {
        match command {
            Command::Heartbeat => {}
            Command::Camera(pose) => self.incoming_events.push_camera(address, pose),
            Command::PerfDiagnosticMode { enabled } => {
                info!("Perf diagnostic mode {} by {}", on_off(enabled), address);
                self.perf.set_diagnostic_mode(enabled);
            }
            Command::RequestAssetBundleInfo { platform } => {
                self.renegotiate(&address);
                let version = match self.bundle_provider.version(platform) {
                    Ok(version) => version,
                    Err(error) => {
                        self.incoming_events.push_error(error);
                        None
                    }
                };
                let reply = Command::ReportAssetBundleInfo { version }.to_bytes();
                self.send_payload(&address, &reply);
            }
            Command::RequestAssetBundleDownload { platform } => {
                self.renegotiate(&address);
                self.start_bundle_send(address, platform);
            }
            Command::AssetLoadCompleted => {
                if let Some(connection) = self.connections.get_mut(&address) {
                    if connection.mark_ready() {
                        info!("Observer ready: {}", address);
                        self.incoming_events.push_ready(address);
                    }
                }
            }
            other => {
                let tag = other.tag().as_str();
                warn!("Ignoring {} command from observer {}", tag, address);
                self.incoming_events
                    .push_error(SourceError::UnexpectedCommand { address, tag });
            }
        }
    }

    /// An observer asking about assets leaves replication until it acknowledges
    /// again, and then rejoins with full snapshots
    fn renegotiate(&mut self, address: &SocketAddr) {
        if let Some(connection) = self.connections.get_mut(address) {
            if connection.mark_not_ready() {
                info!("Observer {} is negotiating assets again", address);
            }
        }
    }

    fn start_bundle_send(&mut self, address: SocketAddr, platform: AssetBundlePlatform) {
        self.bundle_sends.retain(|send| send.recipient != address);

        let bundle = match self.bundle_provider.bundle(platform) {
            Ok(bundle) => bundle,
            Err(error) => {
                self.incoming_events.push_error(error);
                None
            }
        };

        let (bundle, start) = match bundle.map(|bundle| announce(platform, bundle, BundleDownloadStart::MAX_LENGTH)) {
            Some(Ok((bundle, start))) => (Some(bundle), Some(start)),
            Some(Err(error)) => {
                warn!("{}", error);
                self.incoming_events.push_error(error);
                (None, None)
            }
            None => (None, None),
        };
        let reply = Command::ReportAssetBundleDownloadStart { start }.to_bytes();
        self.send_payload(&address, &reply);

        if let Some(bundle) = bundle {
            info!(
                "Sending asset bundle {} ({} bytes) to {}",
                bundle.version,
                bundle.len(),
                address
            );
            self.bundle_sends
                .push(BundleSend::new(address, bundle.data.clone()));
        }
    }

    fn send_bundle_chunks(&mut self) {
        let mut sends = std::mem::take(&mut self.bundle_sends);
        sends.retain_mut(|send| {
            if !self.connections.contains_key(&send.recipient)
                || !self.transport.is_connected(&send.recipient)
            {
                warn!(
                    "Abandoning asset bundle download to {} after {} bytes",
                    send.recipient,
                    send.bytes_sent()
                );
                return false;
            }

            let recipient = send.recipient;
            let Some(chunk) = send.next_chunk() else {
                return false;
            };
            let mut writer = StreamWriter::new();
            Command::write_tag(CommandTag::ReportAssetBundleDownloadData, &mut writer);
            writer.write_bytes(chunk);
            let payload = writer.to_bytes();
            self.send_payload(&recipient, &payload);

            !send.is_complete()
        });
        self.bundle_sends = sends;
    }

    fn check_liveness(&mut self, now: &Instant) {
        let timeout: Duration = self.config.connection.disconnection_timeout_duration;
        for connection in self.connections.values_mut() {
            if connection.check_liveness(now, timeout) {
                warn!(
                    "Observer {} has sent nothing for {:?}",
                    connection.address,
                    connection.time_since_last_update(now)
                );
            }
        }
    }

    fn send_payload(&mut self, address: &SocketAddr, payload: &[u8]) {
        if let Err(error) = self.transport.send(address, payload) {
            warn!("Failed to send to {}: {}", address, error);
            self.incoming_events.push_error(error.into());
        }
    }
}

/// Pairs a bundle with the start message announcing it, unless it is longer
/// than `max_length`
fn announce(
    platform: AssetBundlePlatform,
    bundle: AssetBundle,
    max_length: usize,
) -> Result<(AssetBundle, BundleDownloadStart), SourceError> {
    let start = if bundle.len() <= max_length {
        BundleDownloadStart::new(bundle.version.clone(), bundle.len())
    } else {
        None
    };
    match start {
        Some(start) => Ok((bundle, start)),
        None => Err(SourceError::BundleUnavailable {
            platform,
            reason: format!(
                "{} is {} bytes, over the {} a download can announce",
                bundle.version,
                bundle.len(),
                max_length
            ),
        }),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
