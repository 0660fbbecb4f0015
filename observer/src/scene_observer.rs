use std::{hash::Hash, net::SocketAddr};

use log::{info, warn};

use mirror_shared::{
    AssetBundleVersion, AssetCaches, AssetProvider, AssetState, AssetStateStatus,
    BundleDownloadStart, BundleTransferError, CameraPose, Command, Instant, MirrorRegistry,
    PerfReport, SceneMutType, SyncMessage, Timer, Transport, TransportEvent,
};

use crate::{
    bundle::{AssetBundleLoader, BundleDownload},
    events::Events,
    ObserverConfig, ObserverError,
};

/// The receiving side of a mirroring session. Negotiates the asset bundle with
/// its source, then rebuilds the source's scene in a local one.
pub struct SceneObserver<E: Copy + Eq + Hash> {
    config: ObserverConfig,
    transport: Box<dyn Transport>,
    source_address: Option<SocketAddr>,
    mirror: MirrorRegistry<E>,
    assets: AssetCaches,
    asset_provider: Box<dyn AssetProvider>,
    bundle_loader: Box<dyn AssetBundleLoader>,
    loaded_version: Option<AssetBundleVersion>,
    download: Option<BundleDownload>,
    asset_state: AssetState,
    heartbeat_timer: Timer,
    handshake_timer: Timer,
    camera: Option<CameraPose>,
    perf_report: Option<PerfReport>,
    incoming_events: Events,
}

impl<E: Copy + Eq + Hash> SceneObserver<E> {
    pub fn new(
        config: ObserverConfig,
        transport: Box<dyn Transport>,
        asset_provider: Box<dyn AssetProvider>,
        bundle_loader: Box<dyn AssetBundleLoader>,
        now: &Instant,
    ) -> Self {
        Self {
            heartbeat_timer: Timer::new(config.connection.heartbeat_interval, now),
            handshake_timer: Timer::new(config.handshake_timeout.unwrap_or_default(), now),
            assets: AssetCaches::new(config.force_load_all_assets),
            config,
            transport,
            source_address: None,
            mirror: MirrorRegistry::new(),
            asset_provider,
            bundle_loader,
            loaded_version: None,
            download: None,
            asset_state: AssetState::default(),
            camera: None,
            perf_report: None,
            incoming_events: Events::new(),
        }
    }

    /// Polls the transport, advances the asset negotiation and applies scene
    /// updates to `scene`. Returns the events gathered since the last call.
    pub fn receive<W: SceneMutType<E>>(&mut self, scene: &mut W, now: &Instant) -> Events {
        loop {
            match self.transport.receive() {
                Ok(Some(event)) => self.handle_transport_event(scene, event, now),
                Ok(None) => break,
                Err(error) => {
                    self.incoming_events.push_error(error.into());
                    break;
                }
            }
        }

        std::mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Sends a heartbeat when one is due and gives up on a source that stopped
    /// answering the asset negotiation.
    pub fn send_all(&mut self, now: &Instant) {
        let Some(address) = self.source_address else {
            return;
        };

        if self.heartbeat_timer.ringing(now) {
            self.heartbeat_timer.reset(now);
            self.send(&address, &Command::Heartbeat);
        }

        self.check_handshake_timeout(now);
    }

    /// Starts the asset negotiation over, typically after it ended in an error
    pub fn retry_asset_negotiation(&mut self, now: &Instant) -> Result<(), ObserverError> {
        let address = self.source_address.ok_or(ObserverError::NotConnected)?;
        info!("Retrying asset negotiation with {}", address);
        self.download = None;
        self.request_asset_bundle_info(&address, now);
        Ok(())
    }

    /// Asks the source to start or stop collecting diagnostic perf counters
    pub fn set_perf_diagnostics(&mut self, enabled: bool) -> Result<(), ObserverError> {
        let address = self.source_address.ok_or(ObserverError::NotConnected)?;
        self.transport
            .send(&address, &Command::PerfDiagnosticMode { enabled }.to_bytes())?;
        Ok(())
    }

    /// Reports this observer's own camera pose to the source
    pub fn send_camera(&mut self, pose: CameraPose) -> Result<(), ObserverError> {
        let address = self.source_address.ok_or(ObserverError::NotConnected)?;
        self.transport
            .send(&address, &Command::Camera(pose).to_bytes())?;
        Ok(())
    }

    pub fn asset_state(&self) -> &AssetState {
        &self.asset_state
    }

    pub fn mirror(&self) -> &MirrorRegistry<E> {
        &self.mirror
    }

    /// Latest camera pose sent by the source
    pub fn camera(&self) -> Option<&CameraPose> {
        self.camera.as_ref()
    }

    pub fn perf_report(&self) -> Option<&PerfReport> {
        self.perf_report.as_ref()
    }

    pub fn source_address(&self) -> Option<SocketAddr> {
        self.source_address
    }

    pub fn is_connected(&self) -> bool {
        self.source_address.is_some()
    }

    pub fn loaded_bundle(&self) -> Option<&AssetBundleVersion> {
        self.loaded_version.as_ref()
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    // Private

    fn handle_transport_event<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        event: TransportEvent,
        now: &Instant,
    ) {
        match event {
            TransportEvent::Connected(address) => {
                if let Some(source_address) = self.source_address {
                    if source_address != address {
                        self.incoming_events
                            .push_error(ObserverError::UnexpectedConnection {
                                address,
                                source_address,
                            });
                        return;
                    }
                }
                info!("Connected to source {}", address);
                self.source_address = Some(address);
                self.mirror.clear(scene);
                self.download = None;
                self.heartbeat_timer.reset(now);
                self.incoming_events.push_connection(address);
                self.request_asset_bundle_info(&address, now);
            }
            TransportEvent::Disconnected(address) => {
                if self.source_address != Some(address) {
                    return;
                }
                info!("Disconnected from source {}", address);
                self.source_address = None;
                self.download = None;
                self.set_asset_state(AssetState::new(AssetStateStatus::None));
                self.incoming_events.push_disconnection(address);
            }
            TransportEvent::Received(address, payload) => {
                if self.source_address != Some(address) {
                    warn!("Dropping payload from {}, which is not the source", address);
                    return;
                }
                match Command::read(&payload) {
                    Ok(command) => self.handle_command(scene, address, command, now),
                    Err(source) => {
                        warn!("Unreadable command from source: {}", source);
                        self.incoming_events
                            .push_error(ObserverError::Command { source });
                    }
                }
            }
        }
    }

    fn handle_command<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        address: SocketAddr,
        command: Command,
        now: &Instant,
    ) {
        match command {
            Command::Sync(sync) => self.apply_sync(scene, sync),
            Command::Camera(pose) => {
                self.camera = Some(pose);
                self.incoming_events.push_camera(pose);
            }
            Command::Perf(report) => {
                self.perf_report = Some(report.clone());
                self.incoming_events.push_perf_report(report);
            }
            Command::ReportAssetBundleInfo { version } => {
                self.handshake_timer.reset(now);
                match version {
                    None => self.no_bundle_available(&address),
                    Some(version) if self.loaded_version.as_ref() == Some(&version) => {
                        info!("Asset bundle {} already loaded", version);
                        self.set_asset_state(AssetState::for_version(
                            AssetStateStatus::AssetBundleLoaded,
                            &version,
                        ));
                        self.send(&address, &Command::AssetLoadCompleted);
                    }
                    Some(version) => {
                        info!("Requesting asset bundle {}", version);
                        self.set_asset_state(AssetState::for_version(
                            AssetStateStatus::RequestingAssetBundle,
                            &version,
                        ));
                        let platform = self.config.platform;
                        self.send(&address, &Command::RequestAssetBundleDownload { platform });
                    }
                }
            }
            Command::ReportAssetBundleDownloadStart { start } => {
                self.handshake_timer.reset(now);
                match start {
                    None => self.no_bundle_available(&address),
                    Some(start) => self.start_download(&address, start),
                }
            }
            Command::ReportAssetBundleDownloadData { data } => {
                self.handshake_timer.reset(now);
                self.receive_bundle_data(&address, &data);
            }
            other => {
                let tag = other.tag().as_str();
                warn!("Ignoring {} command from source", tag);
                self.incoming_events
                    .push_error(ObserverError::UnexpectedCommand { tag });
            }
        }
    }

    fn apply_sync<W: SceneMutType<E>>(&mut self, scene: &mut W, sync: SyncMessage) {
        if !self.asset_state.status.is_ready() {
            warn!(
                "Dropping scene update while assets are {:?}",
                self.asset_state.status
            );
            return;
        }

        self.assets.refresh(self.asset_provider.as_ref());
        let errors =
            self.mirror
                .apply_sync(scene, sync, &mut self.assets, self.asset_provider.as_ref());
        for error in errors {
            self.incoming_events.push_error(error.into());
        }
    }

    fn request_asset_bundle_info(&mut self, address: &SocketAddr, now: &Instant) {
        self.handshake_timer.reset(now);
        self.set_asset_state(AssetState::new(AssetStateStatus::RequestingAssetBundle));
        let platform = self.config.platform;
        self.send(address, &Command::RequestAssetBundleInfo { platform });
    }

    fn no_bundle_available(&mut self, address: &SocketAddr) {
        let status = if self.config.has_preloaded_assets {
            AssetStateStatus::Preloaded
        } else {
            AssetStateStatus::NonePreloadedAndNoAssetBundleAvailable
        };
        info!("Source offers no asset bundle, using {:?}", status);
        self.download = None;
        self.set_asset_state(AssetState::new(status));
        self.send(address, &Command::AssetLoadCompleted);
    }

    fn start_download(&mut self, address: &SocketAddr, start: BundleDownloadStart) {
        info!(
            "Downloading asset bundle {} ({} bytes)",
            start.version, start.total_length
        );
        self.assets.reset();
        if self.loaded_version.take().is_some() {
            self.bundle_loader.unload();
        }

        let download = BundleDownload::new(start.version, start.total_length);
        self.set_asset_state(
            AssetState::for_version(AssetStateStatus::DownloadingAssetBundle, download.version())
                .with_progress(0, download.total_length()),
        );
        self.download = Some(download);

        self.finish_download_if_complete(address);
    }

    fn receive_bundle_data(&mut self, address: &SocketAddr, data: &[u8]) {
        let Some(download) = self.download.as_mut() else {
            warn!(
                "{}",
                BundleTransferError::NoTransferInProgress { length: data.len() }
            );
            return;
        };

        if let Err(error) = download.append(data) {
            warn!("Abandoning asset bundle download: {}", error);
            let state = AssetState::for_version(
                AssetStateStatus::ErrorDownloadingAssetBundle,
                download.version(),
            )
            .with_progress(download.bytes_so_far(), download.total_length())
            .with_error(error.to_string());
            self.download = None;
            self.assets.reset();
            self.set_asset_state(state);
            self.incoming_events.push_error(error.into());
            return;
        }

        let progress = AssetState::for_version(
            AssetStateStatus::DownloadingAssetBundle,
            download.version(),
        )
        .with_progress(download.bytes_so_far(), download.total_length());
        self.set_asset_state(progress);

        self.finish_download_if_complete(address);
    }

    fn finish_download_if_complete(&mut self, address: &SocketAddr) {
        if !self
            .download
            .as_ref()
            .is_some_and(|download| download.is_complete())
        {
            return;
        }
        let Some(download) = self.download.take() else {
            return;
        };

        let bundle = download.into_bundle();
        match self.bundle_loader.load(&bundle) {
            Ok(()) => {
                info!("Loaded asset bundle {}", bundle.version);
                self.assets.reset();
                self.set_asset_state(
                    AssetState::for_version(AssetStateStatus::AssetBundleLoaded, &bundle.version)
                        .with_progress(bundle.len(), bundle.len()),
                );
                self.loaded_version = Some(bundle.version);
                self.send(address, &Command::AssetLoadCompleted);
            }
            Err(error) => {
                warn!("{}", error);
                self.set_asset_state(
                    AssetState::for_version(AssetStateStatus::ErrorLoadingAssetBundle, &bundle.version)
                        .with_error(error.to_string()),
                );
                self.incoming_events.push_error(error.into());
            }
        }
    }

    fn check_handshake_timeout(&mut self, now: &Instant) {
        let Some(timeout) = self.config.handshake_timeout else {
            return;
        };
        let status = self.asset_state.status;
        if !matches!(
            status,
            AssetStateStatus::RequestingAssetBundle | AssetStateStatus::DownloadingAssetBundle
        ) {
            return;
        }
        let waited = self.handshake_timer.elapsed(now);
        if waited < timeout {
            return;
        }

        warn!("Source did not respond to asset negotiation for {:?}", waited);
        let error = ObserverError::HandshakeTimeout { status, waited };
        let mut state = self.asset_state.clone();
        state.status = AssetStateStatus::ErrorDownloadingAssetBundle;
        state.error_details = Some(error.to_string());

        self.download = None;
        self.assets.reset();
        self.set_asset_state(state);
        self.incoming_events.push_error(error);
    }

    fn set_asset_state(&mut self, state: AssetState) {
        if state.status != self.asset_state.status {
            info!(
                "Asset state {:?} -> {:?}",
                self.asset_state.status, state.status
            );
        }
        self.asset_state = state.clone();
        self.incoming_events.push_asset_state(state);
    }

    fn send(&mut self, address: &SocketAddr, command: &Command) {
        if let Err(error) = self.transport.send(address, &command.to_bytes()) {
            warn!("Failed to send {} to {}: {}", command.tag().as_str(), address, error);
            self.incoming_events.push_error(error.into());
        }
    }
}
