use std::{mem, net::SocketAddr, vec::IntoIter};

use mirror_shared::{AssetState, CameraPose, PerfReport};

use crate::ObserverError;

pub struct Events {
    connections: Vec<SocketAddr>,
    disconnections: Vec<SocketAddr>,
    asset_states: Vec<AssetState>,
    cameras: Vec<CameraPose>,
    perf_reports: Vec<PerfReport>,
    errors: Vec<ObserverError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            asset_states: Vec::new(),
            cameras: Vec::new(),
            perf_reports: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: Event>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, address: SocketAddr) {
        self.connections.push(address);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, address: SocketAddr) {
        self.disconnections.push(address);
        self.empty = false;
    }

    pub(crate) fn push_asset_state(&mut self, state: AssetState) {
        self.asset_states.push(state);
        self.empty = false;
    }

    pub(crate) fn push_camera(&mut self, pose: CameraPose) {
        self.cameras.push(pose);
        self.empty = false;
    }

    pub(crate) fn push_perf_report(&mut self, report: PerfReport) {
        self.perf_reports.push(report);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ObserverError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait Event {
    type Iter;

    fn iter(events: &mut Events) -> Self::Iter;

    fn has(events: &Events) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl Event for ConnectEvent {
    type Iter = IntoIter<SocketAddr>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.connections))
    }

    fn has(events: &Events) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl Event for DisconnectEvent {
    type Iter = IntoIter<SocketAddr>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.disconnections))
    }

    fn has(events: &Events) -> bool {
        !events.disconnections.is_empty()
    }
}

/// Every asset state the observer moved through, download progress included
pub struct AssetStateEvent;
impl Event for AssetStateEvent {
    type Iter = IntoIter<AssetState>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.asset_states))
    }

    fn has(events: &Events) -> bool {
        !events.asset_states.is_empty()
    }
}

// CameraEvent
pub struct CameraEvent;
impl Event for CameraEvent {
    type Iter = IntoIter<CameraPose>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.cameras))
    }

    fn has(events: &Events) -> bool {
        !events.cameras.is_empty()
    }
}

// PerfEvent
pub struct PerfEvent;
impl Event for PerfEvent {
    type Iter = IntoIter<PerfReport>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.perf_reports))
    }

    fn has(events: &Events) -> bool {
        !events.perf_reports.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<ObserverError>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.errors))
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
