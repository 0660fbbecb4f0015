use std::{mem, net::SocketAddr, vec::IntoIter};

use mirror_shared::CameraPose;

use crate::SourceError;

pub struct Events {
    connections: Vec<SocketAddr>,
    disconnections: Vec<SocketAddr>,
    ready: Vec<SocketAddr>,
    cameras: Vec<(SocketAddr, CameraPose)>,
    errors: Vec<SourceError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            ready: Vec::new(),
            cameras: Vec::new(),
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

    pub(crate) fn push_ready(&mut self, address: SocketAddr) {
        self.ready.push(address);
        self.empty = false;
    }

    pub(crate) fn push_camera(&mut self, address: SocketAddr, pose: CameraPose) {
        self.cameras.push((address, pose));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: SourceError) {
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

/// An observer finished loading its assets and now receives scene updates
pub struct ReadyEvent;
impl Event for ReadyEvent {
    type Iter = IntoIter<SocketAddr>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.ready))
    }

    fn has(events: &Events) -> bool {
        !events.ready.is_empty()
    }
}

/// Camera pose reported by an observer
pub struct CameraEvent;
impl Event for CameraEvent {
    type Iter = IntoIter<(SocketAddr, CameraPose)>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.cameras))
    }

    fn has(events: &Events) -> bool {
        !events.cameras.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<SourceError>;

    fn iter(events: &mut Events) -> Self::Iter {
        IntoIterator::into_iter(mem::take(&mut events.errors))
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
