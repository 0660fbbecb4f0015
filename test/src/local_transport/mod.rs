//! In-memory transport for end-to-end testing
//! Routes payloads between a source and its observers without network I/O,
//! and keeps a log of every delivery so tests can inspect the wire traffic.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use mirror_shared::{Command, SyncMessage, Transport, TransportError, TransportEvent};

/// One payload that went through the hub
#[derive(Clone, Debug)]
pub struct Delivery {
    pub from: SocketAddr,
    pub to: SocketAddr,
    pub payload: Vec<u8>,
}

impl Delivery {
    pub fn command(&self) -> Command {
        Command::read(&self.payload).expect("hub only carries well-formed commands")
    }
}

#[derive(Default)]
struct Endpoint {
    queue: VecDeque<TransportEvent>,
    peers: BTreeSet<SocketAddr>,
}

#[derive(Default)]
struct HubState {
    endpoints: HashMap<SocketAddr, Endpoint>,
    log: Vec<Delivery>,
}

/// Connects any number of [`LocalTransport`]s to each other
#[derive(Clone, Default)]
pub struct LocalTransportHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalTransportHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `address` with the hub and returns its transport
    pub fn transport(&self, address: SocketAddr) -> LocalTransport {
        self.state
            .lock()
            .unwrap()
            .endpoints
            .entry(address)
            .or_default();
        LocalTransport {
            address,
            hub: self.clone(),
        }
    }

    /// Opens a connection between `a` and `b`; each side sees `Connected`
    pub fn connect(&self, a: SocketAddr, b: SocketAddr) {
        let mut state = self.state.lock().unwrap();
        for (local, remote) in [(a, b), (b, a)] {
            let endpoint = state.endpoints.entry(local).or_default();
            if endpoint.peers.insert(remote) {
                endpoint.queue.push_back(TransportEvent::Connected(remote));
            }
        }
    }

    /// Closes the connection between `a` and `b`. Payloads still queued
    /// between them are dropped.
    pub fn disconnect(&self, a: SocketAddr, b: SocketAddr) {
        let mut state = self.state.lock().unwrap();
        for (local, remote) in [(a, b), (b, a)] {
            let endpoint = state.endpoints.entry(local).or_default();
            if endpoint.peers.remove(&remote) {
                endpoint.queue.retain(|event| {
                    !matches!(event, TransportEvent::Received(from, _) if *from == remote)
                });
                endpoint
                    .queue
                    .push_back(TransportEvent::Disconnected(remote));
            }
        }
    }

    /// Delivers a raw payload as if `from` had sent it, bypassing its session
    pub fn inject(&self, from: SocketAddr, to: SocketAddr, payload: Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        let endpoint = state.endpoints.entry(to).or_default();
        endpoint
            .queue
            .push_back(TransportEvent::Received(from, payload.into_boxed_slice()));
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }

    /// Every command delivered to `to`, in order
    pub fn commands_to(&self, to: SocketAddr) -> Vec<Command> {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|delivery| delivery.to == to)
            .map(Delivery::command)
            .collect()
    }

    /// Every `SYNC` payload delivered to `to`, in order
    pub fn syncs_to(&self, to: SocketAddr) -> Vec<SyncMessage> {
        self.commands_to(to)
            .into_iter()
            .filter_map(|command| match command {
                Command::Sync(sync) => Some(sync),
                _ => None,
            })
            .collect()
    }
}

/// One endpoint on a [`LocalTransportHub`]
pub struct LocalTransport {
    address: SocketAddr,
    hub: LocalTransportHub,
}

impl LocalTransport {
    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl Transport for LocalTransport {
    fn receive(&mut self) -> Result<Option<TransportEvent>, TransportError> {
        let mut state = self.hub.state.lock().unwrap();
        Ok(state
            .endpoints
            .get_mut(&self.address)
            .and_then(|endpoint| endpoint.queue.pop_front()))
    }

    fn send(&mut self, address: &SocketAddr, payload: &[u8]) -> Result<(), TransportError> {
        let mut state = self.hub.state.lock().unwrap();
        let connected = state
            .endpoints
            .get(&self.address)
            .is_some_and(|endpoint| endpoint.peers.contains(address));
        if !connected {
            return Err(TransportError::NotConnected { address: *address });
        }

        state
            .endpoints
            .entry(*address)
            .or_default()
            .queue
            .push_back(TransportEvent::Received(self.address, payload.into()));
        state.log.push(Delivery {
            from: self.address,
            to: *address,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn is_connected(&self, address: &SocketAddr) -> bool {
        self.hub
            .state
            .lock()
            .unwrap()
            .endpoints
            .get(&self.address)
            .is_some_and(|endpoint| endpoint.peers.contains(address))
    }
}
