use std::{collections::BTreeSet, net::SocketAddr};

use log::warn;
use mirror_serde::StreamWriter;

use super::{
    broadcast_config::BroadcastConfig, endpoint_classifier::EndpointClassifier,
    sync_outbox::SyncOutbox,
};
use crate::{
    connection::connection_delta::ConnectionDelta,
    perf::{PerfCounter, PerfMonitor},
    types::NodeId,
    world::component::{
        change_flags::ChangeFlags,
        component_message::{ComponentActionType, ComponentMessage},
        replicated_component::ReplicatedComponent,
    },
};

/// What one frame of a [`ComponentBroadcaster`] sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome<F> {
    /// Connections that were sent a full snapshot
    pub full_recipients: Vec<SocketAddr>,
    /// Flags of the delta sent to every up-to-date connection, if any
    pub delta_flags: Option<F>,
}

impl<F> Default for FrameOutcome<F> {
    fn default() -> Self {
        Self {
            full_recipients: Vec::new(),
            delta_flags: None,
        }
    }
}

struct PendingCreation {
    address: SocketAddr,
    retries: u32,
}

/// Replicates one component instance to every connection, deciding per frame
/// and per connection between a full snapshot, a delta, or nothing.
pub struct ComponentBroadcaster<C: ReplicatedComponent> {
    node: NodeId,
    previous: C,
    classifier: EndpointClassifier,
    pending_creations: Vec<PendingCreation>,
    // connections that know this instance exists
    announced_to: BTreeSet<SocketAddr>,
    initialized: bool,
    creations_processed: bool,
    updated_this_frame: bool,
}

impl<C: ReplicatedComponent> ComponentBroadcaster<C> {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            previous: C::default(),
            classifier: EndpointClassifier::new(),
            pending_creations: Vec::new(),
            announced_to: BTreeSet::new(),
            initialized: false,
            creations_processed: false,
            updated_this_frame: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn reset_frame(&mut self) {
        self.updated_this_frame = false;
        self.creations_processed = false;
        self.classifier.reset_frame();
    }

    pub fn updated_this_frame(&self) -> bool {
        self.updated_this_frame
    }

    pub fn is_announced_to(&self, address: &SocketAddr) -> bool {
        self.announced_to.contains(address)
    }

    pub fn pending_creation_count(&self) -> usize {
        self.pending_creations.len()
    }

    /// Sends `Created` to connections that have not seen this instance yet. On
    /// the first call every live connection counts as new. Connections that are
    /// not eligible yet are queued and retried on later frames.
    pub fn process_new_connections(
        &mut self,
        delta: &ConnectionDelta,
        eligible: &dyn Fn(&SocketAddr) -> bool,
        outbox: &mut SyncOutbox,
        perf: &mut PerfMonitor,
        config: &BroadcastConfig,
    ) {
        if self.creations_processed {
            return;
        }
        self.creations_processed = true;

        let targets = self.forget_removed(delta);
        if !C::EXPLICIT_CREATION {
            return;
        }

        let mut ready = Vec::new();
        let mut still_pending = Vec::new();
        for mut pending in std::mem::take(&mut self.pending_creations) {
            if eligible(&pending.address) {
                ready.push(pending.address);
                continue;
            }
            pending.retries += 1;
            if let Some(max_retries) = config.max_creation_retries {
                if pending.retries > max_retries {
                    warn!(
                        "Dropping {} creation for node {} on {} after {} retries",
                        C::KIND,
                        self.node,
                        pending.address,
                        max_retries
                    );
                    perf.increment(C::KIND, PerfCounter::CreationDropped);
                    continue;
                }
            }
            still_pending.push(pending);
        }
        for address in targets {
            if self.announced_to.contains(&address)
                || still_pending.iter().any(|pending| pending.address == address)
            {
                continue;
            }
            if eligible(&address) {
                ready.push(address);
            } else {
                perf.increment(C::KIND, PerfCounter::CreationQueued);
                still_pending.push(PendingCreation {
                    address,
                    retries: 0,
                });
            }
        }
        self.pending_creations = still_pending;

        if ready.is_empty() {
            return;
        }
        let mut writer = StreamWriter::new();
        ComponentMessage::write_header(
            self.node,
            C::KIND,
            ComponentActionType::Created,
            &mut writer,
        );
        outbox.send(&ready, writer.as_slice());
        for address in ready {
            perf.increment(C::KIND, PerfCounter::CreationSend);
            self.announced_to.insert(address);
        }
    }

    /// Sends this frame's state. Calling it again in the same frame does nothing.
    ///
    /// `mask` limits which changes are looked at; fields outside it keep their
    /// last sent value and are picked up once the mask allows them again.
    #[allow(clippy::too_many_arguments)]
    pub fn on_frame_completed(
        &mut self,
        current: &C,
        delta: &ConnectionDelta,
        eligible: &dyn Fn(&SocketAddr) -> bool,
        mask: Option<C::Flags>,
        outbox: &mut SyncOutbox,
        perf: &mut PerfMonitor,
        config: &BroadcastConfig,
    ) -> FrameOutcome<C::Flags> {
        if self.updated_this_frame {
            return FrameOutcome::default();
        }
        self.updated_this_frame = true;

        self.process_new_connections(delta, eligible, outbox, perf, config);

        let announced_to = &self.announced_to;
        let (classification, cache_hit) = self.classifier.classify(delta, |address| {
            eligible(address) && (!C::EXPLICIT_CREATION || announced_to.contains(address))
        });
        perf.increment(
            C::KIND,
            if cache_hit {
                PerfCounter::ClassifierCacheHit
            } else {
                PerfCounter::ClassifierCacheMiss
            },
        );

        let mut outcome = FrameOutcome::default();

        if classification.needing_delta.is_empty() {
            self.previous = current.clone();
        } else {
            let mut flags = current.diff(&self.previous, config.change_epsilon);
            if let Some(mask) = mask {
                flags = flags.intersection(mask);
            }
            if flags.is_empty() {
                perf.increment(C::KIND, PerfCounter::NoChangeSkip);
            } else {
                let trimmed = current.delta_state(&self.previous, flags);
                let mut writer = StreamWriter::new();
                ComponentMessage::write_update(
                    self.node,
                    trimmed.as_ref().unwrap_or(current),
                    flags,
                    &mut writer,
                );
                outbox.send(&classification.needing_delta, writer.as_slice());
                for _ in &classification.needing_delta {
                    perf.increment(C::KIND, PerfCounter::DeltaSend);
                }
                outcome.delta_flags = Some(flags);
            }
            self.previous.assign(current, flags);
        }

        if !classification.needing_full.is_empty() {
            let mut writer = StreamWriter::new();
            ComponentMessage::write_update(self.node, current, current.full_flags(), &mut writer);
            outbox.send(&classification.needing_full, writer.as_slice());
            for address in &classification.needing_full {
                perf.increment(C::KIND, PerfCounter::FullSend);
                self.classifier.mark_initialized(*address);
                self.announced_to.insert(*address);
            }
            outcome.full_recipients = classification.needing_full;
        }

        outcome
    }

    /// Keeps the per-connection bookkeeping of a frame in which nothing is sent,
    /// such as one where the component is disabled. Connections that arrived
    /// are queued for creation and ones that left are forgotten, so sending
    /// picks up correctly once it resumes.
    pub fn skip_frame(&mut self, delta: &ConnectionDelta) {
        if self.updated_this_frame {
            return;
        }
        self.updated_this_frame = true;
        self.classifier.forget(delta);

        if self.creations_processed {
            return;
        }
        self.creations_processed = true;

        let targets = self.forget_removed(delta);
        if !C::EXPLICIT_CREATION {
            return;
        }
        for address in targets {
            if self.announced_to.contains(&address)
                || self
                    .pending_creations
                    .iter()
                    .any(|pending| pending.address == address)
            {
                continue;
            }
            self.pending_creations.push(PendingCreation {
                address,
                retries: 0,
            });
        }
    }

    /// The state the last delta was computed against
    pub fn last_sent(&self) -> &C {
        &self.previous
    }

    /// Drops connections that went away and returns the ones that still need a
    /// `Created`: every live connection the first time, then only new ones
    fn forget_removed(&mut self, delta: &ConnectionDelta) -> Vec<SocketAddr> {
        for address in &delta.removed {
            self.announced_to.remove(address);
        }
        self.pending_creations
            .retain(|pending| !delta.removed.contains(&pending.address));

        let targets = if self.initialized {
            delta.added.clone()
        } else {
            delta.live().copied().collect()
        };
        self.initialized = true;
        targets
    }

    /// Tells every live connection that knows this instance that it is gone.
    /// Returns how many were told.
    pub fn send_destroyed(&self, delta: &ConnectionDelta, outbox: &mut SyncOutbox) -> usize {
        let recipients: Vec<SocketAddr> = delta
            .live()
            .filter(|address| self.announced_to.contains(address))
            .copied()
            .collect();
        if !recipients.is_empty() {
            let mut writer = StreamWriter::new();
            ComponentMessage::write_header(
                self.node,
                C::KIND,
                ComponentActionType::Destroyed,
                &mut writer,
            );
            outbox.send(&recipients, writer.as_slice());
        }
        recipients.len()
    }
}
