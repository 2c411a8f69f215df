// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// An unbounded, multi-producer event channel with a single owning consumer.
#[derive(Debug)]
pub struct EventBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> EventBus<T> {
    /// Creates an empty bus.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Pushes an event. Never fails while the bus is alive since the bus owns
    /// its receiver.
    pub fn publish(&self, event: T) {
        if self.sender.send(event).is_err() {
            log::error!("EventBus receiver disconnected; event dropped.");
        }
    }

    /// A producer handle to give to collaborators.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// The consumer end.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Removes every queued event in arrival order without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{IntersectionEntry, SubscriptionHandle};
    use std::thread;

    fn entry(id: u64, is_intersecting: bool) -> IntersectionEntry {
        IntersectionEntry {
            subscription: SubscriptionHandle(id),
            is_intersecting,
            ratio: if is_intersecting { 1.0 } else { 0.0 },
        }
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let bus = EventBus::new();
        bus.publish(entry(1, true));
        bus.publish(entry(2, false));
        bus.sender().send(entry(3, true)).unwrap();

        assert_eq!(bus.len(), 3);
        let drained = bus.drain();
        let ids: Vec<u64> = drained.iter().map(|e| e.subscription.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(bus.is_empty());
    }

    #[test]
    fn events_from_worker_threads_arrive() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let handle = thread::spawn(move || {
            for id in 0..4 {
                sender.send(entry(id, true)).unwrap();
            }
        });
        handle.join().unwrap();
        assert_eq!(bus.drain().len(), 4);
    }

    #[test]
    fn sending_after_drop_fails() {
        let bus: EventBus<IntersectionEntry> = EventBus::new();
        let sender = bus.sender();
        drop(bus);
        assert!(sender.send(entry(9, true)).is_err());
    }
}
