use flume::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    SaveAll,
    UnSave,
    EditStart,
    EditEnd,
}

impl Topic {
    pub fn name(self) -> &'static str {
        match self {
            Topic::SaveAll => "snippets:saveAll",
            Topic::UnSave => "snippets:unSave",
            Topic::EditStart => "snippet-detail:edit-start",
            Topic::EditEnd => "snippet-detail:edit-end",
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, Vec<Topic>, Sender<Topic>)>,
}

/// Publish/subscribe hub shared by the panels and the host.
///
/// Cloning yields another handle to the same hub. Each subscription owns a
/// channel; signals queue there until the subscriber drains them.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, topic: Topic) -> Subscription {
        self.on_any(&[topic])
    }

    /// One subscription for several topics; signals keep their emit order
    pub fn on_any(&self, topics: &[Topic]) -> Subscription {
        let (tx, rx) = flume::unbounded();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, topics.to_vec(), tx));

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn emit(&self, topic: Topic) {
        let registry = lock(&self.registry);
        let mut delivered = 0;
        for (_, subscribed, tx) in &registry.subscribers {
            if subscribed.contains(&topic) && tx.send(topic).is_ok() {
                delivered += 1;
            }
        }
        tracing::debug!(topic = topic.name(), delivered, "event emitted");
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        lock(&self.registry)
            .subscribers
            .iter()
            .filter(|(_, subscribed, _)| subscribed.contains(&topic))
            .count()
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live interest in one or more topics. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: Receiver<Topic>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Next queued signal, oldest first
    pub fn try_next(&self) -> Option<Topic> {
        self.rx.try_recv().ok()
    }

    /// Number of queued signals, consumed
    pub fn drain(&self) -> usize {
        self.rx.try_iter().count()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry)
                .subscribers
                .retain(|(id, _, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_reach_only_matching_topic() {
        let bus = EventBus::new();
        let save = bus.on(Topic::SaveAll);
        let end = bus.on(Topic::EditEnd);

        bus.emit(Topic::SaveAll);
        bus.emit(Topic::SaveAll);

        assert_eq!(save.drain(), 2);
        assert_eq!(end.drain(), 0);
        assert_eq!(save.drain(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = EventBus::new();
        let sub = bus.on(Topic::UnSave);
        let clone = bus.clone();
        assert_eq!(clone.subscriber_count(Topic::UnSave), 1);
        drop(sub);
        assert_eq!(clone.subscriber_count(Topic::UnSave), 0);
        clone.emit(Topic::UnSave);
    }

    #[test]
    fn multi_topic_subscription_keeps_emit_order() {
        let bus = EventBus::new();
        let signals = bus.on_any(&[Topic::SaveAll, Topic::UnSave]);

        bus.emit(Topic::UnSave);
        bus.emit(Topic::EditEnd);
        bus.emit(Topic::SaveAll);

        assert_eq!(signals.try_next(), Some(Topic::UnSave));
        assert_eq!(signals.try_next(), Some(Topic::SaveAll));
        assert_eq!(signals.try_next(), None);
        assert_eq!(bus.subscriber_count(Topic::UnSave), 1);
        assert_eq!(bus.subscriber_count(Topic::SaveAll), 1);
    }

    #[test]
    fn topic_names_match_wire_spelling() {
        assert_eq!(Topic::SaveAll.name(), "snippets:saveAll");
        assert_eq!(Topic::UnSave.name(), "snippets:unSave");
        assert_eq!(Topic::EditStart.name(), "snippet-detail:edit-start");
        assert_eq!(Topic::EditEnd.name(), "snippet-detail:edit-end");
    }
}
