//! Per-window signal bus with explicit subscriptions.
//!
//! Emission only queues; each subscriber drains its own queue when it next
//! gets control, so nothing re-enters a decoration while it is mid-update.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    TitleChanged,
    DecorationMapState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSignal {
    TitleChanged,
    DecorationMapState { mapped: bool },
}

impl WindowSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            WindowSignal::TitleChanged => SignalKind::TitleChanged,
            WindowSignal::DecorationMapState { .. } => SignalKind::DecorationMapState,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Subscription {
    kind: SignalKind,
    pending: Vec<WindowSignal>,
}

#[derive(Debug, Default)]
pub struct SignalHub {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: SignalKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                kind,
                pending: Vec::new(),
            },
        );
        id
    }

    /// Drops the subscription and anything still queued for it. Returns
    /// `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Queues `signal` for every subscriber of its kind; returns how many.
    pub fn emit(&mut self, signal: WindowSignal) -> usize {
        let kind = signal.kind();
        let mut delivered = 0;
        for subscription in self.subscriptions.values_mut() {
            if subscription.kind == kind {
                subscription.pending.push(signal.clone());
                delivered += 1;
            }
        }
        tracing::trace!(?signal, delivered, "window signal emitted");
        delivered
    }

    pub fn take(&mut self, id: SubscriptionId) -> Vec<WindowSignal> {
        self.subscriptions
            .get_mut(&id)
            .map(|subscription| std::mem::take(&mut subscription.pending))
            .unwrap_or_default()
    }

    pub fn subscribers(&self, kind: SignalKind) -> usize {
        self.subscriptions
            .values()
            .filter(|subscription| subscription.kind == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_reach_only_matching_subscribers() {
        let mut hub = SignalHub::new();
        let title = hub.subscribe(SignalKind::TitleChanged);
        let map = hub.subscribe(SignalKind::DecorationMapState);

        assert_eq!(hub.emit(WindowSignal::TitleChanged), 1);
        assert_eq!(hub.take(title), vec![WindowSignal::TitleChanged]);
        assert!(hub.take(title).is_empty());
        assert!(hub.take(map).is_empty());
    }

    #[test]
    fn unsubscribe_is_final() {
        let mut hub = SignalHub::new();
        let id = hub.subscribe(SignalKind::TitleChanged);
        hub.emit(WindowSignal::TitleChanged);

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert_eq!(hub.subscribers(SignalKind::TitleChanged), 0);
        assert_eq!(hub.emit(WindowSignal::TitleChanged), 0);
        assert!(hub.take(id).is_empty());
    }
}
