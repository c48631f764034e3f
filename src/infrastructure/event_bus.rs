//! Health event fan-out
//!
//! Dashboards usually care about one account (its badge) or one outcome
//! (every account that just failed). Listeners register with a
//! `Subscription` and only see matching events.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::evaluation::types::HealthStatus;
use crate::domain::events::{EventListener, HealthEvent};

/// Which events a listener receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    All,
    /// Every event about one tracked account
    Account(Uuid),
    /// Status changes that land on this classification
    Status(HealthStatus),
}

impl Subscription {
    pub fn matches(&self, event: &HealthEvent) -> bool {
        match self {
            Subscription::All => true,
            Subscription::Account(id) => event.account_id() == *id,
            Subscription::Status(status) => {
                matches!(event, HealthEvent::StatusChanged { to, .. } if to == status)
            }
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registration {
    id: SubscriptionId,
    subscription: Subscription,
    listener: Arc<dyn EventListener>,
}

/// Routes health events to the listeners whose subscription matches
#[derive(Default)]
pub struct EventBus {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(
        &self,
        subscription: Subscription,
        listener: Arc<dyn EventListener>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.registrations.write().await.push(Registration {
            id,
            subscription,
            listener,
        });
        debug!("EventBus: {:?} subscribed to {:?}", id, subscription);
        id
    }

    /// Returns false when `id` was not subscribed
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registrations = self.registrations.write().await;
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() != before
    }

    /// Deliver `event` to matching listeners; returns how many received it
    pub async fn publish(&self, event: HealthEvent) -> usize {
        let registrations = self.registrations.read().await;
        let mut delivered = 0;
        for registration in registrations
            .iter()
            .filter(|r| r.subscription.matches(&event))
        {
            registration.listener.on_event(&event);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::types::RuleKind;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingListener {
        count: AtomicUsize,
    }

    impl CountingListener {
        fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl EventListener for CountingListener {
        fn on_event(&self, _event: &HealthEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn status_change(account_id: Uuid, to: HealthStatus) -> HealthEvent {
        HealthEvent::StatusChanged {
            account_id,
            label: "Eval #1".to_string(),
            from: Some(HealthStatus::Safe),
            to,
            rules: vec![RuleKind::DailyLoss],
            timestamp: Utc::now(),
        }
    }

    fn opened(account_id: Uuid) -> HealthEvent {
        HealthEvent::AccountOpened {
            account_id,
            label: "Eval #1".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_account_subscription_filters_by_id() {
        let bus = EventBus::new();
        let mine = Uuid::new_v4();
        let listener = Arc::new(CountingListener::default());
        bus.subscribe(Subscription::Account(mine), listener.clone())
            .await;

        assert_eq!(bus.publish(opened(mine)).await, 1);
        assert_eq!(bus.publish(status_change(mine, HealthStatus::Warning)).await, 1);
        assert_eq!(bus.publish(opened(Uuid::new_v4())).await, 0);

        assert_eq!(listener.count(), 2);
    }

    #[tokio::test]
    async fn test_status_subscription_only_sees_status_changes() {
        let bus = EventBus::new();
        let failures = Arc::new(CountingListener::default());
        let everything = Arc::new(CountingListener::default());
        bus.subscribe(Subscription::Status(HealthStatus::Violation), failures.clone())
            .await;
        bus.subscribe(Subscription::All, everything.clone()).await;

        let id = Uuid::new_v4();
        bus.publish(opened(id)).await;
        bus.publish(status_change(id, HealthStatus::Warning)).await;
        bus.publish(status_change(id, HealthStatus::Violation)).await;

        assert_eq!(failures.count(), 1);
        assert_eq!(everything.count(), 3);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let listener = Arc::new(CountingListener::default());
        let id = bus.subscribe(Subscription::All, listener.clone()).await;

        assert!(bus.unsubscribe(id).await);
        assert!(!bus.unsubscribe(id).await);

        assert_eq!(bus.publish(opened(Uuid::new_v4())).await, 0);
        assert_eq!(listener.count(), 0);
    }
}
