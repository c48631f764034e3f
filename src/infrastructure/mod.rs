pub mod event_bus;
pub mod local_backend;
pub mod mock;
pub mod observability;
pub mod repositories;
pub mod rule_set_loader;

pub use event_bus::{EventBus, Subscription, SubscriptionId};
pub use local_backend::LocalSimulationBackend;
pub use repositories::InMemoryAccountRepository;
