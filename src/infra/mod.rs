pub mod event_bus;

pub use event_bus::{EventFilter, EventReceiver, LocalEventBus, LocalFanOut, ReceiverId};
