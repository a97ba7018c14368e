pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod logging;
pub mod push;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use infra::event_bus::{EventFilter, EventReceiver, LocalEventBus, LocalFanOut, ReceiverId};
pub use push::{
    classify, DeviceActivation, InboundPush, LoggingActivation, MessageRelay, Notification,
    PushMessagingHandler, PushRelayService, QueuedActivation, RegistrationToken, RelayEvent,
    RelayEventKind, TokenRegistrar, TokenType,
};
