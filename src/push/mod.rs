pub mod activation;
pub mod handler;
pub mod registrar;
pub mod relay;
pub mod types;

pub use activation::{DeviceActivation, LoggingActivation, QueuedActivation};
pub use handler::{PushMessagingHandler, PushRelayService};
pub use registrar::TokenRegistrar;
pub use relay::{classify, MessageRelay};
pub use types::{
    InboundPush, Notification, RegistrationToken, RelayEvent, RelayEventKind, TokenType,
    PUSH_DATA_ACTION, PUSH_NOTIFICATION_ACTION,
};
