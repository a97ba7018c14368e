pub mod activation_trait;
pub mod logging;
pub mod queued;

pub use activation_trait::DeviceActivation;
pub use logging::LoggingActivation;
pub use queued::QueuedActivation;
