use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::push::activation::activation_trait::DeviceActivation;
use crate::push::activation::logging::redact;
use crate::push::types::RegistrationToken;

/// 队列激活实现
///
/// token 放进无界 mpsc 队列，由宿主的异步激活 worker 消费。
/// 入队不阻塞；队列已关闭时只记日志。
#[derive(Clone)]
pub struct QueuedActivation {
    sender: mpsc::UnboundedSender<RegistrationToken>,
}

impl QueuedActivation {
    /// 创建实现和对应的接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RegistrationToken>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: mpsc::UnboundedSender<RegistrationToken>) -> Self {
        Self { sender }
    }
}

impl DeviceActivation for QueuedActivation {
    fn on_new_registration_token(&self, token: RegistrationToken) {
        let redacted = redact(token.token());
        match self.sender.send(token) {
            Ok(()) => debug!("[ACTIVATION] Token queued: token={}", redacted),
            Err(_) => warn!(
                "[ACTIVATION] Activation queue closed, token dropped: token={}",
                redacted
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::types::TokenType;

    #[tokio::test]
    async fn test_queued_activation_delivers_token() {
        let (activation, mut rx) = QueuedActivation::channel();
        activation.on_new_registration_token(RegistrationToken::new(TokenType::Fcm, "tok-123"));

        let token = rx.recv().await.unwrap();
        assert_eq!(token.token_type(), TokenType::Fcm);
        assert_eq!(token.token(), "tok-123");
    }

    #[test]
    fn test_closed_queue_is_absorbed() {
        let (activation, rx) = QueuedActivation::channel();
        drop(rx);
        activation.on_new_registration_token(RegistrationToken::new(TokenType::Fcm, "tok-123"));
    }
}
