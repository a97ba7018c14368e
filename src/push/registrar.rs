use std::sync::Arc;

use tracing::info;

use crate::push::activation::DeviceActivation;
use crate::push::types::{RegistrationToken, TokenType};

/// Token Registrar（注册 token 转发器）
///
/// 每次 token 刷新调用一次激活子系统，token 原样透传。
pub struct TokenRegistrar {
    activation: Arc<dyn DeviceActivation>,
    token_type: TokenType,
}

impl TokenRegistrar {
    pub fn new(activation: Arc<dyn DeviceActivation>) -> Self {
        Self::with_token_type(activation, TokenType::Fcm)
    }

    pub fn with_token_type(activation: Arc<dyn DeviceActivation>, token_type: TokenType) -> Self {
        Self {
            activation,
            token_type,
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// 推送平台签发或轮换了 token
    pub fn on_token_refreshed(&self, token: &str) {
        info!("[PUSH RELAY] Registration token refreshed: type={}", self.token_type);
        self.activation
            .on_new_registration_token(RegistrationToken::new(self.token_type, token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingActivation {
        calls: Mutex<Vec<RegistrationToken>>,
    }

    impl DeviceActivation for RecordingActivation {
        fn on_new_registration_token(&self, token: RegistrationToken) {
            self.calls.lock().push(token);
        }
    }

    #[test]
    fn test_token_passed_through_once() {
        let activation = Arc::new(RecordingActivation::default());
        let registrar = TokenRegistrar::new(activation.clone());

        registrar.on_token_refreshed("tok-123");

        let calls = activation.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token_type(), TokenType::Fcm);
        assert_eq!(calls[0].token(), "tok-123");
    }

    #[test]
    fn test_every_refresh_registers() {
        let activation = Arc::new(RecordingActivation::default());
        let registrar = TokenRegistrar::new(activation.clone());

        registrar.on_token_refreshed("a");
        registrar.on_token_refreshed("a");
        registrar.on_token_refreshed("b");

        let tokens: Vec<String> = activation
            .calls
            .lock()
            .iter()
            .map(|t| t.token().to_string())
            .collect();
        assert_eq!(tokens, vec!["a", "a", "b"]);
    }
}
