use tracing::info;

use crate::push::activation::activation_trait::DeviceActivation;
use crate::push::types::RegistrationToken;

/// 只打日志的激活实现（用于开发和测试）
///
/// 不联系任何后端。
pub struct LoggingActivation;

impl DeviceActivation for LoggingActivation {
    fn on_new_registration_token(&self, token: RegistrationToken) {
        info!(
            "[MOCK ACTIVATION] Registration token received: type={}, token={}",
            token.token_type(),
            redact(token.token())
        );
    }
}

/// 日志里只保留 token 的前几位
pub(crate) fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() < token.len() {
        format!("{}…", prefix)
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        assert_eq!(redact("tok"), "tok");
        assert_eq!(redact("tok-123456"), "tok-12…");
    }
}
