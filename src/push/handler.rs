use std::sync::Arc;

use crate::config::RelayConfig;
use crate::infra::event_bus::LocalFanOut;
use crate::push::activation::DeviceActivation;
use crate::push::registrar::TokenRegistrar;
use crate::push::relay::MessageRelay;
use crate::push::types::InboundPush;

/// 推送回调接口
///
/// 宿主把推送平台的两个回调绑定到这个对象上。回调可能来自不同线程。
pub trait PushMessagingHandler: Send + Sync {
    /// token 签发或轮换
    fn on_new_token(&self, token: &str);

    /// 收到一条推送
    fn on_message_received(&self, message: &InboundPush);
}

/// 组合 TokenRegistrar 和 MessageRelay 的默认回调实现
pub struct PushRelayService {
    registrar: TokenRegistrar,
    relay: MessageRelay,
}

impl PushRelayService {
    pub fn new(activation: Arc<dyn DeviceActivation>, fan_out: Arc<dyn LocalFanOut>) -> Self {
        Self {
            registrar: TokenRegistrar::new(activation),
            relay: MessageRelay::new(fan_out),
        }
    }

    /// 按配置中的 token 类型创建
    pub fn from_config(
        config: &RelayConfig,
        activation: Arc<dyn DeviceActivation>,
        fan_out: Arc<dyn LocalFanOut>,
    ) -> Self {
        Self {
            registrar: TokenRegistrar::with_token_type(activation, config.token_type),
            relay: MessageRelay::new(fan_out),
        }
    }

    pub fn registrar(&self) -> &TokenRegistrar {
        &self.registrar
    }

    pub fn relay(&self) -> &MessageRelay {
        &self.relay
    }
}

impl PushMessagingHandler for PushRelayService {
    fn on_new_token(&self, token: &str) {
        self.registrar.on_token_refreshed(token);
    }

    fn on_message_received(&self, message: &InboundPush) {
        self.relay.on_push_received(message);
    }
}
