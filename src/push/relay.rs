use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::infra::event_bus::LocalFanOut;
use crate::push::types::{InboundPush, RelayEvent, RelayEventKind};

/// 把一条推送归一化为本地事件
///
/// - data 为空且没有通知：不产生事件
/// - 有通知：拷贝 data，再写入 `title` / `body`（覆盖同名 key），类型为 NotificationMessage
/// - 否则：拷贝 data，类型为 DataMessage
pub fn classify(payload: &InboundPush) -> Option<RelayEvent> {
    if payload.is_empty() {
        return None;
    }

    let mut data: BTreeMap<String, String> = payload
        .data
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let kind = match &payload.notification {
        Some(notification) => {
            data.insert("title".to_string(), notification.title.clone());
            data.insert("body".to_string(), notification.body.clone());
            RelayEventKind::NotificationMessage
        }
        None => RelayEventKind::DataMessage,
    };

    Some(RelayEvent::new(kind, data))
}

/// Message Relay（推送消息转发器）
///
/// 无状态；每次调用在调用线程上同步发布，最多产生一个事件。
pub struct MessageRelay {
    fan_out: Arc<dyn LocalFanOut>,
}

impl MessageRelay {
    pub fn new(fan_out: Arc<dyn LocalFanOut>) -> Self {
        Self { fan_out }
    }

    /// 收到一条推送
    pub fn on_push_received(&self, payload: &InboundPush) {
        let Some(event) = classify(payload) else {
            debug!("[PUSH RELAY] Empty push payload, nothing to relay");
            return;
        };

        match (event.kind, &payload.notification) {
            (RelayEventKind::NotificationMessage, Some(n)) => info!(
                "[PUSH RELAY] Received message notification: title={}, body={}",
                n.title, n.body
            ),
            _ => info!("[PUSH RELAY] Received data message: keys={}", event.data.len()),
        }

        self.fan_out.publish(event);
    }
}
