use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// 通知消息的 action 名称
pub const PUSH_NOTIFICATION_ACTION: &str = "push_relay.PUSH_NOTIFICATION_MESSAGE";
/// 数据消息的 action 名称
pub const PUSH_DATA_ACTION: &str = "push_relay.PUSH_DATA_MESSAGE";

/// 注册 token 的推送平台类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Fcm,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Fcm => "fcm",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fcm" => Some(TokenType::Fcm),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 推送平台签发的设备注册 token
///
/// 创建后不可修改，交给激活子系统后 relay 不再持有。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationToken {
    token_type: TokenType,
    token: String,
}

impl RegistrationToken {
    pub fn new(token_type: TokenType, token: impl Into<String>) -> Self {
        Self {
            token_type,
            token: token.into(),
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// 通知描述（title / body）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// 推送平台投递过来的一条推送
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundPush {
    #[serde(default)]
    pub data: HashMap<String, String>,
    #[serde(default)]
    pub notification: Option<Notification>,
}

/// Ably 消息 extras 外层：`{"push": {...}}`
#[derive(Debug, Deserialize)]
struct PushExtras {
    push: InboundPush,
}

impl InboundPush {
    /// 纯数据消息
    pub fn data<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            notification: None,
        }
    }

    /// 附加通知描述
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    /// data 为空且没有通知
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.notification.is_none()
    }

    /// 从 JSON 解析
    ///
    /// 支持直接的 `{"data": .., "notification": ..}`，也支持包在
    /// `{"push": {...}}` 里的消息 extras。
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| RelayError::Payload("push payload must be a JSON object".to_string()))?;

        if object.contains_key("push") {
            let extras: PushExtras = serde_json::from_value(value)?;
            return Ok(extras.push);
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// 本地事件类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelayEventKind {
    NotificationMessage,
    DataMessage,
}

impl RelayEventKind {
    pub const ALL: [RelayEventKind; 2] = [
        RelayEventKind::NotificationMessage,
        RelayEventKind::DataMessage,
    ];

    /// 在总线上使用的 action / topic 名称
    pub fn action(&self) -> &'static str {
        match self {
            RelayEventKind::NotificationMessage => PUSH_NOTIFICATION_ACTION,
            RelayEventKind::DataMessage => PUSH_DATA_ACTION,
        }
    }

    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            PUSH_NOTIFICATION_ACTION => Some(RelayEventKind::NotificationMessage),
            PUSH_DATA_ACTION => Some(RelayEventKind::DataMessage),
            _ => None,
        }
    }
}

impl fmt::Display for RelayEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// 归一化后的本地事件
///
/// data 使用 BTreeMap，按 key 排序，输出稳定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayEvent {
    pub kind: RelayEventKind,
    pub data: BTreeMap<String, String>,
}

impl RelayEvent {
    pub fn new(kind: RelayEventKind, data: BTreeMap<String, String>) -> Self {
        Self { kind, data }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// 按 key 排序的 (key, value) 列表
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
