use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::push::types::{RelayEvent, RelayEventKind};

/// 默认的队列订阅容量
pub const DEFAULT_BUS_CAPACITY: usize = 1000;
/// 队列订阅容量上限
pub const MAX_BUS_CAPACITY: usize = 1_000_000;

/// 本地事件分发接口
///
/// `publish` 在调用线程上同步完成；没有订阅者不算错误。
pub trait LocalFanOut: Send + Sync {
    fn publish(&self, event: RelayEvent);
}

/// 同步回调接收者
pub trait EventReceiver: Send + Sync {
    fn on_receive(&self, event: &RelayEvent);
}

impl<F> EventReceiver for F
where
    F: Fn(&RelayEvent) + Send + Sync,
{
    fn on_receive(&self, event: &RelayEvent) {
        self(event)
    }
}

/// 接收者过滤器，列出关心的事件类型
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    kinds: HashSet<RelayEventKind>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同时接收所有事件类型
    pub fn all() -> Self {
        RelayEventKind::ALL.into_iter().collect()
    }

    pub fn add_kind(mut self, kind: RelayEventKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn matches(&self, kind: RelayEventKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl FromIterator<RelayEventKind> for EventFilter {
    fn from_iter<T: IntoIterator<Item = RelayEventKind>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// 注册接收者后返回的句柄，用于注销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

struct Registration {
    id: ReceiverId,
    filter: EventFilter,
    receiver: Arc<dyn EventReceiver>,
}

/// In-process Event Bus（进程内事件总线）
///
/// 两种订阅方式：
/// - `register_receiver`：同步回调，在发布线程上调用
/// - `subscribe`：每个事件类型一个 tokio broadcast 通道，供异步消费者使用
///
/// 同一类型的事件按发布顺序送达每个订阅者。
pub struct LocalEventBus {
    topics: HashMap<RelayEventKind, broadcast::Sender<RelayEvent>>,
    receivers: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl LocalEventBus {
    /// 创建新的事件总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// 指定每个 topic 队列的容量，限制在 1..=MAX_BUS_CAPACITY
    pub fn with_capacity(capacity: usize) -> Self {
        let topics = RelayEventKind::ALL
            .into_iter()
            .map(|kind| {
                let (sender, _) = broadcast::channel(capacity.clamp(1, MAX_BUS_CAPACITY));
                (kind, sender)
            })
            .collect();

        Self {
            topics,
            receivers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 注册同步接收者
    pub fn register_receiver(
        &self,
        filter: EventFilter,
        receiver: Arc<dyn EventReceiver>,
    ) -> ReceiverId {
        let id = ReceiverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.receivers.write().push(Registration {
            id,
            filter,
            receiver,
        });
        debug!("[EVENT BUS] Receiver registered: id={:?}", id);
        id
    }

    /// 注销接收者，返回是否存在
    pub fn unregister_receiver(&self, id: ReceiverId) -> bool {
        let mut receivers = self.receivers.write();
        let before = receivers.len();
        receivers.retain(|r| r.id != id);
        let removed = receivers.len() != before;
        if removed {
            debug!("[EVENT BUS] Receiver unregistered: id={:?}", id);
        }
        removed
    }

    /// 订阅某一类型的事件队列
    pub fn subscribe(&self, kind: RelayEventKind) -> broadcast::Receiver<RelayEvent> {
        self.topic(kind).subscribe()
    }

    /// 当前订阅该类型的数量（回调 + 队列）
    pub fn subscriber_count(&self, kind: RelayEventKind) -> usize {
        let callbacks = self
            .receivers
            .read()
            .iter()
            .filter(|r| r.filter.matches(kind))
            .count();
        callbacks + self.topic(kind).receiver_count()
    }

    fn topic(&self, kind: RelayEventKind) -> &broadcast::Sender<RelayEvent> {
        // topics 在构造时按 RelayEventKind::ALL 填满
        &self.topics[&kind]
    }
}

impl LocalFanOut for LocalEventBus {
    fn publish(&self, event: RelayEvent) {
        // 先拷出匹配的接收者再回调，回调里可以重新注册/注销
        let matched: Vec<Arc<dyn EventReceiver>> = self
            .receivers
            .read()
            .iter()
            .filter(|r| r.filter.matches(event.kind))
            .map(|r| Arc::clone(&r.receiver))
            .collect();

        for receiver in &matched {
            receiver.on_receive(&event);
        }

        let kind = event.kind;
        let queued = self.topic(kind).send(event).unwrap_or(0);
        trace!(
            "[EVENT BUS] Published {}: receivers={}, queued={}",
            kind,
            matched.len(),
            queued
        );
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new()
    }
}
