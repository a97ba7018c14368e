use std::sync::Arc;

use parking_lot::Mutex;
use push_relay::{
    EventFilter, InboundPush, LocalEventBus, Notification, PushMessagingHandler,
    PushRelayService, QueuedActivation, RelayEvent, RelayEventKind, TokenType,
};

struct Harness {
    service: Arc<PushRelayService>,
    bus: Arc<LocalEventBus>,
    received: Arc<Mutex<Vec<RelayEvent>>>,
    registrations: tokio::sync::mpsc::UnboundedReceiver<push_relay::RegistrationToken>,
}

fn harness() -> Harness {
    let (activation, registrations) = QueuedActivation::channel();
    let bus = Arc::new(LocalEventBus::new());
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    bus.register_receiver(
        EventFilter::all(),
        Arc::new(move |e: &RelayEvent| sink.lock().push(e.clone())),
    );
    let service = Arc::new(PushRelayService::new(Arc::new(activation), bus.clone()));
    Harness {
        service,
        bus,
        received,
        registrations,
    }
}

fn pairs(event: &RelayEvent) -> Vec<(&str, &str)> {
    event
        .data
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

#[test]
fn data_message_is_relayed_unmodified() {
    let h = harness();
    h.service
        .on_message_received(&InboundPush::from_json(r#"{"data":{"foo":"bar"}}"#).unwrap());

    let received = h.received.lock();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, RelayEventKind::DataMessage);
    assert_eq!(pairs(&received[0]), vec![("foo", "bar")]);
}

#[test]
fn notification_only_message_carries_title_and_body() {
    let h = harness();
    h.service.on_message_received(
        &InboundPush::default().with_notification(Notification::new("Hi", "There")),
    );

    let received = h.received.lock();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, RelayEventKind::NotificationMessage);
    assert_eq!(pairs(&received[0]), vec![("body", "There"), ("title", "Hi")]);
}

#[test]
fn notification_descriptor_overwrites_data_title() {
    let h = harness();
    h.service.on_message_received(
        &InboundPush::data([("title", "old")]).with_notification(Notification::new("New", "B")),
    );

    let received = h.received.lock();
    assert_eq!(received.len(), 1);
    assert_eq!(pairs(&received[0]), vec![("body", "B"), ("title", "New")]);
}

#[test]
fn empty_push_is_ignored() {
    let h = harness();
    h.service.on_message_received(&InboundPush::default());
    assert!(h.received.lock().is_empty());
}

#[tokio::test]
async fn token_refresh_registers_once() {
    let mut h = harness();
    h.service.on_new_token("tok-123");

    let token = h.registrations.recv().await.unwrap();
    assert_eq!(token.token_type(), TokenType::Fcm);
    assert_eq!(token.token(), "tok-123");
    assert!(h.registrations.try_recv().is_err());
    assert!(h.received.lock().is_empty());
}

#[tokio::test]
async fn queued_subscribers_see_extras_envelope_pushes() {
    let h = harness();
    let mut notifications = h.bus.subscribe(RelayEventKind::NotificationMessage);
    let mut data = h.bus.subscribe(RelayEventKind::DataMessage);

    let push = InboundPush::from_json(
        r#"{"push":{"notification":{"title":"testNotification","body":"Hello from push publish"},"data":{"runId":"r-42"}}}"#,
    )
    .unwrap();
    h.service.on_message_received(&push);

    let event = notifications.recv().await.unwrap();
    assert_eq!(event.get("runId"), Some("r-42"));
    assert_eq!(event.get("title"), Some("testNotification"));
    assert!(data.try_recv().is_err());
}

#[test]
fn concurrent_callbacks_each_emit_one_event() {
    let h = harness();
    let threads: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&h.service);
            std::thread::spawn(move || {
                let seq = i.to_string();
                service.on_message_received(&InboundPush::data([("seq", seq.as_str())]));
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let mut seqs: Vec<String> = h
        .received
        .lock()
        .iter()
        .map(|e| e.get("seq").unwrap().to_string())
        .collect();
    seqs.sort();
    let mut expected: Vec<String> = (0..8).map(|i| i.to_string()).collect();
    expected.sort();
    assert_eq!(seqs, expected);
}
