use chanwatch::core::{ChannelEvent, ChannelListener, ForwardingListener, RecordingListener};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Conn {
    peer: String,
}

#[tokio::test]
async fn test_forwarded_events_reach_a_task() {
    let (listener, mut rx) = ForwardingListener::<Conn>::unbounded();

    let consumer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(forwarded) = rx.recv().await {
            let done = forwarded.event.is_terminal();
            seen.push(forwarded);
            if done {
                break;
            }
        }
        seen
    });

    let mut conn = Conn {
        peer: "10.0.0.1:80".to_string(),
    };
    listener.on_connect(0, &mut conn);
    listener.on_read(512, &mut conn);
    listener.on_close(&mut conn);

    let seen = consumer.await.expect("consumer panicked");

    let events: Vec<ChannelEvent> = seen.iter().map(|f| f.event).collect();
    assert_eq!(
        events,
        vec![
            ChannelEvent::Connect { status: 0 },
            ChannelEvent::Read { status: 512 },
            ChannelEvent::Close,
        ]
    );
    assert!(seen.iter().all(|f| f.data.peer == "10.0.0.1:80"));
}

#[tokio::test]
async fn test_listeners_can_be_shared_across_threads() {
    let recorder = Arc::new(RecordingListener::<u32>::new());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let recorder = Arc::clone(&recorder);
            tokio::task::spawn_blocking(move || {
                let mut data = worker;
                recorder.on_read(worker as i64, &mut data);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(recorder.len(), 4);
}
