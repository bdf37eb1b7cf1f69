use std::sync::{Mutex, MutexGuard};

use super::event::ChannelEvent;
use super::listener::{ChannelListener, Status};

/// One observed callback together with a copy of the attached data as it was
/// at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall<T> {
    pub event: ChannelEvent,
    pub data: T,
}

/// Listener that keeps every call it receives, in order.
#[derive(Debug)]
pub struct RecordingListener<T> {
    calls: Mutex<Vec<RecordedCall<T>>>,
}

impl<T: Clone> RecordingListener<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    // A panic elsewhere while holding the lock must not turn later
    // callbacks into panics too.
    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCall<T>>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: ChannelEvent, data: &T) {
        self.lock().push(RecordedCall {
            event,
            data: data.clone(),
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall<T>> {
        self.lock().clone()
    }

    pub fn events(&self) -> Vec<ChannelEvent> {
        self.lock().iter().map(|call| call.event).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether a close has been recorded.
    pub fn is_closed(&self) -> bool {
        self.lock().iter().any(|call| call.event.is_terminal())
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<RecordedCall<T>> {
        std::mem::take(&mut *self.lock())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<T: Clone> Default for RecordingListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ChannelListener<T> for RecordingListener<T> {
    fn on_close(&self, data: &mut T) {
        self.record(ChannelEvent::Close, data);
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        self.record(ChannelEvent::Connect { status }, data);
    }

    fn on_read(&self, status: Status, data: &mut T) {
        self.record(ChannelEvent::Read { status }, data);
    }

    fn on_write(&self, status: Status, data: &mut T) {
        self.record(ChannelEvent::Write { status }, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_records_data_snapshot_per_call() {
        let recorder = RecordingListener::new();
        let mut data = String::from("a");

        recorder.on_connect(0, &mut data);
        data.push('b');
        recorder.on_read(5, &mut data);

        let calls = recorder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].data, "a");
        assert_eq!(calls[1].data, "ab");
        assert_eq!(calls[1].event, ChannelEvent::Read { status: 5 });
        assert!(!recorder.is_closed());
    }

    #[test]
    fn test_take_and_clear() {
        let recorder = RecordingListener::new();
        let mut data = ();
        recorder.on_write(1, &mut data);
        recorder.on_close(&mut data);
        assert!(recorder.is_closed());

        let taken = recorder.take();
        assert_eq!(taken.len(), 2);
        assert!(recorder.is_empty());

        recorder.on_read(2, &mut data);
        recorder.clear();
        assert_eq!(recorder.len(), 0);
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let recorder = Arc::new(RecordingListener::<u8>::new());
        let poisoner = Arc::clone(&recorder);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.calls.lock().unwrap();
            panic!("poison the recorder");
        })
        .join();

        let mut data = 1u8;
        recorder.on_connect(0, &mut data);
        assert_eq!(recorder.events(), vec![ChannelEvent::Connect { status: 0 }]);
    }
}
