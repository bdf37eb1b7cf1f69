use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::error;

use super::event::Callback;
use super::listener::{ChannelListener, Status};

/// A callback panicked and was stopped before reaching the driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener '{listener}' panicked in {callback}: {message}")]
pub struct CallbackPanic {
    pub listener: String,
    pub callback: Callback,
    pub message: String,
}

/// Shared record of the panics a [`Contained`] listener has absorbed.
#[derive(Debug, Default)]
pub struct PanicLog {
    count: AtomicU64,
    last: Mutex<Option<CallbackPanic>>,
}

impl PanicLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, panic: CallbackPanic) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = Some(panic);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn last(&self) -> Option<CallbackPanic> {
        self.last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Runs every callback of the inner listener under `catch_unwind` so that a
/// panicking listener never unwinds into the channel driver.
pub struct Contained<L> {
    name: String,
    inner: L,
    log: Arc<PanicLog>,
}

impl<L> Contained<L> {
    pub fn new(name: impl Into<String>, inner: L) -> Self {
        Self::with_log(name, inner, Arc::new(PanicLog::new()))
    }

    pub fn with_log(name: impl Into<String>, inner: L, log: Arc<PanicLog>) -> Self {
        Self {
            name: name.into(),
            inner,
            log,
        }
    }

    pub fn panic_log(&self) -> Arc<PanicLog> {
        Arc::clone(&self.log)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn guard(&self, callback: Callback, call: impl FnOnce()) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(call)) {
            let panic = CallbackPanic {
                listener: self.name.clone(),
                callback,
                message: panic_message(&*payload),
            };
            error!("{}", panic);
            self.log.record(panic);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl<T: ?Sized, L: ChannelListener<T>> ChannelListener<T> for Contained<L> {
    fn on_close(&self, data: &mut T) {
        self.guard(Callback::Close, || self.inner.on_close(data));
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        self.guard(Callback::Connect, || self.inner.on_connect(status, data));
    }

    fn on_read(&self, status: Status, data: &mut T) {
        self.guard(Callback::Read, || self.inner.on_read(status, data));
    }

    fn on_write(&self, status: Status, data: &mut T) {
        self.guard(Callback::Write, || self.inner.on_write(status, data));
    }
}
