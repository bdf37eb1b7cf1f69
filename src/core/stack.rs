use std::sync::Arc;
use tracing::debug;

use super::contain::{Contained, PanicLog};
use super::listener::{ChannelListener, Status};
use super::metrics::{ListenerMetrics, MeteredListener};
use super::traced::TracedListener;
use crate::config::ListenerConfig;

/// A user listener wrapped in the layers its [`ListenerConfig`] asks for.
///
/// Layering, innermost first: metrics, tracing, panic containment. The
/// containment layer is outermost so a panic in any layer stays inside.
pub struct ListenerStack<'a, T: ?Sized> {
    name: String,
    listener: Box<dyn ChannelListener<T> + 'a>,
    metrics: Option<Arc<ListenerMetrics>>,
    panic_log: Option<Arc<PanicLog>>,
}

impl<'a, T: ?Sized + 'a> ListenerStack<'a, T> {
    pub fn build<L>(name: &str, config: &ListenerConfig, inner: L) -> Self
    where
        L: ChannelListener<T> + 'a,
    {
        let mut listener: Box<dyn ChannelListener<T> + 'a> = Box::new(inner);

        let metrics = if config.metrics {
            let metrics = Arc::new(ListenerMetrics::new(name));
            listener = Box::new(MeteredListener::new(listener, Arc::clone(&metrics)));
            Some(metrics)
        } else {
            None
        };

        if let Some(trace) = &config.trace {
            listener = Box::new(TracedListener::new(name, trace.level.into(), listener));
        }

        let panic_log = if config.contain_panics {
            let log = Arc::new(PanicLog::new());
            listener = Box::new(Contained::with_log(name, listener, Arc::clone(&log)));
            Some(log)
        } else {
            None
        };

        debug!(
            "Listener stack '{}' built (metrics: {}, trace: {}, contain_panics: {})",
            name,
            config.metrics,
            config.trace.is_some(),
            config.contain_panics
        );

        Self {
            name: name.to_string(),
            listener,
            metrics,
            panic_log,
        }
    }
}

impl<T: ?Sized> ListenerStack<'_, T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> Option<Arc<ListenerMetrics>> {
        self.metrics.clone()
    }

    pub fn panic_log(&self) -> Option<Arc<PanicLog>> {
        self.panic_log.clone()
    }
}

impl<T: ?Sized> ChannelListener<T> for ListenerStack<'_, T> {
    fn on_close(&self, data: &mut T) {
        self.listener.on_close(data);
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        self.listener.on_connect(status, data);
    }

    fn on_read(&self, status: Status, data: &mut T) {
        self.listener.on_read(status, data);
    }

    fn on_write(&self, status: Status, data: &mut T) {
        self.listener.on_write(status, data);
    }
}
