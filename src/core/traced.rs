use tracing::{debug, error, info, trace, warn, Level};

use super::event::Callback;
use super::listener::{ChannelListener, Status};

/// Logs every callback before handing it to the inner listener.
pub struct TracedListener<L> {
    name: String,
    level: Level,
    inner: L,
}

impl<L> TracedListener<L> {
    pub fn new(name: impl Into<String>, level: Level, inner: L) -> Self {
        Self {
            name: name.into(),
            level,
            inner,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    // tracing macros need the level at compile time
    fn log(&self, callback: Callback, status: Option<Status>) {
        let listener = self.name.as_str();
        match self.level {
            Level::TRACE => trace!(listener, %callback, ?status, "channel callback"),
            Level::DEBUG => debug!(listener, %callback, ?status, "channel callback"),
            Level::INFO => info!(listener, %callback, ?status, "channel callback"),
            Level::WARN => warn!(listener, %callback, ?status, "channel callback"),
            _ => error!(listener, %callback, ?status, "channel callback"),
        }
    }
}

impl<T: ?Sized, L: ChannelListener<T>> ChannelListener<T> for TracedListener<L> {
    fn on_close(&self, data: &mut T) {
        self.log(Callback::Close, None);
        self.inner.on_close(data);
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        self.log(Callback::Connect, Some(status));
        self.inner.on_connect(status, data);
    }

    fn on_read(&self, status: Status, data: &mut T) {
        self.log(Callback::Read, Some(status));
        self.inner.on_read(status, data);
    }

    fn on_write(&self, status: Status, data: &mut T) {
        self.log(Callback::Write, Some(status));
        self.inner.on_write(status, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::ChannelEvent;
    use crate::core::recorder::RecordingListener;

    #[test]
    fn test_delegates_every_callback() {
        for level in [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
            let traced = TracedListener::new("audit", level, RecordingListener::new());
            let mut data = 'x';

            traced.on_connect(0, &mut data);
            traced.on_read(1, &mut data);
            traced.on_write(2, &mut data);
            traced.on_close(&mut data);

            assert_eq!(traced.level(), level);
            assert_eq!(
                traced.inner().events(),
                vec![
                    ChannelEvent::Connect { status: 0 },
                    ChannelEvent::Read { status: 1 },
                    ChannelEvent::Write { status: 2 },
                    ChannelEvent::Close,
                ]
            );
        }
    }
}
