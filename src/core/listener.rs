use std::rc::Rc;
use std::sync::Arc;

/// Caller-defined status code passed to connect/read/write callbacks.
pub type Status = i64;

/// Lifecycle hooks a channel driver invokes on behalf of one channel.
///
/// `T` is the attached data the driver passes through every callback for a
/// given channel. The driver owns it; the listener only borrows it for the
/// duration of a call.
///
/// Callbacks return nothing and have no error channel. Anything that can go
/// wrong inside a callback must be handled there (see [`Contained`] for a
/// wrapper that stops panics at the boundary).
///
/// `on_close` is the last call for a given attached-data instance. The other
/// three may arrive in any order and any number of times.
///
/// [`Contained`]: crate::core::contain::Contained
pub trait ChannelListener<T: ?Sized> {
    /// The channel was closed or torn down.
    fn on_close(&self, data: &mut T);

    /// The channel finished connecting.
    fn on_connect(&self, status: Status, data: &mut T);

    /// Data became available to read.
    fn on_read(&self, status: Status, data: &mut T);

    /// A write completed or the channel became writable.
    fn on_write(&self, status: Status, data: &mut T);
}

impl<T: ?Sized, L: ChannelListener<T> + ?Sized> ChannelListener<T> for &L {
    fn on_close(&self, data: &mut T) {
        (**self).on_close(data)
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        (**self).on_connect(status, data)
    }

    fn on_read(&self, status: Status, data: &mut T) {
        (**self).on_read(status, data)
    }

    fn on_write(&self, status: Status, data: &mut T) {
        (**self).on_write(status, data)
    }
}

impl<T: ?Sized, L: ChannelListener<T> + ?Sized> ChannelListener<T> for Box<L> {
    fn on_close(&self, data: &mut T) {
        (**self).on_close(data)
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        (**self).on_connect(status, data)
    }

    fn on_read(&self, status: Status, data: &mut T) {
        (**self).on_read(status, data)
    }

    fn on_write(&self, status: Status, data: &mut T) {
        (**self).on_write(status, data)
    }
}

impl<T: ?Sized, L: ChannelListener<T> + ?Sized> ChannelListener<T> for Arc<L> {
    fn on_close(&self, data: &mut T) {
        (**self).on_close(data)
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        (**self).on_connect(status, data)
    }

    fn on_read(&self, status: Status, data: &mut T) {
        (**self).on_read(status, data)
    }

    fn on_write(&self, status: Status, data: &mut T) {
        (**self).on_write(status, data)
    }
}

impl<T: ?Sized, L: ChannelListener<T> + ?Sized> ChannelListener<T> for Rc<L> {
    fn on_close(&self, data: &mut T) {
        (**self).on_close(data)
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        (**self).on_connect(status, data)
    }

    fn on_read(&self, status: Status, data: &mut T) {
        (**self).on_read(status, data)
    }

    fn on_write(&self, status: Status, data: &mut T) {
        (**self).on_write(status, data)
    }
}

/// Listener that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl<T: ?Sized> ChannelListener<T> for NoopListener {
    fn on_close(&self, _data: &mut T) {}

    fn on_connect(&self, _status: Status, _data: &mut T) {}

    fn on_read(&self, _status: Status, _data: &mut T) {}

    fn on_write(&self, _status: Status, _data: &mut T) {}
}
