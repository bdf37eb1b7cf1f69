use tokio::sync::mpsc::{
    self,
    error::{TryRecvError, TrySendError},
};
use tracing::debug;

use super::event::ChannelEvent;
use super::listener::{ChannelListener, Status};

/// A callback delivered to async code, with a copy of the attached data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedEvent<T> {
    pub event: ChannelEvent,
    pub data: T,
}

enum Sender<T> {
    Bounded(mpsc::Sender<ForwardedEvent<T>>),
    Unbounded(mpsc::UnboundedSender<ForwardedEvent<T>>),
}

/// Receiving half returned alongside a [`ForwardingListener`].
pub enum ForwardReceiver<T> {
    Bounded(mpsc::Receiver<ForwardedEvent<T>>),
    Unbounded(mpsc::UnboundedReceiver<ForwardedEvent<T>>),
}

impl<T> ForwardReceiver<T> {
    pub async fn recv(&mut self) -> Option<ForwardedEvent<T>> {
        match self {
            ForwardReceiver::Bounded(rx) => rx.recv().await,
            ForwardReceiver::Unbounded(rx) => rx.recv().await,
        }
    }

    /// `Empty` while the listener is alive but idle, `Disconnected` once it
    /// has been dropped and every buffered event was taken.
    pub fn try_recv(&mut self) -> Result<ForwardedEvent<T>, TryRecvError> {
        match self {
            ForwardReceiver::Bounded(rx) => rx.try_recv(),
            ForwardReceiver::Unbounded(rx) => rx.try_recv(),
        }
    }
}

/// Pushes callbacks into a tokio channel so they can be consumed from a task.
///
/// Sending never blocks the driver. If the receiver has been dropped, or a
/// bounded channel is full, the event is discarded.
pub struct ForwardingListener<T> {
    tx: Sender<T>,
}

impl<T: Clone> ForwardingListener<T> {
    pub fn unbounded() -> (Self, ForwardReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: Sender::Unbounded(tx),
            },
            ForwardReceiver::Unbounded(rx),
        )
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn bounded(capacity: usize) -> (Self, ForwardReceiver<T>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx: Sender::Bounded(tx),
            },
            ForwardReceiver::Bounded(rx),
        )
    }

    fn forward(&self, event: ChannelEvent, data: &T) {
        let forwarded = ForwardedEvent {
            event,
            data: data.clone(),
        };
        match &self.tx {
            Sender::Unbounded(tx) => {
                if tx.send(forwarded).is_err() {
                    debug!("forwarding receiver dropped; discarding {}", event);
                }
            }
            Sender::Bounded(tx) => match tx.try_send(forwarded) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!("forwarding channel full; discarding {}", event);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("forwarding receiver dropped; discarding {}", event);
                }
            },
        }
    }
}

impl<T: Clone> ChannelListener<T> for ForwardingListener<T> {
    fn on_close(&self, data: &mut T) {
        self.forward(ChannelEvent::Close, data);
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        self.forward(ChannelEvent::Connect { status }, data);
    }

    fn on_read(&self, status: Status, data: &mut T) {
        self.forward(ChannelEvent::Read { status }, data);
    }

    fn on_write(&self, status: Status, data: &mut T) {
        self.forward(ChannelEvent::Write { status }, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbounded_forwards_in_order() {
        let (listener, mut rx) = ForwardingListener::unbounded();
        let mut data = 42u32;

        listener.on_connect(0, &mut data);
        listener.on_close(&mut data);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event, ChannelEvent::Connect { status: 0 });
        assert_eq!(first.data, 42);
        assert_eq!(rx.recv().await.unwrap().event, ChannelEvent::Close);
    }

    #[tokio::test]
    async fn test_bounded_drops_when_full() {
        let (listener, mut rx) = ForwardingListener::bounded(1);
        let mut data = ();

        listener.on_read(1, &mut data);
        listener.on_read(2, &mut data);

        assert_eq!(rx.recv().await.unwrap().event, ChannelEvent::Read { status: 1 });
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_try_recv_tells_empty_from_disconnected() {
        for (listener, mut rx) in [
            ForwardingListener::<u8>::unbounded(),
            ForwardingListener::<u8>::bounded(4),
        ] {
            assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

            listener.on_write(7, &mut 1u8);
            drop(listener);

            let buffered = rx.try_recv().unwrap();
            assert_eq!(buffered.event, ChannelEvent::Write { status: 7 });
            assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
        }
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (listener, rx) = ForwardingListener::unbounded();
        drop(rx);
        listener.on_write(0, &mut String::from("gone"));
    }
}
