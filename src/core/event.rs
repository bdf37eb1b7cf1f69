use serde::{Deserialize, Serialize};
use std::fmt;

use super::listener::{ChannelListener, Status};

/// Which of the four listener hooks a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callback {
    Connect,
    Read,
    Write,
    Close,
}

impl Callback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Callback::Connect => "on_connect",
            Callback::Read => "on_read",
            Callback::Write => "on_write",
            Callback::Close => "on_close",
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single listener call with its arguments, minus the attached data.
///
/// In YAML an event is written as `{ event: read, status: 1 }` or
/// `{ event: close }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelEvent {
    Connect { status: Status },
    Read { status: Status },
    Write { status: Status },
    Close,
}

impl ChannelEvent {
    pub fn callback(&self) -> Callback {
        match self {
            ChannelEvent::Connect { .. } => Callback::Connect,
            ChannelEvent::Read { .. } => Callback::Read,
            ChannelEvent::Write { .. } => Callback::Write,
            ChannelEvent::Close => Callback::Close,
        }
    }

    /// Status carried by the event; `None` for close.
    pub fn status(&self) -> Option<Status> {
        match *self {
            ChannelEvent::Connect { status }
            | ChannelEvent::Read { status }
            | ChannelEvent::Write { status } => Some(status),
            ChannelEvent::Close => None,
        }
    }

    /// Close ends the lifecycle of the attached data.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChannelEvent::Close)
    }

    /// Invoke the listener hook matching this event.
    pub fn dispatch<T, L>(self, listener: &L, data: &mut T)
    where
        T: ?Sized,
        L: ChannelListener<T> + ?Sized,
    {
        match self {
            ChannelEvent::Connect { status } => listener.on_connect(status, data),
            ChannelEvent::Read { status } => listener.on_read(status, data),
            ChannelEvent::Write { status } => listener.on_write(status, data),
            ChannelEvent::Close => listener.on_close(data),
        }
    }
}

impl fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => write!(f, "{}({})", self.callback(), status),
            None => write!(f, "{}", self.callback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recorder::RecordingListener;

    #[test]
    fn test_dispatch_hits_matching_hook() {
        let recorder = RecordingListener::new();
        let mut data = 7u8;

        ChannelEvent::Write { status: -1 }.dispatch(&recorder, &mut data);
        ChannelEvent::Close.dispatch(&recorder, &mut data);

        assert_eq!(
            recorder.events(),
            vec![ChannelEvent::Write { status: -1 }, ChannelEvent::Close]
        );
    }

    #[test]
    fn test_status_and_terminal() {
        assert_eq!(ChannelEvent::Read { status: 4 }.status(), Some(4));
        assert_eq!(ChannelEvent::Close.status(), None);
        assert!(ChannelEvent::Close.is_terminal());
        assert!(!ChannelEvent::Connect { status: 0 }.is_terminal());
    }

    #[test]
    fn test_yaml_event_forms() {
        let yaml = r#"
- { event: connect, status: 0 }
- { event: read, status: -104 }
- event: write
  status: 12
- { event: close }
"#;
        let events: Vec<ChannelEvent> = serde_yaml::from_str(yaml).expect("Failed to parse events");
        assert_eq!(
            events,
            vec![
                ChannelEvent::Connect { status: 0 },
                ChannelEvent::Read { status: -104 },
                ChannelEvent::Write { status: 12 },
                ChannelEvent::Close,
            ]
        );
    }

    #[test]
    fn test_status_is_required_for_read() {
        let result: Result<ChannelEvent, _> = serde_yaml::from_str("{ event: read }");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelEvent::Connect { status: 0 }.to_string(), "on_connect(0)");
        assert_eq!(ChannelEvent::Close.to_string(), "on_close");
        assert_eq!(Callback::Read.to_string(), "on_read");
    }
}
