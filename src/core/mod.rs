pub mod contain;
pub mod event;
pub mod fn_listener;
pub mod forward;
pub mod listener;
pub mod metrics;
pub mod recorder;
pub mod stack;
pub mod traced;

// Re-export core traits
pub use contain::{CallbackPanic, Contained, PanicLog};
pub use event::{Callback, ChannelEvent};
pub use fn_listener::FnListener;
pub use forward::{ForwardReceiver, ForwardedEvent, ForwardingListener};
pub use listener::{ChannelListener, NoopListener, Status};
pub use metrics::{ListenerMetrics, MeteredListener, MetricsSnapshot};
pub use recorder::{RecordedCall, RecordingListener};
pub use stack::ListenerStack;
pub use traced::TracedListener;
