use crate::config::{ChannelScript, Config};
use crate::core::event::ChannelEvent;
use crate::core::metrics::MetricsSnapshot;
use crate::core::recorder::RecordingListener;
use crate::core::stack::ListenerStack;
use std::sync::Arc;
use tracing::{debug, info};

/// Attached data handed to listeners for a replayed channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelContext {
    pub channel: String,
}

/// Outcome of replaying one channel script
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub channel: String,
    pub listener: String,
    pub events: Vec<ChannelEvent>,
    pub closed: bool,
    pub metrics: Option<MetricsSnapshot>,
    pub panics: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    pub channels: Vec<ChannelReport>,
}

impl ReplayReport {
    pub fn channel(&self, name: &str) -> Option<&ChannelReport> {
        self.channels.iter().find(|report| report.channel == name)
    }
}

/// Drives every scripted channel in a [`Config`] through its listener stack.
pub struct Replayer {
    config: Config,
}

impl Replayer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Replay all channels, in name order
    pub fn run(&self) -> Result<ReplayReport, ReplayError> {
        let mut channels: Vec<(&String, &ChannelScript)> = self.config.channels.iter().collect();
        channels.sort_by(|a, b| a.0.cmp(b.0));

        info!("Replaying {} channel(s)", channels.len());

        let mut report = ReplayReport::default();
        for (name, script) in channels {
            report.channels.push(self.replay_channel(name, script)?);
        }
        Ok(report)
    }

    fn replay_channel(&self, name: &str, script: &ChannelScript) -> Result<ChannelReport, ReplayError> {
        let listener_config = self.config.listeners.get(&script.listener).ok_or_else(|| {
            ReplayError::UnknownListener {
                channel: name.to_string(),
                listener: script.listener.clone(),
            }
        })?;

        let recorder = Arc::new(RecordingListener::<ChannelContext>::new());
        let stack = ListenerStack::build(&script.listener, listener_config, Arc::clone(&recorder));

        let mut context = ChannelContext {
            channel: name.to_string(),
        };
        for event in &script.events {
            debug!("channel '{}': {}", name, event);
            event.dispatch(&stack, &mut context);
        }

        let report = ChannelReport {
            channel: name.to_string(),
            listener: script.listener.clone(),
            events: recorder.events(),
            closed: recorder.is_closed(),
            metrics: stack.metrics().map(|metrics| metrics.snapshot()),
            panics: stack.panic_log().map_or(0, |log| log.count()),
        };

        info!(
            "Channel '{}' via '{}': {} callback(s) delivered, closed: {}",
            report.channel,
            report.listener,
            report.events.len(),
            report.closed
        );

        Ok(report)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Channel '{channel}' references unknown listener '{listener}'")]
    UnknownListener { channel: String, listener: String },
}
