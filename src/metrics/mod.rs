use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for command handling
// ============================================================================
//
// - Commands handled, by command and outcome (applied / noop / rejected)
// - Events appended, by event type
// - Concurrency retries, by command
// - Command handling latency
//
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub commands_handled: IntCounterVec,
    pub events_appended: IntCounterVec,
    pub concurrency_retries: IntCounterVec,
    pub command_duration: HistogramVec,
}

/// How a handled command ended, as seen by alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcomeLabel {
    /// At least one event was appended
    Applied,
    /// Valid command, nothing to record
    Noop,
    /// Domain or store error returned to the caller
    Rejected,
}

impl CommandOutcomeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandOutcomeLabel::Applied => "applied",
            CommandOutcomeLabel::Noop => "noop",
            CommandOutcomeLabel::Rejected => "rejected",
        }
    }
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let commands_handled = IntCounterVec::new(
            Opts::new("customer_commands_handled_total", "Total customer commands handled"),
            &["command", "outcome"],
        )?;
        registry.register(Box::new(commands_handled.clone()))?;

        let events_appended = IntCounterVec::new(
            Opts::new("customer_events_appended_total", "Total customer events appended"),
            &["event_type"],
        )?;
        registry.register(Box::new(events_appended.clone()))?;

        let concurrency_retries = IntCounterVec::new(
            Opts::new(
                "customer_concurrency_retries_total",
                "Commands recomputed after a concurrency conflict",
            ),
            &["command"],
        )?;
        registry.register(Box::new(concurrency_retries.clone()))?;

        let command_duration = HistogramVec::new(
            HistogramOpts::new("customer_command_duration_seconds", "Command handling duration")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["command"],
        )?;
        registry.register(Box::new(command_duration.clone()))?;

        Ok(Self {
            registry,
            commands_handled,
            events_appended,
            concurrency_retries,
            command_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_command(&self, command: &str, outcome: CommandOutcomeLabel, duration_secs: f64) {
        self.commands_handled.with_label_values(&[command, outcome.as_str()]).inc();
        self.command_duration.with_label_values(&[command]).observe(duration_secs);
    }

    pub fn record_event_appended(&self, event_type: &str) {
        self.events_appended.with_label_values(&[event_type]).inc();
    }

    pub fn record_concurrency_retry(&self, command: &str) {
        self.concurrency_retries.with_label_values(&[command]).inc();
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
