use biometrics::{Collector, Counter, Moments, Sensor};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("ai_cli.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("ai_cli.client.request_errors");
pub(crate) static CLIENT_API_ERRORS: Counter = Counter::new("ai_cli.client.api_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("ai_cli.client.request_duration_seconds");

pub(crate) static STREAM_BYTES: Counter = Counter::new("ai_cli.stream.bytes");
pub(crate) static STREAM_LINES: Counter = Counter::new("ai_cli.stream.lines");
pub(crate) static STREAM_FRAGMENTS: Counter = Counter::new("ai_cli.stream.fragments");
pub(crate) static STREAM_DISCARDED_LINES: Counter = Counter::new("ai_cli.stream.discarded_lines");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("ai_cli.stream.errors");
pub(crate) static STREAM_TTFB: Moments = Moments::new("ai_cli.stream.ttfb_seconds");
pub(crate) static STREAM_DURATION: Moments = Moments::new("ai_cli.stream.duration_seconds");

pub(crate) static CONFIG_SAVES: Counter = Counter::new("ai_cli.config.saves");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_API_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_BYTES);
    collector.register_counter(&STREAM_LINES);
    collector.register_counter(&STREAM_FRAGMENTS);
    collector.register_counter(&STREAM_DISCARDED_LINES);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_moments(&STREAM_TTFB);
    collector.register_moments(&STREAM_DURATION);

    collector.register_counter(&CONFIG_SAVES);
}

/// Totals for the stream counters since process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamTotals {
    /// Bytes read from response bodies.
    pub bytes: u64,
    /// Complete lines decoded.
    pub lines: u64,
    /// Fragments handed to the caller.
    pub fragments: u64,
    /// `data:` lines whose payload could not be parsed.
    pub discarded_lines: u64,
}

/// Reads the stream counters.
pub fn stream_totals() -> StreamTotals {
    StreamTotals {
        bytes: STREAM_BYTES.read(),
        lines: STREAM_LINES.read(),
        fragments: STREAM_FRAGMENTS.read(),
        discarded_lines: STREAM_DISCARDED_LINES.read(),
    }
}
