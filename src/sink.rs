use serde::Serialize;

/// One named data point forwarded to the display layer per cycle. Numeric
/// records carry `"<rate>;0"`: an instantaneous rate paired with a zero the
/// sink reads as "no total override". Text records carry the label directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub name: &'static str,
    pub value: String,
}

impl OutputRecord {
    pub fn rate(name: &'static str, watts: f64) -> Self {
        Self {
            name,
            value: format!("{watts};0"),
        }
    }

    pub fn text(name: &'static str, label: impl Into<String>) -> Self {
        Self {
            name,
            value: label.into(),
        }
    }
}

/// Where a cycle's output records go. The host hands an implementation to
/// the engine; what happens downstream of `publish` is not the engine's
/// business.
pub trait DisplaySink {
    fn publish(&mut self, records: &[OutputRecord]);
}

/// Sink for running standalone: logs every record.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DisplaySink for TracingSink {
    fn publish(&mut self, records: &[OutputRecord]) {
        for record in records {
            tracing::info!("{} = {}", record.name, record.value);
        }
    }
}
