// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Destinations for diagnostic messages.
//!
//! A sink is write-only from the validator's point of view: messages are advisory and
//! never influence the boolean outcome.

/// Receives one diagnostic message at a time.
pub trait Sink {
    fn message(&mut self, line: &str);
}

impl<F> Sink for F
where
    F: FnMut(&str),
{
    fn message(&mut self, line: &str) {
        self(line)
    }
}

/// Collects messages in emission order.
impl Sink for Vec<String> {
    fn message(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Sink for Silent {
    fn message(&mut self, _line: &str) {}
}

/// Forwards messages to `tracing` as debug events on the `shapecheck::diagnostics` target.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl Sink for TracingSink {
    fn message(&mut self, line: &str) {
        tracing::debug!(target: "shapecheck::diagnostics", "{line}");
    }
}
