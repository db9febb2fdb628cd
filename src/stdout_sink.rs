// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::sink::Sink;

/**
The default sink: one line per record on standard output.

Stateless; every instance writes to the same process stream.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StdoutSink;

impl StdoutSink {
    pub const fn new() -> Self {
        StdoutSink
    }
}

impl Sink for StdoutSink {
    fn write(&self, text: &str) {
        use std::io::Write;
        let mut lock = std::io::stdout().lock();
        // A closed or broken stdout must not take the caller down with it.
        let _ = lock
            .write_all(text.as_bytes())
            .and_then(|_| lock.write_all(b"\n"));
    }

    fn flush(&self) {
        use std::io::Write;
        let _ = std::io::stdout().lock().flush();
    }
}
