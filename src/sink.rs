// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Debug;

/// Destination for finished, already formatted records.
pub trait Sink: Debug + Send + Sync {
    /**
        Receives one formatted record.

        Called synchronously from the logging call. Implementations must not panic;
        a sink that cannot deliver should drop the text.
    */
    fn write(&self, text: &str);

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn flush(&self) {}
}

/*
Boilerplate notes.

# Sink

Clone is left to implementations; loggers share sinks through Arc.
PartialEq/Eq/Hash: unclear whether we'd mean the destination or the buffered contents.  Not implemented.
Default is not sensible at the trait level; StdoutSink is the default a Logger picks.
Send/Sync are required since one sink serves every logger derived from a config, on any thread.
*/
