#![forbid(unsafe_code)]

//! Tracing output routed to the browser console.
//!
//! The shell installs a `tracing_subscriber` fmt subscriber whose writer is a
//! [`SinkWriter`]: every formatted record is buffered and handed to a
//! [`LineSink`] in one piece, tagged with the record's level so the console
//! method (`error`, `warn`, `info`, `debug`) matches.
//!
//! There is no wall clock worth printing in a page, so records carry no
//! timestamp.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Directive used when the configured level does not parse.
pub const DEFAULT_FILTER: &str = "info";

/// Destination for formatted log records.
pub trait LineSink {
    fn write_line(&self, level: Level, line: &str);
}

/// `MakeWriter` producing one [`LineWriter`] per record.
#[derive(Debug, Clone, Default)]
pub struct SinkWriter<S> {
    sink: S,
}

impl<S> SinkWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

/// Buffers one record and forwards it to the sink when dropped.
pub struct LineWriter<'a, S: LineSink> {
    sink: &'a S,
    level: Level,
    buf: Vec<u8>,
}

impl<S: LineSink> io::Write for LineWriter<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: LineSink> Drop for LineWriter<'_, S> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        self.sink.write_line(self.level, text.trim_end_matches('\n'));
    }
}

impl<'a, S: LineSink + 'a> MakeWriter<'a> for SinkWriter<S> {
    type Writer = LineWriter<'a, S>;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            sink: &self.sink,
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        LineWriter {
            sink: &self.sink,
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// Filter built from the configured directive, e.g. `"debug"` or
/// `"studydesk_core=trace,info"`.
#[must_use]
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserConsole, init};

#[cfg(target_arch = "wasm32")]
mod browser {
    use tracing::Level;
    use wasm_bindgen::JsValue;
    use web_sys::console;

    use super::{LineSink, SinkWriter, env_filter};

    /// `console.*` of the hosting page.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserConsole;

    impl LineSink for BrowserConsole {
        fn write_line(&self, level: Level, line: &str) {
            let line = JsValue::from_str(line);
            match level {
                Level::ERROR => console::error_1(&line),
                Level::WARN => console::warn_1(&line),
                Level::INFO => console::info_1(&line),
                _ => console::debug_1(&line),
            }
        }
    }

    /// Install the global subscriber. A second call leaves the first in place.
    pub fn init(directive: &str) {
        let result = tracing_subscriber::fmt()
            .with_writer(SinkWriter::new(BrowserConsole))
            .with_env_filter(env_filter(directive))
            .with_ansi(false)
            .without_time()
            .try_init();
        if let Err(err) = result {
            console::warn_1(&JsValue::from_str(&format!(
                "studydesk: logging already initialized: {err}"
            )));
        }
    }
}
