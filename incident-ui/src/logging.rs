//! Routes `tracing` output to the browser console.

use std::io;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};
use wasm_bindgen::JsValue;

/// Writes a line straight to `console.error`, for when no subscriber is
/// installed.
pub fn console_error(line: &str) {
    web_sys::console::error_1(&JsValue::from_str(line));
}

/// Buffers one formatted event and hands it to `console.log` on drop.
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
    }
}

struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

/// Filter directives come from `INCIDENT_UI_LOG` at build time.
pub fn init() -> Result<(), TryInitError> {
    let env_filter = option_env!("INCIDENT_UI_LOG")
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("incident_core=info,incident_ui=info"));

    // wasm has no wall clock for the default timer
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Console)
                .with_ansi(false)
                .without_time()
                .with_target(true)
                .compact(),
        )
        .try_init()
}
