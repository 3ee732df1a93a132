//! Stylesheet capture sink
//!
//! A diagnostic hook that records every stylesheet source text handed to
//! the stylesheet entry point. The default sink discards everything; a
//! file sink can be installed once per process to append each sheet to a
//! `.csslog` file named after its source URL. Capture failures are never
//! surfaced to the parse caller.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use url::Url;

/// Receives stylesheet text as it enters the parser
pub trait CssLogSink: Send + Sync {
    fn record(&self, css: &str, source_description: &str, location: Option<&Url>);
}

/// Discards everything; the default sink
pub struct NoopSink;

impl CssLogSink for NoopSink {
    fn record(&self, _css: &str, _source_description: &str, _location: Option<&Url>) {}
}

/// Appends each recorded sheet to a file in the given directory. Sheets
/// from the same source accumulate in one file rather than overwriting.
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    fn filename(location: Option<&Url>) -> String {
        match location {
            Some(url) => format!("{}.csslog", sanitize_filename(url.as_str())),
            None => "inline.csslog".to_string(),
        }
    }
}

impl CssLogSink for FileSink {
    fn record(&self, css: &str, source_description: &str, location: Option<&Url>) {
        let path = self.directory.join(Self::filename(location));
        let file = OpenOptions::new().create(true).append(true).open(&path);
        match file {
            Ok(mut file) => {
                let header = format!(
                    "/* CSS from: {} */\n/* ==================== */\n\n",
                    source_description
                );
                let result = file
                    .write_all(header.as_bytes())
                    .and_then(|_| file.write_all(css.as_bytes()))
                    .and_then(|_| file.write_all(b"\n\n"));
                match result {
                    Ok(()) => log::debug!(
                        "CSS logged to {} (source: {})",
                        path.display(),
                        source_description
                    ),
                    Err(err) => log::debug!("CSS log write failed: {}", err),
                }
            }
            Err(err) => log::debug!("CSS log open failed: {}", err),
        }
    }
}

/// Replace characters that can't be used in filenames
fn sanitize_filename(url_string: &str) -> String {
    url_string
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

static SINK: OnceLock<Box<dyn CssLogSink>> = OnceLock::new();
static NOOP: NoopSink = NoopSink;

/// Install the process-wide sink. The first call wins; later calls return
/// false and leave the installed sink in place.
pub fn set_css_log_sink(sink: Box<dyn CssLogSink>) -> bool {
    SINK.set(sink).is_ok()
}

pub(crate) fn sink() -> &'static dyn CssLogSink {
    match SINK.get() {
        Some(sink) => sink.as_ref(),
        None => &NOOP,
    }
}
