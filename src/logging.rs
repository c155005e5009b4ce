use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Build the subscriber used by [`init`]. Without `debug` the level is fixed
/// at `info`; with it the default is `debug` and `RUST_LOG` may override it.
/// When `log_file` is given, output goes to that file instead of stderr.
pub fn subscriber(debug: bool, log_file: Option<PathBuf>) -> Box<dyn Subscriber + Send + Sync> {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "canvas_gallery.log".into());
            match RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&dir)
            {
                Ok(appender) => Box::new(builder.with_ansi(false).with_writer(appender).finish()),
                Err(e) => {
                    eprintln!("cannot open log file {}, logging to stderr: {e}", path.display());
                    Box::new(builder.finish())
                }
            }
        }
        None => Box::new(builder.finish()),
    }
}

/// Install the process-wide subscriber. A second call is ignored.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    if tracing::subscriber::set_global_default(subscriber(debug, log_file)).is_err() {
        tracing::debug!("logging already initialised");
    }
}
