//!
//! Installs the global tracing subscriber.
//!

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::{Log, LogConsole, LogFormat};

/// Keeps the non-blocking writer flushing until dropped.
#[derive(Debug)]
pub struct LogGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// `RUST_LOG`, when set, wins over the configured directive.
pub fn setup<'a>(conf: &Log, crates_to_watch: impl IntoIterator<Item = &'a str>) -> LogGuard {
    let mut guards = Vec::new();
    let subscriber = tracing_subscriber::registry();

    if !conf.console.enabled {
        subscriber.init();
        return LogGuard {
            _log_guards: guards,
        };
    }

    let (console_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    guards.push(guard);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filtering_directive(&conf.console, crates_to_watch)));

    match conf.console.log_format {
        LogFormat::Default => {
            let logging_layer = fmt::layer()
                .with_timer(fmt::time::time())
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty()
                .with_writer(console_writer);
            subscriber.with(logging_layer.with_filter(filter)).init();
        }
        LogFormat::Json => {
            let logging_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(console_writer);
            subscriber.with(logging_layer.with_filter(filter)).init();
        }
    }

    LogGuard {
        _log_guards: guards,
    }
}

fn filtering_directive<'a>(
    console: &LogConsole,
    crates_to_watch: impl IntoIterator<Item = &'a str>,
) -> String {
    if let Some(directive) = &console.filtering_directive {
        return directive.clone();
    }
    let level = console.level.into_level();
    std::iter::once("warn".to_string())
        .chain(
            crates_to_watch
                .into_iter()
                .map(|name| format!("{}={level}", name.replace('-', "_"))),
        )
        .collect::<Vec<_>>()
        .join(",")
}
