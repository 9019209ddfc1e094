//! Trace output for the panel binary and the integration tests
//!
//! Traces are bunyan formatted json. `RUST_LOG` overrides the default filter.

use anyhow::Context;
use std::{
    fs::{create_dir_all, File},
    path::{Path, PathBuf},
};
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

pub const TRACE_FOLDER: &str = "traces";

/// Added to the default filter only. Each backend call otherwise produces
/// connection level events from the http client's dependencies
const QUIET_DEPENDENCIES: &[&str] = &["h2=warn", "hyper_util=warn", "rustls=warn"];

fn default_filter(directive: &str) -> EnvFilter {
    QUIET_DEPENDENCIES
        .iter()
        .fold(EnvFilter::new(directive), |filter, quiet| {
            match quiet.parse() {
                Ok(quiet) => filter.add_directive(quiet),
                Err(_) => filter,
            }
        })
}

/// Builds the subscriber without installing it (see [`init_subscriber`])
///
/// Directive syntax: <https://docs.rs/tracing-subscriber/0.3.19/tracing_subscriber/filter/struct.EnvFilter.html#directives>
pub fn get_subscriber<Sink>(
    name: impl Into<String>,
    default_directive: &str,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(default_directive));
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.into(), sink))
}

/// Installs `subscriber` as the global default and routes `log` records to it
///
/// Fails if called more than once per process
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> anyhow::Result<()> {
    LogTracer::init().context("failed to set logger")?;
    set_global_default(subscriber).context("failed to set subscriber")?;
    Ok(())
}

/// A newly created file to write traces to
#[derive(Debug)]
pub struct TraceFile {
    pub file: File,
    pub path: PathBuf,
}

impl TraceFile {
    /// Creates `<folder>/<timestamp>_<app_name>.log`, creating `folder` if needed
    pub fn create(folder: impl AsRef<Path>, app_name: &str) -> anyhow::Result<Self> {
        let folder = folder.as_ref();
        create_dir_all(folder)
            .with_context(|| format!("failed to create trace folder: {folder:?}"))?;
        let path = folder.join(trace_file_name(app_name, chrono::Local::now()));
        let file = File::create(&path)
            .with_context(|| format!("failed to create trace file: {path:?}"))?;
        Ok(Self { file, path })
    }
}

fn trace_file_name<Tz>(app_name: &str, now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{app_name}.log", now.format("%Y-%m-%dT%H-%M-%S"))
}
