// engine settings, read from an optional config file plus the environment

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ChronovecError, Result};

/// Knobs for the bulk materialization path.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Worker count for bulk materialization; the row range is split into
    /// this many contiguous pieces.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// When false, every materialization runs sequentially on the calling
    /// thread regardless of the worker count.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// When true, a vector drops its source reference once the buffer is in
    /// place, handing the raw cell storage back to its owner early.
    #[serde(default)]
    pub release_source_after_materialize: bool,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_parallel() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            parallel: default_parallel(),
            release_source_after_materialize: false,
        }
    }
}

impl EngineSettings {
    /// Load settings from `chronovec.*` in the working directory (if any)
    /// with `CHRONOVEC_*` environment variables taking precedence.
    pub fn load() -> Result<Self> {
        let raw = Config::builder()
            .add_source(File::with_name("chronovec").required(false))
            .add_source(Environment::with_prefix("CHRONOVEC").try_parsing(true))
            .build()?;
        let settings: EngineSettings = raw.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults with an explicit worker count.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Single-threaded settings for hosts that disallow nested parallelism.
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            parallel: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ChronovecError::Config(String::from(
                "workers must be at least 1",
            )));
        }
        Ok(())
    }
}
