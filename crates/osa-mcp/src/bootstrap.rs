//! Server bootstrap orchestration.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use osa_catalog::Registry;
use osa_config::Config;
use osa_runner::{CommandExecutor, OsascriptExecutor};

use crate::dispatch::Dispatcher;
use crate::health::HealthReporter;
use crate::logger::SessionLogger;
use crate::protocol::{ProtocolError, ProtocolHandler, Session};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{self, OutputSink};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the server configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when configuration cannot be assembled.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a fixed configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Creates a loader returning `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Server {
    config: Config,
    registry: Arc<Registry>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Server {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Frozen tool registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Executor described by the configuration.
    #[must_use]
    pub fn executor(&self) -> OsascriptExecutor {
        OsascriptExecutor::new(self.config.interpreter(), self.config.script_flag())
            .with_timeout(self.config.script_timeout())
    }

    /// Serves the protocol on stdin and stdout with the configured executor.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] when stdin cannot be read or a response
    /// cannot be written.
    pub fn run(&self) -> Result<(), ProtocolError> {
        self.serve(io::stdin().lock(), io::stdout(), Arc::new(self.executor()))
    }

    /// Serves the protocol over arbitrary streams until `input` ends.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] when reading or writing fails.
    pub fn serve<R, W>(
        &self,
        input: R,
        output: W,
        executor: Arc<dyn CommandExecutor>,
    ) -> Result<(), ProtocolError>
    where
        R: BufRead,
        W: Write + Send + 'static,
    {
        let sink = OutputSink::new(output);
        let session = Arc::new(Session::new());
        let logger = Arc::new(SessionLogger::new(
            Arc::clone(&session),
            sink.clone(),
            self.config.server_name(),
        ));
        let dispatcher = Dispatcher::new(Arc::clone(&self.registry), executor, logger);
        let handler = Arc::new(ProtocolHandler::new(
            self.config.server_name(),
            dispatcher,
            session,
        ));

        let outcome = transport::serve(input, &sink, &handler);
        self.reporter.server_stopped();
        outcome
    }
}

/// Bootstraps the server using the supplied collaborators.
///
/// Loads configuration, installs telemetry and freezes the tool catalog.
///
/// # Errors
///
/// Returns a [`BootstrapError`] when configuration or telemetry fails. The
/// reporter sees the failure first.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Server, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let builder = osa_scripts::catalog();
    for category in builder.categories() {
        reporter.category_registered(category.name(), category.operations().len());
    }
    let registry = Arc::new(builder.build());
    reporter.bootstrap_succeeded(&config);

    Ok(Server {
        config,
        registry,
        telemetry,
        reporter,
    })
}
