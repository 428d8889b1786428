//! Process wiring: builds the production adapters for a resolved action and
//! runs it to an exit status.
//!
//! `reset` runs synchronously with no runtime and no signal handlers. The
//! other modes get a current-thread tokio runtime, created only after the
//! command line has been resolved.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use anywhere_common::GatewayConfig;
use tracing::debug;

use crate::application::services::reset_service::reset_data;
use crate::domain::{Endpoint, HandlerError, ResolvedAction};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::docker::DockerContainerManager;
use crate::infra::fs::StdFs;
use crate::infra::store::SqliteStore;
use crate::logging;
use crate::output::OutputContext;
use crate::router::{ErrorPolicy, Exit, Handlers, run_until_settled};
use crate::shutdown::ShutdownCoordinator;
use crate::transport::{ConnectGateway, HttpTransport, StdioTransport};

/// Load the effective configuration.
///
/// On failure the error is printed unless `quiet` (connect mode), and
/// `None` is returned.
#[must_use]
pub fn load_config(quiet: bool) -> Option<GatewayConfig> {
    match YamlConfigStore::from_env().and_then(|store| store.load()) {
        Ok(config) => Some(config),
        Err(e) => {
            if !quiet {
                let output = OutputContext::for_stderr();
                let _ = output.error(&mut io::stderr(), format_args!("{e:#}"));
            }
            None
        }
    }
}

/// Run `action` to completion.
#[must_use]
pub fn run(action: ResolvedAction, config: &GatewayConfig) -> ExitCode {
    let output = OutputContext::for_stderr();
    let exit = match action {
        ResolvedAction::Reset { skip_confirm } => run_reset(config, skip_confirm, &output),
        action => run_async(&action, config, &output),
    };
    exit.into()
}

fn run_reset(config: &GatewayConfig, skip_confirm: bool, output: &OutputContext) -> Exit {
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    match reset_data(&StdFs, &config.data_dir, skip_confirm, &mut input, &mut out) {
        Ok(_) => Exit::Success,
        Err(e) => {
            let _ = output.error(&mut io::stderr(), format_args!("reset failed: {e}"));
            Exit::Failure
        }
    }
}

fn run_async(action: &ResolvedAction, config: &GatewayConfig, output: &OutputContext) -> Exit {
    let policy = ErrorPolicy::for_kind(action.kind());
    if policy == ErrorPolicy::Report {
        logging::init();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => return policy.fatal(&e, &mut io::stderr(), output),
    };

    let result = runtime.block_on(serve(action, config));
    // A blocking stdin read may still be parked on the runtime's pool.
    runtime.shutdown_background();

    match policy.settle(result, &mut io::stderr(), output) {
        Ok(exit) => exit,
        Err(fatal) => policy.fatal(&fatal, &mut io::stderr(), output),
    }
}

async fn serve(action: &ResolvedAction, config: &GatewayConfig) -> Result<(), HandlerError> {
    let store = Arc::new(SqliteStore::new(&config.database_path()));
    let containers = DockerContainerManager::new(TokioCommandRunner::default());
    let coordinator = Arc::new(ShutdownCoordinator::new(containers, Arc::clone(&store)));
    coordinator
        .install()
        .context("cannot install signal handlers")?;

    if action.endpoint().is_some() {
        std::fs::create_dir_all(config.logs_dir())
            .with_context(|| format!("cannot create {}", config.logs_dir().display()))?;
        store.open_and_init().context("cannot open database")?;
    }

    let intake = coordinator.intake();
    let handlers = Handlers {
        http: HttpTransport::new(Arc::clone(&store), intake.clone()),
        stdio: StdioTransport::new(Arc::clone(&store), intake.clone()),
        gateway: ConnectGateway::new(Endpoint::new(config.host.clone(), config.port), intake),
    };

    let result = run_until_settled(action, &handlers, coordinator.settled()).await;
    if let Some(outcome) = coordinator.join_cleanup().await {
        debug!(?outcome, "cleanup task joined");
    }
    result
}
