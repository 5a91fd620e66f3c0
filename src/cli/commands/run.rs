//! # Run Command Module / 运行命令模块
//!
//! Default action of the CLI: load the fixture directory's configuration,
//! build the run state from flags and config, and hand over to the runner.
//!
//! CLI 的默认操作：加载夹具目录的配置，根据标志和配置构建运行状态，然后交给运行器。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf, time::Duration};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config,
        execution::Runner,
        models::RunState,
    },
    infra::t,
};

/// Everything the run command takes from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub fixture_dir: PathBuf,
    pub skip_setup: bool,
    pub fail_fast: bool,
    pub verbose: bool,
    pub unit: Option<String>,
    pub timeout_secs: Option<u64>,
    /// `--lang` was given, so the config's `language` must not override it.
    pub lang_from_cli: bool,
}

/// Executes the run command.
///
/// # Returns
/// The process exit code: 0 when everything passed, 1 otherwise
pub async fn execute(options: RunOptions) -> Result<u8> {
    let fixture_root = fs::canonicalize(&options.fixture_dir).with_context(|| {
        t!("fixture_dir_not_found", path = options.fixture_dir.display()).to_string()
    })?;

    let config = config::load_config(&fixture_root)?;
    if !options.lang_from_cli {
        if let Some(language) = &config.language {
            crate::init_locale(Some(language));
        }
    }

    println!(
        "{}",
        t!("fixture_dir_detected", path = fixture_root.display())
    );

    let state = RunState {
        failed: false,
        fail_fast: options.fail_fast || config.fail_fast,
        verbose: options.verbose,
        unit_filter: options.unit,
        skip_setup: options.skip_setup,
    };

    if state.skip_setup {
        println!("{}", t!("run.no_setup_warning").yellow());
    }
    if state.fail_fast {
        println!("{}", t!("run.fail_fast_enabled").cyan());
    }

    let stop_token = setup_signal_handler();

    let summary = Runner::new(fixture_root, config, state)
        .with_timeout(options.timeout_secs.map(Duration::from_secs))
        .with_cancellation(stop_token)
        .run_all()
        .await;

    Ok(summary.exit_code())
}

/// Sets up a signal handler for graceful shutdown. The running unit is
/// cancelled, its workspace torn down, and no further units start.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}
