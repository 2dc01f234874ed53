//! Rebound CLI - reboot / soft-reset recovery verification
//! Composition root: wires the ssh channel, ping probe and JSON store into the core

mod logging;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use rebound_core::application::{
    Campaign, CampaignPlan, DeviceTarget, ReachabilityPoller, RecoveryVerifier, ResultRecorder,
    VerifierConfig,
};
use rebound_core::domain::{Credential, Scenario};
use rebound_core::port::time_provider::SystemTimeProvider;
use rebound_core::port::{EventSink, TracingEventSink};
use rebound_infra_json::JsonFileStore;
use rebound_infra_system::{PingProbe, SshCommandChannel};

const DEFAULT_RESULTS_PATH: &str = "iteration_results.json";

#[derive(Parser)]
#[command(name = "rebound")]
#[command(about = "Verify device recovery after reboot or network reset", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cumulative JSON result file
    #[arg(long, global = true, env = "REBOUND_RESULTS", default_value = DEFAULT_RESULTS_PATH)]
    results: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Reboot the device, wait for a full boot, then check reachability and device logs
    Reboot(RunArgs),

    /// Reload the network stack, then poll for reachability
    SoftReset(RunArgs),

    /// Show stored iteration results and a pass/partial/fail summary
    Report,

    /// Probe one address once
    Check {
        /// Address to probe
        address: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Address of the device being disrupted
    #[arg(long, env = "REBOUND_LOCAL_ADDRESS")]
    local_ip: String,

    /// Address reachable only through the device
    #[arg(long, env = "REBOUND_REMOTE_ADDRESS")]
    remote_ip: String,

    /// Number of iterations to run
    #[arg(short = 'n', long, default_value = "1")]
    iterations: u32,

    /// Number given to the first iteration
    #[arg(long, default_value = "1")]
    start_iteration: i64,

    /// Pause between iterations (seconds)
    #[arg(long, default_value = "0")]
    cooldown_secs: u64,

    /// User that issues the disruptive command
    #[arg(long, env = "REBOUND_TRIGGER_USER", default_value = "root")]
    trigger_user: String,

    /// Password for the trigger user (key-based auth if unset)
    #[arg(long, env = "REBOUND_TRIGGER_PASSWORD", hide_env_values = true)]
    trigger_password: Option<String>,

    /// Administrative user that reads device logs (required for reboot)
    #[arg(long, env = "REBOUND_ADMIN_USER")]
    admin_user: Option<String>,

    /// Password for the administrative user (key-based auth if unset)
    #[arg(long, env = "REBOUND_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,

    /// SSH port on the device
    #[arg(long, default_value = "22")]
    ssh_port: u16,

    /// Override: pause after the disruptive command (seconds)
    #[arg(long)]
    settle_secs: Option<u64>,

    /// Override: fixed wait for a full boot after reboot (seconds)
    #[arg(long)]
    boot_delay_secs: Option<u64>,

    /// Override: soft-reset polling window (seconds)
    #[arg(long)]
    poll_timeout_secs: Option<u64>,

    /// Override: soft-reset polling interval (seconds)
    #[arg(long)]
    poll_interval_secs: Option<u64>,
}

impl RunArgs {
    fn config(&self) -> Result<VerifierConfig> {
        let defaults = VerifierConfig::default();
        let secs = |value: Option<u64>, default: Duration| value.map(Duration::from_secs).unwrap_or(default);

        let config = VerifierConfig {
            settle_delay: secs(self.settle_secs, defaults.settle_delay),
            boot_delay: secs(self.boot_delay_secs, defaults.boot_delay),
            reset_poll_timeout: secs(self.poll_timeout_secs, defaults.reset_poll_timeout),
            reset_poll_interval: secs(self.poll_interval_secs, defaults.reset_poll_interval),
            ..defaults
        };
        config.validate().context("Invalid verifier configuration")?;
        Ok(config)
    }

    fn target(&self, scenario: Scenario) -> Result<DeviceTarget> {
        let admin_credential = self.admin_user.as_ref().map(|user| Credential {
            username: user.clone(),
            password: self.admin_password.clone(),
        });

        if scenario.inspects_logs() && admin_credential.is_none() {
            bail!("--admin-user (or REBOUND_ADMIN_USER) is required to read device logs after reboot");
        }

        Ok(DeviceTarget {
            local_address: self.local_ip.clone(),
            remote_address: self.remote_ip.clone(),
            trigger_credential: Credential {
                username: self.trigger_user.clone(),
                password: self.trigger_password.clone(),
            },
            admin_credential,
        })
    }
}

fn results_path(raw: &str) -> String {
    shellexpand::tilde(raw).into_owned()
}

fn recorder(results: &str, events: Arc<dyn EventSink>) -> Arc<ResultRecorder> {
    Arc::new(ResultRecorder::new(
        Arc::new(JsonFileStore::new(results_path(results))),
        events,
    ))
}

async fn run_campaign(scenario: Scenario, args: RunArgs, results: &str) -> Result<()> {
    let config = args.config()?;
    let target = args.target(scenario)?;
    let events: Arc<dyn EventSink> = Arc::new(TracingEventSink);

    // DI wiring
    let verifier = Arc::new(RecoveryVerifier::new(
        Arc::new(SshCommandChannel::new(args.ssh_port)),
        Arc::new(PingProbe::default()),
        recorder(results, events.clone()),
        Arc::new(SystemTimeProvider),
        events,
        config,
    ));

    let plan = CampaignPlan::new(scenario, args.start_iteration, args.iterations)
        .with_cooldown(Duration::from_secs(args.cooldown_secs));

    println!(
        "{} {} x{} on {} (remote {})",
        "Running".cyan().bold(),
        scenario,
        args.iterations,
        target.local_address,
        target.remote_address
    );

    let records = Campaign::new(verifier)
        .run(&target, &plan)
        .await
        .context("Iteration result could not be saved")?;

    println!();
    for record in &records {
        report::print_iteration(record);
    }
    println!();
    println!("{} {}", "Results appended to".green().bold(), results_path(results));

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;
    let cli = Cli::parse();

    info!("Rebound v{} starting", rebound_core::VERSION);

    match cli.command {
        Commands::Reboot(args) => run_campaign(Scenario::Reboot, args, &cli.results).await?,

        Commands::SoftReset(args) => run_campaign(Scenario::SoftReset, args, &cli.results).await?,

        Commands::Report => {
            let recorder = recorder(&cli.results, Arc::new(TracingEventSink));
            let records = recorder
                .load_records()
                .await
                .context("Failed to read result store")?;
            report::print_report(&recorder.location(), &records);
        }

        Commands::Check { address } => {
            let poller = ReachabilityPoller::new(
                Arc::new(PingProbe::default()),
                Arc::new(TracingEventSink),
            );
            if poller.check_once(&address).await {
                println!("{} {} is reachable", "✓".green(), address);
            } else {
                println!("{} {} is not reachable", "✗".red(), address);
            }
        }
    }

    Ok(())
}
