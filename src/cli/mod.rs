use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    agent::{
        event::{ActivityEvent, ActivityKind},
        heartbeat::Heartbeat,
        start_agent,
    },
    config::AgentConfig,
    transport::{http::HttpTransport, Transport},
    utils::{
        clock::{Clock, DefaultClock},
        logging::{enable_logging, AGENT_PREFIX, SEND_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Codepulse", version, long_about = None)]
#[command(about = "Agent for reporting coding activity to a time-tracking service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    #[arg(long = "log-filter", help = "Log level override")]
    log: Option<LevelFilter>,
    #[arg(long = "log-console", help = "This option is for debugging purposes only.")]
    log_console: bool,
}

#[derive(clap::Args, Debug)]
struct ConnectionArgs {
    #[arg(
        long,
        help = "Api key for the tracking service. Falls back to CODEPULSE_API_KEY"
    )]
    api_key: Option<String>,
    #[arg(
        long,
        help = "Heartbeat endpoint override. Falls back to CODEPULSE_API_URL"
    )]
    api_url: Option<String>,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Run the agent, reading activity events from stdin as JSON lines")]
    Serve {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    #[command(about = "Send a single heartbeat and exit. Used by editors that shell out per action")]
    Send {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[arg(long, help = "Path of the edited file")]
        entity: String,
        #[arg(long, help = "Name of the enclosing workspace")]
        project: Option<String>,
        #[arg(long, help = "Language of the file")]
        language: Option<String>,
        #[arg(long, help = "Mark the heartbeat as an explicit save")]
        write: bool,
        #[arg(long, default_value_t = 0, help = "Current line count of the file")]
        lines: u32,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Serve { connection } => {
            let config = resolve(connection)?;
            enable_logging(AGENT_PREFIX, &config.dir.join("logs"), args.log, args.log_console)?;
            start_agent(config).await
        }
        Commands::Send {
            connection,
            entity,
            project,
            language,
            write,
            lines,
        } => {
            let config = resolve(connection)?;
            enable_logging(SEND_PREFIX, &config.dir.join("logs"), args.log, true)?;
            send_once(config, entity, project, language, write, lines).await
        }
    }
}

fn resolve(connection: ConnectionArgs) -> Result<AgentConfig> {
    AgentConfig::resolve(connection.api_key, connection.api_url, connection.dir)
}

/// One-shot delivery path. Unlike the agent loop there is no gate to
/// consult and the outcome is awaited so the exit code reflects it.
async fn send_once(
    config: AgentConfig,
    entity: String,
    project: Option<String>,
    language: Option<String>,
    write: bool,
    lines: u32,
) -> Result<()> {
    let Some(api_key) = config.api_key else {
        bail!("An api key is required to send a heartbeat");
    };

    let event = ActivityEvent {
        path: entity.into(),
        project: project.map(Into::into),
        language: language.map(Into::into),
        kind: if write { ActivityKind::Save } else { ActivityKind::Focus },
        lines,
        timestamp: DefaultClock.time(),
    };

    let transport = HttpTransport::new(config.api_url, api_key);
    transport.send(Heartbeat::from(&event)).await
}
