//! Command-line front end for environment-driven logger configuration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use envlog_compat::{DebugCompat, FormatArg};
use envlog_config::{resolve, LoggerConfig, RuleSet, Severity};
use envlog_logger::{init_logging, setup_logger, EnvSettings, Logger, SinkFactory};
use serde_json::{json, Map, Value};
use tracing::debug;

#[derive(Parser)]
#[command(name = "envlog")]
#[command(about = "Resolve per-logger levels from LOG_LEVEL and emit structured records")]
struct Cli {
    /// Filter for the tool's own diagnostics on stderr
    #[arg(long, global = true, default_value = "warn")]
    log_filter: String,

    /// Render diagnostics as JSON
    #[arg(long, global = true)]
    json_diagnostics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the level a logger would run at
    Resolve {
        /// Logger name
        name: String,

        /// Level requested by code
        #[arg(long)]
        level: Option<Severity>,

        /// Rule string, e.g. "api:info, worker:trace, *:fatal"
        #[arg(long, env = "LOG_LEVEL")]
        rules: Option<String>,
    },
    /// Validate a rule string and list its rules in match order
    Check {
        /// Rule string
        rules: String,
    },
    /// Emit one compat record as a JSON line on stdout
    Emit {
        /// Logger name
        name: String,

        /// Subsystem name recorded with the message
        #[arg(long)]
        subsystem: Option<String>,

        /// Level requested by code
        #[arg(long)]
        level: Option<Severity>,

        /// Format string and values; values that parse as JSON are passed as JSON
        args: Vec<String>,
    },
    /// Walk through compat, leveled and structured logging on stdout
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(Some(&cli.log_filter), cli.json_diagnostics)?;

    match cli.command {
        Commands::Resolve { name, level, rules } => {
            let mut config = LoggerConfig::new(name);
            config.level = level;
            let resolved = resolve(rules.as_deref(), &config)?;
            println!("{resolved}");
        }
        Commands::Check { rules } => {
            let parsed = RuleSet::parse(&rules)?;
            for rule in parsed.rules() {
                println!("{}\t{}", rule.pattern(), rule.level());
            }
        }
        Commands::Emit {
            name,
            subsystem,
            level,
            args,
        } => {
            let mut config = LoggerConfig::new(name);
            config.level = level;
            let log = build_logger(config)?;
            let args: Vec<FormatArg> = args.iter().map(|arg| parse_arg(arg)).collect();
            debug!(count = args.len(), "emitting compat record");

            let emitter = match subsystem {
                Some(subsystem) => log.debug_compat(subsystem),
                None => envlog_compat::CompatAdapter::new(log).flat(),
            };
            emitter.emit(&args)?;
        }
        Commands::Demo => run_demo()?,
    }

    Ok(())
}

fn build_logger(config: LoggerConfig) -> anyhow::Result<Logger> {
    let env = EnvSettings::default().capture();
    let name = config.name().to_string();
    setup_logger(&SinkFactory::stdout(), config, &env)
        .with_context(|| format!("Failed to set up logger '{name}'"))
}

fn parse_arg(arg: &str) -> FormatArg {
    match serde_json::from_str::<Value>(arg) {
        Ok(value) => value.into(),
        Err(_) => arg.into(),
    }
}

fn run_demo() -> anyhow::Result<()> {
    let log = build_logger(LoggerConfig::new("my-example"))?;

    // Legacy debug-style calls keep working and come out structured.
    let debug = log.debug_compat("my-example:main");
    envlog_compat::compat!(
        debug,
        "this is a %s of json: %j formatting",
        "test",
        json!({"a": 1})
    )?;
    envlog_compat::compat!(debug, "[alert-operator] really important")?;

    log.trace(Value::Null, "trace")?;
    log.debug(Value::Null, "debug")?;
    log.info(Value::Null, "info")?;
    log.warn(Value::Null, "warn")?;
    log.error(Value::Null, "error")?;
    log.fatal(Value::Null, "fatal")?;

    log.warn(
        json!({"http_status": 404, "http_msg": "resource-not-found"}),
        "failed api call",
    )?;

    let child = log.child(fields(json!({"api_method": "/v1/ping"})));
    child.info(Value::Null, "hi")?;

    for region in ["us-west-1", "us-east-1"] {
        let region_log = log.child(fields(json!({ "region": region })));
        for instance_type in ["r3-xlarge", "r3-large"] {
            let type_log = region_log.child(fields(json!({ "type": instance_type })));
            type_log.info(Value::Null, "Killed all instances")?;
        }
    }

    Ok(())
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
