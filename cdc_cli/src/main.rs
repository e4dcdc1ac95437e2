mod fixture;
mod log_sink;

use std::path::PathBuf;

use clap::Parser;
use common::err::CResult;
use common::log::tracing_factory::{OutputType, TracingFactory, TracingFactoryOptions};
use cdc_engine::cache::DefaultTopicSelector;
use cdc_engine::config::{read_config, EngineConfig};
use cdc_engine::event::VecEventSource;
use cdc_engine::history::FileHistoryStore;
use cdc_engine::processor::EventProcessor;

use crate::fixture::load_fixture;
use crate::log_sink::LoggingSink;

#[derive(Parser, Debug, Clone)]
#[command(name = "cdc-cli")]
#[command(version = "0.0.1")]
#[command(author = "rust-us")]
#[command(about = "Replays a fixture of binlog events through the CDC engine")]
#[command(long_about = None)]
struct CliArgs {
    /// Path to an EngineConfig TOML file; falls back to built-in defaults.
    #[arg(short, long, help = "Path to engine configuration file", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to a newline-delimited JSON file of `cdc_engine::event::Event`.
    #[arg(short, long, help = "Path to a JSON-lines event fixture", value_name = "FILE")]
    fixture: PathBuf,

    /// Replay the history file before processing the fixture, rebuilding
    /// the catalog the way a restarted engine would.
    #[arg(long, help = "Replay existing DDL history before the fixture", default_value_t = false)]
    resume: bool,

    #[arg(short, long, help = "enable debug logging", default_value_t = false)]
    debug: bool,
}

fn main() -> CResult<()> {
    let args = CliArgs::parse();

    let log_opt = TracingFactoryOptions::new(args.debug, OutputType::STDOUT, None);
    TracingFactory::init_log_with_options(log_opt);

    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => EngineConfig::default(),
    };

    eprintln!();
    eprintln!("╔╦╗╔═╗ ╔═╗╔╦╗╦  ");
    eprintln!(" ║ ╠═╣ ║   ║ ║  ");
    eprintln!(" ╩ ╩ ╩ ╚═╝ ╩ ╩═╝ Rust us CDC CLI [{}]", config.server_name);
    eprintln!();

    let events = load_fixture(&args.fixture)?;

    let history = FileHistoryStore::new(PathBuf::from(&config.history_path));
    let mut processor = EventProcessor::new(config, history, LoggingSink::new(), DefaultTopicSelector)?;

    if args.resume {
        processor.replay_history()?;
        tracing::info!("resumed catalog with {} known tables", processor.catalog().len());
    }

    let mut source = VecEventSource::new(events);
    processor.run(&mut source)?;

    Ok(())
}
