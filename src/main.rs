mod console;

use anyhow::Result;
use clap::Parser;
use console::ConsoleHost;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;
use weaponpaints_core::config::PluginConfig;
use weaponpaints_core::plugin::WeaponPaints;

/// Interactive console host for the WeaponPaints plugin
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the config file. Missing keys are added with their defaults.
    #[arg(short, long, default_value = "Config.toml")]
    config: PathBuf,

    /// Server tick interval in milliseconds.
    #[arg(long, default_value_t = 15)]
    tick_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "weaponpaints.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("WEAPONPAINTS_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let config = PluginConfig::load(&args.config)?;
    let host = Arc::new(ConsoleHost::default());
    let plugin = Arc::new(WeaponPaints::from_config(config, host.clone())?);
    info!(
        "Loaded, {} command names registered. Type `commands` to list them.",
        plugin.command_names().len()
    );

    let running = Arc::new(AtomicBool::new(true));
    let ticker = {
        let plugin = Arc::clone(&plugin);
        let running = Arc::clone(&running);
        let interval = Duration::from_millis(args.tick_ms.max(1));
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                plugin.on_tick();
                thread::sleep(interval);
            }
        })
    };

    for line in io::stdin().lock().lines() {
        match console::handle_line(&host, &plugin, &line?) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => error!("{:#}", err),
        }
    }

    running.store(false, Ordering::Relaxed);
    if ticker.join().is_err() {
        error!("Tick thread panicked");
    }
    info!("Bye");
    Ok(())
}
