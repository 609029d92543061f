use anyhow::Result;
use retrack::{app, cli, debug};
use retrack_config::Config;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = cli::process_cli();

    // Routes all log::info!() etc. to /tmp/retrack_debug.log; mirrors to
    // stderr when RUST_LOG is set. CLI --log-level wins, then RUST_LOG,
    // then config (applied below).
    debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting retrack {}", retrack::VERSION);

    let config = match &runtime_options.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    debug::apply_config_level(config.log_level);

    // Host calls are awaited one at a time; a single thread is enough.
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let result = runtime.block_on(app::run(&runtime_options, config));

    match result {
        Ok(0) => Ok(()),
        Ok(code) => {
            log::info!("Exiting with code {}", code);
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("retrack: error: {e:#}");
            Err(e)
        }
    }
}
