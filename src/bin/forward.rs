use std::error::Error;

use tracing::info;

use gravity_forward::{RunConfig, load_config, run};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args();
    let _binary = args.next();
    let config = match args.next() {
        Some(path) if path == "-h" || path == "--help" => {
            eprintln!("usage: grav-forward [config.yaml]");
            return Ok(());
        }
        Some(path) => load_config(&path)?,
        None => {
            info!("no configuration given, using the built-in reference run");
            RunConfig::default()
        }
    };

    let model = run(&config)?;
    info!(
        receivers = model.receivers.len(),
        active_cells = model.active.n_active(),
        output = %config.output.directory.display(),
        "done"
    );
    Ok(())
}
