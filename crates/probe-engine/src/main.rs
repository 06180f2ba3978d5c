//! pageprobe - instrument an HTML file and print the report as JSON

use std::error::Error;

use probe_engine::{Config, Engine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: pageprobe <page.html> [url]")?;
    let html = std::fs::read_to_string(&path)?;

    let mut config = Config::default();
    if let Some(url) = args.next() {
        config.url = url;
    }

    let engine = Engine::new(config);
    let page = engine.load_html(&html)?;
    page.run_timers();

    println!("{}", serde_json::to_string_pretty(&page.report())?);
    Ok(())
}
