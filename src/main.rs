mod color;
mod config;
mod data;
mod pipeline;
mod plot;
mod report;
mod stats;

use anyhow::Result;
use config::{ReportConfig, USAGE};
use plot::BitmapRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    let config = ReportConfig::default().with_args(args.into_iter())?;
    pipeline::run(&config, &BitmapRenderer)?;
    Ok(())
}
