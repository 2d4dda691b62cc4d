use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use antwerpen::Client;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Example program that calls the library API.
    // Set RUST_LOG=antwerpen=debug to see the requests being made.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Fetching disabled parking spaces...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.disabled_parkings(200).await;
    spinner.finish_and_clear();
    client.close();
    let disabled_parkings = result?;

    for item in &disabled_parkings {
        println!("{item:?}");
    }

    let unique: HashSet<_> = disabled_parkings.iter().map(|p| p.entry_id).collect();

    println!("__________________________");
    println!("Total locations found: {}", disabled_parkings.len());
    println!("Unique ID values: {}", unique.len());
    Ok(())
}
