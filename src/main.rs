mod compute;
mod config;
mod state;
mod sync;

use std::sync::Arc;
use std::time::Duration;
use futures::StreamExt;
use log::{error, info};

use crate::config::Config;
use crate::state::StateEnvelope;
use crate::sync::{DataSource, SyncOrchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    // Log configuration
    config.log_config();

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e.into());
    }

    let source = Arc::new(DataSource::from_config(&config));
    let orchestrator = SyncOrchestrator::new(source);

    // Observe the state feed and print every value as a timestamped envelope
    let subscription = orchestrator.observe()?;
    let subscription_id = subscription.id();
    let printer = tokio::spawn(async move {
        let mut feed = Box::pin(subscription.into_stream());
        while let Some(state) = feed.next().await {
            match StateEnvelope::new(state).to_json() {
                Ok(json) => println!("[state] {}", json),
                Err(e) => error!("Failed to serialize state: {}", e),
            }
        }
    });

    // Kick off the sync, give it the observation window, then cancel whatever
    // is still in flight
    orchestrator.load();
    tokio::time::sleep(Duration::from_millis(config.observe_window_ms)).await;
    orchestrator.cancel();
    orchestrator.unsubscribe(subscription_id);
    printer.await?;

    run_compute_demo();

    info!("Demo completed");
    Ok(())
}

fn run_compute_demo() {
    println!("\nArithmetic provider:");
    print_result("2 + 3", compute::add(2, 3));
    print_result("10 - 4", compute::sub(10, 4));
    print_result("20 / 5", compute::div(20, 5));
    println!("  equal(5, 5) = {}", compute::equal(5, 5));
    println!("  equal(5, 6) = {}", compute::equal(5, 6));

    // Overflow and division by zero surface as distinct errors
    print_result("u64::MAX + 1", compute::add(u64::MAX, 1));
    print_result("10 / 0", compute::div(10, 0));

    let markdown = "# Hello\nThis is **Markdown**.";
    println!("Markdown parsed to HTML:\n{}", compute::parse_markdown(markdown));
}

fn print_result(label: &str, result: Result<u64, compute::ComputeError>) {
    match result {
        Ok(value) => println!("  {} = {}", label, value),
        Err(e) => println!("  {} failed: {}", label, e),
    }
}
