pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod cli;
pub mod history;
pub mod responder;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("History Store Type: {}", args.history_type);
    info!("Rules Path: {}", args.rules_path.as_deref().unwrap_or("built-in"));
    info!("Expose Internal Errors: {}", args.expose_internal_errors);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("Debug: {}", args.debug);
    info!("-------------------------");

    let agent = ChatAgent::from_args(&args)?;
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
