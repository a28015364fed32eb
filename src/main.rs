use clap::Parser;
use tracing_subscriber::EnvFilter;

use camara::cli::{
    handle_activate_term, handle_create, handle_dashboard, handle_delete, handle_get, handle_list,
    handle_resources, handle_respond, handle_responses, handle_route, handle_slug, handle_toggle,
    handle_update, Cli, Commands,
};
use camara::{AppConfig, CamaraError};

fn fail(e: CamaraError) -> ! {
    if !matches!(e, CamaraError::Aborted) {
        eprintln!("Error: {}", e);
    }
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resources { json } => handle_resources(json),
        Commands::List { resource, json } => handle_list(&config, resource, json).await,
        Commands::Get { resource, id, json } => handle_get(&config, resource, id, json).await,
        Commands::Create {
            resource,
            file,
            stdin,
        } => handle_create(&config, resource, file, stdin).await,
        Commands::Update { resource, id, sets } => {
            handle_update(&config, resource, id, sets).await
        }
        Commands::Toggle { resource, id, off } => handle_toggle(&config, resource, id, off).await,
        Commands::Delete {
            resource,
            id,
            force,
        } => handle_delete(&config, resource, id, force).await,
        Commands::ActivateTerm { id, off } => handle_activate_term(&config, id, off).await,
        Commands::Respond { id, text } => handle_respond(&config, id, text).await,
        Commands::Responses { form, json } => handle_responses(&config, form, json).await,
        Commands::Dashboard { json } => handle_dashboard(&config, json).await,
        Commands::Route { path } => handle_route(path),
        Commands::Slug { title } => handle_slug(title),
    };

    if let Err(e) = result {
        fail(e);
    }
}
