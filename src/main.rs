use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labfeeds::cli::{Cli, Commands};
use labfeeds::config::Config;
use labfeeds::domain::{Fetched, PageKind, SourceType};
use labfeeds::services::PageService;
use labfeeds::transport::ReqwestTransport;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    // Logs go to stderr so stdout stays valid JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labfeeds=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if let Commands::Pages = cli.command {
        return cmd_pages();
    }

    let config = match &cli.env_file {
        Some(path) => Config::from_env_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Config::from_env().context("failed to load settings")?,
    };

    let transport = Arc::new(ReqwestTransport::new(config.http_timeout));
    let service = PageService::new(config, transport);

    match cli.command {
        Commands::Page { page, pretty } => cmd_page(&service, &page, pretty),
        Commands::Feed { source, count } => cmd_feed(&service, &source, count),
        Commands::Document { url, name } => cmd_document(&service, &url, &name),
        Commands::Pages => cmd_pages(),
    }
}

fn cmd_page(service: &PageService, page: &str, pretty: bool) -> Result<()> {
    let page: PageKind = page.parse().map_err(anyhow::Error::msg)?;
    let context = service.build_page_context(page);

    let json = if pretty {
        serde_json::to_string_pretty(&context)?
    } else {
        serde_json::to_string(&context)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_pages() -> Result<()> {
    for page in PageKind::ALL {
        let slots = page.fetched_slots();
        if slots.is_empty() {
            println!("{}", page);
        } else {
            println!("{} ({})", page, slots.join(", "));
        }
    }

    Ok(())
}

fn cmd_feed(service: &PageService, source: &str, count: Option<u32>) -> Result<()> {
    let source_type: SourceType = source.parse().map_err(anyhow::Error::msg)?;
    let result = service.registry().fetch_feed(source_type, count);

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn cmd_document(service: &PageService, url: &str, name: &str) -> Result<()> {
    match service.documents().fetch_document(name, url) {
        Fetched::Available(body) => print!("{}", body),
        Fetched::Unavailable(message) => println!("{}", message),
    }

    Ok(())
}
