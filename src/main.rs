use clap::Parser;

mod catalog;
mod cli;
mod config;
mod error;
mod extract;
mod metadata;
mod probe;
mod resolve;
mod scrape;
#[cfg(test)]
mod tests;

use catalog::Catalog;
use config::Config;
use resolve::{ResolutionResult, Resolver};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ykr=info")),
        )
        .init();

    let args = cli::Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let catalog = Catalog::from_config(&config)?;

    match args.command {
        cli::Command::Endpoints { json } => {
            let entries = catalog.describe();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{:>2}. {} [{}]", entry.priority, entry.name, entry.kind);
                    println!("    {}", entry.url_template);
                }
            }
        }

        cli::Command::Resolve {
            url,
            no_probe,
            json,
        } => {
            let resolver = build_resolver(catalog, config)?;
            let result = resolver.resolve(&url, !no_probe);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_resolution(&result);
            }
        }

        cli::Command::Test { url, json } => {
            if !extract::is_youku_url(&url) {
                log::warn!("{url}: does not look like a youku url, probing anyway");
            }

            let resolver = build_resolver(catalog, config)?;
            log::info!("probing {} endpoints", resolver.catalog().len());
            let results = resolver.test_all(&url);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for r in &results {
                    let verdict = if r.available { "available" } else { "unavailable" };
                    println!("{:>2}. {}: {verdict}", r.priority, r.name);
                    if let Some(t) = r.response_time {
                        println!("    response time: {t:.2}s");
                    }
                    if let Some(err) = &r.error {
                        println!("    error: {err}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_resolver(catalog: Catalog, config: Config) -> Result<Resolver, error::Error> {
    let client = scrape::build_client()?;
    let transport = scrape::ReqwestTransport::new(client);
    Ok(Resolver::new(catalog, config, Box::new(transport)))
}

fn print_resolution(result: &ResolutionResult) {
    if !result.success {
        println!(
            "resolution failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    println!("source:      {}", result.source_url);
    if let Some(id) = &result.content_id {
        println!("video id:    {id}");
    }
    if let Some(title) = &result.metadata.title {
        println!("title:       {title}");
    }
    if let Some(secs) = result.metadata.duration_seconds {
        println!("duration:    {}", metadata::format_duration(secs));
    }
    if let Some(thumb) = &result.metadata.thumbnail_url {
        println!("thumbnail:   {thumb}");
    }
    if let Some(name) = &result.recommended_endpoint {
        println!("recommended: {name}");
    }
    if let Some(best) = &result.best_endpoint_url {
        println!("best:        {best}");
    }

    println!();
    println!("candidates ({}):", result.candidates.len());
    for c in &result.candidates {
        println!("{:>2}. {}: {}", c.priority, c.name, c.url);
    }
}
