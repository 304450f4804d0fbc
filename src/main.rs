use anyhow::Result;
use book_search::config::{ Cli, Command, Settings };
use book_search::dispatcher::Dispatcher;
use book_search::encoder::{ FastEmbedEncoder, TextEncoder };
use book_search::seed::{ SeedReport, Seeder };
use book_search::server;
use book_search::store::SurrealCatalog;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

fn print_report(report: &SeedReport) {
    println!("Seeded {} books and {} authors", report.books, report.authors);
    for path in &report.skipped_files {
        println!("Skipped unreadable file: {}", path.display());
    }
}

async fn open_catalog(settings: &Settings, dimension: usize) -> Result<SurrealCatalog> {
    let catalog = if settings.memory {
        info!("Using in-memory catalogue");
        SurrealCatalog::in_memory(&settings.namespace, &settings.database, dimension).await?
    } else {
        let db_path = settings.resolve_db_path()?;
        SurrealCatalog::open(&db_path, &settings.namespace, &settings.database, dimension).await?
    };
    Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "book_search=info".into())
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = cli.settings;
    settings.validate()?;

    let encoder: Arc<dyn TextEncoder> = Arc::new(
        FastEmbedEncoder::new(&settings.model, settings.model_cache.clone())?
    );
    let catalog = open_catalog(&settings, encoder.dimension()).await?;

    match cli.command {
        Command::Serve { bind, seed } => {
            if let Some(dir) = seed {
                info!("Seeding catalogue from {} before serving", dir.display());
                let report = Seeder::new(Arc::clone(&encoder), &catalog).seed_directory(&dir).await?;
                print_report(&report);
            }
            let dispatcher = Dispatcher::new(encoder, Arc::new(catalog));
            server::serve(bind, Arc::new(dispatcher)).await?;
        }
        Command::Seed { dir } => {
            info!("Seeding catalogue from {}", dir.display());
            let report = Seeder::new(encoder, &catalog).seed_directory(&dir).await?;
            print_report(&report);
        }
    }

    Ok(())
}
