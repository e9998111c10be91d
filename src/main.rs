//! CLI entry point for agency-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agency-site")]
#[command(author = "404.js Team")]
#[command(version)]
#[command(about = "Blog API server for the 404.js agency website", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog API server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (overrides config and HOST)
        #[arg(short, long)]
        ip: Option<String>,

        /// Keep posts in memory only
        #[arg(long)]
        memory: bool,
    },

    /// Fill the store with sample posts
    Seed {
        /// Keep existing posts instead of clearing them first
        #[arg(long)]
        keep: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category label
        #[arg(short = 'C', long)]
        category: String,

        /// Post body
        #[arg(short = 'b', long)]
        content: String,

        /// Author (defaults to the organization name)
        #[arg(short, long)]
        author: Option<String>,
    },

    /// List store content
    List {
        /// Type of content to list (post, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "agency_site=debug,tower_http=debug,info"
    } else {
        "agency_site=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip, memory } => {
            let mut site = agency_site::Site::new(&base_dir)?;
            if let Some(port) = port {
                site.config.server.port = port;
            }
            if let Some(ip) = ip {
                site.config.server.ip = ip;
            }

            let store = if memory {
                tracing::info!("Using in-memory store");
                site.memory_store()
            } else {
                site.open_store().await?
            };

            tracing::info!(
                "Starting server at http://{}:{}",
                site.config.server.ip,
                site.config.server.port
            );
            agency_site::server::start(&site, store).await?;
        }

        Commands::Seed { keep } => {
            let site = agency_site::Site::new(&base_dir)?;
            let store = site.open_store().await?;
            tracing::info!("Seeding {:?}", site.data_path);
            agency_site::commands::seed::run(store.as_ref(), keep).await?;
        }

        Commands::New {
            title,
            category,
            content,
            author,
        } => {
            let site = agency_site::Site::new(&base_dir)?;
            let store = site.open_store().await?;
            tracing::info!("Creating new post with title: {}", title);
            agency_site::commands::new::create_post(
                store.as_ref(),
                &title,
                &category,
                &content,
                author.as_deref(),
            )
            .await?;
        }

        Commands::List { r#type } => {
            let site = agency_site::Site::new(&base_dir)?;
            let store = site.open_store().await?;
            agency_site::commands::list::run(store.as_ref(), &r#type).await?;
        }

        Commands::Version => {
            println!("agency-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
