//! CLI entry point for blog-index

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-index")]
#[command(version)]
#[command(about = "Index, search and serve a directory of Markdown posts", long_about = None)]
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
    /// List site content
    List {
        /// Type of content to list (post, tag, year)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show a single post
    Show {
        /// Slug of the post (file name without extension)
        slug: String,

        /// Also print the rendered HTML body
        #[arg(long)]
        html: bool,
    },

    /// Search titles, excerpts and tags
    Search {
        /// Case-insensitive search term
        query: String,
    },

    /// Start the JSON query server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_index=debug,info"
    } else {
        "blog_index=info"
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
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::List { r#type } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            blog_index::commands::list::run(&blog, &r#type)?;
        }

        Commands::Show { slug, html } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            blog_index::commands::show::run(&blog, &slug, html)?;
        }

        Commands::Search { query } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            blog_index::commands::search::run(&blog, &query)?;
        }

        Commands::Server { port, ip } => {
            let blog = blog_index::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_index::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("blog-index version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
