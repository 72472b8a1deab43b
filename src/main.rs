//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Blog content pipeline for a personal portfolio site", long_about = None)]
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
        /// Type of content to list (post, featured, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a post as JSON
    Show {
        /// Post id (file name without extension)
        id: String,
    },

    /// Print the posts related to a post
    Related {
        /// Post id (file name without extension)
        id: String,

        /// Maximum number of related posts
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Render a markdown file to sanitized HTML
    Render {
        /// Markdown file to render
        file: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Serve the read-only content API
    #[command(alias = "s")]
    Serve {
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
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { r#type } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { id } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::show::show(&site, &id)?;
        }

        Commands::Related { id, count } => {
            let site = folio::Folio::new(&base_dir)?;
            let count = count.unwrap_or(site.config.related_count);
            folio::commands::show::related(&site, &id, count)?;
        }

        Commands::Render { file } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::show::render(&site, &file)?;
        }

        Commands::New { title } => {
            let site = folio::Folio::new(&base_dir)?;
            let path = site.new_post(&title)?;
            println!("Created: {:?}", path);
        }

        Commands::Serve { port, ip } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::server::start(&site, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
