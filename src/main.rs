//! CLI entry point for inkpost

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpost::server::ServeOptions;
use inkpost::Site;

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(version)]
#[command(about = "A static blog generator for markdown posts", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
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
    /// Build the site into the public directory
    #[command(alias = "b")]
    Build {
        /// Rebuild when content changes
        #[arg(short, long)]
        watch: bool,

        /// Publish posts marked as drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Build, then serve the site locally with live reload
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Do not watch for changes
        #[arg(long)]
        no_watch: bool,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Publish posts marked as drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Remove the public directory
    Clean,

    /// List indexed posts
    List {
        /// Include drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "inkpost=debug,info"
    } else {
        "inkpost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };

    match cli.command {
        Commands::Build { watch, drafts } => {
            let site = Site::new(&base_dir)?.with_drafts(drafts);
            tracing::info!("Building site in {:?}", site.base_dir);

            site.build()?;
            println!("Built successfully!");

            if watch {
                inkpost::commands::build::watch(&site).await?;
            }
        }

        Commands::Serve {
            port,
            ip,
            no_watch,
            open,
            drafts,
        } => {
            let site = Site::new(&base_dir)?.with_drafts(drafts);
            site.build()?;

            let options = ServeOptions {
                ip,
                port,
                watch: !no_watch,
                open,
            };
            inkpost::server::start(&site, &options).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { drafts } => {
            let site = Site::new(&base_dir)?.with_drafts(drafts);
            inkpost::commands::list::run(&site)?;
        }

        Commands::New { title } => {
            let site = Site::new(&base_dir)?;
            let path = site.new_post(&title)?;
            println!("Created: {}", path.display());
        }
    }

    Ok(())
}
