//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::contact::ContactMessage;
use folio_rs::Folio;

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version = "0.1.0")]
#[command(about = "A portfolio site builder backed by a projects and certificates API", long_about = None)]
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
    /// Initialize a new portfolio site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (projects, certificates, categories)
        #[arg(default_value = "projects")]
        r#type: String,

        /// Fetch from the API instead of the static data files
        #[arg(long)]
        live: bool,
    },

    /// Send a message through the configured contact endpoint
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        subject: String,

        #[arg(short, long)]
        message: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized portfolio site in {:?}", target_dir);
        }

        Commands::Generate { watch } => {
            let folio = Folio::new(&base_dir)?;
            tracing::info!("Generating static files...");

            folio.generate().await?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                folio_rs::commands::generate::watch(&folio).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let folio = Folio::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            folio.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let folio = Folio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, live } => {
            let folio = Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &r#type, live).await?;
        }

        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let folio = Folio::new(&base_dir)?;
            let message = ContactMessage {
                name,
                email,
                subject,
                message,
            };
            folio_rs::commands::contact::run(&folio, message).await?;
            println!("Message sent.");
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
