use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use dialoguer::{Confirm, Password};
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use sensei_admin::listing::render_page;
use sensei_admin::tui::forms::StartNodeForm;
use sensei_admin::tui::state::confirm::ConfirmationRequest;
use sensei_admin::tui::transform::transform_page;
use sensei_admin::{
    AdminConfig, AdminError, AdminResult, HttpNodeRepository, MemoryNodeRepository,
    NodeRepository,
};
use sensei_admin_core::ListNodesQuery;

#[derive(Parser)]
#[command(name = "sensei-admin")]
#[command(about = "Admin console for a fleet of Sensei Lightning nodes", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Admin API base URL, overriding the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Use a built-in in-memory fleet instead of the admin API
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive node console (default)
    Tui,
    /// Print one page of the node listing
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Search term matched against alias, username and pubkey
        #[arg(long, default_value = "")]
        search: String,

        /// Page size; defaults to the configured page size
        #[arg(long)]
        take: Option<usize>,
    },
    /// Stop a running node
    Stop {
        #[arg(long)]
        pubkey: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Start a stopped node, prompting for its passphrase
    Start {
        #[arg(long)]
        pubkey: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> AdminResult<()> {
    let cli = Cli::parse();

    let mut config = AdminConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&config, matches!(command, Commands::Tui))?;

    let repo: Arc<dyn NodeRepository> = if cli.demo {
        info!("Using in-memory demo fleet");
        Arc::new(MemoryNodeRepository::demo())
    } else {
        Arc::new(HttpNodeRepository::new(&config.api)?)
    };

    match command {
        Commands::Tui => sensei_admin::tui::run(&config, repo).await,
        Commands::List { page, search, take } => {
            let take = take.unwrap_or(config.list.page_size);
            handle_list(repo.as_ref(), ListNodesQuery::new(page, search, take)).await
        }
        Commands::Stop { pubkey, yes } => handle_stop(repo.as_ref(), &pubkey, yes).await,
        Commands::Start { pubkey } => handle_start(repo.as_ref(), &pubkey).await,
    }
}

/// Initialize tracing. The interactive console owns the terminal, so its
/// logs go to the configured file instead of stderr.
fn init_logging(config: &AdminConfig, to_file: bool) -> AdminResult<()> {
    let directive = |name: &str| -> AdminResult<Directive> {
        format!("{}={}", name, config.logging.level)
            .parse()
            .map_err(|e| AdminError::ConfigError(format!("Invalid log directive: {}", e)))
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(directive("sensei_admin")?)
        .add_directive(directive("sensei_admin_core")?);

    if to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn handle_list(repo: &dyn NodeRepository, query: ListNodesQuery) -> AdminResult<()> {
    let page = repo.list_nodes(&query).await?;
    print!("{}", render_page(&transform_page(&page), query.page));
    Ok(())
}

async fn handle_stop(repo: &dyn NodeRepository, pubkey: &str, yes: bool) -> AdminResult<()> {
    if !yes {
        let request = ConfirmationRequest::stop_node(pubkey);
        println!("{}", request.description);
        let confirmed = Confirm::new()
            .with_prompt(request.title)
            .default(false)
            .interact()
            .map_err(|e| AdminError::Internal {
                message: format!("Prompt failed: {}", e),
            })?;
        if !confirmed {
            println!("Aborted; node {} was not stopped", pubkey);
            return Ok(());
        }
    }

    info!(pubkey, "Stopping node");
    repo.stop_node(pubkey).await?;
    println!("Stopped node {}", pubkey);
    Ok(())
}

async fn handle_start(repo: &dyn NodeRepository, pubkey: &str) -> AdminResult<()> {
    let mut form = StartNodeForm::new(pubkey);
    form.passphrase = Password::new()
        .with_prompt(format!("Passphrase for {}", pubkey))
        .interact()
        .map_err(|e| AdminError::Internal {
            message: format!("Prompt failed: {}", e),
        })?;
    let submission = form.submit()?;

    info!(pubkey, "Starting node");
    repo.start_node(&submission.pubkey, &submission.passphrase)
        .await?;
    println!("Started node {}", pubkey);
    Ok(())
}
