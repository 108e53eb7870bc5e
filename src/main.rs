use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Flowfetch: browse, inspect and pull n8n workflow libraries from remote repositories
#[derive(Parser)]
#[command(name = "flowfetch", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List workflow files in the remote repository
    List {
        /// Case-insensitive search term matched against file and workflow names
        #[arg(short, long)]
        query: Option<String>,

        /// Zero-based page to display
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Number of files per page
        #[arg(long, default_value_t = 12)]
        page_size: usize,

        /// Show the download URL next to each file
        #[arg(short, long)]
        urls: bool,

        /// Bypass the cached file list
        #[arg(short, long)]
        refresh: bool,
    },

    /// Fetch named workflows and summarize their structure
    Inspect {
        /// Workflow file names to inspect
        #[arg(required = true)]
        files: Vec<String>,

        /// Print analyses as JSON instead of formatted text
        #[arg(short, long)]
        json: bool,
    },

    /// Download workflows to a local directory
    Pull {
        /// Directory to save workflow files to
        #[arg(default_value = ".")]
        output_dir: String,

        /// Case-insensitive search term matched against file names
        #[arg(short, long)]
        query: Option<String>,

        /// Skip workflows with fewer nodes than this
        #[arg(short, long, default_value_t = 0)]
        min_nodes: usize,

        /// Number of concurrent fetches
        #[arg(long, default_value_t = 5)]
        parallel: usize,

        /// Bypass the cached file list
        #[arg(short, long)]
        refresh: bool,
    },

    /// Test connectivity to the workflow repository
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Missing dotenv file is fine, the public repository needs no credentials
    dotenvy::from_filename(&cli.env).ok();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::List {
            query,
            page,
            page_size,
            urls,
            refresh,
        } => {
            flowfetch::cli::list_workflows(query, page, page_size, urls, refresh).await?;
        }
        Commands::Inspect { files, json } => {
            flowfetch::cli::inspect_workflows(files, json).await?;
        }
        Commands::Pull {
            output_dir,
            query,
            min_nodes,
            parallel,
            refresh,
        } => {
            flowfetch::cli::pull_workflows(&output_dir, query, min_nodes, parallel, refresh)
                .await?;
        }
        Commands::Check => {
            flowfetch::cli::check_connection().await?;
        }
    }

    Ok(())
}
