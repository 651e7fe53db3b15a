use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Daybook: Notion calendar upkeep")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day/Week/Month upkeep and link backfill
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// List the databases shared with the integration
    Tables {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a record by its title
    Get {
        /// Database display name (e.g. "Week")
        table: String,
        /// Record title (e.g. "3 - 9 Jul 2023")
        name: String,
        /// Title property to match on
        #[arg(long, default_value = "Name")]
        property: String,
    },
    /// Query a database with a single-property filter
    Query {
        /// Database display name
        table: String,
        /// Property to filter on
        property: String,
        /// Property type (text, number, checkbox, select, multi_select, date, relation)
        filter_type: String,
        /// Condition (equals, contains, starts_with, is_empty, ...)
        condition: String,
        /// Comparison value; omit for is_empty/is_not_empty
        value: Option<String>,
        /// Maximum number of records
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the Notion integration secret
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("daybook=debug,daybook_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("daybook=info,daybook_core=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Sync { action } => commands::sync::run(action).await,
        Commands::Tables { json } => commands::tables::run(json).await,
        Commands::Get {
            table,
            name,
            property,
        } => commands::get::run(&table, &name, &property).await,
        Commands::Query {
            table,
            property,
            filter_type,
            condition,
            value,
            limit,
            json,
        } => {
            commands::query::run(
                &table,
                &property,
                &filter_type,
                &condition,
                value.as_deref(),
                limit,
                json,
            )
            .await
        }
        Commands::Auth { action } => commands::auth::run(action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "daybook", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
