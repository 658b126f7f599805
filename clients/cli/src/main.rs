//! Budget CLI - expenses and monthly budgets in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use budget_cli::{
    ApiClient, ClientError, SessionContext,
    api::DEFAULT_API_URL,
    commands::{auth, budget, expenses, summary},
    output,
};
use clap::{Parser, Subcommand};
use common::MonthKey;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Budget - expenses and monthly budgets in your terminal
#[derive(Parser)]
#[command(name = "budget", version, about, long_about = None)]
struct Cli {
    /// Base URL of the budget API
    #[arg(long, global = true, env = "BUDGET_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Session file (default: session.json in the user config directory)
    #[arg(long, global = true, env = "BUDGET_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged in user
    Whoami,

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        command: expenses::ExpenseCommands,
    },

    /// Show or set the monthly budget
    Budget {
        #[command(subcommand)]
        command: budget::BudgetCommands,
    },

    /// Totals by category and budget status for a month
    Summary {
        /// Month as YYYY-MM (default: current month)
        #[arg(long, short, value_parser = MonthKey::parse)]
        month: Option<MonthKey>,
    },
}

impl Commands {
    /// Commands that act on behalf of the stored session
    fn uses_session(&self) -> bool {
        !matches!(self, Commands::Register { .. } | Commands::Login { .. } | Commands::Logout)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = ApiClient::new(&cli.api_url)?;
    let path = match cli.session_file {
        Some(path) => path,
        None => SessionContext::default_path()?,
    };
    let mut session = SessionContext::hydrate(path);
    let uses_session = cli.command.uses_session();

    if uses_session {
        if let Err(err) = session.refresh(&client).await {
            output::warning("Your session has expired. Run `budget login` again.");
            return Err(err.into());
        }
    }

    let result = match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => auth::register(&client, &mut session, name, email, password).await,
        Commands::Login { email, password } => {
            auth::login(&client, &mut session, email, password).await
        }
        Commands::Logout => auth::logout(&mut session),
        Commands::Whoami => auth::whoami(&session),
        Commands::Expenses { command } => expenses::run(&client, &mut session, command).await,
        Commands::Budget { command } => budget::run(&client, &mut session, command).await,
        Commands::Summary { month } => {
            summary::run(&client, &session, month.unwrap_or_else(MonthKey::current)).await
        }
    };

    // A rejected token means the stored session is no longer usable
    if let Err(err) = &result {
        let rejected = err
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::is_unauthorized);
        if uses_session && rejected && session.is_logged_in() {
            session.clear()?;
            output::warning("Your session has expired. Run `budget login` again.");
        }
    }

    result
}
