use clap::Parser;
use expense_sync::api;
use expense_sync::args::{Args, Command};
use expense_sync::notify::TracingNotifier;
use expense_sync::{commands, Config, Mode, Result, Session, TransactionSync};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expense_home().path();
    let user_override = args.common().user_id();

    // This allows for testing the program without a running transaction service. When
    // EXPENSE_SYNC_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Http.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.api_url(), init_args.user_id())
                .await?
                .print()
        }

        Command::Login(login_args) => {
            let config = Config::load(home).await?;
            commands::login(config, login_args.user_id()).await?.print()
        }

        Command::Logout => commands::logout(Config::load(home).await?).await?.print(),

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            let sync = TransactionSync::new(
                api::client(&config, mode)?,
                Arc::new(TracingNotifier::errors_reported_elsewhere()),
                Session::from_config(&config, user_override),
            );
            commands::list(&sync, list_args.limit()).await?.print()
        }

        Command::Create(create_args) => {
            let config = Config::load(home).await?;
            let client = api::client(&config, mode)?;
            let session = Session::from_config(&config, user_override);
            let notifier = TracingNotifier::errors_reported_elsewhere();
            commands::create(client.as_ref(), &session, &notifier, create_args)
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            let sync = TransactionSync::new(
                api::client(&config, mode)?,
                Arc::new(TracingNotifier::errors_reported_elsewhere()),
                Session::from_config(&config, user_override),
            );
            commands::delete(&sync, delete_args.id()).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
