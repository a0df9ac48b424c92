//! These structs provide the CLI interface for the expense CLI.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expense: A command-line client for a personal expense tracking service.
///
/// The purpose of this program is to show and change the transactions you keep in a remote
/// expense tracking service: see your balance, income and expenses, list recent transactions, add
/// new ones and delete old ones.
///
/// Start with `expense init --api-url <URL>` to point the program at your service, then
/// `expense login --user-id <ID>` with the id your identity provider gave you.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/expense; pass --expense-home to put it somewhere else.
    Init(InitArgs),
    /// Remember the signed-in user.
    Login(LoginArgs),
    /// Forget the signed-in user.
    Logout,
    /// Show the balance, income, expenses and recent transactions.
    List(ListArgs),
    /// Add a transaction.
    Create(CreateArgs),
    /// Delete a transaction by its id.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/expense
    #[arg(long, env = "EXPENSE_HOME", default_value_t = default_expense_home())]
    expense_home: DisplayPath,

    /// Act as this user instead of the one stored by `expense login`.
    #[arg(long, env = "EXPENSE_USER_ID")]
    user_id: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, expense_home: PathBuf, user_id: Option<String>) -> Self {
        Self {
            log_level,
            expense_home: expense_home.into(),
            user_id,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expense_home(&self) -> &DisplayPath {
        &self.expense_home
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// (Not shown): Args for the `expense init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the transaction service, e.g. https://example.com/api
    #[arg(long)]
    api_url: String,

    /// The signed-in user, if you already know it. You can also set it later with `expense login`.
    #[arg(long)]
    user_id: Option<String>,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            user_id,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// (Not shown): Args for the `expense login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    /// The user id issued by the identity provider.
    #[arg(long)]
    user_id: String,
}

impl LoginArgs {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// (Not shown): Args for the `expense list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Show at most this many transactions.
    #[arg(long)]
    limit: Option<usize>,
}

impl ListArgs {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Whether a new transaction takes money out or brings it in.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(Direction);
serde_plain::derive_fromstr_from_deserialize!(Direction);

/// (Not shown): Args for the `expense create` command.
#[derive(Debug, Parser, Clone)]
pub struct CreateArgs {
    /// A short description, e.g. "Lunch".
    #[arg(long)]
    title: String,

    /// How much, without a sign. "$" and thousands separators are allowed, e.g. "$1,200.50".
    #[arg(long, allow_hyphen_values = true)]
    amount: String,

    /// One of: Food & Drinks, Shopping, Transportation, Entertainment, Bills, Income, Other.
    /// The short ids (food, shopping, transportation, entertainment, bills, income, other) work
    /// too.
    #[arg(long)]
    category: String,

    /// Record money coming in. Without this flag the transaction is an expense.
    #[arg(long)]
    income: bool,
}

impl CreateArgs {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            category: category.into(),
            income: direction == Direction::Income,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn direction(&self) -> Direction {
        if self.income {
            Direction::Income
        } else {
            Direction::Expense
        }
    }
}

/// (Not shown): Args for the `expense delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction, as shown by `expense list --log-level debug`.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

fn default_expense_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expense"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expense-home or EXPENSE_HOME instead of relying on the default \
                expense home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expense")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
