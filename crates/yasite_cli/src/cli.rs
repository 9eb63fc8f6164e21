//! Command-line arguments. Every option also reads a `YASITE_*` variable.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use yasite_core::parse_news_date;

const DEFAULT_DB_FILE: &str = "yasite.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "yasite")]
#[command(version)]
#[command(about = "Notes and news web service", long_about = None)]
pub struct Cli {
    /// SQLite database file (default: yasite.sqlite3 in the temp dir)
    #[arg(long = "db", env = "YASITE_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Absolute directory for rotating log files; stderr when unset
    #[arg(long, env = "YASITE_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// trace|debug|info|warn|error (default depends on build mode)
    #[arg(long, env = "YASITE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Publish a news item
    AddNews(AddNewsArgs),

    /// Register a user account
    CreateUser(CreateUserArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "YASITE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Session lifetime in hours
    #[arg(long, env = "YASITE_SESSION_TTL_HOURS", default_value_t = 336)]
    pub session_ttl_hours: u64,

    /// Mark the session cookie Secure
    #[arg(long, env = "YASITE_SECURE_COOKIES")]
    pub secure_cookies: bool,
}

#[derive(Args, Debug)]
pub struct AddNewsArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub text: String,

    /// Publication date as YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_news_date)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long, env = "YASITE_USER_PASSWORD", hide_env_values = true)]
    pub password: String,
}
