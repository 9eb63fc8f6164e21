//! `yasite` binary: runs the web service and seeds data.

mod cli;

use anyhow::{anyhow, ensure, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;
use yasite_core::db::open_db;
use yasite_core::{
    AccountService, NewNews, NewsService, SignupForm, SqliteAccountRepository,
    SqliteNewsRepository,
};
use yasite_web::{build_router, AppState, WebConfig};

use cli::{AddNewsArgs, Cli, Commands, CreateUserArgs, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let db_path = cli.db_path();
    match cli.command {
        Commands::Serve(args) => serve(&db_path, args).await,
        Commands::AddNews(args) => add_news(&db_path, args),
        Commands::CreateUser(args) => create_user(&db_path, args),
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| yasite_core::default_log_level());
    let started = match cli.log_dir.as_deref() {
        Some(dir) => yasite_core::init_logging(level, dir),
        None => yasite_core::init_stderr_logging(level),
    };
    started
        .map_err(|err| anyhow!(err))
        .context("failed to initialize logging")
}

async fn serve(db_path: &Path, args: ServeArgs) -> Result<()> {
    let conn = open_db(db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let session_ttl = Duration::from_secs(args.session_ttl_hours.saturating_mul(60 * 60));

    AccountService::new(SqliteAccountRepository::try_new(&conn)?).purge_expired_sessions()?;

    let state = AppState::new(
        conn,
        WebConfig {
            session_ttl,
            secure_cookies: args.secure_cookies,
        },
    );
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(
        "event=http_listen module=cli status=ok addr={} db={}",
        args.bind,
        db_path.display()
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;
    info!("event=http_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=signal_listen module=cli status=error error={err}");
        std::future::pending::<()>().await;
    }
}

fn add_news(db_path: &Path, args: AddNewsArgs) -> Result<()> {
    ensure!(!args.title.trim().is_empty(), "news title cannot be blank");
    ensure!(!args.text.trim().is_empty(), "news text cannot be blank");

    let conn = open_db(db_path)?;
    let news = NewsService::new(SqliteNewsRepository::try_new(&conn)?).publish(&NewNews {
        title: args.title,
        text: args.text,
        date: args.date,
    })?;
    println!("news {} published ({})", news.id, news.date);
    Ok(())
}

fn create_user(db_path: &Path, args: CreateUserArgs) -> Result<()> {
    let conn = open_db(db_path)?;
    let user = AccountService::new(SqliteAccountRepository::try_new(&conn)?).signup(&SignupForm {
        username: args.username,
        password1: args.password.clone(),
        password2: args.password,
    })?;
    println!("user {} created (id {})", user.username, user.id);
    Ok(())
}
