//! CLI administration tool for snaplink.
//!
//! Runs maintenance and account tasks directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Remove expired links, expired guest sessions and old clicks
//! cargo run --bin admin -- cleanup
//!
//! # Manage users
//! cargo run --bin admin -- users list
//! cargo run --bin admin -- users create --email ann@example.com --name Ann
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Recent clicks of one link
//! cargo run --bin admin -- clicks abcdEFGH --limit 20
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`): PostgreSQL connection

use snaplink::application::services::MaintenanceService;
use snaplink::config::{Config, mask_connection_string};
use snaplink::domain::entities::NewUser;
use snaplink::state::Repositories;
use snaplink::utils::password::hash_password;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use validator::ValidateEmail;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete expired links, expired guest sessions and year-old clicks
    Cleanup {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Show the most recent clicks of a short link
    Clicks {
        /// Short code
        code: String,

        /// Maximum number of clicks to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Create a user
    Create {
        #[arg(short, long)]
        email: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?
        .context("DATABASE_URL (or DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&database_url)
            )
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repos = Repositories::postgres(Arc::new(pool.clone()));

    match cli.command {
        Commands::Cleanup { yes } => cleanup(&repos, yes).await?,
        Commands::Users { action } => match action {
            UserAction::List => list_users(&repos).await?,
            UserAction::Create { email, name } => create_user(&repos, email, name).await?,
        },
        Commands::Stats => stats(&repos).await?,
        Commands::Clicks { code, limit } => clicks(&repos, &code, limit).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn cleanup(repos: &Repositories, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Expiry sweep".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Permanently delete expired links, sessions and old clicks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let maintenance = MaintenanceService::new(
        repos.links.clone(),
        repos.sessions.clone(),
        repos.clicks.clone(),
    );
    let report = maintenance
        .sweep(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Sweep failed: {e}"))?;

    println!(
        "  Links:    {}",
        report.links.to_string().bright_green().bold()
    );
    println!(
        "  Sessions: {}",
        report.sessions.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:   {}",
        report.clicks.to_string().bright_green().bold()
    );
    println!();
    println!("{}", "✅ Done".green().bold());

    Ok(())
}

/// Prints every user.
///
/// ```text
///   ID  Email                          Name                 Created
///   ─────────────────────────────────────────────────────────────────────
///   1   ann@example.com                Ann                  2026-01-15 10:30
/// ```
async fn list_users(repos: &Repositories) -> Result<()> {
    println!("{}", "👤 Users".bright_blue().bold());
    println!();

    let users = repos
        .users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {e}"))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<3} {:<30} {:<20} {:<16}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(72).bright_black());

    for user in &users {
        println!(
            "  {:<3} {:<30} {:<20} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.display_name,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn create_user(
    repos: &Repositories,
    email: Option<String>,
    name: Option<String>,
) -> Result<()> {
    println!("{}", "👤 Create user".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    if !email.trim().validate_email() {
        anyhow::bail!("'{email}' is not a valid email address");
    }

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };
    if name.trim().is_empty() {
        anyhow::bail!("Name is required");
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;
    if password.chars().count() < 6 {
        anyhow::bail!("Password must be at least 6 characters");
    }

    let password_hash = hash_password(&password)?;

    let user = repos
        .users
        .create(NewUser {
            email: email.trim().to_string(),
            display_name: name.trim().to_string(),
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {e}"))?;

    println!();
    println!(
        "{} {}",
        "✅ User created with id".green().bold(),
        user.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn stats(repos: &Repositories) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links = repos
        .links
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {e}"))?;
    let clicks = repos
        .clicks
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {e}"))?;
    let users = repos
        .users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {e}"))?
        .len();

    println!("  Links:  {}", links.to_string().bright_green().bold());
    println!("  Clicks: {}", clicks.to_string().bright_green().bold());
    println!("  Users:  {}", users.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn clicks(repos: &Repositories, code: &str, limit: usize) -> Result<()> {
    println!("{} {}", "🖱  Clicks for".bright_blue().bold(), code.cyan());
    println!();

    let link = repos
        .links
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load link: {e}"))?
        .with_context(|| format!("No link with code '{code}'"))?;

    let clicks = repos
        .clicks
        .list_by_link(link.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list clicks: {e}"))?;

    println!("  Target: {}", link.original_url.bright_white());
    println!(
        "  Total:  {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!();

    if clicks.is_empty() {
        println!("{}", "  No clicks recorded".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {:<40} {}",
        "When".bright_white().bold(),
        "IP".bright_white().bold(),
        "User-Agent".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for click in clicks.iter().take(limit) {
        println!(
            "  {:<20} {:<40} {}",
            click
                .clicked_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            click.ip.as_deref().unwrap_or("-"),
            click.user_agent.as_deref().unwrap_or("-")
        );
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
