//! Tally CLI - Expense and income tracker
//!
//! Usage:
//!   tally init                          Initialize database
//!   tally expenses add -t Lunch -a 12 -c Food
//!   tally report dashboard              Show the dashboard summary
//!   tally audit --limit 50              Recent API access
//!   tally serve --port 3000             Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose, which wins over the default
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Seed => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_seed(&db)
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_expenses_list(&db, 20),
                Some(ExpensesAction::List { limit }) => commands::cmd_expenses_list(&db, limit),
                Some(ExpensesAction::Add {
                    title,
                    amount,
                    category,
                }) => commands::cmd_expenses_add(&db, &title, amount, &category).map(|_| ()),
                Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&db, id),
            }
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_income_list(&db, 20),
                Some(IncomeAction::List { limit }) => commands::cmd_income_list(&db, limit),
                Some(IncomeAction::Add { title, amount }) => {
                    commands::cmd_income_add(&db, &title, amount).map(|_| ())
                }
                Some(IncomeAction::Delete { id }) => commands::cmd_income_delete(&db, id),
            }
        }
        Commands::Transactions {
            search,
            kind,
            category,
            sort,
            asc,
            limit,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let filter = commands::build_filter(
                search.as_deref(),
                kind.as_deref(),
                category.as_deref(),
                &sort,
                asc,
            )?;
            commands::cmd_transactions(&db, &filter, limit)
        }
        Commands::Report { report, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match report {
                ReportType::Stats { count } => commands::cmd_report_stats(&db, &count, json),
                ReportType::Monthly { months } => commands::cmd_report_monthly(&db, months, json),
                ReportType::Categories => commands::cmd_report_categories(&db, json),
                ReportType::Trends { months } => commands::cmd_report_trends(&db, months, json),
                ReportType::Dashboard => commands::cmd_report_dashboard(&db, json),
                ReportType::Analytics => commands::cmd_report_analytics(&db, json),
            }
        }
        Commands::Audit {
            limit,
            action,
            entity,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let query = tally_core::db::AuditQuery {
                limit: Some(limit),
                action,
                entity_type: entity,
            };
            commands::cmd_audit(&db, &query, json)
        }
        Commands::Reset { yes } => commands::cmd_reset(&cli.db, yes, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
    }
}
