pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod pagination;
pub mod parsers;
pub mod pricing;
pub mod reconcile;
pub mod services;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::{Category, DetectionResult};
use crate::parsers::detect_and_parse;
use crate::services::import::ImportService;
use crate::services::server::ServerService;
use crate::services::summary::{ImportAction, ImportReport};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let config = AppConfig::from_env()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = ServerService::new(port, config);
        service.run().await
    })
}

/// Read and classify a pasted ranking file
pub fn detect_file(path: &Path, config: &AppConfig) -> Result<DetectionResult> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let detection = detect_and_parse(&raw, &config.import).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(detection)
}

pub fn handle_detect(path: &Path) -> Result<()> {
    let config = AppConfig::from_env()?;
    let detection = detect_file(path, &config)?;

    println!(
        "{} format, {} players found",
        detection.format.as_str().bold(),
        detection.players_found
    );
    for name in &detection.preview {
        println!("  {name}");
    }
    Ok(())
}

pub fn handle_import(path: &Path, category: Category) -> Result<()> {
    let config = AppConfig::from_env()?;
    let detection = detect_file(path, &config)?;

    let pool = database::open(&config.database.path)?;
    let mut conn = database::get_connection(&pool)?;
    info!("Importing {} into {}", path.display(), config.database.path);

    let service = ImportService::new(config)?;
    let report = service.import(&mut conn, &detection.data, category, Local::now().date_naive());
    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!("{}", report.message().bold());

    for detail in &report.summary.changes {
        let line = match detail.action {
            ImportAction::Created => format!("+ {}", detail.player_name).green(),
            ImportAction::Updated => {
                let changes = detail.changes.as_deref().unwrap_or_default().join(", ");
                format!("~ {}: {}", detail.player_name, changes).yellow()
            }
            ImportAction::Skipped => format!("= {}", detail.player_name).dimmed(),
        };
        println!("{line}");
    }

    for failure in &report.summary.errors {
        println!("{}", format!("! {}: {}", failure.player, failure.error).red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_rows_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Rank\tChange\tPlayer").unwrap();
        writeln!(
            file,
            "1\t-\thttps://x/player/57945/a/\tSHI\tYu Qi\thttps://x/flags-svg/china.svg\t12\t110,397"
        )
        .unwrap();

        let detection = detect_file(file.path(), &AppConfig::new()).unwrap();

        assert_eq!(detection.players_found, 1);
        assert_eq!(detection.preview, vec!["Yu Qi SHI".to_string()]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = detect_file(&dir.path().join("absent.tsv"), &AppConfig::new()).unwrap_err();

        assert!(format!("{error:#}").starts_with("Failed to read"));
    }
}
