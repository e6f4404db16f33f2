//! CLI command implementations
//!
//! Output is line-oriented JSON on stdout so commands compose with
//! standard tooling; errors go to stderr via main.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::Engine;
use crate::model::{DailyFeatures, Namespace};
use crate::pipeline::Predictor;
use crate::records::RecordEngine;
use crate::registry::NamespaceRegistry;
use crate::tree::DecisionTree;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Snapshot file name inside the data directory
const SNAPSHOT_FILE: &str = "auradb.snapshot";

/// Parses arguments, builds a runtime, and dispatches the command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_command(cli.command))
}

/// Dispatches one parsed command.
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { data } => init(&data).await,
        Command::Log { data, day, json } => log(&data, &day, json).await,
        Command::Predict { data, json, tree } => predict(&data, json, tree).await,
        Command::Show { data, namespace } => show(&data, &namespace).await,
        Command::Count { data, namespace } => count(&data, &namespace).await,
    }
}

fn open_records(data: &Path) -> CliResult<Arc<RecordEngine>> {
    fs::create_dir_all(data)?;
    let engine = Engine::open(data.join(SNAPSHOT_FILE))?;
    let registry = Arc::new(NamespaceRegistry::new(engine));
    Ok(Arc::new(RecordEngine::new(registry)))
}

fn parse_namespace(name: &str) -> CliResult<Namespace> {
    name.parse().map_err(CliError::Usage)
}

fn read_snapshot_json(json: Option<String>) -> CliResult<DailyFeatures> {
    let text = match json {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&text)?)
}

/// `init`: create the data directory and every namespace.
pub async fn init(data: &Path) -> CliResult<()> {
    let records = open_records(data)?;
    records.registry().ensure(Namespace::General).await?;

    let engine = records.registry().engine();
    println!(
        "{}",
        serde_json::json!({
            "data_dir": data.display().to_string(),
            "version": engine.current_version().await,
            "namespaces": engine.store_names().await,
        })
    );
    Ok(())
}

/// `log`: upsert one daily snapshot under its day key.
pub async fn log(data: &Path, day: &str, json: Option<String>) -> CliResult<()> {
    let features = read_snapshot_json(json)?;
    let records = open_records(data)?;
    let predictor = Predictor::with_bundled_tree(Arc::clone(&records))?;

    let stored = predictor.log_snapshot(day, &features).await?;
    println!("{}", serde_json::to_string(&stored.to_row()?)?);
    Ok(())
}

/// `predict`: score a snapshot and print the full prediction.
pub async fn predict(
    data: &Path,
    json: Option<String>,
    tree: Option<PathBuf>,
) -> CliResult<()> {
    let features = read_snapshot_json(json)?;
    let records = open_records(data)?;

    let predictor = match tree {
        Some(path) => Predictor::new(records, DecisionTree::from_file(path)?),
        None => Predictor::with_bundled_tree(records)?,
    };

    let prediction = predictor.predict(&features).await?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

/// `show`: dump every record in a namespace, one JSON line each.
pub async fn show(data: &Path, namespace: &str) -> CliResult<()> {
    let ns = parse_namespace(namespace)?;
    let records = open_records(data)?;

    for record in records.read_all(ns).await? {
        println!("{}", serde_json::to_string(&record.to_row()?)?);
    }
    Ok(())
}

/// `count`: print the record count of a namespace.
pub async fn count(data: &Path, namespace: &str) -> CliResult<()> {
    let ns = parse_namespace(namespace)?;
    let records = open_records(data)?;

    println!(
        "{}",
        serde_json::json!({ "namespace": ns.as_str(), "count": records.count(ns).await? })
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_all_namespaces() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("db");
        init(&data).await.unwrap();

        let records = open_records(&data).unwrap();
        let names = records.registry().engine().store_names().await;
        assert_eq!(names.len(), Namespace::ALL.len());
    }

    #[tokio::test]
    async fn test_log_then_count() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("db");
        let snapshot = serde_json::to_string(&DailyFeatures::default()).unwrap();

        log(&data, "2024-05-01", Some(snapshot)).await.unwrap();

        let records = open_records(&data).unwrap();
        assert_eq!(records.count(Namespace::General).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_namespace_is_usage_error() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("db");
        let err = show(&data, "bogus").await.unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }
}
