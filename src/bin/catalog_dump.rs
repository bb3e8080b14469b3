use anyhow::{Context, Result};
use std::env;
use tracing::info;

use tablecatalog::config::{db_folder_from_env, ENV_DB_FOLDER};
use tablecatalog::CatalogStore;

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == name {
            return args.get(i + 1).cloned();
        }
        if let Some(v) = args[i].strip_prefix(&format!("{}=", name)) {
            return Some(v.to_string());
        }
        i += 1;
    }
    None
}

fn main() -> Result<()> {
    // Initialize tracing subscriber with env filter if provided
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .context("log filter")?;
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();

    let args: Vec<String> = env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("catalog_dump\n\nUSAGE:\n  catalog_dump [--db-folder PATH] [--table NAME] [--summary]\n\nOPTIONS:\n  --db-folder PATH    Catalog root folder (env: {}, default dbs/catalog)\n  --table NAME        Dump only this table\n  --summary           One line per table instead of JSON\n", ENV_DB_FOLDER);
        return Ok(());
    }

    // CLI arguments override environment
    let root = parse_str_arg(&args, "--db-folder").unwrap_or_else(db_folder_from_env);
    // Inspection only: never create the folder or write default settings
    let store = CatalogStore::open_existing(&root).with_context(|| format!("open catalog at '{}'", root))?;
    info!(target: "tablecatalog", "catalog_dump: root='{}' tables={}", root, store.len());

    let views = match parse_str_arg(&args, "--table") {
        Some(name) => vec![store.table_by_name(&name)?],
        None => store.tables()?,
    };

    if has_flag(&args, "--summary") {
        for v in &views {
            println!(
                "{}\t{}\t{}\t{}\tid_col={}\tcolumns={}",
                v.id(),
                v.name(),
                v.table_kind(),
                v.storage_location(),
                v.identifier_column(),
                v.column_names().join(",")
            );
        }
    } else {
        let json = serde_json::to_string_pretty(&views).context("encode views")?;
        println!("{}", json);
    }
    Ok(())
}
