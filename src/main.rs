use anyhow::Context;
use clap::Parser;
use inventory_manager::adapters::export;
use inventory_manager::config::cli::{Command, ExportFormat, ItemQuery};
use inventory_manager::utils::error::ErrorSeverity;
use inventory_manager::utils::logger;
use inventory_manager::{
    CliConfig, ConfigProvider, FileInventoryRepository, Inventory, InventoryError,
    InventoryManager, InventoryRecord, ItemDetails, ItemKind,
};
use std::sync::Arc;

type Manager = InventoryManager<FileInventoryRepository>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = cli.resolve().with_context(|| match &cli.config {
        Some(path) => format!("Failed to load config file '{}'", path.display()),
        None => "Invalid command-line settings".to_string(),
    })?;

    if cli.json_logs || config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::debug!("Resolved config: {:?}", config);

    let repository = FileInventoryRepository::with_scratch_dir(config.resolved_scratch_dir());
    let manager = InventoryManager::new(Arc::new(repository), config.inventory_path());

    if let Err(e) = run(cli.command, &manager).await {
        tracing::error!(
            "{} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: Command, manager: &Manager) -> Result<(), InventoryError> {
    match command {
        Command::List { kind, json } => {
            manager.load().await?;
            let inventory = manager.snapshot().await;
            if json {
                let records: Vec<&InventoryRecord> = selected_kinds(kind)
                    .flat_map(|k| inventory.records(k))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_inventory(&inventory, kind);
            }
        }
        Command::Find(ItemQuery {
            kind,
            title,
            platform,
        }) => {
            manager.load().await?;
            match manager.find(kind, &title, &platform).await? {
                Some((_, record)) => println!("{}", describe(&record)),
                None => println!("Could not find \"{}\" on \"{}\"", title, platform),
            }
        }
        Command::Add { item } => {
            load_or_start_empty(manager).await?;
            let record = item.into_record()?;
            let summary = describe(&record);
            manager.add(record).await?;
            manager.save().await?;
            println!("Added {}", summary);
        }
        Command::Modify {
            match_title,
            match_platform,
            item,
        } => {
            manager.load().await?;
            let record = item.into_record()?;
            match manager
                .find(record.kind(), &match_title, &match_platform)
                .await?
            {
                Some((key, _)) => {
                    let summary = describe(&record);
                    let previous = manager.modify(key, record).await?;
                    manager.save().await?;
                    println!("Replaced {}", describe(&previous));
                    println!("     with {}", summary);
                }
                None => println!("Could not find \"{}\" on \"{}\"", match_title, match_platform),
            }
        }
        Command::Remove(ItemQuery {
            kind,
            title,
            platform,
        }) => {
            manager.load().await?;
            match manager.find(kind, &title, &platform).await? {
                Some((key, _)) => {
                    let removed = manager.delete(key).await?;
                    manager.save().await?;
                    println!("Removed {}", describe(&removed));
                }
                None => println!("Could not find \"{}\" on \"{}\"", title, platform),
            }
        }
        Command::Compact => {
            let kept = manager.load().await?;
            manager.save().await?;
            println!(
                "Rewrote {} with {} records",
                manager.path().display(),
                kept
            );
        }
        Command::Export { format, output } => {
            manager.load().await?;
            let inventory = manager.snapshot().await;
            match format {
                ExportFormat::Csv => {
                    for path in export::export_csv(&inventory, &output)? {
                        println!("Wrote {}", path.display());
                    }
                }
                ExportFormat::Json => {
                    export::export_json(&inventory, &output)?;
                    println!("Wrote {}", output.display());
                }
            }
        }
    }

    Ok(())
}

async fn load_or_start_empty(manager: &Manager) -> Result<(), InventoryError> {
    if !manager.path().is_file() {
        tracing::warn!(
            "{} does not exist yet, starting a new inventory",
            manager.path().display()
        );
        return Ok(());
    }
    manager.load().await.map(|_| ())
}

fn selected_kinds(kind: Option<ItemKind>) -> impl Iterator<Item = ItemKind> {
    ItemKind::ALL
        .into_iter()
        .filter(move |k| kind.map_or(true, |wanted| wanted == *k))
}

fn print_inventory(inventory: &Inventory, kind: Option<ItemKind>) {
    for k in selected_kinds(kind) {
        let records = inventory.records(k);
        let heading = match k {
            ItemKind::Book => "Books",
            ItemKind::Movie => "Movies",
            ItemKind::VideoGame => "Video games",
        };
        println!("{} ({})", heading, records.len());
        for record in records {
            println!("  {}", describe(record));
        }
    }
}

fn describe(record: &InventoryRecord) -> String {
    let extra = match record.details() {
        ItemDetails::Book { author, publisher } => format!("by {} ({})", author, publisher),
        ItemDetails::Movie { director, duration } => {
            format!("dir. {}, {} min", director, duration.num_minutes())
        }
        ItemDetails::VideoGame { developer, rating } => {
            format!("{}, rated {}", developer, rating)
        }
    };

    format!(
        "{} [{}, {}] {} {} - {}",
        record.title(),
        record.platform(),
        record.release_year(),
        record.genre(),
        record.cost(),
        extra
    )
}
