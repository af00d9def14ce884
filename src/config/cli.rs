use crate::config::toml_config::InventoryConfig;
use crate::domain::model::{InventoryRecord, ItemInfo, ItemKind};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "inventory")]
#[command(about = "Manage a book, movie and video game inventory file")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Inventory file to work on (overrides the configuration)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Directory for temporary files written during a save
    #[arg(long, global = true)]
    pub scratch_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the inventory grouped by item kind
    List {
        #[arg(long)]
        kind: Option<ItemKind>,

        #[arg(long)]
        json: bool,
    },
    /// Look up an item by title and platform
    Find(ItemQuery),
    /// Add an item and save the inventory
    Add {
        #[command(subcommand)]
        item: NewItem,
    },
    /// Replace an item found by title and platform, then save the inventory
    Modify {
        /// Current title of the item to replace
        #[arg(long)]
        match_title: String,

        /// Current platform of the item to replace
        #[arg(long)]
        match_platform: String,

        /// New values; the kind must match the existing item
        #[command(subcommand)]
        item: NewItem,
    },
    /// Delete an item and save the inventory
    Remove(ItemQuery),
    /// Rewrite the inventory file, dropping lines that cannot be read
    Compact,
    /// Write the inventory out as CSV files or JSON
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Directory for CSV output, file for JSON output
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ItemQuery {
    #[arg(long)]
    pub kind: ItemKind,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct CommonItemArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, allow_negative_numbers = true)]
    pub cost: Decimal,

    #[arg(long)]
    pub genre: String,

    #[arg(long)]
    pub platform: String,

    #[arg(long = "year")]
    pub release_year: u32,
}

impl From<CommonItemArgs> for ItemInfo {
    fn from(args: CommonItemArgs) -> Self {
        ItemInfo {
            title: args.title,
            cost: args.cost,
            genre: args.genre,
            platform: args.platform,
            release_year: args.release_year,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum NewItem {
    Book {
        #[command(flatten)]
        common: CommonItemArgs,

        #[arg(long)]
        author: String,

        #[arg(long)]
        publisher: String,
    },
    Movie {
        #[command(flatten)]
        common: CommonItemArgs,

        #[arg(long)]
        director: String,

        /// Running time in whole minutes
        #[arg(long, allow_negative_numbers = true)]
        minutes: i32,
    },
    Game {
        #[command(flatten)]
        common: CommonItemArgs,

        #[arg(long)]
        developer: String,

        #[arg(long)]
        rating: f32,
    },
}

impl NewItem {
    pub fn into_record(self) -> Result<InventoryRecord> {
        match self {
            NewItem::Book {
                common,
                author,
                publisher,
            } => InventoryRecord::book(common.into(), author, publisher),
            NewItem::Movie {
                common,
                director,
                minutes,
            } => InventoryRecord::movie(common.into(), director, minutes),
            NewItem::Game {
                common,
                developer,
                rating,
            } => InventoryRecord::video_game(common.into(), developer, rating),
        }
    }
}

impl CliConfig {
    /// Loads the configuration file if one was given, then applies the
    /// command-line overrides and validates the result.
    pub fn resolve(&self) -> Result<InventoryConfig> {
        let mut config = match &self.config {
            Some(path) => InventoryConfig::from_file(path)?,
            None => InventoryConfig::default(),
        };

        if let Some(file) = &self.file {
            config.storage.inventory_path = file.clone();
        }
        if let Some(scratch_dir) = &self.scratch_dir {
            config.storage.scratch_dir = Some(scratch_dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use std::path::Path;

    #[test]
    fn test_parse_add_movie() {
        let cli = CliConfig::try_parse_from([
            "inventory", "--file", "shop.txt", "add", "movie", "--title", "Inception", "--cost",
            "12.99", "--genre", "Sci-Fi", "--platform", "Blu-ray", "--year", "2010",
            "--director", "Nolan", "--minutes", "148",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.inventory_path(), Path::new("shop.txt"));

        match cli.command {
            Command::Add { item } => {
                let record = item.into_record().unwrap();
                assert_eq!(
                    record.to_string(),
                    "Movie,Inception,12.99,Sci-Fi,Blu-ray,2010,Nolan,148"
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_modify_game() {
        let cli = CliConfig::try_parse_from([
            "inventory", "modify", "--match-title", "doom", "--match-platform", "pc", "game",
            "--title", "Doom", "--cost", "4.99", "--genre", "Action", "--platform", "PC",
            "--year", "1993", "--developer", "id Software", "--rating", "9.5",
        ])
        .unwrap();

        match cli.command {
            Command::Modify {
                match_title,
                match_platform,
                item,
            } => {
                assert_eq!(match_title, "doom");
                assert_eq!(match_platform, "pc");
                let record = item.into_record().unwrap();
                assert_eq!(record.kind(), ItemKind::VideoGame);
                assert_eq!(record.to_string(), "Game,Doom,4.99,Action,PC,1993,id Software,9.5");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_query_kind() {
        let cli = CliConfig::try_parse_from([
            "inventory", "find", "--kind", "game", "--title", "Doom", "--platform", "PC",
        ])
        .unwrap();

        match cli.command {
            Command::Find(query) => assert_eq!(query.kind, ItemKind::VideoGame),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = CliConfig::try_parse_from([
            "inventory", "find", "--kind", "vinyl", "--title", "x", "--platform", "y",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_rejects_empty_file() {
        // Either clap or the path validation refuses an empty file name.
        let rejected = CliConfig::try_parse_from(["inventory", "--file", "", "compact"])
            .map(|cli| cli.resolve().is_err())
            .unwrap_or(true);
        assert!(rejected);
    }
}
