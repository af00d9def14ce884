use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};

/// The three kinds of item the inventory tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    Book,
    Movie,
    VideoGame,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Book, ItemKind::Movie, ItemKind::VideoGame];

    /// Discriminator written as the first field of a serialized line.
    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::Book => "Book",
            ItemKind::Movie => "Movie",
            ItemKind::VideoGame => "Game",
        }
    }

    /// Strict lookup used by the line parser: only the exact tags match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Book" => Some(ItemKind::Book),
            "Movie" => Some(ItemKind::Movie),
            "Game" => Some(ItemKind::VideoGame),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Book => "book",
            ItemKind::Movie => "movie",
            ItemKind::VideoGame => "video game",
        };
        f.write_str(name)
    }
}

/// Lenient parsing for command-line input.
impl FromStr for ItemKind {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(kind) = ItemKind::from_tag(s) {
            return Ok(kind);
        }
        match s.to_ascii_lowercase().as_str() {
            "book" | "books" => Ok(ItemKind::Book),
            "movie" | "movies" => Ok(ItemKind::Movie),
            "game" | "games" | "videogame" | "video-game" => Ok(ItemKind::VideoGame),
            _ => Err(InventoryError::invalid_argument(
                "kind",
                format!("unknown item kind `{}` (expected book, movie or game)", s),
            )),
        }
    }
}

/// Attributes every inventory item carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInfo {
    pub title: String,
    pub cost: Decimal,
    pub genre: String,
    pub platform: String,
    pub release_year: u32,
}

/// Variant-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ItemDetails {
    Book {
        author: String,
        publisher: String,
    },
    Movie {
        director: String,
        #[serde(rename = "duration_minutes", serialize_with = "serialize_minutes")]
        duration: TimeDelta,
    },
    #[serde(rename = "Game")]
    VideoGame { developer: String, rating: f32 },
}

impl ItemDetails {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemDetails::Book { .. } => ItemKind::Book,
            ItemDetails::Movie { .. } => ItemKind::Movie,
            ItemDetails::VideoGame { .. } => ItemKind::VideoGame,
        }
    }
}

fn serialize_minutes<S: Serializer>(
    duration: &TimeDelta,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_minutes())
}

/// A single immutable inventory entry. Edits produce a new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRecord {
    #[serde(flatten)]
    info: ItemInfo,
    #[serde(flatten)]
    details: ItemDetails,
}

impl InventoryRecord {
    /// Builds a record, rejecting values the line format cannot carry back:
    /// a blank title, a movie duration that is not whole minutes, a
    /// non-finite rating.
    pub fn new(info: ItemInfo, details: ItemDetails) -> Result<Self> {
        validate_non_empty_string("title", &info.title)
            .map_err(|_| InventoryError::validation("Title is required."))?;

        match &details {
            ItemDetails::Movie { duration, .. } => {
                let whole_minutes = duration.num_seconds() % 60 == 0 && duration.subsec_nanos() == 0;
                let in_range = i32::try_from(duration.num_minutes()).is_ok();
                if !whole_minutes || !in_range {
                    return Err(InventoryError::validation(
                        "Duration must be a whole number of minutes.",
                    ));
                }
            }
            ItemDetails::VideoGame { rating, .. } if !rating.is_finite() => {
                return Err(InventoryError::validation("Rating must be a finite number."));
            }
            _ => {}
        }

        Ok(Self { info, details })
    }

    pub fn book(info: ItemInfo, author: impl Into<String>, publisher: impl Into<String>) -> Result<Self> {
        Self::new(
            info,
            ItemDetails::Book {
                author: author.into(),
                publisher: publisher.into(),
            },
        )
    }

    pub fn movie(info: ItemInfo, director: impl Into<String>, minutes: i32) -> Result<Self> {
        Self::new(
            info,
            ItemDetails::Movie {
                director: director.into(),
                duration: TimeDelta::minutes(i64::from(minutes)),
            },
        )
    }

    pub fn video_game(info: ItemInfo, developer: impl Into<String>, rating: f32) -> Result<Self> {
        Self::new(
            info,
            ItemDetails::VideoGame {
                developer: developer.into(),
                rating,
            },
        )
    }

    pub fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    pub fn info(&self) -> &ItemInfo {
        &self.info
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn cost(&self) -> Decimal {
        self.info.cost
    }

    pub fn genre(&self) -> &str {
        &self.info.genre
    }

    pub fn platform(&self) -> &str {
        &self.info.platform
    }

    pub fn release_year(&self) -> u32 {
        self.info.release_year
    }
}

/// Checks the fields an item needs before it is accepted into the working
/// set: every text field is present and free of line breaks. Loading from
/// disk only requires a title.
impl Validate for InventoryRecord {
    fn validate(&self) -> Result<()> {
        let required = |field: &str, value: &str, label: &str| -> Result<()> {
            validate_non_empty_string(field, value)
                .map_err(|_| InventoryError::validation(format!("{} is required.", label)))?;
            // A line break would split the record across two lines of the file.
            if value.contains(['\n', '\r']) {
                return Err(InventoryError::validation(format!(
                    "{} must fit on one line.",
                    label
                )));
            }
            Ok(())
        };

        required("title", &self.info.title, "Title")?;
        required("genre", &self.info.genre, "Genre")?;
        required("platform", &self.info.platform, "Platform")?;

        match &self.details {
            ItemDetails::Book { author, publisher } => {
                required("author", author, "Author")?;
                required("publisher", publisher, "Publisher")?;
            }
            ItemDetails::Movie { director, .. } => {
                required("director", director, "Director")?;
            }
            ItemDetails::VideoGame { developer, .. } => {
                required("developer", developer, "Developer")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(title: &str) -> ItemInfo {
        ItemInfo {
            title: title.to_string(),
            cost: Decimal::new(1299, 2),
            genre: "Sci-Fi".to_string(),
            platform: "Blu-ray".to_string(),
            release_year: 2010,
        }
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ItemKind::VideoGame.tag(), "Game");
        assert_eq!(ItemKind::from_tag("Game"), Some(ItemKind::VideoGame));
        assert_eq!(ItemKind::from_tag("game"), None);
        assert_eq!(ItemKind::from_tag("VideoGame"), None);
    }

    #[test]
    fn test_kind_from_str_is_lenient() {
        assert_eq!("book".parse::<ItemKind>().unwrap(), ItemKind::Book);
        assert_eq!("Movies".parse::<ItemKind>().unwrap(), ItemKind::Movie);
        assert_eq!("videogame".parse::<ItemKind>().unwrap(), ItemKind::VideoGame);
        assert!("vinyl".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let result = InventoryRecord::book(info("   "), "Tolstoy", "Penguin");
        assert!(matches!(result, Err(InventoryError::ValidationError { .. })));
    }

    #[test]
    fn test_partial_minute_duration_rejected() {
        let details = ItemDetails::Movie {
            director: "Nolan".to_string(),
            duration: TimeDelta::seconds(90),
        };
        assert!(InventoryRecord::new(info("Inception"), details).is_err());
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        assert!(InventoryRecord::video_game(info("Doom"), "id", f32::NAN).is_err());
        assert!(InventoryRecord::video_game(info("Doom"), "id", 9.5).is_ok());
    }

    #[test]
    fn test_validate_requires_variant_fields() {
        let record = InventoryRecord::movie(info("Inception"), "  ", 148).unwrap();
        let err = record.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Director is required.");

        let record = InventoryRecord::movie(info("Inception"), "Nolan", 148).unwrap();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_line_breaks() {
        let record = InventoryRecord::book(info("Dune\nBook,x"), "Herbert", "Chilton").unwrap();
        let err = record.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Title must fit on one line.");

        let record = InventoryRecord::video_game(info("Doom"), "id\rSoftware", 9.5).unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let record = InventoryRecord::movie(info("Inception"), "Nolan", 148).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kind"], "Movie");
        assert_eq!(value["title"], "Inception");
        assert_eq!(value["cost"], "12.99");
        assert_eq!(value["duration_minutes"], 148);
    }
}
