//! Card collections
//!
//! A [`Deck`] is immutable once built. The only public ways to obtain one are
//! [`Deck::from_config`] / [`Deck::from_json_str`], which run the import
//! validator first, or loading it back from the deck store.

use crate::error::Result;
use crate::uuid_utils;
use crate::validate::{self, CARDS_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single card: required title plus opaque display fields
///
/// Fields other than `title` (description, image, pose, anything custom) are
/// carried in `extra` and written back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Look up an extra field by name
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Convenience accessor for the common `description` field
    pub fn description(&self) -> Option<&str> {
        self.field("description").and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("title".to_string(), Value::String(self.title.clone()));
        Value::Object(map)
    }
}

/// Deck metadata of an incoming payload once it has passed validation
///
/// The card list is decoded separately from whichever key
/// [`validate::card_list`] picked, so a stray second list key is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeckConfig {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    cover_image: Option<String>,
}

/// A named, ordered collection of cards
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    id: String,
    name: String,
    cover_image: Option<String>,
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from a raw payload, assigning an id when it has none
    ///
    /// Fails with [`crate::Error::Validation`] listing every violated rule;
    /// nothing is constructed from an invalid payload.
    pub fn from_config(config: &Value) -> Result<Self> {
        validate::validate(config).into_result()?;

        let cards: Vec<Card> = match validate::card_list(config) {
            Some(list) => serde_json::from_value(list.clone())?,
            None => Vec::new(),
        };
        let meta: DeckConfig = serde_json::from_value(config.clone())?;
        Ok(Self {
            id: meta.id.unwrap_or_else(uuid_utils::new_deck_id),
            name: meta.name,
            cover_image: meta.cover_image,
            cards,
        })
    }

    /// Parse JSON text (file contents, pasted text) and build a deck from it
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Value = serde_json::from_str(text)?;
        Self::from_config(&config)
    }

    /// Reassemble a deck from its stored columns
    pub(crate) fn from_parts(
        id: String,
        name: String,
        cover_image: Option<String>,
        cards: Vec<Card>,
    ) -> Self {
        Self {
            id,
            name,
            cover_image,
            cards,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Serialized form: `{id, name, coverImage, options}`
    ///
    /// `coverImage` is always written, as `null` when the deck has none.
    pub fn to_config(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert(
            "coverImage".to_string(),
            self.cover_image.clone().map_or(Value::Null, Value::String),
        );
        map.insert(
            CARDS_KEY.to_string(),
            Value::Array(self.cards.iter().map(Card::to_value).collect()),
        );
        Value::Object(map)
    }
}
