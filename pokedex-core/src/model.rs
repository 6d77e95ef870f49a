//! Canonical catalog types

use serde::{Deserialize, Serialize};

/// Lightweight catalog record
///
/// `url` is the identity key. `id` is 0 when it could not be determined and
/// is not unique in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub image_url: String,
}

/// Image references of a detail record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub default: Option<String>,
    pub shiny: Option<String>,
    pub artwork_default: Option<String>,
    pub artwork_shiny: Option<String>,
    pub home_default: Option<String>,
}

/// Full record for one catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetails {
    pub id: u32,
    pub name: String,
    /// Decimeters
    pub height: u32,
    /// Hectograms
    pub weight: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub sprites: Sprites,
    pub species_url: Option<String>,
}

impl Entry {
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// `#25`, or the trailing url segment when the id is unknown
    pub fn number_label(&self) -> String {
        if self.id != 0 {
            return format!("#{}", self.id);
        }
        let segment = self
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        format!("#{segment}")
    }

    /// Selector label: `"25 Pikachu"`
    pub fn option_label(&self) -> String {
        format!("{} {}", self.id, self.display_name())
    }
}

impl EntryDetails {
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// `#025`
    pub fn number_label(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    /// Artwork for the detail view
    pub fn artwork(&self, shiny: bool) -> Option<&str> {
        if shiny {
            return self.sprites.artwork_shiny.as_deref();
        }
        self.sprites
            .artwork_default
            .as_deref()
            .or(self.sprites.default.as_deref())
    }
}

/// Upper-case the first character
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> EntryDetails {
        EntryDetails {
            id: 25,
            name: "pikachu".to_string(),
            height: 4,
            weight: 60,
            types: vec!["electric".to_string()],
            abilities: vec!["static".to_string(), "lightning-rod".to_string()],
            sprites: Sprites {
                default: Some("front.png".to_string()),
                shiny: Some("front-shiny.png".to_string()),
                artwork_default: None,
                artwork_shiny: Some("art-shiny.png".to_string()),
                home_default: None,
            },
            species_url: None,
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pikachu"), "Pikachu");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("mr-mime"), "Mr-mime");
    }

    #[test]
    fn test_number_label_falls_back_to_url() {
        let entry = Entry {
            id: 0,
            name: "pikachu".to_string(),
            url: "https://pokeapi.co/api/v2/pokemon/25/".to_string(),
            image_url: String::new(),
        };
        assert_eq!(entry.number_label(), "#25");

        let entry = Entry { id: 7, ..entry };
        assert_eq!(entry.number_label(), "#7");
        assert_eq!(entry.option_label(), "7 Pikachu");
    }

    #[test]
    fn test_detail_display_conversions() {
        let details = details();
        assert_eq!(details.number_label(), "#025");
        assert_eq!(details.weight_kg(), 6.0);
        assert_eq!(details.height_m(), 0.4);
    }

    #[test]
    fn test_artwork_falls_back_to_default_sprite() {
        let details = details();
        assert_eq!(details.artwork(false), Some("front.png"));
        assert_eq!(details.artwork(true), Some("art-shiny.png"));
    }
}
