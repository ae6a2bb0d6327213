//! Keyword lists driving address parsing.
//!
//! The built-in lexicon covers the Brazilian cities, neighborhoods and
//! establishment categories the parser recognizes out of the box. A YAML file
//! with the same shape can replace it at startup.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_CITIES: &[&str] = &[
    "rio de janeiro",
    "são paulo",
    "brasília",
    "salvador",
    "fortaleza",
    "belo horizonte",
    "manaus",
    "curitiba",
    "recife",
    "porto alegre",
    "goiânia",
    "belém",
    "guarulhos",
    "campinas",
    "nova iguaçu",
    "são bernardo do campo",
    "niterói",
    "florianópolis",
];

const DEFAULT_NEIGHBORHOODS: &[&str] = &[
    "copacabana",
    "ipanema",
    "leblon",
    "botafogo",
    "tijuca",
    "barra da tijuca",
    "centro",
    "zona sul",
    "zona norte",
    "vila olímpia",
    "pinheiros",
    "vila madalena",
    "morumbi",
];

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "restaurante",
        &["restaurante", "bar", "lanchonete", "pizzaria", "hamburgueria"],
    ),
    ("academia", &["academia", "fitness", "crossfit", "pilates"]),
    ("salão", &["salão", "barbershop", "barbearia", "cabeleireiro"]),
    ("loja", &["loja", "store", "boutique", "magazine"]),
    ("hotel", &["hotel", "pousada", "hostel"]),
    ("clínica", &["clínica", "consultório", "médico", "dentista"]),
];

/// One establishment category and the words that reveal it in an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered lookup lists. Order matters: the first hit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub cities: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub categories: Vec<CategoryKeywords>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            cities: DEFAULT_CITIES.iter().map(|s| (*s).to_string()).collect(),
            neighborhoods: DEFAULT_NEIGHBORHOODS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, keywords)| CategoryKeywords {
                    name: (*name).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl Lexicon {
    /// Lower-cases and trims every entry so lookups can compare against a
    /// lower-cased address directly.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |s: String| s.trim().to_lowercase();
        Self {
            cities: self.cities.into_iter().map(clean).collect(),
            neighborhoods: self.neighborhoods.into_iter().map(clean).collect(),
            categories: self
                .categories
                .into_iter()
                .map(|c| CategoryKeywords {
                    name: clean(c.name),
                    keywords: c.keywords.into_iter().map(clean).collect(),
                })
                .collect(),
        }
    }
}

/// Load, normalize and validate a lexicon from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_lexicon(path: &Path) -> Result<Lexicon, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LexiconFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let lexicon: Lexicon = serde_yaml::from_str(&content)?;
    let lexicon = lexicon.normalized();
    validate_lexicon(&lexicon)?;

    Ok(lexicon)
}

fn validate_lexicon(lexicon: &Lexicon) -> Result<(), ConfigError> {
    if lexicon.cities.is_empty() {
        return Err(ConfigError::Validation(
            "lexicon must list at least one city".to_string(),
        ));
    }
    if lexicon.neighborhoods.is_empty() {
        return Err(ConfigError::Validation(
            "lexicon must list at least one neighborhood".to_string(),
        ));
    }
    if lexicon.categories.is_empty() {
        return Err(ConfigError::Validation(
            "lexicon must list at least one category".to_string(),
        ));
    }

    if let Some(blank) = lexicon
        .cities
        .iter()
        .chain(&lexicon.neighborhoods)
        .find(|s| s.is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "lexicon contains a blank place name: '{blank}'"
        )));
    }

    let mut seen = HashSet::new();
    for category in &lexicon.categories {
        if category.name.is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{}'",
                category.name
            )));
        }
        if category.keywords.is_empty() || category.keywords.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(format!(
                "category '{}' needs at least one non-empty keyword",
                category.name
            )));
        }
    }

    Ok(())
}
