//! Attribute table: the public attribute names a query may use and the
//! internal field paths they resolve to.
//!
//! The table is a rename map, not just an allow-list. `doi` resolves to
//! `related_publications__doi`, a path across a relation; the lexer emits the
//! path, never the typed name.
//!
//! Tables are fixed once built. A table can be declared in TOML:
//!
//! ```toml
//! [[attribute]]
//! name = "lab"
//! path = "lab"
//!
//! [[attribute]]
//! name = "electrodes"
//! path = "number_of_electrodes"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Words the grammar claims for itself.
pub const RESERVED_WORDS: [&str; 4] = ["and", "or", "in", "not"];

/// Attributes of the dataset search deployment, in declaration order.
pub const DEFAULT_ATTRIBUTES: [(&str, &str); 7] = [
    ("keyword", "keywords__keyword"),
    ("lab", "lab"),
    ("institution", "institution"),
    ("doi", "related_publications__doi"),
    ("experimenter", "experimenter"),
    ("units", "units"),
    ("electrodes", "number_of_electrodes"),
];

/// Errors raised while building an attribute table.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid attribute name '{0}': expected an ASCII identifier")]
    InvalidName(String),

    #[error("attribute name '{0}' is a reserved word")]
    ReservedName(String),

    #[error("attribute '{0}' is declared more than once")]
    Duplicate(String),

    #[error("attribute '{0}' has an empty field path")]
    EmptyPath(String),

    #[error("invalid schema file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot read schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot compile attribute pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One `(public name, internal field path)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub path: String,
}

#[derive(Deserialize)]
struct SchemaFile {
    #[serde(rename = "attribute", default)]
    attributes: Vec<Attribute>,
}

/// Ordered, case-insensitive mapping from attribute names to field paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
    entries: Vec<Attribute>,
    /// Lowercased name to index into `entries`
    index: HashMap<String, usize>,
}

impl AttributeTable {
    /// Build a table from `(name, path)` pairs, validating every entry.
    pub fn new<I, N, P>(pairs: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        let attributes = pairs.into_iter().map(|(name, path)| Attribute {
            name: name.into(),
            path: path.into(),
        });
        Self::from_attributes(attributes)
    }

    fn from_attributes(attributes: impl IntoIterator<Item = Attribute>) -> Result<Self, SchemaError> {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for attribute in attributes {
            validate(&attribute)?;

            let key = attribute.name.to_ascii_lowercase();
            if index.contains_key(&key) {
                return Err(SchemaError::Duplicate(attribute.name));
            }
            index.insert(key, entries.len());
            entries.push(attribute);
        }

        Ok(AttributeTable { entries, index })
    }

    /// Parse a table from a TOML document with `[[attribute]]` entries.
    pub fn from_toml_str(source: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(source)?;
        Self::from_attributes(file.attributes)
    }

    /// Load a TOML table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Resolve a public attribute name (any case) to its field path.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| self.entries[i].path.as_str())
    }

    pub fn entries(&self) -> &[Attribute] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AttributeTable {
    fn default() -> Self {
        let entries: Vec<Attribute> = DEFAULT_ATTRIBUTES
            .iter()
            .map(|(name, path)| Attribute {
                name: name.to_string(),
                path: path.to_string(),
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.to_ascii_lowercase(), i))
            .collect();
        AttributeTable { entries, index }
    }
}

fn validate(attribute: &Attribute) -> Result<(), SchemaError> {
    let name = attribute.name.as_str();

    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SchemaError::InvalidName(attribute.name.clone()));
    }

    if RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
    {
        return Err(SchemaError::ReservedName(attribute.name.clone()));
    }

    if attribute.path.trim().is_empty() {
        return Err(SchemaError::EmptyPath(attribute.name.clone()));
    }

    Ok(())
}
