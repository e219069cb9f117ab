//! Purpose: Document model and resolver for JSON display-mode tables.
//! Exports: `Config`, `ModeEntry`, `Mode`, `resolve_path`, reserved key names.
//! Role: Owns the parsed tree and answers the default-mode lookup chain.
//! Invariants: The document is immutable after parse; lookups never mutate.
//! Invariants: The reserved `default` key must name another root entry.
//! Invariants: Every failure carries the offending key or path in the error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::{Error, ErrorKind};
use crate::json;

/// Reserved root key naming the active entry.
pub const DEFAULT_KEY: &str = "default";
/// Width field of a mode entry, in pixels.
pub const WIDTH_KEY: &str = "w";
/// Height field of a mode entry, in pixels.
pub const HEIGHT_KEY: &str = "h";

/// A parsed mode table: named entries plus the reserved `default` pointer.
///
/// The table is read once and never mutated; every accessor borrows from the
/// parsed tree. Independent `Config` values may be used from different
/// threads concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: Map<String, Value>,
}

/// Borrowed view of one named entry in the table.
#[derive(Debug, Clone, Copy)]
pub struct ModeEntry<'a> {
    name: &'a str,
    fields: &'a Map<String, Value>,
}

/// A fully resolved width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mode {
    pub width: u32,
    pub height: u32,
}

impl Config {
    /// Opens, reads, and parses a mode table from disk.
    ///
    /// The file handle lives only for the duration of this call and is
    /// released on every exit path, including parse failure.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let mut file = File::open(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("cannot open mode table")
                .with_path(path)
                .with_source(err)
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("cannot read mode table")
                .with_path(path)
                .with_source(err)
        })?;
        Self::from_slice(&bytes).map_err(|err| err.with_path(path))
    }

    /// Reads a mode table from an arbitrary byte stream.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("cannot read mode table stream")
                .with_source(err)
        })?;
        Self::from_slice(&bytes)
    }

    /// Parses a mode table from in-memory text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Self::from_root(json::parse::from_str(text).map_err(parse_error)?)
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_root(json::parse::from_slice(bytes).map_err(parse_error)?)
    }

    fn from_root(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(Error::new(ErrorKind::TypeMismatch).with_message(format!(
                "mode table root must be an object, got {}",
                value_type(&other)
            ))),
        }
    }

    /// Name of the active entry, read from the reserved `default` key.
    pub fn default_name(&self) -> Result<&str, Error> {
        self.default_name_under(DEFAULT_KEY)
    }

    /// Same lookup under an alternate reserved key.
    pub fn default_name_under(&self, key: &str) -> Result<&str, Error> {
        let value = self.root.get(key).ok_or_else(|| {
            Error::new(ErrorKind::MissingKey)
                .with_message("reserved default key is absent")
                .with_key(key)
        })?;
        value.as_str().ok_or_else(|| {
            Error::new(ErrorKind::TypeMismatch)
                .with_message(format!(
                    "default key must name an entry, got {}",
                    value_type(value)
                ))
                .with_key(key)
        })
    }

    /// Looks up one named entry in the table.
    pub fn entry<'a>(&'a self, name: &'a str) -> Result<ModeEntry<'a>, Error> {
        let value = self.root.get(name).ok_or_else(|| {
            Error::new(ErrorKind::MissingKey)
                .with_message("no entry with this name")
                .with_key(name)
                .with_hint(self.known_names_hint())
        })?;
        match value {
            Value::Object(fields) => Ok(ModeEntry { name, fields }),
            other => Err(Error::new(ErrorKind::TypeMismatch)
                .with_message(format!(
                    "entry must be an object, got {}",
                    value_type(other)
                ))
                .with_key(name)),
        }
    }

    /// Runs the full lookup chain: default name, then that entry's pair.
    pub fn resolve(&self) -> Result<Mode, Error> {
        let name = self.default_name()?;
        let entry = self.entry(name)?;
        Ok(Mode {
            width: entry.width()?,
            height: entry.height()?,
        })
    }

    /// Entry names in document order, excluding the reserved key.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.root
            .keys()
            .map(String::as_str)
            .filter(|name| *name != DEFAULT_KEY)
    }

    /// Re-serializable view of the whole table.
    pub fn to_json(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Compact JSON text of the whole table.
    pub fn to_json_string(&self) -> Result<String, Error> {
        json::parse::to_string(&self.root).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("cannot encode mode table")
                .with_source(err)
        })
    }

    fn known_names_hint(&self) -> String {
        let names: Vec<&str> = self.names().collect();
        if names.is_empty() {
            "The table has no entries.".to_string()
        } else {
            format!("Known entries: {}.", names.join(", "))
        }
    }
}

impl ModeEntry<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// The `w` field, in pixels.
    pub fn width(&self) -> Result<u32, Error> {
        self.dimension(WIDTH_KEY)
    }

    /// The `h` field, in pixels.
    pub fn height(&self) -> Result<u32, Error> {
        self.dimension(HEIGHT_KEY)
    }

    fn dimension(&self, key: &str) -> Result<u32, Error> {
        let value = self.fields.get(key).ok_or_else(|| {
            Error::new(ErrorKind::MissingKey)
                .with_message(format!("entry `{}` lacks this field", self.name))
                .with_key(key)
        })?;
        let number = value.as_u64().ok_or_else(|| {
            Error::new(ErrorKind::TypeMismatch)
                .with_message(format!(
                    "`{key}` of entry `{}` must be an unsigned integer, got {}",
                    self.name,
                    value_type(value)
                ))
                .with_key(key)
        })?;
        u32::try_from(number).map_err(|_| {
            Error::new(ErrorKind::TypeMismatch)
                .with_message(format!(
                    "`{key}` of entry `{}` exceeds the pixel range",
                    self.name
                ))
                .with_key(key)
        })
    }
}

/// One-shot resolution: open the table at `path` and resolve its default mode.
pub fn resolve_path(path: &Path) -> Result<Mode, Error> {
    Config::from_path(path)?.resolve()
}

fn parse_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Parse)
        .with_message("mode table is not well-formed JSON")
        .with_source(err)
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
