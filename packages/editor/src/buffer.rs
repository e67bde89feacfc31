//! # Buffers
//!
//! A buffer is one named source text with a language tag. Buffers are
//! grouped into a [`Buffers`] set whose names are unique and fixed once
//! the set is built.

use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language mode of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Javascript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::Javascript => "javascript",
        }
    }

    /// Guess the language from a file name extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = name.rsplit('.').next()?.to_ascii_lowercase();
        match extension.as_str() {
            "html" | "htm" => Some(Language::Html),
            "css" => Some(Language::Css),
            "js" | "mjs" => Some(Language::Javascript),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Language::Html),
            "css" => Ok(Language::Css),
            "javascript" | "js" => Ok(Language::Javascript),
            other => Err(EditorError::UnknownLanguage(other.to_string())),
        }
    }
}

/// One named, independently editable source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffer {
    /// Stable identity, e.g. `index.html`
    pub name: String,

    pub language: Language,

    /// Current text
    pub value: String,
}

impl Buffer {
    pub fn new(name: impl Into<String>, language: Language, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language,
            value: value.into(),
        }
    }
}

/// Ordered set of buffers with unique names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffers {
    items: Vec<Buffer>,
}

impl Buffers {
    /// Build a set, rejecting duplicate names
    pub fn new(items: Vec<Buffer>) -> Result<Self, EditorError> {
        for (i, buffer) in items.iter().enumerate() {
            if items[..i].iter().any(|b| b.name == buffer.name) {
                return Err(EditorError::DuplicateBuffer(buffer.name.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Caller guarantees distinct names
    pub(crate) fn from_unique(items: Vec<Buffer>) -> Self {
        Self { items }
    }

    pub fn get(&self, name: &str) -> Option<&Buffer> {
        self.items.iter().find(|b| b.name == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|b| b.name == name)
    }

    /// Buffer at a position previously returned by `index_of`
    pub(crate) fn at(&self, index: usize) -> &Buffer {
        &self.items[index]
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Buffer> {
        self.items.iter_mut().find(|b| b.name == name)
    }

    /// Text of a buffer, empty if the name is unknown
    pub fn value(&self, name: &str) -> &str {
        self.get(name).map(|b| b.value.as_str()).unwrap_or("")
    }

    /// First buffer with the given language
    pub fn by_language(&self, language: Language) -> Option<&Buffer> {
        self.items.iter().find(|b| b.language == language)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|b| b.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Buffer> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Buffers {
    type Item = &'a Buffer;
    type IntoIter = std::slice::Iter<'a, Buffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_file_name() {
        assert_eq!(Language::from_file_name("index.html"), Some(Language::Html));
        assert_eq!(Language::from_file_name("style.CSS"), Some(Language::Css));
        assert_eq!(Language::from_file_name("script.js"), Some(Language::Javascript));
        assert_eq!(Language::from_file_name("README"), None);
    }

    #[test]
    fn test_language_serializes_lowercase() {
        let json = serde_json::to_string(&Language::Javascript).unwrap();
        assert_eq!(json, "\"javascript\"");
        assert_eq!("css".parse::<Language>().unwrap(), Language::Css);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Buffers::new(vec![
            Buffer::new("a.js", Language::Javascript, ""),
            Buffer::new("a.js", Language::Javascript, ""),
        ]);

        assert_eq!(result, Err(EditorError::DuplicateBuffer("a.js".to_string())));
    }

    #[test]
    fn test_lookup_by_language() {
        let buffers = Buffers::new(vec![
            Buffer::new("page.html", Language::Html, "<p></p>"),
            Buffer::new("app.js", Language::Javascript, "run()"),
        ])
        .unwrap();

        assert_eq!(buffers.by_language(Language::Javascript).unwrap().name, "app.js");
        assert!(buffers.by_language(Language::Css).is_none());
        assert_eq!(buffers.value("missing"), "");
    }
}
