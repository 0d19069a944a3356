//! Read-through cache of short theory snippets, one markdown file per topic.
//!
//! There is no process-wide instance: callers build a [`TheoryCache`] for a
//! root directory and pass it where commentary is wanted.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::DrillResult;

/// Where raw snippet text comes from.
pub trait SnippetSource: Send + Sync {
    /// `Ok(None)` when the topic has no snippet.
    fn load(&self, root: &Path, topic: &str) -> DrillResult<Option<String>>;
}

/// Reads `<root>/<topic>.md`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl SnippetSource for FsSource {
    fn load(&self, root: &Path, topic: &str) -> DrillResult<Option<String>> {
        let path = root.join(format!("{}.md", topic));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct TheoryCache {
    root: PathBuf,
    source: Box<dyn SnippetSource>,
    entries: RwLock<HashMap<String, Option<String>>>,
}

impl TheoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_source(root, Box::new(FsSource))
    }

    pub fn with_source(root: impl Into<PathBuf>, source: Box<dyn SnippetSource>) -> Self {
        TheoryCache {
            root: root.into(),
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First paragraph for `topic`, loaded on first use and kept for the
    /// life of the cache. Misses are cached too.
    pub fn snippet(&self, topic: &str) -> DrillResult<Option<String>> {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = entries.get(topic) {
                return Ok(hit.clone());
            }
        }

        let loaded = self
            .source
            .load(&self.root, topic)?
            .and_then(|text| first_paragraph(&text));
        log::debug!("theory {} loaded from {}", topic, self.root.display());

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Ok(entries.entry(topic.to_string()).or_insert(loaded).clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First block of prose, skipping markdown headings.
pub fn first_paragraph(text: &str) -> Option<String> {
    let para: Vec<&str> = text
        .lines()
        .map(str::trim)
        .skip_while(|l| l.is_empty() || l.starts_with('#'))
        .take_while(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    if para.is_empty() {
        None
    } else {
        Some(para.join(" "))
    }
}
