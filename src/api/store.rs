//! Bounded in-memory store for generated artifacts.
//!
//! Every grouping request writes a CSV and a spreadsheet under a shared stem
//! `coffee-<unix-nanos>`. The store keeps at most `capacity` files. Eviction
//! drops whole sets, oldest first, and never the set just stored.

use std::collections::{HashMap, VecDeque};

use axum::body::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

/// Content type served for CSV files.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Content type served for XLSX workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Maps a file extension to the content type it is served with.
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "csv" => CSV_CONTENT_TYPE,
        "xlsx" => XLSX_CONTENT_TYPE,
        _ => "application/octet-stream",
    }
}

/// A stored file.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    /// Content type the file is served with.
    pub content_type: &'static str,
    /// File contents.
    pub bytes: Bytes,
}

impl StoredArtifact {
    /// Creates a stored file, deriving the content type from `extension`.
    pub fn new(extension: &str, bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type_for(extension),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    files: HashMap<String, StoredArtifact>,
    /// File names of each stored set, oldest set first.
    sets: VecDeque<Vec<String>>,
}

/// Artifact store shared by all request handlers.
#[derive(Debug)]
pub struct ArtifactStore {
    capacity: usize,
    entries: RwLock<Entries>,
}

impl ArtifactStore {
    /// Creates an empty store holding at most `capacity` files.
    ///
    /// A set larger than `capacity` is still stored whole, alone.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Stores a set of files under one fresh stem and returns their names,
    /// in input order.
    ///
    /// The stem is the current time in nanoseconds, bumped until no file of
    /// the set collides with a stored one.
    pub async fn insert_set(&self, files: Vec<(&str, StoredArtifact)>) -> Vec<String> {
        let mut entries = self.entries.write().await;

        let mut nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        while files
            .iter()
            .any(|(extension, _)| entries.files.contains_key(&file_name(nanos, extension)))
        {
            nanos += 1;
        }

        let mut names = Vec::with_capacity(files.len());
        for (extension, artifact) in files {
            let name = file_name(nanos, extension);
            entries.files.insert(name.clone(), artifact);
            names.push(name);
        }
        entries.sets.push_back(names.clone());

        while entries.files.len() > self.capacity && entries.sets.len() > 1 {
            if let Some(evicted) = entries.sets.pop_front() {
                for name in evicted {
                    entries.files.remove(&name);
                    debug!(file = %name, "evicted artifact");
                }
            }
        }
        names
    }

    /// Looks up a stored file by name.
    pub async fn get(&self, name: &str) -> Option<StoredArtifact> {
        self.entries.read().await.files.get(name).cloned()
    }

    /// Number of files currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.files.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn file_name(nanos: i64, extension: &str) -> String {
    format!("coffee-{}.{}", nanos, extension)
}
