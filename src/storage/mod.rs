//! Local storage for ancestry trees
//!
//! Persistent store with JSON serialization. Open the app → see all your
//! saved trees → pick one up where you left it.

use crate::error::Result;
use crate::tree::SerializedAncestryTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct TreeStore {
    pub trees: HashMap<String, SerializedAncestryTree>,
    pub path: PathBuf,
    pub metadata: StoreMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub owner: String,
    pub created_at: String,
    pub total_trees_ever: u64,
    pub total_cats_saved: u64,
}

impl TreeStore {
    pub fn open(path: impl AsRef<Path>, owner: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                if let Ok(store) = serde_json::from_str(&data) {
                    return store;
                }
            }
        }
        Self {
            trees: HashMap::new(),
            path,
            metadata: StoreMetadata {
                owner: owner.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
                total_trees_ever: 0,
                total_cats_saved: 0,
            },
        }
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Insert or overwrite a tree under its slug; returns the slug.
    pub fn put(&mut self, tree: SerializedAncestryTree) -> String {
        let slug = tree.slug.clone();
        if !self.trees.contains_key(&slug) {
            self.metadata.total_trees_ever += 1;
        }
        self.metadata.total_cats_saved += tree.cats.len() as u64;
        self.trees.insert(slug.clone(), tree);
        slug
    }

    pub fn get(&self, slug: &str) -> Option<&SerializedAncestryTree> {
        self.trees.get(slug)
    }

    pub fn remove(&mut self, slug: &str) -> Option<SerializedAncestryTree> {
        self.trees.remove(slug)
    }

    /// Trees ordered by most recent update.
    pub fn list_recent(&self) -> Vec<&SerializedAncestryTree> {
        let mut trees: Vec<&SerializedAncestryTree> = self.trees.values().collect();
        trees.sort_by_key(|t| std::cmp::Reverse(t.updated_at));
        trees
    }

    pub fn summary(&self) -> String {
        let total = self.trees.len();
        let cats: usize = self.trees.values().map(|t| t.cats.len()).sum();
        let deepest = self
            .trees
            .values()
            .flat_map(|t| t.cats.iter().map(|c| c.generation))
            .max()
            .unwrap_or(0);
        format!(
            "TreeStore '{}' | {} trees | {} cats | deepest generation {}",
            self.metadata.owner, total, cats, deepest
        )
    }
}
