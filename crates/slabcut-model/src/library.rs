//! The user's personal parts library.

use serde::{Deserialize, Serialize};

use crate::part::{short_id, Grain, Part};

/// A reusable part definition with catalogue metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryPart {
    pub id: String,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub grain: Grain,
    pub category: String,
    pub material: String,
    /// Material thickness in mm.
    pub thickness: f64,
    pub notes: String,
    pub tags: Vec<String>,
}

impl Default for LibraryPart {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            width: 0.0,
            height: 0.0,
            grain: Grain::None,
            category: String::new(),
            material: String::new(),
            thickness: 0.0,
            notes: String::new(),
            tags: Vec::new(),
        }
    }
}

impl LibraryPart {
    /// Creates a library part with a fresh 8-character id.
    pub fn new(label: impl Into<String>, width: f64, height: f64, grain: Grain) -> Self {
        Self {
            id: short_id(),
            label: label.into(),
            width,
            height,
            grain,
            ..Default::default()
        }
    }

    /// Converts to a project part with the given quantity and a new id.
    pub fn to_part(&self, quantity: u32) -> Part {
        Part::new(self.label.clone(), self.width, self.height, quantity).with_grain(self.grain)
    }
}

/// The persisted library: parts plus the category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsLibrary {
    pub parts: Vec<LibraryPart>,
    pub categories: Vec<String>,
}

impl Default for PartsLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PartsLibrary {
    /// An empty library seeded with the default category.
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            categories: vec!["General".to_string()],
        }
    }

    /// Adds a part; an empty category becomes "General" and new categories
    /// are registered.
    pub fn add_part(&mut self, mut part: LibraryPart) {
        if part.category.is_empty() {
            part.category = "General".to_string();
        }
        self.ensure_category(part.category.clone());
        self.parts.push(part);
    }

    /// Removes a part by id. Unknown ids are ignored.
    pub fn remove_part(&mut self, id: &str) {
        self.parts.retain(|p| p.id != id);
    }

    /// Replaces a part matched by id.
    pub fn update_part(&mut self, updated: LibraryPart) {
        if let Some(existing) = self.parts.iter_mut().find(|p| p.id == updated.id) {
            let category = updated.category.clone();
            *existing = updated;
            self.ensure_category(category);
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&LibraryPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Case-insensitive search over label, notes, and tags.
    pub fn search(&self, query: &str) -> Vec<&LibraryPart> {
        if query.is_empty() {
            return self.parts.iter().collect();
        }
        let q = query.to_lowercase();
        self.parts
            .iter()
            .filter(|p| {
                p.label.to_lowercase().contains(&q)
                    || p.notes.to_lowercase().contains(&q)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Parts in the given category; "" or "All" returns everything.
    pub fn filter_by_category(&self, category: &str) -> Vec<&LibraryPart> {
        if category.is_empty() || category == "All" {
            return self.parts.iter().collect();
        }
        self.parts.iter().filter(|p| p.category == category).collect()
    }

    /// Combined search and category filter.
    pub fn search_and_filter(&self, query: &str, category: &str) -> Vec<&LibraryPart> {
        let q = query.to_lowercase();
        self.filter_by_category(category)
            .into_iter()
            .filter(|p| {
                query.is_empty()
                    || p.label.to_lowercase().contains(&q)
                    || p.notes.to_lowercase().contains(&q)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Registers a category if it does not already exist.
    pub fn add_category(&mut self, category: impl Into<String>) {
        self.ensure_category(category.into());
    }

    fn ensure_category(&mut self, category: String) {
        if !self.categories.iter().any(|c| *c == category) {
            self.categories.push(category);
        }
    }
}
