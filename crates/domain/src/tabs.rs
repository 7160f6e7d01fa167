//! Selection model behind a tab switch control.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabItem {
    pub id: String,
    pub text: String,
}

impl TabItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// An ordered set of tabs with exactly one selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSwitch {
    items: Vec<TabItem>,
    selected: usize,
}

impl TabSwitch {
    /// Creates a switch with the first item selected.
    ///
    /// # Errors
    /// Fails on an empty list or repeated ids.
    pub fn new(items: Vec<TabItem>) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::EmptyTabs);
        }
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(DomainError::DuplicateTab(item.id.clone()));
            }
        }
        Ok(Self { items, selected: 0 })
    }

    pub fn items(&self) -> &[TabItem] {
        &self.items
    }

    pub fn selected(&self) -> &TabItem {
        &self.items[self.selected]
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected().id == id
    }

    /// Selects the tab with `id`, returning whether the selection changed.
    ///
    /// # Errors
    /// Returns `UnknownTab` if no tab has that id.
    pub fn select(&mut self, id: &str) -> Result<bool, DomainError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DomainError::UnknownTab(id.to_string()))?;
        let changed = index != self.selected;
        self.selected = index;
        Ok(changed)
    }
}
