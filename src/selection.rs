//! Which series are on screen, and how each rendered line is styled.

use crate::models::Dataset;

/// Whether a series is part of the current display selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Styling class of a rendered line. Purely visual; independent of visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineClass {
    Active,
    #[default]
    Inactive,
}

/// Ordered, duplicate-free set of visible series keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySelection {
    keys: Vec<String>,
}

impl DisplaySelection {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sel = Self::default();
        sel.show(keys);
        sel
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn visibility(&self, key: &str) -> Visibility {
        if self.contains(key) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Append keys that are not yet visible. Returns the newly shown keys.
    pub fn show<I, S>(&mut self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for key in keys {
            let key = key.into();
            if !self.contains(&key) {
                self.keys.push(key.clone());
                added.push(key);
            }
        }
        added
    }

    /// Remove keys. Returns the keys that were actually visible.
    pub fn hide<I, S>(&mut self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = Vec::new();
        for key in keys {
            let key = key.as_ref();
            if let Some(pos) = self.keys.iter().position(|k| k == key) {
                removed.push(self.keys.remove(pos));
            }
        }
        removed
    }

    /// Replace the whole selection. Returns keys visible now but not before.
    pub fn replace<I, S>(&mut self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let previous = std::mem::take(&mut self.keys);
        self.show(keys)
            .into_iter()
            .filter(|k| !previous.contains(k))
            .collect()
    }

    /// Drop keys the dataset does not know. Returns the dropped keys.
    pub fn retain_known(&mut self, dataset: &Dataset) -> Vec<String> {
        let (kept, dropped): (Vec<String>, Vec<String>) =
            std::mem::take(&mut self.keys)
                .into_iter()
                .partition(|k| dataset.contains(k));
        self.keys = kept;
        dropped
    }
}
