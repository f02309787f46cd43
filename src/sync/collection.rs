use crate::classifier::ParsedError;
use crate::models::Identified;

/// Locally cached view of one server-side collection
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCollection<T> {
    /// Server order, as last fetched
    pub items: Vec<T>,
    /// A fetch is in flight
    pub loading: bool,
    /// Failure of the most recent fetch; cleared when the next one starts
    pub error: Option<ParsedError>,
}

impl<T> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified> ResourceCollection<T> {
    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the item with the same id; no-op when absent
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }
}
