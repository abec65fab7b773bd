use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-memory set of favorited file names.
///
/// Starts empty and lives as long as the process. Membership is not checked
/// against the file store; entries are only pruned when a file is deleted.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    names: Arc<Mutex<HashSet<String>>>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. Adding an existing name is a no-op.
    pub fn add(&self, name: &str) {
        self.lock().insert(name.to_string());
    }

    /// Remove a name. Returns false if it was not a favorite.
    pub fn remove(&self, name: &str) -> bool {
        self.lock().remove(name)
    }

    #[cfg(test)]
    fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    /// Snapshot of the current favorites, sorted for stable output.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().iter().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A poisoned set is still a valid set
        self.names.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        assert!(Favorites::new().list().is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let favorites = Favorites::new();
        favorites.add("x.txt");
        favorites.add("x.txt");

        assert_eq!(favorites.list(), vec!["x.txt"]);
    }

    #[test]
    fn test_remove() {
        let favorites = Favorites::new();
        favorites.add("x.txt");

        assert!(favorites.remove("x.txt"));
        assert!(!favorites.contains("x.txt"));
        assert!(!favorites.remove("x.txt"));
    }

    #[test]
    fn test_remove_non_favorite_returns_false() {
        assert!(!Favorites::new().remove("never-added.txt"));
    }

    #[test]
    fn test_clones_share_state() {
        let favorites = Favorites::new();
        let clone = favorites.clone();
        clone.add("shared.txt");

        assert!(favorites.contains("shared.txt"));
    }

    #[test]
    fn test_list_sorted() {
        let favorites = Favorites::new();
        favorites.add("b.txt");
        favorites.add("a.txt");

        assert_eq!(favorites.list(), vec!["a.txt", "b.txt"]);
    }
}
