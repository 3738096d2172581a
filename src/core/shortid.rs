//! Short references for easier record selection
//!
//! `list` numbers the rows it prints as `@1`, `@2`, ... and stores the
//! mapping so the next `show`, `edit` or `delete` can use the alias.

use std::collections::HashMap;
use std::fs;

use crate::core::identity::RecordId;
use crate::core::project::Project;

/// Index file name inside the project directory
const INDEX_FILE: &str = "shortids.json";

/// A mapping of short references (@N) to record IDs
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    /// Maps short number to full record ID string
    entries: HashMap<u32, String>,
    /// Maps full record ID to short number (reverse lookup)
    #[serde(skip)]
    reverse: HashMap<String, u32>,
    /// Next available short ID
    next_id: u32,
}

impl ShortIdIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Load the index from a project, or create empty if not found
    pub fn load(project: &Project) -> Self {
        let path = project.project_dir().join(INDEX_FILE);
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(mut index) = serde_json::from_str::<ShortIdIndex>(&content) {
                index.reverse = index.entries.iter().map(|(k, v)| (v.clone(), *k)).collect();
                return index;
            }
        }
        Self::new()
    }

    /// Save the index to a project
    pub fn save(&self, project: &Project) -> std::io::Result<()> {
        let dir = project.project_dir();
        fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(INDEX_FILE), content)
    }

    /// Clear and rebuild the index in listing order
    pub fn rebuild<'a>(&mut self, ids: impl IntoIterator<Item = &'a RecordId>) {
        self.entries.clear();
        self.reverse.clear();
        self.next_id = 1;

        for id in ids {
            self.add(id);
        }
    }

    /// Add a record ID and return its short number
    pub fn add(&mut self, id: &RecordId) -> u32 {
        let key = id.to_string();
        if let Some(&short_id) = self.reverse.get(&key) {
            return short_id;
        }

        let short_id = self.next_id;
        self.next_id += 1;
        self.entries.insert(short_id, key.clone());
        self.reverse.insert(key, short_id);
        short_id
    }

    /// Resolve a short reference to a full record ID
    ///
    /// `@N` and plain numbers are looked up; anything else is passed
    /// through for id or prefix matching.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        let num_str = if let Some(rest) = reference.strip_prefix('@') {
            rest
        } else if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
            reference
        } else {
            return Some(reference.to_string());
        };

        num_str
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n).cloned())
    }

    /// Get the short number for a record
    pub fn get_short_id(&self, id: &RecordId) -> Option<u32> {
        self.reverse.get(&id.to_string()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_short_id_add_and_resolve() {
        let mut index = ShortIdIndex::new();
        let a = RecordId::new();
        let b = RecordId::new();

        assert_eq!(index.add(&a), 1);
        assert_eq!(index.add(&b), 2);

        assert_eq!(index.resolve("@1"), Some(a.to_string()));
        assert_eq!(index.resolve("@2"), Some(b.to_string()));
        assert_eq!(index.resolve("1"), Some(a.to_string()));
        assert_eq!(index.resolve("@99"), None);
    }

    #[test]
    fn test_short_id_passthrough() {
        let index = ShortIdIndex::new();
        assert_eq!(index.resolve("TRN-01ABC"), Some("TRN-01ABC".to_string()));
    }

    #[test]
    fn test_short_id_rebuild() {
        let mut index = ShortIdIndex::new();
        index.add(&RecordId::new());
        index.add(&RecordId::new());

        let fresh: Vec<RecordId> = (0..3).map(|_| RecordId::new()).collect();
        index.rebuild(&fresh);

        assert_eq!(index.resolve("@4"), None);
        assert_eq!(index.resolve("@1"), Some(fresh[0].to_string()));
        assert_eq!(index.resolve("@3"), Some(fresh[2].to_string()));
        assert_eq!(index.get_short_id(&fresh[1]), Some(2));
    }

    #[test]
    fn test_short_id_no_duplicates() {
        let mut index = ShortIdIndex::new();
        let id = RecordId::new();
        assert_eq!(index.add(&id), index.add(&id));
        assert_eq!(index.resolve("@2"), None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = tempdir().unwrap();
        let project = Project::at(tmp.path());
        let id = RecordId::new();

        let mut index = ShortIdIndex::new();
        index.add(&id);
        index.save(&project).unwrap();

        let loaded = ShortIdIndex::load(&project);
        assert_eq!(loaded.resolve("@1"), Some(id.to_string()));
        assert_eq!(loaded.get_short_id(&id), Some(1));
    }
}
