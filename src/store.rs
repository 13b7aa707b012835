use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SUBDOMAINS_FILE: &str = "subdomains.txt";
pub const WAYBACK_FILE: &str = "waybackurls.txt";
pub const SENSITIVE_FILE: &str = "sensitive.txt";
pub const PARAMS_FILE: &str = "params.txt";

/// Per-domain result directory: `<root>/<domain>/`.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(root: &Path, domain: &str) -> Self {
        Self {
            dir: root.join(domain),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// True when the directory exists and holds at least one entry.
    pub fn is_populated(&self) -> bool {
        fs::read_dir(&self.dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create result directory {:?}", self.dir))
    }

    /// Writes `lines` in sorted order, newline-joined, replacing any previous file.
    pub fn write_lines(&self, name: &str, lines: &BTreeSet<String>) -> Result<PathBuf> {
        let path = self.path(name);
        let body = lines
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))?;

        info!(action = "write", component = "result_store", file_path = ?path, line_count = lines.len(), "Wrote result file");
        Ok(path)
    }

    pub fn read_lines(&self, name: &str) -> Result<Vec<String>> {
        let path = self.path(name);
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        Ok(crate::invoker::split_lines(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_population_check() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path(), "example.com");
        assert!(!store.is_populated());

        store.prepare().unwrap();
        assert!(!store.is_populated());

        store.write_lines(SUBDOMAINS_FILE, &set(&["a.example.com"])).unwrap();
        assert!(store.is_populated());
    }

    #[test]
    fn test_write_is_sorted_without_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path(), "example.com");
        store.prepare().unwrap();

        let path = store
            .write_lines(SUBDOMAINS_FILE, &set(&["c.example.com", "a.example.com", "b.example.com"]))
            .unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "a.example.com\nb.example.com\nc.example.com");
    }

    #[test]
    fn test_empty_set_writes_empty_file() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path(), "example.com");
        store.prepare().unwrap();

        let path = store.write_lines(SUBDOMAINS_FILE, &BTreeSet::new()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
        assert!(store.read_lines(SUBDOMAINS_FILE).unwrap().is_empty());
    }

    #[test]
    fn test_rewrite_replaces_previous_content() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path(), "example.com");
        store.prepare().unwrap();

        store.write_lines(WAYBACK_FILE, &set(&["https://old.example.com/"])).unwrap();
        store.write_lines(WAYBACK_FILE, &set(&["https://new.example.com/"])).unwrap();
        assert_eq!(
            store.read_lines(WAYBACK_FILE).unwrap(),
            vec!["https://new.example.com/".to_string()]
        );
    }

    #[test]
    fn test_read_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let store = ResultStore::new(tmp.path(), "example.com");
        assert!(store.read_lines(WAYBACK_FILE).is_err());
    }
}
