//! Content table loader.

use std::path::Path;

use tracing::debug;

use crate::loaders::{LoadResult, read_file};
use crate::packs::ContentTable;

/// Loader for content tables from RON files.
pub struct TableLoader;

impl TableLoader {
    /// Load a content table from a RON file.
    ///
    /// RON format: `Vec<ContentEntry>`
    pub fn load(path: &Path) -> LoadResult<ContentTable> {
        let content = read_file(path)?;
        ContentTable::from_ron(&content, &path.display().to_string())
    }

    /// Load `file_name` from an override directory, if present.
    pub fn load_override(dir: &Path, file_name: &str) -> LoadResult<Option<ContentTable>> {
        let path = dir.join(file_name);
        if !path.is_file() {
            return Ok(None);
        }
        let table = Self::load(&path)?;
        debug!(path = %path.display(), entries = table.len(), "override table loaded");
        Ok(Some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_override_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TableLoader::load_override(dir.path(), "races.ron").unwrap().is_none());
    }

    #[test]
    fn loads_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("races.ron"),
            r#"[(key: "Gnome", descriptor: "Gnome:Low-Light Vision:+2 constitution/-2 strength")]"#,
        )
        .unwrap();

        let table = TableLoader::load_override(dir.path(), "races.ron")
            .unwrap()
            .unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["Gnome"]);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feats.ron");
        std::fs::write(&path, "not ron").unwrap();
        let err = TableLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("feats.ron"));
    }
}
