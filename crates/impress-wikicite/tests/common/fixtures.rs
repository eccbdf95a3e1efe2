//! Test fixture loading utilities

use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path() {
        let path = fixture_path("zotero_export.txt");
        assert!(path.to_string_lossy().contains("test_fixtures"));
        assert!(path.is_file());
        assert!(fixture_path("malformed.txt").is_file());
    }

    #[test]
    fn test_load_fixture() {
        let content = load_fixture("zotero_export.txt");
        assert!(content.contains("Cite journal"));
        assert_eq!(load_fixture("malformed.txt").lines().count(), 4);
    }
}
