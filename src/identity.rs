// src/identity.rs
use uuid::Uuid;

/// Namespace for name-based file ids. Fixed forever: published ids are a
/// compatibility contract, changing this constant breaks every client that
/// stored one.
const FILE_NAMESPACE: Uuid = Uuid::from_u128(0x8c0f9e52_61b3_4bfa_9c64_2a07d3e1b5f4);

/// Stable public id for a file name: UUIDv5 over a fixed namespace. A pure
/// function of the name, independent of size, mtime and content.
pub fn file_id(name: &str) -> String {
    Uuid::new_v5(&FILE_NAMESPACE, name.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(file_id("bar.txt"), file_id("bar.txt"));
    }

    #[test]
    fn test_distinct_names_get_distinct_ids() {
        assert_ne!(file_id("bar.txt"), file_id("baz.txt"));
    }

    #[test]
    fn test_id_format() {
        let id = file_id("response.json");
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
    }

    #[test]
    fn test_id_ignores_content_shape() {
        // Same name always maps to the same id, no matter what is on disk.
        let first = file_id("report.csv");
        let second = file_id("report.csv");
        assert_eq!(first, second);
    }
}
