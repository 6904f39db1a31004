use sha2::{Digest, Sha256};

/// Compute the SHA-256 fingerprint of a migration's raw content.
///
/// The digest covers every byte of the content, so any edit to an applied
/// migration (including whitespace) yields a different fingerprint.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash("hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_hash_is_deterministic() {
        let sql = "CREATE TABLE films (id SERIAL PRIMARY KEY);\n";
        assert_eq!(compute_hash(sql), compute_hash(sql));
        assert_eq!(compute_hash(sql).len(), 64);
    }

    #[test]
    fn test_single_byte_change_changes_hash() {
        let original = compute_hash("CREATE TABLE films (id INT);");
        let edited = compute_hash("CREATE TABLE films (id INT) ;");
        let trailing_newline = compute_hash("CREATE TABLE films (id INT);\n");
        assert_ne!(original, edited);
        assert_ne!(original, trailing_newline);
    }

    #[test]
    fn test_empty_content_has_hash() {
        assert_eq!(
            compute_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
