use strsim::jaro_winkler;

const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Similarity between the name that was searched for and the name Spotify
/// returned, case-insensitive.
pub fn name_similarity(query: &str, resolved: &str) -> f64 {
    jaro_winkler(&normalize(query), &normalize(resolved))
}

/// The first search hit is always accepted. This only tells the report that
/// the hit looks like a different artist.
pub fn is_suspicious_match(query: &str, resolved: &str) -> bool {
    name_similarity(query, resolved) < SIMILARITY_THRESHOLD
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_names_case_insensitive() {
        assert_eq!(name_similarity("Daft Punk", "daft punk"), 1.0);
        assert!(!is_suspicious_match("  Daft Punk ", "Daft Punk"));
    }

    #[test]
    fn test_minor_spelling_difference_is_not_suspicious() {
        let score = name_similarity("Beyonce", "Beyoncé");
        assert!(score > 0.85, "Score {} should be > 0.85", score);
        assert!(!is_suspicious_match("Sigur Ros", "Sigur Rós"));
    }

    #[test]
    fn test_different_artist_is_suspicious() {
        let score = name_similarity("The Nationals", "Kendrick Lamar");
        assert!(score < 0.85, "Score {} should be < 0.85", score);
        assert!(is_suspicious_match("The Nationals", "Kendrick Lamar"));
    }
}
