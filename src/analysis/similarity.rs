//! Edit-distance similarity and duplicate detection against a user's bookmarks.

use crate::bookmarks::Bookmark;

use super::types::DuplicateAssessment;

/// Overall similarity above this marks a new bookmark as a duplicate
pub const DUPLICATE_THRESHOLD: f64 = 0.8;

const DOMAIN_WEIGHT: f64 = 0.6;
const TITLE_WEIGHT: f64 = 0.4;

/// Levenshtein distance over chars, using the full `(|b|+1) x (|a|+1)` table.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=a.len() {
        matrix[0][j] = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            matrix[i][j] = if b[i - 1] == a[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                (matrix[i - 1][j - 1] + 1)
                    .min(matrix[i][j - 1] + 1)
                    .min(matrix[i - 1][j] + 1)
            };
        }
    }

    matrix[b.len()][a.len()]
}

/// Similarity in `[0, 1]`: 1 for identical strings, 0 when either side is empty.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let (longer, shorter, longer_len) = if a_len > b_len {
        (a, b, a_len)
    } else {
        (b, a, b_len)
    };

    let distance = levenshtein_distance(longer, shorter);
    (longer_len - distance) as f64 / longer_len as f64
}

/// A score has to strictly exceed the threshold.
pub fn is_duplicate_score(similarity: f64, threshold: f64) -> bool {
    similarity > threshold
}

fn hostname(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .map(|parsed| parsed.host_str().unwrap_or_default().to_string())
}

/// Weighted domain + title similarity of `new_url` against one existing bookmark.
///
/// The title side compares the raw new URL with the existing bookmark's name.
/// Returns `None` when the bookmark's URL does not parse.
pub fn score_candidate(new_url: &str, new_domain: &str, candidate: &Bookmark) -> Option<f64> {
    let candidate_domain = hostname(&candidate.url)?;
    let domain_similarity = calculate_similarity(new_domain, &candidate_domain);

    let title_similarity = if candidate.name.is_empty() {
        0.0
    } else {
        calculate_similarity(&new_url.to_lowercase(), &candidate.name.to_lowercase())
    };

    Some(domain_similarity * DOMAIN_WEIGHT + title_similarity * TITLE_WEIGHT)
}

/// Compare `new_url` against every existing bookmark and keep the closest one.
///
/// Bookmarks with malformed URLs are skipped. A malformed `new_url` is never a duplicate.
pub fn check_duplicates(new_url: &str, existing: &[Bookmark], threshold: f64) -> DuplicateAssessment {
    if existing.is_empty() {
        return DuplicateAssessment::default();
    }

    let Some(new_domain) = hostname(new_url) else {
        log::debug!("{new_url}: not a valid url, skipping duplicate check");
        return DuplicateAssessment::default();
    };

    let mut max_similarity = 0.0;
    let mut closest: Option<u64> = None;

    for candidate in existing {
        let Some(similarity) = score_candidate(new_url, &new_domain, candidate) else {
            log::debug!("bookmark {}: malformed url {:?}, skipped", candidate.id, candidate.url);
            continue;
        };

        if similarity > max_similarity {
            max_similarity = similarity;
            closest = Some(candidate.id);
        }
    }

    DuplicateAssessment {
        is_duplicate: is_duplicate_score(max_similarity, threshold),
        similarity_score: max_similarity.clamp(0.0, 1.0),
        matched_bookmark_id: closest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bmark(id: u64, name: &str, url: &str) -> Bookmark {
        Bookmark {
            id,
            name: name.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("straße", "strasse"), 2);
    }

    #[test]
    fn test_similarity_identity_and_empty() {
        for s in ["", "a", "github.com", "https://example.org/path?q=1"] {
            assert_eq!(calculate_similarity(s, s), 1.0);
        }
        assert_eq!(calculate_similarity("abc", ""), 0.0);
        assert_eq!(calculate_similarity("", "abc"), 0.0);
    }

    #[test]
    fn test_similarity_value() {
        // distance 3 over 7 chars
        let similarity = calculate_similarity("kitten", "sitting");
        assert!((similarity - 4.0 / 7.0).abs() < 1e-12);
        assert_eq!(calculate_similarity("kitten", "sitting"), calculate_similarity("sitting", "kitten"));
    }

    #[test]
    fn test_similarity_in_range() {
        let pairs = [("a", "zzzzzz"), ("github.com", "gitlab.com"), ("abc", "xyz")];
        for (a, b) in pairs {
            let similarity = calculate_similarity(a, b);
            assert!((0.0..=1.0).contains(&similarity), "{a} {b}: {similarity}");
        }
    }

    #[test]
    fn test_no_candidates() {
        let assessment = check_duplicates("https://github.com", &[], DUPLICATE_THRESHOLD);
        assert!(!assessment.is_duplicate);
        assert_eq!(assessment.similarity_score, 0.0);
        assert_eq!(assessment.matched_bookmark_id, None);
    }

    #[test]
    fn test_github_same_domain_short_title() {
        let existing = vec![bmark(1, "GitHub", "https://github.com")];
        let assessment = check_duplicates("https://github.com", &existing, DUPLICATE_THRESHOLD);

        // domain 1.0, title "https://github.com" vs "github" is 6/18
        let expected = 0.6 + 0.4 * (6.0 / 18.0);
        assert!((assessment.similarity_score - expected).abs() < 1e-9);
        assert!(!assessment.is_duplicate);
        assert_eq!(assessment.matched_bookmark_id, Some(1));
    }

    #[test]
    fn test_url_named_bookmark_is_duplicate() {
        let existing = vec![bmark(7, "https://github.com", "https://github.com")];
        let assessment = check_duplicates("https://github.com", &existing, DUPLICATE_THRESHOLD);
        assert!(assessment.is_duplicate);
        assert_eq!(assessment.similarity_score, 1.0);
        assert_eq!(assessment.matched_bookmark_id, Some(7));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // identical url and name score exactly 1.0
        let existing = vec![bmark(1, "https://github.com", "https://github.com")];
        let assessment = check_duplicates("https://github.com", &existing, 1.0);
        assert!(!assessment.is_duplicate, "score equal to threshold is not a duplicate");

        let assessment = check_duplicates("https://github.com", &existing, 0.999);
        assert!(assessment.is_duplicate);
    }

    #[test]
    fn test_verdict_boundary() {
        let score = |name: &str| {
            score_candidate("https://a.io", "a.io", &bmark(1, name, "https://a.io")).unwrap()
        };

        // 12 char url vs 6 char name sharing a 6 char prefix: title 0.5, overall 0.8
        let at_threshold = score("https:");
        assert!((at_threshold - 0.8).abs() < 1e-9);

        let existing = vec![bmark(1, "https:", "https://a.io")];
        let assessment = check_duplicates("https://a.io", &existing, 0.8 + 1e-9);
        assert!(!assessment.is_duplicate);

        let assessment = check_duplicates("https://a.io", &existing, 0.799);
        assert!(assessment.is_duplicate);
    }

    #[test]
    fn test_score_on_default_threshold_is_not_duplicate() {
        // title 6/12 = 0.5, overall 0.6 + 0.2
        let existing = vec![bmark(1, "https:", "https://a.io")];
        let assessment = check_duplicates("https://a.io", &existing, DUPLICATE_THRESHOLD);
        assert_eq!(assessment.similarity_score, DUPLICATE_THRESHOLD);
        assert!(!assessment.is_duplicate);
        assert_eq!(assessment.matched_bookmark_id, Some(1));

        // title 7/12, overall ~0.833
        let existing = vec![bmark(1, "https:/", "https://a.io")];
        let assessment = check_duplicates("https://a.io", &existing, DUPLICATE_THRESHOLD);
        assert!(assessment.similarity_score > DUPLICATE_THRESHOLD);
        assert!(assessment.is_duplicate);
    }

    #[test]
    fn test_duplicate_score_boundary() {
        assert!(!is_duplicate_score(0.8, DUPLICATE_THRESHOLD));
        assert!(is_duplicate_score(0.801, DUPLICATE_THRESHOLD));
        assert!(!is_duplicate_score(0.0, DUPLICATE_THRESHOLD));
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let existing = vec![
            bmark(1, "Example", "https://example.com/a"),
            bmark(2, "Example", "https://example.com/b"),
        ];
        let assessment = check_duplicates("https://example.com/c", &existing, DUPLICATE_THRESHOLD);
        assert_eq!(assessment.matched_bookmark_id, Some(1));
    }

    #[test]
    fn test_malformed_candidates_skipped() {
        let existing = vec![
            bmark(1, "broken", "not a url"),
            bmark(2, "Rust", "https://www.rust-lang.org"),
        ];
        let assessment = check_duplicates("https://www.rust-lang.org", &existing, DUPLICATE_THRESHOLD);
        assert_eq!(assessment.matched_bookmark_id, Some(2));
        assert!(assessment.similarity_score >= 0.6);
    }

    #[test]
    fn test_malformed_new_url() {
        let existing = vec![bmark(1, "Rust", "https://www.rust-lang.org")];
        let assessment = check_duplicates("::::", &existing, DUPLICATE_THRESHOLD);
        assert!(!assessment.is_duplicate);
        assert_eq!(assessment.similarity_score, 0.0);
    }

    #[test]
    fn test_different_domains_not_duplicate() {
        let existing = vec![bmark(1, "Crates", "https://crates.io")];
        let assessment = check_duplicates("https://docs.rs/tokio", &existing, DUPLICATE_THRESHOLD);
        assert!(!assessment.is_duplicate);
        assert!(assessment.similarity_score < 0.5);
    }
}
