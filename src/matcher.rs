use log::debug;
use regex::Regex;
use std::sync::OnceLock;
use strsim::normalized_damerau_levenshtein;

/// Default similarity threshold on the 0-100 scale. A word is a target only
/// if its best score strictly exceeds this.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 85.0;

fn strip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z]").unwrap())
}

/// Normalize a transcribed token: lowercase, keep ASCII letters only.
///
/// Whisper emits words with attached punctuation and leading spaces
/// (" Damn!"), so everything that is not a letter is stripped before
/// matching. Idempotent.
pub fn normalize_word(word: &str) -> String {
    strip_regex().replace_all(word, "").to_ascii_lowercase()
}

/// Best fuzzy similarity (0-100) between a normalized word and the target
/// list. Returns 0.0 for words that normalize to nothing.
pub fn best_match_score(word: &str, targets: &[String]) -> f64 {
    let normalized = normalize_word(word);
    if normalized.is_empty() {
        return 0.0;
    }

    targets
        .iter()
        .map(|target| normalized_damerau_levenshtein(&normalized, target) * 100.0)
        .fold(0.0, f64::max)
}

/// Decide whether a transcribed word is a target word.
///
/// Exact matching would miss transcription noise (homophone misspellings,
/// stray punctuation tokens), so the decision is fuzzy: the best score over
/// the list must strictly exceed `threshold`.
pub fn is_target(word: &str, targets: &[String], threshold: f64) -> bool {
    let score = best_match_score(word, targets);
    let matched = score > threshold;
    if matched {
        debug!("'{}' matched target list (score {:.1})", word, score);
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word(" Damn!"), "damn");
        assert_eq!(normalize_word("SHIT,"), "shit");
        assert_eq!(normalize_word("he11o"), "heo");
        assert_eq!(normalize_word("..."), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for word in [" Damn!", "fuck's", "1337", "already-clean", "ok"] {
            let once = normalize_word(word);
            assert_eq!(normalize_word(&once), once);
        }
    }

    #[test]
    fn test_exact_match_scores_100() {
        let list = targets(&["damn"]);
        assert_eq!(best_match_score("Damn!", &list), 100.0);
        assert!(is_target("Damn!", &list, DEFAULT_MATCH_THRESHOLD));
    }

    #[test]
    fn test_transposition_stays_below_threshold() {
        // "idoit" is one adjacent swap from "idiot": score is exactly 80,
        // which the strictly-greater rule leaves unmatched at 85.
        let list = targets(&["idiot"]);
        let score = best_match_score("idoit", &list);
        assert!((score - 80.0).abs() < 1e-9);
        assert!(!is_target("idoit", &list, DEFAULT_MATCH_THRESHOLD));
    }

    #[test]
    fn test_empty_normalization_never_matches() {
        let list = targets(&["damn"]);
        assert!(!is_target("!!!", &list, 0.0));
        assert!(!is_target("", &list, 0.0));
    }

    #[test]
    fn test_threshold_monotonicity() {
        let list = targets(&["bastard", "hell"]);
        let words = ["bastrad", "hel", "hello", "bastard", "unrelated"];
        for word in words {
            for (low, high) in [(50.0, 70.0), (70.0, 85.0), (85.0, 99.0)] {
                if is_target(word, &list, high) {
                    assert!(
                        is_target(word, &list, low),
                        "'{}' matched at {} but not at {}",
                        word,
                        high,
                        low
                    );
                }
            }
        }
    }

    #[test]
    fn test_best_score_takes_maximum_over_list() {
        let list = targets(&["hello", "damn"]);
        // "damm" is closer to "damn" than to "hello"; the max wins.
        let score = best_match_score("damm", &list);
        assert!((score - 75.0).abs() < 1e-9);
    }

}
