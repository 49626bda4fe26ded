use glob::{MatchOptions, Pattern};

/// Cap applied when the caller does not pass one.
pub const DEFAULT_MAX_RESULTS: usize = 100;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Matcher {
    Glob(Pattern),
    /// The pattern did not compile as a glob; match it as a plain substring.
    Contains(String),
}

/// Filters path lists against a glob such as `**/*.ts` or `src/[ab]*.rs`.
///
/// A pattern that is not a valid glob is matched as a substring instead of
/// failing, so a naive string like `config[` still finds `config[1].json`.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    matcher: Matcher,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Self {
        let matcher = match Pattern::new(pattern) {
            Ok(compiled) => Matcher::Glob(compiled),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "invalid glob, falling back to substring match");
                Matcher::Contains(pattern.to_string())
            }
        };
        Self { matcher }
    }

    /// Whether the substring fallback is in effect.
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Contains(_))
    }

    pub fn is_match(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Glob(pattern) => pattern.matches_with(path, MATCH_OPTIONS),
            Matcher::Contains(needle) => path.contains(needle.as_str()),
        }
    }

    /// Matching paths in input order, at most `max_results` of them.
    pub fn filter<I>(&self, paths: I, max_results: usize) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        paths
            .into_iter()
            .filter(|p| self.is_match(p.as_ref()))
            .take(max_results)
            .map(|p| p.as_ref().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATHS: [&str; 3] = ["src/a.ts", "src/b.py", "README.md"];

    #[test]
    fn test_recursive_extension_glob() {
        let matcher = PatternMatcher::new("**/*.ts");
        assert!(!matcher.is_literal());
        assert_eq!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS), vec!["src/a.ts"]);
    }

    #[test]
    fn test_double_star_matches_root_level() {
        let matcher = PatternMatcher::new("**/*.md");
        assert_eq!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS), vec!["README.md"]);
    }

    #[test]
    fn test_single_star_stays_in_one_segment() {
        let matcher = PatternMatcher::new("*.ts");
        assert!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS).is_empty());

        let matcher = PatternMatcher::new("src/*");
        assert_eq!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS), vec!["src/a.ts", "src/b.py"]);
    }

    #[test]
    fn test_character_classes() {
        let matcher = PatternMatcher::new("src/[ab].*");
        assert_eq!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS), vec!["src/a.ts", "src/b.py"]);

        let matcher = PatternMatcher::new("src/[!a].*");
        assert_eq!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS), vec!["src/b.py"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let matcher = PatternMatcher::new("readme.md");
        assert!(matcher.filter(PATHS, DEFAULT_MAX_RESULTS).is_empty());
    }

    #[test]
    fn test_invalid_glob_falls_back_to_substring() {
        let paths = ["data/config[1].json", "data/config.json", "src/config[.rs"];
        let matcher = PatternMatcher::new("config[");
        assert!(matcher.is_literal());
        assert_eq!(
            matcher.filter(paths, DEFAULT_MAX_RESULTS),
            vec!["data/config[1].json", "src/config[.rs"]
        );
    }

    #[test]
    fn test_fallback_equals_plain_contains_filter() {
        let paths = ["a**b/x", "a/b", "xa**by", "ab"];
        let matcher = PatternMatcher::new("a**b");
        assert!(matcher.is_literal());

        let expected: Vec<String> = paths
            .iter()
            .filter(|p| p.contains("a**b"))
            .map(|p| p.to_string())
            .collect();
        assert_eq!(matcher.filter(paths, DEFAULT_MAX_RESULTS), expected);
    }

    #[test]
    fn test_result_is_capped_and_order_preserving() {
        let paths: Vec<String> = (0..250).map(|i| format!("src/file{:03}.rs", i)).collect();
        let matcher = PatternMatcher::new("**/*.rs");

        let capped = matcher.filter(&paths, DEFAULT_MAX_RESULTS);
        assert_eq!(capped.len(), 100);
        assert_eq!(capped[..], paths[..100]);

        assert_eq!(matcher.filter(&paths, 5).len(), 5);
        assert!(matcher.filter(&paths, 0).is_empty());
    }

    #[test]
    fn test_filter_returns_subsequence() {
        let paths = ["b/1.rs", "a/2.txt", "a/3.rs", "c/4.rs"];
        let matched = PatternMatcher::new("**/*.rs").filter(paths, DEFAULT_MAX_RESULTS);

        let mut cursor = paths.iter();
        for path in &matched {
            assert!(cursor.any(|p| *p == path.as_str()), "{} out of order", path);
        }
        assert_eq!(matched, vec!["b/1.rs", "a/3.rs", "c/4.rs"]);
    }
}
