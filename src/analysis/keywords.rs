/// Terms that signal severe impact. Each distinct match adds `HIGH_SIGNAL_POINTS`.
pub const HIGH_SIGNAL_KEYWORDS: [&str; 16] = [
    "critical",
    "urgent",
    "failure",
    "down",
    "outage",
    "breach",
    "security",
    "data loss",
    "revenue",
    "compliance",
    "patient safety",
    "billing",
    "hipaa",
    "lawsuit",
    "emergency",
    "crash",
];

/// Terms that signal a defect without severity. Each distinct match adds `MEDIUM_SIGNAL_POINTS`.
pub const MEDIUM_SIGNAL_KEYWORDS: [&str; 10] = [
    "issue",
    "problem",
    "error",
    "bug",
    "delay",
    "slow",
    "missing",
    "incorrect",
    "discrepancy",
    "timeout",
];

pub const HIGH_SIGNAL_POINTS: f64 = 15.0;
pub const MEDIUM_SIGNAL_POINTS: f64 = 5.0;

/// Category substrings and their multipliers, applied in this order.
pub const CATEGORY_MULTIPLIERS: [(&str, f64); 6] = [
    ("technical", 1.2),
    ("data", 1.3),
    ("billing", 1.4),
    ("compliance", 1.5),
    ("security", 1.6),
    ("patient", 1.4),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordHits {
    pub high: Vec<&'static str>,
    pub medium: Vec<&'static str>,
}

impl KeywordHits {
    pub fn points(&self) -> f64 {
        self.high.len() as f64 * HIGH_SIGNAL_POINTS
            + self.medium.len() as f64 * MEDIUM_SIGNAL_POINTS
    }
}

/// Case-insensitive substring scan. A keyword counts once however often it appears.
pub fn scan_keywords(text: &str) -> KeywordHits {
    let haystack = text.to_lowercase();
    KeywordHits {
        high: HIGH_SIGNAL_KEYWORDS
            .iter()
            .copied()
            .filter(|k| haystack.contains(k))
            .collect(),
        medium: MEDIUM_SIGNAL_KEYWORDS
            .iter()
            .copied()
            .filter(|k| haystack.contains(k))
            .collect(),
    }
}

/// Every multiplier whose substring occurs in the category, each at most once.
pub fn matching_multipliers(category: &str) -> Vec<(&'static str, f64)> {
    let category = category.to_lowercase();
    CATEGORY_MULTIPLIERS
        .iter()
        .copied()
        .filter(|(needle, _)| category.contains(needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_is_case_insensitive_and_counts_each_keyword_once() {
        let hits = scan_keywords("URGENT: Critical outage, critical path blocked, urgent!");
        assert_eq!(hits.high, vec!["critical", "urgent", "outage"]);
        assert!(hits.medium.is_empty());
        assert_eq!(hits.points(), 45.0);
    }

    #[test]
    fn multi_word_keywords_match_as_phrases() {
        let hits = scan_keywords("Possible data loss affecting patient safety");
        assert_eq!(hits.high, vec!["data loss", "patient safety"]);

        let split = scan_keywords("data was not lost");
        assert!(split.high.is_empty());
    }

    #[test]
    fn medium_keywords_add_five_each() {
        let hits = scan_keywords("Slow sync and a missing field");
        assert_eq!(hits.medium, vec!["slow", "missing"]);
        assert_eq!(hits.points(), 10.0);
    }

    #[test]
    fn overlapping_category_substrings_apply_once_each() {
        let found = matching_multipliers("Patient-Billing / billing");
        assert_eq!(found, vec![("billing", 1.4), ("patient", 1.4)]);
        assert!(matching_multipliers("general").is_empty());
    }
}
