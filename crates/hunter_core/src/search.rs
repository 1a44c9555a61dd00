/// Operator-supplied text looked for in page titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
    needle: String,
    case_sensitive: bool,
}

impl SearchText {
    pub fn new(needle: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            needle: needle.into(),
            case_sensitive,
        }
    }

    /// Substring match against `title`.
    pub fn matches(&self, title: &str) -> bool {
        if self.case_sensitive {
            title.contains(&self.needle)
        } else {
            title.to_lowercase().contains(&self.needle.to_lowercase())
        }
    }
}

/// `false` when no search text was configured.
pub fn title_matches(search: Option<&SearchText>, title: &str) -> bool {
    search.is_some_and(|search| search.matches(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_by_default_flag() {
        let search = SearchText::new("admin", false);
        assert!(search.matches("Admin Panel"));
    }

    #[test]
    fn case_sensitive_requires_exact_case() {
        let search = SearchText::new("Admin", true);
        assert!(!search.matches("admin panel"));
        assert!(search.matches("Admin panel"));
    }

    #[test]
    fn missing_search_never_matches() {
        assert!(!title_matches(None, "anything"));
    }
}
