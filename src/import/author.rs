//! Author name recovery.
//!
//! Accession registers often leave the author column blank and carry the
//! attribution inside the title ("... / John Smith", "... edited by Jane Doe").
//! Names are taken from the author column, then the editor column, then from
//! an ordered list of title extraction rules. A candidate from the title is
//! only accepted if it still looks like a personal name after cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words that mark a span as bibliographic noise rather than a name.
const STOP_WORDS: [&str; 11] = [
    "editor",
    "editors",
    "edited",
    "vol",
    "volume",
    "edition",
    "et al",
    "translated",
    "compilation",
    "anthology",
    "series",
];

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 100;

static TRAILING_ELLIPSIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\.\.\.[^.]*$").expect("valid regex"));
static TRAILING_ET_AL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*et\s+al\.?$").expect("valid regex"));
static TRAILING_AND_OTHERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*and\s+others?$").expect("valid regex"));
static TRAILING_ETC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*etc\.?$").expect("valid regex"));
static LEADING_ROLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:editor|editors|edited|translated|compiled|by)\s+").expect("valid regex")
});

/// Which phrasing a title rule recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// "edited [and translated] by NAME"
    EditedBy,
    /// "by NAME"
    By,
    /// "editor(s), NAME"
    EditorsComma,
    /// "... / NAME" at the end of the title
    TrailingSlash,
}

/// A title extraction rule: pattern, cleanup and acceptance test
pub struct ExtractionRule {
    pub kind: RuleKind,
    pattern: Regex,
    clean: fn(&str) -> String,
    accept: fn(&str) -> bool,
}

impl ExtractionRule {
    fn new(kind: RuleKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("valid regex"),
            clean: clean_author_name,
            accept: is_valid_author_name,
        }
    }

    /// Cleaned name if the pattern matches and the result is acceptable.
    pub fn extract(&self, title: &str) -> Option<String> {
        let captures = self.pattern.captures(title)?;
        let candidate = (self.clean)(captures.get(1)?.as_str());
        (self.accept)(&candidate).then_some(candidate)
    }
}

/// Title rules in evaluation order, most specific first.
pub static TITLE_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(
            RuleKind::EditedBy,
            r"(?i)edited\s+(?:and\s+translated\s+)?by\s+([^/;,()]+?)(?:\s*[;,/()]|$)",
        ),
        ExtractionRule::new(
            RuleKind::By,
            r"(?i)\bby\s+([^/;,()]+?)(?:\s*[;,/()]|$)",
        ),
        ExtractionRule::new(
            RuleKind::EditorsComma,
            r"(?i)editors?\s*,\s*([^/;,()]+?)(?:\s*[;,/()]|$)",
        ),
        ExtractionRule::new(RuleKind::TrailingSlash, r"/\s*([^/()]+?)$"),
    ]
});

/// Pick an author name for a row, or `""` when none can be determined.
///
/// Both columns are expected to be normalized already.
pub fn resolve_author_name(author_column: &str, editor_column: &str, title: &str) -> String {
    if !author_column.is_empty() {
        return author_column.to_string();
    }
    if !editor_column.is_empty() {
        return editor_column.to_string();
    }
    extract_from_title(title)
        .map(|(_, name)| name)
        .unwrap_or_default()
}

/// First rule that yields an acceptable name from the title.
pub fn extract_from_title(title: &str) -> Option<(RuleKind, String)> {
    TITLE_RULES
        .iter()
        .find_map(|rule| rule.extract(title).map(|name| (rule.kind, name)))
}

/// Strip trailing "et al." style tails and leading role words.
pub fn clean_author_name(raw: &str) -> String {
    let name = TRAILING_ELLIPSIS.replace(raw, "");
    let name = TRAILING_ET_AL.replace(&name, "");
    let name = TRAILING_AND_OTHERS.replace(&name, "");
    let name = TRAILING_ETC.replace(&name, "");
    let name = LEADING_ROLE.replace(&name, "");
    name.trim().to_string()
}

/// Heuristic: right length, no bibliographic stop words, some capital letter.
pub fn is_valid_author_name(candidate: &str) -> bool {
    let len = candidate.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return false;
    }

    let lower = candidate.to_lowercase();
    if STOP_WORDS.iter().any(|word| lower.contains(word)) {
        return false;
    }

    candidate.chars().any(char::is_uppercase)
}
