//! Intent classification for free-text edit requests
//!
//! Maps a request like "make mornings more relaxed" to the set of Day fields
//! the user most likely wants changed. Matching is keyword based and
//! deliberately loose: it may under- or over-match, and the patch extractor
//! has the final say on what survives.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{FieldPath, Slot};

/// Errors building a classifier
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("Empty keyword configured for '{0}'")]
    EmptyKeyword(IntentTag),

    #[error("Invalid keyword pattern for '{tag}': {source}")]
    Pattern {
        tag: IntentTag,
        #[source]
        source: regex::Error,
    },
}

/// A field the user may want to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentTag {
    Title,
    Description,
    Location,
    Morning,
    Afternoon,
    Evening,
}

impl IntentTag {
    pub const ALL: [IntentTag; 6] = [
        IntentTag::Title,
        IntentTag::Description,
        IntentTag::Location,
        IntentTag::Morning,
        IntentTag::Afternoon,
        IntentTag::Evening,
    ];

    /// The Day field this tag targets
    pub fn field(&self) -> FieldPath {
        match self {
            Self::Title => FieldPath::Title,
            Self::Description => FieldPath::Description,
            Self::Location => FieldPath::Location,
            Self::Morning => FieldPath::Slot(Slot::Morning),
            Self::Afternoon => FieldPath::Slot(Slot::Afternoon),
            Self::Evening => FieldPath::Slot(Slot::Evening),
        }
    }

    /// Tag for a field path (every path has exactly one)
    pub fn for_field(path: FieldPath) -> Self {
        match path {
            FieldPath::Title => Self::Title,
            FieldPath::Description => Self::Description,
            FieldPath::Location => Self::Location,
            FieldPath::Slot(Slot::Morning) => Self::Morning,
            FieldPath::Slot(Slot::Afternoon) => Self::Afternoon,
            FieldPath::Slot(Slot::Evening) => Self::Evening,
        }
    }

    /// Built-in synonyms
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Title => &["title", "name", "call", "rename", "heading"],
            Self::Description => &["description", "describe", "summary", "overview", "details"],
            Self::Location => &["location", "place", "where", "city", "area", "neighborhood", "venue"],
            Self::Morning => &["morning", "am", "early", "breakfast", "sunrise"],
            Self::Afternoon => &["afternoon", "lunch", "midday", "noon", "pm"],
            Self::Evening => &["evening", "night", "dinner", "tonight", "nightlife"],
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Location => "location",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        };
        write!(f, "{}", name)
    }
}

/// Extra keywords per tag, merged on top of the built-ins
pub type SynonymTable = BTreeMap<IntentTag, Vec<String>>;

/// Set of tags inferred from one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentSet(BTreeSet<IntentTag>);

impl IntentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: IntentTag) -> bool {
        self.0.insert(tag)
    }

    pub fn contains(&self, tag: IntentTag) -> bool {
        self.0.contains(&tag)
    }

    /// True when the tag for `path` was inferred
    pub fn wants(&self, path: FieldPath) -> bool {
        self.contains(IntentTag::for_field(path))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = IntentTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<IntentTag> for IntentSet {
    fn from_iter<I: IntoIterator<Item = IntentTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for IntentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|t| t.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Keyword matcher over the six editable fields
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    matchers: Vec<(IntentTag, Regex)>,
}

impl IntentClassifier {
    /// Build a classifier from the built-in table plus `extra` keywords
    pub fn new(extra: &SynonymTable) -> Result<Self, IntentError> {
        debug!(extra_tags = extra.len(), "IntentClassifier::new: called");
        let mut matchers = Vec::with_capacity(IntentTag::ALL.len());

        for tag in IntentTag::ALL {
            let mut keywords: Vec<String> = tag.default_keywords().iter().map(|k| k.to_string()).collect();
            if let Some(words) = extra.get(&tag) {
                for word in words {
                    let word = word.trim().to_lowercase();
                    if word.is_empty() {
                        return Err(IntentError::EmptyKeyword(tag));
                    }
                    if !keywords.contains(&word) {
                        keywords.push(word);
                    }
                }
            }

            let alternation = keywords.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|");
            // Whole words only, with an optional plural suffix
            let pattern = format!(r"\b(?:{})(?:s|es)?\b", alternation);
            let regex = Regex::new(&pattern).map_err(|source| IntentError::Pattern { tag, source })?;
            debug!(%tag, keyword_count = keywords.len(), "IntentClassifier::new: compiled matcher");
            matchers.push((tag, regex));
        }

        Ok(Self { matchers })
    }

    /// Every tag whose keywords appear in `request`
    pub fn classify(&self, request: &str) -> IntentSet {
        let normalized = request.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let intent: IntentSet = self
            .matchers
            .iter()
            .filter(|(_, regex)| regex.is_match(&normalized))
            .map(|(tag, _)| *tag)
            .collect();
        debug!(%request, %intent, "classify: matched");
        intent
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        // Built-in keywords are plain words; escaped alternations always compile
        match Self::new(&SynonymTable::new()) {
            Ok(classifier) => classifier,
            Err(e) => unreachable!("built-in keyword table failed to compile: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(request: &str) -> Vec<IntentTag> {
        IntentClassifier::default().classify(request).iter().collect()
    }

    #[test]
    fn test_single_field() {
        assert_eq!(tags("change the title to Sunset Safari"), vec![IntentTag::Title]);
    }

    #[test]
    fn test_plural_matches() {
        assert_eq!(tags("make mornings more relaxed"), vec![IntentTag::Morning]);
    }

    #[test]
    fn test_no_anchor() {
        assert!(tags("improve this day").is_empty());
    }

    #[test]
    fn test_multi_field_keeps_all() {
        assert_eq!(
            tags("Rename it and move dinner somewhere near the beach, new location too"),
            vec![IntentTag::Title, IntentTag::Location, IntentTag::Evening]
        );
    }

    #[test]
    fn test_whole_words_only() {
        // "name" must not match the morning synonym "am"
        assert_eq!(tags("give it a better name"), vec![IntentTag::Title]);
        assert!(tags("examine the plan").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(tags("EVENING should be calmer"), vec![IntentTag::Evening]);
    }

    #[test]
    fn test_extra_keywords() {
        let mut extra = SynonymTable::new();
        extra.insert(IntentTag::Afternoon, vec!["Siesta".to_string()]);
        let classifier = IntentClassifier::new(&extra).unwrap();
        let intent = classifier.classify("skip the siesta");
        assert!(intent.contains(IntentTag::Afternoon));
        assert_eq!(intent.len(), 1);
    }

    #[test]
    fn test_empty_extra_keyword_rejected() {
        let mut extra = SynonymTable::new();
        extra.insert(IntentTag::Title, vec!["  ".to_string()]);
        assert!(matches!(
            IntentClassifier::new(&extra),
            Err(IntentError::EmptyKeyword(IntentTag::Title))
        ));
    }

    #[test]
    fn test_tag_field_roundtrip() {
        for tag in IntentTag::ALL {
            assert_eq!(IntentTag::for_field(tag.field()), tag);
        }
    }
}
