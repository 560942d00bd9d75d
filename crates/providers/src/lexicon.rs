//! Offline gazetteer tagger.
//!
//! Produces Penn-style POS tags from token shape and a small function-word
//! list, and ORG/GPE/PERSON entities from marker gazetteers. Good enough for
//! one-to-five word folder names; not a general NLP pipeline.

use crate::{Entity, NlpAnalysis, NlpBackend, ProviderError, TaggedToken};
use std::collections::HashSet;

const ORG_MARKERS: &[&str] = &[
    "inc", "incorporated", "ltd", "limited", "pty", "llc", "plc", "corp", "corporation",
    "company", "co", "group", "holdings", "partners", "associates", "industries", "bank",
    "university", "college", "hospital", "foundation", "trust", "council", "authority",
    "institute", "agency", "gmbh", "ag", "bv", "nv", "sa", "enterprises", "ventures",
];

const PLACES: &[&str] = &[
    "australia", "sydney", "melbourne", "brisbane", "perth", "adelaide", "canberra", "hobart",
    "darwin", "victoria", "queensland", "tasmania", "london", "paris", "berlin", "tokyo",
    "singapore", "boston", "chicago", "texas", "california", "canada", "china", "japan",
    "india", "germany", "france", "zealand", "america", "europe", "asia", "auckland",
];

const GIVEN_NAMES: &[&str] = &[
    "john", "james", "michael", "david", "peter", "paul", "mark", "robert", "william",
    "richard", "thomas", "andrew", "daniel", "matthew", "mary", "sarah", "jennifer", "linda",
    "elizabeth", "susan", "jessica", "karen", "emma", "olivia", "anna", "lisa", "kate",
];

const DETERMINERS: &[&str] = &["the", "a", "an", "this", "that", "these", "those"];
const PREPOSITIONS: &[&str] = &["of", "in", "for", "on", "at", "by", "to", "with", "from"];
const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor"];

#[derive(Debug, Default, Clone)]
pub struct LexiconBackend {
    org_names: HashSet<String>,
}

impl LexiconBackend {
    /// Extra lowercase tokens that mark an organization on their own
    /// (typically the known-company registry, split into words).
    pub fn with_org_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            for word in name.as_ref().split_whitespace() {
                self.org_names.insert(word.to_lowercase());
            }
        }
        self
    }

    fn is_org_token(&self, lower: &str) -> bool {
        ORG_MARKERS.contains(&lower) || self.org_names.contains(lower)
    }
}

impl NlpBackend for LexiconBackend {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn probe(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn analyze(&self, text: &str) -> Result<NlpAnalysis, ProviderError> {
        let words = tokenize(text);
        let tokens: Vec<TaggedToken> = words
            .iter()
            .map(|w| TaggedToken {
                text: w.clone(),
                tag: pos_tag(w).to_string(),
            })
            .collect();
        let entities = self.entities(&tokens);
        Ok(NlpAnalysis { entities, tokens })
    }
}

impl LexiconBackend {
    fn entities(&self, tokens: &[TaggedToken]) -> Vec<Entity> {
        let mut entities = Vec::new();
        let capitalized: Vec<&TaggedToken> =
            tokens.iter().filter(|t| t.is_proper_noun()).collect();
        if capitalized.is_empty() {
            return entities;
        }
        let span = capitalized
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let lowered: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
        if lowered.iter().any(|l| self.is_org_token(l)) {
            entities.push(Entity {
                text: span.clone(),
                label: "ORG".into(),
            });
        }
        for tok in &capitalized {
            if PLACES.contains(&tok.text.to_lowercase().as_str()) {
                entities.push(Entity {
                    text: tok.text.clone(),
                    label: "GPE".into(),
                });
            }
        }
        if tokens.len() >= 2
            && tokens[0].is_proper_noun()
            && tokens[1].is_proper_noun()
            && GIVEN_NAMES.contains(&lowered[0].as_str())
        {
            entities.push(Entity {
                text: format!("{} {}", tokens[0].text, tokens[1].text),
                label: "PERSON".into(),
            });
        }
        entities
    }
}

/// Whitespace split, then punctuation split off into single-char tokens.
/// Apostrophes stay inside words ("Smith's").
pub fn tokenize(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for chunk in text.split_whitespace() {
        let mut current = String::new();
        for ch in chunk.chars() {
            if ch.is_alphanumeric() || ch == '\'' {
                current.push(ch);
            } else {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                out.push(ch.to_string());
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn pos_tag(word: &str) -> &'static str {
    let lower = word.to_lowercase();
    let mut chars = word.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return "NN",
    };
    if word.chars().count() == 1 && !first.is_alphanumeric() {
        return match first {
            '&' => "CC",
            ',' => ",",
            '.' => ".",
            ':' | ';' => ":",
            _ => "SYM",
        };
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return "CD";
    }
    if DETERMINERS.contains(&lower.as_str()) {
        return "DT";
    }
    if PREPOSITIONS.contains(&lower.as_str()) {
        return "IN";
    }
    if CONJUNCTIONS.contains(&lower.as_str()) {
        return "CC";
    }
    if first.is_uppercase() {
        let title_plural = word.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss");
        let all_caps = word.chars().all(|c| !c.is_lowercase());
        return if title_plural && !all_caps { "NNPS" } else { "NNP" };
    }
    if lower.ends_with("ing") {
        "VBG"
    } else if lower.ends_with("ly") {
        "RB"
    } else if lower.ends_with('s') && !lower.ends_with("ss") {
        "NNS"
    } else {
        "NN"
    }
}
