//! Typo-tolerant mapping from free-text category labels to pillars.
//!
//! Upstream labels arrive with channel prefixes ("SAT ", "IVC "), alternate
//! phrasings and known misspellings ("Impovement"). Resolution walks an
//! ordered rule table, top to bottom, and the first matching rule wins. A label
//! that matches nothing resolves to [`CategoryMatch::Unmapped`], which callers
//! treat as "exclude from pillar aggregation" rather than as an error.

use crate::core::Pillar;
use serde::{Deserialize, Serialize};

/// Outcome of normalizing one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "pillar")]
pub enum CategoryMatch {
    Pillar(Pillar),
    Unmapped,
}

impl CategoryMatch {
    pub fn is_unmapped(self) -> bool {
        matches!(self, CategoryMatch::Unmapped)
    }
}

/// Label after case folding and channel-prefix stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLabel {
    text: String,
    tokens: Vec<String>,
}

impl NormalizedLabel {
    pub fn new(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let text = strip_channel_prefix(&lower).to_string();
        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, tokens }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.text.contains(n))
    }

    fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

const CHANNEL_PREFIXES: [&str; 5] = ["sat (v)", "sat(v)", "ivc", "ieg", "sat"];

fn strip_channel_prefix(lower: &str) -> &str {
    for prefix in CHANNEL_PREFIXES {
        if let Some(rest) = lower.strip_prefix(prefix) {
            let at_boundary = rest
                .chars()
                .next()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true);
            if at_boundary {
                return rest.trim_start_matches(|c: char| !c.is_alphanumeric());
            }
        }
    }
    lower
}

/// One entry in the ordered rule table.
#[derive(Clone, Copy)]
pub struct CategoryRule {
    pub name: &'static str,
    pub pillar: Pillar,
    predicate: fn(&NormalizedLabel) -> bool,
}

impl CategoryRule {
    pub fn matches(&self, label: &NormalizedLabel) -> bool {
        (self.predicate)(label)
    }
}

impl std::fmt::Debug for CategoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryRule")
            .field("name", &self.name)
            .field("pillar", &self.pillar)
            .finish()
    }
}

fn is_pcii(label: &NormalizedLabel) -> bool {
    label.has_token("pcii")
        || (label.contains("continuous")
            && label.contains_any(&["improvement", "impovement", "innovation"]))
}

fn is_pms(label: &NormalizedLabel) -> bool {
    label.has_token("pms") || label.contains_any(&["personnel", "management system"])
}

fn is_pim(label: &NormalizedLabel) -> bool {
    label.has_token("pim") || label.contains_any(&["procurement", "inputs", "premix"])
}

fn is_pe(label: &NormalizedLabel) -> bool {
    label.has_token("pe") || label.contains("engagement")
}

fn is_glc(label: &NormalizedLabel) -> bool {
    label.has_token("glc")
        || label.contains_any(&[
            "government",
            "legislation",
            "compliance",
            "labelling",
            "labeling",
            "regulatory",
        ])
}

/// Evaluation order matters: "Production, Continuous Improvement" must hit
/// PCII before any broader rule sees "management" or "compliance".
pub const CATEGORY_RULES: [CategoryRule; 5] = [
    CategoryRule {
        name: "production-continuous-improvement",
        pillar: Pillar::Pcii,
        predicate: is_pcii,
    },
    CategoryRule {
        name: "personnel-management-systems",
        pillar: Pillar::Pms,
        predicate: is_pms,
    },
    CategoryRule {
        name: "procurement-inputs",
        pillar: Pillar::Pim,
        predicate: is_pim,
    },
    CategoryRule {
        name: "public-engagement",
        pillar: Pillar::Pe,
        predicate: is_pe,
    },
    CategoryRule {
        name: "government-legislation-compliance",
        pillar: Pillar::Glc,
        predicate: is_glc,
    },
];

/// Stateless resolver over [`CATEGORY_RULES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryNormalizer;

impl CategoryNormalizer {
    pub fn normalize(label: &str) -> CategoryMatch {
        Self::matching_rule(label)
            .map(|rule| CategoryMatch::Pillar(rule.pillar))
            .unwrap_or(CategoryMatch::Unmapped)
    }

    /// The rule that decided the outcome, for auditing.
    pub fn matching_rule(label: &str) -> Option<&'static CategoryRule> {
        let normalized = NormalizedLabel::new(label);
        if normalized.text().is_empty() {
            return None;
        }
        CATEGORY_RULES.iter().find(|rule| rule.matches(&normalized))
    }
}
