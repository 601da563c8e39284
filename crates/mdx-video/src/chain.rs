//! Ordered inline rule chain.
//!
//! Rules are kept sorted by descending priority; rules with equal priority keep
//! their insertion order. Each rule runs over the text left unmatched by the
//! rules before it, so a span of text is embedded at most once.
//!
//! Priorities are fixed values rather than positions:
//!
//! | Priority | Rule                                        |
//! |----------|---------------------------------------------|
//! | 120      | `youku`                                     |
//! | 110      | `tudou`                                     |
//! | 100      | link syntax ([`REFERENCE_PRIORITY`], host)  |

use mdx_video_config::VideoConfig;

use crate::element::Element;
use crate::error::EmbedError;
use crate::site::{EmbedPattern, VideoSite};

/// Priority at which the host parser resolves link syntax.
///
/// Rules above this value see bare URLs before they could become links.
pub const REFERENCE_PRIORITY: u16 = 100;

/// A named, prioritized inline rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InlineRule {
    /// Unique rule name.
    pub name: &'static str,
    /// Higher runs first.
    pub priority: u16,
    /// Site whose pattern and handler this rule applies.
    pub site: VideoSite,
}

/// A piece of a text span after rules have been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Unmatched text, passed on to the host unchanged.
    Text(String),
    /// Fragment that replaces a matched URL.
    Fragment(Element),
}

/// Ordered list of inline rules.
#[derive(Clone, Debug, Default)]
pub struct RuleChain {
    rules: Vec<InlineRule>,
}

impl RuleChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule at the position given by its priority.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::DuplicateRule`] if a rule with the same name exists.
    pub fn insert(&mut self, rule: InlineRule) -> Result<(), EmbedError> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(EmbedError::DuplicateRule(rule.name.to_owned()));
        }
        let index = self
            .rules
            .iter()
            .position(|r| r.priority < rule.priority)
            .unwrap_or(self.rules.len());
        self.rules.insert(index, rule);
        Ok(())
    }

    /// Rules in execution order.
    #[must_use]
    pub fn rules(&self) -> &[InlineRule] {
        &self.rules
    }

    /// Rule names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Number of installed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Split a text span into unmatched text and embedded fragments.
    ///
    /// Returns a single [`Segment::Text`] equal to the input when nothing
    /// matches, and no segments for empty input.
    #[must_use]
    pub fn apply(&self, text: &str, config: &VideoConfig) -> Vec<Segment> {
        let mut segments = Vec::new();
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_owned()));
        }
        for rule in &self.rules {
            segments = segments
                .into_iter()
                .flat_map(|segment| match segment {
                    Segment::Text(text) => split(rule, &text, config),
                    fragment @ Segment::Fragment(_) => vec![fragment],
                })
                .collect();
        }
        segments
    }
}

/// Apply one rule to a text span.
fn split(rule: &InlineRule, text: &str, config: &VideoConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    while let Some(matched) = rule.site.find_at(text, last) {
        if matched.start > last {
            segments.push(Segment::Text(text[last..matched.start].to_owned()));
        }
        tracing::debug!(rule = rule.name, id = matched.id, "Embedding video");
        segments.push(Segment::Fragment(rule.site.handle(&matched, config)));
        last = matched.end;
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_owned()));
    }
    segments
}
