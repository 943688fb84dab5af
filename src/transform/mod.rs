//! Transform Stage
//!
//! Rewrites the WADL event stream into an HTML-shaped one. The rewrite is
//! driven by rule tables ([`rules`]) and applied on the fly by
//! [`TransformStage`]; another engine can be plugged in through
//! [`TransformProvider`].

pub mod rules;
pub mod stage;

pub use rules::{Context, Rule};
pub use stage::TransformStage;

use crate::sax::Stage;
use std::fmt;

/// The two rule-set variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    /// Plain documentation rendering
    Documentation,
    /// Rendering that expects HTML representation docs to arrive as escaped text
    DocumentationHtmlRepresentations,
}

impl RuleSet {
    /// Pick the variant matching the escape-HTML-representations flag
    pub fn for_escaping(escape_html_representations: bool) -> Self {
        if escape_html_representations {
            RuleSet::DocumentationHtmlRepresentations
        } else {
            RuleSet::Documentation
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RuleSet::Documentation => "wadl_documentation",
            RuleSet::DocumentationHtmlRepresentations => "wadl_documentation_html-reps",
        }
    }

    /// First rule for `element` under the WADL element `parent`
    pub fn lookup(self, element: &str, parent: Option<Context<'_>>) -> Option<&'static Rule> {
        let specific: &'static [Rule] = match self {
            RuleSet::Documentation => &[],
            RuleSet::DocumentationHtmlRepresentations => rules::HTML_REPRESENTATIONS,
        };
        specific
            .iter()
            .chain(rules::DOCUMENTATION)
            .find(|rule| rule.matches(element, parent))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of transform stages for the pipeline
pub trait TransformProvider: Send + Sync {
    fn stage(&self, rule_set: RuleSet) -> Box<dyn Stage>;
}

/// The built-in rule interpreter
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransform;

impl TransformProvider for BuiltinTransform {
    fn stage(&self, rule_set: RuleSet) -> Box<dyn Stage> {
        Box::new(TransformStage::new(rule_set))
    }
}
