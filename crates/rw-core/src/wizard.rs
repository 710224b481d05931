//! Rule wizard facade
//!
//! Binds one [`FilterSyntax`] to the generators so callers do not thread the
//! table through every call.

use crate::exception::exception_rules;
use crate::patterns::split_to_patterns;
use crate::syntax::FilterSyntax;
use crate::types::{Event, EventStatus, RuleKind};

/// Rule synthesis over a fixed syntax table.
#[derive(Debug, Clone, Copy)]
pub struct RuleWizard<'a> {
    syntax: &'a FilterSyntax,
}

impl Default for RuleWizard<'static> {
    fn default() -> Self {
        Self::new(FilterSyntax::shared())
    }
}

impl<'a> RuleWizard<'a> {
    pub fn new(syntax: &'a FilterSyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> &'a FilterSyntax {
        self.syntax
    }

    /// Candidate patterns for a new rule covering `url`.
    pub fn patterns(&self, url: &str, domain: &str, is_allowlist: bool) -> Vec<String> {
        split_to_patterns(url, domain, is_allowlist, self.syntax)
    }

    /// Rules offered for an event; see [`exception_rules`].
    pub fn exception_rules(&self, event: &Event) -> Vec<String> {
        exception_rules(event, self.syntax)
    }

    pub fn rule_kind(&self, event: &Event) -> Option<RuleKind> {
        event.rule_kind(self.syntax)
    }

    pub fn status(&self, event: &Event) -> EventStatus {
        EventStatus::of(event, self.syntax)
    }
}
