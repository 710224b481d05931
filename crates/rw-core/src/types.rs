//! Filtering-log event model
//!
//! Events and rules arrive from the filtering log as JSON records with
//! camelCase keys; the field names below mirror those records. The log also
//! supplies the rule kind as a handful of booleans, which are folded into
//! [`RuleFlags`] and classified into a single [`RuleKind`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::has_document_level_option;
use crate::syntax::FilterSyntax;
use crate::url::extract_host;

// =============================================================================
// Rule Flags
// =============================================================================

bitflags::bitflags! {
    /// Kind flags reported by the filtering log for a fired rule.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuleFlags: u16 {
        /// Allowlist (`@@`) rule
        const WHITELIST = 1 << 0;
        /// Cosmetic rule (element hiding, CSS, extended CSS, HTML filtering)
        const CSS = 1 << 1;
        /// Script or scriptlet rule
        const SCRIPT = 1 << 2;
        /// `$cookie` rule
        const COOKIE = 1 << 3;
        /// `$cookie` rule that rewrites rather than removes the cookie
        const MODIFYING_COOKIE = 1 << 4;
        /// Allowlist rule with document-level options
        const DOCUMENT_LEVEL = 1 << 5;
        /// Event is a query parameter removal
        const REMOVEPARAM = 1 << 6;
        /// Event is a header removal
        const REMOVEHEADER = 1 << 7;
    }
}

// =============================================================================
// Rule Kind
// =============================================================================

/// What kind of rule fired, as far as exception synthesis is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleKind {
    /// Plain blocking network rule
    Network,
    /// Request-level allowlist rule
    Allowlist,
    /// Allowlist rule that disables filtering for a whole document
    DocumentLevel,
    /// Element hiding, CSS injection, extended CSS or HTML filtering rule
    Cosmetic,
    /// Script injection or scriptlet rule
    Script,
    /// `$cookie` rule
    Cookie { modifying: bool },
    /// `$removeparam` rule
    RemoveParam,
    /// `$removeheader` rule
    RemoveHeader,
}

impl RuleKind {
    /// Classify log flags. Allowlisting wins over everything else, cosmetic
    /// and script flags win over request modifications.
    pub fn classify(flags: RuleFlags) -> Self {
        if flags.contains(RuleFlags::WHITELIST) {
            if flags.contains(RuleFlags::DOCUMENT_LEVEL) {
                return Self::DocumentLevel;
            }
            return Self::Allowlist;
        }
        if flags.contains(RuleFlags::CSS) {
            return Self::Cosmetic;
        }
        if flags.contains(RuleFlags::SCRIPT) {
            return Self::Script;
        }
        if flags.contains(RuleFlags::REMOVEPARAM) {
            return Self::RemoveParam;
        }
        if flags.contains(RuleFlags::REMOVEHEADER) {
            return Self::RemoveHeader;
        }
        if flags.contains(RuleFlags::COOKIE) {
            return Self::Cookie {
                modifying: flags.contains(RuleFlags::MODIFYING_COOKIE),
            };
        }
        Self::Network
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A rule that took effect for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Rule {
    /// Raw rule source text
    pub rule_text: String,
    /// Parameter or header name for `$removeparam` / `$removeheader`
    pub modifier_value: Option<String>,
    pub whitelist_rule: bool,
    pub css_rule: bool,
    pub script_rule: bool,
    pub cookie_rule: bool,
    pub is_modifying_cookie_rule: bool,
    pub document_level_rule: bool,
}

impl Rule {
    pub fn new(rule_text: impl Into<String>) -> Self {
        Self {
            rule_text: rule_text.into(),
            ..Self::default()
        }
    }

    /// Fold the log's kind booleans into flags.
    pub fn flags(&self) -> RuleFlags {
        let mut flags = RuleFlags::empty();
        flags.set(RuleFlags::WHITELIST, self.whitelist_rule);
        flags.set(RuleFlags::CSS, self.css_rule);
        flags.set(RuleFlags::SCRIPT, self.script_rule);
        flags.set(RuleFlags::COOKIE, self.cookie_rule);
        flags.set(RuleFlags::MODIFYING_COOKIE, self.is_modifying_cookie_rule);
        flags.set(RuleFlags::DOCUMENT_LEVEL, self.document_level_rule);
        flags
    }
}

// =============================================================================
// Event
// =============================================================================

/// One filtered request or cosmetic action from the filtering log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Event {
    pub request_url: String,
    /// Effective domain of the document; a leading `.` means "and subdomains"
    pub frame_domain: String,
    /// Request hostname, when the log recorded it
    pub request_domain: Option<String>,
    /// Rule that took effect, if any
    pub request_rule: Option<Rule>,
    /// `$replace` rules applied to the response
    pub replace_rules: Option<Vec<Rule>>,
    pub cookie_name: Option<String>,
    pub cookie_value: Option<String>,
    /// Affected element, for cosmetic events
    pub element: Option<String>,
    pub request_type: Option<String>,
    pub request_third_party: bool,
    pub remove_param: bool,
    pub remove_header: bool,
}

impl Event {
    /// Rule flags combined with the event-level modification flags.
    pub fn flags(&self) -> RuleFlags {
        let mut flags = match &self.request_rule {
            Some(rule) => rule.flags(),
            None => RuleFlags::empty(),
        };
        flags.set(RuleFlags::REMOVEPARAM, self.remove_param);
        flags.set(RuleFlags::REMOVEHEADER, self.remove_header);
        flags
    }

    /// Kind of the rule that fired, or `None` when no rule did.
    ///
    /// Allowlist rules the log did not flag as document-level are still
    /// classified as such when their options say so.
    pub fn rule_kind(&self, syntax: &FilterSyntax) -> Option<RuleKind> {
        let rule = self.request_rule.as_ref()?;
        match RuleKind::classify(self.flags()) {
            RuleKind::Allowlist if has_document_level_option(&rule.rule_text, syntax) => {
                Some(RuleKind::DocumentLevel)
            }
            kind => Some(kind),
        }
    }

    /// Request hostname: the logged one, else the host of the request URL.
    pub fn effective_request_domain(&self) -> &str {
        match self.request_domain.as_deref() {
            Some(domain) if !domain.is_empty() => domain,
            _ => extract_host(&self.request_url).unwrap_or(""),
        }
    }

    /// Text shown in the log's URL column.
    pub fn display_label(&self) -> Cow<'_, str> {
        if let Some(name) = self.cookie_name.as_deref().filter(|n| !n.is_empty()) {
            let value = self.cookie_value.as_deref().unwrap_or("");
            return Cow::Owned(format!("{} = {}", name, value));
        }
        if let Some(element) = self.element.as_deref().filter(|e| !e.is_empty()) {
            return Cow::Borrowed(element);
        }
        Cow::Borrowed(&self.request_url)
    }
}

// =============================================================================
// Event Status
// =============================================================================

/// How an event is highlighted in the filtering log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum EventStatus {
    /// No rule took effect
    Neutral,
    /// An allowlist rule took effect
    Allowlisted,
    /// The request or page was modified but not blocked
    Modified,
    /// The request was blocked
    Blocked,
}

impl EventStatus {
    pub fn of(event: &Event, syntax: &FilterSyntax) -> Self {
        if event.replace_rules.is_some() {
            return Self::Modified;
        }
        match event.rule_kind(syntax) {
            None => Self::Neutral,
            Some(RuleKind::Allowlist | RuleKind::DocumentLevel) => Self::Allowlisted,
            Some(
                RuleKind::Cosmetic
                | RuleKind::Script
                | RuleKind::RemoveParam
                | RuleKind::Cookie { modifying: true },
            ) => Self::Modified,
            // A stripped header is shown like a blocked request.
            Some(RuleKind::Cookie { modifying: false } | RuleKind::RemoveHeader | RuleKind::Network) => {
                Self::Blocked
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Allowlisted => "allowlisted",
            Self::Modified => "modified",
            Self::Blocked => "blocked",
        }
    }

    /// Row highlight class used by the log table.
    pub fn row_class(self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Allowlisted => Some("green"),
            Self::Modified => Some("yellow"),
            Self::Blocked => Some("red"),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with(rule: Rule) -> Event {
        Event {
            request_url: "https://ads.example.com/banner.js".to_string(),
            frame_domain: "example.com".to_string(),
            request_rule: Some(rule),
            ..Event::default()
        }
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(RuleKind::classify(RuleFlags::empty()), RuleKind::Network);
        assert_eq!(
            RuleKind::classify(RuleFlags::WHITELIST | RuleFlags::CSS),
            RuleKind::Allowlist
        );
        assert_eq!(
            RuleKind::classify(RuleFlags::WHITELIST | RuleFlags::DOCUMENT_LEVEL),
            RuleKind::DocumentLevel
        );
        assert_eq!(
            RuleKind::classify(RuleFlags::CSS | RuleFlags::REMOVEPARAM),
            RuleKind::Cosmetic
        );
        assert_eq!(
            RuleKind::classify(RuleFlags::REMOVEPARAM | RuleFlags::COOKIE),
            RuleKind::RemoveParam
        );
        assert_eq!(
            RuleKind::classify(RuleFlags::COOKIE | RuleFlags::MODIFYING_COOKIE),
            RuleKind::Cookie { modifying: true }
        );
    }

    #[test]
    fn test_rule_kind_uses_document_level_options() {
        let syntax = FilterSyntax::adguard();
        let rule = Rule {
            whitelist_rule: true,
            ..Rule::new("@@||example.org^$urlblock")
        };
        assert_eq!(event_with(rule).rule_kind(&syntax), Some(RuleKind::DocumentLevel));

        let rule = Rule {
            whitelist_rule: true,
            ..Rule::new("@@||example.org^$script")
        };
        assert_eq!(event_with(rule).rule_kind(&syntax), Some(RuleKind::Allowlist));

        assert_eq!(Event::default().rule_kind(&syntax), None);
    }

    #[test]
    fn test_event_status() {
        let syntax = FilterSyntax::adguard();
        assert_eq!(EventStatus::of(&Event::default(), &syntax), EventStatus::Neutral);
        assert_eq!(
            EventStatus::of(&event_with(Rule::new("||ads.example.com^")), &syntax),
            EventStatus::Blocked
        );

        let cookie = Rule {
            cookie_rule: true,
            ..Rule::new("$cookie=_ga")
        };
        assert_eq!(EventStatus::of(&event_with(cookie.clone()), &syntax), EventStatus::Blocked);
        let modifying = Rule {
            is_modifying_cookie_rule: true,
            ..cookie
        };
        assert_eq!(EventStatus::of(&event_with(modifying), &syntax), EventStatus::Modified);

        let allow = Rule {
            whitelist_rule: true,
            ..Rule::new("@@||example.com^")
        };
        let mut replaced = event_with(allow.clone());
        assert_eq!(EventStatus::of(&replaced, &syntax), EventStatus::Allowlisted);
        replaced.replace_rules = Some(vec![Rule::new("||example.com^$replace=/a/b/")]);
        assert_eq!(EventStatus::of(&replaced, &syntax), EventStatus::Modified);
        assert_eq!(EventStatus::Modified.row_class(), Some("yellow"));
    }

    #[test]
    fn test_event_status_of_modifier_rules() {
        let syntax = FilterSyntax::adguard();
        let mut event = event_with(Rule::new("||example.com^$removeparam=utm_source"));
        event.remove_param = true;
        assert_eq!(EventStatus::of(&event, &syntax), EventStatus::Modified);

        let mut event = event_with(Rule::new("||example.com^$removeheader=refresh"));
        event.remove_header = true;
        assert_eq!(EventStatus::of(&event, &syntax), EventStatus::Blocked);
        assert_eq!(EventStatus::Blocked.row_class(), Some("red"));
    }

    #[test]
    fn test_display_label() {
        let mut event = event_with(Rule::new("||ads.example.com^"));
        assert_eq!(event.display_label(), "https://ads.example.com/banner.js");
        event.element = Some("<div class=\"ad\">".to_string());
        assert_eq!(event.display_label(), "<div class=\"ad\">");
        event.cookie_name = Some("_ga".to_string());
        event.cookie_value = Some("GA1.2".to_string());
        assert_eq!(event.display_label(), "_ga = GA1.2");
    }

    #[test]
    fn test_effective_request_domain() {
        let mut event = event_with(Rule::default());
        assert_eq!(event.effective_request_domain(), "ads.example.com");
        event.request_domain = Some("cdn.example.net".to_string());
        assert_eq!(event.effective_request_domain(), "cdn.example.net");
    }

    #[test]
    fn test_deserialize_log_record() {
        let json = r#"{
            "requestUrl": "https://example.com/?utm_source=x",
            "frameDomain": "example.com",
            "removeParam": true,
            "requestRule": {
                "ruleText": "$removeparam=utm_source",
                "modifierValue": "utm_source",
                "filterId": 1
            }
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.remove_param);
        assert_eq!(
            event.rule_kind(FilterSyntax::shared()),
            Some(RuleKind::RemoveParam)
        );
        assert_eq!(
            event.request_rule.unwrap().modifier_value.as_deref(),
            Some("utm_source")
        );
    }
}
