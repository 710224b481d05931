//! Exception rules for rules that already fired
//!
//! Each generator takes the rule reported by the filtering log and produces
//! the rule text that disables it. Generators never fail: a rule whose text
//! does not carry the expected marker yields an empty string and a log
//! diagnostic, so the wizard stays usable for syntaxes it does not know.

use crate::domain::strip_subdomain_marker;
use crate::patterns::split_to_patterns;
use crate::syntax::{CosmeticMarker, FilterSyntax};
use crate::types::{Event, Rule, RuleKind};

// =============================================================================
// Marker Splicing
// =============================================================================

/// Rewrite the part of `rule_text` from the first `mask` on as an exception:
/// `example.org##.ad` with mask `##` gives `#@#.ad`.
///
/// Returns `None` when `mask` does not occur. Markers are ASCII (see
/// [`FilterSyntax::validate`]), so the offsets below fall on char boundaries.
pub fn generate_exception_rule(rule_text: &str, mask: &str, syntax: &FilterSyntax) -> Option<String> {
    let mask_index = rule_text.find(mask)?;
    let body = &rule_text[mask_index + mask.len()..];

    let first_len = mask.chars().next().map_or(0, char::len_utf8);
    let mut result = String::with_capacity(mask.len() + 1 + body.len());
    result.push_str(&mask[..first_len]);
    result.push(syntax.exception_mark);
    result.push_str(&mask[first_len..]);
    result.push_str(body);
    Some(result)
}

// =============================================================================
// Network Rules
// =============================================================================

/// Disable a document-level rule with `$badfilter`:
/// `@@||example.org^$urlblock` -> `@@||example.org^$urlblock,badfilter`.
pub fn create_document_level_block_rule(rule: &Rule, syntax: &FilterSyntax) -> String {
    let rule_text = rule.rule_text.as_str();
    if rule_text.contains(syntax.options_delimiter.as_str()) {
        format!("{},{}", rule_text, syntax.badfilter)
    } else {
        format!("{}{}{}", rule_text, syntax.options_delimiter, syntax.badfilter)
    }
}

/// `@@||{domain}^${option}`
pub fn get_unblock_domain_rule(domain: &str, rule_option: &str, syntax: &FilterSyntax) -> String {
    format!(
        "{}{}{}{}{}{}",
        syntax.allowlist, syntax.start_url, domain, syntax.separator, syntax.options_delimiter, rule_option
    )
}

/// Unblock rules for one modifier option: the exact `option=value` first,
/// then the bare option covering every value on the domain. Without a
/// modifier value only the bare option is returned.
fn create_modifier_exception_rules(event: &Event, option: &str, syntax: &FilterSyntax) -> Vec<String> {
    let domain = event.frame_domain.as_str();
    let mut rules = Vec::with_capacity(2);

    match event.request_rule.as_ref().and_then(|r| r.modifier_value.as_deref()) {
        Some(value) => rules.push(get_unblock_domain_rule(domain, &format!("{}={}", option, value), syntax)),
        None => log::warn!(
            "No modifier value for ${} exception on {}, offering the bare option only",
            option,
            event.request_url
        ),
    }

    rules.push(get_unblock_domain_rule(domain, option, syntax));
    rules
}

pub fn create_exception_remove_param_rules(event: &Event, syntax: &FilterSyntax) -> Vec<String> {
    create_modifier_exception_rules(event, &syntax.removeparam, syntax)
}

pub fn create_exception_remove_header_rules(event: &Event, syntax: &FilterSyntax) -> Vec<String> {
    create_modifier_exception_rules(event, &syntax.removeheader, syntax)
}

// =============================================================================
// Cosmetic, Script and Cookie Rules
// =============================================================================

/// Exception for an element hiding, CSS, extended CSS or HTML filtering rule,
/// scoped to the event's frame domain.
pub fn create_exception_css_rule(rule: &Rule, event: &Event, syntax: &FilterSyntax) -> String {
    for marker in CosmeticMarker::PRIORITY {
        let mask = syntax.cosmetic_marker(marker);
        if let Some(exception) = generate_exception_rule(&rule.rule_text, mask, syntax) {
            return format!("{}{}", event.frame_domain, exception);
        }
    }

    log::error!("Cannot create a cosmetic exception for the rule: {}", rule.rule_text);
    String::new()
}

/// Exception for a script rule; `#%#` is tried before the `##` scriptlet form.
pub fn create_exception_script_rule(rule: &Rule, event: &Event, syntax: &FilterSyntax) -> String {
    for mask in syntax.script_markers() {
        if let Some(exception) = generate_exception_rule(&rule.rule_text, mask, syntax) {
            return format!("{}{}", event.frame_domain, exception);
        }
    }

    log::warn!("Cannot create a script exception for the rule: {}", rule.rule_text);
    String::new()
}

/// Cookie rules are exempted per domain, whatever the original rule said.
pub fn create_exception_cookie_rule(_rule: &Rule, event: &Event, syntax: &FilterSyntax) -> String {
    let domain = strip_subdomain_marker(&event.frame_domain, syntax.subdomain_marker);
    format!("{}{}{}{}", syntax.allowlist, syntax.start_url, domain, syntax.separator)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Rules the wizard offers for an event.
///
/// When no rule fired these are blocking patterns for the request; a blocked
/// request gets allowlist patterns; every other kind gets the exception that
/// undoes the rule. Empty results are dropped.
pub fn exception_rules(event: &Event, syntax: &FilterSyntax) -> Vec<String> {
    let rules = match (event.request_rule.as_ref(), event.rule_kind(syntax)) {
        (Some(rule), Some(kind)) => {
            log::debug!("Creating exception for {:?} rule: {}", kind, rule.rule_text);
            rules_for_kind(rule, kind, event, syntax)
        }
        _ => request_patterns(event, false, syntax),
    };

    rules.into_iter().filter(|r| !r.is_empty()).collect()
}

fn rules_for_kind(rule: &Rule, kind: RuleKind, event: &Event, syntax: &FilterSyntax) -> Vec<String> {
    match kind {
        RuleKind::Network => request_patterns(event, true, syntax),
        RuleKind::Allowlist | RuleKind::DocumentLevel => {
            vec![create_document_level_block_rule(rule, syntax)]
        }
        RuleKind::Cosmetic => vec![create_exception_css_rule(rule, event, syntax)],
        RuleKind::Script => vec![create_exception_script_rule(rule, event, syntax)],
        RuleKind::Cookie { .. } => vec![create_exception_cookie_rule(rule, event, syntax)],
        RuleKind::RemoveParam => create_exception_remove_param_rules(event, syntax),
        RuleKind::RemoveHeader => create_exception_remove_header_rules(event, syntax),
    }
}

/// Patterns for the event's request. An event with no request domain gets
/// none; a pattern built from an empty domain would match every request.
fn request_patterns(event: &Event, is_allowlist: bool, syntax: &FilterSyntax) -> Vec<String> {
    let domain = event.effective_request_domain();
    if domain.is_empty() {
        log::warn!("Cannot create a rule for an event without a request domain: {:?}", event.request_url);
        return Vec::new();
    }
    split_to_patterns(&event.request_url, domain, is_allowlist, syntax)
}
