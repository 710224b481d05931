//! Candidate patterns for a new rule
//!
//! Given a request URL and its domain, offer patterns from most to least
//! specific: the full URL, up to two path levels, the domain, and the
//! second-level domain.

use crate::domain::second_level_domain;
use crate::syntax::FilterSyntax;
use crate::url::{get_protocol, get_url_without_scheme, is_hierarchic_url, substring_after, substring_before};

/// Maximum number of path-level patterns.
const PATTERNS_COUNT: usize = 2;

/// Split a request URL into blocking (or, with `is_allowlist`, allowlisting)
/// patterns.
///
/// Hierarchic URLs are anchored with the start-of-address anchor; opaque
/// ones (`stun:`, `turn:`) are prefixed with their protocol instead.
pub fn split_to_patterns(
    request_url: &str,
    domain: &str,
    is_allowlist: bool,
    syntax: &FilterSyntax,
) -> Vec<String> {
    let mut prefix = if is_hierarchic_url(request_url) {
        syntax.start_url.clone()
    } else {
        get_protocol(request_url).to_string()
    };
    if is_allowlist {
        prefix.insert_str(0, &syntax.allowlist);
    }

    let domain_root = format!("{}/", domain);
    let mut patterns = Vec::new();

    // Least specific first; reversed at the end.
    let second_level = second_level_domain(domain);
    if second_level != domain {
        patterns.push(format!("{}{}{}", prefix, second_level, syntax.separator));
    }
    patterns.push(format!("{}{}{}", prefix, domain, syntax.separator));

    let relative = substring_after(request_url, &domain_root);
    let path = substring_before(relative, "?");
    if !path.is_empty() {
        let parts: Vec<&str> = path.split('/').collect();

        let mut pattern = domain_root.clone();
        let mut path_patterns = 0;
        for part in parts.iter().take((parts.len() - 1).min(PATTERNS_COUNT)) {
            pattern.push_str(part);
            pattern.push('/');
            patterns.push(format!("{}{}", prefix, pattern));
            path_patterns += 1;
        }

        if let Some(file) = parts.last().filter(|f| !f.is_empty()) {
            if path_patterns < PATTERNS_COUNT {
                pattern.push_str(file);
                patterns.push(format!("{}{}", prefix, pattern));
            }
        }
    }

    // ||example.com/ would only repeat ||example.com^
    let url = get_url_without_scheme(request_url);
    if url != domain_root {
        let full = format!("{}{}", prefix, url);
        if !patterns.contains(&full) {
            patterns.push(full);
        }
    }

    patterns.reverse();
    patterns
}
