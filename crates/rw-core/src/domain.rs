//! Domain helpers
//!
//! The wizard offers a "whole site" pattern built from the last two labels
//! of a domain. This is deliberately not an eTLD+1 lookup: `example.co.uk`
//! yields `co.uk`, matching what users see in the filtering log today.
//!
//! # Examples
//!
//! ```
//! use rw_core::domain::second_level_domain;
//!
//! assert_eq!(second_level_domain("sub.example.com"), "example.com");
//! assert_eq!(second_level_domain("localhost"), "localhost");
//! ```

/// Last two dot-separated labels of `domain`.
#[inline]
pub fn second_level_domain(domain: &str) -> &str {
    let last_dot = match domain.rfind('.') {
        Some(pos) => pos,
        None => return domain,
    };
    match domain[..last_dot].rfind('.') {
        Some(pos) => &domain[pos + 1..],
        None => domain,
    }
}

/// Drop one leading subdomain marker (`.example.com` -> `example.com`).
#[inline]
pub fn strip_subdomain_marker(domain: &str, marker: char) -> &str {
    domain.strip_prefix(marker).unwrap_or(domain)
}
