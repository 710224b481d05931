//! Filter rule syntax table
//!
//! The generators never hard-code rule markers. Everything they splice into
//! rule text comes from a [`FilterSyntax`], which can be loaded from JSON to
//! follow a different syntax revision.
//!
//! Markers are located with a plain substring search and the exception mark
//! is inserted at a byte offset, so every marker must be ASCII and no
//! cosmetic marker may contain a marker that is tried before it.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Newest syntax table revision understood by this crate.
pub const SYNTAX_VERSION: u32 = 1;

// =============================================================================
// Errors
// =============================================================================

/// Error type for syntax table validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unsupported syntax version: {0}")]
    UnsupportedVersion(u32),
    #[error("Marker '{0}' is empty")]
    EmptyMarker(&'static str),
    #[error("Marker '{name}' is not ASCII: {value:?}")]
    NonAsciiMarker { name: &'static str, value: String },
    #[error("Invalid exception mark: {0:?}")]
    InvalidExceptionMark(char),
    #[error("Marker '{shadowed}' contains higher-priority marker '{by}'")]
    ShadowedMarker {
        shadowed: &'static str,
        by: &'static str,
    },
}

// =============================================================================
// Cosmetic Markers
// =============================================================================

/// Cosmetic rule marker kinds, as separators between domains and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CosmeticMarker {
    /// CSS injection (`#$#`)
    Css,
    /// Extended-CSS element hiding (`#?#`)
    ElementHidingExtCss,
    /// Extended-CSS injection (`#$?#`)
    CssExtCss,
    /// Element hiding (`##`)
    ElementHiding,
    /// HTML filtering (`$$`)
    Html,
}

impl CosmeticMarker {
    /// Order in which markers are looked up in a cosmetic rule.
    pub const PRIORITY: [CosmeticMarker; 5] = [
        CosmeticMarker::Css,
        CosmeticMarker::ElementHidingExtCss,
        CosmeticMarker::CssExtCss,
        CosmeticMarker::ElementHiding,
        CosmeticMarker::Html,
    ];

    /// Field name of this marker in the syntax table.
    pub fn name(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::ElementHidingExtCss => "elementHidingExtCss",
            Self::CssExtCss => "cssExtCss",
            Self::ElementHiding => "elementHiding",
            Self::Html => "html",
        }
    }
}

// =============================================================================
// Syntax Table
// =============================================================================

/// Versioned table of the markers used by the filter rule grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FilterSyntax {
    /// Table revision
    pub version: u32,
    /// Allowlist marker (`@@`)
    pub allowlist: String,
    /// Start-of-address anchor (`||`)
    pub start_url: String,
    /// Separator token (`^`)
    pub separator: String,
    /// Network rule options delimiter (`$`)
    pub options_delimiter: String,
    /// Option that disables another rule (`badfilter`)
    pub badfilter: String,
    /// Indicator inserted into a marker to make it an exception marker
    pub exception_mark: char,
    /// Leading domain marker meaning "and subdomains"
    pub subdomain_marker: char,
    pub css: String,
    pub element_hiding_ext_css: String,
    pub css_ext_css: String,
    pub element_hiding: String,
    pub html: String,
    /// Script rule marker (`#%#`)
    pub js: String,
    /// uBO-style scriptlet marker (`##`)
    pub legacy_script: String,
    /// `$removeparam` option name
    pub removeparam: String,
    /// `$removeheader` option name
    pub removeheader: String,
}

impl Default for FilterSyntax {
    fn default() -> Self {
        Self::adguard()
    }
}

static SHARED_SYNTAX: OnceLock<FilterSyntax> = OnceLock::new();

impl FilterSyntax {
    /// AdGuard filter syntax.
    pub fn adguard() -> Self {
        Self {
            version: SYNTAX_VERSION,
            allowlist: "@@".to_string(),
            start_url: "||".to_string(),
            separator: "^".to_string(),
            options_delimiter: "$".to_string(),
            badfilter: "badfilter".to_string(),
            exception_mark: '@',
            subdomain_marker: '.',
            css: "#$#".to_string(),
            element_hiding_ext_css: "#?#".to_string(),
            css_ext_css: "#$?#".to_string(),
            element_hiding: "##".to_string(),
            html: "$$".to_string(),
            js: "#%#".to_string(),
            legacy_script: "##".to_string(),
            removeparam: "removeparam".to_string(),
            removeheader: "removeheader".to_string(),
        }
    }

    /// Process-wide default table. Initialized once, read-only afterwards.
    pub fn shared() -> &'static FilterSyntax {
        SHARED_SYNTAX.get_or_init(FilterSyntax::adguard)
    }

    /// Marker text for a cosmetic rule kind.
    #[inline]
    pub fn cosmetic_marker(&self, marker: CosmeticMarker) -> &str {
        match marker {
            CosmeticMarker::Css => &self.css,
            CosmeticMarker::ElementHidingExtCss => &self.element_hiding_ext_css,
            CosmeticMarker::CssExtCss => &self.css_ext_css,
            CosmeticMarker::ElementHiding => &self.element_hiding,
            CosmeticMarker::Html => &self.html,
        }
    }

    /// Script rule markers in lookup order.
    #[inline]
    pub fn script_markers(&self) -> [&str; 2] {
        [self.js.as_str(), self.legacy_script.as_str()]
    }

    fn markers(&self) -> [(&'static str, &str); 14] {
        [
            ("allowlist", self.allowlist.as_str()),
            ("startUrl", self.start_url.as_str()),
            ("separator", self.separator.as_str()),
            ("optionsDelimiter", self.options_delimiter.as_str()),
            ("badfilter", self.badfilter.as_str()),
            ("css", self.css.as_str()),
            ("elementHidingExtCss", self.element_hiding_ext_css.as_str()),
            ("cssExtCss", self.css_ext_css.as_str()),
            ("elementHiding", self.element_hiding.as_str()),
            ("html", self.html.as_str()),
            ("js", self.js.as_str()),
            ("legacyScript", self.legacy_script.as_str()),
            ("removeparam", self.removeparam.as_str()),
            ("removeheader", self.removeheader.as_str()),
        ]
    }

    /// Check that the table can be used by the generators.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        if self.version == 0 || self.version > SYNTAX_VERSION {
            return Err(SyntaxError::UnsupportedVersion(self.version));
        }

        for (name, value) in self.markers() {
            if value.is_empty() {
                return Err(SyntaxError::EmptyMarker(name));
            }
            if !value.is_ascii() {
                return Err(SyntaxError::NonAsciiMarker {
                    name,
                    value: value.to_string(),
                });
            }
        }

        if !self.subdomain_marker.is_ascii() {
            return Err(SyntaxError::NonAsciiMarker {
                name: "subdomainMarker",
                value: self.subdomain_marker.to_string(),
            });
        }

        if !self.exception_mark.is_ascii() || self.exception_mark.is_ascii_alphanumeric() {
            return Err(SyntaxError::InvalidExceptionMark(self.exception_mark));
        }

        let cosmetic: Vec<(&'static str, &str)> = CosmeticMarker::PRIORITY
            .iter()
            .map(|&m| (m.name(), self.cosmetic_marker(m)))
            .collect();
        check_shadowing(&cosmetic)?;
        check_shadowing(&[("js", self.js.as_str()), ("legacyScript", self.legacy_script.as_str())])?;

        Ok(())
    }
}

/// A marker that contains an earlier one can never be reached by a
/// first-match lookup.
fn check_shadowing(ordered: &[(&'static str, &str)]) -> Result<(), SyntaxError> {
    for (i, &(earlier_name, earlier)) in ordered.iter().enumerate() {
        for &(later_name, later) in &ordered[i + 1..] {
            if later.contains(earlier) {
                return Err(SyntaxError::ShadowedMarker {
                    shadowed: later_name,
                    by: earlier_name,
                });
            }
        }
    }
    Ok(())
}
