//! Network rule options
//!
//! Only the option *names* matter here: the wizard needs to know whether an
//! allowlist rule disables filtering for a whole document, not what each
//! option's value means.

use crate::syntax::FilterSyntax;

/// Split a network rule into its pattern and options at the first options
/// delimiter.
pub fn split_rule_options<'a>(rule_text: &'a str, syntax: &FilterSyntax) -> (&'a str, Option<&'a str>) {
    let delimiter = syntax.options_delimiter.as_str();
    match rule_text.find(delimiter) {
        Some(pos) => (&rule_text[..pos], Some(&rule_text[pos + delimiter.len()..])),
        None => (rule_text, None),
    }
}

/// Option names in an options section, without `~` negation or `=value`.
pub fn option_names(options: &str) -> impl Iterator<Item = &str> {
    options
        .split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let raw = raw.strip_prefix('~').unwrap_or(raw);
            match raw.find('=') {
                Some(eq_pos) => &raw[..eq_pos],
                None => raw,
            }
        })
}

/// Options whose effect spans the whole document.
pub fn is_document_level_option(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "document"
            | "doc"
            | "urlblock"
            | "elemhide"
            | "ehide"
            | "generichide"
            | "ghide"
            | "specifichide"
            | "shide"
            | "genericblock"
            | "jsinject"
            | "content"
            | "extension"
            | "stealth"
    )
}

/// Whether `rule_text` carries at least one document-level option.
pub fn has_document_level_option(rule_text: &str, syntax: &FilterSyntax) -> bool {
    match split_rule_options(rule_text, syntax) {
        (_, Some(options)) => option_names(options).any(is_document_level_option),
        (_, None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_rule_options() {
        let syntax = FilterSyntax::adguard();
        assert_eq!(
            split_rule_options("@@||example.org^$urlblock,third-party", &syntax),
            ("@@||example.org^", Some("urlblock,third-party"))
        );
        assert_eq!(split_rule_options("||example.org^", &syntax), ("||example.org^", None));
        assert_eq!(split_rule_options("||example.org^$", &syntax), ("||example.org^", Some("")));
    }

    #[test]
    fn test_option_names() {
        let names: Vec<&str> = option_names("~third-party, domain=a.com|b.com,,removeparam=utm").collect();
        assert_eq!(names, vec!["third-party", "domain", "removeparam"]);
    }

    #[test]
    fn test_has_document_level_option() {
        let syntax = FilterSyntax::adguard();
        assert!(has_document_level_option("@@||example.org^$urlblock", &syntax));
        assert!(has_document_level_option("@@||example.org^$script,Document", &syntax));
        assert!(has_document_level_option("@@||example.org^$~third-party,elemhide", &syntax));
        assert!(!has_document_level_option("@@||example.org^$script", &syntax));
        assert!(!has_document_level_option("@@||example.org^", &syntax));
    }
}
