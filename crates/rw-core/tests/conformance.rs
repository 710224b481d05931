//! End-to-end scenarios over filtering-log JSON records.

use rw_core::{Event, EventStatus, RuleKind, RuleWizard};

fn event(json: &str) -> Event {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_pattern_order_is_most_specific_first() {
    let wizard = RuleWizard::default();
    let patterns = wizard.patterns("https://example.com/a/b/c.js?x=1", "example.com", false);
    assert_eq!(patterns.first().map(String::as_str), Some("||example.com/a/b/c.js?x=1"));
    assert!(patterns.contains(&"||example.com/a/".to_string()));
    assert!(patterns.contains(&"||example.com/a/b/".to_string()));
    assert_eq!(patterns.last().map(String::as_str), Some("||example.com^"));
}

#[test]
fn test_second_level_domain_follows_domain_root() {
    let wizard = RuleWizard::default();
    let patterns = wizard.patterns("https://static.cdn.example.com/x.png", "static.cdn.example.com", false);
    let n = patterns.len();
    assert_eq!(patterns[n - 2], "||static.cdn.example.com^");
    assert_eq!(patterns[n - 1], "||example.com^");
}

#[test]
fn test_blocked_request_record() {
    let wizard = RuleWizard::default();
    let event = event(
        r#"{
            "requestUrl": "https://tracker.example.net/pixel.gif?id=1",
            "frameDomain": "news.example.org",
            "requestType": "image",
            "requestThirdParty": true,
            "requestRule": { "ruleText": "||tracker.example.net^$third-party" }
        }"#,
    );

    assert_eq!(wizard.rule_kind(&event), Some(RuleKind::Network));
    assert_eq!(wizard.status(&event), EventStatus::Blocked);
    assert_eq!(
        wizard.exception_rules(&event),
        vec![
            "@@||tracker.example.net/pixel.gif?id=1",
            "@@||tracker.example.net/pixel.gif",
            "@@||tracker.example.net^",
            "@@||example.net^",
        ]
    );
}

#[test]
fn test_cookie_record() {
    let wizard = RuleWizard::default();
    let event = event(
        r#"{
            "frameDomain": ".shop.example.com",
            "cookieName": "_ga",
            "cookieValue": "GA1.2.3",
            "requestRule": { "ruleText": "$cookie=_ga", "cookieRule": true }
        }"#,
    );

    assert_eq!(wizard.rule_kind(&event), Some(RuleKind::Cookie { modifying: false }));
    assert_eq!(event.display_label(), "_ga = GA1.2.3");
    assert_eq!(wizard.exception_rules(&event), vec!["@@||shop.example.com^"]);
}

#[test]
fn test_removeheader_record() {
    let wizard = RuleWizard::default();
    let event = event(
        r#"{
            "requestUrl": "https://example.com/",
            "frameDomain": "example.com",
            "removeHeader": true,
            "requestRule": { "ruleText": "||example.com^$removeheader=refresh", "modifierValue": "refresh" }
        }"#,
    );

    assert_eq!(wizard.status(&event), EventStatus::Blocked);
    assert_eq!(
        wizard.exception_rules(&event),
        vec!["@@||example.com^$removeheader=refresh", "@@||example.com^$removeheader"]
    );
}

#[test]
fn test_document_level_record() {
    let wizard = RuleWizard::default();
    let event = event(
        r#"{
            "requestUrl": "https://example.org/",
            "frameDomain": "example.org",
            "requestRule": {
                "ruleText": "@@||example.org^$document",
                "whitelistRule": true,
                "documentLevelRule": true
            }
        }"#,
    );

    assert_eq!(wizard.status(&event), EventStatus::Allowlisted);
    assert_eq!(wizard.exception_rules(&event), vec!["@@||example.org^$document,badfilter"]);
}
