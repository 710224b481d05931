//! WebAssembly bindings for RuleWizard

use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record};
use rw_core::{Event, FilterSyntax, RuleWizard};
use wasm_bindgen::prelude::*;

static SYNTAX: OnceLock<FilterSyntax> = OnceLock::new();

/// Forwards core diagnostics to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            _ => web_sys::console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn wizard() -> RuleWizard<'static> {
    RuleWizard::new(SYNTAX.get().unwrap_or_else(FilterSyntax::shared))
}

fn parse_event(event_json: &str) -> Result<Event, JsValue> {
    serde_json::from_str(event_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid event record: {}", e)))
}

fn to_array(items: &[String]) -> js_sys::Array {
    items.iter().map(|s| JsValue::from_str(s)).collect()
}

/// Install the console logger and, optionally, a JSON syntax table.
/// Without `init` the default AdGuard syntax is used.
#[wasm_bindgen]
pub fn init(syntax_json: Option<String>) -> Result<(), JsValue> {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    let syntax = match syntax_json {
        Some(json) => serde_json::from_str::<FilterSyntax>(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid syntax table: {}", e)))?,
        None => FilterSyntax::adguard(),
    };
    syntax
        .validate()
        .map_err(|e| JsValue::from_str(&format!("Invalid syntax table: {}", e)))?;

    SYNTAX
        .set(syntax)
        .map_err(|_| JsValue::from_str("Already initialized. Reload the page to reinitialize."))
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    SYNTAX.get().is_some()
}

#[wasm_bindgen]
pub fn split_to_patterns(request_url: &str, domain: &str, is_allowlist: bool) -> js_sys::Array {
    to_array(&wizard().patterns(request_url, domain, is_allowlist))
}

#[wasm_bindgen]
pub fn exception_rules(event_json: &str) -> Result<js_sys::Array, JsValue> {
    let event = parse_event(event_json)?;
    Ok(to_array(&wizard().exception_rules(&event)))
}

/// Status, row class and URL-column label of a logged event.
#[wasm_bindgen]
pub fn event_status(event_json: &str) -> Result<JsValue, JsValue> {
    let event = parse_event(event_json)?;
    let status = wizard().status(&event);

    let result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&result, &"status".into(), &JsValue::from_str(status.as_str()));
    let row_class = match status.row_class() {
        Some(class) => JsValue::from_str(class),
        None => JsValue::NULL,
    };
    let _ = js_sys::Reflect::set(&result, &"rowClass".into(), &row_class);
    let _ = js_sys::Reflect::set(&result, &"label".into(), &JsValue::from_str(&event.display_label()));
    Ok(result.into())
}
