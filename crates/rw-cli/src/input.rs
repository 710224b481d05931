use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;

use rw_core::{Event, FilterSyntax};

/// A filtering-log export holds either one event or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum EventInput {
    Many(Vec<Event>),
    One(Event),
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))
}

pub fn parse_events(text: &str) -> Result<Vec<Event>, String> {
    let input: EventInput =
        serde_json::from_str(text).map_err(|e| format!("Invalid event record: {}", e))?;
    Ok(match input {
        EventInput::Many(events) => events,
        EventInput::One(event) => vec![event],
    })
}

pub fn read_events(path: &str) -> Result<Vec<Event>, String> {
    let events = parse_events(&read_input(path)?)?;
    tracing::debug!(count = events.len(), source = path, "loaded events");
    Ok(events)
}

/// Load and validate a syntax table, or fall back to the AdGuard table.
pub fn load_syntax(path: Option<&Path>) -> Result<FilterSyntax, String> {
    let path = match path {
        Some(path) => path,
        None => return Ok(FilterSyntax::adguard()),
    };

    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let syntax: FilterSyntax = serde_json::from_str(&text)
        .map_err(|e| format!("Invalid syntax table '{}': {}", path.display(), e))?;
    syntax
        .validate()
        .map_err(|e| format!("Invalid syntax table '{}': {}", path.display(), e))?;

    tracing::debug!(version = syntax.version, path = %path.display(), "loaded syntax table");
    Ok(syntax)
}
