//! RuleWizard Core Library
//!
//! This crate turns filtering-log events into filter rule text. It never
//! matches rules itself: the events it consumes were already produced by a
//! filtering engine, and the strings it returns are handed back to the UI.
//!
//! # Architecture
//!
//! Every operation is a pure string transformation over a small, irregular
//! rule grammar. The grammar's markers live in an explicitly passed
//! [`FilterSyntax`] table, so the generators can follow a syntax revision
//! without code changes.
//!
//! # Modules
//!
//! - `syntax`: versioned marker table (anchors, delimiters, cosmetic markers)
//! - `url`: scheme/protocol decomposition of request URLs
//! - `domain`: second-level domain and subdomain-marker helpers
//! - `options`: network rule option splitting
//! - `types`: event and rule model, rule kind classification
//! - `patterns`: candidate blocking/allowlist patterns for a URL
//! - `exception`: exception rules that undo a rule that already fired
//! - `wizard`: facade binding a syntax table to the generators

pub mod domain;
pub mod exception;
pub mod options;
pub mod patterns;
pub mod syntax;
pub mod types;
pub mod url;
pub mod wizard;

// Re-export commonly used types
pub use exception::{exception_rules, generate_exception_rule};
pub use patterns::split_to_patterns;
pub use syntax::{CosmeticMarker, FilterSyntax, SyntaxError};
pub use types::{Event, EventStatus, Rule, RuleFlags, RuleKind};
pub use wizard::RuleWizard;
