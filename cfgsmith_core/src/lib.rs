//! `cfgsmith_core` extracts structured records from indented device
//! configuration text with a declarative template, drops the records whose
//! values start with an ignore prefix, renders the rest through an output
//! template, and writes the result only when it changed.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Extraction template
//!   → Compiler (splits lines into literal / placeholder segments, builds the indentation tree)
//! Device configuration
//!   → Matcher (scans lines with a stack of open template lines, one record per root match)
//!   → Filter (partitions records into kept / ignored by prefix)
//!   → Renderer (substitutes each kept record into the output template)
//!   → Writer (persists the text only when it differs from the destination)
//! ```
//!
//! ## Template Syntax
//!
//! Each template line is literal text with `{{ name }}` placeholders. The
//! first unindented line identifies a block; indented lines below it are
//! optional children that add fields when they match a line inside the
//! block:
//!
//! ```text
//! interface {{ ifname }}
//!  description {{ desc }}
//!  ip address {{ ip }} {{ mask }}
//! ```
//!
//! A placeholder captures one whitespace-free word, except at the end of a
//! line where it captures the trimmed remainder.
//!
//! ## Modules
//!
//! - [`config`]: job files (`cfgsmith.toml`, or an explicit TOML, JSON or
//!   YAML file) describing the inputs of a run.
//!
//! ## Quick Start
//!
//! ```rust
//! use cfgsmith_core::IgnorePrefixes;
//! use cfgsmith_core::render_text;
//!
//! # fn main() -> cfgsmith_core::CfgResult<()> {
//! let config = "interface Gi0/0\n ip proxy-arp\n!\ninterface Vlan1\n ip proxy-arp\n";
//! let template = "interface {{ ifname }}\n no ip proxy-arp";
//! let ignore = IgnorePrefixes::new(["Gi"]);
//!
//! let outcome = render_text(config, template, template, &ignore)?;
//! assert_eq!(outcome.rendered, "interface Vlan1\n no ip proxy-arp");
//! assert_eq!(outcome.ignored.len(), 1);
//! # Ok(())
//! # }
//! ```

pub use config::JobConfig;
pub use config::KeysIgnore;
pub use engine::*;
pub use error::*;
pub use filter::*;
pub use matcher::*;
pub use pipeline::*;
pub use record::*;
pub use scanner::ConfigLine;
pub use scanner::ConfigLines;
pub use source::*;
pub use template::*;
pub use tokens::Segment;
pub use writer::*;

pub mod config;
mod engine;
mod error;
mod filter;
pub(crate) mod lexer;
mod matcher;
mod pipeline;
mod record;
pub(crate) mod scanner;
mod source;
mod template;
pub(crate) mod tokens;
mod writer;
