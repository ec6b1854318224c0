//! Shipped sources.
//!
//! Sources are data: each one is a registration (name, base URL, tier, URL
//! template, layout, bangs) bound to a shared layout parser.

mod catalog;
mod layouts;

pub use catalog::{default_bangs, default_engines, default_parsers, default_registry};
