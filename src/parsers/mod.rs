//! HTML layouts understood by the pipeline.
//!
//! Sources that share markup share a parser; the [`ParserTable`] maps a
//! layout name to its parser so engine descriptors can be declared as data.

mod generic;
mod phub;
mod thumb_block;

use std::collections::HashMap;
use std::sync::Arc;

pub use generic::{GenericLayout, LayoutSelectors};
pub use phub::PhubLayout;
pub use thumb_block::ThumbBlockLayout;

use crate::{Parser, Result, SearchError};

/// Immutable table of parsers keyed by layout name.
#[derive(Default, Clone)]
pub struct ParserTable {
    parsers: HashMap<String, Arc<dyn Parser>>,
}

impl ParserTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parser under its layout name.
    pub fn insert<P: Parser + 'static>(&mut self, parser: P) {
        self.parsers
            .insert(parser.layout().to_string(), Arc::new(parser));
    }

    /// Looks up a parser by layout name.
    pub fn get(&self, layout: &str) -> Result<Arc<dyn Parser>> {
        self.parsers
            .get(layout)
            .cloned()
            .ok_or_else(|| SearchError::Config(format!("no parser registered for layout '{layout}'")))
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}
