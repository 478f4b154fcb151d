// src/builder/mod.rs
// =============================================================================
// The graph builder: explores outward from one seed per language and
// produces a capped, policy-filtered multilingual GraphStore.
//
// Submodules:
// - frontier: per-language queues and the round-robin scheduler
// - traversal: GraphBuilder itself
// =============================================================================

mod frontier;
mod traversal;

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SourceError;
use crate::graph::GraphStore;

pub use traversal::GraphBuilder;

/// Cooperative stop flag, checked before every frontier pop.
///
/// Clones share the same flag, so one can be handed to a Ctrl-C handler
/// while the builder holds another.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a build stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every frontier ran dry
    Exhausted,
    /// The page cap was reached
    CapReached,
    /// The stop signal was raised
    Stopped,
}

/// A finished (possibly partial) build.
#[derive(Debug)]
pub struct BuildReport {
    pub graph: GraphStore,
    pub termination: Termination,
    /// Pages whose links were fetched and applied
    pub expanded: usize,
    /// Pages skipped because they could not be fetched
    pub unavailable: Vec<SourceError>,
    /// Languages dropped because their seed could not be fetched
    pub excluded_languages: Vec<String>,
}
