// src/builder/frontier.rs
// =============================================================================
// Per-language frontiers with a round-robin scheduler.
//
// Each language has its own FIFO queue (breadth-first within the language).
// pop() walks the languages in configured order, starting after the one
// served last, and returns the head of the first non-empty queue. This keeps
// growth balanced: a language with a deep crawl cannot starve the others
// before the page cap is reached.
// =============================================================================

use std::collections::VecDeque;

use crate::graph::NodeId;
use crate::source::PageLinks;

// A discovered page whose links have not been expanded yet
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub id: NodeId,
    pub lang: String,
    pub title: String,
    // Links already fetched (seeds are fetched up front)
    pub links: Option<PageLinks>,
}

#[derive(Debug, Default)]
pub(crate) struct Frontiers {
    langs: Vec<String>,
    queues: Vec<VecDeque<Pending>>,
    cursor: usize,
}

impl Frontiers {
    pub fn new<'a>(langs: impl IntoIterator<Item = &'a str>) -> Self {
        let langs: Vec<String> = langs.into_iter().map(str::to_string).collect();
        let queues = langs.iter().map(|_| VecDeque::new()).collect();
        Self {
            langs,
            queues,
            cursor: 0,
        }
    }

    /// Removes a language from the schedule entirely.
    pub fn exclude(&mut self, lang: &str) {
        if let Some(i) = self.position(lang) {
            self.langs.remove(i);
            self.queues.remove(i);
            self.cursor = 0;
        }
    }

    /// Whether pages of this language belong in the graph.
    pub fn accepts(&self, lang: &str) -> bool {
        self.position(lang).is_some()
    }

    fn position(&self, lang: &str) -> Option<usize> {
        self.langs.iter().position(|l| l == lang)
    }

    /// Enqueues a page on its language's frontier. Pages of unscheduled
    /// languages are dropped.
    pub fn push(&mut self, pending: Pending) {
        if let Some(i) = self.position(&pending.lang) {
            self.queues[i].push_back(pending);
        }
    }

    pub fn pop(&mut self) -> Option<Pending> {
        let n = self.langs.len();
        for step in 0..n {
            let i = (self.cursor + step) % n;
            if let Some(pending) = self.queues[i].pop_front() {
                self.cursor = (i + 1) % n;
                return Some(pending);
            }
        }
        None
    }

    /// Pops up to `max` pages, one pop() at a time.
    pub fn pop_batch(&mut self, max: usize) -> Vec<Pending> {
        let mut batch = Vec::with_capacity(max);
        while batch.len() < max {
            match self.pop() {
                Some(pending) => batch.push(pending),
                None => break,
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }
}
