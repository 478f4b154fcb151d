// src/builder/traversal.rs
// =============================================================================
// GraphBuilder: breadth-first, round-robin exploration from the seeds.
//
// How a build runs:
// 1. Fetch every seed. Seeds that can't be fetched are handled by the
//    configured SeedPolicy. Resolved seeds become the first nodes.
// 2. While no stop was requested, the graph is below the cap and some
//    frontier has work:
//    - pop a batch of pages round-robin across languages
//    - fetch their links concurrently (each fetch has a deadline)
//    - apply the results one by one, in pop order
// 3. Return the graph together with a report of what happened.
//
// Applying one page's links:
// - outlinks: dropped with probability removal_chance, otherwise the target
//   page and a link edge are added
// - translations: direction flipped with probability inversion_chance
// - a new page is only added while the graph is below the cap; edges to
//   pages that already exist are always added
//
// Only this task touches the GraphStore. Fetches run concurrently, but their
// results are applied sequentially, so with concurrency = 1 the traversal is
// exactly the sequential breadth-first algorithm.
// =============================================================================

use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::frontier::{Frontiers, Pending};
use super::{BuildReport, StopSignal, Termination};
use crate::config::{BuildConfig, SeedPolicy};
use crate::error::{BuildError, SourceError};
use crate::graph::{GraphStore, NodeId};
use crate::source::{PageLinks, PageSource};

pub struct GraphBuilder<S> {
    config: BuildConfig,
    source: S,
}

impl<S: PageSource> GraphBuilder<S> {
    pub fn new(config: BuildConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Runs a build with a generator seeded from the config, or from OS
    /// entropy when no seed is configured.
    pub async fn build(&self, stop: &StopSignal) -> Result<BuildReport, BuildError> {
        let mut rng = match self.config.rng_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(&mut rng, stop).await
    }

    /// Runs a build drawing every accept/invert decision from `rng`.
    pub async fn build_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        stop: &StopSignal,
    ) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport {
            graph: GraphStore::new(self.config.max_pages()),
            termination: Termination::Exhausted,
            expanded: 0,
            unavailable: Vec::new(),
            excluded_languages: Vec::new(),
        };
        let mut frontiers = Frontiers::new(self.config.languages());

        self.plant_seeds(&mut report, &mut frontiers).await?;

        info!(
            seeds = report.graph.size(),
            max_pages = self.config.max_pages(),
            "excavation started"
        );

        let concurrency = self.config.fetch().concurrency;

        let termination = 'build: loop {
            if stop.is_raised() {
                break Termination::Stopped;
            }
            if report.graph.is_full() {
                break Termination::CapReached;
            }

            if frontiers.is_empty() {
                break Termination::Exhausted;
            }
            let batch = frontiers.pop_batch(concurrency);

            for (pending, result) in self.fetch_batch(batch).await {
                // Re-check before every page: a batch may outlive the budget
                if stop.is_raised() {
                    break 'build Termination::Stopped;
                }
                if report.graph.is_full() {
                    break 'build Termination::CapReached;
                }

                match result {
                    Ok(links) => {
                        self.expand(&mut report.graph, &mut frontiers, &pending, links, rng);
                        report.expanded += 1;
                    }
                    Err(err) => {
                        warn!(%err, "skipping page");
                        report.unavailable.push(err);
                    }
                }
            }

            debug!(
                pages = report.graph.size(),
                edges = report.graph.edge_count(),
                queued = frontiers.len(),
                "batch applied"
            );
        };
        report.termination = termination;

        info!(
            pages = report.graph.size(),
            link_edges = report.graph.link_edge_count(),
            translation_edges = report.graph.translation_edge_count(),
            termination = ?report.termination,
            "excavation finished"
        );

        Ok(report)
    }

    // Fetches every seed and inserts the ones that resolved.
    async fn plant_seeds(
        &self,
        report: &mut BuildReport,
        frontiers: &mut Frontiers,
    ) -> Result<(), BuildError> {
        let seeds = self.config.seeds();
        let results: Vec<_> = stream::iter(seeds.iter().map(|seed| self.fetch(&seed.lang, &seed.title)))
            .buffered(self.config.fetch().concurrency)
            .collect()
            .await;

        for (seed, result) in seeds.iter().zip(results) {
            match result {
                Ok(links) => {
                    let id = report.graph.seed_node(&seed.lang, &seed.title);
                    info!(lang = %seed.lang, title = %seed.title, "seed resolved");
                    frontiers.push(Pending {
                        id,
                        lang: seed.lang.clone(),
                        title: seed.title.clone(),
                        links: Some(links),
                    });
                }
                Err(err) => match self.config.seed_policy() {
                    SeedPolicy::Abort => {
                        return Err(BuildError::FatalSeed {
                            lang: seed.lang.clone(),
                            title: seed.title.clone(),
                            source: err,
                        });
                    }
                    SeedPolicy::SkipLanguage => {
                        warn!(%err, lang = %seed.lang, "seed unavailable, excluding language");
                        frontiers.exclude(&seed.lang);
                        report.excluded_languages.push(seed.lang.clone());
                        report.unavailable.push(err);
                    }
                },
            }
        }

        if report.graph.size() == 0 {
            return Err(BuildError::NoResolvableSeeds);
        }
        Ok(())
    }

    // Fetches a batch concurrently; results come back in pop order.
    async fn fetch_batch(
        &self,
        batch: Vec<Pending>,
    ) -> Vec<(Pending, Result<PageLinks, SourceError>)> {
        let fetches = batch.into_iter().map(|mut pending| async move {
            let result = match pending.links.take() {
                Some(links) => Ok(links),
                None => self.fetch(&pending.lang, &pending.title).await,
            };
            (pending, result)
        });

        stream::iter(fetches)
            .buffered(self.config.fetch().concurrency)
            .collect()
            .await
    }

    // A fetch that outlives the deadline counts as an unavailable page
    async fn fetch(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError> {
        let timeout = self.config.fetch().timeout;
        match tokio::time::timeout(timeout, self.source.fetch_links(lang, title)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::unavailable(
                lang,
                title,
                format!("timed out after {:?}", timeout),
            )),
        }
    }

    fn expand<R: Rng>(
        &self,
        graph: &mut GraphStore,
        frontiers: &mut Frontiers,
        current: &Pending,
        links: PageLinks,
        rng: &mut R,
    ) {
        for target in links.outlinks {
            if target == current.title {
                continue;
            }
            if rng.gen::<f64>() < self.config.removal_chance() {
                debug!(from = %current.title, to = %target, "link removed");
                continue;
            }
            let Some(id) = admit(graph, frontiers, &current.lang, &target) else {
                continue;
            };
            if let Err(err) = graph.add_link_edge(current.id, id) {
                warn!(%err, "link edge rejected");
            }
        }

        for translation in links.translations {
            if translation.lang == current.lang || !frontiers.accepts(&translation.lang) {
                continue;
            }
            let inverted = rng.gen::<f64>() < self.config.inversion_chance();
            let Some(id) = admit(graph, frontiers, &translation.lang, &translation.title) else {
                continue;
            };
            if let Err(err) = graph.add_translation_edge(current.id, id, inverted) {
                warn!(%err, "translation edge rejected");
            }
        }
    }
}

// Returns the node for (lang, title), adding and enqueueing it if it is new
// and the graph still has room.
fn admit(graph: &mut GraphStore, frontiers: &mut Frontiers, lang: &str, title: &str) -> Option<NodeId> {
    if let Some(id) = graph.find(lang, title) {
        return Some(id);
    }

    match graph.add_node(lang, title) {
        Ok(id) => {
            frontiers.push(Pending {
                id,
                lang: lang.to_string(),
                title: title.to_string(),
                links: None,
            });
            Some(id)
        }
        Err(err) => {
            debug!(%err, "page discarded");
            None
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. buffered vs buffer_unordered
//    - Both run up to N futures at once
//    - buffer_unordered yields results as they finish
//    - buffered yields them in the order the futures were created
//    - Results are applied in pop order, so the graph doesn't depend on
//      which fetch happened to answer first
//
// 2. break 'build value
//    - The outer loop is labeled 'build
//    - break 'build Termination::Stopped leaves both the inner for loop and
//      the outer loop, and the value becomes the result of the loop
//
// 3. let ... else
//    - let Some(id) = admit(..) else { continue; };
//    - Binds id when the pattern matches, otherwise runs the else block,
//      which must leave the current scope (continue, return, break)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchConfig, Seed};
    use crate::graph::EdgeKind;
    use crate::source::StaticSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config(seeds: &[(&str, &str)], removal: f64, inversion: f64, max_pages: usize) -> BuildConfig {
        let seeds = seeds.iter().map(|(l, t)| Seed::new(*l, *t)).collect();
        BuildConfig::new(seeds, removal, inversion, max_pages)
            .unwrap()
            .with_fetch(FetchConfig {
                concurrency: 1,
                timeout: Duration::from_secs(5),
            })
            .unwrap()
    }

    fn cat_source() -> StaticSource {
        StaticSource::new()
            .page("en", "Cat", &["Dog", "Mouse"], &[("fr", "Chat")])
            .page("en", "Dog", &["Cat", "Wolf"], &[("fr", "Chien")])
            .page("en", "Mouse", &["Cat"], &[])
            .page("en", "Wolf", &["Dog"], &[])
            .page("fr", "Chat", &["Chien"], &[("en", "Cat")])
            .page("fr", "Chien", &["Chat", "Loup"], &[("en", "Dog")])
            .page("fr", "Loup", &["Chien"], &[])
    }

    async fn run<S: PageSource>(config: BuildConfig, source: S) -> BuildReport {
        let mut rng = StdRng::seed_from_u64(7);
        GraphBuilder::new(config, source)
            .build_with_rng(&mut rng, &StopSignal::new())
            .await
            .unwrap()
    }

    fn title(graph: &GraphStore, id: NodeId) -> String {
        let node = graph.node(id).unwrap();
        format!("{}:{}", node.lang, node.title)
    }

    fn edge_list(graph: &GraphStore) -> Vec<(String, String, EdgeKind)> {
        graph
            .edges()
            .iter()
            .map(|e| (title(graph, e.source), title(graph, e.target), e.kind))
            .collect()
    }

    fn edge(a: &str, b: &str, kind: EdgeKind) -> (String, String, EdgeKind) {
        (a.to_string(), b.to_string(), kind)
    }

    fn assert_invariants(graph: &GraphStore) {
        assert!(graph.size() <= graph.max_pages());
        for e in graph.edges() {
            let source = graph.node(e.source).unwrap();
            let target = graph.node(e.target).unwrap();
            match e.kind {
                EdgeKind::Link => assert_eq!(source.lang, target.lang),
                EdgeKind::Translation => assert_ne!(source.lang, target.lang),
            }
        }
        let mut seen = std::collections::HashSet::new();
        for e in graph.edges() {
            assert!(seen.insert((e.source, e.target, e.kind)), "duplicate edge");
        }
    }

    #[tokio::test]
    async fn test_cap_of_one_keeps_only_the_seed() {
        let source = StaticSource::new().page("en", "Graph theory", &["Vertex", "Edge"], &[]);
        let report = run(config(&[("en", "Graph theory")], 0.0, 0.0, 1), source).await;

        assert_eq!(report.graph.size(), 1);
        assert_eq!(report.graph.edge_count(), 0);
        assert_eq!(report.termination, Termination::CapReached);
        assert_eq!(report.expanded, 0);
    }

    #[tokio::test]
    async fn test_seeds_are_admitted_past_the_cap() {
        let report = run(config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 1), cat_source()).await;

        assert_eq!(report.graph.size(), 2);
        assert_eq!(report.graph.edge_count(), 0);
        assert_eq!(report.expanded, 0);
        assert_eq!(report.termination, Termination::CapReached);
    }

    #[tokio::test]
    async fn test_two_language_scenario_is_exact() {
        let report = run(config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 4), cat_source()).await;
        let graph = &report.graph;

        let nodes: Vec<_> = graph.nodes().map(|n| title(graph, n.id)).collect();
        assert_eq!(nodes, vec!["en:Cat", "fr:Chat", "en:Dog", "en:Mouse"]);
        assert_eq!(
            edge_list(graph),
            vec![
                edge("en:Cat", "en:Dog", EdgeKind::Link),
                edge("en:Cat", "en:Mouse", EdgeKind::Link),
                edge("en:Cat", "fr:Chat", EdgeKind::Translation),
            ]
        );
        assert_eq!(report.termination, Termination::CapReached);
        assert_invariants(graph);
    }

    #[tokio::test]
    async fn test_cap_discards_new_targets_but_keeps_edges_to_known_pages() {
        let report = run(config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 3), cat_source()).await;
        let graph = &report.graph;

        assert_eq!(graph.size(), 3);
        assert!(graph.find("en", "Mouse").is_none());
        assert_eq!(
            edge_list(graph),
            vec![
                edge("en:Cat", "en:Dog", EdgeKind::Link),
                edge("en:Cat", "fr:Chat", EdgeKind::Translation),
            ]
        );
    }

    #[tokio::test]
    async fn test_full_closure_without_removal() {
        let report = run(config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 1000), cat_source()).await;
        let graph = &report.graph;

        assert_eq!(report.termination, Termination::Exhausted);
        assert_eq!(graph.size(), 7);
        assert_eq!(report.expanded, 7);

        // every outlink reported by the source appears as an edge
        let source = cat_source();
        for node in graph.nodes() {
            let links = source.fetch_links(&node.lang, &node.title).await.unwrap();
            for target in links.outlinks {
                let id = graph.find(&node.lang, &target).unwrap();
                assert!(graph.has_edge(node.id, id, EdgeKind::Link));
            }
            for t in links.translations {
                let id = graph.find(&t.lang, &t.title).unwrap();
                assert!(graph.has_edge(node.id, id, EdgeKind::Translation));
            }
        }
        assert_invariants(graph);
    }

    #[tokio::test]
    async fn test_full_removal_adds_no_links() {
        let report = run(config(&[("en", "Cat"), ("fr", "Chat")], 1.0, 0.0, 1000), cat_source()).await;
        let graph = &report.graph;

        assert_eq!(graph.link_edge_count(), 0);
        // translations are not subject to removal
        assert_eq!(
            edge_list(graph),
            vec![
                edge("en:Cat", "fr:Chat", EdgeKind::Translation),
                edge("fr:Chat", "en:Cat", EdgeKind::Translation),
            ]
        );
        assert_eq!(graph.size(), 2);
    }

    #[tokio::test]
    async fn test_translations_to_unconfigured_languages_are_ignored() {
        let report = run(config(&[("en", "Cat")], 0.0, 0.0, 100), cat_source()).await;

        assert!(report.graph.nodes().all(|n| n.lang == "en"));
        assert_eq!(report.graph.translation_edge_count(), 0);
    }

    #[tokio::test]
    async fn test_full_inversion_flips_every_translation() {
        let report = run(config(&[("en", "Cat"), ("fr", "Loup")], 1.0, 1.0, 10), cat_source()).await;
        let graph = &report.graph;

        // Cat discovers Chat: stored Chat -> Cat.
        // Chat is expanded later and discovers Cat: stored Cat -> Chat.
        assert_eq!(
            edge_list(graph),
            vec![
                edge("fr:Chat", "en:Cat", EdgeKind::Translation),
                edge("en:Cat", "fr:Chat", EdgeKind::Translation),
            ]
        );
        assert!(graph.edges().iter().all(|e| e.inverted));
    }

    #[tokio::test]
    async fn test_round_robin_interleaves_languages() {
        let source = StaticSource::new()
            .page("en", "A", &["A1", "A2"], &[])
            .page("en", "A1", &["A3"], &[])
            .page("en", "A2", &[], &[])
            .page("en", "A3", &[], &[])
            .page("fr", "B", &["B1"], &[])
            .page("fr", "B1", &["B2"], &[])
            .page("fr", "B2", &[], &[]);
        let report = run(config(&[("en", "A"), ("fr", "B")], 0.0, 0.0, 100), source).await;

        let order: Vec<_> = report.graph.nodes().map(|n| n.title.as_str()).collect();
        // A, B seeded; A expands (A1, A2); B expands (B1); A1 expands (A3);
        // B1 expands (B2)
        assert_eq!(order, vec!["A", "B", "A1", "A2", "B1", "A3", "B2"]);
    }

    #[tokio::test]
    async fn test_unavailable_page_is_skipped() {
        let source = StaticSource::new()
            .page("en", "Cat", &["Ghost", "Dog"], &[])
            .page("en", "Dog", &[], &[]);
        let report = run(config(&[("en", "Cat")], 0.0, 0.0, 100), source).await;

        // Ghost is still a node (it was discovered), it just has no links
        assert_eq!(report.graph.size(), 3);
        assert_eq!(report.unavailable.len(), 1);
        assert_eq!(report.expanded, 2);
        assert_eq!(report.termination, Termination::Exhausted);
    }

    #[tokio::test]
    async fn test_unresolvable_seed_excludes_language_by_default() {
        let report = run(config(&[("en", "Cat"), ("fr", "Nulle part")], 0.0, 0.0, 100), cat_source()).await;

        assert_eq!(report.excluded_languages, vec!["fr".to_string()]);
        assert!(report.graph.nodes().all(|n| n.lang == "en"));
        assert_eq!(report.graph.translation_edge_count(), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_seed_aborts_when_configured() {
        let config = config(&[("en", "Cat"), ("fr", "Nulle part")], 0.0, 0.0, 100)
            .with_seed_policy(SeedPolicy::Abort);
        let result = GraphBuilder::new(config, cat_source())
            .build(&StopSignal::new())
            .await;

        assert!(matches!(result, Err(BuildError::FatalSeed { ref lang, .. }) if lang == "fr"));
    }

    #[tokio::test]
    async fn test_no_resolvable_seed_is_an_error() {
        let result = GraphBuilder::new(config(&[("en", "Nowhere")], 0.0, 0.0, 10), StaticSource::new())
            .build(&StopSignal::new())
            .await;
        assert!(matches!(result, Err(BuildError::NoResolvableSeeds)));
    }

    #[tokio::test]
    async fn test_stop_before_start_returns_seeds() {
        let stop = StopSignal::new();
        stop.raise();
        let report = GraphBuilder::new(config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 100), cat_source())
            .build(&stop)
            .await
            .unwrap();

        assert_eq!(report.termination, Termination::Stopped);
        assert_eq!(report.graph.size(), 2);
        assert_eq!(report.graph.edge_count(), 0);
    }

    // Raises the stop signal on the n-th fetch
    struct StoppingSource {
        inner: StaticSource,
        stop: StopSignal,
        calls: AtomicUsize,
        stop_at: usize,
    }

    impl PageSource for StoppingSource {
        async fn fetch_links(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.stop_at {
                self.stop.raise();
            }
            self.inner.fetch_links(lang, title).await
        }
    }

    #[tokio::test]
    async fn test_stop_mid_build_returns_consistent_partial_graph() {
        let mut inner = StaticSource::new();
        for i in 0..20 {
            let next = format!("P{}", i + 1);
            inner = inner.page("en", &format!("P{}", i), &[next.as_str()], &[]);
        }
        let stop = StopSignal::new();
        let source = StoppingSource {
            inner,
            stop: stop.clone(),
            calls: AtomicUsize::new(0),
            stop_at: 5,
        };

        let report = GraphBuilder::new(config(&[("en", "P0")], 0.0, 0.0, 100), source)
            .build(&stop)
            .await
            .unwrap();

        // seed fetch + P1..P4 fetches; the fifth fetch raises the signal
        // before P4's links are applied
        assert_eq!(report.termination, Termination::Stopped);
        assert_eq!(report.graph.size(), 5);
        assert_eq!(report.graph.link_edge_count(), 4);
        assert_invariants(&report.graph);
    }

    struct SlowSource {
        inner: StaticSource,
        slow_title: &'static str,
    }

    impl PageSource for SlowSource {
        async fn fetch_links(&self, lang: &str, title: &str) -> Result<PageLinks, SourceError> {
            if title == self.slow_title {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            self.inner.fetch_links(lang, title).await
        }
    }

    #[tokio::test]
    async fn test_timed_out_fetch_counts_as_unavailable() {
        let source = SlowSource {
            inner: cat_source(),
            slow_title: "Dog",
        };
        let config = BuildConfig::new(vec![Seed::new("en", "Cat")], 0.0, 0.0, 100)
            .unwrap()
            .with_fetch(FetchConfig {
                concurrency: 2,
                timeout: Duration::from_millis(50),
            })
            .unwrap();

        let report = run(config, source).await;

        assert_eq!(report.unavailable.len(), 1);
        assert!(report.graph.find("en", "Dog").is_some());
        // Wolf is only reachable through Dog
        assert!(report.graph.find("en", "Wolf").is_none());
        assert_eq!(report.termination, Termination::Exhausted);
    }

    #[tokio::test]
    async fn test_same_rng_seed_replays_the_same_graph() {
        let make = || {
            config(&[("en", "Cat"), ("fr", "Chat")], 0.5, 0.5, 100).with_rng_seed(Some(42))
        };
        let first = GraphBuilder::new(make(), cat_source())
            .build(&StopSignal::new())
            .await
            .unwrap();
        let second = GraphBuilder::new(make(), cat_source())
            .build(&StopSignal::new())
            .await
            .unwrap();

        assert_eq!(edge_list(&first.graph), edge_list(&second.graph));
        assert_invariants(&first.graph);
    }

    #[tokio::test]
    async fn test_concurrent_fetching_reaches_the_same_closure() {
        let sequential = run(config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 1000), cat_source()).await;

        let concurrent_config = config(&[("en", "Cat"), ("fr", "Chat")], 0.0, 0.0, 1000)
            .with_fetch(FetchConfig {
                concurrency: 8,
                timeout: Duration::from_secs(5),
            })
            .unwrap();
        let concurrent = run(concurrent_config, &cat_source()).await;

        let mut a: Vec<_> = sequential.graph.nodes().map(|n| title(&sequential.graph, n.id)).collect();
        let mut b: Vec<_> = concurrent.graph.nodes().map(|n| title(&concurrent.graph, n.id)).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(sequential.graph.edge_count(), concurrent.graph.edge_count());
        assert_invariants(&concurrent.graph);
    }
}
