//! Crawl orchestrator - the per-session crawl state machine
//!
//! This module drives one crawl session from the seed URL:
//! - Depth and visited-set checks for every scheduled task
//! - Incremental cache lookups that skip already-persisted pages
//! - Rendering under retry and a per-task deadline
//! - Navigation linking and persistence of finished documents
//! - Failure recording and result-tree assembly
//!
//! Traversal is depth-first over an explicit stack. Children are pushed in
//! reverse discovery order, so they are visited in discovery order and the
//! result tree lists siblings the way the parent page linked them.

use crate::config::Config;
use crate::crawler::navigation::{NavigationIndex, NavigationLinker};
use crate::crawler::result::{ResultArena, ResultNode, ResultStatus};
use crate::crawler::retry::RetryPolicy;
use crate::output::{blocks_to_markdown, format_error_document};
use crate::render::{RenderSession, Renderer};
use crate::state::{TaskState, VisitedSet};
use crate::storage::{FailureLog, IncrementalCache, MarkdownStore};
use crate::url::{normalize_url, url_to_filename, LinkScopeFilter};
use crate::HarvestError;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// A URL scheduled for visiting at a given depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// A task on the traversal stack together with its parent's arena slot
struct Frame {
    task: CrawlTask,
    parent: Option<usize>,
}

/// What processing one task produced
enum TaskOutcome {
    /// Depth or visited check stopped the task; no result node
    Skipped,
    /// The task produced a node; `links` are the scoped children to schedule
    Visited { node: ResultNode, links: Vec<Url> },
}

/// State owned by a single crawl session and dropped when it ends
struct CrawlSession {
    max_depth: u32,
    scope: LinkScopeFilter,
    cache: IncrementalCache,
    visited: VisitedSet,
    filenames: HashSet<String>,
    navigation: NavigationIndex,
    results: ResultArena,
    rendered: usize,
}

impl CrawlSession {
    fn new(max_depth: u32, scope: LinkScopeFilter, cache: IncrementalCache) -> Self {
        Self {
            max_depth,
            scope,
            cache,
            visited: VisitedSet::new(),
            filenames: HashSet::new(),
            navigation: NavigationIndex::new(),
            results: ResultArena::default(),
            rendered: 0,
        }
    }
}

/// Main crawl orchestrator
///
/// The orchestrator itself holds only configuration and collaborators. Every
/// call to [`CrawlOrchestrator::run`] starts a fresh session with an empty
/// visited set and navigation index.
pub struct CrawlOrchestrator {
    renderer: Arc<dyn Renderer>,
    store: MarkdownStore,
    failure_log: FailureLog,
    launch_retry: RetryPolicy,
    load_retry: RetryPolicy,
    scope_prefix: String,
    task_timeout: Duration,
    pacing_delay: Duration,
    release_timeout: Duration,
}

impl CrawlOrchestrator {
    pub fn new(config: &Config, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            store: MarkdownStore::new(config.output.directory_path()),
            failure_log: FailureLog::new(config.output.failure_log_path()),
            launch_retry: RetryPolicy::for_launch(&config.retry),
            load_retry: RetryPolicy::for_load(&config.retry),
            scope_prefix: config.scope.prefix.clone(),
            task_timeout: config.crawler.task_timeout(),
            pacing_delay: config.crawler.pacing_delay(),
            release_timeout: config.crawler.release_timeout(),
        }
    }

    pub fn store(&self) -> &MarkdownStore {
        &self.store
    }

    /// Crawls from `seed` and returns the result tree
    ///
    /// Page-level failures never abort the session; they show up as
    /// `Error` nodes and failure log entries. Only problems preparing the
    /// output store are returned as errors.
    pub async fn run(&self, seed: &Url, max_depth: u32, force: bool) -> Result<ResultNode, HarvestError> {
        self.store
            .ensure_dir()
            .map_err(|e| HarvestError::Job(format!("cannot prepare output directory: {}", e)))?;

        let cache = if force {
            IncrementalCache::clear(&self.store)
        } else {
            IncrementalCache::load(&self.store)
        }
        .map_err(|e| HarvestError::Job(format!("cannot read output directory: {}", e)))?;

        let mut session = CrawlSession::new(
            max_depth,
            LinkScopeFilter::new(seed, self.scope_prefix.clone()),
            cache,
        );

        tracing::info!(
            "Starting crawl of {} (scope {}, max depth {}, force {}, {} cached files)",
            seed,
            session.scope.prefix(),
            max_depth,
            force,
            session.cache.len()
        );

        let mut stack = vec![Frame {
            task: CrawlTask::new(normalize_url(seed), 0),
            parent: None,
        }];

        while let Some(frame) = stack.pop() {
            let depth = frame.task.depth;
            match self.process_task(&mut session, &frame.task).await? {
                TaskOutcome::Skipped => {}
                TaskOutcome::Visited { node, links } => {
                    let index = session.results.push(node, frame.parent);
                    stack.extend(links.into_iter().rev().map(|url| Frame {
                        task: CrawlTask::new(url, depth + 1),
                        parent: Some(index),
                    }));
                }
            }
        }

        let root = session
            .results
            .into_tree()
            .ok_or_else(|| HarvestError::Job(format!("seed {} produced no result", seed)))?;

        tracing::info!(
            "Crawl of {} finished: {} pages visited, {} rendered, {} existing, {} errors",
            seed,
            root.len(),
            root.count_status(ResultStatus::Success),
            root.count_status(ResultStatus::Existing),
            root.count_status(ResultStatus::Error)
        );

        Ok(root)
    }

    /// Runs one task through the state machine
    async fn process_task(
        &self,
        session: &mut CrawlSession,
        task: &CrawlTask,
    ) -> Result<TaskOutcome, HarvestError> {
        let state = TaskState::Pending;
        let url = &task.url;

        if task.depth > session.max_depth {
            let state = state.advance(TaskState::SkippedDepth)?;
            tracing::trace!("{} {} at depth {}", state, url, task.depth);
            return Ok(TaskOutcome::Skipped);
        }

        // Query-string variants of a visited path share its file and stay unclaimed
        let filename = url_to_filename(url);
        if session.filenames.contains(&filename) {
            let state = state.advance(TaskState::SkippedVisited)?;
            tracing::trace!("{} {} ({})", state, url, filename);
            return Ok(TaskOutcome::Skipped);
        }

        if !session.visited.claim(url) {
            let state = state.advance(TaskState::SkippedVisited)?;
            tracing::trace!("{} {}", state, url);
            return Ok(TaskOutcome::Skipped);
        }
        session.filenames.insert(filename.clone());
        session.navigation.register(url, &filename);

        if session.cache.contains(&filename) {
            state.advance(TaskState::Existing)?;
            tracing::info!("Skipping {} ({} already exists)", url, filename);
            return Ok(TaskOutcome::Visited {
                node: result_node(task, filename, ResultStatus::Existing, None),
                links: Vec::new(),
            });
        }

        let state = state.advance(TaskState::Rendering)?;
        tracing::debug!("{} {} at depth {} -> {}", state, url, task.depth, filename);

        match self.render_task(session, task, &filename).await {
            Ok(links) => {
                state.advance(TaskState::Success)?;
                let links = scoped_links(&session.scope, links);
                tracing::info!("Saved {} ({} in-scope links)", filename, links.len());
                Ok(TaskOutcome::Visited {
                    node: result_node(task, filename, ResultStatus::Success, None),
                    links,
                })
            }
            Err(error) => {
                state.advance(TaskState::Error)?;
                self.record_failure(task, &filename, &error);
                Ok(TaskOutcome::Visited {
                    node: result_node(task, filename, ResultStatus::Error, Some(error.to_string())),
                    links: Vec::new(),
                })
            }
        }
    }

    /// Renders and persists one page under the per-task deadline
    ///
    /// Any session acquired along the way is released before returning,
    /// whether the pipeline succeeded, failed or ran out of time.
    async fn render_task(
        &self,
        session: &mut CrawlSession,
        task: &CrawlTask,
        filename: &str,
    ) -> Result<Vec<Url>, HarvestError> {
        let pacing = if session.rendered > 0 {
            self.pacing_delay
        } else {
            Duration::ZERO
        };
        session.rendered += 1;

        let deadline = Instant::now() + self.task_timeout;
        let mut held: Option<Box<dyn RenderSession>> = None;

        let outcome = tokio::time::timeout_at(
            deadline,
            self.render_pipeline(&mut held, &session.navigation, task, filename, deadline, pacing),
        )
        .await;

        if let Some(render_session) = held.take() {
            self.release(render_session, &task.url).await;
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(HarvestError::SessionTimeout {
                url: task.url.to_string(),
                timeout: self.task_timeout,
            }),
        }
    }

    /// Pacing, launch, load, extraction, linking and persistence for one page
    async fn render_pipeline(
        &self,
        held: &mut Option<Box<dyn RenderSession>>,
        navigation: &NavigationIndex,
        task: &CrawlTask,
        filename: &str,
        deadline: Instant,
        pacing: Duration,
    ) -> Result<Vec<Url>, HarvestError> {
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        let launched = self
            .launch_retry
            .run("Renderer launch", || self.renderer.launch())
            .await?;
        let render_session: &dyn RenderSession = &**held.insert(launched);

        let page = self
            .load_retry
            .run("Page load", || render_session.render(&task.url, deadline))
            .await?;

        if page.blocks.is_empty() {
            return Err(HarvestError::ExtractionEmpty {
                url: task.url.to_string(),
            });
        }

        let body = blocks_to_markdown(&page.blocks);
        let document = NavigationLinker::new(navigation).finalize(&task.url, filename, &body);
        self.store.write(filename, &document)?;

        Ok(page.links)
    }

    /// Closes a renderer session; failures are logged, never propagated
    async fn release(&self, render_session: Box<dyn RenderSession>, url: &Url) {
        match tokio::time::timeout(self.release_timeout, render_session.close()).await {
            Ok(Ok(())) => tracing::trace!("Released renderer session for {}", url),
            Ok(Err(e)) => tracing::warn!("Failed to release renderer session for {}: {}", url, e),
            Err(_) => tracing::warn!(
                "Releasing renderer session for {} took longer than {:?}",
                url,
                self.release_timeout
            ),
        }
    }

    /// Logs a task failure and persists the error stub
    fn record_failure(&self, task: &CrawlTask, filename: &str, error: &HarvestError) {
        let message = format!("Error processing {}: {}", task.url, error);
        tracing::warn!("{}", message);

        if let Err(e) = self.failure_log.append(&message) {
            tracing::warn!("Failed to append to failure log: {}", e);
        }

        let document = format_error_document(task.url.as_str(), Utc::now(), &error.to_string());
        if let Err(e) = self.store.write(filename, &document) {
            tracing::warn!("Failed to write error document for {}: {}", task.url, e);
        }
    }
}

fn result_node(
    task: &CrawlTask,
    filename: String,
    status: ResultStatus,
    error: Option<String>,
) -> ResultNode {
    ResultNode {
        url: task.url.to_string(),
        filename,
        status,
        error,
        children: Vec::new(),
    }
}

/// Keeps in-scope links, normalized and de-duplicated in discovery order
fn scoped_links(scope: &LinkScopeFilter, links: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .map(|link| normalize_url(&link))
        .filter(|link| scope.accepts(link))
        .filter(|link| seen.insert(link.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderError;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Renderer for tests that must never reach rendering
    struct UnavailableRenderer;

    #[async_trait]
    impl Renderer for UnavailableRenderer {
        async fn launch(&self) -> Result<Box<dyn RenderSession>, RenderError> {
            Err(RenderError::Launch("no renderer in this test".to_string()))
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_query_variant_is_not_claimed() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.directory = dir.path().display().to_string();
        let orchestrator = CrawlOrchestrator::new(&config, Arc::new(UnavailableRenderer));

        orchestrator.store().write("docs_a.md", "cached").unwrap();
        let cache = IncrementalCache::load(orchestrator.store()).unwrap();
        let seed = url("https://example.com/docs");
        let mut session = CrawlSession::new(3, LinkScopeFilter::new(&seed, "/docs"), cache);

        let first = CrawlTask::new(url("https://example.com/docs/a?v=1"), 1);
        let variant = CrawlTask::new(url("https://example.com/docs/a?v=2"), 1);
        let repeat = first.clone();

        let mut nodes = 0;
        for task in [&first, &variant, &repeat] {
            match orchestrator.process_task(&mut session, task).await.unwrap() {
                TaskOutcome::Visited { node, .. } => {
                    assert_eq!(node.status, ResultStatus::Existing);
                    assert_eq!(node.url, "https://example.com/docs/a?v=1");
                    nodes += 1;
                }
                TaskOutcome::Skipped => {}
            }
        }

        assert_eq!(nodes, 1);
        assert_eq!(session.visited.len(), nodes);
        assert_eq!(session.navigation.len(), 1);
    }

    #[test]
    fn test_scoped_links_filters_and_dedups() {
        let seed = Url::parse("https://example.com/docs").unwrap();
        let scope = LinkScopeFilter::new(&seed, "/docs");
        let links = vec![
            Url::parse("https://example.com/docs/b").unwrap(),
            Url::parse("https://example.com/blog").unwrap(),
            Url::parse("https://example.com/docs/a").unwrap(),
            Url::parse("https://example.com/docs/b#again").unwrap(),
            Url::parse("https://other.com/docs/c").unwrap(),
        ];

        let scoped: Vec<String> = scoped_links(&scope, links)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            scoped,
            vec!["https://example.com/docs/b", "https://example.com/docs/a"]
        );
    }

    #[test]
    fn test_crawl_task_new() {
        let url = Url::parse("https://example.com/docs").unwrap();
        let task = CrawlTask::new(url.clone(), 2);
        assert_eq!(task.url, url);
        assert_eq!(task.depth, 2);
    }
}
