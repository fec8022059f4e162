//! # Tree Builder
//!
//! The populating cycle: starting from one node, fetch its payload (through
//! the cache), expand it into children, surface the children whose kind is
//! included, and recurse until the depth bound is reached, the catalog is
//! exhausted or the traversal is cancelled.
//!
//! ```text
//! visit(node, depth)
//!   ├── cancelled?            → stop
//!   ├── depth exhausted?      → stop
//!   ├── fetch (unless excluded), detect pagination
//!   ├── populate, append continuation
//!   └── for each child: surface if included, visit(child, depth - 1)
//! ```
//!
//! Surfaced nodes go to a [`Directory`]. A directory refusing a node is an
//! integration fault and aborts the whole build with
//! [`TraversalError::Rejected`].

pub mod pagination;

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    catalog::Catalog,
    debug,
    node::{NodeId, NodeKind, NodeKinds, Tree},
    qobuz::CatalogApi,
};

/// Depth value meaning "no bound".
pub const UNBOUNDED: i32 = -1;

/// Receiver of the nodes a traversal surfaces.
pub trait Directory {
    /// Takes a surfaced node. Returning `false` aborts the traversal.
    fn add_node(&mut self, tree: &Tree, id: NodeId) -> bool;

    /// Progress notification, called while fetching and per surfaced node.
    fn update(&mut self, _progress: &Progress, _state: BuildState, _label: &str) {}
}

/// Directory collecting surfaced nodes in order.
#[derive(Debug, Default)]
pub struct Listing {
    nodes: Vec<NodeId>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

impl Directory for Listing {
    fn add_node(&mut self, _tree: &Tree, id: NodeId) -> bool {
        self.nodes.push(id);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Idle,
    Fetching,
    Expanding,
    PerChildRecursion,
    Done,
    Aborted,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildState::Idle => "idle",
            BuildState::Fetching => "fetching",
            BuildState::Expanding => "expanding",
            BuildState::PerChildRecursion => "walking",
            BuildState::Done => "done",
            BuildState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub visited: usize,
    pub fetched: usize,
    pub surfaced: usize,
}

/// Cooperative cancellation flag shared between the traversal and whoever
/// may stop it (the Ctrl-C handler of the CLI).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub surfaced: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
pub enum TraversalError {
    /// The directory refused a surfaced node.
    Rejected {
        node: NodeId,
        kind: NodeKind,
        label: String,
    },
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalError::Rejected { node, kind, label } => write!(
                f,
                "directory rejected {} '{}' (node {})",
                kind,
                label,
                node.index()
            ),
        }
    }
}

impl std::error::Error for TraversalError {}

pub struct TreeBuilder<'a, A: CatalogApi> {
    catalog: &'a Catalog<A>,
    depth: i32,
    include: NodeKinds,
    exclude: NodeKinds,
    cancel: CancelToken,
    state: BuildState,
    progress: Progress,
}

impl<'a, A: CatalogApi> TreeBuilder<'a, A> {
    /// Builder surfacing every kind one level deep.
    pub fn new(catalog: &'a Catalog<A>) -> Self {
        Self {
            catalog,
            depth: 1,
            include: NodeKinds::all(),
            exclude: NodeKinds::none(),
            cancel: CancelToken::new(),
            state: BuildState::Idle,
            progress: Progress::default(),
        }
    }

    /// Levels to expand below the start node, [`UNBOUNDED`] for no limit.
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Kinds handed to the directory. Other kinds are still walked.
    pub fn with_include(mut self, include: NodeKinds) -> Self {
        self.include = include;
        self
    }

    /// Kinds never fetched. Their existing payload is still expanded.
    pub fn with_exclude(mut self, exclude: NodeKinds) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Populates the subtree below `root`, surfacing included nodes to
    /// `directory` in insertion order.
    pub async fn build<D: Directory>(
        &mut self,
        tree: &mut Tree,
        root: NodeId,
        directory: &mut D,
    ) -> Result<Outcome, TraversalError> {
        self.progress = Progress::default();
        let result = self.visit(tree, root, self.depth, directory).await;

        let cancelled = self.cancel.is_cancelled();
        self.state = if result.is_err() || cancelled {
            BuildState::Aborted
        } else {
            BuildState::Done
        };
        directory.update(&self.progress, self.state, &tree.label(root));
        result?;

        Ok(Outcome {
            surfaced: self.progress.surfaced,
            cancelled,
        })
    }

    /// Visits `id` and, iteratively, the chain of continuations after it.
    /// A continuation is always the last child of its page, so walking it
    /// here instead of recursing keeps the stack flat over long listings.
    async fn visit<D: Directory>(
        &mut self,
        tree: &mut Tree,
        mut id: NodeId,
        mut depth: i32,
        directory: &mut D,
    ) -> Result<(), TraversalError> {
        loop {
            if self.cancel.is_cancelled() {
                self.state = BuildState::Aborted;
                return Ok(());
            }
            if depth != UNBOUNDED && depth < 1 {
                return Ok(());
            }
            let Some(kind) = tree.get(id).map(|node| node.kind()) else {
                return Ok(());
            };
            self.progress.visited += 1;

            self.state = BuildState::Fetching;
            if self.exclude.contains(kind) {
                debug!("Not fetching excluded {}", kind);
            } else {
                directory.update(&self.progress, self.state, &tree.label(id));
                if !tree.fetch(id, self.catalog).await {
                    debug!("No data for {} '{}'", kind, tree.label(id));
                    return Ok(());
                }
                self.progress.fetched += 1;
                pagination::detect_pagination(tree, id);
            }

            self.state = BuildState::Expanding;
            tree.populate(id);
            if depth != UNBOUNDED {
                depth -= 1;
            }
            let continuation = pagination::append_continuation(tree, id);
            if let Some(next) = continuation {
                debug!("Added next page node {}", tree.label(next));
            }

            self.state = BuildState::PerChildRecursion;
            let children = tree.children(id).to_vec();
            for child in children {
                if self.cancel.is_cancelled() {
                    self.state = BuildState::Aborted;
                    return Ok(());
                }
                let Some(child_kind) = tree.get(child).map(|node| node.kind()) else {
                    continue;
                };

                if self.include.contains(child_kind) {
                    let label = tree.label(child);
                    if !directory.add_node(tree, child) {
                        tree.clear_children(id);
                        return Err(TraversalError::Rejected {
                            node: child,
                            kind: child_kind,
                            label,
                        });
                    }
                    self.progress.surfaced += 1;
                    directory.update(&self.progress, BuildState::PerChildRecursion, &label);
                }

                if Some(child) != continuation {
                    Box::pin(self.visit(tree, child, depth, directory)).await?;
                }
            }

            match continuation {
                Some(next) => id = next,
                None => return Ok(()),
            }
        }
    }
}
