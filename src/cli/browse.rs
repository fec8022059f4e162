use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error,
    node::{Node, NodeId, NodeKind, NodeKinds, Parameters, Tree},
    success,
    traversal::{BuildState, Directory, Progress, TreeBuilder},
    types::{NodeImageTableRow, NodeTableRow},
    warning,
};

/// Where a browse starts: either a navigation URL or a kind with its
/// parameters given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StartNode {
    pub kind: Option<NodeKind>,
    pub nid: Option<String>,
    pub offset: Option<u64>,
    pub kind_type: Option<String>,
    pub url: Option<String>,
}

impl StartNode {
    pub fn from_url(url: String) -> Self {
        Self {
            url: Some(url),
            ..Self::default()
        }
    }

    /// Node the traversal starts from; a URL wins over the other fields.
    pub fn to_node(&self) -> Result<Node, String> {
        if let Some(url) = &self.url {
            let (kind, params) = Parameters::from_url(url)?;
            return Ok(Node::new(kind, params, None));
        }

        let mut params = Parameters::new();
        if let Some(nid) = &self.nid {
            params.set("nid", nid.as_str());
        }
        if let Some(offset) = self.offset {
            params.set("offset", offset.to_string());
        }
        if let Some(kind_type) = &self.kind_type {
            params.set("type", kind_type.as_str());
        }
        Ok(Node::new(self.kind.unwrap_or(NodeKind::Root), params, None))
    }
}

/// Directory printing surfaced nodes as a table once the traversal ends,
/// with a spinner while it runs.
struct TerminalDirectory {
    spinner: ProgressBar,
    image_size: String,
    rows: Vec<(NodeKind, String, Option<String>, String)>,
}

impl TerminalDirectory {
    fn new(image_size: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        Self {
            spinner,
            image_size: image_size.to_string(),
            rows: Vec::new(),
        }
    }

    fn print(self, images: bool) {
        self.spinner.finish_and_clear();

        let rows = self.rows.into_iter().enumerate();
        let table = if images {
            Table::new(rows.map(|(i, (kind, label, image, url))| NodeImageTableRow {
                position: i + 1,
                kind: kind.to_string(),
                label,
                image: image.unwrap_or_default(),
                url,
            }))
        } else {
            Table::new(rows.map(|(i, (kind, label, _, url))| NodeTableRow {
                position: i + 1,
                kind: kind.to_string(),
                label,
                url,
            }))
        };
        println!("{}", table);
    }
}

impl Directory for TerminalDirectory {
    fn add_node(&mut self, tree: &Tree, id: NodeId) -> bool {
        let Some(node) = tree.get(id) else {
            return false;
        };
        self.rows.push((
            node.kind(),
            tree.label(id),
            tree.image(id, &self.image_size),
            tree.make_url(id),
        ));
        true
    }

    fn update(&mut self, progress: &Progress, state: BuildState, label: &str) {
        self.spinner.set_message(format!(
            "{} {} ({} fetched, {} listed)",
            state, label, progress.fetched, progress.surfaced
        ));
    }
}

/// Walks the catalog from `start` and prints the surfaced nodes.
///
/// # Arguments
///
/// * `start` - Start node, `Root` (featured new releases) by default
/// * `depth` - Levels to expand, `-1` for no bound
/// * `include` - Kinds to list
/// * `exclude` - Kinds never fetched
/// * `images` - Adds an image column
///
/// # Example Usage
///
/// ```bash
/// qobuzcli browse artist --nid 36819 --depth 2 --include album
/// qobuzcli browse public-playlists --type editor-picks
/// ```
pub async fn browse(
    start: StartNode,
    depth: i32,
    include: NodeKinds,
    exclude: NodeKinds,
    images: bool,
) {
    let node = match start.to_node() {
        Ok(node) => node,
        Err(e) => error!("Cannot start browsing: {}", e),
    };

    let catalog = super::open_catalog(false).await;
    let mut tree = Tree::new();
    let root = tree.insert(node);

    let mut directory = TerminalDirectory::new(catalog.image_size());
    let mut builder = TreeBuilder::new(&catalog)
        .with_depth(depth)
        .with_include(include)
        .with_exclude(exclude)
        .with_cancel_token(super::cancel_on_ctrl_c());

    let outcome = match builder.build(&mut tree, root, &mut directory).await {
        Ok(outcome) => outcome,
        Err(e) => {
            directory.spinner.finish_and_clear();
            error!("Browsing {} failed: {}", tree.label(root), e);
        }
    };

    let label = tree.label(root);
    directory.print(images);
    if outcome.cancelled {
        warning!("Cancelled, showing {} nodes listed so far", outcome.surfaced);
    } else if outcome.surfaced == 0 {
        warning!("Nothing to show for {}", label);
    } else {
        success!("{} nodes under {}", outcome.surfaced, label);
    }
}
