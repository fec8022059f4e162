//! # Catalog Nodes
//!
//! A catalog node is one entry of the navigable catalog: an album, an
//! artist, a playlist, the user's favorites and so on. Nodes live in a
//! [`Tree`] arena which owns them; a node refers to its children and its
//! parent by [`NodeId`], so tearing down a subtree is a plain recursive free.
//!
//! What a node does depends on its [`NodeKind`]: the request it fetches, how
//! it turns the payload into children, its label and its image. The per-kind
//! rules live in [`behavior`].

pub mod behavior;
pub mod kind;
pub mod parameters;
pub mod property;

use std::ops::{Index, IndexMut};

use reqwest::Url;
use serde_json::Value;

use crate::{catalog::Catalog, config, qobuz::CatalogApi, types::Pagination, warning};

pub use kind::{NodeKind, NodeKinds};
pub use parameters::Parameters;
pub use property::{Lookup, PropertyPaths};

/// Handle of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: Option<Value>,
    params: Parameters,
    nid: Option<String>,
    offset: u64,
    label: Option<String>,
    page_marker: Option<String>,
    image: Option<String>,
    pagination: Option<Pagination>,
}

impl Node {
    /// New detached node. `nid` and `offset` are lifted out of `params`.
    pub fn new(kind: NodeKind, mut params: Parameters, data: Option<Value>) -> Self {
        let nid = params.take("nid");
        let offset = params
            .take("offset")
            .and_then(|offset| offset.parse().ok())
            .unwrap_or(0);
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            data,
            params,
            nid,
            offset,
            label: None,
            page_marker: None,
            image: None,
            pagination: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into()).filter(|l: &String| !l.is_empty());
        self
    }

    /// Position shown after the label of a continuation, e.g. `[50 / 120]`.
    pub fn with_page_marker(mut self, marker: impl Into<String>) -> Self {
        self.page_marker = Some(marker.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into()).filter(|i: &String| !i.is_empty());
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Replaces the payload wholesale.
    pub fn set_data(&mut self, data: Value) {
        self.data = Some(data);
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    /// Identity of the node: the `id` of its payload when known, else the
    /// `nid` it was created with.
    pub fn nid(&self) -> Option<String> {
        self.get_property("id")
            .and_then(property::value_to_string)
            .or_else(|| self.nid.clone())
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn explicit_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn page_marker(&self) -> Option<&str> {
        self.page_marker.as_deref()
    }

    pub fn explicit_image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    /// First of `paths` resolving to a present, non-empty value.
    pub fn get_property<P>(&self, paths: &P) -> Option<&Value>
    where
        P: PropertyPaths + ?Sized,
    {
        property::first_present(self.data.as_ref(), paths)
    }

    /// Like [`Node::get_property`], rendered as text, `default` when absent.
    pub fn get_str<P>(&self, paths: &P, default: &str) -> String
    where
        P: PropertyPaths + ?Sized,
    {
        self.get_property(paths)
            .and_then(property::value_to_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Arena owning every node of one navigation.
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    base_url: String,
}

impl Tree {
    /// Tree whose navigation URLs start with `QOBUZ_PLUGIN_URL`, or the
    /// default plugin URL when that one does not parse.
    pub fn new() -> Self {
        let configured = config::plugin_url();
        let base_url = match Url::parse(&configured) {
            Ok(_) => configured,
            Err(e) => {
                warning!("Ignoring QOBUZ_PLUGIN_URL '{}': {}", configured, e);
                config::DEFAULT_PLUGIN_URL.to_string()
            }
        };
        Self {
            slots: Vec::new(),
            base_url,
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, String> {
        Url::parse(base_url).map_err(|e| format!("invalid base url '{}': {}", base_url, e))?;
        Ok(Self {
            slots: Vec::new(),
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Adds a parentless node.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(node));
        id
    }

    /// Adds `child` as the last child of `parent`. The child inherits a copy
    /// of the parent's parameters, its own entries taking precedence.
    pub fn attach(&mut self, parent: NodeId, mut child: Node) -> NodeId {
        if let Some(parent_node) = self.get(parent) {
            child.params = child.params.inherit_from(&parent_node.params);
        }
        child.parent = Some(parent);
        let id = self.insert(child);
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detaches `id` from its parent and frees it with all its descendants.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            if let Some(parent_node) = self.get_mut(parent) {
                parent_node.children.retain(|child| *child != id);
            }
        }
        self.free(id);
    }

    /// Frees every child subtree of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free(child);
        }
    }

    fn free(&mut self, id: NodeId) {
        let Some(mut node) = self.slots.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        node.parent = None;
        for child in std::mem::take(&mut node.children) {
            self.free(child);
        }
    }

    /// Text shown for the node; never empty.
    pub fn label(&self, id: NodeId) -> String {
        behavior::label(self, id)
    }

    /// Artwork URL in the preferred cover `size` (`large`, `small`, ...).
    pub fn image(&self, id: NodeId, size: &str) -> Option<String> {
        behavior::image(self, id, size)
    }

    pub async fn fetch<A: CatalogApi>(&mut self, id: NodeId, catalog: &Catalog<A>) -> bool {
        behavior::fetch(self, id, catalog).await
    }

    pub fn populate(&mut self, id: NodeId) -> bool {
        behavior::populate(self, id)
    }

    /// Navigation URL re-entering the tree at this node.
    pub fn make_url(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return self.base_url.clone();
        };

        let nid = node.nid().unwrap_or_default();
        let offset = node.offset.to_string();
        let mut pairs: Vec<(&str, &str)> = node
            .params
            .iter()
            .filter(|(name, _)| !matches!(*name, "nt" | "nid" | "offset"))
            .collect();
        if node.params.get("mode").is_none() {
            pairs.push(("mode", "view"));
        }
        pairs.push(("nt", node.kind.slug()));
        pairs.push(("nid", &nid));
        pairs.push(("offset", &offset));
        pairs.sort();

        match Url::parse(&self.base_url) {
            Ok(base) => parameters::build_url(&base, pairs),
            Err(_) => self.base_url.clone(),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics when `id` was removed, like indexing a `Vec` out of bounds.
impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {} is not in the tree", id.0),
        }
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node {} is not in the tree", id.0),
        }
    }
}
