//! Host display tree
//!
//! The runtime never diffs trees. Render fragments patch this tree
//! surgically: they create nodes once, keep their [`NodeId`]s, and later
//! touch only the attributes or text that their dirty bits say changed.
//!
//! The tree is an arena of element and text nodes hanging off a root node.
//! The root doubles as the "window": host events bubble from their target
//! up to it, so a listener on [`HostTree::root`] sees every event that was
//! not stopped on the way.
//!
//! # Example
//!
//! ```rust
//! use tessel_core::host::HostTree;
//!
//! let mut tree = HostTree::new();
//! let root = tree.root();
//! let div = tree.create_element("div");
//! let text = tree.create_text("hello");
//! tree.append(div, text);
//! tree.append(root, div);
//!
//! assert_eq!(tree.text_content(root), "hello");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a node in a [`HostTree`]
    pub struct NodeId;
}

impl NodeId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Host tree shared between the runtime and every render fragment
pub type SharedHost = Rc<RefCell<HostTree>>;

/// Listener callback attached to a host node
pub type HostHandler = Rc<dyn Fn(&mut HostEvent)>;

/// Identifier returned by [`HostTree::listen`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// =============================================================================
// EVENTS
// =============================================================================

/// Kinds of host events understood by the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    Click,
    MouseOver,
    MouseDown,
    MouseUp,
}

/// Mouse button that produced an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Keyboard modifiers held during an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.alt || self.ctrl || self.shift
    }
}

/// An event travelling through the host tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostEvent {
    pub kind: HostEventKind,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl HostEvent {
    /// A primary-button mouse event without modifiers
    pub fn mouse(kind: HostEventKind) -> Self {
        Self {
            kind,
            button: MouseButton::Primary,
            modifiers: Modifiers::default(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop bubbling once the current node's listeners have run
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

// =============================================================================
// TREE
// =============================================================================

/// What a node is
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element {
        tag: String,
        attrs: SmallVec<[(String, String); 4]>,
        styles: SmallVec<[(String, String); 2]>,
    },
    Text(String),
}

struct HostListener {
    id: ListenerId,
    kind: HostEventKind,
    handler: HostHandler,
}

struct HostNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: SmallVec<[HostListener; 2]>,
}

impl HostNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: SmallVec::new(),
        }
    }
}

/// Arena-backed display tree
pub struct HostTree {
    nodes: SlotMap<NodeId, HostNode>,
    root: NodeId,
    next_listener: u64,
}

impl HostTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(HostNode::new(NodeKind::Root));
        Self {
            nodes,
            root,
            next_listener: 0,
        }
    }

    /// Create a tree wrapped for sharing with fragments
    pub fn shared() -> SharedHost {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The root ("window") node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(HostNode::new(NodeKind::Element {
            tag: tag.to_string(),
            attrs: SmallVec::new(),
            styles: SmallVec::new(),
        }))
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.nodes
            .insert(HostNode::new(NodeKind::Text(data.to_string())))
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node).map(|n| &n.kind)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Insert `node` into `target` before `anchor`, or at the end when the
    /// anchor is `None` or not a child of `target`
    pub fn insert(&mut self, target: NodeId, node: NodeId, anchor: Option<NodeId>) {
        if !self.nodes.contains_key(target) || !self.nodes.contains_key(node) {
            return;
        }
        self.detach(node);

        let children = &mut self.nodes[target].children;
        let position = anchor
            .and_then(|a| children.iter().position(|c| *c == a))
            .unwrap_or(children.len());
        children.insert(position, node);
        self.nodes[node].parent = Some(target);
    }

    pub fn append(&mut self, target: NodeId, node: NodeId) {
        self.insert(target, node, None);
    }

    /// Unlink `node` from its parent, keeping it (and its subtree) alive
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != node);
        }
    }

    /// Unlink `node` and free it together with its subtree and listeners
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(id) {
                stack.extend(removed.children);
            }
        }
    }

    /// Free every child of `node`
    pub fn clear_children(&mut self, node: NodeId) {
        let children = self.children(node).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    // =========================================================================
    // ATTRIBUTES, STYLES, TEXT
    // =========================================================================

    /// Set or (with `None`) remove an attribute; unchanged values are left alone
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: Option<&str>) {
        let Some(NodeKind::Element { attrs, .. }) = self.nodes.get_mut(node).map(|n| &mut n.kind)
        else {
            return;
        };
        set_pair(attrs, name, value);
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { attrs, .. } => get_pair(attrs, name),
            _ => None,
        }
    }

    pub fn set_style(&mut self, node: NodeId, key: &str, value: Option<&str>) {
        let Some(NodeKind::Element { styles, .. }) =
            self.nodes.get_mut(node).map(|n| &mut n.kind)
        else {
            return;
        };
        set_pair(styles, key, value);
    }

    pub fn style(&self, node: NodeId, key: &str) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { styles, .. } => get_pair(styles, key),
            _ => None,
        }
    }

    /// Whether the `class` attribute of `node` lists `class`
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Replace the data of a text node if it differs
    pub fn set_text(&mut self, node: NodeId, data: &str) {
        if let Some(NodeKind::Text(current)) = self.nodes.get_mut(node).map(|n| &mut n.kind) {
            if current != data {
                *current = data.to_string();
            }
        }
    }

    /// Concatenated text of `node` and its descendants, in tree order
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        if let NodeKind::Text(data) = &n.kind {
            out.push_str(data);
        }
        for child in &n.children {
            self.collect_text(*child, out);
        }
    }

    /// Descendants of `node` (excluding itself) carrying `class`, in tree order
    pub fn query_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    // =========================================================================
    // LISTENERS
    // =========================================================================

    /// Attach a listener; returns `None` when the node does not exist
    pub fn listen(
        &mut self,
        node: NodeId,
        kind: HostEventKind,
        handler: HostHandler,
    ) -> Option<ListenerId> {
        let id = ListenerId(self.next_listener);
        let entry = self.nodes.get_mut(node)?;
        self.next_listener += 1;
        entry.listeners.push(HostListener { id, kind, handler });
        Some(id)
    }

    /// Remove a listener; a missing node or listener is ignored
    pub fn unlisten(&mut self, node: NodeId, id: ListenerId) {
        if let Some(entry) = self.nodes.get_mut(node) {
            entry.listeners.retain(|l| l.id != id);
        }
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map(|n| n.listeners.len()).unwrap_or(0)
    }

    fn handlers_for(&self, node: NodeId, kind: HostEventKind) -> SmallVec<[HostHandler; 2]> {
        self.nodes
            .get(node)
            .map(|n| {
                n.listeners
                    .iter()
                    .filter(|l| l.kind == kind)
                    .map(|l| l.handler.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for HostTree {
    fn default() -> Self {
        Self::new()
    }
}

fn get_pair<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn set_pair<A>(pairs: &mut SmallVec<A>, name: &str, value: Option<&str>)
where
    A: smallvec::Array<Item = (String, String)>,
{
    let existing = pairs.iter().position(|(k, _)| k == name);
    match (existing, value) {
        (Some(index), Some(value)) => {
            if pairs[index].1 != value {
                pairs[index].1 = value.to_string();
            }
        }
        (None, Some(value)) => pairs.push((name.to_string(), value.to_string())),
        (Some(index), None) => {
            pairs.remove(index);
        }
        (None, None) => {}
    }
}

/// Dispatch `event` at `target`, bubbling towards the root
///
/// Listeners of each node run on a snapshot taken before any of them is
/// called, and the tree is not borrowed while they run, so handlers are free
/// to mutate the tree or add and remove listeners.
pub fn dispatch(host: &SharedHost, target: NodeId, mut event: HostEvent) -> HostEvent {
    let mut current = Some(target);
    while let Some(node) = current {
        let (handlers, parent) = {
            let tree = host.borrow();
            if !tree.contains(node) {
                break;
            }
            (tree.handlers_for(node, event.kind), tree.parent(node))
        };
        for handler in handlers {
            handler(&mut event);
        }
        if event.propagation_stopped {
            break;
        }
        current = parent;
    }
    event
}
