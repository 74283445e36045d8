use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::HostError;
use crate::host::{DropEffect, EventKind, Host, HostEvent, ImageFile};

/// A node created by a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryNode(usize);

/// A file held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait::async_trait(?Send)]
impl ImageFile for MemoryFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, HostError> {
        Ok(self.bytes.clone())
    }
}

#[derive(Debug, Default)]
struct MemoryEventState {
    data_transfer: bool,
    files: Vec<MemoryFile>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    drop_effect: Cell<Option<DropEffect>>,
}

/// An event dispatched through a [`MemoryHost`].
///
/// Clones share their state, so a test can keep one copy around and inspect what
/// the listeners did with the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryEvent {
    state: Rc<MemoryEventState>,
}

impl MemoryEvent {
    /// An event without a drag payload or files, like a click.
    pub fn new() -> Self {
        Self::default()
    }

    /// A drag event whose data transfer holds no files.
    pub fn drag() -> Self {
        Self::drag_with_files(Vec::new())
    }

    /// A drag event carrying `files`.
    pub fn drag_with_files(files: Vec<MemoryFile>) -> Self {
        Self {
            state: Rc::new(MemoryEventState {
                data_transfer: true,
                files,
                ..Default::default()
            }),
        }
    }

    /// A change event from a file input holding `files`.
    pub fn input_with_files(files: Vec<MemoryFile>) -> Self {
        Self {
            state: Rc::new(MemoryEventState {
                files,
                ..Default::default()
            }),
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.state.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.state.propagation_stopped.get()
    }

    pub fn drop_effect(&self) -> Option<DropEffect> {
        self.state.drop_effect.get()
    }
}

impl HostEvent for MemoryEvent {
    type File = MemoryFile;

    fn prevent_default(&self) {
        self.state.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.state.propagation_stopped.set(true);
    }

    fn set_drop_effect(&self, effect: DropEffect) -> bool {
        if !self.state.data_transfer {
            return false;
        }
        self.state.drop_effect.set(Some(effect));
        true
    }

    fn first_file(&self) -> Option<MemoryFile> {
        self.state.files.first().cloned()
    }
}

#[derive(Default)]
struct NodeState {
    parent: Option<MemoryNode>,
    children: Vec<MemoryNode>,
    classes: BTreeSet<String>,
    hidden: bool,
    accept: Option<String>,
    value: String,
    opened: usize,
    removed: bool,
}

type Handler = Rc<dyn Fn(MemoryEvent)>;

struct Registration {
    id: u64,
    node: MemoryNode,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct MemoryHostState {
    nodes: Vec<NodeState>,
    listeners: Vec<Registration>,
    next_listener: u64,
    reported: Vec<String>,
}

impl MemoryHostState {
    fn node(&self, node: MemoryNode) -> Option<&NodeState> {
        self.nodes.get(node.0)
    }

    fn node_mut(&mut self, node: MemoryNode) -> Option<&mut NodeState> {
        self.nodes.get_mut(node.0)
    }
}

/// The token returned by [`Host::listen`] on a [`MemoryHost`].
#[derive(Debug)]
pub struct MemoryListener(u64);

/// A [`Host`] that keeps its document in memory and only fires events when told to.
///
/// Clones share the same document.
#[derive(Clone, Default)]
pub struct MemoryHost {
    state: Rc<RefCell<MemoryHostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element to use as a drop target.
    pub fn create_element(&self) -> MemoryNode {
        let mut state = self.state.borrow_mut();
        state.nodes.push(NodeState::default());
        MemoryNode(state.nodes.len() - 1)
    }

    /// Run every listener registered for `kind` on `node`. Returns how many ran.
    pub fn dispatch(&self, node: MemoryNode, kind: EventKind, event: MemoryEvent) -> usize {
        // Handlers call back into the host, so nothing may stay borrowed while they run.
        let handlers: Vec<Handler> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|reg| reg.node == node && reg.kind == kind)
            .map(|reg| reg.handler.clone())
            .collect();

        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }

    /// Put `files` into the file input `picker` and fire its change event.
    pub fn select_files(&self, picker: MemoryNode, files: Vec<MemoryFile>) -> usize {
        if let Some(node) = self.state.borrow_mut().node_mut(picker) {
            node.value = files.first().map(|f| f.name.clone()).unwrap_or_default();
        }
        self.dispatch(picker, EventKind::Change, MemoryEvent::input_with_files(files))
    }

    pub fn children(&self, node: MemoryNode) -> Vec<MemoryNode> {
        self.state
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, node: MemoryNode) -> Option<MemoryNode> {
        self.state.borrow().node(node).and_then(|n| n.parent)
    }

    pub fn is_removed(&self, node: MemoryNode) -> bool {
        self.state.borrow().node(node).is_some_and(|n| n.removed)
    }

    pub fn has_class(&self, node: MemoryNode, class: &str) -> bool {
        self.state
            .borrow()
            .node(node)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn is_hidden(&self, node: MemoryNode) -> bool {
        self.state.borrow().node(node).is_some_and(|n| n.hidden)
    }

    /// The `accept` filter of a file input, `None` for other nodes.
    pub fn accept(&self, node: MemoryNode) -> Option<String> {
        self.state.borrow().node(node).and_then(|n| n.accept.clone())
    }

    pub fn value(&self, node: MemoryNode) -> String {
        self.state
            .borrow()
            .node(node)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    /// How many times the native chooser of `picker` was opened.
    pub fn open_count(&self, picker: MemoryNode) -> usize {
        self.state.borrow().node(picker).map_or(0, |n| n.opened)
    }

    pub fn listener_count(&self, node: MemoryNode) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|reg| reg.node == node)
            .count()
    }

    /// Messages that went to the default rejection sink.
    pub fn reported(&self) -> Vec<String> {
        self.state.borrow().reported.clone()
    }
}

impl Host for MemoryHost {
    type Node = MemoryNode;
    type File = MemoryFile;
    type Event = MemoryEvent;
    type Listener = MemoryListener;

    fn create_file_picker(
        &self,
        parent: &MemoryNode,
        accept: &str,
    ) -> Result<MemoryNode, HostError> {
        let mut state = self.state.borrow_mut();
        match state.node(*parent) {
            Some(node) if !node.removed => {}
            _ => return Err(HostError::UnknownNode),
        }

        let picker = MemoryNode(state.nodes.len());
        state.nodes.push(NodeState {
            parent: Some(*parent),
            accept: Some(accept.to_string()),
            ..Default::default()
        });
        if let Some(parent) = state.node_mut(*parent) {
            parent.children.push(picker);
        }
        Ok(picker)
    }

    fn remove_node(&self, node: &MemoryNode) {
        let mut state = self.state.borrow_mut();
        let Some(removed) = state.node_mut(*node) else {
            return;
        };
        removed.removed = true;
        if let Some(parent) = removed.parent.take() {
            if let Some(parent) = state.node_mut(parent) {
                parent.children.retain(|child| child != node);
            }
        }
    }

    fn set_class(&self, node: &MemoryNode, class: &str, enabled: bool) {
        if let Some(node) = self.state.borrow_mut().node_mut(*node) {
            if enabled {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
    }

    fn set_hidden(&self, node: &MemoryNode, hidden: bool) {
        if let Some(node) = self.state.borrow_mut().node_mut(*node) {
            node.hidden = hidden;
        }
    }

    fn open_file_picker(&self, picker: &MemoryNode) {
        {
            let mut state = self.state.borrow_mut();
            let Some(node) = state.node_mut(*picker) else {
                return;
            };
            node.value.clear();
            node.opened += 1;
        }

        // Like `HTMLElement.click()`, the synthetic click bubbles through every ancestor.
        let event = MemoryEvent::new();
        let mut node = Some(*picker);
        while let Some(current) = node {
            self.dispatch(current, EventKind::Click, event.clone());
            node = self.parent(current);
        }
    }

    fn listen(
        &self,
        node: &MemoryNode,
        kind: EventKind,
        handler: Box<dyn Fn(MemoryEvent)>,
    ) -> Result<MemoryListener, HostError> {
        let mut state = self.state.borrow_mut();
        if state.node(*node).is_none() {
            return Err(HostError::UnknownNode);
        }

        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.push(Registration {
            id,
            node: *node,
            kind,
            handler: Rc::from(handler),
        });
        Ok(MemoryListener(id))
    }

    fn unlisten(&self, _node: &MemoryNode, listener: MemoryListener) {
        // Dropping the registration outside the borrow lets handlers own the host.
        let removed: Vec<Registration> = {
            let mut state = self.state.borrow_mut();
            let (removed, kept) = std::mem::take(&mut state.listeners)
                .into_iter()
                .partition(|reg| reg.id == listener.0);
            state.listeners = kept;
            removed
        };
        drop(removed);
    }

    fn report(&self, message: &str) {
        tracing::warn!("{message}");
        self.state.borrow_mut().reported.push(message.to_string());
    }
}
