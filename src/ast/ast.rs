use id_arena::{Arena, Id};

use crate::{errors::errors::Error, Position, Span};

use super::nodes::NodeKind;

pub type NodeId = Id<Node>;

/// Position of a child inside its parent.
///
/// Keyed nodes address their children by slot name, sequence nodes by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Named(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
enum Children {
    Keyed(Vec<(&'static str, Option<NodeId>)>),
    Sequence(Vec<NodeId>),
}

/// A single tree node.
///
/// `parent` and `selfref` are only ever written by `Ast`, so for every child
/// `c` stored at key `k` of `p` they read back `p` and `k`.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Option<Span>,
    children: Children,
    parent: Option<NodeId>,
    selfref: Option<SlotKey>,
}

impl Node {
    fn new(kind: NodeKind, span: Option<Span>) -> Self {
        let children = match kind.slots() {
            Some(slots) => Children::Keyed(slots.iter().map(|slot| (*slot, None)).collect()),
            None => Children::Sequence(Vec::new()),
        };

        Node {
            kind,
            span,
            children,
            parent: None,
            selfref: None,
        }
    }
}

/// The whole program tree, stored in an arena and addressed by `NodeId`.
///
/// The root is always a `Module`. Nodes that get unlinked stay in the arena
/// but are no longer reachable from the root.
#[derive(Debug)]
pub struct Ast {
    nodes: Arena<Node>,
    root: NodeId,
}

impl Default for Ast {
    fn default() -> Self {
        Ast::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new(NodeKind::Module, None));
        Ast { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates a detached node with empty slots.
    pub fn add_node(&mut self, kind: NodeKind, span: Option<Span>) -> NodeId {
        self.nodes.alloc(Node::new(kind, span))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn selfref(&self, id: NodeId) -> Option<SlotKey> {
        self.nodes[id].selfref
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id].span = Some(span);
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes[id].span.as_ref().map(|span| span.start.clone())
    }

    pub fn is_sequence(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].children, Children::Sequence(_))
    }

    /// Number of children of a sequence node, 0 for keyed nodes.
    pub fn len(&self, id: NodeId) -> usize {
        match &self.nodes[id].children {
            Children::Sequence(children) => children.len(),
            Children::Keyed(_) => 0,
        }
    }

    pub fn slot(&self, id: NodeId, name: &str) -> Option<NodeId> {
        match &self.nodes[id].children {
            Children::Keyed(slots) => slots
                .iter()
                .find(|(slot, _)| *slot == name)
                .and_then(|(_, child)| *child),
            Children::Sequence(_) => None,
        }
    }

    /// Like `slot`, but an empty slot is a structural violation.
    pub fn expect_slot(&self, id: NodeId, name: &str) -> Result<NodeId, Error> {
        self.slot(id, name).ok_or_else(|| {
            Error::structural(format!("slot `{}` of {} is empty", name, self.describe(id)))
                .or_position(self.position(id))
        })
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match &self.nodes[id].children {
            Children::Sequence(children) => children.get(index).copied(),
            Children::Keyed(_) => None,
        }
    }

    pub fn get(&self, id: NodeId, key: SlotKey) -> Option<NodeId> {
        match key {
            SlotKey::Named(name) => self.slot(id, name),
            SlotKey::Index(index) => self.child_at(id, index),
        }
    }

    /// Snapshot of the present children, in slot or index order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id].children {
            Children::Keyed(slots) => slots.iter().filter_map(|(_, child)| *child).collect(),
            Children::Sequence(children) => children.clone(),
        }
    }

    /// Appends `child` to a sequence node, detaching it from its previous owner.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if !self.is_sequence(parent) {
            return Err(Error::structural(format!(
                "cannot append to keyed {}",
                self.describe(parent)
            )));
        }
        self.check_no_cycle(parent, child)?;
        self.detach(child);

        let index = match &mut self.nodes[parent].children {
            Children::Sequence(children) => {
                children.push(child);
                children.len() - 1
            }
            Children::Keyed(_) => return Err(Error::structural("cannot append to a keyed node")),
        };
        self.attach(parent, SlotKey::Index(index), child);

        Ok(())
    }

    pub fn add_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), Error> {
        for child in children {
            self.add_child(parent, *child)?;
        }
        Ok(())
    }

    /// Stores `child` in a named slot. The displaced occupant, if any, is
    /// detached.
    pub fn set_slot(
        &mut self,
        parent: NodeId,
        name: &str,
        child: Option<NodeId>,
    ) -> Result<(), Error> {
        let slot = self.slot_name(parent, name)?;

        if let Some(child) = child {
            self.check_no_cycle(parent, child)?;
            self.detach(child);
        }

        let displaced = self.slot(parent, slot);
        if let Some(displaced) = displaced {
            self.clear_owner(displaced);
        }

        if let Children::Keyed(slots) = &mut self.nodes[parent].children {
            if let Some(entry) = slots.iter_mut().find(|(key, _)| *key == slot) {
                entry.1 = child;
            }
        }

        if let Some(child) = child {
            self.attach(parent, SlotKey::Named(slot), child);
        }

        Ok(())
    }

    /// Overwrites (or, with `None`, removes) the child at `key`.
    pub fn set(&mut self, parent: NodeId, key: SlotKey, child: Option<NodeId>) -> Result<(), Error> {
        match key {
            SlotKey::Named(name) => self.set_slot(parent, name, child),
            SlotKey::Index(index) => {
                let current = self.child_at(parent, index).ok_or_else(|| {
                    Error::structural(format!(
                        "index {} out of range for {}",
                        index,
                        self.describe(parent)
                    ))
                })?;
                match child {
                    Some(child) => self.replace(current, &[child]),
                    None => self.replace(current, &[]),
                }
            }
        }
    }

    /// Removes the child at `key` and returns it. Sequence siblings after the
    /// removed index shift down by one.
    pub fn delete(&mut self, parent: NodeId, key: SlotKey) -> Result<Option<NodeId>, Error> {
        let current = self.get(parent, key);
        self.set(parent, key, None)?;
        Ok(current)
    }

    /// Detaches `node` from its parent and splices `replacements` in at the
    /// same position.
    ///
    /// In a sequence parent every replacement takes consecutive indices and
    /// the following siblings shift to stay contiguous. A keyed slot accepts
    /// at most one replacement.
    pub fn replace(&mut self, node: NodeId, replacements: &[NodeId]) -> Result<(), Error> {
        let parent = self.parent(node).ok_or_else(|| {
            Error::structural(format!("cannot replace detached {}", self.describe(node)))
                .or_position(self.position(node))
        })?;

        for (i, replacement) in replacements.iter().enumerate() {
            if *replacement == node || replacements[..i].contains(replacement) {
                return Err(Error::structural(format!(
                    "{} appears twice in a replacement",
                    self.describe(*replacement)
                )));
            }
            if self.is_ancestor(*replacement, node) {
                return Err(Error::structural(format!(
                    "{} cannot replace its own descendant",
                    self.describe(*replacement)
                )));
            }
        }

        if let Some(SlotKey::Named(name)) = self.selfref(node) {
            if replacements.len() > 1 {
                return Err(Error::structural(format!(
                    "slot `{}` of {} holds a single node, got {}",
                    name,
                    self.describe(parent),
                    replacements.len()
                )));
            }
        }

        for replacement in replacements {
            self.detach(*replacement);
        }

        // Detaching earlier siblings may have shifted `node`.
        match self.selfref(node) {
            Some(SlotKey::Named(name)) => self.set_slot(parent, name, replacements.first().copied()),
            Some(SlotKey::Index(index)) => {
                if let Children::Sequence(children) = &mut self.nodes[parent].children {
                    children.remove(index);
                    for (offset, replacement) in replacements.iter().enumerate() {
                        children.insert(index + offset, *replacement);
                    }
                }
                self.clear_owner(node);
                self.reindex(parent, index);
                Ok(())
            }
            None => Err(Error::structural(format!(
                "{} lost its position during replacement",
                self.describe(node)
            ))),
        }
    }

    /// Removes `node` from its parent and returns it.
    pub fn unlink(&mut self, node: NodeId) -> Result<NodeId, Error> {
        self.replace(node, &[])?;
        Ok(node)
    }

    /// The sibling right after `node` in a sequence parent.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        match (self.parent(node), self.selfref(node)) {
            (Some(parent), Some(SlotKey::Index(index))) => self.child_at(parent, index + 1),
            _ => None,
        }
    }

    /// Preorder listing of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }

        result
    }

    /// Parents of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);

        while let Some(parent) = current {
            result.push(parent);
            current = self.parent(parent);
        }

        result
    }

    pub fn is_ancestor(&self, candidate: NodeId, id: NodeId) -> bool {
        self.ancestors(id).contains(&candidate)
    }

    /// Short human readable label used in error messages.
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id).name() {
            Some(name) => format!("{} `{}`", self.kind(id).kind_name(), name),
            None => self.kind(id).kind_name().to_string(),
        }
    }

    fn slot_name(&self, parent: NodeId, name: &str) -> Result<&'static str, Error> {
        match &self.nodes[parent].children {
            Children::Keyed(slots) => slots
                .iter()
                .map(|(slot, _)| *slot)
                .find(|slot| *slot == name)
                .ok_or_else(|| {
                    Error::structural(format!(
                        "{} has no slot `{}`",
                        self.describe(parent),
                        name
                    ))
                }),
            Children::Sequence(_) => Err(Error::structural(format!(
                "{} is a sequence and has no slot `{}`",
                self.describe(parent),
                name
            ))),
        }
    }

    fn check_no_cycle(&self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::structural(format!(
                "attaching {} under {} would create a cycle",
                self.describe(child),
                self.describe(parent)
            )));
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, key: SlotKey, child: NodeId) {
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.selfref = Some(key);
    }

    fn clear_owner(&mut self, child: NodeId) {
        let node = &mut self.nodes[child];
        node.parent = None;
        node.selfref = None;
    }

    /// Removes `child` from wherever it currently lives. No-op when detached.
    fn detach(&mut self, child: NodeId) {
        let (parent, key) = match (self.parent(child), self.selfref(child)) {
            (Some(parent), Some(key)) => (parent, key),
            _ => return,
        };

        match (&mut self.nodes[parent].children, key) {
            (Children::Keyed(slots), SlotKey::Named(name)) => {
                if let Some(entry) = slots.iter_mut().find(|(slot, _)| *slot == name) {
                    entry.1 = None;
                }
            }
            (Children::Sequence(children), SlotKey::Index(index)) => {
                children.remove(index);
            }
            _ => {}
        }

        self.clear_owner(child);
        if let SlotKey::Index(index) = key {
            self.reindex(parent, index);
        }
    }

    fn reindex(&mut self, parent: NodeId, from: usize) {
        let children = match &self.nodes[parent].children {
            Children::Sequence(children) => children[from.min(children.len())..].to_vec(),
            Children::Keyed(_) => return,
        };

        for (offset, child) in children.into_iter().enumerate() {
            self.attach(parent, SlotKey::Index(from + offset), child);
        }
    }
}
