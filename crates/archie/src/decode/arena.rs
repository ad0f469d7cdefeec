//! Node storage used while a document is being built.
//!
//! The parser keeps handles to the current scope and to the array of the
//! innermost list scope at the same time it writes into them, so nodes live
//! in a flat vector and are addressed by index. A node that never gets
//! attached under the root still accepts writes; it just does not show up
//! in the folded [`DocValue`].

use indexmap::IndexMap;

use crate::value::{DocValue, ObjectStep, Occupant, object_step};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Text(String),
    Node(NodeId),
}

#[derive(Debug, Clone)]
pub enum Node {
    Map(IndexMap<String, Slot>),
    List(Vec<Slot>),
}

#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc_map(&mut self) -> NodeId {
        self.nodes.push(Node::Map(IndexMap::new()));
        self.nodes.len() - 1
    }

    pub fn alloc_list(&mut self) -> NodeId {
        self.nodes.push(Node::List(Vec::new()));
        self.nodes.len() - 1
    }

    pub fn is_map(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(Node::Map(_)))
    }

    pub fn get(&self, map: NodeId, key: &str) -> Option<&Slot> {
        match self.nodes.get(map)? {
            Node::Map(entries) => entries.get(key),
            Node::List(_) => None,
        }
    }

    /// Assigns `key` on a map node, keeping the position of an existing
    /// entry. Lists ignore keyed writes.
    pub fn set(&mut self, map: NodeId, key: &str, slot: Slot) {
        if let Some(Node::Map(entries)) = self.nodes.get_mut(map) {
            entries.insert(key.to_string(), slot);
        }
    }

    pub fn push(&mut self, list: NodeId, slot: Slot) {
        if let Some(Node::List(items)) = self.nodes.get_mut(list) {
            items.push(slot);
        }
    }

    /// Appends to the text stored under `key`, creating it when absent.
    /// A key holding a node is left alone.
    pub fn append_text(&mut self, map: NodeId, key: &str, text: &str) {
        let Some(Node::Map(entries)) = self.nodes.get_mut(map) else {
            return;
        };
        match entries.get_mut(key) {
            Some(Slot::Text(existing)) => existing.push_str(text),
            Some(Slot::Node(_)) => {}
            None => {
                entries.insert(key.to_string(), Slot::Text(text.to_string()));
            }
        }
    }

    /// Last element of a list, when it is text.
    pub fn last_text_mut(&mut self, list: NodeId) -> Option<&mut String> {
        match self.nodes.get_mut(list)? {
            Node::List(items) => match items.last_mut()? {
                Slot::Text(s) => Some(s),
                Slot::Node(_) => None,
            },
            Node::Map(_) => None,
        }
    }

    fn occupant(&self, parent: NodeId, key: &str) -> Occupant {
        match self.get(parent, key) {
            None => Occupant::Missing,
            Some(Slot::Text(s)) => Occupant::Text { empty: s.is_empty() },
            Some(Slot::Node(id)) if self.is_map(*id) => Occupant::Object,
            Some(Slot::Node(_)) => Occupant::Array,
        }
    }

    /// Map stored under `key`, decided by [`object_step`]. When the
    /// occupant is refused it keeps its place and the caller gets a detached
    /// map instead.
    pub fn child_map(&mut self, parent: NodeId, key: &str, replace_text: bool) -> NodeId {
        match object_step(self.occupant(parent, key), replace_text) {
            ObjectStep::Reuse => match self.get(parent, key) {
                Some(Slot::Node(id)) => *id,
                _ => self.alloc_map(),
            },
            ObjectStep::Create => self.attach_map(parent, key),
            ObjectStep::Refuse => self.alloc_map(),
        }
    }

    fn attach_map(&mut self, parent: NodeId, key: &str) -> NodeId {
        let id = self.alloc_map();
        self.set(parent, key, Slot::Node(id));
        id
    }

    /// Folds the tree reachable from `root` into a [`DocValue`].
    pub fn into_value(self, root: NodeId) -> DocValue {
        self.fold(root)
    }

    fn fold(&self, id: NodeId) -> DocValue {
        match self.nodes.get(id) {
            Some(Node::Map(entries)) => DocValue::Object(
                entries
                    .iter()
                    .map(|(k, s)| (k.clone(), self.fold_slot(s)))
                    .collect(),
            ),
            Some(Node::List(items)) => {
                DocValue::Array(items.iter().map(|s| self.fold_slot(s)).collect())
            }
            None => DocValue::new_object(),
        }
    }

    fn fold_slot(&self, slot: &Slot) -> DocValue {
        match slot {
            Slot::Text(s) => DocValue::String(s.clone()),
            Slot::Node(id) => self.fold(*id),
        }
    }
}
