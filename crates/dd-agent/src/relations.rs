//! Parent, child and partner links between agents.
//!
//! Adjacency lists keyed by id.  Every link is stored from both ends, so
//! `links(a)` answers "who is related to `a`" without scanning.  Terminated
//! agents keep their links.

use std::collections::BTreeMap;

use serde::Serialize;

use dd_core::AgentId;

/// How `other` relates to the agent whose list the link is in.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum Relation {
    Parent,
    Child,
    Partner,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Link {
    pub other: AgentId,
    pub relation: Relation,
}

#[derive(Clone, Debug, Default)]
pub struct RelationGraph {
    links: BTreeMap<AgentId, Vec<Link>>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` with no links.  No-op if already present.
    pub fn add_node(&mut self, id: AgentId) {
        self.links.entry(id).or_default();
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.links.contains_key(&id)
    }

    fn push(&mut self, from: AgentId, link: Link) {
        let list = self.links.entry(from).or_default();
        if !list.contains(&link) {
            list.push(link);
        }
    }

    pub fn link_offspring(&mut self, parent: AgentId, child: AgentId) {
        self.push(parent, Link { other: child, relation: Relation::Child });
        self.push(child, Link { other: parent, relation: Relation::Parent });
    }

    /// Record a partnership.  Repeated partnerships are stored once.
    pub fn link_partners(&mut self, a: AgentId, b: AgentId) {
        self.push(a, Link { other: b, relation: Relation::Partner });
        self.push(b, Link { other: a, relation: Relation::Partner });
    }

    /// Links of `id` in the order they were made.  Empty for unknown ids.
    pub fn links(&self, id: AgentId) -> &[Link] {
        self.links.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn related(&self, id: AgentId, relation: Relation) -> impl Iterator<Item = AgentId> + '_ {
        self.links(id).iter().filter(move |l| l.relation == relation).map(|l| l.other)
    }

    pub fn parents_of(&self, id: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.related(id, Relation::Parent)
    }

    pub fn children_of(&self, id: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.related(id, Relation::Child)
    }

    pub fn partners_of(&self, id: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.related(id, Relation::Partner)
    }

    pub fn node_count(&self) -> usize {
        self.links.len()
    }

    /// Undirected link count.
    pub fn edge_count(&self) -> usize {
        self.links.values().map(Vec::len).sum::<usize>() / 2
    }
}
