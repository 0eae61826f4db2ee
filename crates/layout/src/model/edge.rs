use super::PortHandle;
use crate::PathData;
use derive_more::{Display, From};
use portlay_definition::{Metadata, PortRef, TEMPORARY_KEY};
use std::cell::Cell;

/// Position of an edge in the graph's edge list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct EdgeIndex(pub usize);

#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) id: String,
    pub(crate) from: PortRef,
    pub(crate) to: PortRef,
    pub(crate) label: String,
    pub(crate) metadata: Metadata,
    pub(crate) path: PathData,
    /// Cached `(from, to)` resolution, cleared when node indices shift
    pub(crate) endpoints: Cell<Option<(PortHandle, PortHandle)>>,
    /// Replaced by a chain of temporary edges during layout
    pub(crate) split: bool,
    pub(crate) synthetic: bool,
}

impl Edge {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from(&self) -> &PortRef {
        &self.from
    }

    pub fn to(&self) -> &PortRef {
        &self.to
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn path(&self) -> &PathData {
        &self.path
    }

    /// The path as the string consumed by renderers
    pub fn path_definition(&self) -> String {
        self.path.to_string()
    }

    pub fn is_self_loop(&self) -> bool {
        self.from.node_id == self.to.node_id
    }

    /// Whether the edge carries the `temporary` tag
    pub fn is_temporary(&self) -> bool {
        self.metadata
            .get(TEMPORARY_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Whether the edge is logically replaced by a chain through dummy nodes
    pub fn is_split(&self) -> bool {
        self.split
    }

    /// Swap both ends in place, the id is kept
    pub(crate) fn reverse(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        if let Some((from, to)) = self.endpoints.get() {
            self.endpoints.set(Some((to, from)));
        }
    }
}
