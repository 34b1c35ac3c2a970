//! Layer bookkeeping
//!
//! A layer is a caller-chosen name that can own one group per feature kind.
//! The same name used first for markers and later for a route ends up
//! owning both a point group and a line group. Entries appear when a group
//! is first recorded under a name and disappear when their last group is
//! removed.

use mapkit_core::{FeatureKind, GroupId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A group tracked under a layer name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupState {
    /// Handle on the drawing surface
    pub id: GroupId,
    /// Number of features added through this store
    pub features: usize,
}

/// Groups owned by one layer name, at most one per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerEntry {
    points: Option<GroupState>,
    lines: Option<GroupState>,
    polygons: Option<GroupState>,
}

impl LayerEntry {
    fn slot(&self, kind: FeatureKind) -> &Option<GroupState> {
        match kind {
            FeatureKind::Point => &self.points,
            FeatureKind::Line => &self.lines,
            FeatureKind::Polygon => &self.polygons,
        }
    }

    fn slot_mut(&mut self, kind: FeatureKind) -> &mut Option<GroupState> {
        match kind {
            FeatureKind::Point => &mut self.points,
            FeatureKind::Line => &mut self.lines,
            FeatureKind::Polygon => &mut self.polygons,
        }
    }

    /// The group of the given kind, if any
    pub fn group(&self, kind: FeatureKind) -> Option<GroupState> {
        *self.slot(kind)
    }

    /// All groups of this layer, in [`FeatureKind::ALL`] order
    pub fn groups(&self) -> impl Iterator<Item = (FeatureKind, GroupState)> + '_ {
        FeatureKind::ALL
            .into_iter()
            .filter_map(|kind| self.group(kind).map(|g| (kind, g)))
    }

    fn is_empty(&self) -> bool {
        self.points.is_none() && self.lines.is_none() && self.polygons.is_none()
    }
}

/// Summary of one layer, as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    /// Markers in the point group, if the layer has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<usize>,
    /// Polylines in the line group, if the layer has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
    /// Polygons in the polygon group, if the layer has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygons: Option<usize>,
}

impl LayerSummary {
    /// Number of groups the layer owns
    pub fn group_count(&self) -> usize {
        [self.points, self.lines, self.polygons]
            .iter()
            .filter(|g| g.is_some())
            .count()
    }
}

/// Registry of layer names to the groups they own
#[derive(Debug, Default)]
pub struct LayerStore {
    entries: BTreeMap<String, LayerEntry>,
}

impl LayerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The group of `kind` owned by `name`
    pub fn group(&self, name: &str, kind: FeatureKind) -> Option<GroupState> {
        self.entries.get(name).and_then(|e| e.group(kind))
    }

    /// Entry for a layer name
    pub fn get(&self, name: &str) -> Option<&LayerEntry> {
        self.entries.get(name)
    }

    /// Record `added` new features in the group of `kind` under `name`
    ///
    /// Creates the entry and the group slot on first use. If the slot is
    /// already held by a different group, the new handle replaces it and
    /// the count restarts.
    pub fn record(&mut self, name: &str, kind: FeatureKind, id: GroupId, added: usize) {
        let slot = self
            .entries
            .entry(name.to_string())
            .or_default()
            .slot_mut(kind);

        match slot {
            Some(state) if state.id == id => state.features += added,
            _ => {
                *slot = Some(GroupState {
                    id,
                    features: added,
                });
            }
        }
    }

    /// Stop tracking one group; drops the entry once it owns nothing
    pub fn remove_group(&mut self, name: &str, kind: FeatureKind) -> Option<GroupState> {
        let entry = self.entries.get_mut(name)?;
        let removed = entry.slot_mut(kind).take();
        if entry.is_empty() {
            self.entries.remove(name);
        }
        removed
    }

    /// Forget every layer, returning how many there were
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Layer names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries of every layer, sorted by name
    pub fn summaries(&self) -> Vec<LayerSummary> {
        self.entries
            .iter()
            .map(|(name, entry)| LayerSummary {
                name: name.clone(),
                points: entry.points.map(|g| g.features),
                lines: entry.lines.map(|g| g.features),
                polygons: entry.polygons.map(|g| g.features),
            })
            .collect()
    }
}
