//! Overlay render list: draw order of every mounted instance.

use glam::Vec2;

use super::instance::ResolvedClip;
use super::InstanceId;

/// Draw collaborator for overlay content.
///
/// The engine decides what draws in the overlay, where and under which
/// clip; the surface owns the recorded content of each instance and does
/// the compositing.
pub trait OverlaySurface {
    /// Draw `instance`'s recorded content translated by `offset`, clipped
    /// to `clip` when present.
    fn draw_layer(&mut self, instance: InstanceId, offset: Vec2, clip: Option<ResolvedClip>);
}

/// Ordered overlay entries with a lazily applied stable sort.
#[derive(Debug, Default)]
pub(crate) struct OverlayList {
    entries: Vec<InstanceId>,
    dirty: bool,
}

impl OverlayList {
    /// Insert `id` right after the last entry for which `same_group`
    /// holds, or append when there is none.
    pub(crate) fn insert(&mut self, id: InstanceId, same_group: impl Fn(InstanceId) -> bool) {
        match self.entries.iter().rposition(|entry| same_group(*entry)) {
            Some(index) => self.entries.insert(index + 1, id),
            None => self.entries.push(id),
        }
        self.dirty = true;
    }

    pub(crate) fn remove(&mut self, id: InstanceId) {
        self.entries.retain(|entry| *entry != id);
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Stable-sort by `sort_key` if anything changed since the last sort.
    pub(crate) fn sort_if_dirty(&mut self, sort_key: impl Fn(InstanceId) -> f32) {
        if !self.dirty {
            return;
        }
        self.entries
            .sort_by(|a, b| sort_key(*a).total_cmp(&sort_key(*b)));
        self.dirty = false;
    }

    pub(crate) fn entries(&self) -> &[InstanceId] {
        &self.entries
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.dirty = false;
    }
}
