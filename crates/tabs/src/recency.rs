//! Recency Tracker - most-recently-used order over live tabs
//!
//! Independent of display order. Least recent first, most recent last.
//! Tabs are few, so a plain Vec with linear scans is plenty.

use crate::tab::TabId;

#[derive(Debug, Default, Clone)]
pub struct RecencyTracker {
    order: Vec<TabId>,
}

impl RecencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.order.contains(&id)
    }

    /// Tracked tabs, least recent first
    pub fn iter(&self) -> impl Iterator<Item = TabId> + '_ {
        self.order.iter().copied()
    }

    pub fn most_recent(&self) -> Option<TabId> {
        self.order.last().copied()
    }

    /// Make `id` the most recent
    pub fn touch(&mut self, id: TabId) {
        self.remove(id);
        self.order.push(id);
    }

    /// Start tracking `id` as the least recent. Already tracked tabs keep
    /// their place.
    pub fn track(&mut self, id: TabId) {
        if !self.contains(id) {
            self.order.insert(0, id);
        }
    }

    pub fn remove(&mut self, id: TabId) -> bool {
        match self.order.iter().position(|tracked| *tracked == id) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Forget the old order: track every tab in `all` order, then promote
    /// `current`.
    pub fn rebuild_arbitrary(&mut self, all: &[TabId], current: Option<TabId>) {
        self.order.clear();
        for id in all {
            if !self.order.contains(id) {
                self.order.push(*id);
            }
        }
        if let Some(current) = current {
            if self.contains(current) {
                self.touch(current);
            }
        }
    }

    /// Rebuild from persisted positions into `sequence`. Out-of-range
    /// positions are skipped and repeats collapse, which leaves the tracker
    /// short; callers compare sizes afterwards.
    pub fn restore_from_indices(&mut self, indices: &[usize], sequence: &[TabId]) {
        self.order.clear();
        for &index in indices {
            if let Some(id) = sequence.get(index) {
                self.touch(*id);
            }
        }
    }

    /// Position in `sequence` of every tracked tab, in recency order.
    /// Tabs missing from `sequence` are left out.
    pub fn to_index_array(&self, sequence: &[TabId]) -> Vec<usize> {
        self.order
            .iter()
            .filter_map(|id| sequence.iter().position(|tab| tab == id))
            .collect()
    }

    /// Rebuild if membership no longer matches `sequence`. Returns true
    /// when a rebuild happened.
    pub fn ensure_consistent(&mut self, sequence: &[TabId], current: Option<TabId>) -> bool {
        let consistent =
            self.order.len() == sequence.len() && sequence.iter().all(|id| self.contains(*id));
        if consistent {
            return false;
        }

        tracing::warn!(
            "[RecencyTracker] Tracking {} tabs but {} are live, rebuilding",
            self.order.len(),
            sequence.len()
        );
        self.rebuild_arbitrary(sequence, current);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<TabId> {
        (0..n).map(|_| TabId::new()).collect()
    }

    #[test]
    fn test_touch_moves_to_most_recent() {
        let tabs = ids(3);
        let mut tracker = RecencyTracker::new();
        for id in &tabs {
            tracker.touch(*id);
        }

        tracker.touch(tabs[0]);

        assert_eq!(tracker.iter().collect::<Vec<_>>(), vec![tabs[1], tabs[2], tabs[0]]);
        assert_eq!(tracker.most_recent(), Some(tabs[0]));
    }

    #[test]
    fn test_track_adds_as_least_recent() {
        let tabs = ids(3);
        let mut tracker = RecencyTracker::new();
        tracker.touch(tabs[0]);
        tracker.touch(tabs[1]);

        tracker.track(tabs[2]);
        tracker.track(tabs[0]);

        assert_eq!(tracker.iter().collect::<Vec<_>>(), vec![tabs[2], tabs[0], tabs[1]]);
    }

    #[test]
    fn test_rebuild_arbitrary_promotes_current() {
        let tabs = ids(4);
        let mut tracker = RecencyTracker::new();
        tracker.touch(tabs[3]);

        tracker.rebuild_arbitrary(&tabs, Some(tabs[1]));

        assert_eq!(tracker.len(), 4);
        assert_eq!(tracker.most_recent(), Some(tabs[1]));
    }

    #[test]
    fn test_index_array_round_trip() {
        let tabs = ids(4);
        let mut tracker = RecencyTracker::new();
        for i in [2, 0, 3, 1] {
            tracker.touch(tabs[i]);
        }

        let indices = tracker.to_index_array(&tabs);
        assert_eq!(indices, vec![2, 0, 3, 1]);

        let mut restored = RecencyTracker::new();
        restored.restore_from_indices(&indices, &tabs);
        assert_eq!(restored.iter().collect::<Vec<_>>(), tracker.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_bad_indices_leave_tracker_short() {
        let tabs = ids(3);
        let mut tracker = RecencyTracker::new();

        tracker.restore_from_indices(&[0, 0, 7], &tabs);
        assert_eq!(tracker.len(), 1);

        assert!(tracker.ensure_consistent(&tabs, Some(tabs[0])));
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.most_recent(), Some(tabs[0]));
        assert!(!tracker.ensure_consistent(&tabs, Some(tabs[0])));
    }
}
