//! Holds the slots discovered by the most recent scan
//!
//! [`PlacementRegistry::receive`] is the only way the contents change; each
//! delivered scan replaces the previous slots wholesale.

use super::slots::{Slot, SlotScan};

#[derive(Debug, Default)]
pub struct PlacementRegistry {
    slots: Vec<Slot>,
    generation: u64,
}

impl PlacementRegistry {
    /// Creates an empty registry (no scan has completed yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a scan result if one has arrived.
    ///
    /// Returns `true` when the contents were replaced.
    pub fn receive(&mut self, scan: &mut SlotScan) -> bool {
        match scan.try_take() {
            Some(slots) => {
                log::debug!(
                    "Placement registry updated from '{}': {} -> {} slot(s)",
                    scan.source(),
                    self.slots.len(),
                    slots.len()
                );
                self.slots = slots;
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Counts how many times the contents were replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadedAsset, NodeCollection, SceneNode};
    use crate::composition::slots::SlotScanner;
    use cgmath::Vector3;
    use std::sync::Arc;

    fn asset_with(names: &[&str]) -> Arc<LoadedAsset> {
        let nodes: NodeCollection = names
            .iter()
            .enumerate()
            .map(|(i, name)| SceneNode::new(*name, Vector3::new(i as f32, 0.0, 0.0)))
            .collect();
        Arc::new(LoadedAsset {
            id: "test".to_string(),
            nodes,
            meshes: Vec::new(),
        })
    }

    #[test]
    fn test_starts_empty() {
        let registry = PlacementRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.generation(), 0);
    }

    #[test]
    fn test_receive_replaces_contents() {
        let mut registry = PlacementRegistry::new();

        let mut first = SlotScanner::start(&asset_with(&["slot_a", "slot_b", "slot_c"]));
        assert!(registry.receive(&mut first));
        assert_eq!(registry.len(), 3);

        let mut second = SlotScanner::start(&asset_with(&["mesh", "slot_z"]));
        assert!(registry.receive(&mut second));
        assert_eq!(registry.slots(), &[Slot::new(1.0, 0.0, 0.0)]);
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn test_spent_scan_does_not_touch_registry() {
        let mut registry = PlacementRegistry::new();
        let mut scan = SlotScanner::start(&asset_with(&["slot"]));

        assert!(registry.receive(&mut scan));
        assert!(!registry.receive(&mut scan));
        assert_eq!(registry.generation(), 1);
    }
}
