//! Slot discovery
//!
//! A slot is an anchor position in the base scene, marked by a node whose name
//! contains [`SLOT_MARKER`]. The match is a case-sensitive substring test, so
//! names such as `cockpit_slot_extra` match as well.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use cgmath::Vector3;
use futures::{channel::oneshot, FutureExt};

use crate::assets::{LoadedAsset, NodeCollection};

/// Substring that marks a node as a slot
pub const SLOT_MARKER: &str = "slot";

/// A discovered anchor position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: Vector3<f32>,
}

impl Slot {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
        }
    }
}

impl From<Vector3<f32>> for Slot {
    fn from(position: Vector3<f32>) -> Self {
        Self { position }
    }
}

/// Returns `true` if a node name marks a slot
pub fn is_slot_name(name: &str) -> bool {
    name.contains(SLOT_MARKER)
}

/// Collects the positions of all slot nodes in the collection's order.
///
/// Visits every node exactly once. No match yields an empty vector.
pub fn scan(nodes: &NodeCollection) -> Vec<Slot> {
    nodes
        .iter()
        .filter(|node| is_slot_name(&node.name))
        .map(|node| Slot::from(node.position))
        .collect()
}

/// Runs slot scans and hands their results over a oneshot channel
pub struct SlotScanner;

impl SlotScanner {
    /// Scans the asset's nodes once and delivers the full sequence.
    ///
    /// The scan completes synchronously; the returned [`SlotScan`] is already
    /// resolved and yields its slots exactly once.
    pub fn start(asset: &Arc<LoadedAsset>) -> SlotScan {
        let (sender, receiver) = oneshot::channel();
        let slots = scan(&asset.nodes);

        log::info!(
            "Discovered {} slot(s) in '{}' ({} named nodes)",
            slots.len(),
            asset.id,
            asset.nodes.len()
        );
        for (index, slot) in slots.iter().enumerate() {
            log::debug!("  slot {}: {:?}", index, slot.position);
        }

        // The receiver is still held below, so this cannot fail.
        let _ = sender.send(slots);

        SlotScan {
            source: asset.id.clone(),
            receiver: Some(receiver),
        }
    }
}

/// Completion channel of a single slot scan
pub struct SlotScan {
    source: String,
    receiver: Option<oneshot::Receiver<Vec<Slot>>>,
}

impl SlotScan {
    /// Identifier of the asset that was scanned
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Takes the scan result if it has arrived; `Some` is returned only once
    pub fn try_take(&mut self) -> Option<Vec<Slot>> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(Some(slots)) => {
                self.receiver = None;
                Some(slots)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.receiver = None;
                None
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.receiver.is_none()
    }
}

impl Future for SlotScan {
    type Output = Option<Vec<Slot>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        let Some(receiver) = this.receiver.as_mut() else {
            return Poll::Ready(None);
        };

        match receiver.poll_unpin(cx) {
            Poll::Ready(result) => {
                this.receiver = None;
                Poll::Ready(result.ok())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SceneNode;

    fn nodes(entries: &[(&str, [f32; 3])]) -> NodeCollection {
        entries
            .iter()
            .map(|(name, p)| SceneNode::new(*name, Vector3::new(p[0], p[1], p[2])))
            .collect()
    }

    #[test]
    fn test_scan_keeps_matching_positions_in_order() {
        let collection = nodes(&[
            ("slotA", [0.0, 0.0, 0.0]),
            ("mesh1", [1.0, 1.0, 1.0]),
            ("slotB", [2.0, 2.0, 2.0]),
        ]);

        assert_eq!(
            scan(&collection),
            vec![Slot::new(0.0, 0.0, 0.0), Slot::new(2.0, 2.0, 2.0)]
        );
    }

    #[test]
    fn test_scan_without_matches_is_empty() {
        let collection = nodes(&[("Watch", [0.0, 0.0, 0.0]), ("glass", [1.0, 0.0, 0.0])]);
        assert!(scan(&collection).is_empty());
        assert!(scan(&NodeCollection::new()).is_empty());
    }

    #[test]
    fn test_marker_is_case_sensitive_substring() {
        assert!(is_slot_name("slot"));
        assert!(is_slot_name("cockpit_slot_extra"));
        assert!(is_slot_name("slot.001"));
        assert!(!is_slot_name("Slot"));
        assert!(!is_slot_name("SLOT_1"));
        assert!(!is_slot_name("s_lot"));
    }

    #[test]
    fn test_scanner_delivers_once() {
        let asset = Arc::new(LoadedAsset {
            id: "scene.glb".to_string(),
            nodes: nodes(&[("slot_1", [5.0, 1.0, 0.0])]),
            meshes: Vec::new(),
        });

        let mut scan = SlotScanner::start(&asset);
        assert_eq!(scan.source(), "scene.glb");
        assert_eq!(scan.try_take(), Some(vec![Slot::new(5.0, 1.0, 0.0)]));
        assert!(scan.is_delivered());
        assert_eq!(scan.try_take(), None);
    }

    #[test]
    fn test_scan_can_be_awaited() {
        let asset = Arc::new(LoadedAsset::default());
        let result = futures::executor::block_on(SlotScanner::start(&asset));
        assert_eq!(result, Some(Vec::new()));
    }
}
