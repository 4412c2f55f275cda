//! # Composition Module
//!
//! Slot discovery and placement. Data flows one way:
//!
//! ```text
//! LoadedAsset -> SlotScanner -> PlacementRegistry -> compose() -> PlacedInstance
//! ```
//!
//! - [`slots`] - scans a node collection for slot markers
//! - [`registry`] - holds the latest scan result
//! - [`composer`] - maps placement descriptors onto slots by index

pub mod composer;
pub mod registry;
pub mod slots;

pub use composer::{compose, Composer, PlacedInstance, PlacementDescriptor, Presentation};
pub use registry::PlacementRegistry;
pub use slots::{scan, Slot, SlotScan, SlotScanner, SLOT_MARKER};
