//! Pairs placement descriptors with discovered slots

use serde::{Deserialize, Serialize};

use super::slots::Slot;

/// A model the caller wants placed at the slot with the same index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDescriptor {
    #[serde(rename = "url")]
    pub asset_url: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub floating: bool,
}

fn default_scale() -> f32 {
    1.0
}

impl PlacementDescriptor {
    pub fn new(asset_url: impl Into<String>, scale: f32, floating: bool) -> Self {
        Self {
            asset_url: asset_url.into(),
            scale,
            floating,
        }
    }

    pub fn presentation(&self) -> Presentation {
        if self.floating {
            Presentation::Floating
        } else {
            Presentation::Static
        }
    }
}

/// How a placed instance is presented by the render driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presentation {
    Static,
    /// Wrapped in the continuous idle float motion
    Floating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedInstance {
    pub descriptor: PlacementDescriptor,
    pub slot: Slot,
    pub presentation: Presentation,
}

/// Pairs `descriptors[i]` with `slots[i]` for every index both sides have.
///
/// Surplus descriptors are left out; an empty slot list places nothing.
pub fn compose(descriptors: &[PlacementDescriptor], slots: &[Slot]) -> Vec<PlacedInstance> {
    descriptors
        .iter()
        .zip(slots.iter())
        .map(|(descriptor, slot)| PlacedInstance {
            descriptor: descriptor.clone(),
            slot: *slot,
            presentation: descriptor.presentation(),
        })
        .collect()
}

/// Memoizing wrapper around [`compose`]
///
/// Recomposes only when the registry generation or the descriptor list differ
/// from the previous call.
#[derive(Debug, Default)]
pub struct Composer {
    cached: Option<CachedComposition>,
}

#[derive(Debug)]
struct CachedComposition {
    generation: u64,
    descriptors: Vec<PlacementDescriptor>,
    instances: Vec<PlacedInstance>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the composition for the given inputs and whether it was rebuilt
    pub fn compose(
        &mut self,
        descriptors: &[PlacementDescriptor],
        slots: &[Slot],
        generation: u64,
    ) -> (&[PlacedInstance], bool) {
        let stale = match &self.cached {
            Some(cached) => {
                cached.generation != generation || cached.descriptors.as_slice() != descriptors
            }
            None => true,
        };

        if stale {
            let instances = compose(descriptors, slots);
            log::trace!(
                "Recomposed {} placement(s) for registry generation {}",
                instances.len(),
                generation
            );
            self.cached = Some(CachedComposition {
                generation,
                descriptors: descriptors.to_vec(),
                instances,
            });
        }

        let instances = self
            .cached
            .as_ref()
            .map(|cached| cached.instances.as_slice())
            .unwrap_or(&[]);
        (instances, stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> Vec<PlacementDescriptor> {
        vec![
            PlacementDescriptor::new("A", 0.3, true),
            PlacementDescriptor::new("B", 2.0, false),
        ]
    }

    #[test]
    fn test_empty_slots_place_nothing() {
        assert!(compose(&descriptors(), &[]).is_empty());
    }

    #[test]
    fn test_pairs_by_index() {
        let slots = [Slot::new(0.0, 0.0, 0.0), Slot::new(5.0, 1.0, 0.0)];
        let placed = compose(&descriptors(), &slots);

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].descriptor.asset_url, "A");
        assert_eq!(placed[0].slot, slots[0]);
        assert_eq!(placed[0].presentation, Presentation::Floating);
        assert_eq!(placed[1].descriptor.asset_url, "B");
        assert_eq!(placed[1].slot, slots[1]);
        assert_eq!(placed[1].presentation, Presentation::Static);
    }

    #[test]
    fn test_count_is_min_of_inputs() {
        let slots: Vec<Slot> = (0..5).map(|i| Slot::new(i as f32, 0.0, 0.0)).collect();
        for slot_count in 0..5 {
            for descriptor_count in 0..3 {
                let placed = compose(&descriptors()[..descriptor_count], &slots[..slot_count]);
                assert_eq!(placed.len(), slot_count.min(descriptor_count));
            }
        }
    }

    #[test]
    fn test_compose_is_pure() {
        let slots = [Slot::new(1.0, 2.0, 3.0)];
        assert_eq!(compose(&descriptors(), &slots), compose(&descriptors(), &slots));
    }

    #[test]
    fn test_composer_memoizes_until_inputs_change() {
        let mut composer = Composer::new();
        let slots = [Slot::new(0.0, 0.0, 0.0)];

        let (placed, rebuilt) = composer.compose(&descriptors(), &slots, 1);
        assert_eq!(placed.len(), 1);
        assert!(rebuilt);

        let (_, rebuilt) = composer.compose(&descriptors(), &slots, 1);
        assert!(!rebuilt);

        let (_, rebuilt) = composer.compose(&descriptors(), &slots, 2);
        assert!(rebuilt);

        let (placed, rebuilt) = composer.compose(&descriptors()[..0], &slots, 2);
        assert!(rebuilt);
        assert!(placed.is_empty());
    }

    #[test]
    fn test_descriptor_defaults_from_toml() {
        let descriptor: PlacementDescriptor = toml::from_str(r#"url = "helmet.gltf""#).unwrap();
        assert_eq!(descriptor.scale, 1.0);
        assert!(!descriptor.floating);
    }
}
