//! # Stage
//!
//! Frame-driven state machine that turns loaded assets into scene objects.
//!
//! The base asset is requested first. Once it arrives its node collection is
//! scanned for slots, the registry receives the scan, and the composer pairs
//! the configured placements with the slots. Each placed model is requested
//! from the cache and added to the scene as soon as it is ready.
//!
//! ```text
//! Unloaded -> Loading(base) -> SlotsKnown(n) -> Composed(m)
//! ```
//!
//! A base asset that fails to load leaves the stage in `Loading` with an empty
//! registry, so nothing is ever placed.

use std::{path::Path, sync::Arc};

use cgmath::Matrix4;

use crate::{
    animation::{FloatMotion, FloatSettings, HeroSway, Motion},
    assets::{AssetCache, AssetRequest, LoadOutcome, LoadedAsset},
    composition::{
        Composer, PlacedInstance, PlacementDescriptor, PlacementRegistry, Presentation,
        SlotScanner,
    },
    config::{HeroConfig, ShowcaseConfig},
    gfx::scene::{Object, ObjectId, Scene},
};

/// Where the stage is in bringing up the showcase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Unloaded,
    /// Waiting for the base asset with this identifier
    Loading(String),
    /// The scan finished with this many slots
    SlotsKnown(usize),
    /// This many placements were composed
    Composed(usize),
}

impl Phase {
    pub fn label(&self) -> String {
        match self {
            Phase::Unloaded => "unloaded".to_string(),
            Phase::Loading(id) => format!("loading '{}'", id),
            Phase::SlotsKnown(count) => format!("{} slot(s) known", count),
            Phase::Composed(count) => format!("{} placement(s) composed", count),
        }
    }
}

/// One composed placement and the scene object it becomes
struct Placement {
    instance: PlacedInstance,
    request: Option<AssetRequest>,
    object: Option<ObjectId>,
    motion: Option<FloatMotion>,
}

impl Placement {
    fn base_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.instance.slot.position)
            * Matrix4::from_scale(self.instance.descriptor.scale)
    }
}

struct Hero {
    config: HeroConfig,
    request: Option<AssetRequest>,
    object: Option<ObjectId>,
    sway: HeroSway,
}

pub struct Stage {
    cache: AssetCache,
    base_url: String,
    descriptors: Vec<PlacementDescriptor>,
    float_settings: FloatSettings,

    phase: Phase,
    base_request: Option<AssetRequest>,
    base_object: Option<ObjectId>,
    registry: PlacementRegistry,
    composer: Composer,
    placements: Vec<Placement>,
    hero: Option<Hero>,
}

impl Stage {
    pub fn new(cache: AssetCache, config: &ShowcaseConfig) -> Self {
        let hero = config.hero.enabled.then(|| Hero {
            config: config.hero.clone(),
            request: None,
            object: None,
            sway: HeroSway::default(),
        });

        Self {
            cache,
            base_url: config.base.clone(),
            descriptors: config.placements.clone(),
            float_settings: config.float_motion,
            phase: Phase::Unloaded,
            base_request: None,
            base_object: None,
            registry: PlacementRegistry::new(),
            composer: Composer::new(),
            placements: Vec::new(),
            hero,
        }
    }

    /// Requests the base asset (and the hero model, if enabled)
    pub fn start(&mut self) {
        if self.phase != Phase::Unloaded {
            log::warn!("Stage already started ({})", self.phase.label());
            return;
        }

        self.base_request = Some(self.cache.request(&self.base_url));
        self.phase = Phase::Loading(self.base_url.clone());

        if let Some(hero) = self.hero.as_mut() {
            hero.request = Some(self.cache.request(&hero.config.url));
        }
    }

    /// Advances loading, scanning and composition, then animates the objects.
    ///
    /// `elapsed` is the time in seconds since the showcase started.
    pub fn update(&mut self, scene: &mut Scene, elapsed: f32) {
        self.sync_composition(scene);
        self.poll_placements(scene);
        self.poll_hero(scene);
        self.poll_base(scene);
        self.animate(scene, elapsed);
    }

    /// Replaces the placement list; the next update recomposes and removes
    /// the objects of the previous composition from the scene
    pub fn set_placements(&mut self, descriptors: Vec<PlacementDescriptor>) {
        self.descriptors = descriptors;
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.registry
    }

    pub fn descriptors(&self) -> &[PlacementDescriptor] {
        &self.descriptors
    }

    /// Current composition, in slot order
    pub fn instances(&self) -> impl Iterator<Item = &PlacedInstance> {
        self.placements.iter().map(|placement| &placement.instance)
    }

    /// Scene object of the placement at `index`, once its asset has arrived
    pub fn placement_object(&self, index: usize) -> Option<ObjectId> {
        self.placements.get(index).and_then(|placement| placement.object)
    }

    /// Number of placements whose models are in the scene
    pub fn placed_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|placement| placement.object.is_some())
            .count()
    }

    pub fn base_object(&self) -> Option<ObjectId> {
        self.base_object
    }

    pub fn hero_object(&self) -> Option<ObjectId> {
        self.hero.as_ref().and_then(|hero| hero.object)
    }

    /// Annotation text for the hero overlay, once the hero is in the scene
    pub fn hero_annotation(&self) -> Option<&str> {
        let hero = self.hero.as_ref()?;
        hero.object?;
        let text = hero.config.annotation.as_str();
        (!text.is_empty()).then_some(text)
    }

    fn poll_base(&mut self, scene: &mut Scene) {
        let Some(request) = self.base_request.as_mut() else {
            return;
        };
        let Some(outcome) = request.try_take() else {
            return;
        };
        self.base_request = None;

        match outcome {
            Ok(asset) => {
                self.base_object = Some(scene.add_object(Object::from_asset("base", &asset)));
                let mut scan = SlotScanner::start(&asset);
                self.registry.receive(&mut scan);
                self.phase = Phase::SlotsKnown(self.registry.len());
            }
            Err(err) => {
                log::error!(
                    "Base scene '{}' unavailable, nothing will be placed: {}",
                    self.base_url,
                    err
                );
            }
        }
    }

    fn sync_composition(&mut self, scene: &mut Scene) {
        // Nothing to compose before the first scan lands
        if self.registry.generation() == 0 {
            return;
        }

        let (instances, rebuilt) = self.composer.compose(
            &self.descriptors,
            self.registry.slots(),
            self.registry.generation(),
        );
        if !rebuilt {
            return;
        }
        let instances = instances.to_vec();

        for stale in self.placements.drain(..) {
            if let Some(object) = stale.object.and_then(|id| scene.remove_object(id)) {
                log::debug!("Removed superseded placement '{}'", object.name);
            }
        }

        log::info!(
            "Composed {} of {} placement(s) onto {} slot(s)",
            instances.len(),
            self.descriptors.len(),
            self.registry.len()
        );

        for instance in instances {
            let request = self.cache.request(&instance.descriptor.asset_url);
            let motion = match instance.presentation {
                Presentation::Floating => {
                    Some(FloatMotion::with_random_offset(self.float_settings))
                }
                Presentation::Static => None,
            };
            self.placements.push(Placement {
                instance,
                request: Some(request),
                object: None,
                motion,
            });
        }

        self.phase = Phase::Composed(self.placements.len());
    }

    fn poll_placements(&mut self, scene: &mut Scene) {
        for placement in &mut self.placements {
            let Some(outcome) = take_ready(&mut placement.request) else {
                continue;
            };
            match outcome {
                Ok(asset) => {
                    let name = display_name(&asset);
                    let mut object = Object::from_asset(name, &asset);
                    object.set_transform(placement.base_transform());
                    placement.object = Some(scene.add_object(object));
                }
                Err(err) => log::error!(
                    "Placement '{}' not shown: {}",
                    placement.instance.descriptor.asset_url,
                    err
                ),
            }
        }
    }

    fn poll_hero(&mut self, scene: &mut Scene) {
        let Some(hero) = self.hero.as_mut() else {
            return;
        };
        let Some(outcome) = take_ready(&mut hero.request) else {
            return;
        };

        match outcome {
            Ok(asset) => {
                let mut object = Object::from_asset(display_name(&asset), &asset);
                object.set_transform(Matrix4::from_scale(hero.config.scale));
                hero.object = Some(scene.add_object(object));
            }
            Err(err) => log::warn!("Hero model '{}' not shown: {}", hero.config.url, err),
        }
    }

    fn animate(&mut self, scene: &mut Scene, elapsed: f32) {
        for placement in &self.placements {
            let (Some(id), Some(motion)) = (placement.object, placement.motion.as_ref()) else {
                continue;
            };
            if let Some(object) = scene.get_object_mut(id) {
                // The float group sits at the origin and wraps the placed model
                object.set_transform(motion.sample(elapsed).matrix() * placement.base_transform());
            }
        }

        if let Some(hero) = self.hero.as_ref().filter(|hero| hero.config.sway) {
            if let Some(object) = hero.object.and_then(|id| scene.get_object_mut(id)) {
                object.set_transform(
                    hero.sway.sample(elapsed).matrix() * Matrix4::from_scale(hero.config.scale),
                );
            }
        }
    }
}

/// Takes a finished outcome out of an optional request, leaving `None` behind
fn take_ready(request: &mut Option<AssetRequest>) -> Option<LoadOutcome> {
    let outcome = request.as_mut()?.try_take()?;
    *request = None;
    Some(outcome)
}

/// Object name derived from the asset identifier's file stem
fn display_name(asset: &Arc<LoadedAsset>) -> String {
    Path::new(&asset.id)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(&asset.id)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;
    use crate::{
        assets::{AssetError, AssetProvider, LoadStrategy, NodeCollection, SceneNode},
        config::{CameraConfig, EnvironmentConfig},
        gfx::{camera::CameraManager, environment::Environment},
    };

    struct FakeProvider;

    impl AssetProvider for FakeProvider {
        fn load(&self, id: &str) -> Result<LoadedAsset, AssetError> {
            let nodes: NodeCollection = match id {
                "base.glb" => [
                    SceneNode::new("slotA", Vector3::new(0.0, 0.0, 0.0)),
                    SceneNode::new("mesh1", Vector3::new(9.0, 9.0, 9.0)),
                    SceneNode::new("slotB", Vector3::new(5.0, 1.0, 0.0)),
                ]
                .into_iter()
                .collect(),
                "empty.glb" | "A.glb" | "B.glb" | "watch.glb" => NodeCollection::new(),
                _ => return Err(AssetError::UnsupportedFormat(id.to_string())),
            };
            Ok(LoadedAsset {
                id: id.to_string(),
                nodes,
                meshes: Vec::new(),
            })
        }
    }

    fn config(base: &str, hero: bool) -> ShowcaseConfig {
        ShowcaseConfig {
            base: base.to_string(),
            placements: vec![
                PlacementDescriptor::new("A.glb", 0.3, true),
                PlacementDescriptor::new("B.glb", 2.0, false),
            ],
            hero: HeroConfig {
                enabled: hero,
                url: "watch.glb".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn stage(config: &ShowcaseConfig) -> Stage {
        let cache = AssetCache::with_strategy(Arc::new(FakeProvider), LoadStrategy::Inline);
        Stage::new(cache, config)
    }

    fn scene() -> Scene {
        Scene::new(
            CameraManager::from_config(&CameraConfig::default(), 1.0),
            Environment::from(EnvironmentConfig::default()),
        )
    }

    #[test]
    fn test_phase_transitions() {
        let mut stage = stage(&config("base.glb", false));
        let mut scene = scene();
        assert_eq!(stage.phase(), &Phase::Unloaded);

        stage.start();
        assert_eq!(stage.phase(), &Phase::Loading("base.glb".to_string()));

        stage.update(&mut scene, 0.0);
        assert_eq!(stage.phase(), &Phase::SlotsKnown(2));
        assert!(stage.base_object().is_some());

        stage.update(&mut scene, 0.1);
        assert_eq!(stage.phase(), &Phase::Composed(2));
        assert_eq!(stage.placed_count(), 2);
        assert_eq!(scene.get_object_count(), 3);
    }

    #[test]
    fn test_static_placement_transform() {
        let mut stage = stage(&config("base.glb", false));
        let mut scene = scene();
        stage.start();
        stage.update(&mut scene, 0.0);
        stage.update(&mut scene, 0.0);

        let id = stage.placement_object(1).unwrap();
        let object = scene.get_object(id).unwrap();
        assert_eq!(object.name, "B");
        assert_eq!(
            object.transform,
            Matrix4::from_translation(Vector3::new(5.0, 1.0, 0.0)) * Matrix4::from_scale(2.0)
        );
    }

    #[test]
    fn test_floating_placement_moves() {
        let mut stage = stage(&config("base.glb", false));
        let mut scene = scene();
        stage.start();
        stage.update(&mut scene, 0.0);
        stage.update(&mut scene, 0.0);

        let id = stage.placement_object(0).unwrap();
        let before = scene.get_object(id).unwrap().transform;
        stage.update(&mut scene, 3.0);
        let after = scene.get_object(id).unwrap().transform;
        assert_ne!(before, after);
    }

    #[test]
    fn test_no_slots_places_nothing() {
        let mut stage = stage(&config("empty.glb", false));
        let mut scene = scene();
        stage.start();
        stage.update(&mut scene, 0.0);
        stage.update(&mut scene, 0.0);

        assert_eq!(stage.phase(), &Phase::Composed(0));
        assert_eq!(stage.placed_count(), 0);
        assert_eq!(scene.get_object_count(), 1);
    }

    #[test]
    fn test_failed_base_stays_loading() {
        let mut stage = stage(&config("missing.bin", false));
        let mut scene = scene();
        stage.start();
        for frame in 0..3 {
            stage.update(&mut scene, frame as f32);
        }

        assert_eq!(stage.phase(), &Phase::Loading("missing.bin".to_string()));
        assert!(stage.registry().is_empty());
        assert_eq!(scene.get_object_count(), 0);
    }

    #[test]
    fn test_changed_placements_recompose() {
        let mut stage = stage(&config("base.glb", false));
        let mut scene = scene();
        stage.start();
        stage.update(&mut scene, 0.0);
        stage.update(&mut scene, 0.0);
        let first = stage.placement_object(0).unwrap();

        stage.set_placements(vec![PlacementDescriptor::new("B.glb", 1.0, false)]);
        stage.update(&mut scene, 0.0);

        assert_eq!(stage.phase(), &Phase::Composed(1));
        assert!(scene.get_object(first).is_none());
        assert_eq!(stage.placed_count(), 1);
        // Base plus the single new placement
        assert_eq!(scene.get_object_count(), 2);

        stage.set_placements(vec![PlacementDescriptor::new("B.glb", 1.0, true)]);
        stage.update(&mut scene, 0.0);
        assert_eq!(scene.get_object_count(), 2);
    }

    #[test]
    fn test_hero_annotation_after_load() {
        let mut stage = stage(&config("base.glb", true));
        let mut scene = scene();
        assert_eq!(stage.hero_annotation(), None);

        stage.start();
        stage.update(&mut scene, 0.0);
        assert!(stage.hero_object().is_some());
        assert_eq!(stage.hero_annotation(), Some("Hello :')"));
    }
}
