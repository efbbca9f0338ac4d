//! Level: map description, entities and collision routing
//!
//! A level owns the physics world and everything living in it. Static
//! geometry, items and enemies are built from a [`LevelMap`]; each gets an
//! [`EntityId`] registered as its body's listener so that collisions come
//! back through [`CollisionRouter`] to the right [`Entity`].

use ledge_audio::AudioService;
use ledge_core::{EntityId, EntityTag, HandleMap};
use ledge_gamestate::{Checkpoint, CheckpointSet};
use ledge_input::InputService;
use ledge_math::{Rect, Vec2};
use ledge_physics::{
    BodyControl, BodyHandle, BodyKind, ColliderCategory, CollisionListener, Contact, PhysicsConfig,
    PhysicsError, PhysicsWorld,
};
use ledge_player::{CollisionResponse, FrameContext, PlayerConfig, PlayerController, PlayerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("Failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Map parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid map: {0}")]
    Invalid(String),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

pub type Result<T> = std::result::Result<T, LevelError>;

/// Map size and player spawn as seen by the rest of the game
pub trait MapProvider {
    fn map_size_in_pixels(&self) -> (i32, i32);

    /// Spawn given by the map, if any
    fn player_spawn_position(&self) -> Option<Vec2>;
}

/// A round item or hazard placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    /// Center in pixels
    pub position: Vec2,
    pub radius: i32,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            radius: 8,
        }
    }
}

/// Level layout
///
/// Platform rectangles are given by their top-left corner and size.
///
/// ```toml
/// width = 3200
/// height = 960
/// spawn = { x = 100.0, y = 500.0 }
///
/// [[platforms]]
/// x = 0
/// y = 600
/// w = 800
/// h = 32
///
/// [[items]]
/// position = { x = 300.0, y = 580.0 }
///
/// [[checkpoints]]
/// id = "bridge"
/// position = { x = 700.0, y = 560.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelMap {
    pub width: i32,
    pub height: i32,
    pub spawn: Option<Vec2>,
    pub platforms: Vec<Rect>,
    pub one_way_platforms: Vec<Rect>,
    pub items: Vec<Marker>,
    pub enemies: Vec<Marker>,
    pub checkpoints: Vec<Checkpoint>,
}

impl Default for LevelMap {
    fn default() -> Self {
        Self {
            width: 3200,
            height: 960,
            spawn: None,
            platforms: Vec::new(),
            one_way_platforms: Vec::new(),
            items: Vec::new(),
            enemies: Vec::new(),
            checkpoints: Vec::new(),
        }
    }
}

impl LevelMap {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let map: Self = toml::from_str(content)?;
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load a map, logging and falling back to an empty default on failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(map) => {
                log::info!(
                    "Loaded map {} ({}x{}, {} platforms, {} items)",
                    path.display(),
                    map.width,
                    map.height,
                    map.platforms.len() + map.one_way_platforms.len(),
                    map.items.len()
                );
                map
            }
            Err(e) => {
                log::warn!("{}; using an empty map", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(LevelError::Invalid(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(rect) = self
            .platforms
            .iter()
            .chain(&self.one_way_platforms)
            .find(|r| r.is_empty())
        {
            return Err(LevelError::Invalid(format!("empty platform {:?}", rect)));
        }
        if let Some(marker) = self.items.iter().chain(&self.enemies).find(|m| m.radius <= 0) {
            return Err(LevelError::Invalid(format!(
                "marker at ({}, {}) needs a positive radius",
                marker.position.x, marker.position.y
            )));
        }
        Ok(())
    }
}

impl MapProvider for LevelMap {
    fn map_size_in_pixels(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn player_spawn_position(&self) -> Option<Vec2> {
        self.spawn
    }
}

/// Everything that can own a body in a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Player,
    Item { body: BodyHandle },
    Platform { body: BodyHandle, one_way: bool },
    Enemy { body: BodyHandle },
}

impl Entity {
    /// Body owned by the entity; the player's lives in its controller
    pub fn body(&self) -> Option<BodyHandle> {
        match *self {
            Entity::Player => None,
            Entity::Item { body } | Entity::Platform { body, .. } | Entity::Enemy { body } => {
                Some(body)
            }
        }
    }
}

/// Delivers each contact to the entity it is addressed to
///
/// Runs inside the world step. The first controller error is kept and the
/// rest of the step's events are still routed; items the player collects are
/// queued for removal once the step is over.
pub struct CollisionRouter<'a> {
    pub entities: &'a HandleMap<Entity, EntityTag>,
    pub player: &'a mut PlayerController,
    pub audio: &'a mut dyn AudioService,
    pub despawn: &'a mut Vec<EntityId>,
    pub error: &'a mut Option<PlayerError>,
}

impl CollisionListener for CollisionRouter<'_> {
    fn on_collision_begin(&mut self, bodies: &mut dyn BodyControl, contact: &Contact) {
        match self.entities.get(contact.owner) {
            Some(Entity::Player) => {
                match self
                    .player
                    .on_collision_begin(bodies, &mut *self.audio, contact)
                {
                    Ok(CollisionResponse::Collect(item)) => self.despawn.push(item),
                    Ok(CollisionResponse::None) => {}
                    Err(e) => {
                        if self.error.is_none() {
                            *self.error = Some(e);
                        }
                    }
                }
            }
            Some(Entity::Item { .. }) => {
                log::trace!("Item {} touched by {}", contact.owner, contact.other_category);
            }
            Some(Entity::Enemy { .. }) => {
                log::trace!("Enemy {} touched {}", contact.owner, contact.other_category);
            }
            Some(Entity::Platform { .. }) => {}
            None => {
                log::warn!("Collision addressed to unknown entity {}", contact.owner);
            }
        }
    }

    fn on_collision_end(&mut self, _bodies: &mut dyn BodyControl, contact: &Contact) {
        if let Some(Entity::Player) = self.entities.get(contact.owner) {
            self.player.on_collision_end(contact);
        }
    }
}

/// A running level
pub struct Level {
    map: LevelMap,
    world: PhysicsWorld,
    entities: HandleMap<Entity, EntityTag>,
    checkpoints: CheckpointSet,
    player: PlayerController,
    collected: usize,
}

impl Level {
    /// Build the world from `map` and spawn the player
    pub fn new(
        map: LevelMap,
        mut player_config: PlayerConfig,
        physics: PhysicsConfig,
        audio: &mut dyn AudioService,
    ) -> Result<Self> {
        if let Some(spawn) = map.player_spawn_position() {
            player_config.position = spawn;
        }

        let mut entities = HandleMap::new();
        let player_id = entities.insert(Entity::Player);

        let mut level = Self {
            checkpoints: map.checkpoints.iter().cloned().collect(),
            world: PhysicsWorld::new(physics),
            player: PlayerController::new(player_id, player_config),
            entities,
            map,
            collected: 0,
        };
        level.build()?;
        level.player.start(&mut level.world, audio)?;
        Ok(level)
    }

    fn build(&mut self) -> Result<()> {
        for rect in &self.map.platforms {
            let body = Self::spawn_platform(&mut self.world, *rect, ColliderCategory::Platform)?;
            self.entities.insert(Entity::Platform { body, one_way: false });
        }
        for rect in &self.map.one_way_platforms {
            let body =
                Self::spawn_platform(&mut self.world, *rect, ColliderCategory::PlatformOneWay)?;
            self.entities.insert(Entity::Platform { body, one_way: true });
        }

        for marker in &self.map.items {
            let body = self.world.create_circle_sensor(
                marker.position.x as i32,
                marker.position.y as i32,
                marker.radius,
                BodyKind::Static,
            );
            self.world.set_category(body, ColliderCategory::Item)?;
            let id = self.entities.insert(Entity::Item { body });
            self.world.set_listener(body, id)?;
        }

        for marker in &self.map.enemies {
            let body = self.world.create_circle(
                marker.position.x as i32,
                marker.position.y as i32,
                marker.radius,
                BodyKind::Static,
            );
            self.world.set_category(body, ColliderCategory::Enemy)?;
            let id = self.entities.insert(Entity::Enemy { body });
            self.world.set_listener(body, id)?;
        }

        log::info!(
            "Level built: {} entities, {} bodies, {} checkpoints",
            self.entities.len(),
            self.world.body_count(),
            self.checkpoints.count()
        );
        Ok(())
    }

    fn spawn_platform(
        world: &mut PhysicsWorld,
        rect: Rect,
        category: ColliderCategory,
    ) -> Result<BodyHandle> {
        let center = rect.center();
        let body = world.create_rectangle(
            center.x as i32,
            center.y as i32,
            rect.w,
            rect.h,
            BodyKind::Static,
        );
        world.set_category(body, category)?;
        Ok(body)
    }

    /// Destroy every body and rebuild the level from its map
    ///
    /// The player controller survives with fresh state and a new body.
    pub fn reload(&mut self, audio: &mut dyn AudioService) -> Result<()> {
        self.player.clean_up(&mut self.world);

        let stale: Vec<(EntityId, Option<BodyHandle>)> = self
            .entities
            .iter()
            .filter(|(_, e)| **e != Entity::Player)
            .map(|(id, e)| (id, e.body()))
            .collect();
        for (id, body) in stale {
            if let Some(body) = body {
                self.world.remove_body(body);
            }
            self.entities.remove(id);
        }

        self.checkpoints = self.map.checkpoints.iter().cloned().collect();
        self.collected = 0;
        self.player.reset();
        self.build()?;
        self.player.start(&mut self.world, audio)?;
        log::info!("Level reloaded");
        Ok(())
    }

    // ==================== Frame ====================

    /// Run the player controller for one frame
    pub fn update(
        &mut self,
        input: &dyn InputService,
        audio: &mut dyn AudioService,
        dt: f32,
    ) -> Result<()> {
        let mut ctx = FrameContext {
            bodies: &mut self.world,
            input,
            audio,
            checkpoints: &mut self.checkpoints,
            map_size: self.map.map_size_in_pixels(),
            dt,
        };
        self.player.update(&mut ctx)?;
        Ok(())
    }

    /// Advance physics by `dt` milliseconds, routing collisions, then remove
    /// collected items
    pub fn step(&mut self, audio: &mut dyn AudioService, dt: f32) -> Result<()> {
        let mut despawn = Vec::new();
        let mut error = None;

        let mut router = CollisionRouter {
            entities: &self.entities,
            player: &mut self.player,
            audio,
            despawn: &mut despawn,
            error: &mut error,
        };
        self.world.step(dt / 1000.0, &mut router);

        if let Some(e) = error {
            return Err(e.into());
        }
        for id in despawn {
            self.despawn(id);
        }
        Ok(())
    }

    /// Sync the player with its body after the step
    pub fn post_update(&mut self, dt: f32) -> Result<()> {
        self.player
            .post_update(&self.world, dt, self.map.map_size_in_pixels())?;
        Ok(())
    }

    fn despawn(&mut self, id: EntityId) {
        let Some(entity) = self.entities.remove(id) else {
            return;
        };
        if let Some(body) = entity.body() {
            self.world.remove_body(body);
        }
        if let Entity::Item { .. } = entity {
            self.collected += 1;
            log::info!("Item {} collected ({} so far)", id, self.collected);
        }
    }

    pub fn clean_up(&mut self) {
        self.player.clean_up(&mut self.world);
    }

    // ==================== Accessors ====================

    pub fn map(&self) -> &LevelMap {
        &self.map
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn checkpoints(&self) -> &CheckpointSet {
        &self.checkpoints
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Items still on the map
    pub fn item_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Item { .. }))
            .count()
    }

    pub fn items_collected(&self) -> usize {
        self.collected
    }
}

impl MapProvider for Level {
    fn map_size_in_pixels(&self) -> (i32, i32) {
        self.map.map_size_in_pixels()
    }

    fn player_spawn_position(&self) -> Option<Vec2> {
        self.map.player_spawn_position()
    }
}
