//! Checkpoint system

use ledge_math::Vec2;
use serde::{Deserialize, Serialize};

/// A respawn point in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkpoint {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Spawn position in pixels
    pub position: Vec2,
    /// Whether this checkpoint has been activated; never read from documents
    #[serde(skip_deserializing)]
    pub activated: bool,
}

impl Checkpoint {
    /// Create a new checkpoint
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            position: Vec2::ZERO,
            activated: false,
        }
    }

    /// Set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set spawn position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Name for logs, falling back to the id
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Lookup and activation of checkpoints
///
/// Providers do not enforce exclusivity; the caller deactivates the previous
/// checkpoint before activating the next.
pub trait CheckpointProvider {
    /// Closest unactivated checkpoint within `radius` of `position`
    fn find_nearest(&self, position: Vec2, radius: f32) -> Option<Checkpoint>;

    /// Mark a checkpoint activated; false when the id is unknown
    fn activate(&mut self, id: &str) -> bool;

    /// Clear a checkpoint's activated flag; false when the id is unknown
    fn deactivate(&mut self, id: &str) -> bool;

    fn get(&self, id: &str) -> Option<&Checkpoint>;

    fn activated_count(&self) -> usize;
}

/// Checkpoints of one level, in registration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointSet {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checkpoint, replacing any with the same id
    ///
    /// Checkpoints always start inactive; only reaching one activates it.
    pub fn register(&mut self, mut checkpoint: Checkpoint) {
        checkpoint.activated = false;
        if let Some(existing) = self.get_mut(&checkpoint.id) {
            log::warn!("Checkpoint '{}' registered twice; replacing", checkpoint.id);
            *existing = checkpoint;
        } else {
            self.checkpoints.push(checkpoint);
        }
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Checkpoint> {
        self.checkpoints.iter_mut().find(|c| c.id == id)
    }

    /// First activated checkpoint
    pub fn current(&self) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.activated)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    pub fn count(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Reset all checkpoints
    pub fn reset_all(&mut self) {
        for checkpoint in &mut self.checkpoints {
            checkpoint.activated = false;
        }
    }
}

impl FromIterator<Checkpoint> for CheckpointSet {
    fn from_iter<I: IntoIterator<Item = Checkpoint>>(iter: I) -> Self {
        let mut set = Self::new();
        for checkpoint in iter {
            set.register(checkpoint);
        }
        set
    }
}

impl CheckpointProvider for CheckpointSet {
    fn find_nearest(&self, position: Vec2, radius: f32) -> Option<Checkpoint> {
        let radius_sq = radius * radius;
        self.checkpoints
            .iter()
            .filter(|c| !c.activated)
            .map(|c| (c, c.position.distance_squared(position)))
            .filter(|(_, d)| *d <= radius_sq)
            // Earlier registration wins ties
            .fold(None, |best: Option<(&Checkpoint, f32)>, (c, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((c, d)),
            })
            .map(|(c, _)| c.clone())
    }

    fn activate(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(checkpoint) => {
                checkpoint.activated = true;
                true
            }
            None => false,
        }
    }

    fn deactivate(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(checkpoint) => {
                checkpoint.activated = false;
                true
            }
            None => false,
        }
    }

    fn get(&self, id: &str) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.id == id)
    }

    fn activated_count(&self) -> usize {
        self.checkpoints.iter().filter(|c| c.activated).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CheckpointSet {
        [
            Checkpoint::new("start").with_position(Vec2::new(100.0, 500.0)),
            Checkpoint::new("bridge")
                .with_name("Old Bridge")
                .with_position(Vec2::new(600.0, 480.0)),
            Checkpoint::new("cave").with_position(Vec2::new(640.0, 480.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_checkpoint() {
        let checkpoint = Checkpoint::new("cp1")
            .with_name("Forest Entrance")
            .with_position(Vec2::new(10.0, 20.0));

        assert_eq!(checkpoint.id, "cp1");
        assert_eq!(checkpoint.label(), "Forest Entrance");
        assert!(!checkpoint.activated);
        assert_eq!(Checkpoint::new("x").label(), "x");
    }

    #[test]
    fn test_find_nearest_within_radius() {
        let set = sample();
        let found = set.find_nearest(Vec2::new(630.0, 470.0), 50.0).unwrap();
        assert_eq!(found.id, "cave");

        assert!(set.find_nearest(Vec2::new(300.0, 300.0), 50.0).is_none());
    }

    #[test]
    fn test_find_nearest_skips_activated() {
        let mut set = sample();
        assert!(set.activate("cave"));
        let found = set.find_nearest(Vec2::new(630.0, 470.0), 50.0).unwrap();
        assert_eq!(found.id, "bridge");
        assert_eq!(set.activated_count(), 1);
    }

    #[test]
    fn test_radius_is_inclusive() {
        let set = sample();
        assert!(set.find_nearest(Vec2::new(100.0, 540.0), 40.0).is_some());
        assert!(set.find_nearest(Vec2::new(100.0, 541.0), 40.0).is_none());
    }

    #[test]
    fn test_activate_unknown() {
        let mut set = sample();
        assert!(!set.activate("nowhere"));
        assert!(!set.deactivate("nowhere"));
        assert_eq!(set.activated_count(), 0);
    }

    #[test]
    fn test_register_replaces_duplicate() {
        let mut set = sample();
        set.register(Checkpoint::new("start").with_position(Vec2::new(1.0, 1.0)));
        assert_eq!(set.count(), 3);
        assert_eq!(set.get("start").unwrap().position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_reset() {
        let mut set = sample();
        set.activate("start");
        set.activate("bridge");
        assert_eq!(set.activated_count(), 2);
        assert_eq!(set.current().map(|c| c.id.as_str()), Some("start"));

        set.reset_all();
        assert_eq!(set.activated_count(), 0);
        assert!(set.current().is_none());
    }

    #[test]
    fn test_deserialize_list() {
        #[derive(Deserialize)]
        struct Doc {
            checkpoints: CheckpointSet,
        }
        let doc: Doc = toml::from_str(
            r#"
            [[checkpoints]]
            id = "start"
            position = { x = 100.0, y = 500.0 }

            [[checkpoints]]
            id = "cave"
            name = "Cave Mouth"
            position = { x = 640.0, y = 480.0 }
            "#,
        )
        .unwrap();
        assert_eq!(doc.checkpoints.count(), 2);
        assert_eq!(doc.checkpoints.get("cave").unwrap().label(), "Cave Mouth");
    }

    #[test]
    fn test_documents_cannot_preactivate() {
        let cave: Checkpoint = toml::from_str(
            r#"
            id = "cave"
            activated = true
            "#,
        )
        .unwrap();
        assert!(!cave.activated);

        let mut preset = Checkpoint::new("bridge");
        preset.activated = true;
        let set: CheckpointSet = [preset].into_iter().collect();
        assert_eq!(set.activated_count(), 0);
        assert!(set.current().is_none());
    }
}
