//! Collision events and listener dispatch

use crate::body::{BodyControl, BodyHandle};
use crate::layers::ColliderCategory;
use ledge_core::EntityId;

/// Whether a contact started or ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Begin,
    End,
}

/// One side of a collision, addressed to the listener that owns `body`
///
/// The world delivers every rapier collision twice, once per body, each time
/// from that body's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    /// Body receiving this event
    pub body: BodyHandle,
    pub category: ColliderCategory,
    /// Listener registered for `body`
    pub owner: EntityId,
    /// Body on the other side of the contact
    pub other: BodyHandle,
    pub other_category: ColliderCategory,
    /// Listener registered for `other`, if any
    pub other_owner: Option<EntityId>,
    /// Either collider is a sensor
    pub is_sensor: bool,
}

impl Contact {
    pub fn is_begin(&self) -> bool {
        self.kind == ContactKind::Begin
    }

    pub fn is_end(&self) -> bool {
        self.kind == ContactKind::End
    }
}

/// Receiver of collision events during a world step
///
/// Called synchronously from inside [`crate::PhysicsWorld::step`], after the
/// substep that produced the event. `bodies` is the stepping world itself, so
/// a listener can adjust velocities in response to the contact.
pub trait CollisionListener {
    fn on_collision_begin(&mut self, bodies: &mut dyn BodyControl, contact: &Contact);

    fn on_collision_end(&mut self, _bodies: &mut dyn BodyControl, _contact: &Contact) {}
}

/// Listener that ignores everything
impl CollisionListener for () {
    fn on_collision_begin(&mut self, _bodies: &mut dyn BodyControl, _contact: &Contact) {}
}

/// Listener that records contacts for later inspection
#[derive(Debug, Default)]
pub struct EventCollector {
    pub contacts: Vec<Contact>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn started(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(|c| c.is_begin())
    }

    pub fn stopped(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(|c| c.is_end())
    }

    /// Contacts delivered to `owner`
    pub fn for_owner(&self, owner: EntityId) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(move |c| c.owner == owner)
    }
}

impl CollisionListener for EventCollector {
    fn on_collision_begin(&mut self, _bodies: &mut dyn BodyControl, contact: &Contact) {
        self.contacts.push(*contact);
    }

    fn on_collision_end(&mut self, _bodies: &mut dyn BodyControl, contact: &Contact) {
        self.contacts.push(*contact);
    }
}
