//! Contact modification hooks

use crate::layers::ColliderCategory;
use rapier2d::prelude as rapier;

/// Angular tolerance, in radians, around the platform's up normal
const ONE_WAY_ALLOWED_ANGLE: f32 = 0.1;

/// Drops solver contacts on `PlatformOneWay` colliders unless the other body
/// touches from above, so bodies pass through from below and the sides.
pub(crate) struct OneWayPlatformHook;

impl rapier::PhysicsHooks for OneWayPlatformHook {
    fn modify_solver_contacts(&self, context: &mut rapier::ContactModificationContext) {
        let is_one_way = |handle: rapier::ColliderHandle| {
            context
                .colliders
                .get(handle)
                .map(|c| ColliderCategory::from_user_data(c.user_data) == ColliderCategory::PlatformOneWay)
                .unwrap_or(false)
        };
        let first = is_one_way(context.collider1);
        let second = is_one_way(context.collider2);

        // Y-down world: "up out of the platform" is -Y. The normal is
        // expressed from collider1 toward collider2.
        let allowed_local_n1 = if first {
            rapier::Vector::new(0.0, -1.0)
        } else if second {
            rapier::Vector::new(0.0, 1.0)
        } else {
            return;
        };

        context.update_as_oneway_platform(&allowed_local_n1, ONE_WAY_ALLOWED_ANGLE);
    }
}
