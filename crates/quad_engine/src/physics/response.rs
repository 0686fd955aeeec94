//! Default collision response
//!
//! Axis-aligned positional correction only: the moving entity is pushed out
//! of the overlap along the axis of smaller penetration and stops on that
//! axis. There is no mass, impulse or angular response.

use crate::foundation::math::Rect;
use crate::world::Entity;

/// Push `entity` out of `overlap`, away from `other`
///
/// With `w` and `h` the overlap width and height: when `w < h` and the
/// entity moves horizontally it is shifted by `w` away from the other
/// entity's position and its x velocity is zeroed; the y axis is handled
/// symmetrically. An entity not moving along the smaller axis is left alone.
pub fn resolve_penetration(entity: &mut Entity, overlap: &Rect, other: &Entity) {
    let w = overlap.width();
    let h = overlap.height();
    let mut position = entity.position();
    let mut velocity = entity.velocity();
    let away = position - other.position();

    if w > 0.0 && velocity.x != 0.0 && w < h {
        position.x += if away.x < 0.0 { -w } else { w };
        velocity.x = 0.0;
    } else if h > 0.0 && velocity.y != 0.0 && h < w {
        position.y += if away.y < 0.0 { -h } else { h };
        velocity.y = 0.0;
    }

    entity.set_position(position);
    entity.set_velocity(velocity);
}
