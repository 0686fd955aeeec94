//! Behaviours and layout of the sandbox scene

use std::cell::Cell;
use std::rc::Rc;

use quad_engine::foundation::math::utils;
use quad_engine::physics::response;
use quad_engine::prelude::*;
use rand::Rng;

// Scene configuration
const WALL_THICKNESS: f32 = 20.0;
const BALL_COUNT: usize = 24;
const BALL_RADIUS: (f32, f32) = (6.0, 12.0);
const BALL_SPEED: f32 = 3.0;
const TURRET_TURN_RATE: f32 = 3.0; // Degrees per tick
const FIRE_INTERVAL: u64 = 20; // Ticks between shots
const SHOT_SPEED: f32 = 8.0;
const SHOT_RADIUS: f32 = 2.0;

/// Counters shared between behaviours and the app
#[derive(Debug, Default)]
pub struct SceneCounters {
    pub zone_entries: Cell<u64>,
    pub shots_fired: Cell<u64>,
    pub shots_hit: Cell<u64>,
}

impl SceneCounters {
    fn bump(counter: &Cell<u64>) {
        counter.set(counter.get() + 1);
    }
}

/// Ball that bounces instead of stopping
struct Bouncer;

impl Behavior for Bouncer {
    fn on_collision(&mut self, entity: &mut Entity, contact: &Contact, other: &Entity, _commands: &mut Commands<'_>) {
        let before = entity.velocity();
        response::resolve_penetration(entity, &contact.overlap, other);

        let mut after = entity.velocity();
        if after.x == 0.0 && before.x != 0.0 {
            after.x = -before.x;
        }
        if after.y == 0.0 && before.y != 0.0 {
            after.y = -before.y;
        }
        entity.set_velocity(after);
    }
}

/// Trigger area that counts balls passing through it
struct Zone {
    counters: Rc<SceneCounters>,
}

impl Behavior for Zone {
    fn on_trigger(&mut self, entity: &mut Entity, _contact: &Contact, other: &Entity, commands: &mut Commands<'_>) {
        SceneCounters::bump(&self.counters.zone_entries);
        log::trace!("{} touched {} on tick {}", other.name(), entity.name(), commands.frame());
    }
}

/// Rotating turret firing short-lived shots
struct Turret {
    cooldown: Cooldown,
    shot_bounds: Rect,
    counters: Rc<SceneCounters>,
}

impl Behavior for Turret {
    fn fixed_update(&mut self, entity: &mut Entity, commands: &mut Commands<'_>) {
        entity.rotate(TURRET_TURN_RATE);

        if self.cooldown.try_fire(commands.frame()) {
            let muzzle = entity.position() + entity.forward() * (WALL_THICKNESS + SHOT_RADIUS);
            let mut shot = Entity::new("shot")
                .with_position(muzzle)
                .with_angle(entity.angle())
                .with_existence_bounds(self.shot_bounds)
                .with_collider(ColliderShape::circle(SHOT_RADIUS), Vec2::zeros());
            shot.set_velocity_forward(SHOT_SPEED);

            commands.spawn(shot, Shot { counters: Rc::clone(&self.counters) });
            SceneCounters::bump(&self.counters.shots_fired);
        }
    }
}

/// Projectile removed on its first hit
struct Shot {
    counters: Rc<SceneCounters>,
}

impl Behavior for Shot {
    fn on_collision(&mut self, entity: &mut Entity, _contact: &Contact, other: &Entity, commands: &mut Commands<'_>) {
        if commands.despawn(entity.id()) {
            SceneCounters::bump(&self.counters.shots_hit);
            log::debug!("Shot hit {} on tick {}", other.name(), commands.frame());
        }
    }
}

/// Region where a ball fits between the walls, if any
fn ball_area(bounds: Rect) -> Option<Rect> {
    let margin = Vec2::repeat(WALL_THICKNESS + BALL_RADIUS.1);
    let area = Rect::new(bounds.min + margin, bounds.max - margin);
    (!area.is_degenerate()).then_some(area)
}

fn spawn_balls(registry: &mut Registry, area: Rect, rng: &mut impl Rng) {
    for i in 0..BALL_COUNT {
        let radius = rng.gen_range(BALL_RADIUS.0..BALL_RADIUS.1);
        let position = Vec2::new(
            rng.gen_range(area.min.x..area.max.x),
            rng.gen_range(area.min.y..area.max.y),
        );
        let heading = utils::deg_to_rad(rng.gen_range(0.0..360.0));
        let velocity = Vec2::new(heading.cos(), heading.sin()) * BALL_SPEED;

        registry.spawn(
            Entity::new(format!("ball-{i}"))
                .with_position(position)
                .with_velocity(velocity)
                .with_collider(ColliderShape::circle(radius), Vec2::zeros()),
            Bouncer,
        );
    }
}

/// Populate the registry with walls, balls, a trigger zone and a turret
pub fn populate(registry: &mut Registry, bounds: Rect, counters: &Rc<SceneCounters>) {
    let mut rng = rand::thread_rng();
    let center = bounds.center();
    let size = Vec2::new(bounds.width(), bounds.height());

    // Walls
    let walls = [
        (Vec2::new(center.x, bounds.min.y), ColliderShape::rectangle(size.x, WALL_THICKNESS)),
        (Vec2::new(center.x, bounds.max.y), ColliderShape::rectangle(size.x, WALL_THICKNESS)),
        (Vec2::new(bounds.min.x, center.y), ColliderShape::rectangle(WALL_THICKNESS, size.y)),
        (Vec2::new(bounds.max.x, center.y), ColliderShape::rectangle(WALL_THICKNESS, size.y)),
    ];
    for (position, shape) in walls {
        registry.spawn(
            Entity::new("wall").as_static().with_position(position).with_collider(shape, Vec2::zeros()),
            Inert,
        );
    }

    // Balls
    match ball_area(bounds) {
        Some(area) => spawn_balls(registry, area, &mut rng),
        None => log::warn!("World {:?} is too small for balls, skipping them", bounds),
    }

    // Trigger zone in the upper left part of the arena
    registry.spawn(
        Entity::new("zone")
            .as_static()
            .as_trigger()
            .with_position(bounds.min + size * 0.25)
            .with_collider(ColliderShape::rectangle(size.x * 0.2, size.y * 0.2), Vec2::zeros()),
        Zone { counters: Rc::clone(counters) },
    );

    // Turret in the lower right part, not collidable itself
    registry.spawn(
        Entity::new("turret")
            .with_role(CollisionRole::empty())
            .with_position(bounds.min + size * 0.75),
        Turret {
            cooldown: Cooldown::new(FIRE_INTERVAL),
            shot_bounds: bounds,
            counters: Rc::clone(counters),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_world_skips_balls() {
        let bounds = Rect::from_origin_size(0.0, 0.0, 50.0, 400.0);
        let mut registry = Registry::new(bounds, Default::default());

        populate(&mut registry, bounds, &Rc::new(SceneCounters::default()));

        // Four walls, the zone and the turret
        assert!(ball_area(bounds).is_none());
        assert_eq!(registry.pending_entity_count(), 6);
    }

    #[test]
    fn test_default_world_gets_every_ball() {
        let bounds = Rect::from_origin_size(0.0, 0.0, 800.0, 600.0);
        let mut registry = Registry::new(bounds, Default::default());

        populate(&mut registry, bounds, &Rc::new(SceneCounters::default()));

        assert_eq!(registry.pending_entity_count(), 6 + BALL_COUNT);
    }
}
