//! Registry integration tests
//!
//! Behaviours here record every hook invocation into a shared log so tests
//! can assert on phase order, visibility and callback pairing.


use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::math::Rect;
use crate::physics::collision_system::Contact;
use crate::physics::response;
use crate::spatial::QuadTreeConfig;
use crate::world::{Behavior, Commands, Entity, Registry};

/// One recorded hook invocation
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Event {
    Motion { name: String, frame: u64 },
    Update { name: String, frame: u64 },
    PostUpdate { name: String, frame: u64 },
    Collision { name: String, other: String, frame: u64 },
    Trigger { name: String, other: String, frame: u64 },
}

pub(super) type Log = Rc<RefCell<Vec<Event>>>;

pub(super) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Records every hook; optionally applies the default push-out
pub(super) struct Recorder {
    log: Log,
    respond: bool,
}

impl Recorder {
    pub(super) fn new(log: &Log) -> Self {
        Self { log: Rc::clone(log), respond: false }
    }

    pub(super) fn responding(log: &Log) -> Self {
        Self { log: Rc::clone(log), respond: true }
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl Behavior for Recorder {
    fn fixed_update(&mut self, entity: &mut Entity, commands: &mut Commands<'_>) {
        self.push(Event::Motion { name: entity.name().to_string(), frame: commands.frame() });
        entity.integrate();
    }

    fn update(&mut self, entity: &mut Entity, commands: &mut Commands<'_>) {
        self.push(Event::Update { name: entity.name().to_string(), frame: commands.frame() });
    }

    fn post_update(&mut self, entity: &mut Entity, commands: &mut Commands<'_>) {
        self.push(Event::PostUpdate { name: entity.name().to_string(), frame: commands.frame() });
    }

    fn on_collision(&mut self, entity: &mut Entity, contact: &Contact, other: &Entity, commands: &mut Commands<'_>) {
        self.push(Event::Collision {
            name: entity.name().to_string(),
            other: other.name().to_string(),
            frame: commands.frame(),
        });
        if self.respond {
            response::resolve_penetration(entity, &contact.overlap, other);
        }
    }

    fn on_trigger(&mut self, entity: &mut Entity, _contact: &Contact, other: &Entity, commands: &mut Commands<'_>) {
        self.push(Event::Trigger {
            name: entity.name().to_string(),
            other: other.name().to_string(),
            frame: commands.frame(),
        });
    }
}

pub(super) fn world() -> Registry {
    Registry::new(Rect::from_origin_size(0.0, 0.0, 400.0, 400.0), QuadTreeConfig::default())
}

/// Collision and trigger events of one frame, as (receiver, other) pairs
pub(super) fn hits(log: &Log, wanted_frame: u64) -> Vec<(String, String)> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Collision { name, other, frame } | Event::Trigger { name, other, frame }
                if *frame == wanted_frame =>
            {
                Some((name.clone(), other.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Names seen by one kind of phase hook in one frame
pub(super) fn visited(log: &Log, wanted_frame: u64, phase: fn(&Event) -> Option<(&str, u64)>) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(phase)
        .filter(|&(_, frame)| frame == wanted_frame)
        .map(|(name, _)| name.to_string())
        .collect()
}

pub(super) fn motion(event: &Event) -> Option<(&str, u64)> {
    match event {
        Event::Motion { name, frame } => Some((name.as_str(), *frame)),
        _ => None,
    }
}

pub(super) fn presentation(event: &Event) -> Option<(&str, u64)> {
    match event {
        Event::Update { name, frame } => Some((name.as_str(), *frame)),
        _ => None,
    }
}

pub(super) fn post_presentation(event: &Event) -> Option<(&str, u64)> {
    match event {
        Event::PostUpdate { name, frame } => Some((name.as_str(), *frame)),
        _ => None,
    }
}
