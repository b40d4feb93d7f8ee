//! Visitor state.
//!
//! Pure data: position, velocity, capsule, intent flags and the owning container. The
//! integrator and resolver operate on it; rendering mirrors `position` every frame.

use crate::{
    collision::{Capsule, Iso, Point3, Vec3},
    constants::MAIN_CONTAINER,
};

/// The container the visitor currently belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    Main,
    /// Exhibit entered through the region with this name.
    Exhibit { region: String },
}

impl Owner {
    #[inline]
    pub fn is_main(&self) -> bool {
        matches!(self, Self::Main)
    }
}

/// Horizontal movement intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    /// Set the flag bound to `key`. Unknown keys are ignored and return false.
    pub fn press(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    /// Clear the flag bound to `key`. Unknown keys are ignored and return false.
    pub fn release(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: &str, pressed: bool) -> bool {
        let flag = match key {
            "w" | "W" | "ArrowUp" => &mut self.forward,
            "s" | "S" | "ArrowDown" => &mut self.back,
            "a" | "A" | "ArrowLeft" => &mut self.left,
            "d" | "D" | "ArrowRight" => &mut self.right,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

#[derive(Clone, Debug)]
pub struct Visitor {
    /// Origin in the owning container's space.
    pub position: Point3,
    pub velocity: Vec3,
    pub capsule: Capsule,
    pub input: MoveInput,
    pub on_ground: bool,
    /// Navigable region under the visitor after the latest sub-step, if any.
    pub current_floor: Option<String>,
    /// Floor name last committed by the transition detector.
    pub last_floor_name: String,
    pub owner: Owner,
}

impl Visitor {
    pub fn new(capsule: Capsule, position: Point3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            capsule,
            input: MoveInput::default(),
            on_ground: true,
            current_floor: None,
            last_floor_name: MAIN_CONTAINER.to_owned(),
            owner: Owner::Main,
        }
    }

    /// Hand the visitor to another container.
    ///
    /// The position is re-expressed through world space so the visitor does not jump:
    /// `from` and `to` map each container's space to world space.
    pub fn reparent(&mut self, owner: Owner, from: &Iso, to: &Iso) {
        let world = from * self.position;
        self.position = to.inverse() * world;
        self.velocity = to.inverse_transform_vector(&(from * self.velocity));
        self.owner = owner;
    }

    /// Teleport to `position` (container space) and stop.
    pub fn teleport(&mut self, position: Point3) {
        self.position = position;
        self.velocity = Vec3::zeros();
        self.on_ground = false;
    }

    /// Lowest point of the capsule along Y, in container space.
    pub fn lowest_point(&self) -> f32 {
        let start = self.position.y + self.capsule.segment_start().y;
        let end = self.position.y + self.capsule.segment_end().y;
        start.min(end) - self.capsule.radius()
    }
}
