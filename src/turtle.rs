//! Turtle state and operations for plant interpretation.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// The placement of the plant turtle's pen.
///
/// A single homogeneous transform holding rotation and translation only. Every command
/// is composed on the right, so rotations and moves are expressed in the turtle's local
/// frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    pub transform: Mat4,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
        }
    }
}

impl TurtleState {
    /// Current world-space position of the pen.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// The turtle's growth direction (local Y axis) in world space.
    pub fn up(&self) -> Vec3 {
        self.transform.y_axis.truncate()
    }

    /// Moves `distance` along the local Y axis.
    pub fn advance(&mut self, distance: f32) {
        self.transform *= Mat4::from_translation(Vec3::Y * distance);
    }

    /// Rotates around the local X axis by `angle` radians.
    pub fn rotate_local_x(&mut self, angle: f32) {
        self.transform *= Mat4::from_rotation_x(angle);
    }

    /// Rotates around the local Y axis by `angle` radians.
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.transform *= Mat4::from_rotation_y(angle);
    }

    /// Rotates around the local Z axis by `angle` radians.
    pub fn rotate_local_z(&mut self, angle: f32) {
        self.transform *= Mat4::from_rotation_z(angle);
    }
}

/// Operations that can be performed by the plant turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    /// Emit a branch segment, then advance one step (`F`).
    Segment,
    /// Emit a flower without moving (`Y`).
    Flower,
    /// Emit a leaf, then advance a shortened step (`L`).
    Leaf,
    /// Rotate around local X by `sign * angle` (`1`/`2`).
    RotateX(f32),
    /// Rotate around local Z by `sign * angle` (`3`/`4`).
    RotateZ(f32),
    /// Rotate around local Y by `sign * angle` (`5`/`6`).
    RotateY(f32),
    /// Save the transform onto the stack (`[`).
    Push,
    /// Restore the most recently pushed transform (`]`).
    Pop,
    /// No-op: symbol has no registered meaning.
    Ignore,
}
