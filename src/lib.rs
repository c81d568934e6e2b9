//! # symbios-flora
//!
//! A procedural plant generator built on [Symbios](https://crates.io/crates/symbios) symbol
//! storage and `glam` matrices.
//!
//! Generation runs in three stages, each consuming the previous one's output:
//!
//! 1. [`PlantGrammar`] rewrites an axiom with stochastic productions into a [`Derivation`].
//! 2. [`PlantInterpreter`] walks the derivation with a matrix turtle and records a
//!    [`GeometryInstance`] for every branch, flower and leaf.
//! 3. [`merge`] places a copy of the matching [`BaseMesh`] at every instance and
//!    concatenates them into one indexed [`MergedBuffers`] mesh.
//!
//! [`FloraGenerator`] runs all three. Every random value comes from a caller-supplied
//! [`rand::Rng`], so a fixed seed reproduces the output exactly.

pub mod alphabet;
pub mod config;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod instance;
pub mod instancer;
pub mod interpreter;
pub mod mesh;
pub mod turtle;

#[cfg(test)]
mod test_support;

pub use alphabet::*;
pub use config::*;
pub use error::*;
pub use generator::*;
pub use grammar::*;
pub use instance::*;
pub use instancer::*;
pub use interpreter::*;
pub use mesh::*;
pub use turtle::*;
