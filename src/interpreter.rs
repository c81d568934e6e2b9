//! Interpreter that converts a derived symbol sequence into [`GeometryInstance`] records.
//!
//! The entry point is [`PlantInterpreter`]. Configure it with an [`InterpreterConfig`],
//! register symbol-to-operation mappings via [`PlantInterpreter::set_op`] or
//! [`PlantInterpreter::populate_standard_symbols`], then call
//! [`PlantInterpreter::interpret`] with a [`symbios::SymbiosState`].

use crate::error::{FloraError, Result};
use crate::instance::{GeometryInstance, MeshClass};
use crate::turtle::{TurtleOp, TurtleState};
use serde::{Deserialize, Serialize};
use symbios::{SymbiosState, SymbolTable};
use tracing::{debug, instrument, trace, warn};

/// Configuration for plant interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Rotation applied by each of `1`..`6`, in degrees.
    pub angle_degrees: f32,
    /// Distance advanced by `F`.
    pub step_length: f32,
    /// Fraction of `step_length` advanced by `L`.
    pub leaf_step_factor: f32,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            angle_degrees: 22.5,
            step_length: 1.0,
            leaf_step_factor: 0.9,
            max_stack_depth: 1024,
        }
    }
}

/// Result of one interpretation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interpretation {
    /// Emitted instances, in emission order.
    pub instances: Vec<GeometryInstance>,
    /// Stack depth when the derivation ended. Zero for a balanced derivation.
    pub final_depth: usize,
}

/// Walks a derivation with a matrix turtle and records where geometry goes.
pub struct PlantInterpreter {
    op_map: Vec<TurtleOp>,
    config: InterpreterConfig,
}

impl PlantInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    ///
    /// Register operations with [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols) before calling
    /// [`interpret`](Self::interpret).
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            op_map: Vec::new(),
            config,
        }
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// Any ID that falls outside `map` is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol ID, growing the map with
    /// [`TurtleOp::Ignore`] as needed.
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Registers the plant alphabet (`F Y L 1-6 [ ]`) found in `interner`.
    ///
    /// Symbols missing from the interner are skipped.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        let mappings = [
            ("F", TurtleOp::Segment),
            ("Y", TurtleOp::Flower),
            ("L", TurtleOp::Leaf),
            ("1", TurtleOp::RotateX(1.0)),
            ("2", TurtleOp::RotateX(-1.0)),
            ("3", TurtleOp::RotateZ(1.0)),
            ("4", TurtleOp::RotateZ(-1.0)),
            ("5", TurtleOp::RotateY(1.0)),
            ("6", TurtleOp::RotateY(-1.0)),
            ("[", TurtleOp::Push),
            ("]", TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            if let Some(id) = interner.resolve_id(sym) {
                self.set_op(id, op);
            }
        }
    }

    /// Interprets every symbol of `state` in order.
    ///
    /// The turtle starts at the identity transform with an empty stack. `F` and `L` record
    /// their instance at the transform held *before* they move; `Y` never moves. Each
    /// record holds its own copy of the transform.
    ///
    /// # Errors
    ///
    /// [`FloraError::StackUnderflow`] on a `]` with nothing to restore, and
    /// [`FloraError::StackOverflow`] on a `[` beyond `max_stack_depth`.
    #[instrument(skip_all, fields(len = state.len()))]
    pub fn interpret(&self, state: &SymbiosState) -> Result<Interpretation> {
        let angle = self.config.angle_degrees.to_radians();
        let step = self.config.step_length;
        let leaf_step = step * self.config.leaf_step_factor;

        let mut turtle = TurtleState::default();
        let mut stack: Vec<TurtleState> = Vec::new();
        let mut instances = Vec::new();

        for i in 0..state.len() {
            let view = match state.get_view(i) {
                Some(v) => v,
                None => break,
            };

            let op = self
                .op_map
                .get(view.sym as usize)
                .unwrap_or(&TurtleOp::Ignore);

            match op {
                TurtleOp::Segment => {
                    instances.push(GeometryInstance::new(MeshClass::Branch, turtle.transform));
                    turtle.advance(step);
                }
                TurtleOp::Flower => {
                    instances.push(GeometryInstance::new(MeshClass::Flower, turtle.transform));
                }
                TurtleOp::Leaf => {
                    instances.push(GeometryInstance::new(MeshClass::Leaf, turtle.transform));
                    turtle.advance(leaf_step);
                }
                TurtleOp::RotateX(s) => turtle.rotate_local_x(angle * s),
                TurtleOp::RotateZ(s) => turtle.rotate_local_z(angle * s),
                TurtleOp::RotateY(s) => turtle.rotate_local_y(angle * s),
                TurtleOp::Push => {
                    if stack.len() >= self.config.max_stack_depth {
                        return Err(FloraError::StackOverflow {
                            position: i,
                            max_depth: self.config.max_stack_depth,
                        });
                    }
                    stack.push(turtle);
                    trace!(position = i, depth = stack.len(), "push");
                }
                TurtleOp::Pop => {
                    turtle = stack
                        .pop()
                        .ok_or(FloraError::StackUnderflow { position: i })?;
                    trace!(position = i, depth = stack.len(), "pop");
                }
                TurtleOp::Ignore => {}
            }
        }

        if !stack.is_empty() {
            warn!(depth = stack.len(), "derivation ended with unclosed branches");
        }
        debug!(instances = instances.len(), "interpretation complete");

        Ok(Interpretation {
            instances,
            final_depth: stack.len(),
        })
    }
}
