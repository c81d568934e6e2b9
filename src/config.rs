//! User-facing generation settings.

use crate::error::{FloraError, Result};
use crate::grammar::DEFAULT_MAX_ITERATIONS;
use crate::mesh::SizeScales;
use serde::{Deserialize, Serialize};

/// Settings for one generation pass, as supplied by a settings UI or a config file.
///
/// Missing fields fall back to [`FloraConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloraConfig {
    /// Start string of the derivation.
    pub axiom: String,
    /// Number of rewriting passes.
    pub iterations: i32,
    /// Rotation angle of `1`..`6`, in degrees. The UI offers 0 to 90.
    pub angle: f32,
    /// Per-class size scalars.
    pub sizes: SizeScales,
    /// Highest accepted `iterations`.
    pub max_iterations: u32,
}

impl Default for FloraConfig {
    fn default() -> Self {
        Self {
            axiom: "[1X][2X][3X][4X]".to_string(),
            iterations: 1,
            angle: 22.5,
            sizes: SizeScales::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl FloraConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 0 || i64::from(self.iterations) > i64::from(self.max_iterations) {
            return Err(FloraError::InvalidIterationCount {
                requested: i64::from(self.iterations),
                max: self.max_iterations,
            });
        }
        if !self.angle.is_finite() {
            return Err(FloraError::InvalidConfig(format!(
                "angle must be finite, got {}",
                self.angle
            )));
        }
        self.sizes.validate()
    }
}
