//! The full pipeline: rewrite, interpret, merge.

use crate::alphabet::Derivation;
use crate::config::FloraConfig;
use crate::error::Result;
use crate::grammar::PlantGrammar;
use crate::instance::InstanceSummary;
use crate::instancer::merge;
use crate::interpreter::{InterpreterConfig, PlantInterpreter};
use crate::mesh::{MergedBuffers, MeshLibrary};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Output of one generation pass. Ownership passes entirely to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flora {
    /// The final derivation string.
    pub derivation: String,
    pub summary: InstanceSummary,
    pub buffers: MergedBuffers,
}

/// Turns a [`FloraConfig`] into merged plant geometry.
///
/// The generator only holds the read-only base meshes and interpreter tuning. Derivation,
/// turtle stack and instance list live inside each [`generate`](Self::generate) call.
pub struct FloraGenerator {
    library: MeshLibrary,
    interpreter: InterpreterConfig,
}

impl FloraGenerator {
    pub fn new(library: MeshLibrary) -> Self {
        Self {
            library,
            interpreter: InterpreterConfig::default(),
        }
    }

    /// Overrides step lengths and stack limits. The angle is always taken from the
    /// [`FloraConfig`] passed to [`generate`](Self::generate).
    pub fn with_interpreter_config(mut self, config: InterpreterConfig) -> Self {
        self.interpreter = config;
        self
    }

    pub fn library(&self) -> &MeshLibrary {
        &self.library
    }

    /// Runs one generation pass, drawing every random value from `rng`.
    ///
    /// Any structural error aborts the pass; nothing partial is returned.
    #[instrument(skip_all, fields(axiom = %config.axiom, iterations = config.iterations))]
    pub fn generate<R: Rng + ?Sized>(&self, config: &FloraConfig, rng: &mut R) -> Result<Flora> {
        config.validate()?;

        let axiom = Derivation::parse(&config.axiom)?;
        let derivation =
            PlantGrammar::new(config.max_iterations).rewrite(axiom, config.iterations, rng)?;

        let mut interpreter = PlantInterpreter::new(InterpreterConfig {
            angle_degrees: config.angle,
            ..self.interpreter.clone()
        });
        interpreter.populate_standard_symbols(derivation.alphabet().table());
        let interpretation = interpreter.interpret(derivation.state())?;

        let summary = InstanceSummary::from_instances(&interpretation.instances);
        debug!(
            branches = summary.branches,
            flowers = summary.flowers,
            leaves = summary.leaves,
            "instances emitted"
        );

        let buffers = merge(
            &interpretation.instances,
            &self.library,
            &config.sizes,
            rng,
        )?;

        Ok(Flora {
            derivation: derivation.to_string(),
            summary,
            buffers,
        })
    }

    /// Like [`generate`](Self::generate) with a PCG stream seeded from `seed`.
    pub fn generate_seeded(&self, config: &FloraConfig, seed: u64) -> Result<Flora> {
        let mut rng = Pcg64::seed_from_u64(seed);
        self.generate(config, &mut rng)
    }
}
