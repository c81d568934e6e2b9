//! Stochastic production rules and the parallel rewriting pass.
//!
//! Two symbols are rewritable:
//!
//! | Symbol | Replacement | Chosen when the draw is |
//! |---|---|---|
//! | `F` | `FF` | `> 0.2` |
//! | `F` | `F` | `<= 0.2` |
//! | `X` | [`DENSE_TEMPLATE`] | `> 0.1` |
//! | `X` | [`SPARSE_TEMPLATE`] | `<= 0.1` |
//!
//! Every other symbol is copied through unchanged.

use crate::alphabet::{Derivation, push_symbol};
use crate::error::{FloraError, Result};
use rand::Rng;
use symbios::SymbiosState;
use tracing::{debug, instrument, trace};

/// Apex expansion taken in the common case: a flowering twig, three `X`-bearing side
/// branches, a fourth one capped with a flower and a terminal leaf cluster.
pub const DENSE_TEMPLATE: &str = "[1FY][F11X]F[F22X]F[F33X]F[Y44X][3[Y4L[5L][6L]]]Y";

/// Apex expansion taken in the rare case: fewer flowers, a single leaf and a leafy twig.
pub const SPARSE_TEMPLATE: &str = "[1F][F11X]F[F22X]F[F33X]F[6L][F44X][3FL]";

/// Draws above this keep doubling a segment (`F` -> `FF`).
pub const SEGMENT_DOUBLING_THRESHOLD: f64 = 0.2;

/// Draws above this expand an apex into [`DENSE_TEMPLATE`].
pub const DENSE_APEX_THRESHOLD: f64 = 0.1;

/// Iteration ceiling used by [`PlantGrammar::default`].
pub const DEFAULT_MAX_ITERATIONS: u32 = 6;

/// The plant production rule set.
///
/// Derivation length grows exponentially with the iteration count, so the grammar refuses
/// to rewrite more than `max_iterations` times.
#[derive(Clone, Debug)]
pub struct PlantGrammar {
    max_iterations: u32,
}

impl Default for PlantGrammar {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Production right-hand sides resolved to symbol IDs of one alphabet.
struct ResolvedRules {
    segment: u16,
    apex: u16,
    dense: Vec<u16>,
    sparse: Vec<u16>,
}

impl ResolvedRules {
    fn resolve(derivation: &Derivation) -> Result<Self> {
        let alphabet = derivation.alphabet();
        let ids = |template: &str| -> Result<Vec<u16>> {
            template.chars().map(|c| alphabet.require(c)).collect()
        };
        Ok(Self {
            segment: alphabet.require('F')?,
            apex: alphabet.require('X')?,
            dense: ids(DENSE_TEMPLATE)?,
            sparse: ids(SPARSE_TEMPLATE)?,
        })
    }
}

impl PlantGrammar {
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }

    /// Rejects negative counts and counts above the configured ceiling.
    pub fn check_iterations(&self, iterations: i32) -> Result<u32> {
        u32::try_from(iterations)
            .ok()
            .filter(|&n| n <= self.max_iterations)
            .ok_or(FloraError::InvalidIterationCount {
                requested: i64::from(iterations),
                max: self.max_iterations,
            })
    }

    /// Rewrites `axiom` `iterations` times.
    ///
    /// Each pass scans the current derivation once, left to right, and appends the chosen
    /// replacement of every symbol to a fresh output. Replacements are never re-scanned in
    /// the same pass. With `iterations == 0` the axiom is returned untouched and no random
    /// values are drawn.
    #[instrument(skip_all, fields(iterations = iterations))]
    pub fn rewrite<R: Rng + ?Sized>(
        &self,
        axiom: Derivation,
        iterations: i32,
        rng: &mut R,
    ) -> Result<Derivation> {
        let passes = self.check_iterations(iterations)?;
        let mut current = axiom;
        if passes == 0 {
            return Ok(current);
        }

        let rules = ResolvedRules::resolve(&current)?;
        for pass in 0..passes {
            let next = self.rewrite_pass(&current, &rules, rng)?;
            current.replace_state(next);
            trace!(pass, len = current.len(), "rewrite pass complete");
        }

        debug!(len = current.len(), "derivation complete");
        Ok(current)
    }

    fn rewrite_pass<R: Rng + ?Sized>(
        &self,
        current: &Derivation,
        rules: &ResolvedRules,
        rng: &mut R,
    ) -> Result<SymbiosState> {
        let mut next = SymbiosState::new();
        for id in current.ids() {
            if id == rules.segment {
                let draw: f64 = rng.random();
                push_symbol(&mut next, id)?;
                if draw > SEGMENT_DOUBLING_THRESHOLD {
                    push_symbol(&mut next, id)?;
                }
            } else if id == rules.apex {
                let draw: f64 = rng.random();
                let template = if draw > DENSE_APEX_THRESHOLD {
                    &rules.dense
                } else {
                    &rules.sparse
                };
                for &sym in template {
                    push_symbol(&mut next, sym)?;
                }
            } else {
                push_symbol(&mut next, id)?;
            }
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ConstRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn rewrite(axiom: &str, iterations: i32, rng: &mut impl Rng) -> Result<String> {
        let d = Derivation::parse(axiom)?;
        Ok(PlantGrammar::default()
            .rewrite(d, iterations, rng)?
            .to_string())
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mut rng = ConstRng::high();
        assert_eq!(
            rewrite("[1X][2X]F?", 0, &mut rng).unwrap(),
            "[1X][2X]F?"
        );
    }

    #[test]
    fn high_draws_double_segments_and_pick_dense_apex() {
        let mut rng = ConstRng::high();
        assert_eq!(rewrite("F", 1, &mut rng).unwrap(), "FF");
        assert_eq!(rewrite("X", 1, &mut rng).unwrap(), DENSE_TEMPLATE);
        assert_eq!(rewrite("F", 3, &mut rng).unwrap(), "FFFFFFFF");
    }

    #[test]
    fn low_draws_keep_segments_and_pick_sparse_apex() {
        let mut rng = ConstRng::low();
        assert_eq!(rewrite("F", 4, &mut rng).unwrap(), "F");
        assert_eq!(rewrite("X", 1, &mut rng).unwrap(), SPARSE_TEMPLATE);
    }

    #[test]
    fn replacements_are_not_rescanned_within_a_pass() {
        // One pass over "X" must not expand the X symbols inside the template.
        let mut rng = ConstRng::high();
        let out = rewrite("X", 1, &mut rng).unwrap();
        assert_eq!(out.matches('X').count(), 4);
        assert_eq!(out.matches('F').count(), 7);
    }

    #[test]
    fn inert_symbols_pass_through() {
        let mut rng = ConstRng::high();
        assert_eq!(rewrite("a-Fb", 1, &mut rng).unwrap(), "a-FFb");
    }

    #[test]
    fn templates_are_balanced() {
        assert!(Derivation::parse(DENSE_TEMPLATE).unwrap().is_balanced());
        assert!(Derivation::parse(SPARSE_TEMPLATE).unwrap().is_balanced());
    }

    #[test]
    fn negative_iterations_are_rejected() {
        let mut rng = ConstRng::high();
        assert_eq!(
            rewrite("F", -1, &mut rng),
            Err(FloraError::InvalidIterationCount {
                requested: -1,
                max: DEFAULT_MAX_ITERATIONS
            })
        );
    }

    #[test]
    fn iterations_above_ceiling_are_rejected() {
        let mut rng = ConstRng::high();
        let grammar = PlantGrammar::new(2);
        let d = Derivation::parse("X").unwrap();
        assert!(matches!(
            grammar.rewrite(d, 3, &mut rng),
            Err(FloraError::InvalidIterationCount {
                requested: 3,
                max: 2
            })
        ));
    }

    #[test]
    fn same_seed_same_derivation() {
        let a = rewrite("[1X][2X][3X][4X]", 3, &mut Pcg64::seed_from_u64(7)).unwrap();
        let b = rewrite("[1X][2X][3X][4X]", 3, &mut Pcg64::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }
}
