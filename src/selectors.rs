//! Frontier cell selection strategies for the growing tree algorithm.
//!
//! The strategy decides which frontier cell each growth step works on, and
//! that single choice is what turns the growing tree family into the named
//! algorithms: always taking the last cell is the Recursive Backtracker
//! (long winding corridors), always taking a random cell is Prim's algorithm
//! (short branchy corridors), and a 50/50 blend of the two is the
//! conventional default.

use error_chain::bail;

use crate::errors::*;
use crate::random::ReversibleRandom;
use crate::units::Weight;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SelectionMode {
    Random,
    First,
    Last,
    Middle,
}

#[derive(PartialEq, Clone, Debug)]
pub enum Selector {
    ByPosition(SelectionMode),
    /// Draws one of the nested selectors with probability proportional to
    /// its weight, then delegates to it.
    Mixture(Vec<(Selector, Weight)>),
}

impl Default for Selector {
    fn default() -> Selector {
        Selector::blended(0.5)
    }
}

impl Selector {
    /// Always-last selection: the Recursive Backtracker.
    pub fn recursive_backtracker() -> Selector {
        Selector::ByPosition(SelectionMode::Last)
    }

    /// Always-random selection: Prim's algorithm.
    pub fn prim() -> Selector {
        Selector::ByPosition(SelectionMode::Random)
    }

    /// Random selection with probability `random_chance`, last otherwise.
    pub fn blended(random_chance: f64) -> Selector {
        Selector::Mixture(vec![(Selector::prim(), Weight(random_chance)),
                               (Selector::recursive_backtracker(), Weight(1.0 - random_chance))])
    }

    /// Checks mixtures recursively: at least one branch, all weights finite
    /// and non-negative, total weight positive.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Selector::ByPosition(_) => Ok(()),
            Selector::Mixture(ref branches) => {
                if branches.is_empty() {
                    bail!(ErrorKind::EmptyMixture);
                }
                let mut total = 0.0;
                for &(ref selector, Weight(weight)) in branches {
                    if !weight.is_finite() || weight < 0.0 {
                        bail!(ErrorKind::InvalidWeight(weight));
                    }
                    selector.validate()?;
                    total += weight;
                }
                if total <= 0.0 {
                    bail!(ErrorKind::InvalidWeight(total));
                }
                Ok(())
            }
        }
    }

    /// Index of the frontier cell to work on, for a frontier of `size`
    /// cells. Deterministic given the generator state, which is what makes
    /// reverse steps able to replay the choice.
    pub fn select(&self, size: usize, random: &mut ReversibleRandom) -> usize {
        debug_assert!(size > 0, "cannot select from an empty frontier");
        match *self {
            Selector::ByPosition(mode) => {
                match mode {
                    SelectionMode::Random => random.next_index(size),
                    SelectionMode::First => 0,
                    SelectionMode::Last => size - 1,
                    SelectionMode::Middle => size / 2,
                }
            }
            Selector::Mixture(ref branches) => {
                let total: f64 = branches.iter().map(|&(_, Weight(w))| w).sum();
                let draw = random.next_f64_below(total);
                let mut cumulative = 0.0;
                for &(ref selector, Weight(weight)) in branches {
                    cumulative += weight;
                    if draw < cumulative {
                        return selector.select(size, random);
                    }
                }
                // floating point accumulation can leave the draw at the very
                // top of the final band
                let &(ref last, _) = branches.last().expect("validated mixtures are non-empty");
                last.select(size, random)
            }
        }
    }
}
