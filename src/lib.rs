//! Reversible n-dimensional maze generation.
//!
//! Mazes are perfect (every pair of cells is joined by exactly one corridor
//! path) and generated by the growing tree algorithm, which subsumes the
//! Recursive Backtracker and Prim's algorithm as frontier selection
//! strategies. Generation is driven one step at a time and every step can be
//! undone exactly, including the random generator state, so a maze can be
//! watched growing forwards and backwards and replayed from any point.
//!
//! ```
//! use ndmazes::generators::GrowingTreeGenerator;
//! use ndmazes::selectors::Selector;
//!
//! let mut maze = GrowingTreeGenerator::new(&[8, 6], Selector::default(), 42)?;
//! maze.finish();
//! maze.show_solution()?;
//! assert!(maze.is_finished());
//! # Ok::<(), ndmazes::errors::Error>(())
//! ```

pub mod cells;
pub mod errors;
pub mod generators;
pub mod masks;
pub mod random;
pub mod selectors;
pub mod units;
pub mod walls;
