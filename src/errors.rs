//! Error and Result types for the whole crate, generated with `error_chain!`.
//!
//! Three families of recoverable failures exist: construction errors (bad
//! shapes, zero xorshift seeds, malformed selector mixtures), bounds errors
//! (writing to a face outside the grid or to a non-writable corner artifact)
//! and state errors (rewinding a generator past its first checkpoint,
//! asking for a solution before generation has finished). Internal invariant
//! violations are not represented here - they panic.

use error_chain::error_chain;

error_chain! {

    errors {
        EmptyShape {
            description("maze shape is empty")
            display("a maze must have at least one dimension")
        }
        ZeroSideLength(dimension: usize) {
            description("maze side length is zero")
            display("side length in dimension {} must be positive", dimension)
        }
        SingleCellMaze {
            description("maze has only one cell")
            display("a maze must have more than one cell")
        }
        ZeroSeed {
            description("zero random seed")
            display("xorshift generators cannot be seeded with zero")
        }
        EmptyMixture {
            description("mixture selector has no branches")
            display("a mixture selector needs at least one weighted branch")
        }
        InvalidWeight(weight: f64) {
            description("invalid mixture weight")
            display("mixture weights must be finite and positive, got {}", weight)
        }
        DimensionMismatch(expected: usize, actual: usize) {
            description("coordinate dimensionality mismatch")
            display("expected a {}-dimensional value, got {} dimensions", expected, actual)
        }
        UnwritableFace(face: String) {
            description("face is not writable")
            display("face {} is outside the grid or a corner artifact of the wall storage", face)
        }
        NotAnEdgeCell(coordinate: String) {
            description("cell is not on the maze boundary")
            display("cell {} is not contained in the maze boundary", coordinate)
        }
        HistoryIndexOutOfRange(index: usize, history_len: usize) {
            description("random generator history index out of range")
            display("history index {} is outside the recorded range 0..{}", index, history_len)
        }
        ReverseBeforeInitialCheckpoint {
            description("cannot reverse the generator from its initial state")
            display("the random generator is already at its first checkpoint")
        }
        SolutionUnavailable {
            description("solution requested for an unfinished maze")
            display("cannot show the solution of an unfinished maze")
        }
    }
}
