#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);

/// Relative likelihood of one branch of a mixture selector being chosen.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Weight(pub f64);
