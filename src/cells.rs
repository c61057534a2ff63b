//! Value types addressing cells and faces of an n-dimensional maze.
//!
//! A maze with `d` dimensions gives each cell `2 * d` faces. A face is named
//! by the cell's `Coordinate` plus the `Direction` from the cell centre to
//! the face centre, so the same physical wall can be reached from either of
//! the two cells it separates (see `Face::mirror`).

use std::borrow::Cow;
use std::fmt;

use lazy_static::lazy_static;
use smallvec::SmallVec;

pub const DIMENSION_NAMES: [&str; 4] = ["x", "y", "z", "w"];

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum Sign {
    Negative,
    Positive,
}

impl Sign {
    #[inline]
    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }

    #[inline]
    pub fn to_int(self) -> i32 {
        if self.is_positive() { 1 } else { -1 }
    }

    #[inline]
    pub fn invert(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Positive => Sign::Negative,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if self.is_positive() { "+" } else { "-" })
    }
}

/// A signed unit step along one axis.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Direction {
    dimension: usize,
    sign: Sign,
}

impl Direction {
    pub fn new(dimension: usize, sign: Sign) -> Direction {
        Direction { dimension, sign }
    }

    pub fn negative(dimension: usize) -> Direction {
        Direction::new(dimension, Sign::Negative)
    }

    pub fn positive(dimension: usize) -> Direction {
        Direction::new(dimension, Sign::Positive)
    }

    #[inline]
    pub fn dimension(self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn sign(self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.sign.is_positive()
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.sign.is_negative()
    }

    #[inline]
    pub fn invert(self) -> Direction {
        Direction::new(self.dimension, self.sign.invert())
    }

    /// Position of this direction in the canonical ordering returned by
    /// `all_directions` for any dimensionality covering it.
    #[inline]
    pub fn to_index(self) -> usize {
        self.dimension * 2 + if self.is_positive() { 1 } else { 0 }
    }

    /// Inverse of `to_index`.
    #[inline]
    pub fn from_index(index: usize) -> Direction {
        let sign = if index % 2 == 0 { Sign::Negative } else { Sign::Positive };
        Direction::new(index / 2, sign)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.dimension < DIMENSION_NAMES.len() {
            write!(f, "{}{}", self.sign, DIMENSION_NAMES[self.dimension])
        } else {
            write!(f, "{}{}", self.sign, self.dimension)
        }
    }
}

const HIGHEST_CACHED_DIMENSIONS: usize = 4;

lazy_static! {
    // Growth steps ask for the same direction table once per frontier cell,
    // so the low dimensionalities are built once and shared.
    static ref DIRECTION_TABLES: Vec<Vec<Direction>> = (0..=HIGHEST_CACHED_DIMENSIONS)
        .map(compute_all_directions)
        .collect();
}

fn compute_all_directions(dimensions: usize) -> Vec<Direction> {
    (0..dimensions)
        .flat_map(|d| vec![Direction::negative(d), Direction::positive(d)])
        .collect()
}

/// The `2 * dimensions` directions in canonical order:
/// `(dim 0 -, dim 0 +, dim 1 -, dim 1 +, ...)`.
pub fn all_directions(dimensions: usize) -> Cow<'static, [Direction]> {
    if dimensions <= HIGHEST_CACHED_DIMENSIONS {
        Cow::Borrowed(&DIRECTION_TABLES[dimensions][..])
    } else {
        Cow::Owned(compute_all_directions(dimensions))
    }
}

pub type AxisValuesSmallVec = SmallVec<[i32; 4]>;

/// An n-dimensional integer point with structural equality and hashing.
///
/// Offsetting never checks bounds: coordinates outside a grid are legal
/// transient values used when probing the boundary, and only `WallGrid`
/// decides what is inside.
#[derive(Hash, Eq, PartialEq, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    axis_values: AxisValuesSmallVec,
}

impl Coordinate {
    pub fn new(axis_values: &[i32]) -> Coordinate {
        debug_assert!(!axis_values.is_empty(), "a coordinate needs at least one axis");
        Coordinate { axis_values: AxisValuesSmallVec::from_slice(axis_values) }
    }

    pub fn origin(dimensions: usize) -> Coordinate {
        debug_assert!(dimensions > 0);
        Coordinate { axis_values: (0..dimensions).map(|_| 0).collect() }
    }

    #[inline]
    pub fn dimension_count(&self) -> usize {
        self.axis_values.len()
    }

    #[inline]
    pub fn axis_value(&self, dimension: usize) -> i32 {
        self.axis_values[dimension]
    }

    #[inline]
    pub fn axis_values(&self) -> &[i32] {
        &self.axis_values
    }

    /// A new coordinate one step away in the given direction.
    pub fn offset(&self, direction: Direction) -> Coordinate {
        debug_assert!(direction.dimension() < self.dimension_count());
        let mut axis_values = self.axis_values.clone();
        axis_values[direction.dimension()] += direction.sign().to_int();
        Coordinate { axis_values }
    }
}

impl From<&[i32]> for Coordinate {
    fn from(axis_values: &[i32]) -> Coordinate {
        Coordinate::new(axis_values)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.axis_values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

/// One face of one cell: the cell plus the direction from the cell centre
/// towards the face centre.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct Face {
    coordinate: Coordinate,
    side: Direction,
}

impl Face {
    pub fn new(coordinate: Coordinate, side: Direction) -> Face {
        Face { coordinate, side }
    }

    #[inline]
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    #[inline]
    pub fn side(&self) -> Direction {
        self.side
    }

    /// The same physical wall, addressed from the neighbouring cell.
    pub fn mirror(&self) -> Face {
        Face::new(self.coordinate.offset(self.side), self.side.invert())
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.coordinate, self.side)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn canonical_direction_order() {
        let dirs = all_directions(2);
        assert_eq!(&*dirs,
                   &[Direction::negative(0),
                     Direction::positive(0),
                     Direction::negative(1),
                     Direction::positive(1)]);
        assert_eq!(all_directions(3).len(), 6);
        assert_eq!(all_directions(7).len(), 14);
    }

    #[test]
    fn direction_index_bijection() {
        for d in 1..6 {
            for (index, dir) in all_directions(d).iter().enumerate() {
                assert_eq!(dir.to_index(), index);
                assert_eq!(Direction::from_index(index), *dir);
            }
        }
    }

    #[test]
    fn inverting_directions() {
        let left = Direction::negative(0);
        assert_eq!(left.invert(), Direction::positive(0));
        assert_eq!(left.invert().invert(), left);
        assert_eq!(Sign::Positive.to_int(), 1);
        assert_eq!(Sign::Negative.to_int(), -1);
    }

    #[test]
    fn offsetting_coordinates() {
        let c = Coordinate::new(&[1, 2, 3]);
        assert_eq!(c.offset(Direction::positive(1)), Coordinate::new(&[1, 3, 3]));
        assert_eq!(c.offset(Direction::negative(0)), Coordinate::new(&[0, 2, 3]));

        // out of range values are legal, bounds are a grid concern
        let o = Coordinate::origin(2);
        assert_eq!(o.offset(Direction::negative(1)), Coordinate::new(&[0, -1]));
    }

    #[test]
    fn mirror_faces_address_the_same_wall() {
        let face = Face::new(Coordinate::new(&[1, 1]), Direction::positive(0));
        let mirror = face.mirror();
        assert_eq!(mirror.coordinate(), &Coordinate::new(&[2, 1]));
        assert_eq!(mirror.side(), Direction::negative(0));
        assert_eq!(mirror.mirror(), face);
    }

    #[test]
    fn value_type_display() {
        assert_eq!(Direction::negative(0).to_string(), "-x");
        assert_eq!(Direction::positive(2).to_string(), "+z");
        assert_eq!(Direction::positive(5).to_string(), "+5");
        assert_eq!(Coordinate::new(&[3, -1]).to_string(), "(3, -1)");
        assert_eq!(Face::new(Coordinate::origin(2), Direction::positive(1)).to_string(),
                   "(0, 0)+y");
    }
}
