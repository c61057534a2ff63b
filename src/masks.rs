//! Dense n-dimensional bit masks over a grid shape.

use bit_set::BitSet;

use crate::cells::Coordinate;

/// One bit per cell of an n-dimensional shape, stored row-major with the
/// first index iterating fastest. Reads outside the shape answer `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMaskNd {
    shape: Vec<usize>,
    mask: BitSet,
}

impl BinaryMaskNd {
    pub fn new(shape: &[usize]) -> BinaryMaskNd {
        debug_assert!(!shape.is_empty() && shape.iter().all(|&side| side > 0));
        let size = shape.iter().product();
        BinaryMaskNd {
            shape: shape.to_vec(),
            mask: BitSet::with_capacity(size),
        }
    }

    /// Is the coordinate inside the mask's shape?
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.dimension_count() == self.shape.len() &&
        coord.axis_values()
            .iter()
            .zip(&self.shape)
            .all(|(&v, &side)| v >= 0 && (v as usize) < side)
    }

    fn bit_index(&self, coord: &Coordinate) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let mut index = 0;
        let mut stride = 1;
        for (&v, &side) in coord.axis_values().iter().zip(&self.shape) {
            index += stride * v as usize;
            stride *= side;
        }
        Some(index)
    }

    pub fn is_set(&self, coord: &Coordinate) -> bool {
        self.bit_index(coord).map_or(false, |i| self.mask.contains(i))
    }

    pub fn set(&mut self, coord: &Coordinate) {
        let index = self.bit_index(coord);
        debug_assert!(index.is_some(), "cannot set a bit outside the mask");
        if let Some(i) = index {
            self.mask.insert(i);
        }
    }

    pub fn unset(&mut self, coord: &Coordinate) {
        if let Some(i) = self.bit_index(coord) {
            self.mask.remove(i);
        }
    }

    pub fn clear(&mut self) {
        self.mask.clear();
    }

    pub fn set_count(&self) -> usize {
        self.mask.len()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn set_and_unset() {
        let mut m = BinaryMaskNd::new(&[3, 2]);
        let c = Coordinate::new(&[2, 1]);
        assert!(!m.is_set(&c));
        m.set(&c);
        assert!(m.is_set(&c));
        assert_eq!(m.set_count(), 1);
        m.unset(&c);
        assert!(!m.is_set(&c));
        assert_eq!(m.set_count(), 0);
    }

    #[test]
    fn reads_outside_the_shape_are_false() {
        let mut m = BinaryMaskNd::new(&[2, 2]);
        for c in &[Coordinate::new(&[-1, 0]),
                   Coordinate::new(&[0, 2]),
                   Coordinate::new(&[2, 0])] {
            assert!(!m.contains(c));
            assert!(!m.is_set(c));
        }
        m.set(&Coordinate::new(&[1, 1]));
        assert!(!m.is_set(&Coordinate::new(&[1, -1])));
    }

    #[test]
    fn clearing_forgets_everything() {
        let mut m = BinaryMaskNd::new(&[2, 2, 2]);
        m.set(&Coordinate::new(&[0, 1, 0]));
        m.set(&Coordinate::new(&[1, 1, 1]));
        assert_eq!(m.set_count(), 2);
        m.clear();
        assert_eq!(m.set_count(), 0);
    }
}
