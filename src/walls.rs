//! Dense n-dimensional wall storage with halved per-cell bookkeeping.
//!
//! Each cell only records its negative-facing walls, one bit per dimension;
//! a positive-facing wall is delegated to the neighbouring cell one step up
//! that axis. The backing bit array therefore spans an internal shape one
//! larger than the maze shape in every dimension, the extra layer holding
//! the far positive boundary walls. Cells of that padding layer that sit on
//! two or more far edges are corner artifacts: they carry no wall state and
//! are never writable.

use bit_set::BitSet;
use error_chain::bail;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::cells::{Coordinate, Direction, Face};
use crate::errors::*;
use crate::units::CellsCount;

type IndicesSmallVec = SmallVec<[usize; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallGrid {
    shape: Vec<usize>,
    internal_shape: Vec<usize>,
    walls: BitSet,
}

impl WallGrid {
    /// Creates a grid whose bounding box is fully walled. With `all_walls`
    /// every internal wall is also present (the starting point for carving);
    /// without it only the outer box is walled.
    pub fn new(shape: &[usize], all_walls: bool) -> Result<WallGrid> {
        if shape.is_empty() {
            bail!(ErrorKind::EmptyShape);
        }
        for (dimension, &side) in shape.iter().enumerate() {
            if side == 0 {
                bail!(ErrorKind::ZeroSideLength(dimension));
            }
        }

        let internal_shape: Vec<usize> = shape.iter().map(|&side| side + 1).collect();
        let internal_size: usize = internal_shape.iter().product();
        let mut grid = WallGrid {
            shape: shape.to_vec(),
            internal_shape,
            walls: BitSet::with_capacity(internal_size * shape.len()),
        };
        grid.seed_walls(all_walls);
        Ok(grid)
    }

    fn seed_walls(&mut self, all_walls: bool) {
        self.walls.clear();
        let dims = self.shape.len();
        let index_space = self.internal_shape
            .iter()
            .map(|&side| 0..side)
            .multi_cartesian_product();

        for indices in index_space {
            let cell_base = self.flatten(&indices) * dims;
            let far_edges: IndicesSmallVec = (0..dims)
                .filter(|&d| indices[d] == self.internal_shape[d] - 1)
                .collect();

            if all_walls {
                match far_edges.len() {
                    // a cell strictly inside the padded box keeps all of its
                    // negative-facing walls
                    0 => {
                        for d in 0..dims {
                            self.walls.insert(cell_base + d);
                        }
                    }
                    // a padding cell on exactly one far edge holds the maze
                    // boundary wall parallel to that edge
                    1 => {
                        self.walls.insert(cell_base + far_edges[0]);
                    }
                    // corner artifacts hold no wall state
                    _ => {}
                }
            } else {
                for d in 0..dims {
                    if indices[d] == 0 || indices[d] == self.internal_shape[d] - 1 {
                        let on_other_far_edge = far_edges.iter().any(|&other| other != d);
                        if !on_other_far_edge {
                            self.walls.insert(cell_base + d);
                        }
                    }
                }
            }
        }
    }

    #[inline]
    pub fn dimension_count(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn side_length(&self, dimension: usize) -> usize {
        self.shape[dimension]
    }

    #[inline]
    pub fn size(&self) -> CellsCount {
        CellsCount(self.shape.iter().product())
    }

    pub fn contains_coordinate(&self, coord: &Coordinate) -> bool {
        coord.dimension_count() == self.dimension_count() &&
        coord.axis_values()
            .iter()
            .zip(&self.shape)
            .all(|(&v, &side)| v >= 0 && (v as usize) < side)
    }

    /// Is the coordinate inside the grid with at least one axis on the
    /// boundary?
    pub fn is_edge_cell(&self, coord: &Coordinate) -> bool {
        self.contains_coordinate(coord) &&
        coord.axis_values()
            .iter()
            .zip(&self.shape)
            .any(|(&v, &side)| v == 0 || v as usize == side - 1)
    }

    /// The face of an edge cell that points out of the bounding box, chosen
    /// deterministically: lowest boundary-touching dimension first, negative
    /// before positive.
    pub fn external_face(&self, edge_cell: &Coordinate) -> Result<Face> {
        if !self.contains_coordinate(edge_cell) {
            bail!(ErrorKind::NotAnEdgeCell(edge_cell.to_string()));
        }
        for (d, (&v, &side)) in edge_cell.axis_values().iter().zip(&self.shape).enumerate() {
            if v == 0 {
                return Ok(Face::new(edge_cell.clone(), Direction::negative(d)));
            }
            if v as usize == side - 1 {
                return Ok(Face::new(edge_cell.clone(), Direction::positive(d)));
            }
        }
        bail!(ErrorKind::NotAnEdgeCell(edge_cell.to_string()))
    }

    /// Never fails: a face whose storage lies outside the padded internal
    /// array is conceptually open space and reads as "no wall".
    pub fn has_wall(&self, face: &Face) -> bool {
        match self.face_indices(face) {
            Some(indices) => {
                let bit = self.flatten(&indices) * self.dimension_count() +
                          face.side().dimension();
                self.walls.contains(bit)
            }
            None => false,
        }
    }

    /// Can `set_wall` mutate this face?
    pub fn is_writable(&self, face: &Face) -> bool {
        face.coordinate().dimension_count() == self.dimension_count() &&
        self.face_indices(face)
            .map_or(false, |indices| self.indices_writable(&indices))
    }

    // Wall mutation is reserved for the generation engine: uncontrolled
    // external edits would break the spanning tree invariant it maintains.
    pub(crate) fn set_wall(&mut self, face: &Face, is_wall: bool) -> Result<()> {
        let dims = self.dimension_count();
        let actual = face.coordinate().dimension_count();
        if actual != dims {
            bail!(ErrorKind::DimensionMismatch(dims, actual));
        }
        let indices = match self.face_indices(face) {
            Some(indices) if self.indices_writable(&indices) => indices,
            _ => bail!(ErrorKind::UnwritableFace(face.to_string())),
        };
        let bit = self.flatten(&indices) * dims + face.side().dimension();
        if is_wall {
            self.walls.insert(bit);
        } else {
            self.walls.remove(bit);
        }
        Ok(())
    }

    pub(crate) fn add_wall(&mut self, face: &Face) -> Result<()> {
        self.set_wall(face, true)
    }

    pub(crate) fn remove_wall(&mut self, face: &Face) -> Result<()> {
        self.set_wall(face, false)
    }

    /// Discards all carving and reseeds the grid in place.
    pub(crate) fn reset(&mut self, all_walls: bool) {
        self.seed_walls(all_walls);
    }

    /// Internal array indices of the cell storing this face's wall bit, or
    /// None when the face falls outside the padded internal array.
    fn face_indices(&self, face: &Face) -> Option<IndicesSmallVec> {
        let coord = face.coordinate();
        let side = face.side();
        if coord.dimension_count() != self.dimension_count() {
            return None;
        }
        let mut indices = IndicesSmallVec::new();
        for (d, (&v, &side_len)) in coord.axis_values().iter().zip(&self.internal_shape).enumerate() {
            let v = if side.is_positive() && d == side.dimension() { v + 1 } else { v };
            if v < 0 || v as usize >= side_len {
                return None;
            }
            indices.push(v as usize);
        }
        Some(indices)
    }

    fn indices_writable(&self, indices: &[usize]) -> bool {
        indices
            .iter()
            .zip(&self.internal_shape)
            .filter(|&(&index, &side)| index == side - 1)
            .count() <= 1
    }

    fn flatten(&self, indices: &[usize]) -> usize {
        let mut index = 0;
        let mut stride = 1;
        for (&i, &side) in indices.iter().zip(&self.internal_shape) {
            index += stride * i;
            stride *= side;
        }
        index
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::all_directions;

    fn face(axis_values: &[i32], side: Direction) -> Face {
        Face::new(Coordinate::new(axis_values), side)
    }

    #[test]
    fn construction_validates_the_shape() {
        assert!(WallGrid::new(&[], true).is_err());
        assert!(WallGrid::new(&[3, 0], true).is_err());
        assert!(WallGrid::new(&[1], true).is_ok());
        assert!(WallGrid::new(&[4, 3, 2], true).is_ok());
    }

    #[test]
    fn fully_walled_grid_wall_count() {
        // a w*h grid with every wall present has h*(w+1) vertical and
        // w*(h+1) horizontal walls
        let g = WallGrid::new(&[2, 2], true).expect("valid shape");
        assert_eq!(g.walls.len(), 12);

        let g = WallGrid::new(&[4, 3], true).expect("valid shape");
        assert_eq!(g.walls.len(), 3 * 5 + 4 * 4);
    }

    #[test]
    fn bounding_box_only_wall_count() {
        let g = WallGrid::new(&[2, 2], false).expect("valid shape");
        assert_eq!(g.walls.len(), 8);

        let gc = |x, y| Coordinate::new(&[x, y]);
        assert!(g.has_wall(&face(&[0, 0], Direction::negative(0))));
        assert!(g.has_wall(&face(&[1, 1], Direction::positive(1))));
        assert!(!g.has_wall(&Face::new(gc(0, 0), Direction::positive(0))));
        assert!(!g.has_wall(&Face::new(gc(0, 0), Direction::positive(1))));
    }

    #[test]
    fn every_face_of_a_fresh_grid_is_walled() {
        let g = WallGrid::new(&[3, 3], true).expect("valid shape");
        for x in 0..3 {
            for y in 0..3 {
                for side in all_directions(2).iter() {
                    assert!(g.has_wall(&face(&[x, y], *side)));
                }
            }
        }
    }

    #[test]
    fn probing_outside_the_grid_finds_no_wall() {
        let g = WallGrid::new(&[2, 2], true).expect("valid shape");
        assert!(!g.has_wall(&face(&[-1, 0], Direction::negative(0))));
        assert!(!g.has_wall(&face(&[0, 3], Direction::positive(1))));
        // dimensionality mismatches are also conceptually outside
        assert!(!g.has_wall(&face(&[0, 0, 0], Direction::negative(0))));
    }

    #[test]
    fn mirror_faces_read_the_same_wall() {
        let mut g = WallGrid::new(&[3, 2], true).expect("valid shape");
        let shared = face(&[1, 1], Direction::positive(0));
        assert!(g.has_wall(&shared));
        assert!(g.has_wall(&shared.mirror()));

        g.remove_wall(&shared).expect("writable face");
        assert!(!g.has_wall(&shared));
        assert!(!g.has_wall(&shared.mirror()));

        g.add_wall(&shared.mirror()).expect("writable face");
        assert!(g.has_wall(&shared));
    }

    #[test]
    fn corner_artifacts_are_not_writable() {
        let mut g = WallGrid::new(&[2, 2], true).expect("valid shape");

        // the internal cell (2, 2) sits on two far edges
        let artifact = face(&[1, 2], Direction::positive(0));
        assert!(!g.is_writable(&artifact));
        assert!(g.set_wall(&artifact, true).is_err());

        // one far edge is fine: that is where boundary walls live
        let boundary = face(&[1, 1], Direction::positive(0));
        assert!(g.is_writable(&boundary));
        assert!(g.set_wall(&boundary, false).is_ok());

        // entirely outside the padded array
        assert!(g.set_wall(&face(&[5, 5], Direction::negative(0)), true).is_err());
    }

    #[test]
    fn reset_restores_the_seeded_state() {
        let mut g = WallGrid::new(&[3, 2], true).expect("valid shape");
        let pristine = g.clone();
        g.remove_wall(&face(&[0, 0], Direction::positive(0))).expect("writable face");
        g.remove_wall(&face(&[1, 1], Direction::negative(1))).expect("writable face");
        assert_ne!(g, pristine);
        g.reset(true);
        assert_eq!(g, pristine);
    }

    #[test]
    fn dimension_mismatch_is_a_bounds_error() {
        let mut g = WallGrid::new(&[2, 2], true).expect("valid shape");
        let wrong = face(&[0, 0, 0], Direction::negative(0));
        assert!(g.set_wall(&wrong, true).is_err());
    }

    #[test]
    fn edge_cells() {
        let g = WallGrid::new(&[3, 3], true).expect("valid shape");
        let gc = |x, y| Coordinate::new(&[x, y]);
        assert!(g.is_edge_cell(&gc(0, 1)));
        assert!(g.is_edge_cell(&gc(2, 2)));
        assert!(g.is_edge_cell(&gc(1, 0)));
        assert!(!g.is_edge_cell(&gc(1, 1)));
        assert!(!g.is_edge_cell(&gc(3, 1)));
        assert!(!g.is_edge_cell(&gc(-1, 0)));
    }

    #[test]
    fn external_faces_prefer_low_dimensions_and_negative_sides() {
        let g = WallGrid::new(&[3, 3], true).expect("valid shape");
        let gc = |x, y| Coordinate::new(&[x, y]);

        let check = |coord: Coordinate, side| {
            let external = g.external_face(&coord).expect("edge cell");
            assert_eq!(external.side(), side);
            assert_eq!(external.coordinate(), &coord);
        };
        check(gc(0, 0), Direction::negative(0));
        check(gc(0, 2), Direction::negative(0));
        check(gc(2, 1), Direction::positive(0));
        check(gc(1, 0), Direction::negative(1));
        check(gc(1, 2), Direction::positive(1));

        assert!(g.external_face(&gc(1, 1)).is_err());
        assert!(g.external_face(&gc(9, 9)).is_err());
    }

    #[test]
    fn three_dimensional_walls() {
        let mut g = WallGrid::new(&[2, 2, 2], true).expect("valid shape");
        let up = face(&[0, 0, 0], Direction::positive(2));
        assert!(g.has_wall(&up));
        g.remove_wall(&up).expect("writable face");
        assert!(!g.has_wall(&up));
        assert!(!g.has_wall(&face(&[0, 0, 1], Direction::negative(2))));
        // other faces of the cell are untouched
        assert!(g.has_wall(&face(&[0, 0, 0], Direction::positive(0))));
        assert!(g.has_wall(&face(&[0, 0, 1], Direction::positive(2))));
    }
}
