//! The Growing Tree generation engine.
//!
//! The algorithm keeps a frontier of cells that have been reached but not
//! exhausted. Each growth step asks the selector for one frontier cell and
//! either carves a passage to a never-visited neighbour (pushing it onto the
//! frontier) or retires the cell. Which selector is used turns the family
//! into the named algorithms - see the `selectors` module.
//!
//! Every step is reversible. The engine records one RNG checkpoint per
//! growth step plus a per-step log entry saying which wall was carved (or
//! that a cell was retired), which together are enough to undo the step
//! exactly: the wall and bookkeeping changes are inverted directly, and the
//! position a retired cell is reinserted at is recovered by replaying the
//! selector draw against the rewound generator.
//!
//! Generation runs through four strictly linear states:
//!
//! ```text
//! PlaceRoot -> GrowTree -> PlaceEntranceAndExit -> Finished
//! ```
//!
//! The root coordinate is drawn at construction, before any checkpoint
//! exists, so resetting never needs to redraw it. Growing short-circuits as
//! soon as every cell has been visited once: the remaining frontier cells
//! can only retire from then on, so no further wall changes. Entrance
//! and exit are the approximately-farthest-apart pair of edge cells, found
//! with the standard double-sweep tree diameter search constrained to edge
//! cells, and their external walls are removed in one step.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::BuildHasherDefault;

use error_chain::bail;
use fnv::FnvHasher;
use smallvec::SmallVec;

use crate::cells::{all_directions, Coordinate, Direction, Face};
use crate::errors::*;
use crate::masks::BinaryMaskNd;
use crate::random::ReversibleRandom;
use crate::selectors::Selector;
use crate::units::CellsCount;
use crate::walls::WallGrid;

type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;
type CandidateSmallVec = SmallVec<[(Coordinate, Direction); 8]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum State {
    PlaceRoot,
    GrowTree,
    PlaceEntranceAndExit,
    Finished,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            State::PlaceRoot => "placing root",
            State::GrowTree => "growing tree",
            State::PlaceEntranceAndExit => "placing entrance and exit",
            State::Finished => "finished",
        };
        write!(f, "{}", name)
    }
}

/// The solution corridor from just outside the entrance to just outside the
/// exit, held both in walk order and as a membership set.
#[derive(PartialEq, Clone, Debug)]
struct Solution {
    path: Vec<Coordinate>,
    membership: FnvHashSet<Coordinate>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct GrowingTreeGenerator {
    walls: WallGrid,
    random: ReversibleRandom,
    selector: Selector,
    root: Coordinate,
    entrance: Option<Coordinate>,
    exit: Option<Coordinate>,
    /// Frontier cells, oldest first. Pushes go at the tail; retirement can
    /// remove from any index, so removals shift rather than swap to keep
    /// the ordering the reverse step has to reconstruct.
    frontier: Vec<Coordinate>,
    visited: BinaryMaskNd,
    completed: Vec<Coordinate>,
    /// One entry per growth step: the carved direction, or None when the
    /// step retired a cell.
    path_log: Vec<Option<Direction>>,
    remaining_cells: usize,
    state: State,
    solution: Option<Solution>,
}

impl GrowingTreeGenerator {
    pub fn new(shape: &[usize], selector: Selector, seed: u64) -> Result<GrowingTreeGenerator> {
        let walls = WallGrid::new(shape, true)?;
        let CellsCount(size) = walls.size();
        if size == 1 {
            bail!(ErrorKind::SingleCellMaze);
        }
        selector.validate()?;

        // root draws happen before the first checkpoint, so a reset can
        // rewind to history index 0 without redrawing them
        let mut random = ReversibleRandom::new(seed)?;
        let root_axes: SmallVec<[i32; 4]> = shape
            .iter()
            .map(|&side| random.next_index(side) as i32)
            .collect();
        let root = Coordinate::new(&root_axes);
        let visited = BinaryMaskNd::new(shape);

        Ok(GrowingTreeGenerator {
            walls,
            random,
            selector,
            root,
            entrance: None,
            exit: None,
            frontier: Vec::new(),
            visited,
            completed: Vec::new(),
            path_log: Vec::new(),
            remaining_cells: size,
            state: State::PlaceRoot,
            solution: None,
        })
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.walls.shape()
    }

    #[inline]
    pub fn dimension_count(&self) -> usize {
        self.walls.dimension_count()
    }

    #[inline]
    pub fn size(&self) -> CellsCount {
        self.walls.size()
    }

    #[inline]
    pub fn has_wall(&self, face: &Face) -> bool {
        self.walls.has_wall(face)
    }

    #[inline]
    pub fn root(&self) -> &Coordinate {
        &self.root
    }

    #[inline]
    pub fn entrance(&self) -> Option<&Coordinate> {
        self.entrance.as_ref()
    }

    #[inline]
    pub fn exit(&self) -> Option<&Coordinate> {
        self.exit.as_ref()
    }

    /// Performs one unit of generation work. A no-op once finished.
    pub fn advance(&mut self) {
        match self.state {
            State::PlaceRoot => {
                self.frontier.push(self.root.clone());
                self.visited.set(&self.root);
                self.remaining_cells -= 1;
                self.state = State::GrowTree;
            }
            State::GrowTree => {
                self.random.advance_generator();
                debug_assert!(!self.frontier.is_empty());
                let cell_index = self.selector.select(self.frontier.len(), &mut self.random);
                let cell = self.frontier[cell_index].clone();

                let candidates = self.unvisited_neighbours(&cell);
                if !candidates.is_empty() {
                    let pick = self.random.next_index(candidates.len());
                    let (neighbour, direction) = candidates[pick].clone();
                    self.walls
                        .remove_wall(&Face::new(cell, direction))
                        .expect("faces between adjacent in-bounds cells are writable");
                    self.visited.set(&neighbour);
                    self.frontier.push(neighbour);
                    self.path_log.push(Some(direction));
                    self.remaining_cells -= 1;
                } else {
                    let exhausted = self.frontier.remove(cell_index);
                    self.completed.push(exhausted);
                    self.path_log.push(None);
                }

                // once every cell has been visited the rest of the frontier
                // can only retire, so the maze is already complete
                if self.remaining_cells == 0 {
                    self.state = State::PlaceEntranceAndExit;
                }
            }
            State::PlaceEntranceAndExit => {
                let origin = Coordinate::origin(self.dimension_count());
                let entrance = self.most_distant_edge_cell(&origin);
                let exit = self.most_distant_edge_cell(&entrance);
                self.set_boundary_wall(&entrance, false);
                self.set_boundary_wall(&exit, false);
                self.entrance = Some(entrance);
                self.exit = Some(exit);
                self.state = State::Finished;
            }
            State::Finished => {}
        }
    }

    pub fn advance_by(&mut self, steps: usize) {
        for _ in 0..steps {
            self.advance();
        }
    }

    /// Runs generation to completion.
    pub fn finish(&mut self) {
        while self.state != State::Finished {
            self.advance();
        }
    }

    /// Undoes the most recent unit of generation work, restoring the wall
    /// grid, the bookkeeping lists and the random generator to their exact
    /// prior state. A no-op in the initial state.
    pub fn reverse(&mut self) {
        match self.state {
            State::Finished => {
                let entrance = self.entrance.take().expect("a finished maze has an entrance");
                let exit = self.exit.take().expect("a finished maze has an exit");
                self.set_boundary_wall(&entrance, true);
                self.set_boundary_wall(&exit, true);
                self.solution = None;
                self.state = State::PlaceEntranceAndExit;
            }
            State::PlaceEntranceAndExit | State::GrowTree => {
                if let Some(logged) = self.path_log.pop() {
                    // rewind the seed to this step's checkpoint so any draw
                    // made below replays the forward step's choices
                    self.random.reset_generator();
                    match logged {
                        Some(direction) => {
                            let neighbour = self.frontier
                                .pop()
                                .expect("a carving step leaves the carved cell on the frontier");
                            self.walls
                                .add_wall(&Face::new(neighbour.clone(), direction.invert()))
                                .expect("faces between adjacent in-bounds cells are writable");
                            self.visited.unset(&neighbour);
                            self.remaining_cells += 1;
                        }
                        None => {
                            // the retired cell goes back to wherever the
                            // selector found it, which the replayed draw
                            // reproduces since the pre-retirement frontier
                            // was one cell larger
                            let cell_index = self.selector
                                .select(self.frontier.len() + 1, &mut self.random);
                            let cell = self.completed
                                .pop()
                                .expect("a retirement step leaves a cell on the completed list");
                            self.frontier.insert(cell_index, cell);
                        }
                    }
                    self.random
                        .reverse_generator()
                        .expect("every growth step records a checkpoint");
                    self.state = State::GrowTree;
                } else {
                    // only the root has been placed; no RNG bookkeeping to
                    // undo because the root was drawn before any checkpoint
                    let root = self.frontier.pop().expect("the frontier holds the root");
                    debug_assert_eq!(root, self.root);
                    self.visited.unset(&root);
                    self.remaining_cells += 1;
                    self.state = State::PlaceRoot;
                }
            }
            State::PlaceRoot => {}
        }
    }

    pub fn reverse_by(&mut self, steps: usize) {
        for _ in 0..steps {
            self.reverse();
        }
    }

    /// Returns generation to its initial state. The root is kept: it was
    /// derived from pre-checkpoint draws and rewinding the generator to its
    /// first checkpoint reproduces everything after it.
    pub fn reset(&mut self) {
        self.random
            .reset_generator_to(0)
            .expect("the history always holds the initial checkpoint");
        self.walls.reset(true);
        self.entrance = None;
        self.exit = None;
        self.frontier.clear();
        self.visited.clear();
        self.completed.clear();
        self.path_log.clear();
        self.solution = None;
        let CellsCount(size) = self.walls.size();
        self.remaining_cells = size;
        self.state = State::PlaceRoot;
    }

    /// Computes and caches the unique solution corridor. Only valid once
    /// generation has finished.
    ///
    /// The walk starts one step outside the entrance, seeks one step outside
    /// the exit, tries directions in canonical order, skips the direction it
    /// arrived from and any walled direction, and backtracks at dead ends.
    /// The carved corridors form a tree, so the walk cannot cycle and must
    /// reach the goal.
    pub fn show_solution(&mut self) -> Result<()> {
        if self.state != State::Finished {
            bail!(ErrorKind::SolutionUnavailable);
        }
        if self.solution.is_some() {
            return Ok(());
        }

        let directions = all_directions(self.dimension_count());
        let entrance = self.entrance.clone().expect("a finished maze has an entrance");
        let exit = self.exit.clone().expect("a finished maze has an exit");
        let entrance_side = self.walls.external_face(&entrance)?.side();
        let exit_side = self.walls.external_face(&exit)?.side();
        let goal = exit.offset(exit_side);

        let mut path = vec![entrance.offset(entrance_side)];
        let mut from_indices = vec![entrance_side.to_index()];
        // starting outside the maze, the only move that may be considered is
        // back in through the entrance; skipping the earlier directions
        // keeps the walk from wandering the open space outside
        let mut next_try_indices = vec![entrance_side.invert().to_index()];

        loop {
            let cell = path.last().expect("the walk never pops its starting cell").clone();
            if cell == goal {
                break;
            }
            let from_index = *from_indices.last().expect("stacks advance together");
            let mut try_index = *next_try_indices.last().expect("stacks advance together");
            while try_index < directions.len() &&
                  (try_index == from_index ||
                   self.walls.has_wall(&Face::new(cell.clone(), directions[try_index]))) {
                try_index += 1;
            }
            if try_index < directions.len() {
                let direction = directions[try_index];
                *next_try_indices.last_mut().expect("stacks advance together") = try_index + 1;
                path.push(cell.offset(direction));
                from_indices.push(direction.invert().to_index());
                next_try_indices.push(0);
            } else {
                path.pop();
                from_indices.pop();
                next_try_indices.pop();
            }
        }

        let membership = path.iter().cloned().collect();
        self.solution = Some(Solution { path, membership });
        Ok(())
    }

    pub fn hide_solution(&mut self) {
        self.solution = None;
    }

    /// Is the coordinate on the currently shown solution corridor? Always
    /// false while no solution is shown.
    pub fn is_on_solution(&self, coord: &Coordinate) -> bool {
        self.solution
            .as_ref()
            .map_or(false, |solution| solution.membership.contains(coord))
    }

    /// The shown solution in walk order, including the two cells just
    /// outside the entrance and exit.
    pub fn solution_path(&self) -> Option<&[Coordinate]> {
        self.solution.as_ref().map(|solution| &solution.path[..])
    }

    /// In-bounds neighbours of `cell` that have never entered the frontier,
    /// paired with the direction towards them, in canonical order.
    fn unvisited_neighbours(&self, cell: &Coordinate) -> CandidateSmallVec {
        let mut candidates = CandidateSmallVec::new();
        for &direction in all_directions(self.dimension_count()).iter() {
            let neighbour = cell.offset(direction);
            if self.visited.contains(&neighbour) && !self.visited.is_set(&neighbour) {
                candidates.push((neighbour, direction));
            }
        }
        candidates
    }

    /// The edge cell approximately farthest from `from` through the carved
    /// corridors: one sweep of the double-sweep tree diameter search,
    /// restricted to edge cell candidates. Walks the corridor tree breadth
    /// first; skipping the arrival direction is enough to avoid revisits
    /// because the corridors are acyclic.
    fn most_distant_edge_cell(&self, from: &Coordinate) -> Coordinate {
        let directions = all_directions(self.dimension_count());
        let mut queue: VecDeque<(Coordinate, Option<Direction>, usize)> = VecDeque::new();
        queue.push_back((from.clone(), None, 0));

        let mut farthest = from.clone();
        let mut greatest_distance = 0;

        while let Some((cell, arrived_from, distance)) = queue.pop_front() {
            if distance > greatest_distance && self.walls.is_edge_cell(&cell) {
                farthest = cell.clone();
                greatest_distance = distance;
            }
            for &direction in directions.iter() {
                if Some(direction) == arrived_from {
                    continue;
                }
                if !self.walls.has_wall(&Face::new(cell.clone(), direction)) {
                    queue.push_back((cell.offset(direction),
                                     Some(direction.invert()),
                                     distance + 1));
                }
            }
        }
        farthest
    }

    fn set_boundary_wall(&mut self, edge_cell: &Coordinate, is_wall: bool) {
        let face = self.walls
            .external_face(edge_cell)
            .expect("entrance and exit are edge cells");
        self.walls
            .set_wall(&face, is_wall)
            .expect("external faces of edge cells are writable");
    }
}
