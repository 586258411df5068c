//! Bounded exact cover search: Donald Knuth's Algorithm X driven over a
//! [`Matrix`], iterative with explicit stacks instead of recursion.
//!
//! https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X

use log::debug;

use crate::dlx::{Direction, Matrix};

/// One pending choice: make `node`'s row the selection at `depth`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    depth: usize,
    node: usize,
}

/// Outcome of a bounded search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Number of exact covers found, clamped to the requested cap.
    pub count: usize,
    /// Whether `count` is the total number of covers or a truncated tally.
    pub exact: bool,
    /// Row indices of the first cover encountered, in the order the rows
    /// were chosen. Empty when no cover exists (or the matrix had no columns
    /// and the empty selection is the one cover).
    pub first: Vec<usize>,
    /// Number of choices explored, for logging and benchmark comparisons.
    pub visited_nodes: u64,
}

/// Enumerates exact covers of `matrix` until the search tree is exhausted or
/// `max_solutions` covers have been counted. With `just_one` the search stops
/// at the first cover regardless of the cap.
///
/// The enumeration order is a deterministic function of the matrix: the
/// minimum-size column selection breaks ties on header ring order, and a
/// column's candidate rows are taken from its vertical ring starting below
/// the header. The mesh is restored to its initial state on every exit path,
/// so the same matrix can be searched again.
pub fn search(matrix: &mut Matrix, max_solutions: usize, just_one: bool) -> Resolution {
    let mut outcome = Resolution {
        count: 0,
        exact: true,
        first: Vec::new(),
        visited_nodes: 0,
    };

    let column = match matrix.select_column() {
        Some(column) => column,
        // No columns at all: the empty selection already covers everything
        None => {
            outcome.count = 1;
            return outcome;
        }
    };

    if matrix.column_size(column) == 0 {
        return outcome;
    }

    // Chosen cells so far, and the pending sibling choices still to explore
    let mut trail: Vec<usize> = Vec::new();
    let mut branch: Vec<Frame> = Vec::new();
    let mut found_first = false;

    let mut candidates = matrix.walk_from(column);
    while let Some(node) = candidates.next(matrix, Direction::Down) {
        branch.push(Frame { depth: 0, node });
    }

    while let Some(Frame { depth, node }) = branch.pop() {
        outcome.visited_nodes += 1;

        // Rewind the trail so the popped frame becomes the choice at `depth`.
        // Selections must be undone newest-first to keep the mesh consistent.
        while trail.len() > depth {
            // The length check guarantees a last element
            let last = trail.pop().unwrap();
            matrix.unselect(last);
        }

        matrix.select(node);
        trail.push(node);

        if matrix.is_empty() {
            outcome.count += 1;

            if !found_first {
                found_first = true;
                outcome.first = trail.iter().map(|&cell| matrix.row_of(cell)).collect();
            }

            // Undo the completing choice and keep exploring its siblings
            matrix.unselect(node);
            trail.pop();

            if just_one || outcome.count >= max_solutions {
                outcome.exact = branch.is_empty();
                unwind(matrix, &mut trail);
                finish(&outcome);
                return outcome;
            }

            continue;
        }

        if let Some(next_column) = matrix.select_column() {
            let depth = trail.len();
            let mut candidates = matrix.walk_from(next_column);

            while let Some(node) = candidates.next(matrix, Direction::Down) {
                branch.push(Frame { depth, node });
            }
        }
    }

    unwind(matrix, &mut trail);
    finish(&outcome);

    outcome
}

/// Undoes any selections left on the trail, restoring the mesh to its
/// pre-search state.
fn unwind(matrix: &mut Matrix, trail: &mut Vec<usize>) {
    while let Some(last) = trail.pop() {
        matrix.unselect(last);
    }
}

fn finish(outcome: &Resolution) {
    debug!(
        "Search finished with {} solution(s) (exact: {}) after visiting {} nodes",
        outcome.count, outcome.exact, outcome.visited_nodes
    );
}
