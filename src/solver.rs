use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    algox,
    board::{Board, Placement, DIM, NUM_CONSTRAINTS, SIZE},
    dlx::Matrix,
};

/// Result of [`solve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOutcome {
    /// Number of solutions found, clamped to the requested cap.
    pub count: usize,
    /// Whether `count` is the total number of solutions the board has. A
    /// truncated enumeration and a `just_one` solve that stopped short of
    /// exhausting the search both report `false`.
    pub is_exact: bool,
    /// The first solution encountered, if any.
    pub solution: Option<Board>,
}

/// Solves a board by reducing it to an exact cover problem and running the
/// dancing links search over it, enumerating up to `max_solutions` solutions
/// (`just_one` stops at the first one found).
///
/// Callers are expected to run the validators first; a board that fails the
/// range or duplicate check may legitimately come back with no solution.
pub fn solve(board: &Board, max_solutions: usize, just_one: bool) -> SolveOutcome {
    let (mut matrix, placements) = build_matrix(board);
    let resolution = algox::search(&mut matrix, max_solutions, just_one);

    debug!(
        "Solved a board with {} candidate placements: {} solution(s), exact: {}",
        placements.len(),
        resolution.count,
        resolution.exact
    );

    let solution = if resolution.count > 0 {
        let chosen: Vec<Placement> = resolution
            .first
            .iter()
            .map(|&row| placements[row])
            .collect();
        Some(decode(&chosen))
    } else {
        None
    };

    SolveOutcome {
        count: resolution.count,
        is_exact: resolution.exact,
        solution,
    }
}

/// Builds the exact cover matrix for a board. Returns the matrix and the
/// placement table mapping its row indices back to board choices.
///
/// Every one of the `4 * SIZE^2` constraint columns is allocated up front in
/// id order; one 4-cell row is appended per placement that no pre-filled cell
/// forbids. A clue therefore keeps exactly one placement for its own cell,
/// and the search is forced to select it.
pub fn build_matrix(board: &Board) -> (Matrix, Vec<Placement>) {
    let forbidden = forbidden_placements(board);
    let mut matrix = Matrix::new(NUM_CONSTRAINTS);
    let mut placements = Vec::new();

    for row in 0..SIZE {
        for col in 0..SIZE {
            for digit in 0..SIZE {
                if forbidden[row][col][digit] {
                    continue;
                }

                let placement = Placement { row, col, digit };
                // Columns are 1-based in the matrix, with the head at zero
                let columns = placement.constraints().map(|c| c.id() + 1);

                // Constraint ids always fit the allocated universe
                matrix.append_row(columns).unwrap();
                placements.push(placement);
            }
        }
    }

    (matrix, placements)
}

/// Marks the placements ruled out by pre-filled cells: other digits in the
/// clue's own cell, and the clue's digit anywhere else in its row, column,
/// and block.
fn forbidden_placements(board: &Board) -> [[[bool; SIZE]; SIZE]; SIZE] {
    let mut forbidden = [[[false; SIZE]; SIZE]; SIZE];

    for row in 0..SIZE {
        for col in 0..SIZE {
            let value = board[row][col];

            // Out-of-range values should have been caught by the validators;
            // treat them like empty cells rather than indexing out of bounds
            if value < 1 || value > SIZE as i32 {
                continue;
            }

            let digit = (value - 1) as usize;

            for d in 0..SIZE {
                if d != digit {
                    forbidden[row][col][d] = true;
                }
            }

            for k in 0..SIZE {
                if k != col {
                    forbidden[row][k][digit] = true;
                }
                if k != row {
                    forbidden[k][col][digit] = true;
                }
            }

            let (block_row, block_col) = (row / DIM * DIM, col / DIM * DIM);

            for r in block_row..block_row + DIM {
                for c in block_col..block_col + DIM {
                    if r != row || c != col {
                        forbidden[r][c][digit] = true;
                    }
                }
            }
        }
    }

    forbidden
}

/// Reconstructs a board from a set of chosen placements.
pub fn decode(placements: &[Placement]) -> Board {
    let mut board = [[0; SIZE]; SIZE];

    for placement in placements {
        board[placement.row][placement.col] = placement.digit as i32 + 1;
    }

    board
}
