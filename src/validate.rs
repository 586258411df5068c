use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{is_filled, Board, DIM, SIZE};

/// A cell flagged by a validator, carrying the offending value as it appears
/// on the board (1-based, possibly out of range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Violation {
    pub row: usize,
    pub col: usize,
    pub value: i32,
}

/// Reports every cell whose value falls outside `[0, SIZE]`, in row-major
/// order.
pub fn validate_range(board: &Board) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (row, cells) in board.iter().enumerate() {
        for (col, &value) in cells.iter().enumerate() {
            if value < 0 || value > SIZE as i32 {
                violations.push(Violation { row, col, value });
            }
        }
    }

    violations
}

/// Reports every filled cell whose value appears more than once in its row,
/// column, or block. A cell is reported at most once even when it takes part
/// in several duplicated units; the list comes out in row-major order.
pub fn validate_duplicates(board: &Board) -> Vec<Violation> {
    // Keyed by (row, col, value), so set order is row-major order
    let mut violations = BTreeSet::new();

    for row in 0..SIZE {
        flag_duplicates(board, row_cells(row), &mut violations);
    }

    for col in 0..SIZE {
        flag_duplicates(board, column_cells(col), &mut violations);
    }

    for block in 0..SIZE {
        flag_duplicates(board, block_cells(block), &mut violations);
    }

    violations.into_iter().collect()
}

/// Returns `true` if the board is a complete, valid solution: every cell
/// filled with an in-range digit and no duplicates anywhere.
pub fn is_correct(board: &Board) -> bool {
    validate_range(board).is_empty() && validate_duplicates(board).is_empty() && is_filled(board)
}

/// Flags the cells of one unit (row, column, or block) whose value occurs in
/// the unit more than once. Out-of-range values never index the counter; the
/// range check owns reporting those.
fn flag_duplicates(
    board: &Board,
    unit: impl Iterator<Item = (usize, usize)> + Clone,
    violations: &mut BTreeSet<Violation>,
) {
    let mut occurrences = [0u8; SIZE];

    for (row, col) in unit.clone() {
        let value = board[row][col];

        if value >= 1 && value <= SIZE as i32 {
            occurrences[(value - 1) as usize] += 1;
        }
    }

    for (row, col) in unit {
        let value = board[row][col];

        if value >= 1 && value <= SIZE as i32 && occurrences[(value - 1) as usize] > 1 {
            violations.insert(Violation { row, col, value });
        }
    }
}

fn row_cells(row: usize) -> impl Iterator<Item = (usize, usize)> + Clone {
    (0..SIZE).map(move |col| (row, col))
}

fn column_cells(col: usize) -> impl Iterator<Item = (usize, usize)> + Clone {
    (0..SIZE).map(move |row| (row, col))
}

/// Cells of a block in row-major order within the block.
fn block_cells(block: usize) -> impl Iterator<Item = (usize, usize)> + Clone {
    let (block_row, block_col) = (block / DIM * DIM, block % DIM * DIM);

    (0..SIZE).map(move |pos| (block_row + pos / DIM, block_col + pos % DIM))
}
