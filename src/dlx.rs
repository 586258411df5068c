//! Low-level dancing links (DLX) matrix: a sparse 0/1 matrix stored as a
//! toroidal quadruply-linked mesh inside a single index arena. The node
//! layout follows Ulrik Sverdrup's more comprehensive implementation at
//! https://github.com/bluss/dlx/.

use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
    Up,
    Down,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Direction::Prev => Direction::Next,
            Direction::Next => Direction::Prev,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Role of a node in the mesh. A column header carries the count of body
/// cells still linked on its vertical ring; a body cell carries the arena
/// index of its column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Head,
    Column { size: usize },
    Body { column: usize },
}

/// Node of the DLX matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    /// Links to the four neighbors (previous, next, up, down in that order).
    links: [usize; 4],
    slot: Slot,
}

impl Node {
    /// Initializes a new node with no links to other nodes.
    fn new(slot: Slot) -> Self {
        Self { links: [!0; 4], slot }
    }

    fn link(&self, dir: Direction) -> usize {
        self.links[dir as usize]
    }

    fn set_link(&mut self, idx: usize, dir: Direction) -> &mut Self {
        self.links[dir as usize] = idx;
        self
    }
}

/// Wrapper for borrowless linked list traversal.
#[derive(Debug)]
pub(crate) struct Walker {
    idx: usize,
    start: usize,
}

impl Walker {
    #[inline]
    pub(crate) fn next(&mut self, matrix: &Matrix, dir: Direction) -> Option<usize> {
        let next = matrix.nodes[self.idx].link(dir);
        self.idx = next;

        assert_ne!(next, !0, "Invalid index found in traversal");

        if next == self.start {
            return None;
        }

        Some(next)
    }
}

/// An exact cover problem as a toroidal mesh. The arena owns every node: the
/// head sits at index 0, column headers at `1..=columns`, and body cells
/// follow in row-append order. Columns are addressed 1-based throughout the
/// public API.
///
/// `cover`/`uncover` only relink indices and never allocate, so a clone taken
/// before a LIFO cover sequence compares equal to the matrix after the
/// mirrored uncover sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    nodes: Vec<Node>,
    columns: usize,
    /// Arena index of the first cell of each appended row, in row order.
    row_table: Vec<usize>,
}

impl Matrix {
    const HEAD: usize = 0;

    /// Initializes an empty matrix with `columns` columns: the head node and
    /// the column header row, linked into a horizontal ring in column order
    /// and self-linked vertically.
    pub fn new(columns: usize) -> Self {
        let mut nodes = Vec::with_capacity(columns + 1);
        nodes.push(Node::new(Slot::Head));
        nodes.extend((0..columns).map(|_| Node::new(Slot::Column { size: 0 })));

        for (idx, node) in nodes.iter_mut().enumerate() {
            node.set_link(idx + 1, Direction::Next)
                .set_link(idx.wrapping_sub(1), Direction::Prev)
                .set_link(idx, Direction::Up)
                .set_link(idx, Direction::Down);
        }

        // Fixup begin/end of the header ring
        let last = nodes.len() - 1;
        nodes[Self::HEAD].set_link(last, Direction::Prev);
        nodes[last].set_link(Self::HEAD, Direction::Next);

        Self {
            nodes,
            columns,
            row_table: Vec::new(),
        }
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.row_table.len()
    }

    /// Appends a row to the matrix and returns its row index. The row lists
    /// the 1-based columns it intersects; the new cells land at the bottom of
    /// each column's vertical ring and form a closed horizontal ring. Invalid
    /// input rolls the arena back and returns `Err`.
    pub fn append_row(
        &mut self,
        row: impl IntoIterator<Item = usize>,
    ) -> Result<usize, Box<dyn Error>> {
        let start_idx = self.nodes.len();

        // Attempt to create cells for all listed columns
        if let Err(e) = self.try_append(row) {
            // Rollback on error
            self.nodes.truncate(start_idx);
            return Err(e);
        }

        // Splice the new cells into their columns
        for idx in start_idx..self.nodes.len() {
            self.attach_to_column(self.column_of(idx), idx);
        }

        // Link the Prev-Next axis into a closed ring
        let end_idx = self.nodes.len();

        for (offset, node) in self.nodes[start_idx..].iter_mut().enumerate() {
            let prev_idx = if offset == 0 {
                end_idx - 1
            } else {
                start_idx + offset - 1
            };
            let next_idx = if start_idx + offset + 1 == end_idx {
                start_idx
            } else {
                start_idx + offset + 1
            };

            node.set_link(prev_idx, Direction::Prev);
            node.set_link(next_idx, Direction::Next);
        }

        self.row_table.push(start_idx);

        Ok(self.row_table.len() - 1)
    }

    /// Pushes bare cells for the row, triggering a rollback in `append_row`
    /// by returning `Err` if the input doesn't match the basic criteria.
    fn try_append(&mut self, row: impl IntoIterator<Item = usize>) -> Result<(), Box<dyn Error>> {
        let original_len = self.nodes.len();

        for column in row {
            if column == 0 {
                return Err("Invalid column zero".into());
            }

            if column > self.columns {
                return Err("Input outside of the defined universe".into());
            }

            self.nodes.push(Node::new(Slot::Body { column }));
        }

        if self.nodes.len() == original_len {
            return Err("Input must not be empty".into());
        }

        Ok(())
    }

    /// Splices cell `idx` into the bottom of `column`'s vertical ring.
    fn attach_to_column(&mut self, column: usize, idx: usize) {
        assert!(
            column != 0 && column <= self.columns,
            "Invalid column {}",
            column
        );
        assert!(idx < self.nodes.len(), "Invalid index {}", idx);

        let old_end = self.nodes[column].link(Direction::Up);

        self.nodes[column].set_link(idx, Direction::Up);
        *self.column_size_mut(column) += 1;
        self.nodes[old_end].set_link(idx, Direction::Down);
        self.nodes[idx]
            .set_link(old_end, Direction::Up)
            .set_link(column, Direction::Down);
    }

    /// Unlinks a single node from the doubly linked list along `dir`'s axis.
    /// The node's own links stay untouched so `restore` can undo exactly.
    fn detach(&mut self, idx: usize, dir: Direction) {
        let forward = dir;
        let backward = dir.opposite();

        let node = &self.nodes[idx];
        let next = node.link(forward);
        let prev = node.link(backward);

        self.nodes[next].set_link(prev, backward);
        self.nodes[prev].set_link(next, forward);
    }

    /// Relinks a previously detached node into the doubly linked list along
    /// `dir`'s axis.
    fn restore(&mut self, idx: usize, dir: Direction) {
        let forward = dir;
        let backward = dir.opposite();

        let node = &self.nodes[idx];
        let next = node.link(forward);
        let prev = node.link(backward);

        self.nodes[next].set_link(idx, backward);
        self.nodes[prev].set_link(idx, forward);
    }

    /// Covers a column: unlinks its header from the header ring and unlinks
    /// every row intersecting the column from all other columns.
    pub fn cover(&mut self, column: usize) {
        self.detach(column, Direction::Next);
        let mut rows = self.walk_from(column);

        while let Some(i) = rows.next(self, Direction::Down) {
            let mut cells = self.walk_from(i);

            while let Some(j) = cells.next(self, Direction::Next) {
                self.detach(j, Direction::Down);
                *self.column_size_mut(self.column_of(j)) -= 1;
            }
        }
    }

    /// Uncovers a column, exactly mirroring `cover` in reverse direction.
    /// Uncover calls must come in LIFO order relative to the covers they undo.
    pub fn uncover(&mut self, column: usize) {
        let mut rows = self.walk_from(column);

        while let Some(i) = rows.next(self, Direction::Up) {
            let mut cells = self.walk_from(i);

            while let Some(j) = cells.next(self, Direction::Prev) {
                *self.column_size_mut(self.column_of(j)) += 1;
                self.restore(j, Direction::Down);
            }
        }

        self.restore(column, Direction::Next);
    }

    /// Returns `true` when no uncovered columns remain, i.e. the rows chosen
    /// so far form an exact cover.
    pub fn is_empty(&self) -> bool {
        self.nodes[Self::HEAD].link(Direction::Next) == Self::HEAD
    }

    /// Selects the uncovered column with the fewest remaining cells. Ties go
    /// to the column encountered first on the header ring, and the scan stops
    /// early at an empty column (no cover can satisfy it anymore). `None`
    /// only when the matrix is empty.
    pub fn select_column(&self) -> Option<usize> {
        let mut best = None;
        let mut min = usize::MAX;
        let mut columns = self.walk_from(Self::HEAD);

        while let Some(column) = columns.next(self, Direction::Next) {
            let size = self.column_size(column);

            if size < min {
                min = size;
                best = Some(column);

                if min == 0 {
                    break;
                }
            }
        }

        best
    }

    /// Number of cells currently linked on `column`'s vertical ring.
    pub fn column_size(&self, column: usize) -> usize {
        match self.nodes[column].slot {
            Slot::Column { size } => size,
            _ => panic!("Node {} is not a column header", column),
        }
    }

    fn column_size_mut(&mut self, column: usize) -> &mut usize {
        match &mut self.nodes[column].slot {
            Slot::Column { size } => size,
            _ => panic!("Node {} is not a column header", column),
        }
    }

    /// Arena index of the column header on `idx`'s vertical ring. A column
    /// header is its own column.
    pub(crate) fn column_of(&self, idx: usize) -> usize {
        match self.nodes[idx].slot {
            Slot::Body { column } => column,
            Slot::Column { .. } => idx,
            Slot::Head => panic!("The head node belongs to no column"),
        }
    }

    /// Returns the row index for a body cell's arena index.
    pub(crate) fn row_of(&self, idx: usize) -> usize {
        let pos = self.row_table.partition_point(move |&x| x <= idx);
        assert_ne!(pos, 0, "Index {} precedes the first row", idx);
        pos - 1
    }

    #[inline]
    pub(crate) fn walk_from(&self, idx: usize) -> Walker {
        Walker { idx, start: idx }
    }

    /// Walks the reachable mesh and panics if its structure degraded: every
    /// link must be mutual, every cell must point back to the header of its
    /// vertical ring, and every header's size must match that ring. Intended
    /// for tests; costs a full traversal.
    pub fn assert_consistent(&self) {
        let mut headers = 0;
        let mut columns = self.walk_from(Self::HEAD);

        while let Some(column) = columns.next(self, Direction::Next) {
            headers += 1;
            self.assert_mutual_links(column);

            let mut count = 0;
            let mut cells = self.walk_from(column);

            while let Some(cell) = cells.next(self, Direction::Down) {
                count += 1;
                self.assert_mutual_links(cell);
                assert_eq!(
                    self.column_of(cell),
                    column,
                    "Cell {} strayed onto column {}'s ring",
                    cell,
                    column
                );
            }

            assert_eq!(
                self.column_size(column),
                count,
                "Column {} miscounts its ring",
                column
            );
        }

        assert!(
            headers <= self.columns,
            "Header ring holds {} columns out of {}",
            headers,
            self.columns
        );
    }

    fn assert_mutual_links(&self, idx: usize) {
        for dir in [
            Direction::Prev,
            Direction::Next,
            Direction::Up,
            Direction::Down,
        ] {
            let neighbor = self.nodes[idx].link(dir);
            assert_eq!(
                self.nodes[neighbor].link(dir.opposite()),
                idx,
                "Node {} has a one-way link towards {}",
                idx,
                neighbor
            );
        }
    }

    /// Chooses the row containing `node`: covers the node's own column, then
    /// every other column the row intersects, left to right.
    pub(crate) fn select(&mut self, node: usize) {
        self.cover(self.column_of(node));
        let mut cells = self.walk_from(node);

        while let Some(j) = cells.next(self, Direction::Next) {
            self.cover(self.column_of(j));
        }
    }

    /// Undoes `select(node)`: uncovers the row's other columns right to left,
    /// then the node's own column.
    pub(crate) fn unselect(&mut self, node: usize) {
        let mut cells = self.walk_from(node);

        while let Some(j) = cells.next(self, Direction::Prev) {
            self.uncover(self.column_of(j));
        }

        self.uncover(self.column_of(node));
    }
}
