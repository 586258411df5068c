use sudoku_dlx::{
    algox::search,
    dlx::Matrix,
};

/// Three constraints covered by six subsets; the classic fixture with exactly
/// four exact covers: {0}, {1, 2, 3}, {1, 5}, {3, 4}.
fn sample_matrix() -> Matrix {
    let mut matrix = Matrix::new(3);

    for row in [
        vec![1, 2, 3],
        vec![1],
        vec![2],
        vec![3],
        vec![1, 2],
        vec![2, 3],
    ] {
        matrix.append_row(row).unwrap();
    }

    matrix
}

#[test]
fn enumerates_all_exact_covers() {
    let mut matrix = sample_matrix();
    let resolution = search(&mut matrix, usize::MAX, false);

    assert_eq!(resolution.count, 4);
    assert!(resolution.exact);
    // Deterministic order: the last candidate pushed for the first column is
    // explored first, and it forces row 3 through the remaining column
    assert_eq!(resolution.first, vec![4, 3]);
}

#[test]
fn truncates_at_the_requested_cap() {
    let mut matrix = sample_matrix();
    let resolution = search(&mut matrix, 2, false);

    assert_eq!(resolution.count, 2);
    assert!(!resolution.exact);
    assert_eq!(resolution.first, vec![4, 3]);
}

#[test]
fn just_one_stops_after_the_first_cover() {
    let mut matrix = sample_matrix();
    let resolution = search(&mut matrix, usize::MAX, true);

    assert_eq!(resolution.count, 1);
    assert!(!resolution.exact);
    assert_eq!(resolution.first, vec![4, 3]);
}

#[test]
fn empty_universe_has_the_empty_cover() {
    let mut matrix = Matrix::new(0);
    let resolution = search(&mut matrix, usize::MAX, false);

    assert_eq!(resolution.count, 1);
    assert!(resolution.exact);
    assert!(resolution.first.is_empty());
}

#[test]
fn uncoverable_column_means_no_cover() {
    let mut matrix = Matrix::new(2);
    matrix.append_row(vec![1]).unwrap();

    let resolution = search(&mut matrix, usize::MAX, false);

    assert_eq!(resolution.count, 0);
    assert!(resolution.exact);
    assert!(resolution.first.is_empty());
}

#[test]
fn mesh_stays_consistent_through_cover_and_uncover() {
    let mut matrix = sample_matrix();
    matrix.assert_consistent();

    // Covered states are themselves well-formed meshes over the survivors
    matrix.cover(1);
    matrix.assert_consistent();
    matrix.cover(3);
    matrix.assert_consistent();

    matrix.uncover(3);
    matrix.uncover(1);
    matrix.assert_consistent();
}

#[test]
fn cover_and_uncover_restore_the_mesh_exactly() {
    let mut matrix = sample_matrix();
    let pristine = matrix.clone();

    matrix.cover(1);
    assert_ne!(matrix, pristine);
    matrix.uncover(1);
    assert_eq!(matrix, pristine);

    // LIFO composition over several columns
    matrix.cover(2);
    matrix.cover(3);
    matrix.cover(1);
    matrix.uncover(1);
    matrix.uncover(3);
    matrix.uncover(2);
    assert_eq!(matrix, pristine);
}

#[test]
fn search_restores_the_mesh_on_every_exit() {
    let mut matrix = sample_matrix();
    let pristine = matrix.clone();

    // Natural exhaustion, cutoff, and just_one exits all leave the mesh as
    // it was, so back-to-back searches agree
    let exhaustive = search(&mut matrix, usize::MAX, false);
    assert_eq!(matrix, pristine);

    let truncated = search(&mut matrix, 1, false);
    assert_eq!(matrix, pristine);
    assert_eq!(truncated.first, exhaustive.first);

    search(&mut matrix, usize::MAX, true);
    assert_eq!(matrix, pristine);

    assert_eq!(search(&mut matrix, usize::MAX, false), exhaustive);
}

#[test]
fn covering_empties_the_header_ring() {
    let mut matrix = Matrix::new(2);
    matrix.append_row(vec![1, 2]).unwrap();

    assert!(!matrix.is_empty());
    matrix.cover(1);
    assert!(!matrix.is_empty());
    matrix.cover(2);
    assert!(matrix.is_empty());

    matrix.uncover(2);
    matrix.uncover(1);
    assert!(!matrix.is_empty());
}

#[test]
fn cover_hides_intersecting_rows_from_other_columns() {
    let mut matrix = sample_matrix();

    // Rows 0, 1, and 4 intersect column 1; covering it leaves column 2 with
    // rows 2 and 5, and column 3 with rows 0's and 5's survivors
    matrix.cover(1);
    assert_eq!(matrix.column_size(2), 2);
    assert_eq!(matrix.column_size(3), 2);

    matrix.uncover(1);
    assert_eq!(matrix.column_size(1), 3);
    assert_eq!(matrix.column_size(2), 4);
    assert_eq!(matrix.column_size(3), 3);
}

#[test]
fn selection_prefers_the_smallest_column_then_ring_order() {
    let mut matrix = Matrix::new(3);
    matrix.append_row(vec![1]).unwrap();
    matrix.append_row(vec![2]).unwrap();
    matrix.append_row(vec![2]).unwrap();
    matrix.append_row(vec![3]).unwrap();
    matrix.append_row(vec![3]).unwrap();

    assert_eq!(matrix.select_column(), Some(1));

    // With column 1 gone the remaining columns tie and ring order decides
    matrix.cover(1);
    assert_eq!(matrix.select_column(), Some(2));
    matrix.uncover(1);
}

#[test]
fn invalid_rows_roll_back_without_a_trace() {
    let mut matrix = Matrix::new(3);
    matrix.append_row(vec![1, 3]).unwrap();
    let pristine = matrix.clone();

    assert!(matrix.append_row(vec![0]).is_err());
    assert!(matrix.append_row(vec![2, 4]).is_err());
    assert!(matrix.append_row(Vec::new()).is_err());

    assert_eq!(matrix, pristine);
    assert_eq!(matrix.num_rows(), 1);
}
