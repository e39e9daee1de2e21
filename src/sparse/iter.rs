use super::*;

/// Location of a stored entry, ordered column-major.
///
/// Field order matters: the derived `Ord` compares `col` first, then `row`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Column of the entry.
    pub col: usize,
    /// Row of the entry.
    pub row: usize,
}

/// A stored entry of a sparse matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entry<E> {
    /// Row of the entry.
    pub row: usize,
    /// Column of the entry.
    pub col: usize,
    /// Value of the entry.
    pub value: E,
}

impl<E> Entry<E> {
    /// Returns the position of the entry.
    #[inline(always)]
    pub fn position(&self) -> Position {
        Position {
            col: self.col,
            row: self.row,
        }
    }
}

/// Iterator over the stored entries of a sparse matrix, in column-major order.
///
/// Empty columns are skipped, so every yielded entry belongs to a non-empty column.
#[derive(Clone)]
pub struct Iter<'a, I: Index, E: ComplexField> {
    col_ptr: &'a [I],
    row_ind: &'a [I],
    values: &'a [E],
    col: usize,
    pos: usize,
    end: usize,
}

impl<'a, I: Index, E: ComplexField> Iter<'a, I, E> {
    #[inline]
    pub(crate) fn new(mat: SparseColMatRef<'a, I, E>) -> Self {
        Self {
            col_ptr: mat.col_ptrs(),
            row_ind: mat.row_indices(),
            values: mat.values(),
            col: 0,
            pos: 0,
            end: mat.compute_nnz(),
        }
    }
}

impl<I: Index, E: ComplexField> Iterator for Iter<'_, I, E> {
    type Item = Entry<E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == self.end {
            return None;
        }
        // col_ptr[ncols] == end > pos, so this stops before running off the end
        while self.col_ptr[self.col + 1].zx() <= self.pos {
            self.col += 1;
        }
        let entry = Entry {
            row: self.row_ind[self.pos].zx(),
            col: self.col,
            value: self.values[self.pos],
        };
        self.pos += 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.pos;
        (len, Some(len))
    }
}

impl<I: Index, E: ComplexField> ExactSizeIterator for Iter<'_, I, E> {}
impl<I: Index, E: ComplexField> core::iter::FusedIterator for Iter<'_, I, E> {}
