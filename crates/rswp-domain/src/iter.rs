//! Iterator protocol over paged query results.

use std::collections::VecDeque;

use rswp_storage::{encode_cursor, IdCursorRow};

/// Iterates the ids of one result page and mints the resume cursor.
///
/// The cursor tracks the most recently yielded row, so a caller can stop
/// mid-page and resume from exactly that point.
#[derive(Debug, Clone)]
pub struct IdIterator {
    rows: VecDeque<IdCursorRow>,
    last_order_value: Option<String>,
}

impl IdIterator {
    pub fn new(rows: Vec<IdCursorRow>) -> Self {
        Self {
            rows: rows.into(),
            last_order_value: None,
        }
    }

    /// An iterator that yields nothing and has no cursor.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The opaque cursor resuming after the last yielded id. `None` until
    /// an id has been yielded.
    pub fn cursor(&self) -> Option<String> {
        self.last_order_value
            .as_deref()
            .map(encode_cursor)
    }

    /// Drains the remaining ids. The cursor afterwards points past the
    /// final row.
    pub fn collect_ids(&mut self) -> Vec<i64> {
        self.by_ref().collect()
    }
}

impl Iterator for IdIterator {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let row = self.rows.pop_front()?;
        self.last_order_value = Some(row.order_value);
        Some(row.id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for IdIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use rswp_storage::decode_cursor;

    fn rows() -> Vec<IdCursorRow> {
        vec![
            IdCursorRow { id: 1, order_value: "2024-01-01 00:00:00".to_string() },
            IdCursorRow { id: 2, order_value: "2024-02-01 00:00:00".to_string() },
        ]
    }

    #[test]
    fn test_yields_ids_in_row_order() {
        let mut iter = IdIterator::new(rows());
        assert_eq!(iter.collect_ids(), vec![1, 2]);
    }

    #[test]
    fn test_cursor_is_none_before_first_yield() {
        let iter = IdIterator::new(rows());
        assert_eq!(iter.cursor(), None);
    }

    #[test]
    fn test_cursor_tracks_last_yielded_row() {
        let mut iter = IdIterator::new(rows());
        iter.next();
        let cursor = iter.cursor().unwrap();
        assert_eq!(decode_cursor(&cursor).as_deref(), Some("2024-01-01 00:00:00"));

        iter.next();
        let cursor = iter.cursor().unwrap();
        assert_eq!(decode_cursor(&cursor).as_deref(), Some("2024-02-01 00:00:00"));
    }

    #[test]
    fn test_empty_iterator() {
        let mut iter = IdIterator::empty();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.cursor(), None);
    }

    #[test]
    fn test_len_shrinks_as_rows_are_consumed() {
        let mut iter = IdIterator::new(rows());
        assert_eq!(iter.len(), 2);
        iter.next();
        assert_eq!(iter.len(), 1);
    }
}
