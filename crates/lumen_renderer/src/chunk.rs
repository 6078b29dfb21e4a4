//! Column chunks: the unit of work handed to one render worker.

use std::ops::Range;

/// A contiguous range of framebuffer columns owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChunk {
    /// Index of this chunk, equal to the owning worker's id
    pub index: usize,
    pub columns: Range<u32>,
}

impl ColumnChunk {
    pub fn width(&self) -> u32 {
        self.columns.end - self.columns.start
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Split `width` columns into `count` chunks of `width / count` columns.
///
/// The last chunk absorbs the remainder. When there are more chunks than
/// columns the leading chunks are empty.
pub fn split_columns(width: u32, count: usize) -> Vec<ColumnChunk> {
    let count = count.max(1);
    let base = width / count as u32;

    (0..count)
        .map(|index| {
            let start = base * index as u32;
            let end = if index + 1 == count { width } else { start + base };
            ColumnChunk {
                index,
                columns: start..end,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(chunks: &[ColumnChunk], width: u32) {
        let mut next = 0;
        for chunk in chunks {
            assert_eq!(chunk.columns.start, next);
            next = chunk.columns.end;
        }
        assert_eq!(next, width);
    }

    #[test]
    fn test_split_even() {
        let chunks = split_columns(640, 4);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.width() == 160));
        assert_covers(&chunks, 640);
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let chunks = split_columns(10, 3);
        assert_eq!(chunks[0].columns, 0..3);
        assert_eq!(chunks[1].columns, 3..6);
        assert_eq!(chunks[2].columns, 6..10);
        assert_covers(&chunks, 10);
    }

    #[test]
    fn test_more_chunks_than_columns() {
        let chunks = split_columns(3, 8);
        assert_eq!(chunks.len(), 8);
        assert!(chunks[..7].iter().all(|c| c.is_empty()));
        assert_eq!(chunks[7].columns, 0..3);
        assert_covers(&chunks, 3);
    }

    #[test]
    fn test_zero_count_is_one_chunk() {
        let chunks = split_columns(5, 0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].columns, 0..5);
    }
}
