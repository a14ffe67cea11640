use super::{FileRecord, ReviewStatus};

#[derive(Debug, Clone)]
struct QueueEntry {
    record: FileRecord,
    status: ReviewStatus,
}

/// Ordered, cursor-addressed list of files awaiting a decision.
///
/// The cursor always points at a record that is still present, or the queue is
/// empty and the cursor is 0. Every operation is total.
#[derive(Debug, Clone, Default)]
pub struct ReviewQueue {
    entries: Vec<QueueEntry>,
    cursor: usize,
}

impl ReviewQueue {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self {
            entries: records
                .into_iter()
                .map(|record| QueueEntry {
                    record,
                    status: ReviewStatus::Pending,
                })
                .collect(),
            cursor: 0,
        }
    }

    pub fn current(&self) -> Option<&FileRecord> {
        self.entries.get(self.cursor).map(|e| &e.record)
    }

    pub fn status_of_current(&self) -> Option<ReviewStatus> {
        self.entries.get(self.cursor).map(|e| e.status)
    }

    pub fn advance(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn retreat(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Removes the current record. The cursor stays on the same index, which now
    /// holds the following record, or steps back when the last one was removed.
    pub fn remove_current(&mut self) -> Option<FileRecord> {
        if self.entries.is_empty() {
            return None;
        }
        let removed = self.entries.remove(self.cursor);
        self.clamp_cursor();
        Some(removed.record)
    }

    /// Marks the current record as kept and moves on
    pub fn mark_kept(&mut self) -> Option<&FileRecord> {
        let entry = self.entries.get_mut(self.cursor)?;
        entry.status = ReviewStatus::Kept;
        let index = self.cursor;
        self.advance();
        self.entries.get(index).map(|e| &e.record)
    }

    /// Drops records whose file no longer exists on disk.
    ///
    /// Returns how many were dropped. The cursor stays on the same record if it
    /// survived, otherwise on the record that now occupies its slot.
    pub fn prune_missing(&mut self) -> usize {
        let before = self.entries.len();
        let mut index = 0;
        let mut cursor = self.cursor;
        self.entries.retain(|entry| {
            let keep = entry.record.path.exists();
            if !keep && index < self.cursor {
                cursor -= 1;
            }
            index += 1;
            keep
        });
        self.cursor = cursor;
        self.clamp_cursor();
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 1-based position of the cursor, 0 when empty
    pub fn position(&self) -> usize {
        if self.entries.is_empty() {
            0
        } else {
            self.cursor + 1
        }
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == ReviewStatus::Pending)
            .count()
    }

    /// True once nothing is left awaiting a decision
    pub fn is_complete(&self) -> bool {
        self.pending_count() == 0
    }

    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.entries.len() {
            self.cursor = self.entries.len().saturating_sub(1);
        }
    }
}
