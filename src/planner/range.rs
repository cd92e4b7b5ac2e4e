/// A half-open, directional interval over message ids
///
/// `ascending(start, stop)` yields `start, start+1, ..., stop-1`;
/// `descending(start, stop)` yields `start, start-1, ..., stop+1`. The
/// excluded bound on the far side makes both directions compose cleanly
/// with the planner's `max+1` / `min-1` frontier arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRange {
    next: u64,
    stop: u64,
    descending: bool,
}

impl ScanRange {
    pub fn ascending(start: u64, stop: u64) -> Self {
        Self {
            next: start,
            stop,
            descending: false,
        }
    }

    pub fn descending(start: u64, stop: u64) -> Self {
        Self {
            next: start,
            stop,
            descending: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        if self.descending {
            self.next <= self.stop
        } else {
            self.next >= self.stop
        }
    }

    /// Number of ids remaining
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else if self.descending {
            self.next - self.stop
        } else {
            self.stop - self.next
        }
    }

    /// First and last id that will be yielded, for logging; `None` when empty
    pub fn bounds(&self) -> Option<(u64, u64)> {
        if self.is_empty() {
            None
        } else if self.descending {
            Some((self.next, self.stop + 1))
        } else {
            Some((self.next, self.stop - 1))
        }
    }
}

impl Iterator for ScanRange {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        let id = self.next;
        if self.descending {
            self.next -= 1;
        } else {
            self.next += 1;
        }
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len() as usize;
        (len, Some(len))
    }
}
