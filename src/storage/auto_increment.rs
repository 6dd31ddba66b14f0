/// Per-table AUTO_INCREMENT counter.
///
/// Values are handed out in strictly increasing order and never reused, even
/// after the row holding the largest value is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoIncrement {
    next: i64,
}

impl AutoIncrement {
    pub const DEFAULT_START: i64 = 1;

    #[must_use]
    pub const fn starting_at(start: i64) -> Self {
        Self { next: start }
    }

    /// Value the next generated id will take.
    #[must_use]
    pub const fn peek(&self) -> i64 {
        self.next
    }

    pub const fn allocate(&mut self) -> i64 {
        let value = self.next;
        self.next = self.next.saturating_add(1);
        value
    }

    /// Account for an explicitly supplied id so later allocations stay above it.
    pub const fn observe(&mut self, explicit: i64) {
        if explicit >= self.next {
            self.next = explicit.saturating_add(1);
        }
    }
}

impl Default for AutoIncrement {
    fn default() -> Self {
        Self::starting_at(Self::DEFAULT_START)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_monotonic() {
        let mut counter = AutoIncrement::default();
        assert_eq!(counter.allocate(), 1);
        assert_eq!(counter.allocate(), 2);
        assert_eq!(counter.peek(), 3);
    }

    #[test]
    fn test_custom_start() {
        let mut counter = AutoIncrement::starting_at(100);
        assert_eq!(counter.allocate(), 100);
    }

    #[test]
    fn test_observe_explicit_values() {
        let mut counter = AutoIncrement::default();
        counter.observe(10);
        assert_eq!(counter.allocate(), 11);
        // smaller explicit ids never move the counter backwards
        counter.observe(3);
        assert_eq!(counter.allocate(), 12);
    }
}
