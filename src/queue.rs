use parking_lot::Mutex;

/// Hands out input units to mapper workers, one at a time, in list order.
pub struct WorkQueue<'a, S> {
    units: &'a [S],
    next: Mutex<usize>,
}

impl<'a, S: AsRef<str>> WorkQueue<'a, S> {
    pub fn new(units: &'a [S]) -> Self {
        Self {
            units,
            next: Mutex::new(0),
        }
    }

    /// Claims the next unprocessed unit, or `None` once every unit is taken.
    pub fn claim_next(&self) -> Option<&'a str> {
        let mut next = self.next.lock();
        let unit = self.units.get(*next)?;
        *next += 1;
        Some(unit.as_ref())
    }

    pub fn claimed(&self) -> usize {
        *self.next.lock()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
