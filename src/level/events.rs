/// Fixed-size ring of the most recent event lines. Once full, each push
/// overwrites the oldest entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventLog {
    slots: Vec<Option<String>>,
    cursor: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.slots[self.cursor] = Some(entry.into());
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let (newer, older) = self.slots.split_at(self.cursor);
        older
            .iter()
            .chain(newer)
            .filter_map(|slot| slot.as_deref())
    }

    pub fn latest(&self) -> Option<&str> {
        let idx = (self.cursor + self.slots.len() - 1) % self.slots.len();
        self.slots[idx].as_deref()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.iter().any(|line| line == entry)
    }
}
