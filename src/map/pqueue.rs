/// Binary min-heap keyed by an integer priority. Equal priorities pop in
/// insertion order.
#[derive(Clone, Debug)]
pub struct PriorityQueue<T> {
    heap: Vec<Entry<T>>,
    pushed: u64,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    priority: i32,
    order: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (i32, u64) {
        (self.priority, self.order)
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            pushed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn peek_priority(&self) -> Option<i32> {
        self.heap.first().map(|entry| entry.priority)
    }

    pub fn push(&mut self, item: T, priority: i32) {
        let order = self.pushed;
        self.pushed += 1;
        self.heap.push(Entry {
            priority,
            order,
            item,
        });
        self.sift_up(self.heap.len() - 1);
    }

    /// Returns `None` once the queue is drained.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(entry.item)
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].key() >= self.heap[parent].key() {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = idx * 2 + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.heap[left].key() < self.heap[smallest].key() {
                smallest = left;
            }
            if right < len && self.heap[right].key() < self.heap[smallest].key() {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_geometry::prelude::Point;
    use proptest::prelude::*;

    #[test]
    fn pops_lowest_priority_first() {
        let mut pq = PriorityQueue::new();
        assert!(pq.is_empty());

        pq.push(Point::new(1, 1), 5);
        assert_eq!(pq.len(), 1);
        pq.push(Point::new(2, 2), 3);
        assert_eq!(pq.peek_priority(), Some(3));

        assert_eq!(pq.pop(), Some(Point::new(2, 2)));
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.pop(), Some(Point::new(1, 1)));
        assert!(pq.is_empty());
    }

    #[test]
    fn popping_empty_queue_signals_none() {
        let mut pq: PriorityQueue<Point> = PriorityQueue::new();
        assert_eq!(pq.pop(), None);
        assert_eq!(pq.pop(), None);
    }

    #[test]
    fn equal_priorities_are_fifo() {
        let mut pq = PriorityQueue::new();
        for label in ["a", "b", "c", "d"] {
            pq.push(label, 7);
        }
        pq.push("first", 1);
        let drained: Vec<_> = std::iter::from_fn(|| pq.pop()).collect();
        assert_eq!(drained, vec!["first", "a", "b", "c", "d"]);
    }

    proptest! {
        #[test]
        fn drains_in_sorted_order(priorities in proptest::collection::vec(-50i32..50, 0..64)) {
            let mut pq = PriorityQueue::new();
            for (idx, priority) in priorities.iter().enumerate() {
                pq.push((*priority, idx), *priority);
            }
            let drained: Vec<(i32, usize)> = std::iter::from_fn(|| pq.pop()).collect();
            let mut expected: Vec<(i32, usize)> =
                priorities.iter().copied().enumerate().map(|(idx, p)| (p, idx)).collect();
            expected.sort();
            prop_assert_eq!(drained, expected);
        }
    }
}
