//! Index arithmetic and silent sifting over an array-backed binary heap.
//!
//! Nothing in here records steps. These are the moves the engine replays
//! one at a time, and the only moves used when building a heap up front.

use crate::Entity;

#[inline]
pub(crate) fn parent(pos: usize) -> usize {
    (pos - 1) / 2
}

#[inline]
pub(crate) fn left(pos: usize) -> usize {
    2 * pos + 1
}

#[inline]
pub(crate) fn right(pos: usize) -> usize {
    2 * pos + 2
}

/// Position of the heaviest child of `pos` that is strictly heavier than
/// the element at `pos`, if any. Left wins a tie between the two children.
pub(crate) fn heavier_child(v: &[Entity], pos: usize) -> Option<usize> {
    let mut largest = pos;
    for child in [left(pos), right(pos)] {
        if child < v.len() && v[child].heavier_than(&v[largest]) {
            largest = child;
        }
    }
    (largest != pos).then_some(largest)
}

/// Take an element at `pos` and move it down the heap,
/// while one of its children is heavier.
pub(crate) fn sift_down(v: &mut [Entity], pos: usize) -> usize {
    let mut hole = Hole::new(v, pos);

    while let Some(child) = heavier_child(&*hole.data, hole.pos()) {
        hole.move_to(child);
    }

    hole.pos()
}

/// Bottom-up heap construction: sift down every internal node from
/// `n / 2 - 1` back to the root.
pub(crate) fn rebuild(v: &mut [Entity]) {
    let mut n = v.len() / 2;
    while n > 0 {
        n -= 1;
        sift_down(v, n);
    }
}

/// Whether every element weighs no more than its parent.
pub fn is_max_heap(v: &[Entity]) -> bool {
    (1..v.len()).all(|i| !v[i].heavier_than(&v[parent(i)]))
}

/// The element being sifted and the slot it currently occupies.
struct Hole<'a> {
    data: &'a mut [Entity],
    pos: usize,
}

impl<'a> Hole<'a> {
    #[inline]
    fn new(data: &'a mut [Entity], pos: usize) -> Self {
        debug_assert!(pos < data.len());
        Hole { data, pos }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    /// Swap the element into `index`.
    #[inline]
    fn move_to(&mut self, index: usize) {
        self.data.swap(index, self.pos);
        self.pos = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(weights: &[f64]) -> Vec<Entity> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Entity::new(i as u64 + 1, w).unwrap())
            .collect()
    }

    #[test]
    fn index_arithmetic() {
        assert_eq!(left(0), 1);
        assert_eq!(right(0), 2);
        assert_eq!(parent(1), 0);
        assert_eq!(parent(2), 0);
        assert_eq!(parent(5), 2);
        assert_eq!(parent(6), 2);
    }

    #[test]
    fn rebuild_makes_a_heap() {
        let mut v = people(&[50.0, 30.0, 70.0, 20.0]);
        rebuild(&mut v);
        assert!(is_max_heap(&v));
        assert_eq!(v[0].weight(), 70.0);
    }

    #[test]
    fn sift_down_returns_final_position() {
        let mut v = people(&[10.0, 40.0, 30.0, 35.0]);
        assert_eq!(sift_down(&mut v, 0), 3);
        assert_eq!(v[0].weight(), 40.0);
        assert_eq!(v[1].weight(), 35.0);
        assert!(is_max_heap(&v));
    }

    #[test]
    fn rebuild_handles_tiny_inputs() {
        let mut empty: Vec<Entity> = vec![];
        rebuild(&mut empty);
        assert!(is_max_heap(&empty));

        let mut one = people(&[9.0]);
        rebuild(&mut one);
        assert_eq!(one[0].weight(), 9.0);
    }

    #[test]
    fn heavier_child_prefers_left_on_tie() {
        let v = people(&[10.0, 30.0, 30.0]);
        assert_eq!(heavier_child(&v, 0), Some(1));
        let v = people(&[30.0, 30.0, 30.0]);
        assert_eq!(heavier_child(&v, 0), None);
    }
}
