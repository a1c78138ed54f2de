use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{
    binaryheap::{self, heavier_child, left, parent, right},
    config::Verbosity,
    step::{DisplayState, Recorder, Slot, Step, StepKind},
    Entity,
};

/// Array-backed binary max-heap whose mutating operations return the
/// steps they went through.
///
/// Between operations the array always satisfies the max-heap property.
/// Inside a returned step sequence it may not; that is what the steps show.
#[derive(Debug, Clone, Default)]
pub struct MaxHeap {
    data: Vec<Entity>,
    verbosity: Verbosity,
}

/// Where the sift-down of an extraction currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiftState {
    Comparing(usize),
    Swapping { parent: usize, child: usize },
    Settled(usize),
}

impl MaxHeap {
    /// Builds a heap from arbitrary input, bottom-up. No steps are recorded.
    pub fn new(entities: impl IntoIterator<Item = Entity>) -> Self {
        Self::with_verbosity(entities, Verbosity::default())
    }

    pub fn with_verbosity(entities: impl IntoIterator<Item = Entity>, verbosity: Verbosity) -> Self {
        let mut data: Vec<Entity> = entities.into_iter().collect();
        binaryheap::rebuild(&mut data);
        debug!(len = data.len(), ?verbosity, "build_heap");
        Self { data, verbosity }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A copy of the current array. Never the live storage.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.data.clone()
    }

    pub fn peek(&self) -> Option<Entity> {
        self.data.first().copied()
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.data
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Appends `entity` and sifts it up, strictly heavier than its parent
    /// being the only reason to rise.
    pub fn insert(&mut self, entity: Entity) -> Vec<Step> {
        let mut rec = Recorder::new(self.verbosity);

        self.data.push(entity);
        let mut pos = self.data.len() - 1;
        rec.record(StepKind::Append, &self.data, [pos], || {
            format!("Added {entity} at position {pos}")
        });

        while pos > 0 {
            let up = parent(pos);
            let (child, above) = (self.data[pos], self.data[up]);
            if !child.heavier_than(&above) {
                break;
            }

            rec.record(StepKind::Compare, &self.data, [pos, up], || {
                format!(
                    "Comparing child weight {} with parent weight {}",
                    child.weight(),
                    above.weight()
                )
            });
            rec.record(StepKind::Select, &self.data, [pos, up], || {
                format!("Child weight {} is heavier, swapping upward", child.weight())
            });

            self.data.swap(pos, up);
            trace!(from = pos, to = up, id = %entity.id(), "sift_up");
            pos = up;

            rec.record(StepKind::Swap, &self.data, [pos], || {
                format!("Swapped: person {} moved up to position {pos}", entity.id())
            });
        }

        rec.record(StepKind::Settle, &self.data, [pos], || {
            format!("Person {} settles at position {pos}", entity.id())
        });

        debug_assert!(binaryheap::is_max_heap(&self.data));
        debug!(id = %entity.id(), weight = entity.weight(), pos, len = self.data.len(), "insert");
        rec.finish()
    }

    /// Removes the root. Exactly one of the returned steps carries the
    /// removed entity in [`Step::extracted`]. An empty heap yields no steps.
    pub fn extract_max(&mut self) -> Vec<Step> {
        let mut rec = Recorder::new(self.verbosity);

        let Some(&root) = self.data.first() else {
            return Vec::new();
        };

        if self.data.len() == 1 {
            self.data.clear();
            rec.push(Step {
                kind: StepKind::Extract,
                snapshot: Vec::new(),
                highlighted: BTreeSet::new(),
                extracted: Some(root),
                description: format!("Extracted the last remaining {root}"),
                sorted_so_far: None,
            });
            debug!(id = %root.id(), len = 0, "extract_max");
            return rec.finish();
        }

        let last_pos = self.data.len() - 1;
        let last = self.data[last_pos];

        rec.record(StepKind::Target, &self.data, [0], || {
            format!("Selecting root {root} for extraction")
        });

        let ghosted: Vec<Slot> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &entity)| Slot {
                entity,
                state: if i == 0 {
                    DisplayState::Ghost
                } else {
                    DisplayState::Normal
                },
            })
            .collect();
        rec.push(Step {
            kind: StepKind::Extract,
            snapshot: ghosted.clone(),
            highlighted: BTreeSet::new(),
            extracted: Some(root),
            description: format!("Root person {} extracted, the root slot is empty", root.id()),
            sorted_so_far: None,
        });
        rec.push(Step {
            kind: StepKind::Fill,
            snapshot: ghosted,
            highlighted: BTreeSet::from([last_pos]),
            extracted: None,
            description: format!("Last element {last} will move to the root"),
            sorted_so_far: None,
        });

        self.data.swap_remove(0);
        rec.record(StepKind::Promote, &self.data, [0], || {
            format!("{last} moved to the root position")
        });

        let settled = self.sift_down_with_steps(&mut rec, 0);

        debug_assert!(binaryheap::is_max_heap(&self.data));
        debug!(id = %root.id(), settled, len = self.data.len(), "extract_max");
        rec.finish()
    }

    fn sift_down_with_steps(&mut self, rec: &mut Recorder, start: usize) -> usize {
        let mut state = SiftState::Comparing(start);
        loop {
            state = match state {
                SiftState::Comparing(pos) => self.compare_children(rec, pos),
                SiftState::Swapping { parent, child } => {
                    rec.record(StepKind::Select, &self.data, [parent, child], || {
                        format!(
                            "{} is heavier, will swap with {}",
                            self.data[child], self.data[parent]
                        )
                    });
                    self.data.swap(parent, child);
                    trace!(from = parent, to = child, "sift_down");
                    rec.record(StepKind::Swap, &self.data, [parent, child], || {
                        format!("Swapped positions {parent} and {child}")
                    });
                    SiftState::Comparing(child)
                }
                SiftState::Settled(pos) => return pos,
            };
        }
    }

    fn compare_children(&self, rec: &mut Recorder, pos: usize) -> SiftState {
        let node = self.data[pos];
        let children: Vec<usize> = [left(pos), right(pos)]
            .into_iter()
            .filter(|&c| c < self.data.len())
            .collect();

        if children.is_empty() {
            rec.record(StepKind::Settle, &self.data, [pos], || {
                format!("No children to compare, {node} is in place")
            });
            return SiftState::Settled(pos);
        }

        rec.record(
            StepKind::Compare,
            &self.data,
            std::iter::once(pos).chain(children.iter().copied()),
            || {
                let mut text = format!("Comparing parent {node}");
                for (side, &c) in ["left", "right"].iter().zip(&children) {
                    text.push_str(&format!(" with {side} {}", self.data[c]));
                }
                text
            },
        );

        match heavier_child(&self.data, pos) {
            Some(child) => SiftState::Swapping { parent: pos, child },
            None => {
                rec.record(StepKind::Settle, &self.data, [pos], || {
                    format!("{node} is at least as heavy as its children, in place")
                });
                SiftState::Settled(pos)
            }
        }
    }
}
