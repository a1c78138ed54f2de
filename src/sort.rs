use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{binaryheap, config::Verbosity, Entity, MaxHeap, Step};

/// The outcome of a full heap sort: the entities heaviest first, and every
/// step of every extraction in the order they happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortRun {
    pub sorted: Vec<Entity>,
    pub steps: Vec<Step>,
}

/// Heap-sorts `entities` by repeated extraction.
///
/// Each step is stamped with the sorted output as it stood right after that
/// step, so the step carrying an extraction already lists it.
pub fn sort_with_steps(entities: impl IntoIterator<Item = Entity>, verbosity: Verbosity) -> SortRun {
    drain(MaxHeap::with_verbosity(entities, verbosity))
}

pub(crate) fn drain(mut heap: MaxHeap) -> SortRun {
    let mut run = SortRun {
        sorted: Vec::with_capacity(heap.len()),
        steps: Vec::new(),
    };

    while !heap.is_empty() {
        for mut step in heap.extract_max() {
            if let Some(entity) = step.extracted {
                run.sorted.push(entity);
            }
            step.sorted_so_far = Some(run.sorted.clone());
            run.steps.push(step);
        }
    }

    info!(n = run.sorted.len(), steps = run.steps.len(), "sort_with_steps");
    run
}

/// The order a full sort of `heap` would produce, without touching `heap`
/// and without keeping any steps.
pub fn preview_sorted(heap: &MaxHeap) -> Vec<Entity> {
    let mut data = heap.snapshot();
    let mut out = Vec::with_capacity(data.len());
    while !data.is_empty() {
        out.push(data.swap_remove(0));
        if !data.is_empty() {
            binaryheap::sift_down(&mut data, 0);
        }
    }
    out
}
