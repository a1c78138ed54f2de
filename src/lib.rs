//! A binary max-heap whose operations come back as replayable steps.
//!
//! Building a heap is silent. Inserting and extracting return every
//! intermediate state as an owned [`Step`], and [`sort_with_steps`] chains
//! extractions into one sequence annotated with the sorted output so far.

mod binaryheap;
mod config;
pub mod dataset;
mod entity;
mod error;
mod heap;
pub mod player;
mod session;
mod sort;
mod step;

pub use binaryheap::is_max_heap;
pub use config::{Config, Speed, Verbosity};
pub use entity::{Entity, PersonId};
pub use error::{Error, Result};
pub use heap::MaxHeap;
pub use session::Session;
pub use sort::{preview_sorted, sort_with_steps, SortRun};
pub use step::{DisplayState, Slot, Step, StepKind};
