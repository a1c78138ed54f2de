use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::{
    dataset::{self, IdAllocator},
    sort::{self, SortRun},
    Config, Entity, Error, MaxHeap, PersonId, Result, Step,
};

/// A heap together with everything the caller needs around it: weight
/// limits, id assignment and the people extracted so far.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    heap: MaxHeap,
    ids: IdAllocator,
    sorted: Vec<Entity>,
}

impl Session {
    /// Starts from a seeded roster of `config.initial_people` people.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let people = dataset::generate(
            config.initial_people,
            1,
            config.seed,
            dataset::weights_up_to(config.max_weight),
        )?;
        Self::with_people(config, people)
    }

    pub fn with_people(config: Config, people: Vec<Entity>) -> Result<Self> {
        config.validate()?;
        let ids = check_people(&people, config.max_weight)?;
        info!(n = people.len(), next_id = %ids.peek(), "session_start");
        Ok(Self {
            heap: MaxHeap::with_verbosity(people, config.verbosity),
            ids,
            sorted: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn heap(&self) -> &MaxHeap {
        &self.heap
    }

    /// People extracted since the last [`Session::sort_all`] or
    /// [`Session::reset`], heaviest first. After a full sort this is the
    /// sort's output.
    pub fn sorted(&self) -> &[Entity] {
        &self.sorted
    }

    pub fn next_id(&self) -> PersonId {
        self.ids.peek()
    }

    /// Validates `weight` against the configured limit, assigns the next id
    /// and inserts. Nothing changes if the weight is rejected.
    pub fn add_person(&mut self, weight: f64) -> Result<(PersonId, Vec<Step>)> {
        let person = Entity::with_limit(self.ids.peek().0, weight, self.config.max_weight)?;
        let id = self.ids.next_id()?;
        let steps = self.heap.insert(person);
        debug!(%id, weight, steps = steps.len(), "add_person");
        Ok((id, steps))
    }

    pub fn extract_one(&mut self) -> Vec<Step> {
        let steps = self.heap.extract_max();
        self.sorted.extend(steps.iter().filter_map(|s| s.extracted));
        steps
    }

    /// Sorts everything left in the heap, which is empty afterwards. The
    /// sorted list starts over, so it always matches the `sorted_so_far` of
    /// the run's last step.
    pub fn sort_all(&mut self) -> SortRun {
        let heap = std::mem::replace(
            &mut self.heap,
            MaxHeap::with_verbosity(Vec::new(), self.config.verbosity),
        );
        let run = sort::drain(heap);
        self.sorted.clone_from(&run.sorted);
        run
    }

    /// What [`Session::sort_all`] would produce, leaving the heap as it is.
    pub fn preview(&self) -> Vec<Entity> {
        sort::preview_sorted(&self.heap)
    }

    /// Replaces the heap contents and forgets the sorted list. Ids keep
    /// counting up from wherever they were.
    pub fn reset(&mut self, people: Vec<Entity>) -> Result<()> {
        let ids = check_people(&people, self.config.max_weight)?;
        if ids.peek() > self.ids.peek() {
            self.ids = ids;
        }
        self.heap = MaxHeap::with_verbosity(people, self.config.verbosity);
        self.sorted.clear();
        Ok(())
    }
}

/// Rejects over-limit weights and repeated ids, and returns an allocator
/// starting after the largest id.
fn check_people(people: &[Entity], max_weight: f64) -> Result<IdAllocator> {
    let mut seen = BTreeSet::new();
    for person in people {
        Entity::with_limit(person.id().0, person.weight(), max_weight)?;
        if !seen.insert(person.id()) {
            return Err(Error::DuplicateId(person.id()));
        }
    }
    IdAllocator::after(&seen)
}
