use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{config::Verbosity, Entity};

/// How a slot should be drawn for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    #[default]
    Normal,
    /// Logically vacated, still occupying its array position.
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub entity: Entity,
    pub state: DisplayState,
}

impl Slot {
    pub fn is_ghost(&self) -> bool {
        self.state == DisplayState::Ghost
    }
}

impl From<Entity> for Slot {
    fn from(entity: Entity) -> Self {
        Slot {
            entity,
            state: DisplayState::Normal,
        }
    }
}

/// What a step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A new entity placed at the end of the array.
    Append,
    /// A node and the neighbours it is being weighed against.
    Compare,
    /// The two positions about to be exchanged.
    Select,
    /// State right after an exchange.
    Swap,
    /// The sifted entity has found its place.
    Settle,
    /// The root chosen for extraction.
    Target,
    /// The root has left; its slot is a ghost.
    Extract,
    /// The last entity chosen to fill the root.
    Fill,
    /// The last entity now sits at the root, array shrunk by one.
    Promote,
}

/// One frame of an engine operation. Owns its snapshot outright, so any
/// number of steps can be held at once and replayed in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    pub snapshot: Vec<Slot>,
    pub highlighted: BTreeSet<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<Entity>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted_so_far: Option<Vec<Entity>>,
}

impl Step {
    /// Entities in array order, ghosts left out.
    pub fn entities(&self) -> Vec<Entity> {
        self.snapshot
            .iter()
            .filter(|s| !s.is_ghost())
            .map(|s| s.entity)
            .collect()
    }

    pub fn ghost_positions(&self) -> Vec<usize> {
        self.snapshot
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_ghost())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_highlighted(&self, pos: usize) -> bool {
        self.highlighted.contains(&pos)
    }
}

/// Collects the steps of a single engine call.
pub(crate) struct Recorder {
    verbosity: Verbosity,
    steps: Vec<Step>,
}

impl Recorder {
    pub(crate) fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            steps: Vec::new(),
        }
    }

    /// Whether steps of `kind` are kept under the current verbosity.
    /// Structural steps are always kept.
    pub(crate) fn wants(&self, kind: StepKind) -> bool {
        match kind {
            StepKind::Compare => self.verbosity != Verbosity::Compact,
            StepKind::Select => self.verbosity == Verbosity::Selection,
            _ => true,
        }
    }

    pub(crate) fn record(
        &mut self,
        kind: StepKind,
        heap: &[Entity],
        highlighted: impl IntoIterator<Item = usize>,
        description: impl FnOnce() -> String,
    ) {
        if !self.wants(kind) {
            return;
        }
        self.push(Step {
            kind,
            snapshot: heap.iter().copied().map(Slot::from).collect(),
            highlighted: highlighted.into_iter().collect(),
            extracted: None,
            description: description(),
            sorted_so_far: None,
        });
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(crate) fn finish(self) -> Vec<Step> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<Slot> {
        let mut v: Vec<Slot> = [(1, 70.0), (2, 50.0), (3, 30.0)]
            .into_iter()
            .map(|(id, w)| Entity::new(id, w).unwrap().into())
            .collect();
        v[0].state = DisplayState::Ghost;
        v
    }

    #[test]
    fn entities_skip_ghosts() {
        let step = Step {
            kind: StepKind::Extract,
            snapshot: slots(),
            highlighted: BTreeSet::new(),
            extracted: None,
            description: String::new(),
            sorted_so_far: None,
        };
        let ids: Vec<u64> = step.entities().iter().map(|e| e.id().0).collect();
        assert_eq!(ids, [2, 3]);
        assert_eq!(step.ghost_positions(), [0]);
    }

    #[test]
    fn compact_drops_compare_steps() {
        let heap = [Entity::new(1, 10.0).unwrap()];
        let mut rec = Recorder::new(Verbosity::Compact);
        rec.record(StepKind::Compare, &heap, [0], || "cmp".into());
        rec.record(StepKind::Select, &heap, [0], || "sel".into());
        rec.record(StepKind::Settle, &heap, [0], || "done".into());
        let steps = rec.finish();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Settle);
    }

    #[test]
    fn serialized_step_omits_absent_fields() {
        let heap = [Entity::new(1, 10.0).unwrap()];
        let mut rec = Recorder::new(Verbosity::Detailed);
        rec.record(StepKind::Append, &heap, [0], || "added".into());
        let json = serde_json::to_value(&rec.finish()[0]).unwrap();
        assert_eq!(json["kind"], "append");
        assert!(json.get("extracted").is_none());
        assert!(json.get("sorted_so_far").is_none());
    }
}
