//! Modification events queued for the engine.
//!
//! Edits made while a parameter is live cannot be written into its point list:
//! the next cook overwrites that list wholesale. They are queued here instead
//! and applied by the cook driver, which drains the log once uploaded.

use crate::models::interpolation::InterpolationKind;
use serde::{Deserialize, Serialize};

/// A queued insert or delete of one ramp point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModificationEvent<V> {
    Insert {
        position: f32,
        value: V,
        interpolation: InterpolationKind,
    },
    Delete {
        instance_index: i32,
    },
}

impl<V> ModificationEvent<V> {
    pub fn is_insert(&self) -> bool {
        matches!(self, ModificationEvent::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, ModificationEvent::Delete { .. })
    }
}

/// Number of pending inserts and deletes in a log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingEventCounts {
    pub inserts: usize,
    pub deletes: usize,
}

impl PendingEventCounts {
    /// Classify every event of `events`.
    pub fn of<V>(events: &[ModificationEvent<V>]) -> Self {
        events.iter().fold(Self::default(), |mut counts, event| {
            match event {
                ModificationEvent::Insert { .. } => counts.inserts += 1,
                ModificationEvent::Delete { .. } => counts.deletes += 1,
            }
            counts
        })
    }
}
