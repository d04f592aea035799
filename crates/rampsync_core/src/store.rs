//! Parameter arena, generation-checked handles and the per-call edit context.

use crate::models::point::RampValue;
use crate::parameter::RampParameter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifies the asset component that owns (and cooks) a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u32);

/// Non-owning reference to a parameter in a [`RampStore`].
///
/// A handle goes stale when its parameter is removed; the slot's generation is
/// bumped so a later occupant never answers to the old handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RampHandle {
    index: u32,
    generation: u32,
}

/// Answers whether an asset's cook is currently running.
pub trait CookMonitor {
    fn is_mid_cook(&self, asset: AssetId) -> bool;
}

/// Monitor for callers that never cook while editing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl CookMonitor for Idle {
    fn is_mid_cook(&self, _asset: AssetId) -> bool {
        false
    }
}

impl CookMonitor for HashSet<AssetId> {
    fn is_mid_cook(&self, asset: AssetId) -> bool {
        self.contains(&asset)
    }
}

static IDLE: Idle = Idle;

/// Snapshot of the engine state taken once per edit call.
#[derive(Clone, Copy)]
pub struct EditContext<'a> {
    cooking_enabled: bool,
    monitor: &'a dyn CookMonitor,
}

impl EditContext<'static> {
    /// Context with no cook in progress anywhere.
    pub fn new(cooking_enabled: bool) -> Self {
        Self {
            cooking_enabled,
            monitor: &IDLE,
        }
    }
}

impl<'a> EditContext<'a> {
    pub fn with_monitor(cooking_enabled: bool, monitor: &'a dyn CookMonitor) -> Self {
        Self {
            cooking_enabled,
            monitor,
        }
    }

    pub fn cooking_enabled(&self) -> bool {
        self.cooking_enabled
    }

    pub fn is_mid_cook(&self, asset: AssetId) -> bool {
        self.monitor.is_mid_cook(asset)
    }
}

impl std::fmt::Debug for EditContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditContext")
            .field("cooking_enabled", &self.cooking_enabled)
            .finish_non_exhaustive()
    }
}

struct Slot<V> {
    generation: u32,
    parameter: Option<RampParameter<V>>,
}

/// Arena owning the ramp parameters of one or more asset components.
pub struct RampStore<V> {
    slots: Vec<Slot<V>>,
    free: Vec<u32>,
}

impl<V> Default for RampStore<V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<V: RampValue> RampStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `parameter` and return its handle.
    pub fn insert(&mut self, parameter: RampParameter<V>) -> RampHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.parameter = Some(parameter);
            return RampHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            parameter: Some(parameter),
        });
        RampHandle {
            index,
            generation: 0,
        }
    }

    /// Drop the parameter behind `handle`, invalidating the handle.
    pub fn remove(&mut self, handle: RampHandle) -> Option<RampParameter<V>> {
        let slot = self.slot_mut(handle)?;
        let parameter = slot.parameter.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(parameter)
    }

    pub fn is_live(&self, handle: RampHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: RampHandle) -> Option<&RampParameter<V>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.parameter.as_ref())
    }

    pub fn get_mut(&mut self, handle: RampHandle) -> Option<&mut RampParameter<V>> {
        self.slot_mut(handle)?.parameter.as_mut()
    }

    fn slot_mut(&mut self, handle: RampHandle) -> Option<&mut Slot<V>> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
    }

    /// Number of live parameters.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.parameter.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of every live parameter, in slot order.
    pub fn handles(&self) -> Vec<RampHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Iterate live parameters with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (RampHandle, &RampParameter<V>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.parameter.as_ref().map(|parameter| {
                (
                    RampHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    parameter,
                )
            })
        })
    }
}
