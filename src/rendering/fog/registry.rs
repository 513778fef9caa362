/// Fog Registry Module
/// Fixed table of fog slots and the active fog selection

use bevy::prelude::*;

use super::definition::{FogDefinition, FogParameters, FogSlot, FogTransition, FOG_SLOT_COUNT};

#[derive(Debug, Clone)]
pub struct FogRegistry {
    slots: [FogDefinition; FOG_SLOT_COUNT],
    active: Option<FogSlot>,
}

impl Default for FogRegistry {
    fn default() -> Self {
        Self {
            slots: [FogDefinition::default(); FOG_SLOT_COUNT],
            active: None,
        }
    }
}

impl FogRegistry {
    pub fn get(&self, slot: FogSlot) -> Option<&FogDefinition> {
        self.slots.get(slot.table_index())
    }

    fn get_mut(&mut self, slot: FogSlot) -> Option<&mut FogDefinition> {
        self.slots.get_mut(slot.table_index())
    }

    pub fn current(&self) -> &FogDefinition {
        &self.slots[FogSlot::Current.table_index()]
    }

    pub fn last(&self) -> &FogDefinition {
        &self.slots[FogSlot::Last.table_index()]
    }

    pub fn target(&self) -> &FogDefinition {
        &self.slots[FogSlot::Target.table_index()]
    }

    pub(crate) fn current_mut(&mut self) -> &mut FogDefinition {
        &mut self.slots[FogSlot::Current.table_index()]
    }

    pub(crate) fn target_mut(&mut self) -> &mut FogDefinition {
        &mut self.slots[FogSlot::Target.table_index()]
    }

    pub fn active(&self) -> Option<FogSlot> {
        self.active
    }

    /// Defines or overwrites the static parameters of `slot`.
    ///
    /// A zero near and far plane unregisters the slot instead.
    pub fn set_fog_parameters(&mut self, slot: FogSlot, params: &FogParameters, identity_light: f32) {
        let Some(fog) = self.get_mut(slot) else {
            debug!("Ignoring fog parameters for out of range slot {:?}", slot);
            return;
        };

        if params.near == 0.0 && params.far == 0.0 {
            fog.registered = false;
            return;
        }

        *fog = FogDefinition::from_parameters(params, identity_light);
    }

    /// Starts a transition of the active fog towards `slot`.
    ///
    /// Switching to the active fog, an unregistered fog or a scratch slot does nothing.
    pub fn switch_active_fog(&mut self, slot: FogSlot, duration_ms: i32, now_ms: i32) {
        if slot.is_reserved() {
            debug!("Ignoring switch to reserved fog slot {:?}", slot);
            return;
        }
        if self.active == Some(slot) {
            return;
        }
        let Some(destination) = self.get(slot).copied() else {
            debug!("Ignoring switch to out of range fog slot {:?}", slot);
            return;
        };
        if !destination.registered {
            debug!("Ignoring switch to unregistered fog slot {:?}", slot);
            return;
        }

        self.active = Some(slot);

        // CURRENT may be mid-blend; starting from it keeps re-targets seamless
        let current = *self.current();
        self.slots[FogSlot::Last.table_index()] = current;

        let target = self.target_mut();
        *target = destination;
        target.transition = Some(FogTransition::new(now_ms, duration_ms));
        target.registered = true;

        self.current_mut().registered = true;
    }

    /// Clears every slot, used when a new map is loaded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
