//! Configuration-time edits
//!
//! These run between ticks. Mixer edits apply the same change to the slot
//! list and to the slot runtime records, so slew, delay and hold state move
//! with their slot.

use txmix_core::flight_mode::{adjust_trim, TrimAdjustment};
use txmix_core::limits::NUM_MIX_SLOTS;
use txmix_core::mixer::reorder::{delete_item, insert_item, move_item, swap_items};
use txmix_core::mixer::MixerSlotRuntime;
use txmix_core::model::ModelError;
use txmix_core::source::TrimAxis;
use txmix_core::templates::{MixerTemplate, TEMPLATE_SLOTS};

use super::Engine;
use crate::{log_debug, log_info, log_warn};

impl Engine {
    /// Adjusts a trim by `steps` in the active flight mode.
    pub fn adjust_trim(&mut self, axis: TrimAxis, steps: i16) -> TrimAdjustment {
        let active = self.flight_mode.active();
        let result = adjust_trim(
            &mut self.model.trims,
            &mut self.model.flight_modes,
            active,
            axis,
            steps,
        );
        if let TrimAdjustment::Clamped(value) = result {
            log_warn!("trim {} clamped at {}", axis.index(), value);
        }
        result
    }

    /// Moves mixer slot `old` to position `new`.
    pub fn move_mix(&mut self, new: usize, old: usize) -> Result<(), ModelError> {
        self.check_mix_index(new)?;
        self.check_mix_index(old)?;
        move_item(&mut self.model.mixer, new, old)?;
        move_item(&mut self.mixer, new, old)?;
        log_debug!("mixer slot {} moved to {}", old, new);
        Ok(())
    }

    /// Exchanges mixer slots `a` and `b`.
    pub fn swap_mix(&mut self, a: usize, b: usize) -> Result<(), ModelError> {
        self.check_mix_index(a)?;
        self.check_mix_index(b)?;
        swap_items(&mut self.model.mixer, a, b)?;
        swap_items(&mut self.mixer, a, b)?;
        log_debug!("mixer slots {} and {} swapped", a, b);
        Ok(())
    }

    /// Inserts a default slot at `at`. The last slot falls off.
    pub fn insert_mix(&mut self, at: usize) -> Result<(), ModelError> {
        self.check_mix_index(at)?;
        insert_item(&mut self.model.mixer, at)?;
        insert_item(&mut self.mixer, at)?;
        log_debug!("mixer slot inserted at {}", at);
        Ok(())
    }

    /// Removes the slot at `at` and appends a default slot.
    pub fn delete_mix(&mut self, at: usize) -> Result<(), ModelError> {
        self.check_mix_index(at)?;
        delete_item(&mut self.model.mixer, at)?;
        delete_item(&mut self.mixer, at)?;
        log_debug!("mixer slot {} deleted", at);
        Ok(())
    }

    /// Writes a four-slot template at mixer position `at`.
    ///
    /// The template is wired to the system channel order and the model
    /// type. The overwritten slots start over with fresh runtime records.
    pub fn load_template(&mut self, template: MixerTemplate, at: usize) -> Result<(), ModelError> {
        template.load(
            &mut self.model.mixer,
            at,
            self.system.channel_order,
            self.model.model_type,
        )?;
        for runtime in &mut self.mixer[at..at + TEMPLATE_SLOTS] {
            *runtime = MixerSlotRuntime::default();
        }
        log_info!("template loaded at mixer slot {}", at);
        Ok(())
    }

    // Both lists always hold NUM_MIX_SLOTS entries; checking up front keeps
    // a failed edit from touching either of them.
    fn check_mix_index(&self, index: usize) -> Result<(), ModelError> {
        if index < NUM_MIX_SLOTS && index < self.model.mixer.len() {
            Ok(())
        } else {
            Err(ModelError::IndexOutOfRange {
                entity: txmix_core::model::Entity::MixerSlot,
                index,
            })
        }
    }
}
