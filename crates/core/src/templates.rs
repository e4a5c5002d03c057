//! Mixer templates
//!
//! Each template writes four consecutive mixer slots wired to the channels
//! picked by the system's default channel order.

use serde::{Deserialize, Serialize};

use crate::mixer::MixerSlot;
use crate::model::{ModelError, ModelType};
use crate::source::{Role, SourceId, StickAxis};

/// Four-slot mixer templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixerTemplate {
    /// Aileron, elevator, throttle and rudder pass-through
    Basic,
    /// Aileron and elevator mixed onto two surfaces
    Elevon,
    /// Rudder and elevator mixed onto two surfaces
    Vtail,
    /// Throttle with differential yaw on two motors
    DiffThrust,
}

/// Number of slots every template occupies
pub const TEMPLATE_SLOTS: usize = 4;

/// Channel of the right motor in the differential thrust template
const DIFF_THRUST_RIGHT_CHANNEL: u8 = 5;

/// A/E/T/R channel assignments as 2-bit fields (A in bits 7..6, R in 1..0)
const CHANNEL_ORDER_TABLE: [u8; 24] = [
    0x1B, 0x1E, 0x39, 0x2D, 0x36, 0x27, 0x4B, 0x4E, 0xC9, 0x8D, 0xC6, 0x87, 0xD8, 0x9C, 0x78,
    0x6C, 0xB4, 0xE4, 0x93, 0xD2, 0xB1, 0xE1, 0x72, 0x63,
];

/// One of the 24 orderings of aileron, elevator, throttle and rudder on
/// the first four channels. Index 0 is AETR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelOrder(pub u8);

impl ChannelOrder {
    pub fn is_valid(&self) -> bool {
        (self.0 as usize) < CHANNEL_ORDER_TABLE.len()
    }

    /// Channel index assigned to a role. Invalid orders fall back to AETR.
    pub fn channel(&self, role: Role) -> u8 {
        let code = CHANNEL_ORDER_TABLE
            .get(self.0 as usize)
            .copied()
            .unwrap_or(CHANNEL_ORDER_TABLE[0]);
        let shift = match role {
            Role::Aileron => 6,
            Role::Elevator => 4,
            Role::Throttle => 2,
            Role::Rudder => 0,
        };
        (code >> shift) & 0x03
    }

    fn output(&self, role: Role) -> SourceId {
        SourceId::Channel(self.channel(role))
    }
}

fn channel_key(slot: &MixerSlot) -> u8 {
    match slot.output {
        SourceId::Channel(i) => i,
        _ => u8::MAX,
    }
}

impl MixerTemplate {
    /// Builds the four slots of the template.
    pub fn slots(&self, order: ChannelOrder, model_type: ModelType) -> [MixerSlot; TEMPLATE_SLOTS] {
        let role = SourceId::Role;
        let out = |r| order.output(r);
        match self {
            MixerTemplate::Basic => {
                let elevator = if model_type == ModelType::Airplane { -100 } else { 100 };
                let mut slots = [
                    MixerSlot::simple(out(Role::Aileron), role(Role::Aileron), 100),
                    MixerSlot::simple(out(Role::Elevator), role(Role::Elevator), elevator),
                    MixerSlot::simple(out(Role::Throttle), role(Role::Throttle), 100),
                    MixerSlot::simple(out(Role::Rudder), role(Role::Rudder), 100),
                ];
                slots.sort_unstable_by_key(channel_key);
                slots
            }
            MixerTemplate::Elevon => [
                MixerSlot::simple(out(Role::Aileron), role(Role::Aileron), -50),
                MixerSlot::simple(out(Role::Aileron), role(Role::Elevator), -50),
                MixerSlot::simple(out(Role::Elevator), role(Role::Aileron), 50),
                MixerSlot::simple(out(Role::Elevator), role(Role::Elevator), -50),
            ],
            MixerTemplate::Vtail => [
                MixerSlot::simple(out(Role::Rudder), role(Role::Rudder), 50),
                MixerSlot::simple(out(Role::Rudder), role(Role::Elevator), -50),
                MixerSlot::simple(out(Role::Elevator), role(Role::Rudder), -50),
                MixerSlot::simple(out(Role::Elevator), role(Role::Elevator), -50),
            ],
            MixerTemplate::DiffThrust => {
                let right = SourceId::Channel(DIFF_THRUST_RIGHT_CHANNEL);
                let yaw = SourceId::Stick(StickAxis::X1);
                [
                    MixerSlot::simple(out(Role::Throttle), role(Role::Throttle), 100),
                    MixerSlot::simple(out(Role::Throttle), yaw, 40),
                    MixerSlot::simple(right, role(Role::Throttle), 100),
                    MixerSlot::simple(right, yaw, -40),
                ]
            }
        }
    }

    /// Writes the template into `slots` starting at `at`.
    ///
    /// Leaves `slots` untouched if the template does not fit.
    pub fn load(
        &self,
        slots: &mut [MixerSlot],
        at: usize,
        order: ChannelOrder,
        model_type: ModelType,
    ) -> Result<(), ModelError> {
        let end = at
            .checked_add(TEMPLATE_SLOTS)
            .filter(|&end| end <= slots.len())
            .ok_or(ModelError::TemplateDoesNotFit)?;
        slots[at..end].copy_from_slice(&self.slots(order, model_type));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order_aetr() {
        let order = ChannelOrder(0);
        assert_eq!(order.channel(Role::Aileron), 0);
        assert_eq!(order.channel(Role::Elevator), 1);
        assert_eq!(order.channel(Role::Throttle), 2);
        assert_eq!(order.channel(Role::Rudder), 3);
    }

    #[test]
    fn test_channel_order_taer() {
        // 0x4B = 01 00 10 11: A=1, E=0, T=2, R=3
        let order = ChannelOrder(6);
        assert_eq!(order.channel(Role::Aileron), 1);
        assert_eq!(order.channel(Role::Elevator), 0);
        assert_eq!(order.channel(Role::Throttle), 2);
    }

    #[test]
    fn test_every_order_is_a_permutation() {
        for index in 0..24 {
            let order = ChannelOrder(index);
            let mut seen = [false; 4];
            for role in Role::ALL {
                seen[order.channel(role) as usize] = true;
            }
            assert!(seen.iter().all(|&s| s), "order {}", index);
        }
        assert!(!ChannelOrder(24).is_valid());
        assert_eq!(ChannelOrder(200).channel(Role::Rudder), 3);
    }

    #[test]
    fn test_basic_sorted_by_output() {
        let slots = MixerTemplate::Basic.slots(ChannelOrder(6), ModelType::Airplane);
        let outputs = slots.map(|s| s.output);
        assert_eq!(
            outputs,
            [
                SourceId::Channel(0),
                SourceId::Channel(1),
                SourceId::Channel(2),
                SourceId::Channel(3)
            ]
        );
        assert_eq!(slots[0].input, SourceId::Role(Role::Elevator));
        assert_eq!(slots[0].weight, -100);
        assert!(slots.iter().all(|s| s.trim_enabled));
    }

    #[test]
    fn test_basic_elevator_sign_by_model_type() {
        let slots = MixerTemplate::Basic.slots(ChannelOrder(0), ModelType::Multicopter);
        assert_eq!(slots[1].input, SourceId::Role(Role::Elevator));
        assert_eq!(slots[1].weight, 100);
    }

    #[test]
    fn test_load_checks_room() {
        let mut slots = [MixerSlot::default(); 6];
        assert_eq!(
            MixerTemplate::Elevon.load(&mut slots, 3, ChannelOrder(0), ModelType::Other),
            Err(ModelError::TemplateDoesNotFit)
        );
        assert!(slots.iter().all(|s| *s == MixerSlot::default()));

        MixerTemplate::Elevon
            .load(&mut slots, 2, ChannelOrder(0), ModelType::Other)
            .unwrap();
        assert_eq!(slots[2].output, SourceId::Channel(0));
        assert_eq!(slots[5].output, SourceId::Channel(1));
    }

    #[test]
    fn test_diff_thrust_right_motor() {
        let slots = MixerTemplate::DiffThrust.slots(ChannelOrder(0), ModelType::Other);
        assert_eq!(slots[2].output, SourceId::Channel(5));
        assert_eq!(slots[3].weight, -40);
    }
}
