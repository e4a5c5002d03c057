//! Flight-control roles (rudder, throttle, aileron, elevator)
//!
//! Each role reads one raw stick axis chosen by the stick mode. Rudder,
//! aileron and elevator go through dual rate and expo; throttle goes through
//! the throttle curve. Roles are refreshed at the start of the pass, so a
//! dual-rate switch referencing a logical switch sees the previous tick's
//! result.

use serde::{Deserialize, Serialize};

use crate::curve::CustomCurve;
use crate::shaping::rate_expo;
use crate::source::{Role, SourceId, SourceTable, StickAxis};
use crate::switch::SwitchRef;

/// Dual rate and expo for one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualRate {
    /// Rate (percent) while the switch is inactive
    pub rate1: i8,
    /// Rate (percent) while the switch is active
    pub rate2: i8,
    pub expo1: i8,
    pub expo2: i8,
    /// Selects rate2/expo2 while active. None always uses rate1/expo1.
    pub switch: SwitchRef,
}

impl Default for DualRate {
    fn default() -> Self {
        Self {
            rate1: 100,
            rate2: 100,
            expo1: 0,
            expo2: 0,
            switch: SwitchRef::None,
        }
    }
}

impl DualRate {
    /// Applies the currently selected rate and expo.
    pub fn apply(&self, input: i16, sources: &SourceTable) -> i16 {
        if self.switch.is_triggered(sources) {
            rate_expo(input, self.rate2, self.expo2)
        } else {
            rate_expo(input, self.rate1, self.expo1)
        }
    }
}

/// Mapping of sticks to roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StickMode {
    /// Left stick rudder/throttle, right stick aileron/elevator
    #[default]
    Rtae,
    /// Left stick aileron/elevator, right stick rudder/throttle
    Aert,
    /// Left stick rudder/elevator, right stick aileron/throttle
    Reat,
    /// Left stick aileron/throttle, right stick rudder/elevator
    Atre,
}

/// Raw stick axis feeding each role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSources {
    pub rud: StickAxis,
    pub thr: StickAxis,
    pub ail: StickAxis,
    pub ele: StickAxis,
}

impl Default for RoleSources {
    fn default() -> Self {
        Self::from_stick_mode(StickMode::default())
    }
}

impl RoleSources {
    /// Standard axis assignment for a stick mode
    pub const fn from_stick_mode(mode: StickMode) -> Self {
        use StickAxis::{X1, X2, Y1, Y2};
        let (rud, thr, ail, ele) = match mode {
            StickMode::Rtae => (X1, Y1, X2, Y2),
            StickMode::Aert => (X2, Y2, X1, Y1),
            StickMode::Reat => (X1, Y2, X2, Y1),
            StickMode::Atre => (X2, Y1, X1, Y2),
        };
        Self { rud, thr, ail, ele }
    }

    /// Raw axis behind a role
    pub const fn axis(&self, role: Role) -> StickAxis {
        match role {
            Role::Rudder => self.rud,
            Role::Throttle => self.thr,
            Role::Aileron => self.ail,
            Role::Elevator => self.ele,
        }
    }

    /// Resolves a role source to its raw stick, leaving other sources as is.
    pub const fn resolve(&self, id: SourceId) -> SourceId {
        match id {
            SourceId::Role(role) => SourceId::Stick(self.axis(role)),
            other => other,
        }
    }
}

/// Role shaping configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleConfig {
    pub sources: RoleSources,
    pub rud_dual_rate: DualRate,
    pub ail_dual_rate: DualRate,
    pub ele_dual_rate: DualRate,
    pub throttle_curve: CustomCurve,
}

impl RoleConfig {
    /// Recomputes the four role sources from their raw sticks.
    pub fn update(&self, sources: &mut SourceTable) {
        let raw = |table: &SourceTable, role: Role| {
            table.mix_value(SourceId::Stick(self.sources.axis(role)))
        };

        let rud = self.rud_dual_rate.apply(raw(sources, Role::Rudder), sources);
        let ail = self.ail_dual_rate.apply(raw(sources, Role::Aileron), sources);
        let ele = self.ele_dual_rate.apply(raw(sources, Role::Elevator), sources);
        let thr = self.throttle_curve.evaluate(raw(sources, Role::Throttle));

        sources.set_role(Role::Rudder, rud);
        sources.set_role(Role::Aileron, ail);
        sources.set_role(Role::Elevator, ele);
        sources.set_role(Role::Throttle, thr);
    }
}
