//! End-to-end tick scenarios through the public engine API

use txmix::Engine;
use txmix_core::counter::Counter;
use txmix_core::edge::ClockEdge;
use txmix_core::flight_mode::{FlightMode, TrimState};
use txmix_core::input::RawInputs;
use txmix_core::limits::LOOP_TIME_MS;
use txmix_core::logical::{CompareOp, LogicalFunction, LogicalSwitch};
use txmix_core::mixer::MixerSlot;
use txmix_core::model::{Model, ModelType, SystemConfig};
use txmix_core::source::{Role, SourceId, StickAxis, TrimAxis};
use txmix_core::switch::{SwitchCondition, SwitchPosition, SwitchRef};
use txmix_core::templates::MixerTemplate;

struct Bench {
    engine: Engine,
    now_ms: u32,
    inputs: RawInputs,
}

impl Bench {
    fn new(model: Model) -> Self {
        let mut engine = Engine::new(SystemConfig::default());
        engine.load_model(model).unwrap();
        Self {
            engine,
            now_ms: 0,
            inputs: RawInputs::default(),
        }
    }

    /// Ticks once at the current time, then advances the clock.
    fn step(&mut self) {
        self.engine.tick(self.now_ms, &self.inputs);
        self.now_ms += LOOP_TIME_MS;
    }

    /// Ticks until `until_ms` (inclusive of the tick at `until_ms`).
    fn run_until(&mut self, until_ms: u32) {
        while self.now_ms <= until_ms {
            self.step();
        }
    }

    fn switch(&mut self, index: usize, position: SwitchPosition) {
        self.inputs.switches[index] = position;
    }
}

fn down(index: u8) -> SwitchRef {
    SwitchRef::Physical {
        index,
        condition: SwitchCondition::Down,
    }
}

#[test]
fn test_basic_template_airplane() {
    let mut engine = Engine::new(SystemConfig::default());
    engine.load_template(MixerTemplate::Basic, 0).unwrap();

    let inputs = RawInputs::default()
        .with_stick(StickAxis::X1, -50)
        .with_stick(StickAxis::Y1, 300)
        .with_stick(StickAxis::X2, 200)
        .with_stick(StickAxis::Y2, 100);
    engine.tick(0, &inputs);

    let out = engine.channel_outputs();
    assert_eq!(out[0], 200);
    assert_eq!(out[1], -100);
    assert_eq!(out[2], 300);
    assert_eq!(out[3], -50);
    assert!(out[4..].iter().all(|&v| v == 0));
}

#[test]
fn test_elevon_template() {
    let mut model = Model::default();
    model.model_type = ModelType::Other;
    let mut bench = Bench::new(model);
    bench.engine.load_template(MixerTemplate::Elevon, 0).unwrap();

    bench.inputs = RawInputs::default().with_stick(StickAxis::X2, 250);
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[0], -125);
    assert_eq!(bench.engine.channel_outputs()[1], 125);

    bench.inputs = RawInputs::default().with_stick(StickAxis::Y2, 200);
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[0], -100);
    assert_eq!(bench.engine.channel_outputs()[1], -100);
}

#[test]
fn test_logical_delay_and_minimum_duration() {
    let mut model = Model::default();
    model.logical_switches[0] = LogicalSwitch {
        function: LogicalFunction::Compare {
            op: CompareOp::Greater,
            magnitude: false,
            source: SourceId::Stick(StickAxis::Y1),
            threshold: 50,
        },
        delay: 5,
        duration: 10,
    };
    let mut bench = Bench::new(model);
    bench.inputs = RawInputs::default().with_stick(StickAxis::Y1, 400);

    bench.run_until(480);
    assert!(!bench.engine.logical_switches()[0]);
    bench.step();
    assert!(bench.engine.logical_switches()[0]);

    bench.run_until(580);
    bench.inputs = RawInputs::default();
    bench.run_until(1480);
    assert!(bench.engine.logical_switches()[0]);
    bench.step();
    assert!(!bench.engine.logical_switches()[0]);
}

/// Runs one tick per 100 ms duration unit with Y1 above the threshold on
/// the ticks marked true, returning the switch state per tick.
fn run_delay_duration(above: &[bool]) -> [bool; 16] {
    let mut model = Model::default();
    model.logical_switches[0] = LogicalSwitch {
        function: LogicalFunction::Compare {
            op: CompareOp::Greater,
            magnitude: false,
            source: SourceId::Stick(StickAxis::Y1),
            threshold: 10,
        },
        delay: 2,
        duration: 3,
    };
    let mut engine = Engine::new(SystemConfig::default());
    engine.load_model(model).unwrap();

    let mut out = [false; 16];
    for (tick, &high) in above.iter().enumerate() {
        let value = if high { 400 } else { -100 };
        let inputs = RawInputs::default().with_stick(StickAxis::Y1, value);
        engine.tick(tick as u32 * 100, &inputs);
        out[tick] = engine.logical_switches()[0];
    }
    out
}

#[test]
fn test_delay_drops_single_tick_crossing() {
    let mut above = [false; 16];
    above[1] = true;
    assert!(run_delay_duration(&above).iter().all(|&s| !s));
}

#[test]
fn test_delay_two_units_duration_three_units() {
    // above on ticks 1..=5, below from tick 6
    let mut above = [false; 16];
    above[1..6].fill(true);
    let out = run_delay_duration(&above);

    // goes true two units after the crossing, at tick 3
    assert!(!out[2]);
    assert!(out[3]);
    // the minimum duration runs from activation (ticks 3, 4, 5), which the
    // source already covers, so the switch follows it down at tick 6
    let true_ticks: [usize; 3] = [3, 4, 5];
    for (tick, &state) in out.iter().enumerate() {
        assert_eq!(state, true_ticks.contains(&tick), "tick {tick}");
    }
}

#[test]
fn test_duration_outlasts_short_activation() {
    // above on ticks 1..=3: active only at tick 3, held for three units
    let mut above = [false; 16];
    above[1..4].fill(true);
    let out = run_delay_duration(&above);

    let true_ticks: [usize; 3] = [3, 4, 5];
    for (tick, &state) in out.iter().enumerate() {
        assert_eq!(state, true_ticks.contains(&tick), "tick {tick}");
    }
}

#[test]
fn test_toggle_on_rising_edges() {
    let mut model = Model::default();
    model.logical_switches[0].function = LogicalFunction::Toggle {
        clock: down(0),
        edge: ClockEdge::Rising,
        clear: down(1),
    };
    let mut bench = Bench::new(model);
    bench.step();
    assert!(!bench.engine.logical_switches()[0]);

    let mut states = [false; 4];
    for state in states.iter_mut() {
        bench.switch(0, SwitchPosition::Down);
        bench.step();
        *state = bench.engine.logical_switches()[0];
        bench.switch(0, SwitchPosition::Up);
        bench.step();
    }
    assert_eq!(states, [true, false, true, false]);

    bench.switch(0, SwitchPosition::Down);
    bench.step();
    assert!(bench.engine.logical_switches()[0]);
    bench.switch(1, SwitchPosition::Down);
    bench.step();
    assert!(!bench.engine.logical_switches()[0]);
}

#[test]
fn test_counter_wraps_at_modulus() {
    let mut model = Model::default();
    model.counters[0] = Counter {
        clock: down(0),
        modulus: 3,
        ..Default::default()
    };
    let mut bench = Bench::new(model);
    bench.switch(0, SwitchPosition::Down);
    bench.step();
    assert_eq!(bench.engine.counter_values()[0], 0);

    let mut counts = [0; 4];
    for count in counts.iter_mut() {
        bench.switch(0, SwitchPosition::Up);
        bench.step();
        bench.switch(0, SwitchPosition::Down);
        bench.step();
        *count = bench.engine.counter_values()[0];
    }
    assert_eq!(counts, [1, 2, 0, 1]);
}

#[test]
fn test_counter_sees_previous_tick_logical_switch() {
    let mut model = Model::default();
    model.logical_switches[0].function = LogicalFunction::Compare {
        op: CompareOp::Greater,
        magnitude: false,
        source: SourceId::Stick(StickAxis::Y1),
        threshold: 0,
    };
    model.counters[0].clock = SwitchRef::Logical {
        index: 0,
        invert: false,
    };
    let mut bench = Bench::new(model);
    bench.step();

    bench.inputs = RawInputs::default().with_stick(StickAxis::Y1, 100);
    bench.step();
    assert!(bench.engine.logical_switches()[0]);
    assert_eq!(bench.engine.counter_values()[0], 0);

    bench.step();
    assert_eq!(bench.engine.counter_values()[0], 1);
}

#[test]
fn test_flight_mode_trim_blend() {
    let mut model = Model::default();
    model.flight_modes[1] = FlightMode {
        switch: down(1),
        transition_time: 10,
        trims: [0, 0, 0, 10],
    };
    model.trims[TrimAxis::Y2.index()].state = TrimState::FlightMode;
    model.mixer[0] = MixerSlot::simple(SourceId::Channel(0), SourceId::Role(Role::Elevator), 100);
    let mut bench = Bench::new(model);

    bench.run_until(980);
    assert_eq!(bench.engine.active_flight_mode(), 0);
    assert_eq!(bench.engine.channel_outputs()[0], 0);

    bench.switch(1, SwitchPosition::Down);
    bench.step();
    assert_eq!(bench.engine.active_flight_mode(), 1);
    assert_eq!(bench.engine.channel_outputs()[0], 0);

    bench.run_until(1500);
    assert_eq!(bench.engine.channel_outputs()[0], 25);

    bench.run_until(2000);
    assert_eq!(bench.engine.channel_outputs()[0], 50);
    bench.run_until(2500);
    assert_eq!(bench.engine.channel_outputs()[0], 50);
}

#[test]
fn test_flight_mode_mask_gates_slot() {
    let mut model = Model::default();
    model.flight_modes[2].switch = down(1);
    model.mixer[0] = MixerSlot {
        flight_modes: txmix_core::mixer::FlightModeMask::FM2,
        ..MixerSlot::simple(SourceId::Channel(5), SourceId::Max, 100)
    };
    let mut bench = Bench::new(model);
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[5], 0);

    bench.switch(1, SwitchPosition::Down);
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[5], 500);
}

#[test]
fn test_gate_delay_then_slew() {
    let mut model = Model::default();
    model.mixer[0] = MixerSlot {
        switch: down(2),
        delay_up: 2,
        slow_up: 10,
        ..MixerSlot::simple(SourceId::Channel(0), SourceId::Max, 100)
    };
    let mut bench = Bench::new(model);
    bench.run_until(980);
    assert_eq!(bench.engine.channel_outputs()[0], 0);

    bench.switch(2, SwitchPosition::Down);
    bench.run_until(1180);
    assert_eq!(bench.engine.channel_outputs()[0], 0);

    bench.step();
    assert_eq!(bench.engine.channel_outputs()[0], 20);

    bench.run_until(1660);
    assert_eq!(bench.engine.channel_outputs()[0], 480);
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[0], 500);
}

#[test]
fn test_reinitialize_snaps_slew_to_target() {
    let mut model = Model::default();
    model.mixer[0] = MixerSlot {
        slow_up: 50,
        ..MixerSlot::simple(SourceId::Channel(0), SourceId::Role(Role::Aileron), 100)
    };
    let mut bench = Bench::new(model);
    bench.step();

    bench.inputs = RawInputs::default().with_stick(StickAxis::X2, 500);
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[0], 4);

    bench.engine.reinitialize();
    bench.step();
    assert_eq!(bench.engine.channel_outputs()[0], 500);
}
