//! Function generators
//!
//! Each generator produces a periodic waveform on the full-scale range and
//! writes it to its [`SourceId::FunctionGenerator`] slot once per pass.
//!
//! # Period
//!
//! The period is either fixed (`period1`) or modulated: the modulator source
//! maps linearly from `period1` at -100 % to `period2` at +100 %. Pulse
//! waveforms always use `period1`.
//!
//! # Phase
//!
//! With automatic phase, a change of period re-times the internal offset so
//! the fractional position in the cycle is kept. With fixed phase the
//! waveform is shifted by `phase / 360` of the period.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::limits::{duration_ms, FULL_SCALE};
use crate::source::{SourceId, SourceTable};

/// Base seed of the random waveform generators
const RANDOM_SEED: u64 = 0x5EED_F00D;

/// One cycle of a sine in percent
const SINE_TABLE: [i8; 64] = [
    0, 10, 20, 29, 38, 47, 56, 63, 71, 77, 83, 88, 92, 96, 98, 100, 100, 100, 98, 96, 92, 88,
    83, 77, 71, 63, 56, 47, 38, 29, 20, 10, 0, -10, -20, -29, -38, -47, -56, -63, -71, -77, -83,
    -88, -92, -96, -98, -100, -100, -100, -98, -96, -92, -88, -83, -77, -71, -63, -56, -47, -38,
    -29, -20, -10,
];

/// Sub-steps interpolated between two sine table entries
const SINE_SUBSTEPS: i64 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Pulse,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodMode {
    #[default]
    Fixed,
    /// Period driven by the modulator source
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhaseMode {
    #[default]
    Auto,
    Fixed,
}

/// High time of a pulse waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseWidth {
    /// Fixed width in tenths of a second
    Fixed(u16),
    /// Modulator mapped onto 0..period, latched at each cycle wrap
    Variable,
}

impl Default for PulseWidth {
    fn default() -> Self {
        PulseWidth::Fixed(5)
    }
}

/// Function generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionGenerator {
    pub waveform: Waveform,
    pub period_mode: PeriodMode,
    /// Period (tenths of a second)
    pub period1: u16,
    /// Period at full positive modulation (tenths of a second)
    pub period2: u16,
    pub modulator: SourceId,
    pub reverse_modulator: bool,
    pub phase_mode: PhaseMode,
    /// Fixed phase in degrees
    pub phase: u16,
    pub pulse_width: PulseWidth,
}

impl Default for FunctionGenerator {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            period_mode: PeriodMode::Fixed,
            period1: 10,
            period2: 20,
            modulator: SourceId::None,
            reverse_modulator: false,
            phase_mode: PhaseMode::Auto,
            phase: 0,
            pulse_width: PulseWidth::default(),
        }
    }
}

/// Runtime state of one generator
#[derive(Debug, Clone)]
pub struct FunctionGeneratorRuntime {
    last_period: i64,
    time_offset: i64,
    last_instance: i64,
    latched_modulator: i16,
    random_expired: bool,
    random_value: i16,
    rng: SmallRng,
}

impl FunctionGeneratorRuntime {
    /// Fresh state for generator `index`
    pub fn new(index: usize) -> Self {
        Self {
            last_period: 0,
            time_offset: 0,
            last_instance: 0,
            latched_modulator: 0,
            random_expired: true,
            random_value: 0,
            rng: SmallRng::seed_from_u64(RANDOM_SEED + index as u64),
        }
    }
}

impl FunctionGenerator {
    fn modulator_value(&self, sources: &SourceTable) -> i16 {
        let m = sources.mix_value(self.modulator);
        if self.reverse_modulator {
            -m
        } else {
            m
        }
    }

    /// Current period in milliseconds
    pub fn period_ms(&self, sources: &SourceTable) -> i64 {
        if self.waveform == Waveform::Pulse || self.period_mode == PeriodMode::Fixed {
            return duration_ms(self.period1) as i64;
        }
        let m = self.modulator_value(sources) as i64;
        let (p1, p2) = (self.period1 as i64, self.period2 as i64);
        (m + FULL_SCALE as i64) * (p2 - p1) / 10 + p1 * 100
    }

    fn auto_phase(&self) -> bool {
        match self.waveform {
            Waveform::Pulse => self.phase_mode == PhaseMode::Auto,
            _ => self.period_mode == PeriodMode::Variable || self.phase_mode == PhaseMode::Auto,
        }
    }

    /// Computes the waveform value at `now_ms` (time since reinitialize).
    pub fn evaluate(
        &self,
        runtime: &mut FunctionGeneratorRuntime,
        now_ms: u32,
        sources: &SourceTable,
    ) -> i16 {
        let period = self.period_ms(sources);
        if period <= 0 {
            return 0;
        }
        let t = now_ms as i64;

        let instance = if self.auto_phase() {
            if period != runtime.last_period {
                if runtime.last_period <= 0 {
                    runtime.time_offset = 0;
                } else {
                    let position = (t + runtime.time_offset).rem_euclid(runtime.last_period);
                    runtime.time_offset = period * position / runtime.last_period - t % period;
                }
                runtime.last_period = period;
            }
            (t + runtime.time_offset).rem_euclid(period)
        } else {
            let offset = self.phase as i64 * period / 360;
            (t - offset).rem_euclid(period)
        };

        let value = match self.waveform {
            Waveform::Sine => sine(instance, period),
            Waveform::Square => {
                if instance < period / 2 {
                    FULL_SCALE as i64
                } else {
                    -FULL_SCALE as i64
                }
            }
            Waveform::Triangle => triangle(instance, period),
            Waveform::Sawtooth => {
                let half = period / 2;
                if instance < half {
                    map_range(instance, 0, half, 0, FULL_SCALE as i64)
                } else {
                    map_range(instance, half, period, -FULL_SCALE as i64, 0)
                }
            }
            Waveform::Pulse => {
                let high = match self.pulse_width {
                    PulseWidth::Fixed(width) => duration_ms(width) as i64,
                    PulseWidth::Variable => {
                        if instance < runtime.last_instance {
                            runtime.latched_modulator = self.modulator_value(sources);
                        }
                        (runtime.latched_modulator as i64 + FULL_SCALE as i64) * period / 1000
                    }
                };
                runtime.last_instance = instance;
                if instance < high {
                    FULL_SCALE as i64
                } else {
                    -FULL_SCALE as i64
                }
            }
            Waveform::Random => {
                if instance < period / 2 {
                    if runtime.random_expired {
                        runtime.random_expired = false;
                        runtime.random_value = runtime.rng.gen_range(-500..500);
                    }
                } else {
                    runtime.random_expired = true;
                }
                runtime.random_value as i64
            }
        };

        value.clamp(-FULL_SCALE as i64, FULL_SCALE as i64) as i16
    }
}

fn sine(instance: i64, period: i64) -> i64 {
    let len = SINE_TABLE.len() as i64;
    let index = instance * len * SINE_SUBSTEPS / period;
    let lut = (index / SINE_SUBSTEPS) as usize % SINE_TABLE.len();
    let next = (lut + 1) % SINE_TABLE.len();
    let left = 5 * SINE_TABLE[lut] as i64;
    let right = 5 * SINE_TABLE[next] as i64;
    left + (right - left) * (index % SINE_SUBSTEPS) / SINE_SUBSTEPS
}

fn triangle(instance: i64, period: i64) -> i64 {
    let quarter = period / 4;
    let three_quarters = 3 * period / 4;
    let full = FULL_SCALE as i64;
    if instance < quarter {
        map_range(instance, 0, quarter, 0, full)
    } else if instance < three_quarters {
        map_range(instance, quarter, three_quarters, full, -full)
    } else {
        map_range(instance, three_quarters, period, -full, 0)
    }
}

/// Linear re-mapping of `x` from one range to another
fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Restores every generator to its fresh state, reseeding the random source.
pub fn reinitialize_function_generators(runtimes: &mut [FunctionGeneratorRuntime]) {
    for (index, runtime) in runtimes.iter_mut().enumerate() {
        *runtime = FunctionGeneratorRuntime::new(index);
    }
}

/// Evaluates every generator and publishes the results.
pub fn update_function_generators(
    generators: &[FunctionGenerator],
    runtimes: &mut [FunctionGeneratorRuntime],
    now_ms: u32,
    sources: &mut SourceTable,
) {
    for (index, (generator, runtime)) in generators.iter().zip(runtimes.iter_mut()).enumerate() {
        let value = generator.evaluate(runtime, now_ms, sources);
        sources.set_funcgen(index, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInputs;
    use crate::source::StickAxis;

    fn generator(waveform: Waveform) -> FunctionGenerator {
        FunctionGenerator {
            waveform,
            ..Default::default()
        }
    }

    fn sample(generator: &FunctionGenerator, times: &[u32]) -> [i16; 8] {
        let sources = SourceTable::new();
        let mut runtime = FunctionGeneratorRuntime::new(0);
        let mut out = [0; 8];
        for (slot, &t) in out.iter_mut().zip(times.iter()) {
            *slot = generator.evaluate(&mut runtime, t, &sources);
        }
        out
    }

    #[test]
    fn test_sine_quadrants() {
        let out = sample(&generator(Waveform::Sine), &[0, 250, 500, 750]);
        assert_eq!(out[..4], [0, 500, 0, -500]);
    }

    #[test]
    fn test_square_halves() {
        let out = sample(&generator(Waveform::Square), &[0, 499, 500, 999, 1000]);
        assert_eq!(out[..5], [500, 500, -500, -500, 500]);
    }

    #[test]
    fn test_triangle_shape() {
        let out = sample(&generator(Waveform::Triangle), &[0, 125, 250, 500, 750, 875]);
        assert_eq!(out[..6], [0, 250, 500, 0, -500, -250]);
    }

    #[test]
    fn test_sawtooth_shape() {
        let out = sample(&generator(Waveform::Sawtooth), &[0, 250, 499, 500, 750]);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 250);
        assert_eq!(out[2], 499);
        assert_eq!(out[3], -500);
        assert_eq!(out[4], -250);
    }

    #[test]
    fn test_fixed_pulse_width() {
        let mut pulse = generator(Waveform::Pulse);
        pulse.pulse_width = PulseWidth::Fixed(2);
        let out = sample(&pulse, &[0, 199, 200, 999, 1000]);
        assert_eq!(out[..5], [500, 500, -500, -500, 500]);
    }

    #[test]
    fn test_fixed_phase_offset() {
        let mut square = generator(Waveform::Square);
        square.phase_mode = PhaseMode::Fixed;
        square.phase = 180;
        let out = sample(&square, &[0, 499, 500]);
        assert_eq!(out[..3], [-500, -500, 500]);
    }

    #[test]
    fn test_zero_period_outputs_zero() {
        let mut square = generator(Waveform::Square);
        square.period1 = 0;
        let out = sample(&square, &[0, 100]);
        assert_eq!(out[..2], [0, 0]);
    }

    #[test]
    fn test_variable_period_from_modulator() {
        let mut gen = generator(Waveform::Square);
        gen.period_mode = PeriodMode::Variable;
        gen.period1 = 10;
        gen.period2 = 30;
        gen.modulator = SourceId::Stick(StickAxis::X1);

        let mut sources = SourceTable::new();
        assert_eq!(gen.period_ms(&sources), 2000);

        let inputs = RawInputs::default().with_stick(StickAxis::X1, 500);
        sources.apply_inputs(&inputs, &[], &[]);
        assert_eq!(gen.period_ms(&sources), 3000);

        gen.reverse_modulator = true;
        assert_eq!(gen.period_ms(&sources), 1000);
    }

    #[test]
    fn test_auto_phase_preserves_position_on_period_change() {
        let mut gen = generator(Waveform::Sawtooth);
        gen.period_mode = PeriodMode::Variable;
        gen.period1 = 10;
        gen.period2 = 30;
        gen.modulator = SourceId::Stick(StickAxis::X1);

        let mut sources = SourceTable::new();
        let mut runtime = FunctionGeneratorRuntime::new(0);
        // period 2000 ms, a quarter into the cycle
        assert_eq!(gen.evaluate(&mut runtime, 500, &sources), 250);

        let inputs = RawInputs::default().with_stick(StickAxis::X1, 500);
        sources.apply_inputs(&inputs, &[], &[]);
        // period 3000 ms, still a quarter into the cycle
        assert_eq!(gen.evaluate(&mut runtime, 500, &sources), 250);
    }

    #[test]
    fn test_random_holds_within_cycle() {
        let gen = generator(Waveform::Random);
        let sources = SourceTable::new();
        let mut runtime = FunctionGeneratorRuntime::new(3);
        let first = gen.evaluate(&mut runtime, 0, &sources);
        assert!((-500..500).contains(&first));
        assert_eq!(gen.evaluate(&mut runtime, 400, &sources), first);
        assert_eq!(gen.evaluate(&mut runtime, 600, &sources), first);

        let next = gen.evaluate(&mut runtime, 1000, &sources);
        assert!((-500..500).contains(&next));
    }

    #[test]
    fn test_random_is_reproducible() {
        let gen = generator(Waveform::Random);
        let a = sample(&gen, &[0, 600, 1000, 1600, 2000, 2600, 3000, 3600]);
        let b = sample(&gen, &[0, 600, 1000, 1600, 2000, 2600, 3000, 3600]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_writes_sources() {
        let mut generators = [FunctionGenerator::default(); 2];
        generators[1].waveform = Waveform::Square;
        let mut runtimes = [FunctionGeneratorRuntime::new(0), FunctionGeneratorRuntime::new(1)];
        let mut sources = SourceTable::new();
        update_function_generators(&generators, &mut runtimes, 250, &mut sources);
        assert_eq!(sources.value(SourceId::FunctionGenerator(0)), Some(500));
        assert_eq!(sources.value(SourceId::FunctionGenerator(1)), Some(500));
    }

    #[test]
    fn test_reinitialize_reseeds_random() {
        let gen = generator(Waveform::Random);
        let sources = SourceTable::new();
        let mut runtimes = [FunctionGeneratorRuntime::new(0), FunctionGeneratorRuntime::new(1)];
        let first = gen.evaluate(&mut runtimes[1], 0, &sources);
        gen.evaluate(&mut runtimes[1], 1000, &sources);

        reinitialize_function_generators(&mut runtimes);
        assert_eq!(gen.evaluate(&mut runtimes[1], 0, &sources), first);
    }
}
