//! Replays a scenario through a model and prints one JSON frame per tick.
//!
//! Usage:
//!   cargo run -p txmix_sim --bin txmix_replay -- --model <FILE> --scenario <FILE> [OPTIONS]
//!
//! Options:
//!   --duration-ms <N>  Replay length (default: last event + 1 s)
//!   --realtime         Pace ticks at the 20 ms loop period
//!   --seed <N>         Add seeded stick noise
//!   --noise <N>        Peak stick noise in internal units (default: 5)

use std::env;
use std::io::{self, BufWriter, Write};
use std::process;

use txmix_sim::{
    Frame, ModelFile, NoiseConfig, ReplayConfig, ReplayHarness, Scenario, ScriptedInputs,
    SimError, TimeMode,
};

struct Args {
    model: String,
    scenario: String,
    duration_ms: Option<u32>,
    realtime: bool,
    seed: Option<u64>,
    noise: i16,
}

fn parse_args() -> Args {
    let mut model = None;
    let mut scenario = None;
    let mut args = Args {
        model: String::new(),
        scenario: String::new(),
        duration_ms: None,
        realtime: false,
        seed: None,
        noise: NoiseConfig::default().stick_amplitude,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--model" => {
                i += 1;
                model = Some(value_arg(&raw, i, "model").to_string());
            }
            "--scenario" => {
                i += 1;
                scenario = Some(value_arg(&raw, i, "scenario").to_string());
            }
            "--duration-ms" => {
                i += 1;
                args.duration_ms = Some(parse_arg(&raw, i, "duration-ms"));
            }
            "--realtime" => args.realtime = true,
            "--seed" => {
                i += 1;
                args.seed = Some(parse_arg(&raw, i, "seed"));
            }
            "--noise" => {
                i += 1;
                args.noise = parse_arg(&raw, i, "noise");
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    match (model, scenario) {
        (Some(model), Some(scenario)) => {
            args.model = model;
            args.scenario = scenario;
        }
        _ => {
            eprintln!("Error: --model and --scenario are required");
            print_usage();
            process::exit(1);
        }
    }
    args
}

fn value_arg<'a>(raw: &'a [String], i: usize, name: &str) -> &'a str {
    raw.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parse_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    value_arg(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: txmix_replay --model <FILE> --scenario <FILE> [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --duration-ms <N>  Replay length (default: last event + 1 s)\n\
         \x20 --realtime         Pace ticks at the 20 ms loop period\n\
         \x20 --seed <N>         Add seeded stick noise\n\
         \x20 --noise <N>        Peak stick noise in internal units (default: 5)\n\
         \x20 -h, --help         Show this help"
    );
}

fn write_frame(out: &mut impl Write, frame: &Frame) -> Result<(), SimError> {
    serde_json::to_writer(&mut *out, frame)?;
    out.write_all(b"\n")?;
    Ok(())
}

async fn run(args: Args) -> Result<usize, SimError> {
    let file = ModelFile::load(&args.model)?;
    let scenario = Scenario::load(&args.scenario)?;
    let duration_ms = args
        .duration_ms
        .unwrap_or_else(|| scenario.end_ms().saturating_add(1000));

    let mut inputs = ScriptedInputs::new(scenario);
    if let Some(seed) = args.seed {
        inputs = inputs.with_noise(NoiseConfig {
            stick_amplitude: args.noise,
            seed: Some(seed),
        });
    }

    let config = ReplayConfig {
        time_mode: if args.realtime {
            TimeMode::Realtime
        } else {
            TimeMode::Lockstep
        },
        duration_ms,
    };
    let mut harness = ReplayHarness::new(file, inputs, config)?;

    let mut out = BufWriter::new(io::stdout().lock());
    let mut ticks = 0;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while !harness.is_finished() {
        tokio::select! {
            _ = &mut ctrl_c => {
                eprintln!("Interrupted after {ticks} ticks.");
                break;
            }
            frame = harness.step() => {
                write_frame(&mut out, &frame?)?;
                ticks += 1;
            }
        }
    }
    out.flush()?;
    Ok(ticks)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = parse_args();
    match run(args).await {
        Ok(ticks) => eprintln!("{ticks} ticks replayed"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
