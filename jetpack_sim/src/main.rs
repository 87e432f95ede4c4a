//! Standalone simulator binary.
//!
//! Usage:
//!   cargo run -p jetpack_sim -- [--config sim.json] [--script flight.json]
//!       [--seconds 10] [--frame-hz 60] [--physics-hz 50] [--realtime]
//!       [--telemetry out.json]
//!
//! Flies one jetpack through a flight script (the built-in demo when no script
//! is given) and logs its progress. `--realtime` paces frames against the wall
//! clock; otherwise the run is as fast as possible.

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context};
use jetpack_core::physics::PhysicsBody;
use jetpack_sim::{config::SimConfig, script::FlightScript, Host};
use tracing::info;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    telemetry: Option<PathBuf>,
    seconds: Option<f32>,
    frame_hz: Option<u32>,
    physics_hz: Option<u32>,
    realtime: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let argv: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        let value = argv.get(i + 1);
        match (argv[i].as_str(), value) {
            ("--config", Some(v)) => {
                args.config = Some(PathBuf::from(v));
                i += 2;
            }
            ("--script", Some(v)) => {
                args.script = Some(PathBuf::from(v));
                i += 2;
            }
            ("--telemetry", Some(v)) => {
                args.telemetry = Some(PathBuf::from(v));
                i += 2;
            }
            ("--seconds", Some(v)) => {
                args.seconds = Some(v.parse().with_context(|| format!("--seconds {v}"))?);
                i += 2;
            }
            ("--frame-hz", Some(v)) => {
                args.frame_hz = Some(v.parse().with_context(|| format!("--frame-hz {v}"))?);
                i += 2;
            }
            ("--physics-hz", Some(v)) => {
                args.physics_hz = Some(v.parse().with_context(|| format!("--physics-hz {v}"))?);
                i += 2;
            }
            ("--realtime", _) => {
                args.realtime = true;
                i += 1;
            }
            (other, _) => bail!("unrecognized or incomplete argument: {other}"),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> anyhow::Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seconds) = args.seconds {
        cfg.seconds = seconds;
    }
    if let Some(hz) = args.frame_hz {
        cfg.frame_hz = hz;
    }
    if let Some(hz) = args.physics_hz {
        cfg.physics_hz = hz;
    }
    cfg.validate().context("invalid sim config")?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let cfg = load_config(&args)?;
    let script = match &args.script {
        Some(path) => FlightScript::from_json_file(path)?,
        None => FlightScript::demo(),
    };

    info!(
        seconds = cfg.seconds,
        realtime = args.realtime,
        script = ?args.script,
        "Starting simulation"
    );

    let seconds = cfg.seconds;
    let mut host = Host::new(cfg, script)?;
    if args.realtime {
        host.run_realtime(seconds).await;
    } else {
        host.run_for(seconds);
    }

    let jetpack = host.jetpack();
    let body = jetpack.body();
    info!(
        frames = host.frames(),
        physics_steps = host.physics_steps(),
        position = ?body.position(),
        velocity = ?body.velocity(),
        heading = jetpack.heading(),
        engine = ?jetpack.engine_state(),
        "Simulation finished"
    );

    if let Some(path) = &args.telemetry {
        let file = File::create(path)
            .with_context(|| format!("create telemetry file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), host.telemetry())
            .with_context(|| format!("write telemetry {}", path.display()))?;
        info!(
            path = %path.display(),
            samples = host.telemetry().len(),
            dropped = host.telemetry_dropped(),
            "Telemetry written"
        );
    }

    Ok(())
}
