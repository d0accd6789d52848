mod cli;

use std::fs::File;

use anyhow::{Context, bail};
use clap::Parser;
use env_logger::Env;
use glam::Vec2;
use log::{debug, info};
use serde::Serialize;
use snake_trail::{BodySegment, HeadTracker, solve};

use crate::cli::Cli;

/// Radius of the circular demo path.
const CIRCLE_RADIUS: f32 = 240.0;

#[derive(Serialize)]
struct FrameTrace {
    time: f64,
    head: Vec2,
    segments: Vec<Vec2>,
}

fn head_position(shape: &str, speed: f32, time: f64) -> anyhow::Result<Vec2> {
    match shape {
        "circle" => {
            let angle = speed / CIRCLE_RADIUS * time as f32;
            Ok(CIRCLE_RADIUS * Vec2::new(angle.cos(), angle.sin()))
        }
        "line" => Ok(Vec2::new(speed * time as f32, 0.0)),
        _ => bail!("unknown path shape \"{shape}\""),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let start = head_position(&cli.path_shape, cli.head_speed, 0.0)?;

    let mut tracker = HeadTracker::new(cli.max_delay, cli.max_distance);
    tracker.reset(start);

    let mut segments: Vec<BodySegment> = (1..=cli.segment_count)
        .map(|i| BodySegment::new(i as f32 * cli.delay_step, cli.spacing, start))
        .collect();

    let max_move = cli.head_speed * cli.frame_dt as f32;
    let min_move = max_move * 0.1;

    let mut trace: Vec<FrameTrace> = Vec::new();
    for frame in 1..=cli.frame_count {
        let time = frame as f64 * cli.frame_dt;
        let head = head_position(&cli.path_shape, cli.head_speed, time)?;
        tracker.advance(head, cli.frame_dt);
        solve(&tracker, &mut segments, max_move, min_move, cli.radius);
        debug!(
            "Frame {}: head at {:?}, tail at {:?}",
            frame,
            head,
            segments.last().map(|s| s.position)
        );
        if cli.trace_output.is_some() {
            trace.push(FrameTrace {
                time,
                head,
                segments: segments.iter().map(|s| s.position).collect(),
            });
        }
    }

    debug!(
        "Head history retains {} samples",
        tracker.path().count()
    );
    info!(
        "Simulated {} frames of {} segments; head ended at {:?}, tail at {:?}",
        cli.frame_count,
        cli.segment_count,
        tracker.head_position(),
        segments.last().map(|s| s.position)
    );

    if let Some(path) = &cli.trace_output {
        let file = File::create(path)
            .with_context(|| format!("failed to create trace file \"{path}\""))?;
        serde_json::to_writer(file, &trace).context("failed to write frame trace")?;
        info!("Wrote frame trace to {}", path);
    }

    Ok(())
}
