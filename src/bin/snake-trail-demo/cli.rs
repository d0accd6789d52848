use clap::{Parser, command};

// Some defaults; all of which can be overridden via CLI args
const PATH_SHAPE: &str = "circle";
const SEGMENT_COUNT: usize = 8;
const FRAME_COUNT: usize = 600;
const FRAME_DT: f64 = 1.0 / 60.0;

const HEAD_SPEED: f32 = 300.;
const SEGMENT_RADIUS: f32 = 30.;
const SEGMENT_SPACING: f32 = 80.;
const DELAY_STEP: f32 = 0.1;

const MAX_DELAY: f32 = 4.;
const MAX_DISTANCE: f32 = 2000.;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Shape of the head's path: "circle" or "line"
    #[arg(long="path",default_value_t=String::from(PATH_SHAPE))]
    pub path_shape: String,

    /// How many trailing body segments to simulate
    #[arg(long = "segments", default_value_t = SEGMENT_COUNT)]
    pub segment_count: usize,

    /// How many fixed-timestep frames to run
    #[arg(long = "frames", default_value_t = FRAME_COUNT)]
    pub frame_count: usize,

    /// Seconds of simulated time per frame
    #[arg(long = "dt", default_value_t = FRAME_DT)]
    pub frame_dt: f64,

    /// Head movement speed, in units per second
    #[arg(long = "speed", default_value_t = HEAD_SPEED)]
    pub head_speed: f32,

    /// Seconds of extra lag for each successive segment
    #[arg(long = "delayStep", default_value_t = DELAY_STEP)]
    pub delay_step: f32,

    /// Desired separation between a segment and the one ahead of it
    #[arg(long = "spacing", default_value_t = SEGMENT_SPACING)]
    pub spacing: f32,

    /// Minimum separation enforced between resolved segments
    #[arg(long = "radius", default_value_t = SEGMENT_RADIUS)]
    pub radius: f32,

    /// Oldest head history retained, in seconds
    #[arg(long = "maxDelay", default_value_t = MAX_DELAY)]
    pub max_delay: f32,

    /// Cap on how far back in space a history query may reach
    #[arg(long = "maxDistance", default_value_t = MAX_DISTANCE)]
    pub max_distance: f32,

    /// Optionally, where to write a JSON trace of every frame
    #[arg(long = "traceOutput")]
    pub trace_output: Option<String>,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,
}
