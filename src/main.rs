//! Octave-bridge - octave band levels for audio-reactive visuals
//!
//! Feeds audio from a synth, a WAV file or the default input device through
//! the band reducer and prints one line of band levels per tick.

use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use octave_bridge::audio::{
    BandReducer, BandSource, FftBandBackend, FftSpectrum, LiveCapture, SampleBuffer, SampleFeed,
    SynthFeed, WavPlayback, GLICOL_COMPOSITION,
};
use octave_bridge::cli::{Args, FeedKind, SourceMode};
use octave_bridge::params::FeedConfig;
use octave_bridge::Result;

/// Log to stderr so stdout carries only band levels
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(); // RUST_LOG takes precedence

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the sample feed selected on the command line
fn create_feed(
    kind: FeedKind,
    config: &FeedConfig,
    buffer: SampleBuffer,
) -> Result<Box<dyn SampleFeed>> {
    let feed: Box<dyn SampleFeed> = match kind {
        FeedKind::Synth => Box::new(SynthFeed::new(config, GLICOL_COMPOSITION, buffer)?),
        FeedKind::Wav(path) => Box::new(WavPlayback::open(path, buffer)?),
        FeedKind::Live => Box::new(LiveCapture::start(buffer)?),
    };
    Ok(feed)
}

/// One output line: mode label followed by per-band values
fn format_levels(mode: &str, values: &[f32]) -> String {
    let mut line = format!("[{}]", mode);
    for value in values {
        line.push_str(&format!(" {:7.1}", value));
    }
    line
}

fn run(args: &Args) -> Result<()> {
    let feed_config = FeedConfig::default();
    feed_config.validate()?;

    let buffer = SampleBuffer::new(feed_config.history_len);
    let feed_kind = args.parse_feed();
    let tick_limit = args.tick_limit(&feed_kind);
    let realtime = feed_kind == FeedKind::Live;
    let mut feed = create_feed(feed_kind, &feed_config, buffer.clone())?;

    let config = args.reducer_config();
    let spectrum = FftSpectrum::new(buffer, feed.sample_rate());
    let source = match args.parse_mode() {
        SourceMode::External => BandSource::external(FftBandBackend::new(spectrum, config.window)),
        SourceMode::Internal => BandSource::internal(spectrum),
    };
    let mut reducer = BandReducer::new(config, source)?;

    let tick_s = args.tick_seconds();

    info!(
        "Running: mode={}, {} Hz ticks, showing {} levels",
        reducer.mode(),
        args.fps,
        if args.mean { "mean" } else { "instantaneous" }
    );

    let mut tick: u64 = 0;
    let mut last = Instant::now();

    while !tick_limit.is_some_and(|limit| tick >= limit) && !feed.is_finished() {
        // Live input runs on the wall clock; offline feeds use a fixed step
        let delta_time = if realtime {
            let target = Duration::from_secs_f32(tick_s);
            let elapsed = last.elapsed();
            if elapsed < target {
                thread::sleep(target - elapsed);
            }
            let now = Instant::now();
            let delta = now.duration_since(last).as_secs_f32();
            last = now;
            delta
        } else {
            tick_s
        };

        feed.advance(delta_time)?;
        reducer.update(delta_time)?;

        let values = if args.mean {
            reducer.mean_levels()
        } else {
            reducer.levels()
        };
        println!("{}", format_levels(reducer.mode(), values));

        tick += 1;
    }

    info!("Stopped after {} ticks", tick);
    Ok(())
}

fn main() {
    init_logging();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
