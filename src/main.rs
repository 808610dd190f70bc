use clap::Parser;
use fretline::config;
use fretline::core::input;
use fretline::game::chart::{self, TrackName};
use fretline::game::scores::PlaySummary;
use fretline::game::{gameplay, playback};
use log::{LevelFilter, error, info};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fretline")]
#[command(about = "Five-lane rhythm game session runner")]
struct Args {
    /// Chart file (JSON).
    #[arg(short, long)]
    chart: PathBuf,

    /// Track to play, e.g. ExpertSingle or HardDoubleBass.
    #[arg(short, long, default_value = "ExpertSingle")]
    track: TrackName,

    /// Recorded presses (JSON array of {"at": ms, "lane": "red"}).
    #[arg(short, long, conflicts_with = "autoplay")]
    inputs: Option<PathBuf>,

    /// Press every note on time.
    #[arg(long)]
    autoplay: bool,

    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Host loop tick, in milliseconds.
    #[arg(long, default_value_t = playback::DEFAULT_TICK_MS)]
    tick_ms: i64,

    /// Print the session summary as JSON.
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let library_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("fretline", library_level)
        .filter_module("fretline::game::view", LevelFilter::Warn)
        .init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let settings = config::load(&args.config)?;
    let chart = chart::load(&args.chart)?;
    let timeline = chart.track(args.track)?;

    let presses = match &args.inputs {
        Some(path) => input::load_input_log(path)?,
        None if args.autoplay => playback::autoplay(&timeline),
        None => {
            info!("No input log given, playing with no presses.");
            Vec::new()
        }
    };

    let mut state = gameplay::init(args.track.to_string(), timeline, settings);
    let outcome = playback::run(&mut state, &presses, args.tick_ms);
    let summary = gameplay::summary(&state);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&chart.title, &chart.artist, &summary, outcome.judgments.len());
    }
    Ok(())
}

fn print_summary(title: &str, artist: &str, summary: &PlaySummary, judgments: usize) {
    let status = if summary.failed {
        "FAILED"
    } else if summary.finished {
        "CLEARED"
    } else {
        "INCOMPLETE"
    };
    println!("{} - {} [{}]", artist, title, summary.track);
    println!("  {}", status);
    println!("  Score:       {}", summary.score);
    println!("  Stars:       {}", "*".repeat(summary.stars as usize));
    println!(
        "  Notes hit:   {}/{} ({:.1}%)",
        summary.notes_hit,
        summary.total_notes,
        summary.percentage * 100.0
    );
    println!("  Best streak: {}", summary.best_streak);
    println!("  Judgments:   {}", judgments);
    println!("  Played at:   {}", summary.played_at.to_rfc3339());
}
