use clap::Parser;
use icrs_triad::coords::{DECLINATION_RANGE, PITCH_RANGE, RIGHT_ASCENSION_RANGE, YAW_RANGE};
use icrs_triad::help::{HelpPanel, DEFAULT_HELP_FILE};
use icrs_triad::render::{TerminalCanvas, Viewport};
use icrs_triad::state::AppState;
use icrs_triad::widget::App;
use icrs_triad::{
    AxisConvention, Error, SceneAssembler, SceneConfig, SourceDirection, Variant, ViewingAngles,
};
use log::info;
use std::path::PathBuf;

/// Snapshot size when the terminal size is unknown
const FALLBACK_SIZE: (u16, u16) = (100, 40);

/// Interactive 3D view of the ICRS [p,q,r] triad
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Which sketch to show
    #[arg(long, value_enum, default_value_t = Variant::Extended)]
    variant: Variant,

    /// Camera rotation about Y, degrees in [-180, 180]
    #[arg(
        long,
        default_value_t = 20.0,
        allow_negative_numbers = true,
        value_parser = parse_yaw
    )]
    yaw: f64,

    /// Camera rotation about Z, degrees in [-180, 180]
    #[arg(
        long,
        default_value_t = -20.0,
        allow_negative_numbers = true,
        value_parser = parse_pitch
    )]
    pitch: f64,

    /// Right ascension of the source, degrees in [0, 360)
    #[arg(long, default_value_t = 75.0, value_parser = parse_right_ascension)]
    ra: f64,

    /// Declination of the source, degrees in [-90, 90]
    #[arg(
        long,
        default_value_t = 43.0,
        allow_negative_numbers = true,
        value_parser = parse_declination
    )]
    dec: f64,

    /// Start with the explanation hidden
    #[arg(long)]
    no_help: bool,

    /// Start with the tangent plane hidden
    #[arg(long)]
    no_tangent_plane: bool,

    /// Explanation text shown in the help panel
    #[arg(long, default_value = DEFAULT_HELP_FILE)]
    help_file: PathBuf,

    /// Print a single frame to stdout and exit
    #[arg(long)]
    snapshot: bool,

    /// Snapshot width in columns (default: terminal width)
    #[arg(long, requires = "snapshot")]
    width: Option<u16>,

    /// Snapshot height in rows (default: terminal height)
    #[arg(long, requires = "snapshot")]
    height: Option<u16>,
}

fn parse_in_range(value: &str, (min, max): (f64, f64), max_inclusive: bool) -> Result<f64, String> {
    let angle: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    let in_range = angle >= min && (angle < max || (max_inclusive && angle == max));
    if in_range {
        Ok(angle)
    } else {
        let close = if max_inclusive { ']' } else { ')' };
        Err(format!("{angle} is outside [{min}, {max}{close}"))
    }
}

fn parse_yaw(value: &str) -> Result<f64, String> {
    parse_in_range(value, YAW_RANGE, true)
}

fn parse_pitch(value: &str) -> Result<f64, String> {
    parse_in_range(value, PITCH_RANGE, true)
}

fn parse_right_ascension(value: &str) -> Result<f64, String> {
    parse_in_range(value, RIGHT_ASCENSION_RANGE, false)
}

fn parse_declination(value: &str) -> Result<f64, String> {
    parse_in_range(value, DECLINATION_RANGE, true)
}

fn terminal_size() -> Option<(u16, u16)> {
    termsize::get().map(|size| (size.cols, size.rows))
}

/// Main function
fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let config = SceneConfig::for_variant(args.variant);
    let state = AppState::new(
        ViewingAngles {
            yaw_deg: args.yaw,
            pitch_deg: args.pitch,
        },
        SourceDirection::new(args.ra, args.dec),
        !args.no_help,
        !args.no_tangent_plane && config.has_tangent_plane(),
    );
    info!("{:?} variant, {:?}", config.variant, state.source);
    let assembler = SceneAssembler::new(config, AxisConvention::default());

    if args.snapshot {
        let (default_columns, default_rows) = terminal_size().unwrap_or(FALLBACK_SIZE);
        let columns = args.width.unwrap_or(default_columns);
        let rows = args.height.unwrap_or(default_rows);
        let mut canvas = TerminalCanvas::new(Viewport {
            columns: columns as usize,
            rows: rows as usize,
            canvas_size: config.canvas_size,
        });
        assembler.draw(&mut canvas, &state.frame_params());
        print!("{}", canvas.framebuffer().to_text());
        return Ok(());
    }

    let help = HelpPanel::load_or_report(&args.help_file);
    let size = crossterm::terminal::size()?;
    let mut app = App::new(state, assembler, help, size);
    app.run()
}
