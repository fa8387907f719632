use crate::error::Result;
use crate::graphics::Framebuffer;
use crate::help::HelpPanel;
use crate::render::{TerminalCanvas, Viewport};
use crate::scene::SceneAssembler;
use crate::state::AppState;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{self, Stylize};
use crossterm::{cursor, execute, queue, terminal};
use log::{debug, info};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Width reserved for the control panel
const PANEL_WIDTH: u16 = 30;
/// Rows the control panel takes when it sits below the scene
const PANEL_ROWS: u16 = 9;
/// Narrowest scene kept beside the panel
const MIN_SCENE_COLUMNS: u16 = 40;
/// Width of the help text overlay
const HELP_WIDTH: usize = 58;
/// Step used when shift is held
const COARSE_STEP: f64 = 10.0;

/// User intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Yaw(f64),
    Pitch(f64),
    RightAscension(f64),
    Declination(f64),
    ToggleHelp,
    ToggleTangentPlane,
    ToggleDebug,
    Reset,
    Quit,
}

/// What the event loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Redraw,
    Continue,
    Quit,
}

pub fn command_for_key(key: &KeyEvent) -> Option<Command> {
    let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
        COARSE_STEP
    } else {
        1.0
    };
    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Left => Command::Yaw(-step),
        KeyCode::Right => Command::Yaw(step),
        KeyCode::Up => Command::Pitch(step),
        KeyCode::Down => Command::Pitch(-step),
        KeyCode::Char('[') => Command::RightAscension(-1.0),
        KeyCode::Char(']') => Command::RightAscension(1.0),
        KeyCode::Char('{') => Command::RightAscension(-COARSE_STEP),
        KeyCode::Char('}') => Command::RightAscension(COARSE_STEP),
        KeyCode::Char('-') => Command::Declination(-1.0),
        KeyCode::Char('=') => Command::Declination(1.0),
        KeyCode::Char('_') => Command::Declination(-COARSE_STEP),
        KeyCode::Char('+') => Command::Declination(COARSE_STEP),
        KeyCode::Char('h') | KeyCode::Char('H') => Command::ToggleHelp,
        KeyCode::Char('t') | KeyCode::Char('T') => Command::ToggleTangentPlane,
        KeyCode::Char('d') | KeyCode::Char('D') => Command::ToggleDebug,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Reset,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Split of the terminal between the scene and the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Scene size in cells, anchored at the top left corner
    pub scene: (u16, u16),
    /// Top left cell of the control panel
    pub panel_origin: (u16, u16),
    pub panel_width: u16,
}

impl Layout {
    /// Puts the panel right of the scene, or below it on narrow terminals
    pub fn new((columns, rows): (u16, u16)) -> Self {
        if columns >= MIN_SCENE_COLUMNS + 1 + PANEL_WIDTH {
            let scene_columns = columns - PANEL_WIDTH - 1;
            Layout {
                scene: (scene_columns, rows),
                panel_origin: (scene_columns + 1, 1),
                panel_width: PANEL_WIDTH,
            }
        } else {
            let scene_rows = rows.saturating_sub(PANEL_ROWS);
            Layout {
                scene: (columns, scene_rows),
                panel_origin: (0, scene_rows),
                panel_width: columns.min(PANEL_WIDTH),
            }
        }
    }
}

/// Raw mode and alternate screen for as long as it lives
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Interactive terminal view of the scene
pub struct App {
    state: AppState,
    assembler: SceneAssembler,
    canvas: TerminalCanvas,
    help: HelpPanel,
    size: (u16, u16),
    layout: Layout,
    redraws: usize,
    last_redraw: Duration,
}

impl App {
    pub fn new(
        state: AppState,
        assembler: SceneAssembler,
        help: HelpPanel,
        size: (u16, u16),
    ) -> Self {
        let layout = Layout::new(size);
        let (columns, rows) = layout.scene;
        let canvas = TerminalCanvas::new(Viewport {
            columns: columns as usize,
            rows: rows as usize,
            canvas_size: assembler.config().canvas_size,
        });
        App {
            state,
            assembler,
            canvas,
            help,
            size,
            layout,
            redraws: 0,
            last_redraw: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Yaw(delta) => self.state.adjust_yaw(delta),
            Command::Pitch(delta) => self.state.adjust_pitch(delta),
            Command::RightAscension(delta) => self.state.adjust_right_ascension(delta),
            Command::Declination(delta) => self.state.adjust_declination(delta),
            Command::ToggleHelp => {
                let input = !self.state.help.is_visible();
                self.state.set_show_help(input);
            }
            Command::ToggleTangentPlane => {
                if !self.assembler.config().has_tangent_plane() {
                    return Flow::Continue;
                }
                let input = !self.state.tangent_plane.is_visible();
                self.state.set_show_tangent_plane(input);
            }
            Command::ToggleDebug => self.state.debug = !self.state.debug,
            Command::Reset => self.state.reset(),
            Command::Quit => return Flow::Quit,
        }
        Flow::Redraw
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.size = (columns, rows);
        self.layout = Layout::new(self.size);
        let (columns, rows) = self.layout.scene;
        self.canvas.resize(columns as usize, rows as usize);
    }

    /// Redraws the scene from a fresh snapshot of the state
    pub fn render_scene(&mut self) -> &Framebuffer {
        let started = Instant::now();
        let frame = self.state.frame_params();
        self.canvas.begin_frame();
        self.assembler.draw(&mut self.canvas, &frame);
        self.redraws += 1;
        self.last_redraw = started.elapsed();
        self.canvas.framebuffer()
    }

    /// Runs the event loop until the user quits
    pub fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        info!("interactive session started at {}x{}", self.size.0, self.size.1);
        let mut out = io::BufWriter::new(io::stdout());
        let mut dirty = true;
        loop {
            if dirty {
                self.paint(&mut out)?;
                out.flush()?;
                dirty = false;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let Some(command) = command_for_key(&key) else {
                        continue;
                    };
                    debug!("{:?}", command);
                    match self.apply(command) {
                        Flow::Redraw => dirty = true,
                        Flow::Continue => {}
                        Flow::Quit => break,
                    }
                }
                Event::Resize(columns, rows) => {
                    self.resize(columns, rows);
                    dirty = true;
                }
                _ => {}
            }
        }
        info!("session ended after {} redraws", self.redraws);
        Ok(())
    }

    fn paint<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(out, terminal::Clear(terminal::ClearType::All))?;
        self.render_scene().present(out, (0, 0))?;

        let (panel_x, panel_y) = self.layout.panel_origin;
        let panel_rows = self.size.1.saturating_sub(panel_y) as usize;
        let panel_width = self.layout.panel_width as usize;
        for (row, line) in self.control_lines().iter().take(panel_rows).enumerate() {
            let line: String = line.chars().take(panel_width).collect();
            queue!(
                out,
                cursor::MoveTo(panel_x, panel_y + row as u16),
                style::Print(line)
            )?;
        }

        let (scene_columns, scene_rows) = self.layout.scene;
        if self.state.help.is_visible() {
            let width = HELP_WIDTH.min((scene_columns as usize).saturating_sub(4));
            let max_rows = (scene_rows as usize).saturating_sub(2);
            for (row, line) in self.help.lines(width).iter().take(max_rows).enumerate() {
                queue!(
                    out,
                    cursor::MoveTo(2, 1 + row as u16),
                    style::Print(format!("{:<width$}", line, width = width))
                )?;
            }
        }

        if self.state.debug {
            let bottom = scene_rows.saturating_sub(1);
            for (i, line) in self.debug_lines().iter().rev().enumerate() {
                let row = bottom.saturating_sub(i as u16);
                queue!(
                    out,
                    cursor::MoveTo(0, row),
                    style::PrintStyledContent(line.as_str().dim())
                )?;
            }
        }
        Ok(())
    }

    /// Control panel text, one entry per control
    pub fn control_lines(&self) -> Vec<String> {
        let check = |on: bool| if on { "[x]" } else { "[ ]" };
        let toggle = |label: &str, on: bool| format!("{:<18}{}", label, check(on));
        let angle = |label: &str, value: f64| format!("{:<18}{:>5.0}", label, value);

        let state = &self.state;
        let mut lines = vec![
            "ICRS Coordinates".to_string(),
            String::new(),
            toggle("show help (h)", state.help.is_visible()),
        ];
        if self.assembler.config().has_tangent_plane() {
            lines.push(toggle("tangent plane (t)", state.tangent_plane.is_visible()));
        }
        lines.extend([
            angle("camera yaw", state.view.yaw_deg),
            angle("camera pitch", state.view.pitch_deg),
            angle("alpha", state.source.right_ascension_deg),
            angle("delta", state.source.declination_deg),
        ]);
        lines
    }

    fn debug_lines(&self) -> Vec<String> {
        let source = self.state.source.to_vector(self.assembler.config().radius);
        let last_ms = self.last_redraw.as_secs_f64() * 1e3;
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("source: ({:.3}, {:.3}, {:.3})", source.x, source.y, source.z),
            format!("redraws: {}, last: {:.2} ms", self.redraws, last_ms),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::AxisConvention;
    use crate::scene::SceneConfig;
    use crossterm::event::KeyEventState;
    use rstest::rstest;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app(config: SceneConfig) -> App {
        App::new(
            AppState::default(),
            SceneAssembler::new(config, AxisConvention::default()),
            HelpPanel::Loaded {
                text: "<p>help</p>".to_string(),
            },
            (120, 40),
        )
    }

    #[test]
    fn test_key_bindings() {
        let cases = [
            (KeyCode::Left, KeyModifiers::NONE, Some(Command::Yaw(-1.0))),
            (KeyCode::Up, KeyModifiers::SHIFT, Some(Command::Pitch(10.0))),
            (
                KeyCode::Char('}'),
                KeyModifiers::SHIFT,
                Some(Command::RightAscension(10.0)),
            ),
            (
                KeyCode::Char('-'),
                KeyModifiers::NONE,
                Some(Command::Declination(-1.0)),
            ),
            (KeyCode::Char('c'), KeyModifiers::CONTROL, Some(Command::Quit)),
            (KeyCode::Esc, KeyModifiers::NONE, Some(Command::Quit)),
            (KeyCode::Char('x'), KeyModifiers::NONE, None),
        ];
        for (code, modifiers, expected) in cases {
            let command = command_for_key(&key(code, modifiers));
            assert_eq!(command, expected, "{code:?}");
        }
    }

    #[test]
    fn test_commands_update_state() {
        let mut app = app(SceneConfig::extended());
        assert_eq!(app.apply(Command::Yaw(5.0)), Flow::Redraw);
        assert_eq!(app.apply(Command::Declination(100.0)), Flow::Redraw);
        assert_eq!(app.state().view.yaw_deg, 25.0);
        assert_eq!(app.state().source.declination_deg, 90.0);

        assert_eq!(app.apply(Command::ToggleTangentPlane), Flow::Redraw);
        assert!(!app.state().frame_params().show_tangent_plane);

        assert_eq!(app.apply(Command::Reset), Flow::Redraw);
        assert_eq!(app.state().source.declination_deg, 43.0);
        assert_eq!(app.apply(Command::Quit), Flow::Quit);
    }

    #[test]
    fn test_help_toggle_redraws_both_ways() {
        let mut app = app(SceneConfig::basic());
        assert!(app.state().help.is_visible());
        assert_eq!(app.apply(Command::ToggleHelp), Flow::Redraw);
        assert!(!app.state().help.is_visible());
        assert_eq!(app.apply(Command::ToggleHelp), Flow::Redraw);
        assert!(app.state().help.is_visible());
    }

    #[test]
    fn test_basic_variant_has_no_tangent_plane_control() {
        let mut app = app(SceneConfig::basic());
        assert_eq!(app.apply(Command::ToggleTangentPlane), Flow::Continue);
        let lines = app.control_lines();
        assert!(!lines.iter().any(|l| l.starts_with("tangent plane")));
        assert!(lines.iter().any(|l| l.starts_with("show help")));
    }

    #[test]
    fn test_control_lines_show_values() {
        let app = app(SceneConfig::extended());
        let lines = app.control_lines();
        assert!(lines.contains(&format!("{:<18}{:>5}", "alpha", "75")));
        let pitch = format!("{:<18}{:>5}", "camera pitch", "-20");
        assert!(lines.contains(&pitch));
        assert!(lines.contains(&format!("{:<18}[x]", "tangent plane (t)")));
    }

    #[test]
    fn test_render_and_resize() {
        let mut app = app(SceneConfig::extended());
        assert_eq!(app.render_scene().width(), 89);
        app.resize(50, 30);
        let fb = app.render_scene();
        assert_eq!((fb.width(), fb.height()), (50, 21));
        assert!(!fb.to_text().trim().is_empty());
    }

    #[rstest]
    #[case(120, 40)]
    #[case(71, 24)]
    #[case(70, 24)]
    #[case(60, 20)]
    #[case(50, 20)]
    #[case(20, 12)]
    fn test_control_panel_stays_on_screen(#[case] columns: u16, #[case] rows: u16) {
        let mut app = app(SceneConfig::extended());
        app.resize(columns, rows);
        let layout = *app.layout();
        let (panel_x, panel_y) = layout.panel_origin;

        assert!(panel_x + layout.panel_width <= columns, "{layout:?}");
        assert!(panel_y < rows, "{layout:?}");
        assert_eq!(app.canvas.viewport().columns, layout.scene.0 as usize);
        assert_eq!(app.canvas.viewport().rows, layout.scene.1 as usize);

        // The panel never shares cells with the scene
        let beside = panel_x >= layout.scene.0;
        let below = panel_y >= layout.scene.1;
        assert!(beside || below, "{layout:?}");

        if layout.panel_width == PANEL_WIDTH {
            let widest = app.control_lines().iter().map(|l| l.chars().count()).max();
            assert!(widest <= Some(PANEL_WIDTH as usize));
        }
        let mut out: Vec<u8> = Vec::new();
        app.paint(&mut out).unwrap();
    }
}
