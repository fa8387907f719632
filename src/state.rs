use crate::coords::{SourceDirection, ViewingAngles, DECLINATION_RANGE, PITCH_RANGE, YAW_RANGE};
use crate::scene::FrameParams;
use log::trace;

/// Outcome of feeding a boolean input to a [`Toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Shown,
    Hidden,
    Unchanged,
}

/// Visibility that follows a boolean input; repeated input is a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    visible: bool,
}

impl Toggle {
    pub fn new(visible: bool) -> Self {
        Toggle { visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set(&mut self, input: bool) -> Transition {
        match (self.visible, input) {
            (false, true) => {
                self.visible = true;
                Transition::Shown
            }
            (true, false) => {
                self.visible = false;
                Transition::Hidden
            }
            _ => Transition::Unchanged,
        }
    }
}

/// Application state
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub view: ViewingAngles,
    pub source: SourceDirection,
    /// Explanation panel
    pub help: Toggle,
    pub tangent_plane: Toggle,
    /// Enable debug overlay
    pub debug: bool,
    initial: (ViewingAngles, SourceDirection),
}

impl AppState {
    pub fn new(
        view: ViewingAngles,
        source: SourceDirection,
        show_help: bool,
        show_tangent_plane: bool,
    ) -> Self {
        AppState {
            view,
            source,
            help: Toggle::new(show_help),
            tangent_plane: Toggle::new(show_tangent_plane),
            debug: false,
            initial: (view, source),
        }
    }

    pub fn adjust_yaw(&mut self, delta: f64) {
        let (min, max) = YAW_RANGE;
        self.view.yaw_deg = (self.view.yaw_deg + delta).clamp(min, max);
    }

    pub fn adjust_pitch(&mut self, delta: f64) {
        let (min, max) = PITCH_RANGE;
        self.view.pitch_deg = (self.view.pitch_deg + delta).clamp(min, max);
    }

    /// Right ascension wraps around [0, 360)
    pub fn adjust_right_ascension(&mut self, delta: f64) {
        self.source.right_ascension_deg =
            (self.source.right_ascension_deg + delta).rem_euclid(360.0);
    }

    pub fn adjust_declination(&mut self, delta: f64) {
        let (min, max) = DECLINATION_RANGE;
        self.source.declination_deg = (self.source.declination_deg + delta).clamp(min, max);
    }

    pub fn set_show_help(&mut self, input: bool) -> Transition {
        let transition = self.help.set(input);
        trace!("help panel: {:?}", transition);
        transition
    }

    pub fn set_show_tangent_plane(&mut self, input: bool) -> Transition {
        let transition = self.tangent_plane.set(input);
        trace!("tangent plane: {:?}", transition);
        transition
    }

    /// Restores the angles the application started with
    pub fn reset(&mut self) {
        (self.view, self.source) = self.initial;
    }

    /// Snapshot of everything a redraw reads
    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            view: self.view,
            source: self.source,
            show_tangent_plane: self.tangent_plane.is_visible(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(
            ViewingAngles::default(),
            SourceDirection::default(),
            true,
            true,
        )
    }
}
