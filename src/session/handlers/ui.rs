// SPDX-License-Identifier: GPL-3.0-only

//! UI handlers
//!
//! Presentation-only toggles: panels, zoom indicator, resolution selection,
//! orientation and media detail navigation. None of these touch hardware, so
//! no handler here returns a task.

use crate::backends::camera::Resolution;
use crate::orientation::Orientation;
use crate::session::effects::Effect;
use crate::session::events::UiEvent;
use crate::session::media::Media;
use crate::session::state::{Panel, SessionState, ZoomIndicatorMode};
use crate::session::task::Outcome;
use tracing::{debug, info};

impl SessionState {
    pub(crate) fn reduce_ui(&mut self, event: UiEvent) -> Outcome {
        match event {
            UiEvent::ZoomIndicatorModeChanged(mode) => self.handle_zoom_indicator_mode(mode),
            UiEvent::CurrentResolutionChanged(resolution) => {
                self.handle_resolution_changed(resolution)
            }
            UiEvent::OrientationChanged(orientation) => self.handle_orientation_changed(orientation),
            UiEvent::ResolutionsButtonPressed => self.open_panel(Panel::Resolutions),
            UiEvent::ResolutionsPanelClosed => self.close_panel(&Panel::Resolutions),
            UiEvent::ContinueButtonPressed => self.handle_continue(),
            UiEvent::MediaCounterButtonPressed => self.open_panel(Panel::MediaGrid),
            UiEvent::MediaCounterClosed => self.handle_media_counter_closed(),
            UiEvent::MediaDetailPressed(media) => self.handle_show_media_detail(media),
            UiEvent::MediaDetailDismissed => self.handle_dismiss_media_detail(),
            UiEvent::ShowDiscardPanel => self.open_panel(Panel::DiscardConfirmation),
            UiEvent::DismissDiscardPanel => self.close_panel(&Panel::DiscardConfirmation),
        }
    }

    fn open_panel(&mut self, panel: Panel) -> Outcome {
        debug!(from = self.panels.panel.name(), to = panel.name(), "Opening panel");
        self.panels.panel = panel;
        Outcome::none()
    }

    /// Close `panel` if it is the one showing
    fn close_panel(&mut self, panel: &Panel) -> Outcome {
        if std::mem::discriminant(&self.panels.panel) == std::mem::discriminant(panel) {
            debug!(panel = panel.name(), "Closing panel");
            self.panels.panel = Panel::None;
        }
        Outcome::none()
    }

    fn handle_zoom_indicator_mode(&mut self, mode: ZoomIndicatorMode) -> Outcome {
        self.capture.preview.zoom_indicator_mode = mode;
        Outcome::none()
    }

    fn handle_orientation_changed(&mut self, orientation: Orientation) -> Outcome {
        debug!(%orientation, locked = ?self.orientation.fixed_orientation, "Orientation changed");
        self.orientation.orientation = orientation;
        Outcome::none()
    }

    fn handle_resolution_changed(&mut self, resolution: Resolution) -> Outcome {
        let recording = self.recording_state();
        if !recording.is_idle() {
            return self.reject("resolution-changed", recording.name());
        }
        if !self
            .current_device()
            .is_some_and(|d| d.resolutions.contains(&resolution))
        {
            debug!(%resolution, "Resolution not offered by the current device");
            return Outcome::none();
        }

        info!(%resolution, "Resolution changed");
        self.capture.preview.current_resolution = Some(resolution);
        self.close_panel(&Panel::Resolutions)
    }

    fn handle_continue(&mut self) -> Outcome {
        let recording = self.recording_state();
        if !recording.is_idle() {
            return self.reject("continue", recording.name());
        }

        if self.media.media.is_empty() {
            info!("Continue without media");
            return Outcome::effect(Effect::ClosePreview);
        }

        info!(media = self.media.media.len(), "Continue with media");
        Outcome::effect(Effect::ClosePreviewWithResult(self.media.media.clone()))
    }

    fn handle_media_counter_closed(&mut self) -> Outcome {
        if matches!(self.panels.panel, Panel::MediaGrid | Panel::MediaDetail { .. }) {
            self.panels.panel = Panel::None;
        }
        Outcome::none()
    }

    fn handle_show_media_detail(&mut self, media: Media) -> Outcome {
        let Some(index) = self
            .media
            .media
            .iter()
            .position(|m| m.file_path == media.file_path)
        else {
            debug!(file = %media.file_path, "Unknown media, detail not shown");
            return Outcome::none();
        };

        debug!(index, file = %media.file_path, "Showing media detail");
        self.panels.panel = Panel::MediaDetail { index, media };
        Outcome::none()
    }

    fn handle_dismiss_media_detail(&mut self) -> Outcome {
        if matches!(self.panels.panel, Panel::MediaDetail { .. }) {
            self.panels.panel = Panel::MediaGrid;
        }
        Outcome::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{LensFacing, SensorRotation, SimulatedEngine};
    use crate::session::media::MediaType;
    use crate::session::state::RecordingState;

    fn media(path: &str) -> Media {
        Media {
            id: path.into(),
            created_at: chrono::Utc::now(),
            file_path: path.into(),
            media_type: MediaType::Image,
            lens_facing: LensFacing::Back,
            orientation: Orientation::Portrait,
            resolution: Resolution::new(1080, 1920),
            rotation: SensorRotation::Rotate90,
            duration_millis: 0,
        }
    }

    fn state() -> SessionState {
        let mut state = SessionState::default();
        state.camera_info = SimulatedEngine::default_devices();
        state
    }

    #[test]
    fn test_panels_are_exclusive() {
        let mut state = state();
        state.reduce_ui(UiEvent::ResolutionsButtonPressed);
        assert_eq!(state.panels.panel, Panel::Resolutions);

        state.reduce_ui(UiEvent::MediaCounterButtonPressed);
        assert_eq!(state.panels.panel, Panel::MediaGrid);

        // Closing a panel that is not showing leaves the current one alone
        state.reduce_ui(UiEvent::ResolutionsPanelClosed);
        assert_eq!(state.panels.panel, Panel::MediaGrid);

        state.reduce_ui(UiEvent::MediaCounterClosed);
        assert_eq!(state.panels.panel, Panel::None);
    }

    #[test]
    fn test_media_detail_navigation() {
        let mut state = state();
        state.media.media = vec![media("a.png"), media("b.png")];
        state.reduce_ui(UiEvent::MediaCounterButtonPressed);

        let detail = media("b.png");
        state.reduce_ui(UiEvent::MediaDetailPressed(detail.clone()));
        assert_eq!(
            state.panels.panel,
            Panel::MediaDetail {
                index: 1,
                media: detail
            }
        );

        state.reduce_ui(UiEvent::MediaDetailDismissed);
        assert_eq!(state.panels.panel, Panel::MediaGrid);

        state.reduce_ui(UiEvent::MediaDetailPressed(media("missing.png")));
        assert_eq!(state.panels.panel, Panel::MediaGrid);
    }

    #[test]
    fn test_resolution_change_closes_panel() {
        let mut state = state();
        state.reduce_ui(UiEvent::ResolutionsButtonPressed);
        state.reduce_ui(UiEvent::CurrentResolutionChanged(Resolution::new(3840, 2160)));

        assert_eq!(
            state.capture.preview.current_resolution,
            Some(Resolution::new(3840, 2160))
        );
        assert_eq!(state.panels.panel, Panel::None);
    }

    #[test]
    fn test_resolution_change_rejected_while_recording() {
        let mut state = state();
        state.capture.recording.state = RecordingState::Recording;
        state.reduce_ui(UiEvent::CurrentResolutionChanged(Resolution::new(3840, 2160)));
        assert_eq!(state.capture.preview.current_resolution, None);
    }

    #[test]
    fn test_continue_returns_media() {
        let mut state = state();
        let outcome = state.reduce_ui(UiEvent::ContinueButtonPressed);
        assert_eq!(outcome.effect, Some(Effect::ClosePreview));

        state.media.media = vec![media("a.png")];
        let outcome = state.reduce_ui(UiEvent::ContinueButtonPressed);
        assert_eq!(
            outcome.effect,
            Some(Effect::ClosePreviewWithResult(state.media.media.clone()))
        );
        assert!(outcome.task.is_empty());
    }

    #[test]
    fn test_orientation_change_respects_lock() {
        let mut state = state();
        state.orientation.fixed_orientation = Some(Orientation::Portrait);
        state.reduce_ui(UiEvent::OrientationChanged(Orientation::LandscapeRight));

        assert_eq!(state.orientation.orientation, Orientation::LandscapeRight);
        assert_eq!(state.orientation(), Orientation::Portrait);
    }
}
