// SPDX-License-Identifier: GPL-3.0-only

//! Controls handlers
//!
//! Handles preview lifecycle, lens flip, tap-to-focus, zoom, flash and app
//! foreground/background transitions.

use crate::backends::camera::{ConnectivityEvent, FocusState, SurfaceRef, ZoomEvent};
use crate::constants::{FOCUS_INDICATOR_SIZE, messages};
use crate::session::capture_config::{clamp_zoom, focus_rectangle};
use crate::session::effects::{CameraEventData, Effect};
use crate::session::events::ControlsEvent;
use crate::session::state::{
    ConnectionState, IndicatorPosition, Panel, SessionState, ZoomIndicatorMode,
};
use crate::session::task::{Outcome, Task};
use futures::StreamExt;
use tracing::{debug, info, warn};

impl SessionState {
    pub(crate) fn reduce_controls(&mut self, event: ControlsEvent) -> Outcome {
        match event {
            ControlsEvent::StartPreview {
                surface,
                width,
                height,
            } => self.handle_start_preview(surface, width, height),
            ControlsEvent::ClosePreview => self.handle_close_preview(),
            ControlsEvent::FlashButtonPressed => self.handle_toggle_flash(),
            ControlsEvent::FlipLensButtonPressed => self.handle_flip_lens(),
            ControlsEvent::TapToFocus { x, y } => self.handle_tap_to_focus(x, y),
            ControlsEvent::ZoomLevelChanged(level) => self.handle_zoom_level(level, true),
            ControlsEvent::ZoomLevelScaled(scale) => {
                let level = clamp_zoom(self.capture.capture.zoom_level * scale);
                self.handle_zoom_level(level, false)
            }
            ControlsEvent::AppBackground => self.handle_app_background(),
            ControlsEvent::AppForeground => self.handle_app_foreground(),
            ControlsEvent::FocusStateChanged(focus_state) => {
                self.handle_focus_state_changed(focus_state)
            }
            ControlsEvent::ZoomResult {
                level,
                previous,
                result,
            } => self.handle_zoom_result(level, previous, result),
            ControlsEvent::Connectivity(event) => self.handle_connectivity(event),
        }
    }

    // =========================================================================
    // Preview
    // =========================================================================

    fn handle_start_preview(&mut self, surface: SurfaceRef, width: u32, height: u32) -> Outcome {
        let Some(resolution) = self.capture.preview.current_resolution else {
            warn!("Cannot start preview: no resolution selected");
            return Outcome::none();
        };
        let Some(device_id) = self.current_device().map(|d| d.id.clone()) else {
            warn!(lens = %self.capture.preview.current_lens_facing, "Cannot start preview: no device");
            return Outcome::none();
        };

        info!(device = %device_id, %resolution, width, height, "Starting preview");
        self.capture.preview.viewport_width = width;
        self.capture.preview.viewport_height = height;

        let config = self.capture.capture.clone();
        Outcome::task(Task::perform(move |ctx| async move {
            if let Err(e) = ctx
                .engine
                .start_preview(device_id, surface, resolution, config)
                .await
            {
                warn!(error = %e, "Preview failed to start");
                ctx.send(ControlsEvent::Connectivity(ConnectivityEvent::Error(e)));
            }
        }))
    }

    fn handle_close_preview(&mut self) -> Outcome {
        if !self.media.media.is_empty() {
            info!(media = self.media.media.len(), "Close requested with media, asking to discard");
            self.panels.panel = Panel::DiscardConfirmation;
            return Outcome::none();
        }

        info!("Closing preview");
        Outcome::with(
            Effect::ClosePreview,
            Task::perform(|ctx| async move {
                if let Err(e) = ctx.engine.stop_preview().await {
                    warn!(error = %e, "Failed to stop preview");
                }
            }),
        )
    }

    fn handle_app_background(&mut self) -> Outcome {
        if !self.recording_state().is_recording() {
            return Outcome::none();
        }

        info!("App in background, pausing recording");
        Outcome::task(Task::perform(|ctx| async move {
            if let Err(e) = ctx.engine.pause_recording().await {
                warn!(error = %e, "Failed to pause recording");
            }
        }))
    }

    fn handle_app_foreground(&mut self) -> Outcome {
        if self.connection.is_connected() {
            return Outcome::none();
        }
        let Some(resolution) = self.capture.preview.current_resolution else {
            return Outcome::none();
        };
        let Some(device_id) = self.current_device().map(|d| d.id.clone()) else {
            return Outcome::none();
        };

        info!(device = %device_id, "App in foreground, reopening camera");
        let config = self.capture.capture.clone();
        Outcome::task(Task::perform(move |ctx| async move {
            if let Err(e) = ctx.engine.change_camera(device_id, resolution, config).await {
                warn!(error = %e, "Failed to reopen camera");
                ctx.send(ControlsEvent::Connectivity(ConnectivityEvent::Error(e)));
            }
        }))
    }

    fn handle_connectivity(&mut self, event: ConnectivityEvent) -> Outcome {
        self.connection = match event {
            ConnectivityEvent::Connected => {
                debug!("Camera connected");
                ConnectionState::Connected
            }
            ConnectivityEvent::Disconnected => {
                info!("Camera disconnected");
                ConnectionState::Disconnected
            }
            ConnectivityEvent::Error(e) => {
                warn!(error = %e, "Camera error");
                ConnectionState::Error
            }
        };
        Outcome::none()
    }

    // =========================================================================
    // Lens and flash
    // =========================================================================

    fn handle_flip_lens(&mut self) -> Outcome {
        let recording = self.recording_state();
        if !recording.is_idle() {
            return self.reject("flip-lens", recording.name());
        }

        let facing = self.capture.preview.current_lens_facing.reversed();
        let Some(device_id) = self.camera_info.device(facing).map(|d| d.id.clone()) else {
            debug!(lens = %facing, "No device to flip to");
            return Outcome::none();
        };
        let Some(resolution) = self.resolution_for(facing) else {
            debug!(lens = %facing, "No usable resolution to flip to");
            return Outcome::none();
        };

        info!(lens = %facing, %resolution, "Flipping camera");
        self.capture.preview.current_lens_facing = facing;
        self.capture.preview.current_resolution = Some(resolution);

        let config = self.capture.capture.clone();
        Outcome::task(Task::perform(move |ctx| async move {
            if let Err(e) = ctx.engine.change_camera(device_id, resolution, config).await {
                warn!(error = %e, "Failed to switch camera");
                ctx.send(ControlsEvent::Connectivity(ConnectivityEvent::Error(e)));
                return;
            }
            ctx.report(CameraEventData::CameraDeviceChanged {
                lens_facing: facing,
            });
        }))
    }

    fn handle_toggle_flash(&mut self) -> Outcome {
        if !self.current_device().is_some_and(|d| d.with_flash) {
            debug!("Current device has no flash");
            return Outcome::none();
        }

        let image_only = self.mode().is_image_only();
        let mut flash = self.capture.capture.flash.toggled(image_only);
        // No frames are written while paused
        if self.recording_state().is_paused() {
            flash = flash.momentary();
        }
        info!(from = %self.capture.capture.flash, to = %flash, "Toggling flash");

        self.capture.capture = self.capture.capture.with_flash(flash);
        self.capture.preview.zoom_indicator_mode = ZoomIndicatorMode::Indicator;

        if image_only {
            // Applied with the next still capture
            return Outcome::task(Task::report(CameraEventData::FlashModeChanged { flash }));
        }

        let config = self.capture.capture.clone();
        Outcome::task(Task::perform(move |ctx| async move {
            if let Err(e) = ctx.engine.restart_preview(config).await {
                warn!(error = %e, "Failed to apply flash");
                return;
            }
            ctx.report(CameraEventData::FlashModeChanged { flash });
        }))
    }

    // =========================================================================
    // Focus and zoom
    // =========================================================================

    fn handle_tap_to_focus(&mut self, x: f32, y: f32) -> Outcome {
        let Some(device) = self.current_device() else {
            return Outcome::none();
        };
        if !device.tap_to_focus_enabled {
            debug!(device = %device.id, "Tap to focus not supported");
            return Outcome::none();
        }

        let preview = &self.capture.preview;
        let Some(area) = focus_rectangle(
            x,
            y,
            preview.viewport_width,
            preview.viewport_height,
            device.sensor_size,
            device.sensor_orientation,
        ) else {
            debug!("Tap to focus before the viewport is known");
            return Outcome::none();
        };

        let position = IndicatorPosition {
            x: ((x - FOCUS_INDICATOR_SIZE) as i32).max(0),
            y: ((y - FOCUS_INDICATOR_SIZE) as i32).max(0),
        };
        info!(x, y, ?area, "Focus requested");

        self.capture.capture = self.capture.capture.with_focus_area(area);
        self.focus_indicator.position = position;

        let config = self.capture.capture.clone();
        Outcome::task(Task::perform(move |ctx| async move {
            let mut states = ctx.engine.request_focus(config);
            while let Some(focus_state) = states.next().await {
                ctx.send(ControlsEvent::FocusStateChanged(focus_state));
            }
        }))
    }

    fn handle_focus_state_changed(&mut self, focus_state: FocusState) -> Outcome {
        if focus_state == FocusState::FocusedLocked {
            info!("Focus locked");
        } else {
            debug!(?focus_state, "Focus state changed");
        }

        self.focus_indicator.focus_state = focus_state;
        Outcome::effect(Effect::ShowFocusIndicator {
            position: self.focus_indicator.position,
            focus_state,
        })
    }

    fn handle_zoom_level(&mut self, level: f32, report: bool) -> Outcome {
        let Some(sensor) = self.current_device().map(|d| d.sensor_size) else {
            debug!("Zoom without a current device");
            return Outcome::none();
        };

        let previous = self.capture.capture.zoom_level;
        self.capture.capture = self.capture.capture.with_zoom(level, sensor);
        let config = self.capture.capture.clone();
        let level = config.zoom_level;
        info!(level, previous, "Zoom changed");

        Outcome::task(Task::perform(move |ctx| async move {
            let mut events = ctx.engine.set_zoom(config);
            while let Some(result) = events.next().await {
                if let (ZoomEvent::Applied(zoom_level), true) = (&result, report) {
                    ctx.report(CameraEventData::ZoomChanged {
                        zoom_level: *zoom_level,
                    });
                }
                ctx.send(ControlsEvent::ZoomResult {
                    level,
                    previous,
                    result,
                });
            }
        }))
    }

    fn handle_zoom_result(&mut self, level: f32, previous: f32, result: ZoomEvent) -> Outcome {
        // A newer request owns the zoom now
        if self.capture.capture.zoom_level != level {
            debug!(level, current = self.capture.capture.zoom_level, "Stale zoom result");
            return Outcome::none();
        }

        match result {
            ZoomEvent::Applied(applied) => {
                debug!(level = applied, "Zoom applied");
                Outcome::none()
            }
            ZoomEvent::Failed(e) => {
                warn!(error = %e, level, previous, "Failed to apply zoom, restoring");
                if let Some(sensor) = self.current_device().map(|d| d.sensor_size) {
                    self.capture.capture = self.capture.capture.with_zoom(previous, sensor);
                }
                Outcome::with(
                    Effect::ShowToastMessage(messages::ZOOM_FAILED.to_string()),
                    Task::dismiss_toast(),
                )
            }
        }
    }
}
