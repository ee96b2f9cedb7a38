// SPDX-License-Identifier: GPL-3.0-only

//! Configuration handlers
//!
//! Applies the externally supplied [`SessionConfig`], tracks authentication
//! and permission status, and forwards caller log lines into `tracing`.

use crate::config::SessionConfig;
use crate::constants::LogSeverity;
use crate::errors::SessionError;
use crate::session::capture_config::FlashMode;
use crate::session::effects::Effect;
use crate::session::events::ConfigurationEvent;
use crate::session::state::SessionState;
use crate::session::task::{Outcome, Task};
use tracing::{debug, error, info, warn};

impl SessionState {
    pub(crate) fn reduce_configuration(&mut self, event: ConfigurationEvent) -> Outcome {
        match event {
            ConfigurationEvent::SetUpConfig(config) => self.handle_set_up_config(config),
            ConfigurationEvent::ValidateAuthentication => self.handle_validate_authentication(),
            ConfigurationEvent::AuthenticationValidated(result) => {
                self.handle_authentication_validated(result)
            }
            ConfigurationEvent::PermissionsGranted => {
                info!("Camera permissions granted");
                self.permission.granted = true;
                Outcome::none()
            }
            ConfigurationEvent::Log {
                event_name,
                message,
                severity,
            } => {
                match severity {
                    LogSeverity::Debug => debug!(event = %event_name, "{}", message),
                    LogSeverity::Info => info!(event = %event_name, "{}", message),
                    LogSeverity::Warning => warn!(event = %event_name, "{}", message),
                    LogSeverity::Error => error!(event = %event_name, "{}", message),
                }
                Outcome::none()
            }
        }
    }

    fn handle_set_up_config(&mut self, config: SessionConfig) -> Outcome {
        let recording = self.recording_state();
        if !recording.is_idle() {
            return self.reject("set-up-config", recording.name());
        }

        info!(
            lens = %config.lens_facing,
            flash = config.flash_on_by_default,
            output = ?config.output_path,
            mode = ?config.mode,
            "Applying session configuration"
        );

        let lens_facing = config.lens_facing;
        let flash = if config.flash_on_by_default {
            FlashMode::Single
        } else {
            FlashMode::Off
        };

        self.media.output_directory = config.output_path.clone();
        self.orientation.fixed_orientation = config.orientation;
        self.config.set_up = true;
        self.config.config = config;

        self.capture.preview.current_lens_facing = lens_facing;
        self.capture.preview.current_resolution = self.resolution_for(lens_facing);
        self.capture.capture = self.capture.capture.with_flash(flash);

        if self.capture.preview.current_resolution.is_none() {
            warn!(lens = %lens_facing, "No usable resolution for the configured lens");
        }
        Outcome::none()
    }

    fn handle_validate_authentication(&mut self) -> Outcome {
        debug!("Validating authentication");
        Outcome::task(Task::perform(|ctx| async move {
            let result = ctx.auth.validate().await.map_err(|e| e.to_string());
            ctx.send(ConfigurationEvent::AuthenticationValidated(result));
        }))
    }

    fn handle_authentication_validated(&mut self, result: Result<(), String>) -> Outcome {
        match result {
            Ok(()) => {
                info!("Session authenticated");
                self.permission.authenticated = true;
                Outcome::effect(Effect::ReportProperlyAuthenticated)
            }
            Err(reason) => {
                warn!(err = %SessionError::AuthenticationFailure(reason), "Authentication rejected");
                Outcome::effect(Effect::ReportAuthenticationError)
            }
        }
    }
}
