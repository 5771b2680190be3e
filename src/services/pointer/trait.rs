use crate::bootstrap::Environment;
use crate::config::{Config, PointerBackend};
use crate::error::{JigglerError, Result};
use crate::events::{Displacement, Position, ScreenSize};
use std::time::Duration;

/// Trait for pointer backends that can run in different modes
#[async_trait::async_trait]
pub trait PointerTrait: Send {
    /// Current pointer position
    async fn position(&mut self) -> Result<Position>;

    /// Size of the screen the pointer lives on
    async fn screen_size(&mut self) -> Result<ScreenSize>;

    /// Move the pointer relative to its current position, animated over `duration`
    async fn move_relative(&mut self, step: Displacement, duration: Duration) -> Result<()>;

    /// Whether the backend stops on a screen corner by itself during `move_relative`
    fn enforces_failsafe(&self) -> bool {
        false
    }
}

/// Factory function to create an appropriate pointer backend based on the config and dry_run flag
pub fn create_pointer(
    config: &Config,
    environment: Option<&Environment>,
    dry_run: bool,
) -> Result<Box<dyn PointerTrait>> {
    if dry_run {
        return Ok(Box::new(super::dry_run::DryRunPointer::new()));
    }

    match config.pointer.backend {
        PointerBackend::Pyautogui => {
            let environment = environment.ok_or_else(|| {
                JigglerError::Backend(
                    "бэкенд pyautogui требует подготовленного окружения".to_string(),
                )
            })?;
            Ok(Box::new(super::pyautogui::PyAutoGuiPointer::new(
                environment.python(),
                config.pointer.failsafe,
            )))
        }
        PointerBackend::Uinput => {
            crate::utils::permissions::check_permissions()?;
            Ok(Box::new(super::uinput_pointer::UinputPointer::new(
                &config.pointer.device_name,
            )?))
        }
    }
}
