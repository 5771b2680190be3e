use crate::error::{JigglerError, Result};
use crate::events::{Position, ScreenSize};

/// Аварийная остановка: указатель в любом углу экрана прерывает автоматические сдвиги
#[derive(Debug, Clone, Copy)]
pub struct FailSafe {
    enabled: bool,
}

impl FailSafe {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn check(&self, position: Position, screen: ScreenSize) -> Result<()> {
        if self.enabled && screen.corners().contains(&position) {
            return Err(JigglerError::FailSafe(format!(
                "указатель в углу экрана {}",
                position
            )));
        }
        Ok(())
    }
}
