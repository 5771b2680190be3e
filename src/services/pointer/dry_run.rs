use crate::error::Result;
use crate::events::{Displacement, Position, ScreenSize};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::r#trait::PointerTrait;

/// Состояние эмулируемого указателя
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct DryRunState {
    pub position: Position,
    pub screen: ScreenSize,
    pub moves: Vec<Displacement>,
}

/// Указатель в памяти: ничего не двигает, только считает
pub struct DryRunPointer {
    state: Arc<Mutex<DryRunState>>,
}

impl DryRunPointer {
    pub fn new() -> Self {
        Self::with_state(Position::new(960, 540), ScreenSize::new(1920, 1080))
    }

    #[allow(dead_code)]
    pub fn with_state(position: Position, screen: ScreenSize) -> Self {
        Self {
            state: Arc::new(Mutex::new(DryRunState {
                position,
                screen,
                moves: Vec::new(),
            })),
        }
    }

    #[allow(dead_code)]
    /// Общий доступ к состоянию (для проверки после запуска)
    pub fn state(&self) -> Arc<Mutex<DryRunState>> {
        Arc::clone(&self.state)
    }
}

impl Default for DryRunPointer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PointerTrait for DryRunPointer {
    async fn position(&mut self) -> Result<Position> {
        Ok(self.state.lock().position)
    }

    async fn screen_size(&mut self) -> Result<ScreenSize> {
        Ok(self.state.lock().screen)
    }

    async fn move_relative(&mut self, step: Displacement, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;

        let mut state = self.state.lock();
        state.position = state.position.offset(step);
        state.moves.push(step);
        debug!("[DRY RUN] Сдвиг {} -> {}", step, state.position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_pointer_tracks_moves() {
        let mut pointer = DryRunPointer::with_state(Position::new(10, 10), ScreenSize::new(100, 100));
        let state = pointer.state();

        pointer
            .move_relative(Displacement::new(2, 0), Duration::from_millis(100))
            .await
            .unwrap();
        pointer
            .move_relative(Displacement::new(0, -3), Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(pointer.position().await.unwrap(), Position::new(12, 7));
        assert_eq!(state.lock().moves.len(), 2);
        assert_eq!(pointer.screen_size().await.unwrap(), ScreenSize::new(100, 100));
    }
}
