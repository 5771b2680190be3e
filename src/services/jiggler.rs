use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::{JigglerError, Result};
use crate::events::{square_path, Displacement, Position, ScreenSize, StopReason};
use crate::services::{FailSafe, PointerTrait};
use tokio::sync::watch;
use tokio::time::{sleep, Duration};
use tracing::info;

pub struct Jiggler {
    pointer: Box<dyn PointerTrait>,
    failsafe: FailSafe,
    path: [Displacement; 4],
    interval: Duration,
    move_duration: Duration,
    verbose: bool,
    cycles: u64,
}

impl Jiggler {
    pub fn new(config: &Config, pointer: Box<dyn PointerTrait>) -> Self {
        Self {
            pointer,
            failsafe: FailSafe::new(config.pointer.failsafe),
            path: square_path(config.jiggle.distance),
            interval: config.interval(),
            move_duration: config.move_duration(),
            verbose: config.verbose(),
            cycles: 0,
        }
    }

    #[allow(dead_code)]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Основной цикл. Завершается только по Ctrl+C (через `shutdown`),
    /// по FAILSAFE или при ошибке бэкенда.
    ///
    /// Прерывание учитывается в начале цикла и во время ожидания:
    /// начатый квадрат всегда доводится до конца.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<StopReason> {
        self.announce();

        let screen = self.pointer.screen_size().await?;
        debug_if_enabled!("Размер экрана: {}", screen);

        loop {
            if *shutdown.borrow() {
                return Ok(self.stop(StopReason::Interrupted));
            }

            match self.jiggle_once(screen).await {
                Ok(origin) => {
                    if self.verbose {
                        info!("Сдвиг выполнен в позиции {}", origin);
                    }
                }
                Err(JigglerError::FailSafe(reason)) => {
                    return Ok(self.stop(StopReason::FailSafe(reason)));
                }
                Err(e) => return Err(e),
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    return Ok(self.stop(StopReason::Interrupted));
                }
            }
        }
    }

    /// Один квадрат. Возвращает позицию указателя до сдвига.
    pub async fn jiggle_once(&mut self, screen: ScreenSize) -> Result<Position> {
        let origin = self.pointer.position().await?;
        // pyautogui сам проверяет углы внутри moveRel, лишние запросы позиции не нужны
        let check_legs = self.failsafe.is_enabled() && !self.pointer.enforces_failsafe();

        for (leg, step) in self.path.iter().enumerate() {
            // Перед каждым шагом проверяем, не увёл ли пользователь мышь в угол
            if check_legs {
                let current = if leg == 0 {
                    origin
                } else {
                    self.pointer.position().await?
                };
                self.failsafe.check(current, screen)?;
            }

            self.pointer.move_relative(*step, self.move_duration).await?;
        }

        self.cycles += 1;
        debug_if_enabled!("Цикл #{} завершён", self.cycles);
        Ok(origin)
    }

    fn announce(&self) {
        if !self.verbose {
            return;
        }

        info!("🐭 Mouse Jiggler запущен!");
        info!("   Интервал: {} сек", self.interval.as_secs());
        info!("   Смещение: {} пикс.", self.path[0].dx);
        if self.failsafe.is_enabled() {
            info!("   Переместите мышь в угол экрана для остановки (FAILSAFE)");
        }
        info!("   Нажмите Ctrl+C для выхода");
    }

    fn stop(&self, reason: StopReason) -> StopReason {
        if self.verbose {
            match &reason {
                StopReason::Interrupted => info!("👋 Mouse Jiggler остановлен. Продуктивной работы!"),
                StopReason::FailSafe(details) => info!("🛑 Сработал FAILSAFE: {}", details),
            }
        }
        debug_if_enabled!("Остановка после {} циклов: {:?}", self.cycles, reason);
        reason
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // Закрытый канал тоже означает остановку
    let _ = shutdown.wait_for(|stop| *stop).await;
}
