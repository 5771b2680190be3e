use crate::error::Result;
use crate::events::{Displacement, Position, ScreenSize};
use crate::services::VirtualDevice;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

use super::r#trait::PointerTrait;
use super::xdotool::XdotoolLocator;

/// Указатель на базе uinput: сдвиги через виртуальную мышь, позиция через xdotool
pub struct UinputPointer {
    device: VirtualDevice,
    locator: XdotoolLocator,
}

impl UinputPointer {
    pub fn new(device_name: &str) -> Result<Self> {
        let locator = XdotoolLocator::new();
        locator.test()?;

        Ok(Self {
            device: VirtualDevice::new(device_name)?,
            locator,
        })
    }
}

/// Разбивает сдвиг на не более чем `max_steps` шагов для плавной анимации
pub(crate) fn motion_steps(step: Displacement, max_steps: u32) -> Vec<Displacement> {
    let count = step
        .dx
        .unsigned_abs()
        .max(step.dy.unsigned_abs())
        .min(max_steps.max(1));
    if step.is_zero() {
        return Vec::new();
    }

    let count = i64::from(count);
    let (dx, dy) = (i64::from(step.dx), i64::from(step.dy));
    (1..=count)
        .map(|i| {
            // Целочисленная интерполяция: сумма шагов в точности равна step
            let x = dx * i / count - dx * (i - 1) / count;
            let y = dy * i / count - dy * (i - 1) / count;
            Displacement::new(x as i32, y as i32)
        })
        .collect()
}

#[async_trait]
impl PointerTrait for UinputPointer {
    async fn position(&mut self) -> Result<Position> {
        self.locator.get_mouse_location().await
    }

    async fn screen_size(&mut self) -> Result<ScreenSize> {
        self.locator.get_display_geometry().await
    }

    async fn move_relative(&mut self, step: Displacement, duration: Duration) -> Result<()> {
        // Таймеры tokio не точнее миллисекунды: не больше одного шага на мс
        let max_steps = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        let steps = motion_steps(step, max_steps);
        if steps.is_empty() {
            return Ok(());
        }

        let pause = duration / steps.len() as u32;
        for unit in steps {
            self.device.send_motion(unit)?;
            sleep(pause).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_steps_sum_to_step() {
        for step in [
            Displacement::new(5, 0),
            Displacement::new(0, -3),
            Displacement::new(7, -2),
            Displacement::new(-1, 1),
        ] {
            let steps = motion_steps(step, 100);
            let dx: i32 = steps.iter().map(|s| s.dx).sum();
            let dy: i32 = steps.iter().map(|s| s.dy).sum();
            assert_eq!((dx, dy), (step.dx, step.dy));
            assert!(steps.iter().all(|s| s.dx.abs() <= 1 && s.dy.abs() <= 1));
        }
    }

    #[test]
    fn test_zero_step_has_no_units() {
        assert!(motion_steps(Displacement::default(), 100).is_empty());
    }

    #[test]
    fn test_long_step_is_capped_to_max_steps() {
        let step = Displacement::new(-10_000, 0);
        let steps = motion_steps(step, 100);
        assert_eq!(steps.len(), 100);
        assert!(steps.iter().all(|s| s.dx == -100 && s.dy == 0));

        // Нулевая длительность: один шаг на весь сдвиг
        let steps = motion_steps(Displacement::new(3, -7), 0);
        assert_eq!(steps, vec![Displacement::new(3, -7)]);
    }
}
