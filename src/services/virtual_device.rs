use crate::error::{JigglerError, Result};
use crate::events::Displacement;
use tracing::{debug, info};
use uinput::event::controller::{Controller::Mouse, Mouse::Left};
use uinput::event::relative::{Position::{X, Y}, Relative::Position};
use uinput::event::Event::{Controller, Relative};

/// Виртуальная мышь /dev/uinput, умеющая только относительные сдвиги
pub struct VirtualDevice {
    device: uinput::Device,
    device_name: String,
}

impl VirtualDevice {
    pub fn new(device_name: &str) -> Result<Self> {
        info!("Создание виртуального устройства uinput '{}' для сдвигов указателя", device_name);

        // Без кнопки ядро не считает устройство мышью и игнорирует REL события
        let device = uinput::default()?
            .name(device_name)?
            .event(Controller(Mouse(Left)))?
            .event(Relative(Position(X)))?
            .event(Relative(Position(Y)))?
            .create()
            .map_err(|e| JigglerError::Backend(format!("Не удалось создать виртуальное устройство '{}': {}", device_name, e)))?;

        debug!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(Self {
            device,
            device_name: device_name.to_string(),
        })
    }

    pub fn send_motion(&mut self, step: Displacement) -> Result<()> {
        if step.is_zero() {
            return Ok(());
        }

        if step.dx != 0 {
            self.device.send(X, step.dx)?;
        }
        if step.dy != 0 {
            self.device.send(Y, step.dy)?;
        }

        // Синхронизируем события
        self.device.synchronize()?;
        Ok(())
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        debug!("Закрытие виртуального устройства '{}'", self.device_name);
    }
}
