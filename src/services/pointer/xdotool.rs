use crate::error::{JigglerError, Result};
use crate::events::{Position, ScreenSize};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::process::Command;
use tracing::debug;

/// Чтение позиции указателя и размера экрана через xdotool
pub struct XdotoolLocator;

impl XdotoolLocator {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        which::which("xdotool")
            .map(|_| ())
            .map_err(|e| JigglerError::Backend(format!("xdotool не найден: {}", e)))
    }

    pub async fn get_mouse_location(&self) -> Result<Position> {
        let stdout = Self::run(&["getmouselocation", "--shell"])?;
        parse_mouse_location(&stdout).ok_or_else(|| {
            JigglerError::Backend(format!("Неожиданный вывод xdotool getmouselocation: '{}'", stdout.trim()))
        })
    }

    pub async fn get_display_geometry(&self) -> Result<ScreenSize> {
        let stdout = Self::run(&["getdisplaygeometry"])?;
        parse_display_geometry(&stdout).ok_or_else(|| {
            JigglerError::Backend(format!("Неожиданный вывод xdotool getdisplaygeometry: '{}'", stdout.trim()))
        })
    }

    fn run(args: &[&str]) -> Result<String> {
        let mut command = Command::new("xdotool");
        command.args(args);
        #[cfg(unix)]
        command.process_group(0);

        let output = command
            .output()
            .map_err(|e| {
                debug!("xdotool не найден или не работает: {}", e);
                JigglerError::Backend(format!("xdotool не найден: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool вернул ошибку: {}", stderr);
            return Err(JigglerError::Backend(format!("xdotool вернул ошибку: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Разбор `xdotool getmouselocation --shell` (строки вида `X=12`)
pub(crate) fn parse_mouse_location(output: &str) -> Option<Position> {
    let mut x = None;
    let mut y = None;
    for line in output.lines() {
        match line.trim().split_once('=') {
            Some(("X", value)) => x = value.trim().parse().ok(),
            Some(("Y", value)) => y = value.trim().parse().ok(),
            _ => {}
        }
    }
    Some(Position::new(x?, y?))
}

/// Разбор `xdotool getdisplaygeometry` (`1920 1080`)
pub(crate) fn parse_display_geometry(output: &str) -> Option<ScreenSize> {
    let mut parts = output.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    Some(ScreenSize::new(width, height))
}
