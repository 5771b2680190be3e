use crate::error::{JigglerError, Result};
use crate::events::{Displacement, Position, ScreenSize};
use async_trait::async_trait;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::debug;

use super::r#trait::PointerTrait;

/// Управление указателем через pyautogui из изолированного окружения.
///
/// Каждая операция запускает короткий скрипт в python окружения.
pub struct PyAutoGuiPointer {
    python: PathBuf,
    failsafe: bool,
}

impl PyAutoGuiPointer {
    pub fn new(python: PathBuf, failsafe: bool) -> Self {
        debug!("Инициализация PyAutoGuiPointer ({:?}, failsafe: {})", python, failsafe);
        Self { python, failsafe }
    }

    fn run_script(&self, script: &str) -> Result<String> {
        let mut command = Command::new(&self.python);
        command.arg("-c").arg(script);
        // Ctrl+C из терминала должен получить только сам jiggler: начатый квадрат доводится до конца
        #[cfg(unix)]
        command.process_group(0);

        let output = command
            .output()
            .map_err(|e| {
                JigglerError::Backend(format!("Не удалось запустить {:?}: {}", self.python, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("FailSafeException") {
                return Err(JigglerError::FailSafe(
                    "pyautogui обнаружил указатель в углу экрана".to_string(),
                ));
            }
            return Err(JigglerError::Backend(format!(
                "pyautogui вернул ошибку: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub(crate) fn move_script(step: Displacement, duration: Duration, failsafe: bool) -> String {
    format!(
        "import pyautogui\npyautogui.FAILSAFE = {}\npyautogui.moveRel({}, {}, duration={:.3})\n",
        if failsafe { "True" } else { "False" },
        step.dx,
        step.dy,
        duration.as_secs_f64()
    )
}

/// Разбор строки `x y`, которую печатают скрипты позиции и размера экрана
pub(crate) fn parse_pair(output: &str) -> Option<(i64, i64)> {
    let mut parts = output.split_whitespace();
    let first = parts.next()?.parse().ok()?;
    let second = parts.next()?.parse().ok()?;
    Some((first, second))
}

#[async_trait]
impl PointerTrait for PyAutoGuiPointer {
    async fn position(&mut self) -> Result<Position> {
        let stdout = self.run_script("import pyautogui\np = pyautogui.position()\nprint(p[0], p[1])\n")?;
        match parse_pair(&stdout) {
            Some((x, y)) => Ok(Position::new(
                i32::try_from(x).unwrap_or(i32::MAX),
                i32::try_from(y).unwrap_or(i32::MAX),
            )),
            None => JigglerError::backend(format!("Неожиданный вывод pyautogui.position(): '{}'", stdout.trim())),
        }
    }

    async fn screen_size(&mut self) -> Result<ScreenSize> {
        let stdout = self.run_script("import pyautogui\ns = pyautogui.size()\nprint(s[0], s[1])\n")?;
        match parse_pair(&stdout) {
            Some((width, height)) if width > 0 && height > 0 => Ok(ScreenSize::new(
                u32::try_from(width).unwrap_or(u32::MAX),
                u32::try_from(height).unwrap_or(u32::MAX),
            )),
            _ => JigglerError::backend(format!("Неожиданный вывод pyautogui.size(): '{}'", stdout.trim())),
        }
    }

    async fn move_relative(&mut self, step: Displacement, duration: Duration) -> Result<()> {
        self.run_script(&move_script(step, duration, self.failsafe))?;
        Ok(())
    }

    fn enforces_failsafe(&self) -> bool {
        self.failsafe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_script() {
        let script = move_script(Displacement::new(-2, 0), Duration::from_millis(100), true);
        assert!(script.contains("pyautogui.FAILSAFE = True"));
        assert!(script.contains("pyautogui.moveRel(-2, 0, duration=0.100)"));

        let script = move_script(Displacement::new(0, 1), Duration::ZERO, false);
        assert!(script.contains("pyautogui.FAILSAFE = False"));
        assert!(script.contains("duration=0.000"));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("12 34\n"), Some((12, 34)));
        assert_eq!(parse_pair("-5 7"), Some((-5, 7)));
        assert_eq!(parse_pair("12"), None);
        assert_eq!(parse_pair("Point(x=1, y=2)"), None);
    }

    #[tokio::test]
    async fn test_missing_python_is_backend_error() {
        let mut pointer = PyAutoGuiPointer::new(PathBuf::from("/nonexistent/bin/python3"), true);
        let err = pointer.position().await.unwrap_err();
        assert!(matches!(err, JigglerError::Backend(_)));
    }

    // Скрипты запускаются через /bin/sh вместо python: run_script лишь передаёт `-c`

    #[cfg(target_os = "linux")]
    #[test]
    fn test_script_runs_in_own_process_group() {
        let pointer = PyAutoGuiPointer::new(PathBuf::from("/bin/sh"), true);
        let stdout = pointer
            .run_script("echo $$ $(cut -d' ' -f5 /proc/$$/stat)")
            .unwrap();

        let (pid, pgrp) = parse_pair(&stdout).unwrap();
        assert_eq!(pid, pgrp);
    }

    #[cfg(unix)]
    #[test]
    fn test_group_sigint_does_not_reach_jiggler() {
        let pointer = PyAutoGuiPointer::new(PathBuf::from("/bin/sh"), true);
        // SIGINT всей группе процессов, как при Ctrl+C в терминале
        let stdout = pointer
            .run_script("trap '' INT; kill -INT 0; echo 3 4")
            .unwrap();

        assert_eq!(parse_pair(&stdout), Some((3, 4)));
        assert!(pointer.enforces_failsafe());
    }
}
