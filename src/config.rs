use anyhow::{Context, Result};
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Максимальное смещение за один шаг квадрата, пиксели
pub const MAX_DISTANCE: u32 = 10_000;

/// Максимальная длительность анимации одного шага, мс
pub const MAX_MOVE_DURATION_MS: u64 = 10_000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub jiggle: JiggleConfig,
    pub pointer: PointerConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiggleConfig {
    pub interval_secs: u64,
    pub distance: u32,
    pub move_duration_ms: u64,
    pub quiet: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PointerConfig {
    pub backend: PointerBackend,
    pub failsafe: bool,
    pub device_name: String,
}

/// Настройки изолированного Python окружения для бэкенда pyautogui
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    /// Явный путь к окружению; по умолчанию `dir_name` рядом с исполняемым файлом
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub dir_name: String,
    pub base_runtime: String,
    pub package: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_host: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PointerBackend {
    /// pyautogui внутри изолированного venv
    Pyautogui,
    /// Виртуальная мышь /dev/uinput + xdotool
    Uinput,
}

impl PointerBackend {
    pub fn needs_environment(self) -> bool {
        matches!(self, PointerBackend::Pyautogui)
    }
}

/// Значения из командной строки, перекрывающие окружение и значения по умолчанию
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub interval: Option<u64>,
    pub distance: Option<u32>,
    pub quiet: bool,
    pub backend: Option<PointerBackend>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jiggle: JiggleConfig {
                interval_secs: 60,
                distance: 1,
                move_duration_ms: 100,
                quiet: false,
            },
            pointer: PointerConfig {
                backend: PointerBackend::Pyautogui,
                failsafe: true,
                device_name: "Mouse-Jiggler Virtual Pointer".to_string(),
            },
            environment: EnvironmentConfig {
                dir: None,
                dir_name: ".jiggler-venv".to_string(),
                base_runtime: "python3".to_string(),
                package: "pyautogui".to_string(),
                module: "pyautogui".to_string(),
                index_url: None,
                trusted_host: None,
            },
        }
    }
}

impl Config {
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("JIGGLER_").split("__"));

        Self::from_figment(figment, overrides)
    }

    pub fn from_figment(figment: Figment, overrides: &CliOverrides) -> Result<Self> {
        let mut config: Config = figment
            .extract()
            .context("Не удалось загрузить конфигурацию из переменных окружения JIGGLER_*")?;

        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(interval) = overrides.interval {
            self.jiggle.interval_secs = interval;
        }
        if let Some(distance) = overrides.distance {
            self.jiggle.distance = distance;
        }
        if overrides.quiet {
            self.jiggle.quiet = true;
        }
        if let Some(backend) = overrides.backend {
            self.pointer.backend = backend;
        }
    }

    pub fn validate(&self) -> Result<()> {
        // Нулевой интервал превратил бы цикл в busy-loop
        if self.jiggle.interval_secs == 0 {
            anyhow::bail!("interval должен быть больше 0 секунд");
        }

        if self.jiggle.distance == 0 {
            anyhow::bail!("distance должно быть больше 0 пикселей");
        }

        if self.jiggle.distance > MAX_DISTANCE {
            anyhow::bail!(
                "distance слишком большое: {} (максимум {})",
                self.jiggle.distance,
                MAX_DISTANCE
            );
        }

        if self.jiggle.move_duration_ms > MAX_MOVE_DURATION_MS {
            anyhow::bail!(
                "move_duration_ms должно быть не больше {}",
                MAX_MOVE_DURATION_MS
            );
        }

        if self.pointer.device_name.trim().is_empty() {
            anyhow::bail!("Пустое имя виртуального устройства");
        }

        let env = &self.environment;
        if env.dir.is_none() && env.dir_name.trim().is_empty() {
            anyhow::bail!("Не задан каталог окружения: dir или dir_name");
        }

        if env.base_runtime.trim().is_empty() {
            anyhow::bail!("Пустой base_runtime");
        }

        if env.package.trim().is_empty() || env.module.trim().is_empty() {
            anyhow::bail!("package и module не могут быть пустыми");
        }

        if let Some(url) = &env.index_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("Неверный index_url: {}", url);
            }
        }

        if let Some(host) = &env.trusted_host {
            if host.trim().is_empty() || host.contains('/') {
                anyhow::bail!("Неверный trusted_host: '{}'", host);
            }
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.jiggle.interval_secs)
    }

    pub fn move_duration(&self) -> Duration {
        Duration::from_millis(self.jiggle.move_duration_ms)
    }

    pub fn verbose(&self) -> bool {
        !self.jiggle.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.jiggle.distance, 1);
        assert!(config.verbose());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = Config::default();
        config.apply_overrides(&CliOverrides {
            interval: Some(0),
            ..Default::default()
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_zero_and_huge_distance_are_rejected() {
        let mut config = Config::default();
        config.jiggle.distance = 0;
        assert!(config.validate().is_err());

        config.jiggle.distance = MAX_DISTANCE + 1;
        assert!(config.validate().is_err());

        config.jiggle.distance = MAX_DISTANCE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&CliOverrides {
            interval: Some(5),
            distance: Some(2),
            quiet: true,
            backend: Some(PointerBackend::Uinput),
        });

        assert_eq!(config.jiggle.interval_secs, 5);
        assert_eq!(config.jiggle.distance, 2);
        assert!(!config.verbose());
        assert_eq!(config.pointer.backend, PointerBackend::Uinput);
        assert!(!config.pointer.backend.needs_environment());
    }

    #[test]
    fn test_index_url_validation() {
        let mut config = Config::default();
        config.environment.index_url = Some("ftp://mirror/simple".to_string());
        assert!(config.validate().is_err());

        config.environment.index_url = Some("https://pypi.example.com/simple".to_string());
        config.environment.trusted_host = Some("pypi.example.com".to_string());
        assert!(config.validate().is_ok());

        config.environment.trusted_host = Some("https://pypi.example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_provider_and_cli_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("JIGGLER_JIGGLE__INTERVAL_SECS", "30");
            jail.set_env("JIGGLER_JIGGLE__DISTANCE", "4");
            jail.set_env("JIGGLER_POINTER__BACKEND", "uinput");
            jail.set_env("JIGGLER_ENVIRONMENT__INDEX_URL", "https://mirror.local/simple");
            jail.set_env("JIGGLER_ENVIRONMENT__TRUSTED_HOST", "mirror.local");

            let overrides = CliOverrides {
                distance: Some(2),
                ..Default::default()
            };
            let config = Config::load(&overrides).expect("конфигурация должна загрузиться");

            assert_eq!(config.jiggle.interval_secs, 30);
            assert_eq!(config.jiggle.distance, 2);
            assert_eq!(config.pointer.backend, PointerBackend::Uinput);
            assert_eq!(
                config.environment.index_url.as_deref(),
                Some("https://mirror.local/simple")
            );
            assert_eq!(config.environment.trusted_host.as_deref(), Some("mirror.local"));
            assert!(config.environment.dir.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_env_zero_interval_fails_to_load() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("JIGGLER_JIGGLE__INTERVAL_SECS", "0");
            assert!(Config::load(&CliOverrides::default()).is_err());
            Ok(())
        });
    }
}
