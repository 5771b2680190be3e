use crate::config::EnvironmentConfig;
use crate::error::{JigglerError, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

use super::environment::Environment;

/// Что и откуда ставить в окружение
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub package: String,
    pub module: String,
    pub index_url: Option<String>,
    pub trusted_host: Option<String>,
}

impl InstallRequest {
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self {
            package: config.package.clone(),
            module: config.module.clone(),
            index_url: config.index_url.clone(),
            trusted_host: config.trusted_host.clone(),
        }
    }

    /// Аргументы для `python -m ...`
    pub fn pip_args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            "-q".to_string(),
            self.package.clone(),
        ];
        if let Some(url) = &self.index_url {
            args.push("--index-url".to_string());
            args.push(url.clone());
        }
        if let Some(host) = &self.trusted_host {
            args.push("--trusted-host".to_string());
            args.push(host.clone());
        }
        args
    }
}

/// Внешние инструменты, которыми Launcher готовит окружение
pub trait Toolchain {
    /// Создать окружение; повторный вызов поверх частично созданного каталога допустим
    fn create(&self, env: &Environment) -> Result<()>;

    /// Доступен ли модуль внутри окружения
    fn probe(&self, env: &Environment, module: &str) -> bool;

    /// Установить пакет; ошибка установщика фатальна
    fn install(&self, env: &Environment, request: &InstallRequest) -> Result<()>;
}

/// Реальный набор: `python3 -m venv` + pip
pub struct VenvToolchain {
    base_runtime: String,
}

impl VenvToolchain {
    pub fn new(base_runtime: impl Into<String>) -> Self {
        Self {
            base_runtime: base_runtime.into(),
        }
    }

    fn which_runtime(&self) -> Result<PathBuf> {
        which::which(&self.base_runtime).map_err(|e| JigglerError::Backend(format!(
            "Не найден интерпретатор '{}' для создания окружения: {}",
            self.base_runtime, e
        )))
    }
}

fn check_status(tool: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(JigglerError::ToolFailed {
        tool: tool.to_string(),
        code: status.code().unwrap_or(1),
    })
}

impl Toolchain for VenvToolchain {
    fn create(&self, env: &Environment) -> Result<()> {
        let runtime = self.which_runtime()?;
        debug!("Создание venv: {:?} -m venv {:?}", runtime, env.dir());

        // Вывод не перехватываем: при ошибке пользователь видит диагностику venv
        let status = Command::new(&runtime)
            .arg("-m")
            .arg("venv")
            .arg(env.dir())
            .status()?;
        check_status(&format!("{} -m venv", self.base_runtime), status)
    }

    fn probe(&self, env: &Environment, module: &str) -> bool {
        let status = Command::new(env.python())
            .arg("-c")
            .arg(format!("import {}", module))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("Проверка модуля '{}' не запустилась: {}", module, e);
                false
            }
        }
    }

    fn install(&self, env: &Environment, request: &InstallRequest) -> Result<()> {
        let args: Vec<OsString> = request.pip_args().into_iter().map(OsString::from).collect();
        debug!("Установка: {:?} {:?}", env.python(), args);

        let status = Command::new(env.python()).args(&args).status()?;
        check_status("pip install", status)
    }
}
