use crate::error::{JigglerError, Result};
use std::process::Command;
use tracing::{debug, info};

use super::context::{ExecutionContext, VIRTUAL_ENV_VAR};
use super::environment::Environment;
use super::toolchain::{InstallRequest, Toolchain};

/// Результат подготовки окружения
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// Уже внутри окружения, можно запускать цикл
    Ready(Environment),
    /// Окружение готово, процесс нужно перезапустить внутри него
    Reexec(Environment),
}

pub struct Launcher<T: Toolchain> {
    toolchain: T,
    request: InstallRequest,
    verbose: bool,
}

impl<T: Toolchain> Launcher<T> {
    pub fn new(toolchain: T, request: InstallRequest, verbose: bool) -> Self {
        Self {
            toolchain,
            request,
            verbose,
        }
    }

    pub fn ensure(&self, context: &ExecutionContext, env: Environment) -> Result<Bootstrap> {
        if context.is_provisioned(env.dir()) {
            debug!("Процесс уже запущен в окружении {:?}", env.dir());
            return Ok(Bootstrap::Ready(env));
        }

        // Каталог без интерпретатора = прерванное создание, просто повторяем
        if !env.runtime_exists() {
            self.progress(format_args!("🔧 Первый запуск: создаём окружение {:?}...", env.dir()));
            self.toolchain.create(&env)?;
            self.progress(format_args!("✅ Окружение создано!"));
        }

        // Наличие каталога не гарантирует установленный пакет
        if !self.toolchain.probe(&env, &self.request.module) {
            self.progress(format_args!("📦 Устанавливаем зависимости ({})...", self.request.package));
            self.toolchain.install(&env, &self.request)?;
            self.progress(format_args!("✅ Зависимости установлены!"));
        }

        Ok(Bootstrap::Reexec(env))
    }

    fn progress(&self, message: std::fmt::Arguments<'_>) {
        if self.verbose {
            info!("{}", message);
        }
    }
}

/// Заменяет образ текущего процесса тем же исполняемым файлом с теми же
/// аргументами, но уже внутри окружения `env`. Возвращается только при ошибке.
pub fn reexec(env: &Environment) -> JigglerError {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(source) => {
            return JigglerError::Reexec {
                path: env.dir().to_path_buf(),
                source,
            }
        }
    };

    let mut command = Command::new(&exe);
    command
        .args(std::env::args_os().skip(1))
        .env(VIRTUAL_ENV_VAR, env.dir())
        .env_remove("PYTHONHOME");

    let path = std::env::var_os("PATH").unwrap_or_default();
    let paths = std::iter::once(env.bin_dir()).chain(std::env::split_paths(&path));
    match std::env::join_paths(paths) {
        Ok(joined) => {
            command.env("PATH", joined);
        }
        Err(e) => debug!("PATH оставлен без изменений: {}", e),
    }

    debug!("Перезапуск {:?} в окружении {:?}", exe, env.dir());
    exec(command, exe)
}

#[cfg(unix)]
fn exec(mut command: Command, exe: std::path::PathBuf) -> JigglerError {
    use std::os::unix::process::CommandExt;

    let source = command.exec();
    JigglerError::Reexec { path: exe, source }
}

#[cfg(not(unix))]
fn exec(mut command: Command, exe: std::path::PathBuf) -> JigglerError {
    // Нет execve: ждём дочерний процесс и выходим с его кодом
    match command.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => JigglerError::Reexec { path: exe, source },
    }
}
