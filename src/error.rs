use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JigglerError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Команда '{tool}' завершилась с ошибкой (код {code})")]
    ToolFailed { tool: String, code: i32 },

    #[error("Не удалось перезапустить {path:?} в изолированном окружении: {source}")]
    Reexec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ошибка бэкенда указателя: {0}")]
    Backend(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("FAILSAFE: {0}")]
    FailSafe(String),
}

impl JigglerError {
    pub fn backend<T>(msg: impl Into<String>) -> Result<T> {
        Err(JigglerError::Backend(msg.into()))
    }

    /// Код завершения процесса для фатальной ошибки.
    ///
    /// Ошибки установки окружения пробрасывают код внешней утилиты,
    /// всё остальное завершается с кодом 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            JigglerError::ToolFailed { code, .. } => u8::try_from(*code)
                .ok()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, JigglerError>;
