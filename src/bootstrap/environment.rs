use crate::config::EnvironmentConfig;
use crate::error::{JigglerError, Result};
use std::path::{Path, PathBuf};

/// Каталог изолированного окружения на диске
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    dir: PathBuf,
}

impl Environment {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Явный `dir` из конфигурации или `dir_name` рядом с исполняемым файлом
    pub fn resolve(config: &EnvironmentConfig) -> Result<Self> {
        if let Some(dir) = &config.dir {
            return Ok(Self::new(dir.clone()));
        }

        let exe = std::env::current_exe()?;
        let parent = exe.parent().ok_or_else(|| {
            JigglerError::Backend(format!("У исполняемого файла {:?} нет родительского каталога", exe))
        })?;
        Ok(Self::new(parent.join(&config.dir_name)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.dir.join("Scripts")
        } else {
            self.dir.join("bin")
        }
    }

    /// Интерпретатор окружения
    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("python.exe")
        } else {
            self.bin_dir().join("python3")
        }
    }

    /// Создано ли окружение до конца (есть собственный интерпретатор)
    pub fn runtime_exists(&self) -> bool {
        self.python().exists()
    }
}
