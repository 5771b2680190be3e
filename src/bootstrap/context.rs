use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Переменная, которую выставляет активированное venv окружение
pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// Описание контекста выполнения текущего процесса
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Активное изолированное окружение, если есть
    pub active_env: Option<PathBuf>,
}

impl ExecutionContext {
    #[allow(dead_code)]
    pub fn new(active_env: Option<PathBuf>) -> Self {
        Self { active_env }
    }

    /// Снимок контекста из переменных окружения процесса
    pub fn from_env() -> Self {
        Self::from_var(std::env::var_os(VIRTUAL_ENV_VAR))
    }

    pub fn from_var(value: Option<OsString>) -> Self {
        let active_env = value
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self { active_env }
    }

    /// Запущены ли мы уже внутри окружения `env_dir` ("внутренний" запуск)
    pub fn is_provisioned(&self, env_dir: &Path) -> bool {
        match &self.active_env {
            Some(active) => same_path(active, env_dir),
            None => false,
        }
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_runtime_is_outer() {
        let ctx = ExecutionContext::from_var(None);
        assert!(!ctx.is_provisioned(Path::new("/opt/jiggler/.jiggler-venv")));
    }

    #[test]
    fn test_empty_marker_is_outer() {
        let ctx = ExecutionContext::from_var(Some(OsString::new()));
        assert_eq!(ctx.active_env, None);
    }

    #[test]
    fn test_matching_env_is_inner() {
        let ctx = ExecutionContext::from_var(Some(OsString::from("/opt/jiggler/.jiggler-venv")));
        assert!(ctx.is_provisioned(Path::new("/opt/jiggler/.jiggler-venv")));
    }

    #[test]
    fn test_foreign_env_is_outer() {
        let ctx = ExecutionContext::new(Some(PathBuf::from("/home/user/project/.venv")));
        assert!(!ctx.is_provisioned(Path::new("/opt/jiggler/.jiggler-venv")));
    }

    #[test]
    fn test_paths_are_compared_canonically() {
        let dir = tempfile::tempdir().unwrap();
        let env_dir = dir.path().join("env");
        std::fs::create_dir(&env_dir).unwrap();

        let ctx = ExecutionContext::new(Some(dir.path().join(".").join("env")));
        assert!(ctx.is_provisioned(&env_dir));
    }
}
