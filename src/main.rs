use clap::Parser;
use std::process::ExitCode;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
mod bootstrap;
mod config;
mod error;
mod events;
mod services;
mod utils;

use bootstrap::{Bootstrap, Environment, ExecutionContext, InstallRequest, Launcher, VenvToolchain};
use config::{CliOverrides, Config, PointerBackend};
use error::Result;
use events::StopReason;
use services::{create_pointer, Jiggler};

#[derive(Parser, Debug)]
#[command(name = "mouse-jiggler", version)]
#[command(about = "Двигает мышь, чтобы система не помечала сессию как неактивную")]
struct Args {
    /// Секунды между сдвигами [по умолчанию: 60]
    #[arg(short, long)]
    interval: Option<u64>,

    /// Смещение в пикселях [по умолчанию: 1]
    #[arg(short, long)]
    distance: Option<u32>,

    /// Не выводить сообщения о подготовке и сдвигах
    #[arg(short, long)]
    quiet: bool,

    /// Бэкенд управления указателем
    #[arg(long, value_enum)]
    backend: Option<PointerBackend>,

    /// Режим сухого запуска (указатель эмулируется в памяти)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования [по умолчанию: info, с --quiet: warn]
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            interval: self.interval,
            distance: self.distance,
            quiet: self.quiet,
            backend: self.backend,
        }
    }

    /// Уровень логирования, если RUST_LOG не задан
    fn default_log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level.as_str(),
            None if self.quiet => "warn",
            None => "info",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Инициализация системы логирования
    if let Err(e) = init_tracing(args.default_log_level()) {
        eprintln!("Не удалось инициализировать логирование: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(reason) => {
            debug!("Штатное завершение: {:?}", reason);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<StopReason> {
    debug!("Запуск Mouse Jiggler v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&args.overrides())?;
    debug!("Конфигурация: {:?}", config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные сдвиги отключены");
    }

    let environment = if !args.dry_run && config.pointer.backend.needs_environment() {
        Some(prepare_environment(&config)?)
    } else {
        None
    };

    let pointer = create_pointer(&config, environment.as_ref(), args.dry_run)?;
    let mut jiggler = Jiggler::new(&config, pointer);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        // Ожидание сигнала завершения
        match signal::ctrl_c().await {
            Ok(()) => {
                debug!("Получен сигнал завершения (Ctrl+C)");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                error!("Ошибка при ожидании сигнала завершения: {}", err);
                // Держим канал открытым, иначе цикл сочтёт это остановкой
                std::future::pending::<()>().await;
            }
        }
    });

    jiggler.run(shutdown_rx).await
}

/// Возвращает окружение, если процесс уже внутри него; иначе готовит его и
/// перезапускается (при успехе управление сюда не возвращается).
fn prepare_environment(config: &Config) -> Result<Environment> {
    let env = Environment::resolve(&config.environment)?;
    let launcher = Launcher::new(
        VenvToolchain::new(config.environment.base_runtime.clone()),
        InstallRequest::from_config(&config.environment),
        config.verbose(),
    );

    match launcher.ensure(&ExecutionContext::from_env(), env)? {
        Bootstrap::Ready(env) => {
            debug!("Используем окружение {:?}", env.dir());
            Ok(env)
        }
        Bootstrap::Reexec(env) => {
            if config.verbose() {
                info!("Перезапуск в окружении {:?}", env.dir());
            }
            Err(bootstrap::reexec(&env))
        }
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["mouse-jiggler"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.interval, None);
        assert_eq!(overrides.distance, None);
        assert!(!overrides.quiet);
        assert_eq!(args.default_log_level(), "info");

        let mut config = Config::default();
        config.apply_overrides(&overrides);
        assert_eq!(config.jiggle.interval_secs, 60);
        assert_eq!(config.jiggle.distance, 1);
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::try_parse_from(["mouse-jiggler", "-i", "5", "-d", "2", "-q"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.interval, Some(5));
        assert_eq!(overrides.distance, Some(2));
        assert!(overrides.quiet);
    }

    #[test]
    fn test_args_long_flags_and_backend() {
        let args = Args::try_parse_from([
            "mouse-jiggler",
            "--interval",
            "30",
            "--distance",
            "3",
            "--quiet",
            "--backend",
            "uinput",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.backend, Some(PointerBackend::Uinput));
        assert!(args.dry_run);
    }

    #[test]
    fn test_quiet_lowers_default_log_level() {
        let args = Args::try_parse_from(["mouse-jiggler", "-q"]).unwrap();
        assert_eq!(args.default_log_level(), "warn");

        let args = Args::try_parse_from(["mouse-jiggler", "-q", "--log-level", "debug"]).unwrap();
        assert_eq!(args.default_log_level(), "debug");

        let args = Args::try_parse_from(["mouse-jiggler", "--log-level", "trace"]).unwrap();
        assert_eq!(args.default_log_level(), "trace");
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = Args::try_parse_from(["mouse-jiggler", "--speed", "9"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        assert!(Args::try_parse_from(["mouse-jiggler", "-i", "-5"]).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_pointer_runs_until_interrupt() {
        let mut config = Config::default();
        config.jiggle.quiet = true;
        let pointer = create_pointer(&config, None, true).unwrap();
        let mut jiggler = Jiggler::new(&config, pointer);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { jiggler.run(rx).await });
        tokio::time::sleep(std::time::Duration::from_secs(90)).await;
        tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap().unwrap(), StopReason::Interrupted);
    }

    #[test]
    fn test_pyautogui_without_environment_is_error() {
        let config = Config::default();
        assert!(create_pointer(&config, None, false).is_err());
    }
}
