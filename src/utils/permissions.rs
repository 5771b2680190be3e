use crate::error::{JigglerError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{debug, warn};

const UINPUT_DEVICE: &str = "/dev/uinput";

/// Проверить права доступа, необходимые бэкенду uinput
pub fn check_permissions() -> Result<()> {
    debug!("Проверка прав доступа...");

    check_uinput_access(Path::new(UINPUT_DEVICE))?;

    // Проверка, что не запущен от root (рекомендация безопасности)
    check_not_root();

    debug!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_uinput_access(uinput_device: &Path) -> Result<()> {
    if !uinput_device.exists() {
        return Err(JigglerError::Permission(format!(
            "{:?} не существует, модуль uinput не загружен.\n{}",
            uinput_device,
            get_setup_commands().join("\n")
        )));
    }

    match fs::metadata(uinput_device) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode();

            // Проверяем права доступа (обычно 660 или 666)
            if mode & 0o006 == 0 && mode & 0o060 == 0 && !is_root() {
                return Err(JigglerError::Permission(format!(
                    "Нет прав доступа к {:?}. Добавьте пользователя в группу 'input'.\n{}",
                    uinput_device,
                    get_setup_commands().join("\n")
                )));
            }

            debug!("Доступ к {:?} подтвержден", uinput_device);
            Ok(())
        }
        Err(e) => Err(JigglerError::Permission(format!(
            "Не удалось проверить права доступа к {:?}: {}",
            uinput_device, e
        ))),
    }
}

fn is_root() -> bool {
    matches!(std::env::var("USER"), Ok(user) if user == "root")
}

fn check_not_root() {
    if is_root() {
        warn!("⚠️  Приложение запущено от имени root!");
        warn!("   Рекомендуется добавить пользователя в группу 'input'");
        warn!("   и запускать приложение от имени обычного пользователя");
    }
}

/// Получить рекомендуемые команды для настройки прав доступа
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Загрузить модуль uinput:".to_string(),
        "sudo modprobe uinput".to_string(),
        "# Дать доступ группе input:".to_string(),
        "sudo usermod -a -G input $USER".to_string(),
        "echo 'KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\"' | sudo tee /etc/udev/rules.d/99-uinput.rules".to_string(),
        "# Для чтения позиции указателя нужен xdotool:".to_string(),
        "sudo apt install xdotool".to_string(),
    ]
}
