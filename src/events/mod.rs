pub mod pointer;

pub use pointer::{square_path, Displacement, Position, ScreenSize};

/// Причина штатной остановки цикла
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Ctrl+C
    Interrupted,
    /// Указатель отправлен в угол экрана
    FailSafe(String),
}
