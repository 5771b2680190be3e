//! Pointer backends: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for reading the pointer
//! position and screen size and for performing relative moves. The jiggle
//! pattern, timing and fail-safe decisions live in Jiggler.

mod dry_run;
mod pyautogui;
mod uinput_pointer;
mod xdotool;
mod r#trait;

pub use self::dry_run::DryRunPointer;
pub use self::r#trait::{create_pointer, PointerTrait};
