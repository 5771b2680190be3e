pub mod failsafe;
pub mod jiggler;
pub mod pointer;
pub mod virtual_device;

pub use failsafe::FailSafe;
pub use jiggler::Jiggler;
pub use pointer::{create_pointer, DryRunPointer, PointerTrait};
pub use virtual_device::VirtualDevice;
