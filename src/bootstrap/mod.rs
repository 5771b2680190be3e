//! Bootstrap: responsibility and boundaries
//!
//! Ensures the process runs inside the isolated environment that provides the
//! pointer capability. Decides outer/inner invocation, provisions the
//! environment idempotently and hands control to a re-executed process image.
//! It knows nothing about jiggling.

mod context;
mod environment;
mod launcher;
mod toolchain;

pub use context::ExecutionContext;
pub use environment::Environment;
pub use launcher::{reexec, Bootstrap, Launcher};
pub use toolchain::{InstallRequest, Toolchain, VenvToolchain};
