//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod actuator;
pub mod command;
pub mod event_bus;
pub mod file_system;

pub use actuator::{Edge, InputPin, Level, OutputPin};
pub use command::{CommandOutput, CommandRunner};
pub use event_bus::EventPublisher;
pub use file_system::{FileEntry, FileKind, FileSystem};
