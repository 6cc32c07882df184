//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PumpkinError`] via `#[from]` or an explicit `into_domain()`.

/// Boxed source error carried by [`DeviceError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum PumpkinError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// A lookup that matched nothing.
#[derive(Debug, thiserror::Error)]
pub enum NotFoundError {
    /// An entity id that is not part of the catalog, or an absent photo.
    #[error("{entity} {id} does not exist")]
    Entity {
        /// Lowercase entity kind, e.g. `"led"`.
        entity: &'static str,
        id: String,
    },

    #[error("no photos have been captured")]
    NoPhotos,
}

/// A request value that failed validation. No state was touched.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("{0} is not a valid brightness value")]
    Brightness(String),

    #[error("{0} is not a valid sort order")]
    SortOrder(String),

    #[error("invalid photo id")]
    PhotoId,
}

/// Hardware, subprocess, or filesystem failure.
///
/// `Display` is intentionally generic; the source is only reachable through
/// [`std::error::Error::source`] so it ends up in logs, not in responses.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("unable to drive actuator")]
    Actuator(#[source] BoxError),

    #[error("unable to run external command")]
    Command(#[source] BoxError),

    #[error("filesystem operation failed")]
    FileSystem(#[source] BoxError),

    #[error("unable to capture photo")]
    Capture,

    #[error("unable to access photo")]
    PhotoAccess,

    #[error("unable to get photo data")]
    PhotoListing,
}
