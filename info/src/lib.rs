//! Build metadata baked in at compile time.

/// The version of the listens service. The workspace crates are
/// versioned in step with the `listens` package.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if the build environment provided one.
pub const REVISION: Option<&str> = option_env!("LISTENS_REVISION");

/// When the binary was built, if the build environment provided it.
pub const BUILD_TIMESTAMP: Option<&str> = option_env!("LISTENS_BUILD_TIMESTAMP");
