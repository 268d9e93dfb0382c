use std::sync::Mutex;

use slog::{Discard, Drain, Fuse};
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

/// Creates the root logger: JSON lines on stderr, tagged with the
/// build metadata. With the `env_logging` feature, `RUST_LOG` filters
/// records before they reach the drain.
pub fn initialize_logger() -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);

    #[cfg(feature = "env_logging")]
    let drain = slog_envlogger::new(drain).ignore_res();

    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// Creates a logger that drops everything, for tests.
pub fn initialize_test_logger() -> Logger {
    Logger::root(Discard, o!())
}
