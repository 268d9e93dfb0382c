use std::sync::Arc;

use log::Logger;

use crate::catalog::MusicCatalog;
use crate::config::get_optional_variable;
use crate::db::Db;
use crate::notification::Notifier;
use crate::sunlight::SunlightSource;

pub type SafeDb = dyn Db + Send + Sync;
pub type SafeCatalog = dyn MusicCatalog + Send + Sync;
pub type SafeSunlight = dyn SunlightSource + Send + Sync;
pub type SafeNotifier = dyn Notifier + Send + Sync;

/// Everything the routes need, shared by every request.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<SafeDb>,
    pub catalog: Arc<SafeCatalog>,
    pub sunlight: Arc<SafeSunlight>,
    pub notifier: Arc<SafeNotifier>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<SafeDb>,
        catalog: Arc<SafeCatalog>,
        sunlight: Arc<SafeSunlight>,
        notifier: Arc<SafeNotifier>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            db,
            catalog,
            sunlight,
            notifier,
            config,
        }
    }

    /// Borrows the capabilities for a single invocation.
    pub fn context<'a>(&'a self, logger: &'a Logger) -> Context<'a> {
        Context {
            logger,
            db: self.db.as_ref(),
            catalog: self.catalog.as_ref(),
            sunlight: self.sunlight.as_ref(),
            notifier: self.notifier.as_ref(),
        }
    }
}

/// The capabilities one use-case invocation runs against. Owns nothing.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub logger: &'a Logger,
    pub db: &'a SafeDb,
    pub catalog: &'a SafeCatalog,
    pub sunlight: &'a SafeSunlight,
    pub notifier: &'a SafeNotifier,
}

const DEFAULT_COLLECTION_PATH: &str = "listens";
const DEFAULT_LIMIT: u32 = 20;

#[derive(Clone, Debug)]
pub struct Config {
    /// The path segment all listens live under.
    pub(crate) collection_path: String,

    /// How many listens to list when the client doesn't say.
    pub(crate) default_limit: u32,
}

impl Config {
    pub fn new(collection_path: impl Into<String>, default_limit: u32) -> Self {
        Self {
            collection_path: collection_path.into(),
            default_limit,
        }
    }

    pub fn from_env() -> Self {
        let collection_path = get_optional_variable("LISTENS_COLLECTION_PATH")
            .map(|path| path.trim_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_COLLECTION_PATH.to_owned());

        Config::new(collection_path, DEFAULT_LIMIT)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_COLLECTION_PATH, DEFAULT_LIMIT)
    }
}
