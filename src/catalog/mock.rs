use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::{BoxFuture, FutureExt};

use crate::catalog::MusicCatalog;
use crate::errors::ListensError;
use crate::listen::MusicProvider;

/// A catalog holding a fixed set of Spotify song IDs.
#[derive(Default)]
pub struct MockCatalog {
    songs: HashSet<String>,
    calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new<S: Into<String>>(songs: impl IntoIterator<Item = S>) -> Self {
        MockCatalog {
            songs: songs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// How many lookups have been made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MusicCatalog for MockCatalog {
    fn song_exists(
        &self,
        song_id: &str,
        provider: MusicProvider,
    ) -> BoxFuture<Result<bool, ListensError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let exists = match provider {
            MusicProvider::Spotify => self.songs.contains(song_id),
        };

        async move { Ok(exists) }.boxed()
    }
}
