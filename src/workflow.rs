use log::{debug, error};

use crate::day;
use crate::environment::Context;
use crate::errors::ListensError;
use crate::listen::{Listen, ListenInput, ListensQuery};

/// Records a listen if the song exists and the sun is up where the
/// listener is. Stops at the first failing step. Field lengths are
/// the caller's job; see [`crate::validation::check_invalid`].
pub async fn submit_listen(context: &Context<'_>, input: ListenInput) -> Result<Listen, ListensError> {
    let Context {
        logger,
        db,
        catalog,
        sunlight,
        notifier,
    } = *context;

    debug!(logger, "Checking catalog..."; "song_id" => &input.song_id, "song_provider" => %input.song_provider);
    if !catalog
        .song_exists(&input.song_id, input.song_provider)
        .await?
    {
        return Err(ListensError::InvalidSong(input.song_id));
    }

    let on_date = day::local_date(input.listen_time_utc, &input.iana_timezone)?;

    debug!(logger, "Fetching sunlight window..."; "iana_timezone" => &input.iana_timezone, "on_date" => %on_date);
    let window = sunlight
        .fetch_sunlight_window(&input.iana_timezone, on_date)
        .await?;

    if !day::is_day(input.listen_time_utc, &window) {
        return Err(ListensError::Sunlight);
    }

    debug!(logger, "Saving listen...");
    let listen = db.add_listen(input).await?;

    // the listen is stored either way, so a failed announcement only
    // gets logged
    debug!(logger, "Announcing listen..."; "id" => &listen.id);
    if let Err(e) = notifier.announce_listen_added(&listen).await {
        error!(logger, "Failed to announce listen"; "id" => &listen.id, "error" => e.chain());
    }

    Ok(listen)
}

pub async fn get_listen(context: &Context<'_>, listen_id: &str) -> Result<Listen, ListensError> {
    context.db.fetch_listen(listen_id).await
}

pub async fn get_listens(context: &Context<'_>, query: ListensQuery) -> Result<Vec<Listen>, ListensError> {
    context.db.fetch_listens(query).await
}
