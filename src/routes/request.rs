use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::listen::{ListenInput, MusicProvider};

/// The body of a submission. The listen time isn't part of it: the
/// server stamps it on arrival.
#[derive(Debug, Deserialize)]
pub struct SubmitListenRequest {
    pub song_id: String,
    pub song_provider: MusicProvider,
    pub listener_name: String,
    #[serde(default)]
    pub note: Option<String>,
    pub iana_timezone: String,
}

impl SubmitListenRequest {
    pub fn into_input(self, listen_time_utc: DateTime<Utc>) -> ListenInput {
        ListenInput {
            song_id: self.song_id,
            song_provider: self.song_provider,
            listener_name: self.listener_name,
            listen_time_utc,
            note: self.note,
            iana_timezone: self.iana_timezone,
        }
    }
}
