use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::iso8601;

/// A catalog that songs can come from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MusicProvider {
    #[serde(rename = "SPOTIFY")]
    Spotify,
}

impl MusicProvider {
    /// The name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicProvider::Spotify => "SPOTIFY",
        }
    }
}

impl fmt::Display for MusicProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown music provider {0:?}")]
pub struct UnknownMusicProvider(pub String);

impl FromStr for MusicProvider {
    type Err = UnknownMusicProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPOTIFY" => Ok(MusicProvider::Spotify),
            _ => Err(UnknownMusicProvider(s.to_owned())),
        }
    }
}

/// Ordering of listens by `listen_time_utc`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

#[derive(Debug, Error)]
#[error("unknown sort order {0:?}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    /// Accepts `ascending` or `descending` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascending" => Ok(SortOrder::Ascending),
            "descending" => Ok(SortOrder::Descending),
            _ => Err(UnknownSortOrder(s.to_owned())),
        }
    }
}

/// The stretch of one calendar day, in one timezone, when the sun is up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SunlightWindow {
    sunrise_utc: DateTime<Utc>,
    sunset_utc: DateTime<Utc>,
}

#[derive(Debug, Error)]
#[error("sunrise {sunrise_utc} is not before sunset {sunset_utc}")]
pub struct InvalidSunlightWindow {
    pub sunrise_utc: DateTime<Utc>,
    pub sunset_utc: DateTime<Utc>,
}

impl SunlightWindow {
    /// Creates a window. Sunrise must come strictly before sunset.
    pub fn new(
        sunrise_utc: DateTime<Utc>,
        sunset_utc: DateTime<Utc>,
    ) -> Result<Self, InvalidSunlightWindow> {
        if sunrise_utc < sunset_utc {
            Ok(SunlightWindow {
                sunrise_utc,
                sunset_utc,
            })
        } else {
            Err(InvalidSunlightWindow {
                sunrise_utc,
                sunset_utc,
            })
        }
    }

    pub fn sunrise_utc(&self) -> DateTime<Utc> {
        self.sunrise_utc
    }

    pub fn sunset_utc(&self) -> DateTime<Utc> {
        self.sunset_utc
    }
}

/// A listen as submitted, before storage has given it an ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListenInput {
    /// The song's ID in the provider's catalog.
    pub song_id: String,

    pub song_provider: MusicProvider,

    pub listener_name: String,

    /// When the listen was submitted. Set by the server, never the client.
    pub listen_time_utc: DateTime<Utc>,

    pub note: Option<String>,

    /// The listener's timezone, e.g. `America/New_York`.
    pub iana_timezone: String,
}

/// A stored listen.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Listen {
    pub id: String,
    pub song_id: String,
    pub song_provider: MusicProvider,
    pub listener_name: String,
    #[serde(serialize_with = "iso8601::serialize")]
    pub listen_time_utc: DateTime<Utc>,
    pub note: Option<String>,
    pub iana_timezone: String,
}

impl Listen {
    pub fn from_input(id: impl Into<String>, input: ListenInput) -> Self {
        let ListenInput {
            song_id,
            song_provider,
            listener_name,
            listen_time_utc,
            note,
            iana_timezone,
        } = input;

        Listen {
            id: id.into(),
            song_id,
            song_provider,
            listener_name,
            listen_time_utc,
            note,
            iana_timezone,
        }
    }
}

/// Filters for listing listens. Both bounds are exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListensQuery {
    pub limit: u32,
    pub sort_order: SortOrder,
    pub before_utc: Option<DateTime<Utc>>,
    pub after_utc: Option<DateTime<Utc>>,
}

impl ListensQuery {
    pub fn new(limit: u32, sort_order: SortOrder) -> Self {
        ListensQuery {
            limit,
            sort_order,
            before_utc: None,
            after_utc: None,
        }
    }

    /// Whether `instant` lies strictly between the bounds that are set.
    pub fn admits(&self, instant: DateTime<Utc>) -> bool {
        self.after_utc.map_or(true, |after| after < instant)
            && self.before_utc.map_or(true, |before| instant < before)
    }
}

/// Field-by-field explanation of why a listen was rejected, in the
/// order the fields were checked.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InvalidReason {
    error_message_by_field: Vec<(&'static str, String)>,
}

impl InvalidReason {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.error_message_by_field.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.error_message_by_field.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.error_message_by_field.iter().map(|(field, _)| *field)
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.error_message_by_field
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }
}

impl Serialize for InvalidReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.error_message_by_field.len()))?;

        for (field, message) in &self.error_message_by_field {
            map.serialize_entry(field, message)?;
        }

        map.end()
    }
}
