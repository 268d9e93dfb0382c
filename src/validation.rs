use crate::listen::{InvalidReason, ListenInput};

pub const MAX_NOTE_LENGTH: usize = 100;
pub const MAX_NAME_LENGTH: usize = 30;

/// Checks a submission against the field-length limits, reporting
/// every violation at once. Lengths are counted in characters.
///
/// ```
/// # use chrono::Utc;
/// # use listens::listen::{ListenInput, MusicProvider};
/// use listens::validation::check_invalid;
///
/// let input = ListenInput {
///     song_id: "0aq7ohTG6VDYQvsnAYtA5e".to_owned(),
///     song_provider: MusicProvider::Spotify,
///     listener_name: "geez".to_owned(),
///     listen_time_utc: Utc::now(),
///     note: None,
///     iana_timezone: "Asia/Tokyo".to_owned(),
/// };
/// assert!(check_invalid(&input).is_none());
/// ```
pub fn check_invalid(input: &ListenInput) -> Option<InvalidReason> {
    let mut reason = InvalidReason::default();

    if let Some(note) = &input.note {
        let length = note.chars().count();

        if length > MAX_NOTE_LENGTH {
            reason.add(
                "note",
                format!("note length {} exceeds max: {}.", length, MAX_NOTE_LENGTH),
            );
        }
    }

    let length = input.listener_name.chars().count();

    if length > MAX_NAME_LENGTH {
        reason.add(
            "listener_name",
            format!(
                "listener_name length {} exceeds max: {}.",
                length, MAX_NAME_LENGTH
            ),
        );
    }

    if reason.is_empty() {
        None
    } else {
        Some(reason)
    }
}
