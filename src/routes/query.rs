use serde::Deserialize;

use crate::errors::ListensError;
use crate::iso8601;
use crate::listen::{ListensQuery, SortOrder, UnknownSortOrder};

/// The raw query string of a listing request. Everything is kept as
/// text so that bad values become our own errors rather than warp's.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListensParams {
    pub limit: Option<String>,
    pub sort_order: Option<String>,
    pub before_utc: Option<String>,
    pub after_utc: Option<String>,
}

impl ListensParams {
    pub fn into_query(self, default_limit: u32) -> Result<ListensQuery, ListensError> {
        let limit = match self.limit {
            Some(raw) => raw
                .parse()
                .map_err(|_| ListensError::MalformedRequest(format!("invalid limit {:?}", raw)))?,
            None => default_limit,
        };

        let sort_order = match self.sort_order {
            Some(raw) => raw
                .parse()
                .map_err(|e: UnknownSortOrder| ListensError::MalformedRequest(e.to_string()))?,
            None => SortOrder::default(),
        };

        Ok(ListensQuery {
            limit,
            sort_order,
            before_utc: parse_instant("before_utc", self.before_utc)?,
            after_utc: parse_instant("after_utc", self.after_utc)?,
        })
    }
}

fn parse_instant(
    name: &str,
    raw: Option<String>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, ListensError> {
    match raw {
        Some(raw) => iso8601::parse(&raw)
            .map(Some)
            .ok_or_else(|| ListensError::MalformedRequest(format!("invalid {} {:?}", name, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn defaults() {
        let query = ListensParams::default().into_query(20).unwrap();

        assert_eq!(query, ListensQuery::new(20, SortOrder::Ascending));
    }

    #[test]
    fn everything_set() {
        let params = ListensParams {
            limit: Some("1".to_owned()),
            sort_order: Some("descending".to_owned()),
            before_utc: Some("2018-12-02T10:27:47".to_owned()),
            after_utc: Some("2018-12-01T10:27:47+03:00".to_owned()),
        };

        let query = params.into_query(20).unwrap();

        assert_eq!(query.limit, 1);
        assert_eq!(query.sort_order, SortOrder::Descending);
        assert_eq!(
            query.before_utc,
            Some(Utc.with_ymd_and_hms(2018, 12, 2, 10, 27, 47).unwrap())
        );
        assert_eq!(
            query.after_utc,
            Some(Utc.with_ymd_and_hms(2018, 12, 1, 7, 27, 47).unwrap())
        );
    }

    #[test]
    fn bad_values_are_client_errors() {
        let bad = vec![
            ListensParams {
                limit: Some("-1".to_owned()),
                ..Default::default()
            },
            ListensParams {
                sort_order: Some("random".to_owned()),
                ..Default::default()
            },
            ListensParams {
                before_utc: Some("tomorrow".to_owned()),
                ..Default::default()
            },
        ];

        for params in bad {
            assert!(matches!(
                params.into_query(20),
                Err(ListensError::MalformedRequest(..))
            ));
        }
    }
}
