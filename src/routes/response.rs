use serde::Serialize;

use crate::listen::Listen;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Listens {
        items: &'a [Listen],
    },
}
