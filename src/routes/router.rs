use crate::errors::ListensError;

/// The use-case a request maps to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    Submit,
    List,
    Fetch(String),
}

impl Route {
    /// Picks the use-case for `method` on `path`, where listens live
    /// under the `collection` segment. This knows nothing about the
    /// server in front of it.
    ///
    /// ```
    /// use listens::routes::router::Route;
    ///
    /// assert_eq!(Route::resolve("POST", "/listens", "listens").unwrap(), Route::Submit);
    /// assert_eq!(Route::resolve("GET", "/listens", "listens").unwrap(), Route::List);
    /// assert_eq!(
    ///     Route::resolve("GET", "/listens/1b23d", "listens").unwrap(),
    ///     Route::Fetch("1b23d".to_owned())
    /// );
    /// ```
    pub fn resolve(method: &str, path: &str, collection: &str) -> Result<Self, ListensError> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match (method, segments.as_slice()) {
            ("POST", [c]) if *c == collection => Ok(Route::Submit),
            ("GET", [c]) if *c == collection => Ok(Route::List),
            ("GET", [c, id]) if *c == collection && is_identifier(id) => {
                Ok(Route::Fetch((*id).to_owned()))
            }
            _ => Err(ListensError::UnexpectedRoute {
                method: method.to_owned(),
                path: path.to_owned(),
            }),
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(method: &str, path: &str) -> Option<Route> {
        Route::resolve(method, path, "listens").ok()
    }

    #[test]
    fn collection_routes() {
        assert_eq!(resolve("POST", "/listens"), Some(Route::Submit));
        assert_eq!(resolve("GET", "/listens"), Some(Route::List));
        assert_eq!(resolve("GET", "/listens/"), Some(Route::List));
    }

    #[test]
    fn item_routes() {
        assert_eq!(
            resolve("GET", "/listens/3f2c9a1e-5b7d-4c1a-9e0f-8a6b2d4c6e8f"),
            Some(Route::Fetch("3f2c9a1e-5b7d-4c1a-9e0f-8a6b2d4c6e8f".to_owned()))
        );
        assert_eq!(resolve("GET", "/listens/42"), Some(Route::Fetch("42".to_owned())));
    }

    #[test]
    fn everything_else_is_unexpected() {
        for (method, path) in &[
            ("DELETE", "/listens/42"),
            ("PUT", "/listens"),
            ("POST", "/listens/42"),
            ("GET", "/"),
            ("GET", "/songs"),
            ("GET", "/listens/42/extra"),
            ("GET", "/listens//42"),
            ("GET", "/listens/4.2"),
            ("get", "/listens"),
        ] {
            match Route::resolve(method, path, "listens") {
                Err(ListensError::UnexpectedRoute { method: m, path: p }) => {
                    assert_eq!((m.as_str(), p.as_str()), (*method, *path));
                }
                other => panic!("{} {} resolved to {:?}", method, path, other),
            }
        }
    }

    #[test]
    fn collection_is_configurable() {
        assert_eq!(
            Route::resolve("GET", "/v2-listens", "v2-listens").ok(),
            Some(Route::List)
        );
        assert!(Route::resolve("GET", "/listens", "v2-listens").is_err());
    }
}
