use serde::Deserialize;

/// Query parameters accepted by the list endpoint.
///
/// At most one filter is honored per request; see the precedence rule in the
/// list handler.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
}
