use serde::Serialize;
use serde_json::Value;

/// Success body of the import endpoint.
#[derive(Serialize)]
pub struct ImportResponse {
    pub ok: bool,
    pub count: usize,
}

/// Success body of the mutation endpoints that return no data.
#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Success body of the inline lead update, echoing the updated row.
#[derive(Serialize)]
pub struct LeadUpdateResponse {
    pub ok: bool,
    pub lead: Value,
}
