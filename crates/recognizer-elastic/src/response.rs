//! Backend response and error payload translation.

use serde::Deserialize;

use recognizer_core::{BackendError, Error, IndexedDocument, Result, SearchHit, SearchResponse};

const BODY_SNIPPET_LEN: usize = 256;

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    took: u64,
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    total: RawTotal,
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawTotal {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: f64,
    #[serde(rename = "_source")]
    source: IndexedDocument,
}

#[derive(Debug, Deserialize)]
struct RawErrorResponse {
    error: RawErrorInfo,
    #[serde(default)]
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawErrorInfo {
    #[serde(default)]
    root_cause: Vec<RawErrorInfo>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    reason: Option<String>,
}

impl RawErrorInfo {
    fn into_backend_error(self, status: u16) -> BackendError {
        BackendError {
            status,
            kind: self.kind,
            reason: self.reason.unwrap_or_default(),
            root_causes: self.root_cause.into_iter().map(|c| c.into_backend_error(status)).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCountResponse {
    count: u64,
}

/// Parse a successful `_search` body. Hits keep backend order.
pub fn parse_search_response(body: &[u8]) -> Result<SearchResponse> {
    let raw: RawSearchResponse = serde_json::from_slice(body).map_err(|e| decode_error(None, &e, body))?;
    let total_hits = raw.hits.total.value;
    if total_hits == 0 && !raw.hits.hits.is_empty() {
        return Err(Error::Decode(format!("total hits is 0 but {} hits were returned", raw.hits.hits.len())));
    }
    let hits = raw
        .hits
        .hits
        .into_iter()
        .map(|h| SearchHit { index: h.index, doc_id: h.id, score: h.score, source: h.source })
        .collect();
    Ok(SearchResponse { took_ms: raw.took, total_hits, hits })
}

pub fn parse_count_response(body: &[u8]) -> Result<u64> {
    let raw: RawCountResponse = serde_json::from_slice(body).map_err(|e| decode_error(None, &e, body))?;
    Ok(raw.count)
}

/// Translate a failed response into [`Error::Backend`], or [`Error::Decode`]
/// when the body is not the backend's error envelope. The status in the
/// body wins over the HTTP status when both are present.
pub fn parse_error_response(http_status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<RawErrorResponse>(body) {
        Ok(raw) => {
            let status = raw.status.unwrap_or(http_status);
            Error::Backend(raw.error.into_backend_error(status))
        }
        Err(e) => decode_error(Some(http_status), &e, body),
    }
}

fn decode_error(status: Option<u16>, err: &serde_json::Error, body: &[u8]) -> Error {
    let text = String::from_utf8_lossy(body);
    let snippet: String = text.chars().take(BODY_SNIPPET_LEN).collect();
    match status {
        Some(s) => Error::Decode(format!("status {}: {} (body: {})", s, err, snippet)),
        None => Error::Decode(format!("{} (body: {})", err, snippet)),
    }
}
