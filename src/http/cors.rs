use vercel_runtime::{Body, Response, StatusCode};

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

pub fn add_cors(mut resp: Response<Body>) -> Response<Body> {
    let h = resp.headers_mut();
    for (name, value) in CORS_HEADERS {
        if let Ok(value) = value.parse() {
            h.insert(name, value);
        }
    }
    resp
}

/// Answers a pre-flight request. `None` means the request was not a
/// pre-flight and the caller keeps handling it.
pub fn handle_preflight(method: &str) -> anyhow::Result<Option<Response<Body>>> {
    if !method.eq_ignore_ascii_case("OPTIONS") {
        return Ok(None);
    }
    let resp = Response::builder()
        .status(StatusCode::OK)
        .body(Body::Empty)?;
    Ok(Some(add_cors(resp)))
}
