use vercel_runtime::Request;

/// The parts of a platform request the endpoints look at.
#[derive(Debug, Clone, Default)]
pub struct Incoming {
    pub method: String,
    pub origin: Option<String>,
    pub body: Vec<u8>,
}

impl Incoming {
    pub fn post(body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: "POST".into(),
            origin: None,
            body: body.into(),
        }
    }

    pub fn with_method(method: &str) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }
}

impl From<&Request> for Incoming {
    fn from(req: &Request) -> Self {
        Self {
            method: req.method().as_str().to_string(),
            origin: req
                .headers()
                .get("origin")
                .and_then(|h| h.to_str().ok())
                .filter(|o| !o.is_empty())
                .map(str::to_string),
            body: req.body().to_vec(),
        }
    }
}
