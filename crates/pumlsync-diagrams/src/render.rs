//! SVG rendering through a `PlantUML` server.
//!
//! Diagrams are sent as encoded GET requests to `<server>/svg/<token>`. Without
//! a configured server the public `plantuml.com` instance is used, always
//! without credentials. A custom server may additionally require HTTP Basic
//! authentication.

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::consts::DEFAULT_SERVER;
use crate::encoding::encode;

/// Renders diagram source to SVG.
///
/// Implemented by [`PlantUmlRenderer`]; other implementations can stand in
/// for the network in tests.
pub trait Render {
    /// Render diagram source to SVG text.
    fn render(&self, code: &str) -> Result<String, RenderError>;
}

/// Diagram rendering error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("render request failed: {0}")]
    Http(#[from] ureq::Error),

    /// Server responded with an error status.
    #[error("render server responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Diagram source could not be encoded.
    #[error("failed to encode diagram: {0}")]
    Encode(#[from] std::io::Error),

    /// Response body is not valid UTF-8.
    #[error("invalid UTF-8 in SVG: {0}")]
    InvalidSvg(#[from] std::string::FromUtf8Error),
}

/// HTTP Basic credentials for a custom render server.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Build credentials when both parts are present and non-empty.
    #[must_use]
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Self {
                username: u.to_owned(),
                password: p.to_owned(),
            }),
            _ => None,
        }
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Renderer options as configured by the user.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Custom server URL. `None` selects the public server.
    pub server: Option<String>,
    /// Basic auth username for the custom server.
    pub username: Option<String>,
    /// Basic auth password for the custom server.
    pub password: Option<String>,
}

/// `PlantUML` server renderer.
///
/// # Example
///
/// ```ignore
/// use pumlsync_diagrams::{PlantUmlRenderer, Render};
///
/// let renderer = PlantUmlRenderer::new()
///     .with_server("https://plantuml.example.com")
///     .with_auth(BasicAuth::from_parts(Some("ci"), Some("secret")));
/// let svg = renderer.render("@startuml\nA -> B\n@enduml")?;
/// ```
#[derive(Debug)]
pub struct PlantUmlRenderer {
    agent: Agent,
    request_timeout: Option<Duration>,
    server: Option<String>,
    auth: Option<BasicAuth>,
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Create HTTP agent, without a timeout unless one is given.
fn create_agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build()
        .into()
}

impl PlantUmlRenderer {
    /// Create a renderer for the public `PlantUML` server.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: create_agent(None),
            request_timeout: None,
            server: None,
            auth: None,
        }
    }

    /// Create a renderer from user options.
    ///
    /// Empty strings count as unset. Credentials are only kept when a custom
    /// server is configured and both username and password are given.
    #[must_use]
    pub fn from_options(options: &RenderOptions) -> Self {
        let server = options.server.as_deref().filter(|s| !s.is_empty());
        let auth = BasicAuth::from_parts(options.username.as_deref(), options.password.as_deref());

        let mut renderer = Self::new();
        if let Some(server) = server {
            renderer = renderer.with_server(server);
        }
        if renderer.server.is_some() {
            return renderer.with_auth(auth);
        }
        if auth.is_some() {
            warn!("Render credentials ignored: no custom server configured");
        }
        renderer
    }

    /// Render through a custom server instead of the public one.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        let server: String = server.into();
        self.server = Some(server.trim_end_matches('/').to_owned());
        self
    }

    /// Set Basic credentials used with a custom server.
    #[must_use]
    pub fn with_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    /// Limit the duration of each render request.
    ///
    /// Requests wait for the server indefinitely by default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(Some(timeout));
        self.request_timeout = Some(timeout);
        self
    }

    /// Configured per-request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// URL that renders the given diagram source.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the source cannot be encoded.
    pub fn svg_url(&self, code: &str) -> Result<String, RenderError> {
        let token = encode(code)?;
        let server = self.server.as_deref().unwrap_or(DEFAULT_SERVER);
        Ok(format!("{server}/svg/{token}"))
    }

    /// Credentials attached to requests, only ever for a custom server.
    fn request_auth(&self) -> Option<&BasicAuth> {
        self.server.as_ref().and(self.auth.as_ref())
    }
}

impl Render for PlantUmlRenderer {
    fn render(&self, code: &str) -> Result<String, RenderError> {
        let url = self.svg_url(code)?;
        let auth = self.request_auth();
        info!(
            server = self.server.as_deref().unwrap_or(DEFAULT_SERVER),
            authenticated = auth.is_some(),
            "Rendering diagram"
        );

        let mut request = self.agent.get(&url);
        if let Some(auth) = auth {
            request = request.header("Authorization", &auth.header_value());
        }
        let response = request.call()?;

        let status = response.status();
        let mut body = response.into_body();

        if !status.is_success() {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(RenderError::Status {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let svg = String::from_utf8(body.read_to_vec()?)?;
        debug!(bytes = svg.len(), "Rendered diagram");
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    const CODE: &str = "@startuml\nAlice -> Bob\n@enduml\n";

    #[test]
    fn test_default_server_url() {
        let renderer = PlantUmlRenderer::new();

        let url = renderer.svg_url(CODE).unwrap();

        assert!(url.starts_with("https://www.plantuml.com/plantuml/svg/"));
        assert!(url.ends_with(&encode(CODE).unwrap()));
    }

    #[test]
    fn test_custom_server_url_trims_slash() {
        let renderer = PlantUmlRenderer::new().with_server("https://uml.example.com/");

        let url = renderer.svg_url(CODE).unwrap();

        assert!(url.starts_with("https://uml.example.com/svg/"));
    }

    #[test]
    fn test_basic_auth_requires_both_parts() {
        assert!(BasicAuth::from_parts(Some("user"), Some("pass")).is_some());
        assert!(BasicAuth::from_parts(Some("user"), None).is_none());
        assert!(BasicAuth::from_parts(None, Some("pass")).is_none());
        assert!(BasicAuth::from_parts(Some("user"), Some("")).is_none());
    }

    #[test]
    fn test_basic_auth_header_value() {
        let auth = BasicAuth::from_parts(Some("user"), Some("pass")).unwrap();

        assert_eq!(auth.header_value(), "Basic dXNlcjpwYXNz");
        assert!(!format!("{auth:?}").contains("\"pass\""));
    }

    #[test]
    fn test_credentials_without_server_are_dropped() {
        let renderer = PlantUmlRenderer::from_options(&RenderOptions {
            server: Some(String::new()),
            username: Some("user".to_owned()),
            password: Some("pass".to_owned()),
        });

        assert!(renderer.server.is_none());
        assert!(renderer.request_auth().is_none());
    }

    #[test]
    fn test_render_with_basic_auth() {
        let mut server = mockito::Server::new();
        let path = format!("/svg/{}", encode(CODE).unwrap());
        let mock = server
            .mock("GET", path.as_str())
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .with_status(200)
            .with_header("content-type", "image/svg+xml")
            .with_body("<svg>ok</svg>")
            .create();

        let renderer = PlantUmlRenderer::from_options(&RenderOptions {
            server: Some(server.url()),
            username: Some("user".to_owned()),
            password: Some("pass".to_owned()),
        });
        let svg = renderer.render(CODE).unwrap();

        mock.assert();
        assert_eq!(svg, "<svg>ok</svg>");
    }

    #[test]
    fn test_render_without_auth_when_password_missing() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex(r"^/svg/[0-9A-Za-z_\-]+$".to_owned()))
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("<svg/>")
            .create();

        let renderer = PlantUmlRenderer::from_options(&RenderOptions {
            server: Some(server.url()),
            username: Some("user".to_owned()),
            password: None,
        });
        renderer.render(CODE).unwrap();

        mock.assert();
    }

    #[test]
    fn test_render_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(400)
            .with_body("Syntax Error?")
            .create();

        let renderer = PlantUmlRenderer::new().with_server(server.url());
        let err = renderer.render("@startuml\nA -> \n@enduml").unwrap_err();

        match err {
            RenderError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "Syntax Error?");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_render_connection_failure() {
        let renderer = PlantUmlRenderer::new().with_server("http://127.0.0.1:1");

        let err = renderer.render(CODE).unwrap_err();

        assert!(matches!(err, RenderError::Http(_)));
    }

    #[test]
    fn test_no_timeout_unless_configured() {
        assert_eq!(PlantUmlRenderer::new().request_timeout(), None);
        assert_eq!(
            PlantUmlRenderer::from_options(&RenderOptions::default()).request_timeout(),
            None
        );

        let renderer = PlantUmlRenderer::new().timeout(Duration::from_secs(120));

        assert_eq!(renderer.request_timeout(), Some(Duration::from_secs(120)));
    }
}
