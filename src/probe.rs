//! Per-port protocol detection
//!
//! A probe classifies a single `(host, port)` pair by issuing a speculative
//! GET over plain HTTP and, only if that attempt fails at the transport
//! level, a second GET over HTTPS. Any response at all - including 404s,
//! 500s and redirects - proves a server of that protocol is present; the
//! probe detects *an* HTTP server, not a healthy one. Transport failures
//! and timeouts are downgraded to "absent", never surfaced as errors.

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Fixed per-request probe timeout. A tunable constant, deliberately not
/// user-configurable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Header attached to every probe request so that a probed service which
/// is itself a portscope instance can short-circuit instead of recursing
/// into its own orchestration.
pub const PROBE_MARKER_HEADER: &str = "x-portscope-probe";

/// Detected protocol for a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Progress of a single port classification. HTTP is always tried first
/// (cheaper and more common); HTTPS only after HTTP is confirmed absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    Untried,
    HttpTried,
    HttpsTried,
    Resolved(Option<Scheme>),
}

/// Classifies ports. The trait seam lets the orchestrator run against a
/// scripted prober in tests.
#[async_trait]
pub trait PortProber: Send + Sync {
    /// Returns the detected protocol for `host:port`, or `None` if neither
    /// HTTP nor HTTPS answered within the timeout.
    async fn probe(&self, host: &str, port: u16) -> Option<Scheme>;
}

/// Production prober, one reqwest client per scheme.
pub struct Prober {
    http: Client,
    https: Client,
}

impl Prober {
    /// Build the prober and its clients.
    ///
    /// Redirects are disabled on both: a redirect response already proves
    /// a server is present, and following it could probe an unrelated
    /// target. Certificate and hostname validation are relaxed on the
    /// HTTPS client only, because probed containers commonly present
    /// self-signed certificates; the plain-HTTP client carries no such
    /// relaxation.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .redirect(Policy::none())
            .timeout(PROBE_TIMEOUT)
            .build()?;

        let https = Client::builder()
            .redirect(Policy::none())
            .timeout(PROBE_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()?;

        Ok(Self { http, https })
    }

    /// One attempt for one protocol. True means a response was received,
    /// whatever its status code.
    async fn attempt(&self, scheme: Scheme, host: &str, port: u16) -> bool {
        let url = format!("{}://{}:{}/", scheme, host, port);
        let client = match scheme {
            Scheme::Http => &self.http,
            Scheme::Https => &self.https,
        };

        match client
            .get(&url)
            .header(PROBE_MARKER_HEADER, "1")
            .send()
            .await
        {
            Ok(response) => {
                debug!("probe {} answered with status {}", url, response.status());
                true
            }
            Err(err) => {
                debug!("probe {} failed: {}", url, err);
                false
            }
        }
    }
}

#[async_trait]
impl PortProber for Prober {
    async fn probe(&self, host: &str, port: u16) -> Option<Scheme> {
        let mut state = ProbeState::Untried;

        loop {
            state = match state {
                ProbeState::Untried => {
                    if self.attempt(Scheme::Http, host, port).await {
                        ProbeState::Resolved(Some(Scheme::Http))
                    } else {
                        ProbeState::HttpTried
                    }
                }
                ProbeState::HttpTried => {
                    if self.attempt(Scheme::Https, host, port).await {
                        ProbeState::Resolved(Some(Scheme::Https))
                    } else {
                        ProbeState::HttpsTried
                    }
                }
                ProbeState::HttpsTried => ProbeState::Resolved(None),
                ProbeState::Resolved(result) => return result,
            };
        }
    }
}
