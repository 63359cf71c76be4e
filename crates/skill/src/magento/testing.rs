//! Scripted transport for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Method, StatusCode};

use super::MagentoError;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::config::{AccountCredentials, MagentoConfig};

pub const BASE_URL: &str = "http://magento.test";

/// Backend configuration pointing at [`BASE_URL`].
pub fn test_config() -> MagentoConfig {
    MagentoConfig::new(
        BASE_URL,
        AccountCredentials::new("shopper@example.com", "customer-pass"),
        AccountCredentials::new("integration", "admin-pass"),
        Duration::from_secs(5),
    )
    .unwrap()
}

enum Reply {
    Respond(StatusCode, String),
    Fail(String),
}

struct Route {
    method: Option<Method>,
    path: &'static str,
    reply: Reply,
}

/// Answers requests by exact path match and records every request.
///
/// Unscripted paths answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a fixed status and body.
    pub fn on(mut self, method: Method, path: &'static str, status: StatusCode, body: &str) -> Self {
        self.routes.push(Route {
            method: Some(method),
            path,
            reply: Reply::Respond(status, body.to_string()),
        });
        self
    }

    /// Fail every request to `path` at the transport level.
    pub fn fail(mut self, path: &'static str, message: &str) -> Self {
        self.routes.push(Route {
            method: None,
            path,
            reply: Reply::Fail(message.to_string()),
        });
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths (without base URL or query) of every request, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().iter().map(|r| path_of(&r.url).to_string()).collect()
    }

    /// Number of requests sent to `path`.
    pub fn calls_to(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| *p == path).count()
    }
}

fn path_of(url: &str) -> &str {
    let without_base = url.strip_prefix(BASE_URL).unwrap_or(url);
    without_base.split('?').next().unwrap_or(without_base)
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MagentoError> {
        let path = path_of(&request.url).to_string();
        let method = request.method.clone();
        self.requests.lock().unwrap().push(request);

        let route = self.routes.iter().find(|route| {
            route.path == path && route.method.as_ref().is_none_or(|m| *m == method)
        });

        match route.map(|r| &r.reply) {
            Some(Reply::Respond(status, body)) => Ok(HttpResponse::new(*status, body.clone())),
            Some(Reply::Fail(message)) => Err(MagentoError::Transport(message.clone())),
            None => Ok(HttpResponse::new(StatusCode::NOT_FOUND, "{}")),
        }
    }
}
