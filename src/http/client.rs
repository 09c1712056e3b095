use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use reqwest_cookie_store::CookieStoreMutex;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::error::academy::Result;
use crate::http::auth_middleware::AuthHeaderMiddleware;
use crate::http::log_middleware::RequestLogMiddleware;

const CLIENT_USER_AGENT: &str = concat!("academy-client/", env!("CARGO_PKG_VERSION"));

pub fn build_client(
    cookie_store: Arc<CookieStoreMutex>,
    api_token: Option<String>,
) -> Result<ClientWithMiddleware> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .default_headers(headers)
        .cookie_provider(cookie_store)
        .build()?;

    let mut builder = ClientBuilder::new(client).with(RequestLogMiddleware);
    if let Some(token) = api_token {
        builder = builder.with(AuthHeaderMiddleware::with_token(token));
    }
    Ok(builder.build())
}
