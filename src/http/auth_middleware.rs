use std::sync::Arc;

use http::Extensions;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// 会话本身靠 cookie 维持；配置了 token 时额外附加 `Authorization: Bearer`
pub struct AuthHeaderMiddleware {
    pub token_fn: Arc<dyn Fn() -> Option<String> + Send + Sync>,
}

impl AuthHeaderMiddleware {
    pub fn with_token(token: String) -> Self {
        AuthHeaderMiddleware {
            token_fn: Arc::new(move || Some(token.clone())),
        }
    }
}

#[async_trait::async_trait]
impl Middleware for AuthHeaderMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if let Some(token) = (self.token_fn)() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    req.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(err) => log::warn!("ignoring API token with invalid characters: {}", err),
            }
        }
        next.run(req, extensions).await
    }
}
