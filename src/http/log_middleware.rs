use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// 记录每个请求的方法、地址和状态码
pub struct RequestLogMiddleware;

#[async_trait::async_trait]
impl Middleware for RequestLogMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        log::debug!("--> {} {}", method, url);

        let result = next.run(req, extensions).await;
        match &result {
            Ok(response) => log::debug!("<-- {} {} {}", response.status(), method, url),
            Err(err) => log::error!("<-- {} {} failed: {}", method, url, err),
        }
        result
    }
}
