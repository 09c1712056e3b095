use reqwest::multipart::Form;
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::core::catalog;
use crate::core::player::ProgressBackend;
use crate::error::academy::{AcademyError, Result};
use crate::http::client::build_client;
use crate::http::cookie_jar::CookieJar;
use crate::model::auth::{
    ApiMessage, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
    VerifyOtpRequest,
};
use crate::model::certificate::Certificate;
use crate::model::course::Course;
use crate::model::payment::{PaymentResponse, PurchaseOrder, PurchaseRequest};
use crate::model::progress::{CompleteLessonRequest, Progress};
use crate::model::user::{AuthStatus, User};

/// 后端 REST API 客户端。会话靠 cookie 维持，进程结束时写回 cookie 文件
pub struct Academy {
    client: ClientWithMiddleware,
    cookies: CookieJar,
    api_url: Url,
    base_url: Url,
}

impl Academy {
    pub fn new(config: &Config) -> Result<Self> {
        let cookies = CookieJar::load(&config.cookie_path);
        let client = build_client(cookies.store(), config.api_token.clone())?;
        Ok(Academy {
            client,
            cookies,
            api_url: config.api_url.clone(),
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `/assets/...` 路径挂到资源主机下
    pub fn asset_url(&self, path: Option<&str>, fallback: &str) -> String {
        catalog::resolve_asset_url(&self.base_url, path, fallback)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let url = format!(
            "{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }

    fn get(&self, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.get(self.endpoint(path)?))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.post(self.endpoint(path)?))
    }

    /// 非 2xx 响应转成 `AcademyError::Api`，尽量带上后端的 message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.message);
        Err(AcademyError::Api { status, message })
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        Self::check(response).await
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = Self::send(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// 列表接口可能返回 `null`
    async fn send_list<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>> {
        Ok(Self::send_json::<Option<Vec<T>>>(request)
            .await?
            .unwrap_or_default())
    }

    // ---------- auth ----------

    /// 未登录时后端返回 401，这里视为 `is_logged_in == false`
    pub async fn auth_status(&self) -> Result<AuthStatus> {
        match Self::send_json::<AuthStatus>(self.get("auth/status")?).await {
            Ok(status) => Ok(status),
            Err(err) if err.is_unauthorized() => Ok(AuthStatus::default()),
            Err(err) => Err(err),
        }
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.auth_status().await?.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::send(self.post("auth/login")?.json(&payload)).await?;
        log::info!("logged in as {}", email);
        self.save_session();
        Ok(())
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let payload = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::send(self.post("auth/signup")?.json(&payload)).await?;
        self.save_session();
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        Self::send(self.post("auth/logout")?.json(&serde_json::json!({}))).await?;
        self.cookies.clear()?;
        self.save_session();
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let payload = ForgotPasswordRequest {
            email: email.to_string(),
        };
        Self::send(self.post("auth/forgot-password")?.json(&payload)).await?;
        Ok(())
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<()> {
        let payload = VerifyOtpRequest {
            email: email.to_string(),
            otp: otp.to_string(),
        };
        Self::send(self.post("auth/verify-otp")?.json(&payload)).await?;
        Ok(())
    }

    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        let payload = ResetPasswordRequest {
            email: email.to_string(),
            new_password: new_password.to_string(),
        };
        Self::send(self.post("auth/reset-password")?.json(&payload)).await?;
        Ok(())
    }

    // ---------- courses ----------

    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        Self::send_list(self.get("courses")?).await
    }

    /// 没有标题的课程按不存在处理
    pub async fn get_course(&self, course_id: &str) -> Result<Course> {
        Ok(self.get_course_with_raw(course_id).await?.0)
    }

    /// 同时返回后端原始的课程 JSON，购买接口需要原样回传
    pub async fn get_course_with_raw(&self, course_id: &str) -> Result<(Course, Value)> {
        let raw: Value = Self::send_json(self.get(&format!("courses/{}", course_id))?).await?;
        let course: Course = serde_json::from_value(raw.clone())?;
        if course.title.is_empty() {
            return Err(AcademyError::Api {
                status: StatusCode::NOT_FOUND,
                message: Some(format!("course {} not found", course_id)),
            });
        }
        Ok((course, raw))
    }

    pub async fn enrolled_courses(&self) -> Result<Vec<Course>> {
        Self::send_list(self.get("courses/enrolled")?).await
    }

    /// 后端没有搜索接口，拉取全部课程后按标题过滤；空关键字不发请求
    pub async fn search_courses(&self, query: &str) -> Result<Vec<Course>> {
        let Some(query) = catalog::normalize_query(query) else {
            return Ok(Vec::new());
        };
        let courses = self.list_courses().await?;
        Ok(catalog::filter_by_title(&courses, query)
            .into_iter()
            .cloned()
            .collect())
    }

    // ---------- progress ----------

    pub async fn get_progress(&self, course_id: &str) -> Result<Progress> {
        Self::send_json(self.get(&format!("progress/{}", course_id))?).await
    }

    pub async fn complete_lesson(&self, course_id: &str, lesson_id: &str) -> Result<()> {
        let payload = CompleteLessonRequest::new(course_id, lesson_id);
        Self::send(self.post("progress/complete")?.json(&payload)).await?;
        Ok(())
    }

    // ---------- profile ----------

    pub async fn certificates(&self) -> Result<Vec<Certificate>> {
        Self::send_list(self.get("certificates/user")?).await
    }

    /// 用户信息和证书同时请求
    pub async fn profile(&self) -> Result<(Option<User>, Vec<Certificate>)> {
        let (status, certificates) = tokio::try_join!(self.auth_status(), self.certificates())?;
        Ok((status.user, certificates))
    }

    pub async fn update_profile(&self, user_id: &str, form: Form) -> Result<()> {
        let url = self.endpoint(&format!("auth/users/{}", user_id))?;
        Self::send(self.client.put(url).multipart(form)).await?;
        Ok(())
    }

    // ---------- payment ----------

    /// `course` 是 `get_course_with_raw` 拿到的原始 JSON
    pub async fn create_order(&self, course: &Value) -> Result<PurchaseOrder> {
        let payload = PurchaseRequest::new(course, None);
        Self::send_json(self.post("auth/purchase-course")?.json(&payload)).await
    }

    /// 把支付网关的回调交给后端验签并开通课程
    pub async fn verify_payment(&self, course: &Value, payment: &PaymentResponse) -> Result<()> {
        let payload = PurchaseRequest::new(course, Some(payment));
        Self::send(self.post("auth/purchase-course")?.json(&payload)).await?;
        Ok(())
    }

    pub fn save_session(&self) {
        if let Err(err) = self.cookies.save() {
            log::warn!(
                "failed to save cookies to {}: {}",
                self.cookies.path().display(),
                err
            );
        }
    }
}

#[async_trait::async_trait]
impl ProgressBackend for Academy {
    async fn fetch_progress(&self, course_id: &str) -> Result<Progress> {
        self.get_progress(course_id).await
    }

    async fn mark_lesson_complete(&self, course_id: &str, lesson_id: &str) -> Result<()> {
        self.complete_lesson(course_id, lesson_id).await
    }
}

impl Drop for Academy {
    fn drop(&mut self) {
        log::debug!("saving cookies to {}", self.cookies.path().display());
        self.save_session();
    }
}
