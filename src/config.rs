use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::academy::{AcademyError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_COOKIE_PATH: &str = "cookies/academy.jsonl";
/// 支付网关的公开测试 key
pub const DEFAULT_RAZORPAY_KEY_ID: &str = "rzp_test_525mRzEtTSEZ6m";

#[derive(Debug, Clone)]
pub struct Config {
    /// 后端 API 根地址，例如 `http://localhost:5000/api`
    pub api_url: Url,
    /// 静态资源（`/assets/...`）所在主机
    pub base_url: Url,
    pub razorpay_key_id: String,
    pub cookie_path: PathBuf,
    pub api_token: Option<String>,
}

impl Config {
    /// 先加载 `.env`，再读取环境变量
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var("ACADEMY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = var("ACADEMY_BASE_URL");
        Self::new(
            &api_url,
            base_url.as_deref(),
            var("ACADEMY_RAZORPAY_KEY_ID"),
            var("ACADEMY_COOKIE_PATH").map(PathBuf::from),
            var("ACADEMY_API_TOKEN").filter(|t| !t.is_empty()),
        )
    }

    pub fn new(
        api_url: &str,
        base_url: Option<&str>,
        razorpay_key_id: Option<String>,
        cookie_path: Option<PathBuf>,
        api_token: Option<String>,
    ) -> Result<Self> {
        let api_url = parse_base(api_url)?;
        let base_url = match base_url {
            Some(base) => parse_base(base)?,
            None => derive_base_url(&api_url),
        };

        Ok(Config {
            api_url,
            base_url,
            razorpay_key_id: razorpay_key_id
                .unwrap_or_else(|| DEFAULT_RAZORPAY_KEY_ID.to_string()),
            cookie_path: cookie_path.unwrap_or_else(|| PathBuf::from(DEFAULT_COOKIE_PATH)),
            api_token,
        })
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AcademyError::Config("base URL must not be empty".into()));
    }
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(AcademyError::Config(format!("{} cannot be used as a base URL", raw)));
    }
    Ok(url)
}

/// `http://host:5000/api` -> `http://host:5000`
fn derive_base_url(api_url: &Url) -> Url {
    let mut base = api_url.clone();
    let path = api_url.path().trim_end_matches('/');
    let path = path.strip_suffix("/api").unwrap_or(path);
    base.set_path(if path.is_empty() { "/" } else { path });
    base.set_query(None);
    base
}
