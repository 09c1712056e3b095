//! 命令行入口
//!
//! 每个子命令对应网页端的一个页面：启动时拉取数据，然后以文本形式输出。

pub mod commands;
pub mod player;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::avatar::CropRect;
use crate::error::academy::Result;

/// Course platform client: browse the catalog, watch lessons, manage your profile
#[derive(Parser, Debug)]
#[command(name = "academy", version, about)]
pub struct Cli {
    /// Backend API base URL
    #[arg(long, env = "ACADEMY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Host serving /assets (defaults to the API URL without /api)
    #[arg(long, env = "ACADEMY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Cookie file used to keep the login session
    #[arg(long, env = "ACADEMY_COOKIE_PATH", global = true)]
    pub cookies: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the course catalog
    Courses {
        /// Only show courses whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only show courses in this category (slug)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Search courses by title
    Search { query: String },
    /// Show a course and its lessons
    Course { id: String },
    /// Courses you are enrolled in
    Dashboard,
    /// Show whether you are signed in
    Status,
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    Signup {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Logout,
    /// Reset your password with an emailed OTP
    ForgotPassword,
    /// Show your profile and certificates
    Profile,
    /// Update name, email or avatar
    ProfileEdit {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Image file to use as the new avatar
        #[arg(long)]
        avatar: Option<PathBuf>,

        /// Square crop as x,y,size in image pixels (centered by default)
        #[arg(long, value_parser = parse_crop, requires = "avatar")]
        crop: Option<CropRect>,
    },
    /// List earned certificates
    Certificates,
    /// Watch a course's lessons and track progress
    Player { course_id: String },
    /// Buy a course
    Pay { course_id: String },
}

impl Cli {
    /// 命令行参数优先，其余读环境变量
    pub fn config(&self) -> Result<Config> {
        Config::from_vars(|key| {
            let flag = match key {
                "ACADEMY_API_URL" => self.api_url.clone(),
                "ACADEMY_BASE_URL" => self.base_url.clone(),
                "ACADEMY_COOKIE_PATH" => self.cookies.as_ref().map(|p| p.display().to_string()),
                _ => None,
            };
            flag.or_else(|| std::env::var(key).ok())
        })
    }
}

pub fn parse_crop(raw: &str) -> std::result::Result<CropRect, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [x, y, size] = parts.as_slice() else {
        return Err(format!("expected x,y,size but got {:?}", raw));
    };
    let num = |s: &str| s.parse::<u32>().map_err(|e| format!("{:?}: {}", s, e));
    Ok(CropRect {
        x: num(*x)?,
        y: num(*y)?,
        size: num(*size)?,
    })
}
