use std::sync::LazyLock;

use regex::Regex;
use reqwest::multipart::{Form, Part};

use crate::core::avatar::{AVATAR_FILE_NAME, CropRect, crop_avatar};
use crate::error::academy::{AcademyError, Result};
use crate::model::user::User;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const MIN_NAME_LEN: usize = 2;

/// 编辑资料表单，提交时整体作为一个 multipart 请求发送
#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    avatar_png: Option<Vec<u8>>,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        ProfileForm {
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_png: None,
        }
    }

    /// 裁剪并暂存新头像
    pub fn set_avatar(&mut self, image_bytes: &[u8], crop: Option<CropRect>) -> Result<()> {
        self.avatar_png = Some(crop_avatar(image_bytes, crop)?);
        Ok(())
    }

    pub fn has_avatar(&self) -> bool {
        self.avatar_png.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(AcademyError::Validation(format!(
                "Name must be at least {} characters.",
                MIN_NAME_LEN
            )));
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(AcademyError::Validation(
                "Please enter a valid email address.".into(),
            ));
        }
        Ok(())
    }

    pub fn into_multipart(self) -> Result<Form> {
        self.validate()?;
        let mut form = Form::new()
            .text("name", self.name.trim().to_string())
            .text("email", self.email.trim().to_string());
        if let Some(png) = self.avatar_png {
            let part = Part::bytes(png)
                .file_name(AVATAR_FILE_NAME)
                .mime_str("image/png")?;
            form = form.part("avatar", part);
        }
        Ok(form)
    }
}
