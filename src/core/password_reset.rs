use crate::core::academy::Academy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    Email,
    Otp,
    Reset,
    Done,
}

impl ResetStep {
    pub fn prompt(self) -> &'static str {
        match self {
            ResetStep::Email => "Enter your email to receive an OTP.",
            ResetStep::Otp => "Check your email and enter the OTP sent to you.",
            ResetStep::Reset => "Enter a new password.",
            ResetStep::Done => "Password reset. You can now sign in.",
        }
    }

    fn fallback_error(self) -> &'static str {
        match self {
            ResetStep::Email => "Email not found.",
            ResetStep::Otp => "Invalid OTP.",
            ResetStep::Reset | ResetStep::Done => "Failed to reset password.",
        }
    }
}

/// 找回密码三步：发送验证码 → 校验验证码 → 设置新密码。
/// 某一步失败时停在原地，并记录后端的提示
#[derive(Debug, Clone)]
pub struct PasswordReset {
    step: ResetStep,
    email: String,
    error: Option<String>,
}

impl Default for PasswordReset {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordReset {
    pub fn new() -> Self {
        PasswordReset {
            step: ResetStep::Email,
            email: String::new(),
            error: None,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 按当前步骤提交输入，返回提交后的步骤
    pub async fn submit(&mut self, academy: &Academy, input: &str) -> ResetStep {
        self.error = None;

        // 新密码原样提交，只裁剪邮箱和验证码
        let result = match self.step {
            ResetStep::Email => academy.forgot_password(input.trim()).await.map(|_| {
                self.email = input.trim().to_string();
                ResetStep::Otp
            }),
            ResetStep::Otp => academy
                .verify_otp(&self.email, input.trim())
                .await
                .map(|_| ResetStep::Reset),
            ResetStep::Reset => academy
                .reset_password(&self.email, input)
                .await
                .map(|_| ResetStep::Done),
            ResetStep::Done => return ResetStep::Done,
        };

        match result {
            Ok(next) => self.step = next,
            Err(err) => {
                log::warn!("password reset step {:?} failed: {}", self.step, err);
                self.error = Some(err.user_message(self.step.fallback_error()));
            }
        }
        self.step
    }
}
