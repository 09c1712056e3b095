use serde_json::Value;

use crate::core::academy::Academy;
use crate::error::academy::Result;
use crate::model::course::Course;
use crate::model::payment::{
    CheckoutOptions, CheckoutPrefill, CheckoutTheme, Order, PaymentResponse,
};
use crate::model::user::User;

pub const MERCHANT_NAME: &str = "My Academy";
pub const THEME_COLOR: &str = "#3399cc";

/// 购买流程：后端建单 → 用户在支付网关付款 → 回调交给后端验签开通
pub struct Checkout {
    pub course: Course,
    pub user: Option<User>,
    /// 后端返回的课程 JSON，建单和验签时原样回传
    raw_course: Value,
}

impl Checkout {
    /// 加载当前用户和课程
    pub async fn load(academy: &Academy, course_id: &str) -> Result<Self> {
        let status = academy.auth_status().await?;
        let (course, raw_course) = academy.get_course_with_raw(course_id).await?;
        Ok(Checkout {
            course,
            user: status.user,
            raw_course,
        })
    }

    /// 在后端创建订单，返回打开收银台用的参数
    pub async fn start(&self, academy: &Academy, key_id: &str) -> Result<CheckoutOptions> {
        let purchase = academy.create_order(&self.raw_course).await?;
        log::info!(
            "created order {} for course {}",
            purchase.order.id,
            self.course.id
        );
        Ok(self.options(key_id, purchase.order))
    }

    pub fn options(&self, key_id: &str, order: Order) -> CheckoutOptions {
        CheckoutOptions {
            key: key_id.to_string(),
            amount: order.amount,
            currency: order.currency,
            name: MERCHANT_NAME.to_string(),
            description: self.course.title.clone(),
            order_id: order.id,
            prefill: CheckoutPrefill {
                name: self.user.as_ref().map(|u| u.name.clone()),
                email: self.user.as_ref().map(|u| u.email.clone()),
            },
            theme: CheckoutTheme {
                color: THEME_COLOR.to_string(),
            },
        }
    }

    pub async fn confirm(&self, academy: &Academy, payment: &PaymentResponse) -> Result<()> {
        academy.verify_payment(&self.raw_course, payment).await?;
        log::info!("payment {} verified", payment.razorpay_payment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_carry_order_and_prefill() {
        let checkout = Checkout {
            course: Course {
                id: "3".into(),
                title: "Deep Learning Specialization".into(),
                description: String::new(),
                long_description: String::new(),
                instructor: String::new(),
                image_url: None,
                image_hint: None,
                category: None,
                lessons: Vec::new(),
                tags: Vec::new(),
                price: Some("4999".into()),
            },
            user: Some(User {
                id: Some("9".into()),
                name: "Asha".into(),
                email: "asha@example.com".into(),
                avatar_url: None,
            }),
            raw_course: Value::Null,
        };
        let order = Order {
            id: "order_123".into(),
            amount: "499900".into(),
            currency: "INR".into(),
        };

        let options = checkout.options("rzp_test_key", order);
        assert_eq!(options.order_id, "order_123");
        assert_eq!(options.amount, "499900");
        assert_eq!(options.name, MERCHANT_NAME);
        assert_eq!(options.description, "Deep Learning Specialization");
        assert_eq!(options.prefill.email.as_deref(), Some("asha@example.com"));
        assert_eq!(options.theme.color, THEME_COLOR);
    }
}
