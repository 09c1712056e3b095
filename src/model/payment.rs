use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::serde_helper::string_or_number;

/// `POST /auth/purchase-course`。第一次调用创建订单，携带 `paymentResponse` 的第二次调用用于验签和开通课程
///
/// `amount` 和 `course` 原样使用后端返回的课程 JSON
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest<'a> {
    pub amount: &'a Value,
    pub course: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_response: Option<&'a PaymentResponse>,
}

static NO_PRICE: Value = Value::Null;

impl<'a> PurchaseRequest<'a> {
    pub fn new(course: &'a Value, payment_response: Option<&'a PaymentResponse>) -> Self {
        PurchaseRequest {
            amount: course.get("price").unwrap_or(&NO_PRICE),
            course,
            payment_response,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PurchaseOrder {
    pub order: Order,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    /// 最小货币单位（paise）
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub currency: String,
}

/// 支付网关回调给前端的数据，原样转发给后端
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentResponse {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckoutPrefill {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckoutTheme {
    pub color: String,
}

/// 打开支付网关收银台所需的参数
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: String,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
    pub theme: CheckoutTheme,
}
