use serde::{Deserialize, Serialize};

use crate::model::serde_helper::string_or_number;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub course_title: String,
    pub date_issued: String,
    /// 证书文件地址
    #[serde(default)]
    pub course_certificate: Option<String>,
}
