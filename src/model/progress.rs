use serde::{Deserialize, Serialize};

use crate::model::serde_helper::{opt_string_or_number, vec_string_or_number};

/// `GET /progress/{courseId}`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// `null` 表示未购买该课程
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub enrollment_id: Option<String>,
    #[serde(default, deserialize_with = "vec_string_or_number")]
    pub completed_lesson_ids: Vec<String>,
}

/// `POST /progress/complete` 请求体。后端按数字 id 存储，能解析成数字的 id 以数字发送
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    pub course_id: serde_json::Value,
    pub lesson_id: serde_json::Value,
}

impl CompleteLessonRequest {
    pub fn new(course_id: &str, lesson_id: &str) -> Self {
        CompleteLessonRequest {
            course_id: numeric_or_string(course_id),
            lesson_id: numeric_or_string(lesson_id),
        }
    }
}

fn numeric_or_string(id: &str) -> serde_json::Value {
    match id.parse::<i64>() {
        Ok(n) => serde_json::Value::from(n),
        Err(_) => serde_json::Value::from(id),
    }
}
