use serde::{Deserialize, Serialize};

use crate::model::serde_helper::{opt_string_or_number, string_or_number};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub slug: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// e.g. "15 min"
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub duration: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_hint: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub price: Option<String>,
}

impl Course {
    pub fn lesson_index(&self, lesson_id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id == lesson_id)
    }
}
