#![allow(dead_code)]

use academy_client::config::Config;
use academy_client::core::academy::Academy;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

/// 字段按声明顺序析构：先保存 cookie，再删除临时目录
pub struct Harness {
    pub academy: Academy,
    pub dir: TempDir,
}

pub fn config_for(server: &MockServer, dir: &TempDir, token: Option<&str>) -> Config {
    Config::new(
        &format!("{}/api", server.uri()),
        None,
        None,
        Some(dir.path().join("cookies.jsonl")),
        token.map(str::to_string),
    )
    .expect("valid test config")
}

pub fn harness(server: &MockServer) -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let academy = Academy::new(&config_for(server, &dir, None)).expect("client");
    Harness { academy, dir }
}

pub fn course_json(id: u64, title: &str, lessons: &[u64]) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "A course",
        "instructor": "aalok tomer",
        "imageUrl": "/assets/course.png",
        "category": {"name": "Machine Learning", "slug": "machine-learning"},
        "tags": ["AI"],
        "price": "4999",
        "lessons": lessons.iter().map(|l| json!({
            "id": l,
            "title": format!("Lesson {}", l),
            "duration": "10 min",
            "content": "content",
            "videoUrl": format!("/assets/videos/{}.mp4", l)
        })).collect::<Vec<_>>()
    })
}

pub fn catalog_json() -> Value {
    json!([
        course_json(1, "Introduction to Artificial Intelligence", &[1, 2, 3]),
        course_json(2, "Robot Kinematics and Dynamics", &[4, 5]),
        course_json(3, "Autonomous Robot Navigation", &[]),
    ])
}
