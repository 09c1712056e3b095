//! Lesson player against a mocked progress API

mod common;

use academy_client::core::player::{Completion, Enrollment, LessonPlayer};
use academy_client::model::course::Course;
use common::{course_json, harness};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn course(lessons: &[u64]) -> Course {
    serde_json::from_value(course_json(5, "Deep Learning Specialization", lessons)).unwrap()
}

async fn mount_progress(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/progress/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn completes_each_lesson_once() {
    let server = MockServer::start().await;
    mount_progress(&server, json!({"enrollmentId": 42, "completedLessonIds": [1]})).await;
    Mock::given(method("POST"))
        .and(path("/api/progress/complete"))
        .and(body_json(json!({"courseId": 5, "lessonId": 2})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let mut player = LessonPlayer::new(course(&[1, 2, 3]));
    player.load(&h.academy).await;

    assert_eq!(player.enrollment(), &Enrollment::Enrolled("42".to_string()));
    assert_eq!(player.complete_lesson(&h.academy, "1").await, Completion::AlreadyComplete);
    assert_eq!(player.complete_lesson(&h.academy, "2").await, Completion::Recorded);
    assert_eq!(player.complete_lesson(&h.academy, "2").await, Completion::AlreadyComplete);
    assert_eq!(player.completed_count(), 2);
}

#[tokio::test]
async fn server_error_does_not_roll_back() {
    let server = MockServer::start().await;
    mount_progress(&server, json!({"enrollmentId": 42, "completedLessonIds": []})).await;
    Mock::given(method("POST"))
        .and(path("/api/progress/complete"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let mut player = LessonPlayer::new(course(&[1, 2]));
    player.load(&h.academy).await;

    assert_eq!(player.complete_lesson(&h.academy, "1").await, Completion::RecordedLocally);
    assert!(player.is_complete("1"));
    assert_eq!(player.progress_percent(), 50.0);
}

#[tokio::test]
async fn unenrolled_course_never_posts_progress() {
    let server = MockServer::start().await;
    mount_progress(&server, json!({"enrollmentId": null, "completedLessonIds": []})).await;
    Mock::given(method("POST"))
        .and(path("/api/progress/complete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server);
    let mut player = LessonPlayer::new(course(&[1, 2]));
    player.load(&h.academy).await;

    assert!(player.is_locked());
    assert_eq!(player.complete_lesson(&h.academy, "1").await, Completion::Rejected);
    assert_eq!(player.video_ended(&h.academy).await, None);
    assert!(!player.play());
}

#[tokio::test]
async fn progress_fetch_failure_locks_player() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress/5"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server);
    let mut player = LessonPlayer::new(course(&[1]));
    player.load(&h.academy).await;
    assert!(player.is_locked());
}

#[tokio::test]
async fn watching_to_the_end_stops_playback() {
    let server = MockServer::start().await;
    mount_progress(&server, json!({"enrollmentId": 42, "completedLessonIds": []})).await;
    Mock::given(method("POST"))
        .and(path("/api/progress/complete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let h = harness(&server);
    let mut player = LessonPlayer::new(course(&[1, 2]));
    player.load(&h.academy).await;

    assert!(player.play());
    assert!(player.video_source(h.academy.base_url()).unwrap().ends_with("/assets/videos/1.mp4"));

    player.video_ended(&h.academy).await;
    assert!(player.is_playing());
    assert_eq!(player.current_lesson().map(|l| l.id.as_str()), Some("2"));

    player.video_ended(&h.academy).await;
    assert!(!player.is_playing());
    assert_eq!(player.current_lesson().map(|l| l.id.as_str()), Some("2"));
    assert_eq!(player.progress_percent(), 100.0);
}
