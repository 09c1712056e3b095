//! 课程播放器的本地状态
//!
//! 进入课程时从后端拉取一次报名和学习进度，之后在本地维护当前课时、完成记录、
//! 锁定状态和播放状态。完成课时会先更新本地记录再调用后端，后端失败只记日志，
//! 本地不回滚。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::Url;

use crate::core::catalog::resolve_asset_url;
use crate::error::academy::Result;
use crate::model::course::{Course, Lesson};
use crate::model::progress::Progress;

/// 播放器依赖的两个后端接口
#[async_trait::async_trait]
pub trait ProgressBackend {
    async fn fetch_progress(&self, course_id: &str) -> Result<Progress>;

    async fn mark_lesson_complete(&self, course_id: &str, lesson_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrollment {
    /// 还没拿到进度接口的结果
    Unknown,
    Enrolled(String),
    /// 未报名，或进度接口请求失败
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// `complete_lesson` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Recorded,
    /// 本地已记录，但后端保存失败
    RecordedLocally,
    AlreadyComplete,
    Rejected,
}

pub struct LessonPlayer {
    course: Course,
    current: Option<usize>,
    completed: HashMap<String, DateTime<Utc>>,
    enrollment: Enrollment,
    playing: bool,
}

impl LessonPlayer {
    pub fn new(course: Course) -> Self {
        let current = if course.lessons.is_empty() { None } else { Some(0) };
        LessonPlayer {
            course,
            current,
            completed: HashMap::new(),
            enrollment: Enrollment::Unknown,
            playing: false,
        }
    }

    /// 拉取报名和进度。请求失败时按未报名处理
    pub async fn load<B>(&mut self, backend: &B)
    where
        B: ProgressBackend + Sync + ?Sized,
    {
        match backend.fetch_progress(&self.course.id).await {
            Ok(progress) => self.apply_progress(progress),
            Err(err) => {
                log::error!(
                    "failed to fetch enrollment/progress for course {}: {}",
                    self.course.id,
                    err
                );
                self.enrollment = Enrollment::Locked;
            }
        }
    }

    /// 后端只返回完成的课时 id，不带完成时间，统一记为加载时刻
    pub fn apply_progress(&mut self, progress: Progress) {
        self.enrollment = match progress.enrollment_id {
            Some(id) => Enrollment::Enrolled(id),
            None => Enrollment::Locked,
        };
        let now = Utc::now();
        self.completed = progress
            .completed_lesson_ids
            .into_iter()
            .map(|id| (id, now))
            .collect();
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn enrollment(&self) -> &Enrollment {
        &self.enrollment
    }

    pub fn is_locked(&self) -> bool {
        self.enrollment == Enrollment::Locked
    }

    fn is_enrolled(&self) -> bool {
        matches!(self.enrollment, Enrollment::Enrolled(_))
    }

    pub fn is_empty(&self) -> bool {
        self.course.lessons.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.current.and_then(|i| self.course.lessons.get(i))
    }

    pub fn is_complete(&self, lesson_id: &str) -> bool {
        self.completed.contains_key(lesson_id)
    }

    pub fn completed_at(&self, lesson_id: &str) -> Option<DateTime<Utc>> {
        self.completed.get(lesson_id).copied()
    }

    /// 只统计本课程中的课时，后端多返回的 id 不计入
    pub fn completed_count(&self) -> usize {
        self.course
            .lessons
            .iter()
            .filter(|l| self.completed.contains_key(&l.id))
            .count()
    }

    /// 0..=100，空课程为 0
    pub fn progress_percent(&self) -> f64 {
        let total = self.course.lessons.len();
        if total == 0 {
            return 0.0;
        }
        self.completed_count() as f64 / total as f64 * 100.0
    }

    pub fn can_go_prev(&self) -> bool {
        !self.is_locked() && self.current.is_some_and(|i| i > 0)
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_locked() && self.current.is_some_and(|i| i + 1 < self.course.lessons.len())
    }

    pub fn select_lesson(&mut self, lesson_id: &str) -> bool {
        if self.is_locked() {
            return false;
        }
        match self.course.lesson_index(lesson_id) {
            Some(index) => {
                self.current = Some(index);
                self.playing = true;
                true
            }
            None => false,
        }
    }

    /// 从第一个未完成的课时开始播放；全部完成时从头播放
    pub fn play(&mut self) -> bool {
        if self.is_empty() || self.is_locked() {
            return false;
        }
        let next = self
            .course
            .lessons
            .iter()
            .position(|l| !self.completed.contains_key(&l.id))
            .unwrap_or(0);
        self.current = Some(next);
        self.playing = true;
        true
    }

    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(index) = self.current else {
            return false;
        };
        let target = match direction {
            Direction::Next => index + 1,
            Direction::Prev => match index.checked_sub(1) {
                Some(i) => i,
                None => return false,
            },
        };
        if target >= self.course.lessons.len() {
            return false;
        }
        self.current = Some(target);
        self.playing = true;
        true
    }

    /// 已完成的课时不会重复提交；未报名或尚未加载进度时忽略
    pub async fn complete_lesson<B>(&mut self, backend: &B, lesson_id: &str) -> Completion
    where
        B: ProgressBackend + Sync + ?Sized,
    {
        if !self.is_enrolled() {
            return Completion::Rejected;
        }
        if self.completed.contains_key(lesson_id) {
            return Completion::AlreadyComplete;
        }

        self.completed.insert(lesson_id.to_string(), Utc::now());

        match backend.mark_lesson_complete(&self.course.id, lesson_id).await {
            Ok(()) => Completion::Recorded,
            Err(err) => {
                log::error!(
                    "failed to save progress for lesson {} of course {}: {}",
                    lesson_id,
                    self.course.id,
                    err
                );
                Completion::RecordedLocally
            }
        }
    }

    /// 视频播放结束：记录完成，然后播放下一课；最后一课结束后停止播放
    pub async fn video_ended<B>(&mut self, backend: &B) -> Option<Completion>
    where
        B: ProgressBackend + Sync + ?Sized,
    {
        if self.is_locked() {
            return None;
        }
        let index = self.current?;
        let lesson_id = self.course.lessons.get(index)?.id.clone();

        let completion = self.complete_lesson(backend, &lesson_id).await;

        if index + 1 < self.course.lessons.len() {
            self.current = Some(index + 1);
            self.playing = true;
        } else {
            self.playing = false;
        }
        Some(completion)
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// 快捷键切换播放/暂停
    pub fn toggle_playback(&mut self) -> bool {
        if self.is_locked() || self.current.is_none() {
            return false;
        }
        self.playing = !self.playing;
        true
    }

    /// 当前课时的视频地址
    pub fn video_source(&self, base_url: &Url) -> Option<String> {
        let url = self.current_lesson()?.video_url.as_deref()?;
        Some(resolve_asset_url(base_url, Some(url), ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::academy::AcademyError;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        progress: Option<Progress>,
        fail_complete: bool,
        completed_calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeBackend {
        fn enrolled(completed: &[&str]) -> Self {
            FakeBackend {
                progress: Some(Progress {
                    enrollment_id: Some("11".to_string()),
                    completed_lesson_ids: completed.iter().map(|s| s.to_string()).collect(),
                }),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.completed_calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ProgressBackend for FakeBackend {
        async fn fetch_progress(&self, _course_id: &str) -> Result<Progress> {
            self.progress.clone().ok_or(AcademyError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            })
        }

        async fn mark_lesson_complete(&self, course_id: &str, lesson_id: &str) -> Result<()> {
            self.completed_calls
                .lock()
                .unwrap()
                .push((course_id.to_string(), lesson_id.to_string()));
            if self.fail_complete {
                return Err(AcademyError::Api {
                    status: StatusCode::BAD_GATEWAY,
                    message: None,
                });
            }
            Ok(())
        }
    }

    fn lesson(id: &str) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: format!("Lesson {}", id),
            duration: Some("10 min".to_string()),
            content: String::new(),
            video_url: Some(format!("/assets/{}.mp4", id)),
        }
    }

    fn course(lessons: &[&str]) -> Course {
        Course {
            id: "5".to_string(),
            title: "Deep Learning Specialization".to_string(),
            description: String::new(),
            long_description: String::new(),
            instructor: "aalok tomer".to_string(),
            image_url: None,
            image_hint: None,
            category: None,
            lessons: lessons.iter().map(|id| lesson(id)).collect(),
            tags: Vec::new(),
            price: Some("4999".to_string()),
        }
    }

    async fn loaded(lessons: &[&str], backend: &FakeBackend) -> LessonPlayer {
        let mut player = LessonPlayer::new(course(lessons));
        player.load(backend).await;
        player
    }

    #[tokio::test]
    async fn load_marks_completed_lessons() {
        let backend = FakeBackend::enrolled(&["1", "2"]);
        let player = loaded(&["1", "2", "3", "4"], &backend).await;

        assert_eq!(player.enrollment(), &Enrollment::Enrolled("11".to_string()));
        assert!(player.is_complete("1"));
        assert!(player.completed_at("2").is_some());
        assert!(!player.is_complete("3"));
        assert_eq!(player.progress_percent(), 50.0);
        assert_eq!(player.current_lesson().map(|l| l.id.as_str()), Some("1"));
        assert!(!player.is_playing());
    }

    #[tokio::test]
    async fn unknown_completed_ids_do_not_count() {
        let backend = FakeBackend::enrolled(&["1", "99", "100"]);
        let player = loaded(&["1", "2"], &backend).await;

        assert_eq!(player.completed_count(), 1);
        assert_eq!(player.progress_percent(), 50.0);
    }

    #[tokio::test]
    async fn failed_fetch_locks_the_player() {
        let backend = FakeBackend::default();
        let mut player = loaded(&["1", "2"], &backend).await;

        assert!(player.is_locked());
        assert!(!player.play());
        assert!(!player.select_lesson("2"));
        assert!(!player.navigate(Direction::Next));
        assert!(!player.toggle_playback());
        assert!(!player.can_go_next());
        assert_eq!(player.video_ended(&backend).await, None);
    }

    #[tokio::test]
    async fn missing_enrollment_rejects_completion_silently() {
        let backend = FakeBackend {
            progress: Some(Progress::default()),
            ..Default::default()
        };
        let mut player = loaded(&["1", "2"], &backend).await;

        assert!(player.is_locked());
        assert_eq!(player.complete_lesson(&backend, "1").await, Completion::Rejected);
        assert!(!player.is_complete("1"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn completion_before_load_is_rejected() {
        let backend = FakeBackend::enrolled(&[]);
        let mut player = LessonPlayer::new(course(&["1"]));

        assert!(!player.is_locked());
        assert_eq!(player.complete_lesson(&backend, "1").await, Completion::Rejected);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn completing_twice_is_a_noop() {
        let backend = FakeBackend::enrolled(&["1"]);
        let mut player = loaded(&["1", "2"], &backend).await;

        assert_eq!(player.complete_lesson(&backend, "1").await, Completion::AlreadyComplete);
        assert_eq!(player.complete_lesson(&backend, "2").await, Completion::Recorded);
        assert_eq!(player.complete_lesson(&backend, "2").await, Completion::AlreadyComplete);
        assert_eq!(backend.calls(), vec![("5".to_string(), "2".to_string())]);
        assert_eq!(player.progress_percent(), 100.0);
    }

    #[tokio::test]
    async fn remote_failure_keeps_local_completion() {
        let mut backend = FakeBackend::enrolled(&[]);
        backend.fail_complete = true;
        let mut player = loaded(&["1", "2"], &backend).await;

        assert_eq!(player.complete_lesson(&backend, "1").await, Completion::RecordedLocally);
        assert!(player.is_complete("1"));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn play_starts_at_first_incomplete_lesson() {
        let backend = FakeBackend::enrolled(&["1", "2"]);
        let mut player = loaded(&["1", "2", "3"], &backend).await;

        assert!(player.play());
        assert!(player.is_playing());
        assert_eq!(player.current_lesson().map(|l| l.id.as_str()), Some("3"));
    }

    #[tokio::test]
    async fn play_restarts_when_everything_is_complete() {
        let backend = FakeBackend::enrolled(&["1", "2"]);
        let mut player = loaded(&["1", "2"], &backend).await;
        player.select_lesson("2");

        assert!(player.play());
        assert_eq!(player.current_index(), Some(0));
    }

    #[tokio::test]
    async fn empty_course_cannot_play() {
        let backend = FakeBackend::enrolled(&[]);
        let mut player = loaded(&[], &backend).await;

        assert!(player.is_empty());
        assert!(!player.play());
        assert_eq!(player.current_lesson(), None);
        assert_eq!(player.progress_percent(), 0.0);
        assert_eq!(player.video_ended(&backend).await, None);
    }

    #[tokio::test]
    async fn navigation_stays_in_bounds() {
        let backend = FakeBackend::enrolled(&[]);
        let mut player = loaded(&["1", "2"], &backend).await;

        assert!(!player.can_go_prev());
        assert!(!player.navigate(Direction::Prev));
        assert!(player.navigate(Direction::Next));
        assert_eq!(player.current_index(), Some(1));
        assert!(!player.can_go_next());
        assert!(!player.navigate(Direction::Next));
        assert!(player.navigate(Direction::Prev));
        assert_eq!(player.current_index(), Some(0));
    }

    #[tokio::test]
    async fn video_end_advances_to_next_lesson() {
        let backend = FakeBackend::enrolled(&[]);
        let mut player = loaded(&["1", "2", "3"], &backend).await;
        player.play();

        assert_eq!(player.video_ended(&backend).await, Some(Completion::Recorded));
        assert!(player.is_complete("1"));
        assert_eq!(player.current_index(), Some(1));
        assert!(player.is_playing());
    }

    #[tokio::test]
    async fn last_lesson_end_stops_playback() {
        let backend = FakeBackend::enrolled(&["1"]);
        let mut player = loaded(&["1", "2"], &backend).await;
        player.select_lesson("2");

        assert_eq!(player.video_ended(&backend).await, Some(Completion::Recorded));
        assert!(!player.is_playing());
        assert_eq!(player.current_index(), Some(1));
        assert_eq!(player.progress_percent(), 100.0);
    }

    #[tokio::test]
    async fn toggle_flips_playback() {
        let backend = FakeBackend::enrolled(&[]);
        let mut player = loaded(&["1"], &backend).await;

        assert!(player.toggle_playback());
        assert!(player.is_playing());
        assert!(player.toggle_playback());
        assert!(!player.is_playing());
        player.set_playing(true);
        assert!(player.is_playing());
    }

    #[tokio::test]
    async fn video_source_resolves_asset_paths() {
        let backend = FakeBackend::enrolled(&[]);
        let player = loaded(&["1"], &backend).await;
        let base = Url::parse("http://localhost:5000").unwrap();

        assert_eq!(
            player.video_source(&base).as_deref(),
            Some("http://localhost:5000/assets/1.mp4")
        );
    }
}
