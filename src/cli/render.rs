use chrono::{DateTime, Local, Utc};
use url::Url;

use crate::core::catalog::{self, AVATAR_FALLBACK, COURSE_IMAGE_FALLBACK};
use crate::core::player::LessonPlayer;
use crate::model::certificate::Certificate;
use crate::model::course::Course;
use crate::model::user::User;

fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%b %-d, %Y, %-I:%M %p").to_string()
}

fn duration(duration: Option<&str>) -> &str {
    duration.unwrap_or("-")
}

pub fn course_card(course: &Course, base_url: &Url) -> String {
    let mut lines = vec![format!("[{}] {}", course.id, course.title)];
    if !course.description.is_empty() {
        lines.push(format!("    {}", course.description));
    }
    if !course.tags.is_empty() {
        lines.push(format!("    tags: {}", course.tags.join(", ")));
    }
    let price = catalog::format_price(course.price.as_deref().unwrap_or("0"));
    lines.push(format!("    price: {}", price));
    let image =
        catalog::resolve_asset_url(base_url, course.image_url.as_deref(), COURSE_IMAGE_FALLBACK);
    lines.push(format!("    image: {}", image));
    lines.join("\n")
}

pub fn course_list(courses: &[&Course], base_url: &Url) -> String {
    courses
        .iter()
        .map(|c| course_card(c, base_url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn course_detail(course: &Course, base_url: &Url, buy_target: &str) -> String {
    let mut out = course_card(course, base_url);
    out.push('\n');
    if !course.instructor.is_empty() {
        out.push_str(&format!("    by {}\n", course.instructor));
    }
    if !course.long_description.is_empty() {
        out.push_str(&format!("\n{}\n", course.long_description));
    }
    out.push_str("\nLessons:\n");
    for (i, lesson) in course.lessons.iter().enumerate() {
        let line = format!(
            "  {}. {} ({})\n",
            i + 1,
            lesson.title,
            duration(lesson.duration.as_deref())
        );
        out.push_str(&line);
    }
    out.push_str(&format!("\nBuy Now: {}", buy_target));
    out
}

pub fn player_view(player: &LessonPlayer, base_url: &Url) -> String {
    let course = player.course();
    let mut out = format!("== {} ==\n", course.title);

    if player.is_empty() {
        out.push_str("Course coming soon. Stay tuned!");
        return out;
    }

    out.push_str(&format!("{}% Complete\n", player.progress_percent().round()));
    for (i, lesson) in course.lessons.iter().enumerate() {
        let marker = if player.is_locked() {
            "[locked]"
        } else if player.is_complete(&lesson.id) {
            "[done]  "
        } else {
            "[ ]     "
        };
        let cursor = if player.current_index() == Some(i) { ">" } else { " " };
        let mut line = format!(
            "{} {} {}. {} ({})",
            cursor,
            marker,
            i + 1,
            lesson.title,
            duration(lesson.duration.as_deref())
        );
        if let Some(at) = player.completed_at(&lesson.id) {
            line.push_str(&format!("  {}", format_time(at)));
        }
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(lesson) = player.current_lesson() {
        out.push_str(&format!("\n{}\nBy {}\n", lesson.title, course.instructor));
        if !lesson.content.is_empty() {
            out.push_str(&format!("{}\n", lesson.content));
        }
        if let Some(at) = player.completed_at(&lesson.id) {
            out.push_str(&format!("Completed on {}\n", format_time(at)));
        }
        let state = match (player.is_playing(), player.video_source(base_url)) {
            (true, Some(src)) => format!("playing {}", src),
            (true, None) => "playing".to_string(),
            (false, _) => "paused".to_string(),
        };
        out.push_str(&format!("[{}]", state));
    }
    out
}

pub fn profile(user: Option<&User>, certificates: &[Certificate], base_url: &Url) -> String {
    let mut out = match user {
        Some(user) => {
            let avatar =
                catalog::resolve_asset_url(base_url, user.avatar_url.as_deref(), AVATAR_FALLBACK);
            format!("{} <{}>\navatar: {}\n", user.name, user.email, avatar)
        }
        None => "Not signed in.\n".to_string(),
    };
    out.push_str("\nMy Certificates\n");
    out.push_str(&certificate_list(certificates, base_url));
    out
}

pub fn certificate_list(certificates: &[Certificate], base_url: &Url) -> String {
    if certificates.is_empty() {
        return "You haven't earned any certificates yet.".to_string();
    }
    certificates
        .iter()
        .map(|cert| {
            let mut line = format!("- {} (Issued: {})", cert.course_title, cert.date_issued);
            if let Some(path) = cert.course_certificate.as_deref() {
                let url = catalog::resolve_asset_url(base_url, Some(path), "");
                line.push_str(&format!("\n  {}", url));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
