use crate::core::academy::Academy;
use crate::core::player::{Completion, Direction, LessonPlayer};
use crate::cli::render;
use crate::utils::input::input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Next,
    Prev,
    /// 课时 id，或 `#n` 表示列表中的第 n 课（从 1 开始）
    Select(String),
    Complete,
    /// 模拟视频播放结束
    Ended,
    Toggle,
    Status,
    Help,
    Quit,
}

impl PlayerCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()?.to_lowercase().as_str() {
            "play" | "p" => PlayerCommand::Play,
            "next" | "n" => PlayerCommand::Next,
            "prev" | "b" => PlayerCommand::Prev,
            "select" | "s" => PlayerCommand::Select(words.next()?.to_string()),
            "complete" | "c" => PlayerCommand::Complete,
            "ended" | "e" => PlayerCommand::Ended,
            "toggle" | "t" => PlayerCommand::Toggle,
            "status" | "ls" => PlayerCommand::Status,
            "help" | "?" => PlayerCommand::Help,
            "quit" | "q" | "exit" => PlayerCommand::Quit,
            _ => return None,
        };
        Some(command)
    }
}

const HELP: &str =
    "commands: play, next, prev, select <id|#n>, complete, ended, toggle, status, quit";

/// 交互式播放器循环，输入流结束时退出
pub async fn run(academy: &Academy, player: &mut LessonPlayer) {
    println!("{}", render::player_view(player, academy.base_url()));
    println!("{}", HELP);

    loop {
        let line = match input("> ") {
            Ok(line) => line,
            Err(_) => break,
        };
        let Some(command) = PlayerCommand::parse(&line) else {
            if !line.is_empty() {
                println!("unknown command: {}", line);
            }
            continue;
        };

        let changed = match command {
            PlayerCommand::Play => player.play(),
            PlayerCommand::Next => player.navigate(Direction::Next),
            PlayerCommand::Prev => player.navigate(Direction::Prev),
            PlayerCommand::Select(target) => {
                let lesson_id = resolve_lesson(player, &target);
                lesson_id.is_some_and(|id| player.select_lesson(&id))
            }
            PlayerCommand::Complete => match player.current_lesson().map(|l| l.id.clone()) {
                Some(id) => report(player.complete_lesson(academy, &id).await),
                None => false,
            },
            PlayerCommand::Ended => match player.video_ended(academy).await {
                Some(completion) => {
                    report(completion);
                    true
                }
                None => false,
            },
            PlayerCommand::Toggle => player.toggle_playback(),
            PlayerCommand::Status => true,
            PlayerCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            PlayerCommand::Quit => break,
        };

        if changed {
            println!("{}", render::player_view(player, academy.base_url()));
        } else if player.is_locked() {
            println!("This course is locked. Buy it to start learning.");
        }
    }
}

/// `#n` 按列表序号选择，其余按课时 id 匹配
fn resolve_lesson(player: &LessonPlayer, target: &str) -> Option<String> {
    let lessons = &player.course().lessons;
    let lesson = match target.strip_prefix('#') {
        Some(position) => position
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| lessons.get(index)),
        None => lessons.iter().find(|l| l.id == target),
    };
    lesson.map(|l| l.id.clone())
}

fn report(completion: Completion) -> bool {
    match completion {
        Completion::Recorded => true,
        Completion::RecordedLocally => {
            println!("Marked as complete, but the server did not save it.");
            true
        }
        Completion::AlreadyComplete => false,
        Completion::Rejected => false,
    }
}
