use std::fmt::Write as _;

use services::{OptionMark, QuizSnapshot, SessionPhase};

/// Start screen shown while the engine is idle.
#[must_use]
pub fn render_start(snapshot: &QuizSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome to the Quiz!");
    let _ = writeln!(out, "High Score: {}", snapshot.high_score);
    if let Some(summary) = &snapshot.last_summary {
        if summary.is_perfect() {
            let _ = writeln!(out, "Last run: {0}/{0} (perfect!)", summary.score());
        } else {
            let _ = writeln!(
                out,
                "Last run: {}/{} ({} missed)",
                summary.score(),
                summary.total_questions(),
                summary.missed()
            );
        }
    }
    let _ = write!(out, "[s] Start Quiz  [q] Quit > ");
    out
}

/// Current question with numbered options, marked once graded.
#[must_use]
pub fn render_question(snapshot: &QuizSnapshot) -> String {
    let mut out = String::new();
    match snapshot.phase {
        SessionPhase::Loading => {
            let _ = writeln!(out, "Loading questions...");
            return out;
        }
        SessionPhase::Exhausted => {
            let _ = writeln!(out, "No questions available.");
            return out;
        }
        SessionPhase::Idle => return render_start(snapshot),
        SessionPhase::AwaitingAnswer | SessionPhase::Grading => {}
    }

    let _ = writeln!(
        out,
        "Highest Score: {}    Score: {}",
        snapshot.high_score, snapshot.score
    );
    let _ = writeln!(
        out,
        "Question {}/{}",
        snapshot.current_index + 1,
        snapshot.total_questions
    );
    if let Some(text) = &snapshot.current_question_text {
        let _ = writeln!(out, "{text}");
    }
    if let Some(url) = &snapshot.current_image_url {
        let _ = writeln!(out, "(image: {url})");
    }
    let _ = writeln!(out, "{}", "-".repeat(40));

    for (index, (option, mark)) in snapshot
        .current_options
        .iter()
        .zip(snapshot.option_marks())
        .enumerate()
    {
        let badge = match mark {
            OptionMark::Neutral => "  ",
            OptionMark::Correct => "✔ ",
            OptionMark::Wrong => "✘ ",
        };
        let _ = writeln!(out, "{badge}{}. {option}", index + 1);
    }
    out
}

/// Parse a 1-based option choice into an option index.
#[must_use]
pub fn parse_choice(line: &str) -> Option<usize> {
    line.trim().parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizSummary, SessionToken};
    use quiz_core::time::fixed_now;

    fn summary(total: u32, score: u32) -> QuizSummary {
        QuizSummary::new(SessionToken::new(3), total, score, fixed_now(), fixed_now()).unwrap()
    }

    fn grading_snapshot() -> QuizSnapshot {
        QuizSnapshot {
            token: SessionToken::new(1),
            phase: SessionPhase::Grading,
            started: true,
            current_index: 0,
            total_questions: 2,
            current_question_text: Some("1.e4 c5 is?".into()),
            current_options: vec!["French".into(), "Sicilian".into()],
            current_image_url: None,
            selected_option_index: Some(1),
            tapped_index: Some(0),
            score: 0,
            high_score: 4,
            last_summary: None,
        }
    }

    #[test]
    fn start_screen_shows_high_score() {
        let snapshot = QuizSnapshot::idle(SessionToken::new(2), 7, None);
        let screen = render_start(&snapshot);
        assert!(screen.contains("High Score: 7"));
        assert!(!screen.contains("Last run"));
    }

    #[test]
    fn start_screen_counts_missed_answers() {
        let snapshot = QuizSnapshot::idle(SessionToken::new(3), 4, Some(summary(5, 3)));
        let screen = render_start(&snapshot);
        assert!(screen.contains("Last run: 3/5 (2 missed)"));
        assert!(!screen.contains("perfect"));
    }

    #[test]
    fn start_screen_celebrates_perfect_run() {
        let snapshot = QuizSnapshot::idle(SessionToken::new(3), 5, Some(summary(5, 5)));
        let screen = render_start(&snapshot);
        assert!(screen.contains("Last run: 5/5 (perfect!)"));
        assert!(!screen.contains("missed"));
    }

    #[test]
    fn graded_question_marks_both_options() {
        let screen = render_question(&grading_snapshot());
        assert!(screen.contains("Question 1/2"));
        assert!(screen.contains("✘ 1. French"));
        assert!(screen.contains("✔ 2. Sicilian"));
    }

    #[test]
    fn exhausted_session_says_so() {
        let snapshot = QuizSnapshot {
            phase: SessionPhase::Exhausted,
            started: true,
            ..QuizSnapshot::default()
        };
        assert_eq!(render_question(&snapshot), "No questions available.\n");
    }

    #[test]
    fn choices_are_one_based() {
        assert_eq!(parse_choice(" 1 "), Some(0));
        assert_eq!(parse_choice("3"), Some(2));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("two"), None);
    }
}
