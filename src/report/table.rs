//! Terminal table rendering for a snapshot.
//!
//! Shows owner, ranking, snapshot age and a per-difficulty
//! solved/total breakdown with completion percentage.

use chrono::{DateTime, Utc};

use crate::snapshot::{Count, Snapshot};

pub fn render(snapshot: &Snapshot, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    let updated = snapshot.updated_at.format("%Y-%m-%d %H:%M:%S");
    let age = humantime::format_duration(std::time::Duration::from_secs(snapshot.age(now).as_secs()));

    output.push_str(&format!("\n{}\n", snapshot.owner));
    output.push_str(&"-".repeat(40));
    output.push('\n');
    output.push_str(&format!("  {:12} {:>25}\n", "ranking", snapshot.ranking));
    output.push_str(&format!("  {:12} {:>25}\n", "updated", updated.to_string()));
    output.push_str(&format!("  {:12} {:>25}\n", "age", age.to_string()));
    output.push('\n');

    let rows = [
        ("easy", snapshot.record.easy),
        ("medium", snapshot.record.medium),
        ("hard", snapshot.record.hard),
    ];
    for (label, count) in rows {
        output.push_str(&row(label, count));
    }
    output.push_str(&"-".repeat(40));
    output.push('\n');
    output.push_str(&row("total", snapshot.record.total));

    let locked = snapshot.problems.iter().filter(|p| !p.is_available).count();
    if locked > 0 {
        output.push_str(&format!("\n  {locked} problems not yet available\n"));
    }

    output
}

pub fn render_solved(snapshot: &Snapshot) -> String {
    let mut output = String::from("\nsolved:\n");
    for problem in snapshot.solved() {
        output.push_str(&format!(
            "  {:>5}  {:30} {:>6}\n",
            problem.id,
            truncate(&problem.title, 30),
            problem.difficulty.as_str()
        ));
    }
    output
}

fn row(label: &str, count: Count) -> String {
    format!("  {:12} {:>6} / {:<6} {:>9}\n", label, count.solved, count.total, percent(count))
}

fn percent(count: Count) -> String {
    if count.total == 0 {
        return String::from("-");
    }
    format!("{:.1}%", f64::from(count.solved) * 100.0 / f64::from(count.total))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}
