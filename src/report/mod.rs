pub mod table;
pub mod json;

use crate::snapshot::Snapshot;
use crate::store::diff::Event;

pub fn print(snapshot: &Snapshot, json_output: bool, list_solved: bool) {
    if json_output {
        println!("{}", json::render(snapshot));
    } else {
        print!("{}", table::render(snapshot, chrono::Utc::now()));
        if list_solved {
            print!("{}", table::render_solved(snapshot));
        }
    }
}

pub fn render_events(events: &[Event]) -> String {
    let mut output = String::new();
    for event in events {
        let marker = match event {
            Event::RankChanged { .. } => "[rank]",
            Event::ProblemSolved(_) => "[solved]",
            Event::ProblemAdded(_) => "[new]",
        };
        output.push_str(&format!("  {marker:<9} {event}\n"));
    }

    // rank is always reported, anything beyond it is a real change
    if events.len() <= 1 {
        output.push_str("  no problem changes\n");
    }
    output
}
