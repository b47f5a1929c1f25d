use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::app::restart_game;
use super::state::{GameState, Outcome};

/// The record handed to the results page at end of game. The game side
/// only ever produces the encoded form; the results side parses it back,
/// the two halves sharing nothing but the query layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub outcome: Outcome,
    pub elapsed_secs: u32,
    pub moves: u32,
}

pub fn encode_query(record: OutcomeRecord) -> String {
    format!(
        "result={}&time={}&moves={}",
        record.outcome.code(),
        record.elapsed_secs,
        record.moves
    )
}

/// Tolerant parse: unknown keys are skipped, malformed fields fall back
/// to a lost game with zero time and moves. The results page never
/// fails, it just displays what it could read.
pub fn parse_query(query: &str) -> OutcomeRecord {
    let mut record = OutcomeRecord {
        outcome: Outcome::Lose,
        elapsed_secs: 0,
        moves: 0,
    };
    for field in query.split('&') {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key {
            "result" => {
                record.outcome = if value == "win" {
                    Outcome::Win
                } else {
                    Outcome::Lose
                };
            }
            "time" => record.elapsed_secs = value.parse().unwrap_or(0),
            "moves" => record.moves = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    record
}

pub(super) fn apply_record(st: &GameState, query: &str) {
    let record = parse_query(query);
    if let Some(heading) = &st.results_heading_label {
        heading.set_text(match record.outcome {
            Outcome::Win => "You cleared the board!",
            Outcome::Lose => "Time ran out",
        });
    }
    if let Some(stats) = &st.results_stats_label {
        stats.set_text(&format!(
            "Time: {}s\nMoves: {}",
            record.elapsed_secs, record.moves
        ));
    }
}

pub(super) fn build_results_view(state: &Rc<RefCell<GameState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("results-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let card = gtk::Box::new(gtk::Orientation::Vertical, 14);
    card.set_halign(gtk::Align::Center);
    card.set_valign(gtk::Align::Center);
    card.add_css_class("results-card");
    card.set_margin_top(28);
    card.set_margin_bottom(28);
    card.set_margin_start(28);
    card.set_margin_end(28);

    let heading = gtk::Label::new(Some(""));
    heading.add_css_class("results-heading");
    heading.add_css_class("title-1");

    let stats = gtk::Label::new(None);
    stats.add_css_class("results-stats");
    stats.add_css_class("body");
    stats.set_justify(gtk::Justification::Center);

    let again_btn = gtk::Button::with_label("Play Again");
    again_btn.add_css_class("suggested-action");
    again_btn.set_halign(gtk::Align::Center);
    again_btn.connect_clicked({
        let state = state.clone();
        move |_| {
            restart_game(&state);
        }
    });

    card.append(&heading);
    card.append(&stats);
    card.append(&again_btn);
    center.set_center_widget(Some(&card));
    root.append(&center);

    {
        let mut st = state.borrow_mut();
        st.results_heading_label = Some(heading);
        st.results_stats_label = Some(stats);
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_the_win_scenario() {
        // Easy, 8 pairs matched in 10 moves with 25 s left on a 40 s budget.
        let record = OutcomeRecord {
            outcome: Outcome::Win,
            elapsed_secs: 15,
            moves: 10,
        };
        assert_eq!(encode_query(record), "result=win&time=15&moves=10");
    }

    #[test]
    fn parses_what_it_encoded() {
        let record = OutcomeRecord {
            outcome: Outcome::Lose,
            elapsed_secs: 60,
            moves: 23,
        };
        assert_eq!(parse_query(&encode_query(record)), record);
    }

    #[test]
    fn parse_skips_unknown_keys_and_junk() {
        let record = parse_query("foo=bar&result=win&nonsense&time=7&moves=3&extra=1");
        assert_eq!(
            record,
            OutcomeRecord {
                outcome: Outcome::Win,
                elapsed_secs: 7,
                moves: 3,
            }
        );
    }

    #[test]
    fn parse_defaults_on_malformed_fields() {
        let record = parse_query("result=victory&time=soon&moves=-4");
        assert_eq!(record.outcome, Outcome::Lose);
        assert_eq!(record.elapsed_secs, 0);
        assert_eq!(record.moves, 0);

        let record = parse_query("");
        assert_eq!(record.outcome, Outcome::Lose);
        assert_eq!(record.elapsed_secs, 0);
        assert_eq!(record.moves, 0);
    }
}
