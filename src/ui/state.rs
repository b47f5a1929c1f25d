use gtk4 as gtk;
use libadwaita as adw;

use super::audio::SoundBank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub value: String,
    pub status: CardStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

const EASY_SYMBOLS: [&str; 8] = ["🍕", "🎮", "🎧", "🚀", "🐱", "🎲", "🌈", "⚡"];
const HARD_SYMBOLS: [&str; 18] = [
    "🍕", "🎮", "🎧", "🚀", "🐱", "🎲", "🌈", "⚡", "🐶", "🍔", "🦄", "🪐", "🎵", "👾", "🍩",
    "🧃", "📱", "🧸",
];

impl Difficulty {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Medium shares the easy vocabulary; only its time budget and grid
    /// width differ.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy | Difficulty::Medium => &EASY_SYMBOLS,
            Difficulty::Hard => &HARD_SYMBOLS,
        }
    }

    /// Starting countdown budget in seconds.
    pub fn time_budget(self) -> u32 {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub fn grid_cols(self) -> i32 {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 5,
            Difficulty::Hard => 6,
        }
    }

    pub fn pair_count(self) -> usize {
        self.vocabulary().len()
    }
}

/// Two-click selection machine. `Resolving` is the board lock: while a
/// mismatch settle is pending no new selection can exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    One(usize),
    Resolving {
        first: usize,
        second: usize,
    },
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub fn code(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
        }
    }
}

/// What the controller should do after a card click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    FirstRevealed,
    MatchFound { first: usize, second: usize, won: bool },
    Mismatch { first: usize, second: usize },
}

pub struct GameState {
    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub restart_button: Option<gtk::Button>,
    pub title_game: Option<gtk::Widget>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub title_results: Option<gtk::Widget>,
    pub results_heading_label: Option<gtk::Label>,
    pub results_stats_label: Option<gtk::Label>,
    pub board_container: Option<gtk::Box>,
    pub grid_buttons: Vec<gtk::Button>,
    pub sounds: Option<SoundBank>,

    // Game session
    pub cards: Vec<Card>,
    pub selection: Selection,
    pub moves: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub time_left: u32,
    pub difficulty: Difficulty,
    pub game_id: u64,
    pub timer_handle: Option<glib::SourceId>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            view_stack: None,
            header: None,
            restart_button: None,
            title_game: None,
            title_game_subtitle: None,
            title_results: None,
            results_heading_label: None,
            results_stats_label: None,
            board_container: None,
            grid_buttons: Vec::new(),
            sounds: None,
            cards: Vec::new(),
            selection: Selection::Idle,
            moves: 0,
            matched_pairs: 0,
            total_pairs: 0,
            time_left: 0,
            difficulty: Difficulty::Easy,
            game_id: 0,
            timer_handle: None,
        }
    }
}

impl GameState {
    pub fn new(difficulty: Difficulty) -> Self {
        let mut st = Self::default();
        st.difficulty = difficulty;
        st.reset_game();
        st
    }

    pub fn grid_cols(&self) -> i32 {
        self.difficulty.grid_cols()
    }

    pub fn grid_rows(&self) -> i32 {
        let cols = self.grid_cols().max(1);
        (self.cards.len() as i32 + cols - 1) / cols
    }

    /// Discards the previous board and deals a freshly shuffled one for
    /// the current difficulty. Bumping `game_id` invalidates every
    /// callback still scheduled against the superseded session.
    pub fn reset_game(&mut self) {
        use rand::seq::SliceRandom;

        self.game_id = self.game_id.wrapping_add(1);
        self.cards.clear();
        self.selection = Selection::Idle;
        self.moves = 0;
        self.matched_pairs = 0;
        self.total_pairs = self.difficulty.pair_count();
        self.time_left = self.difficulty.time_budget();

        let mut values: Vec<&str> = Vec::with_capacity(self.total_pairs * 2);
        for symbol in self.difficulty.vocabulary() {
            values.push(symbol);
            values.push(symbol);
        }
        let mut rng = rand::rng();
        values.shuffle(&mut rng);

        for value in values {
            self.cards.push(Card {
                value: value.to_string(),
                status: CardStatus::Hidden,
            });
        }
    }

    /// Applies one card click to the selection machine. Clicks while a
    /// mismatch settles, after the game ended, on revealed or matched
    /// cards, or past the board are all inert.
    pub fn select(&mut self, index: usize) -> ClickOutcome {
        if matches!(self.selection, Selection::Resolving { .. } | Selection::Ended) {
            return ClickOutcome::Ignored;
        }
        let Some(card) = self.cards.get(index) else {
            return ClickOutcome::Ignored;
        };
        if card.status != CardStatus::Hidden {
            return ClickOutcome::Ignored;
        }

        self.cards[index].status = CardStatus::Revealed;

        let Selection::One(first) = self.selection else {
            self.selection = Selection::One(index);
            return ClickOutcome::FirstRevealed;
        };

        self.moves += 1;
        if self.cards[first].value == self.cards[index].value {
            self.cards[first].status = CardStatus::Matched;
            self.cards[index].status = CardStatus::Matched;
            self.matched_pairs += 1;
            let won = self.matched_pairs == self.total_pairs;
            self.selection = if won { Selection::Ended } else { Selection::Idle };
            ClickOutcome::MatchFound {
                first,
                second: index,
                won,
            }
        } else {
            self.selection = Selection::Resolving {
                first,
                second: index,
            };
            ClickOutcome::Mismatch {
                first,
                second: index,
            }
        }
    }

    /// Re-hides a mismatched pair and unlocks the board. Inert unless a
    /// mismatch is actually pending, so a stale callback cannot disturb
    /// a fresh session.
    pub fn settle_mismatch(&mut self) {
        if let Selection::Resolving { first, second } = self.selection {
            self.cards[first].status = CardStatus::Hidden;
            self.cards[second].status = CardStatus::Hidden;
            self.selection = Selection::Idle;
        }
    }

    /// One countdown second. Returns true when this tick exhausted the
    /// budget; the session then moves to `Ended` and later ticks are
    /// inert.
    pub fn tick(&mut self) -> bool {
        if self.selection == Selection::Ended {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.selection = Selection::Ended;
            true
        } else {
            false
        }
    }

    pub fn ended(&self) -> bool {
        self.selection == Selection::Ended
    }

    /// Seconds spent in this session, against the budget of the
    /// difficulty actually played.
    pub fn elapsed_secs(&self) -> u32 {
        self.difficulty.time_budget().saturating_sub(self.time_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn value_counts(cards: &[Card]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for card in cards {
            *counts.entry(card.value.as_str()).or_insert(0) += 1;
        }
        counts
    }

    fn positions_of_pair(st: &GameState) -> (usize, usize) {
        for i in 0..st.cards.len() {
            for j in i + 1..st.cards.len() {
                if st.cards[i].status == CardStatus::Hidden
                    && st.cards[j].status == CardStatus::Hidden
                    && st.cards[i].value == st.cards[j].value
                {
                    return (i, j);
                }
            }
        }
        unreachable!("board without a hidden pair");
    }

    fn positions_of_mismatch(st: &GameState) -> (usize, usize) {
        for i in 0..st.cards.len() {
            for j in i + 1..st.cards.len() {
                if st.cards[i].status == CardStatus::Hidden
                    && st.cards[j].status == CardStatus::Hidden
                    && st.cards[i].value != st.cards[j].value
                {
                    return (i, j);
                }
            }
        }
        unreachable!("board without a hidden mismatch");
    }

    fn win_session(st: &mut GameState) {
        while st.matched_pairs < st.total_pairs {
            let (i, j) = positions_of_pair(st);
            assert_eq!(st.select(i), ClickOutcome::FirstRevealed);
            assert!(matches!(st.select(j), ClickOutcome::MatchFound { .. }));
        }
    }

    #[test]
    fn board_has_every_symbol_exactly_twice() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let st = GameState::new(difficulty);
            assert_eq!(st.cards.len(), difficulty.pair_count() * 2);
            assert_eq!(st.cards.len() % 2, 0);
            let counts = value_counts(&st.cards);
            assert_eq!(counts.len(), difficulty.pair_count());
            for symbol in difficulty.vocabulary() {
                assert_eq!(counts.get(symbol), Some(&2));
            }
        }
    }

    #[test]
    fn shuffle_is_a_permutation_of_the_pair_multiset() {
        let st = GameState::new(Difficulty::Hard);
        let mut sorted: Vec<&str> = st.cards.iter().map(|c| c.value.as_str()).collect();
        sorted.sort_unstable();
        let mut expected: Vec<&str> = HARD_SYMBOLS.iter().flat_map(|s| [*s, *s]).collect();
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn medium_shares_the_easy_vocabulary() {
        assert_eq!(Difficulty::Medium.vocabulary(), Difficulty::Easy.vocabulary());
        assert_eq!(Difficulty::Medium.time_budget(), 60);
        assert_eq!(Difficulty::Medium.grid_cols(), 5);
    }

    #[test]
    fn parse_difficulty_codes() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" Medium "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("nightmare"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn reset_zeroes_counters_and_restores_the_budget() {
        let mut st = GameState::new(Difficulty::Easy);
        let (i, j) = positions_of_pair(&st);
        st.select(i);
        st.select(j);
        let (a, b) = positions_of_mismatch(&st);
        st.select(a);
        st.select(b);
        st.settle_mismatch();
        st.time_left = 12;
        assert_eq!(st.moves, 2);
        assert_eq!(st.matched_pairs, 1);

        let old_id = st.game_id;
        st.reset_game();
        assert_eq!(st.moves, 0);
        assert_eq!(st.matched_pairs, 0);
        assert_eq!(st.time_left, 40);
        assert_eq!(st.selection, Selection::Idle);
        assert_eq!(st.cards.len(), 16);
        assert!(st.cards.iter().all(|c| c.status == CardStatus::Hidden));
        assert_ne!(st.game_id, old_id);
    }

    #[test]
    fn matching_pair_increments_matched_count_once() {
        let mut st = GameState::new(Difficulty::Easy);
        let (i, j) = positions_of_pair(&st);
        assert_eq!(st.select(i), ClickOutcome::FirstRevealed);
        let outcome = st.select(j);
        assert_eq!(
            outcome,
            ClickOutcome::MatchFound {
                first: i,
                second: j,
                won: false
            }
        );
        assert_eq!(st.matched_pairs, 1);
        assert_eq!(st.moves, 1);
        assert_eq!(st.cards[i].status, CardStatus::Matched);
        assert_eq!(st.cards[j].status, CardStatus::Matched);
        assert_eq!(st.selection, Selection::Idle);
    }

    #[test]
    fn mismatch_counts_a_move_and_rehides_after_settling() {
        let mut st = GameState::new(Difficulty::Easy);
        let (i, j) = positions_of_mismatch(&st);
        st.select(i);
        let outcome = st.select(j);
        assert_eq!(outcome, ClickOutcome::Mismatch { first: i, second: j });
        assert_eq!(st.moves, 1);
        assert_eq!(st.matched_pairs, 0);

        // Board is locked while the settle is pending.
        let other = (0..st.cards.len())
            .find(|&k| k != i && k != j && st.cards[k].status == CardStatus::Hidden)
            .unwrap();
        assert_eq!(st.select(other), ClickOutcome::Ignored);
        assert_eq!(st.moves, 1);

        st.settle_mismatch();
        assert_eq!(st.cards[i].status, CardStatus::Hidden);
        assert_eq!(st.cards[j].status, CardStatus::Hidden);
        assert_eq!(st.selection, Selection::Idle);
    }

    #[test]
    fn reclicking_the_sole_selection_is_inert() {
        let mut st = GameState::new(Difficulty::Easy);
        st.select(3);
        assert_eq!(st.select(3), ClickOutcome::Ignored);
        assert_eq!(st.moves, 0);
        assert_eq!(st.selection, Selection::One(3));
    }

    #[test]
    fn matched_cards_and_out_of_range_clicks_are_inert() {
        let mut st = GameState::new(Difficulty::Easy);
        let (i, j) = positions_of_pair(&st);
        st.select(i);
        st.select(j);
        assert_eq!(st.select(i), ClickOutcome::Ignored);
        assert_eq!(st.select(st.cards.len()), ClickOutcome::Ignored);
        assert_eq!(st.moves, 1);
        assert_eq!(st.matched_pairs, 1);
    }

    #[test]
    fn completing_the_board_wins_before_any_further_tick() {
        let mut st = GameState::new(Difficulty::Easy);
        st.time_left = 1;
        win_session(&mut st);
        assert!(st.ended());
        // A tick still queued from the superseded countdown cannot turn
        // the win into a loss.
        assert!(!st.tick());
        assert_eq!(st.matched_pairs, st.total_pairs);
    }

    #[test]
    fn final_match_reports_the_win() {
        let mut st = GameState::new(Difficulty::Easy);
        win_session(&mut st);
        assert_eq!(st.matched_pairs, 8);
        assert_eq!(st.moves, 8);
        assert_eq!(st.selection, Selection::Ended);
    }

    #[test]
    fn expiry_with_pairs_outstanding_ends_the_game() {
        let mut st = GameState::new(Difficulty::Medium);
        for _ in 0..3 {
            let (i, j) = positions_of_pair(&st);
            st.select(i);
            st.select(j);
        }
        st.time_left = 2;
        assert!(!st.tick());
        assert!(st.tick());
        assert!(st.ended());
        assert!(st.matched_pairs < st.total_pairs);
        assert_eq!(st.elapsed_secs(), 60);
    }

    #[test]
    fn clicks_after_the_end_are_inert() {
        let mut st = GameState::new(Difficulty::Easy);
        st.time_left = 1;
        st.tick();
        assert!(st.ended());
        assert_eq!(st.select(0), ClickOutcome::Ignored);
        assert_eq!(st.moves, 0);
    }

    #[test]
    fn elapsed_time_uses_the_played_difficulty_budget() {
        let mut st = GameState::new(Difficulty::Easy);
        st.time_left = 25;
        assert_eq!(st.elapsed_secs(), 15);

        let mut st = GameState::new(Difficulty::Hard);
        st.time_left = 90;
        assert_eq!(st.elapsed_secs(), 30);
    }

    #[test]
    fn grid_shape_covers_the_board() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let st = GameState::new(difficulty);
            let cells = st.grid_cols() * st.grid_rows();
            assert!(cells as usize >= st.cards.len());
            assert!(((cells - st.grid_cols()) as usize) < st.cards.len());
        }
    }
}
