use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;

use super::app::end_game;
use super::state::{GameState, Outcome};

pub(super) fn set_header_game(state: &Rc<RefCell<GameState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_subtitle(&st);
        header.set_title_widget(Some(title_box));
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(true);
    }
}

pub(super) fn set_header_results(state: &Rc<RefCell<GameState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_results) {
        header.set_title_widget(Some(title));
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(true);
    }
}

pub(super) fn update_subtitle(st: &GameState) {
    if let Some(subtitle) = &st.title_game_subtitle {
        subtitle.set_text(&format!(
            "{} | ⏱ {}s | 🎯 {} moves",
            st.difficulty.name(),
            st.time_left,
            st.moves
        ));
    }
}

pub(super) fn stop_timer(st: &mut GameState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

/// Installs the repeating one-second countdown for the current session.
/// Any previous tick source is removed first, and the closure carries the
/// session's `game_id` so a source that somehow survives a reset breaks
/// out instead of ticking a superseded board.
pub(super) fn start_countdown(state: &Rc<RefCell<GameState>>) {
    let game_id = {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        update_subtitle(&st);
        st.game_id
    };

    let state_clone = state.clone();
    let handle = glib::timeout_add_local(std::time::Duration::from_secs(1), move || {
        let expired = {
            let mut st = state_clone.borrow_mut();
            if st.game_id != game_id {
                return glib::ControlFlow::Break;
            }
            if st.ended() {
                st.timer_handle = None;
                return glib::ControlFlow::Break;
            }
            let expired = st.tick();
            update_subtitle(&st);
            if expired {
                st.timer_handle = None;
            }
            expired
        };
        if expired {
            end_game(&state_clone, Outcome::Lose);
            return glib::ControlFlow::Break;
        }
        glib::ControlFlow::Continue
    });
    state.borrow_mut().timer_handle = Some(handle);
}
