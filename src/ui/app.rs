use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;

use super::audio::{Cue, SoundBank};
use super::board::CONTENT_MARGIN;
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{set_header_game, start_countdown, stop_timer, update_subtitle};
use super::results::{self, build_results_view, OutcomeRecord};
use super::scene::{self, rebuild_board};
use super::state::{CardStatus, ClickOutcome, Difficulty, GameState, Outcome};

const APP_ID: &str = "io.github.flipdown.Flipdown";
const LOG_DOMAIN: &str = "flipdown";

/// Mismatched cards stay face-up this long before flipping back.
const MISMATCH_SETTLE_MS: u64 = 800;
/// Beat between the final match rendering and the results handoff.
const WIN_HANDOFF_DELAY_MS: u64 = 500;

const APP_CSS: &str = "
.flipdown-card { border-radius: 12px; }
.flipdown-card.active { background: alpha(@accent_bg_color, 0.35); }
.flipdown-card.matched { opacity: 0.55; }
.flipdown-card-container { border-radius: 18px; padding: 12px; }
.game-title-main { font-weight: bold; }
";

fn play_cue(st: &GameState, cue: Cue) {
    if let Some(sounds) = &st.sounds {
        sounds.play(cue);
    }
}

fn refresh_card(st: &GameState, index: usize) {
    let Some(button) = st.grid_buttons.get(index) else {
        return;
    };
    button.remove_css_class("active");
    button.remove_css_class("matched");
    if let Some(card) = st.cards.get(index) {
        match card.status {
            CardStatus::Matched => button.add_css_class("matched"),
            CardStatus::Revealed => button.add_css_class("active"),
            CardStatus::Hidden => (),
        }
    }
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

/// Entry point for every card click. The state machine decides what the
/// click means; this function renders the decision and schedules the
/// delayed resolution callbacks, each guarded by the session id.
pub fn handle_card_click(state: &Rc<RefCell<GameState>>, index: usize) {
    let (outcome, game_id) = {
        let mut st = state.borrow_mut();
        let outcome = st.select(index);
        (outcome, st.game_id)
    };

    match outcome {
        ClickOutcome::Ignored => {}
        ClickOutcome::FirstRevealed => {
            let st = state.borrow();
            play_cue(&st, Cue::Flip);
            refresh_card(&st, index);
        }
        ClickOutcome::MatchFound { first, second, won } => {
            {
                let mut st = state.borrow_mut();
                play_cue(&st, Cue::Flip);
                play_cue(&st, Cue::Match);
                refresh_card(&st, first);
                refresh_card(&st, second);
                update_subtitle(&st);
                if won {
                    stop_timer(&mut st);
                }
            }
            if won {
                let state_end = state.clone();
                glib::timeout_add_local(
                    std::time::Duration::from_millis(WIN_HANDOFF_DELAY_MS),
                    move || {
                        if state_end.borrow().game_id == game_id {
                            end_game(&state_end, Outcome::Win);
                        }
                        glib::ControlFlow::Break
                    },
                );
            }
        }
        ClickOutcome::Mismatch { first, second } => {
            {
                let st = state.borrow();
                play_cue(&st, Cue::Flip);
                refresh_card(&st, first);
                refresh_card(&st, second);
                update_subtitle(&st);
            }
            let state_settle = state.clone();
            glib::timeout_add_local(
                std::time::Duration::from_millis(MISMATCH_SETTLE_MS),
                move || {
                    let mut st = state_settle.borrow_mut();
                    if st.game_id != game_id {
                        return glib::ControlFlow::Break;
                    }
                    st.settle_mismatch();
                    refresh_card(&st, first);
                    refresh_card(&st, second);
                    glib::ControlFlow::Break
                },
            );
        }
    }
}

/// Terminal, one-shot handoff: stop the clock, encode the outcome record
/// and route to the results page.
pub(super) fn end_game(state: &Rc<RefCell<GameState>>, outcome: Outcome) {
    let query = {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        play_cue(
            &st,
            match outcome {
                Outcome::Win => Cue::Win,
                Outcome::Lose => Cue::Lose,
            },
        );
        results::encode_query(OutcomeRecord {
            outcome,
            elapsed_secs: st.elapsed_secs(),
            moves: st.moves,
        })
    };
    scene::show_results(state, &query);
}

/// Initializes a session from scratch for the current difficulty:
/// fresh shuffled board, zeroed counters, full time budget, new timer.
pub(super) fn start_session(state: &Rc<RefCell<GameState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        st.reset_game();
    }
    rebuild_board(state);
    set_header_game(state);
    scene::show_game(state);
    start_countdown(state);
}

pub(super) fn restart_game(state: &Rc<RefCell<GameState>>) {
    start_session(state);
}

pub fn run() {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    let requested = Rc::new(Cell::new(Difficulty::Easy));

    app.add_main_option(
        "difficulty",
        glib::Char::from(b'd'),
        glib::OptionFlags::NONE,
        glib::OptionArg::String,
        "Difficulty preset: easy, medium or hard (default easy)",
        Some("LEVEL"),
    );
    app.connect_handle_local_options({
        let requested = requested.clone();
        move |_, options| {
            if let Ok(Some(value)) = options.lookup::<String>("difficulty") {
                match Difficulty::parse(&value) {
                    Some(difficulty) => requested.set(difficulty),
                    None => glib::g_warning!(
                        LOG_DOMAIN,
                        "unrecognized difficulty {:?}, defaulting to easy",
                        value
                    ),
                }
            }
            std::ops::ControlFlow::Continue(())
        }
    });

    app.connect_activate({
        let requested = requested.clone();
        move |app| {
            load_css();

            let state = Rc::new(RefCell::new(GameState::new(requested.get())));
            state.borrow_mut().sounds = Some(SoundBank::new());

            let instructions_action = SimpleAction::new("instructions", None);
            instructions_action.connect_activate({
                let app = app.clone();
                move |_, _| {
                    show_instructions_dialog(&app);
                }
            });
            app.add_action(&instructions_action);

            let about_action = SimpleAction::new("about", None);
            about_action.connect_activate({
                let app = app.clone();
                move |_, _| {
                    show_about_dialog(&app);
                }
            });
            app.add_action(&about_action);

            let quit_action = SimpleAction::new("quit", None);
            quit_action.connect_activate({
                let app = app.clone();
                move |_, _| app.quit()
            });
            app.add_action(&quit_action);

            let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
            title_game_box.set_valign(gtk::Align::Center);
            title_game_box.set_halign(gtk::Align::Center);
            title_game_box.set_hexpand(true);

            let title_game_main = gtk::Label::builder()
                .label("Flipdown")
                .halign(gtk::Align::Center)
                .css_classes(vec!["game-title-main"])
                .build();

            let title_game_subtitle = gtk::Label::builder()
                .label("")
                .halign(gtk::Align::Center)
                .css_classes(vec!["game-title-subtitle", "caption"])
                .build();

            title_game_box.append(&title_game_main);
            title_game_box.append(&title_game_subtitle);

            let title_results_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
            title_results_box.set_valign(gtk::Align::Center);
            title_results_box.set_halign(gtk::Align::Center);

            let title_results_main = gtk::Label::new(Some("Flipdown"));
            title_results_main.add_css_class("game-title-main");

            let title_results_sub = gtk::Label::new(Some("Results"));
            title_results_sub.add_css_class("game-title-subtitle");
            title_results_sub.add_css_class("caption");

            title_results_box.append(&title_results_main);
            title_results_box.append(&title_results_sub);

            let header = adw::HeaderBar::builder()
                .title_widget(&title_game_box)
                .build();
            header.add_css_class("flat");

            let menu_model = gio::Menu::new();
            menu_model.append(Some("Instructions"), Some("app.instructions"));
            menu_model.append(Some("About Flipdown"), Some("app.about"));
            menu_model.append(Some("Quit"), Some("app.quit"));
            let menu_button = gtk::MenuButton::builder()
                .icon_name("open-menu-symbolic")
                .menu_model(&menu_model)
                .build();

            let restart_button = gtk::Button::builder()
                .icon_name("view-refresh-symbolic")
                .build();
            restart_button.set_tooltip_text(Some("New Game"));
            restart_button.connect_clicked({
                let state = state.clone();
                move |_| {
                    restart_game(&state);
                }
            });
            let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
            end_box.append(&restart_button);
            end_box.append(&menu_button);
            header.pack_end(&end_box);

            let view_stack = gtk::Stack::new();
            view_stack.set_hexpand(true);
            view_stack.set_vexpand(true);
            view_stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
            view_stack.set_transition_duration(300);

            let game_view = build_game_view(&state);
            view_stack.add_named(&game_view, Some("game"));

            let results_view = build_results_view(&state);
            view_stack.add_named(&results_view, Some("results"));

            view_stack.set_visible_child_name("game");

            let toolbar = adw::ToolbarView::new();
            toolbar.set_hexpand(true);
            toolbar.set_vexpand(true);
            toolbar.add_top_bar(&header);
            toolbar.set_content(Some(&view_stack));

            let win = adw::ApplicationWindow::builder()
                .application(app)
                .title("Flipdown")
                .default_width(860)
                .default_height(680)
                .content(&toolbar)
                .build();
            win.set_size_request(360, 560);

            let style_manager = adw::StyleManager::default();
            if style_manager.is_dark() {
                win.add_css_class("theme-dark");
            } else {
                win.add_css_class("theme-light");
            }
            style_manager.connect_notify_local(Some("dark"), {
                let win = win.clone();
                move |manager, _| {
                    if manager.is_dark() {
                        win.remove_css_class("theme-light");
                        win.add_css_class("theme-dark");
                    } else {
                        win.remove_css_class("theme-dark");
                        win.add_css_class("theme-light");
                    }
                }
            });

            {
                let mut st = state.borrow_mut();
                st.view_stack = Some(view_stack.clone());
                st.header = Some(header.clone());
                st.restart_button = Some(restart_button);
                st.title_game = Some(title_game_box.upcast::<gtk::Widget>());
                st.title_game_subtitle = Some(title_game_subtitle);
                st.title_results = Some(title_results_box.upcast::<gtk::Widget>());
            }

            win.present();
            start_session(&state);
        }
    });

    app.run();
}

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(APP_CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_game_view(state: &Rc<RefCell<GameState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
    board_frame.set_halign(gtk::Align::Fill);
    board_frame.set_valign(gtk::Align::Fill);
    board_frame.set_hexpand(true);
    board_frame.set_vexpand(true);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("flipdown-card-container");

    board_frame.set_child(Some(&board_card));
    content.append(&board_frame);
    root.append(&content);

    // The card grid itself is dealt per session by `rebuild_board`.
    state.borrow_mut().board_container = Some(board_card);

    root
}
