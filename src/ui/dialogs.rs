use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Flip cards two at a time to find matching pairs.\n\
Matched pairs stay revealed; mismatches flip back.\n\
Clear the whole board before the countdown runs out.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Flipdown")
        .application_icon("io.github.flipdown.Flipdown")
        .developer_name("The Flipdown contributors")
        .developers(vec!["The Flipdown contributors"])
        .version("1.0.0")
        .comments("A memory-matching game against the clock.")
        .build();
    dialog.add_legal_section(
        "Flipdown",
        Some("© 2026 The Flipdown contributors"),
        gtk::License::MitX11,
        None,
    );
    dialog.present(app.active_window().as_ref());
    dialog
}
