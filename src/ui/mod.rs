pub mod app;
mod audio;
mod board;
mod dialogs;
mod hud;
mod results;
mod scene;
mod state;
