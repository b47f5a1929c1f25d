use std::path::PathBuf;

use gtk4 as gtk;
use gtk4::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Flip,
    Match,
    Win,
    Lose,
}

impl Cue {
    fn asset_name(self) -> &'static str {
        match self {
            Cue::Flip => "flip",
            Cue::Match => "match",
            Cue::Win => "win",
            Cue::Lose => "lose",
        }
    }
}

/// Short fire-and-forget sound cues. A missing asset or a dead audio
/// backend leaves the slot empty and `play` becomes a silent no-op;
/// playback never reports back into game logic.
pub struct SoundBank {
    flip: Option<gtk::MediaFile>,
    matched: Option<gtk::MediaFile>,
    win: Option<gtk::MediaFile>,
    lose: Option<gtk::MediaFile>,
}

fn sound_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        dirs.push(parent.join("sounds"));
    }
    dirs.push(PathBuf::from("sounds"));
    dirs
}

fn load_cue(cue: Cue) -> Option<gtk::MediaFile> {
    for dir in sound_dirs() {
        for ext in ["ogg", "mp3"] {
            let path = dir.join(format!("{}.{}", cue.asset_name(), ext));
            if path.is_file() {
                return Some(gtk::MediaFile::for_filename(&path));
            }
        }
    }
    None
}

impl SoundBank {
    pub fn new() -> Self {
        SoundBank {
            flip: load_cue(Cue::Flip),
            matched: load_cue(Cue::Match),
            win: load_cue(Cue::Win),
            lose: load_cue(Cue::Lose),
        }
    }

    pub fn play(&self, cue: Cue) {
        let media = match cue {
            Cue::Flip => &self.flip,
            Cue::Match => &self.matched,
            Cue::Win => &self.win,
            Cue::Lose => &self.lose,
        };
        if let Some(media) = media {
            media.seek(0);
            media.play();
        }
    }
}
