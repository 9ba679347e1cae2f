use std::time::{Duration, Instant};

use crate::models::{find_world, ClassBucket, Player, WORLDS};
use crate::roster::parse_level;
use crate::session::{Notice, Session};

/// How long a toast stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    PickingWorld,
    EditingLevel,
}

pub struct App {
    pub input_mode: InputMode,
    pub world_index: usize,
    pub level_input: String,
    pub selected_column: usize,
    pub selected_row: usize,
    pub session: Session,
    pub notice: Option<(Notice, Instant)>,
    pub error_message: Option<String>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Normal,
            world_index: 0,
            level_input: String::new(),
            selected_column: 0,
            selected_row: 0,
            session: Session::default(),
            notice: None,
            error_message: None,
            should_quit: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the latest session snapshot and keeps the cursor inside it.
    pub fn sync(&mut self, session: Session) {
        if self.input_mode != InputMode::PickingWorld {
            if let Some(index) = session
                .selected_world
                .as_deref()
                .and_then(find_world)
                .and_then(|w| WORLDS.iter().position(|x| *x == w))
            {
                self.world_index = index;
            }
        }
        self.session = session;
        let len = self.selected_column_players().len();
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    pub fn selected_class(&self) -> ClassBucket {
        ClassBucket::DISPLAY_ORDER[self.selected_column % ClassBucket::DISPLAY_ORDER.len()]
    }

    pub fn selected_column_players(&self) -> &[Player] {
        self.session
            .view
            .as_ref()
            .map(|v| v.bucket(self.selected_class()))
            .unwrap_or(&[])
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.selected_column_players().get(self.selected_row)
    }

    pub fn highlighted_world(&self) -> &'static str {
        WORLDS[self.world_index.min(WORLDS.len() - 1)]
    }

    pub fn next_world(&mut self) {
        self.world_index = (self.world_index + 1) % WORLDS.len();
    }

    pub fn previous_world(&mut self) {
        self.world_index = (self.world_index + WORLDS.len() - 1) % WORLDS.len();
    }

    pub fn move_column_left(&mut self) {
        if self.selected_column > 0 {
            self.selected_column -= 1;
            self.selected_row = 0;
        }
    }

    pub fn move_column_right(&mut self) {
        if self.selected_column + 1 < ClassBucket::DISPLAY_ORDER.len() {
            self.selected_column += 1;
            self.selected_row = 0;
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_row < self.selected_column_players().len().saturating_sub(1) {
            self.selected_row += 1;
        }
    }

    /// Accepts digits only. Returns true when the input changed.
    pub fn push_level_char(&mut self, c: char) -> bool {
        if c.is_ascii_digit() && self.level_input.len() < 5 {
            self.level_input.push(c);
            return true;
        }
        false
    }

    pub fn pop_level_char(&mut self) -> bool {
        self.level_input.pop().is_some()
    }

    pub fn reference_level(&self) -> i64 {
        parse_level(&self.level_input)
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    pub fn expire_notice(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.notice {
            if now.duration_since(*shown_at) >= NOTICE_TTL {
                self.notice = None;
            }
        }
    }

    pub fn set_error(&mut self, error: &str) {
        self.error_message = Some(error.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn reset_inputs(&mut self) {
        self.level_input.clear();
        self.selected_column = 0;
        self.selected_row = 0;
        self.error_message = None;
    }
}
