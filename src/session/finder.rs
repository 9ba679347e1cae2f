use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    api::GameDataApi,
    config::DisplaySettings,
    models::{
        CharacterSheet, FinderError, Result, RosterByClass, WorldResponse, DEATHS_SHOWN,
        HOUSES_SHOWN,
    },
    roster::{classify, filter_by_range, FilteredRoster},
    session::store::SelectionStore,
};

pub const LOAD_FAILED_MESSAGE: &str =
    "Could not load world data. Check that the world exists and try again.";
pub const NO_WORLD_MESSAGE: &str = "Please select a world first.";
pub const REFRESH_OK_MESSAGE: &str = "Player list updated!";
pub const REFRESH_FAILED_MESSAGE: &str = "Failed to refresh player list";

/// Where the roster view is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Loading,
    Displayed,
    Failed(String),
}

/// State of the character detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailView {
    Hidden,
    Loading { name: String },
    Ready(Box<CharacterSheet>),
    Failed { name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Short-lived message shown after a refresh or copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub reference_level: i64,
    /// World chosen by the user, mirrored in the selection store.
    pub selected_world: Option<String>,
    /// World whose roster was last requested; refresh targets this one.
    pub loaded_world: Option<String>,
    pub roster: Option<RosterByClass>,
    pub view: Option<FilteredRoster>,
    pub phase: Phase,
    pub is_refreshing: bool,
    pub detail: DetailView,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            reference_level: 0,
            selected_world: None,
            loaded_world: None,
            roster: None,
            view: None,
            phase: Phase::Idle,
            is_refreshing: false,
            detail: DetailView::Hidden,
        }
    }
}

impl Session {
    /// Replaces the roster wholesale and rebuilds the filtered view.
    fn apply_roster(&mut self, roster: RosterByClass) -> FilteredRoster {
        let view = filter_by_range(&roster, self.reference_level);
        self.roster = Some(roster);
        self.view = Some(view.clone());
        self.phase = Phase::Displayed;
        view
    }
}

/// Drives the fetch, classify and filter cycle for one user.
///
/// The session lock is never held across a network call. A `load_world` can
/// still race a `refresh_world`; whichever response lands last wins.
pub struct PartyFinder {
    api: Arc<dyn GameDataApi>,
    store: Arc<dyn SelectionStore>,
    session: Mutex<Session>,
    houses_shown: usize,
    deaths_shown: usize,
}

impl PartyFinder {
    pub fn new(api: Arc<dyn GameDataApi>, store: Arc<dyn SelectionStore>) -> Self {
        Self {
            api,
            store,
            session: Mutex::new(Session::default()),
            houses_shown: HOUSES_SHOWN,
            deaths_shown: DEATHS_SHOWN,
        }
    }

    pub fn with_display(mut self, display: &DisplaySettings) -> Self {
        self.houses_shown = display.houses_shown;
        self.deaths_shown = display.deaths_shown;
        self
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Pre-selects the world remembered from a previous run.
    pub async fn restore_selection(&self) -> Result<Option<String>> {
        let saved = self.store.load().await?;
        if let Some(world) = &saved {
            info!("Restored saved world {}", world);
            self.session.lock().await.selected_world = Some(world.clone());
        }
        Ok(saved)
    }

    /// Changes the selection without fetching.
    pub async fn select_world(&self, world: &str) {
        self.session.lock().await.selected_world = Some(world.to_string());
    }

    /// Loads the selected world, or fails validation when none is selected.
    pub async fn update_results(&self) -> Result<FilteredRoster> {
        let selected = self.session.lock().await.selected_world.clone();
        match selected {
            Some(world) => self.load_world(&world).await,
            None => Err(FinderError::ValidationError(NO_WORLD_MESSAGE.to_string())),
        }
    }

    pub async fn load_world(&self, world: &str) -> Result<FilteredRoster> {
        {
            let mut session = self.session.lock().await;
            session.phase = Phase::Loading;
            session.selected_world = Some(world.to_string());
            session.loaded_world = Some(world.to_string());
        }

        if let Err(e) = self.store.save(world).await {
            warn!("Could not remember world {}: {}", world, e);
        }

        info!("Loading world {}", world);
        let result = self.api.fetch_world(world).await.and_then(WorldResponse::into_players);
        match result {
            Ok(players) => {
                let roster = classify(&players);
                let mut session = self.session.lock().await;
                let view = session.apply_roster(roster);
                info!(
                    "World {}: {} players, {} in range",
                    world, view.total_players, view.total_in_range
                );
                Ok(view)
            }
            Err(e) => {
                warn!("Failed to load world {}: {}", world, e);
                self.session.lock().await.phase = Phase::Failed(LOAD_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Re-fetches the loaded world. Returns `None` when there is nothing to
    /// refresh or a refresh is already running.
    pub async fn refresh_world(&self) -> Option<Notice> {
        let world = {
            let mut session = self.session.lock().await;
            if session.is_refreshing {
                return None;
            }
            let world = session.loaded_world.clone()?;
            session.is_refreshing = true;
            world
        };

        info!("Refreshing world {}", world);
        let result = self.api.fetch_world(&world).await.and_then(WorldResponse::into_players);

        let mut session = self.session.lock().await;
        session.is_refreshing = false;
        match result {
            Ok(players) => {
                session.apply_roster(classify(&players));
                Some(Notice::success(REFRESH_OK_MESSAGE))
            }
            Err(e) => {
                warn!("Failed to refresh world {}: {}", world, e);
                Some(Notice::error(REFRESH_FAILED_MESSAGE))
            }
        }
    }

    /// Updates the reference level and refilters the loaded roster, if any.
    pub async fn set_reference_level(&self, level: i64) -> Option<FilteredRoster> {
        let mut session = self.session.lock().await;
        session.reference_level = level.max(0);
        let view = session
            .roster
            .as_ref()
            .map(|roster| filter_by_range(roster, session.reference_level));
        if view.is_some() {
            session.view = view.clone();
        }
        view
    }

    pub async fn clear_filters(&self) -> Result<()> {
        {
            let mut session = self.session.lock().await;
            let detail = std::mem::replace(&mut session.detail, DetailView::Hidden);
            let is_refreshing = session.is_refreshing;
            *session = Session { detail, is_refreshing, ..Session::default() };
        }
        self.store.clear().await?;
        info!("Cleared filters and saved world");
        Ok(())
    }

    /// Fetches a character into the detail view. Failures stay in the detail
    /// view and never touch the roster.
    pub async fn lookup_character(&self, name: &str) -> DetailView {
        self.session.lock().await.detail = DetailView::Loading { name: name.to_string() };

        let detail = match self.api.fetch_character(name).await {
            Ok(response) => match CharacterSheet::from_response_capped(
                response,
                Utc::now(),
                self.houses_shown,
                self.deaths_shown,
            ) {
                Ok(sheet) => DetailView::Ready(Box::new(sheet)),
                Err(e) => DetailView::Failed { name: name.to_string(), message: e.to_string() },
            },
            Err(e) => {
                warn!("Character lookup for {} failed: {}", name, e);
                DetailView::Failed { name: name.to_string(), message: e.to_string() }
            }
        };

        self.session.lock().await.detail = detail.clone();
        detail
    }

    pub async fn close_detail(&self) {
        self.session.lock().await.detail = DetailView::Hidden;
    }
}
