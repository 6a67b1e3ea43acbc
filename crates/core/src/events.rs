//! User interface events and their dispatch onto a session.
//!
//! Every control of the browser maps to one `UiEvent`. Front ends post
//! events as JSON (`{"type": "subject_changed", "value": "Physics"}`) and
//! render the returned `EventOutcome`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::session::{LoadOutcome, Session};
use crate::taxonomy::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    SubjectChanged {
        #[serde(default)]
        value: Option<String>,
    },
    YearChanged {
        #[serde(default)]
        value: Option<String>,
    },
    TopicChanged {
        #[serde(default)]
        value: Option<String>,
    },
    /// Blank means "all difficulties".
    DifficultyChanged {
        #[serde(default)]
        value: Option<String>,
    },
    SelectAllVisible,
    DeselectAllVisible,
    ClearSelection,
    ToggleSelection {
        path: String,
    },
    OpenViewer {
        path: String,
    },
    CloseViewer,
    ClearCache,
    ForceRefresh,
}

impl UiEvent {
    fn name(&self) -> &'static str {
        match self {
            UiEvent::SubjectChanged { .. } => "subject_changed",
            UiEvent::YearChanged { .. } => "year_changed",
            UiEvent::TopicChanged { .. } => "topic_changed",
            UiEvent::DifficultyChanged { .. } => "difficulty_changed",
            UiEvent::SelectAllVisible => "select_all_visible",
            UiEvent::DeselectAllVisible => "deselect_all_visible",
            UiEvent::ClearSelection => "clear_selection",
            UiEvent::ToggleSelection { .. } => "toggle_selection",
            UiEvent::OpenViewer { .. } => "open_viewer",
            UiEvent::CloseViewer => "close_viewer",
            UiEvent::ClearCache => "clear_cache",
            UiEvent::ForceRefresh => "force_refresh",
        }
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventOutcome {
    /// A filter changed and the catalog was (re)loaded.
    Loaded { load: LoadOutcome, visible: usize },
    SelectionChanged { selected: usize },
    Toggled { path: String, selected: bool },
    ViewerChanged { path: Option<String> },
    CacheCleared,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Unknown difficulty: {0}")]
    InvalidDifficulty(String),
}

/// Apply an event to the session.
pub async fn dispatch(session: &mut Session, event: UiEvent) -> Result<EventOutcome, EventError> {
    debug!(event = event.name(), "Dispatching UI event");

    match event {
        UiEvent::SubjectChanged { value } => {
            session.set_subject(value);
            Ok(reload(session).await)
        }
        UiEvent::YearChanged { value } => {
            session.set_year(value);
            Ok(reload(session).await)
        }
        UiEvent::TopicChanged { value } => {
            session.set_topic(value);
            Ok(reload(session).await)
        }
        UiEvent::DifficultyChanged { value } => {
            let difficulty = match value.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(
                    raw.parse::<Difficulty>()
                        .map_err(|_| EventError::InvalidDifficulty(raw.to_string()))?,
                ),
            };
            session.set_difficulty(difficulty);
            Ok(reload(session).await)
        }
        UiEvent::SelectAllVisible => {
            session.select_all_visible();
            Ok(selection_changed(session))
        }
        UiEvent::DeselectAllVisible => {
            session.deselect_all_visible();
            Ok(selection_changed(session))
        }
        UiEvent::ClearSelection => {
            session.clear_selection();
            Ok(selection_changed(session))
        }
        UiEvent::ToggleSelection { path } => {
            let selected = session.toggle_selection(&path);
            Ok(EventOutcome::Toggled { path, selected })
        }
        UiEvent::OpenViewer { path } => {
            session.open_viewer(&path);
            Ok(viewer_changed(session))
        }
        UiEvent::CloseViewer => {
            session.close_viewer();
            Ok(viewer_changed(session))
        }
        UiEvent::ClearCache => {
            session.clear_cache();
            Ok(EventOutcome::CacheCleared)
        }
        UiEvent::ForceRefresh => {
            let load = session.force_refresh().await;
            Ok(EventOutcome::Loaded {
                load,
                visible: session.view().len(),
            })
        }
    }
}

async fn reload(session: &mut Session) -> EventOutcome {
    let load = session.load_for_current_filters().await;
    EventOutcome::Loaded {
        load,
        visible: session.view().len(),
    }
}

fn selection_changed(session: &Session) -> EventOutcome {
    EventOutcome::SelectionChanged {
        selected: session.selection().size(),
    }
}

fn viewer_changed(session: &Session) -> EventOutcome {
    EventOutcome::ViewerChanged {
        path: session.viewer().map(str::to_string),
    }
}
