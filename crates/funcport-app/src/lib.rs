//! # funcport-app - Application State and Orchestration
//!
//! The TEA core of Funcport: the [`state::AppState`] model, the
//! [`message::Message`] enum, the [`handler::update`] dispatch function, and
//! the data loaders that resolve remote state in background tasks.
//!
//! The loaders ([`loader`]) implement the Data Loader half of the
//! loader/view split: fan out independent fetches, isolate per-resource
//! failures, and hand fully-resolved snapshots to the update loop. Views
//! (funcport-tui) render the resolved state and never perform I/O.

pub mod actions;
pub mod config;
pub mod editor;
pub mod handler;
pub mod input_key;
pub mod loader;
pub mod message;
pub mod state;
pub mod test_panel;
pub mod urls;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use actions::TaskContext;
pub use config::{load_settings, PortalSettings, Settings, TargetSettings};
pub use editor::{EditorFocus, EditorState};
pub use handler::{update, UpdateResult};
pub use input_key::InputKey;
pub use loader::EditorSnapshot;
pub use message::{Message, UpdateAction};
pub use state::{AppState, IntegrateState, InvocationsState, View};
pub use test_panel::{ResponseContent, TestPanelState, TestTab};
pub use urls::{UrlObj, UrlType};
