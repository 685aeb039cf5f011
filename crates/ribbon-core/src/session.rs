//! # User Session Store
//!
//! Holds the signed-in user, or none, plus two UI feedback flags.
//!
//! ```text
//!   SetUser(Some(u)) ──► current_user = u, error = None
//!   SetUser(None)    ──► current_user = None, error = None
//!   SetLoading(b)    ──► loading = b
//!   SetError(e)      ──► error = e
//!   Logout           ──► current_user = None, loading = false, error = None
//! ```
//!
//! The bearer token lives in the client's token store, not here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetUser(Option<User>),
    SetLoading(bool),
    SetError(Option<String>),
    Logout,
}

pub fn reduce(mut state: SessionState, action: SessionAction) -> SessionState {
    state.dispatch(action);
    state
}

impl SessionState {
    pub fn dispatch(&mut self, action: SessionAction) {
        match action {
            SessionAction::SetUser(user) => {
                self.current_user = user;
                self.error = None;
            }
            SessionAction::SetLoading(loading) => self.loading = loading,
            SessionAction::SetError(error) => self.error = error,
            SessionAction::Logout => {
                *self = SessionState::default();
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.is_admin)
    }
}
