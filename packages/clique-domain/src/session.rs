//! Per-request authentication as an explicit state machine.
//!
//! A caller is only authorized once the machine reaches [`SessionState::AuthenticatedReady`];
//! there is no combination of flags that can describe a half-loaded session.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ParseError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	Member,
	Creator,
	Admin,
}
impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Member => "member",
			Self::Creator => "creator",
			Self::Admin => "admin",
		}
	}

	pub fn can_author_quests(self) -> bool {
		matches!(self, Self::Creator | Self::Admin)
	}

	pub fn is_admin(self) -> bool {
		self == Self::Admin
	}
}
impl FromStr for Role {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"member" => Ok(Self::Member),
			"creator" => Ok(Self::Creator),
			"admin" => Ok(Self::Admin),
			_ => Err(ParseError::new("role", value)),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
	#[default]
	Unauthenticated,
	Authenticating { token: String },
	AuthenticatedProfilePending { user_id: Uuid },
	AuthenticatedReady { user_id: Uuid, role: Role },
}
impl SessionState {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Unauthenticated => "unauthenticated",
			Self::Authenticating { .. } => "authenticating",
			Self::AuthenticatedProfilePending { .. } => "authenticated_profile_pending",
			Self::AuthenticatedReady { .. } => "authenticated_ready",
		}
	}

	pub fn user_id(&self) -> Option<Uuid> {
		match self {
			Self::AuthenticatedProfilePending { user_id }
			| Self::AuthenticatedReady { user_id, .. } => Some(*user_id),
			_ => None,
		}
	}

	pub fn ready(&self) -> Option<(Uuid, Role)> {
		match self {
			Self::AuthenticatedReady { user_id, role } => Some((*user_id, *role)),
			_ => None,
		}
	}

	/// Applies `event`, leaving `self` untouched when the event is not valid in this state.
	pub fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
		let next = match (&*self, event) {
			(Self::Unauthenticated, SessionEvent::TokenPresented { token }) => {
				let token = token.trim().to_string();

				if token.is_empty() {
					return Err(SessionError::EmptyToken);
				}

				Self::Authenticating { token }
			},
			(Self::Authenticating { .. }, SessionEvent::TokenVerified { user_id }) =>
				Self::AuthenticatedProfilePending { user_id },
			(Self::Authenticating { .. }, SessionEvent::TokenRejected) => Self::Unauthenticated,
			(Self::AuthenticatedProfilePending { user_id }, SessionEvent::ProfileLoaded { role }) =>
				Self::AuthenticatedReady { user_id: *user_id, role },
			(Self::AuthenticatedProfilePending { .. }, SessionEvent::ProfileMissing) =>
				Self::Unauthenticated,
			(_, SessionEvent::SignedOut) => Self::Unauthenticated,
			(state, event) =>
				return Err(SessionError::InvalidTransition {
					state: state.name(),
					event: event.name(),
				}),
		};

		*self = next;

		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
	TokenPresented { token: String },
	TokenVerified { user_id: Uuid },
	TokenRejected,
	ProfileLoaded { role: Role },
	ProfileMissing,
	SignedOut,
}
impl SessionEvent {
	pub fn name(&self) -> &'static str {
		match self {
			Self::TokenPresented { .. } => "token_presented",
			Self::TokenVerified { .. } => "token_verified",
			Self::TokenRejected => "token_rejected",
			Self::ProfileLoaded { .. } => "profile_loaded",
			Self::ProfileMissing => "profile_missing",
			Self::SignedOut => "signed_out",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
	#[error("Bearer token must be non-empty.")]
	EmptyToken,
	#[error("Event {event} is not valid in state {state}.")]
	InvalidTransition { state: &'static str, event: &'static str },
}
