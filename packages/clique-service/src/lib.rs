pub mod auth;
pub mod matching;
pub mod profiles;
pub mod quests;

mod error;

pub use auth::{Caller, IssueSessionRequest, IssueSessionResponse, PurgeReport};
pub use error::{Error, Result};
pub use matching::{MatchRequest, MatchResponse};
pub use profiles::{PreferencesResponse, UpdatePreferencesRequest};
pub use quests::{
	CreateQuestRequest, QuestDetail, ReviewQuestRequest, SetAffinitiesRequest,
	SetConstraintsRequest, TransitionQuestRequest,
};

use clique_config::Config;
use clique_storage::db::Db;

pub struct CliqueService {
	pub cfg: Config,
	pub db: Db,
}
impl CliqueService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}
