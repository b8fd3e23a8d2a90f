/// Wire types for the league statistics API whose JSON shape differs from the
/// domain model. These map to domain types in client.rs.
use serde::Deserialize;
use serde_json::{Map, Value};

/// `{ "count": n }` from `/divisionamount` and `/groupamount/{division}`.
#[derive(Deserialize, Default, Debug)]
pub struct CountResponse {
    #[serde(default)]
    pub count: u32,
}

/// A player row from `/stats/topplayers`: a flat JSON object with a handful of
/// identifying fields and ~45 loosely-typed stat columns.
#[derive(Deserialize, Default, Debug)]
#[serde(transparent)]
pub struct RawPlayerStatRecord(pub Map<String, Value>);

#[derive(Deserialize, Default, Debug, Clone)]
pub struct RawTopPlayerTeam {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct RawTopPlayerProfile {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub team: Option<RawTopPlayerTeam>,
}

/// A row from `/match/{id}/topplayers` or `/match/{id}/map/{n}/topplayers`.
#[derive(Deserialize, Default, Debug)]
pub struct RawMatchTopPlayer {
    #[serde(default)]
    pub hltv_rating: f64,
    #[serde(default)]
    pub kd_ratio: f64,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub adr: f64,
    #[serde(default)]
    pub headshot_percentage: f64,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub utility_damage: f64,
    #[serde(default)]
    pub mvps: u32,
    #[serde(default)]
    pub player: RawTopPlayerProfile,
}
