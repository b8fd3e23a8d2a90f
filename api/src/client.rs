use crate::wire::{CountResponse, RawMatchTopPlayer, RawPlayerStatRecord};
use crate::{
    FilterSpec, Match, MatchTopPlayer, NationalRanking, PlayerStatRecord, StatKey, StatValue,
    TeamRanking,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Address of a locally running stats backend.
pub const DEFAULT_API_ROOT: &str = "http://127.0.0.1:5000";

/// Rows kept from a match leaderboard.
pub const MATCH_TOP_PLAYERS: usize = 5;

/// Client for the league's read-only statistics API.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for LeagueApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_ROOT)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status(reqwest::Error, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl LeagueApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .user_agent(concat!("leaguetui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of divisions in the league; divisions are numbered `1..=count`.
    pub async fn fetch_division_count(&self) -> ApiResult<u32> {
        let raw: CountResponse = self.get("/divisionamount").await?;
        Ok(raw.count)
    }

    /// Number of groups in `division`; groups are numbered `1..=count`.
    pub async fn fetch_group_count(&self, division: u32) -> ApiResult<u32> {
        let raw: CountResponse = self.get(&format!("/groupamount/{division}")).await?;
        Ok(raw.count)
    }

    /// Regular-season player statistics, optionally scoped by division/group.
    pub async fn fetch_player_stats(&self, filter: FilterSpec) -> ApiResult<Vec<PlayerStatRecord>> {
        let raw: Vec<RawPlayerStatRecord> = self.get(&player_stats_path(filter)).await?;
        Ok(raw.into_iter().map(map_player_stats).collect())
    }

    /// Standings for one group of one division.
    pub async fn fetch_season_rankings(&self, division: u32, group: u32) -> ApiResult<Vec<TeamRanking>> {
        self.get(&format!("/seasonrankings/division/{division}/group/{group}"))
            .await
    }

    /// National points standings. `division` of `None` covers the whole league.
    pub async fn fetch_national_rankings(
        &self,
        division: Option<u32>,
        ignore_qualified: bool,
    ) -> ApiResult<Vec<NationalRanking>> {
        self.get(&nationals_path(division, ignore_qualified)).await
    }

    /// Every match `team_id` has played this season.
    pub async fn fetch_team_matches(&self, team_id: &str) -> ApiResult<Vec<Match>> {
        self.get(&format!("/matches/{team_id}")).await
    }

    /// Leaderboard for a whole match, or for one map when `map` is given.
    pub async fn fetch_match_top_players(
        &self,
        match_id: &str,
        map: Option<u32>,
    ) -> ApiResult<Vec<MatchTopPlayer>> {
        let path = match map {
            Some(n) => format!("/match/{match_id}/map/{n}/topplayers"),
            None => format!("/match/{match_id}/topplayers"),
        };
        let raw: Vec<RawMatchTopPlayer> = self.get(&path).await?;
        Ok(raw
            .into_iter()
            .take(MATCH_TOP_PLAYERS)
            .map(map_top_player)
            .collect())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let response = response
            .error_for_status()
            .map_err(|e| ApiError::Status(e, url.clone()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url))
    }
}

fn player_stats_path(filter: FilterSpec) -> String {
    match (filter.division, filter.group) {
        (0, _) => "/stats/topplayers".to_string(),
        (d, 0) => format!("/stats/topplayers/division/{d}"),
        (d, g) => format!("/stats/topplayers/division/{d}/group/{g}"),
    }
}

fn nationals_path(division: Option<u32>, ignore_qualified: bool) -> String {
    let mut path = match division {
        Some(d) if d > 0 => format!("/nationals/{d}"),
        _ => "/nationals".to_string(),
    };
    if ignore_qualified {
        path.push_str("?ignoreQualified=true");
    }
    path
}

// ---------------------------------------------------------------------------
// Mapping: wire types → domain types
// ---------------------------------------------------------------------------

/// Split a flat player row into identifying fields and known stat columns.
/// Unknown keys and values that are neither numbers nor strings are dropped.
fn map_player_stats(raw: RawPlayerStatRecord) -> PlayerStatRecord {
    let mut record = PlayerStatRecord::default();
    for (key, value) in raw.0 {
        match key.as_str() {
            "player_id" => record.player_id = text(&value).unwrap_or_default(),
            "nickname" => record.nickname = text(&value).unwrap_or_default(),
            "team_id" => record.team_id = text(&value).unwrap_or_default(),
            "team_name" => record.team_name = text(&value).unwrap_or_default(),
            "avatar" => record.avatar = text(&value).filter(|s| !s.is_empty()),
            "division" => record.division = whole(&value).unwrap_or(0),
            "group" => record.group = whole(&value).unwrap_or(0),
            other => {
                let Some(stat) = StatKey::from_wire(other) else {
                    continue;
                };
                let value = match value {
                    Value::Number(n) => n.as_f64().map(StatValue::Number),
                    Value::String(s) => Some(StatValue::Text(s)),
                    _ => None,
                };
                if let Some(value) = value {
                    record.stats.insert(stat, value);
                }
            }
        }
    }
    record
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn whole(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn map_top_player(raw: RawMatchTopPlayer) -> MatchTopPlayer {
    let profile = raw.player;
    MatchTopPlayer {
        player_id: profile.player_id,
        nickname: profile.nickname,
        team_name: profile.team.map(|t| t.name).unwrap_or_default(),
        level: profile.level,
        rating: raw.hltv_rating,
        kd_ratio: raw.kd_ratio,
        kills: raw.kills,
        deaths: raw.deaths,
        assists: raw.assists,
        adr: raw.adr,
        headshot_ratio: raw.headshot_percentage,
        damage: raw.damage,
        utility_damage: raw.utility_damage,
        mvps: raw.mvps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortValue;
    use serde_json::json;

    #[test]
    fn player_stats_path_follows_filter_depth() {
        assert_eq!(player_stats_path(FilterSpec::default()), "/stats/topplayers");
        assert_eq!(player_stats_path(FilterSpec::new(2, 0)), "/stats/topplayers/division/2");
        assert_eq!(
            player_stats_path(FilterSpec::new(2, 3)),
            "/stats/topplayers/division/2/group/3"
        );
        assert_eq!(
            player_stats_path(FilterSpec { division: 0, group: 4 }),
            "/stats/topplayers",
            "group is ignored without a division"
        );
    }

    #[test]
    fn nationals_path_variants() {
        assert_eq!(nationals_path(None, false), "/nationals");
        assert_eq!(nationals_path(Some(0), false), "/nationals");
        assert_eq!(nationals_path(Some(3), false), "/nationals/3");
        assert_eq!(nationals_path(Some(3), true), "/nationals/3?ignoreQualified=true");
        assert_eq!(nationals_path(None, true), "/nationals?ignoreQualified=true");
    }

    #[test]
    fn player_row_maps_identity_and_stats() {
        let raw: RawPlayerStatRecord = serde_json::from_value(json!({
            "player_id": "p1",
            "nickname": "s1mple",
            "team_id": "t1",
            "team_name": "Falcons",
            "avatar": "",
            "division": 2,
            "group": "3",
            "rating": 1.31,
            "total_kills": 220,
            "avg_adr": "n/a",
            "total_zeus_kills": null,
            "unknown_column": 7
        }))
        .unwrap();

        let record = map_player_stats(raw);
        assert_eq!(record.player_id, "p1");
        assert_eq!(record.team_name, "Falcons");
        assert_eq!(record.avatar, None, "empty avatar means default");
        assert_eq!(record.division, 2);
        assert_eq!(record.group, 3);
        assert_eq!(record.sort_value(StatKey::Rating), SortValue::Number(1.31));
        assert_eq!(record.sort_value(StatKey::TotalKills), SortValue::Number(220.0));
        assert_eq!(record.sort_value(StatKey::AvgAdr), SortValue::Text("n/a"));
        assert_eq!(record.sort_value(StatKey::TotalZeusKills), SortValue::Absent);
        assert_eq!(record.stats.len(), 3);
    }

    #[tokio::test]
    async fn fetches_counts() {
        let mut server = mockito::Server::new_async().await;
        let divisions = server
            .mock("GET", "/divisionamount")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"count": 4}"#)
            .create_async()
            .await;
        let groups = server
            .mock("GET", "/groupamount/2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"count": 6}"#)
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        assert_eq!(api.fetch_division_count().await.unwrap(), 4);
        assert_eq!(api.fetch_group_count(2).await.unwrap(), 6);
        divisions.assert_async().await;
        groups.assert_async().await;
    }

    #[tokio::test]
    async fn trailing_slash_on_the_root_is_dropped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/divisionamount")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"count": 2}"#)
            .create_async()
            .await;

        let api = LeagueApi::new(format!("{}/", server.url()));
        assert_eq!(api.base_url(), server.url());
        assert_eq!(api.fetch_division_count().await.unwrap(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetches_scoped_player_stats() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stats/topplayers/division/1/group/2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"player_id": "a", "nickname": "one", "division": 1, "group": 2, "rating": 1.2},
                    {"player_id": "b", "nickname": "two", "division": 1, "group": 2}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let api = LeagueApi::new(format!("{}/", server.url()));
        let players = api.fetch_player_stats(FilterSpec::new(1, 2)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].number(StatKey::Rating), Some(1.2));
        assert_eq!(players[1].number(StatKey::Rating), None);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/seasonrankings/division/1/group/1")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/matches/t1")
            .with_status(500)
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let err = api.fetch_season_rankings(1, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(..)), "got {err}");
        let err = api.fetch_team_matches("t1").await.unwrap_err();
        assert!(matches!(err, ApiError::Status(..)), "got {err}");
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/nationals(\?.*)?$".into()))
            .match_query(mockito::Matcher::UrlEncoded(
                "ignoreQualified".into(),
                "true".into(),
            ))
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let err = api.fetch_national_rankings(None, true).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "got {err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let api = LeagueApi::new("http://127.0.0.1:1");
        let err = api.fetch_division_count().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(..)), "got {err}");
    }

    #[tokio::test]
    async fn season_rankings_deserialize() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/seasonrankings/division/2/group/1")
            .with_status(200)
            .with_body(
                json!([{
                    "team_id": "t1",
                    "name": "Owls",
                    "avatar": null,
                    "group": 1,
                    "record": {
                        "matches": {"won": 5, "lost": 1},
                        "maps": {"won": 10, "lost": 4},
                        "rounds": {"won": 150, "lost": 120}
                    }
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let rankings = api.fetch_season_rankings(2, 1).await.unwrap();
        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].record.maps.differential(), 6);
        assert_eq!(rankings[0].record.matches.win_rate(), "83.3%");
    }

    #[tokio::test]
    async fn match_top_players_are_capped_and_flattened() {
        let rows: Vec<Value> = (0..7)
            .map(|i| {
                json!({
                    "hltv_rating": 1.0 + f64::from(i) / 10.0,
                    "kd_ratio": 1.1,
                    "kills": 20 + i,
                    "deaths": 15,
                    "assists": 4,
                    "adr": 80.5,
                    "headshot_percentage": 0.5,
                    "damage": 2100,
                    "utility_damage": 140,
                    "mvps": 3,
                    "player": {
                        "player_id": format!("p{i}"),
                        "nickname": format!("player{i}"),
                        "avatar": "",
                        "level": 10,
                        "team": {"team_id": "t1", "name": "Owls", "division": 1, "group": 1}
                    }
                })
            })
            .collect();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/match/m1/map/2/topplayers")
            .with_status(200)
            .with_body(Value::Array(rows).to_string())
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let players = api.fetch_match_top_players("m1", Some(2)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(players.len(), MATCH_TOP_PLAYERS);
        assert_eq!(players[0].nickname, "player0");
        assert_eq!(players[0].team_name, "Owls");
        assert_eq!(players[4].kills, 24);
    }
}
