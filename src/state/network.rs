use crate::state::messages::{NetworkRequest, NetworkResponse};
use league_api::client::{ApiResult, LeagueApi};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs every request as its own task, so replies can arrive in any order.
/// Ordering is resolved by the ticket each response carries.
pub struct NetworkWorker {
    client: LeagueApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    in_flight: Arc<AtomicUsize>,
}

impl NetworkWorker {
    pub fn new(
        client: LeagueApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
                self.start_loading_animation().await;
            }

            let client = self.client.clone();
            let responses = self.responses.clone();
            let in_flight = self.in_flight.clone();

            tokio::spawn(async move {
                let ticket = request.ticket();
                let response = handle_request(&client, request)
                    .await
                    .unwrap_or_else(|err| NetworkResponse::Error {
                        ticket,
                        message: err.to_string(),
                    });
                debug!("network request complete for {ticket:?}");

                let is_ok = !matches!(response, NetworkResponse::Error { .. });
                if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                    stop_loading_animation(&responses, is_ok).await;
                }

                if let Err(e) = responses.send(response).await {
                    error!("Failed to send network response: {e}");
                }
            });
        }
    }

    async fn start_loading_animation(&self) {
        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if in_flight.load(Ordering::SeqCst) == 0 {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }
}

async fn stop_loading_animation(responses: &mpsc::Sender<NetworkResponse>, is_ok: bool) {
    tokio::time::sleep(Duration::from_millis(15)).await;

    let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
    let _ = responses
        .send(NetworkResponse::LoadingStateChanged {
            loading_state: LoadingState { is_loading: false, spinner_char },
        })
        .await;
}

async fn handle_request(client: &LeagueApi, request: NetworkRequest) -> ApiResult<NetworkResponse> {
    let response = match request {
        NetworkRequest::LoadDivisionCount { ticket } => {
            debug!("loading division count");
            let count = client.fetch_division_count().await?;
            NetworkResponse::DivisionCountLoaded { ticket, count }
        }
        NetworkRequest::LoadGroupCount { ticket, division } => {
            debug!("loading group count for division {division}");
            let count = client.fetch_group_count(division).await?;
            NetworkResponse::GroupCountLoaded { ticket, division, count }
        }
        NetworkRequest::LoadPlayerStats { ticket, filter } => {
            debug!("loading player stats for {filter:?}");
            let records = client.fetch_player_stats(filter).await?;
            NetworkResponse::PlayerStatsLoaded { ticket, records }
        }
        NetworkRequest::LoadSeasonRankings { ticket, division, group } => {
            debug!("loading season rankings for division {division} group {group}");
            let rankings = client.fetch_season_rankings(division, group).await?;
            NetworkResponse::SeasonRankingsLoaded { ticket, rankings }
        }
        NetworkRequest::LoadNationalRankings { ticket, division, ignore_qualified } => {
            debug!("loading national rankings (division {division:?}, ignore qualified {ignore_qualified})");
            let rankings = client
                .fetch_national_rankings(division, ignore_qualified)
                .await?;
            NetworkResponse::NationalRankingsLoaded { ticket, rankings }
        }
        NetworkRequest::LoadTeamMatches { ticket, team_id } => {
            debug!("loading matches for team {team_id}");
            let matches = client.fetch_team_matches(&team_id).await?;
            NetworkResponse::TeamMatchesLoaded { ticket, team_id, matches }
        }
        NetworkRequest::LoadMatchTopPlayers { ticket, match_id, map } => {
            debug!("loading top players for match {match_id} map {map:?}");
            let players = client.fetch_match_top_players(&match_id, map).await?;
            NetworkResponse::MatchTopPlayersLoaded { ticket, players }
        }
    };
    Ok(response)
}
