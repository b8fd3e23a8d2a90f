use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use league_api::{FilterSpec, Match, MatchTopPlayer, NationalRanking, PlayerStatRecord, TeamRanking};

/// The piece of state a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Divisions,
    StatsGroups,
    PlayerStats,
    SeasonGroups,
    SeasonRankings,
    Nationals,
    Matches,
    TopPlayers,
}

/// Routing tag carried by every request and its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub view: View,
    pub generation: u64,
}

impl Ticket {
    pub fn new(view: View, generation: u64) -> Self {
        Self { view, generation }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadDivisionCount { ticket: Ticket },
    LoadGroupCount { ticket: Ticket, division: u32 },
    LoadPlayerStats { ticket: Ticket, filter: FilterSpec },
    LoadSeasonRankings { ticket: Ticket, division: u32, group: u32 },
    LoadNationalRankings { ticket: Ticket, division: Option<u32>, ignore_qualified: bool },
    LoadTeamMatches { ticket: Ticket, team_id: String },
    LoadMatchTopPlayers { ticket: Ticket, match_id: String, map: Option<u32> },
}

impl NetworkRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            NetworkRequest::LoadDivisionCount { ticket }
            | NetworkRequest::LoadGroupCount { ticket, .. }
            | NetworkRequest::LoadPlayerStats { ticket, .. }
            | NetworkRequest::LoadSeasonRankings { ticket, .. }
            | NetworkRequest::LoadNationalRankings { ticket, .. }
            | NetworkRequest::LoadTeamMatches { ticket, .. }
            | NetworkRequest::LoadMatchTopPlayers { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    DivisionCountLoaded { ticket: Ticket, count: u32 },
    GroupCountLoaded { ticket: Ticket, division: u32, count: u32 },
    PlayerStatsLoaded { ticket: Ticket, records: Vec<PlayerStatRecord> },
    SeasonRankingsLoaded { ticket: Ticket, rankings: Vec<TeamRanking> },
    NationalRankingsLoaded { ticket: Ticket, rankings: Vec<NationalRanking> },
    TeamMatchesLoaded { ticket: Ticket, team_id: String, matches: Vec<Match> },
    MatchTopPlayersLoaded { ticket: Ticket, players: Vec<MatchTopPlayer> },
    Error { ticket: Ticket, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
