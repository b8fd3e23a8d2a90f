use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::messages::{NetworkRequest, NetworkResponse, Ticket, View};
use log::{debug, error};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    SeasonRankings,
    NationalRankings,
    PlayerStats,
    TeamMatches,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    /// Everything fetched when the UI first comes up.
    pub fn startup_requests(&mut self) -> Vec<NetworkRequest> {
        let mut requests = vec![
            self.state.load_divisions(),
            self.state.season.load_groups(),
            self.state.season.reload(),
            self.state.nationals.reload(),
            self.state.stats.reload(),
        ];
        if let Some(team_id) = self.settings.team.clone() {
            requests.push(self.open_team_matches(team_id, None));
        }
        requests
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Apply a response to the view its ticket names. Responses to superseded
    /// requests are dropped.
    pub fn on_network_response(&mut self, response: NetworkResponse) {
        let (ticket, applied) = match response {
            NetworkResponse::LoadingStateChanged { .. } => return,
            NetworkResponse::DivisionCountLoaded { ticket, count } => {
                (ticket, self.state.on_division_count(ticket.generation, count))
            }
            NetworkResponse::GroupCountLoaded { ticket, division, count } => {
                let applied = match ticket.view {
                    View::StatsGroups => self.state.stats.on_group_count(ticket.generation, division, count),
                    View::SeasonGroups => self.state.season.on_group_count(ticket.generation, division, count),
                    _ => false,
                };
                (ticket, applied)
            }
            NetworkResponse::PlayerStatsLoaded { ticket, records } => {
                (ticket, self.state.stats.on_records_loaded(ticket.generation, records))
            }
            NetworkResponse::SeasonRankingsLoaded { ticket, rankings } => {
                (ticket, self.state.season.on_rankings_loaded(ticket.generation, rankings))
            }
            NetworkResponse::NationalRankingsLoaded { ticket, rankings } => {
                (ticket, self.state.nationals.on_rankings_loaded(ticket.generation, rankings))
            }
            NetworkResponse::TeamMatchesLoaded { ticket, team_id, matches } => {
                let applied = self.state.matches.on_matches_loaded(ticket.generation, &team_id, matches);
                (ticket, applied)
            }
            NetworkResponse::MatchTopPlayersLoaded { ticket, players } => {
                (ticket, self.state.matches.top_players.on_players_loaded(ticket.generation, players))
            }
            NetworkResponse::Error { ticket, message } => (ticket, self.on_error(ticket, message)),
        };

        if !applied {
            debug!("discarding stale response for {ticket:?}");
        }
    }

    fn on_error(&mut self, ticket: Ticket, message: String) -> bool {
        let generation = ticket.generation;
        let applied = match ticket.view {
            View::PlayerStats => self.state.stats.on_error(generation, message.clone()),
            View::SeasonRankings => self.state.season.on_error(generation, message.clone()),
            View::Nationals => self.state.nationals.on_error(generation, message.clone()),
            View::Matches => self.state.matches.on_error(generation, message.clone()),
            View::TopPlayers => self.state.matches.top_players.on_error(generation, message.clone()),
            // Lists stay empty; there is no separate error state for them.
            View::Divisions => self.state.on_division_count_error(generation),
            View::StatsGroups => self.state.stats.on_group_count_error(generation),
            View::SeasonGroups => self.state.season.on_group_count_error(generation),
        };
        if applied {
            error!("{:?} fetch failed: {message}", ticket.view);
        }
        applied
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Per-view actions. Each returns the fetches it needs.
    // -----------------------------------------------------------------------

    pub fn open_team_matches(&mut self, team_id: String, team_name: Option<String>) -> NetworkRequest {
        self.update_tab(MenuItem::TeamMatches);
        self.state.matches.open_team(team_id, team_name)
    }

    /// Jump to the matches of whichever team is selected on the current tab.
    pub fn open_selected_team(&mut self) -> Option<NetworkRequest> {
        let (team_id, name) = match self.state.active_tab {
            MenuItem::SeasonRankings => {
                let team = self.state.season.selected_team()?;
                (team.team_id.clone(), team.name.clone())
            }
            MenuItem::NationalRankings => {
                let ranking = self.state.nationals.selected_team()?;
                (ranking.team_id.clone(), ranking.team.name.clone())
            }
            MenuItem::PlayerStats => {
                let record = self.state.stats.selected_record()?;
                if record.team_id.is_empty() {
                    return None;
                }
                (record.team_id.clone(), record.team_name.clone())
            }
            MenuItem::TeamMatches | MenuItem::Help => return None,
        };
        Some(self.open_team_matches(team_id, Some(name)))
    }

    pub fn reload_active_tab(&mut self) -> Vec<NetworkRequest> {
        match self.state.active_tab {
            MenuItem::SeasonRankings => {
                vec![self.state.season.load_groups(), self.state.season.reload()]
            }
            MenuItem::NationalRankings => vec![self.state.nationals.reload()],
            MenuItem::PlayerStats => vec![self.state.stats.reload()],
            MenuItem::TeamMatches => self.state.matches.reload().into_iter().collect(),
            MenuItem::Help => Vec::new(),
        }
    }

    pub fn cycle_division(&mut self, forward: bool) -> Vec<NetworkRequest> {
        let count = self.state.division_count;
        match self.state.active_tab {
            MenuItem::SeasonRankings => self.state.season.cycle_division(forward, count),
            MenuItem::NationalRankings => {
                self.state.nationals.cycle_division(forward, count).into_iter().collect()
            }
            MenuItem::PlayerStats => self.state.stats.cycle_division(forward),
            MenuItem::TeamMatches | MenuItem::Help => Vec::new(),
        }
    }

    pub fn cycle_group(&mut self, forward: bool) -> Option<NetworkRequest> {
        match self.state.active_tab {
            MenuItem::SeasonRankings => self.state.season.cycle_group(forward),
            MenuItem::PlayerStats => self.state.stats.cycle_group(forward),
            _ => None,
        }
    }

    pub fn move_selection(&mut self, down: bool) {
        match self.state.active_tab {
            MenuItem::SeasonRankings => self.state.season.move_selection(down),
            MenuItem::NationalRankings => self.state.nationals.move_selection(down),
            MenuItem::PlayerStats => self.state.stats.move_row(down),
            MenuItem::TeamMatches => self.state.matches.move_selection(down),
            MenuItem::Help => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_api::TeamRanking;

    fn app() -> App {
        App::new(AppSettings::default())
    }

    #[test]
    fn startup_fetches_every_view() {
        let mut app = app();
        let requests = app.startup_requests();
        assert_eq!(requests.len(), 5);
        assert_eq!(app.state.active_tab, MenuItem::SeasonRankings);

        let mut app = App::new(AppSettings { team: Some("t1".into()), ..AppSettings::default() });
        let requests = app.startup_requests();
        assert!(matches!(requests.last(), Some(NetworkRequest::LoadTeamMatches { team_id, .. }) if team_id == "t1"));
        assert_eq!(app.state.active_tab, MenuItem::TeamMatches);
    }

    #[test]
    fn responses_route_by_ticket() {
        let mut app = app();
        let requests = app.startup_requests();
        let season = requests
            .iter()
            .find(|r| r.ticket().view == View::SeasonRankings)
            .expect("season request")
            .ticket();

        app.on_network_response(NetworkResponse::SeasonRankingsLoaded {
            ticket: season,
            rankings: vec![TeamRanking { team_id: "t1".into(), name: "Owls".into(), ..Default::default() }],
        });
        assert_eq!(app.state.season.rankings.len(), 1);

        let stale = Ticket::new(View::SeasonRankings, season.generation.wrapping_sub(1));
        app.on_network_response(NetworkResponse::Error { ticket: stale, message: "boom".into() });
        assert_eq!(app.state.season.status, crate::state::app_state::LoadStatus::Loaded);
    }

    #[test]
    fn error_marks_only_its_own_view() {
        let mut app = app();
        let requests = app.startup_requests();
        let nationals = requests
            .iter()
            .find(|r| r.ticket().view == View::Nationals)
            .expect("nationals request")
            .ticket();
        app.on_network_response(NetworkResponse::Error { ticket: nationals, message: "HTTP 500".into() });
        assert!(matches!(
            app.state.nationals.status,
            crate::state::app_state::LoadStatus::Failed(_)
        ));
        assert_eq!(app.state.season.status, crate::state::app_state::LoadStatus::Loading);
    }

    #[test]
    fn superseded_list_failures_are_not_reported() {
        let mut app = app();
        let requests = app.startup_requests();
        let first = requests
            .iter()
            .find(|r| r.ticket().view == View::SeasonGroups)
            .expect("season groups request")
            .ticket();
        let divisions = requests
            .iter()
            .find(|r| r.ticket().view == View::Divisions)
            .expect("divisions request")
            .ticket();

        let latest = app.state.season.load_groups().ticket();
        assert!(!app.on_error(first, "HTTP 502".into()));
        assert!(app.on_error(latest, "HTTP 502".into()));
        assert!(app.state.season.groups.is_empty());

        let reloaded = app.state.load_divisions().ticket();
        assert!(!app.on_error(divisions, "timeout".into()));
        assert!(app.on_error(reloaded, "timeout".into()));
        assert_eq!(app.state.division_count, 0);

        let stats_groups = app.state.stats.select_division(1)[0].ticket();
        let _ = app.state.stats.select_division(2);
        assert!(!app.on_error(stats_groups, "HTTP 500".into()));
    }

    #[test]
    fn enter_on_a_ranking_opens_that_team() {
        let mut app = app();
        let requests = app.startup_requests();
        let season = requests
            .iter()
            .find(|r| r.ticket().view == View::SeasonRankings)
            .expect("season request")
            .ticket();
        app.on_network_response(NetworkResponse::SeasonRankingsLoaded {
            ticket: season,
            rankings: vec![TeamRanking { team_id: "t9".into(), name: "Hawks".into(), ..Default::default() }],
        });

        let request = app.open_selected_team().expect("a team is selected");
        assert!(matches!(request, NetworkRequest::LoadTeamMatches { ref team_id, .. } if team_id == "t9"));
        assert_eq!(app.state.active_tab, MenuItem::TeamMatches);
        assert_eq!(app.state.matches.team_name.as_deref(), Some("Hawks"));
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::PlayerStats);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::PlayerStats);
    }
}
