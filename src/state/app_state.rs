use crate::app::MenuItem;
use crate::state::generation::RequestGeneration;
use crate::state::messages::{NetworkRequest, Ticket, View};
use crate::state::stat_columns::{StatColumn, visible_columns};
use chrono::Local;
use league_api::stats::{SortSpec, apply_sort, select_sort_key};
use league_api::{
    FilterSpec, Match, MatchTopPlayer, NationalRanking, PlayerStatRecord, TeamRanking,
    matches::{group_by_week, team_name_from_matches},
    playoff_spots,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

fn now_label() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Step through `0..=max` (wrapping) by one in either direction.
fn cycle(current: u32, max: u32, forward: bool) -> u32 {
    if max == 0 {
        return 0;
    }
    if forward {
        if current >= max { 0 } else { current + 1 }
    } else if current == 0 {
        max
    } else {
        current - 1
    }
}

/// Same as [`cycle`] but over `1..=max`.
fn cycle_from_one(current: u32, max: u32, forward: bool) -> u32 {
    if max == 0 {
        return current;
    }
    let next = cycle(current.saturating_sub(1), max - 1, forward);
    next + 1
}

fn move_selection(selected: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *selected = 0;
    } else if down {
        *selected = (*selected + 1).min(len - 1);
    } else {
        *selected = selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Cascading division / group filter
// ---------------------------------------------------------------------------

/// Division and group selection where the group list depends on the division.
#[derive(Debug, Default)]
pub struct CascadingFilter {
    pub divisions: Vec<u32>,
    pub groups: Vec<u32>,
    pub division: u32,
    pub group: u32,
    groups_generation: RequestGeneration,
}

impl CascadingFilter {
    pub fn spec(&self) -> FilterSpec {
        FilterSpec::new(self.division, self.group)
    }

    pub fn set_division_count(&mut self, count: u32) {
        self.divisions = (1..=count).collect();
    }

    /// Pick a division. Returns the generation to tag a group-count fetch
    /// with, or `None` for division 0 which has no groups.
    pub fn select_division(&mut self, division: u32) -> Option<u64> {
        self.division = division;
        self.group = 0;
        self.groups.clear();
        // Advancing even for division 0 drops any group count still in flight.
        let generation = self.groups_generation.advance();
        (division != 0).then_some(generation)
    }

    /// Pick a group. Only possible inside a division whose groups are known.
    pub fn select_group(&mut self, group: u32) -> bool {
        if self.division == 0 {
            return false;
        }
        if group != 0 && !self.groups.contains(&group) {
            return false;
        }
        self.group = group;
        true
    }

    pub fn apply_group_count(&mut self, generation: u64, division: u32, count: u32) -> bool {
        if !self.groups_generation.is_current(generation) || division != self.division {
            return false;
        }
        self.groups = (1..=count).collect();
        true
    }

    /// A failed group count leaves the list empty. Returns whether the
    /// failure belongs to the latest request.
    pub fn on_group_count_error(&self, generation: u64) -> bool {
        self.groups_generation.is_current(generation)
    }

    pub fn division_after(&self, forward: bool) -> u32 {
        cycle(self.division, self.divisions.len() as u32, forward)
    }

    pub fn group_after(&self, forward: bool) -> Option<u32> {
        if self.division == 0 || self.groups.is_empty() {
            return None;
        }
        Some(cycle(self.group, self.groups.len() as u32, forward))
    }
}

// ---------------------------------------------------------------------------
// Player statistics table
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StatsTableState {
    pub filter: CascadingFilter,
    pub sort: SortSpec,
    pub show_extended: bool,
    pub column_cursor: usize,
    pub selected_row: usize,
    pub status: LoadStatus,
    pub loaded_at: Option<String>,
    records: Vec<PlayerStatRecord>,
    rows: Vec<PlayerStatRecord>,
    generation: RequestGeneration,
}

impl StatsTableState {
    /// Records in display order.
    pub fn rows(&self) -> &[PlayerStatRecord] {
        &self.rows
    }

    pub fn columns(&self) -> Vec<StatColumn> {
        visible_columns(self.show_extended)
    }

    pub fn reload(&mut self) -> NetworkRequest {
        let generation = self.generation.advance();
        self.status = LoadStatus::Loading;
        self.records.clear();
        self.rows.clear();
        self.selected_row = 0;
        NetworkRequest::LoadPlayerStats {
            ticket: Ticket::new(View::PlayerStats, generation),
            filter: self.filter.spec(),
        }
    }

    pub fn select_division(&mut self, division: u32) -> Vec<NetworkRequest> {
        if division == self.filter.division {
            return Vec::new();
        }
        let mut requests = Vec::with_capacity(2);
        if let Some(generation) = self.filter.select_division(division) {
            requests.push(NetworkRequest::LoadGroupCount {
                ticket: Ticket::new(View::StatsGroups, generation),
                division,
            });
        }
        requests.push(self.reload());
        requests
    }

    pub fn select_group(&mut self, group: u32) -> Option<NetworkRequest> {
        if group == self.filter.group || !self.filter.select_group(group) {
            return None;
        }
        Some(self.reload())
    }

    pub fn cycle_division(&mut self, forward: bool) -> Vec<NetworkRequest> {
        let next = self.filter.division_after(forward);
        self.select_division(next)
    }

    pub fn cycle_group(&mut self, forward: bool) -> Option<NetworkRequest> {
        let next = self.filter.group_after(forward)?;
        self.select_group(next)
    }

    pub fn move_column_cursor(&mut self, right: bool) {
        let count = self.columns().len();
        move_selection(&mut self.column_cursor, count, right);
    }

    /// Sort by the column under the cursor, flipping direction if it is
    /// already the active key.
    pub fn sort_by_cursor(&mut self) {
        let Some(column) = self.columns().get(self.column_cursor).copied() else {
            return;
        };
        self.sort = select_sort_key(self.sort, column.key);
        self.rows = apply_sort(&self.records, self.sort);
    }

    pub fn toggle_extended(&mut self) {
        self.show_extended = !self.show_extended;
        let count = self.columns().len();
        self.column_cursor = self.column_cursor.min(count.saturating_sub(1));
    }

    pub fn move_row(&mut self, down: bool) {
        move_selection(&mut self.selected_row, self.rows.len(), down);
    }

    pub fn selected_record(&self) -> Option<&PlayerStatRecord> {
        self.rows.get(self.selected_row)
    }

    pub fn on_group_count(&mut self, generation: u64, division: u32, count: u32) -> bool {
        self.filter.apply_group_count(generation, division, count)
    }

    pub fn on_group_count_error(&self, generation: u64) -> bool {
        self.filter.on_group_count_error(generation)
    }

    pub fn on_records_loaded(&mut self, generation: u64, records: Vec<PlayerStatRecord>) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.rows = apply_sort(&records, self.sort);
        self.records = records;
        self.selected_row = 0;
        self.status = LoadStatus::Loaded;
        self.loaded_at = Some(now_label());
        true
    }

    pub fn on_error(&mut self, generation: u64, message: String) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.status = LoadStatus::Failed(message);
        true
    }
}

// ---------------------------------------------------------------------------
// Season rankings
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SeasonRankingsState {
    pub division: u32,
    pub group: u32,
    pub groups: Vec<u32>,
    pub rankings: Vec<TeamRanking>,
    pub selected: usize,
    pub status: LoadStatus,
    pub loaded_at: Option<String>,
    generation: RequestGeneration,
    groups_generation: RequestGeneration,
}

impl Default for SeasonRankingsState {
    fn default() -> Self {
        Self {
            division: 1,
            group: 1,
            groups: Vec::new(),
            rankings: Vec::new(),
            selected: 0,
            status: LoadStatus::Idle,
            loaded_at: None,
            generation: RequestGeneration::default(),
            groups_generation: RequestGeneration::default(),
        }
    }
}

impl SeasonRankingsState {
    pub fn reload(&mut self) -> NetworkRequest {
        let generation = self.generation.advance();
        self.status = LoadStatus::Loading;
        self.rankings.clear();
        self.selected = 0;
        NetworkRequest::LoadSeasonRankings {
            ticket: Ticket::new(View::SeasonRankings, generation),
            division: self.division,
            group: self.group,
        }
    }

    pub fn load_groups(&mut self) -> NetworkRequest {
        let generation = self.groups_generation.advance();
        NetworkRequest::LoadGroupCount {
            ticket: Ticket::new(View::SeasonGroups, generation),
            division: self.division,
        }
    }

    /// Move to the next or previous division; the group goes back to 1.
    pub fn cycle_division(&mut self, forward: bool, division_count: u32) -> Vec<NetworkRequest> {
        let next = cycle_from_one(self.division, division_count, forward);
        if next == self.division {
            return Vec::new();
        }
        self.division = next;
        self.group = 1;
        self.groups.clear();
        vec![self.load_groups(), self.reload()]
    }

    pub fn cycle_group(&mut self, forward: bool) -> Option<NetworkRequest> {
        let next = cycle_from_one(self.group, self.groups.len() as u32, forward);
        if next == self.group {
            return None;
        }
        self.group = next;
        Some(self.reload())
    }

    pub fn playoff_spots(&self) -> usize {
        playoff_spots(self.division)
    }

    pub fn move_selection(&mut self, down: bool) {
        move_selection(&mut self.selected, self.rankings.len(), down);
    }

    pub fn selected_team(&self) -> Option<&TeamRanking> {
        self.rankings.get(self.selected)
    }

    pub fn on_group_count(&mut self, generation: u64, division: u32, count: u32) -> bool {
        if !self.groups_generation.is_current(generation) || division != self.division {
            return false;
        }
        self.groups = (1..=count).collect();
        true
    }

    pub fn on_group_count_error(&self, generation: u64) -> bool {
        self.groups_generation.is_current(generation)
    }

    pub fn on_rankings_loaded(&mut self, generation: u64, rankings: Vec<TeamRanking>) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.rankings = rankings;
        self.selected = 0;
        self.status = LoadStatus::Loaded;
        self.loaded_at = Some(now_label());
        true
    }

    pub fn on_error(&mut self, generation: u64, message: String) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.status = LoadStatus::Failed(message);
        true
    }
}

// ---------------------------------------------------------------------------
// National rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct NationalsState {
    pub hide_qualified: bool,
    /// `0` shows every division.
    pub division: u32,
    pub rankings: Vec<NationalRanking>,
    pub selected: usize,
    pub status: LoadStatus,
    pub loaded_at: Option<String>,
    generation: RequestGeneration,
}

impl NationalsState {
    pub fn reload(&mut self) -> NetworkRequest {
        let generation = self.generation.advance();
        self.status = LoadStatus::Loading;
        self.rankings.clear();
        self.selected = 0;
        NetworkRequest::LoadNationalRankings {
            ticket: Ticket::new(View::Nationals, generation),
            division: (self.division != 0).then_some(self.division),
            ignore_qualified: self.hide_qualified,
        }
    }

    pub fn toggle_hide_qualified(&mut self) -> NetworkRequest {
        self.hide_qualified = !self.hide_qualified;
        self.reload()
    }

    pub fn cycle_division(&mut self, forward: bool, division_count: u32) -> Option<NetworkRequest> {
        let next = cycle(self.division, division_count, forward);
        if next == self.division {
            return None;
        }
        self.division = next;
        Some(self.reload())
    }

    pub fn move_selection(&mut self, down: bool) {
        move_selection(&mut self.selected, self.rankings.len(), down);
    }

    pub fn selected_team(&self) -> Option<&NationalRanking> {
        self.rankings.get(self.selected)
    }

    pub fn on_rankings_loaded(&mut self, generation: u64, rankings: Vec<NationalRanking>) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.rankings = rankings;
        self.selected = 0;
        self.status = LoadStatus::Loaded;
        self.loaded_at = Some(now_label());
        true
    }

    pub fn on_error(&mut self, generation: u64, message: String) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.status = LoadStatus::Failed(message);
        true
    }
}

// ---------------------------------------------------------------------------
// Team matches and per-match top players
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TopPlayersState {
    pub match_id: Option<String>,
    /// `None` covers the whole match.
    pub map: Option<u32>,
    pub players: Vec<MatchTopPlayer>,
    pub status: LoadStatus,
    generation: RequestGeneration,
}

impl TopPlayersState {
    fn load(&mut self, match_id: String, map: Option<u32>) -> NetworkRequest {
        let generation = self.generation.advance();
        self.match_id = Some(match_id.clone());
        self.map = map;
        self.players.clear();
        self.status = LoadStatus::Loading;
        NetworkRequest::LoadMatchTopPlayers {
            ticket: Ticket::new(View::TopPlayers, generation),
            match_id,
            map,
        }
    }

    pub fn close(&mut self) {
        self.match_id = None;
        self.map = None;
        self.players.clear();
        self.status = LoadStatus::Idle;
        // Anything still in flight belongs to the closed panel.
        self.generation.advance();
    }

    pub fn is_open(&self) -> bool {
        self.match_id.is_some()
    }

    pub fn on_players_loaded(&mut self, generation: u64, players: Vec<MatchTopPlayer>) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.players = players;
        self.status = LoadStatus::Loaded;
        true
    }

    pub fn on_error(&mut self, generation: u64, message: String) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.status = LoadStatus::Failed(message);
        true
    }
}

#[derive(Debug, Default)]
pub struct MatchesState {
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub matches: Vec<Match>,
    /// Index into [`MatchesState::ordered`].
    pub selected: usize,
    pub status: LoadStatus,
    pub loaded_at: Option<String>,
    pub top_players: TopPlayersState,
    generation: RequestGeneration,
}

impl MatchesState {
    /// Show matches for `team_id`. The name is optional and filled in from
    /// the match list when unknown.
    pub fn open_team(&mut self, team_id: String, team_name: Option<String>) -> NetworkRequest {
        self.team_id = Some(team_id);
        self.team_name = team_name;
        self.reload_for_current_team()
    }

    pub fn reload(&mut self) -> Option<NetworkRequest> {
        self.team_id.as_ref()?;
        Some(self.reload_for_current_team())
    }

    fn reload_for_current_team(&mut self) -> NetworkRequest {
        let generation = self.generation.advance();
        self.matches.clear();
        self.selected = 0;
        self.status = LoadStatus::Loading;
        self.top_players.close();
        NetworkRequest::LoadTeamMatches {
            ticket: Ticket::new(View::Matches, generation),
            team_id: self.team_id.clone().unwrap_or_default(),
        }
    }

    /// Matches in display order: most recent week first.
    pub fn ordered(&self) -> Vec<&Match> {
        group_by_week(&self.matches)
            .into_iter()
            .flat_map(|bucket| bucket.matches)
            .collect()
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.ordered().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, down: bool) {
        move_selection(&mut self.selected, self.matches.len(), down);
    }

    pub fn open_top_players(&mut self) -> Option<NetworkRequest> {
        let match_id = self.selected_match()?.match_id.clone();
        Some(self.top_players.load(match_id, None))
    }

    /// Step the leaderboard through whole match, map 1, map 2, ... and back.
    pub fn cycle_map(&mut self) -> Option<NetworkRequest> {
        let match_id = self.top_players.match_id.clone()?;
        let map_numbers: Vec<u32> = self
            .matches
            .iter()
            .find(|m| m.match_id == match_id)?
            .maps
            .iter()
            .enumerate()
            .map(|(i, map)| if map.map_num == 0 { i as u32 + 1 } else { map.map_num })
            .collect();
        if map_numbers.is_empty() {
            return None;
        }
        let next = match self.top_players.map {
            None => Some(map_numbers[0]),
            Some(current) => {
                let pos = map_numbers.iter().position(|n| *n == current);
                pos.and_then(|p| map_numbers.get(p + 1).copied())
            }
        };
        Some(self.top_players.load(match_id, next))
    }

    pub fn on_matches_loaded(&mut self, generation: u64, team_id: &str, matches: Vec<Match>) -> bool {
        if !self.generation.is_current(generation) || self.team_id.as_deref() != Some(team_id) {
            return false;
        }
        if self.team_name.is_none() {
            self.team_name = team_name_from_matches(&matches, team_id).map(str::to_string);
        }
        self.matches = matches;
        self.selected = 0;
        self.status = LoadStatus::Loaded;
        self.loaded_at = Some(now_label());
        true
    }

    pub fn on_error(&mut self, generation: u64, message: String) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.status = LoadStatus::Failed(message);
        true
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub division_count: u32,
    pub stats: StatsTableState,
    pub season: SeasonRankingsState,
    pub nationals: NationalsState,
    pub matches: MatchesState,
    divisions_generation: RequestGeneration,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_divisions(&mut self) -> NetworkRequest {
        let generation = self.divisions_generation.advance();
        NetworkRequest::LoadDivisionCount { ticket: Ticket::new(View::Divisions, generation) }
    }

    pub fn on_division_count(&mut self, generation: u64, count: u32) -> bool {
        if !self.divisions_generation.is_current(generation) {
            return false;
        }
        self.division_count = count;
        self.stats.filter.set_division_count(count);
        true
    }

    /// The division list stays empty on failure.
    pub fn on_division_count_error(&self, generation: u64) -> bool {
        self.divisions_generation.is_current(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_api::stats::SortDirection;
    use league_api::{MapResult, MatchTeam, StatKey, StatValue};

    fn player(name: &str, rating: f64) -> PlayerStatRecord {
        PlayerStatRecord { nickname: name.into(), ..Default::default() }
            .with_stat(StatKey::Rating, StatValue::Number(rating))
    }

    fn stats_generation(request: &NetworkRequest) -> u64 {
        match request {
            NetworkRequest::LoadPlayerStats { ticket, .. } => ticket.generation,
            other => panic!("expected a stats request, got {other:?}"),
        }
    }

    fn loaded_stats() -> StatsTableState {
        let mut table = StatsTableState::default();
        table.filter.set_division_count(3);
        table
    }

    #[test]
    fn division_zero_forces_group_zero_and_empty_groups() {
        let mut filter = CascadingFilter::default();
        let generation = filter.select_division(2).expect("division 2 has groups");
        assert!(filter.apply_group_count(generation, 2, 4));
        assert!(filter.select_group(3));

        assert_eq!(filter.select_division(0), None);
        assert_eq!(filter.group, 0);
        assert!(filter.groups.is_empty());
        assert_eq!(filter.spec(), FilterSpec { division: 0, group: 0 });
    }

    #[test]
    fn group_needs_a_division_and_a_known_group() {
        let mut filter = CascadingFilter::default();
        assert!(!filter.select_group(1));
        filter.select_division(1);
        assert!(!filter.select_group(1), "groups not fetched yet");
        assert_eq!(filter.group_after(true), None);
    }

    #[test]
    fn stale_group_count_is_discarded() {
        let mut filter = CascadingFilter::default();
        let first = filter.select_division(1).expect("nonzero");
        let second = filter.select_division(2).expect("nonzero");
        assert!(!filter.apply_group_count(first, 1, 6));
        assert!(filter.groups.is_empty());
        assert!(filter.apply_group_count(second, 2, 3));
        assert_eq!(filter.groups, vec![1, 2, 3]);
    }

    #[test]
    fn division_change_requests_groups_and_records() {
        let mut table = loaded_stats();
        let requests = table.select_division(2);
        assert_eq!(requests.len(), 2);
        assert!(matches!(requests[0], NetworkRequest::LoadGroupCount { division: 2, .. }));
        assert!(matches!(
            requests[1],
            NetworkRequest::LoadPlayerStats { filter: FilterSpec { division: 2, group: 0 }, .. }
        ));
        assert_eq!(table.status, LoadStatus::Loading);

        let requests = table.select_division(0);
        assert_eq!(requests.len(), 1, "division 0 has no groups to fetch");
    }

    #[test]
    fn late_response_for_earlier_division_is_ignored() {
        let mut table = loaded_stats();
        let a = stats_generation(table.select_division(1).last().expect("stats request"));
        let b = stats_generation(table.select_division(2).last().expect("stats request"));

        assert!(table.on_records_loaded(b, vec![player("bravo", 1.1)]));
        assert!(!table.on_records_loaded(a, vec![player("alpha", 1.4)]));
        assert!(!table.on_error(a, "timeout".into()));

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].nickname, "bravo");
        assert_eq!(table.status, LoadStatus::Loaded);
        assert_eq!(table.filter.spec(), FilterSpec { division: 2, group: 0 });
    }

    #[test]
    fn division_zero_after_group_selection_resets_everything() {
        let mut table = loaded_stats();
        let requests = table.select_division(2);
        let groups_generation = requests[0].ticket().generation;
        assert!(table.on_group_count(groups_generation, 2, 4));
        assert!(table.select_group(3).is_some());
        assert_eq!(table.filter.spec(), FilterSpec { division: 2, group: 3 });

        let requests = table.select_division(0);
        assert!(matches!(
            requests[0],
            NetworkRequest::LoadPlayerStats { filter: FilterSpec { division: 0, group: 0 }, .. }
        ));
        assert_eq!(table.filter.group, 0);
        assert!(table.filter.groups.is_empty());
    }

    #[test]
    fn group_count_failure_only_counts_for_the_latest_division() {
        let mut table = loaded_stats();
        let first = table.select_division(1)[0].ticket().generation;
        let second = table.select_division(2)[0].ticket().generation;

        assert!(!table.on_group_count_error(first));
        assert!(table.on_group_count_error(second));
        assert!(table.filter.groups.is_empty());
        assert_eq!(table.filter.spec(), FilterSpec { division: 2, group: 0 });
    }

    #[test]
    fn sorting_by_cursor_toggles_and_resorts_rows() {
        let mut table = loaded_stats();
        let generation = stats_generation(&table.reload());
        table.on_records_loaded(
            generation,
            vec![player("low", 0.8), player("high", 1.3), player("mid", 1.0)],
        );
        let names: Vec<&str> = table.rows().iter().map(|r| r.nickname.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);

        table.column_cursor = table
            .columns()
            .iter()
            .position(|c| c.key == StatKey::Rating)
            .expect("rating column");
        table.sort_by_cursor();
        assert_eq!(table.sort.direction, SortDirection::Asc);
        let names: Vec<&str> = table.rows().iter().map(|r| r.nickname.as_str()).collect();
        assert_eq!(names, vec!["low", "mid", "high"]);
    }

    #[test]
    fn collapsing_extended_columns_clamps_cursor() {
        let mut table = StatsTableState::default();
        table.toggle_extended();
        table.column_cursor = table.columns().len() - 1;
        table.toggle_extended();
        assert_eq!(table.column_cursor, table.columns().len() - 1);
    }

    #[test]
    fn season_division_change_resets_group_and_refetches() {
        let mut season = SeasonRankingsState::default();
        season.groups = vec![1, 2, 3];
        season.group = 3;
        let requests = season.cycle_division(true, 3);
        assert_eq!(season.division, 2);
        assert_eq!(season.group, 1);
        assert!(season.groups.is_empty());
        assert!(matches!(requests[0], NetworkRequest::LoadGroupCount { division: 2, .. }));
        assert!(matches!(
            requests[1],
            NetworkRequest::LoadSeasonRankings { division: 2, group: 1, .. }
        ));
        assert_eq!(season.playoff_spots(), 4);

        season.cycle_division(false, 3);
        assert_eq!(season.playoff_spots(), 2);
        season.cycle_division(false, 3);
        assert_eq!(season.division, 3, "wraps below division 1");
    }

    #[test]
    fn nationals_request_reflects_toggles() {
        let mut nationals = NationalsState::default();
        let request = nationals.toggle_hide_qualified();
        assert!(matches!(
            request,
            NetworkRequest::LoadNationalRankings { division: None, ignore_qualified: true, .. }
        ));
        let request = nationals.cycle_division(true, 2).expect("division changes");
        assert!(matches!(
            request,
            NetworkRequest::LoadNationalRankings { division: Some(1), ignore_qualified: true, .. }
        ));
    }

    fn fixture(id: &str, week: u32, maps: usize) -> Match {
        Match {
            match_id: id.into(),
            week,
            team1: MatchTeam { team_id: "a".into(), name: "Alpha".into(), ..Default::default() },
            team2: MatchTeam { team_id: "b".into(), name: "Bravo".into(), ..Default::default() },
            maps: (0..maps)
                .map(|i| MapResult { map_num: i as u32 + 1, ..Default::default() })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn matches_follow_week_order_and_learn_team_name() {
        let mut state = MatchesState::default();
        let generation = state.open_team("b".into(), None).ticket().generation;
        assert!(state.on_matches_loaded(
            generation,
            "b",
            vec![fixture("m1", 1, 1), fixture("m2", 2, 2)],
        ));
        assert_eq!(state.team_name.as_deref(), Some("Bravo"));
        assert_eq!(state.selected_match().map(|m| m.match_id.as_str()), Some("m2"));
    }

    #[test]
    fn matches_for_a_previous_team_are_ignored() {
        let mut state = MatchesState::default();
        let first = state.open_team("a".into(), None).ticket().generation;
        let second = state.open_team("b".into(), None).ticket().generation;
        assert!(!state.on_matches_loaded(first, "a", vec![fixture("m1", 1, 1)]));
        assert!(state.on_matches_loaded(second, "b", vec![]));
        assert!(state.matches.is_empty());
    }

    #[test]
    fn map_cycle_walks_maps_then_back_to_whole_match() {
        let mut state = MatchesState::default();
        let generation = state.open_team("a".into(), None).ticket().generation;
        state.on_matches_loaded(generation, "a", vec![fixture("m1", 1, 2)]);

        let open = state.open_top_players().expect("a match is selected");
        assert!(matches!(open, NetworkRequest::LoadMatchTopPlayers { map: None, .. }));
        let maps: Vec<Option<u32>> = (0..3)
            .map(|_| match state.cycle_map() {
                Some(NetworkRequest::LoadMatchTopPlayers { map, .. }) => map,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(maps, vec![Some(1), Some(2), None]);
    }

    #[test]
    fn closed_top_players_ignore_late_results() {
        let mut state = MatchesState::default();
        let generation = state.open_team("a".into(), None).ticket().generation;
        state.on_matches_loaded(generation, "a", vec![fixture("m1", 1, 1)]);
        let generation = state.open_top_players().expect("selected").ticket().generation;
        state.top_players.close();
        assert!(!state.top_players.on_players_loaded(generation, vec![MatchTopPlayer::default()]));
        assert!(!state.top_players.is_open());
    }

    #[test]
    fn division_count_populates_filter_choices() {
        let mut state = AppState::new();
        let generation = state.load_divisions().ticket().generation;
        assert!(state.on_division_count(generation, 3));
        assert_eq!(state.stats.filter.divisions, vec![1, 2, 3]);
        assert_eq!(state.stats.filter.division_after(false), 3);
    }
}
