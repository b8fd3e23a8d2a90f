pub mod client;
pub mod matches;
pub mod stats;
pub mod wire;

pub use matches::{MapResult, Match, MatchPerspective, MatchTeam, MatchTopPlayer, WeekBucket};

use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Stat keys: the fixed superset of per-player columns served by the API
// ---------------------------------------------------------------------------

macro_rules! stat_keys {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// Sortable column of a player statistics record.
        ///
        /// The first four variants address identifying fields; the rest map
        /// one-to-one onto numeric keys of the `/stats/topplayers` payload.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StatKey {
            Nickname,
            TeamName,
            Division,
            Group,
            $($variant),+
        }

        impl StatKey {
            /// Every numeric stat key, in wire declaration order.
            pub const NUMERIC: &'static [StatKey] = &[$(StatKey::$variant),+];

            pub fn wire_name(&self) -> &'static str {
                match self {
                    StatKey::Nickname => "nickname",
                    StatKey::TeamName => "team_name",
                    StatKey::Division => "division",
                    StatKey::Group => "group",
                    $(StatKey::$variant => $wire),+
                }
            }

            /// Resolve a numeric stat key from its wire name.
            pub fn from_wire(name: &str) -> Option<StatKey> {
                match name {
                    $($wire => Some(StatKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

stat_keys! {
    Rating => "rating",
    TotalKills => "total_kills",
    TotalDeaths => "total_deaths",
    TotalAssists => "total_assists",
    TotalHeadshots => "total_headshots",
    AvgHeadshotPercentage => "avg_headshot_percentage",
    TotalDamage => "total_damage",
    AvgAdr => "avg_adr",
    TotalMvps => "total_mvps",
    AvgFlashSuccessRate => "avg_flash_success_rate",
    AvgUtilityDamagePerRound => "avg_utility_damage_per_round",
    AvgMatchEntryRate => "avg_match_entry_rate",
    AvgMatchEntrySuccessRate => "avg_match_entry_success_rate",
    TotalClutchKills => "total_clutch_kills",
    TotalDoubleKills => "total_double_kills",
    TotalTripleKills => "total_triple_kills",
    TotalQuadroKills => "total_quadro_kills",
    TotalPentaKills => "total_penta_kills",
    TotalSniperKills => "total_sniper_kills",
    TotalPistolKills => "total_pistol_kills",
    AvgEnemiesFlashedPerRound => "avg_enemies_flashed_per_round",
    AvgFlashesPerRound => "avg_flashes_per_round",
    AvgMatchOneVOneWinRate => "avg_match_one_v_one_win_rate",
    AvgMatchOneVTwoWinRate => "avg_match_one_v_two_win_rate",
    AvgSniperKillRate => "avg_sniper_kill_rate",
    AvgSniperKillRatePerRound => "avg_sniper_kill_rate_per_round",
    AvgUtilityDamageSuccessRate => "avg_utility_damage_success_rate",
    AvgUtilitySuccessRate => "avg_utility_success_rate",
    AvgUtilityUsagePerRound => "avg_utility_usage_per_round",
    TotalEnemiesFlashed => "total_enemies_flashed",
    TotalEntryCount => "total_entry_count",
    TotalEntryWins => "total_entry_wins",
    TotalFirstKills => "total_first_kills",
    TotalFlashCount => "total_flash_count",
    TotalFlashSuccesses => "total_flash_successes",
    TotalOneVOneCount => "total_one_v_one_count",
    TotalOneVOneWins => "total_one_v_one_wins",
    TotalOneVTwoCount => "total_one_v_two_count",
    TotalOneVTwoWins => "total_one_v_two_wins",
    TotalKnifeKills => "total_knife_kills",
    TotalZeusKills => "total_zeus_kills",
    TotalUtilityCount => "total_utility_count",
    TotalUtilityEnemies => "total_utility_enemies",
    TotalUtilitySuccesses => "total_utility_successes",
    TotalUtilityDamage => "total_utility_damage",
}

// ---------------------------------------------------------------------------
// Player statistics
// ---------------------------------------------------------------------------

/// A stored stat value. The API is loosely typed, so a key that is normally
/// numeric may occasionally arrive as text.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

/// Borrowed view of a record field, as seen by the comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
    Absent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatRecord {
    pub player_id: String,
    pub nickname: String,
    pub team_id: String,
    pub team_name: String,
    pub avatar: Option<String>,
    pub division: u32,
    pub group: u32,
    pub stats: HashMap<StatKey, StatValue>,
}

impl PlayerStatRecord {
    pub fn sort_value(&self, key: StatKey) -> SortValue<'_> {
        match key {
            StatKey::Nickname => SortValue::Text(&self.nickname),
            StatKey::TeamName => SortValue::Text(&self.team_name),
            StatKey::Division => SortValue::Number(f64::from(self.division)),
            StatKey::Group => SortValue::Number(f64::from(self.group)),
            _ => match self.stats.get(&key) {
                Some(StatValue::Number(n)) => SortValue::Number(*n),
                Some(StatValue::Text(s)) => SortValue::Text(s),
                None => SortValue::Absent,
            },
        }
    }

    /// Numeric value of a stat, if present and numeric.
    pub fn number(&self, key: StatKey) -> Option<f64> {
        match self.sort_value(key) {
            SortValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Builder used by tests and fixtures.
    pub fn with_stat(mut self, key: StatKey, value: StatValue) -> Self {
        self.stats.insert(key, value);
        self
    }
}

/// Division/group scoping of a stats fetch. `0` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    pub division: u32,
    pub group: u32,
}

impl FilterSpec {
    pub fn new(division: u32, group: u32) -> Self {
        // A group only means something inside a chosen division.
        let group = if division == 0 { 0 } else { group };
        Self { division, group }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.division == 0
    }
}

// ---------------------------------------------------------------------------
// Season rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct WinLoss {
    pub won: u32,
    pub lost: u32,
}

impl WinLoss {
    /// Win percentage with one decimal, or `"0%"` when nothing has been played.
    pub fn win_rate(&self) -> String {
        let total = self.won + self.lost;
        if total == 0 {
            return "0%".to_string();
        }
        format!("{:.1}%", f64::from(self.won) / f64::from(total) * 100.0)
    }

    pub fn differential(&self) -> i64 {
        i64::from(self.won) - i64::from(self.lost)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TeamRecord {
    #[serde(default)]
    pub matches: WinLoss,
    #[serde(default)]
    pub maps: WinLoss,
    #[serde(default)]
    pub rounds: WinLoss,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamRanking {
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub group: u32,
    #[serde(default)]
    pub record: TeamRecord,
}

/// Number of teams per group that advance to playoffs.
pub fn playoff_spots(division: u32) -> usize {
    if division == 1 { 2 } else { 4 }
}

// ---------------------------------------------------------------------------
// National rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NationalTeam {
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub group: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NationalRanking {
    #[serde(default)]
    pub id: u64,
    pub team_id: String,
    pub team: NationalTeam,
    #[serde(default)]
    pub national_points: f64,
    #[serde(default)]
    pub fall_season_placement: u32,
    #[serde(default)]
    pub fall_playoff_placement: u32,
    #[serde(default)]
    pub spring_season_placement: u32,
    #[serde(default)]
    pub spring_playoff_placement: u32,
}

impl NationalRanking {
    /// Winning either playoff grants an automatic nationals berth.
    pub fn auto_qualified(&self) -> bool {
        self.fall_playoff_placement == 1 || self.spring_playoff_placement == 1
    }
}

/// Placeholder shown for a placement of `0` ("not applicable").
pub const PLACEMENT_PLACEHOLDER: &str = "-";

pub fn placement_label(placement: u32) -> String {
    if placement == 0 {
        PLACEMENT_PLACEHOLDER.to_string()
    } else {
        placement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_key_wire_names_round_trip() {
        for key in StatKey::NUMERIC {
            assert_eq!(StatKey::from_wire(key.wire_name()), Some(*key));
        }
        assert_eq!(StatKey::NUMERIC.len(), 45);
        assert_eq!(StatKey::from_wire("nickname"), None, "identity fields are not stats");
        assert_eq!(StatKey::from_wire("not_a_stat"), None);
    }

    #[test]
    fn placement_zero_renders_placeholder() {
        assert_eq!(placement_label(0), "-");
        assert_eq!(placement_label(3), "3");
    }

    #[test]
    fn win_rate_handles_empty_record() {
        assert_eq!(WinLoss { won: 0, lost: 0 }.win_rate(), "0%");
        assert_eq!(WinLoss { won: 2, lost: 1 }.win_rate(), "66.7%");
        assert_eq!(WinLoss { won: 5, lost: 9 }.differential(), -4);
    }

    #[test]
    fn division_one_sends_two_teams_to_playoffs() {
        assert_eq!(playoff_spots(1), 2);
        assert_eq!(playoff_spots(2), 4);
        assert_eq!(playoff_spots(5), 4);
    }

    #[test]
    fn filter_without_division_drops_group() {
        let filter = FilterSpec::new(0, 3);
        assert_eq!(filter, FilterSpec { division: 0, group: 0 });
        assert!(filter.is_unconstrained());
        assert_eq!(FilterSpec::new(2, 3).group, 3);
    }

    #[test]
    fn sort_value_reports_missing_stats_as_absent() {
        let record = PlayerStatRecord {
            nickname: "ace".into(),
            division: 2,
            ..Default::default()
        }
        .with_stat(StatKey::Rating, StatValue::Number(1.25));

        assert_eq!(record.sort_value(StatKey::Rating), SortValue::Number(1.25));
        assert_eq!(record.sort_value(StatKey::AvgAdr), SortValue::Absent);
        assert_eq!(record.sort_value(StatKey::Nickname), SortValue::Text("ace"));
        assert_eq!(record.sort_value(StatKey::Division), SortValue::Number(2.0));
    }

    #[test]
    fn national_ranking_qualifies_on_any_playoff_win() {
        let mut ranking = NationalRanking::default();
        assert!(!ranking.auto_qualified());
        ranking.spring_playoff_placement = 1;
        assert!(ranking.auto_qualified());
    }
}
