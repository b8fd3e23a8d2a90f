//! Match history and per-match player leaderboards.
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchTeam {
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub division: u32,
    #[serde(default)]
    pub group: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapResult {
    pub map: String,
    #[serde(default)]
    pub map_id: String,
    #[serde(default)]
    pub map_num: u32,
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub team1_score: u32,
    #[serde(default)]
    pub team2_score: u32,
    #[serde(default)]
    pub team1_first_half_score: u32,
    #[serde(default)]
    pub team2_first_half_score: u32,
    #[serde(default)]
    pub team1_second_half_score: u32,
    #[serde(default)]
    pub team2_second_half_score: u32,
    #[serde(default)]
    pub team1_overtime_score: u32,
    #[serde(default)]
    pub team2_overtime_score: u32,
}

impl MapResult {
    /// (ours, theirs) for the full map.
    pub fn score(&self, as_team1: bool) -> (u32, u32) {
        orient(self.team1_score, self.team2_score, as_team1)
    }

    pub fn first_half(&self, as_team1: bool) -> (u32, u32) {
        orient(self.team1_first_half_score, self.team2_first_half_score, as_team1)
    }

    pub fn second_half(&self, as_team1: bool) -> (u32, u32) {
        orient(self.team1_second_half_score, self.team2_second_half_score, as_team1)
    }

    /// Overtime score, only when either side scored in overtime.
    pub fn overtime(&self, as_team1: bool) -> Option<(u32, u32)> {
        if self.team1_overtime_score == 0 && self.team2_overtime_score == 0 {
            return None;
        }
        Some(orient(self.team1_overtime_score, self.team2_overtime_score, as_team1))
    }
}

fn orient(team1: u32, team2: u32, as_team1: bool) -> (u32, u32) {
    if as_team1 { (team1, team2) } else { (team2, team1) }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Match {
    pub match_id: String,
    #[serde(default)]
    pub week: u32,
    /// RFC 2822 timestamp, e.g. `Mon, 03 Feb 2025 19:00:00 GMT`.
    #[serde(default)]
    pub finished_at: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub winner: String,
    pub team1: MatchTeam,
    pub team2: MatchTeam,
    #[serde(default)]
    pub maps: Vec<MapResult>,
}

/// A match seen from one team's side.
#[derive(Debug, Clone, Copy)]
pub struct MatchPerspective<'a> {
    pub this: &'a MatchTeam,
    pub opponent: &'a MatchTeam,
    pub as_team1: bool,
    pub won: bool,
    /// No maps were played.
    pub forfeit: bool,
}

impl MatchPerspective<'_> {
    /// Name of the side that forfeited, if any.
    pub fn forfeited_by(&self) -> Option<&str> {
        if !self.forfeit {
            return None;
        }
        let loser = if self.won { self.opponent } else { self.this };
        Some(loser.name.as_str())
    }
}

impl Match {
    /// View this match from `team_id`'s side. Without a team team1 is used;
    /// any id other than team1's is shown from team2's side.
    pub fn perspective(&self, team_id: Option<&str>) -> MatchPerspective<'_> {
        let as_team1 = match team_id {
            Some(id) => self.team1.team_id == id,
            None => true,
        };
        let (this, opponent) =
            if as_team1 { (&self.team1, &self.team2) } else { (&self.team2, &self.team1) };
        MatchPerspective {
            this,
            opponent,
            as_team1,
            won: self.winner == this.team_id,
            forfeit: self.maps.is_empty(),
        }
    }

    pub fn finished(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(self.finished_at.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// `Feb 3, 2025`, falling back to the raw timestamp when it cannot be parsed.
    pub fn date_label(&self) -> String {
        self.finished()
            .map(|dt| dt.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| self.finished_at.clone())
    }

    /// External match page, with the language placeholder filled in.
    pub fn details_url(&self) -> String {
        self.url.replace("{lang}", "en")
    }
}

/// Matches played in one league week.
#[derive(Debug, Clone)]
pub struct WeekBucket<'a> {
    pub week: u32,
    pub matches: Vec<&'a Match>,
}

/// Bucket matches by week, most recent week first. Matches keep their
/// original relative order inside a bucket.
pub fn group_by_week(matches: &[Match]) -> Vec<WeekBucket<'_>> {
    let mut buckets: Vec<WeekBucket<'_>> = Vec::new();
    for m in matches {
        match buckets.iter_mut().find(|b| b.week == m.week) {
            Some(bucket) => bucket.matches.push(m),
            None => buckets.push(WeekBucket { week: m.week, matches: vec![m] }),
        }
    }
    buckets.sort_by(|a, b| b.week.cmp(&a.week));
    buckets
}

/// Name of `team_id` as it appears in its first match.
pub fn team_name_from_matches<'a>(matches: &'a [Match], team_id: &str) -> Option<&'a str> {
    let first = matches.first()?;
    let team = if first.team1.team_id == team_id { &first.team1 } else { &first.team2 };
    Some(team.name.as_str())
}

/// One row of a match (or single map) leaderboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTopPlayer {
    pub player_id: String,
    pub nickname: String,
    pub team_name: String,
    pub level: u32,
    pub rating: f64,
    pub kd_ratio: f64,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub adr: f64,
    /// Ratio in `0.0..=1.0`.
    pub headshot_ratio: f64,
    pub damage: f64,
    pub utility_damage: f64,
    pub mvps: u32,
}

impl MatchTopPlayer {
    pub fn headshot_label(&self) -> String {
        format!("{}%", (self.headshot_ratio * 100.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: &str) -> MatchTeam {
        MatchTeam { team_id: id.into(), name: name.into(), division: 2, group: 1, avatar: None }
    }

    fn fixture(id: &str, week: u32, winner: &str, maps: Vec<MapResult>) -> Match {
        Match {
            match_id: id.into(),
            week,
            finished_at: "Mon, 03 Feb 2025 19:00:00 GMT".into(),
            url: "https://www.faceit.com/{lang}/cs2/room/1-abc".into(),
            winner: winner.into(),
            team1: team("a", "Alpha"),
            team2: team("b", "Bravo"),
            maps,
        }
    }

    #[test]
    fn weeks_are_most_recent_first_and_stable_within_week() {
        let matches = vec![
            fixture("m1", 1, "a", vec![]),
            fixture("m2", 3, "a", vec![]),
            fixture("m3", 1, "b", vec![]),
            fixture("m4", 2, "b", vec![]),
            fixture("m5", 3, "b", vec![]),
        ];
        let buckets = group_by_week(&matches);
        let weeks: Vec<u32> = buckets.iter().map(|b| b.week).collect();
        assert_eq!(weeks, vec![3, 2, 1]);
        let week3: Vec<&str> = buckets[0].matches.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(week3, vec!["m2", "m5"]);
        let week1: Vec<&str> = buckets[2].matches.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(week1, vec!["m1", "m3"]);
    }

    #[test]
    fn perspective_flips_for_team2() {
        let map = MapResult {
            map: "de_mirage".into(),
            winner: "b".into(),
            team1_score: 9,
            team2_score: 13,
            team1_first_half_score: 5,
            team2_first_half_score: 7,
            team1_second_half_score: 4,
            team2_second_half_score: 6,
            ..Default::default()
        };
        let m = fixture("m1", 1, "b", vec![map]);

        let view = m.perspective(Some("b"));
        assert!(!view.as_team1);
        assert!(view.won);
        assert!(!view.forfeit);
        assert_eq!(view.this.name, "Bravo");
        assert_eq!(m.maps[0].score(view.as_team1), (13, 9));
        assert_eq!(m.maps[0].first_half(view.as_team1), (7, 5));
        assert_eq!(m.maps[0].overtime(view.as_team1), None);

        let default_view = m.perspective(None);
        assert!(default_view.as_team1);
        assert!(!default_view.won);
    }

    #[test]
    fn unknown_team_is_shown_from_team2() {
        let m = fixture("m1", 1, "a", vec![]);
        let view = m.perspective(Some("zz"));
        assert!(!view.as_team1);
        assert_eq!(view.this.name, "Bravo");
        assert_eq!(view.opponent.name, "Alpha");
        assert!(!view.won);

        assert!(m.perspective(Some("a")).as_team1);
    }

    #[test]
    fn match_without_maps_is_a_forfeit_by_the_loser() {
        let m = fixture("m1", 1, "a", vec![]);
        assert_eq!(m.perspective(Some("a")).forfeited_by(), Some("Bravo"));
        assert_eq!(m.perspective(Some("b")).forfeited_by(), Some("Bravo"));
    }

    #[test]
    fn overtime_shown_when_either_side_scored() {
        let map = MapResult { team1_overtime_score: 4, team2_overtime_score: 0, ..Default::default() };
        assert_eq!(map.overtime(false), Some((0, 4)));
    }

    #[test]
    fn date_label_formats_rfc2822_and_falls_back() {
        let mut m = fixture("m1", 1, "a", vec![]);
        assert_eq!(m.date_label(), "Feb 3, 2025");
        m.finished_at = "sometime".into();
        assert_eq!(m.date_label(), "sometime");
        assert_eq!(m.details_url(), "https://www.faceit.com/en/cs2/room/1-abc");
    }

    #[test]
    fn team_name_comes_from_first_match() {
        let matches = vec![fixture("m1", 1, "a", vec![])];
        assert_eq!(team_name_from_matches(&matches, "b"), Some("Bravo"));
        assert_eq!(team_name_from_matches(&[], "b"), None);
    }

    #[test]
    fn headshot_ratio_rounds_to_whole_percent() {
        let p = MatchTopPlayer { headshot_ratio: 0.456, ..Default::default() };
        assert_eq!(p.headshot_label(), "46%");
    }
}
