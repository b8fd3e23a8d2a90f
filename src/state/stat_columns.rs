use league_api::{PlayerStatRecord, SortValue, StatKey};

/// How a column renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFormat {
    Text,
    Integer,
    Decimal(usize),
    /// Stored as a ratio, shown as `value * 100` with one decimal.
    RatioPercent,
    /// Already a percentage, shown with one decimal.
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatColumn {
    pub key: StatKey,
    pub label: &'static str,
    pub format: StatFormat,
}

const fn col(key: StatKey, label: &'static str, format: StatFormat) -> StatColumn {
    StatColumn { key, label, format }
}

/// Shown for missing values.
pub const MISSING: &str = "-";

pub static BASE_COLUMNS: &[StatColumn] = &[
    col(StatKey::Nickname, "Player", StatFormat::Text),
    col(StatKey::TeamName, "Team", StatFormat::Text),
    col(StatKey::Division, "Div", StatFormat::Integer),
    col(StatKey::Rating, "Rating", StatFormat::Decimal(2)),
    col(StatKey::TotalKills, "Kills", StatFormat::Integer),
    col(StatKey::TotalDeaths, "Deaths", StatFormat::Integer),
    col(StatKey::TotalAssists, "Assists", StatFormat::Integer),
    col(StatKey::AvgHeadshotPercentage, "HS%", StatFormat::Percent),
    col(StatKey::AvgAdr, "ADR", StatFormat::Decimal(1)),
    col(StatKey::TotalMvps, "MVPs", StatFormat::Integer),
];

pub static EXTENDED_COLUMNS: &[StatColumn] = &[
    col(StatKey::TotalClutchKills, "Clutch Kills", StatFormat::Integer),
    col(StatKey::AvgMatchEntryRate, "Entry Rate", StatFormat::RatioPercent),
    col(StatKey::AvgMatchEntrySuccessRate, "Entry Success", StatFormat::RatioPercent),
    col(StatKey::TotalDoubleKills, "Double Kills", StatFormat::Integer),
    col(StatKey::TotalTripleKills, "Triple Kills", StatFormat::Integer),
    col(StatKey::TotalQuadroKills, "Quadro Kills", StatFormat::Integer),
    col(StatKey::TotalPentaKills, "Penta Kills", StatFormat::Integer),
    col(StatKey::TotalSniperKills, "Sniper Kills", StatFormat::Integer),
    col(StatKey::TotalPistolKills, "Pistol Kills", StatFormat::Integer),
    col(StatKey::AvgUtilityDamagePerRound, "Util Dmg/Round", StatFormat::Decimal(1)),
    col(StatKey::AvgFlashSuccessRate, "Flash Success", StatFormat::RatioPercent),
    col(StatKey::TotalUtilityDamage, "Total Util Dmg", StatFormat::Integer),
    col(StatKey::AvgEnemiesFlashedPerRound, "Enemies Flashed/Rnd", StatFormat::Decimal(2)),
    col(StatKey::AvgFlashesPerRound, "Flashes/Rnd", StatFormat::Decimal(2)),
    col(StatKey::AvgMatchOneVOneWinRate, "1v1 Win Rate", StatFormat::RatioPercent),
    col(StatKey::AvgMatchOneVTwoWinRate, "1v2 Win Rate", StatFormat::RatioPercent),
    col(StatKey::AvgSniperKillRate, "Sniper Kill Rate", StatFormat::Decimal(2)),
    col(StatKey::AvgSniperKillRatePerRound, "Sniper Kill Rate/Rnd", StatFormat::Decimal(2)),
    col(StatKey::AvgUtilityDamageSuccessRate, "Util Dmg Success", StatFormat::Percent),
    col(StatKey::AvgUtilitySuccessRate, "Util Success", StatFormat::RatioPercent),
    col(StatKey::AvgUtilityUsagePerRound, "Util Usage/Rnd", StatFormat::Decimal(2)),
    col(StatKey::TotalEnemiesFlashed, "Enemies Flashed", StatFormat::Integer),
    col(StatKey::TotalEntryCount, "Entry Count", StatFormat::Integer),
    col(StatKey::TotalEntryWins, "Entry Wins", StatFormat::Integer),
    col(StatKey::TotalFirstKills, "First Kills", StatFormat::Integer),
    col(StatKey::TotalFlashCount, "Flash Count", StatFormat::Integer),
    col(StatKey::TotalFlashSuccesses, "Flash Successes", StatFormat::Integer),
    col(StatKey::TotalHeadshots, "Headshots", StatFormat::Integer),
    col(StatKey::TotalDamage, "Damage", StatFormat::Integer),
    col(StatKey::TotalOneVOneCount, "1v1 Count", StatFormat::Integer),
    col(StatKey::TotalOneVOneWins, "1v1 Wins", StatFormat::Integer),
    col(StatKey::TotalOneVTwoCount, "1v2 Count", StatFormat::Integer),
    col(StatKey::TotalOneVTwoWins, "1v2 Wins", StatFormat::Integer),
    col(StatKey::TotalKnifeKills, "Knife Kills", StatFormat::Integer),
    col(StatKey::TotalZeusKills, "Zeus Kills", StatFormat::Integer),
    col(StatKey::TotalUtilityCount, "Utility Count", StatFormat::Integer),
    col(StatKey::TotalUtilityEnemies, "Utility Enemies", StatFormat::Integer),
    col(StatKey::TotalUtilitySuccesses, "Utility Successes", StatFormat::Integer),
];

/// Columns on screen for the current extended-stats toggle.
pub fn visible_columns(show_extended: bool) -> Vec<StatColumn> {
    let mut columns = BASE_COLUMNS.to_vec();
    if show_extended {
        columns.extend_from_slice(EXTENDED_COLUMNS);
    }
    columns
}

pub fn format_stat(record: &PlayerStatRecord, column: &StatColumn) -> String {
    match record.sort_value(column.key) {
        SortValue::Number(n) => format_number(n, column.format),
        SortValue::Text(s) => s.to_string(),
        SortValue::Absent => MISSING.to_string(),
    }
}

fn format_number(n: f64, format: StatFormat) -> String {
    if !n.is_finite() {
        return MISSING.to_string();
    }
    match format {
        StatFormat::Text => n.to_string(),
        StatFormat::Integer => format!("{}", n.round() as i64),
        StatFormat::Decimal(places) => format!("{n:.places$}"),
        StatFormat::RatioPercent => format!("{:.1}%", n * 100.0),
        StatFormat::Percent => format!("{n:.1}%"),
    }
}
