//! Stat layouts seeded into the timeline's groups.

use super::{Stat, TotalStat};

pub const TOTAL_OVERALL_DAMAGE: &str = "TotalOverallDamage";
pub const DPS: &str = "DPS";
pub const STATIC_PLAYER_DPS: &str = "StaticPlayerDPS";
pub const TOTAL_OVERALL_HEALING: &str = "TotalOverallHealing";
pub const HPS: &str = "HPS";
pub const STATIC_PLAYER_HPS: &str = "StaticPlayerHPS";
pub const TOTAL_OVERALL_DAMAGE_TAKEN: &str = "TotalOverallDamageTaken";
pub const DTPS: &str = "DTPS";
pub const STATIC_PLAYER_DTPS: &str = "StaticPlayerDTPS";
pub const TOTAL_OVERALL_TP: &str = "TotalOverallTP";
pub const TOTAL_OVERALL_MP: &str = "TotalOverallMP";
pub const REGULAR_DAMAGE: &str = "RegularDamage";
pub const CRITICAL_DAMAGE: &str = "CriticalDamage";
pub const REGULAR_HEALING: &str = "RegularHealing";
pub const CRITICAL_HEALING: &str = "CriticalHealing";
pub const REGULAR_DAMAGE_TAKEN: &str = "RegularDamageTaken";
pub const CRITICAL_DAMAGE_TAKEN: &str = "CriticalDamageTaken";
pub const KILLS: &str = "Kills";

/// Totals that also get a "...Monster" twin in the overall group.
const MONSTER_MIRRORED: [&str; 11] = [
    TOTAL_OVERALL_DAMAGE,
    TOTAL_OVERALL_HEALING,
    TOTAL_OVERALL_DAMAGE_TAKEN,
    TOTAL_OVERALL_TP,
    TOTAL_OVERALL_MP,
    REGULAR_DAMAGE,
    CRITICAL_DAMAGE,
    REGULAR_HEALING,
    CRITICAL_HEALING,
    REGULAR_DAMAGE_TAKEN,
    CRITICAL_DAMAGE_TAKEN,
];

/// Name of the overall total tracking monsters' side of `name`.
pub fn monster_variant(name: &str) -> String {
    format!("{name}Monster")
}

/// Total followed by its per-second rate.
fn total_with_rate(total: &str, rate: &str) -> [Stat; 2] {
    let source = TotalStat::new(total);
    let derived = Stat::per_second(rate, &source);
    [Stat::Total(source), derived]
}

fn breakdown() -> impl Iterator<Item = Stat> {
    [
        REGULAR_DAMAGE,
        CRITICAL_DAMAGE,
        REGULAR_HEALING,
        CRITICAL_HEALING,
        REGULAR_DAMAGE_TAKEN,
        CRITICAL_DAMAGE_TAKEN,
    ]
    .into_iter()
    .map(Stat::total)
}

/// The timeline-wide set: 28 stats, derived rates directly after their sources.
pub fn overall_stats() -> Vec<Stat> {
    let mut stats = Vec::with_capacity(28);
    stats.extend(total_with_rate(TOTAL_OVERALL_DAMAGE, DPS));
    stats.push(Stat::total(STATIC_PLAYER_DPS));
    stats.extend(total_with_rate(TOTAL_OVERALL_HEALING, HPS));
    stats.push(Stat::total(STATIC_PLAYER_HPS));
    stats.extend(total_with_rate(TOTAL_OVERALL_DAMAGE_TAKEN, DTPS));
    stats.push(Stat::total(STATIC_PLAYER_DTPS));
    stats.push(Stat::total(TOTAL_OVERALL_TP));
    stats.push(Stat::total(TOTAL_OVERALL_MP));
    stats.extend(breakdown());
    stats.extend(
        MONSTER_MIRRORED
            .iter()
            .map(|name| Stat::total(monster_variant(name))),
    );
    stats
}

/// Per-player set.
pub fn entity_stats() -> Vec<Stat> {
    let mut stats = Vec::with_capacity(14);
    stats.extend(total_with_rate(TOTAL_OVERALL_DAMAGE, DPS));
    stats.extend(total_with_rate(TOTAL_OVERALL_HEALING, HPS));
    stats.extend(total_with_rate(TOTAL_OVERALL_DAMAGE_TAKEN, DTPS));
    stats.push(Stat::total(TOTAL_OVERALL_TP));
    stats.push(Stat::total(TOTAL_OVERALL_MP));
    stats.extend(breakdown());
    stats
}

/// Per-monster set: the player set plus a kill counter.
pub fn monster_stats() -> Vec<Stat> {
    let mut stats = entity_stats();
    stats.push(Stat::total(KILLS));
    stats
}
