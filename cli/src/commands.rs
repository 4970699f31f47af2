use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use xivparse_core::session::replay_file;
use xivparse_core::stats::{StatGroupSnapshot, sets};
use xivparse_core::taxonomy::{Axes, GroupId};
use xivparse_core::timeline::TimelineSnapshot;
use xivparse_core::{ParseSession, Taxonomy};
use xivparse_types::formatting::{format_compact, format_duration, format_rate};
use xivparse_types::{ParseSettings, TimelineEventType, TimelineType};

fn load_taxonomy(file: Option<&Path>) -> Result<Taxonomy, String> {
    match file {
        Some(path) => Taxonomy::from_file(path),
        None => Taxonomy::bundled(),
    }
    .map_err(|e| e.to_string())
}

fn describe_axes(axes: Axes) -> String {
    let part = |v: Option<&'static str>| v.unwrap_or("*");
    format!(
        "{}/{}/{}",
        part(axes.kind.map(|k| k.as_str())),
        part(axes.subject.map(|s| s.as_str())),
        part(axes.direction.map(|d| d.as_str())),
    )
}

pub fn print_taxonomy(file: Option<&Path>) -> Result<(), String> {
    let taxonomy = load_taxonomy(file)?;
    print_group(&taxonomy, GroupId::ROOT, 0);
    println!("{} codes", taxonomy.len());
    Ok(())
}

fn print_group(taxonomy: &Taxonomy, id: GroupId, depth: usize) {
    let Some(group) = taxonomy.group(id) else {
        return;
    };
    let direct = taxonomy.codes_in_group(id).count();
    println!(
        "{:indent$}{} [{}] {}",
        "",
        group.name(),
        describe_axes(group.axes()),
        direct,
        indent = depth * 2
    );
    for child in group.children() {
        print_group(taxonomy, *child, depth + 1);
    }
}

pub fn classify(input: &Path, file: Option<&Path>) -> Result<(), String> {
    let taxonomy = Arc::new(load_taxonomy(file)?);
    let session = ParseSession::new(Arc::clone(&taxonomy), ParseSettings::default());

    let stats = replay_file(session.parser(), input)
        .map_err(|e| format!("{}: {e}", input.display()))?;
    let tally = session.tally();

    println!(
        "{} lines, {} skipped, {} known, {} unknown",
        stats.lines, stats.skipped, tally.known, tally.unknown
    );
    for (group, count) in &tally.by_group {
        println!("  {:<40} {count}", taxonomy.group_path(*group));
    }
    if !tally.unknown_codes.is_empty() {
        println!("Unknown codes:");
        for (code, count) in &tally.unknown_codes {
            println!("  {code:06X} {count}");
        }
    }
    Ok(())
}

pub async fn demo(summary: bool) -> Result<(), String> {
    let taxonomy = Arc::new(Taxonomy::bundled().map_err(|e| e.to_string())?);
    let session = ParseSession::new(taxonomy, ParseSettings::default());
    let snapshot = run_demo_fight(&session).await.map_err(|e| e.to_string())?;

    if summary {
        print_summary(&snapshot);
    } else {
        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
        println!("{json}");
    }
    Ok(())
}

/// Eight seconds against Ifrit with two party members, then the kill.
async fn run_demo_fight(
    session: &ParseSession,
) -> Result<TimelineSnapshot, xivparse_core::StatError> {
    use TimelineEventType::{PartyJoin, PartyMonsterFighting, PartyMonsterKilled};

    let mut tl = session.timeline().write().await;
    let t0 = Instant::now();

    tl.publish_timeline_event_at(t0, PartyJoin, &["Alys Vale"]);
    tl.publish_timeline_event_at(t0, PartyJoin, &["Bram Stoke"]);

    for tick in 0..=8u32 {
        let now = t0 + Duration::from_secs(u64::from(tick));
        tl.publish_timeline_event_at(now, PartyMonsterFighting, &["Ifrit"]);

        let (hit, stat) = if tick % 3 == 2 {
            (1_300.0, sets::CRITICAL_DAMAGE)
        } else {
            (800.0, sets::REGULAR_DAMAGE)
        };
        tl.apply_player("Alys Vale", TimelineType::You, sets::TOTAL_OVERALL_DAMAGE, hit)?;
        tl.apply_player("Alys Vale", TimelineType::You, stat, hit)?;
        tl.apply_player("Bram Stoke", TimelineType::Party, sets::TOTAL_OVERALL_HEALING, 420.0)?;
        tl.apply_player("Bram Stoke", TimelineType::Party, sets::REGULAR_HEALING, 420.0)?;
        tl.apply_monster("Ifrit", TimelineType::Party, sets::TOTAL_OVERALL_DAMAGE_TAKEN, hit)?;

        tl.apply_overall(sets::TOTAL_OVERALL_DAMAGE, hit)?;
        tl.apply_overall(stat, hit)?;
        tl.apply_overall(sets::TOTAL_OVERALL_HEALING, 420.0)?;
        tl.apply_overall(sets::REGULAR_HEALING, 420.0)?;
        tl.apply_overall(sets::TOTAL_OVERALL_DAMAGE_TAKEN, 150.0)?;
        tl.apply_overall(&sets::monster_variant(sets::TOTAL_OVERALL_DAMAGE), 150.0)?;
    }

    let end = t0 + Duration::from_secs(8);
    tl.publish_timeline_event_at(end, PartyMonsterKilled, &["Ifrit"]);
    let quiet = end + ParseSettings::default().fighting_timeout();
    tl.expire_engagement_at(quiet);

    Ok(tl.snapshot_at(quiet))
}

fn print_summary(snapshot: &TimelineSnapshot) {
    println!(
        "{:?}, active {}",
        snapshot.state,
        format_duration(snapshot.active_seconds)
    );
    for fight in &snapshot.fights {
        let status = if fight.is_killed() { "killed" } else { "alive" };
        println!("  {} ({status})", fight.name());
    }
    print_group_row(&snapshot.overall);
    for member in &snapshot.party.children {
        print_group_row(member);
    }
}

fn print_group_row(group: &StatGroupSnapshot) {
    let value = |name: &str| group.value(name).unwrap_or(0.0);
    println!(
        "  {:<12} dmg {:>8} dps {:>8} heal {:>8} hps {:>8}",
        group.name,
        format_compact(value(sets::TOTAL_OVERALL_DAMAGE)),
        format_rate(value(sets::DPS)),
        format_compact(value(sets::TOTAL_OVERALL_HEALING)),
        format_rate(value(sets::HPS)),
    );
}
