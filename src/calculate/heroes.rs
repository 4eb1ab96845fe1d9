use std::collections::{BTreeMap, HashMap};

use crate::models::{HeroId, HeroStat, Role, Side, Tier};

use super::{percentage, DraftDataset};

#[derive(Default)]
struct HeroTally {
    picks: u32,
    bans: u32,
    wins: u32,
    losses: u32,
    roles: BTreeMap<Role, u32>,
}

/// Most-picked role; ties go to the earlier role in lane order.
pub fn primary_role(roles: &BTreeMap<Role, u32>) -> Option<Role> {
    roles
        .iter()
        .filter(|(_, n)| **n > 0)
        .fold(None, |best: Option<(Role, u32)>, (role, n)| match best {
            Some((_, best_n)) if best_n >= *n => best,
            _ => Some((*role, *n)),
        })
        .map(|(role, _)| role)
}

/// Pick, ban, presence and win rates for every hero drafted in `dataset`.
///
/// Sorted by presence, then name.
pub fn hero_stats(dataset: &DraftDataset) -> Vec<HeroStat> {
    let total_games = dataset.games.len() as u32;
    let mut tallies: HashMap<HeroId, HeroTally> = HashMap::new();

    for game in &dataset.games {
        for side in [Side::Blue, Side::Red] {
            for (hero_id, role) in &game.lineup(side).picks {
                let tally = tallies.entry(hero_id.clone()).or_default();
                tally.picks += 1;
                match game.won(side) {
                    Some(true) => tally.wins += 1,
                    Some(false) => tally.losses += 1,
                    None => {}
                }
                if let Some(role) = role {
                    *tally.roles.entry(*role).or_default() += 1;
                }
            }
            for hero_id in game.bans(side) {
                tallies.entry(hero_id.clone()).or_default().bans += 1;
            }
        }
    }

    let mut stats: Vec<HeroStat> = tallies
        .into_iter()
        .map(|(hero_id, t)| {
            let decided = t.wins + t.losses;
            let win_rate = percentage(t.wins, decided);
            HeroStat {
                name: dataset.name_of(&hero_id),
                hero_id,
                picks: t.picks,
                bans: t.bans,
                wins: t.wins,
                losses: t.losses,
                pick_rate: percentage(t.picks, total_games),
                ban_rate: percentage(t.bans, total_games),
                presence: percentage(t.picks + t.bans, total_games),
                win_rate,
                tier: (decided > 0).then(|| Tier::from_win_rate(win_rate)),
                primary_role: primary_role(&t.roles),
                roles: t.roles,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.presence
            .partial_cmp(&a.presence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}
