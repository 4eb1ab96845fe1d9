//! Duo synergy and stored combo results.

use std::collections::HashMap;

use crate::models::{ComboStat, DuoSynergy, HeroCombo, HeroId, Side};

use super::{percentage, round1, DraftDataset};

#[derive(Debug, Default, Clone, Copy)]
struct Record {
    games: u32,
    wins: u32,
}

impl Record {
    fn add(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }

    fn win_rate(&self) -> f64 {
        percentage(self.wins, self.games)
    }
}

fn ordered(a: &HeroId, b: &HeroId) -> (HeroId, HeroId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Synergy of every pair of heroes drafted on the same side.
///
/// Only decided games count. Pairs with fewer than `min_games` games are
/// dropped; with `hero` set, only pairs containing that hero are kept.
/// Sorted by synergy, then games.
pub fn duo_synergy(
    dataset: &DraftDataset,
    min_games: u32,
    hero: Option<&HeroId>,
) -> Vec<DuoSynergy> {
    let mut solo: HashMap<HeroId, Record> = HashMap::new();
    let mut duos: HashMap<(HeroId, HeroId), Record> = HashMap::new();

    for game in dataset.decided_games() {
        for side in [Side::Blue, Side::Red] {
            let won = game.won(side).unwrap_or(false);
            let heroes: Vec<&HeroId> = game.lineup(side).heroes().collect();
            for h in &heroes {
                solo.entry((*h).clone()).or_default().add(won);
            }
            for i in 0..heroes.len() {
                for j in (i + 1)..heroes.len() {
                    if heroes[i] == heroes[j] {
                        continue;
                    }
                    duos.entry(ordered(heroes[i], heroes[j]))
                        .or_default()
                        .add(won);
                }
            }
        }
    }

    let mut results: Vec<DuoSynergy> = duos
        .into_iter()
        .filter(|(_, r)| r.games >= min_games)
        .filter(|((a, b), _)| hero.map_or(true, |h| h == a || h == b))
        .map(|((a, b), r)| {
            let wr_a = solo.get(&a).map(Record::win_rate).unwrap_or(0.0);
            let wr_b = solo.get(&b).map(Record::win_rate).unwrap_or(0.0);
            let win_rate = r.win_rate();
            DuoSynergy {
                hero_a_name: dataset.name_of(&a),
                hero_b_name: dataset.name_of(&b),
                hero_a_id: a,
                hero_b_id: b,
                games: r.games,
                wins: r.wins,
                win_rate,
                hero_a_win_rate: wr_a,
                hero_b_win_rate: wr_b,
                synergy: round1(win_rate - (wr_a + wr_b) / 2.0),
            }
        })
        .collect();

    results.sort_by(|x, y| {
        y.synergy
            .partial_cmp(&x.synergy)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| y.games.cmp(&x.games))
            .then_with(|| x.hero_a_name.cmp(&y.hero_a_name))
            .then_with(|| x.hero_b_name.cmp(&y.hero_b_name))
    });
    results
}

/// Co-occurrence results for each stored combo. A combo tied to a version
/// only counts games from that version.
pub fn combo_stats(dataset: &DraftDataset, combos: &[HeroCombo]) -> Vec<ComboStat> {
    combos
        .iter()
        .map(|combo| {
            let mut record = Record::default();
            for game in dataset.decided_games() {
                if combo.version_id.is_some() && game.version_id != combo.version_id {
                    continue;
                }
                for side in [Side::Blue, Side::Red] {
                    let lineup = game.lineup(side);
                    if lineup.has(&combo.hero_a_id, None) && lineup.has(&combo.hero_b_id, None) {
                        record.add(game.won(side).unwrap_or(false));
                    }
                }
            }
            ComboStat {
                combo_id: combo.id.to_string(),
                name: combo.name.clone(),
                hero_a_id: combo.hero_a_id.clone(),
                hero_a_name: dataset.name_of(&combo.hero_a_id),
                hero_b_id: combo.hero_b_id.clone(),
                hero_b_name: dataset.name_of(&combo.hero_b_id),
                games: record.games,
                wins: record.wins,
                win_rate: record.win_rate(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{dataset, game};
    use super::*;
    use crate::models::Role::*;

    fn sample() -> DraftDataset {
        dataset(vec![
            game(
                "g1",
                "a",
                "b",
                &[("zill", Mid), ("arum", Roam)],
                &[("krixi", Mid), ("yue", Roam)],
                Some(Side::Blue),
            ),
            game(
                "g2",
                "a",
                "b",
                &[("zill", Mid), ("arum", Roam)],
                &[("krixi", Mid), ("yue", Roam)],
                Some(Side::Blue),
            ),
            game(
                "g3",
                "a",
                "b",
                &[("zill", Mid), ("yue", Roam)],
                &[("krixi", Mid), ("arum", Roam)],
                Some(Side::Red),
            ),
            game("g4", "a", "b", &[("zill", Mid), ("arum", Roam)], &[], None),
        ])
    }

    #[test]
    fn test_duo_synergy_counts_decided_games_only() {
        let duos = duo_synergy(&sample(), 1, None);
        let za = duos
            .iter()
            .find(|d| d.hero_a_id.as_str() == "arum" && d.hero_b_id.as_str() == "zill")
            .unwrap();
        assert_eq!(za.games, 2);
        assert_eq!(za.wins, 2);
        assert_eq!(za.win_rate, 100.0);
        // zill 2/3, arum 3/3
        assert_eq!(za.hero_a_win_rate, 100.0);
        assert_eq!(za.hero_b_win_rate, 66.7);
        assert_eq!(za.synergy, round1(100.0 - (100.0 + 66.7) / 2.0));
    }

    #[test]
    fn test_duo_synergy_min_games_and_hero_filter() {
        let ds = sample();
        let duos = duo_synergy(&ds, 2, None);
        assert!(duos.iter().all(|d| d.games >= 2));
        assert_eq!(duos.len(), 2); // arum+zill and krixi+yue

        let with_yue = duo_synergy(&ds, 1, Some(&"yue".into()));
        assert!(!with_yue.is_empty());
        assert!(with_yue
            .iter()
            .all(|d| d.hero_a_id.as_str() == "yue" || d.hero_b_id.as_str() == "yue"));
    }

    #[test]
    fn test_duo_synergy_sorted_desc() {
        let duos = duo_synergy(&sample(), 1, None);
        for pair in duos.windows(2) {
            assert!(pair[0].synergy >= pair[1].synergy);
        }
    }

    #[test]
    fn test_combo_stats() {
        let combo = HeroCombo::new("zill".into(), "arum".into());
        let stats = combo_stats(&sample(), &[combo]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].games, 2);
        assert_eq!(stats[0].wins, 2);
        assert_eq!(stats[0].win_rate, 100.0);

        let mut versioned = HeroCombo::new("zill".into(), "arum".into());
        versioned.version_id = Some("v9".into());
        let stats = combo_stats(&sample(), &[versioned]);
        assert_eq!(stats[0].games, 0);
        assert_eq!(stats[0].win_rate, 0.0);
    }
}
