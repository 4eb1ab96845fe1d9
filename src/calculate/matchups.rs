use std::collections::HashMap;

use crate::models::{HeroId, LaneMatchupStat, Role, Side};

use super::{percentage, DraftDataset};

/// Observed record of `hero` against the enemy drafted into the same role.
///
/// Picks without an assigned role are skipped. Passing `role` restricts the
/// result to games where `hero` played that role. Sorted by games played.
pub fn lane_matchups(
    dataset: &DraftDataset,
    hero: &HeroId,
    role: Option<Role>,
) -> Vec<LaneMatchupStat> {
    let mut tallies: HashMap<(Role, HeroId), (u32, u32)> = HashMap::new();

    for game in dataset.decided_games() {
        for side in [Side::Blue, Side::Red] {
            let Some(hero_role) = game.lineup(side).role_of(hero) else {
                continue;
            };
            if role.is_some_and(|r| r != hero_role) {
                continue;
            }
            let Some(enemy) = game.lineup(side.opponent()).hero_in(hero_role) else {
                continue;
            };
            let entry = tallies.entry((hero_role, enemy.clone())).or_default();
            entry.0 += 1;
            if game.won(side) == Some(true) {
                entry.1 += 1;
            }
        }
    }

    let mut stats: Vec<LaneMatchupStat> = tallies
        .into_iter()
        .map(|((role, enemy_hero_id), (games, wins))| LaneMatchupStat {
            role,
            enemy_name: dataset.name_of(&enemy_hero_id),
            enemy_hero_id,
            games,
            wins,
            losses: games - wins,
            win_rate: percentage(wins, games),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.games
            .cmp(&a.games)
            .then_with(|| a.role.cmp(&b.role))
            .then_with(|| a.enemy_name.cmp(&b.enemy_name))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{dataset, game};
    use super::*;
    use crate::models::Role::*;

    #[test]
    fn test_lane_matchups_same_role_only() {
        let ds = dataset(vec![
            game(
                "g1",
                "a",
                "b",
                &[("zill", Mid), ("arum", Roam)],
                &[("krixi", Mid), ("yue", Roam)],
                Some(Side::Blue),
            ),
            game("g2", "a", "b", &[("krixi", Mid)], &[("zill", Mid)], Some(Side::Blue)),
            game("g3", "a", "b", &[("zill", Mid)], &[("krixi", Mid)], Some(Side::Red)),
            game("g4", "a", "b", &[("zill", Roam)], &[("yue", Roam)], Some(Side::Blue)),
            game("g5", "a", "b", &[("zill", Mid)], &[("krixi", Mid)], None),
        ]);

        let all = lane_matchups(&ds, &"zill".into(), None);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].enemy_hero_id.as_str(), "krixi");
        assert_eq!(all[0].role, Mid);
        assert_eq!(all[0].games, 3);
        assert_eq!(all[0].wins, 1);
        assert_eq!(all[0].losses, 2);
        assert_eq!(all[0].win_rate, 33.3);

        let roam = lane_matchups(&ds, &"zill".into(), Some(Roam));
        assert_eq!(roam.len(), 1);
        assert_eq!(roam[0].enemy_hero_id.as_str(), "yue");
        assert_eq!(roam[0].win_rate, 100.0);
    }

    #[test]
    fn test_lane_matchups_unknown_hero() {
        let ds = dataset(vec![game(
            "g1",
            "a",
            "b",
            &[("zill", Mid)],
            &[("krixi", Mid)],
            Some(Side::Blue),
        )]);
        assert!(lane_matchups(&ds, &"nobody".into(), None).is_empty());
    }
}
