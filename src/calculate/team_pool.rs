use std::collections::{BTreeMap, HashMap};

use crate::models::{BanCount, HeroId, PoolHero, Role, Side, SideRecord, TeamId, TeamPool};

use super::{percentage, DraftDataset};

#[derive(Default)]
struct PoolTally {
    picks: u32,
    decided: u32,
    wins: u32,
    roles: BTreeMap<Role, u32>,
}

fn ban_counts(dataset: &DraftDataset, counts: HashMap<HeroId, u32>) -> Vec<BanCount> {
    let mut bans: Vec<BanCount> = counts
        .into_iter()
        .map(|(hero_id, count)| BanCount {
            name: dataset.name_of(&hero_id),
            hero_id,
            count,
        })
        .collect();
    bans.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    bans
}

/// Heroes a team has drafted and banned, with its blue/red side record.
///
/// Pick counts include undecided games; wins and win rates only use games
/// with a result.
pub fn team_pool(dataset: &DraftDataset, team_id: &TeamId) -> TeamPool {
    let mut heroes: HashMap<HeroId, PoolTally> = HashMap::new();
    let mut bans_by: HashMap<HeroId, u32> = HashMap::new();
    let mut bans_against: HashMap<HeroId, u32> = HashMap::new();
    let mut blue = SideRecord::default();
    let mut red = SideRecord::default();

    for game in &dataset.games {
        let Some(side) = game.side_of(team_id) else {
            continue;
        };
        let won = game.won(side);

        let record = match side {
            Side::Blue => &mut blue,
            Side::Red => &mut red,
        };
        if won.is_some() {
            record.games += 1;
        }
        if won == Some(true) {
            record.wins += 1;
        }

        for (hero_id, role) in &game.lineup(side).picks {
            let tally = heroes.entry(hero_id.clone()).or_default();
            tally.picks += 1;
            if won.is_some() {
                tally.decided += 1;
            }
            if won == Some(true) {
                tally.wins += 1;
            }
            if let Some(role) = role {
                *tally.roles.entry(*role).or_default() += 1;
            }
        }
        for hero_id in game.bans(side) {
            *bans_by.entry(hero_id.clone()).or_default() += 1;
        }
        for hero_id in game.bans(side.opponent()) {
            *bans_against.entry(hero_id.clone()).or_default() += 1;
        }
    }

    blue.win_rate = percentage(blue.wins, blue.games);
    red.win_rate = percentage(red.wins, red.games);
    let games = blue.games + red.games;
    let wins = blue.wins + red.wins;

    let mut pool: Vec<PoolHero> = heroes
        .into_iter()
        .map(|(hero_id, t)| PoolHero {
            name: dataset.name_of(&hero_id),
            hero_id,
            picks: t.picks,
            wins: t.wins,
            win_rate: percentage(t.wins, t.decided),
            roles: t.roles,
        })
        .collect();
    pool.sort_by(|a, b| b.picks.cmp(&a.picks).then_with(|| a.name.cmp(&b.name)));

    TeamPool {
        team_id: team_id.clone(),
        games,
        wins,
        win_rate: percentage(wins, games),
        blue,
        red,
        heroes: pool,
        bans_by_team: ban_counts(dataset, bans_by),
        bans_against_team: ban_counts(dataset, bans_against),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{dataset, game};
    use super::*;
    use crate::models::Role::*;

    #[test]
    fn test_team_pool() {
        let mut g1 = game(
            "g1",
            "bac",
            "fw",
            &[("zill", Mid), ("arum", Roam)],
            &[("krixi", Mid)],
            Some(Side::Blue),
        );
        g1.blue_bans = vec!["lauriel".into()];
        g1.red_bans = vec!["yue".into()];
        let mut g2 = game("g2", "fw", "bac", &[("krixi", Mid)], &[("zill", Mid)], Some(Side::Blue));
        g2.red_bans = vec!["lauriel".into()];
        let g3 = game("g3", "other", "fw", &[("zill", Mid)], &[], Some(Side::Blue));

        let pool = team_pool(&dataset(vec![g1, g2, g3]), &"bac".into());

        assert_eq!(pool.games, 2);
        assert_eq!(pool.wins, 1);
        assert_eq!(pool.win_rate, 50.0);
        assert_eq!(pool.blue.games, 1);
        assert_eq!(pool.blue.win_rate, 100.0);
        assert_eq!(pool.red.games, 1);
        assert_eq!(pool.red.wins, 0);

        assert_eq!(pool.heroes[0].hero_id.as_str(), "zill");
        assert_eq!(pool.heroes[0].picks, 2);
        assert_eq!(pool.heroes[0].wins, 1);
        assert_eq!(pool.heroes[0].win_rate, 50.0);
        assert_eq!(pool.heroes[0].roles.get(&Mid), Some(&2));

        assert_eq!(pool.bans_by_team.len(), 1);
        assert_eq!(pool.bans_by_team[0].hero_id.as_str(), "lauriel");
        assert_eq!(pool.bans_by_team[0].count, 2);
        assert_eq!(pool.bans_against_team[0].hero_id.as_str(), "yue");
    }

    #[test]
    fn test_team_pool_no_games() {
        let pool = team_pool(&dataset(vec![]), &"bac".into());
        assert_eq!(pool.games, 0);
        assert_eq!(pool.win_rate, 0.0);
        assert!(pool.heroes.is_empty());
    }
}
