use thiserror::Error;

use crate::models::{
    ConditionMatch, ConditionRule, Presence, RuleTeam, Side, WinConditionResult,
};

use super::{percentage, DraftDataset, GameView};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("A win condition needs at least one rule")]
    NoRules,
}

/// Whether `rule` holds for `side` as the ally team of `game`.
pub fn rule_holds(game: &GameView, side: Side, rule: &ConditionRule) -> bool {
    let lineup = match rule.team {
        RuleTeam::Ally => game.lineup(side),
        RuleTeam::Enemy => game.lineup(side.opponent()),
    };
    let present = lineup.has(&rule.hero_id, rule.role);
    match rule.presence {
        Presence::Include => present,
        Presence::Exclude => !present,
    }
}

/// Historical record of teams whose draft satisfied every rule.
///
/// Each decided game is checked twice, once with blue as the ally team and
/// once with red.
pub fn evaluate_win_condition(
    dataset: &DraftDataset,
    rules: &[ConditionRule],
) -> Result<WinConditionResult, EvaluationError> {
    if rules.is_empty() {
        return Err(EvaluationError::NoRules);
    }

    let mut games_scanned = 0;
    let mut matches = Vec::new();

    for game in dataset.decided_games() {
        games_scanned += 1;
        for side in [Side::Blue, Side::Red] {
            if rules.iter().all(|rule| rule_holds(game, side, rule)) {
                matches.push(ConditionMatch {
                    game_id: game.game_id.clone(),
                    match_id: game.match_id.clone(),
                    side,
                    team_id: game.team(side).clone(),
                    won: game.won(side) == Some(true),
                });
            }
        }
    }

    let matches_found = matches.len() as u32;
    let wins = matches.iter().filter(|m| m.won).count() as u32;

    Ok(WinConditionResult {
        games_scanned,
        matches_found,
        wins,
        losses: matches_found - wins,
        win_rate: percentage(wins, matches_found),
        matches,
    })
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
                "b",
                "a",
                &[("krixi", Mid), ("arum", Roam)],
                &[("zill", Jungle)],
                Some(Side::Blue),
            ),
            game("g3", "a", "b", &[("zill", Mid)], &[("krixi", Mid)], Some(Side::Red)),
            game("g4", "a", "b", &[("zill", Mid)], &[], None),
        ])
    }

    #[test]
    fn test_empty_rules_rejected() {
        assert_eq!(
            evaluate_win_condition(&sample(), &[]).unwrap_err(),
            EvaluationError::NoRules
        );
    }

    #[test]
    fn test_include_any_role() {
        let result =
            evaluate_win_condition(&sample(), &[ConditionRule::include("zill".into(), None)])
                .unwrap();
        assert_eq!(result.games_scanned, 3);
        assert_eq!(result.matches_found, 3);
        assert_eq!(result.wins, 1);
        assert_eq!(result.losses, 2);
        assert_eq!(result.win_rate, 33.3);
    }

    #[test]
    fn test_include_specific_role() {
        let result = evaluate_win_condition(
            &sample(),
            &[ConditionRule::include("zill".into(), Some(Jungle))],
        )
        .unwrap();
        assert_eq!(result.matches_found, 1);
        assert_eq!(result.matches[0].game_id.as_str(), "g2");
        assert_eq!(result.matches[0].side, Side::Red);
        assert_eq!(result.matches[0].team_id.as_str(), "a");
        assert!(!result.matches[0].won);
    }

    #[test]
    fn test_exclude_and_enemy_rules() {
        // Zill on our side, no Arum with us, Krixi on the enemy side.
        let rules = vec![
            ConditionRule::include("zill".into(), None),
            ConditionRule::exclude("arum".into(), None),
            ConditionRule::include("krixi".into(), Some(Mid)).against(),
        ];
        let result = evaluate_win_condition(&sample(), &rules).unwrap();
        let games: Vec<&str> = result.matches.iter().map(|m| m.game_id.as_str()).collect();
        assert_eq!(games, vec!["g2", "g3"]);
        assert_eq!(result.wins, 0);
        assert_eq!(result.win_rate, 0.0);
    }

    #[test]
    fn test_no_matches() {
        let result =
            evaluate_win_condition(&sample(), &[ConditionRule::include("valhein".into(), None)])
                .unwrap();
        assert_eq!(result.matches_found, 0);
        assert_eq!(result.win_rate, 0.0);
    }
}
