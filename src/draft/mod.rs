//! Draft sequence table and draft validation.
//!
//! Tournament drafts run in two phases with 10 bans and 10 picks in total.
//! Blue has the first ban and the first pick:
//!
//! | Steps | Phase | Sides        | Action |
//! |-------|-------|--------------|--------|
//! | 1–6   | 1     | B R B R B R  | ban    |
//! | 7–12  | 1     | B R R B B R  | pick   |
//! | 13–16 | 2     | R B R B      | ban    |
//! | 17–20 | 2     | R B B R      | pick   |

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DraftAction, DraftPick, HeroId, Role, Side};

pub const DRAFT_LENGTH: usize = 20;
pub const PICKS_PER_SIDE: usize = 5;
pub const BANS_PER_SIDE: usize = 5;

/// One entry of the draft sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DraftStep {
    /// 1-based position in the draft
    pub order: u8,
    pub phase: u8,
    pub side: Side,
    pub action: DraftAction,

    /// Nth ban or pick of this side, 1-based
    pub slot: u8,
}

impl DraftStep {
    /// Short board label, e.g. "B3 pick".
    pub fn label(&self) -> String {
        format!("{}{} {}", self.side.letter(), self.slot, self.action)
    }
}

const fn step(order: u8, phase: u8, side: Side, action: DraftAction, slot: u8) -> DraftStep {
    DraftStep {
        order,
        phase,
        side,
        action,
        slot,
    }
}

use DraftAction::{Ban, Pick};
use Side::{Blue, Red};

pub static DRAFT_SEQUENCE: [DraftStep; DRAFT_LENGTH] = [
    step(1, 1, Blue, Ban, 1),
    step(2, 1, Red, Ban, 1),
    step(3, 1, Blue, Ban, 2),
    step(4, 1, Red, Ban, 2),
    step(5, 1, Blue, Ban, 3),
    step(6, 1, Red, Ban, 3),
    step(7, 1, Blue, Pick, 1),
    step(8, 1, Red, Pick, 1),
    step(9, 1, Red, Pick, 2),
    step(10, 1, Blue, Pick, 2),
    step(11, 1, Blue, Pick, 3),
    step(12, 1, Red, Pick, 3),
    step(13, 2, Red, Ban, 4),
    step(14, 2, Blue, Ban, 4),
    step(15, 2, Red, Ban, 5),
    step(16, 2, Blue, Ban, 5),
    step(17, 2, Red, Pick, 4),
    step(18, 2, Blue, Pick, 4),
    step(19, 2, Blue, Pick, 5),
    step(20, 2, Red, Pick, 5),
];

/// Look up a step by its 1-based order.
pub fn draft_step(order: u8) -> Option<&'static DraftStep> {
    if order == 0 {
        return None;
    }
    DRAFT_SEQUENCE.get(order as usize - 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Draft is already complete")]
    Complete,

    #[error("Hero {0} was already banned")]
    AlreadyBanned(HeroId),

    #[error("Hero {0} was already picked")]
    AlreadyPicked(HeroId),
}

/// Replays a draft one hero at a time, following [`DRAFT_SEQUENCE`].
#[derive(Debug, Clone, Default)]
pub struct DraftBoard {
    bans: Vec<(Side, HeroId)>,
    picks: Vec<(Side, HeroId)>,
}

impl DraftBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps applied so far.
    pub fn len(&self) -> usize {
        self.bans.len() + self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len() == DRAFT_LENGTH
    }

    /// The step the next hero will fill, or `None` once complete.
    pub fn current_step(&self) -> Option<&'static DraftStep> {
        DRAFT_SEQUENCE.get(self.len())
    }

    pub fn is_available(&self, hero_id: &HeroId) -> bool {
        !self.bans.iter().any(|(_, h)| h == hero_id)
            && !self.picks.iter().any(|(_, h)| h == hero_id)
    }

    /// Fill the current step with `hero_id`.
    pub fn apply(&mut self, hero_id: HeroId) -> Result<&'static DraftStep, DraftError> {
        let step = self.current_step().ok_or(DraftError::Complete)?;
        if self.bans.iter().any(|(_, h)| *h == hero_id) {
            return Err(DraftError::AlreadyBanned(hero_id));
        }
        if self.picks.iter().any(|(_, h)| *h == hero_id) {
            return Err(DraftError::AlreadyPicked(hero_id));
        }
        match step.action {
            DraftAction::Ban => self.bans.push((step.side, hero_id)),
            DraftAction::Pick => self.picks.push((step.side, hero_id)),
        }
        Ok(step)
    }

    pub fn banned(&self) -> impl Iterator<Item = &HeroId> {
        self.bans.iter().map(|(_, h)| h)
    }

    pub fn picked(&self, side: Side) -> impl Iterator<Item = &HeroId> {
        self.picks
            .iter()
            .filter(move |(s, _)| *s == side)
            .map(|(_, h)| h)
    }
}

/// A single problem found in a recorded draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftIssue {
    InvalidOrder {
        order: u8,
    },
    DuplicateOrder {
        order: u8,
    },
    SequenceMismatch {
        order: u8,
        expected_side: Side,
        expected_action: DraftAction,
    },
    DuplicateHero {
        hero_id: HeroId,
        orders: Vec<u8>,
    },
    RoleConflict {
        side: Side,
        role: Role,
        hero_ids: Vec<HeroId>,
    },
    RoleOnBan {
        order: u8,
    },
}

/// Result of [`validate_draft`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReport {
    pub issues: Vec<DraftIssue>,

    /// Steps of the sequence with no recorded hero
    pub missing_steps: Vec<u8>,
}

impl DraftReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_steps.is_empty()
    }
}

/// Check a recorded draft against the sequence table.
///
/// Every issue is reported, not only the first. Missing steps are allowed so
/// partial drafts can be saved, but are listed in the report.
pub fn validate_draft(picks: &[DraftPick]) -> DraftReport {
    let mut report = DraftReport::default();
    let mut seen_orders: HashSet<u8> = HashSet::new();

    for pick in picks {
        match draft_step(pick.order) {
            None => {
                report
                    .issues
                    .push(DraftIssue::InvalidOrder { order: pick.order });
                continue;
            }
            Some(step) => {
                if !seen_orders.insert(pick.order) {
                    report
                        .issues
                        .push(DraftIssue::DuplicateOrder { order: pick.order });
                }
                if step.side != pick.side || step.action != pick.action {
                    report.issues.push(DraftIssue::SequenceMismatch {
                        order: pick.order,
                        expected_side: step.side,
                        expected_action: step.action,
                    });
                }
            }
        }
        if pick.action == DraftAction::Ban && pick.role.is_some() {
            report
                .issues
                .push(DraftIssue::RoleOnBan { order: pick.order });
        }
    }

    // A hero may appear once per draft, as a ban or as a pick.
    let mut by_hero: HashMap<&HeroId, Vec<u8>> = HashMap::new();
    for pick in picks {
        by_hero.entry(&pick.hero_id).or_default().push(pick.order);
    }
    let mut duplicates: Vec<DraftIssue> = by_hero
        .into_iter()
        .filter(|(_, orders)| orders.len() > 1)
        .map(|(hero_id, mut orders)| {
            orders.sort_unstable();
            DraftIssue::DuplicateHero {
                hero_id: hero_id.clone(),
                orders,
            }
        })
        .collect();
    duplicates.sort_by_key(|issue| match issue {
        DraftIssue::DuplicateHero { orders, .. } => orders.first().copied().unwrap_or(0),
        _ => 0,
    });
    report.issues.extend(duplicates);

    report.issues.extend(role_conflicts(picks));

    report.missing_steps = DRAFT_SEQUENCE
        .iter()
        .map(|s| s.order)
        .filter(|o| !seen_orders.contains(o))
        .collect();

    report
}

/// Two picks of the same side assigned to the same role.
pub fn role_conflicts(picks: &[DraftPick]) -> Vec<DraftIssue> {
    let mut conflicts = Vec::new();
    for side in [Side::Blue, Side::Red] {
        let mut by_role: HashMap<Role, Vec<HeroId>> = HashMap::new();
        for pick in picks
            .iter()
            .filter(|p| p.side == side && p.action == DraftAction::Pick)
        {
            if let Some(role) = pick.role {
                by_role.entry(role).or_default().push(pick.hero_id.clone());
            }
        }
        for role in Role::ALL {
            if let Some(hero_ids) = by_role.remove(&role) {
                if hero_ids.len() > 1 {
                    conflicts.push(DraftIssue::RoleConflict {
                        side,
                        role,
                        hero_ids,
                    });
                }
            }
        }
    }
    conflicts
}

/// Roles not yet filled by a side's picks.
pub fn open_roles(picks: &[DraftPick], side: Side) -> BTreeSet<Role> {
    let mut open: BTreeSet<Role> = Role::ALL.into_iter().collect();
    for pick in picks
        .iter()
        .filter(|p| p.side == side && p.action == DraftAction::Pick)
    {
        if let Some(role) = pick.role {
            open.remove(&role);
        }
    }
    open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameId;
    use pretty_assertions::assert_eq;

    fn game() -> GameId {
        GameId::from("g1")
    }

    /// A full, valid draft: heroes h1..h20 in sequence order, picks assigned
    /// roles in table order per side.
    fn full_draft() -> Vec<DraftPick> {
        let mut blue_roles = Role::ALL.into_iter();
        let mut red_roles = Role::ALL.into_iter();
        DRAFT_SEQUENCE
            .iter()
            .map(|s| {
                let hero = format!("h{}", s.order).into();
                let pick = DraftPick::new(game(), s.order, s.side, s.action, hero);
                match (s.action, s.side) {
                    (DraftAction::Pick, Side::Blue) => pick.with_role(blue_roles.next().unwrap()),
                    (DraftAction::Pick, Side::Red) => pick.with_role(red_roles.next().unwrap()),
                    _ => pick,
                }
            })
            .collect()
    }

    #[test]
    fn test_sequence_shape() {
        let bans = DRAFT_SEQUENCE.iter().filter(|s| s.action == DraftAction::Ban).count();
        let picks = DRAFT_SEQUENCE.iter().filter(|s| s.action == DraftAction::Pick).count();
        assert_eq!(bans, 10);
        assert_eq!(picks, 10);

        for side in [Side::Blue, Side::Red] {
            let side_picks = DRAFT_SEQUENCE
                .iter()
                .filter(|s| s.side == side && s.action == DraftAction::Pick)
                .count();
            let side_bans = DRAFT_SEQUENCE
                .iter()
                .filter(|s| s.side == side && s.action == DraftAction::Ban)
                .count();
            assert_eq!(side_picks, PICKS_PER_SIDE);
            assert_eq!(side_bans, BANS_PER_SIDE);
        }

        for (i, s) in DRAFT_SEQUENCE.iter().enumerate() {
            assert_eq!(s.order as usize, i + 1);
        }
    }

    #[test]
    fn test_slots_count_up_per_side_and_action() {
        let mut seen: HashMap<(Side, DraftAction), u8> = HashMap::new();
        for s in &DRAFT_SEQUENCE {
            let n = seen.entry((s.side, s.action)).or_insert(0);
            *n += 1;
            assert_eq!(s.slot, *n, "slot mismatch at step {}", s.order);
        }
    }

    #[test]
    fn test_draft_step_lookup() {
        assert!(draft_step(0).is_none());
        assert!(draft_step(21).is_none());
        let first_pick = draft_step(7).unwrap();
        assert_eq!(first_pick.side, Side::Blue);
        assert_eq!(first_pick.action, DraftAction::Pick);
        assert_eq!(first_pick.label(), "B1 pick");
        assert_eq!(draft_step(20).unwrap().label(), "R5 pick");
    }

    #[test]
    fn test_board_follows_sequence() {
        let mut board = DraftBoard::new();
        assert!(board.is_empty());
        for i in 1..=20u8 {
            let step = board.apply(format!("h{}", i).into()).unwrap();
            assert_eq!(step.order, i);
        }
        assert!(board.is_complete());
        assert_eq!(board.current_step(), None);
        assert_eq!(board.banned().count(), 10);
        assert_eq!(board.picked(Side::Blue).count(), 5);
        assert_eq!(board.picked(Side::Red).count(), 5);
        assert_eq!(board.apply("h99".into()), Err(DraftError::Complete));
    }

    #[test]
    fn test_board_rejects_unavailable_heroes() {
        let mut board = DraftBoard::new();
        board.apply("lauriel".into()).unwrap();
        assert!(!board.is_available(&"lauriel".into()));
        assert_eq!(
            board.apply("lauriel".into()),
            Err(DraftError::AlreadyBanned("lauriel".into()))
        );
        // Rejected heroes do not consume a step.
        assert_eq!(board.current_step().unwrap().order, 2);
    }

    #[test]
    fn test_full_draft_is_valid() {
        let report = validate_draft(&full_draft());
        assert!(report.is_valid(), "{:?}", report.issues);
        assert!(report.is_complete());
    }

    #[test]
    fn test_partial_draft_lists_missing_steps() {
        let picks: Vec<DraftPick> = full_draft().into_iter().take(6).collect();
        let report = validate_draft(&picks);
        assert!(report.is_valid());
        assert_eq!(report.missing_steps, (7..=20).collect::<Vec<u8>>());
    }

    #[test]
    fn test_sequence_mismatch_reported() {
        let mut picks = full_draft();
        picks[0].side = Side::Red;
        let report = validate_draft(&picks);
        assert_eq!(
            report.issues,
            vec![DraftIssue::SequenceMismatch {
                order: 1,
                expected_side: Side::Blue,
                expected_action: DraftAction::Ban,
            }]
        );
    }

    #[test]
    fn test_duplicate_hero_reported() {
        let mut picks = full_draft();
        picks[7].hero_id = "h1".into();
        let report = validate_draft(&picks);
        assert_eq!(
            report.issues,
            vec![DraftIssue::DuplicateHero {
                hero_id: "h1".into(),
                orders: vec![1, 8],
            }]
        );
    }

    #[test]
    fn test_invalid_and_duplicate_orders() {
        let picks = vec![
            DraftPick::new(game(), 0, Side::Blue, DraftAction::Ban, "a".into()),
            DraftPick::new(game(), 1, Side::Blue, DraftAction::Ban, "b".into()),
            DraftPick::new(game(), 1, Side::Blue, DraftAction::Ban, "c".into()),
        ];
        let report = validate_draft(&picks);
        assert!(report.issues.contains(&DraftIssue::InvalidOrder { order: 0 }));
        assert!(report.issues.contains(&DraftIssue::DuplicateOrder { order: 1 }));
    }

    #[test]
    fn test_role_conflict_detected() {
        let mut picks = full_draft();
        // Blue's first two picks (steps 7 and 10) both set to jungle.
        picks[6].role = Some(Role::Jungle);
        picks[9].role = Some(Role::Jungle);
        let report = validate_draft(&picks);
        assert_eq!(
            report.issues,
            vec![DraftIssue::RoleConflict {
                side: Side::Blue,
                role: Role::Jungle,
                hero_ids: vec!["h7".into(), "h10".into()],
            }]
        );
    }

    #[test]
    fn test_role_on_ban_reported() {
        let mut picks = full_draft();
        picks[0].role = Some(Role::Mid);
        let report = validate_draft(&picks);
        assert_eq!(report.issues, vec![DraftIssue::RoleOnBan { order: 1 }]);
    }

    #[test]
    fn test_open_roles() {
        let picks = full_draft();
        assert!(open_roles(&picks, Side::Blue).is_empty());

        let first_phase: Vec<DraftPick> = picks.into_iter().take(12).collect();
        let open = open_roles(&first_phase, Side::Red);
        assert_eq!(open.len(), 2);
    }
}
