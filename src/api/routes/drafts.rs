//! Draft sequence lookup and dry-run validation for the recording form.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::draft::{draft_step, validate_draft, DraftReport, DraftStep, DRAFT_SEQUENCE};
use crate::models::{DraftAction, DraftPick, EntityId, GameId, HeroId, PlayerId, Role, Side};

/// One draft slot as submitted by the form.
///
/// `side` and `action` may be left out; they are then taken from the
/// sequence table for `order`.
#[derive(Debug, Clone, Deserialize)]
pub struct PickInput {
    pub order: u8,
    pub side: Option<Side>,
    pub action: Option<DraftAction>,
    pub hero_id: HeroId,
    pub role: Option<Role>,
    pub player_id: Option<PlayerId>,
}

impl PickInput {
    pub fn into_pick(self, game_id: &GameId) -> DraftPick {
        let step = draft_step(self.order);
        let side = self.side.or(step.map(|s| s.side)).unwrap_or(Side::Blue);
        let action = self
            .action
            .or(step.map(|s| s.action))
            .unwrap_or(DraftAction::Ban);

        let mut pick = DraftPick::new(game_id.clone(), self.order, side, action, self.hero_id);
        pick.role = self.role;
        pick.player_id = self.player_id;
        pick
    }
}

pub fn into_picks(inputs: Vec<PickInput>, game_id: &GameId) -> Vec<DraftPick> {
    let mut picks: Vec<DraftPick> = inputs.into_iter().map(|p| p.into_pick(game_id)).collect();
    picks.sort_by_key(|p| p.order);
    picks
}

/// First unfilled step of a partial draft.
pub fn next_step(report: &DraftReport) -> Option<DraftStep> {
    report
        .missing_steps
        .first()
        .and_then(|order| draft_step(*order))
        .copied()
}

#[derive(Debug, Serialize)]
pub struct SequenceResponse {
    pub steps: Vec<SequenceStep>,
}

#[derive(Debug, Serialize)]
pub struct SequenceStep {
    #[serde(flatten)]
    pub step: DraftStep,
    pub label: String,
}

pub async fn sequence() -> Json<SequenceResponse> {
    let steps = DRAFT_SEQUENCE
        .iter()
        .map(|step| SequenceStep {
            step: *step,
            label: step.label(),
        })
        .collect();
    Json(SequenceResponse { steps })
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub picks: Vec<PickInput>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub complete: bool,
    pub report: DraftReport,
    pub next_step: Option<DraftStep>,
}

/// Check a draft without saving it. Always 200; problems are in the body.
pub async fn validate(
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let scratch = EntityId::from("draft-preview");
    let picks = into_picks(request.picks, &scratch);
    let report = validate_draft(&picks);

    Ok(Json(ValidateResponse {
        valid: report.is_valid(),
        complete: report.is_complete(),
        next_step: next_step(&report),
        report,
    }))
}
