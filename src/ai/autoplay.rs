//! 自动对局：双方按策略出战术并结算回合，直到分出结果。用于 AI 评测与回放测试。

use serde::{Deserialize, Serialize};

use crate::game::{
    rng::RandomSource,
    rules::{BattleEngine, BattleError},
    state::{BattleAction, BattleResult, BattleState, Side},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReplay {
    pub state: BattleState,
    pub actions: Vec<BattleAction>,
    pub turns_played: u32,
}

impl BattleReplay {
    pub fn result(&self) -> Option<BattleResult> {
        self.state.result
    }
}

/// 玩家一方的出牌策略。
pub type PlayerPolicy<'a> = &'a mut dyn FnMut(&BattleState) -> Option<usize>;

/// 玩家按与敌方相同的启发式出牌。
pub fn mirror_policy(engine: &BattleEngine<'_>, state: &BattleState) -> Option<usize> {
    crate::ai::opponent::select_tactic(engine.catalog(), engine.config(), state, Side::Player)
}

pub fn run_to_completion(
    engine: &BattleEngine<'_>,
    initial: &BattleState,
    rng: &mut dyn RandomSource,
    mut player_policy: Option<PlayerPolicy<'_>>,
) -> Result<BattleReplay, BattleError> {
    let mut state = initial.clone();
    let mut actions = state.opening_actions.clone();
    let mut turns_played = 0;
    let turn_guard = state.max_turns.max(1) + 1;

    while !state.is_finished() && turns_played < turn_guard {
        if let Some(policy) = player_policy.as_deref_mut() {
            if let Some(index) = policy(&state) {
                let resolution = engine.apply_tactic(&state, Side::Player, index)?;
                state = resolution.state;
                actions.extend(resolution.action);
            }
        }
        if let Some(index) = engine.select_ai_tactic(&state) {
            let resolution = engine.apply_tactic(&state, Side::Enemy, index)?;
            state = resolution.state;
            actions.extend(resolution.action);
        }

        let resolution = engine.resolve_turn(&state, Some(&mut *rng))?;
        state = resolution.state;
        actions.extend(resolution.actions);
        turns_played += 1;
    }

    log::debug!(
        "autoplay finished after {} turns with {:?}",
        turns_played,
        state.result
    );
    Ok(BattleReplay {
        state,
        actions,
        turns_played,
    })
}
