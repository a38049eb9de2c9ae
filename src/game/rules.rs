use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    catalog::{standard_catalog, Catalog, StrikeTrait, TacticCard, WarriorCard},
    config::BattleConfig,
    rng::{with_source, RandomSource},
    setup::{self, OwnedCard, PlayerDeck},
    skills, tactics,
    state::{
        ActionKind, BattleAction, BattlePhase, BattleResult, BattleState, BattleWarrior,
        CardId, CombatEvent, CombatEventKind, IntegrityError, Lane, Side, StatusKind, TeamState,
    },
};
use crate::ai::opponent;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum BattleError {
    #[error("catalog has no entry for card `{card_id}`")]
    CatalogEntryMissing { card_id: CardId },
    #[error("battle state failed integrity check: {error:?}")]
    IntegrityViolation { error: IntegrityError },
    #[error("invalid battle config: {reason}")]
    InvalidConfig { reason: String },
}

pub fn lookup_warrior<'c>(
    catalog: &'c dyn Catalog,
    card_id: &str,
) -> Result<&'c WarriorCard, BattleError> {
    catalog
        .warrior(card_id)
        .ok_or_else(|| BattleError::CatalogEntryMissing {
            card_id: card_id.to_string(),
        })
}

pub fn lookup_tactic<'c>(
    catalog: &'c dyn Catalog,
    card_id: &str,
) -> Result<&'c TacticCard, BattleError> {
    catalog
        .tactic(card_id)
        .ok_or_else(|| BattleError::CatalogEntryMissing {
            card_id: card_id.to_string(),
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticResolution {
    pub state: BattleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<BattleAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResolution {
    pub state: BattleState,
    pub actions: Vec<BattleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BattleResult>,
}

impl TurnResolution {
    pub fn new(state: BattleState, actions: Vec<BattleAction>) -> Self {
        let result = state.result;
        Self {
            state,
            actions,
            result,
        }
    }
}

/// 战斗引擎：持有只读目录与配置，所有操作都不修改传入的状态。
pub struct BattleEngine<'c> {
    catalog: &'c dyn Catalog,
    config: BattleConfig,
}

impl BattleEngine<'static> {
    /// 标准目录 + 默认配置。
    pub fn standard() -> Self {
        Self::new(standard_catalog(), BattleConfig::default())
    }
}

impl<'c> BattleEngine<'c> {
    pub fn new(catalog: &'c dyn Catalog, config: BattleConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'c dyn Catalog {
        self.catalog
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    fn ensure_integrity(state: &BattleState) -> Result<(), BattleError> {
        state.integrity_check().map_err(|error| {
            log::warn!("rejecting battle state: {error:?}");
            BattleError::IntegrityViolation { error }
        })
    }

    pub fn initialize(
        &self,
        deck: &PlayerDeck,
        inventory: &[OwnedCard],
        win_count: u32,
        rng: Option<&mut dyn RandomSource>,
    ) -> Result<BattleState, BattleError> {
        with_source(rng, |rng| {
            setup::initialize(self.catalog, &self.config, deck, inventory, win_count, rng)
        })
    }

    pub fn apply_tactic(
        &self,
        state: &BattleState,
        side: Side,
        tactic_index: usize,
    ) -> Result<TacticResolution, BattleError> {
        Self::ensure_integrity(state)?;
        let mut next = state.clone();
        let action = tactics::apply_tactic(self.catalog, &mut next, side, tactic_index)?;
        if action.is_none() {
            return Ok(TacticResolution {
                state: state.clone(),
                action,
            });
        }
        Ok(TacticResolution {
            state: next,
            action,
        })
    }

    /// 敌方本回合要打出的战术下标，纯查询。
    pub fn select_ai_tactic(&self, state: &BattleState) -> Option<usize> {
        opponent::select_tactic(self.catalog, &self.config, state, Side::Enemy)
    }

    pub fn resolve_turn(
        &self,
        state: &BattleState,
        rng: Option<&mut dyn RandomSource>,
    ) -> Result<TurnResolution, BattleError> {
        if state.is_finished() {
            return Ok(TurnResolution::new(state.clone(), Vec::new()));
        }
        Self::ensure_integrity(state)?;

        let mut next = state.clone();
        let mut actions = Vec::new();

        if let Some(result) = roster_outcome(&next) {
            finish(&mut next, result, "a roster was empty before combat", None, &mut actions);
            return Ok(TurnResolution::new(next, actions));
        }

        with_source(rng, |rng| self.run_turn(&mut next, rng, &mut actions))?;
        Ok(TurnResolution::new(next, actions))
    }

    fn run_turn(
        &self,
        state: &mut BattleState,
        rng: &mut dyn RandomSource,
        actions: &mut Vec<BattleAction>,
    ) -> Result<(), BattleError> {
        let mut start = BattleAction::new(ActionKind::TurnStart, state.turn);
        start.push_log(format!("-- Turn {} --", state.turn));
        state.record(start, actions);

        let hp_before = state
            .tactic_phase_hp
            .unwrap_or_else(|| state.hp_totals());

        for side in Side::ORDER {
            skills::run_passives(self.catalog, state, side, actions)?;
        }
        for side in Side::ORDER {
            skills::run_actives(self.catalog, state, side, rng, actions)?;
        }
        for side in Side::ORDER {
            skills::run_ultimates(self.catalog, &self.config, state, side, actions)?;
        }

        for lane in Lane::ORDER {
            for side in Side::ORDER {
                self.resolve_attack(state, side, lane, actions)?;
            }
        }

        for side in Side::ORDER {
            for warrior in &mut state.team_mut(side).warriors {
                warrior.decay_statuses();
            }
        }
        for side in Side::ORDER {
            skills::run_upkeep(self.catalog, state, side, actions)?;
        }

        if let Some(result) = roster_outcome(state) {
            finish(state, result, "a roster was wiped out", None, actions);
            return Ok(());
        }

        let hp_after = state.hp_totals();
        if hp_after == hp_before {
            state.stalemate_turns += 1;
        } else {
            state.stalemate_turns = 0;
        }

        if state.stalemate_turns >= self.config.stalemate_limit {
            let reason = format!("no HP changed for {} turns", state.stalemate_turns);
            finish(state, BattleResult::Draw, &reason, None, actions);
        } else if state.turn >= state.max_turns {
            let hint = hp_hint(state);
            finish(state, BattleResult::Draw, "turn limit reached", Some(hint), actions);
        } else {
            let mut end = BattleAction::new(ActionKind::TurnEnd, state.turn);
            end.push_log(format!("Turn {} ends", state.turn));
            state.record(end, actions);
            state.turn += 1;
            state.phase = BattlePhase::Tactic;
            state.player.selected_tactic = None;
            state.enemy.selected_tactic = None;
            state.mark_tactic_phase();
        }
        Ok(())
    }

    fn resolve_attack(
        &self,
        state: &mut BattleState,
        side: Side,
        lane: Lane,
        actions: &mut Vec<BattleAction>,
    ) -> Result<(), BattleError> {
        let Some(idx) = state.team(side).index_in_lane(lane) else {
            return Ok(());
        };
        let attacker = state.team(side).warriors[idx].clone();
        let enemy_side = side.opponent();
        if !attacker.is_alive || !state.team(enemy_side).has_living() {
            return Ok(());
        }

        if attacker.has_status(StatusKind::Stun) {
            let mut skip = BattleAction::new(ActionKind::StunSkip, state.turn)
                .by(side, attacker.instance_id.clone());
            skip.push_log(format!("{} is stunned and cannot act", attacker.name));
            state.record(skip, actions);
            return Ok(());
        }
        if state.turn == 1
            && lane == Lane::Front
            && state.field_event.effect.blocks_front_on_opening()
        {
            let mut skip = BattleAction::new(ActionKind::ForcedSkip, state.turn)
                .by(side, attacker.instance_id.clone());
            skip.push_log(format!(
                "{} cannot find a target in the {}",
                attacker.name, state.field_event.name
            ));
            state.record(skip, actions);
            return Ok(());
        }

        let card = lookup_warrior(self.catalog, &attacker.card_id)?;
        let Some(target) = select_target(state.team(enemy_side), &attacker) else {
            return Ok(());
        };

        let mut action =
            BattleAction::new(ActionKind::Attack, state.turn).by(side, attacker.instance_id.clone());
        let mut power = attacker.effective_attack();
        if state.turn == 1 {
            for strike in card.strike_traits() {
                if let StrikeTrait::Vanguard { bonus } = strike {
                    power += bonus;
                    action.push_log(format!("{} leads the charge (+{})", attacker.name, bonus));
                }
            }
        }
        let defense = state.team(enemy_side).warriors[target].effective_defense();
        let damage = if card.is_piercing() {
            power.max(1)
        } else {
            (power - defense).max(1)
        };

        let landed = land_hit(state, enemy_side, target, damage, &attacker.name, &mut action);
        if landed {
            for strike in card.strike_traits() {
                if let StrikeTrait::Cleave { splash_pct } = strike {
                    let target_lane = state.team(enemy_side).warriors[target].lane;
                    if let Some(splash_idx) = adjacent_living(state.team(enemy_side), target_lane) {
                        let splash = (damage * *splash_pct as i32 / 100).max(1);
                        land_hit(state, enemy_side, splash_idx, splash, &attacker.name, &mut action);
                    }
                }
            }
        }
        state.record(action, actions);
        Ok(())
    }
}

/// 索敌：嘲讽 → 背袭取最后排 → 同路 → 首个存活。
fn select_target(enemies: &TeamState, attacker: &BattleWarrior) -> Option<usize> {
    let taunting = Lane::ORDER.iter().find_map(|lane| {
        enemies.index_in_lane(*lane).filter(|idx| {
            let enemy = &enemies.warriors[*idx];
            enemy.is_alive && enemy.has_status(StatusKind::Taunt)
        })
    });
    if taunting.is_some() {
        return taunting;
    }
    if attacker.has_status(StatusKind::BackAttack) {
        return enemies.last_living();
    }
    enemies
        .index_in_lane(attacker.lane)
        .filter(|idx| enemies.warriors[*idx].is_alive)
        .or_else(|| enemies.first_living())
}

fn adjacent_living(team: &TeamState, lane: Lane) -> Option<usize> {
    Lane::ORDER
        .iter()
        .filter(|other| other.index().abs_diff(lane.index()) == 1)
        .find_map(|other| team.index_in_lane(*other).filter(|idx| team.warriors[*idx].is_alive))
}

/// 闪避与护盾各抵挡一次普通攻击，被消耗后移除。
fn land_hit(
    state: &mut BattleState,
    side: Side,
    idx: usize,
    amount: i32,
    attacker_name: &str,
    action: &mut BattleAction,
) -> bool {
    let defender = state.warrior_mut(side, idx);
    if defender.take_status(StatusKind::Evasion).is_some() {
        action.push_event(CombatEvent::new(
            CombatEventKind::Miss,
            defender.instance_id.clone(),
            0,
        ));
        action.push_log(format!("{} evades {}'s attack", defender.name, attacker_name));
        return false;
    }
    if defender.take_status(StatusKind::Shield).is_some() {
        action.push_event(CombatEvent::new(
            CombatEventKind::Miss,
            defender.instance_id.clone(),
            0,
        ));
        action.push_log(format!("{}'s guard absorbs {}'s blow", defender.name, attacker_name));
        return false;
    }
    let shown = amount.min(defender.current_hp);
    action.push_log(format!("{} hits {} for {}", attacker_name, defender.name, shown));
    state.damage_warrior(side, idx, amount, action);
    true
}

fn roster_outcome(state: &BattleState) -> Option<BattleResult> {
    if !state.enemy.has_living() {
        Some(BattleResult::Win)
    } else if !state.player.has_living() {
        Some(BattleResult::Lose)
    } else {
        None
    }
}

fn hp_hint(state: &BattleState) -> String {
    let player = state.player.total_hp();
    let enemy = state.enemy.total_hp();
    let leader = if player > enemy {
        "Player had the upper hand"
    } else if enemy > player {
        "Enemy had the upper hand"
    } else {
        "Both sides were evenly matched"
    };
    format!("Time is up. {leader} (HP {player} vs {enemy})")
}

fn finish(
    state: &mut BattleState,
    result: BattleResult,
    reason: &str,
    hint: Option<String>,
    actions: &mut Vec<BattleAction>,
) {
    state.result = Some(result);
    state.phase = BattlePhase::Result;
    let mut end = BattleAction::new(ActionKind::TurnEnd, state.turn);
    if let Some(hint) = hint {
        end.push_log(hint);
    }
    end.push_log(match result {
        BattleResult::Win => "Victory!".to_string(),
        BattleResult::Lose => "Defeat...".to_string(),
        BattleResult::Draw => format!("Draw: {reason}"),
    });
    state.record(end, actions);
    log::info!("battle finished on turn {}: {:?} ({})", state.turn, result, reason);
}
