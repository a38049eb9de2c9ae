//! 战术卡结算：无效化 → 天气 → 效果 → 反击。

use super::catalog::{Catalog, TacticCard, TacticKind};
use super::rules::{lookup_tactic, BattleError};
use super::state::{
    level_growth, ActionKind, BattleAction, BattleState, CombatEvent, CombatEventKind, Side,
    StatusEffect, StatusKind,
};

/// 在工作副本上结算 `side` 的第 `idx` 张战术。
///
/// 越界、已使用、已布置或战斗已结束时不做任何修改，返回 `Ok(None)`。
pub fn apply_tactic(
    catalog: &dyn Catalog,
    state: &mut BattleState,
    side: Side,
    idx: usize,
) -> Result<Option<BattleAction>, BattleError> {
    if state.is_finished() {
        return Ok(None);
    }
    let Some(tactic) = state.team(side).tactics.get(idx).cloned() else {
        return Ok(None);
    };
    if !tactic.is_available() {
        return Ok(None);
    }
    let card = lookup_tactic(catalog, &tactic.card_id)?;

    let mut action = BattleAction::new(ActionKind::TacticUse, state.turn)
        .by(side, tactic.instance_id.clone());
    state.team_mut(side).selected_tactic = Some(idx);
    action.push_log(format!("{} plays {}", side.label(), card.name));

    if let Some(holder) = nullifier(state, side.opponent()) {
        consume(state, side, idx);
        let warrior = state.warrior_mut(side.opponent(), holder);
        warrior.clear_status(StatusKind::TacticNullify);
        action.push_event(CombatEvent::new(
            CombatEventKind::Skill,
            warrior.instance_id.clone(),
            0,
        ));
        action.push_log(format!(
            "{} was nullified by {}'s aura",
            card.name, warrior.name
        ));
        state.log.extend(action.logs.iter().cloned());
        return Ok(Some(action));
    }

    if card.kind.is_fire() && state.field_event.effect.disables_fire() {
        consume(state, side, idx);
        action.push_log(format!(
            "{} was nullified by weather ({})",
            card.name, state.field_event.name
        ));
        state.log.extend(action.logs.iter().cloned());
        return Ok(Some(action));
    }

    if card.kind.is_counter() {
        state.team_mut(side).tactics[idx].armed = true;
        action.push_log(format!("{} takes up a counter stance", side.label()));
        state.log.extend(action.logs.iter().cloned());
        return Ok(Some(action));
    }

    consume(state, side, idx);
    resolve_effect(state, side, card, tactic.level, &mut action);
    reflect_counter(catalog, state, side, &mut action)?;

    state.log.extend(action.logs.iter().cloned());
    log::debug!(
        "turn {}: {} resolved {} ({} events)",
        state.turn,
        side.label(),
        card.id,
        action.events.len()
    );
    Ok(Some(action))
}

fn consume(state: &mut BattleState, side: Side, idx: usize) {
    let tactic = &mut state.team_mut(side).tactics[idx];
    tactic.used = true;
    tactic.armed = false;
}

fn nullifier(state: &BattleState, side: Side) -> Option<usize> {
    state
        .team(side)
        .warriors
        .iter()
        .position(|warrior| warrior.is_alive && warrior.has_status(StatusKind::TacticNullify))
}

fn resolve_effect(
    state: &mut BattleState,
    side: Side,
    card: &TacticCard,
    level: u32,
    action: &mut BattleAction,
) {
    let growth = level_growth(level);
    let enemy_side = side.opponent();
    match card.kind {
        TacticKind::FireAttack { base } => {
            let amount = base + growth + state.field_event.effect.fire_bonus();
            for target in state.team(enemy_side).living_indices() {
                state.damage_warrior(enemy_side, target, amount, action);
            }
        }
        TacticKind::Smokescreen { turns } => {
            let turns = turns + growth / 5;
            for ally in state.team(side).living_indices() {
                let warrior = state.warrior_mut(side, ally);
                warrior.refresh_status(StatusEffect::new(StatusKind::Evasion, 1, turns));
                action.push_event(CombatEvent::new(
                    CombatEventKind::Skill,
                    warrior.instance_id.clone(),
                    turns,
                ));
            }
            action.push_log(format!("{} vanishes into smoke", side.label()));
        }
        TacticKind::Ambush { turns } => {
            if let Some(target) = state.team(enemy_side).first_living() {
                let turns = turns + growth / 6;
                let enemy = state.warrior_mut(enemy_side, target);
                enemy.refresh_status(StatusEffect::new(StatusKind::Stun, 1, turns));
                action.push_event(CombatEvent::new(
                    CombatEventKind::Skill,
                    enemy.instance_id.clone(),
                    turns,
                ));
                action.push_log(format!("{} is ambushed and stunned", enemy.name));
            }
        }
        TacticKind::Provoke { turns } => {
            if let Some(target) = state.team(side).first_living() {
                let turns = turns + growth / 4;
                let ally = state.warrior_mut(side, target);
                ally.refresh_status(StatusEffect::new(StatusKind::Taunt, 1, turns));
                action.push_event(CombatEvent::new(
                    CombatEventKind::Skill,
                    ally.instance_id.clone(),
                    turns,
                ));
                action.push_log(format!("{} draws the enemy's attention", ally.name));
            }
        }
        TacticKind::FieldMedic { base } => {
            if let Some(target) = state.team(side).lowest_hp_ratio() {
                let restored = state.heal_warrior(side, target, base + growth, action);
                let name = state.team(side).warriors[target].name.clone();
                action.push_log(format!("{name} recovers {restored} HP"));
            }
        }
        TacticKind::WarCry { bonus, turns } => {
            if let Some(target) = state.team(side).first_living() {
                let bonus = bonus + growth;
                let turns = turns + growth / 5;
                let ally = state.warrior_mut(side, target);
                ally.refresh_status(StatusEffect::new(StatusKind::AttackUp, bonus, turns));
                action.push_event(CombatEvent::new(
                    CombatEventKind::Skill,
                    ally.instance_id.clone(),
                    bonus,
                ));
                action.push_log(format!("{} gains {} attack", ally.name, bonus));
            }
        }
        TacticKind::SiegeBreaker { base } => {
            if let Some(target) = state.team(enemy_side).first_living() {
                let defense = state.team(enemy_side).warriors[target].effective_defense();
                let amount = (base + growth - defense / 2).max(1);
                state.damage_warrior(enemy_side, target, amount, action);
            }
        }
        TacticKind::Counter { .. } => {}
    }
}

/// 对手布置过的反击架势在本方战术结算后触发，每张只反击一次。
fn reflect_counter(
    catalog: &dyn Catalog,
    state: &mut BattleState,
    side: Side,
    action: &mut BattleAction,
) -> Result<(), BattleError> {
    let holder = side.opponent();
    if !state.team(holder).has_living() {
        return Ok(());
    }
    let Some(counter_idx) = state
        .team(holder)
        .tactics
        .iter()
        .position(|tactic| tactic.armed && !tactic.used)
    else {
        return Ok(());
    };

    let counter = state.team(holder).tactics[counter_idx].clone();
    let card = lookup_tactic(catalog, &counter.card_id)?;
    let TacticKind::Counter { base } = card.kind else {
        return Ok(());
    };
    consume(state, holder, counter_idx);

    let amount = base + level_growth(counter.level);
    action.push_log(format!(
        "{}'s {} strikes back for {}",
        holder.label(),
        card.name,
        amount
    ));
    for target in state.team(side).living_indices() {
        state.damage_warrior(side, target, amount, action);
    }
    Ok(())
}
