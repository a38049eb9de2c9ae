use super::catalog::{Faction, Stats};
use super::state::{ActiveSynergy, Side, SynergyTier, TeamState};

pub const MINOR_SYNERGY_SIZE: usize = 2;
pub const MAJOR_SYNERGY_SIZE: usize = 3;

/// 阵营羁绊加成表。
pub fn synergy_bonus(faction: Faction, tier: SynergyTier) -> Stats {
    match (faction, tier) {
        (Faction::Wei, SynergyTier::Minor) => Stats::new(0, 0, 0, 2),
        (Faction::Wei, SynergyTier::Major) => Stats::new(1, 2, 0, 3),
        (Faction::Shu, SynergyTier::Minor) => Stats::new(2, 0, 0, 0),
        (Faction::Shu, SynergyTier::Major) => Stats::new(4, 2, 1, 0),
        (Faction::Wu, SynergyTier::Minor) => Stats::new(0, 0, 2, 0),
        (Faction::Wu, SynergyTier::Major) => Stats::new(1, 1, 4, 1),
        (Faction::Qun, SynergyTier::Minor) => Stats::new(1, 1, 0, 0),
        (Faction::Qun, SynergyTier::Major) => Stats::new(3, 3, 0, 0),
    }
}

/// 由当前阵容的阵营分布推导羁绊，不在单位上保存。
pub fn compute_synergies(team: &TeamState, side: Side) -> Vec<ActiveSynergy> {
    Faction::ALL
        .iter()
        .filter_map(|faction| {
            let count = team
                .warriors
                .iter()
                .filter(|warrior| warrior.is_alive && warrior.faction == *faction)
                .count();
            let tier = if count >= MAJOR_SYNERGY_SIZE {
                SynergyTier::Major
            } else if count >= MINOR_SYNERGY_SIZE {
                SynergyTier::Minor
            } else {
                return None;
            };
            Some(ActiveSynergy {
                side,
                faction: *faction,
                tier,
            })
        })
        .collect()
}

/// 一次性叠加羁绊属性到同阵营单位，返回日志。
pub fn apply_synergies(team: &mut TeamState, synergies: &[ActiveSynergy]) -> Vec<String> {
    let mut lines = Vec::new();
    for synergy in synergies {
        let bonus = synergy_bonus(synergy.faction, synergy.tier);
        for warrior in team
            .warriors
            .iter_mut()
            .filter(|warrior| warrior.faction == synergy.faction)
        {
            let command = warrior.stats.command + bonus.command;
            warrior.stats.attack += bonus.attack;
            warrior.stats.intel += bonus.intel;
            warrior.stats.defense += bonus.defense;
            warrior.set_command(command);
            warrior.current_hp = warrior.max_hp;
            warrior.is_alive = warrior.current_hp > 0;
        }
        let tier = match synergy.tier {
            SynergyTier::Minor => "minor",
            SynergyTier::Major => "major",
        };
        lines.push(format!(
            "{} synergy ({}) active for {}",
            synergy.faction.label(),
            tier,
            synergy.side.label()
        ));
    }
    lines
}
