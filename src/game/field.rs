use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::catalog::Stats;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldEffect {
    Calm,
    Rain,
    Fog,
    Heatwave,
    Highlands,
    WarDrums,
    DryWind,
}

impl FieldEffect {
    /// 对双方所有武将生效的属性修正。
    pub fn stat_delta(self) -> Stats {
        match self {
            FieldEffect::Heatwave => Stats::new(2, 0, 0, -1),
            FieldEffect::Highlands => Stats::new(0, 0, 0, 2),
            FieldEffect::WarDrums => Stats::new(0, 2, 0, 0),
            FieldEffect::Calm | FieldEffect::Rain | FieldEffect::Fog | FieldEffect::DryWind => {
                Stats::default()
            }
        }
    }

    pub fn disables_fire(self) -> bool {
        matches!(self, FieldEffect::Rain)
    }

    pub fn fire_bonus(self) -> i32 {
        match self {
            FieldEffect::DryWind => 3,
            _ => 0,
        }
    }

    /// 首回合前排无法出手。
    pub fn blocks_front_on_opening(self) -> bool {
        matches!(self, FieldEffect::Fog)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldEvent {
    pub name: String,
    pub description: String,
    pub effect: FieldEffect,
}

impl FieldEvent {
    pub fn new(name: impl Into<String>, description: impl Into<String>, effect: FieldEffect) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            effect,
        }
    }
}

static FIELD_EVENTS: Lazy<Vec<FieldEvent>> = Lazy::new(|| {
    vec![
        clear_skies(),
        FieldEvent::new(
            "Heavy Rain",
            "Downpour soaks the field; fire tactics fizzle.",
            FieldEffect::Rain,
        ),
        FieldEvent::new(
            "Dense Fog",
            "Front lines cannot find their targets on the first turn.",
            FieldEffect::Fog,
        ),
        FieldEvent::new(
            "Scorching Sun",
            "All warriors gain 2 attack but lose 1 defense.",
            FieldEffect::Heatwave,
        ),
        FieldEvent::new(
            "Mountain Pass",
            "Narrow ground favors the defender: all warriors gain 2 defense.",
            FieldEffect::Highlands,
        ),
        FieldEvent::new(
            "War Drums",
            "Thundering drums stir the troops: all warriors gain 2 command.",
            FieldEffect::WarDrums,
        ),
        FieldEvent::new(
            "Dry Wind",
            "Parched wind fans the flames: fire tactics deal 3 extra damage.",
            FieldEffect::DryWind,
        ),
    ]
});

pub fn clear_skies() -> FieldEvent {
    FieldEvent::new("Clear Skies", "No special conditions.", FieldEffect::Calm)
}

/// 固定的场地事件表，开战时从中均匀抽取一项。
pub fn standard_events() -> &'static [FieldEvent] {
    &FIELD_EVENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rain_disables_fire() {
        let disabling: Vec<&str> = standard_events()
            .iter()
            .filter(|event| event.effect.disables_fire())
            .map(|event| event.name.as_str())
            .collect();
        assert_eq!(disabling, vec!["Heavy Rain"]);
    }

    #[test]
    fn calm_field_changes_nothing() {
        assert!(clear_skies().effect.stat_delta().is_zero());
        assert_eq!(clear_skies().effect.fire_bonus(), 0);
    }

    fn event(name: &str) -> &'static FieldEvent {
        standard_events()
            .iter()
            .find(|event| event.name == name)
            .expect("field event should exist")
    }

    fn fielded(name: &str) -> crate::game::state::BattleWarrior {
        use crate::game::catalog::{Faction, Grade, WarriorCard};
        use crate::game::state::{BattleWarrior, Lane};

        let card = WarriorCard::new("sentry", "Sentry", Faction::Wu, Grade::Common, Stats::new(8, 10, 4, 3), vec![]);
        BattleWarrior::from_card("sentry", &card, 1, Lane::Front, &event(name).effect.stat_delta())
    }

    #[test]
    fn scorching_sun_trades_defense_for_attack() {
        let warrior = fielded("Scorching Sun");
        assert_eq!(warrior.stats, Stats::new(10, 10, 4, 2));
        assert_eq!(warrior.max_hp, 30);
    }

    #[test]
    fn mountain_pass_raises_defense() {
        let warrior = fielded("Mountain Pass");
        assert_eq!(warrior.stats, Stats::new(8, 10, 4, 5));
    }

    #[test]
    fn war_drums_raise_command_and_max_hp() {
        let warrior = fielded("War Drums");
        assert_eq!(warrior.stats.command, 12);
        assert_eq!(warrior.max_hp, 36);
        assert_eq!(warrior.current_hp, 36);
    }
}
