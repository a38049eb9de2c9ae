//! 战斗核心逻辑（状态、目录、技能、战术、回合引擎）。

pub mod catalog;
pub mod config;
pub mod field;
pub mod rng;
pub mod rules;
pub mod setup;
pub mod skills;
pub mod state;
pub mod synergy;
pub mod tactics;

pub use catalog::{
    standard_catalog,
    ActiveSkill,
    Catalog,
    Faction,
    Grade,
    OpeningSkill,
    PassiveSkill,
    Skill,
    StandardCatalog,
    Stats,
    StrikeTrait,
    TacticCard,
    TacticKind,
    UltimateSkill,
    UpkeepSkill,
    WarriorCard,
};
pub use config::BattleConfig;
pub use field::{standard_events, FieldEffect, FieldEvent};
pub use rng::{EntropyRandom, RandomSource, ScriptedRandom, SeededRandom};
pub use rules::{BattleEngine, BattleError, TacticResolution, TurnResolution};
pub use setup::{DeckSlot, OwnedCard, PlayerDeck, PlayerPower};
pub use state::{
    ActionKind,
    ActiveSynergy,
    BattleAction,
    BattlePhase,
    BattleResult,
    BattleState,
    BattleTactic,
    BattleWarrior,
    CardId,
    CombatEvent,
    CombatEventKind,
    InstanceId,
    IntegrityError,
    Lane,
    Side,
    StatusEffect,
    StatusKind,
    SynergyTier,
    TeamState,
    UltimateMarker,
    UNTIL_CONSUMED,
};
