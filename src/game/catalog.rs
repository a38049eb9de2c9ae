use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::state::{CardId, Lane};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Wei,
    Shu,
    Wu,
    Qun,
}

impl Faction {
    pub const ALL: [Faction; 4] = [Faction::Wei, Faction::Shu, Faction::Wu, Faction::Qun];

    pub fn label(self) -> &'static str {
        match self {
            Faction::Wei => "Wei",
            Faction::Shu => "Shu",
            Faction::Wu => "Wu",
            Faction::Qun => "Qun",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Common, Grade::Rare, Grade::Epic, Grade::Legendary];

    /// 高一档的品级，已是最高则不变。
    pub fn raised(self) -> Grade {
        match self {
            Grade::Common => Grade::Rare,
            Grade::Rare => Grade::Epic,
            Grade::Epic | Grade::Legendary => Grade::Legendary,
        }
    }
}

impl Default for Grade {
    fn default() -> Self {
        Grade::Common
    }
}

/// 武将四维，也用作增减量。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub attack: i32,
    pub command: i32,
    pub intel: i32,
    pub defense: i32,
}

impl Stats {
    pub const fn new(attack: i32, command: i32, intel: i32, defense: i32) -> Self {
        Self {
            attack,
            command,
            intel,
            defense,
        }
    }

    pub fn apply(&mut self, delta: &Stats) {
        self.attack += delta.attack;
        self.command += delta.command;
        self.intel += delta.intel;
        self.defense += delta.defense;
    }

    pub fn clamp_floor(&mut self) {
        self.attack = self.attack.max(0);
        self.command = self.command.max(1);
        self.intel = self.intel.max(0);
        self.defense = self.defense.max(0);
    }

    pub fn is_zero(&self) -> bool {
        *self == Stats::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpeningSkill {
    LeaderAura,
    Intimidate { amount: i32 },
    Demoralize { amount: i32 },
    BonusTactic { card_id: CardId },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PassiveSkill {
    LaneMastery { lane: Lane, bonus: i32 },
    SwornBond { partners: Vec<CardId>, bonus: i32 },
    FirstTurnGuard,
    LongReach { lane: Lane },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActiveSkill {
    RallyCry { bonus: i32, turns: i32 },
    LaneStun { turns: i32 },
    LastStand { threshold_pct: u8, heal: i32 },
    Benevolence { heal: i32 },
    ArcaneBlast { power: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UltimateSkill {
    Cataclysm { power: i32 },
    Resurgence { attack_bonus: i32, heal_pct: u8 },
    Thunderlock { turns: i32 },
    SageStrike { multiplier_pct: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrikeTrait {
    Piercing,
    Cleave { splash_pct: u8 },
    Vanguard { bonus: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpkeepSkill {
    Fortify,
}

/// 武将技能，按触发时机划分为互不重叠的几类。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "trigger", content = "skill", rename_all = "snake_case")]
pub enum Skill {
    BattleStart(OpeningSkill),
    Passive(PassiveSkill),
    Active { chance: u8, skill: ActiveSkill },
    Ultimate(UltimateSkill),
    Strike(StrikeTrait),
    Upkeep(UpkeepSkill),
}

impl OpeningSkill {
    pub fn label(&self) -> &'static str {
        match self {
            OpeningSkill::LeaderAura => "Leader's Aura",
            OpeningSkill::Intimidate { .. } => "Intimidate",
            OpeningSkill::Demoralize { .. } => "Demoralize",
            OpeningSkill::BonusTactic { .. } => "Field Orders",
        }
    }
}

impl PassiveSkill {
    pub fn label(&self) -> &'static str {
        match self {
            PassiveSkill::LaneMastery { .. } => "Lane Mastery",
            PassiveSkill::SwornBond { .. } => "Sworn Bond",
            PassiveSkill::FirstTurnGuard => "Iron Guard",
            PassiveSkill::LongReach { .. } => "Long Reach",
        }
    }
}

impl ActiveSkill {
    pub fn label(&self) -> &'static str {
        match self {
            ActiveSkill::RallyCry { .. } => "Rally Cry",
            ActiveSkill::LaneStun { .. } => "Shock Charge",
            ActiveSkill::LastStand { .. } => "Last Stand",
            ActiveSkill::Benevolence { .. } => "Benevolence",
            ActiveSkill::ArcaneBlast { .. } => "Arcane Blast",
        }
    }
}

impl UltimateSkill {
    pub fn label(&self) -> &'static str {
        match self {
            UltimateSkill::Cataclysm { .. } => "Cataclysm",
            UltimateSkill::Resurgence { .. } => "Resurgence",
            UltimateSkill::Thunderlock { .. } => "Thunderlock",
            UltimateSkill::SageStrike { .. } => "Sage Strike",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarriorCard {
    pub id: CardId,
    pub name: String,
    pub faction: Faction,
    pub grade: Grade,
    pub base: Stats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,
}

impl WarriorCard {
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        faction: Faction,
        grade: Grade,
        base: Stats,
        skills: Vec<Skill>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faction,
            grade,
            base,
            skills,
        }
    }

    pub fn opening_skills(&self) -> impl Iterator<Item = &OpeningSkill> {
        self.skills.iter().filter_map(|skill| match skill {
            Skill::BattleStart(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn passives(&self) -> impl Iterator<Item = &PassiveSkill> {
        self.skills.iter().filter_map(|skill| match skill {
            Skill::Passive(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn actives(&self) -> impl Iterator<Item = (u8, &ActiveSkill)> {
        self.skills.iter().filter_map(|skill| match skill {
            Skill::Active { chance, skill } => Some((*chance, skill)),
            _ => None,
        })
    }

    pub fn ultimate(&self) -> Option<&UltimateSkill> {
        self.skills.iter().find_map(|skill| match skill {
            Skill::Ultimate(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn strike_traits(&self) -> impl Iterator<Item = &StrikeTrait> {
        self.skills.iter().filter_map(|skill| match skill {
            Skill::Strike(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn upkeep(&self) -> impl Iterator<Item = &UpkeepSkill> {
        self.skills.iter().filter_map(|skill| match skill {
            Skill::Upkeep(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn is_piercing(&self) -> bool {
        self.strike_traits()
            .any(|strike| matches!(strike, StrikeTrait::Piercing))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TacticKind {
    FireAttack { base: i32 },
    Smokescreen { turns: i32 },
    Ambush { turns: i32 },
    Provoke { turns: i32 },
    FieldMedic { base: i32 },
    WarCry { bonus: i32, turns: i32 },
    SiegeBreaker { base: i32 },
    Counter { base: i32 },
}

impl TacticKind {
    pub fn is_fire(&self) -> bool {
        matches!(self, TacticKind::FireAttack { .. })
    }

    pub fn is_counter(&self) -> bool {
        matches!(self, TacticKind::Counter { .. })
    }

    /// AI 劣势时优先考虑的防守/辅助类战术。
    pub fn is_defensive(&self) -> bool {
        matches!(
            self,
            TacticKind::Smokescreen { .. }
                | TacticKind::Provoke { .. }
                | TacticKind::FieldMedic { .. }
                | TacticKind::Counter { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TacticCard {
    pub id: CardId,
    pub name: String,
    pub kind: TacticKind,
}

impl TacticCard {
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, kind: TacticKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// 只读的卡牌目录，引擎从不修改其中数据。
pub trait Catalog {
    fn warrior(&self, card_id: &str) -> Option<&WarriorCard>;
    fn tactic(&self, card_id: &str) -> Option<&TacticCard>;
    fn warriors(&self) -> &[WarriorCard];
    fn tactics(&self) -> &[TacticCard];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StandardCatalog {
    pub warriors: Vec<WarriorCard>,
    pub tactics: Vec<TacticCard>,
}

impl StandardCatalog {
    pub fn new(warriors: Vec<WarriorCard>, tactics: Vec<TacticCard>) -> Self {
        Self { warriors, tactics }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn standard() -> Self {
        use Faction::*;
        use Grade::*;

        let warriors = vec![
            WarriorCard::new("wei_crossbowman", "Wei Crossbowman", Wei, Common, Stats::new(9, 8, 3, 3), vec![]),
            WarriorCard::new("shu_guardsman", "Shu Guardsman", Shu, Common, Stats::new(7, 10, 3, 4), vec![]),
            WarriorCard::new("wu_marine", "Wu Marine", Wu, Common, Stats::new(8, 9, 4, 3), vec![]),
            WarriorCard::new("yellow_turban", "Yellow Turban Zealot", Qun, Common, Stats::new(8, 8, 2, 2), vec![]),
            WarriorCard::new(
                "xu_chu",
                "Xu Chu",
                Wei,
                Rare,
                Stats::new(13, 12, 2, 4),
                vec![Skill::Strike(StrikeTrait::Piercing)],
            ),
            WarriorCard::new(
                "dian_wei",
                "Dian Wei",
                Wei,
                Rare,
                Stats::new(12, 13, 2, 5),
                vec![Skill::Upkeep(UpkeepSkill::Fortify)],
            ),
            WarriorCard::new(
                "huang_zhong",
                "Huang Zhong",
                Shu,
                Rare,
                Stats::new(13, 10, 5, 3),
                vec![Skill::Passive(PassiveSkill::LongReach { lane: Lane::Back })],
            ),
            WarriorCard::new(
                "gan_ning",
                "Gan Ning",
                Wu,
                Rare,
                Stats::new(13, 10, 4, 3),
                vec![Skill::Passive(PassiveSkill::LaneMastery {
                    lane: Lane::Front,
                    bonus: 3,
                })],
            ),
            WarriorCard::new(
                "lu_meng",
                "Lu Meng",
                Wu,
                Rare,
                Stats::new(11, 11, 8, 4),
                vec![Skill::Strike(StrikeTrait::Vanguard { bonus: 4 })],
            ),
            WarriorCard::new(
                "diao_chan",
                "Diao Chan",
                Qun,
                Rare,
                Stats::new(8, 9, 12, 2),
                vec![Skill::BattleStart(OpeningSkill::Demoralize { amount: 2 })],
            ),
            WarriorCard::new(
                "hua_tuo",
                "Hua Tuo",
                Qun,
                Rare,
                Stats::new(6, 10, 11, 3),
                vec![Skill::Active {
                    chance: 35,
                    skill: ActiveSkill::Benevolence { heal: 6 },
                }],
            ),
            WarriorCard::new(
                "xiahou_dun",
                "Xiahou Dun",
                Wei,
                Epic,
                Stats::new(14, 14, 5, 5),
                vec![Skill::Passive(PassiveSkill::FirstTurnGuard)],
            ),
            WarriorCard::new(
                "zhang_liao",
                "Zhang Liao",
                Wei,
                Epic,
                Stats::new(15, 13, 7, 4),
                vec![Skill::Active {
                    chance: 25,
                    skill: ActiveSkill::LaneStun { turns: 1 },
                }],
            ),
            WarriorCard::new(
                "sima_yi",
                "Sima Yi",
                Wei,
                Epic,
                Stats::new(9, 12, 17, 4),
                vec![Skill::Active {
                    chance: 30,
                    skill: ActiveSkill::ArcaneBlast { power: 4 },
                }],
            ),
            WarriorCard::new(
                "liu_bei",
                "Liu Bei",
                Shu,
                Epic,
                Stats::new(11, 14, 11, 4),
                vec![
                    Skill::BattleStart(OpeningSkill::BonusTactic {
                        card_id: "field_medic".into(),
                    }),
                    Skill::Passive(PassiveSkill::SwornBond {
                        partners: vec!["guan_yu".into(), "zhang_fei".into()],
                        bonus: 2,
                    }),
                ],
            ),
            WarriorCard::new(
                "zhang_fei",
                "Zhang Fei",
                Shu,
                Epic,
                Stats::new(16, 14, 3, 4),
                vec![
                    Skill::Strike(StrikeTrait::Cleave { splash_pct: 50 }),
                    Skill::Passive(PassiveSkill::SwornBond {
                        partners: vec!["liu_bei".into(), "guan_yu".into()],
                        bonus: 2,
                    }),
                ],
            ),
            WarriorCard::new(
                "zhao_yun",
                "Zhao Yun",
                Shu,
                Epic,
                Stats::new(15, 13, 8, 5),
                vec![
                    Skill::Passive(PassiveSkill::LaneMastery {
                        lane: Lane::Front,
                        bonus: 2,
                    }),
                    Skill::Active {
                        chance: 50,
                        skill: ActiveSkill::LastStand {
                            threshold_pct: 30,
                            heal: 8,
                        },
                    },
                ],
            ),
            WarriorCard::new(
                "sun_quan",
                "Sun Quan",
                Wu,
                Epic,
                Stats::new(11, 15, 10, 4),
                vec![Skill::Active {
                    chance: 30,
                    skill: ActiveSkill::RallyCry { bonus: 2, turns: 2 },
                }],
            ),
            WarriorCard::new(
                "lu_xun",
                "Lu Xun",
                Wu,
                Epic,
                Stats::new(10, 12, 15, 3),
                vec![Skill::BattleStart(OpeningSkill::Intimidate { amount: 3 })],
            ),
            WarriorCard::new(
                "zhang_jiao",
                "Zhang Jiao",
                Qun,
                Epic,
                Stats::new(8, 12, 16, 3),
                vec![Skill::Active {
                    chance: 35,
                    skill: ActiveSkill::ArcaneBlast { power: 3 },
                }],
            ),
            WarriorCard::new(
                "cao_cao",
                "Cao Cao",
                Wei,
                Legendary,
                Stats::new(14, 16, 14, 5),
                vec![
                    Skill::BattleStart(OpeningSkill::LeaderAura),
                    Skill::Ultimate(UltimateSkill::Resurgence {
                        attack_bonus: 3,
                        heal_pct: 30,
                    }),
                ],
            ),
            WarriorCard::new(
                "guan_yu",
                "Guan Yu",
                Shu,
                Legendary,
                Stats::new(18, 15, 9, 6),
                vec![
                    Skill::Passive(PassiveSkill::SwornBond {
                        partners: vec!["liu_bei".into(), "zhang_fei".into()],
                        bonus: 3,
                    }),
                    Skill::Ultimate(UltimateSkill::Cataclysm { power: 12 }),
                ],
            ),
            WarriorCard::new(
                "zhuge_liang",
                "Zhuge Liang",
                Shu,
                Legendary,
                Stats::new(8, 13, 20, 4),
                vec![
                    Skill::BattleStart(OpeningSkill::LeaderAura),
                    Skill::Active {
                        chance: 30,
                        skill: ActiveSkill::ArcaneBlast { power: 5 },
                    },
                    Skill::Ultimate(UltimateSkill::SageStrike {
                        multiplier_pct: 200,
                    }),
                ],
            ),
            WarriorCard::new(
                "zhou_yu",
                "Zhou Yu",
                Wu,
                Legendary,
                Stats::new(12, 14, 17, 4),
                vec![
                    Skill::BattleStart(OpeningSkill::BonusTactic {
                        card_id: "fire_attack".into(),
                    }),
                    Skill::Ultimate(UltimateSkill::Cataclysm { power: 10 }),
                ],
            ),
            WarriorCard::new(
                "lu_bu",
                "Lu Bu",
                Qun,
                Legendary,
                Stats::new(21, 15, 4, 6),
                vec![
                    Skill::Strike(StrikeTrait::Piercing),
                    Skill::Ultimate(UltimateSkill::Thunderlock { turns: 1 }),
                ],
            ),
        ];

        let tactics = vec![
            TacticCard::new("fire_attack", "Fire Attack", TacticKind::FireAttack { base: 6 }),
            TacticCard::new("smokescreen", "Smokescreen", TacticKind::Smokescreen { turns: 2 }),
            TacticCard::new("ambush", "Ambush", TacticKind::Ambush { turns: 1 }),
            TacticCard::new("provoke", "Provoke", TacticKind::Provoke { turns: 2 }),
            TacticCard::new("field_medic", "Field Medic", TacticKind::FieldMedic { base: 12 }),
            TacticCard::new("war_cry", "War Cry", TacticKind::WarCry { bonus: 4, turns: 2 }),
            TacticCard::new("siege_breaker", "Siege Breaker", TacticKind::SiegeBreaker { base: 14 }),
            TacticCard::new("counter_stance", "Counter Stance", TacticKind::Counter { base: 5 }),
        ];

        Self { warriors, tactics }
    }
}

impl Catalog for StandardCatalog {
    fn warrior(&self, card_id: &str) -> Option<&WarriorCard> {
        self.warriors.iter().find(|card| card.id == card_id)
    }

    fn tactic(&self, card_id: &str) -> Option<&TacticCard> {
        self.tactics.iter().find(|card| card.id == card_id)
    }

    fn warriors(&self) -> &[WarriorCard] {
        &self.warriors
    }

    fn tactics(&self) -> &[TacticCard] {
        &self.tactics
    }
}

static STANDARD_CATALOG: Lazy<StandardCatalog> = Lazy::new(StandardCatalog::standard);

/// 内置的标准卡牌目录。
pub fn standard_catalog() -> &'static StandardCatalog {
    &STANDARD_CATALOG
}
