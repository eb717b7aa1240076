pub mod conditions;
pub mod mode;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum::VariantNames;
use strum_macros::{EnumString, VariantNames};

pub use mode::{EntranceShuffle, ItemPlacement, Mode, ModeRequirement, WorldState};

pub type Count = i16; // Data type used to represent quantities of items, prizes and keys.

pub const MEDALLION_MIRE_BIT: Count = 1; // Bit 0 of a medallion-dungeons setting: applies to Misery Mire
pub const MEDALLION_TURTLE_ROCK_BIT: Count = 2; // Bit 1: applies to Turtle Rock
pub const MEDALLION_BOTH_MASK: Count = 3;

/// The four-valued result of evaluating a condition, totally ordered from
/// unsatisfiable to satisfiable through intended means.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum AccessibilityLevel {
    #[default]
    None, // 0
    Inspect,       // 1: the object can be seen/identified but not obtained
    SequenceBreak, // 2: obtainable only through an enabled trick
    Normal,        // 3
}

impl AccessibilityLevel {
    /// AND-combination: the weakest required sub-result dominates.
    pub fn meet(self, other: Self) -> Self {
        std::cmp::min(self, other)
    }

    /// OR-combination: the best available alternative dominates.
    pub fn join(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    pub fn meet_all<I: IntoIterator<Item = Self>>(levels: I) -> Self {
        levels
            .into_iter()
            .fold(AccessibilityLevel::Normal, Self::meet)
    }

    pub fn join_all<I: IntoIterator<Item = Self>>(levels: I) -> Self {
        levels.into_iter().fold(AccessibilityLevel::None, Self::join)
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            AccessibilityLevel::Normal
        } else {
            AccessibilityLevel::None
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum Item {
    Sword,    // progressive: 0-4
    Shield,   // progressive: 0-3
    Bow,
    Boomerang,
    Hookshot,
    Bomb,
    Powder,
    Mushroom,
    FireRod,
    IceRod,
    Bombos,
    Ether,
    Quake,
    Lamp,
    Hammer,
    Shovel,
    Flute,
    Net,
    Book,
    Bottle,   // 0-4
    Somaria,
    Byrna,
    Cape,
    Mirror,
    Boots,
    Gloves,   // progressive: 0-2
    Flippers,
    MoonPearl,
    HalfMagic,
    SmallKey, // generic small key pool, only meaningful with generic keys mode
    // Synthetic "setting" items: the count is a 2-bit field recording which of
    // the two medallion dungeons the medallion is required for.
    BombosDungeons,
    EtherDungeons,
    QuakeDungeons,
}

impl Item {
    pub fn max_count(self) -> Count {
        match self {
            Item::Sword => 4,
            Item::Shield => 3,
            Item::Bottle => 4,
            Item::Gloves => 2,
            Item::SmallKey => 29,
            Item::BombosDungeons | Item::EtherDungeons | Item::QuakeDungeons => 3,
            _ => 1,
        }
    }

    pub fn is_setting(self) -> bool {
        matches!(
            self,
            Item::BombosDungeons | Item::EtherDungeons | Item::QuakeDungeons
        )
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum Prize {
    Aga1,
    Aga2,
    GreenPendant,
    Pendant,  // the two non-green pendants
    Crystal,  // the five ordinary crystals
    RedCrystal,
}

impl Prize {
    pub fn max_count(self) -> Count {
        match self {
            Prize::Aga1 | Prize::Aga2 | Prize::GreenPendant => 1,
            Prize::Pendant | Prize::RedCrystal => 2,
            Prize::Crystal => 5,
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum Dungeon {
    HyruleCastle,
    AgahnimTower,
    EasternPalace,
    DesertPalace,
    TowerOfHera,
    PalaceOfDarkness,
    SwampPalace,
    SkullWoods,
    ThievesTown,
    IcePalace,
    MiseryMire,
    TurtleRock,
    GanonsTower,
}

impl Dungeon {
    // Small keys placed in each dungeon in the vanilla item layout.
    pub fn small_key_total(self) -> Count {
        match self {
            Dungeon::HyruleCastle => 1,
            Dungeon::AgahnimTower => 2,
            Dungeon::EasternPalace => 0,
            Dungeon::DesertPalace => 1,
            Dungeon::TowerOfHera => 1,
            Dungeon::PalaceOfDarkness => 6,
            Dungeon::SwampPalace => 6,
            Dungeon::SkullWoods => 3,
            Dungeon::ThievesTown => 1,
            Dungeon::IcePalace => 2,
            Dungeon::MiseryMire => 3,
            Dungeon::TurtleRock => 4,
            Dungeon::GanonsTower => 4,
        }
    }

    pub fn has_big_key(self) -> bool {
        !matches!(self, Dungeon::HyruleCastle | Dungeon::AgahnimTower)
    }
}

/// Sequence-break toggles. Each gate leaf reads exactly one of these.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum Trick {
    SuperBunnyFallInHole,
    SuperBunnyMirror,
    WaterWalk,
    FakeFlippersFairyRevival,
    FakeFlippersSplashDeletion,
    DungeonRevive,
    DarkRoomHyruleCastle,
    DarkRoomDeathMountainEntry,
    DarkRoomPalaceOfDarkness,
    BombDuplication,
    BombJumpPalaceOfDarkness,
    TurtleRockLaserSkip,
    MimicClip,
    Hover,
}

/// Abstract reachability points of the external map graph. The engine consumes
/// their levels as already-computed values; it never derives them.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum Node {
    LightWorld,
    LakeHylia,
    MireArea,
    DeathMountainWestBottom,
    DeathMountainWestTop,
    DeathMountainEastBottom,
    DeathMountainEastTop,
    DarkWorldWest,
    DarkWorldSouth,
    DarkWorldEast,
    DarkWorldSouthEast,
    DarkDeathMountainWestBottom,
    DarkDeathMountainTop,
    // Dungeon sections, used by the key-door formulas to count how much of a
    // dungeon is reachable past a given door.
    DesertPalaceFront,
    DesertPalaceBack,
    PalaceOfDarknessFront,
    PalaceOfDarknessArena,
    PalaceOfDarknessBack,
    SwampPalaceFront,
    SwampPalaceMid,
    SwampPalaceBack,
    SkullWoodsFront,
    SkullWoodsBack,
    IcePalaceFront,
    IcePalaceBack,
    MiseryMireFront,
    MiseryMireBack,
    TurtleRockFront,
    TurtleRockMid,
    TurtleRockBack,
    GanonsTowerLobby,
    GanonsTowerClimb,
}

/// A state cell a leaf can subscribe to. Mode is a single cell: any field
/// mutation fires one notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKey {
    Item(Item),
    Prize(Prize),
    SmallKeys(Dungeon),
    BigKey(Dungeon),
    Trick(Trick),
    Mode,
    Node(Node),
}

pub struct KeyDoorParams {
    pub dungeon: Dungeon,
    /// Small keys that can be consumed by doors up to and including this one,
    /// in the worst-case traversal order.
    pub doors_before: Count,
    /// Dungeon sections lying beyond the door; each one reachable by other
    /// means relaxes the worst-case key requirement by one.
    pub sections_beyond: &'static [Node],
    /// An item that opens the way regardless of key arithmetic.
    pub unlocked_by: Option<Item>,
}

/// Named pure functions for conditions whose logic no single threshold
/// pattern covers. The closed set doubles as the validation surface: each
/// formula declares the cells it reads, checked at registry build.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum Formula {
    MireMedallion,
    TurtleRockMedallion,
    HyruleCastleDarkCrossKeyDoor,
    AgahnimTowerFirstKeyDoor,
    DesertPalaceBackKeyDoor,
    PalaceOfDarknessFrontKeyDoor,
    PalaceOfDarknessBackKeyDoor,
    SwampPalaceFrontKeyDoor,
    SwampPalaceBackKeyDoor,
    SkullWoodsBackKeyDoor,
    IcePalaceFrontKeyDoor,
    MiseryMireBridgeKeyDoor,
    TurtleRockFrontKeyDoor,
    TurtleRockBackKeyDoor,
    GanonsTowerRandomizerKeyDoor,
}

impl Formula {
    /// Key-door parameters, for the formulas that are key doors. The medallion
    /// formulas have no door shape and return None.
    pub fn key_door_params(self) -> Option<KeyDoorParams> {
        use Dungeon::*;
        use Item::*;
        use Node::*;
        let params = match self {
            Formula::MireMedallion | Formula::TurtleRockMedallion => return None,
            Formula::HyruleCastleDarkCrossKeyDoor => KeyDoorParams {
                dungeon: HyruleCastle,
                doors_before: 1,
                sections_beyond: &[],
                unlocked_by: None,
            },
            Formula::AgahnimTowerFirstKeyDoor => KeyDoorParams {
                dungeon: AgahnimTower,
                doors_before: 1,
                sections_beyond: &[],
                unlocked_by: None,
            },
            Formula::DesertPalaceBackKeyDoor => KeyDoorParams {
                dungeon: DesertPalace,
                doors_before: 1,
                sections_beyond: &[DesertPalaceBack],
                unlocked_by: None,
            },
            Formula::PalaceOfDarknessFrontKeyDoor => KeyDoorParams {
                dungeon: PalaceOfDarkness,
                doors_before: 1,
                sections_beyond: &[PalaceOfDarknessArena, PalaceOfDarknessBack],
                // Shooting the eye switch opens the arena route without a key.
                unlocked_by: Some(Bow),
            },
            Formula::PalaceOfDarknessBackKeyDoor => KeyDoorParams {
                dungeon: PalaceOfDarkness,
                doors_before: 6,
                sections_beyond: &[PalaceOfDarknessBack],
                unlocked_by: None,
            },
            Formula::SwampPalaceFrontKeyDoor => KeyDoorParams {
                dungeon: SwampPalace,
                doors_before: 1,
                sections_beyond: &[SwampPalaceMid, SwampPalaceBack],
                unlocked_by: None,
            },
            Formula::SwampPalaceBackKeyDoor => KeyDoorParams {
                dungeon: SwampPalace,
                doors_before: 6,
                sections_beyond: &[SwampPalaceBack],
                unlocked_by: None,
            },
            Formula::SkullWoodsBackKeyDoor => KeyDoorParams {
                dungeon: SkullWoods,
                doors_before: 3,
                sections_beyond: &[SkullWoodsBack],
                unlocked_by: Some(FireRod),
            },
            Formula::IcePalaceFrontKeyDoor => KeyDoorParams {
                dungeon: IcePalace,
                doors_before: 1,
                sections_beyond: &[IcePalaceBack],
                unlocked_by: None,
            },
            Formula::MiseryMireBridgeKeyDoor => KeyDoorParams {
                dungeon: MiseryMire,
                doors_before: 3,
                sections_beyond: &[MiseryMireBack],
                unlocked_by: None,
            },
            Formula::TurtleRockFrontKeyDoor => KeyDoorParams {
                dungeon: TurtleRock,
                doors_before: 2,
                sections_beyond: &[TurtleRockMid, TurtleRockBack],
                unlocked_by: None,
            },
            Formula::TurtleRockBackKeyDoor => KeyDoorParams {
                dungeon: TurtleRock,
                doors_before: 4,
                sections_beyond: &[TurtleRockBack],
                unlocked_by: None,
            },
            Formula::GanonsTowerRandomizerKeyDoor => KeyDoorParams {
                dungeon: GanonsTower,
                doors_before: 4,
                sections_beyond: &[GanonsTowerClimb],
                unlocked_by: None,
            },
        };
        Some(params)
    }

    /// The cells this formula reads. Evaluation reads every declared cell
    /// unconditionally, so the build-time probe can hold this list exact.
    pub fn cells(self) -> Vec<CellKey> {
        match self {
            Formula::MireMedallion => vec![
                CellKey::Item(Item::Bombos),
                CellKey::Item(Item::Ether),
                CellKey::Item(Item::Quake),
                CellKey::Item(Item::BombosDungeons),
                CellKey::Item(Item::EtherDungeons),
                CellKey::Item(Item::QuakeDungeons),
            ],
            Formula::TurtleRockMedallion => vec![
                CellKey::Item(Item::Bombos),
                CellKey::Item(Item::Ether),
                CellKey::Item(Item::Quake),
                CellKey::Item(Item::BombosDungeons),
                CellKey::Item(Item::EtherDungeons),
                CellKey::Item(Item::QuakeDungeons),
            ],
            _ => {
                let params = self.key_door_params().unwrap();
                let mut cells = vec![
                    CellKey::SmallKeys(params.dungeon),
                    CellKey::Item(Item::SmallKey),
                    CellKey::Mode,
                ];
                if let Some(item) = params.unlocked_by {
                    cells.push(CellKey::Item(item));
                }
                for &node in params.sections_beyond {
                    cells.push(CellKey::Node(node));
                }
                cells
            }
        }
    }
}

/// The closed enumeration of named conditions, fixed at build time. Lookup by
/// id is total; the string surface (`from_str`) is where unknown names fail.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
pub enum ConditionId {
    // Equipment and abilities
    HasSword,
    HasMasterSword,
    HasTemperedSword,
    HasGoldenSword,
    IsSwordless,
    HasBottle,
    HasTwoBottles,
    CanShootArrows,
    CanBlockLasers,
    CanLiftRocks,
    CanLiftDarkRocks,
    CanLightTorches,
    CanMeltThings,
    CanFly,
    CanDash,
    CanGrapple,
    CanSwim,
    CanUsePowder,
    CanExtendMagic,
    CanBomb,
    CanCatchBees,
    CanDig,
    // Medallion settings (bitwise-encoded dungeon requirements)
    HasBombos,
    HasEther,
    HasQuake,
    CanUseMedallions,
    BombosRequiredForMireOnly,
    BombosRequiredForTurtleRockOnly,
    BombosRequiredForBoth,
    BombosAppliesToMire,
    BombosAppliesToTurtleRock,
    EtherRequiredForMireOnly,
    EtherRequiredForTurtleRockOnly,
    EtherRequiredForBoth,
    EtherAppliesToMire,
    EtherAppliesToTurtleRock,
    QuakeRequiredForMireOnly,
    QuakeRequiredForTurtleRockOnly,
    QuakeRequiredForBoth,
    QuakeAppliesToMire,
    QuakeAppliesToTurtleRock,
    CanPassMireEntrance,
    CanPassTurtleRockEntrance,
    // Prizes
    HasAga1,
    HasAga2,
    HasGreenPendant,
    HasAllPendants,
    HasRedCrystals,
    HasAllCrystals,
    // Mode flags
    IsStandardOpen,
    IsInverted,
    IsBasicPlacement,
    IsAdvancedPlacement,
    EntranceShuffleNone,
    EntranceShuffleDungeon,
    EntranceShuffleAll,
    EntranceShuffleInsanity,
    SmallKeysShuffled,
    SmallKeysInDungeons,
    BigKeysShuffled,
    BigKeysInDungeons,
    GenericKeys,
    BossShuffleOn,
    EnemyShuffleOn,
    GuaranteedBossItemsOn,
    TakeAnyLocationsOn,
    // Tricks (gates always AND-ed with the items the trick needs)
    CanWaterWalk,
    CanFakeFlipper,
    CanCrossWater,
    CanSuperBunny,
    CanDungeonRevive,
    CanBombDuplicate,
    CanBombJumpPod,
    CanMimicClip,
    CanHover,
    CanTraverseHyruleCastleDark,
    CanTraversePodDark,
    CanClimbDeathMountainDark,
    TurtleRockLaserBridgeSafe,
    // Inspect-only interactions
    TabletEther,
    TabletBombos,
    MasterSwordPedestal,
    SpectacleRockVisible,
    SpectacleRockItem,
    // Overworld pass-throughs
    LightWorldReachable,
    LakeHyliaReachable,
    MireAreaReachable,
    DeathMountainWestTopReachable,
    DeathMountainEastTopReachable,
    DarkWorldWestReachable,
    DarkWorldSouthReachable,
    DarkWorldEastReachable,
    DarkDeathMountainTopReachable,
    // Dungeon entry
    CanEnterHyruleCastle,
    CanEnterAgahnimTower,
    CanEnterEasternPalace,
    CanEnterDesertPalace,
    CanEnterTowerOfHera,
    CanEnterPalaceOfDarkness,
    CanEnterSwampPalace,
    CanEnterSkullWoods,
    CanEnterThievesTown,
    CanEnterIcePalace,
    CanEnterMiseryMire,
    CanEnterTurtleRock,
    CanEnterGanonsTower,
    // Key doors
    HyruleCastleDarkCrossOpen,
    AgahnimTowerFirstDoorOpen,
    DesertPalaceBackOpen,
    DesertPalaceBigChestOpen,
    PalaceOfDarknessFrontOpen,
    PalaceOfDarknessBackOpen,
    PalaceOfDarknessBigChestOpen,
    SwampPalaceFrontOpen,
    SwampPalaceBackOpen,
    SkullWoodsBackOpen,
    IcePalaceFrontOpen,
    IcePalaceBigChestOpen,
    MiseryMireBridgeOpen,
    MiseryMireBigChestOpen,
    TurtleRockFrontOpen,
    TurtleRockBackOpen,
    TurtleRockBigChestOpen,
    GanonsTowerRandomizerOpen,
    GanonsTowerBigChestOpen,
    // Bosses
    CanDefeatArmosKnights,
    CanDefeatLanmolas,
    CanDefeatMoldorm,
    CanDefeatHelmasaurKing,
    CanDefeatArrghus,
    CanDefeatMothula,
    CanDefeatBlind,
    CanDefeatKholdstare,
    CanDefeatVitreous,
    CanDefeatTrinexx,
    CanDefeatAnyBoss,
    EasternBossDefeatable,
    DesertBossDefeatable,
    HeraBossDefeatable,
    PodBossDefeatable,
    SwampBossDefeatable,
    SkullWoodsBossDefeatable,
    ThievesTownBossDefeatable,
    IcePalaceBossDefeatable,
    MiseryMireBossDefeatable,
    TurtleRockBossDefeatable,
    // Endgame
    CanDefeatGanon,
}

pub const NUM_CONDITIONS: usize = ConditionId::VARIANTS.len();
pub const NUM_ITEMS: usize = Item::VARIANTS.len();
pub const NUM_PRIZES: usize = Prize::VARIANTS.len();
pub const NUM_DUNGEONS: usize = Dungeon::VARIANTS.len();
pub const NUM_TRICKS: usize = Trick::VARIANTS.len();
pub const NUM_NODES: usize = Node::VARIANTS.len();
pub const NUM_FORMULAS: usize = Formula::VARIANTS.len();

/// A condition definition: a tree of leaves and combinators, built once per
/// named condition at registry construction. Identical leaves are interned by
/// value, so `Eq`/`Hash` here are the de-duplication key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionDef {
    Always,
    Never,
    ItemThreshold {
        item: Item,
        min: Count,
        max: Option<Count>,
    },
    ItemExact {
        item: Item,
        value: Count,
    },
    ItemMask {
        item: Item,
        mask: Count,
    },
    PrizeThreshold {
        prize: Prize,
        min: Count,
    },
    SmallKeyThreshold {
        dungeon: Dungeon,
        min: Count,
    },
    BigKeyHeld(Dungeon),
    ModeFlag(ModeRequirement),
    Trick(Trick),
    NodeLevel {
        node: Node,
        cap: Option<AccessibilityLevel>,
    },
    Formula(Formula),
    AllOf(Vec<ConditionDef>),
    AnyOf(Vec<ConditionDef>),
    CapAt {
        child: Box<ConditionDef>,
        max: AccessibilityLevel,
    },
    Ref(ConditionId),
}

impl ConditionDef {
    /// AND-combination, flattening nested AllOf and dropping identities.
    pub fn make_all(defs: Vec<ConditionDef>) -> ConditionDef {
        let mut out: Vec<ConditionDef> = vec![];
        for def in defs {
            if let ConditionDef::Never = def {
                return ConditionDef::Never;
            } else if let ConditionDef::Always = def {
                continue;
            } else if let ConditionDef::AllOf(children) = def {
                out.extend(children);
            } else {
                out.push(def);
            }
        }
        if out.is_empty() {
            ConditionDef::Always
        } else if out.len() == 1 {
            out.into_iter().next().unwrap()
        } else {
            ConditionDef::AllOf(out)
        }
    }

    /// OR-combination, flattening nested AnyOf and dropping identities.
    pub fn make_any(defs: Vec<ConditionDef>) -> ConditionDef {
        let mut out: Vec<ConditionDef> = vec![];
        for def in defs {
            if let ConditionDef::Always = def {
                return ConditionDef::Always;
            } else if let ConditionDef::Never = def {
                continue;
            } else if let ConditionDef::AnyOf(children) = def {
                out.extend(children);
            } else {
                out.push(def);
            }
        }
        if out.is_empty() {
            ConditionDef::Never
        } else if out.len() == 1 {
            out.into_iter().next().unwrap()
        } else {
            ConditionDef::AnyOf(out)
        }
    }

    pub fn cap(self, max: AccessibilityLevel) -> ConditionDef {
        ConditionDef::CapAt {
            child: Box::new(self),
            max,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            ConditionDef::AllOf(_)
                | ConditionDef::AnyOf(_)
                | ConditionDef::CapAt { .. }
                | ConditionDef::Ref(_)
        )
    }

    /// The cells a leaf reads. Composites return their own cells only through
    /// their children; the engine derives those by traversal.
    pub fn cells(&self) -> Vec<CellKey> {
        match self {
            ConditionDef::Always | ConditionDef::Never => vec![],
            ConditionDef::ItemThreshold { item, .. }
            | ConditionDef::ItemExact { item, .. }
            | ConditionDef::ItemMask { item, .. } => vec![CellKey::Item(*item)],
            ConditionDef::PrizeThreshold { prize, .. } => vec![CellKey::Prize(*prize)],
            ConditionDef::SmallKeyThreshold { dungeon, .. } => {
                vec![CellKey::SmallKeys(*dungeon)]
            }
            ConditionDef::BigKeyHeld(dungeon) => vec![CellKey::BigKey(*dungeon)],
            ConditionDef::ModeFlag(_) => vec![CellKey::Mode],
            ConditionDef::Trick(trick) => vec![CellKey::Trick(*trick)],
            ConditionDef::NodeLevel { node, .. } => vec![CellKey::Node(*node)],
            ConditionDef::Formula(formula) => formula.cells(),
            ConditionDef::AllOf(_)
            | ConditionDef::AnyOf(_)
            | ConditionDef::CapAt { .. }
            | ConditionDef::Ref(_) => vec![],
        }
    }

    pub fn print_pretty(&self, indent: usize) {
        let pad = " ".repeat(indent);
        match self {
            ConditionDef::AllOf(children) => {
                println!("{pad}AllOf(");
                for child in children {
                    child.print_pretty(indent + 2);
                }
                println!("{pad})");
            }
            ConditionDef::AnyOf(children) => {
                println!("{pad}AnyOf(");
                for child in children {
                    child.print_pretty(indent + 2);
                }
                println!("{pad})");
            }
            ConditionDef::CapAt { child, max } => {
                println!("{pad}CapAt({max:?},");
                child.print_pretty(indent + 2);
                println!("{pad})");
            }
            _ => {
                println!("{pad}{self:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_lattice_identities() {
        assert_eq!(
            AccessibilityLevel::meet_all(std::iter::empty()),
            AccessibilityLevel::Normal
        );
        assert_eq!(
            AccessibilityLevel::join_all(std::iter::empty()),
            AccessibilityLevel::None
        );
    }

    #[test]
    fn test_lattice_order() {
        use AccessibilityLevel::*;
        assert!(None < Inspect);
        assert!(Inspect < SequenceBreak);
        assert!(SequenceBreak < Normal);
        assert_eq!(SequenceBreak.meet(Normal), SequenceBreak);
        assert_eq!(Inspect.join(SequenceBreak), SequenceBreak);
    }

    #[test]
    fn test_lattice_algebra() {
        use AccessibilityLevel::*;
        let levels = [None, Inspect, SequenceBreak, Normal];
        for &a in &levels {
            for &b in &levels {
                assert_eq!(a.meet(b), b.meet(a));
                assert_eq!(a.join(b), b.join(a));
                assert_eq!(a.meet(a), a);
                assert_eq!(a.join(a), a);
                for &c in &levels {
                    assert_eq!(a.meet(b).meet(c), a.meet(b.meet(c)));
                    assert_eq!(a.join(b).join(c), a.join(b.join(c)));
                }
            }
        }
    }

    #[test]
    fn test_make_all_simplification() {
        let def = ConditionDef::make_all(vec![
            ConditionDef::Always,
            ConditionDef::Trick(Trick::WaterWalk),
            ConditionDef::AllOf(vec![
                ConditionDef::ItemThreshold {
                    item: Item::Boots,
                    min: 1,
                    max: None,
                },
                ConditionDef::Always,
            ]),
        ]);
        match def {
            ConditionDef::AllOf(children) => {
                assert_eq!(children.len(), 3);
            }
            other => panic!("unexpected simplification: {other:?}"),
        }
        assert_eq!(ConditionDef::make_all(vec![]), ConditionDef::Always);
        assert_eq!(
            ConditionDef::make_all(vec![ConditionDef::Never, ConditionDef::Always]),
            ConditionDef::Never
        );
    }

    #[test]
    fn test_make_any_simplification() {
        assert_eq!(ConditionDef::make_any(vec![]), ConditionDef::Never);
        assert_eq!(
            ConditionDef::make_any(vec![ConditionDef::Always, ConditionDef::Never]),
            ConditionDef::Always
        );
        let single = ConditionDef::make_any(vec![ConditionDef::Trick(Trick::Hover)]);
        assert_eq!(single, ConditionDef::Trick(Trick::Hover));
    }

    #[test]
    fn test_setting_items() {
        assert!(Item::BombosDungeons.is_setting());
        assert!(!Item::Sword.is_setting());
        assert_eq!(Item::BombosDungeons.max_count(), MEDALLION_BOTH_MASK);
    }

    #[test]
    fn test_big_key_dungeons() {
        assert!(!Dungeon::HyruleCastle.has_big_key());
        assert!(!Dungeon::AgahnimTower.has_big_key());
        assert!(Dungeon::TurtleRock.has_big_key());
    }

    #[test]
    fn test_condition_id_from_str() {
        assert_eq!(
            ConditionId::from_str("HasSword").unwrap(),
            ConditionId::HasSword
        );
        assert!(ConditionId::from_str("HasZword").is_err());
    }

    #[test]
    fn test_formula_cells_cover_key_door_params() {
        for idx in 0..Formula::VARIANTS.len() {
            let formula = Formula::try_from(idx).unwrap();
            let cells = formula.cells();
            assert!(!cells.is_empty());
            if let Some(params) = formula.key_door_params() {
                assert!(cells.contains(&CellKey::SmallKeys(params.dungeon)));
                assert!(cells.contains(&CellKey::Mode));
            }
        }
    }
}
