//! Table-string descriptors.
//!
//! Every content option carries a `:`-separated descriptor string naming the
//! option first, with `/`-separated lists inside fields:
//!
//! ```text
//! race      Dwarf:Darkvision/Stonecunning:+2 constitution/-2 charisma
//! feat      Power Attack:General/Fighter
//! domain    Sun:Greater Turning
//! class     Blackguard:d10:1:2:Good/Poor/Poor
//! level     3:Command Undead/Aura Of Despair
//! ```

use core::str::FromStr;

use rules_core::{BinaryOp, Expr};

/// Saving throws, in descriptor order.
pub const SAVES: [&str; 3] = ["Fortitude", "Reflex", "Will"];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("descriptor '{descriptor}' has {found} fields, expected {expected}")]
    FieldCount {
        descriptor: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid {field} '{value}' in descriptor '{descriptor}'")]
    Field {
        descriptor: String,
        field: &'static str,
        value: String,
    },
}

impl DescriptorError {
    fn field(descriptor: &str, field: &'static str, value: &str) -> Self {
        Self::Field {
            descriptor: descriptor.to_owned(),
            field,
            value: value.to_owned(),
        }
    }
}

/// Splits a descriptor into exactly `expected` fields.
pub fn fields(descriptor: &str, expected: usize) -> Result<Vec<&str>, DescriptorError> {
    let fields: Vec<&str> = descriptor.split(':').map(str::trim).collect();
    if fields.len() != expected {
        return Err(DescriptorError::FieldCount {
            descriptor: descriptor.to_owned(),
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// `/`-separated list; empty items are dropped.
pub fn list(field: &str) -> Vec<&str> {
    field
        .split('/')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// `+2 constitution`, `-2 charisma`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityAdjustment {
    pub ability: String,
    pub amount: i64,
}

impl FromStr for AbilityAdjustment {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DescriptorError::field(s, "ability adjustment", s);
        let (amount, ability) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let amount = amount.parse::<i64>().map_err(|_| invalid())?;
        let ability = ability.trim();
        if ability.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            ability: ability.to_owned(),
            amount,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceDescriptor {
    pub name: String,
    pub features: Vec<String>,
    pub adjustments: Vec<AbilityAdjustment>,
}

impl FromStr for RaceDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = fields(s, 3)?;
        Ok(Self {
            name: f[0].to_owned(),
            features: list(f[1]).into_iter().map(str::to_owned).collect(),
            adjustments: list(f[2])
                .into_iter()
                .map(str::parse::<AbilityAdjustment>)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatDescriptor {
    pub name: String,
    pub types: Vec<String>,
}

impl FromStr for FeatDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = fields(s, 2)?;
        Ok(Self {
            name: f[0].to_owned(),
            types: list(f[1]).into_iter().map(str::to_owned).collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub name: String,
    pub granted: Vec<String>,
}

impl FromStr for DomainDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = fields(s, 2)?;
        Ok(Self {
            name: f[0].to_owned(),
            granted: list(f[1]).into_iter().map(str::to_owned).collect(),
        })
    }
}

/// Base attack bonus per class level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum AttackProgression {
    #[strum(serialize = "1")]
    Full,
    #[strum(serialize = "3/4")]
    ThreeQuarters,
    #[strum(serialize = "1/2")]
    Half,
}

impl AttackProgression {
    /// Bonus over the class level (`source`).
    pub fn bonus(self) -> Expr {
        match self {
            Self::Full => Expr::Source,
            Self::ThreeQuarters => Expr::binary(
                BinaryOp::Div,
                Expr::binary(BinaryOp::Mul, Expr::Source, Expr::lit(3)),
                Expr::lit(4),
            ),
            Self::Half => Expr::binary(BinaryOp::Div, Expr::Source, Expr::lit(2)),
        }
    }
}

/// Saving throw bonus per class level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum SaveProgression {
    Good,
    Poor,
}

impl SaveProgression {
    /// Bonus over the class level (`source`).
    pub fn bonus(self) -> Expr {
        match self {
            Self::Good => Expr::binary(
                BinaryOp::Add,
                Expr::binary(BinaryOp::Div, Expr::Source, Expr::lit(2)),
                Expr::lit(2),
            ),
            Self::Poor => Expr::binary(BinaryOp::Div, Expr::Source, Expr::lit(3)),
        }
    }
}

/// `Name:HitDie:Attack:SkillPoints:Fort/Ref/Will`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDescriptor {
    pub name: String,
    pub hit_die: i64,
    pub attack: AttackProgression,
    pub skill_points: i64,
    pub saves: [SaveProgression; 3],
}

impl ClassDescriptor {
    /// Average hit points per level after the first: half the die plus one.
    pub fn hit_points_per_level(&self) -> i64 {
        self.hit_die / 2 + 1
    }
}

impl FromStr for ClassDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = fields(s, 5)?;

        let hit_die = f[1]
            .strip_prefix('d')
            .and_then(|die| die.parse::<i64>().ok())
            .ok_or_else(|| DescriptorError::field(s, "hit die", f[1]))?;
        let attack = f[2]
            .parse::<AttackProgression>()
            .map_err(|_| DescriptorError::field(s, "attack progression", f[2]))?;
        let skill_points = f[3]
            .parse::<i64>()
            .map_err(|_| DescriptorError::field(s, "skill points", f[3]))?;

        let saves: Vec<SaveProgression> = list(f[4])
            .into_iter()
            .map(|save| {
                save.parse::<SaveProgression>()
                    .map_err(|_| DescriptorError::field(s, "save progression", save))
            })
            .collect::<Result<_, _>>()?;
        let saves: [SaveProgression; 3] = saves
            .try_into()
            .map_err(|_| DescriptorError::field(s, "save progressions", f[4]))?;

        Ok(Self {
            name: f[0].to_owned(),
            hit_die,
            attack,
            skill_points,
            saves,
        })
    }
}

/// `Level:Feature/Feature`, features gained at a class level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelFeatures {
    pub level: i64,
    pub features: Vec<String>,
}

impl FromStr for LevelFeatures {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = fields(s, 2)?;
        let level = f[0]
            .parse::<i64>()
            .ok()
            .filter(|level| *level > 0)
            .ok_or_else(|| DescriptorError::field(s, "level", f[0]))?;
        Ok(Self {
            level,
            features: list(f[1]).into_iter().map(str::to_owned).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_race() {
        let race: RaceDescriptor = "Dwarf:Darkvision/Stonecunning:+2 constitution/-2 charisma"
            .parse()
            .unwrap();
        assert_eq!(race.name, "Dwarf");
        assert_eq!(race.features, vec!["Darkvision", "Stonecunning"]);
        assert_eq!(
            race.adjustments,
            vec![
                AbilityAdjustment {
                    ability: "constitution".into(),
                    amount: 2
                },
                AbilityAdjustment {
                    ability: "charisma".into(),
                    amount: -2
                },
            ]
        );
    }

    #[test]
    fn empty_fields_are_empty_lists() {
        let human: RaceDescriptor = "Human::".parse().unwrap();
        assert!(human.features.is_empty());
        assert!(human.adjustments.is_empty());
    }

    #[test]
    fn parses_class() {
        let class: ClassDescriptor = "Blackguard:d10:1:2:Good/Poor/Poor".parse().unwrap();
        assert_eq!(class.hit_die, 10);
        assert_eq!(class.hit_points_per_level(), 6);
        assert_eq!(class.attack, AttackProgression::Full);
        assert_eq!(class.saves[0], SaveProgression::Good);
        assert_eq!(class.saves[2], SaveProgression::Poor);

        let cleric: ClassDescriptor = "Cleric:d8:3/4:2:Good/Poor/Good".parse().unwrap();
        assert_eq!(cleric.attack, AttackProgression::ThreeQuarters);
    }

    #[test]
    fn rejects_malformed_class() {
        assert!(matches!(
            "Blackguard:d10:1:2".parse::<ClassDescriptor>(),
            Err(DescriptorError::FieldCount { found: 4, .. })
        ));
        assert!(matches!(
            "Blackguard:10:1:2:Good/Poor/Poor".parse::<ClassDescriptor>(),
            Err(DescriptorError::Field { field: "hit die", .. })
        ));
        assert!(matches!(
            "Blackguard:d10:1:2:Good/Poor".parse::<ClassDescriptor>(),
            Err(DescriptorError::Field {
                field: "save progressions",
                ..
            })
        ));
    }

    #[test]
    fn parses_level_features() {
        let level: LevelFeatures = "3:Command Undead/Aura Of Despair".parse().unwrap();
        assert_eq!(level.level, 3);
        assert_eq!(level.features, vec!["Command Undead", "Aura Of Despair"]);
        assert!("0:Nothing".parse::<LevelFeatures>().is_err());
    }
}
