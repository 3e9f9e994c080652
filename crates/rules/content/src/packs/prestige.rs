//! Class loader.
//!
//! Base and prestige classes share one descriptor,
//! `Name:HitDie:Attack:SkillPoints:Fort/Ref/Will`, read from the class level
//! fact `levels.<Class>`:
//!
//! - `baseAttack`, `saves.*`, `hitPoints` and `skillPoints` accumulate a
//!   per-class progression (`+=`), so multiclass characters sum them;
//! - each `Level:Feature/Feature` row gates `features.<Feature>` on the
//!   class level.

use rules_core::{AttrId, BinaryOp, Expr, Operator, Ruleset};

use super::{ContentEntry, ContentPack, ContentTable, define_edge};
use crate::descriptor::{ClassDescriptor, LevelFeatures, SAVES};
use crate::loaders::LoadResult;

const EMBEDDED: &str = include_str!("../../data/classes.ron");

#[derive(Clone, Debug)]
pub struct PrestigePack {
    table: ContentTable,
}

impl PrestigePack {
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self::new(ContentTable::from_ron(EMBEDDED, "classes.ron")?))
    }

    pub fn new(table: ContentTable) -> Self {
        Self { table }
    }
}

impl ContentPack for PrestigePack {
    fn category(&self) -> &'static str {
        "levels"
    }

    fn file_name(&self) -> &'static str {
        "classes.ron"
    }

    fn table(&self) -> &ContentTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ContentTable {
        &mut self.table
    }

    fn register(&self, entry: &ContentEntry, ruleset: &mut Ruleset) -> LoadResult<()> {
        let class: ClassDescriptor = entry.descriptor.parse()?;
        ruleset.define_choice(self.category(), &entry.key, &entry.descriptor);

        let level = AttrId::new("levels", &entry.key)?;
        let progression = |target: AttrId, bonus: Expr, ruleset: &mut Ruleset| {
            define_edge(ruleset, target, level.clone(), Operator::Accumulate, bonus);
        };

        progression(AttrId::root("baseAttack")?, class.attack.bonus(), ruleset);
        for (save, rate) in SAVES.iter().zip(class.saves) {
            progression(AttrId::new("saves", save)?, rate.bonus(), ruleset);
        }
        progression(
            AttrId::root("hitPoints")?,
            Expr::binary(BinaryOp::Mul, Expr::Source, Expr::lit(class.hit_points_per_level())),
            ruleset,
        );
        // source * max(<skill points> + {intelligenceModifier}, 1)
        let per_level = Expr::Max(vec![
            Expr::binary(
                BinaryOp::Add,
                Expr::lit(class.skill_points),
                Expr::Attr(AttrId::root("intelligenceModifier")?),
            ),
            Expr::lit(1),
        ]);
        progression(
            AttrId::root("skillPoints")?,
            Expr::binary(BinaryOp::Mul, Expr::Source, per_level),
            ruleset,
        );

        for row in &entry.levels {
            let gained: LevelFeatures = row.parse()?;
            let gate = Expr::cond(
                Expr::binary(BinaryOp::Ge, Expr::Source, Expr::lit(gained.level)),
                Expr::lit(1),
                Expr::Null,
            );
            for feature in &gained.features {
                define_edge(
                    ruleset,
                    AttrId::new("features", feature)?,
                    level.clone(),
                    Operator::Set,
                    gate.clone(),
                );
            }
        }
        Ok(())
    }
}
