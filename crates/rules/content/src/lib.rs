//! Data-driven rules content and loaders.
//!
//! This crate houses the embedded option tables and the loaders that turn
//! them into a [`rules_core::Ruleset`]:
//! - Descriptor parsing for races, feats, domains and classes
//! - Content packs (data-driven via RON), one per category
//! - Campaign configuration and character files (data-driven via TOML)
//!
//! Packs only register choices, edges and notes; all derivation happens in
//! `rules-core`.

pub mod descriptor;

#[cfg(feature = "loaders")]
pub mod loaders;
#[cfg(feature = "loaders")]
pub mod packs;

pub use descriptor::{
    AbilityAdjustment, AttackProgression, ClassDescriptor, DescriptorError, DomainDescriptor,
    FeatDescriptor, LevelFeatures, RaceDescriptor, SaveProgression,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    Campaign, CampaignConfig, CharacterLoader, CharacterSheet, ConfigLoader, ContentFactory,
    ContentSelection, FactValue, LoadResult, TableLoader,
};

#[cfg(feature = "loaders")]
pub use packs::{
    BaseTemplate, ContentEntry, ContentPack, ContentTable, DomainPack, FeatPack, LoadReport,
    PrestigePack, RacePack,
};
