//! Read-only lookup tables for game data
//!
//! [`SpecializationCatalog`] maps a specialization id to its role and name;
//! [`AffixCatalog`] maps a keystone affix id to its name. Both are pure data:
//! a miss means "unknown" and callers skip the entry.

use crate::types::Role;
use std::collections::HashMap;

/// A playable specialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specialization {
    pub id: u32,
    pub role: Role,
    pub class_name: &'static str,
    pub spec_name: &'static str,
}

impl Specialization {
    /// e.g. "Blood Death Knight"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.spec_name, self.class_name)
    }
}

/// Lookup from specialization id to role and display name
pub trait SpecializationCatalog {
    fn lookup(&self, spec_id: u32) -> Option<&Specialization>;
}

impl SpecializationCatalog for HashMap<u32, Specialization> {
    fn lookup(&self, spec_id: u32) -> Option<&Specialization> {
        self.get(&spec_id)
    }
}

/// Lookup from keystone affix id to display name
pub trait AffixCatalog {
    fn affix_name(&self, affix_id: u32) -> Option<&str>;
}

impl AffixCatalog for HashMap<u32, String> {
    fn affix_name(&self, affix_id: u32) -> Option<&str> {
        self.get(&affix_id).map(String::as_str)
    }
}

const fn spec(
    id: u32,
    role: Role,
    class_name: &'static str,
    spec_name: &'static str,
) -> Specialization {
    Specialization {
        id,
        role,
        class_name,
        spec_name,
    }
}

const SPECIALIZATIONS: &[Specialization] = &[
    spec(250, Role::Tank, "Death Knight", "Blood"),
    spec(251, Role::Damage, "Death Knight", "Frost"),
    spec(252, Role::Damage, "Death Knight", "Unholy"),
    spec(577, Role::Damage, "Demon Hunter", "Havoc"),
    spec(581, Role::Tank, "Demon Hunter", "Vengeance"),
    spec(102, Role::Damage, "Druid", "Balance"),
    spec(103, Role::Damage, "Druid", "Feral"),
    spec(104, Role::Tank, "Druid", "Guardian"),
    spec(105, Role::Healer, "Druid", "Restoration"),
    spec(1467, Role::Damage, "Evoker", "Devastation"),
    spec(1468, Role::Healer, "Evoker", "Preservation"),
    spec(1473, Role::Damage, "Evoker", "Augmentation"),
    spec(253, Role::Damage, "Hunter", "Beast Mastery"),
    spec(254, Role::Damage, "Hunter", "Marksmanship"),
    spec(255, Role::Damage, "Hunter", "Survival"),
    spec(62, Role::Damage, "Mage", "Arcane"),
    spec(63, Role::Damage, "Mage", "Fire"),
    spec(64, Role::Damage, "Mage", "Frost"),
    spec(268, Role::Tank, "Monk", "Brewmaster"),
    spec(270, Role::Healer, "Monk", "Mistweaver"),
    spec(269, Role::Damage, "Monk", "Windwalker"),
    spec(65, Role::Healer, "Paladin", "Holy"),
    spec(66, Role::Tank, "Paladin", "Protection"),
    spec(70, Role::Damage, "Paladin", "Retribution"),
    spec(256, Role::Healer, "Priest", "Discipline"),
    spec(257, Role::Healer, "Priest", "Holy"),
    spec(258, Role::Damage, "Priest", "Shadow"),
    spec(259, Role::Damage, "Rogue", "Assassination"),
    spec(260, Role::Damage, "Rogue", "Outlaw"),
    spec(261, Role::Damage, "Rogue", "Subtlety"),
    spec(262, Role::Damage, "Shaman", "Elemental"),
    spec(263, Role::Damage, "Shaman", "Enhancement"),
    spec(264, Role::Healer, "Shaman", "Restoration"),
    spec(265, Role::Damage, "Warlock", "Affliction"),
    spec(266, Role::Damage, "Warlock", "Demonology"),
    spec(267, Role::Damage, "Warlock", "Destruction"),
    spec(71, Role::Damage, "Warrior", "Arms"),
    spec(72, Role::Damage, "Warrior", "Fury"),
    spec(73, Role::Tank, "Warrior", "Protection"),
];

const AFFIXES: &[(u32, &str)] = &[
    (3, "Volcanic"),
    (4, "Necrotic"),
    (6, "Raging"),
    (7, "Bolstering"),
    (8, "Sanguine"),
    (9, "Tyrannical"),
    (10, "Fortified"),
    (11, "Bursting"),
    (12, "Grievous"),
    (13, "Explosive"),
    (14, "Quaking"),
    (117, "Reaping"),
    (120, "Awakened"),
    (121, "Prideful"),
    (122, "Inspiring"),
    (123, "Spiteful"),
    (124, "Storming"),
    (128, "Tormented"),
    (129, "Infernal"),
    (130, "Encrypted"),
    (131, "Shrouded"),
    (132, "Thundering"),
    (134, "Entangling"),
    (135, "Afflicted"),
    (136, "Incorporeal"),
    (137, "Shielding"),
];

/// The game's specializations and affixes, built from static tables
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    specs: HashMap<u32, Specialization>,
    affixes: HashMap<u32, &'static str>,
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self {
            specs: SPECIALIZATIONS.iter().map(|s| (s.id, s.clone())).collect(),
            affixes: AFFIXES.iter().copied().collect(),
        }
    }

    pub fn specialization_count(&self) -> usize {
        self.specs.len()
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecializationCatalog for BuiltinCatalog {
    fn lookup(&self, spec_id: u32) -> Option<&Specialization> {
        self.specs.get(&spec_id)
    }
}

impl AffixCatalog for BuiltinCatalog {
    fn affix_name(&self, affix_id: u32) -> Option<&str> {
        self.affixes.get(&affix_id).copied()
    }
}
