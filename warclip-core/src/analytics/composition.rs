//! Role composition of a session's roster.

use serde::Serialize;

use crate::catalog::SpecializationCatalog;
use crate::types::{Combatant, Role};

/// Number of combatants per role.
///
/// Exactly three roles exist; all start at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub tank: u32,
    pub healer: u32,
    pub damage: u32,
}

impl RoleCount {
    pub fn get(&self, role: Role) -> u32 {
        match role {
            Role::Tank => self.tank,
            Role::Healer => self.healer,
            Role::Damage => self.damage,
        }
    }

    pub fn total(&self) -> u32 {
        self.tank + self.healer + self.damage
    }

    fn increment(&mut self, role: Role) {
        match role {
            Role::Tank => self.tank += 1,
            Role::Healer => self.healer += 1,
            Role::Damage => self.damage += 1,
        }
    }
}

/// Count combatants per role.
///
/// Combatants without a spec id, or whose id the catalog does not know, are
/// skipped. The result therefore under-counts on partial data and never fails.
pub fn role_count<'a, C>(
    combatants: impl IntoIterator<Item = &'a Combatant>,
    catalog: &C,
) -> RoleCount
where
    C: SpecializationCatalog + ?Sized,
{
    combatants
        .into_iter()
        .filter_map(|c| c.spec_id)
        .filter_map(|id| catalog.lookup(id))
        .fold(RoleCount::default(), |mut count, spec| {
            count.increment(spec.role);
            count
        })
}
