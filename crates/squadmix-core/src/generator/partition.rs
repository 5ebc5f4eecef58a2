// Role partitioner: groups a source roster's players by role.

use crate::roster::{Player, Role, Source};

/// One source's players grouped by role, each stamped with the source.
#[derive(Debug, Clone)]
pub struct RolePools {
    pools: [Vec<Player>; 4],
}

impl RolePools {
    /// Partition `players` by role, preserving roster order within each role.
    pub fn partition(players: &[Player], source: Source) -> Self {
        let mut pools: [Vec<Player>; 4] = Default::default();
        for player in players {
            pools[player.role.sort_order()].push(player.stamped(source));
        }
        RolePools { pools }
    }

    pub fn get(&self, role: Role) -> &[Player] {
        &self.pools[role.sort_order()]
    }

    pub fn available(&self, role: Role) -> usize {
        self.pools[role.sort_order()].len()
    }

    /// All players of the roles for which `include` returns true, in
    /// `Role::ALL` order.
    pub fn players_where(&self, include: impl Fn(Role) -> bool) -> Vec<Player> {
        Role::ALL
            .iter()
            .filter(|&&role| include(role))
            .flat_map(|&role| self.get(role).iter().cloned())
            .collect()
    }
}
