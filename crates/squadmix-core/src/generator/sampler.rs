// Combination sampler: turns one distribution into concrete rosters.
//
// The candidate space is staged as independent choice groups:
//   A: keeper subsets, batter subsets, all-rounder subsets, bowler subsets
//   B: one forced pick per role A skipped, then the open slots
// and walked as a Cartesian product, stopping once the per-distribution
// cap is reached.

use std::collections::HashSet;

use tracing::trace;

use super::combinations::{combinations, CartesianIndices};
use super::distribution::Distribution;
use super::partition::RolePools;
use super::{
    is_valid_candidate, MAX_COMBOS_PER_ROLE, MAX_REMAINING_COMBOS, MAX_TEAMS_PER_DISTRIBUTION,
};
use crate::roster::{team_key, CompositeRoster, Player, Role, SQUAD_SIZE};

/// Realize up to `MAX_TEAMS_PER_DISTRIBUTION` unique rosters from `distribution`.
///
/// Every accepted roster's key is added to `used_keys`. An empty result is a
/// normal outcome.
pub fn sample_distribution(
    a: &RolePools,
    b: &RolePools,
    distribution: &Distribution,
    used_keys: &mut HashSet<String>,
) -> Vec<CompositeRoster> {
    let b_total = distribution.b_total();
    let forced = distribution.b_required.total();
    let Some(open_slots) = b_total.checked_sub(forced) else {
        return Vec::new();
    };

    // B players not in a forced role are eligible for the open slots.
    let forced_roles: Vec<Role> = distribution.forced_roles().collect();
    let open_pool = b.players_where(|role| !forced_roles.contains(&role));

    let mut groups: Vec<Vec<Vec<&Player>>> = Vec::with_capacity(9);
    for role in Role::ALL {
        groups.push(combinations(
            a.get(role),
            distribution.a_counts.get(role),
            MAX_COMBOS_PER_ROLE,
        ));
    }
    for &role in &forced_roles {
        let need = distribution.b_required.get(role);
        groups.push(combinations(b.get(role), need, usize::MAX));
    }
    groups.push(combinations(&open_pool, open_slots, MAX_REMAINING_COMBOS));

    let mut teams = Vec::new();
    let sizes = groups.iter().map(Vec::len).collect();

    for choice in CartesianIndices::new(sizes) {
        let candidate: Vec<&Player> = choice
            .iter()
            .zip(&groups)
            .flat_map(|(&i, group)| group[i].iter().copied())
            .collect();

        if candidate.len() != SQUAD_SIZE {
            continue;
        }

        let key = team_key(candidate.iter().copied());
        if used_keys.contains(&key) {
            continue;
        }

        if is_valid_candidate(&candidate) {
            trace!(key = %key, "structured roster accepted");
            teams.push(CompositeRoster::new(candidate.into_iter().cloned().collect()));
            used_keys.insert(key);

            if teams.len() >= MAX_TEAMS_PER_DISTRIBUTION {
                return teams;
            }
        }
    }

    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::distribution::{plan_distributions, RoleCounts};
    use crate::roster::Source;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pools(source: Source, shape: [usize; 4], prefix: &str) -> RolePools {
        let mut players = Vec::new();
        for role in Role::ALL {
            for i in 0..shape[role.sort_order()] {
                players.push(Player::new(format!("{prefix}-{role}-{i}"), role));
            }
        }
        RolePools::partition(&players, source)
    }

    fn distribution(a_counts: RoleCounts) -> Distribution {
        let mut required = [0; 4];
        for role in Role::ALL {
            required[role.sort_order()] = usize::from(a_counts.get(role) == 0);
        }
        Distribution {
            a_counts,
            b_required: RoleCounts::new(required[0], required[1], required[2], required[3]),
            b_capacity: RoleCounts::new(2, 5, 5, 5),
        }
    }

    #[test]
    fn rosters_follow_the_distribution() {
        let a = pools(Source::A, [1, 4, 3, 3], "a");
        let b = pools(Source::B, [1, 4, 3, 3], "b");
        let d = distribution(RoleCounts::new(0, 2, 1, 2));
        let mut used = HashSet::new();

        let teams = sample_distribution(&a, &b, &d, &mut used);
        assert!(!teams.is_empty());
        assert!(teams.len() <= MAX_TEAMS_PER_DISTRIBUTION);
        assert_eq!(used.len(), teams.len());

        for team in &teams {
            assert_eq!(team.players.len(), SQUAD_SIZE);
            assert!(team.has_role_coverage());
            assert_eq!(team.count_from(Source::A), 5);
            assert_eq!(team.count_from(Source::B), 6);
            // A supplied no keeper, so B's keeper is in every roster.
            assert!(team
                .players
                .iter()
                .any(|p| p.role == Role::WicketKeeper && p.original_source == Some(Source::B)));
            assert!(used.contains(&team.team_key()));
        }
    }

    #[test]
    fn stops_at_per_distribution_cap() {
        let a = pools(Source::A, [2, 5, 2, 2], "a");
        let b = pools(Source::B, [2, 3, 3, 3], "b");
        let d = distribution(RoleCounts::new(1, 2, 1, 1));
        let mut used = HashSet::new();
        let teams = sample_distribution(&a, &b, &d, &mut used);
        assert_eq!(teams.len(), MAX_TEAMS_PER_DISTRIBUTION);
    }

    #[test]
    fn skips_keys_already_used() {
        let a = pools(Source::A, [2, 5, 2, 2], "a");
        let b = pools(Source::B, [2, 3, 3, 3], "b");
        let d = distribution(RoleCounts::new(1, 2, 1, 1));

        let mut used = HashSet::new();
        let first = sample_distribution(&a, &b, &d, &mut used);
        let second = sample_distribution(&a, &b, &d, &mut used);

        let first_keys: HashSet<String> = first.iter().map(|t| t.team_key()).collect();
        for team in &second {
            assert!(!first_keys.contains(&team.team_key()));
        }
        assert_eq!(used.len(), first.len() + second.len());
    }

    #[test]
    fn empty_when_b_cannot_fill_forced_roles() {
        // A supplies no keeper and B has none either.
        let a = pools(Source::A, [0, 4, 4, 3], "a");
        let b = pools(Source::B, [0, 4, 4, 3], "b");
        let d = distribution(RoleCounts::new(0, 2, 1, 2));
        let mut used = HashSet::new();
        assert!(sample_distribution(&a, &b, &d, &mut used).is_empty());
        assert!(used.is_empty());
    }

    #[test]
    fn planned_distributions_yield_rosters() {
        let a = pools(Source::A, [1, 4, 3, 3], "a");
        let b = pools(Source::B, [1, 4, 3, 3], "b");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let plan = plan_distributions(&a, &b, &mut rng);
        let mut used = HashSet::new();
        let total: usize = plan
            .iter()
            .map(|d| sample_distribution(&a, &b, d, &mut used).len())
            .sum();
        assert!(total >= 20, "structured sampling produced only {total} rosters");
    }
}
