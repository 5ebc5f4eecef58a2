// Captain and vice-captain selection.

use rand::Rng;

use crate::roster::CompositeRoster;

/// Flag a uniformly random captain and, among the other players, a
/// uniformly random vice-captain. Any previous flags are cleared.
pub fn assign_captaincy<R: Rng + ?Sized>(roster: &mut CompositeRoster, rng: &mut R) {
    for player in &mut roster.players {
        player.is_captain = false;
        player.is_vice_captain = false;
    }

    let n = roster.players.len();
    if n < 2 {
        return;
    }

    let captain = rng.gen_range(0..n);
    let mut vice = rng.gen_range(0..n - 1);
    if vice >= captain {
        vice += 1;
    }

    roster.players[captain].is_captain = true;
    roster.players[vice].is_vice_captain = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Player, Role};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn eleven() -> CompositeRoster {
        CompositeRoster::new(
            (0..11)
                .map(|i| Player::new(format!("p{i}"), Role::ALL[i % 4]))
                .collect(),
        )
    }

    #[test]
    fn exactly_one_captain_and_distinct_vice() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let mut roster = eleven();
            assign_captaincy(&mut roster, &mut rng);
            let captains: Vec<_> = roster.players.iter().filter(|p| p.is_captain).collect();
            let vices: Vec<_> = roster.players.iter().filter(|p| p.is_vice_captain).collect();
            assert_eq!(captains.len(), 1);
            assert_eq!(vices.len(), 1);
            assert_ne!(captains[0].name, vices[0].name);
        }
    }

    #[test]
    fn reassignment_clears_old_flags() {
        let mut roster = eleven();
        for p in &mut roster.players {
            p.is_captain = true;
        }
        assign_captaincy(&mut roster, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(roster.players.iter().filter(|p| p.is_captain).count(), 1);
    }

    #[test]
    fn every_player_can_be_chosen() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut captained = [false; 11];
        let mut vice = [false; 11];
        for _ in 0..1000 {
            let mut roster = eleven();
            assign_captaincy(&mut roster, &mut rng);
            for (i, p) in roster.players.iter().enumerate() {
                captained[i] |= p.is_captain;
                vice[i] |= p.is_vice_captain;
            }
        }
        assert!(captained.iter().all(|&c| c));
        assert!(vice.iter().all(|&v| v));
    }
}
