use rand::Rng;
use shared::domain::ParticipantList;

/// Picks one participant with equal probability. `None` for an empty list.
pub fn draw_winner<R: Rng + ?Sized>(participants: &ParticipantList, rng: &mut R) -> Option<String> {
    if participants.is_empty() {
        return None;
    }
    let index = rng.random_range(0..participants.len());
    participants.get(index).map(str::to_owned)
}
