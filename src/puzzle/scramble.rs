use crate::puzzle::cube::Face;
use crate::puzzle::notation::Twist;
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// A random sequence of `length` twists in which no two neighbours turn the
/// same face. Faces are uniform over the five allowed, turn amounts uniform
/// over a quarter, a half and a reverse quarter.
pub fn scramble<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<Twist> {
    let mut twists: Vec<Twist> = Vec::with_capacity(length);
    for _ in 0..length {
        let last = twists.last().map(Twist::face);
        let allowed: Vec<Face> = Face::ALL
            .into_iter()
            .filter(|&face| Some(face) != last)
            .collect();
        let face = *allowed
            .choose(rng)
            .expect("at least five faces are always allowed");
        let order = rng.gen_range(1..=3);
        twists.extend(Twist::new(face, order));
    }
    twists
}
