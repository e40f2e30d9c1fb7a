use blake2::{Blake2b512, Digest};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Make a random number generator from a global seed
/// and a string id.
///
/// The global seed is a single piece of information intended
/// to control all randomness in the program. In order to have
/// several independent streams (one for the uniform draws, one
/// for the weighted categorical draws) a unique string id is
/// mixed in to make each generator different from the others.
///
/// The id is concatenated with the global seed and the result
/// is hashed. The first 32 bytes of the hash seed the generator.
pub fn make_rng(global_seed: u64, id: &str) -> ChaCha8Rng {
    let message = format!("{id}{global_seed}");
    let mut hasher = Blake2b512::new();
    hasher.update(message);
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hasher.finalize()[0..32]);
    ChaCha8Rng::from_seed(seed)
}

/// The two random streams used by the generator.
///
/// `general` drives the uniform draws of the appointment sampler
/// (dates, lead times, slots, patient and clinic picks, the status
/// draw). `weighted` drives the patient attribute columns and the
/// appointment type. Both come from the same global seed, so one
/// number reproduces the whole dataset.
pub struct RandomSources {
    pub general: ChaCha8Rng,
    pub weighted: ChaCha8Rng,
}

impl RandomSources {
    pub fn new(global_seed: u64) -> Self {
        Self {
            general: make_rng(global_seed, "general"),
            weighted: make_rng(global_seed, "weighted"),
        }
    }
}
