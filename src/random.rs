//! A deterministic random number generator whose seed evolution can be
//! checkpointed, rewound and replayed exactly.
//!
//! The core is a three-shift xorshift64 (21, -35, 4). On top of it sits a
//! history of recorded seeds: `advance_generator` either appends the current
//! seed as a new checkpoint or replays an already recorded one,
//! `reset_generator` undoes any draws made since the current checkpoint, and
//! `reverse_generator` steps back to the previous checkpoint. A worked
//! sequence, with letters standing for seeds and the caret marking `index`:
//!
//! ```text
//! new(A)                    seed A   history [A]        ^ at A
//! next_u64()      -> R      seed B   history [A]        ^ at A
//! advance_generator()       seed B   history [A, B]     ^ at B
//! next_u64()      -> S      seed C
//! next_u64()      -> T      seed D
//! advance_generator()       seed D   history [A, B, D]  ^ at D
//! next_u64()      -> U      seed E
//! reset_generator()         seed D                      ^ at D
//! next_u64()      -> U      seed E
//! reverse_generator()       seed B   history [A, B, D]  ^ at B
//! next_u64()      -> S      seed C
//! ```
//!
//! Callers decide where checkpoints fall: the growing tree engine records one
//! per growth step, which is exactly the granularity its undo needs.
//!
//! xorshift generators can neither produce nor be seeded with zero, so zero
//! seeds are rejected at construction. This generator is not suitable for
//! secure applications.

use std::time::{SystemTime, UNIX_EPOCH};

use error_chain::bail;

use crate::errors::*;

#[derive(Debug, Clone)]
pub struct ReversibleRandom {
    seed: u64,
    history: Vec<u64>,
    index: usize,
    on_record: bool,
}

/// Structural equality over seed, history and index; `on_record` is derived
/// bookkeeping and does not affect future draws.
impl PartialEq for ReversibleRandom {
    fn eq(&self, other: &ReversibleRandom) -> bool {
        self.seed == other.seed && self.index == other.index && self.history == other.history
    }
}
impl Eq for ReversibleRandom {}

impl ReversibleRandom {
    pub fn new(seed: u64) -> Result<ReversibleRandom> {
        if seed == 0 {
            bail!(ErrorKind::ZeroSeed);
        }
        Ok(ReversibleRandom {
            seed,
            history: vec![seed],
            index: 0,
            on_record: true,
        })
    }

    /// Seeds from the system clock. Not predictable-resistant, just varied.
    pub fn from_clock() -> ReversibleRandom {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(1);
        let seed = if nanos != 0 { nanos } else { 1 };
        ReversibleRandom {
            seed,
            history: vec![seed],
            index: 0,
            on_record: true,
        }
    }

    /// The initial seed the generator was constructed with.
    #[inline]
    pub fn initial_seed(&self) -> u64 {
        self.history[0]
    }

    #[inline]
    pub fn seed_at(&self, index: usize) -> Option<u64> {
        self.history.get(index).cloned()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_initial_state(&self) -> bool {
        self.index == 0
    }

    #[inline]
    pub fn is_latest_state(&self) -> bool {
        self.index == self.history.len() - 1
    }

    /// True iff no draw has happened since the last history-modifying call.
    #[inline]
    pub fn on_record(&self) -> bool {
        self.on_record
    }

    /// Moves the history index forward one position: replays the recorded
    /// seed if one exists there, otherwise records the current seed as a new
    /// checkpoint.
    pub fn advance_generator(&mut self) {
        self.index += 1;
        if self.index >= self.history.len() {
            self.history.push(self.seed);
        } else {
            self.seed = self.history[self.index];
        }
        self.on_record = true;
    }

    /// Undoes any draws made since the current checkpoint, without moving
    /// the index.
    pub fn reset_generator(&mut self) {
        self.seed = self.history[self.index];
        self.on_record = true;
    }

    /// Jumps to an arbitrary previously recorded checkpoint.
    pub fn reset_generator_to(&mut self, index: usize) -> Result<()> {
        if index >= self.history.len() {
            bail!(ErrorKind::HistoryIndexOutOfRange(index, self.history.len()));
        }
        self.index = index;
        self.seed = self.history[index];
        self.on_record = true;
        Ok(())
    }

    /// Moves the history index back one position and restores that seed.
    pub fn reverse_generator(&mut self) -> Result<()> {
        if self.is_initial_state() {
            bail!(ErrorKind::ReverseBeforeInitialCheckpoint);
        }
        self.index -= 1;
        self.seed = self.history[self.index];
        self.on_record = true;
        Ok(())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.on_record = false;
        self.seed ^= self.seed << 21;
        self.seed ^= self.seed >> 35;
        self.seed ^= self.seed << 4;
        self.seed
    }

    /// Uniform draw in `0..n` by rejection sampling: the top bit of the raw
    /// draw is masked off and draws landing in the incomplete band at the
    /// top of the range are discarded, avoiding modulo bias.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        debug_assert!(n > 0, "bounded draws need a positive bound");
        loop {
            let bits = self.next_u64() >> 1;
            let val = bits % n;
            if bits - val <= (u64::max_value() >> 1) - (n - 1) {
                return val;
            }
        }
    }

    #[inline]
    pub fn next_index(&mut self, n: usize) -> usize {
        self.next_u64_below(n as u64) as usize
    }

    /// Uniform draw in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn next_f64_below(&mut self, max: f64) -> f64 {
        self.next_f64() * max
    }

    pub fn next_f64_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64_below(max - min)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_index(items.len())]
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};

    use super::*;

    #[test]
    fn zero_seed_is_rejected() {
        assert!(ReversibleRandom::new(0).is_err());
        assert!(ReversibleRandom::new(1).is_ok());
    }

    #[test]
    fn draws_are_deterministic_for_a_seed() {
        let mut a = ReversibleRandom::new(987_654_321).expect("non-zero seed");
        let mut b = ReversibleRandom::new(987_654_321).expect("non-zero seed");
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn draws_never_yield_zero_seed() {
        let mut rng = ReversibleRandom::new(0xDEAD_BEEF).expect("non-zero seed");
        for _ in 0..10_000 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn checkpoint_replay_and_rewind() {
        // mirrors the worked sequence in the module docs
        let mut rng = ReversibleRandom::new(42).expect("non-zero seed");
        assert_eq!(rng.initial_seed(), 42);
        assert_eq!(rng.seed_at(0), Some(42));
        assert_eq!(rng.seed_at(1), None);
        let r = rng.next_u64();

        rng.advance_generator();
        assert_eq!(rng.index(), 1);
        assert!(rng.is_latest_state());
        let s = rng.next_u64();
        let _t = rng.next_u64();

        rng.advance_generator();
        assert_eq!(rng.history_len(), 3);
        let u = rng.next_u64();
        let _v = rng.next_u64();

        rng.reset_generator();
        assert_eq!(rng.next_u64(), u);

        rng.reverse_generator().expect("not at the initial checkpoint");
        assert_eq!(rng.index(), 1);
        assert!(!rng.is_latest_state());
        assert_eq!(rng.next_u64(), s);

        rng.reset_generator();
        assert_eq!(rng.next_u64(), s);

        // advancing inside recorded history replays, it does not append
        rng.advance_generator();
        assert_eq!(rng.history_len(), 3);
        assert_eq!(rng.next_u64(), u);

        rng.reset_generator_to(0).expect("index 0 always exists");
        assert_eq!(rng.next_u64(), r);
    }

    #[test]
    fn on_record_tracks_draws() {
        let mut rng = ReversibleRandom::new(7).expect("non-zero seed");
        assert!(rng.on_record());
        rng.next_u64();
        assert!(!rng.on_record());
        rng.advance_generator();
        assert!(rng.on_record());
        rng.next_f64();
        assert!(!rng.on_record());
        rng.reset_generator();
        assert!(rng.on_record());
    }

    #[test]
    fn reverse_from_initial_state_is_an_error() {
        let mut rng = ReversibleRandom::new(3).expect("non-zero seed");
        assert!(rng.reverse_generator().is_err());
        rng.advance_generator();
        assert!(rng.reverse_generator().is_ok());
        assert!(rng.reverse_generator().is_err());
    }

    #[test]
    fn reset_to_unrecorded_index_is_an_error() {
        let mut rng = ReversibleRandom::new(3).expect("non-zero seed");
        assert!(rng.reset_generator_to(1).is_err());
        rng.advance_generator();
        assert!(rng.reset_generator_to(1).is_ok());
        assert!(rng.reset_generator_to(2).is_err());
    }

    #[test]
    fn bounded_draws_stay_in_range() {
        fn prop(seed: u64, bound: u64) -> TestResult {
            if seed == 0 || bound == 0 {
                return TestResult::discard();
            }
            let mut rng = ReversibleRandom::new(seed).expect("non-zero seed");
            TestResult::from_bool((0..100).all(|_| rng.next_u64_below(bound) < bound))
        }
        quickcheck(prop as fn(u64, u64) -> TestResult);
    }

    #[test]
    fn float_draws_stay_in_range() {
        let mut rng = ReversibleRandom::new(555).expect("non-zero seed");
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!(x >= 0.0 && x < 1.0);
            let y = rng.next_f64_range(-2.0, 3.0);
            assert!(y >= -2.0 && y < 3.0);
        }
    }

    #[test]
    fn choose_picks_members() {
        let mut rng = ReversibleRandom::new(99).expect("non-zero seed");
        let items = ["a", "b", "c"];
        for _ in 0..50 {
            assert!(items.contains(rng.choose(&items)));
        }
    }

    #[test]
    fn equality_ignores_on_record() {
        let mut a = ReversibleRandom::new(11).expect("non-zero seed");
        a.advance_generator();
        a.next_u64();
        a.reset_generator();

        let mut b = ReversibleRandom::new(11).expect("non-zero seed");
        b.advance_generator();
        assert_eq!(a, b);
    }
}
