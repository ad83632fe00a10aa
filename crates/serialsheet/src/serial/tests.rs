use crate::{
    Alphabet, DEFAULT_SERIAL_LENGTH, Error, Exhaustion, RandSource, Result, SerialGenerator,
    ThreadRandom, generate,
};
use core::cell::Cell;
use std::collections::HashSet;

/// Replays a fixed list of words, wrapping around at the end.
struct MockRand {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl MockRand {
    fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            index: Cell::new(0),
        }
    }

    fn draws(&self) -> usize {
        self.index.get()
    }
}

impl RandSource<u64> for MockRand {
    fn try_rand(&self) -> Result<u64> {
        let i = self.index.get();
        self.index.set(i + 1);
        Ok(self.values[i % self.values.len()])
    }
}

/// Fails after `remaining` successful draws.
struct FailingRand {
    remaining: Cell<usize>,
}

impl RandSource<u64> for FailingRand {
    fn try_rand(&self) -> Result<u64> {
        match self.remaining.get() {
            0 => Err(Exhaustion::RandomSourceUnavailable {
                reason: "entropy pool closed".into(),
            }
            .into()),
            n => {
                self.remaining.set(n - 1);
                Ok(n as u64)
            }
        }
    }
}

fn assert_batch_well_formed(serials: &[String], count: usize, length: usize, alphabet: Alphabet) {
    assert_eq!(serials.len(), count);
    let unique: HashSet<_> = serials.iter().collect();
    assert_eq!(unique.len(), count, "serials must be pairwise distinct");
    for serial in serials {
        assert_eq!(serial.len(), length, "bad length: {serial}");
        assert!(
            serial.bytes().all(|b| alphabet.contains(b)),
            "symbol outside alphabet: {serial}"
        );
    }
}

#[test]
fn generate_returns_exact_count_of_distinct_serials() {
    for count in [1, 2, 17, 500, 5000] {
        let serials = generate(count, DEFAULT_SERIAL_LENGTH).unwrap();
        assert_batch_well_formed(&serials, count, DEFAULT_SERIAL_LENGTH, Alphabet::ALPHANUMERIC);
    }
}

#[test]
fn generate_honours_custom_length_and_alphabet() {
    let generator = SerialGenerator::from_components(ThreadRandom, Alphabet::CROCKFORD, 6);
    let serials = generator.generate(250).unwrap();
    assert_batch_well_formed(&serials, 250, 6, Alphabet::CROCKFORD);
}

#[test]
fn generate_can_exhaust_small_space_exactly() {
    // 2 symbols, length 3: exactly 8 distinct serials.
    let alphabet = Alphabet::new(b"XY").unwrap();
    let generator = SerialGenerator::from_components(ThreadRandom, alphabet, 3);
    assert_eq!(generator.capacity(), 8);

    let serials = generator.generate(8).unwrap();
    assert_batch_well_formed(&serials, 8, 3, alphabet);
}

#[test]
fn generate_rejects_zero_count() {
    let err = generate(0, DEFAULT_SERIAL_LENGTH).unwrap_err();
    assert!(err.is_invalid_argument(), "{err}");
}

#[test]
fn generate_rejects_zero_length() {
    let err = generate(3, 0).unwrap_err();
    assert!(err.is_invalid_argument(), "{err}");
}

#[test]
fn generate_fails_fast_when_count_exceeds_capacity() {
    let rng = MockRand::new(vec![0]);
    let generator = SerialGenerator::from_components(&rng, Alphabet::ALPHANUMERIC, 1);

    let err = generator.generate(37).unwrap_err();
    match err {
        Error::ResourceExhaustion(Exhaustion::SerialSpace {
            requested,
            capacity,
        }) => {
            assert_eq!(requested, 37);
            assert_eq!(capacity, 36);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(rng.draws(), 0, "no sampling may happen before the guard");
}

#[test]
fn duplicate_candidates_are_rejected_and_resampled() {
    // Length 2: words 0,0 -> "AA", 0,0 -> "AA" again (rejected), 1,2 -> "BC".
    let rng = MockRand::new(vec![0, 0, 0, 0, 1, 2]);
    let generator = SerialGenerator::from_components(&rng, Alphabet::ALPHANUMERIC, 2);

    let serials = generator.generate(2).unwrap();
    assert_eq!(serials, ["AA", "BC"]);
    assert_eq!(rng.draws(), 6);
}

#[test]
fn stuck_source_is_reported_instead_of_spinning() {
    // Every candidate is "AA": the first is kept, every later one repeats it.
    let rng = MockRand::new(vec![0]);
    let generator = SerialGenerator::from_components(&rng, Alphabet::ALPHANUMERIC, 2);

    let err = generator.generate(2).unwrap_err();
    match err {
        Error::ResourceExhaustion(Exhaustion::RandomSourceStalled {
            distinct,
            duplicates,
        }) => {
            assert_eq!(distinct, 1);
            // capacity 1296 with 1295 left: 1 * 64 + 1024 tolerated.
            assert_eq!(duplicates, 1_089);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(rng.draws(), 2 * (1 + 1_089));
}

#[test]
fn nearly_full_space_is_not_mistaken_for_a_stall() {
    // Length 1 over 36 symbols: the last serial is found once in ~36 draws on
    // average, far below the tolerated run.
    let generator = SerialGenerator::from_components(ThreadRandom, Alphabet::ALPHANUMERIC, 1);
    for _ in 0..20 {
        let serials = generator.generate(36).unwrap();
        assert_eq!(serials.len(), 36);
    }
}

#[test]
fn serials_keep_insertion_order() {
    let rng = MockRand::new(vec![25, 26, 0, 35]);
    let generator = SerialGenerator::from_components(&rng, Alphabet::ALPHANUMERIC, 1);

    let serials = generator.generate(4).unwrap();
    assert_eq!(serials, ["Z", "0", "A", "9"]);
}

#[test]
fn biased_tail_words_are_redrawn() {
    // u64::MAX lies in the rejected tail for a 36-symbol alphabet.
    let rng = MockRand::new(vec![u64::MAX, 1]);
    let generator = SerialGenerator::from_components(&rng, Alphabet::ALPHANUMERIC, 1);

    let serials = generator.generate(1).unwrap();
    assert_eq!(serials, ["B"]);
    assert_eq!(rng.draws(), 2);
}

#[test]
fn random_source_failure_discards_partial_batch() {
    let rng = FailingRand {
        remaining: Cell::new(5),
    };
    let generator = SerialGenerator::from_components(rng, Alphabet::ALPHANUMERIC, 2);

    let err = generator.generate(10).unwrap_err();
    assert!(err.is_resource_exhaustion(), "{err}");
    assert!(matches!(
        err,
        Error::ResourceExhaustion(Exhaustion::RandomSourceUnavailable { .. })
    ));
}

#[test]
fn well_formed_checks_length_and_alphabet_only() {
    let generator = SerialGenerator::new(4);
    assert!(generator.is_well_formed("AB12"));
    assert!(!generator.is_well_formed("AB1"));
    assert!(!generator.is_well_formed("AB123"));
    assert!(!generator.is_well_formed("ab12"));
    assert!(!generator.is_well_formed("AB-2"));
}

#[test]
fn independent_batches_are_disjoint_in_practice() {
    let a: HashSet<_> = generate(1000, DEFAULT_SERIAL_LENGTH)
        .unwrap()
        .into_iter()
        .collect();
    let b: HashSet<_> = generate(1000, DEFAULT_SERIAL_LENGTH)
        .unwrap()
        .into_iter()
        .collect();
    assert!(a.is_disjoint(&b));
}

#[test]
fn symbols_are_roughly_uniform() {
    let serials = generate(2000, DEFAULT_SERIAL_LENGTH).unwrap();
    let mut counts = [0_usize; 36];
    for serial in &serials {
        for b in serial.bytes() {
            counts[Alphabet::ALPHANUMERIC.index_of(b).unwrap()] += 1;
        }
    }
    // 20_000 symbols, 555.6 expected per bucket.
    for (i, &n) in counts.iter().enumerate() {
        assert!((400..=720).contains(&n), "symbol {i} drawn {n} times");
    }
}
