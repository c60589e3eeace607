use std::collections::BTreeMap;

use attack_core::{Record, RngHandle};
use attack_gen::{
    perturb_alignment, perturb_dataset, slice_distance, swap_slice, PerturbOptions, SwapScope,
};
use proptest::prelude::*;

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn counts(values: &[String]) -> BTreeMap<&str, usize> {
    let mut map = BTreeMap::new();
    for value in values {
        *map.entry(value.as_str()).or_insert(0) += 1;
    }
    map
}

proptest! {
    #[test]
    fn accepted_swaps_hit_exact_distance(seed in any::<u64>(), len in 4usize..10, level in 1usize..4) {
        let slice: Vec<String> = (1..=len).map(|idx| idx.to_string()).collect();
        let mut rng = RngHandle::from_seed(seed);
        let swapped = swap_slice(&slice, level, 10_000, &mut rng).unwrap();
        prop_assert_eq!(swapped.len(), slice.len());
        prop_assert_eq!(counts(&swapped), counts(&slice));
        prop_assert_eq!(slice_distance(&slice, &swapped), level + 1);
    }

    #[test]
    fn interior_scope_keeps_boundaries(seed in any::<u64>(), len in 4usize..10) {
        let alignment: Vec<String> = (0..len).map(|idx| idx.to_string()).collect();
        let options = PerturbOptions { scope: SwapScope::Interior, level: 1, max_attempts: 1_000 };
        let mut rng = RngHandle::from_seed(seed);
        let perturbed = perturb_alignment(&alignment, &options, &mut rng).unwrap();
        prop_assert_eq!(perturbed.len(), alignment.len());
        prop_assert_eq!(&perturbed[0], &alignment[0]);
        prop_assert_eq!(&perturbed[len - 1], &alignment[len - 1]);
        prop_assert_ne!(perturbed, alignment);
    }
}

#[test]
fn two_position_slice_always_flips() {
    let alignment = tokens(&["0", "1", "2", "3"]);
    let options = PerturbOptions {
        scope: SwapScope::Interior,
        level: 1,
        max_attempts: 10,
    };
    let mut rng = RngHandle::from_seed(42);
    let perturbed = perturb_alignment(&alignment, &options, &mut rng).unwrap();
    assert_eq!(perturbed, tokens(&["0", "2", "1", "3"]));
}

#[test]
fn with_input_scope_keeps_only_terminal_marker() {
    let alignment = tokens(&["0", "1", "2", "3"]);
    let options = PerturbOptions {
        scope: SwapScope::WithInput,
        level: 1,
        max_attempts: 100,
    };
    let mut rng = RngHandle::from_seed(3);
    let perturbed = perturb_alignment(&alignment, &options, &mut rng).unwrap();
    assert_eq!(perturbed[3], "3");
    assert_eq!(slice_distance(&alignment[..3], &perturbed[..3]), 2);
}

#[test]
fn whole_scope_may_move_every_position() {
    let alignment = tokens(&["0", "1"]);
    let options = PerturbOptions {
        scope: SwapScope::Whole,
        level: 1,
        max_attempts: 10,
    };
    let mut rng = RngHandle::from_seed(9);
    let perturbed = perturb_alignment(&alignment, &options, &mut rng).unwrap();
    assert_eq!(perturbed, tokens(&["1", "0"]));
}

#[test]
fn infeasible_level_reports_error() {
    let slice = tokens(&["1", "2", "3"]);
    let mut rng = RngHandle::from_seed(5);
    let err = swap_slice(&slice, 2, 200, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "infeasible-level");
    assert_eq!(err.info().context.get("attempts").unwrap(), "200");
    assert_eq!(err.info().context.get("slice_len").unwrap(), "3");
}

#[test]
fn oversized_level_fails_without_overflow() {
    let slice = tokens(&["1", "2", "3"]);
    let mut rng = RngHandle::from_seed(5);
    let err = swap_slice(&slice, usize::MAX, 1, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "infeasible-level");
    assert_eq!(err.info().context.get("attempts").unwrap(), "0");

    // Three characters can never be four edits apart.
    let err = swap_slice(&slice, 3, 1_000, &mut rng).unwrap_err();
    assert_eq!(err.info().context.get("attempts").unwrap(), "0");
}

#[test]
fn level_at_slice_length_still_runs_the_search() {
    // Two swaps over two positions always cancel, so every attempt is spent.
    let slice = tokens(&["10", "20"]);
    let mut rng = RngHandle::from_seed(12);
    let err = swap_slice(&slice, 2, 25, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "infeasible-level");
    assert_eq!(err.info().context.get("attempts").unwrap(), "25");
    assert_eq!(err.info().context.get("level").unwrap(), "2");
}

#[test]
fn level_above_slice_length_can_still_succeed() {
    // An odd number of swaps over three positions is a single transposition.
    let slice = tokens(&["ab", "cd", "ef"]);
    let mut rng = RngHandle::from_seed(31);
    let swapped = swap_slice(&slice, 3, 10, &mut rng).unwrap();
    assert_eq!(counts(&swapped), counts(&slice));
    assert_eq!(slice_distance(&slice, &swapped), 4);
}

#[test]
fn identical_tokens_cannot_be_distorted() {
    let slice = tokens(&["1", "1", "1"]);
    let mut rng = RngHandle::from_seed(5);
    let err = swap_slice(&slice, 1, 50, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "infeasible-level");
}

#[test]
fn slices_shorter_than_two_fail_immediately() {
    let mut rng = RngHandle::from_seed(1);
    let err = swap_slice(&tokens(&["4"]), 1, 10, &mut rng).unwrap_err();
    assert_eq!(err.info().context.get("attempts").unwrap(), "0");

    let options = PerturbOptions {
        scope: SwapScope::Interior,
        level: 1,
        max_attempts: 10,
    };
    assert!(perturb_alignment(&tokens(&["0", "1", "2"]), &options, &mut rng).is_err());
}

#[test]
fn datasets_are_reproducible_per_seed() {
    let record = Record::from_fields("a t1 t2 t3 t4 t5 z", "x x x x x x", "0 1 2 3 4 5 6");
    let options = PerturbOptions {
        scope: SwapScope::Interior,
        level: 2,
        max_attempts: 10_000,
    };

    let mut first = vec![record.clone(); 8];
    let mut second = vec![record.clone(); 8];
    perturb_dataset(&mut first, &options, 77).unwrap();
    perturb_dataset(&mut second, &options, 77).unwrap();
    assert_eq!(first, second);

    for perturbed in &first {
        assert_eq!(perturbed.input, record.input);
        assert_eq!(perturbed.output, record.output);
        assert_eq!(perturbed.alignment.len(), record.alignment.len());
        assert_eq!(
            slice_distance(&record.alignment[1..6], &perturbed.alignment[1..6]),
            3
        );
    }
}

#[test]
fn dataset_errors_name_the_record() {
    let good = Record::from_fields("a t1 t2 z", "x y z", "0 1 2 3");
    let bad = Record::from_fields("a t1 z", "x y", "0 1 2");
    let mut dataset = vec![good, bad];
    let options = PerturbOptions {
        scope: SwapScope::Interior,
        level: 1,
        max_attempts: 10,
    };
    let err = perturb_dataset(&mut dataset, &options, 1).unwrap_err();
    assert_eq!(err.info().context.get("record").unwrap(), "2");
}
