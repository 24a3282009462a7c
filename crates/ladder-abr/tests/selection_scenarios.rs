#![forbid(unsafe_code)]

use std::{sync::Arc, thread};

use ladder_abr::{
    BitrateCommand, CommandCell, SelectionContext, SelectionReason, VariantCatalog,
    VariantSelector,
};
use ladder_test_utils::{Xorshift64, bitrates, ctx, ladder_3, same, variant, variants};
use rstest::rstest;

fn selector(command: BitrateCommand) -> (VariantSelector, CommandCell) {
    let cell = CommandCell::new(command);
    (VariantSelector::new(cell.clone()).with_seed(1), cell)
}

#[test]
fn scenario_a_duplicates_and_floor() {
    let raw = variants(&[100_000, 100_000, 500_000, 500_000, 2_000_000]);
    let catalog = VariantCatalog::build_with_floor(&raw, 100_001).unwrap();
    assert_eq!(bitrates(catalog.iter()), [500_000, 2_000_000]);

    // 100 000 sits exactly on the default floor and survives it.
    let catalog = VariantCatalog::build(&raw).unwrap();
    assert_eq!(bitrates(catalog.iter()), [100_000, 500_000, 2_000_000]);
}

#[test]
fn scenario_b_increase() {
    let available = ladder_3();
    let (mut s, cell) = selector(BitrateCommand::Increase);
    let d = s
        .select_next(ctx(&available[1], &available[1], &available))
        .unwrap();
    assert!(same(d.next.as_ref().unwrap(), &available[2]));
    assert_eq!(cell.get(), BitrateCommand::Hold);
}

#[test]
fn scenario_c_decrease() {
    let available = ladder_3();
    let (mut s, cell) = selector(BitrateCommand::Decrease);
    let d = s
        .select_next(ctx(&available[1], &available[1], &available))
        .unwrap();
    assert!(same(d.next.as_ref().unwrap(), &available[0]));
    assert_eq!(cell.get(), BitrateCommand::Hold);
}

#[rstest]
#[case(BitrateCommand::Increase)]
#[case(BitrateCommand::Decrease)]
#[case(BitrateCommand::Random)]
#[case(BitrateCommand::Hold)]
#[case(BitrateCommand::Auto)]
fn scenario_d_first_call_snaps(#[case] command: BitrateCommand) {
    let available = ladder_3();
    let suggested = variant(1_200_000);
    let (mut s, _) = selector(command);
    let d = s
        .select_next(SelectionContext::new(None, &suggested, &available))
        .unwrap();
    assert!(same(d.next.as_ref().unwrap(), &available[1]));
}

#[rstest]
#[case(BitrateCommand::Increase)]
#[case(BitrateCommand::Decrease)]
#[case(BitrateCommand::Random)]
#[case(BitrateCommand::Hold)]
#[case(BitrateCommand::Auto)]
fn scenario_e_empty_catalog(#[case] command: BitrateCommand) {
    let available = variants(&[40_000, 80_000]);
    let (mut s, _) = selector(command);
    let d = s
        .select_next(ctx(&available[0], &available[1], &available))
        .unwrap();
    assert!(d.is_unchanged());
    assert_eq!(d.reason, SelectionReason::EmptyCatalog);
    assert!(same(&d.resolve(&available[0]), &available[0]));
}

#[test]
fn steps_are_strict_whenever_a_neighbor_exists() {
    let mut rng = Xorshift64::new(5);
    let available = variants(&[150_000, 300_000, 600_000, 1_200_000, 2_400_000, 4_800_000]);
    let (mut s, cell) = selector(BitrateCommand::Auto);

    for _ in 0..500 {
        let previous = variant(rng.range_u64(0, 6_000_000));
        let command = *rng.pick(&[BitrateCommand::Increase, BitrateCommand::Decrease]);
        cell.set(command);

        let d = s.select_next(ctx(&previous, &previous, &available)).unwrap();
        let exists = available.iter().any(|v| match command {
            BitrateCommand::Increase => v.bitrate_bps > previous.bitrate_bps,
            _ => v.bitrate_bps < previous.bitrate_bps,
        });

        match (&d.next, exists) {
            (Some(next), true) if command == BitrateCommand::Increase => {
                assert!(next.bitrate_bps > previous.bitrate_bps);
            }
            (Some(next), true) => assert!(next.bitrate_bps < previous.bitrate_bps),
            (None, false) => assert_eq!(d.reason, SelectionReason::NoCandidate),
            _ => panic!("{command} from {} gave {d:?}", previous.bitrate_bps),
        }
        assert_eq!(cell.get(), BitrateCommand::Hold);
    }
}

#[test]
fn random_never_returns_top_for_any_size() {
    for size in 2..=8_u64 {
        let available = variants(&(1..=size).map(|i| i * 200_000).collect::<Vec<_>>());
        let top = available.last().unwrap().bitrate_bps;
        let (mut s, _) = selector(BitrateCommand::Random);
        for _ in 0..200 {
            let d = s
                .select_next(ctx(&available[0], &available[0], &available))
                .unwrap();
            assert_ne!(d.next.unwrap().bitrate_bps, top, "size {size}");
        }
    }
}

#[test]
fn operator_thread_writes_are_observed() {
    let available = ladder_3();
    let (mut s, cell) = selector(BitrateCommand::Hold);

    let operator = cell.clone();
    thread::spawn(move || {
        operator.set(BitrateCommand::Increase);
    })
    .join()
    .unwrap();

    let d = s
        .select_next(ctx(&available[0], &available[0], &available))
        .unwrap();
    assert_eq!(d.reason, SelectionReason::Increase);
    assert!(same(d.next.as_ref().unwrap(), &available[1]));

    let again = s
        .select_next(ctx(&available[0], &available[2], &available))
        .unwrap();
    assert_eq!(again.reason, SelectionReason::Hold);
}

#[test]
fn catalog_is_shareable_across_threads() {
    let available = ladder_3();
    let (mut s, _) = selector(BitrateCommand::Auto);
    s.select_next(SelectionContext::new(None, &available[0], &available))
        .unwrap();

    let catalog = Arc::clone(s.catalog().unwrap());
    let handle = thread::spawn(move || bitrates(catalog.iter()));
    assert_eq!(handle.join().unwrap(), [500_000, 1_000_000, 2_000_000]);
}
