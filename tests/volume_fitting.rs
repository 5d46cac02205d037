//! Drives the adaptive splitter the way a volume-assembly pass does:
//! propose a split, try the content against it, report the leftover,
//! repeat until everything fits, then register the final volume ranges
//! with the scope engine.

use braille_stream::{
    PagePlacement, PageRecord, ScopeEngine, SequenceId, Space, VolumeSplitter,
};

/// One simulated fit attempt: each volume actually holds at most
/// `capacity` content sheets regardless of its target size. Returns how
/// many of `total` sheets did not find a volume.
fn try_fit(splitter: &VolumeSplitter, total: usize, capacity: usize) -> usize {
    let mut placed = 0;
    for index in 0..splitter.volume_count() {
        placed += splitter.sheets_in_volume(index).min(capacity);
    }
    total.saturating_sub(placed)
}

/// Run the fit loop to convergence and return the number of rounds it
/// took.
fn converge(splitter: &mut VolumeSplitter, total: usize, capacity: usize) -> usize {
    splitter.update_sheet_count(total, 0).unwrap();
    let mut rounds = 0;
    loop {
        let remaining = try_fit(splitter, total, capacity);
        if remaining == 0 {
            return rounds;
        }
        splitter.update_sheet_count(total, remaining).unwrap();
        rounds += 1;
        assert!(rounds < 64, "fit loop failed to converge");
    }
}

#[test]
fn converges_when_volumes_lose_a_sheet_to_overhead() {
    let total = 100;
    let mut splitter = VolumeSplitter::new(10);
    let rounds = converge(&mut splitter, total, 9);
    assert!(rounds <= 4, "took {} rounds", rounds);

    let count = splitter.volume_count();
    let sizes: Vec<usize> = (0..count).map(|i| splitter.sheets_in_volume(i)).collect();
    assert_eq!(sizes.iter().sum::<usize>(), total);
    assert!(sizes.iter().all(|&size| size <= 9));
    let largest = sizes.iter().max().copied().unwrap();
    let smallest = sizes.iter().min().copied().unwrap();
    assert!(largest - smallest <= 1);
}

#[test]
fn stays_settled_across_repeated_full_fits() {
    let total = 100;
    let mut splitter = VolumeSplitter::new(10);
    converge(&mut splitter, total, 9);
    let settled_count = splitter.volume_count();

    for _ in 0..4 {
        splitter.update_sheet_count(total, 0).unwrap();
        assert!(splitter.volume_count() <= settled_count);
    }
}

#[test]
fn adapts_when_the_total_grows_mid_loop() {
    // Overhead sheets discovered during assembly raise the reported
    // total; the splitter follows without looping.
    let mut splitter = VolumeSplitter::new(20);
    splitter.update_sheet_count(60, 0).unwrap();
    assert_eq!(splitter.volume_count(), 3);

    splitter.update_sheet_count(66, 0).unwrap();
    let plan = splitter.plan().unwrap();
    assert_eq!(plan.sheets(), 66);
    assert_eq!(splitter.volume_count(), 4);
    let sizes: Vec<usize> = (0..4).map(|i| splitter.sheets_in_volume(i)).collect();
    assert_eq!(sizes, [17, 17, 16, 16]);
}

#[test]
fn final_split_registers_as_volume_scopes() {
    let total = 40;
    let mut splitter = VolumeSplitter::new(12);
    converge(&mut splitter, total, 12);

    // One page side per sheet: turn per-volume sheet targets into page
    // ranges and hand them to the scope engine.
    let mut engine = ScopeEngine::new();
    let sequence = SequenceId::new(Space::Body, 0);
    for id in 0..total {
        engine.add_page(PageRecord::new(
            id,
            sequence,
            PagePlacement {
                ordinal: id,
                duplex: false,
            },
        ));
    }
    engine.set_sequence_scope(Space::Body, 0, 0, total).unwrap();

    let mut next_page = 0;
    for index in 0..splitter.volume_count() {
        let size = splitter.sheets_in_volume(index);
        engine
            .set_volume_scope(Space::Body, index + 1, next_page, next_page + size)
            .unwrap();
        next_page += size;
    }
    assert_eq!(next_page, total);

    // Every page landed in exactly one volume, in order.
    let mut expected_volume = 1;
    let mut seen_in_volume = 0;
    for id in 0..total {
        let page = engine.page(Space::Body, id).unwrap();
        if seen_in_volume == splitter.sheets_in_volume(expected_volume - 1) {
            expected_volume += 1;
            seen_in_volume = 0;
        }
        assert_eq!(engine.volume_of(page), Some(expected_volume));
        seen_in_volume += 1;
    }

    // Volume-scoped navigation respects the registered boundaries.
    let first_of_last = engine
        .contents_in_volume(Space::Body, splitter.volume_count())
        .unwrap();
    let last_page = engine.page(Space::Body, total - 1).unwrap();
    assert!(engine
        .page_in_volume_with_offset(last_page, 1, false)
        .is_none());
    assert_eq!(
        engine
            .page_in_volume_with_offset(last_page, -(first_of_last.len() as i32 - 1), false)
            .map(|p| p.page_id()),
        Some(total - first_of_last.len())
    );
}
