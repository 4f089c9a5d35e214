// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::ops::Range;

use ringmul_models::partition::{Dims, Partition, split};

fn assert_covers(ranges: &[Range<usize>], total: usize) {
    let mut next = 0;
    for range in ranges {
        assert_eq!(range.start, next, "gap or overlap at {next}");
        assert!(range.end >= range.start);
        next = range.end;
    }
    assert_eq!(next, total);
}

#[test]
fn bands_and_panels_partition() {
    for ring_size in [1, 2, 4, 8] {
        let dims = Dims::new(64, 7, 32);
        let partition = Partition::new(dims, ring_size).unwrap();
        let bands: Vec<_> = (0..ring_size).map(|r| partition.row_band(r)).collect();
        let panels: Vec<_> = (0..ring_size).map(|r| partition.col_panel(r)).collect();
        assert_covers(&bands, dims.n1);
        assert_covers(&panels, dims.n3);
        for rank in 0..ring_size {
            assert_eq!(partition.band_elements(rank), 64 / ring_size * 32);
            assert_eq!(partition.panel_elements(rank), 7 * 32 / ring_size);
        }
    }
}

#[test]
fn remainder_goes_to_last() {
    for (total, parts) in [(10, 3), (159, 8), (7, 7), (3, 5)] {
        let ranges: Vec<_> = (0..parts).map(|i| split(total, parts, i)).collect();
        assert_covers(&ranges, total);
    }
    assert_eq!(split(159, 8, 7), 139..159);
}

#[test]
fn reference_dimensions() {
    let partition = Partition::new(Dims::new(960, 768, 160), 8).unwrap();
    assert_eq!(partition.row_band(3), 360..480);
    assert_eq!(partition.col_panel(7), 140..160);
}

#[test]
fn indivisible_rows_rejected() {
    let err = Partition::new(Dims::new(10, 4, 8), 4).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Config error: N1 = 10 is not divisible by the ring size 4"
    );
}
