//! Benchmarks for region subtraction and selection normalization.
//!
//! Run with: `cargo bench -p meu-lib --bench region_set`

use divan::{
  Bencher,
  black_box,
};
use meu_lib::{
  region::Region,
  region_set,
  selection::Selection,
};

fn main() {
  divan::main();
}

/// `count` regions of `span` chars, spread evenly over `len` chars.
fn make_regions(len: usize, count: usize, span: usize, offset: usize) -> Vec<Region> {
  let step = len / (count + 1);
  (0..count)
    .map(|i| {
      let start = (i + 1) * step + offset;
      Region::new(start, (start + span).min(len))
    })
    .collect()
}

// `region_set::subtract` benchmarks.

mod subtract {
  use super::*;

  const LEN: usize = 100 * 1024;

  #[divan::bench(args = [1, 8, 64, 512])]
  fn disjoint(bencher: Bencher, count: usize) {
    let base = make_regions(LEN, count, 8, 0);
    let cut = make_regions(LEN, count, 2, 20);

    bencher.bench(|| black_box(region_set::subtract(black_box(&base), black_box(&cut))));
  }

  #[divan::bench(args = [1, 8, 64, 512])]
  fn overlapping(bencher: Bencher, count: usize) {
    let base = make_regions(LEN, count, 16, 0);
    let cut = make_regions(LEN, count, 4, 6);

    bencher.bench(|| black_box(region_set::subtract(black_box(&base), black_box(&cut))));
  }
}

// `Selection::new` benchmarks.

mod normalize {
  use super::*;

  const LEN: usize = 100 * 1024;

  #[divan::bench(args = [8, 64, 512])]
  fn reversed_input(bencher: Bencher, count: usize) {
    let mut regions = make_regions(LEN, count, 8, 0);
    regions.reverse();

    bencher.bench(|| black_box(Selection::new(black_box(regions.iter().copied()))));
  }

  #[divan::bench(args = [8, 64, 512])]
  fn merging(bencher: Bencher, count: usize) {
    let mut regions = make_regions(LEN, count, 8, 0);
    regions.extend(make_regions(LEN, count, 8, 4));

    bencher.bench(|| black_box(Selection::new(black_box(regions.iter().copied()))));
  }
}
