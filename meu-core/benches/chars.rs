//! Benchmarks for character classification and word expansion.
//!
//! Run with: `cargo bench -p meu-core --bench chars`

use divan::{
  Bencher,
  black_box,
};
use meu_core::chars::{
  CharCategory,
  categorize_char,
  word_at,
};
use ropey::Rope;

fn main() {
  divan::main();
}

mod categorize {
  use super::*;

  #[divan::bench]
  fn whitespace(bencher: Bencher) {
    bencher.bench(|| {
      assert_eq!(categorize_char(black_box(' ')), CharCategory::Whitespace);
    });
  }

  #[divan::bench]
  fn word_ascii(bencher: Bencher) {
    bencher.bench(|| {
      assert_eq!(categorize_char(black_box('a')), CharCategory::Word);
    });
  }

  #[divan::bench]
  fn punctuation(bencher: Bencher) {
    bencher.bench(|| {
      assert_eq!(categorize_char(black_box(',')), CharCategory::Punctuation);
    });
  }
}

mod word {
  use super::*;

  #[divan::bench(args = [16, 256, 4096])]
  fn long_identifier(bencher: Bencher, len: usize) {
    let text = Rope::from("a".repeat(len));
    bencher.bench(|| word_at(black_box(text.slice(..)), black_box(len / 2)));
  }
}
