//! Required-parameter tracking for one command level.

const WORD_BITS: usize = 64;

/// A bitset over the dense required ordinals of one command.
///
/// Bits are set as parameters are matched; validation compares each 64-bit
/// word with the mask of the ordinals it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredSet {
    words: Vec<u64>,
    count: usize,
}

impl RequiredSet {
    /// Creates an empty set for `count` required parameters.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            words: vec![0; count.div_ceil(WORD_BITS)],
            count,
        }
    }

    /// Marks `ordinal` as seen. Out-of-range ordinals are ignored.
    pub fn mark(&mut self, ordinal: usize) {
        if ordinal >= self.count {
            return;
        }
        if let Some(word) = self.words.get_mut(ordinal >> 6) {
            *word |= 1 << (ordinal & (WORD_BITS - 1));
        }
    }

    /// Reports whether `ordinal` has been seen.
    #[must_use]
    pub fn is_marked(&self, ordinal: usize) -> bool {
        self.words
            .get(ordinal >> 6)
            .is_some_and(|word| word & (1 << (ordinal & (WORD_BITS - 1))) != 0)
    }

    /// Returns the lowest ordinal not yet seen.
    #[must_use]
    pub fn first_missing(&self) -> Option<usize> {
        self.words.iter().enumerate().find_map(|(index, word)| {
            let missing = !word & self.mask(index);
            if missing == 0 {
                return None;
            }
            let bit = usize::try_from(missing.trailing_zeros()).ok()?;
            Some((index << 6) + bit)
        })
    }

    /// Reports whether every required parameter has been seen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Returns the bits of word `index` that correspond to real ordinals.
    fn mask(&self, index: usize) -> u64 {
        let remaining = self.count.saturating_sub(index << 6);
        if remaining >= WORD_BITS {
            u64::MAX
        } else {
            (1 << remaining) - 1
        }
    }
}
