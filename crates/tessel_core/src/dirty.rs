//! Dirty bitsets
//!
//! Every reactive slot of a component has a stable index. A [`DirtyBits`]
//! records which of those slots changed since the component's last patch.
//!
//! The all-set state ([`DirtyBits::all`]) is a sentinel: a record whose bits
//! are all set has not been marked since construction or since its last
//! flush, and so is not sitting in the scheduler's pending queue. The first
//! mark after that clears the set to empty and enqueues the record; later
//! marks only OR bits in.

use smallvec::SmallVec;

const WORD_BITS: usize = u64::BITS as usize;

/// Bit-vector with one bit per reactive slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirtyBits {
    words: SmallVec<[u64; 1]>,
    all: bool,
}

impl DirtyBits {
    /// No slot marked
    pub fn empty() -> Self {
        Self {
            words: SmallVec::new(),
            all: false,
        }
    }

    /// The "not yet flushed" sentinel; every slot reads as dirty
    pub fn all() -> Self {
        Self {
            words: SmallVec::new(),
            all: true,
        }
    }

    /// Build a set from explicit slot indices
    pub fn from_slots(slots: &[usize]) -> Self {
        let mut bits = Self::empty();
        for &slot in slots {
            bits.insert(slot);
        }
        bits
    }

    /// Whether this is the all-set sentinel
    pub fn is_all(&self) -> bool {
        self.all
    }

    /// Whether no slot is marked
    pub fn is_empty(&self) -> bool {
        !self.all && self.words.iter().all(|w| *w == 0)
    }

    /// Whether `slot` is marked
    pub fn contains(&self, slot: usize) -> bool {
        if self.all {
            return true;
        }
        self.words
            .get(slot / WORD_BITS)
            .map(|word| word & (1 << (slot % WORD_BITS)) != 0)
            .unwrap_or(false)
    }

    /// Whether any of `slots` is marked
    pub fn any(&self, slots: &[usize]) -> bool {
        slots.iter().any(|&slot| self.contains(slot))
    }

    /// OR `slot` into the set
    pub fn insert(&mut self, slot: usize) {
        if self.all {
            return;
        }
        let word = slot / WORD_BITS;
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (slot % WORD_BITS);
    }

    /// OR every bit of `other` into the set
    pub fn union_with(&mut self, other: &DirtyBits) {
        if other.all {
            self.all = true;
            self.words.clear();
            return;
        }
        for slot in other.iter() {
            self.insert(slot);
        }
    }

    /// Marked slot indices in ascending order (empty for the sentinel)
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(index, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| index * WORD_BITS + bit)
        })
    }
}

impl Default for DirtyBits {
    fn default() -> Self {
        Self::empty()
    }
}
