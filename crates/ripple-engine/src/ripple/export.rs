use bytemuck::{Pod, Zeroable};

/// One ripple as seen by the fragment stage.
///
/// Layout (12 bytes, 4-byte aligned, no padding):
///
///  offset 0  age     f32       seconds since spawn
///  offset 4  origin  [f32; 2]  UV, bottom-left origin
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct RippleRecord {
    pub age: f32,
    pub origin: [f32; 2],
}

impl RippleRecord {
    #[inline]
    pub const fn new(age: f32, origin: [f32; 2]) -> Self {
        Self { age, origin }
    }
}

/// Record written when no ripple survives. The shader side binds a runtime-sized
/// array, which must never be empty.
pub static PLACEHOLDER_RECORD: RippleRecord = RippleRecord::new(0.0, [0.0, 0.0]);

/// Size of the `count` header that precedes the records in the ripple set.
pub const RIPPLE_SET_HEADER_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// Stride of one record in the ripple set.
pub const RIPPLE_RECORD_SIZE: u64 = std::mem::size_of::<RippleRecord>() as u64;

/// Smallest valid ripple set: header plus the placeholder.
pub const RIPPLE_SET_MIN_SIZE: u64 = RIPPLE_SET_HEADER_SIZE + RIPPLE_RECORD_SIZE;

/// Uniform carrying the ripple lifetime, padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LifetimeUniform {
    pub time_to_die: f32,
    pub _pad: [f32; 3],
}

/// Snapshot produced by `RippleStore::update_and_export`.
///
/// Borrows the store's scratch buffer; valid until the next mutation of the store.
#[derive(Debug, Copy, Clone)]
pub struct ExportBlock<'a> {
    count: usize,
    records: &'a [RippleRecord],
    time_to_die: f32,
}

impl<'a> ExportBlock<'a> {
    /// Builds a block from the surviving records.
    ///
    /// An empty `survivors` slice is replaced by the placeholder record.
    pub(crate) fn new(survivors: &'a [RippleRecord], time_to_die: f32) -> Self {
        let records = if survivors.is_empty() {
            std::slice::from_ref(&PLACEHOLDER_RECORD)
        } else {
            survivors
        };

        Self {
            count: survivors.len(),
            records,
            time_to_die,
        }
    }

    /// Number of live ripples. Zero even when the placeholder is present.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Records as uploaded: never empty, `max(count, 1)` entries.
    #[inline]
    pub fn records(&self) -> &'a [RippleRecord] {
        self.records
    }

    /// Live records only.
    #[inline]
    pub fn survivors(&self) -> &'a [RippleRecord] {
        &self.records[..self.count]
    }

    #[inline]
    pub fn time_to_die(&self) -> f32 {
        self.time_to_die
    }

    /// Byte length of the ripple set (header + records).
    #[inline]
    pub fn ripple_set_size(&self) -> u64 {
        RIPPLE_SET_HEADER_SIZE + RIPPLE_RECORD_SIZE * self.records.len() as u64
    }

    /// Appends `[count: f32][records...]` to `out`, tightly packed.
    pub fn write_ripple_set(&self, out: &mut Vec<u8>) {
        let count = self.count as f32;
        out.reserve(self.ripple_set_size() as usize);
        out.extend_from_slice(bytemuck::bytes_of(&count));
        out.extend_from_slice(bytemuck::cast_slice(self.records));
    }

    /// Owned copy of the ripple set bytes.
    pub fn ripple_set_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_ripple_set(&mut out);
        out
    }

    #[inline]
    pub fn lifetime_uniform(&self) -> LifetimeUniform {
        LifetimeUniform {
            time_to_die: self.time_to_die,
            _pad: [0.0; 3],
        }
    }

    /// Flattens the block to its logical scalar stream:
    /// `[count][age, x, y]...[time_to_die]`.
    pub fn to_words(&self) -> Vec<f32> {
        let mut words = Vec::with_capacity(2 + 3 * self.records.len());
        words.push(self.count as f32);
        for r in self.records {
            words.extend_from_slice(&[r.age, r.origin[0], r.origin[1]]);
        }
        words.push(self.time_to_die);
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn record_is_three_packed_floats() {
        assert_eq!(RIPPLE_RECORD_SIZE, 12);
        assert_eq!(std::mem::align_of::<RippleRecord>(), 4);
        assert_eq!(std::mem::size_of::<LifetimeUniform>(), 16);
    }

    #[test]
    fn empty_block_carries_placeholder() {
        let block = ExportBlock::new(&[], 10.0);

        assert_eq!(block.count(), 0);
        assert!(block.is_empty());
        assert_eq!(block.records(), &[PLACEHOLDER_RECORD]);
        assert!(block.survivors().is_empty());
        assert_eq!(block.to_words(), vec![0.0, 0.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn words_follow_field_order() {
        let survivors = [
            RippleRecord::new(4.0, [0.5, 0.5]),
            RippleRecord::new(1.0, [0.2, 0.8]),
        ];
        let block = ExportBlock::new(&survivors, 10.0);

        assert_eq!(
            block.to_words(),
            vec![2.0, 4.0, 0.5, 0.5, 1.0, 0.2, 0.8, 10.0]
        );
    }

    #[test]
    fn ripple_set_bytes_match_words_without_lifetime() {
        let survivors = [RippleRecord::new(2.5, [0.1, 0.9])];
        let block = ExportBlock::new(&survivors, 3.0);

        let mut bytes = Vec::new();
        block.write_ripple_set(&mut bytes);

        assert_eq!(bytes.len() as u64, block.ripple_set_size());
        assert_eq!(floats(&bytes), vec![1.0, 2.5, 0.1, 0.9]);
    }

    #[test]
    fn empty_ripple_set_has_minimum_size() {
        let block = ExportBlock::new(&[], 1.0);
        let bytes = block.ripple_set_bytes();

        assert_eq!(bytes.len() as u64, RIPPLE_SET_MIN_SIZE);
        assert_eq!(floats(&bytes), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn lifetime_uniform_is_padded() {
        let block = ExportBlock::new(&[], 7.5);
        let u = block.lifetime_uniform();
        assert_eq!(u.time_to_die, 7.5);
        assert_eq!(u._pad, [0.0; 3]);
    }
}
