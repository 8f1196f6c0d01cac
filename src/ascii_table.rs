//! O(1) membership tests for ASCII character classes via a 128-entry
//! bitmask lookup table, rather than a chain of range comparisons.

/// A bitmask of character categories a single ASCII byte belongs to.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct CharCategory(pub u16);

impl CharCategory {
    pub const NONE: CharCategory = CharCategory(0);
    pub const ALPHA: CharCategory = CharCategory(1 << 0);
    pub const DIGIT: CharCategory = CharCategory(1 << 1);
    pub const UPPER: CharCategory = CharCategory(1 << 2);
    pub const LOWER: CharCategory = CharCategory(1 << 3);
    pub const SPACE: CharCategory = CharCategory(1 << 4);
    pub const PUNCT: CharCategory = CharCategory(1 << 5);
    pub const CONTROL: CharCategory = CharCategory(1 << 6);
    pub const HEX_DIGIT: CharCategory = CharCategory(1 << 7);

    pub const fn union(self, other: CharCategory) -> CharCategory {
        CharCategory(self.0 | other.0)
    }

    pub const fn contains(self, other: CharCategory) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A `[CharCategory; 128]` table indexed by byte value, built once at
/// program start via [`AsciiTable::build`].
pub struct AsciiTable {
    categories: [CharCategory; 128],
}

impl AsciiTable {
    pub fn build() -> Self {
        let mut categories = [CharCategory::NONE; 128];
        for (byte, cat) in categories.iter_mut().enumerate() {
            let b = byte as u8;
            let mut c = CharCategory::NONE;
            if b.is_ascii_alphabetic() {
                c = c.union(CharCategory::ALPHA);
            }
            if b.is_ascii_uppercase() {
                c = c.union(CharCategory::UPPER);
            }
            if b.is_ascii_lowercase() {
                c = c.union(CharCategory::LOWER);
            }
            if b.is_ascii_digit() {
                c = c.union(CharCategory::DIGIT);
            }
            if b.is_ascii_hexdigit() {
                c = c.union(CharCategory::HEX_DIGIT);
            }
            if b.is_ascii_whitespace() {
                c = c.union(CharCategory::SPACE);
            }
            if b.is_ascii_punctuation() {
                c = c.union(CharCategory::PUNCT);
            }
            if b.is_ascii_control() {
                c = c.union(CharCategory::CONTROL);
            }
            *cat = c;
        }
        AsciiTable { categories }
    }

    #[inline]
    pub fn lookup(&self, byte: u8) -> CharCategory {
        if byte < 128 {
            self.categories[byte as usize]
        } else {
            CharCategory::NONE
        }
    }

    #[inline]
    pub fn is(&self, byte: u8, category: CharCategory) -> bool {
        self.lookup(byte).contains(category)
    }
}

/// Lazily built, process-wide shared ASCII classification table.
pub fn ascii_table() -> &'static AsciiTable {
    use std::sync::OnceLock;
    static TABLE: OnceLock<AsciiTable> = OnceLock::new();
    TABLE.get_or_init(AsciiTable::build)
}
