use nanoid::nanoid;

/// Alphabet for generated entity ids (no ambiguous glyphs).
const ENTITY_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const ENTITY_ID_LENGTH: usize = 20;

/// Default id strategy for schemas that do not supply their own.
pub fn generate_entity_id() -> String {
    nanoid!(ENTITY_ID_LENGTH, ENTITY_ID_ALPHABET)
}

/// Key composition for one entity type: `<prefix>:<id>`.
#[derive(Debug, Clone, Copy)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    pub fn entity(&self, entity_id: &str) -> String {
        format!("{}:{}", self.prefix, entity_id)
    }

    /// Key prefix declared on the search index so it covers every entity key.
    pub fn index_prefix(&self) -> String {
        format!("{}:", self.prefix)
    }

    /// SCAN pattern matching every entity key.
    pub fn pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }

    /// Recover the entity id from a full key, if the key belongs to this prefix.
    pub fn entity_id<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.prefix)?.strip_prefix(':')
    }
}
