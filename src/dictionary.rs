/// A sorted, deduplicated list of uppercase words, supporting the two lookups
/// the word search needs: exact membership and prefix membership. Both are
/// binary searches over the sorted list.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// Build a dictionary from any iterator of words. Words are trimmed and
    /// uppercased; anything containing a character outside A-Z is dropped.
    pub fn new(words: impl IntoIterator<Item = impl AsRef<str>>) -> Dictionary {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_uppercase())
            .filter(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase()))
            .collect();
        words.sort();
        words.dedup();
        Dictionary { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Exact membership. Expects an uppercase candidate.
    pub fn contains(&self, word: &str) -> bool {
        self.words.binary_search_by(|w| w.as_str().cmp(word)).is_ok()
    }

    /// Whether at least one word starts with `prefix`: find the insertion
    /// point of `prefix` in the sorted list, then check whether the word
    /// there starts with it. A full word counts as its own prefix.
    pub fn is_prefix(&self, prefix: &str) -> bool {
        let i = self.words.partition_point(|w| w.as_str() < prefix);
        i < self.words.len() && self.words[i].starts_with(prefix)
    }
}

#[test]
fn test_membership() {
    let dict = Dictionary::new(["water", "MELON", " toad ", "frog", "frog", "don't"]);
    // "don't" is dropped, "frog" deduplicated.
    assert_eq!(dict.len(), 4);
    assert!(dict.contains("WATER"));
    assert!(dict.contains("FROG"));
    assert!(!dict.contains("WAT"));
    assert!(!dict.contains("DON'T"));
}

#[test]
fn test_prefixes() {
    let dict = Dictionary::new(["WATER", "WATT", "MELON"]);
    assert!(dict.is_prefix("W"));
    assert!(dict.is_prefix("WAT"));
    assert!(dict.is_prefix("WATT"));
    assert!(dict.is_prefix("MELON"));
    assert!(!dict.is_prefix("WATERS"));
    assert!(!dict.is_prefix("X"));
    // The empty prefix matches everything.
    assert!(dict.is_prefix(""));
}

#[test]
fn test_empty_dictionary() {
    let dict = Dictionary::new(Vec::<String>::new());
    assert!(dict.is_empty());
    assert!(!dict.contains("ANYTHING"));
    assert!(!dict.is_prefix("A"));
}
