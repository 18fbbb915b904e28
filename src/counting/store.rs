use std::collections::HashMap;

/// The per-worker word→count mapping.
///
/// Each worker exclusively owns and mutates its store during counting and
/// reconciliation; it becomes read-only once handed to the merge phase.
/// Keys are already normalized (lowercased, length-bounded) text, compared
/// by exact byte match. Entries with count 0 are logically absent and are
/// filtered out at extraction time.
#[derive(Debug, Default)]
pub struct WordStore {
    entries: HashMap<String, u64>,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `word` with count 1, or bumps an existing entry.
    pub fn increment(&mut self, word: &str) {
        if let Some(count) = self.entries.get_mut(word) {
            *count += 1;
        } else {
            self.entries.insert(word.to_string(), 1);
        }
    }

    /// Adds `count` occurrences of `word`, inserting it if absent.
    pub fn add(&mut self, word: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self.entries.entry(word.to_string()).or_insert(0) += count;
    }

    /// Removes one occurrence of `word`, flooring at zero.
    ///
    /// A missing entry counts as zero and stays absent; the floor keeps
    /// repeated corrections from drifting negative.
    pub fn decrement(&mut self, word: &str) {
        if let Some(count) = self.entries.get_mut(word) {
            if *count > 0 {
                *count -= 1;
            }
        }
    }

    /// Current count for `word`; zero when absent.
    pub fn count(&self, word: &str) -> u64 {
        self.entries.get(word).copied().unwrap_or(0)
    }

    /// All entries with a positive count, ready for histogram extraction.
    pub fn non_zero_entries(&self) -> Vec<(String, u64)> {
        self.entries
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(word, &count)| (word.clone(), count))
            .collect()
    }

    /// Number of distinct words with a positive count.
    pub fn non_zero_len(&self) -> usize {
        self.entries.values().filter(|&&count| count > 0).count()
    }
}
