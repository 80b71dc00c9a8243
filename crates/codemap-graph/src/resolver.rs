//! Best-effort resolution of textual references to defined items.
//!
//! References arrive as a symbol name plus a loose module hint (import text,
//! relative path, dotted module). Nothing here is exact static analysis: the
//! index tolerates aliasing and partial specifiers and picks the most plausible
//! definition.

use crate::model::ItemRef;
use codemap_core::{normalize_file_path, normalize_module_hint, slash_form};
use indexmap::IndexMap;
use std::collections::HashMap;

pub const SCORE_EXACT_MODULE: u32 = 30;
pub const SCORE_KEY_SUFFIX_OF_HINT: u32 = 18;
pub const SCORE_HINT_SUFFIX_OF_KEY: u32 = 16;
pub const SCORE_KEY_CONTAINS_HINT: u32 = 12;
pub const SCORE_PATH_ENDS_WITH_HINT: u32 = 10;
pub const SCORE_PATH_CONTAINS_HINT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The hint normalized to exactly the candidate's module key.
    ExactModule,
    /// Highest cumulative module score among same-named candidates.
    Scored(u32),
    /// No usable hint; first registrant of the name.
    FirstByName,
    /// Matched on the last dotted segment of the name only.
    BareName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub item: ItemRef,
    pub strategy: MatchStrategy,
}

#[derive(Debug)]
struct IndexedSymbol {
    item: ItemRef,
    module_key: String,
    slash_path: String,
}

#[derive(Debug, Default)]
struct NameBucket {
    by_module: IndexMap<String, Vec<usize>>,
    /// Registration order across all modules.
    all: Vec<usize>,
}

/// Name/module index over every defined item of a document.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    symbols: Vec<IndexedSymbol>,
    by_name: HashMap<String, NameBucket>,
    by_bare_name: HashMap<String, Vec<usize>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Register a defined item. Earlier registrations win ties.
    pub fn register(&mut self, name: &str, module_key: &str, path: &str, item: ItemRef) {
        let slot = self.symbols.len();
        self.symbols.push(IndexedSymbol {
            item,
            module_key: module_key.to_string(),
            slash_path: slash_form(&normalize_file_path(path)),
        });

        let name = name.to_lowercase();
        let bucket = self.by_name.entry(name.clone()).or_default();
        bucket
            .by_module
            .entry(module_key.to_string())
            .or_default()
            .push(slot);
        bucket.all.push(slot);

        self.by_bare_name
            .entry(bare_name(&name).to_string())
            .or_default()
            .push(slot);
    }

    pub fn resolve(&self, target_name: &str, module_hint: &str) -> Option<ItemRef> {
        self.resolve_with_strategy(target_name, module_hint)
            .map(|resolution| resolution.item)
    }

    pub fn resolve_with_strategy(&self, target_name: &str, module_hint: &str) -> Option<Resolution> {
        let name = target_name.to_lowercase();
        let hint = normalize_module_hint(module_hint);

        if let Some(bucket) = self.by_name.get(&name)
            && let Some(&first) = bucket.all.first()
        {
            if let Some(&exact) = bucket.by_module.get(&hint).and_then(|slots| slots.first()) {
                return Some(self.resolution(exact, MatchStrategy::ExactModule));
            }

            if !hint.is_empty() {
                let hint_slash = slash_form(&hint);
                let mut best: Option<(usize, u32)> = None;
                for &slot in &bucket.all {
                    let symbol = &self.symbols[slot];
                    let score =
                        module_score(&symbol.module_key, &symbol.slash_path, &hint, &hint_slash);
                    if best.is_none_or(|(_, top)| score > top) {
                        best = Some((slot, score));
                    }
                }
                if let Some((slot, score)) = best {
                    return Some(self.resolution(slot, MatchStrategy::Scored(score)));
                }
            }

            return Some(self.resolution(first, MatchStrategy::FirstByName));
        }

        self.by_bare_name
            .get(bare_name(&name))
            .and_then(|slots| slots.first())
            .map(|&slot| self.resolution(slot, MatchStrategy::BareName))
    }

    fn resolution(&self, slot: usize, strategy: MatchStrategy) -> Resolution {
        Resolution {
            item: self.symbols[slot].item,
            strategy,
        }
    }
}

/// Cumulative module-affinity score of one candidate for a normalized hint.
///
/// Suffix and containment only count when aligned on `.` (or `/`) segments, so
/// key `a` is a suffix of `x.y.a` but not of `x.y.data`.
pub fn module_score(module_key: &str, slash_path: &str, hint: &str, hint_slash: &str) -> u32 {
    if hint.is_empty() {
        return 0;
    }
    let mut score = 0;
    if !module_key.is_empty() {
        if module_key == hint {
            score += SCORE_EXACT_MODULE;
        }
        if ends_with_segments(hint, module_key, '.') {
            score += SCORE_KEY_SUFFIX_OF_HINT;
        }
        if ends_with_segments(module_key, hint, '.') {
            score += SCORE_HINT_SUFFIX_OF_KEY;
        }
        if contains_segments(module_key, hint, '.') {
            score += SCORE_KEY_CONTAINS_HINT;
        }
    }
    if !slash_path.is_empty() {
        if ends_with_segments(slash_path, hint_slash, '/') {
            score += SCORE_PATH_ENDS_WITH_HINT;
        }
        if contains_segments(slash_path, hint_slash, '/') {
            score += SCORE_PATH_CONTAINS_HINT;
        }
    }
    score
}

fn ends_with_segments(value: &str, suffix: &str, separator: char) -> bool {
    value
        .strip_suffix(suffix)
        .is_some_and(|head| head.is_empty() || head.ends_with(separator))
}

fn contains_segments(value: &str, needle: &str, separator: char) -> bool {
    if needle.is_empty() {
        return false;
    }
    value.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        (start == 0 || value[..start].ends_with(separator))
            && (end == value.len() || value[end..].starts_with(separator))
    })
}

fn bare_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
