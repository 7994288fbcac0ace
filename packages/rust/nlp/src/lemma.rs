//! Dictionary-form reduction for English nouns and verbs.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular plural → singular.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("analyses", "analysis"),
    ("bases", "basis"),
    ("theses", "thesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("knives", "knife"),
    ("selves", "self"),
];

/// Irregular inflected verb → base form.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("am", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("'s", "be"),
    ("'re", "be"),
    ("'m", "be"),
    ("has", "have"),
    ("had", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("wrote", "write"),
    ("written", "write"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("got", "get"),
    ("gotten", "get"),
    ("said", "say"),
    ("found", "find"),
    ("thought", "think"),
    ("kept", "keep"),
    ("left", "leave"),
    ("meant", "mean"),
    ("built", "build"),
    ("sent", "send"),
    ("spent", "spend"),
    ("began", "begin"),
    ("begun", "begin"),
    ("broke", "break"),
    ("broken", "break"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("caught", "catch"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("taught", "teach"),
    ("knew", "know"),
    ("known", "know"),
    ("saw", "see"),
    ("seen", "see"),
    ("held", "hold"),
    ("told", "tell"),
    ("hid", "hide"),
    ("hidden", "hide"),
    ("ran", "run"),
    ("overrode", "override"),
    ("overridden", "override"),
    ("bound", "bind"),
    ("led", "lead"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("felt", "feel"),
    ("came", "come"),
    ("became", "become"),
    ("understood", "understand"),
    ("stood", "stand"),
    ("shown", "show"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("lost", "lose"),
    ("paid", "pay"),
    ("laid", "lay"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("forgot", "forget"),
    ("forgotten", "forget"),
];

/// Base forms whose `-ed`/`-ing` stems drop a final `e` (`use` → `used`).
/// Consulted to restore the `e` when stripping suffixes.
const E_FINAL_VERBS: &[&str] = &[
    "use", "declare", "define", "name", "place", "separate", "make", "write", "create",
    "remove", "provide", "compare", "require", "ensure", "serialize", "initialize", "override",
    "close", "indicate", "generate", "validate", "update", "change", "continue", "include",
    "exclude", "handle", "compile", "execute", "invoke", "store", "merge", "move", "save",
    "replace", "reduce", "produce", "release", "raise", "parse", "manage", "organize", "type",
    "note", "size", "free", "line", "code", "scope", "state", "allocate", "abbreviate",
    "capitalize", "encode", "decode", "describe", "configure", "measure", "structure", "escape",
    "come", "become", "give", "take", "have", "live", "leave", "believe", "receive", "lose",
    "choose", "hope", "like", "argue", "issue", "value", "cause", "refuse", "accumulate",
    "synchronize", "optimize", "minimize", "maximize", "emphasize", "recognize", "normalize",
    "inline", "base", "case", "phrase", "style", "prepare", "reuse", "combine", "determine",
    "examine", "imagine", "decline",
];

static IRREGULAR_NOUN_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_NOUNS.iter().copied().collect());

static IRREGULAR_VERB_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_VERBS.iter().copied().collect());

/// Dictionary form of `word` given its Penn tag. Always lowercase.
pub(crate) fn lemmatize(word: &str, pos: &str) -> String {
    let lower = word.to_lowercase();

    match pos {
        "NNS" | "NNPS" => singularize(&lower),
        "VBZ" | "VBD" | "VBN" | "VBG" | "VBP" | "VB" => verb_base(&lower),
        "POS" => "'s".to_string(),
        "RB" if lower == "n't" || lower == "n’t" => "not".to_string(),
        "MD" if lower == "ca" => "can".to_string(),
        "MD" if lower == "wo" => "will".to_string(),
        _ => lower,
    }
}

/// Plural noun → singular.
pub(crate) fn singularize(lower: &str) -> String {
    if let Some(base) = IRREGULAR_NOUN_MAP.get(lower) {
        return (*base).to_string();
    }
    if lower.len() <= 3 || !lower.ends_with('s') || lower.ends_with("ss") {
        return lower.to_string();
    }
    if lower.ends_with("us") || lower.ends_with("is") {
        return lower.to_string();
    }
    if let Some(stem) = lower.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return strip_ascii_tail(lower, 2);
        }
    }
    strip_ascii_tail(lower, 1)
}

/// Inflected verb → base form.
pub(crate) fn verb_base(lower: &str) -> String {
    if let Some(base) = IRREGULAR_VERB_MAP.get(lower) {
        return (*base).to_string();
    }

    if let Some(stem) = lower.strip_suffix("ing") {
        if stem.len() >= 2 {
            return restore_stem(stem);
        }
    }
    if let Some(stem) = lower.strip_suffix("ied") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = lower.strip_suffix("ed") {
        if stem.len() >= 2 {
            return restore_stem(stem);
        }
    }
    if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
        if let Some(stem) = lower.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for suffix in ["sses", "xes", "zes", "ches", "shes", "oes"] {
            if lower.ends_with(suffix) {
                return strip_ascii_tail(lower, 2);
            }
        }
        return strip_ascii_tail(lower, 1);
    }
    lower.to_string()
}

/// Rebuild a base form from a stem left by removing `-ed` or `-ing`.
fn restore_stem(stem: &str) -> String {
    let with_e = format!("{stem}e");
    if E_FINAL_VERBS.contains(&with_e.as_str()) {
        return with_e;
    }

    // stopped → stop, but keep pass → passed → pass and call → called → call.
    let mut tail = stem.chars().rev();
    if let (Some(b), Some(a)) = (tail.next(), tail.next()) {
        if a == b && a.is_ascii_alphabetic() && !matches!(a, 'l' | 's' | 'z' | 'f') && !is_vowel(a) {
            return stem[..stem.len() - b.len_utf8()].to_string();
        }
    }

    // Endings that almost always hide a dropped `e`: creat-ed, resolv-ed, ...
    for ending in ["at", "iz", "bl", "v", "ur", "uc", "ag", "ir"] {
        if stem.ends_with(ending) {
            return with_e;
        }
    }
    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `word` without its last `n` characters, which callers have matched
/// against an ASCII suffix.
fn strip_ascii_tail(word: &str, n: usize) -> String {
    match word.char_indices().rev().nth(n - 1) {
        Some((cut, _)) => word[..cut].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_nouns_become_singular() {
        assert_eq!(lemmatize("Classes", "NNS"), "class");
        assert_eq!(lemmatize("libraries", "NNS"), "library");
        assert_eq!(lemmatize("fields", "NNS"), "field");
        assert_eq!(lemmatize("indices", "NNS"), "index");
        assert_eq!(lemmatize("branches", "NNS"), "branch");
        assert_eq!(lemmatize("status", "NNS"), "status");
        assert_eq!(lemmatize("address", "NNS"), "address");
    }

    #[test]
    fn verbs_return_to_base_form() {
        assert_eq!(lemmatize("is", "VBZ"), "be");
        assert_eq!(lemmatize("used", "VBN"), "use");
        assert_eq!(lemmatize("using", "VBG"), "use");
        assert_eq!(lemmatize("stopped", "VBD"), "stop");
        assert_eq!(lemmatize("called", "VBD"), "call");
        assert_eq!(lemmatize("passing", "VBG"), "pass");
        assert_eq!(lemmatize("creates", "VBZ"), "create");
        assert_eq!(lemmatize("created", "VBN"), "create");
        assert_eq!(lemmatize("catches", "VBZ"), "catch");
        assert_eq!(lemmatize("jumps", "VBZ"), "jump");
        assert_eq!(lemmatize("written", "VBN"), "write");
        assert_eq!(lemmatize("applied", "VBD"), "apply");
    }

    #[test]
    fn other_tags_are_only_lowercased() {
        assert_eq!(lemmatize("Quick", "JJ"), "quick");
        assert_eq!(lemmatize("Java", "NNP"), "java");
        assert_eq!(lemmatize("42", "CD"), "42");
        assert_eq!(lemmatize("n't", "RB"), "not");
    }

    #[test]
    fn multibyte_stems_are_cut_on_char_boundaries() {
        // U+4E38 ends in two equal UTF-8 bytes.
        assert_eq!(lemmatize("xx丸ed", "VBN"), "xx丸");
        assert_eq!(lemmatize("xx丸丸ing", "VBG"), "xx丸丸");
        assert_eq!(lemmatize("cafés", "NNS"), "café");
        assert_eq!(lemmatize("naïves", "VBZ"), "naïve");
        assert_eq!(lemmatize("丸ches", "NNS"), "丸ch");
    }
}
