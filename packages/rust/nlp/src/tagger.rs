//! Lexicon and suffix based part-of-speech tagger (Penn Treebank tags).

use std::collections::{HashMap, HashSet};

/// Closed-class words and frequent irregular forms.
const LEXICON: &[(&str, &str)] = &[
    // determiners
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("each", "DT"), ("every", "DT"), ("either", "DT"),
    ("neither", "DT"), ("another", "DT"), ("some", "DT"), ("any", "DT"), ("no", "DT"),
    ("all", "DT"), ("both", "DT"), ("such", "JJ"),
    // pronouns
    ("i", "PRP"), ("me", "PRP"), ("you", "PRP"), ("he", "PRP"), ("him", "PRP"),
    ("she", "PRP"), ("her", "PRP"), ("it", "PRP"), ("we", "PRP"), ("us", "PRP"),
    ("they", "PRP"), ("them", "PRP"), ("itself", "PRP"), ("themselves", "PRP"),
    ("yourself", "PRP"), ("ourselves", "PRP"), ("myself", "PRP"),
    ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("its", "PRP$"), ("our", "PRP$"),
    ("their", "PRP$"),
    // wh-words
    ("which", "WDT"), ("who", "WP"), ("whom", "WP"), ("what", "WP"), ("whose", "WP$"),
    ("when", "WRB"), ("where", "WRB"), ("why", "WRB"), ("how", "WRB"),
    // conjunctions
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("plus", "CC"),
    // prepositions and subordinators
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"),
    ("with", "IN"), ("from", "IN"), ("into", "IN"), ("onto", "IN"), ("about", "IN"),
    ("above", "IN"), ("across", "IN"), ("after", "IN"), ("against", "IN"), ("along", "IN"),
    ("among", "IN"), ("around", "IN"), ("before", "IN"), ("behind", "IN"), ("below", "IN"),
    ("beside", "IN"), ("between", "IN"), ("beyond", "IN"), ("despite", "IN"),
    ("during", "IN"), ("except", "IN"), ("inside", "IN"), ("near", "IN"), ("off", "IN"),
    ("out", "IN"), ("outside", "IN"), ("over", "IN"), ("per", "IN"), ("since", "IN"),
    ("through", "IN"), ("throughout", "IN"), ("toward", "IN"), ("towards", "IN"),
    ("under", "IN"), ("unlike", "IN"), ("until", "IN"), ("unless", "IN"), ("upon", "IN"),
    ("via", "IN"), ("within", "IN"), ("without", "IN"), ("whether", "IN"), ("if", "IN"),
    ("because", "IN"), ("although", "IN"), ("though", "IN"), ("while", "IN"),
    ("than", "IN"), ("as", "IN"), ("like", "IN"),
    ("to", "TO"),
    // modals
    ("can", "MD"), ("could", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("shall", "MD"), ("should", "MD"), ("will", "MD"), ("would", "MD"), ("ca", "MD"),
    ("wo", "MD"),
    ("there", "EX"),
    // adverbs
    ("not", "RB"), ("n't", "RB"), ("also", "RB"), ("only", "RB"), ("very", "RB"),
    ("always", "RB"), ("never", "RB"), ("often", "RB"), ("sometimes", "RB"),
    ("just", "RB"), ("too", "RB"), ("then", "RB"), ("still", "RB"), ("already", "RB"),
    ("again", "RB"), ("even", "RB"), ("ever", "RB"), ("rather", "RB"), ("quite", "RB"),
    ("almost", "RB"), ("instead", "RB"), ("however", "RB"), ("therefore", "RB"),
    ("thus", "RB"), ("here", "RB"), ("now", "RB"), ("so", "RB"), ("yet", "RB"),
    ("perhaps", "RB"), ("else", "RB"), ("otherwise", "RB"), ("well", "RB"),
    // auxiliaries and irregular verb forms
    ("is", "VBZ"), ("are", "VBP"), ("am", "VBP"), ("was", "VBD"), ("were", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"), ("has", "VBZ"), ("have", "VBP"),
    ("had", "VBD"), ("does", "VBZ"), ("do", "VBP"), ("did", "VBD"), ("done", "VBN"),
    ("made", "VBN"), ("written", "VBN"), ("wrote", "VBD"), ("taken", "VBN"),
    ("given", "VBN"), ("known", "VBN"), ("seen", "VBN"), ("thrown", "VBN"),
    ("caught", "VBN"), ("chosen", "VBN"), ("broken", "VBN"), ("hidden", "VBN"),
    ("kept", "VBN"), ("built", "VBN"), ("found", "VBN"), ("put", "VB"), ("set", "VB"),
    // frequent adjectives
    ("good", "JJ"), ("bad", "JJ"), ("new", "JJ"), ("old", "JJ"), ("same", "JJ"),
    ("other", "JJ"), ("own", "JJ"), ("clear", "JJ"), ("short", "JJ"), ("long", "JJ"),
    ("large", "JJ"), ("small", "JJ"), ("first", "JJ"), ("last", "JJ"), ("next", "JJ"),
    ("whole", "JJ"), ("single", "JJ"), ("multiple", "JJ"), ("few", "JJ"), ("many", "JJ"),
    ("much", "JJ"), ("several", "JJ"), ("main", "JJ"), ("more", "JJR"), ("less", "JJR"),
    ("most", "JJS"), ("least", "JJS"), ("top", "JJ"), ("high", "JJ"), ("low", "JJ"),
    ("different", "JJ"), ("consistent", "JJ"), ("efficient", "JJ"), ("current", "JJ"),
    ("recent", "JJ"), ("independent", "JJ"), ("present", "JJ"), ("static", "JJ"),
    // nouns that look like adjectives
    ("variable", "NN"), ("table", "NN"), ("primitive", "NN"), ("directive", "NN"),
    ("alternative", "NN"), ("archive", "NN"), ("string", "NN"), ("thing", "NN"),
    ("nothing", "NN"), ("something", "NN"), ("anything", "NN"), ("everything", "NN"),
    ("speed", "NN"), ("using", "VBG"),
    // number words
    ("zero", "CD"), ("one", "CD"), ("two", "CD"), ("three", "CD"), ("four", "CD"),
    ("five", "CD"), ("six", "CD"), ("seven", "CD"), ("eight", "CD"), ("nine", "CD"),
    ("ten", "CD"), ("hundred", "CD"), ("thousand", "CD"),
];

/// Base forms that are verbs unless context says otherwise.
const BASE_VERBS: &[&str] = &[
    "use", "avoid", "prefer", "make", "write", "declare", "define", "keep", "add", "remove",
    "call", "create", "follow", "begin", "place", "separate", "indent", "wrap", "include",
    "consider", "ensure", "apply", "check", "need", "want", "allow", "require", "see", "read",
    "know", "think", "go", "get", "let", "take", "give", "try", "show", "provide", "compare",
    "handle", "throw", "catch", "return", "implement", "extend", "override", "initialize",
    "import", "split", "break", "open", "close", "refer", "mean", "say", "become", "seem",
    "find", "leave", "omit", "reduce", "choose", "exceed", "contain", "assign", "pass",
    "replace", "move", "specify", "describe", "explain", "prevent", "run", "execute",
    "invoke", "instantiate", "limit", "start", "end", "name", "put", "set", "do", "document",
];

/// Tags after which a word reads as part of a noun phrase.
const NOMINAL_CONTEXT: &[&str] = &["DT", "PRP$", "WP$", "JJ", "JJR", "JJS", "CD", "POS", "NN", "NNP"];

/// Tags that typically follow a verb, not a plural noun.
const AFTER_VERB: &[&str] = &["DT", "PRP$", "PRP", "IN", "TO", "RB", "CD"];

#[derive(Debug)]
pub(crate) struct Tagger {
    lexicon: HashMap<&'static str, &'static str>,
    base_verbs: HashSet<&'static str>,
}

impl Tagger {
    pub(crate) fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            base_verbs: BASE_VERBS.iter().copied().collect(),
        }
    }

    /// Tag every token of one sentence.
    pub(crate) fn tag(&self, tokens: &[String]) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| self.initial_tag(t, i == 0))
            .collect();
        Self::apply_context(&mut tags);
        tags
    }

    fn initial_tag(&self, token: &str, sentence_start: bool) -> &'static str {
        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }
        if is_number(token) {
            return "CD";
        }

        let lower = token.to_lowercase();
        if let Some(&tag) = self.lexicon.get(lower.as_str()) {
            return tag;
        }
        if lower == "'s" || lower == "’s" {
            return "POS";
        }
        if self.base_verbs.contains(lower.as_str()) {
            return "VB";
        }

        let mut chars = token.chars();
        let first_upper = chars.next().is_some_and(char::is_uppercase);
        let inner_upper = chars.any(char::is_uppercase);
        if inner_upper || (first_upper && !sentence_start) {
            return "NNP";
        }

        suffix_tag(&lower)
    }

    fn apply_context(tags: &mut [&'static str]) {
        for i in 0..tags.len() {
            let prev = if i > 0 { Some(tags[i - 1]) } else { None };
            let next = tags.get(i + 1).copied();
            tags[i] = match (prev, tags[i]) {
                // "should cache", "must have"
                (Some("MD"), "NN" | "VBP") => "VB",
                // "the use", "method name"
                (Some(p), "VB") if NOMINAL_CONTEXT.contains(&p) => "NN",
                // "we use", "classes use"
                (Some("PRP" | "NNS" | "NNPS"), "VB") => "VBP",
                // "it's"
                (Some("PRP" | "EX" | "WP" | "WDT"), "POS") => "VBZ",
                // "class implements the interface"
                (Some("NN" | "NNP"), "NNS") if next.is_some_and(|n| AFTER_VERB.contains(&n)) => {
                    "VBZ"
                }
                (_, tag) => tag,
            };
        }
    }
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    let tag = match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "..." | "--" => ":",
        "(" => "-LRB-",
        ")" => "-RRB-",
        "[" => "-LSB-",
        "]" => "-RSB-",
        "{" => "-LCB-",
        "}" => "-RCB-",
        "`" => "``",
        "\"" | "'" | "“" | "”" | "‘" | "’" => "''",
        "-" | "–" | "—" => "HYPH",
        "#" => "#",
        "$" => "$",
        _ => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !c.is_alphanumeric() => "SYM",
                _ => return None,
            }
        }
    };
    Some(tag)
}

fn is_number(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// Open-class guess from the word ending.
fn suffix_tag(lower: &str) -> &'static str {
    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return "RB";
    }
    if len > 5 && lower.ends_with("ing") {
        return "VBG";
    }
    if len > 4 && lower.ends_with("ed") {
        return "VBN";
    }
    const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ical"];
    if len > 5 && ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "JJ";
    }
    if len > 3
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
    {
        return "NNS";
    }
    "NN"
}
