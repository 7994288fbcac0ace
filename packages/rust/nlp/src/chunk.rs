//! Shallow constituency parser over tagged tokens.
//!
//! Builds base noun phrases, then layers coordination (`NP CC NP`),
//! `of`-attachment (`NP of NP`), prepositional phrases and verb phrases on
//! top, all under a single `S` root spanning the sentence.

use crate::{NOUN_PHRASE, ParseTree};

const PREPOSITIONAL_PHRASE: &str = "PP";
const VERB_PHRASE: &str = "VP";
const SENTENCE: &str = "S";

/// Partially parsed sentence: a bare token or a finished phrase.
#[derive(Debug)]
enum Item {
    Token(usize),
    Phrase(ParseTree),
}

impl Item {
    fn start(&self) -> usize {
        match self {
            Item::Token(i) => *i,
            Item::Phrase(p) => p.start,
        }
    }

    fn is_labelled(&self, label: &str) -> bool {
        matches!(self, Item::Phrase(p) if p.label == label)
    }

    fn into_tree(self) -> Option<ParseTree> {
        match self {
            Item::Token(_) => None,
            Item::Phrase(p) => Some(p),
        }
    }
}

/// Parse one sentence given its tokens and their Penn tags.
pub(crate) fn parse(tokens: &[String], tags: &[&str]) -> ParseTree {
    let items = base_noun_phrases(tags);
    let items = coordinate(items, tags);
    let items = attach_of(items, tokens, tags);
    let items = prepositional_phrases(items, tags);
    let items = verb_phrases(items, tags);

    let children = items.into_iter().filter_map(Item::into_tree).collect();
    ParseTree::new(SENTENCE, 0, tags.len()).with_children(children)
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

fn base_noun_phrases(tags: &[&str]) -> Vec<Item> {
    let mut items = Vec::new();
    let mut i = 0;

    while i < tags.len() {
        if tags[i] == "PRP" {
            items.push(Item::Phrase(ParseTree::new(NOUN_PHRASE, i, i + 1)));
            i += 1;
            continue;
        }

        let mut j = i;
        while j < tags.len() && is_determiner(tags[j]) {
            j += 1;
        }
        while j < tags.len() && is_nominal(tags[j]) {
            j += 1;
        }

        // The phrase ends at its last head word.
        match (i..j).rev().find(|&k| is_head(tags[k])) {
            Some(head) => {
                items.push(Item::Phrase(ParseTree::new(NOUN_PHRASE, i, head + 1)));
                i = head + 1;
            }
            None => {
                items.push(Item::Token(i));
                i += 1;
            }
        }
    }
    items
}

/// `NP CC NP (CC NP)*` becomes one NP over the conjuncts.
fn coordinate(items: Vec<Item>, tags: &[&str]) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while let Some(item) = iter.next() {
        let joins = matches!(item, Item::Token(i) if tags[i] == "CC")
            && out.last().is_some_and(|prev| prev.is_labelled(NOUN_PHRASE))
            && iter.peek().is_some_and(|next| next.is_labelled(NOUN_PHRASE));

        if !joins {
            out.push(item);
            continue;
        }

        if let (Some(Item::Phrase(mut left)), Some(Item::Phrase(right))) = (out.pop(), iter.next())
        {
            let joined = if is_coordination(&left, tags) {
                // Extend an existing coordination instead of nesting it.
                left.end = right.end;
                left.children.push(right);
                left
            } else {
                ParseTree::new(NOUN_PHRASE, left.start, right.end).with_children(vec![left, right])
            };
            out.push(Item::Phrase(joined));
        }
    }
    out
}

fn is_coordination(np: &ParseTree, tags: &[&str]) -> bool {
    np.children.len() >= 2
        && np.children.windows(2).all(|w| {
            w[0].end + 1 == w[1].start && tags.get(w[0].end).is_some_and(|t| *t == "CC")
        })
}

/// `NP of NP` becomes `NP(NP, PP(of NP))`.
fn attach_of(items: Vec<Item>, tokens: &[String], tags: &[&str]) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while let Some(item) = iter.next() {
        let is_of = matches!(item, Item::Token(i)
            if tags[i] == "IN" && tokens[i].eq_ignore_ascii_case("of"));
        let attaches = is_of
            && out.last().is_some_and(|prev| prev.is_labelled(NOUN_PHRASE))
            && iter.peek().is_some_and(|next| next.is_labelled(NOUN_PHRASE));

        if !attaches {
            out.push(item);
            continue;
        }

        if let (Some(Item::Phrase(head)), Some(Item::Phrase(object))) = (out.pop(), iter.next()) {
            let pp = ParseTree::new(PREPOSITIONAL_PHRASE, item.start(), object.end)
                .with_children(vec![object]);
            let np =
                ParseTree::new(NOUN_PHRASE, head.start, pp.end).with_children(vec![head, pp]);
            out.push(Item::Phrase(np));
        }
    }
    out
}

/// `IN NP` or `TO NP` becomes a PP.
fn prepositional_phrases(items: Vec<Item>, tags: &[&str]) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while let Some(item) = iter.next() {
        let is_prep = matches!(item, Item::Token(i) if tags[i] == "IN" || tags[i] == "TO");
        if is_prep && iter.peek().is_some_and(|next| next.is_labelled(NOUN_PHRASE)) {
            if let Some(Item::Phrase(object)) = iter.next() {
                let pp = ParseTree::new(PREPOSITIONAL_PHRASE, item.start(), object.end)
                    .with_children(vec![object]);
                out.push(Item::Phrase(pp));
                continue;
            }
        }
        out.push(item);
    }
    out
}

/// A verb group plus the NP/PP phrases that directly follow it.
fn verb_phrases(items: Vec<Item>, tags: &[&str]) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while let Some(item) = iter.next() {
        let Item::Token(first) = item else {
            out.push(item);
            continue;
        };
        if !is_verb(tags[first]) {
            out.push(item);
            continue;
        }

        let mut end = first + 1;
        while let Some(Item::Token(i)) = iter.peek() {
            if !is_verb_group(tags[*i]) {
                break;
            }
            end = i + 1;
            iter.next();
        }

        let mut children = Vec::new();
        while iter.peek().is_some_and(|next| {
            next.is_labelled(NOUN_PHRASE) || next.is_labelled(PREPOSITIONAL_PHRASE)
        }) {
            if let Some(Item::Phrase(phrase)) = iter.next() {
                end = phrase.end;
                children.push(phrase);
            }
        }

        out.push(Item::Phrase(
            ParseTree::new(VERB_PHRASE, first, end).with_children(children),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Tag classes
// ---------------------------------------------------------------------------

fn is_determiner(tag: &str) -> bool {
    matches!(tag, "DT" | "PDT" | "PRP$" | "WP$")
}

fn is_nominal(tag: &str) -> bool {
    matches!(
        tag,
        "JJ" | "JJR" | "JJS" | "CD" | "VBN" | "VBG" | "NN" | "NNS" | "NNP" | "NNPS" | "POS" | "HYPH"
    )
}

fn is_head(tag: &str) -> bool {
    matches!(tag, "NN" | "NNS" | "NNP" | "NNPS" | "CD")
}

fn is_verb(tag: &str) -> bool {
    tag.starts_with("VB") || tag == "MD"
}

fn is_verb_group(tag: &str) -> bool {
    is_verb(tag) || matches!(tag, "RB" | "RP" | "TO")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(words: &[&str], tags: &[&str]) -> ParseTree {
        let tokens: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
        parse(&tokens, tags)
    }

    #[test]
    fn base_np_covers_determiner_and_modifiers() {
        let tree = run(&["The", "quick", "brown", "fox"], &["DT", "NN", "NN", "NN"]);
        assert_eq!(tree.label, "S");
        assert_eq!(tree.spans_labelled(NOUN_PHRASE), vec![(0, 4)]);
    }

    #[test]
    fn np_stops_at_last_head_word() {
        // "the generated files quickly"
        let tree = run(
            &["the", "generated", "files", "quickly"],
            &["DT", "VBN", "NNS", "RB"],
        );
        assert_eq!(tree.spans_labelled(NOUN_PHRASE), vec![(0, 3)]);
    }

    #[test]
    fn of_attachment_nests_noun_phrases() {
        let tree = run(
            &["the", "name", "of", "the", "class"],
            &["DT", "NN", "IN", "DT", "NN"],
        );
        assert_eq!(tree.spans_labelled(NOUN_PHRASE), vec![(0, 5), (0, 2), (3, 5)]);
        assert_eq!(tree.spans_labelled("PP"), vec![(2, 5)]);
    }

    #[test]
    fn coordination_wraps_conjuncts() {
        let tree = run(
            &["fields", "and", "methods", "or", "classes"],
            &["NNS", "CC", "NNS", "CC", "NNS"],
        );
        assert_eq!(
            tree.spans_labelled(NOUN_PHRASE),
            vec![(0, 5), (0, 1), (2, 3), (4, 5)]
        );
    }

    #[test]
    fn verb_phrase_takes_following_objects() {
        // "We use tabs in Java"
        let tree = run(
            &["We", "use", "tabs", "in", "Java"],
            &["PRP", "VBP", "NNS", "IN", "NNP"],
        );
        let vp = &tree.children[1];
        assert_eq!((vp.label.as_str(), vp.start, vp.end), ("VP", 1, 5));
        assert_eq!(tree.spans_labelled(NOUN_PHRASE), vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn sentence_without_nouns_has_no_np() {
        let tree = run(&["Always", "do", "it", "!"], &["RB", "VBP", "PRP", "."]);
        assert_eq!(tree.spans_labelled(NOUN_PHRASE), vec![(2, 3)]);
        assert!(run(&[], &[]).children.is_empty());
    }
}
