//! Verb-form tables for voice rewriting and tense heuristics.
//!
//! Irregular verbs are stored as `(base, past, participle)` triples so a
//! rewrite can move between simple past and past participle in either
//! direction. Regular verbs fall back to suffix rules.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Irregular verbs as `(base, simple past, past participle)`.
const IRREGULAR_VERBS: &[(&str, &str, &str)] = &[
    ("arise", "arose", "arisen"),
    ("bear", "bore", "borne"),
    ("beat", "beat", "beaten"),
    ("become", "became", "become"),
    ("begin", "began", "begun"),
    ("bend", "bent", "bent"),
    ("bind", "bound", "bound"),
    ("bite", "bit", "bitten"),
    ("blow", "blew", "blown"),
    ("break", "broke", "broken"),
    ("bring", "brought", "brought"),
    ("build", "built", "built"),
    ("buy", "bought", "bought"),
    ("catch", "caught", "caught"),
    ("choose", "chose", "chosen"),
    ("deal", "dealt", "dealt"),
    ("dig", "dug", "dug"),
    ("do", "did", "done"),
    ("draw", "drew", "drawn"),
    ("drink", "drank", "drunk"),
    ("drive", "drove", "driven"),
    ("eat", "ate", "eaten"),
    ("feed", "fed", "fed"),
    ("fight", "fought", "fought"),
    ("find", "found", "found"),
    ("fly", "flew", "flown"),
    ("forbid", "forbade", "forbidden"),
    ("forget", "forgot", "forgotten"),
    ("forgive", "forgave", "forgiven"),
    ("freeze", "froze", "frozen"),
    ("get", "got", "gotten"),
    ("give", "gave", "given"),
    ("grow", "grew", "grown"),
    ("hang", "hung", "hung"),
    ("have", "had", "had"),
    ("hear", "heard", "heard"),
    ("hide", "hid", "hidden"),
    ("hit", "hit", "hit"),
    ("hold", "held", "held"),
    ("hurt", "hurt", "hurt"),
    ("keep", "kept", "kept"),
    ("know", "knew", "known"),
    ("lay", "laid", "laid"),
    ("lead", "led", "led"),
    ("leave", "left", "left"),
    ("lend", "lent", "lent"),
    ("lose", "lost", "lost"),
    ("make", "made", "made"),
    ("mean", "meant", "meant"),
    ("meet", "met", "met"),
    ("pay", "paid", "paid"),
    ("put", "put", "put"),
    ("read", "read", "read"),
    ("ride", "rode", "ridden"),
    ("ring", "rang", "rung"),
    ("run", "ran", "run"),
    ("say", "said", "said"),
    ("see", "saw", "seen"),
    ("seek", "sought", "sought"),
    ("sell", "sold", "sold"),
    ("send", "sent", "sent"),
    ("set", "set", "set"),
    ("shake", "shook", "shaken"),
    ("shoot", "shot", "shot"),
    ("show", "showed", "shown"),
    ("shut", "shut", "shut"),
    ("sing", "sang", "sung"),
    ("sink", "sank", "sunk"),
    ("speak", "spoke", "spoken"),
    ("spend", "spent", "spent"),
    ("split", "split", "split"),
    ("spread", "spread", "spread"),
    ("steal", "stole", "stolen"),
    ("strike", "struck", "struck"),
    ("swear", "swore", "sworn"),
    ("sweep", "swept", "swept"),
    ("take", "took", "taken"),
    ("teach", "taught", "taught"),
    ("tear", "tore", "torn"),
    ("tell", "told", "told"),
    ("think", "thought", "thought"),
    ("throw", "threw", "thrown"),
    ("understand", "understood", "understood"),
    ("wake", "woke", "woken"),
    ("wear", "wore", "worn"),
    ("win", "won", "won"),
    ("withdraw", "withdrew", "withdrawn"),
    ("write", "wrote", "written"),
];

/// Words ending in -ed/-en that are adjectives or nouns rather than participles.
pub static ADJECTIVE_EXCEPTIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "tired", "bored", "excited", "interested", "worried", "scared", "surprised", "pleased",
        "satisfied", "frustrated", "confused", "annoyed", "amazed", "concerned", "relaxed",
        "married", "qualified", "experienced", "advanced", "complicated", "detailed", "limited",
        "sophisticated", "dedicated", "talented", "beloved", "crooked", "naked", "wicked",
        "rugged", "ragged", "sacred", "hundred", "golden", "wooden", "open", "often", "even",
        "seven", "eleven", "heaven", "garden", "kitten", "oven", "chicken", "children", "women",
        "men", "token", "citizen", "listen", "happen", "need", "feed", "seed", "speed", "bed",
        "red", "shed", "bred",
    ])
});

/// Linking verbs that look like passive auxiliaries but take complements.
pub static LINKING_VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "seem", "seems", "seemed", "appear", "appears", "appeared", "become", "becomes",
        "became", "feel", "feels", "felt", "look", "looks", "looked", "sound", "sounds",
        "sounded", "remain", "remains", "remained", "stay", "stays", "stayed", "grow", "grows",
        "grew",
    ])
});

static BY_PAST: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        IRREGULAR_VERBS
            .iter()
            .map(|&(base, past, participle)| (past, (base, participle)))
            .collect()
    });

static BY_PARTICIPLE: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        IRREGULAR_VERBS
            .iter()
            .map(|&(base, past, participle)| (participle, (base, past)))
            .collect()
    });

static BY_BASE: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        IRREGULAR_VERBS
            .iter()
            .map(|&(base, past, participle)| (base, (past, participle)))
            .collect()
    });

/// Check if a word is the simple past of an irregular verb.
pub fn is_irregular_past(word: &str) -> bool {
    BY_PAST.contains_key(word.to_lowercase().as_str())
}

/// Check if a word is the past participle of an irregular verb.
pub fn is_irregular_participle(word: &str) -> bool {
    BY_PARTICIPLE.contains_key(word.to_lowercase().as_str())
}

/// Check if a word is the base form of an irregular verb.
pub fn is_irregular_base(word: &str) -> bool {
    BY_BASE.contains_key(word.to_lowercase().as_str())
}

/// Check if a word is likely an adjective rather than a participle.
pub fn is_adjective_exception(word: &str) -> bool {
    ADJECTIVE_EXCEPTIONS.contains(word.to_lowercase().as_str())
}

/// Check if a word is a linking verb.
pub fn is_linking_verb(word: &str) -> bool {
    LINKING_VERBS.contains(word.to_lowercase().as_str())
}

/// Regular -ed form; short words like "bed" and "red" never qualify.
fn looks_regular_past(word: &str) -> bool {
    word.len() >= 4 && word.ends_with("ed") && !is_adjective_exception(word)
}

/// Whether `word` reads as a simple past form.
pub fn looks_past(word: &str) -> bool {
    let lower = word.to_lowercase();
    is_irregular_past(&lower) || looks_regular_past(&lower)
}

/// Whether `word` reads as a past participle.
pub fn looks_participle(word: &str) -> bool {
    let lower = word.to_lowercase();
    if is_adjective_exception(&lower) {
        return false;
    }
    is_irregular_participle(&lower) || looks_regular_past(&lower)
}

/// Past participle for a base or simple-past verb form.
///
/// Irregular forms come from the table; regular verbs follow the usual
/// spelling rules (`-e` takes `d`, consonant + `y` becomes `ied`, a short
/// consonant-vowel-consonant ending doubles the final consonant).
pub fn past_participle(verb: &str) -> String {
    let lower = verb.to_lowercase();
    if let Some(&(_, participle)) = BY_BASE.get(lower.as_str()) {
        return participle.to_string();
    }
    if let Some(&(_, participle)) = BY_PAST.get(lower.as_str()) {
        return participle.to_string();
    }
    if is_irregular_participle(&lower) || looks_regular_past(&lower) {
        return lower;
    }
    regular_past(&lower)
}

/// Simple past for a participle or base verb form.
pub fn simple_past(verb: &str) -> String {
    let lower = verb.to_lowercase();
    if let Some(&(_, past)) = BY_PARTICIPLE.get(lower.as_str()) {
        return past.to_string();
    }
    if let Some(&(past, _)) = BY_BASE.get(lower.as_str()) {
        return past.to_string();
    }
    if is_irregular_past(&lower) || looks_regular_past(&lower) {
        return lower;
    }
    regular_past(&lower)
}

fn regular_past(base: &str) -> String {
    let chars: Vec<char> = base.chars().collect();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');
    match chars.as_slice() {
        [.., 'e'] => format!("{base}d"),
        [.., c, 'y'] if !is_vowel(*c) => format!("{}ied", &base[..base.len() - 1]),
        [.., a, v, c]
            if chars.len() <= 4
                && !is_vowel(*a)
                && is_vowel(*v)
                && !is_vowel(*c)
                && !matches!(*c, 'w' | 'x' | 'y') =>
        {
            format!("{base}{c}ed")
        }
        _ => format!("{base}ed"),
    }
}
