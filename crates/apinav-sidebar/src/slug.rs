//! Slug and label derivation.
//!
//! Slugs are lowercase ASCII words joined by hyphens. Words are split at
//! non-alphanumeric characters, at lower-to-upper case changes, at the end
//! of an acronym (`HTMLParser` -> `HTML`, `Parser`) and between letters and
//! digits (`B2C` -> `B`, `2`, `C`).
//!
//! Non-ASCII input is transliterated: Latin letters with diacritics map to
//! their ASCII base letters, combining marks are dropped, and any other
//! letter or digit becomes a `u<hex>` word so distinct scripts never
//! collapse to the same slug.

use std::collections::{HashMap, HashSet};

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    /// Alphabetic without case (e.g. CJK).
    Caseless,
}

fn classify(c: char) -> Option<CharClass> {
    if !c.is_alphanumeric() {
        None
    } else if c.is_uppercase() {
        Some(CharClass::Upper)
    } else if c.is_lowercase() {
        Some(CharClass::Lower)
    } else if c.is_numeric() {
        Some(CharClass::Digit)
    } else {
        Some(CharClass::Caseless)
    }
}

fn is_boundary(prev: CharClass, cur: CharClass, next: Option<CharClass>) -> bool {
    use CharClass::{Caseless, Digit, Lower, Upper};

    match (prev, cur) {
        (Lower | Caseless, Upper)
        | (Digit, Upper | Lower | Caseless)
        | (Upper | Lower | Caseless, Digit) => true,
        (Upper, Upper) => next == Some(Lower),
        _ => false,
    }
}

/// Split text into words, keeping original characters and case.
pub(crate) fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<CharClass> = None;

    for (i, &c) in chars.iter().enumerate() {
        if is_apostrophe(c) {
            continue;
        }
        let Some(class) = classify(c) else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        };
        let next = chars.get(i + 1).copied().and_then(classify);
        if let Some(p) = prev
            && is_boundary(p, class, next)
            && !current.is_empty()
        {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(class);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Apostrophes join words instead of separating them ("What's" -> "Whats").
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

/// ASCII base letter of a Latin letter with diacritics (`é` -> `e`).
fn latin_base(c: char) -> Option<char> {
    let mut base = None;
    let mut marks_only = true;
    decompose_canonical(c, |d| {
        if base.is_none() {
            base = Some(d);
        } else if !is_combining_mark(d) {
            marks_only = false;
        }
    });
    base.filter(|b| b.is_ascii_alphanumeric() && marks_only)
}

/// ASCII spelling of Latin letters without a canonical decomposition.
fn fold_latin(c: char) -> Option<&'static str> {
    let ascii = match c {
        'Æ' => "Ae",
        'æ' => "ae",
        'Ð' | 'Đ' => "D",
        'ð' | 'đ' => "d",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'ĸ' => "k",
        'Ŀ' | 'Ł' => "L",
        'ŀ' | 'ł' => "l",
        'Ŋ' => "N",
        'ŉ' | 'ŋ' => "n",
        'Ø' => "O",
        'ø' => "o",
        'Œ' => "Oe",
        'œ' => "oe",
        'ſ' => "s",
        'ß' => "ss",
        'Ŧ' => "T",
        'ŧ' => "t",
        'Þ' => "Th",
        'þ' => "th",
        _ => return None,
    };
    Some(ascii)
}

/// Convert text to a slug of lowercase ASCII letters, digits and hyphens.
///
/// Returns an empty string when the text has no letters or digits.
#[must_use]
pub fn slugify(text: &str) -> String {
    fn flush(run: &mut String, words: &mut Vec<String>) {
        if !run.is_empty() {
            words.extend(split_words(run));
            run.clear();
        }
    }

    let mut words = Vec::new();
    let mut run = String::new();

    // NFC first so canonically equivalent spellings slug the same
    for c in text.nfc() {
        if c.is_ascii_alphanumeric() {
            run.push(c);
        } else if is_apostrophe(c) || is_combining_mark(c) {
            // Dropped without splitting the word
        } else if let Some(base) = latin_base(c) {
            run.push(base);
        } else if let Some(ascii) = fold_latin(c) {
            run.push_str(ascii);
        } else {
            flush(&mut run, &mut words);
            if !c.is_ascii() && c.is_alphanumeric() {
                words.push(format!("u{:x}", u32::from(c)));
            }
        }
    }
    flush(&mut run, &mut words);

    words
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Turn an identifier such as `listFoodItems` into `List Food Items`.
#[must_use]
pub fn humanize(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Hands out unique slugs in claim order.
///
/// The first claim of a slug gets it unchanged; later claims get `-2`,
/// `-3`, ... skipping any suffixed form that is already taken.
#[derive(Debug, Default)]
pub(crate) struct SlugRegistry {
    taken: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl SlugRegistry {
    pub(crate) fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_owned()) {
            return base.to_owned();
        }

        let suffix = self.next_suffix.entry(base.to_owned()).or_insert(2);
        loop {
            let candidate = format!("{base}-{suffix}");
            *suffix += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
