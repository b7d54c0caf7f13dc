//! Name normalization.
//!
//! Turns an arbitrary file or directory name into one made only of ASCII
//! letters, digits, `_` and `.`: Cyrillic letters are transliterated, every
//! other unsafe character becomes an underscore.
//!
//! ```
//! use clean_folder::normalize::normalize;
//!
//! assert_eq!(normalize("Тест.jpg"), "Test.jpg");
//! assert_eq!(normalize("my file (1).txt"), "my_file__1_.txt");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const CYRILLIC: &str = "абвгґдеёєэжзиіїйклмнопрстуфхцчшщюяьъ";

const LATIN: [&str; 36] = [
    "a", "b", "v", "g", "g", "d", "e", "io", "ie", "e", "zh", "z", "y", "i", "ii", "i", "k", "l",
    "m", "n", "o", "p", "r", "s", "t", "u", "f", "kh", "ts", "ch", "sh", "shch", "iu", "ia", "",
    "",
];

/// Lower and upper case Cyrillic letters to their Latin spelling.
static TRANSLIT_TABLE: Lazy<HashMap<char, String>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(CYRILLIC.chars().count() * 2);
    for (letter, latin) in CYRILLIC.chars().zip(LATIN) {
        table.insert(letter, latin.to_string());
        for upper in letter.to_uppercase() {
            table.insert(upper, capitalize(latin));
        }
    }
    table
});

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.]").expect("Invalid unsafe-character pattern"));

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces Cyrillic letters with their Latin spelling, leaving everything
/// else as is. An uppercase letter yields a capitalized spelling (`Ж` -> `Zh`).
pub fn transliterate(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match TRANSLIT_TABLE.get(&ch) {
            Some(latin) => out.push_str(latin),
            None => out.push(ch),
        }
    }
    out
}

/// Makes `name` filesystem-safe: transliterates Cyrillic, then replaces any
/// character outside `[A-Za-z0-9_.]` with `_`.
pub fn normalize(name: &str) -> String {
    UNSAFE_CHARS
        .replace_all(&transliterate(name), "_")
        .into_owned()
}
