//! Upload file name handling.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();
}

/// Replace accented Latin-1 letters with their base letter.
fn fold_accent(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'à'..='å' => 'a',
        'Ç' => 'C',
        'ç' => 'c',
        'È'..='Ë' => 'E',
        'è'..='ë' => 'e',
        'Ì'..='Ï' => 'I',
        'ì'..='ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò'..='Ö' => 'O',
        'ò'..='ö' => 'o',
        'Ù'..='Ü' => 'U',
        'ù'..='ü' => 'u',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Turn a user-supplied file name into one that is safe to store.
///
/// Path separators become spaces, whitespace runs become `_`, accents are
/// folded, and anything outside `[A-Za-z0-9_.-]` is dropped. Leading and
/// trailing dots and underscores are stripped, so `../../etc/passwd`
/// becomes `etc_passwd`. The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let folded: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { fold_accent(c) })
        .collect();

    let joined = folded.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}
