//! Split byte streams into maximal runs of ASCII letters.

use std::io::{self, BufRead};

/// Calls `on_word` for every maximal run of ASCII alphabetic bytes in `reader`,
/// including a run that ends at EOF.
pub fn for_each_word<R, F>(mut reader: R, mut on_word: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut word = String::new();
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        let len = chunk.len();
        for &b in chunk {
            if b.is_ascii_alphabetic() {
                word.push(b as char);
            } else if !word.is_empty() {
                on_word(&word);
                word.clear();
            }
        }
        reader.consume(len);
    }
    if !word.is_empty() {
        on_word(&word);
    }
    Ok(())
}
