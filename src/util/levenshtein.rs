//! Levenshtein edit distance.
//!
//! The functions here work on any slice of comparable symbols so the same code
//! serves Unicode scalar values (`&[char]`) and raw term bytes (`&[u8]`).
//! Only insertions, deletions and substitutions count as edits; an adjacent
//! transposition costs two.

use std::cmp::min;

/// Calculate the Levenshtein distance between two symbol sequences.
pub fn levenshtein_distance<T: PartialEq>(s1: &[T], s2: &[T]) -> usize {
    let len1 = s1.len();
    let len2 = s2.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;
        for j in 1..=len2 {
            let cost = if s1[i - 1] == s2[j - 1] { 0 } else { 1 };
            curr_row[j] = min(
                min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Calculate Levenshtein distance with a maximum threshold for early termination.
///
/// Returns `None` as soon as the distance is known to exceed `threshold`, which
/// keeps rejection of far-away dictionary terms cheap.
pub fn levenshtein_distance_threshold<T: PartialEq>(
    s1: &[T],
    s2: &[T],
    threshold: usize,
) -> Option<usize> {
    let len1 = s1.len();
    let len2 = s2.len();

    // The length difference alone is a lower bound on the distance.
    if len1.abs_diff(len2) > threshold {
        return None;
    }

    if len1 == 0 {
        return Some(len2);
    }
    if len2 == 0 {
        return Some(len1);
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;
        let mut min_in_row = i;

        for j in 1..=len2 {
            let cost = if s1[i - 1] == s2[j - 1] { 0 } else { 1 };
            curr_row[j] = min(
                min(prev_row[j] + 1, curr_row[j - 1] + 1),
                prev_row[j - 1] + cost,
            );
            min_in_row = min(min_in_row, curr_row[j]);
        }

        if min_in_row > threshold {
            return None;
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let distance = prev_row[len2];
    (distance <= threshold).then_some(distance)
}

/// Levenshtein distance between two strings, counted in Unicode scalar values.
pub fn str_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    levenshtein_distance(&s1_chars, &s2_chars)
}

/// Bounded distance between two dictionary terms.
///
/// Terms that are both valid UTF-8 are compared per scalar value, so a single
/// accented letter is one edit; anything else falls back to byte comparison.
pub fn term_distance_threshold(t1: &[u8], t2: &[u8], threshold: usize) -> Option<usize> {
    match (std::str::from_utf8(t1), std::str::from_utf8(t2)) {
        (Ok(s1), Ok(s2)) => {
            let s1_chars: Vec<char> = s1.chars().collect();
            let s2_chars: Vec<char> = s2.chars().collect();
            levenshtein_distance_threshold(&s1_chars, &s2_chars, threshold)
        }
        _ => levenshtein_distance_threshold(t1, t2, threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(str_distance("", ""), 0);
        assert_eq!(str_distance("", "a"), 1);
        assert_eq!(str_distance("a", ""), 1);
        assert_eq!(str_distance("a", "a"), 0);
        assert_eq!(str_distance("ab", "ac"), 1);
        assert_eq!(str_distance("abc", "def"), 3);
        assert_eq!(str_distance("kitten", "sitting"), 3);
        assert_eq!(str_distance("search", "serach"), 2); // transposition
    }

    #[test]
    fn test_dictionary_neighbours() {
        assert_eq!(str_distance("beet", "beet"), 0);
        assert_eq!(str_distance("beet", "beats"), 2);
        assert_eq!(str_distance("beet", "beetle"), 2);
        assert_eq!(str_distance("aplee", "apple"), 2);
    }

    #[test]
    fn test_levenshtein_distance_threshold() {
        let kitten: Vec<char> = "kitten".chars().collect();
        let sitting: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein_distance_threshold(&kitten, &sitting, 3), Some(3));
        assert_eq!(levenshtein_distance_threshold(&kitten, &sitting, 2), None);
        assert_eq!(levenshtein_distance_threshold(b"a", b"abc", 1), None);
        assert_eq!(levenshtein_distance_threshold(b"a", b"ab", 1), Some(1));
        assert_eq!(levenshtein_distance_threshold(b"", b"ab", 1), None);
        assert_eq!(levenshtein_distance_threshold(b"", b"ab", 2), Some(2));
    }

    #[test]
    fn test_term_distance_counts_scalars() {
        // "é" is two bytes but one scalar value.
        assert_eq!(
            term_distance_threshold("café".as_bytes(), b"cafe", 1),
            Some(1)
        );
        assert_eq!(term_distance_threshold(&[0xff, 0x01], &[0xff, 0x02], 1), Some(1));
    }
}
