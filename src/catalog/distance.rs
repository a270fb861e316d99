//! Edit distance for fuzzy font-name matching
//!
//! Unit-cost insertions, deletions and substitutions, computed with a single
//! rolling row so a scan over a catalog of thousands of names stays cheap:
//! O(n·m) time, O(min(n, m)) memory per comparison.

/// Edit distance between two names, case-sensitive.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Roll over the shorter string to keep the working row minimal.
    if a.len() <= b.len() {
        levenshtein_row(&a, &b)
    } else {
        levenshtein_row(&b, &a)
    }
}

fn levenshtein_row(short: &[char], long: &[char]) -> usize {
    if short == long {
        return 0;
    }
    if short.is_empty() {
        return long.len();
    }

    let mut cache: Vec<usize> = (1..=short.len()).collect();
    let mut result = 0;

    for (i, &code) in long.iter().enumerate() {
        result = i;
        let mut distance = i;

        for (j, &c) in short.iter().enumerate() {
            let sub_distance = if code == c { distance } else { distance + 1 };
            distance = cache[j];

            result = if distance > result {
                if sub_distance > result {
                    result + 1
                } else {
                    sub_distance
                }
            } else if sub_distance > distance {
                distance + 1
            } else {
                sub_distance
            };
            cache[j] = result;
        }
    }

    result
}
