/// Levenshtein edit distance over Unicode scalar values, using the two-row
/// O(min(m,n)) space algorithm.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Keep the shorter string in the inner loop to minimise allocation.
    let (a, b, m, n) = if m <= n { (a, b, m, n) } else { (b, a, n, m) };

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Ties go to the block starting earliest in `a`.
pub fn longest_common_block(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut curr = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                curr[j - blo + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = curr;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identical_strings_are_zero() {
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("", ""), 0);
    }

    #[test]
    fn empty_string_is_length_of_other() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
    }

    #[test]
    fn single_substitution() {
        assert_eq!(levenshtein_distance("cat", "bat"), 1);
    }

    #[test]
    fn accented_letter_is_one_edit() {
        assert_eq!(levenshtein_distance("réserves", "reserves"), 1);
    }

    #[test]
    fn commutative() {
        assert_eq!(
            levenshtein_distance("capitaux", "captaux"),
            levenshtein_distance("captaux", "capitaux")
        );
    }

    #[test]
    fn longest_block_found() {
        let a = chars("total des actifs");
        let b = chars("les actifs");
        let (i, j, k) = longest_common_block(&a, &b, (0, a.len()), (0, b.len()));
        assert_eq!(k, 9);
        assert_eq!(&a[i..i + k], &b[j..j + k]);
    }

    #[test]
    fn longest_block_prefers_earliest_in_a() {
        let a = chars("abab");
        let b = chars("ab");
        assert_eq!(longest_common_block(&a, &b, (0, 4), (0, 2)), (0, 0, 2));
    }

    #[test]
    fn no_common_block() {
        let a = chars("abc");
        let b = chars("xyz");
        assert_eq!(longest_common_block(&a, &b, (0, 3), (0, 3)).2, 0);
    }
}
