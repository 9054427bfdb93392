pub mod scaled_math;

use std::ops::Neg;

/// Returns the empirical order-0 entropy, in bits per symbol, of a distribution given as the
/// frequencies of its symbols.
pub fn entropy(distr: &[usize], total_freq: f64) -> f64 {
    let mut entropy = 0.0;

    for freq in distr {
        if *freq == 0 {
            continue;
        }
        let pr = *freq as f64 / total_freq;
        entropy += pr * f64::log2(pr);
    }
    entropy.neg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy() {
        let distr = [3_usize, 3, 4];
        assert_eq!("1.57", format!("{:.2}", entropy(&distr, 10_f64)));
    }

    #[test]
    fn test_entropy_skips_missing_symbols() {
        let distr = [5_usize, 0, 5];
        assert_eq!("1.00", format!("{:.2}", entropy(&distr, 10_f64)));
    }
}
