pub const MAX_Q: usize = 93;

pub type QualHist = [u64; MAX_Q + 1];

pub struct FinalizeContext {
    pub file_name: String,
    pub sample_name: String,
    pub phred_offset: u8,
}

pub fn hist_total(hist: &QualHist) -> u64 {
    hist.iter().sum()
}

/// Value at 0-based `rank` of the sorted score list the histogram describes.
/// Quartiles are selected this way (index `floor(q*n)`), never interpolated.
pub fn select_from_hist(hist: &QualHist, rank: u64) -> u8 {
    let mut cum: u64 = 0;
    for (q, &count) in hist.iter().enumerate() {
        cum += count;
        if cum > rank {
            return q as u8;
        }
    }
    MAX_Q as u8
}

pub fn mean_from_hist(hist: &QualHist) -> f64 {
    let mut total: u64 = 0;
    let mut sum: u64 = 0;
    for (q, &count) in hist.iter().enumerate() {
        total += count;
        sum += count * q as u64;
    }
    if total == 0 {
        0.0
    } else {
        sum as f64 / total as f64
    }
}

/// Midpoint-average median: for even sample counts the two middle values
/// are averaged, matching the usual numeric median.
pub fn median_from_hist(hist: &QualHist) -> f64 {
    let n = hist_total(hist);
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        select_from_hist(hist, n / 2) as f64
    } else {
        let lo = select_from_hist(hist, n / 2 - 1) as f64;
        let hi = select_from_hist(hist, n / 2) as f64;
        (lo + hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist_of(scores: &[u8]) -> QualHist {
        let mut h = [0u64; MAX_Q + 1];
        for &s in scores {
            h[s as usize] += 1;
        }
        h
    }

    #[test]
    fn select_matches_sorted_index() {
        let h = hist_of(&[30, 10, 40, 20]);
        // sorted: [10, 20, 30, 40]
        assert_eq!(select_from_hist(&h, 0), 10);
        assert_eq!(select_from_hist(&h, 1), 20);
        assert_eq!(select_from_hist(&h, 2), 30);
        assert_eq!(select_from_hist(&h, 3), 40);
    }

    #[test]
    fn median_even_is_midpoint() {
        let h = hist_of(&[10, 20, 30, 40]);
        assert_eq!(median_from_hist(&h), 25.0);
        let h = hist_of(&[10, 20, 30]);
        assert_eq!(median_from_hist(&h), 20.0);
    }

    #[test]
    fn empty_hist_yields_zeroes() {
        let h = [0u64; MAX_Q + 1];
        assert_eq!(mean_from_hist(&h), 0.0);
        assert_eq!(median_from_hist(&h), 0.0);
    }
}
