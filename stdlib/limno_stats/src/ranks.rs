//! Mid-rank assignment with tolerance-based tie detection.

/// Values closer than this are treated as tied.
pub const TIE_TOLERANCE: f64 = 1e-12;

/// Mid-ranks of a sample plus the sizes of its tie groups.
///
/// `ranks[i]` is the (1-based) rank of the `i`-th input value. `tie_groups` lists the
/// size of every group of equal values in ascending value order, singletons included,
/// so the sizes always sum to the sample size.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub ranks: Vec<f64>,
    pub tie_groups: Vec<usize>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn has_ties(&self) -> bool {
        self.tie_groups.iter().any(|&t| t > 1)
    }

    /// `Σ t(t² − 1)` over tie groups, the common numerator of rank-variance corrections.
    pub fn tie_term(&self) -> f64 {
        self.tie_groups
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * (t * t - 1.0)
            })
            .sum()
    }

    /// Sizes of the groups that actually contain ties.
    pub fn tied_group_sizes(&self) -> Vec<usize> {
        self.tie_groups.iter().copied().filter(|&t| t > 1).collect()
    }
}

/// Assigns average ranks to `xs`, treating `|a - b| < TIE_TOLERANCE` as a tie.
///
/// Equality is checked against the first value of the current group, so a run of
/// values each within tolerance of its neighbour cannot drift into one giant group.
pub fn rank_with_ties(xs: &[f64]) -> Ranking {
    let n = xs.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));

    let mut ranks = vec![0.0; n];
    let mut tie_groups = Vec::new();
    let mut start = 0;
    while start < n {
        let anchor = xs[order[start]];
        let mut end = start + 1;
        while end < n && (xs[order[end]] - anchor).abs() < TIE_TOLERANCE {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let mid_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = mid_rank;
        }
        tie_groups.push(end - start);
        start = end;
    }

    Ranking { ranks, tie_groups }
}
