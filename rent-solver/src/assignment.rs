use rent_core::models::{Assignment, ValuationMatrix};
use tracing::{Level, event};

/// Up to this many agents, the welfare-maximizing assignment is found by
/// exhaustive enumeration (8! = 40320 permutations); beyond it, by the
/// Hungarian method.
pub const ENUMERATION_LIMIT: usize = 8;

/// Find the assignment of agents to goods maximizing total valuation.
///
/// Ties are broken deterministically: for small problems the first optimum in
/// swap-order enumeration wins (see [`enumerate`]), otherwise the
/// lexicographically smallest optimum (see [`hungarian`]). Downstream prices
/// depend on which optimum is chosen, so this choice must never vary between
/// runs on identical inputs.
pub fn welfare_maximizing(valuations: &ValuationMatrix) -> Assignment {
    let assignment = if valuations.size() <= ENUMERATION_LIMIT {
        enumerate(valuations)
    } else {
        hungarian(valuations)
    };

    event!(
        Level::DEBUG,
        assignment = ?assignment.as_slice(),
        welfare = valuations.welfare(&assignment),
        "selected welfare-maximizing assignment"
    );

    assignment
}

/// Exhaustively enumerate every permutation and keep the first one achieving
/// the strictly greatest welfare.
///
/// Permutations are generated by the recursive swap scheme: position `k` is
/// swapped with each of positions `k..n` in turn, recursing on `k + 1`. For
/// three agents this visits `[0,1,2], [0,2,1], [1,0,2], [1,2,0], [2,1,0], [2,0,1]`.
pub fn enumerate(valuations: &ValuationMatrix) -> Assignment {
    let n = valuations.size();
    let mut goods = (0..n).collect::<Vec<_>>();
    let mut best = goods.clone();
    let mut best_welfare = f64::NEG_INFINITY;

    permute(&mut goods, 0, &mut |candidate| {
        // Accumulate in agent order, exactly as ValuationMatrix::welfare does
        let welfare = candidate
            .iter()
            .enumerate()
            .fold(0.0, |total, (agent, &good)| total + valuations.get(agent, good));
        if welfare > best_welfare {
            best_welfare = welfare;
            best.copy_from_slice(candidate);
        }
    });

    // SAFETY: every candidate is a rearrangement of 0..n
    unsafe { Assignment::new_unchecked(best) }
}

fn permute(goods: &mut [usize], start: usize, visit: &mut impl FnMut(&[usize])) {
    if start == goods.len() {
        visit(goods);
        return;
    }
    for i in start..goods.len() {
        goods.swap(start, i);
        permute(goods, start + 1, visit);
        goods.swap(start, i);
    }
}

/// Solve the assignment problem with the O(n³) Hungarian method, then
/// canonicalize to the lexicographically smallest optimal assignment.
///
/// The Hungarian method leaves behind dual potentials `(u, v)`; an assignment
/// is optimal exactly when every agent-good pair it uses is *tight*
/// (`cost = u + v`). Canonicalization walks agents in order and gives each the
/// smallest tight good that still admits a perfect tight matching for the
/// rest, rerouting the current matching along an alternating cycle when needed.
pub fn hungarian(valuations: &ValuationMatrix) -> Assignment {
    let n = valuations.size();

    // Maximizing welfare is minimizing the shortfall from the largest valuation
    let top = valuations.max_value();
    let cost = valuations
        .rows()
        .map(|row| row.iter().map(|v| top - v).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let (goods, u, v) = minimize(&cost);

    let tolerance = 1e-9 * top.max(1.0) * n as f64;
    let tight = |agent: usize, good: usize| cost[agent][good] - u[agent] - v[good] <= tolerance;
    let goods = canonicalize(goods, &tight);

    // SAFETY: both the Hungarian method and canonicalization maintain a perfect matching
    unsafe { Assignment::new_unchecked(goods) }
}

// The classical potentials formulation. Rows and columns are 1-indexed
// internally, with index 0 acting as a virtual source column.
fn minimize(cost: &[Vec<f64>]) -> (Vec<usize>, Vec<f64>, Vec<f64>) {
    let n = cost.len();
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    // owner[j] is the row matched to column j (0 when unmatched)
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut col = 0;
        let mut slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col] = true;
            let current = owner[col];
            let mut delta = f64::INFINITY;
            let mut next = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[current - 1][j - 1] - u[current] - v[j];
                if reduced < slack[j] {
                    slack[j] = reduced;
                    way[j] = col;
                }
                if slack[j] < delta {
                    delta = slack[j];
                    next = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    slack[j] -= delta;
                }
            }

            col = next;
            if owner[col] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the source
        loop {
            let prev = way[col];
            owner[col] = owner[prev];
            col = prev;
            if col == 0 {
                break;
            }
        }
    }

    let mut goods = vec![0; n];
    for j in 1..=n {
        goods[owner[j] - 1] = j - 1;
    }

    (goods, u[1..].to_vec(), v[1..].to_vec())
}

fn canonicalize(mut goods: Vec<usize>, tight: &impl Fn(usize, usize) -> bool) -> Vec<usize> {
    let n = goods.len();
    let mut owner = vec![0; n];
    for (agent, &good) in goods.iter().enumerate() {
        owner[good] = agent;
    }

    // Goods already settled on an earlier agent
    let mut settled = vec![false; n];

    for agent in 0..n {
        for good in 0..n {
            if settled[good] || !tight(agent, good) {
                continue;
            }
            if goods[agent] == good {
                break;
            }

            // The holder of `good` must be able to reach the good `agent` gives up
            let mut visited = settled.clone();
            visited[good] = true;
            let target = goods[agent];
            if reroute(owner[good], target, tight, &mut visited, &mut goods, &mut owner) {
                goods[agent] = good;
                owner[good] = agent;
                break;
            }
        }
        settled[goods[agent]] = true;
    }

    goods
}

// Depth-first search for an alternating path of tight edges from `agent` to
// `target`, applying the reassignments on the way back out.
fn reroute(
    agent: usize,
    target: usize,
    tight: &impl Fn(usize, usize) -> bool,
    visited: &mut [bool],
    goods: &mut [usize],
    owner: &mut [usize],
) -> bool {
    for good in 0..goods.len() {
        if visited[good] || !tight(agent, good) {
            continue;
        }
        if good == target {
            goods[agent] = good;
            owner[good] = agent;
            return true;
        }
        visited[good] = true;
        if reroute(owner[good], target, tight, visited, goods, owner) {
            goods[agent] = good;
            owner[good] = agent;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> ValuationMatrix {
        ValuationMatrix::new(rows.iter().map(|row| row.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_swap_order() {
        let mut seen = Vec::new();
        permute(&mut [0, 1, 2], 0, &mut |goods| seen.push(goods.to_vec()));
        assert_eq!(
            seen,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 1, 0],
                vec![2, 0, 1],
            ]
        );
    }

    #[test]
    fn test_first_optimum_wins() {
        // Every permutation has welfare 3000
        let identical = matrix(&[
            &[1200.0, 1000.0, 800.0],
            &[1200.0, 1000.0, 800.0],
            &[1200.0, 1000.0, 800.0],
        ]);
        assert_eq!(enumerate(&identical).as_slice(), &[0, 1, 2]);

        // [2,1,0] and [2,0,1] tie; [2,1,0] is enumerated first
        let tail_tie = matrix(&[&[0.0, 0.0, 1.0], &[1.0, 1.0, 0.0], &[1.0, 1.0, 0.0]]);
        assert_eq!(enumerate(&tail_tie).as_slice(), &[2, 1, 0]);
        assert_eq!(hungarian(&tail_tie).as_slice(), &[2, 0, 1]);
    }

    #[test]
    fn test_hungarian_lexicographic() {
        let zeros = ValuationMatrix::new(vec![vec![0.0; 5]; 5]).unwrap();
        assert_eq!(hungarian(&zeros).as_slice(), &[0, 1, 2, 3, 4]);

        // Agents 0 and 1 are interchangeable on goods 0 and 1
        let pair = matrix(&[
            &[5.0, 5.0, 0.0, 0.0],
            &[5.0, 5.0, 0.0, 0.0],
            &[0.0, 0.0, 9.0, 1.0],
            &[0.0, 0.0, 1.0, 9.0],
        ]);
        assert_eq!(hungarian(&pair).as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_hungarian_matches_enumeration() {
        // A deterministic, irregular 7x7 matrix
        let rows = (0..7)
            .map(|i| {
                (0..7)
                    .map(|j| ((i * 37 + j * 91 + i * j * 13) % 101) as f64 * 10.0)
                    .collect()
            })
            .collect();
        let valuations = ValuationMatrix::new(rows).unwrap();
        let exhaustive = enumerate(&valuations);
        let fast = hungarian(&valuations);
        assert_eq!(valuations.welfare(&exhaustive), valuations.welfare(&fast));
    }

    #[test]
    fn test_large_problem_dispatch() {
        // Agent i values good (i + 3) mod 10 the most
        let rows = (0..10)
            .map(|i| {
                (0..10)
                    .map(|j| if j == (i + 3) % 10 { 100.0 } else { 10.0 })
                    .collect()
            })
            .collect();
        let valuations = ValuationMatrix::new(rows).unwrap();
        let assignment = welfare_maximizing(&valuations);
        assert_eq!(valuations.welfare(&assignment), 1000.0);
        assert_eq!(assignment.good_of(0), 3);
        assert_eq!(assignment.good_of(9), 2);
    }
}
