#![allow(unused_macros)]
use rstest_reuse::template;

// This creates a testing "template" to run every property check against each
// division scenario, including the ones that fall back to proportional prices

#[template]
#[rstest]
#[case::distinct(
    vec![
        vec![1500.0, 1000.0, 800.0],
        vec![900.0, 1400.0, 1000.0],
        vec![800.0, 900.0, 1300.0],
    ],
    3000.0
)]
#[case::all_want_first(
    vec![
        vec![2000.0, 1000.0, 800.0],
        vec![1800.0, 1100.0, 900.0],
        vec![1600.0, 1000.0, 1000.0],
    ],
    3000.0
)]
#[case::identical(vec![vec![1200.0, 1000.0, 800.0]; 3], 3000.0)]
#[case::westline(
    vec![
        vec![4000.0, 2500.0, 2200.0],
        vec![3800.0, 3000.0, 2000.0],
        vec![3500.0, 2800.0, 2500.0],
    ],
    8150.0
)]
#[case::high_surplus(
    vec![
        vec![5000.0, 3000.0, 2000.0],
        vec![4000.0, 4500.0, 2500.0],
        vec![3500.0, 3000.0, 4000.0],
    ],
    3000.0
)]
#[case::reversed(
    vec![
        vec![1500.0, 1000.0, 500.0],
        vec![500.0, 1500.0, 1000.0],
        vec![1000.0, 500.0, 1500.0],
    ],
    3000.0
)]
#[case::budget_exceeds_valuations(
    vec![
        vec![1500.0, 1000.0, 800.0],
        vec![900.0, 1400.0, 1000.0],
        vec![800.0, 900.0, 1300.0],
    ],
    30000.0
)]
#[case::odd_cents(
    vec![
        vec![1234.56, 987.65, 432.1],
        vec![1111.11, 999.99, 555.55],
        vec![1000.0, 1000.0, 1000.0],
    ],
    2345.67
)]
#[case::zeros(vec![vec![0.0; 3]; 3], 90.0)]
#[case::single(vec![vec![700.0]], 500.0)]
#[case::infeasible(vec![vec![1000.0, 0.0], vec![1000.0, 0.0]], 100.0)]
#[case::four_agents(
    vec![
        vec![900.0, 700.0, 400.0, 100.0],
        vec![800.0, 800.0, 300.0, 200.0],
        vec![500.0, 600.0, 700.0, 300.0],
        vec![200.0, 300.0, 500.0, 600.0],
    ],
    2000.0
)]
#[case::large(
    (0..10)
        .map(|i| (0..10).map(|j| if j == (i + 3) % 10 { 100.0 } else { 10.0 }).collect())
        .collect(),
    500.0
)]
pub fn all_scenarios(#[case] rows: Vec<Vec<f64>>, #[case] budget: f64) {}
