use rand::SeedableRng as _;

use super::*;

fn assert_permutation<C: core::fmt::Debug>(before: &[C], after: &[C]) {
    let mut a: Vec<String> = before.iter().map(|c| format!("{c:?}")).collect();
    let mut b: Vec<String> = after.iter().map(|c| format!("{c:?}")).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn table_sizes() {
    assert_eq!(linear_forward_table().len(), 20);
    assert_eq!(linear_backward_table().len(), 4);
    assert_eq!(rotation_table().len(), 12);
    assert_eq!(triangle_table(TriangleVariant::Standard).len(), 24);
    assert_eq!(triangle_table(TriangleVariant::Extended).len(), 48);
}

#[test]
fn standard_triangle_has_fixed_first_leg() {
    assert!(triangle_table(TriangleVariant::Standard)
        .iter()
        .all(|c| c.leg1 == 8.0));

    let extended = triangle_table(TriangleVariant::Extended);
    assert_eq!(extended.iter().filter(|c| c.leg1 == 4.0).count(), 24);
    assert_eq!(extended.iter().filter(|c| c.leg2 == 4.0).count(), 24);
}

#[test]
fn legacy_swap_preserves_rows() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let base = linear_forward_table();
        let set = ConditionSet::shuffled(base.clone(), ShufflePolicy::LegacySwap, &mut rng);
        assert_permutation(&base, set.as_slice());
    }
}

#[test]
fn uniform_shuffle_preserves_rows() {
    let mut rng = StdRng::seed_from_u64(99);
    let base = triangle_table(TriangleVariant::Extended);
    let set = ConditionSet::shuffled(base.clone(), ShufflePolicy::Uniform, &mut rng);
    assert_permutation(&base, set.as_slice());
}

#[test]
fn same_seed_gives_same_order() {
    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);
    let first = ConditionSet::shuffled(rotation_table(), ShufflePolicy::LegacySwap, &mut a);
    let second = ConditionSet::shuffled(rotation_table(), ShufflePolicy::LegacySwap, &mut b);
    assert_eq!(first, second);
}

#[test]
fn get_is_bounded() {
    let set = ConditionSet::fixed(linear_backward_table());
    assert_eq!(set.len(), 4);
    assert!(set.get(3).is_some());
    assert!(set.get(4).is_none());
}
