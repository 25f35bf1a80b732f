use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use self_typed::lazy::{Lazy, LazyCollection, LazyValue};
use self_typed_common::{PersistentCollection, PersistentList, PersistentSequence};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy)]
enum Step {
    Add(i64),
    Mul(i64),
    Neg,
}

impl Step {
    fn apply(self, x: i64) -> i64 {
        match self {
            Step::Add(n) => x.wrapping_add(n),
            Step::Mul(n) => x.wrapping_mul(n),
            Step::Neg => x.wrapping_neg(),
        }
    }
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<i64>().prop_map(Step::Add),
        (-4i64..4).prop_map(Step::Mul),
        Just(Step::Neg),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        // Do not write `.proptest-regressions` files into the repo.
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn then_chain_matches_eager_fold(seed in any::<i64>(), steps in prop::collection::vec(arb_step(), 0..16)) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let source = LazyValue::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            seed
        });

        let chained = steps
            .iter()
            .fold(source.clone(), |lazy, &step| lazy.then(move |x| step.apply(*x)));
        prop_assert_eq!(runs.load(Ordering::SeqCst), 0);

        let expected = steps.iter().fold(seed, |x, &step| step.apply(x));
        prop_assert_eq!(*chained.compute(), expected);
        prop_assert_eq!(*chained.compute(), expected);
        prop_assert_eq!(*source.compute(), seed);
        prop_assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_collection_matches_eager_list(
        base in prop::collection::vec(any::<i32>(), 0..32),
        more in prop::collection::vec(any::<i32>(), 0..32),
        from in 0usize..70,
        width in 1usize..70,
    ) {
        let eager = PersistentList::from_values(base.clone()).add_all(more.clone());
        let seed = base.clone();
        let lazy = LazyCollection::new(move || PersistentList::from_values(seed)).add_all(more);

        prop_assert_eq!(lazy.compute(), &eager);
        prop_assert_eq!(lazy.len(), eager.len());

        let (from, to) = (from as isize, (from + width) as isize);
        let lazy_sub = lazy.sublist(from, to).unwrap();
        prop_assert_eq!(lazy_sub.compute(), &eager.sublist(from, to).unwrap());
    }
}
