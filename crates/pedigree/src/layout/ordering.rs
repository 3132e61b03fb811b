//! Reordering of children by spouse.

use log::debug;

use pedigree_core::{
    identifier::Id,
    individual::Individual,
    store::RelationalStore,
};

/// Returns a copy of `store` where every individual with spouses lists its
/// children grouped by the spouse they were had with.
///
/// Children whose other parent is not one of the individual's spouses come
/// first. This includes children missing from the store and children with a
/// single recorded parent. Then come the children of each spouse, in
/// spouse-list order. Relative order inside each group is preserved, so
/// applying the pass twice gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// # use pedigree::layout::reorder_children;
/// # use pedigree_core::{identifier::Id, individual::{Individual, Parents}, store::RelationalStore};
/// let (f, m1, m2) = (Id::new("f"), Id::new("m1"), Id::new("m2"));
/// let store: RelationalStore = [
///     Individual::new(f, "F").with_spouses([m1, m2]).with_children([Id::new("b"), Id::new("a")]),
///     Individual::new(Id::new("a"), "A").with_parents(Parents::couple(f, m1)),
///     Individual::new(Id::new("b"), "B").with_parents(Parents::couple(f, m2)),
/// ]
/// .into_iter()
/// .collect();
///
/// let reordered = reorder_children(&store);
/// assert_eq!(reordered.get(f).unwrap().children(), &[Id::new("a"), Id::new("b")]);
/// ```
pub fn reorder_children(store: &RelationalStore) -> RelationalStore {
    let mut reordered = store.clone();
    let mut changed = 0usize;

    for individual in reordered.iter_mut() {
        if individual.spouses().is_empty() {
            continue;
        }
        let children = children_by_spouse(individual, store);
        if children != individual.children() {
            changed += 1;
            individual.set_children(children);
        }
    }

    debug!(reordered = changed; "Children reordered by spouse");
    reordered
}

fn children_by_spouse(individual: &Individual, store: &RelationalStore) -> Vec<Id> {
    let id = individual.id();
    let spouse_slot = |child: Id| {
        store
            .get(child)
            .and_then(|child| child.parents().other_than(id))
            .and_then(|other| individual.spouses().iter().position(|&s| s == other))
    };

    let mut keyed: Vec<(Option<usize>, Id)> = individual
        .children()
        .iter()
        .map(|&child| (spouse_slot(child), child))
        .collect();
    // Stable, and `None` orders before every `Some`.
    keyed.sort_by_key(|(slot, _)| *slot);
    keyed.into_iter().map(|(_, child)| child).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::individual::Parents;

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    fn two_marriages() -> RelationalStore {
        [
            Individual::new(id("f"), "F")
                .with_spouses([id("m1"), id("m2")])
                .with_children([id("b2"), id("a1"), id("x"), id("b1"), id("ghost"), id("a2")]),
            Individual::new(id("m1"), "M1").as_spouse(),
            Individual::new(id("m2"), "M2").as_spouse(),
            Individual::new(id("a1"), "A1").with_parents(Parents::couple(id("f"), id("m1"))),
            Individual::new(id("a2"), "A2").with_parents(Parents::couple(id("f"), id("m1"))),
            Individual::new(id("b1"), "B1").with_parents(Parents::couple(id("f"), id("m2"))),
            Individual::new(id("b2"), "B2").with_parents(Parents::couple(id("f"), id("m2"))),
            Individual::new(id("x"), "X").with_parents(Parents::new(Some(id("f")), None)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_children_grouped_by_spouse() {
        let store = two_marriages();
        let reordered = reorder_children(&store);

        assert_eq!(
            reordered.get(id("f")).unwrap().children(),
            &[id("x"), id("ghost"), id("a1"), id("a2"), id("b2"), id("b1")]
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let store = two_marriages();
        let before = store.clone();
        let _ = reorder_children(&store);
        assert_eq!(store, before);
    }

    #[test]
    fn test_reordering_is_idempotent() {
        let once = reorder_children(&two_marriages());
        let twice = reorder_children(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_mother_side_uses_father_as_other_parent() {
        let store: RelationalStore = [
            Individual::new(id("m"), "M")
                .with_spouses([id("f1"), id("f2")])
                .with_children([id("k2"), id("k1")]),
            Individual::new(id("k1"), "K1").with_parents(Parents::couple(id("f1"), id("m"))),
            Individual::new(id("k2"), "K2").with_parents(Parents::couple(id("f2"), id("m"))),
        ]
        .into_iter()
        .collect();

        let reordered = reorder_children(&store);
        assert_eq!(reordered.get(id("m")).unwrap().children(), &[id("k1"), id("k2")]);
    }

    #[test]
    fn test_individual_without_spouses_is_untouched() {
        let store: RelationalStore = [
            Individual::new(id("p"), "P").with_children([id("z"), id("y")]),
            Individual::new(id("y"), "Y").with_parents(Parents::new(Some(id("p")), None)),
            Individual::new(id("z"), "Z").with_parents(Parents::new(Some(id("p")), None)),
        ]
        .into_iter()
        .collect();

        let reordered = reorder_children(&store);
        assert_eq!(reordered.get(id("p")).unwrap().children(), &[id("z"), id("y")]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use pedigree_core::individual::Parents;
    use proptest::prelude::*;

    /// One father with up to three spouses and children whose mother slot is
    /// a spouse index, or `None` for an unknown mother.
    fn family_strategy() -> impl Strategy<Value = RelationalStore> {
        (1usize..=3, prop::collection::vec(prop::option::of(0usize..3), 0..12)).prop_map(
            |(spouse_count, mothers)| {
                let father = Id::new("pf");
                let spouses: Vec<Id> = (0..spouse_count)
                    .map(|i| Id::new(&format!("pm{i}")))
                    .collect();
                let children: Vec<Id> = (0..mothers.len())
                    .map(|i| Id::new(&format!("pc{i}")))
                    .collect();

                let mut individuals = vec![Individual::new(father, "F")
                    .with_spouses(spouses.clone())
                    .with_children(children.clone())];
                for spouse in &spouses {
                    individuals.push(Individual::new(*spouse, "M").as_spouse());
                }
                for (child, mother) in children.iter().zip(&mothers) {
                    let mother = mother.and_then(|idx| spouses.get(idx).copied());
                    individuals.push(
                        Individual::new(*child, "C").with_parents(Parents::new(Some(father), mother)),
                    );
                }
                individuals.into_iter().collect()
            },
        )
    }

    proptest! {
        #[test]
        fn children_follow_spouse_order(store in family_strategy()) {
            let reordered = reorder_children(&store);
            let father = reordered.get(Id::new("pf")).unwrap();

            let slots: Vec<Option<usize>> = father
                .children()
                .iter()
                .map(|&child| {
                    reordered
                        .get(child)
                        .and_then(|c| c.parents().mother())
                        .and_then(|m| father.spouses().iter().position(|&s| s == m))
                })
                .collect();
            prop_assert!(slots.windows(2).all(|w| w[0] <= w[1]));

            let mut before = store.get(Id::new("pf")).unwrap().children().to_vec();
            let mut after = father.children().to_vec();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn reordering_is_idempotent(store in family_strategy()) {
            let once = reorder_children(&store);
            prop_assert_eq!(reorder_children(&once), once);
        }
    }
}
