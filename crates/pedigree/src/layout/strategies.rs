//! Shared proptest strategies for the layout passes.

use pedigree_core::{
    identifier::Id,
    individual::{Individual, Parents},
    store::RelationalStore,
};
use proptest::{prelude::*, sample::Index};

/// Random forest: every individual after the first may pick up to two
/// earlier individuals as parents, and may marry in a new partner.
fn forest_strategy() -> impl Strategy<Value = RelationalStore> {
    prop::collection::vec(
        (
            prop::option::of(any::<Index>()),
            prop::option::of(any::<Index>()),
            any::<bool>(),
        ),
        1..16,
    )
    .prop_map(|specs| {
        let ids: Vec<Id> = (0..specs.len()).map(|i| Id::new(&format!("q{i}"))).collect();
        let mut store: RelationalStore = ids
            .iter()
            .map(|&id| Individual::new(id, id.to_string()))
            .collect();

        for (i, (father, mother, married)) in specs.into_iter().enumerate() {
            let child = ids[i];
            if i > 0 {
                let father = father.map(|idx| ids[idx.index(i)]);
                let mother = mother
                    .map(|idx| ids[idx.index(i)])
                    .filter(|&m| Some(m) != father);
                if father.is_some() || mother.is_some() {
                    if let Some(record) = store.get_mut(child) {
                        record.set_parents(Parents::new(father, mother));
                    }
                    for parent in father.into_iter().chain(mother) {
                        if let Some(record) = store.get_mut(parent) {
                            record.push_child(child);
                        }
                    }
                }
            }
            if married {
                let spouse = Id::new(&format!("q{i}s"));
                store.insert(Individual::new(spouse, "Spouse").as_spouse());
                if let Some(record) = store.get_mut(child) {
                    record.push_spouse(spouse);
                }
            }
        }
        store
    })
}

/// Random pedigree rooted at `q0` with the irregular data real snapshots
/// carry.
///
/// On top of the forest: children of couples (sometimes listed by one
/// partner only), flagged spouses with a parent of their own, explicit
/// siblings, a consanguineous couple, dangling children and siblings, and a
/// link from a descendant back to the root. No child ever has more than two
/// parents and nobody is related to itself.
pub(crate) fn pedigree_strategy() -> impl Strategy<Value = RelationalStore> {
    (
        forest_strategy(),
        prop::collection::vec((any::<Index>(), 1..3usize, any::<bool>()), 0..4),
        prop::collection::vec((any::<Index>(), any::<Index>(), any::<bool>()), 0..3),
        prop::collection::vec((any::<Index>(), any::<Index>()), 0..4),
        any::<bool>(),
        prop::collection::vec(any::<Index>(), 0..3),
        prop::option::of(any::<Index>()),
    )
        .prop_map(
            |(mut store, couple_children, in_laws, siblings, consanguine, dangling, back_link)| {
                let lineage: Vec<Id> = store
                    .iter()
                    .filter(|individual| !individual.is_spouse())
                    .map(Individual::id)
                    .collect();
                let couples: Vec<(Id, Id)> = store
                    .iter()
                    .filter_map(|individual| {
                        individual
                            .spouses()
                            .first()
                            .map(|&spouse| (individual.id(), spouse))
                    })
                    .collect();

                if !couples.is_empty() {
                    for (n, (pick, count, both_list)) in couple_children.into_iter().enumerate() {
                        let (parent, spouse) = couples[pick.index(couples.len())];
                        for k in 0..count {
                            let child = Id::new(&format!("{parent}k{n}_{k}"));
                            store.insert(
                                Individual::new(child, "Child")
                                    .with_parents(Parents::couple(parent, spouse)),
                            );
                            push_child(&mut store, parent, child);
                            if both_list {
                                push_child(&mut store, spouse, child);
                            }
                        }
                    }
                }

                let partners: Vec<Id> = store
                    .iter()
                    .filter(|individual| individual.is_married_in())
                    .map(Individual::id)
                    .collect();
                if !partners.is_empty() {
                    for (spouse, parent, listed) in in_laws {
                        let spouse = partners[spouse.index(partners.len())];
                        let parent = lineage[parent.index(lineage.len())];
                        if store.get(spouse).is_some_and(Individual::is_top_level) {
                            if let Some(record) = store.get_mut(spouse) {
                                record.set_parents(Parents::new(Some(parent), None));
                            }
                            if listed {
                                push_child(&mut store, parent, spouse);
                            }
                        }
                    }
                }

                for (a, b) in siblings {
                    let a = lineage[a.index(lineage.len())];
                    let b = lineage[b.index(lineage.len())];
                    if a != b {
                        push_sibling(&mut store, a, b);
                    }
                }

                if consanguine {
                    if let Some(&(partner, spouse)) = couples.first() {
                        update(&mut store, partner, |individual| {
                            individual.with_consanguine([spouse])
                        });
                    }
                }

                for (n, pick) in dangling.into_iter().enumerate() {
                    let owner = lineage[pick.index(lineage.len())];
                    let ghost = Id::new(&format!("ghost{n}"));
                    if n % 2 == 0 {
                        push_child(&mut store, owner, ghost);
                    } else {
                        push_sibling(&mut store, owner, ghost);
                    }
                }

                if let Some(pick) = back_link {
                    if lineage.len() > 1 {
                        let descendant = lineage[1 + pick.index(lineage.len() - 1)];
                        push_child(&mut store, descendant, lineage[0]);
                    }
                }

                store
            },
        )
}

fn push_child(store: &mut RelationalStore, parent: Id, child: Id) {
    if let Some(record) = store.get_mut(parent) {
        record.push_child(child);
    }
}

fn push_sibling(store: &mut RelationalStore, id: Id, sibling: Id) {
    update(store, id, |individual| {
        let mut siblings = individual.siblings().to_vec();
        if !siblings.contains(&sibling) {
            siblings.push(sibling);
        }
        individual.with_siblings(siblings)
    });
}

fn update(store: &mut RelationalStore, id: Id, edit: impl FnOnce(Individual) -> Individual) {
    if let Some(individual) = store.get(id).cloned() {
        store.insert(edit(individual));
    }
}
