use proptest::prelude::*;
use shiftplan_core::mutation::{self, MembershipUpdate};
use shiftplan_core::{CategoryState, Group};

const IDS: [&str; 6] = ["A", "B", "C", "D", "G", "H"];

#[derive(Debug, Clone)]
enum Op {
    AddItem(&'static str, Vec<&'static str>),
    AddGroup(&'static str, Vec<&'static str>),
    UpdateItem(&'static str, &'static str, Option<Vec<&'static str>>),
    UpdateGroup(&'static str, &'static str, Option<Vec<&'static str>>),
    DeleteItem(&'static str),
    DeleteGroup(&'static str),
    RemoveFromGroup(&'static str, &'static str),
    Reverse,
    RotateGroups,
}

fn id() -> impl Strategy<Value = &'static str> {
    prop::sample::select(IDS.to_vec())
}

fn ids() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(id(), 0..4)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (id(), ids()).prop_map(|(i, g)| Op::AddItem(i, g)),
        (id(), ids()).prop_map(|(i, m)| Op::AddGroup(i, m)),
        (id(), id(), prop::option::of(ids())).prop_map(|(a, b, g)| Op::UpdateItem(a, b, g)),
        (id(), id(), prop::option::of(ids())).prop_map(|(a, b, m)| Op::UpdateGroup(a, b, m)),
        id().prop_map(Op::DeleteItem),
        id().prop_map(Op::DeleteGroup),
        (id(), id()).prop_map(|(i, g)| Op::RemoveFromGroup(i, g)),
        Just(Op::Reverse),
        Just(Op::RotateGroups),
    ]
}

fn owned(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn update(v: &Option<Vec<&str>>) -> MembershipUpdate {
    match v {
        Some(ids) => MembershipUpdate::Replace(owned(ids)),
        None => MembershipUpdate::Keep,
    }
}

fn apply(state: &CategoryState, op: &Op) -> CategoryState {
    match op {
        Op::AddItem(id, groups) => mutation::add_item(state, id, &owned(groups), ""),
        Op::AddGroup(id, members) => mutation::add_group(state, id, &owned(members), ""),
        Op::UpdateItem(old, new, groups) => {
            mutation::update_item(state, old, new, update(groups), None)
        }
        Op::UpdateGroup(old, new, members) => {
            mutation::update_group(state, old, new, update(members), Some("edited"))
        }
        Op::DeleteItem(id) => mutation::delete_item(state, id),
        Op::DeleteGroup(id) => mutation::delete_group(state, id),
        Op::RemoveFromGroup(item, group) => mutation::remove_item_from_group(state, item, group),
        Op::Reverse => {
            let mut order: Vec<&str> = state.item_ids();
            order.reverse();
            mutation::reorder_items(state, &order)
        }
        Op::RotateGroups => {
            let mut groups: Vec<Group> = state.groups.clone();
            if !groups.is_empty() {
                groups.rotate_left(1);
            }
            mutation::update_groups(state, groups)
        }
    }
}

proptest! {
    #[test]
    fn prop_mutations_preserve_invariants(ops in prop::collection::vec(op(), 0..60)) {
        let mut state = CategoryState::default();
        for op in &ops {
            state = apply(&state, op);
            if let Err(violation) = state.check_invariants() {
                prop_assert!(false, "after {:?}: {}", op, violation);
            }
        }
    }

    #[test]
    fn prop_delete_item_purges_every_group(ops in prop::collection::vec(op(), 0..40), victim in id()) {
        let mut state = CategoryState::default();
        for op in &ops {
            state = apply(&state, op);
        }
        let after = mutation::delete_item(&state, victim);
        if state.find_item(victim).is_some() {
            prop_assert!(after.find_item(victim).is_none());
            prop_assert!(after.groups.iter().all(|g| !g.has_member(victim)));
            prop_assert_eq!(after.groups.len(), state.groups.len());
        } else {
            prop_assert_eq!(after, state);
        }
    }
}
