//! Pure item/group mutations.
//!
//! Every function takes a category state and returns a new one with the
//! membership invariants re-established: ids are unique across items and
//! groups, members reference existing items, and members follow item order.
//! Calls that reference missing entities or collide with existing ids are
//! caller bugs; they are logged and the input is returned unchanged.

use tracing::{debug, warn};

use crate::entity::{CategoryState, Group, Item};

/// How an update treats the membership it touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MembershipUpdate {
    #[default]
    Keep,
    Replace(Vec<String>),
}

impl MembershipUpdate {
    pub fn replace<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::Replace(ids.into_iter().map(Into::into).collect())
    }

    pub fn clear() -> Self {
        Self::Replace(Vec::new())
    }
}

fn resort_members(mut state: CategoryState) -> CategoryState {
    let groups = std::mem::take(&mut state.groups);
    state.groups = groups
        .into_iter()
        .map(|mut g| {
            g.members = state.order_members(&g.members);
            g
        })
        .collect();
    state
}

pub fn add_item(
    state: &CategoryState,
    id: &str,
    group_ids: &[String],
    description: &str,
) -> CategoryState {
    if id.is_empty() || state.contains_id(id) {
        warn!(id, "add_item called with an empty or taken id");
        return state.clone();
    }
    let mut next = state.clone();
    next.items.push(Item::new(id, description));
    for group in next.groups.iter_mut() {
        if group_ids.iter().any(|g| *g == group.id) && !group.has_member(id) {
            group.members.push(id.to_string());
        }
    }
    debug!(id, groups = group_ids.len(), "item added");
    resort_members(next)
}

pub fn add_group(
    state: &CategoryState,
    id: &str,
    member_ids: &[String],
    description: &str,
) -> CategoryState {
    if id.is_empty() || state.contains_id(id) {
        warn!(id, "add_group called with an empty or taken id");
        return state.clone();
    }
    let mut next = state.clone();
    let members = next.order_members(member_ids);
    next.groups.push(Group::new(id, members, description));
    debug!(id, "group added");
    next
}

pub fn update_item(
    state: &CategoryState,
    old_id: &str,
    new_id: &str,
    groups: MembershipUpdate,
    description: Option<&str>,
) -> CategoryState {
    if state.find_item(old_id).is_none() {
        warn!(id = old_id, "update_item target does not exist");
        return state.clone();
    }
    if new_id.is_empty() || (new_id != old_id && state.contains_id(new_id)) {
        warn!(old_id, new_id, "update_item called with an empty or taken id");
        return state.clone();
    }

    let mut next = state.clone();
    for item in next.items.iter_mut().filter(|i| i.id == old_id) {
        item.id = new_id.to_string();
        if let Some(description) = description {
            item.description = description.to_string();
        }
    }
    for group in next.groups.iter_mut() {
        let was_member = group.has_member(old_id);
        group.members.retain(|m| m != old_id);
        let member = match &groups {
            MembershipUpdate::Keep => was_member,
            MembershipUpdate::Replace(ids) => ids.iter().any(|g| *g == group.id),
        };
        if member {
            group.members.push(new_id.to_string());
        }
    }
    debug!(old_id, new_id, "item updated");
    resort_members(next)
}

pub fn update_group(
    state: &CategoryState,
    old_id: &str,
    new_id: &str,
    members: MembershipUpdate,
    description: Option<&str>,
) -> CategoryState {
    if state.find_group(old_id).is_none() {
        warn!(id = old_id, "update_group target does not exist");
        return state.clone();
    }
    if new_id.is_empty() || (new_id != old_id && state.contains_id(new_id)) {
        warn!(old_id, new_id, "update_group called with an empty or taken id");
        return state.clone();
    }

    let mut next = state.clone();
    let ordered = match &members {
        MembershipUpdate::Keep => None,
        MembershipUpdate::Replace(ids) => Some(state.order_members(ids)),
    };
    for group in next.groups.iter_mut().filter(|g| g.id == old_id) {
        group.id = new_id.to_string();
        if let Some(ordered) = &ordered {
            group.members = ordered.clone();
        }
        if let Some(description) = description {
            group.description = description.to_string();
        }
    }
    debug!(old_id, new_id, "group updated");
    next
}

pub fn delete_item(state: &CategoryState, id: &str) -> CategoryState {
    if state.find_item(id).is_none() {
        warn!(id, "delete_item target does not exist");
        return state.clone();
    }
    let mut next = state.clone();
    next.items.retain(|i| i.id != id);
    for group in next.groups.iter_mut() {
        group.members.retain(|m| m != id);
    }
    debug!(id, "item deleted");
    next
}

pub fn delete_group(state: &CategoryState, id: &str) -> CategoryState {
    if state.find_group(id).is_none() {
        warn!(id, "delete_group target does not exist");
        return state.clone();
    }
    let mut next = state.clone();
    next.groups.retain(|g| g.id != id);
    debug!(id, "group deleted");
    next
}

pub fn remove_item_from_group(state: &CategoryState, item_id: &str, group_id: &str) -> CategoryState {
    if state.find_group(group_id).is_none() {
        warn!(item_id, group_id, "remove_item_from_group: group does not exist");
        return state.clone();
    }
    let mut next = state.clone();
    for group in next.groups.iter_mut().filter(|g| g.id == group_id) {
        group.members.retain(|m| m != item_id);
    }
    next
}

/// Replaces the item order. `new_order` must be a permutation of the current item ids.
pub fn reorder_items<S: AsRef<str>>(state: &CategoryState, new_order: &[S]) -> CategoryState {
    let mut current: Vec<&str> = state.item_ids();
    let mut proposed: Vec<&str> = new_order.iter().map(|id| id.as_ref()).collect();
    current.sort_unstable();
    proposed.sort_unstable();
    if current != proposed {
        warn!(
            expected = state.items.len(),
            got = new_order.len(),
            "reorder_items called with a list that is not a permutation of the items"
        );
        return state.clone();
    }

    let mut next = state.clone();
    next.items = new_order
        .iter()
        .filter_map(|id| state.find_item(id.as_ref()).cloned())
        .collect();
    resort_members(next)
}

/// Replaces the group collection, e.g. after a drag reorder.
///
/// Members are re-filtered against the items; a list with repeated or
/// colliding ids is rejected.
pub fn update_groups(state: &CategoryState, new_groups: Vec<Group>) -> CategoryState {
    for (i, group) in new_groups.iter().enumerate() {
        let repeated = new_groups[..i].iter().any(|g| g.id == group.id);
        if group.id.is_empty() || repeated || state.find_item(&group.id).is_some() {
            warn!(id = %group.id, "update_groups called with an empty or colliding group id");
            return state.clone();
        }
    }
    let next = CategoryState {
        items: state.items.clone(),
        groups: new_groups,
    };
    resort_members(next)
}
