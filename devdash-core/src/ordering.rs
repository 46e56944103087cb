//! Dense ordering over projects and groups.
//!
//! Invariant maintained by every function here: after the call, `order`
//! values across the collection form exactly `0..n-1` — no gaps, no
//! duplicates. Entities carrying [`OrderKey::Append`] resolve to the end of
//! the collection, preserving their relative insertion order (the sort is
//! stable).

use std::collections::HashSet;

use crate::types::{Group, GroupId, OrderKey, Project, ProjectId};

/// Sort projects by order and assign dense zero-based indices.
pub fn reindex_projects(projects: &mut [Project]) {
    projects.sort_by_key(|p| p.order);
    for (i, p) in projects.iter_mut().enumerate() {
        p.order = OrderKey::Assigned(i as u64);
    }
}

/// Sort groups by order and assign dense zero-based indices.
pub fn reindex_groups(groups: &mut [Group]) {
    groups.sort_by_key(|g| g.order);
    for (i, g) in groups.iter_mut().enumerate() {
        g.order = OrderKey::Assigned(i as u64);
    }
}

/// Move a project to `to_index` within the view selected by `context`,
/// leaving every project outside the view's membership set exactly where it
/// was relative to the rest.
///
/// The view is the sub-sequence of the globally ordered projects whose
/// membership matches `context` (a group filter, or all projects for
/// `None`). The moved project is spliced to the clamped target position in
/// that sub-sequence; the full ordering is then rebuilt by walking the
/// original global order and substituting view members in their new
/// sequence, slot by slot. A naive "sort the subset, append the rest" would
/// break that interleaving for multi-group projects.
///
/// Returns `false` (collection untouched) if the project does not exist in
/// the view. `to_index` past the end clamps rather than errors.
pub fn reorder_project(
    projects: &mut [Project],
    id: &ProjectId,
    to_index: usize,
    context: Option<&GroupId>,
) -> bool {
    // Global order as indices into `projects`.
    let mut global: Vec<usize> = (0..projects.len()).collect();
    global.sort_by_key(|&i| projects[i].order);

    // The view's sub-sequence of that order.
    let mut subset: Vec<usize> = global
        .iter()
        .copied()
        .filter(|&i| projects[i].in_view(context))
        .collect();

    let Some(current) = subset.iter().position(|&i| projects[i].id == *id) else {
        return false;
    };

    let moved = subset.remove(current);
    let clamped = to_index.min(subset.len());
    subset.insert(clamped, moved);

    // Walk the global order; wherever a slot belonged to the view, consume
    // the next element of the re-ordered subset. Non-members keep their slot.
    let members: HashSet<usize> = subset.iter().copied().collect();
    let mut next = 0usize;
    let merged: Vec<usize> = global
        .into_iter()
        .map(|slot| {
            if members.contains(&slot) {
                let taken = subset[next];
                next += 1;
                taken
            } else {
                slot
            }
        })
        .collect();

    for (position, i) in merged.iter().enumerate() {
        projects[*i].order = OrderKey::Assigned(position as u64);
    }
    projects.sort_by_key(|p| p.order);
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn project(id: &str, groups: &[&str], order: OrderKey) -> Project {
        Project {
            id: ProjectId::from(id),
            name: id.to_string(),
            folder_path: PathBuf::from("/code").join(id),
            url: None,
            group_ids: groups.iter().map(|g| GroupId::from(*g)).collect(),
            order,
            thumbnail_uri: None,
        }
    }

    fn ids_in_order(projects: &[Project]) -> Vec<&str> {
        let mut sorted: Vec<&Project> = projects.iter().collect();
        sorted.sort_by_key(|p| p.order);
        sorted.iter().map(|p| p.id.0.as_str()).collect()
    }

    fn assert_dense(projects: &[Project]) {
        let mut orders: Vec<u64> = projects
            .iter()
            .map(|p| p.order.index().expect("dense state has no Append"))
            .collect();
        orders.sort_unstable();
        let expected: Vec<u64> = (0..projects.len() as u64).collect();
        assert_eq!(orders, expected, "orders must be a dense 0..n permutation");
    }

    #[test]
    fn reindex_resolves_append_to_end_preserving_insertion_order() {
        let mut projects = vec![
            project("a", &[], OrderKey::Assigned(1)),
            project("new1", &[], OrderKey::Append),
            project("b", &[], OrderKey::Assigned(0)),
            project("new2", &[], OrderKey::Append),
        ];
        reindex_projects(&mut projects);
        assert_dense(&projects);
        assert_eq!(ids_in_order(&projects), vec!["b", "a", "new1", "new2"]);
    }

    #[test]
    fn reindex_closes_gaps() {
        let mut projects = vec![
            project("a", &[], OrderKey::Assigned(10)),
            project("b", &[], OrderKey::Assigned(3)),
            project("c", &[], OrderKey::Assigned(7)),
        ];
        reindex_projects(&mut projects);
        assert_dense(&projects);
        assert_eq!(ids_in_order(&projects), vec!["b", "c", "a"]);
    }

    #[test]
    fn reindex_groups_same_invariant() {
        let mut groups = vec![
            Group {
                id: GroupId::from("g2"),
                name: "two".into(),
                order: OrderKey::Append,
            },
            Group {
                id: GroupId::from("g1"),
                name: "one".into(),
                order: OrderKey::Assigned(5),
            },
        ];
        reindex_groups(&mut groups);
        assert_eq!(groups[0].id.0, "g1");
        assert_eq!(groups[0].order, OrderKey::Assigned(0));
        assert_eq!(groups[1].order, OrderKey::Assigned(1));
    }

    /// A(G1), B(—), C(G1) in global order [A, B, C]; moving A after C within
    /// the G1 view gives subset [C, A]. The G1 slots (0 and 2) carry the new
    /// subset sequence while B keeps slot 1: global becomes [C, B, A].
    #[test]
    fn reorder_scoped_to_group_preserves_outsider_slots() {
        let g1 = GroupId::from("g1");
        let mut projects = vec![
            project("a", &["g1"], OrderKey::Assigned(0)),
            project("b", &[], OrderKey::Assigned(1)),
            project("c", &["g1"], OrderKey::Assigned(2)),
        ];
        let changed = reorder_project(&mut projects, &ProjectId::from("a"), 1, Some(&g1));
        assert!(changed);
        assert_dense(&projects);
        assert_eq!(ids_in_order(&projects), vec!["c", "b", "a"]);
    }

    #[test]
    fn reorder_in_all_view_is_plain_move() {
        let mut projects = vec![
            project("a", &[], OrderKey::Assigned(0)),
            project("b", &[], OrderKey::Assigned(1)),
            project("c", &[], OrderKey::Assigned(2)),
        ];
        assert!(reorder_project(
            &mut projects,
            &ProjectId::from("c"),
            0,
            None
        ));
        assert_eq!(ids_in_order(&projects), vec!["c", "a", "b"]);
        assert_dense(&projects);
    }

    #[test]
    fn reorder_clamps_out_of_bounds_index() {
        let mut projects = vec![
            project("a", &[], OrderKey::Assigned(0)),
            project("b", &[], OrderKey::Assigned(1)),
        ];
        assert!(reorder_project(
            &mut projects,
            &ProjectId::from("a"),
            999,
            None
        ));
        assert_eq!(ids_in_order(&projects), vec!["b", "a"]);
    }

    #[test]
    fn reorder_unknown_id_is_a_noop() {
        let mut projects = vec![project("a", &[], OrderKey::Assigned(0))];
        let before = projects.clone();
        assert!(!reorder_project(
            &mut projects,
            &ProjectId::from("ghost"),
            0,
            None
        ));
        assert_eq!(projects, before);
    }

    #[test]
    fn reorder_id_outside_context_is_a_noop() {
        let g1 = GroupId::from("g1");
        let mut projects = vec![
            project("a", &[], OrderKey::Assigned(0)),
            project("b", &["g1"], OrderKey::Assigned(1)),
        ];
        let before = projects.clone();
        assert!(!reorder_project(
            &mut projects,
            &ProjectId::from("a"),
            0,
            Some(&g1)
        ));
        assert_eq!(projects, before);
    }

    /// Multi-group membership: moving within one group's view must not
    /// disturb the interleaving of members seen from another group.
    #[test]
    fn reorder_multi_group_interleaving() {
        let g1 = GroupId::from("g1");
        let mut projects = vec![
            project("a", &["g1", "g2"], OrderKey::Assigned(0)),
            project("b", &["g2"], OrderKey::Assigned(1)),
            project("c", &["g1"], OrderKey::Assigned(2)),
            project("d", &[], OrderKey::Assigned(3)),
            project("e", &["g1"], OrderKey::Assigned(4)),
        ];
        // G1 view is [a, c, e]; move e to the front of it.
        assert!(reorder_project(
            &mut projects,
            &ProjectId::from("e"),
            0,
            Some(&g1)
        ));
        // G1 slots (0, 2, 4) now carry [e, a, c]; b and d are untouched.
        assert_eq!(ids_in_order(&projects), vec!["e", "b", "a", "d", "c"]);
        assert_dense(&projects);
    }
}
