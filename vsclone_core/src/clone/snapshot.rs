use crate::inventory::{ManagedObjectReference, SnapshotInfo};

// Error Handling
use vsclone_error::SnapshotError;

/*
* Linked clone eligibility.
*
* The source must carry a single snapshot with no children,
* and that snapshot must be the current one.
* Clauses are checked in order, the first failing one is reported.
*
* Returns the snapshot the new disks are chained to.
*/
pub fn validate_clone_snapshots<'a>(
    uuid: &str,
    snapshot: Option<&'a SnapshotInfo>,
) -> Result<&'a ManagedObjectReference, SnapshotError> {
    let uuid = uuid.to_owned();
    let snapshot = match snapshot {
        Some(v) => v,
        None => return Err(SnapshotError::Missing { uuid }),
    };
    let root = match snapshot.root_snapshot_list.as_slice() {
        [root] => root,
        list => {
            return Err(SnapshotError::RootCount {
                uuid,
                count: list.len(),
            })
        }
    };
    if !root.child_snapshot_list.is_empty() {
        return Err(SnapshotError::RootHasChildren { uuid });
    }
    match &snapshot.current_snapshot {
        Some(current) if current.value == root.snapshot.value => Ok(current),
        _ => Err(SnapshotError::CurrentMismatch { uuid }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inventory::SnapshotTree;
    use pretty_assertions::assert_eq;
    use vsclone_error::ObjectKind;

    const UUID: &str = "4218d4a1-7b8c-0f6d-8e4c-3b1a2f6c9d10";

    fn reference(value: &str) -> ManagedObjectReference {
        ManagedObjectReference::new(ObjectKind::Snapshot, value)
    }
    fn tree(value: &str, children: Vec<SnapshotTree>) -> SnapshotTree {
        SnapshotTree {
            snapshot: reference(value),
            name: value.to_owned(),
            child_snapshot_list: children,
        }
    }
    fn info(current: Option<&str>, roots: Vec<SnapshotTree>) -> SnapshotInfo {
        SnapshotInfo {
            current_snapshot: current.map(reference),
            root_snapshot_list: roots,
        }
    }

    #[test]
    fn eligible_single_snapshot() {
        let snapshot = info(Some("snapshot-1"), vec![tree("snapshot-1", vec![])]);
        let res = validate_clone_snapshots(UUID, Some(&snapshot));
        assert_eq!(res, Ok(&reference("snapshot-1")));
    }

    #[test]
    fn every_clause_is_reported() {
        let cases: Vec<(Option<SnapshotInfo>, SnapshotError)> = vec![
            (
                None,
                SnapshotError::Missing {
                    uuid: UUID.to_owned(),
                },
            ),
            (
                Some(info(None, vec![])),
                SnapshotError::RootCount {
                    uuid: UUID.to_owned(),
                    count: 0,
                },
            ),
            (
                Some(info(
                    Some("snapshot-1"),
                    vec![tree("snapshot-1", vec![]), tree("snapshot-2", vec![])],
                )),
                SnapshotError::RootCount {
                    uuid: UUID.to_owned(),
                    count: 2,
                },
            ),
            (
                Some(info(
                    Some("snapshot-2"),
                    vec![tree("snapshot-1", vec![tree("snapshot-2", vec![])])],
                )),
                SnapshotError::RootHasChildren {
                    uuid: UUID.to_owned(),
                },
            ),
            (
                Some(info(Some("snapshot-9"), vec![tree("snapshot-1", vec![])])),
                SnapshotError::CurrentMismatch {
                    uuid: UUID.to_owned(),
                },
            ),
            (
                Some(info(None, vec![tree("snapshot-1", vec![])])),
                SnapshotError::CurrentMismatch {
                    uuid: UUID.to_owned(),
                },
            ),
        ];
        for (snapshot, expected) in cases {
            let res = validate_clone_snapshots(UUID, snapshot.as_ref());
            assert_eq!(res, Err(expected));
        }
    }

    #[test]
    fn clause_combinations() {
        // (several roots, root has children, current is not the root)
        let flags = [false, true];
        let root = reference("snapshot-1");
        for many_roots in flags {
            for children in flags {
                for mismatch in flags {
                    let children = match children {
                        true => vec![tree("snapshot-3", vec![])],
                        false => vec![],
                    };
                    let mut roots = vec![tree("snapshot-1", children.clone())];
                    if many_roots {
                        roots.push(tree("snapshot-2", vec![]));
                    }
                    let current = match mismatch {
                        true => "snapshot-9",
                        false => "snapshot-1",
                    };
                    let snapshot = info(Some(current), roots);
                    let res = validate_clone_snapshots(UUID, Some(&snapshot));

                    let uuid = UUID.to_owned();
                    let expected = if many_roots {
                        Err(SnapshotError::RootCount { uuid, count: 2 })
                    } else if !children.is_empty() {
                        Err(SnapshotError::RootHasChildren { uuid })
                    } else if mismatch {
                        Err(SnapshotError::CurrentMismatch { uuid })
                    } else {
                        Ok(&root)
                    };
                    assert_eq!(res, expected);
                }
            }
        }
    }

    #[test]
    fn first_failing_clause_wins() {
        // Two roots, one with children, neither current.
        let snapshot = info(
            Some("snapshot-9"),
            vec![
                tree("snapshot-1", vec![tree("snapshot-3", vec![])]),
                tree("snapshot-2", vec![]),
            ],
        );
        let err = validate_clone_snapshots(UUID, Some(&snapshot)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("virtual machine or template {UUID} must have exactly one root snapshot (has: 2)")
        );
    }
}
