use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::duplicate::DuplicateSet;

/// A connected component of reports related by transitively shared
/// duplicate photos. Members are sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportGroup {
    pub members: Vec<String>,
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, node: usize) -> usize {
        if self.parent[node] != node {
            let root = self.find(self.parent[node]);
            self.parent[node] = root;
        }
        self.parent[node]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}

/// Cluster report names into connected components linked by shared
/// duplicate photos. Every pair of distinct names co-occurring in a
/// duplicate set gets an edge; grouping is transitive, so A-B plus B-C
/// places all three reports together even when A and C share nothing
/// directly. The node set is restricted to reports that appear in at
/// least one set, so a report whose only duplicate is internal still
/// forms a singleton group, and reports with no duplicates appear in no
/// group at all.
///
/// Groups are ordered by their lexicographically smallest member, which
/// makes the output independent of set iteration order.
pub fn cluster_reports(sets: &[DuplicateSet]) -> Vec<ReportGroup> {
    let names: BTreeSet<&str> = sets
        .iter()
        .flat_map(|set| set.records.iter().map(|r| r.source.as_str()))
        .collect();
    let index: BTreeMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    let mut union_find = UnionFind::new(index.len());
    for set in sets {
        let mut members = set.records.iter().map(|r| index[r.source.as_str()]);
        if let Some(first) = members.next() {
            for other in members {
                union_find.union(first, other);
            }
        }
    }

    // names iterate in sorted order, so each component's member list
    // comes out sorted as well.
    let mut components: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (i, name) in names.iter().enumerate() {
        components
            .entry(union_find.find(i))
            .or_default()
            .push((*name).to_string());
    }

    let mut groups: Vec<ReportGroup> = components
        .into_values()
        .map(|members| ReportGroup { members })
        .collect();
    groups.sort_by(|a, b| a.members[0].cmp(&b.members[0]));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::duplicate::group_duplicates;
    use crate::core::testutil::record;

    fn sets_from(records: Vec<crate::core::store::PhotoRecord>) -> Vec<DuplicateSet> {
        group_duplicates(&records)
    }

    #[test]
    fn no_sets_means_no_groups() {
        assert!(cluster_reports(&[]).is_empty());
    }

    #[test]
    fn shared_photo_links_two_reports() {
        let sets = sets_from(vec![
            record("a.pdf", 0, b"shared"),
            record("b.pdf", 4, b"shared"),
        ]);

        let groups = cluster_reports(&sets);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn grouping_is_transitive() {
        // A shares with B, B shares with C; A and C share nothing directly.
        let sets = sets_from(vec![
            record("a.pdf", 0, b"photo 1"),
            record("b.pdf", 0, b"photo 1"),
            record("b.pdf", 1, b"photo 2"),
            record("c.pdf", 0, b"photo 2"),
        ]);

        let groups = cluster_reports(&sets);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn internal_duplicate_forms_singleton_group() {
        let sets = sets_from(vec![
            record("report1.pdf", 1, b"photo P"),
            record("report1.pdf", 3, b"photo P"),
        ]);

        let groups = cluster_reports(&sets);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec!["report1.pdf"]);
    }

    #[test]
    fn unrelated_pairs_stay_in_separate_groups() {
        let sets = sets_from(vec![
            record("c.pdf", 0, b"pair 1"),
            record("d.pdf", 0, b"pair 1"),
            record("a.pdf", 0, b"pair 2"),
            record("b.pdf", 0, b"pair 2"),
        ]);

        let groups = cluster_reports(&sets);

        assert_eq!(groups.len(), 2);
        // Ordered by smallest member, not by fingerprint or input order.
        assert_eq!(groups[0].members, vec!["a.pdf", "b.pdf"]);
        assert_eq!(groups[1].members, vec!["c.pdf", "d.pdf"]);
    }
}
