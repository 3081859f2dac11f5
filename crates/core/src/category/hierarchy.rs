//! Parent/child structure of data categories.

use std::collections::{HashMap, HashSet, VecDeque};

use dataguard_shared::types::DataCategoryId;

use super::error::CategoryError;

/// Children index built from `(id, parent_id)` pairs.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    children: HashMap<DataCategoryId, Vec<DataCategoryId>>,
}

impl CategoryTree {
    /// Builds the index from parent links.
    pub fn from_parent_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = (DataCategoryId, Option<DataCategoryId>)>,
    {
        let mut children: HashMap<DataCategoryId, Vec<DataCategoryId>> = HashMap::new();
        for (id, parent) in links {
            if let Some(parent) = parent {
                children.entry(parent).or_default().push(id);
            }
        }
        Self { children }
    }

    /// Direct children of a category.
    #[must_use]
    pub fn children_of(&self, id: DataCategoryId) -> &[DataCategoryId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// All descendants of `root` in breadth-first order, excluding `root`.
    ///
    /// Cycles already present in stored data are walked once.
    #[must_use]
    pub fn descendants(&self, root: DataCategoryId) -> Vec<DataCategoryId> {
        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        let mut found = Vec::new();

        while let Some(current) = queue.pop_front() {
            for &child in self.children_of(current) {
                if visited.insert(child) {
                    found.push(child);
                    queue.push_back(child);
                }
            }
        }

        found
    }

    /// Checks that `category` may be placed under `new_parent`.
    ///
    /// # Errors
    ///
    /// Returns `SelfParent` or `CircularHierarchy` if the move would
    /// introduce a cycle.
    pub fn validate_parent_change(
        &self,
        category: DataCategoryId,
        new_parent: Option<DataCategoryId>,
    ) -> Result<(), CategoryError> {
        let Some(new_parent) = new_parent else {
            return Ok(());
        };

        if new_parent == category {
            return Err(CategoryError::SelfParent);
        }

        if self.descendants(category).contains(&new_parent) {
            return Err(CategoryError::CircularHierarchy {
                category,
                new_parent,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u128) -> DataCategoryId {
        DataCategoryId::from_uuid(uuid::Uuid::from_u128(n))
    }

    /// 1 -> 2 -> 4, 1 -> 3, 5 standalone
    fn sample_tree() -> CategoryTree {
        CategoryTree::from_parent_links([
            (id(1), None),
            (id(2), Some(id(1))),
            (id(3), Some(id(1))),
            (id(4), Some(id(2))),
            (id(5), None),
        ])
    }

    #[test]
    fn test_descendants_breadth_first() {
        let tree = sample_tree();
        assert_eq!(tree.descendants(id(1)), vec![id(2), id(3), id(4)]);
        assert_eq!(tree.descendants(id(2)), vec![id(4)]);
        assert!(tree.descendants(id(5)).is_empty());
    }

    #[test]
    fn test_move_under_descendant_rejected() {
        let tree = sample_tree();
        assert!(matches!(
            tree.validate_parent_change(id(1), Some(id(4))),
            Err(CategoryError::CircularHierarchy { .. })
        ));
    }

    #[test]
    fn test_move_under_self_rejected() {
        let tree = sample_tree();
        assert!(matches!(
            tree.validate_parent_change(id(2), Some(id(2))),
            Err(CategoryError::SelfParent)
        ));
    }

    #[test]
    fn test_valid_moves() {
        let tree = sample_tree();
        assert!(tree.validate_parent_change(id(4), Some(id(3))).is_ok());
        assert!(tree.validate_parent_change(id(1), Some(id(5))).is_ok());
        assert!(tree.validate_parent_change(id(2), None).is_ok());
    }

    #[test]
    fn test_existing_cycle_terminates() {
        let tree = CategoryTree::from_parent_links([(id(1), Some(id(2))), (id(2), Some(id(1)))]);
        assert_eq!(tree.descendants(id(1)), vec![id(2)]);
    }

    /// Random forest: node `i` may only point at a node with a smaller index.
    fn forest_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
        (1usize..30).prop_flat_map(|n| {
            (0..n)
                .map(|i| {
                    if i == 0 {
                        Just(None).boxed()
                    } else {
                        proptest::option::of(0..i).boxed()
                    }
                })
                .collect::<Vec<_>>()
        })
    }

    fn build(parents: &[Option<usize>]) -> CategoryTree {
        CategoryTree::from_parent_links(parents.iter().enumerate().map(|(i, p)| {
            (id(i as u128), p.map(|p| id(p as u128)))
        }))
    }

    fn is_ancestor(parents: &[Option<usize>], ancestor: usize, mut node: usize) -> bool {
        while let Some(parent) = parents[node] {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    proptest! {
        /// Moving a category under any of its descendants fails; moving it
        /// anywhere else succeeds.
        #[test]
        fn prop_parent_change_rejects_exactly_descendants(
            parents in forest_strategy(),
            pick in any::<proptest::sample::Index>(),
            target in any::<proptest::sample::Index>(),
        ) {
            let tree = build(&parents);
            let node = pick.index(parents.len());
            let new_parent = target.index(parents.len());

            let result = tree.validate_parent_change(id(node as u128), Some(id(new_parent as u128)));
            let descendant = is_ancestor(&parents, node, new_parent);

            if node == new_parent || descendant {
                prop_assert!(result.is_err());
            } else {
                prop_assert!(result.is_ok());
            }
        }
    }
}
