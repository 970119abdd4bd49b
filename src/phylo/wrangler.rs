use super::{TranslationTable, Tree, TreeSummary};

/// Prefix of generated tree names: "tree_1", "tree_2", ...
pub const TREE_NAME_PREFIX: &str = "tree_";

/// Ordered collection of trees with one active tree.
///
/// While the collection is non-empty the active index always points at a
/// tree.
#[derive(Debug, Default, Clone)]
pub struct TreeWrangler {
    trees: Vec<Tree>,
    active_index: usize,
}

impl TreeWrangler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tree> {
        self.trees.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    pub fn active_index(&self) -> Option<usize> {
        if self.is_empty() { None } else { Some(self.active_index) }
    }

    pub fn set_active(&mut self, index: usize) {
        assert!(index < self.len(), "no tree at index {index}");
        self.active_index = index;
    }

    pub fn active_tree(&self) -> Option<&Tree> {
        self.trees.get(self.active_index)
    }

    pub fn active_tree_mut(&mut self) -> Option<&mut Tree> {
        self.trees.get_mut(self.active_index)
    }

    /// Appends a root-only tree. Returns its index.
    pub fn seed_tree(&mut self) -> usize {
        self.add_tree(Tree::seeded())
    }

    /// Takes ownership of `tree`, naming it if it has no name and marking
    /// its internal nodes dead. Returns its index.
    pub fn add_tree(&mut self, mut tree: Tree) -> usize {
        if tree.tree_name().is_empty() {
            let name = self.generated_name();
            #[cfg(debug_assertions)]
            println!("Adding unnamed tree as \"{name}\".");
            tree.set_tree_name(name);
        }
        tree.make_internals_dead();
        self.trees.push(tree);
        if self.trees.len() == 1 {
            self.active_index = 0;
        }
        self.trees.len() - 1
    }

    /// Removes and returns the tree at `index`.
    ///
    /// The active index keeps pointing at the same tree. If the active tree
    /// itself is deleted, the first tree becomes active when it was the
    /// first one, and the last tree otherwise.
    pub fn delete_tree(&mut self, index: usize) -> Tree {
        assert!(index < self.len(), "no tree at index {index}");
        let tree = self.trees.remove(index);
        if index < self.active_index {
            self.active_index -= 1;
        } else if index == self.active_index && index > 0 {
            self.active_index = self.trees.len().saturating_sub(1);
        }
        tree
    }

    /// Appends a deep copy of the active tree under a new generated name.
    /// Returns the index of the copy.
    pub fn duplicate_active_tree(&mut self) -> Option<usize> {
        let mut copy = self.active_tree()?.clone();
        copy.set_tree_name(self.generated_name());
        self.trees.push(copy);
        Some(self.trees.len() - 1)
    }

    /// Registers every named leaf of every tree, then alphabetizes, so that
    /// all trees can be written against one numbering.
    pub fn calc_translation_table(&self, table: &mut TranslationTable) {
        for tree in &self.trees {
            for name in tree.leaf_names() {
                let _ = table.add_name(name);
            }
        }
        table.alphabetize();
    }

    pub fn summaries(&self) -> Vec<(&str, TreeSummary)> {
        self.trees.iter().map(|tree| (tree.tree_name(), tree.summary())).collect()
    }

    /// One line per tree; the active tree is marked with `*`.
    pub fn report(&self) -> String {
        let mut result = format!("{} trees\n", self.len());
        for (index, (name, summary)) in self.summaries().into_iter().enumerate() {
            let marker = if Some(index) == self.active_index() { '*' } else { ' ' };
            result.push_str(&format!("{marker} {}. {name}: {summary}\n", index + 1));
        }
        result
    }

    /// "tree_N" for the position the next tree will take, skipping numbers
    /// already in use.
    fn generated_name(&self) -> String {
        let mut number = self.trees.len() + 1;
        loop {
            let name = format!("{TREE_NAME_PREFIX}{number}");
            if !self.trees.iter().any(|tree| tree.tree_name() == name) {
                return name;
            }
            number += 1;
        }
    }
}
