//! Newick reading and writing.
//!
//! The accepted grammar is deliberately small:
//!
//! ```text
//! tree     := '(' nodelist ')' [':' distance] [';']  |  '(' ')' [':' distance] [';']
//! nodelist := node (',' node)*
//! node     := '(' nodelist ')' [':' distance]  |  name [':' distance]
//! name     := (alnum | '_')+  |  "'" any-char-except-quote* "'"
//! ```
//!
//! Whitespace and `[...]` comments may appear between tokens. Internal nodes
//! carry no labels. A missing distance reads as [UNKNOWN_DISTANCE].

pub(crate) mod char_source;

use crate::TranslationTable;
use crate::TreeFloat;
use crate::TreeParseError;
use crate::UNKNOWN_DISTANCE;
use crate::phylo::NodeId;
use crate::phylo::Tree;
use char_source::CharSource;
use std::str::FromStr;

/// Clears the borrowed tree when dropped, unless the parse was committed.
struct ClearOnError<'t> {
    tree: &'t mut Tree,
    committed: bool,
}

impl<'t> ClearOnError<'t> {
    fn new(tree: &'t mut Tree) -> Self {
        Self { tree, committed: false }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ClearOnError<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.tree.clear();
        }
    }
}

/// Replaces the contents of `tree` with the single tree described by
/// `text`. Anything but whitespace and comments after the tree is an error.
///
/// On failure `tree` is left empty.
pub fn read_newick(tree: &mut Tree, text: &str) -> Result<(), TreeParseError> {
    let mut source = CharSource::new(text);
    let guard = ClearOnError::new(tree);
    parse_tree(&mut *guard.tree, &mut source)?;
    source.skip_space()?;
    if !source.is_at_end() {
        return Err(source.unexpected("end of input"));
    }
    guard.commit();
    Ok(())
}

/// Reads the next tree description from `source` into `tree`, leaving the
/// source just past it. On failure `tree` is left empty.
pub fn read_newick_from(
    tree: &mut Tree,
    source: &mut CharSource,
) -> Result<(), TreeParseError> {
    let guard = ClearOnError::new(tree);
    parse_tree(&mut *guard.tree, source)?;
    guard.commit();
    Ok(())
}

/// Parses every tree in `newick_string`, one after another.
pub fn parse_newick(newick_string: String) -> Result<Vec<Tree>, TreeParseError> {
    let mut source = CharSource::new(&newick_string);
    let mut trees: Vec<Tree> = Vec::new();
    loop {
        source.skip_space()?;
        if source.is_at_end() {
            break;
        }
        let mut tree = Tree::new();
        if let Err(err) = read_newick_from(&mut tree, &mut source) {
            #[cfg(debug_assertions)]
            println!("Newick parsing stopped after {} trees: {err}", trees.len());
            return Err(err);
        }
        trees.push(tree);
    }

    #[cfg(debug_assertions)]
    println!("Parsed {} Newick trees.", trees.len());

    Ok(trees)
}

impl FromStr for Tree {
    type Err = TreeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tree = Tree::new();
        read_newick(&mut tree, s)?;
        Ok(tree)
    }
}

fn parse_tree(tree: &mut Tree, source: &mut CharSource) -> Result<(), TreeParseError> {
    tree.clear();
    let root_id = tree.insert_root();

    source.skip_space()?;
    if !source.consume_if('(') {
        return Err(source.unexpected("'('"));
    }
    source.skip_space()?;
    if !source.consume_if(')') {
        parse_node_list(tree, source, root_id)?;
    }

    let distance = read_distance(source)?;
    tree.set_branch_length(root_id, distance);
    source.skip_space()?;
    let _ = source.consume_if(';');
    Ok(())
}

/// Reads the children of `root_id` up to and including the `)` that closes
/// them. Nested subtrees are kept on an explicit stack.
fn parse_node_list(
    tree: &mut Tree,
    source: &mut CharSource,
    root_id: NodeId,
) -> Result<(), TreeParseError> {
    let mut open: Vec<NodeId> = vec![root_id];
    loop {
        let parent_id = *open.last().unwrap_or(&root_id);
        source.skip_space()?;
        match source.peek() {
            Some('(') => {
                let _ = source.read();
                open.push(tree.insert_child(parent_id));
                continue;
            }
            Some('\'') => {
                let name = read_quoted_name(source)?;
                add_leaf(tree, source, parent_id, &name)?;
            }
            Some(c) if is_name_char(c) => {
                let name = read_plain_name(source);
                add_leaf(tree, source, parent_id, &name)?;
            }
            _ => return Err(source.unexpected("'(' or a leaf name")),
        }

        // A node has been completed; close as many subtrees as the input
        // closes, then expect a sibling.
        loop {
            source.skip_space()?;
            if source.consume_if(',') {
                break;
            }
            if !source.consume_if(')') {
                return Err(source.unexpected("',' or ')'"));
            }
            let closed_id = open.pop().unwrap_or(root_id);
            if open.is_empty() {
                return Ok(());
            }
            let distance = read_distance(source)?;
            tree.set_branch_length(closed_id, distance);
        }
    }
}

fn add_leaf(
    tree: &mut Tree,
    source: &mut CharSource,
    parent_id: NodeId,
    name: &str,
) -> Result<(), TreeParseError> {
    let leaf_id = tree.insert_child(parent_id);
    tree.set_node_name(leaf_id, name);
    let distance = read_distance(source)?;
    tree.set_branch_length(leaf_id, distance);
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn read_plain_name(source: &mut CharSource) -> String {
    let mut name = String::new();
    while let Some(c) = source.peek().filter(|&c| is_name_char(c)) {
        name.push(c);
        let _ = source.read();
    }
    name
}

fn read_quoted_name(source: &mut CharSource) -> Result<String, TreeParseError> {
    let _ = source.read();
    let mut name = String::new();
    loop {
        match source.peek() {
            Some('\'') => {
                let _ = source.read();
                return Ok(name);
            }
            Some(c) => {
                name.push(c);
                let _ = source.read();
            }
            None => return Err(source.unexpected("a closing quote")),
        }
    }
}

/// Reads an optional `:distance`.
fn read_distance(source: &mut CharSource) -> Result<TreeFloat, TreeParseError> {
    source.skip_space()?;
    if !source.consume_if(':') {
        return Ok(UNKNOWN_DISTANCE);
    }
    source.skip_space()?;

    let (line, column) = (source.line(), source.column());
    let mut text = String::new();
    while let Some(c) = source
        .peek()
        .filter(|&c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        text.push(c);
        let _ = source.read();
    }
    if text.is_empty() {
        return Err(source.unexpected("a distance"));
    }

    match text.parse::<TreeFloat>() {
        Ok(distance) if distance.is_finite() && distance >= 0e0 => Ok(distance),
        _ => Err(TreeParseError::InvalidDistance { text, line, column }),
    }
}

/// Writes `tree` as a single Newick description ending in `;`.
///
/// Distances are written for every edge when any edge has a nonzero length,
/// and for none otherwise. With a translation table, leaves are written as
/// their table indices; a leaf missing from the table panics.
pub fn write_newick(tree: &Tree, table: Option<&TranslationTable>) -> String {
    let Some(root_id) = tree.root_id() else {
        return String::new();
    };
    let with_distances = tree.has_branch_lengths();
    let mut newick = String::new();

    let mut stack: Vec<(NodeId, usize)> = vec![(root_id, 0)];
    while let Some((node_id, next_child)) = stack.pop() {
        let child_ids = tree.child_ids(node_id);
        if next_child == 0 {
            newick.push('(');
        }
        if let Some(&child_id) = child_ids.get(next_child) {
            if next_child > 0 {
                newick.push(',');
            }
            stack.push((node_id, next_child + 1));
            if tree.is_leaf(child_id) {
                push_leaf_name(&mut newick, tree, child_id, table);
                if with_distances {
                    push_distance(&mut newick, tree.branch_length(child_id));
                }
            } else {
                stack.push((child_id, 0));
            }
        } else {
            newick.push(')');
            if with_distances {
                push_distance(&mut newick, tree.branch_length(node_id));
            }
        }
    }

    newick.push(';');
    newick
}

/// One description per line.
pub fn write_newick_trees(trees: &[Tree], table: Option<&TranslationTable>) -> String {
    trees
        .iter()
        .map(|tree| write_newick(tree, table))
        .collect::<Vec<String>>()
        .join("\n")
}

fn push_leaf_name(
    newick: &mut String,
    tree: &Tree,
    leaf_id: NodeId,
    table: Option<&TranslationTable>,
) {
    let name = tree.node_name(leaf_id).unwrap_or_default();
    match table {
        Some(table) => match table.index_of(name) {
            Some(index) => newick.push_str(&index.to_string()),
            None => panic!("leaf \"{name}\" is missing from the translation table"),
        },
        None if !name.is_empty() && name.chars().all(is_name_char) => {
            newick.push_str(name)
        }
        None => newick.push_str(&format!("'{name}'")),
    }
}

fn push_distance(newick: &mut String, distance: TreeFloat) {
    newick.push_str(&format!(":{distance}"));
}
