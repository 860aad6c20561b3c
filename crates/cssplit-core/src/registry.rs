//! Block ownership and the stack of open blocks.
//!
//! Copyright (c) 2025 Posit, PBC

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{Block, BlockId};
use crate::error::SplitIssue;

/// What `start` does for a name that already has a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReopenPolicy {
    /// Keep appending to the existing block
    #[default]
    Append,
    /// Start a new block per occurrence: `a.css`, `a-2.css`, `a-3.css`, ...
    Separate,
}

/// A block on the stack, with the delimiter that opened it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    pub id: BlockId,
    pub opened_at: Range<usize>,
}

/// Owns every block of a run and tracks which one is active
///
/// The document block is created up front, sits at the bottom of the stack
/// and is never popped. Blocks are kept in first-reference order, which is
/// the order they are serialized in.
#[derive(Debug)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
    /// Latest block for each identity name
    by_name: HashMap<String, BlockId>,
    output_names: HashSet<String>,
    stack: Vec<OpenBlock>,
    policy: ReopenPolicy,
}

impl BlockRegistry {
    pub fn new(document_name: &str, policy: ReopenPolicy) -> Self {
        BlockRegistry {
            blocks: vec![Block::document(document_name)],
            by_name: HashMap::new(),
            output_names: HashSet::new(),
            stack: vec![OpenBlock {
                id: BlockId(0),
                opened_at: 0..0,
            }],
            policy,
        }
    }

    /// The block for `name`, created on first use
    pub fn get_or_create(&mut self, name: &str) -> BlockId {
        match self.by_name.get(name) {
            Some(&id) => id,
            None => self.create(name, name.to_string()),
        }
    }

    fn create(&mut self, name: &str, output_name: String) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.output_names.insert(output_name.clone());
        self.blocks.push(Block::named(name, output_name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Make the block for `name` active
    pub fn open(&mut self, name: &str, opened_at: Range<usize>) -> BlockId {
        let id = match (self.policy, self.by_name.contains_key(name)) {
            (ReopenPolicy::Separate, true) => {
                let output_name = self.next_occurrence_name(name);
                self.create(name, output_name)
            }
            _ => self.get_or_create(name),
        };

        debug!(
            name,
            output = self.blocks[id.0].output_name(),
            depth = self.stack.len(),
            "open block"
        );
        self.stack.push(OpenBlock { id, opened_at });
        id
    }

    fn next_occurrence_name(&self, name: &str) -> String {
        let stem = name.strip_suffix(".css").unwrap_or(name);
        (2..)
            .map(|n| format!("{}-{}.css", stem, n))
            .find(|candidate| !self.output_names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    /// Close the active block
    ///
    /// Fails without changing the stack when `name` is not the active
    /// block's name, which is always the case while only the document
    /// block is open.
    pub fn close(&mut self, name: &str, closed_at: Range<usize>) -> Result<BlockId, SplitIssue> {
        let active = self.active();
        if active.is_document() || active.identity_name() != name {
            return Err(SplitIssue::BlockMismatch {
                open: (!active.is_document()).then(|| active.identity_name().to_string()),
                closing: name.to_string(),
                span: closed_at,
            });
        }

        let closed = self.stack.pop().map_or(BlockId(0), |open| open.id);
        debug!(name, depth = self.stack.len(), "close block");
        Ok(closed)
    }

    pub fn active_id(&self) -> BlockId {
        self.stack.last().map_or(BlockId(0), |open| open.id)
    }

    pub fn active(&self) -> &Block {
        &self.blocks[self.active_id().0]
    }

    pub fn active_mut(&mut self) -> &mut Block {
        let id = self.active_id();
        &mut self.blocks[id.0]
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    /// Number of open blocks, counting the document block
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// End the run, returning every block and one issue per block still
    /// open above the document block, innermost first
    pub fn finish(self) -> (Vec<Block>, Vec<SplitIssue>) {
        let issues = self
            .stack
            .iter()
            .skip(1)
            .rev()
            .map(|open| SplitIssue::UnclosedBlock {
                name: self.blocks[open.id.0].identity_name().to_string(),
                span: open.opened_at.clone(),
            })
            .collect();
        (self.blocks, issues)
    }
}
