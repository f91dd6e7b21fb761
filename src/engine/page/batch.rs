use crate::engine::errors::{EncodeError, PageError};
use crate::engine::page::Block;

/// Columnar batch of rows; every block shares the same position count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    blocks: Vec<Block>,
    position_count: usize,
}

impl Page {
    pub fn new(blocks: Vec<Block>) -> Result<Self, PageError> {
        let position_count = blocks.first().map(Block::position_count).unwrap_or(0);
        for (idx, block) in blocks.iter().enumerate() {
            if block.position_count() != position_count {
                return Err(PageError::InconsistentPositionCount {
                    block: idx,
                    expected: position_count,
                    got: block.position_count(),
                });
            }
        }
        Ok(Self {
            blocks,
            position_count,
        })
    }

    pub fn position_count(&self) -> usize {
        self.position_count
    }

    pub fn channel_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, channel: usize) -> Result<&Block, EncodeError> {
        self.blocks
            .get(channel)
            .ok_or(EncodeError::ChannelOutOfBounds {
                channel,
                channels: self.blocks.len(),
            })
    }
}
