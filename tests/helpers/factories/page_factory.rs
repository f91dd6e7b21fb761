use crate::engine::page::{Block, Page};

pub struct PageFactory {
    blocks: Vec<Block>,
}

impl PageFactory {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_longs(self, values: &[Option<i64>]) -> Self {
        self.with_block(Block::longs(values.iter().copied()))
    }

    pub fn with_strings(self, values: &[Option<&str>]) -> Self {
        self.with_block(Block::strings(values.iter().copied()))
    }

    pub fn with_doubles(self, values: &[Option<f64>]) -> Self {
        self.with_block(Block::doubles(values.iter().copied()))
    }

    pub fn create(self) -> Page {
        Page::new(self.blocks).expect("blocks share a position count")
    }
}
