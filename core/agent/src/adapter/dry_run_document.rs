//! --dry-run 用の DocumentApi（書き込まずにコンソールへ出す）

use crate::domain::BlockRef;
use crate::ports::outbound::{Console, DocumentApi};
use common::domain::PageId;
use common::error::Error;
use std::sync::Arc;

pub const DRY_RUN_ID: &str = "dry-run";

pub struct DryRunDocument {
    console: Arc<dyn Console>,
}

impl DryRunDocument {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }
}

impl DocumentApi for DryRunDocument {
    fn append_block(&self, page_id: &PageId, text: &str) -> Result<BlockRef, Error> {
        self.console
            .print(&format!("[dry-run] would append a block to page {}:", page_id));
        self.console.print(text);
        Ok(BlockRef::Block(DRY_RUN_ID.to_string()))
    }

    fn create_child_page(&self, parent: &PageId, title: &str, text: &str) -> Result<BlockRef, Error> {
        self.console.print(&format!(
            "[dry-run] would create page \"{}\" under page {}:",
            title, parent
        ));
        self.console.print(text);
        Ok(BlockRef::Page(DRY_RUN_ID.to_string()))
    }
}
