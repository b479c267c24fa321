use crate::ingest::record::DetectionRecord;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Paged tabular view over the loaded batch. Row order is insertion order.
#[derive(Debug, Clone)]
pub struct DetectionTable {
    records: Vec<DetectionRecord>,
    visible: usize,
    page_size: usize,
}

impl DetectionTable {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            records: Vec::new(),
            visible: page_size,
            page_size,
        }
    }

    /// Replaces the whole batch and rewinds to the first page.
    pub fn replace(&mut self, records: Vec<DetectionRecord>) {
        self.records = records;
        self.visible = self.page_size;
    }

    pub fn show_more(&mut self) {
        self.visible = (self.visible + self.page_size).min(self.records.len().max(self.page_size));
    }

    pub fn visible(&self) -> &[DetectionRecord] {
        &self.records[..self.visible.min(self.records.len())]
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.records.len()
    }

    pub fn records(&self) -> &[DetectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First row carrying `cluster_id`.
    pub fn find(&self, cluster_id: &str) -> Option<&DetectionRecord> {
        self.records.iter().find(|r| r.cluster_id == cluster_id)
    }
}

impl Default for DetectionTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
