use crate::export::ExportJob;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadCatalog { url: String, delay_ms: u64 },
    LoadDetail { seq: u64, url: String },
    LoadSprite { name: String, url: String },
    CancelCatalogTasks,
    ExportPdf(ExportJob),
}
