//! # mercan-label
//!
//! Label template designer and print-rendering pipeline.
//!
//! ## Scope
//!
//! This crate handles the full label lifecycle:
//! - Paper size registry (thermal rolls and grid sheets)
//! - Template persistence with default/empty fallback
//! - Interactive editor state (selection, drag, zoom, reorder)
//! - Token substitution with Turkish price/date formatting
//! - Render pipeline (text, Code-128 barcode, QR, shapes)
//! - Print queue and multi-page document assembly
//!
//! Product catalog management stays in application code; this crate
//! only consumes `shared::Product` snapshots.
//!
//! ## Example
//!
//! ```ignore
//! use mercan_label::{FileSurface, LabelService, PrintQueue};
//!
//! let mut service = LabelService::open("labels.redb")?;
//! let mut queue = PrintQueue::new();
//! queue.add_product(product);
//! queue.set_quantity(0, 3);
//!
//! let surface = FileSurface::new("spool");
//! let document = service.print(&queue, &surface, today).await?;
//! println!("{} pages queued as job {}", document.page_count, document.job_id);
//! ```

pub mod defaults;
pub mod editor;
pub mod queue;
pub mod registry;
pub mod render;
pub mod service;
pub mod store;
pub mod substitute;
pub mod surface;

// Re-exports
pub use editor::{estimate_line_count, ArrowKey, EditorState, ItemUpdate, LineEstimate, TemplateEditor};
pub use queue::{PrintQueue, PrintQueueEntry, MAX_BULK_ADD};
pub use registry::{PaperSizeRegistry, RegistryError, RegistryResult};
pub use render::{
    render_document, render_preview, OverflowPolicy, PaintOp, PreviewScene, PrintDocument,
    RenderInstruction, RenderMode,
};
pub use service::{LabelService, ServiceError, ServiceResult};
pub use store::{StoreError, StoreResult, TemplateStore};
pub use substitute::{format_price, substitute, CURRENCY_SYMBOL};
pub use surface::{FileSurface, PrintSurface, SurfaceError, SurfaceResult};
