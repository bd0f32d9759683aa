//! Domain services.
//!
//! Pure functions and trait seams over the invitation model. Nothing here
//! performs I/O directly; storage, rasterization and AI calls are reached
//! through the traits defined in [`lookup`], [`export`] and [`suggestion`].

pub mod countdown;
pub mod editor;
pub mod export;
pub mod lookup;
pub mod metadata;
pub mod render;
pub mod share;
pub mod suggestion;

pub use editor::{apply, apply_all, validate_document, EditError, EditorCommand, TextField};
pub use export::{
    CaptureError, CaptureOptions, CaptureStrategy, CaptureTarget, CapturedImage, Capturer,
    Delivery, ExportError, ExportPipeline, ExportState, FallbackPlan, ShareSheet, SinkKind,
    UnavailableShareSheet,
};
pub use lookup::{InvitationResolver, LookupError, OwnerDocuments, PageViewLookup, PublicIndex};
pub use metadata::{PageMetadata, SiteDefaults};
pub use render::{render_card, render_sections, RenderedCard, RenderedSection};
pub use suggestion::{
    MockSuggestionService, Suggestion, SuggestionError, SuggestionRequest, SuggestionService,
};
