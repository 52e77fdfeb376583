//! Tricolor is an Independence Day greeting card compositor with a tribute vote ledger.
//!
//! Two features share the crate:
//!
//! - The card generator: describe a card as a [`Scene`], lower it with [`compile_scene`], paint it
//!   with a [`Compositor`] and save or share the result through an [`ExportService`].
//! - The tribute gallery: a static list of [`Fighter`]s whose vote counts live in a
//!   [`CounterStore`]. [`VoteService`] commits each vote to the remote store and falls back to a
//!   device-local [`LocalFallbackLedger`] that is merged back once the remote is reachable.
#![forbid(unsafe_code)]

mod app;
mod assets;
mod compile;
/// Layered runtime configuration.
pub mod config;
mod export;
mod foundation;
mod gallery;
mod render;
mod scene;
mod votes;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, BezPath, CANONICAL_HEIGHT, CANONICAL_WIDTH, Canvas, Percent2, Point, Rect,
    Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{TricolorError, TricolorResult};

pub use crate::config::Config;

pub use crate::app::router::{Destination, NavEvent, Page};
pub use crate::gallery::fighters::{Fighter, fighter_by_id, fighters};

pub use crate::votes::document_dir::DocumentDirStore;
pub use crate::votes::fallback::{CommitTier, FallbackCounterStore};
pub use crate::votes::ledger::{LEDGER_KEY, LocalFallbackLedger, MergeReport};
pub use crate::votes::memory::MemoryCounterStore;
pub use crate::votes::service::{
    CastOutcome, CastState, Feedback, VOTED_KEY, VotePolicy, VoteService,
};
pub use crate::votes::storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use crate::votes::store::{
    CounterStore, CountsCallback, Subscription, VOTES_COLLECTION, VoteCounts, VoteRecord,
    validate_counter_key,
};

pub use crate::scene::model::{
    BackgroundRef, MAX_FONT_SIZE, MIN_FONT_SIZE, PhotoGeometry, Scene, TextGeometry,
};
pub use crate::scene::templates::{
    CHAKRA, ChakraSpec, Palette, Template, template_by_id, templates,
};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::source::{
    AssetSource, FsAssetSource, MemoryAssetSource, normalize_rel_path, validate_upload,
};
pub use crate::assets::text::{
    LoadedFont, TextBrushRgba8, TextLayoutEngine, discover_family, discover_font,
    system_font_dirs,
};

pub use crate::compile::plan::{
    BackgroundLayer, ChakraLayer, DropShadow, Layer, LayerKind, PhotoLayer, RenderPlan,
    TextLayer, TextLine, TextRole, caption_for_year, compile_scene,
};

pub use crate::render::blur::blur_rgba8_premul;
pub use crate::render::cpu::{Compositor, LayerOutcome, RenderReport};
pub use crate::render::surface::RasterSurface;

pub use crate::export::encode::{
    ExportFormat, ExportedImage, encode_surface, export_filename, to_file,
};
pub use crate::export::share::{
    DEFAULT_CAPTION, DesktopPlatform, DownloadReceipt, ExportService, SHARE_BASE_URL,
    ShareOutcome, SharePlatform,
};
