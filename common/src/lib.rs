//! Mockup Kit Common Library
//!
//! CLIから使うI/Oなしの変換処理と共有型

pub mod types;
pub mod error;
pub mod slug;
pub mod row;
pub mod sheet;
pub mod strip;
pub mod tags;
pub mod color;
pub mod tokens;
pub mod skeleton;
pub mod cluster;
pub mod images;
pub mod pages;
pub mod photo;

pub use types::{ClusterMember, ImageQuery, ManifestEntry, PageSection, PatternCluster, Row, SliceMeta};
pub use error::{Error, Result};
pub use row::{plan_row, resolve_source_html, RowPlan};
pub use sheet::decode_sheet_export;
pub use strip::strip_boilerplate;
pub use color::{hex_to_oklch, Oklch};
pub use tokens::{extract_css_vars, render_theme_block, ColorToken};
pub use skeleton::structural_hash;
pub use cluster::cluster_fragments;
pub use images::ImageManifestBuilder;
pub use pages::{build_page_map, parse_page_slug, parse_section_pos};
pub use photo::{append_attribution, guess_orientation, photo_filename, AttributionRecord, Orientation};
