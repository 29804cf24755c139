//! Embedded prompt assets.
//!
//! Section content is data: the ordered catalog and the prompt template live
//! under `src/assets/` and are compiled into the binary.

use std::sync::OnceLock;

use include_dir::{Dir, include_dir};
use serde::Deserialize;

use crate::domain::SectionSpec;

static ASSET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets");

/// Template used to render each per-section prompt.
pub fn prompt_template() -> &'static str {
    ASSET_DIR
        .get_file("section_prompt.j2")
        .and_then(|file| file.contents_utf8())
        .expect("Embedded prompt template must be present")
}

#[derive(Debug, Deserialize)]
struct SectionManifest {
    sections: Vec<SectionSpec>,
}

static CATALOG: OnceLock<Vec<SectionSpec>> = OnceLock::new();

/// The fixed, ordered catalog of case study sections.
pub fn section_catalog() -> &'static [SectionSpec] {
    CATALOG.get_or_init(|| {
        let source = ASSET_DIR
            .get_file("sections.toml")
            .and_then(|file| file.contents_utf8())
            .expect("Embedded section manifest must be present");
        let manifest: SectionManifest =
            toml::from_str(source).expect("Embedded section manifest must be valid TOML");
        manifest.sections
    })
}
