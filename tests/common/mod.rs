/*!
 * Common test utilities for the tmclean test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::Lazy;
use tempfile::TempDir;

use tmclean::{CharsetCatalog, TextUnit};

/// Building the catalog walks every code point, so tests share one
static CATALOG: Lazy<Arc<CharsetCatalog>> =
    Lazy::new(|| Arc::new(CharsetCatalog::build().expect("catalog builds from Unicode tables")));

/// Shared in-memory charset catalog
pub fn catalog() -> Arc<CharsetCatalog> {
    Arc::clone(&CATALOG)
}

/// Route log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Small English/Swedish corpus with typical translation memory noise
pub fn sample_units() -> Vec<TextUnit> {
    vec![
        TextUnit::new("Hello &amp; welcome to the show", "Hej &amp; välkommen till showen"),
        TextUnit::new(
            "\u{201C}It\u{2019}s   a <b>good</b> day\u{201D}",
            "\u{201C}Det är en <b>bra</b> dag\u{201D}",
        ),
        TextUnit::new(
            "https://example.com/a/very/long/path/to/nowhere",
            "https://example.com/a/very/long/path/to/nowhere",
        ),
        TextUnit::new("Too short", "Kort"),
        TextUnit::new(
            "The meeting starts at nine o'clock tomorrow morning",
            "Ja, det gör vi",
        ),
        TextUnit::new("Hello &amp; welcome to the show", "Hej &amp; välkommen till showen"),
        TextUnit::new("Line one\\nline two of the text", "Rad ett\\nrad två av texten"),
    ]
}
