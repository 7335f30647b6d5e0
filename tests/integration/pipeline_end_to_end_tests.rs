/*!
 * End-to-end cleaning runs: configuration, catalog, pipeline and corpus
 */

use tmclean::app_config::{CatalogConfig, Config};
use tmclean::filters::{normalize_whitespace, remove_empty, unescape_html};
use tmclean::{CleanOptions, FilterItem, TextUnit, clean_units, compose_paired};

use crate::common;

#[test]
fn test_composePaired_withHtmlWhitespaceAndEmpty_shouldCleanUnit() {
    let catalog = common::catalog();
    let filter = compose_paired(vec![
        FilterItem::single(unescape_html()),
        FilterItem::single(normalize_whitespace(&catalog)),
        FilterItem::single(remove_empty()),
    ]);

    assert_eq!(
        filter(TextUnit::new("Hello &amp; world", "Hej &amp; värld")),
        Some(TextUnit::new("Hello & world", "Hej & värld"))
    );
    assert_eq!(filter(TextUnit::new("&#32;", "text")), Some(TextUnit::new(" ", "text")));
    assert_eq!(filter(TextUnit::new("", "text")), None);
}

#[test]
fn test_defaultConfig_withSampleCorpus_shouldCleanAndReport() {
    common::init_logging();
    let config = Config::default();
    config.validate().unwrap();

    let pipeline = config.build_pipeline(&common::catalog()).unwrap();
    let cleaned = clean_units(&pipeline, common::sample_units(), CleanOptions::default());

    assert_eq!(
        cleaned.units,
        vec![
            TextUnit::new("Hello & welcome to the show", "Hej & välkommen till showen"),
            TextUnit::new("\"It's a good day\"", "\u{201D}Det är en bra dag\u{201D}"),
            TextUnit::new("Line one line two of the text", "Rad ett rad två av texten"),
        ]
    );

    let stats = &cleaned.stats;
    assert_eq!(stats.total, 7);
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.rejected(), 3);

    let rejected_at: Vec<usize> = stats
        .rejected_by_stage
        .iter()
        .enumerate()
        .filter(|(_, stage)| stage.count > 0)
        .map(|(index, _)| index)
        .collect();
    // non-text, word count and ratio each drop one unit
    assert_eq!(rejected_at, vec![5, 6, 7]);
}

#[test]
fn test_configFile_withCachedCatalog_shouldProduceSameResult() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let config_path = dir.path().join("tmclean.json");

    let config = Config {
        catalog: CatalogConfig {
            cache_path: Some(dir.path().join("cache").join("charsets.json")),
            use_cache: true,
        },
        ..Config::default()
    };
    config.save(&config_path).unwrap();

    let loaded_config = Config::from_file(&config_path).unwrap();
    let loaded = loaded_config.catalog.load().unwrap();
    assert!(loaded.persist_error.is_none());

    let from_cache = loaded_config.build_pipeline(&loaded.catalog).unwrap();
    let in_memory = config.build_pipeline(&common::catalog()).unwrap();

    let expected = clean_units(&in_memory, common::sample_units(), CleanOptions::default());
    let actual = clean_units(&from_cache, common::sample_units(), CleanOptions::default());
    assert_eq!(actual, expected);

    let (sources, targets) = actual.into_columns();
    assert_eq!(sources.len(), targets.len());
}
