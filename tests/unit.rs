use reencode::{
    output::{self, OutputFormat},
    BinaryDetection, Charset, ConversionOutcome, ConvertArgs, ConvertBuilder, ConvertError,
    ConvertOptions, EncodingCatalog, IgnoreSet, ParamResolver,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn options_in(dir: &Path) -> ConvertOptions {
    ConvertBuilder::new().working_dir(dir).build()
}

#[test]
fn test_charset_labels() {
    assert_eq!(Charset::for_label("latin1").unwrap().name(), "windows-1252");
    assert_eq!(Charset::for_label(" UTF8 ").unwrap().name(), "UTF-8");
    assert_eq!(Charset::for_label("Shift_JIS").unwrap().name(), "Shift_JIS");
    assert!(Charset::for_label("bogus-enc").is_none());
    // Maps to the replacement pseudo-encoding.
    assert!(Charset::for_label("iso-2022-kr").is_none());
}

#[test]
fn test_round_trip_through_utf8() {
    let catalog = EncodingCatalog::default();
    let utf8 = Charset::utf8();
    let samples = [
        ("windows-1252", "café crème brûlée"),
        ("iso-8859-2", "Zażółć gęślą jaźń"),
        ("koi8-r", "Привет, мир"),
        ("shift_jis", "こんにちは世界"),
        ("gbk", "中文字符"),
        ("big5", "中文"),
        ("euc-kr", "한국어"),
        ("utf-16le", "héllo ✓"),
        ("utf-16be", "héllo ✓"),
        ("utf-8", "plain ascii and ünïcödé"),
    ];
    for (label, text) in samples {
        let charset = catalog.charset(label).unwrap();
        let encoded = catalog.encode(text, charset).unwrap();
        let back = catalog.transcode(&encoded, charset, utf8).unwrap();
        assert_eq!(back, text.as_bytes(), "round trip through {label}");
    }
}

#[test]
fn test_transcode_failures() {
    let catalog = EncodingCatalog::default();
    let latin1 = catalog.charset("latin1").unwrap();
    let utf8 = Charset::utf8();
    assert!(catalog.encode("中", latin1).is_none());
    assert!(catalog.transcode(&[0x63, 0x61, 0x66, 0xE9], utf8, latin1).is_none());
}

#[test]
fn test_utf8_bom_is_dropped() {
    let catalog = EncodingCatalog::default();
    let utf8 = Charset::utf8();
    let latin1 = catalog.charset("latin1").unwrap();
    let out = catalog
        .transcode(&[0xEF, 0xBB, 0xBF, b'c', b'a', b'f', 0xC3, 0xA9], utf8, latin1)
        .unwrap();
    assert_eq!(out, vec![0x63, 0x61, 0x66, 0xE9]);
}

#[test]
fn test_detection() {
    let catalog = EncodingCatalog::default();

    let ascii = catalog.detect(b"hello world");
    assert_eq!(ascii.label, "UTF-8");
    assert_eq!(ascii.confidence, 1.0);

    let utf8 = catalog.detect("café".as_bytes());
    assert_eq!(utf8.label, "UTF-8");
    assert!(utf8.confidence < 1.0 && utf8.confidence > 0.9);

    let bom = catalog.detect(&[0xFF, 0xFE, b'h', 0, b'i', 0]);
    assert_eq!(bom.label, "UTF-16LE");
    assert_eq!(bom.confidence, 1.0);

    let latin1 = catalog.detect(b"Le caf\xe9 est tr\xe8s bon, la cr\xe8me br\xfbl\xe9e aussi.");
    assert!(catalog.is_known(latin1.label));
    assert!(latin1.confidence <= 0.9);
}

#[test]
fn test_binary_detection_modes() {
    let binary = [0x00, 0x01, 0x02, 0x03, 0xFF];
    let text = b"just text";
    let accurate = EncodingCatalog::new(BinaryDetection::Accurate);
    let simple = EncodingCatalog::new(BinaryDetection::Simple);
    let none = EncodingCatalog::new(BinaryDetection::None);
    assert!(accurate.is_binary(&binary));
    assert!(!accurate.is_binary(text));
    assert!(simple.is_binary(&binary));
    assert!(!simple.is_binary(text));
    assert!(!none.is_binary(&binary));
    // UTF-16 with a BOM is text.
    assert!(!accurate.is_binary(&[0xFF, 0xFE, b'h', 0, b'i', 0]));
}

#[test]
fn test_resolver_defaults() {
    let dir = tempdir().unwrap();
    let options = options_in(dir.path());
    let catalog = EncodingCatalog::default();
    let request = ParamResolver::new(&options, &catalog)
        .resolve(&ConvertArgs::new())
        .unwrap();
    assert_eq!(request.source, dir.path());
    assert_eq!(request.destination, dir.path().join("CONVERTED"));
    assert_eq!(request.source_encoding, None);
    assert_eq!(request.destination_encoding, Charset::utf8());
}

#[test]
fn test_resolver_normalizes_and_treats_empty_as_absent() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    let options = options_in(dir.path());
    let catalog = EncodingCatalog::default();
    let args = ConvertArgs::new()
        .source("./src/../src")
        .destination("out/./nested")
        .source_encoding("")
        .destination_encoding("latin1");
    let request = ParamResolver::new(&options, &catalog).resolve(&args).unwrap();
    assert_eq!(request.source, dir.path().join("src"));
    assert_eq!(request.destination, dir.path().join("out").join("nested"));
    assert_eq!(request.source_encoding, None);
    assert_eq!(request.destination_encoding.name(), "windows-1252");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_resolver_failures() {
    let dir = tempdir().unwrap();
    let options = options_in(dir.path());
    let catalog = EncodingCatalog::default();
    let resolver = ParamResolver::new(&options, &catalog);

    let missing = resolver.resolve(&ConvertArgs::new().source("nope"));
    assert!(matches!(missing, Err(ConvertError::PathNotFound { .. })));

    let bad_from = resolver.resolve(&ConvertArgs::new().source_encoding("bogus-enc"));
    assert!(matches!(
        bad_from,
        Err(ConvertError::UnsupportedEncoding { ref label, path: None }) if label == "bogus-enc"
    ));

    let bad_to = resolver.resolve(&ConvertArgs::new().destination_encoding("bogus-enc"));
    assert!(matches!(bad_to, Err(ConvertError::UnsupportedEncoding { .. })));
}

#[test]
fn test_request_output_must_not_overlap_source() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/inner")).unwrap();
    fs::write(dir.path().join("src/a.txt"), "a").unwrap();
    let options = options_in(dir.path());
    let catalog = EncodingCatalog::default();
    let resolver = ParamResolver::new(&options, &catalog);
    let check = |source: &str, destination: &str| {
        resolver
            .resolve(&ConvertArgs::new().source(source).destination(destination))
            .unwrap()
            .ensure_disjoint()
    };

    assert!(check("src", "out").is_ok());
    assert!(check("src", "src/inner").is_ok());
    assert!(check("src/a.txt", "out").is_ok());
    assert!(check("src/a.txt", "src/inner").is_ok());
    for (source, destination) in [("src", "src"), ("src", "."), ("src/a.txt", "src")] {
        let err = check(source, destination).unwrap_err();
        assert!(matches!(err, ConvertError::DestinationOverlapsSource { .. }));
        assert!(err.is_fatal());
    }
}

#[cfg(unix)]
#[test]
fn test_resolver_rejects_non_unicode_encoding() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let dir = tempdir().unwrap();
    let options = options_in(dir.path());
    let catalog = EncodingCatalog::default();
    let args = ConvertArgs::new().destination_encoding(OsString::from_vec(vec![0x75, 0xFF]));
    let result = ParamResolver::new(&options, &catalog).resolve(&args);
    assert!(matches!(
        result,
        Err(ConvertError::InvalidArgumentType { argument: "destinationEncoding" })
    ));
}

#[test]
fn test_ignore_set_without_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("CONVERTED");
    let set = IgnoreSet::load(dir.path(), ".convIgnore", &out).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&out));
    assert!(set.contains(&dir.path().join(".convIgnore")));
}

#[test]
fn test_ignore_set_reads_lines() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".convIgnore"),
        "skip.txt\n\nnested/dir\r\n/abs/elsewhere\n",
    )
    .unwrap();
    let out = dir.path().join("out");
    let set = IgnoreSet::load(dir.path(), ".convIgnore", &out).unwrap();
    assert_eq!(set.len(), 5);
    assert!(set.contains(&dir.path().join("skip.txt")));
    assert!(set.contains(&dir.path().join("nested").join("dir")));
    assert!(set.contains(Path::new("/abs/elsewhere")));
    // Exact matches only.
    assert!(!set.contains(&dir.path().join("nested")));
    assert!(!set.contains(&dir.path().join("nested").join("dir").join("file")));
}

#[test]
fn test_ignore_set_unreadable_file_is_fatal() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".convIgnore")).unwrap();
    let err = IgnoreSet::load(dir.path(), ".convIgnore", &dir.path().join("out")).unwrap_err();
    assert!(matches!(err, ConvertError::ConfigReadError { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_ignore_set_from_paths() {
    let set = IgnoreSet::from_paths(Path::new("/work"), ["a/../b", "/c/./d"]);
    assert!(set.contains(Path::new("/work/b")));
    assert!(set.contains(Path::new("/c/d")));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_outcome_arithmetic_and_output() {
    let outcome: ConversionOutcome = [
        ConversionOutcome::converted(),
        ConversionOutcome::copied(),
        ConversionOutcome::failed(),
        ConversionOutcome::converted(),
    ]
    .into_iter()
    .sum();
    assert_eq!(outcome.converted, 2);
    assert_eq!(outcome.total(), 4);

    let json = output::format_outcome(&outcome, OutputFormat::Json, false);
    assert_eq!(json, r#"{"converted":2,"copied":1,"failed":1,"total":4}"#);
    let text = output::format_outcome(&outcome, OutputFormat::Text, false);
    assert!(text.contains("total: 4"));
}

#[test]
fn test_error_fatality() {
    assert!(ConvertError::PathNotFound { path: "x".into() }.is_fatal());
    assert!(!ConvertError::BinaryFileRejected { path: "x".into() }.is_fatal());
    assert!(
        !ConvertError::UnsupportedEncoding {
            label: "x".into(),
            path: Some("f".into())
        }
        .is_fatal()
    );
}
