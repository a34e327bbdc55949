use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("layercard_unit").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn reads_relative_paths_from_working_dir() {
    let dir = scratch_dir("fetch_relative");
    std::fs::write(dir.join("blob.bin"), b"abc").unwrap();

    let fetcher = LocatorFetcher::new(FetchOpts {
        working_dir: dir.clone(),
        ..FetchOpts::default()
    });
    assert_eq!(fetcher.fetch_bytes("blob.bin").unwrap(), b"abc");

    let abs = dir.join("blob.bin").canonicalize().unwrap();
    let abs = abs.to_string_lossy().to_string();
    assert_eq!(fetcher.fetch_bytes(&abs).unwrap(), b"abc");
}

#[test]
fn missing_file_is_asset_fetch_error() {
    let fetcher = LocatorFetcher::new(FetchOpts {
        working_dir: scratch_dir("fetch_missing"),
        ..FetchOpts::default()
    });
    let err = fetcher.fetch_bytes("nope/missing.png").unwrap_err();
    assert!(matches!(err, LayercardError::AssetFetch(_)));
    assert!(err.to_string().contains("missing.png"));
}

#[test]
fn object_urls_follow_region_or_endpoint() {
    let fetcher = LocatorFetcher::new(FetchOpts {
        region: "eu-west-3".to_owned(),
        ..FetchOpts::default()
    });
    assert_eq!(
        fetcher.object_url("cards", "users/1/a.png"),
        "https://cards.s3.eu-west-3.amazonaws.com/users/1/a.png"
    );

    let fetcher = LocatorFetcher::new(FetchOpts {
        endpoint: Some("http://localhost:9000/".to_owned()),
        ..FetchOpts::default()
    });
    assert_eq!(
        fetcher.object_url("cards", "a.png"),
        "http://localhost:9000/cards/a.png"
    );
}

#[test]
fn fetch_opts_deserialize_with_defaults() {
    let opts: FetchOpts =
        serde_json::from_str(r#"{"workingDir": "/srv", "region": "eu-west-3"}"#).unwrap();
    assert_eq!(opts.working_dir, PathBuf::from("/srv"));
    assert_eq!(opts.region, "eu-west-3");
    assert_eq!(opts.timeout_secs, 30);
    assert!(opts.endpoint.is_none());
}

#[test]
fn memory_fetcher_hits_and_misses() {
    let fetcher = MemoryFetcher::new().with("mem://a", vec![1, 2, 3]);
    assert_eq!(fetcher.fetch_bytes("mem://a").unwrap(), vec![1, 2, 3]);
    assert!(matches!(
        fetcher.fetch_bytes("mem://b"),
        Err(LayercardError::AssetFetch(_))
    ));
}
