use finsight_index::{IndexEntry, MetadataFilter, VectorIndex};

fn entry(
    chunk_id: &str,
    document_id: &str,
    ticker: &str,
    doc_type: &str,
    fiscal_year: Option<i32>,
    vector: [f32; 4],
) -> IndexEntry {
    IndexEntry {
        chunk_id: chunk_id.to_string(),
        document_id: document_id.to_string(),
        ticker: ticker.to_string(),
        doc_type: doc_type.to_string(),
        fiscal_year,
        text: format!("text of {chunk_id}"),
        vector: vector.to_vec(),
    }
}

#[tokio::test]
async fn search_returns_nearest_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = VectorIndex::new(&dir.path().join("vectors.lance"), 4)
        .await
        .unwrap();

    index
        .upsert(&[
            entry("c1", "d1", "AAPL", "10-K", Some(2023), [1.0, 0.0, 0.0, 0.0]),
            entry("c2", "d1", "AAPL", "10-K", Some(2023), [0.0, 1.0, 0.0, 0.0]),
            entry("c3", "d1", "AAPL", "10-K", Some(2023), [0.0, 0.0, 1.0, 0.0]),
        ])
        .await
        .unwrap();

    let results = index
        .search(&[1.0, 0.1, 0.0, 0.0], 2, &MetadataFilter::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk_id, "c1");
    assert!(results[0].score > results[1].score);
    assert!(results[0].score <= 1.0);
}

#[tokio::test]
async fn empty_index_returns_no_results() {
    let dir = tempfile::tempdir().unwrap();
    let index = VectorIndex::new(&dir.path().join("vectors.lance"), 4)
        .await
        .unwrap();

    let results = index
        .search(&[1.0, 0.0, 0.0, 0.0], 5, &MetadataFilter::default())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn metadata_filter_excludes_other_tickers() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = VectorIndex::new(&dir.path().join("vectors.lance"), 4)
        .await
        .unwrap();

    index
        .upsert(&[
            entry("c1", "d1", "AAPL", "10-K", Some(2023), [1.0, 0.0, 0.0, 0.0]),
            entry("c2", "d2", "TSLA", "10-K", Some(2023), [1.0, 0.0, 0.0, 0.1]),
        ])
        .await
        .unwrap();

    let filter = MetadataFilter {
        ticker: Some("TSLA".to_string()),
        ..Default::default()
    };
    let results = index.search(&[1.0, 0.0, 0.0, 0.0], 5, &filter).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].metadata.ticker, "TSLA");
}

#[tokio::test]
async fn upsert_replaces_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = VectorIndex::new(&dir.path().join("vectors.lance"), 4)
        .await
        .unwrap();

    index
        .upsert(&[entry("c1", "d1", "AAPL", "10-K", None, [1.0, 0.0, 0.0, 0.0])])
        .await
        .unwrap();
    index
        .upsert(&[entry("c1", "d1", "AAPL", "10-K", None, [0.0, 1.0, 0.0, 0.0])])
        .await
        .unwrap();

    let results = index
        .search(&[0.0, 1.0, 0.0, 0.0], 5, &MetadataFilter::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk_id, "c1");
}

#[tokio::test]
async fn corrupt_existing_index_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vectors.lance");

    // A directory that exists but holds no valid dataset must surface an
    // error rather than be silently treated as a fresh index.
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(path.join("garbage"), b"not a dataset").unwrap();

    let err = VectorIndex::new(&path, 4).await.unwrap_err();
    assert!(matches!(err, finsight_core::Error::Index(_)));
}

#[tokio::test]
async fn dimension_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = VectorIndex::new(&dir.path().join("vectors.lance"), 4)
        .await
        .unwrap();

    let mut bad = entry("c1", "d1", "AAPL", "10-K", None, [1.0, 0.0, 0.0, 0.0]);
    bad.vector = vec![1.0, 0.0];

    let err = index.upsert(&[bad]).await.unwrap_err();
    assert!(matches!(err, finsight_core::Error::Configuration(_)));
}

#[tokio::test]
async fn delete_document_removes_all_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = VectorIndex::new(&dir.path().join("vectors.lance"), 4)
        .await
        .unwrap();

    index
        .upsert(&[
            entry("c1", "d1", "AAPL", "10-K", None, [1.0, 0.0, 0.0, 0.0]),
            entry("c2", "d1", "AAPL", "10-K", None, [0.0, 1.0, 0.0, 0.0]),
            entry("c3", "d2", "TSLA", "10-K", None, [0.0, 0.0, 1.0, 0.0]),
        ])
        .await
        .unwrap();

    index.delete_document("d1").await.unwrap();

    let results = index
        .search(&[1.0, 0.0, 0.0, 0.0], 5, &MetadataFilter::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].metadata.document_id, "d2");

    let ids = index.document_ids().await.unwrap();
    assert_eq!(ids, vec!["d2"]);
}
