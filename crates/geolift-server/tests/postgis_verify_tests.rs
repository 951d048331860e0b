//! PgCatalog tests against a real PostgreSQL instance
//!
//! Docker-gated; run with `cargo test -- --ignored` when a Docker daemon
//! is available. Geometry detection only needs a column named `geom`, so
//! plain PostgreSQL stands in for PostGIS here.

mod common;

use geolift_server::ingest::{ImportVerifier, PgCatalog, PipelineError, TableCatalog};

use common::{init_test_tracing, TestPostgres};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_catalog_reports_columns_in_ordinal_order() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres container");

    sqlx::query("CREATE TABLE upload_parcels (gid integer PRIMARY KEY, name text, geom bytea)")
        .execute(pg.pool())
        .await
        .unwrap();

    let catalog = PgCatalog::new(pg.pool_clone());
    let columns = catalog.table_columns("upload_parcels").await.unwrap();

    let names: Vec<&str> = columns.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(names, ["gid", "name", "geom"]);
    assert_eq!(columns[0].data_type, "integer");

    let result = ImportVerifier::verify(&catalog, "upload_parcels")
        .await
        .unwrap();
    assert!(result.has_geometry);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_missing_table_is_verification_fault() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres container");
    let catalog = PgCatalog::new(pg.pool_clone());

    let err = ImportVerifier::verify(&catalog, "never_imported")
        .await
        .unwrap_err();

    match err {
        PipelineError::Verification(msg) => {
            assert_eq!(msg, "Table 'never_imported' not found in database");
        }
        other => panic!("expected Verification, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_attribute_only_table_has_no_geometry() {
    init_test_tracing();
    let pg = TestPostgres::start().await.expect("postgres container");

    sqlx::query("CREATE TABLE attributes_only (gid integer, label text)")
        .execute(pg.pool())
        .await
        .unwrap();

    let catalog = PgCatalog::new(pg.pool_clone());
    let result = ImportVerifier::verify(&catalog, "attributes_only")
        .await
        .unwrap();

    assert!(!result.has_geometry);
    assert_eq!(result.columns.len(), 2);
}
