//! Post-import verification against the database schema catalog

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};

use super::{PipelineError, Result};

/// One column of the imported table as the catalog reports it
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
}

/// Capability seam over the schema-catalog lookup. Production queries
/// `information_schema`; tests substitute fakes.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Columns of `table_name` in ordinal order; empty when the table
    /// does not exist.
    async fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>>;
}

/// Catalog lookup against a live Postgres pool
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TableCatalog for PgCatalog {
    async fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>> {
        // information_schema columns are sql_identifier domains; cast to
        // text so they decode as plain strings.
        let columns = sqlx::query_as::<_, ColumnInfo>(
            "SELECT column_name::text AS column_name, data_type::text AS data_type \
             FROM information_schema.columns \
             WHERE table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| PipelineError::Verification(err.to_string()))?;

        Ok(columns)
    }
}

/// What verification observed about the imported table
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub columns: Vec<ColumnInfo>,
    pub has_geometry: bool,
}

/// Confirms the imported table exists and looks for its geometry column.
///
/// A missing table is a hard fault. A table without a recognizable
/// geometry column is only warned about; attribute-only datasets are
/// still publishable.
pub struct ImportVerifier;

impl ImportVerifier {
    pub async fn verify(
        catalog: &dyn TableCatalog,
        table_name: &str,
    ) -> Result<VerificationResult> {
        let columns = catalog.table_columns(table_name).await?;

        if columns.is_empty() {
            return Err(PipelineError::Verification(format!(
                "Table '{table_name}' not found in database"
            )));
        }

        let has_geometry = columns
            .iter()
            .any(|column| column.column_name == "geom" || column.data_type == "USER-DEFINED");

        if has_geometry {
            info!(
                table = table_name,
                columns = columns.len(),
                "verified imported table"
            );
        } else {
            warn!(table = table_name, "no geometry column found in table");
        }

        Ok(VerificationResult {
            columns,
            has_geometry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeCatalog {
        rows: Vec<ColumnInfo>,
    }

    #[async_trait]
    impl TableCatalog for FakeCatalog {
        async fn table_columns(&self, _table_name: &str) -> Result<Vec<ColumnInfo>> {
            Ok(self.rows.clone())
        }
    }

    fn column(name: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo {
            column_name: name.to_string(),
            data_type: data_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_hard_fault() {
        let catalog = FakeCatalog { rows: vec![] };

        let err = ImportVerifier::verify(&catalog, "parcels")
            .await
            .unwrap_err();

        match err {
            PipelineError::Verification(msg) => {
                assert_eq!(msg, "Table 'parcels' not found in database");
            }
            other => panic!("expected Verification, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_geometry_detected_by_column_name() {
        let catalog = FakeCatalog {
            rows: vec![column("gid", "integer"), column("geom", "USER-DEFINED")],
        };

        let result = ImportVerifier::verify(&catalog, "parcels").await.unwrap();

        assert!(result.has_geometry);
        assert_eq!(result.columns.len(), 2);
    }

    #[tokio::test]
    async fn test_geometry_detected_by_declared_type() {
        let catalog = FakeCatalog {
            rows: vec![
                column("gid", "integer"),
                column("wkb_geometry", "USER-DEFINED"),
            ],
        };

        let result = ImportVerifier::verify(&catalog, "parcels").await.unwrap();

        assert!(result.has_geometry);
    }

    #[tokio::test]
    async fn test_missing_geometry_is_soft() {
        let catalog = FakeCatalog {
            rows: vec![column("gid", "integer"), column("name", "character varying")],
        };

        let result = ImportVerifier::verify(&catalog, "parcels").await.unwrap();

        assert!(!result.has_geometry);
    }

    #[tokio::test]
    async fn test_column_order_preserved() {
        let catalog = FakeCatalog {
            rows: vec![
                column("gid", "integer"),
                column("name", "character varying"),
                column("geom", "USER-DEFINED"),
            ],
        };

        let result = ImportVerifier::verify(&catalog, "parcels").await.unwrap();

        let names: Vec<&str> = result
            .columns
            .iter()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(names, ["gid", "name", "geom"]);
    }
}
