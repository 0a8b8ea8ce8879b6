//! PostgreSQL implementation of PresentationRepository.
//!
//! Each presentation is one row: a handful of indexed columns plus the whole
//! aggregate as a JSONB document. `revision` is the optimistic-locking
//! counter; an update only lands if the row is still at the revision the
//! aggregate was loaded at.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, PresentationId, SessionId, TenantId, Timestamp,
};
use crate::domain::presentation::{Presentation, PresentationSummary, SemanticVersion};
use crate::ports::PresentationRepository;

/// `?` on the sessions object can use the GIN index on `document -> 'sessions'`.
const FIND_BY_SESSION_SQL: &str = r#"
    SELECT document, revision FROM presentations
    WHERE tenant_id = $1 AND document -> 'sessions' ? $2
"#;

#[derive(Clone)]
pub struct PostgresPresentationRepository {
    pool: PgPool,
}

impl PostgresPresentationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresentationRepository for PostgresPresentationRepository {
    async fn save(
        &self,
        tenant_id: &TenantId,
        presentation: &Presentation,
    ) -> Result<(), DomainError> {
        if !presentation.belongs_to(tenant_id) {
            return Err(DomainError::validation(
                "tenant_id",
                "presentation belongs to a different tenant",
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO presentations (
                id, tenant_id, title, document, revision, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(presentation.id().as_uuid())
        .bind(tenant_id.as_str())
        .bind(presentation.title())
        .bind(to_document(presentation)?)
        .bind(presentation.revision() as i64)
        .bind(presentation.created_at().as_datetime())
        .bind(presentation.updated_at().as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::conflict(format!(
                    "Presentation {} already exists",
                    presentation.id()
                )))
            }
            Err(e) => Err(db_error("insert presentation", e)),
        }
    }

    async fn update(
        &self,
        tenant_id: &TenantId,
        presentation: &Presentation,
    ) -> Result<u64, DomainError> {
        let revision = presentation.revision() + 1;
        let mut next = presentation.clone();
        next.set_revision(revision);

        let result = sqlx::query(
            r#"
            UPDATE presentations SET
                title = $3,
                document = $4,
                revision = $5,
                updated_at = $6
            WHERE id = $1 AND tenant_id = $2 AND revision = $7
            "#,
        )
        .bind(presentation.id().as_uuid())
        .bind(tenant_id.as_str())
        .bind(next.title())
        .bind(to_document(&next)?)
        .bind(revision as i64)
        .bind(next.updated_at().as_datetime())
        .bind(presentation.revision() as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update presentation", e))?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM presentations WHERE id = $1 AND tenant_id = $2)",
            )
            .bind(presentation.id().as_uuid())
            .bind(tenant_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check presentation", e))?;

            return if exists {
                Err(DomainError::conflict(format!(
                    "Presentation {} changed since revision {}",
                    presentation.id(),
                    presentation.revision()
                )))
            } else {
                Err(DomainError::new(
                    ErrorCode::PresentationNotFound,
                    format!("Presentation not found: {}", presentation.id()),
                ))
            };
        }

        Ok(revision)
    }

    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: PresentationId,
    ) -> Result<Option<Presentation>, DomainError> {
        let row = sqlx::query(
            "SELECT document, revision FROM presentations WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id.as_uuid())
        .bind(tenant_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch presentation", e))?;

        row.map(row_to_presentation).transpose()
    }

    async fn find_by_session(
        &self,
        tenant_id: &TenantId,
        session_id: SessionId,
    ) -> Result<Option<Presentation>, DomainError> {
        let row = sqlx::query(FIND_BY_SESSION_SQL)
            .bind(tenant_id.as_str())
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch presentation by session", e))?;

        row.map(row_to_presentation).transpose()
    }

    async fn list_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<PresentationSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, updated_at,
                   document ->> 'version' AS version,
                   COALESCE((document ->> 'is_published')::boolean, false) AS is_published,
                   jsonb_array_length(document -> 'slides') AS slide_count,
                   (SELECT count(*) FROM jsonb_object_keys(document -> 'sessions')) AS session_count
            FROM presentations
            WHERE tenant_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list presentations", e))?;

        rows.into_iter().map(row_to_summary).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Row mapping
// ════════════════════════════════════════════════════════════════════════════

fn to_document(presentation: &Presentation) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(presentation).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize presentation: {}", e),
        )
    })
}

fn row_to_presentation(row: PgRow) -> Result<Presentation, DomainError> {
    let document: serde_json::Value = row
        .try_get("document")
        .map_err(|e| db_error("read document", e))?;
    let revision: i64 = row
        .try_get("revision")
        .map_err(|e| db_error("read revision", e))?;
    from_document(document, revision)
}

/// The `revision` column wins over whatever the document recorded.
fn from_document(document: serde_json::Value, revision: i64) -> Result<Presentation, DomainError> {
    let mut presentation: Presentation = serde_json::from_value(document).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Corrupt presentation document: {}", e),
        )
    })?;
    presentation.set_revision(revision as u64);
    Ok(presentation)
}

fn row_to_summary(row: PgRow) -> Result<PresentationSummary, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| db_error("read id", e))?;
    let version: Option<String> = row
        .try_get("version")
        .map_err(|e| db_error("read version", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| db_error("read updated_at", e))?;
    let slide_count: i32 = row
        .try_get("slide_count")
        .map_err(|e| db_error("read slide_count", e))?;
    let session_count: i64 = row
        .try_get("session_count")
        .map_err(|e| db_error("read session_count", e))?;

    let version = match version {
        Some(raw) => raw.parse::<SemanticVersion>().map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Corrupt version: {}", e))
        })?,
        None => SemanticVersion::INITIAL,
    };

    Ok(PresentationSummary {
        id: PresentationId::from_uuid(id),
        title: row.try_get("title").map_err(|e| db_error("read title", e))?,
        version,
        is_published: row
            .try_get("is_published")
            .map_err(|e| db_error("read is_published", e))?,
        slide_count: slide_count.max(0) as usize,
        session_count: session_count.max(0) as usize,
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}
