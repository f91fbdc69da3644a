//! Postgres-backed storage.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|-----------------------|------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed, Io, Tls, decode errors | N/A | `Backend` |
//!
//! Enumerations are stored as `TEXT` guarded by `CHECK` constraints and parsed
//! back through the domain `FromStr` impls, so an out-of-vocabulary value in a
//! row surfaces as a `Backend` error instead of being coerced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use mimix_auth::{Identity, Role};
use mimix_catalog::{Library, MimixStatus, Object, ObjectRequest, PromoteStatus, RequestStatus};
use mimix_core::{IdentityId, LibraryId, ObjectId, RequestId};

use super::r#trait::{
    IdentityStore, LibraryStore, ObjectFilter, ObjectStore, RequestStore, StoreError, StoreResult,
    StoredIdentity,
};

const SCHEMA: &str = include_str!("../../../../migrations/0001_init.sql");

const OBJECT_COLUMNS: &str = r#"
    o.id, o.obj, o.obj_type, o.obj_ver, o.lib_id, l.name AS lib, o.promote_date,
    o.mimix_status, o.developer, o.keterangan, o.updated_at
    FROM objects o
    JOIN libraries l ON l.id = o.lib_id
"#;

const REQUEST_FIELDS: &str = r#"
    id, obj_name, requester, developer, req_status, created_at, updated_at,
    lib, obj_ver, obj_type, promote_date, source_obj_id, promote_status
"#;

/// Postgres-backed storage for every entity kind.
///
/// `Send + Sync`; all calls go through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: Arc<PgPool>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema. Idempotent.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityStore for PgStorage {
    #[instrument(skip(self, identity), fields(username = %identity.identity.username), err)]
    async fn insert_identity(&self, identity: &StoredIdentity) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(identity.identity.id.as_uuid())
        .bind(&identity.identity.username)
        .bind(&identity.password_hash)
        .bind(identity.identity.role.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_identity", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn identity_by_username(&self, username: &str) -> StoreResult<Option<StoredIdentity>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role FROM identities WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("identity_by_username", e))?;

        row.map(|row| {
            Ok(StoredIdentity {
                identity: identity_from_row(&row)?,
                password_hash: get(&row, "password_hash")?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self), fields(identity_id = %id), err)]
    async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>> {
        let row = sqlx::query("SELECT id, username, role FROM identities WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("identity_by_id", e))?;

        row.as_ref().map(identity_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl LibraryStore for PgStorage {
    #[instrument(skip(self), err)]
    async fn library_by_name(&self, name: &str) -> StoreResult<Option<Library>> {
        let row = sqlx::query("SELECT id, name FROM libraries WHERE name = $1")
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("library_by_name", e))?;

        row.map(|row| {
            Ok(Library {
                id: LibraryId::from_uuid(get(&row, "id")?),
                name: get(&row, "name")?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, library), fields(name = %library.name), err)]
    async fn insert_library(&self, library: &Library) -> StoreResult<()> {
        sqlx::query("INSERT INTO libraries (id, name) VALUES ($1, $2)")
            .bind(library.id.as_uuid())
            .bind(&library.name)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_library", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStore for PgStorage {
    #[instrument(skip(self, object), fields(object_id = %object.id), err)]
    async fn insert_object(&self, object: &Object) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO objects
                (id, obj, obj_type, obj_ver, lib_id, promote_date, mimix_status, developer, keterangan, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(object.id.as_uuid())
        .bind(&object.name)
        .bind(&object.obj_type)
        .bind(&object.version)
        .bind(object.library_id.as_uuid())
        .bind(object.promote_date)
        .bind(object.status.as_str())
        .bind(&object.developer)
        .bind(object.annotation.as_deref())
        .bind(object.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_object", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(object_id = %id), err)]
    async fn object_by_id(&self, id: ObjectId) -> StoreResult<Option<Object>> {
        let row = sqlx::query(&format!("SELECT {OBJECT_COLUMNS} WHERE o.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("object_by_id", e))?;

        row.as_ref().map(object_from_row).transpose()
    }

    #[instrument(skip(self, object), fields(object_id = %object.id), err)]
    async fn update_object(&self, object: &Object) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE objects
            SET obj = $2, obj_type = $3, obj_ver = $4, lib_id = $5, promote_date = $6,
                mimix_status = $7, developer = $8, keterangan = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(object.id.as_uuid())
        .bind(&object.name)
        .bind(&object.obj_type)
        .bind(&object.version)
        .bind(object.library_id.as_uuid())
        .bind(object.promote_date)
        .bind(object.status.as_str())
        .bind(&object.developer)
        .bind(object.annotation.as_deref())
        .bind(object.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_object", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(object_id = %id), err)]
    async fn set_object_status(
        &self,
        id: ObjectId,
        status: MimixStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE objects SET mimix_status = $2, updated_at = $3 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(status.as_str())
                .bind(now)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("set_object_status", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn set_status_by_name(
        &self,
        name: &str,
        status: MimixStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result =
            sqlx::query("UPDATE objects SET mimix_status = $2, updated_at = $3 WHERE obj = $1")
                .bind(name)
                .bind(status.as_str())
                .bind(now)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("set_status_by_name", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(object_id = %id), err)]
    async fn delete_object(&self, id: ObjectId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM objects WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_object", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn search_objects(&self, query: &str) -> StoreResult<Vec<Object>> {
        let rows = sqlx::query(&format!(
            r#"SELECT {OBJECT_COLUMNS}
            WHERE o.obj ILIKE $1 ESCAPE '\' OR l.name ILIKE $1 ESCAPE '\' OR o.developer ILIKE $1 ESCAPE '\'
            ORDER BY o.updated_at DESC, o.id ASC"#
        ))
        .bind(like_pattern(query))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_objects", e))?;

        rows.iter().map(object_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn objects_where(&self, filter: &ObjectFilter) -> StoreResult<Vec<Object>> {
        let (column, value) = match filter {
            ObjectFilter::Name(v) => ("o.obj", v),
            ObjectFilter::Library(v) => ("l.name", v),
            ObjectFilter::Developer(v) => ("o.developer", v),
        };
        let rows = sqlx::query(&format!(
            "SELECT {OBJECT_COLUMNS} WHERE {column} = $1 ORDER BY o.updated_at DESC, o.id ASC"
        ))
        .bind(value)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("objects_where", e))?;

        rows.iter().map(object_from_row).collect()
    }
}

#[async_trait::async_trait]
impl RequestStore for PgStorage {
    #[instrument(skip(self, request), fields(request_id = %request.id), err)]
    async fn insert_request(&self, request: &ObjectRequest) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO object_requests
                (id, obj_name, requester, developer, req_status, created_at, updated_at,
                 lib, obj_ver, obj_type, promote_date, source_obj_id, promote_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(&request.obj_name)
        .bind(&request.requester)
        .bind(request.developer.as_deref())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .bind(&request.library)
        .bind(&request.version)
        .bind(&request.obj_type)
        .bind(request.promote_date)
        .bind(request.source_obj_id.map(|id| *id.as_uuid()))
        .bind(request.promote_status.map(PromoteStatus::as_str))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_request", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(request_id = %id), err)]
    async fn request_by_id(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>> {
        let row = sqlx::query(&format!("SELECT {REQUEST_FIELDS} FROM object_requests WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("request_by_id", e))?;

        row.as_ref().map(request_from_row).transpose()
    }

    #[instrument(skip(self, request), fields(request_id = %request.id), err)]
    async fn update_request(&self, request: &ObjectRequest) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE object_requests
            SET obj_name = $2, developer = $3, req_status = $4, updated_at = $5, lib = $6,
                obj_ver = $7, obj_type = $8, promote_date = $9, promote_status = $10,
                source_obj_id = $11
            WHERE id = $1
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(&request.obj_name)
        .bind(request.developer.as_deref())
        .bind(request.status.as_str())
        .bind(request.updated_at)
        .bind(&request.library)
        .bind(&request.version)
        .bind(&request.obj_type)
        .bind(request.promote_date)
        .bind(request.promote_status.map(PromoteStatus::as_str))
        .bind(request.source_obj_id.map(|id| *id.as_uuid()))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_request", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(request_id = %id), err)]
    async fn delete_request(&self, id: RequestId) -> StoreResult<Option<ObjectRequest>> {
        let row = sqlx::query(&format!(
            "DELETE FROM object_requests WHERE id = $1 RETURNING {REQUEST_FIELDS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_request", e))?;

        row.as_ref().map(request_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn search_requests(&self, query: &str) -> StoreResult<Vec<ObjectRequest>> {
        let rows = sqlx::query(&format!(
            r#"SELECT {REQUEST_FIELDS} FROM object_requests
            WHERE obj_name ILIKE $1 ESCAPE '\' OR lib ILIKE $1 ESCAPE '\'
               OR requester ILIKE $1 ESCAPE '\' OR developer ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id ASC"#
        ))
        .bind(like_pattern(query))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_requests", e))?;

        rows.iter().map(request_from_row).collect()
    }
}

// Row decoding

fn get<'r, T>(row: &'r PgRow, column: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Backend(format!("failed to decode column '{column}': {e}")))
}

fn parse<T: core::str::FromStr>(column: &str, raw: &str) -> StoreResult<T> {
    raw.parse()
        .map_err(|_| StoreError::Backend(format!("unexpected {column} value '{raw}' in row")))
}

fn identity_from_row(row: &PgRow) -> StoreResult<Identity> {
    let role: String = get(row, "role")?;
    Ok(Identity {
        id: IdentityId::from_uuid(get(row, "id")?),
        username: get(row, "username")?,
        role: parse::<Role>("role", &role)?,
    })
}

fn object_from_row(row: &PgRow) -> StoreResult<Object> {
    let status: String = get(row, "mimix_status")?;
    Ok(Object {
        id: ObjectId::from_uuid(get(row, "id")?),
        name: get(row, "obj")?,
        obj_type: get(row, "obj_type")?,
        version: get(row, "obj_ver")?,
        library: get(row, "lib")?,
        library_id: LibraryId::from_uuid(get(row, "lib_id")?),
        promote_date: get(row, "promote_date")?,
        status: parse::<MimixStatus>("mimix_status", &status)?,
        developer: get(row, "developer")?,
        annotation: get(row, "keterangan")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn request_from_row(row: &PgRow) -> StoreResult<ObjectRequest> {
    let status: String = get(row, "req_status")?;
    let promote_status: Option<String> = get(row, "promote_status")?;
    let source: Option<Uuid> = get(row, "source_obj_id")?;
    Ok(ObjectRequest {
        id: RequestId::from_uuid(get(row, "id")?),
        obj_name: get(row, "obj_name")?,
        requester: get(row, "requester")?,
        developer: get(row, "developer")?,
        status: parse::<RequestStatus>("req_status", &status)?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
        library: get(row, "lib")?,
        version: get(row, "obj_ver")?,
        obj_type: get(row, "obj_type")?,
        promote_date: get(row, "promote_date")?,
        source_obj_id: source.map(ObjectId::from_uuid),
        promote_status: promote_status
            .as_deref()
            .map(|raw| parse::<PromoteStatus>("promote_status", raw))
            .transpose()?,
    })
}

/// `%query%` with LIKE metacharacters escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        let detail = match &err {
            sqlx::Error::Database(db_err) => db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string()),
            _ => err.to_string(),
        };
        return StoreError::UniqueViolation(detail);
    }
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed during {operation}"))
        }
        other => StoreError::Backend(format!("{operation} failed: {other}")),
    }
}

/// Check if a SQLx error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
