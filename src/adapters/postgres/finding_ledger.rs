//! PostgreSQL implementation of FindingLedger.
//!
//! A sync unit of work is one transaction holding a per-project advisory
//! lock, so two syncs for the same project never interleave and readers
//! see either the old ledger or the new one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{ActorId, DomainError, ErrorCode, FindingId, ProjectId, Timestamp};
use crate::domain::validation::{
    sort_for_listing, ElementPath, FindingState, PersistedFinding, RuleDefinition,
    ValidationFinding,
};
use crate::ports::{FindingLedger, LedgerUnitOfWork};

use super::errors::{db_error, decode};

const SELECT_FINDINGS: &str = r#"
    SELECT f.id, f.project_id, f.rule_code, r.name AS rule_name, f.category, f.severity,
           f.message, f.element_type, f.element_id, f.element_name, f.element_path,
           f.suggestion, f.state, f.justification, f.last_actor_id, f.created_at, f.updated_at
    FROM validation_findings f
    JOIN validation_rules r ON r.code = f.rule_code
"#;

/// PostgreSQL-backed finding ledger.
#[derive(Clone)]
pub struct PostgresFindingLedger {
    pool: PgPool,
}

impl PostgresFindingLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FindingLedger for PostgresFindingLedger {
    async fn list(&self, project_id: &ProjectId) -> Result<Vec<PersistedFinding>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        let mut findings = fetch_project_findings(&mut *conn, project_id).await?;
        sort_for_listing(&mut findings);
        Ok(findings)
    }

    async fn find_by_id(
        &self,
        project_id: &ProjectId,
        finding_id: &FindingId,
    ) -> Result<Option<PersistedFinding>, DomainError> {
        let row: Option<FindingRow> =
            sqlx::query_as(&format!("{} WHERE f.project_id = $1 AND f.id = $2", SELECT_FINDINGS))
                .bind(project_id.as_uuid())
                .bind(finding_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("load finding", e))?;

        row.map(FindingRow::into_finding).transpose()
    }

    async fn save_annotation(
        &self,
        finding: &PersistedFinding,
        expected: FindingState,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;
        lock_project_ledger(&mut tx, &finding.project_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE validation_findings
            SET state = $3, justification = $4, last_actor_id = $5, updated_at = $6
            WHERE project_id = $1 AND id = $2 AND state = $7
            "#,
        )
        .bind(finding.project_id.as_uuid())
        .bind(finding.id.as_uuid())
        .bind(finding.state.as_str())
        .bind(&finding.justification)
        .bind(finding.last_actor_id.map(|id| *id.as_uuid()))
        .bind(finding.updated_at.as_datetime())
        .bind(expected.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("save finding annotation", e))?;

        if result.rows_affected() == 0 {
            let stored: Option<String> = sqlx::query_scalar(
                "SELECT state FROM validation_findings WHERE project_id = $1 AND id = $2",
            )
            .bind(finding.project_id.as_uuid())
            .bind(finding.id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("load finding state", e))?;
            return Err(annotation_miss(finding, stored.as_deref()));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit finding annotation", e))
    }

    async fn begin(&self, project_id: &ProjectId) -> Result<Box<dyn LedgerUnitOfWork>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        lock_project_ledger(&mut tx, project_id).await?;

        Ok(Box::new(PostgresLedgerUnitOfWork {
            tx,
            project_id: *project_id,
        }))
    }
}

/// One ledger sync, bound to an open transaction.
pub struct PostgresLedgerUnitOfWork {
    tx: Transaction<'static, Postgres>,
    project_id: ProjectId,
}

#[async_trait]
impl LedgerUnitOfWork for PostgresLedgerUnitOfWork {
    async fn upsert_rules(&mut self, rules: &[RuleDefinition]) -> Result<(), DomainError> {
        for rule in rules {
            sqlx::query(
                r#"
                INSERT INTO validation_rules (code, name, description, category, severity, suggestion, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, now())
                ON CONFLICT (code) DO UPDATE SET
                    name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    category = EXCLUDED.category,
                    severity = EXCLUDED.severity,
                    suggestion = EXCLUDED.suggestion,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(rule.code.as_str())
            .bind(rule.name)
            .bind(rule.description)
            .bind(rule.category.as_str())
            .bind(rule.severity.as_str())
            .bind(rule.suggestion)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error("upsert validation rule", e))?;
        }
        Ok(())
    }

    async fn load_findings(&mut self) -> Result<Vec<PersistedFinding>, DomainError> {
        fetch_project_findings(&mut *self.tx, &self.project_id).await
    }

    async fn insert_finding(&mut self, finding: &PersistedFinding) -> Result<(), DomainError> {
        let f = &finding.finding;
        sqlx::query(
            r#"
            INSERT INTO validation_findings (
                id, project_id, rule_code, category, severity, message, element_type,
                element_id, element_name, element_path, suggestion, state, justification,
                last_actor_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(finding.id.as_uuid())
        .bind(finding.project_id.as_uuid())
        .bind(f.rule_code.as_str())
        .bind(f.category.as_str())
        .bind(f.severity.as_str())
        .bind(&f.message)
        .bind(f.element_type.as_str())
        .bind(f.element_id)
        .bind(&f.element_name)
        .bind(f.element_path.as_str())
        .bind(&f.suggestion)
        .bind(finding.state.as_str())
        .bind(&finding.justification)
        .bind(finding.last_actor_id.map(|id| *id.as_uuid()))
        .bind(finding.created_at.as_datetime())
        .bind(finding.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match db_error("insert finding", e) {
            // A concurrent writer got the same key first.
            err if err.code == ErrorCode::DuplicateName => DomainError::new(
                ErrorCode::ConcurrentModification,
                "Finding was inserted concurrently",
            ),
            err => err,
        })?;
        Ok(())
    }

    async fn update_finding(&mut self, finding: &PersistedFinding) -> Result<(), DomainError> {
        let f = &finding.finding;
        let result = sqlx::query(
            r#"
            UPDATE validation_findings
            SET category = $3, severity = $4, message = $5, element_type = $6,
                element_id = $7, element_name = $8, suggestion = $9, state = $10,
                justification = $11, last_actor_id = $12, updated_at = $13
            WHERE project_id = $1 AND id = $2
            "#,
        )
        .bind(finding.project_id.as_uuid())
        .bind(finding.id.as_uuid())
        .bind(f.category.as_str())
        .bind(f.severity.as_str())
        .bind(&f.message)
        .bind(f.element_type.as_str())
        .bind(f.element_id)
        .bind(&f.element_name)
        .bind(&f.suggestion)
        .bind(finding.state.as_str())
        .bind(&finding.justification)
        .bind(finding.last_actor_id.map(|id| *id.as_uuid()))
        .bind(finding.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("update finding", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::FindingNotFound, "Finding not found")
                .with_detail("finding_id", finding.id.to_string()));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("commit finding ledger", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| db_error("roll back finding ledger", e))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Row mapping
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct FindingRow {
    id: Uuid,
    project_id: Uuid,
    rule_code: String,
    rule_name: String,
    category: String,
    severity: String,
    message: String,
    element_type: String,
    element_id: Option<Uuid>,
    element_name: Option<String>,
    element_path: String,
    suggestion: Option<String>,
    state: String,
    justification: Option<String>,
    last_actor_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FindingRow {
    fn into_finding(self) -> Result<PersistedFinding, DomainError> {
        Ok(PersistedFinding {
            id: FindingId::from_uuid(self.id),
            project_id: ProjectId::from_uuid(self.project_id),
            finding: ValidationFinding {
                rule_code: decode("rule_code", &self.rule_code)?,
                rule_name: self.rule_name,
                category: decode("category", &self.category)?,
                severity: decode("severity", &self.severity)?,
                message: self.message,
                element_type: decode("element_type", &self.element_type)?,
                element_id: self.element_id,
                element_name: self.element_name,
                element_path: ElementPath::from_stored(self.element_path),
                suggestion: self.suggestion,
            },
            state: decode("state", &self.state)?,
            justification: self.justification,
            last_actor_id: self.last_actor_id.map(ActorId::from_uuid),
            created_at: Timestamp::from_datetime(self.created_at),
            updated_at: Timestamp::from_datetime(self.updated_at),
        })
    }
}

/// Takes the per-project ledger lock for the rest of the transaction.
async fn lock_project_ledger(
    tx: &mut Transaction<'static, Postgres>,
    project_id: &ProjectId,
) -> Result<(), DomainError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("findings:{}", project_id))
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("lock finding ledger", e))?;
    Ok(())
}

/// Error for a guarded annotation update that matched no row.
fn annotation_miss(finding: &PersistedFinding, stored_state: Option<&str>) -> DomainError {
    match stored_state {
        None => DomainError::new(ErrorCode::FindingNotFound, "Finding not found")
            .with_detail("finding_id", finding.id.to_string()),
        Some(state) => DomainError::new(
            ErrorCode::ConcurrentModification,
            "Finding changed while it was being annotated",
        )
        .with_detail("finding_id", finding.id.to_string())
        .with_detail("state", state),
    }
}

async fn fetch_project_findings(
    conn: &mut PgConnection,
    project_id: &ProjectId,
) -> Result<Vec<PersistedFinding>, DomainError> {
    let rows: Vec<FindingRow> = sqlx::query_as(&format!("{} WHERE f.project_id = $1", SELECT_FINDINGS))
        .bind(project_id.as_uuid())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| db_error("load findings", e))?;

    rows.into_iter().map(FindingRow::into_finding).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::RuleCode;

    fn row(state: &str, rule_code: &str) -> FindingRow {
        FindingRow {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            rule_code: rule_code.to_string(),
            rule_name: "Class without attributes".to_string(),
            category: "integrity".to_string(),
            severity: "warning".to_string(),
            message: "Class Cliente has no attributes".to_string(),
            element_type: "CLASS".to_string(),
            element_id: Some(Uuid::new_v4()),
            element_name: Some("Cliente".to_string()),
            element_path: "CLASS:abc".to_string(),
            suggestion: None,
            state: state.to_string(),
            justification: None,
            last_actor_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn maps_a_stored_row() {
        let code = RuleCode::ALL[0].as_str();
        let finding = row(FindingState::Open.as_str(), code).into_finding().unwrap();
        assert_eq!(finding.state, FindingState::Open);
        assert_eq!(finding.finding.rule_code.as_str(), code);
        assert_eq!(finding.finding.element_path.as_str(), "CLASS:abc");
    }

    #[test]
    fn unknown_rule_code_is_a_database_error() {
        let err = row(FindingState::Open.as_str(), "NOT_A_RULE")
            .into_finding()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn annotation_miss_on_a_missing_row_is_not_found() {
        let finding = row(FindingState::Open.as_str(), RuleCode::ALL[0].as_str())
            .into_finding()
            .unwrap();
        let err = annotation_miss(&finding, None);
        assert_eq!(err.code, ErrorCode::FindingNotFound);
    }

    #[test]
    fn annotation_miss_on_a_moved_row_is_a_conflict() {
        let finding = row(FindingState::Open.as_str(), RuleCode::ALL[0].as_str())
            .into_finding()
            .unwrap();
        let err = annotation_miss(&finding, Some(FindingState::Resolved.as_str()));
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
        assert_eq!(err.kind(), crate::domain::foundation::ErrorKind::Conflict);
    }
}
