//! PostgreSQL implementation of DomainModelStore and AuditLog.
//!
//! A write runs in one transaction: take the project's advisory lock, load
//! the aggregate, apply the command, persist the resulting `ModelChange`
//! and its audit record, commit. Concurrent writers to the same project
//! queue on the lock, so the aggregate's checks always see committed state.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::audit::AuditRecord;
use crate::domain::foundation::{
    ActorId, AttributeId, AuditRecordId, ClassId, DomainError, ErrorCode, IdentityId, ProjectId,
    RelationId, Timestamp,
};
use crate::domain::model::{
    AttributeChanges, ClassChanges, ConstraintConfig, DomainAttribute, DomainClass,
    DomainIdentity, DomainModel, DomainRelation, IdentityDefinition, ModelChange, ModelSnapshot,
    NewAttribute, NewClass, NewRelation, RelationChanges,
};
use crate::ports::{AuditLog, DomainModelStore};

use super::errors::{db_error, decode};

/// PostgreSQL-backed domain model store.
#[derive(Clone)]
pub struct PostgresDomainModelStore {
    pool: PgPool,
}

impl PostgresDomainModelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs one write against the freshly loaded aggregate.
    ///
    /// Returns the aggregate as the command left it, plus the change when
    /// there was one. A `None` change rolls back without writing an audit
    /// record.
    async fn mutate<F>(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        op: F,
    ) -> Result<(DomainModel, Option<ModelChange>), DomainError>
    where
        F: FnOnce(&mut DomainModel) -> Result<Option<ModelChange>, DomainError> + Send,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("model:{}", project_id))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("lock domain model", e))?;

        let mut model = load_model(&mut *tx, project_id).await?;
        let Some(change) = op(&mut model)? else {
            tx.rollback()
                .await
                .map_err(|e| db_error("roll back transaction", e))?;
            return Ok((model, None));
        };

        persist_change(&mut tx, project_id, &change).await?;
        insert_audit_record(
            &mut tx,
            &AuditRecord::for_change(*project_id, *actor_id, &change),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit transaction", e))?;
        Ok((model, Some(change)))
    }

    async fn apply<F>(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        op: F,
    ) -> Result<ModelChange, DomainError>
    where
        F: FnOnce(&mut DomainModel) -> Result<ModelChange, DomainError> + Send,
    {
        self.mutate(project_id, actor_id, |m| op(m).map(Some))
            .await?
            .1
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "Write produced no change"))
    }

    async fn read_model(&self, project_id: &ProjectId) -> Result<DomainModel, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        load_model(&mut *conn, project_id).await
    }
}

fn not_found(code: ErrorCode, what: &str) -> DomainError {
    DomainError::new(code, format!("{} not found", what))
}

#[async_trait]
impl DomainModelStore for PostgresDomainModelStore {
    async fn get_model(&self, project_id: &ProjectId) -> Result<ModelSnapshot, DomainError> {
        Ok(self.read_model(project_id).await?.into_snapshot())
    }

    async fn find_class_by_id(
        &self,
        project_id: &ProjectId,
        class_id: &ClassId,
    ) -> Result<Option<DomainClass>, DomainError> {
        Ok(self.read_model(project_id).await?.class(class_id).cloned())
    }

    async fn find_class_by_name(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<Option<DomainClass>, DomainError> {
        Ok(self.read_model(project_id).await?.class_by_name(name).cloned())
    }

    async fn create_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewClass,
    ) -> Result<DomainClass, DomainError> {
        self.apply(project_id, actor_id, |m| m.create_class(input))
            .await?
            .into_class()
    }

    async fn update_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        class_id: &ClassId,
        changes: ClassChanges,
    ) -> Result<DomainClass, DomainError> {
        match self
            .mutate(project_id, actor_id, |m| m.update_class(class_id, changes))
            .await?
        {
            (_, Some(change)) => change.into_class(),
            (model, None) => model
                .class(class_id)
                .cloned()
                .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class")),
        }
    }

    async fn delete_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        class_id: &ClassId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.delete_class(class_id)).await?;
        Ok(())
    }

    async fn create_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewAttribute,
    ) -> Result<DomainAttribute, DomainError> {
        self.apply(project_id, actor_id, |m| m.create_attribute(input))
            .await?
            .into_attribute()
    }

    async fn update_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        attribute_id: &AttributeId,
        changes: AttributeChanges,
    ) -> Result<DomainAttribute, DomainError> {
        match self
            .mutate(project_id, actor_id, |m| m.update_attribute(attribute_id, changes))
            .await?
        {
            (_, Some(change)) => change.into_attribute(),
            (model, None) => model
                .attribute(attribute_id)
                .cloned()
                .ok_or_else(|| not_found(ErrorCode::AttributeNotFound, "Attribute")),
        }
    }

    async fn delete_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        attribute_id: &AttributeId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.delete_attribute(attribute_id))
            .await?;
        Ok(())
    }

    async fn create_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewRelation,
    ) -> Result<DomainRelation, DomainError> {
        self.apply(project_id, actor_id, |m| m.create_relation(input))
            .await?
            .into_relation()
    }

    async fn update_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        relation_id: &RelationId,
        changes: RelationChanges,
    ) -> Result<DomainRelation, DomainError> {
        match self
            .mutate(project_id, actor_id, |m| m.update_relation(relation_id, changes))
            .await?
        {
            (_, Some(change)) => change.into_relation(),
            (model, None) => model
                .relation(relation_id)
                .cloned()
                .ok_or_else(|| not_found(ErrorCode::RelationNotFound, "Relation")),
        }
    }

    async fn delete_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        relation_id: &RelationId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.delete_relation(relation_id))
            .await?;
        Ok(())
    }

    async fn define_identity(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        definition: IdentityDefinition,
    ) -> Result<DomainIdentity, DomainError> {
        self.apply(project_id, actor_id, |m| m.define_identity(definition))
            .await?
            .into_identity()
    }

    async fn remove_identity(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        identity_id: &IdentityId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.remove_identity(identity_id))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for PostgresDomainModelStore {
    async fn list_recent(
        &self,
        project_id: &ProjectId,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            r#"
            SELECT id, project_id, action, entity, entity_id, actor_id, detail, created_at
            FROM domain_audit_records
            WHERE project_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(project_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list audit records", e))?;

        rows.into_iter().map(AuditRow::into_record).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Loading
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct ClassRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AttributeRow {
    id: Uuid,
    class_id: Uuid,
    name: String,
    #[sqlx(rename = "type")]
    attribute_type: String,
    required: bool,
    config: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    class_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityLinkRow {
    identity_id: Uuid,
    attribute_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct RelationRow {
    id: Uuid,
    source_class_id: Uuid,
    target_class_id: Uuid,
    name: Option<String>,
    source_role: Option<String>,
    target_role: Option<String>,
    source_multiplicity: String,
    target_multiplicity: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    project_id: Uuid,
    action: String,
    entity: String,
    entity_id: Uuid,
    actor_id: Uuid,
    detail: Value,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_record(self) -> Result<AuditRecord, DomainError> {
        Ok(AuditRecord {
            id: AuditRecordId::from_uuid(self.id),
            project_id: ProjectId::from_uuid(self.project_id),
            action: decode("action", &self.action)?,
            entity: decode("entity", &self.entity)?,
            entity_id: self.entity_id,
            actor_id: ActorId::from_uuid(self.actor_id),
            detail: self.detail,
            created_at: Timestamp::from_datetime(self.created_at),
        })
    }
}

async fn load_model(
    conn: &mut PgConnection,
    project_id: &ProjectId,
) -> Result<DomainModel, DomainError> {
    let class_rows: Vec<ClassRow> = sqlx::query_as(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM domain_classes
        WHERE project_id = $1
        "#,
    )
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("load classes", e))?;

    let attribute_rows: Vec<AttributeRow> = sqlx::query_as(
        r#"
        SELECT a.id, a.class_id, a.name, a.type, a.required, a.config,
               a.created_at, a.updated_at
        FROM domain_attributes a
        JOIN domain_classes c ON c.id = a.class_id
        WHERE c.project_id = $1
        ORDER BY a.class_id, a.position
        "#,
    )
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("load attributes", e))?;

    let identity_rows: Vec<IdentityRow> = sqlx::query_as(
        r#"
        SELECT i.id, i.class_id, i.name, i.description, i.created_at, i.updated_at
        FROM domain_identities i
        JOIN domain_classes c ON c.id = i.class_id
        WHERE c.project_id = $1
        ORDER BY i.class_id, i.created_at, i.id
        "#,
    )
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("load identities", e))?;

    let link_rows: Vec<IdentityLinkRow> = sqlx::query_as(
        r#"
        SELECT l.identity_id, l.attribute_id
        FROM domain_identity_attributes l
        JOIN domain_identities i ON i.id = l.identity_id
        JOIN domain_classes c ON c.id = i.class_id
        WHERE c.project_id = $1
        ORDER BY l.identity_id, l.position
        "#,
    )
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("load identity attributes", e))?;

    let relation_rows: Vec<RelationRow> = sqlx::query_as(
        r#"
        SELECT id, source_class_id, target_class_id, name, source_role, target_role,
               source_multiplicity, target_multiplicity, created_at, updated_at
        FROM domain_relations
        WHERE project_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(project_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| db_error("load relations", e))?;

    let mut links: HashMap<Uuid, Vec<AttributeId>> = HashMap::new();
    for link in link_rows {
        links
            .entry(link.identity_id)
            .or_default()
            .push(AttributeId::from_uuid(link.attribute_id));
    }

    let mut attributes: HashMap<Uuid, Vec<DomainAttribute>> = HashMap::new();
    for row in attribute_rows {
        let config = row
            .config
            .map(serde_json::from_value::<ConstraintConfig>)
            .transpose()
            .map_err(|e| corrupt_json("config", e))?;
        attributes
            .entry(row.class_id)
            .or_default()
            .push(DomainAttribute {
                id: AttributeId::from_uuid(row.id),
                class_id: ClassId::from_uuid(row.class_id),
                name: row.name,
                attribute_type: decode("type", &row.attribute_type)?,
                required: row.required,
                config,
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
            });
    }

    let mut identities: HashMap<Uuid, Vec<DomainIdentity>> = HashMap::new();
    for row in identity_rows {
        identities
            .entry(row.class_id)
            .or_default()
            .push(DomainIdentity {
                id: IdentityId::from_uuid(row.id),
                class_id: ClassId::from_uuid(row.class_id),
                name: row.name,
                description: row.description,
                attribute_ids: links.remove(&row.id).unwrap_or_default(),
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
            });
    }

    let classes = class_rows
        .into_iter()
        .map(|row| DomainClass {
            id: ClassId::from_uuid(row.id),
            project_id: *project_id,
            name: row.name,
            description: row.description,
            attributes: attributes.remove(&row.id).unwrap_or_default(),
            identities: identities.remove(&row.id).unwrap_or_default(),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
        .collect();

    let relations = relation_rows
        .into_iter()
        .map(|row| {
            Ok(DomainRelation {
                id: RelationId::from_uuid(row.id),
                project_id: *project_id,
                source_class_id: ClassId::from_uuid(row.source_class_id),
                target_class_id: ClassId::from_uuid(row.target_class_id),
                name: row.name,
                source_role: row.source_role,
                target_role: row.target_role,
                source_multiplicity: decode("source_multiplicity", &row.source_multiplicity)?,
                target_multiplicity: decode("target_multiplicity", &row.target_multiplicity)?,
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(DomainModel::reconstitute(*project_id, classes, relations))
}

fn corrupt_json(column: &str, e: serde_json::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Corrupt value in column {}: {}", column, e),
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Persisting changes
// ════════════════════════════════════════════════════════════════════════════════

async fn persist_change(
    tx: &mut Transaction<'_, Postgres>,
    project_id: &ProjectId,
    change: &ModelChange,
) -> Result<(), DomainError> {
    match change {
        ModelChange::ClassCreated(class) => {
            sqlx::query(
                r#"
                INSERT INTO domain_classes (id, project_id, name, description, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(class.id.as_uuid())
            .bind(project_id.as_uuid())
            .bind(&class.name)
            .bind(&class.description)
            .bind(class.created_at.as_datetime())
            .bind(class.updated_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("insert class", e))?;
        }
        ModelChange::ClassUpdated(class) => {
            sqlx::query(
                r#"
                UPDATE domain_classes SET name = $2, description = $3, updated_at = $4
                WHERE id = $1
                "#,
            )
            .bind(class.id.as_uuid())
            .bind(&class.name)
            .bind(&class.description)
            .bind(class.updated_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("update class", e))?;
        }
        // Attributes, identities and their links go with the class.
        ModelChange::ClassDeleted(class) => {
            delete_by_id(
                tx,
                "DELETE FROM domain_classes WHERE id = $1",
                class.id.as_uuid(),
                "delete class",
            )
            .await?;
        }
        ModelChange::AttributeCreated(attribute) => {
            sqlx::query(
                r#"
                INSERT INTO domain_attributes (
                    id, class_id, name, type, required, config, position, created_at, updated_at
                ) VALUES (
                    $1, $2, $3, $4, $5, $6,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM domain_attributes WHERE class_id = $2),
                    $7, $8
                )
                "#,
            )
            .bind(attribute.id.as_uuid())
            .bind(attribute.class_id.as_uuid())
            .bind(&attribute.name)
            .bind(attribute.attribute_type.as_str())
            .bind(attribute.required)
            .bind(config_json(&attribute.config)?)
            .bind(attribute.created_at.as_datetime())
            .bind(attribute.updated_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("insert attribute", e))?;
        }
        ModelChange::AttributeUpdated(attribute) => {
            sqlx::query(
                r#"
                UPDATE domain_attributes
                SET name = $2, type = $3, required = $4, config = $5, updated_at = $6
                WHERE id = $1
                "#,
            )
            .bind(attribute.id.as_uuid())
            .bind(&attribute.name)
            .bind(attribute.attribute_type.as_str())
            .bind(attribute.required)
            .bind(config_json(&attribute.config)?)
            .bind(attribute.updated_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("update attribute", e))?;
        }
        ModelChange::AttributeDeleted(attribute) => {
            delete_by_id(
                tx,
                "DELETE FROM domain_attributes WHERE id = $1",
                attribute.id.as_uuid(),
                "delete attribute",
            )
            .await?;
        }
        ModelChange::RelationCreated(relation) => {
            sqlx::query(
                r#"
                INSERT INTO domain_relations (
                    id, project_id, source_class_id, target_class_id, name, source_role,
                    target_role, source_multiplicity, target_multiplicity, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(relation.id.as_uuid())
            .bind(project_id.as_uuid())
            .bind(relation.source_class_id.as_uuid())
            .bind(relation.target_class_id.as_uuid())
            .bind(&relation.name)
            .bind(&relation.source_role)
            .bind(&relation.target_role)
            .bind(relation.source_multiplicity.as_str())
            .bind(relation.target_multiplicity.as_str())
            .bind(relation.created_at.as_datetime())
            .bind(relation.updated_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("insert relation", e))?;
        }
        ModelChange::RelationUpdated(relation) => {
            sqlx::query(
                r#"
                UPDATE domain_relations
                SET name = $2, source_role = $3, target_role = $4,
                    source_multiplicity = $5, target_multiplicity = $6, updated_at = $7
                WHERE id = $1
                "#,
            )
            .bind(relation.id.as_uuid())
            .bind(&relation.name)
            .bind(&relation.source_role)
            .bind(&relation.target_role)
            .bind(relation.source_multiplicity.as_str())
            .bind(relation.target_multiplicity.as_str())
            .bind(relation.updated_at.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("update relation", e))?;
        }
        ModelChange::RelationDeleted(relation) => {
            delete_by_id(
                tx,
                "DELETE FROM domain_relations WHERE id = $1",
                relation.id.as_uuid(),
                "delete relation",
            )
            .await?;
        }
        ModelChange::IdentityDefined { identity, replaced } => {
            if *replaced {
                sqlx::query(
                    r#"
                    UPDATE domain_identities SET name = $2, description = $3, updated_at = $4
                    WHERE id = $1
                    "#,
                )
                .bind(identity.id.as_uuid())
                .bind(&identity.name)
                .bind(&identity.description)
                .bind(identity.updated_at.as_datetime())
                .execute(&mut **tx)
                .await
                .map_err(|e| db_error("update identity", e))?;

                delete_by_id(
                    tx,
                    "DELETE FROM domain_identity_attributes WHERE identity_id = $1",
                    identity.id.as_uuid(),
                    "clear identity attributes",
                )
                .await?;
            } else {
                sqlx::query(
                    r#"
                    INSERT INTO domain_identities (id, class_id, name, description, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(identity.id.as_uuid())
                .bind(identity.class_id.as_uuid())
                .bind(&identity.name)
                .bind(&identity.description)
                .bind(identity.created_at.as_datetime())
                .bind(identity.updated_at.as_datetime())
                .execute(&mut **tx)
                .await
                .map_err(|e| db_error("insert identity", e))?;
            }

            for (position, attribute_id) in identity.attribute_ids.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO domain_identity_attributes (identity_id, attribute_id, position)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(identity.id.as_uuid())
                .bind(attribute_id.as_uuid())
                .bind(position as i32)
                .execute(&mut **tx)
                .await
                .map_err(|e| db_error("insert identity attribute", e))?;
            }
        }
        ModelChange::IdentityRemoved(identity) => {
            delete_by_id(
                tx,
                "DELETE FROM domain_identities WHERE id = $1",
                identity.id.as_uuid(),
                "delete identity",
            )
            .await?;
        }
    }
    Ok(())
}

async fn delete_by_id(
    tx: &mut Transaction<'_, Postgres>,
    sql: &str,
    id: &Uuid,
    context: &str,
) -> Result<(), DomainError> {
    sqlx::query(sql)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error(context, e))?;
    Ok(())
}

fn config_json(config: &Option<ConstraintConfig>) -> Result<Option<Value>, DomainError> {
    config
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("Failed to encode config: {}", e)))
}

async fn insert_audit_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &AuditRecord,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO domain_audit_records (
            id, project_id, action, entity, entity_id, actor_id, detail, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(record.id.as_uuid())
    .bind(record.project_id.as_uuid())
    .bind(record.action.as_str())
    .bind(record.entity.as_str())
    .bind(record.entity_id)
    .bind(record.actor_id.as_uuid())
    .bind(&record.detail)
    .bind(record.created_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("insert audit record", e))?;
    Ok(())
}
