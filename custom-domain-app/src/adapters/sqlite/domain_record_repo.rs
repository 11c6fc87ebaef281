//! `DomainRecordRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait,
    sea_query::Expr,
};

use custom_domain_core::error::{CoreError, CoreResult};
use custom_domain_core::traits::DomainRecordRepository;
use custom_domain_core::types::{DnsInstruction, DomainRecord, SslStatus};

use super::SqliteStore;
use super::entity::custom_domain::{self, Column};

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str, field: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}

fn to_i32(value: u32, field: &str) -> CoreResult<i32> {
    i32::try_from(value)
        .map_err(|_| CoreError::SerializationError(format!("{field} out of range: {value}")))
}

fn to_u32(value: i32, field: &str) -> CoreResult<u32> {
    u32::try_from(value)
        .map_err(|_| CoreError::SerializationError(format!("Invalid {field}: {value}")))
}

fn storage_error(action: &'static str) -> impl Fn(DbErr) -> CoreError {
    move |e| CoreError::StorageError(format!("Failed to {action}: {e}"))
}

impl custom_domain::Model {
    /// Convert a `SeaORM` row model into a `DomainRecord`.
    fn into_record(self) -> CoreResult<DomainRecord> {
        let dns_records: Vec<DnsInstruction> = serde_json::from_str(&self.dns_records)
            .map_err(|e| CoreError::SerializationError(format!("Invalid dns_records JSON: {e}")))?;
        let ssl_status: SslStatus = self
            .ssl_status
            .parse()
            .map_err(CoreError::SerializationError)?;
        let last_verification_check = self
            .last_verification_check
            .as_deref()
            .map(|s| parse_timestamp(s, "last_verification_check"))
            .transpose()?;

        Ok(DomainRecord {
            verification_attempts: to_u32(self.verification_attempts, "verification_attempts")?,
            max_verification_attempts: to_u32(
                self.max_verification_attempts,
                "max_verification_attempts",
            )?,
            created_at: parse_timestamp(&self.created_at, "created_at")?,
            updated_at: parse_timestamp(&self.updated_at, "updated_at")?,
            id: self.id,
            owner_id: self.owner_id,
            apex_domain: self.apex_domain,
            subdomain_label: self.subdomain_label,
            full_domain: self.full_domain,
            verification_token: self.verification_token,
            dns_records,
            is_verified: self.is_verified != 0,
            last_verification_check,
            is_active: self.is_active != 0,
            is_default: self.is_default != 0,
            is_blocked: self.is_blocked != 0,
            blocked_reason: self.blocked_reason,
            ssl_status,
            ssl_error: self.ssl_error,
            hosting_domain_id: self.hosting_domain_id,
            hosting_config_id: self.hosting_config_id,
        })
    }
}

/// Convert a `DomainRecord` into a fully populated active model.
fn record_to_active_model(record: &DomainRecord) -> CoreResult<custom_domain::ActiveModel> {
    let dns_records = serde_json::to_string(&record.dns_records)
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;

    Ok(custom_domain::ActiveModel {
        id: Set(record.id.clone()),
        owner_id: Set(record.owner_id.clone()),
        apex_domain: Set(record.apex_domain.clone()),
        subdomain_label: Set(record.subdomain_label.clone()),
        full_domain: Set(record.full_domain.clone()),
        verification_token: Set(record.verification_token.clone()),
        dns_records: Set(dns_records),
        is_verified: Set(i32::from(record.is_verified)),
        verification_attempts: Set(to_i32(
            record.verification_attempts,
            "verification_attempts",
        )?),
        max_verification_attempts: Set(to_i32(
            record.max_verification_attempts,
            "max_verification_attempts",
        )?),
        last_verification_check: Set(record.last_verification_check.as_ref().map(format_timestamp)),
        is_active: Set(i32::from(record.is_active)),
        is_default: Set(i32::from(record.is_default)),
        is_blocked: Set(i32::from(record.is_blocked)),
        blocked_reason: Set(record.blocked_reason.clone()),
        ssl_status: Set(record.ssl_status.as_str().to_string()),
        ssl_error: Set(record.ssl_error.clone()),
        hosting_domain_id: Set(record.hosting_domain_id.clone()),
        hosting_config_id: Set(record.hosting_config_id.clone()),
        created_at: Set(format_timestamp(&record.created_at)),
        updated_at: Set(format_timestamp(&record.updated_at)),
    })
}

/// Map a write error, turning a `full_domain` unique violation into `DuplicateDomain`.
fn write_error<'a>(full_domain: &'a str, action: &'static str) -> impl Fn(DbErr) -> CoreError + 'a {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            CoreError::DuplicateDomain(full_domain.to_string())
        }
        _ => CoreError::StorageError(format!("Failed to {action}: {e}")),
    }
}

/// Load a record of `owner_id` by id through any connection or transaction.
async fn find_owned<C: sea_orm::ConnectionTrait>(
    conn: &C,
    owner_id: &str,
    domain_id: &str,
) -> CoreResult<custom_domain::Model> {
    custom_domain::Entity::find_by_id(domain_id.to_string())
        .filter(Column::OwnerId.eq(owner_id))
        .one(conn)
        .await
        .map_err(storage_error("query domain"))?
        .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
}

/// Flip `is_default` on the rows matched by `filter`.
async fn write_default_flag<C: sea_orm::ConnectionTrait>(
    conn: &C,
    filter: sea_orm::Condition,
    is_default: bool,
) -> CoreResult<u64> {
    let result = custom_domain::Entity::update_many()
        .col_expr(Column::IsDefault, Expr::value(i32::from(is_default)))
        .col_expr(Column::UpdatedAt, Expr::value(format_timestamp(&Utc::now())))
        .filter(filter)
        .exec(conn)
        .await
        .map_err(storage_error("update default flag"))?;
    Ok(result.rows_affected)
}

#[async_trait]
impl DomainRecordRepository for SqliteStore {
    async fn create(&self, record: &DomainRecord, quota: u32) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let existing = custom_domain::Entity::find()
            .filter(Column::FullDomain.eq(&record.full_domain))
            .one(&txn)
            .await
            .map_err(storage_error("query domain"))?;
        if existing.is_some() {
            return Err(CoreError::DuplicateDomain(record.full_domain.clone()));
        }

        let owned = custom_domain::Entity::find()
            .filter(Column::OwnerId.eq(&record.owner_id))
            .count(&txn)
            .await
            .map_err(storage_error("count domains"))?;
        if owned >= u64::from(quota) {
            return Err(CoreError::QuotaExceeded {
                owner_id: record.owner_id.clone(),
                limit: quota,
            });
        }

        custom_domain::Entity::insert(record_to_active_model(record)?)
            .exec(&txn)
            .await
            .map_err(write_error(&record.full_domain, "insert domain"))?;

        txn.commit()
            .await
            .map_err(storage_error("commit transaction"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>> {
        custom_domain::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(storage_error("query domain"))?
            .map(custom_domain::Model::into_record)
            .transpose()
    }

    async fn find_by_full_domain(&self, full_domain: &str) -> CoreResult<Option<DomainRecord>> {
        custom_domain::Entity::find()
            .filter(Column::FullDomain.eq(full_domain))
            .one(&self.db)
            .await
            .map_err(storage_error("query domain"))?
            .map(custom_domain::Model::into_record)
            .transpose()
    }

    async fn list_by_owner(&self, owner_id: &str) -> CoreResult<Vec<DomainRecord>> {
        let rows = custom_domain::Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error("list domains"))?;

        rows.into_iter()
            .map(custom_domain::Model::into_record)
            .collect()
    }

    async fn count_by_owner(&self, owner_id: &str) -> CoreResult<u64> {
        custom_domain::Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await
            .map_err(storage_error("count domains"))
    }

    async fn update(&self, record: &DomainRecord) -> CoreResult<()> {
        let mut model = record_to_active_model(record)?;
        model.id = NotSet;
        model.is_default = NotSet;

        let _guard = self.write_lock.lock().await;
        let result = custom_domain::Entity::update_many()
            .set(model)
            .filter(Column::Id.eq(&record.id))
            .exec(&self.db)
            .await
            .map_err(write_error(&record.full_domain, "update domain"))?;

        if result.rows_affected == 0 {
            return Err(CoreError::DomainNotFound(record.id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let result = custom_domain::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(storage_error("delete domain"))?;

        if result.rows_affected == 0 {
            return Err(CoreError::DomainNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn set_default(&self, owner_id: &str, domain_id: &str) -> CoreResult<DomainRecord> {
        let _guard = self.write_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let target = find_owned(&txn, owner_id, domain_id).await?;

        // clear first, the partial unique index allows one default per owner
        write_default_flag(
            &txn,
            sea_orm::Condition::all()
                .add(Column::OwnerId.eq(owner_id))
                .add(Column::IsDefault.eq(1))
                .add(Column::Id.ne(domain_id)),
            false,
        )
        .await?;

        if target.is_default == 0 {
            write_default_flag(
                &txn,
                sea_orm::Condition::all().add(Column::Id.eq(domain_id)),
                true,
            )
            .await?;
        }

        let updated = find_owned(&txn, owner_id, domain_id).await?;
        txn.commit()
            .await
            .map_err(storage_error("commit transaction"))?;

        updated.into_record()
    }

    async fn clear_default(&self, owner_id: &str, domain_id: &str) -> CoreResult<DomainRecord> {
        let _guard = self.write_lock.lock().await;
        let target = find_owned(&self.db, owner_id, domain_id).await?;
        if target.is_default == 0 {
            return target.into_record();
        }

        write_default_flag(
            &self.db,
            sea_orm::Condition::all().add(Column::Id.eq(domain_id)),
            false,
        )
        .await?;

        find_owned(&self.db, owner_id, domain_id)
            .await?
            .into_record()
    }

    async fn delete_and_promote(
        &self,
        owner_id: &str,
        domain_id: &str,
    ) -> CoreResult<Option<String>> {
        let _guard = self.write_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        let target = find_owned(&txn, owner_id, domain_id).await?;
        custom_domain::Entity::delete_by_id(domain_id.to_string())
            .exec(&txn)
            .await
            .map_err(storage_error("delete domain"))?;

        let mut promoted = None;
        if target.is_default != 0 {
            let candidate = custom_domain::Entity::find()
                .filter(Column::OwnerId.eq(owner_id))
                .filter(Column::IsVerified.eq(1))
                .filter(Column::IsActive.eq(1))
                .filter(Column::IsBlocked.eq(0))
                .order_by_asc(Column::CreatedAt)
                .order_by_asc(Column::Id)
                .one(&txn)
                .await
                .map_err(storage_error("query promotion candidate"))?;

            if let Some(candidate) = candidate {
                write_default_flag(
                    &txn,
                    sea_orm::Condition::all().add(Column::Id.eq(&candidate.id)),
                    true,
                )
                .await?;
                promoted = Some(candidate.id);
            }
        }

        txn.commit()
            .await
            .map_err(storage_error("commit transaction"))?;

        if let Some(id) = &promoted {
            log::info!("Promoted {id} to default for owner {owner_id}");
        }
        Ok(promoted)
    }
}
