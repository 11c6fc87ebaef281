use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomDomain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomDomain::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomDomain::OwnerId).string().not_null())
                    .col(ColumnDef::new(CustomDomain::ApexDomain).string().not_null())
                    .col(ColumnDef::new(CustomDomain::SubdomainLabel).string().null())
                    .col(
                        ColumnDef::new(CustomDomain::FullDomain)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::VerificationToken)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::DnsRecords)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::IsVerified)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::VerificationAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::MaxVerificationAttempts)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::LastVerificationCheck)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::IsActive)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::IsDefault)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CustomDomain::IsBlocked)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CustomDomain::BlockedReason).string().null())
                    .col(
                        ColumnDef::new(CustomDomain::SslStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CustomDomain::SslError).string().null())
                    .col(ColumnDef::new(CustomDomain::HostingDomainId).string().null())
                    .col(ColumnDef::new(CustomDomain::HostingConfigId).string().null())
                    .col(ColumnDef::new(CustomDomain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(CustomDomain::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_custom_domains_owner_id")
                    .table(CustomDomain::Table)
                    .col(CustomDomain::OwnerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // at most one default per owner
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_custom_domains_one_default \
                 ON custom_domains(owner_id) WHERE is_default = 1",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomDomain::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CustomDomain {
    #[sea_orm(iden = "custom_domains")]
    Table,
    Id,
    OwnerId,
    ApexDomain,
    SubdomainLabel,
    FullDomain,
    VerificationToken,
    DnsRecords,
    IsVerified,
    VerificationAttempts,
    MaxVerificationAttempts,
    LastVerificationCheck,
    IsActive,
    IsDefault,
    IsBlocked,
    BlockedReason,
    SslStatus,
    SslError,
    HostingDomainId,
    HostingConfigId,
    CreatedAt,
    UpdatedAt,
}
