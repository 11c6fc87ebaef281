use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "custom_domains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub apex_domain: String,
    pub subdomain_label: Option<String>,
    #[sea_orm(unique)]
    pub full_domain: String,
    pub verification_token: String,
    /// JSON array of DNS instructions
    pub dns_records: String,
    pub is_verified: i32,
    pub verification_attempts: i32,
    pub max_verification_attempts: i32,
    pub last_verification_check: Option<String>,
    pub is_active: i32,
    pub is_default: i32,
    pub is_blocked: i32,
    pub blocked_reason: Option<String>,
    pub ssl_status: String,
    pub ssl_error: Option<String>,
    pub hosting_domain_id: Option<String>,
    pub hosting_config_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
