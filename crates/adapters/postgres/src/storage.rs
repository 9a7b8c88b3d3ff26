//! PostgreSQL 存储实现

use async_trait::async_trait;
use fleet_common::EntityId;
use fleet_errors::AppResult;
use fleet_ports::{EntityKind, PermissionLink, Request, Server, Storage, User};
use metrics::counter;
use sqlx::{FromRow, PgPool};

use crate::error_mapper::map_sqlx_error;
use crate::query;

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_query(query: &'static str) {
    counter!("permission_store_queries_total", "query" => query).increment(1);
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn get_server(&self, request: &Request) -> AppResult<Option<Server>> {
        record_query("server");
        let row = query::select(EntityKind::Server, request)
            .build_query_as::<ServerRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Server::from))
    }

    async fn get_user(&self, request: &Request) -> AppResult<Option<User>> {
        record_query("user");
        let row = query::select(EntityKind::User, request)
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    async fn get_object_id(
        &self,
        kind: EntityKind,
        request: &Request,
    ) -> AppResult<Option<EntityId>> {
        record_query("object");
        let id = query::select(kind, request)
            .build_query_scalar::<i64>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(id.map(EntityId))
    }

    async fn count_permissions(
        &self,
        owner: EntityKind,
        owner_id: EntityId,
        target: EntityKind,
    ) -> AppResult<u64> {
        record_query("count_permissions");
        let count = query::count_links(owner, owner_id, target)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn permission_exists(&self, link: &PermissionLink) -> AppResult<bool> {
        record_query("permission_exists");
        query::link_exists(link)
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

// ============================================================================
// 数据库行映射
// ============================================================================

#[derive(Debug, FromRow)]
struct ServerRow {
    id: i64,
    readonly: bool,
    #[sqlx(rename = "devicereadonly")]
    device_readonly: bool,
    #[sqlx(rename = "limitcommands")]
    limit_commands: bool,
    #[sqlx(rename = "disablereports")]
    disable_reports: bool,
}

impl From<ServerRow> for Server {
    fn from(row: ServerRow) -> Self {
        Self {
            id: EntityId(row.id),
            readonly: row.readonly,
            device_readonly: row.device_readonly,
            limit_commands: row.limit_commands,
            disable_reports: row.disable_reports,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    administrator: bool,
    readonly: bool,
    #[sqlx(rename = "devicereadonly")]
    device_readonly: bool,
    #[sqlx(rename = "limitcommands")]
    limit_commands: bool,
    #[sqlx(rename = "disablereports")]
    disable_reports: bool,
    #[sqlx(rename = "devicelimit")]
    device_limit: i32,
    #[sqlx(rename = "userlimit")]
    user_limit: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: EntityId(row.id),
            administrator: row.administrator,
            readonly: row.readonly,
            device_readonly: row.device_readonly,
            limit_commands: row.limit_commands,
            disable_reports: row.disable_reports,
            // 可创建下级用户即为管理者
            manager: row.user_limit != 0,
            device_limit: row.device_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_manager_flag() {
        let row = UserRow {
            id: 3,
            administrator: false,
            readonly: false,
            device_readonly: true,
            limit_commands: false,
            disable_reports: false,
            device_limit: -1,
            user_limit: 5,
        };
        let user = User::from(row);
        assert_eq!(user.id, EntityId(3));
        assert!(user.manager);
        assert!(user.device_readonly);
        assert_eq!(user.device_limit, -1);

        let row = UserRow {
            id: 4,
            administrator: false,
            readonly: false,
            device_readonly: false,
            limit_commands: false,
            disable_reports: false,
            device_limit: 10,
            user_limit: 0,
        };
        assert!(!User::from(row).manager);
    }

    #[test]
    fn test_server_row_mapping() {
        let server = Server::from(ServerRow {
            id: 1,
            readonly: true,
            device_readonly: false,
            limit_commands: true,
            disable_reports: false,
        });
        assert_eq!(server.id, EntityId(1));
        assert!(server.readonly);
        assert!(server.limit_commands);
        assert!(!server.device_readonly);
    }
}
