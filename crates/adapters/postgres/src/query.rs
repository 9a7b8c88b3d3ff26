//! 查询请求渲染为 SQL

use fleet_common::EntityId;
use fleet_ports::{Columns, Condition, EntityKind, PermissionLink, Request};
use sqlx::{Postgres, QueryBuilder};

use crate::naming::{link_column, link_table, table_name};

/// `SELECT <columns> FROM <table> [WHERE <condition>]`
pub(crate) fn select(kind: EntityKind, request: &Request) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");
    match &request.columns {
        Columns::All => builder.push("*"),
        Columns::Include(columns) => builder.push(columns.join(", ")),
    };
    builder.push(" FROM ").push(table_name(kind));

    if let Some(condition) = &request.condition {
        builder.push(" WHERE ");
        push_condition(&mut builder, condition);
    }
    builder
}

fn push_condition(builder: &mut QueryBuilder<'static, Postgres>, condition: &Condition) {
    match condition {
        Condition::Equals { column, value } => {
            builder.push(*column).push(" = ").push_bind(*value);
        }
        Condition::And(left, right) => {
            push_condition(builder, left);
            builder.push(" AND ");
            push_condition(builder, right);
        }
        Condition::Permission {
            owner,
            owner_id,
            target,
        } => {
            let table = link_table(*owner, *target);
            builder
                .push("id IN (SELECT ")
                .push(&table)
                .push(".")
                .push(link_column(*target))
                .push(" FROM ")
                .push(&table)
                .push(" WHERE ")
                .push(&table)
                .push(".")
                .push(link_column(*owner))
                .push(" = ")
                .push_bind(owner_id.value())
                .push(")");
        }
    }
}

/// 统计权限关联数量
pub(crate) fn count_links(
    owner: EntityKind,
    owner_id: EntityId,
    target: EntityKind,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder
        .push(link_table(owner, target))
        .push(" WHERE ")
        .push(link_column(owner))
        .push(" = ")
        .push_bind(owner_id.value());
    builder
}

/// 权限关联是否存在
pub(crate) fn link_exists(link: &PermissionLink) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT EXISTS (SELECT 1 FROM ");
    builder
        .push(link_table(link.owner_kind, link.target_kind))
        .push(" WHERE ")
        .push(link_column(link.owner_kind))
        .push(" = ")
        .push_bind(link.owner_id.value())
        .push(" AND ")
        .push(link_column(link.target_kind))
        .push(" = ")
        .push_bind(link.target_id.value())
        .push(")");
    builder
}
