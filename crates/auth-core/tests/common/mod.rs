//! 测试用内存存储

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fleet_auth_core::PermissionsService;
use fleet_common::EntityId;
use fleet_errors::{AppError, AppResult};
use fleet_ports::{Condition, EntityKind, PermissionLink, Request, Server, Storage, User};

/// 存储查询类别，用于按类别注入故障
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Server,
    User,
    Object,
    Count,
    Exists,
}

#[derive(Default)]
pub struct MockStorage {
    server: Option<Server>,
    users: HashMap<EntityId, User>,
    objects: HashSet<(EntityKind, EntityId)>,
    links: HashSet<PermissionLink>,
    failing: HashSet<Query>,
    pub server_queries: AtomicUsize,
    pub object_queries: AtomicUsize,
    pub link_queries: AtomicUsize,
    pub user_queries: Mutex<Vec<EntityId>>,
}

impl MockStorage {
    pub fn new(server: Server) -> Self {
        Self {
            server: Some(server),
            ..Default::default()
        }
    }

    pub fn without_server() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: [
                Query::Server,
                Query::User,
                Query::Object,
                Query::Count,
                Query::Exists,
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        }
    }

    /// 指定类别的查询返回存储错误，其余查询正常
    pub fn fail_on(mut self, query: Query) -> Self {
        self.failing.insert(query);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.objects.insert((EntityKind::User, user.id));
        self.users.insert(user.id, user);
        self
    }

    pub fn with_object(mut self, kind: EntityKind, id: i64) -> Self {
        self.objects.insert((kind, EntityId(id)));
        self
    }

    pub fn with_link(mut self, user_id: i64, target: EntityKind, target_id: i64) -> Self {
        self.links.insert(PermissionLink::user(user_id, target, target_id));
        self
    }

    /// 为用户添加 n 个设备及其权限关联
    pub fn with_devices(mut self, user_id: i64, count: i64) -> Self {
        for device_id in 1..=count {
            self = self
                .with_object(EntityKind::Device, 1000 + device_id)
                .with_link(user_id, EntityKind::Device, 1000 + device_id);
        }
        self
    }

    pub fn into_service(self) -> (Arc<Self>, PermissionsService<Self>) {
        let storage = Arc::new(self);
        let service = PermissionsService::new(storage.clone());
        (storage, service)
    }

    pub fn queried_users(&self) -> Vec<EntityId> {
        self.user_queries.lock().unwrap().clone()
    }

    /// 所有存储查询次数
    pub fn total_queries(&self) -> usize {
        self.server_queries.load(Ordering::SeqCst)
            + self.object_queries.load(Ordering::SeqCst)
            + self.link_queries.load(Ordering::SeqCst)
            + self.user_queries.lock().unwrap().len()
    }

    fn fail_if_needed(&self, query: Query) -> AppResult<()> {
        if self.failing.contains(&query) {
            return Err(AppError::database("connection refused"));
        }
        Ok(())
    }

    fn matches(&self, condition: &Condition, id: EntityId) -> bool {
        match condition {
            Condition::Equals { column, value } => *column == "id" && id.value() == *value,
            Condition::And(left, right) => self.matches(left, id) && self.matches(right, id),
            Condition::Permission {
                owner,
                owner_id,
                target,
            } => self.links.contains(&PermissionLink {
                owner_kind: *owner,
                owner_id: *owner_id,
                target_kind: *target,
                target_id: id,
            }),
        }
    }
}

fn requested_id(request: &Request) -> Option<EntityId> {
    match &request.condition {
        Some(Condition::Equals { column: "id", value }) => Some(EntityId(*value)),
        _ => None,
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn get_server(&self, _request: &Request) -> AppResult<Option<Server>> {
        self.server_queries.fetch_add(1, Ordering::SeqCst);
        self.fail_if_needed(Query::Server)?;
        Ok(self.server.clone())
    }

    async fn get_user(&self, request: &Request) -> AppResult<Option<User>> {
        let id = requested_id(request).expect("user lookup must filter by id");
        self.user_queries.lock().unwrap().push(id);
        self.fail_if_needed(Query::User)?;
        Ok(self.users.get(&id).cloned())
    }

    async fn get_object_id(
        &self,
        kind: EntityKind,
        request: &Request,
    ) -> AppResult<Option<EntityId>> {
        self.object_queries.fetch_add(1, Ordering::SeqCst);
        self.fail_if_needed(Query::Object)?;
        let condition = request.condition.as_ref().expect("object lookup must be filtered");
        Ok(self
            .objects
            .iter()
            .filter(|(object_kind, _)| *object_kind == kind)
            .map(|(_, id)| *id)
            .find(|id| self.matches(condition, *id)))
    }

    async fn count_permissions(
        &self,
        owner: EntityKind,
        owner_id: EntityId,
        target: EntityKind,
    ) -> AppResult<u64> {
        self.link_queries.fetch_add(1, Ordering::SeqCst);
        self.fail_if_needed(Query::Count)?;
        Ok(self
            .links
            .iter()
            .filter(|link| {
                link.owner_kind == owner && link.owner_id == owner_id && link.target_kind == target
            })
            .count() as u64)
    }

    async fn permission_exists(&self, link: &PermissionLink) -> AppResult<bool> {
        self.link_queries.fetch_add(1, Ordering::SeqCst);
        self.fail_if_needed(Query::Exists)?;
        Ok(self.links.contains(link))
    }
}

pub fn admin(id: i64) -> User {
    User {
        administrator: true,
        // 管理员豁免所有限制
        readonly: true,
        device_readonly: true,
        limit_commands: true,
        disable_reports: true,
        device_limit: 0,
        ..User::new(id)
    }
}

pub fn regular(id: i64) -> User {
    User {
        device_limit: 10,
        ..User::new(id)
    }
}

pub fn manager(id: i64) -> User {
    User {
        manager: true,
        ..regular(id)
    }
}

pub fn server() -> Server {
    Server::default()
}

pub fn id(value: i64) -> EntityId {
    EntityId(value)
}

pub fn reason(result: AppResult<()>) -> String {
    match result {
        Err(AppError::Forbidden(reason)) => reason,
        other => panic!("expected Forbidden, got {:?}", other),
    }
}
