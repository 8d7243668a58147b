use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use warden_common::{TenantId, UserId};
use warden_errors::{AppError, AppResult};

use crate::shared::domain::entities::{
    ClientRecord, DeptRecord, NewUser, PostSummary, RecordStatus, RoleSummary, TenantRecord,
    UserRecord,
};
use crate::shared::domain::repositories::{
    ClientDirectory, PermissionDirectory, TenantDirectory, UserDirectory,
};

/// Users keyed by id
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, UserRecord>>,
    next_id: AtomicI64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1000),
        }
    }

    pub fn insert(&self, user: UserRecord) {
        self.users.write().insert(user.user_id, user);
    }

    pub fn get(&self, user_id: UserId) -> Option<UserRecord> {
        self.users.read().get(&user_id).cloned()
    }

    fn find_by(
        &self,
        tenant_id: &TenantId,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Option<UserRecord> {
        self.users
            .read()
            .values()
            .find(|u| &u.tenant_id == tenant_id && predicate(u))
            .cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(
        &self,
        tenant_id: &TenantId,
        username: &str,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self.find_by(tenant_id, |u| u.username == username))
    }

    async fn find_by_phonenumber(
        &self,
        tenant_id: &TenantId,
        phonenumber: &str,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self.find_by(tenant_id, |u| {
            u.phonenumber.as_deref() == Some(phonenumber)
        }))
    }

    async fn find_by_email(
        &self,
        tenant_id: &TenantId,
        email: &str,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self.find_by(tenant_id, |u| u.email.as_deref() == Some(email)))
    }

    async fn exists_username(&self, tenant_id: &TenantId, username: &str) -> AppResult<bool> {
        Ok(self.find_by(tenant_id, |u| u.username == username).is_some())
    }

    async fn register(&self, user: NewUser) -> AppResult<UserId> {
        let user_id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut record = UserRecord::new(user_id, user.tenant_id, user.username, user.password_hash);
        record.nickname = user.nickname;
        record.user_type = user.user_type;
        self.insert(record);
        Ok(user_id)
    }

    async fn update_last_login(
        &self,
        user_id: UserId,
        ip: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut users = self.users.write();
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("user {}", user_id)))?;
        user.login_ip = Some(ip.to_string());
        user.login_date = Some(at);
        Ok(())
    }
}

/// Tenants; can simulate an outage.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    tenants: RwLock<HashMap<TenantId, TenantRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tenant: TenantRecord) {
        self.tenants.write().insert(tenant.tenant_id.clone(), tenant);
    }

    pub fn set_status(&self, tenant_id: &TenantId, status: RecordStatus) {
        if let Some(tenant) = self.tenants.write().get_mut(tenant_id) {
            tenant.status = status;
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn find_by_tenant_id(&self, tenant_id: &TenantId) -> AppResult<Option<TenantRecord>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::external_service("tenant directory unavailable"));
        }
        Ok(self.tenants.read().get(tenant_id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    clients: RwLock<HashMap<String, ClientRecord>>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, client: ClientRecord) {
        self.clients.write().insert(client.client_id.clone(), client);
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn find_by_client_id(&self, client_id: &str) -> AppResult<Option<ClientRecord>> {
        Ok(self.clients.read().get(client_id).cloned())
    }
}

/// Grants assigned per user
#[derive(Debug, Clone, Default)]
pub struct UserGrants {
    pub menu_permissions: BTreeSet<String>,
    pub roles: Vec<RoleSummary>,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Default)]
pub struct InMemoryPermissionDirectory {
    grants: RwLock<HashMap<UserId, UserGrants>>,
    depts: RwLock<HashMap<i64, DeptRecord>>,
}

impl InMemoryPermissionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, user_id: UserId, grants: UserGrants) {
        self.grants.write().insert(user_id, grants);
    }

    pub fn insert_dept(&self, dept: DeptRecord) {
        self.depts.write().insert(dept.dept_id, dept);
    }

    fn grants_of(&self, user_id: UserId) -> UserGrants {
        self.grants.read().get(&user_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl PermissionDirectory for InMemoryPermissionDirectory {
    async fn menu_permissions(&self, user_id: UserId) -> AppResult<BTreeSet<String>> {
        Ok(self.grants_of(user_id).menu_permissions)
    }

    async fn role_keys(&self, user_id: UserId) -> AppResult<BTreeSet<String>> {
        Ok(self
            .grants_of(user_id)
            .roles
            .into_iter()
            .map(|role| role.role_key)
            .collect())
    }

    async fn roles(&self, user_id: UserId) -> AppResult<Vec<RoleSummary>> {
        Ok(self.grants_of(user_id).roles)
    }

    async fn posts(&self, user_id: UserId) -> AppResult<Vec<PostSummary>> {
        Ok(self.grants_of(user_id).posts)
    }

    async fn find_dept(&self, dept_id: i64) -> AppResult<Option<DeptRecord>> {
        Ok(self.depts.read().get(&dept_id).cloned())
    }
}

/// All four directories sharing one set of handles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectories {
    pub users: Arc<InMemoryUserDirectory>,
    pub tenants: Arc<InMemoryTenantDirectory>,
    pub clients: Arc<InMemoryClientDirectory>,
    pub permissions: Arc<InMemoryPermissionDirectory>,
}

impl InMemoryDirectories {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserDirectory::new()),
            ..Self::default()
        }
    }
}
