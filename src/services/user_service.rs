// src/services/user_service.rs

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, metadata::merge_object},
    db::{PropertyRepository, UserRepository},
    models::user::{CreateUserPayload, PropertyLink, User, UserMetadata, UserPropertyGroup},
    services::access::{resolve_role, RoleAssignment},
};

pub const DEFAULT_LIST_ROLE: &str = "customer";

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    property_repo: PropertyRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, property_repo: PropertyRepository, pool: PgPool) -> Self {
        Self { repo, property_repo, pool }
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        let assignment = resolve_role(&payload.role);
        let metadata = initial_metadata(&assignment);

        let user = self
            .repo
            .create_user(
                payload.name.trim(),
                payload.email.trim(),
                payload.cpf.trim(),
                &assignment.role,
                &metadata,
            )
            .await?;

        tracing::info!(user_id = %user.id, role = %assignment.role, "👤 Usuário criado");
        Ok(user)
    }

    pub async fn list_users(&self, role: Option<&str>) -> Result<Vec<User>, AppError> {
        let role = role
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_LIST_ROLE);
        self.repo.list_by_role(role).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    /// Faz merge raso do `patch` na metadata do usuário. O papel (`role`) não é tocado.
    pub async fn merge_metadata(&self, id: Uuid, patch: Map<String, Value>) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .lock_metadata(&mut *tx, id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let merged = merge_object(current, patch);
        let user = self.repo.update_metadata(&mut *tx, id, &merged).await?;

        tx.commit().await?;
        Ok(user)
    }

    // Empreendimentos vinculados ao usuário, agrupados com suas vendas
    pub async fn user_properties(&self, id: Uuid) -> Result<Vec<UserPropertyGroup>, AppError> {
        let user = self.get_user(id).await?;
        let links = UserMetadata::from_value(&user.metadata).properties;

        let groups = group_links(links);
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = groups.iter().map(|(id, _)| *id).collect();
        let mut summaries: HashMap<Uuid, _> = self
            .property_repo
            .find_summaries(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(groups
            .into_iter()
            .map(|(property_id, links)| UserPropertyGroup {
                property_id,
                property: summaries.remove(&property_id),
                links,
            })
            .collect())
    }
}

fn initial_metadata(assignment: &RoleAssignment) -> Value {
    match &assignment.permission {
        Some(permission) => json!({ "permission": permission }),
        None => json!({}),
    }
}

// Agrupa os vínculos por empreendimento mantendo a ordem em que aparecem.
// Vínculos sem `property_id` válido são ignorados.
fn group_links(links: Vec<PropertyLink>) -> Vec<(Uuid, Vec<PropertyLink>)> {
    let mut groups: Vec<(Uuid, Vec<PropertyLink>)> = Vec::new();

    for link in links {
        let Some(property_id) = link
            .property_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        else {
            continue;
        };

        match groups.iter_mut().find(|(id, _)| *id == property_id) {
            Some((_, group)) => group.push(link),
            None => groups.push((property_id, vec![link])),
        }
    }

    groups
}
