// src/services/access.rs
//
// Tabela de permissões do painel e o guardião de páginas.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Permissões de staff aceitas pelo gate da API (lista global, não por rota).
pub const ALLOWED_PERMISSIONS: [&str; 6] = [
    "cac",
    "cac senior",
    "marketing",
    "cac analyst",
    "designer",
    "admin",
];

pub const UNAUTHORIZED_PAGE: &str = "/unauthorized";

pub fn is_allowed_permission(permission: &str) -> bool {
    ALLOWED_PERMISSIONS.contains(&permission)
}

// ---
// PAPEL x PERMISSÃO
// ---

/// Papel grosso gravado em `users.role` e a permissão fina de `metadata.permission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: String,
    pub permission: Option<String>,
}

/// Deriva o papel gravado a partir do papel solicitado na criação do usuário.
///
/// As variantes de CAC colapsam em `cac` e `designer` vira `marketing`;
/// só esses recebem `metadata.permission` na criação. Qualquer outro papel
/// (inclusive `admin` e `marketing`) é gravado como veio e sem permissão.
pub fn resolve_role(requested: &str) -> RoleAssignment {
    let requested = requested.trim();

    let (role, permission) = match requested {
        "cac" | "cac senior" | "cac analyst" => ("cac", Some(requested)),
        "designer" => ("marketing", Some(requested)),
        other => (other, None),
    };

    RoleAssignment {
        role: role.to_string(),
        permission: permission.map(str::to_string),
    }
}

// ---
// CAPACIDADES (por página/funcionalidade)
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Capability {
    Obras,
    Admin,
    Users,
    Video,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Obras,
        Capability::Admin,
        Capability::Users,
        Capability::Video,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Capability::Obras => "OBRAS",
            Capability::Admin => "ADMIN",
            Capability::Users => "USERS",
            Capability::Video => "VIDEO",
        }
    }

    pub fn allowed_permissions(self) -> &'static [&'static str] {
        match self {
            Capability::Obras => &["admin", "cac analyst"],
            Capability::Admin => &["admin"],
            Capability::Users => &["admin", "marketing", "cac", "cac analyst"],
            Capability::Video => &["admin", "marketing"],
        }
    }

    pub fn allows(self, permission: &str) -> bool {
        self.allowed_permissions().contains(&permission)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

// ---
// GUARDIÃO DE PÁGINAS
// ---

/// Contexto de autorização do ator atual, sempre passado explicitamente.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub permission: Option<String>,
}

impl AuthContext {
    pub fn new(permission: Option<&str>) -> Self {
        Self {
            permission: permission.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.permission
            .as_deref()
            .is_some_and(|p| capability.allows(p))
    }

    // Usado para montar o menu lateral
    pub fn granted_capabilities(&self) -> Vec<Capability> {
        Capability::ALL.into_iter().filter(|c| self.can(*c)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageDecision {
    /// Permissão ainda não conhecida: não renderiza nada nem redireciona.
    Checking,
    Granted,
    Redirect,
}

impl PageDecision {
    pub fn redirect_to(self) -> Option<&'static str> {
        matches!(self, PageDecision::Redirect).then_some(UNAUTHORIZED_PAGE)
    }
}

/// Decide se a página protegida por `capability` pode ser renderizada.
/// Capacidades desconhecidas sempre negam.
pub fn evaluate_page_access(ctx: &AuthContext, capability: &str) -> PageDecision {
    let Some(permission) = ctx.permission.as_deref() else {
        return PageDecision::Checking;
    };

    match capability.parse::<Capability>() {
        Ok(cap) if cap.allows(permission) => PageDecision::Granted,
        _ => PageDecision::Redirect,
    }
}
