use serde::{Deserialize, Serialize};

use super::role::Role;
use super::wire::{deserialize_opt_id, pick_id};

/// An account. The password is write-only and never part of this record.
///
/// Serializes with the wire names so the session store can persist it as
/// the `auth:user` JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUser")]
pub struct User {
    pub id: String,
    pub nombre: String,
    /// Login name; immutable after creation.
    pub usuario: String,
    pub email: String,
    pub rol: Role,
    pub activo: bool,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    usuario: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    rol: Role,
    #[serde(default)]
    activo: Option<bool>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        Self {
            id: pick_id(raw.id, raw.mongo_id),
            nombre: raw.nombre.unwrap_or_default(),
            usuario: raw.usuario.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            rol: raw.rol,
            activo: raw.activo.unwrap_or(true),
        }
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUserPayload {
    pub nombre: String,
    pub usuario: String,
    pub email: String,
    pub password: String,
    pub rol: Role,
    pub activo: bool,
}

/// Body of `PUT /users/:id`. `usuario` is never sent; `password` only when
/// it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUserPayload {
    pub nombre: String,
    pub email: String,
    pub rol: Role,
    pub activo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
