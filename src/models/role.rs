use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Unknown wire values read as [`Role::Invitado`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Encargado,
    #[default]
    Invitado,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Encargado, Role::Invitado];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Encargado => "encargado",
            Role::Invitado => "invitado",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "encargado" => Ok(Role::Encargado),
            "invitado" => Ok(Role::Invitado),
            other => Err(format!(
                "Rol desconocido '{}'. Usa admin, encargado o invitado.",
                other
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| {
                s.parse().ok().or_else(|| {
                    tracing::debug!(rol = %s, "unknown role, treating as invitado");
                    None
                })
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Encargado ".parse::<Role>().unwrap(), Role::Encargado);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_wire() {
        assert_eq!(serde_json::to_string(&Role::Encargado).unwrap(), "\"encargado\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        let role: Role = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(role, Role::Invitado);
        let role: Role = serde_json::from_str("null").unwrap();
        assert_eq!(role, Role::Invitado);
    }
}
