//! User and share lookup (component F): who may log on, and what shares exist and with
//! what access. A deployment supplies its own [`UserShareRegistry`]; [`StaticRegistry`] is a
//! TOML-driven default for tests and the demo binary.

use std::collections::HashMap;

use serde::Deserialize;

use crate::tree::{Share, ShareFlags, ShareType};

/// One user's credential material, keyed by username (case-insensitive).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub nt_hash: [u8; 16],
}

/// Looks up users for authentication and enumerates/resolves shares for TreeConnect.
pub trait UserShareRegistry: Send + Sync {
    fn find_user(&self, username: &str, domain: &str) -> Option<UserRecord>;
    fn find_share(&self, name: &str) -> Option<Share>;
    fn list_shares(&self) -> Vec<Share>;
}

#[derive(Debug, Deserialize)]
struct StaticUserConfig {
    username: String,
    nt_hash_hex: String,
}

#[derive(Debug, Deserialize)]
struct StaticShareConfig {
    name: String,
    path: String,
    #[serde(default)]
    read_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct StaticRegistryConfig {
    #[serde(default)]
    users: Vec<StaticUserConfig>,
    #[serde(default)]
    shares: Vec<StaticShareConfig>,
}

/// In-memory registry, normally populated from a `StaticRegistryConfig` parsed out of the
/// same TOML file as [`crate::config::FileConfig`].
pub struct StaticRegistry {
    users: HashMap<String, UserRecord>,
    shares: HashMap<String, Share>,
}

impl StaticRegistry {
    pub fn from_config(config: StaticRegistryConfig) -> Self {
        let mut users = HashMap::new();
        for u in config.users {
            let mut nt_hash = [0u8; 16];
            if let Ok(bytes) = decode_hex(&u.nt_hash_hex) {
                if bytes.len() == 16 {
                    nt_hash.copy_from_slice(&bytes);
                }
            }
            users.insert(
                u.username.to_lowercase(),
                UserRecord {
                    username: u.username,
                    nt_hash,
                },
            );
        }
        let mut shares = HashMap::new();
        for s in config.shares {
            shares.insert(
                s.name.to_lowercase(),
                Share {
                    name: s.name,
                    share_type: ShareType::Disk,
                    local_path: s.path,
                    flags: ShareFlags {
                        read_only: s.read_only,
                        encrypt_data: false,
                    },
                },
            );
        }
        Self { users, shares }
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect()
}

impl UserShareRegistry for StaticRegistry {
    fn find_user(&self, username: &str, _domain: &str) -> Option<UserRecord> {
        self.users.get(&username.to_lowercase()).cloned()
    }

    fn find_share(&self, name: &str) -> Option<Share> {
        self.shares.get(&name.to_lowercase()).cloned()
    }

    fn list_shares(&self) -> Vec<Share> {
        self.shares.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_lookup_is_case_insensitive() {
        let config = StaticRegistryConfig {
            users: vec![StaticUserConfig {
                username: "Alice".into(),
                nt_hash_hex: "00".repeat(16),
            }],
            shares: vec![],
        };
        let registry = StaticRegistry::from_config(config);
        assert!(registry.find_user("ALICE", "WORKGROUP").is_some());
        assert!(registry.find_user("bob", "WORKGROUP").is_none());
    }

    #[test]
    fn share_lookup_is_case_insensitive() {
        let config = StaticRegistryConfig {
            users: vec![],
            shares: vec![StaticShareConfig {
                name: "Data".into(),
                path: "/srv/data".into(),
                read_only: true,
            }],
        };
        let registry = StaticRegistry::from_config(config);
        let share = registry.find_share("data").unwrap();
        assert!(share.flags.read_only);
    }
}
