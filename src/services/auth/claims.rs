/*
 * Responsibility
 * - トークン payload の Claims 型
 * - 既知の claim は typed field、それ以外は extra (flatten) に保持
 * - 運用側が設定した claim 名 (EDIPI / username property) を名前で引けるようにする
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Decoded token payload.
///
/// Every field is optional: the payload is operator-issued JSON we have no
/// schema authority over. Claims we don't know by name are kept in `extra`
/// so a configured claim name can still be looked up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Claims {
    /// Look up a claim by name. Typed fields win over `extra`; only string
    /// values are usable as identity material, anything else reads as absent.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match name {
            "iss" => self.iss.as_deref(),
            "azp" => self.azp.as_deref(),
            "sub" => self.sub.as_deref(),
            "nonce" => self.nonce.as_deref(),
            "email" => self.email.as_deref(),
            "given_name" => self.given_name.as_deref(),
            "family_name" => self.family_name.as_deref(),
            "preferred_username" => self.preferred_username.as_deref(),
            _ => self.extra.get(name).and_then(|v| v.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_and_extra_lookup() {
        let claims: Claims = serde_json::from_value(json!({
            "iss": "https://idp.example",
            "preferred_username": "alice",
            "x_edipi": "1234.0123456789",
        }))
        .unwrap();

        assert_eq!(claims.get_str("iss"), Some("https://idp.example"));
        assert_eq!(claims.get_str("preferred_username"), Some("alice"));
        assert_eq!(claims.get_str("x_edipi"), Some("1234.0123456789"));
        assert_eq!(claims.get_str("missing"), None);
    }

    #[test]
    fn non_string_extra_reads_as_absent() {
        let claims: Claims = serde_json::from_value(json!({ "exp": 1700000000 })).unwrap();
        assert_eq!(claims.get_str("exp"), None);
    }

    #[test]
    fn serde_round_trip_is_lossless() {
        let claims: Claims = serde_json::from_value(json!({
            "iss": "X",
            "sub": "Y",
            "email": "a@example.com",
            "custom": "kept",
        }))
        .unwrap();

        let encoded = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, claims);
    }
}
