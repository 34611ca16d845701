use crate::schema::AttributeType;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// One field of the `@jwt` type.
#[derive(Clone, Debug, PartialEq)]
pub struct JwtClaim {
    pub(crate) attr_type: AttributeType,
    pub(crate) path: Vec<String>,
}
impl JwtClaim {
    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    /// Dotted path of the claim within the token payload
    /// (`@jwtClaim(path: "...")`, otherwise the field name).
    pub fn path(&self) -> &[String] {
        self.path.as_slice()
    }
}

/// The claims shape declared with `@jwt`.
#[derive(Clone, Debug, PartialEq)]
pub struct JwtShape {
    pub(crate) claims: IndexMap<String, JwtClaim>,
    pub(crate) name: String,
}
impl JwtShape {
    pub fn claim(&self, field_name: &str) -> Option<&JwtClaim> {
        self.claims.get(field_name)
    }

    pub fn claims(&self) -> &IndexMap<String, JwtClaim> {
        &self.claims
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Reads a dotted path (`a.b.c`) from a claims object. A path segment may
/// itself contain dots when the claim key does (`"https://x.io/roles"`); the
/// longest matching key wins.
pub(crate) fn lookup_claim<'a, S: AsRef<str>>(
    claims: &'a JsonValue,
    path: &[S],
) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return Some(claims);
    }
    let entries = claims.as_object()?;
    for take in (1..=path.len()).rev() {
        let key = path[..take].iter()
            .map(|segment| segment.as_ref())
            .collect::<Vec<_>>()
            .join(".");
        if let Some(value) = entries.get(&key) {
            if let Some(found) = lookup_claim(value, &path[take..]) {
                return Some(found);
            }
        }
    }
    None
}
