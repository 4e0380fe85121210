//! Key Generation Module
//!
//! Builds namespaced cache keys from a module, an identifier and an optional
//! parameter fingerprint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Sequence for keys built from params that cannot be serialized.
static UNKEYED_SEQ: AtomicU64 = AtomicU64::new(0);

/// Built-in module name to key token mapping.
pub const DEFAULT_MODULE_PREFIXES: &[(&str, &str)] = &[
    ("produtor", "prod"),
    ("propriedade", "prop"),
    ("dashboard", "dash"),
    ("animal", "anim"),
    ("rebanho", "reb"),
    ("estoque", "est"),
    ("financeiro", "fin"),
    ("relatorio", "rel"),
];

// == Module Prefixes ==
/// Mapping from logical module name to the short token used in keys.
#[derive(Debug, Clone)]
pub struct ModulePrefixes {
    tokens: HashMap<String, String>,
}

impl ModulePrefixes {
    /// Table with no entries; every module resolves to its own name.
    pub fn empty() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    /// Adds or replaces a module mapping.
    pub fn with(mut self, module: impl Into<String>, token: impl Into<String>) -> Self {
        self.tokens.insert(module.into(), token.into());
        self
    }

    /// Resolves `module` to its token, or the module name itself if unknown.
    pub fn token<'a>(&'a self, module: &'a str) -> &'a str {
        self.tokens.get(module).map(String::as_str).unwrap_or(module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.tokens.contains_key(module)
    }
}

impl Default for ModulePrefixes {
    fn default() -> Self {
        DEFAULT_MODULE_PREFIXES
            .iter()
            .fold(Self::empty(), |table, (module, token)| table.with(*module, *token))
    }
}

// == Key Generator ==
/// Produces `{namespace}_{token}_{identifier}[_{params_hash}]` keys.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    namespace: String,
    prefixes: ModulePrefixes,
}

impl KeyGenerator {
    pub fn new(namespace: impl Into<String>, prefixes: ModulePrefixes) -> Self {
        Self {
            namespace: namespace.into(),
            prefixes,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn prefixes(&self) -> &ModulePrefixes {
        &self.prefixes
    }

    // == Generate ==
    /// Builds the key for `identifier` in `module`.
    ///
    /// Non-empty `params` are fingerprinted so that each filter or page
    /// combination gets its own slot. `()`, `None`, `{}` and `[]` count as
    /// empty.
    ///
    /// Params that cannot be serialized (e.g. a map with tuple keys) cannot
    /// be fingerprinted. They get a one-off `_unkeyed-{n}` suffix instead,
    /// so the call never shares a slot with another call and reads through
    /// to the source every time.
    pub fn generate<P: Serialize + ?Sized>(
        &self,
        module: &str,
        identifier: &str,
        params: &P,
    ) -> String {
        let mut key = self.generate_plain(module, identifier);
        match fingerprint(params) {
            Ok(Some(hash)) => {
                key.push('_');
                key.push_str(&hash);
            }
            Ok(None) => {}
            Err(err) => {
                let seq = UNKEYED_SEQ.fetch_add(1, Ordering::Relaxed);
                warn!(
                    module,
                    identifier,
                    error = %err,
                    "Unserializable cache params, using a one-off key"
                );
                key.push_str(&format!("_unkeyed-{}", seq));
            }
        }
        key
    }

    /// Builds the key for `identifier` in `module` without params.
    pub fn generate_plain(&self, module: &str, identifier: &str) -> String {
        format!("{}{}", self.module_prefix(module), identifier)
    }

    /// Common prefix of every key in `module`, e.g. `agro_prod_`.
    pub fn module_prefix(&self, module: &str) -> String {
        format!("{}_{}_", self.namespace, self.prefixes.token(module))
    }
}

// == Fingerprint ==
/// SHA-256 hex digest of the canonical JSON form of `params`, or `None` when
/// the params are empty.
///
/// serde_json maps keep keys sorted, so field order in the caller's input
/// does not affect the digest.
pub fn fingerprint<P: Serialize + ?Sized>(params: &P) -> serde_json::Result<Option<String>> {
    let value = serde_json::to_value(params)?;
    let is_empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    let canonical = serde_json::to_vec(&value)?;
    Ok(Some(hex::encode(Sha256::digest(&canonical))))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn generator() -> KeyGenerator {
        KeyGenerator::new("agro", ModulePrefixes::default())
    }

    #[test]
    fn test_known_module_uses_token() {
        let key = generator().generate_plain("produtor", "all");
        assert_eq!(key, "agro_prod_all");
    }

    #[test]
    fn test_unknown_module_used_verbatim() {
        let key = generator().generate_plain("vacina", "all");
        assert_eq!(key, "agro_vacina_all");
    }

    #[test]
    fn test_empty_params_add_no_suffix() {
        let gen = generator();
        assert_eq!(gen.generate("produtor", "all", &()), "agro_prod_all");
        assert_eq!(gen.generate("produtor", "all", &json!({})), "agro_prod_all");
        assert_eq!(
            gen.generate("produtor", "all", &BTreeMap::<String, u32>::new()),
            "agro_prod_all"
        );
    }

    #[test]
    fn test_params_append_hash() {
        let key = generator().generate("produtor", "all", &json!({"page": 1, "per_page": 15}));
        let (prefix, hash) = key.rsplit_once('_').unwrap();

        assert_eq!(prefix, "agro_prod_all");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_params_order_insensitive() {
        #[derive(Serialize)]
        struct Filters {
            per_page: u32,
            page: u32,
        }

        let gen = generator();
        let from_json = gen.generate("produtor", "all", &json!({"page": 1, "per_page": 15}));
        let from_struct = gen.generate("produtor", "all", &Filters { per_page: 15, page: 1 });
        assert_eq!(from_json, from_struct);
    }

    #[test]
    fn test_different_params_differ() {
        let gen = generator();
        let page1 = gen.generate("produtor", "all", &json!({"page": 1}));
        let page2 = gen.generate("produtor", "all", &json!({"page": 2}));
        assert_ne!(page1, page2);
    }

    #[test]
    fn test_unserializable_params_never_share_a_key() {
        let gen = generator();
        let first = gen.generate("produtor", "all", &HashMap::from([((1u32, 2u32), 3u32)]));
        let second = gen.generate("produtor", "all", &HashMap::from([((9u32, 9u32), 9u32)]));
        let repeated = gen.generate("produtor", "all", &HashMap::from([((1u32, 2u32), 3u32)]));

        assert_ne!(first, second);
        assert_ne!(first, repeated);
        assert_ne!(first, "agro_prod_all");
        assert!(first.starts_with("agro_prod_all_unkeyed-"));
    }

    #[test]
    fn test_fingerprint_reports_serialize_errors() {
        let tuple_keyed = HashMap::from([((1u32, 2u32), 3u32)]);
        assert!(fingerprint(&tuple_keyed).is_err());
        assert_eq!(fingerprint(&()).unwrap(), None);
        assert_eq!(fingerprint(&json!({"page": 1})).unwrap().map(|h| h.len()), Some(64));
    }

    #[test]
    fn test_custom_prefix() {
        let prefixes = ModulePrefixes::default().with("vacina", "vac");
        let gen = KeyGenerator::new("agro", prefixes);

        assert!(gen.prefixes().contains("vacina"));
        assert_eq!(gen.module_prefix("vacina"), "agro_vac_");
    }
}
