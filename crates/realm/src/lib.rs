//! Nergal Script Realm
//!
//! A self-contained script execution realm backed by QuickJS. Engine
//! subsystems that need realm-allocated objects without a document (such
//! as the CSS object model for standalone parses) share one process-wide
//! realm created on first use.

mod console;
mod error;

pub use error::RealmError;

use std::sync::{Arc, OnceLock};

use rquickjs::{Context, Runtime};

/// Script executed when a realm is created: the global object doubles as
/// `window`, matching what scripts expect of a browsing-context global.
const REALM_SETUP: &str = r#"
    globalThis.window = globalThis;
    globalThis.self = globalThis;
"#;

struct RealmInner {
    // Held so the context outlives every handle to this realm
    _runtime: Runtime,
    context: Context,
}

/// A handle to an execution realm. Clones refer to the same realm; realm
/// identity is handle identity, compared with [`Realm::ptr_eq`].
#[derive(Clone)]
pub struct Realm {
    inner: Arc<RealmInner>,
}

impl Realm {
    /// Create a fresh realm with its intrinsics initialized
    pub fn new() -> Result<Self, RealmError> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;

        context.with(|ctx| {
            console::register_console(&ctx)?;
            ctx.eval::<(), _>(REALM_SETUP)
        })?;

        Ok(Self {
            inner: Arc::new(RealmInner { _runtime: runtime, context }),
        })
    }

    /// Run a closure inside the realm's context
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(rquickjs::Ctx<'_>) -> R,
    {
        self.inner.context.with(f)
    }

    /// Evaluate script and return the result
    pub fn eval(&self, code: &str) -> Result<RealmValue, RealmError> {
        self.inner.context.with(|ctx| {
            let result: rquickjs::Value = ctx.eval(code)?;
            Ok(convert_value(&result))
        })
    }

    /// Evaluate script without returning a value
    pub fn exec(&self, code: &str) -> Result<(), RealmError> {
        self.inner.context.with(|ctx| {
            let _: () = ctx.eval(code)?;
            Ok(())
        })
    }

    /// Do these handles refer to the same realm?
    pub fn ptr_eq(&self, other: &Realm) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Realm {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Realm {}

impl std::fmt::Debug for Realm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Realm")
            .field("addr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

static INTERNAL_REALM: OnceLock<Realm> = OnceLock::new();

/// The process-wide internal realm, created on first use and reused for
/// every later call. Creation cannot reasonably fail after process start;
/// if it does the process cannot run scripts at all.
pub fn get_or_create_internal_realm() -> Realm {
    INTERNAL_REALM
        .get_or_init(|| Realm::new().expect("failed to create internal realm"))
        .clone()
}

/// Script value representation handed back from [`Realm::eval`]
#[derive(Debug, Clone)]
pub enum RealmValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<RealmValue>),
    Object,
    Function,
}

impl RealmValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RealmValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RealmValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RealmValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Convert a QuickJS value to a RealmValue
fn convert_value(value: &rquickjs::Value) -> RealmValue {
    use rquickjs::Type;

    match value.type_of() {
        Type::Undefined => RealmValue::Undefined,
        Type::Null => RealmValue::Null,
        Type::Bool => value
            .as_bool()
            .map(RealmValue::Boolean)
            .unwrap_or(RealmValue::Undefined),
        Type::Int => value
            .as_int()
            .map(|n| RealmValue::Number(n as f64))
            .unwrap_or(RealmValue::Undefined),
        Type::Float => value
            .as_float()
            .map(RealmValue::Number)
            .unwrap_or(RealmValue::Undefined),
        Type::String => value
            .as_string()
            .and_then(|s| s.to_string().ok())
            .map(RealmValue::String)
            .unwrap_or(RealmValue::Undefined),
        Type::Array => {
            if let Some(arr) = value.as_array() {
                let items: Vec<RealmValue> = arr
                    .iter::<rquickjs::Value>()
                    .filter_map(|r| r.ok())
                    .map(|v| convert_value(&v))
                    .collect();
                RealmValue::Array(items)
            } else {
                RealmValue::Array(vec![])
            }
        }
        Type::Object => RealmValue::Object,
        Type::Function => RealmValue::Function,
        _ => RealmValue::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_eval() {
        let realm = Realm::new().unwrap();
        let result = realm.eval("1 + 2").unwrap();
        assert_eq!(result.as_number(), Some(3.0));
    }

    #[test]
    fn test_window_is_global() {
        let realm = Realm::new().unwrap();
        let result = realm.eval("window === globalThis").unwrap();
        assert_eq!(result.as_bool(), Some(true));
        let result = realm.eval("self === window").unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }

    #[test]
    fn test_eval_error_is_reported() {
        let realm = Realm::new().unwrap();
        let err = realm.eval("this is not javascript").unwrap_err();
        assert!(matches!(err, RealmError::QuickJs(_)));
    }

    #[test]
    fn test_console_wired() {
        let realm = Realm::new().unwrap();
        realm.exec("console.log('hello from the realm')").unwrap();
    }

    #[test]
    fn test_handle_identity() {
        let realm = Realm::new().unwrap();
        let clone = realm.clone();
        assert!(realm.ptr_eq(&clone));

        let other = Realm::new().unwrap();
        assert!(!realm.ptr_eq(&other));
        assert_ne!(realm, other);
    }

    #[test]
    fn test_internal_realm_is_reused() {
        let first = get_or_create_internal_realm();
        let second = get_or_create_internal_realm();
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn test_internal_realm_identity_across_threads() {
        let first = get_or_create_internal_realm();
        let second = std::thread::spawn(get_or_create_internal_realm)
            .join()
            .unwrap();
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn test_state_persists_in_realm() {
        let realm = get_or_create_internal_realm();
        realm.exec("globalThis.__marker = 41").unwrap();
        let result = get_or_create_internal_realm().eval("__marker + 1").unwrap();
        assert_eq!(result.as_number(), Some(42.0));
    }
}
