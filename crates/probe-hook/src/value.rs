//! Values crossing the binding surface

use std::fmt;
use std::sync::Arc;

use probe_dom::NodeId;
use serde_json::{Map, Value};

use crate::JsError;

/// Callback type for native functions: `(this, args) -> result`.
pub type NativeFunction =
    Arc<dyn Fn(&JsValue, &[JsValue]) -> Result<JsValue, JsError> + Send + Sync>;

/// A callable value together with its source text.
///
/// The source is what `Function.prototype.toString` would give back; it is
/// recorded verbatim and never evaluated.
#[derive(Clone)]
pub struct JsFunction {
    source: Arc<str>,
    func: NativeFunction,
}

impl JsFunction {
    pub fn new<F>(source: impl Into<String>, func: F) -> Self
    where
        F: Fn(&JsValue, &[JsValue]) -> Result<JsValue, JsError> + Send + Sync + 'static,
    {
        Self {
            source: Arc::from(source.into()),
            func: Arc::new(func),
        }
    }

    /// A host-provided function, printed the way engines print built-ins
    pub fn native<F>(name: &str, func: F) -> Self
    where
        F: Fn(&JsValue, &[JsValue]) -> Result<JsValue, JsError> + Send + Sync + 'static,
    {
        Self::new(format!("function {name}() {{ [native code] }}"), func)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn call(&self, this: &JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
        (self.func)(this, args)
    }

    /// Same underlying closure?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsFunction")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Kind of host object behind a [`HostHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Window,
    WebSocket,
    EventSource,
    Response,
}

/// Opaque reference to a host object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostHandle {
    pub kind: HandleKind,
    pub id: u32,
}

/// JavaScript value
#[derive(Debug, Clone)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Plain data object (options bags, `Request`-like records, events)
    Object(Map<String, Value>),
    Function(JsFunction),
    /// A node of the page document
    Node(NodeId),
    Handle(HostHandle),
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            (Self::Node(a), Self::Node(b)) => a == b,
            (Self::Handle(a), Self::Handle(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<JsFunction> for JsValue {
    fn from(f: JsFunction) -> Self {
        Self::Function(f)
    }
}

impl JsValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&JsFunction> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// ToBoolean
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// ToNumber, as far as the timer APIs need it
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }

    /// ToString
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".into(),
            Self::Null => "null".into(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Object(_) | Self::Handle(_) => "[object Object]".into(),
            Self::Function(f) => f.source().to_string(),
            Self::Node(_) => "[object Node]".into(),
        }
    }

    /// A URL-ish argument as a string; `None` when the page passed nothing.
    ///
    /// `Request`- and `URL`-like objects contribute their `url` / `href`.
    pub fn to_url_arg(&self) -> Option<String> {
        match self {
            Self::Undefined | Self::Null => None,
            Self::Object(map) => map
                .get("url")
                .or_else(|| map.get("href"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(self.to_display_string())),
            other => Some(other.to_display_string()),
        }
    }

    /// JSON form for recording; values without one become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Undefined | Self::Null | Self::Function(_) | Self::Node(_) | Self::Handle(_) => {
                Value::Null
            }
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
            Self::Object(map) => Value::Object(map.clone()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        "0".into()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_strings() {
        assert_eq!(JsValue::Number(3.0).to_display_string(), "3");
        assert_eq!(JsValue::Number(2.5).to_display_string(), "2.5");
        assert_eq!(JsValue::Number(f64::NAN).to_display_string(), "NaN");
        assert_eq!(JsValue::Number(-0.0).to_display_string(), "0");
        assert_eq!(JsValue::Number(-42.0).to_display_string(), "-42");
        assert_eq!(JsValue::Null.to_display_string(), "null");
        let f = JsFunction::new("() => 1", |_, _| Ok(JsValue::Number(1.0)));
        assert_eq!(JsValue::Function(f).to_display_string(), "() => 1");
    }

    #[test]
    fn test_large_integers_not_clamped() {
        assert_eq!(JsValue::Number(1e19).to_display_string(), "10000000000000000000");
        assert_eq!(JsValue::Number(-1e20).to_display_string(), "-100000000000000000000");
        assert_eq!(JsValue::Number(2f64.powi(63)).to_display_string(), "9223372036854775808");
    }

    #[test]
    fn test_url_arg() {
        assert_eq!(JsValue::Undefined.to_url_arg(), None);
        assert_eq!(JsValue::from("/x").to_url_arg().as_deref(), Some("/x"));
        let Value::Object(request) = json!({"url": "https://a.test/api", "method": "POST"}) else {
            unreachable!()
        };
        assert_eq!(
            JsValue::Object(request).to_url_arg().as_deref(),
            Some("https://a.test/api")
        );
    }

    #[test]
    fn test_truthiness_and_numbers() {
        assert!(!JsValue::from("").is_truthy());
        assert!(JsValue::Object(Map::new()).is_truthy());
        assert!(JsValue::Undefined.to_number().is_nan());
        assert_eq!(JsValue::from(" 250 ").to_number(), 250.0);
    }

    #[test]
    fn test_native_function_call() {
        let add = JsFunction::native("add", |_, args| {
            let sum: f64 = args.iter().filter_map(JsValue::as_number).sum();
            Ok(JsValue::Number(sum))
        });
        assert_eq!(add.source(), "function add() { [native code] }");
        let result = add
            .call(&JsValue::Undefined, &[JsValue::Number(1.0), JsValue::Number(2.0)])
            .unwrap();
        assert_eq!(result, JsValue::Number(3.0));
        assert!(add.ptr_eq(&add.clone()));
    }
}
