use serde_json::Value;

/// The user returned by the backend on login. The panel does not interpret it
/// beyond offering it to templates
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct SessionUser(pub Value);

impl SessionUser {
    /// Best effort lookup of a name to use in traces
    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }
}

impl From<Value> for SessionUser {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
