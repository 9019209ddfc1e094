//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub const PANIC_ON_RARE_ERR: bool = false;

pub mod backend {
    /// Used when the configuration does not provide a concurrency limit for
    /// parallel fetches
    pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;
}

/// Caps applied while reading multipart submissions
pub mod upload {
    pub const UPLOAD_MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;
    pub const UPLOAD_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
    pub const UPLOAD_MAX_SUBMISSION_BYTES: usize = 12 * 1024 * 1024;
}

/// Routes served by the admin panel
pub mod route {
    pub const ROUTE_LOGIN: &str = "/";
    pub const ROUTE_LOGOUT: &str = "/logout/";
    pub const ROUTE_DASHBOARD: &str = "/dashboard/";
    pub const ROUTE_HEALTH_CHECK: &str = "/health_check";
    pub const ROUTE_USERS: &str = "/users/";
    pub const ROUTE_INVENTORY: &str = "/inventory/";
    pub const ROUTE_CATEGORY: &str = "/category/";
    pub const ROUTE_PLACES: &str = "/places/";
}

/// Paths on the backend API. They are relative to either the API or the auth
/// base url
pub mod endpoint {
    pub const ENDPOINT_LOGIN: &str = "/login";
    pub const ENDPOINT_USERS: &str = "/users";
    pub const ENDPOINT_INVENTORIES: &str = "/inventories";
    pub const ENDPOINT_INVENTORY_CATEGORIES: &str = "/inventories/categories";
    pub const ENDPOINT_PLACES: &str = "/places";

    /// Path of a single item inside of a collection
    pub fn item(collection: &str, id: &str) -> String {
        format!("{collection}/{id}")
    }
}
