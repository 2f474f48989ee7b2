/// Middleware modules for the API server
///
/// Session resolution lives in `app` because it needs the application state;
/// this module holds the stateless tower layers.
///
/// - `security`: OWASP response headers

pub mod security;
