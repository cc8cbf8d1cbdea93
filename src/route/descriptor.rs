use super::{
    HasParameters, HasRequestMetadata, Headers, HttpMethod, Parameters, Request,
    DEFAULT_API_VERSION,
};
use crate::auth::AuthCredential;

/// Plain-value descriptor for call sites that don't warrant a dedicated type.
///
/// Constructed once, never mutated afterwards; the `with_*` setters consume
/// and return the value. Fields are read through the trait accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    version: u32,
    path: String,
    method: HttpMethod,
    header: Headers,
    parameters: Option<Parameters>,
    is_authenticated: bool,
    auth_credential: Option<AuthCredential>,
    auto_retry: bool,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            version: DEFAULT_API_VERSION,
            path: path.into(),
            method: HttpMethod::Get,
            header: Headers::new(),
            parameters: None,
            is_authenticated: true,
            auth_credential: None,
            auto_retry: true,
        }
    }

    /// Snapshot every accessor of `request` into a plain value.
    pub fn capture<R: Request + ?Sized>(request: &R) -> Self {
        Self {
            version: request.version(),
            path: request.path(),
            method: request.method(),
            header: request.header(),
            parameters: request.parameters(),
            is_authenticated: request.is_authenticated(),
            auth_credential: request.auth_credential(),
            auto_retry: request.auto_retry(),
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.is_authenticated = authenticated;
        self
    }

    pub fn with_credential(mut self, credential: AuthCredential) -> Self {
        self.auth_credential = Some(credential);
        self
    }

    pub fn with_auto_retry(mut self, auto_retry: bool) -> Self {
        self.auto_retry = auto_retry;
        self
    }
}

impl HasParameters for RequestDescriptor {
    fn parameters(&self) -> Option<Parameters> {
        self.parameters.clone()
    }
}

impl HasRequestMetadata for RequestDescriptor {
    fn version(&self) -> u32 {
        self.version
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn header(&self) -> Headers {
        self.header.clone()
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn auth_credential(&self) -> Option<AuthCredential> {
        self.auth_credential.clone()
    }

    fn auto_retry(&self) -> bool {
        self.auto_retry
    }
}
