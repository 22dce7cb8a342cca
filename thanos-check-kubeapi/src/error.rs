/// How a caller should react to a failed Kubernetes API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The object does not exist.
    NotFound,
    /// Worth retrying: the next observation may succeed.
    Transient,
    /// Credentials were rejected; retrying cannot help.
    Fatal,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access to the Kubernetes API denied: {0}")]
    Unauthorized(String),
    #[error("Kubernetes API error: {0}")]
    Transient(#[source] kube::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Fatal,
            Self::Transient(_) => ErrorKind::Transient,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}

impl From<kube::Error> for Error {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(status) if status.code == 401 || status.code == 403 => {
                Self::Unauthorized(status.message)
            }
            kube::Error::Api(status) if status.code == 404 => Self::NotFound(status.message),
            kube::Error::Auth(auth) => Self::Unauthorized(auth.to_string()),
            err => Self::Transient(err),
        }
    }
}
