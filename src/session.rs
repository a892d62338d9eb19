use std::{fmt, time::Duration};

use lettre::{
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    SmtpTransport,
};

use crate::email::{BuildError, Error};

pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_SSL_SMTP_PORT: u16 = 465;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The login details used to authenticate with a SMTP server.
#[derive(Clone, PartialEq, Eq)]
pub struct Authenticator {
    username: String,
    password: String,
}

impl Authenticator {
    /// Create credentials for a login with username and password.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The transport settings a [`Session`] is created from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SessionProperties {
    pub host: Option<String>,
    pub port: u16,
    pub ssl_on_connect: bool,
    pub start_tls_enabled: bool,
    pub start_tls_required: bool,
    pub connection_timeout: Duration,
    pub timeout: Duration,
    pub debug: bool,
    /// The reverse path used for the SMTP envelope.
    pub bounce_address: Option<String>,
}

impl Default for SessionProperties {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            ssl_on_connect: false,
            start_tls_enabled: false,
            start_tls_required: false,
            connection_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            bounce_address: None,
        }
    }
}

/// A configured mail transport context.
///
/// Sessions are shared behind an [`Arc`](std::sync::Arc),
/// so a session handed to an [`Email`](crate::Email)
/// is the same session returned from it.
#[derive(Clone, Debug)]
pub struct Session {
    properties: SessionProperties,
    authenticator: Option<Authenticator>,
}

impl Session {
    /// Create a session from transport settings
    /// and optional credentials.
    pub fn new(
        properties: SessionProperties,
        authenticator: Option<Authenticator>,
    ) -> Self {
        Self {
            properties,
            authenticator,
        }
    }

    /// The transport settings of this session.
    pub fn properties(&self) -> &SessionProperties {
        &self.properties
    }

    pub fn authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_ref()
    }

    /// Create a SMTP transport for this session.
    ///
    /// This does not open a connection.
    /// The transport applies a single timeout,
    /// which is the larger of the connect and read timeouts.
    pub fn transport(&self) -> Result<SmtpTransport, Error> {
        let properties = &self.properties;
        let host = properties
            .host
            .as_deref()
            .ok_or(BuildError::MissingHostName)?;
        let tls = if properties.ssl_on_connect {
            Tls::Wrapper(TlsParameters::new(host.to_string())?)
        } else if properties.start_tls_required {
            Tls::Required(TlsParameters::new(host.to_string())?)
        } else if properties.start_tls_enabled {
            Tls::Opportunistic(TlsParameters::new(host.to_string())?)
        } else {
            Tls::None
        };
        let timeout = properties.connection_timeout.max(properties.timeout);
        let mut builder = SmtpTransport::builder_dangerous(host)
            .port(properties.port)
            .timeout(Some(timeout))
            .tls(tls);
        if let Some(authenticator) = &self.authenticator {
            builder = builder.credentials(authenticator.credentials());
        }
        Ok(builder.build())
    }
}
