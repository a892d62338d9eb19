use std::str::FromStr;

/// The transport settings for an [`Email`](crate::Email).
///
/// This type can be parsed from a string of the form
/// `[smtp[s]://][username:password@]host[:port]`.
/// The `smtps` scheme enables ssl on connect.
#[derive(PartialEq, Eq, Debug)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub ssl_on_connect: bool,
    pub username_password: Option<(String, String)>,
}

impl FromStr for Config {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ssl_on_connect, s) = match s.split_once("://") {
            Some(("smtp", rest)) => (false, rest),
            Some(("smtps", rest)) => (true, rest),
            Some(_) => return Err("unsupported scheme"),
            None => (false, s),
        };
        let (username_password, host) =
            if let Some((user, host)) = s.rsplit_once('@') {
                if let Some((username, password)) = user.split_once(':') {
                    let username_password =
                        (username.to_string(), password.to_string());
                    (Some(username_password), host)
                } else {
                    return Err("missing ':' in user");
                }
            } else {
                (None, s)
            };
        let (host, port) = if let Some((host, port)) = host.split_once(':') {
            (host, Some(port.parse().map_err(|_| "invalid port number")?))
        } else {
            (host, None)
        };
        if host.is_empty() {
            return Err("missing host");
        }
        Ok(Config {
            host: host.to_string(),
            port,
            ssl_on_connect,
            username_password,
        })
    }
}
