use lettre::{
    message::{header::ContentType, MessageBuilder, MultiPart, SinglePart},
    Message,
};

use crate::email::{BuildError, Error};

/// The charset used when none was given.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// The content of an email.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Body {
    /// A `text/plain` body.
    Text(String),
    /// A `text/html` body.
    Html(String),
    /// A `multipart/alternative` body with a text and an html part.
    Alternative { text: String, html: String },
    /// A body with an explicit content type.
    Content {
        content: String,
        content_type: String,
    },
}

impl Body {
    /// Replace the text part, keeping any html part.
    pub(crate) fn with_text(self, text: String) -> Self {
        match self {
            Body::Html(html) | Body::Alternative { html, .. } => {
                Body::Alternative { text, html }
            }
            Body::Text(_) | Body::Content { .. } => Body::Text(text),
        }
    }

    /// Replace the html part, keeping any text part.
    pub(crate) fn with_html(self, html: String) -> Self {
        match self {
            Body::Text(text) | Body::Alternative { text, .. } => {
                Body::Alternative { text, html }
            }
            Body::Html(_) | Body::Content { .. } => Body::Html(html),
        }
    }
}

/// Extension trait for [`lettre::message::MessageBuilder`]
/// to complete a message with a body encoded in a charset.
pub trait MessageBuilderExt {
    /// Add a text part and complete the message.
    fn body_text(self, text: &str, charset: &str) -> Result<Message, Error>;

    /// Add an html part and complete the message.
    fn body_html(self, html: &str, charset: &str) -> Result<Message, Error>;

    /// Add both a text and html part and complete the message.
    fn body_text_and_html(
        self,
        text: &str,
        html: &str,
        charset: &str,
    ) -> Result<Message, Error>;

    /// Add a part with the given content type and complete the message.
    ///
    /// Textual content is encoded in the given charset,
    /// which replaces any `charset` parameter of the content type.
    fn body_content(
        self,
        content: &str,
        content_type: &str,
        charset: &str,
    ) -> Result<Message, Error>;

    /// Add the given [`Body`] and complete the message.
    fn body_encoded(self, body: &Body, charset: &str) -> Result<Message, Error>
    where
        Self: Sized,
    {
        match body {
            Body::Text(text) => self.body_text(text, charset),
            Body::Html(html) => self.body_html(html, charset),
            Body::Alternative { text, html } => {
                self.body_text_and_html(text, html, charset)
            }
            Body::Content {
                content,
                content_type,
            } => self.body_content(content, content_type, charset),
        }
    }
}

impl MessageBuilderExt for MessageBuilder {
    fn body_text(self, text: &str, charset: &str) -> Result<Message, Error> {
        Ok(self.singlepart(text_part("text/plain", text, charset)?)?)
    }

    fn body_html(self, html: &str, charset: &str) -> Result<Message, Error> {
        Ok(self.singlepart(text_part("text/html", html, charset)?)?)
    }

    fn body_text_and_html(
        self,
        text: &str,
        html: &str,
        charset: &str,
    ) -> Result<Message, Error> {
        Ok(self.multipart(
            MultiPart::alternative()
                .singlepart(text_part("text/plain", text, charset)?)
                .singlepart(text_part("text/html", html, charset)?),
        )?)
    }

    fn body_content(
        self,
        content: &str,
        content_type: &str,
        charset: &str,
    ) -> Result<Message, Error> {
        let is_text = content_type
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("text/");
        let part = if is_text {
            text_part(&strip_charset_param(content_type), content, charset)?
        } else {
            SinglePart::builder()
                .header(parse_content_type(content_type)?)
                .body(content.to_string())
        };
        Ok(self.singlepart(part)?)
    }
}

/// Extract the `charset` parameter of a content type, if any.
pub(crate) fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Remove the `charset` parameter of a content type,
/// keeping all other parameters.
fn strip_charset_param(content_type: &str) -> String {
    content_type
        .split(';')
        .map(str::trim)
        .enumerate()
        .filter(|(i, param)| {
            *i == 0
                || !(param.is_empty()
                    || param
                        .split_once('=')
                        .is_some_and(|(name, _)| {
                            name.trim().eq_ignore_ascii_case("charset")
                        }))
        })
        .map(|(_, param)| param)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check that a charset can be used to encode a body.
pub(crate) fn check_charset(charset: &str) -> Result<(), BuildError> {
    encoding_rs::Encoding::for_label(charset.trim().as_bytes())
        .map(|_| ())
        .ok_or_else(|| BuildError::UnsupportedCharset(charset.to_string()))
}

/// The highest code point of the ascii and latin-1 charsets.
///
/// Their labels resolve to windows-1252 in encoding_rs,
/// which also maps characters these charsets lack.
fn latin1_limit(label: &str) -> Option<u32> {
    match label.to_ascii_lowercase().as_str() {
        "us-ascii" | "ascii" | "us" | "ansi_x3.4-1968" | "iso646-us"
        | "csascii" | "cp367" | "ibm367" | "iso-ir-6" => Some(0x7f),
        "windows-1252" | "cp1252" | "x-cp1252" => None,
        _ => Some(0xff),
    }
}

/// Encode text in a charset.
///
/// Returns the encoded bytes and the name of the charset
/// they are actually encoded in, which differs from the
/// requested one for charsets that cannot be produced (UTF-16).
fn encode(text: &str, charset: &str) -> Result<(Vec<u8>, String), BuildError> {
    let label = charset.trim();
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| BuildError::UnsupportedCharset(charset.to_string()))?;
    if encoding == encoding_rs::WINDOWS_1252 {
        if let Some(limit) = latin1_limit(label) {
            let bytes = text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .ok()
                        .filter(|&b| u32::from(b) <= limit)
                })
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| {
                    BuildError::UnmappableCharacters(charset.to_string())
                })?;
            return Ok((bytes, label.to_string()));
        }
    }
    let (bytes, used, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(BuildError::UnmappableCharacters(charset.to_string()));
    }
    let label = if used == encoding {
        label.to_string()
    } else {
        used.name().to_string()
    };
    Ok((bytes.into_owned(), label))
}

fn text_part(
    mimetype: &str,
    text: &str,
    charset: &str,
) -> Result<SinglePart, BuildError> {
    let (bytes, label) = encode(text, charset)?;
    let content_type =
        parse_content_type(&format!("{mimetype}; charset={label}"))?;
    Ok(SinglePart::builder().header(content_type).body(bytes))
}

fn parse_content_type(content_type: &str) -> Result<ContentType, BuildError> {
    ContentType::parse(content_type)
        .map_err(|_| BuildError::InvalidContentType(content_type.to_string()))
}
