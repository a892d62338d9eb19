use std::collections::HashMap;

/// An email parsed from its wire format.
///
/// This is used to inspect what a built message
/// will look like to the receiver.
#[derive(Debug)]
#[non_exhaustive]
pub struct ParsedEmail {
    /// The complete `From` header,
    /// which includes the name and email address.
    pub from: String,

    /// The complete `To` header, if any.
    pub to: Option<String>,

    /// The complete `Cc` header, if any.
    pub cc: Option<String>,

    /// The complete `Reply-To` header, if any.
    pub reply_to: Option<String>,

    /// The subject of this email,
    /// taken from the headers.
    pub subject: Option<String>,

    /// The map of headers.
    pub headers: HashMap<String, String>,

    /// The mimetype of the top level part.
    pub mimetype: String,

    /// The charset of the top level part.
    pub charset: String,

    /// The decoded text part of this email.
    pub body_text: Option<String>,

    /// The decoded html part of this email.
    pub body_html: Option<String>,
}

impl ParsedEmail {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mail = mailparse::parse_mail(data)?;
        convert_email(mail)
    }
}

/// An error during email parsing.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Parse(#[from] mailparse::MailParseError),
    #[error(transparent)]
    Convert(#[from] ConversionError),
}

/// An error during conversion from
/// [`mailparse::ParsedMail`]
/// into [`ParsedEmail`].
#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    #[error("missing `From` address")]
    MissingFromAddress,
    #[error("multiple `From` addresses")]
    MultipleFromAddresses(Vec<String>),
    #[error("multiple `Subject` headers")]
    MultipleSubjects(Vec<String>),
    #[error("unexpected part count; expected 2, received {0}")]
    UnexpectedPartCount(usize),
    #[error(
        "unexpected part mimetype; expected {expected:?}, received {actual:?}"
    )]
    UnexpectedPartMime {
        actual: String,
        expected: &'static str,
    },
}

fn single_value(
    headers: &[mailparse::MailHeader],
    key: &str,
) -> Result<Option<String>, Vec<String>> {
    use mailparse::MailHeaderMap;
    let mut values = headers.get_all_values(key);
    if values.len() > 1 {
        Err(values)
    } else {
        Ok(values.pop())
    }
}

/// Convert a [`mailparse::ParsedMail`] into a [`ParsedEmail`].
fn convert_email(
    mail: mailparse::ParsedMail,
) -> Result<ParsedEmail, ParseError> {
    use mailparse::MailHeaderMap;
    let from = single_value(&mail.headers, "From")
        .map_err(ConversionError::MultipleFromAddresses)?
        .ok_or(ConversionError::MissingFromAddress)?;
    let subject = single_value(&mail.headers, "Subject")
        .map_err(ConversionError::MultipleSubjects)?
        .map(|subject| {
            subject
                .strip_suffix("\r\n")
                .map(|s| s.to_string())
                .unwrap_or(subject)
        });
    let mimetype = mail.ctype.mimetype.to_string();
    let charset = mail.ctype.charset.to_string();
    let (body_text, body_html) = if mimetype == "multipart/alternative" {
        if mail.subparts.len() != 2 {
            return Err(
                ConversionError::UnexpectedPartCount(mail.subparts.len())
                    .into(),
            );
        }
        let part1_mime = mail.subparts[0].ctype.mimetype.to_string();
        let part2_mime = mail.subparts[1].ctype.mimetype.to_string();
        if part1_mime != "text/plain" {
            return Err(ConversionError::UnexpectedPartMime {
                actual: part1_mime,
                expected: "text/plain",
            }
            .into());
        }
        if part2_mime != "text/html" {
            return Err(ConversionError::UnexpectedPartMime {
                actual: part2_mime,
                expected: "text/html",
            }
            .into());
        }
        (
            Some(mail.subparts[0].get_body()?),
            Some(mail.subparts[1].get_body()?),
        )
    } else if mimetype == "text/html" {
        (None, Some(mail.get_body()?))
    } else {
        (Some(mail.get_body()?), None)
    };
    Ok(ParsedEmail {
        from,
        to: mail.headers.get_first_value("To"),
        cc: mail.headers.get_first_value("Cc"),
        reply_to: mail.headers.get_first_value("Reply-To"),
        subject,
        headers: mail
            .headers
            .iter()
            .map(|header| (header.get_key(), header.get_value()))
            .collect(),
        mimetype,
        charset,
        body_text,
        body_html,
    })
}
