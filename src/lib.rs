//! This crate provides a builder to compose email messages.
//! The builder collects the recipients, headers, content
//! and transport settings of an email and turns them into a
//! [`lettre::Message`] together with the [`Session`]
//! to send it with.
//!
//! Addresses are checked when they are added,
//! everything else when the message is built.
//!
//! # Examples
//!
//! ```
//! use email_compose::{Authenticator, Email};
//!
//! let mut email = Email::new();
//! email
//!     .set_host_name("localhost")
//!     .set_smtp_port(1234)
//!     .set_authenticator(Authenticator::new("my-name", "secret"))
//!     .set_subject("Hello")
//!     .set_content("Welcome!", "text/plain");
//! email.set_from("Friend <friend@example.com>").unwrap();
//! email.add_to("self@example.com").unwrap();
//! email.add_bcc_all(["a@example.com", "b@example.com"]).unwrap();
//!
//! let message = email.build_message().unwrap();
//! assert_eq!(message.subject(), Some("Hello"));
//! assert_eq!(message.envelope().to().len(), 3);
//! ```

#![forbid(unsafe_code)]

mod build;
mod config;
mod email;
mod parsed;
mod session;

pub use build::{Body, MessageBuilderExt, DEFAULT_CHARSET};
pub use config::Config;
pub use email::{BuildError, Email, Error, MimeEmail};
pub use parsed::{ConversionError, ParseError, ParsedEmail};
pub use session::{Authenticator, Session, SessionProperties};
